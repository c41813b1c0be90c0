//! Per-loadout derived weapon definition

use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::Deref;

use crate::attachments::SlotType;
use crate::core::types::AttachmentId;
use crate::weapons::definition::WeaponDefinition;

/// A weapon definition with an equip sequence applied
///
/// Only composition builds one. It is read-only afterwards: a loadout
/// change produces a new value instead of patching this one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedWeaponDefinition {
    stats: WeaponDefinition,
    equip_sequence: Vec<AttachmentId>,
    /// Displayed attachment per slot; the last one equipped wins
    equipped: BTreeMap<SlotType, AttachmentId>,
}

impl DerivedWeaponDefinition {
    pub(crate) fn new(
        stats: WeaponDefinition,
        equip_sequence: Vec<AttachmentId>,
        equipped: BTreeMap<SlotType, AttachmentId>,
    ) -> Self {
        Self {
            stats,
            equip_sequence,
            equipped,
        }
    }

    /// The composed stat block
    pub fn definition(&self) -> &WeaponDefinition {
        &self.stats
    }

    /// Attachments in the order their mutations ran
    pub fn equip_sequence(&self) -> &[AttachmentId] {
        &self.equip_sequence
    }

    /// Displayed attachment in a slot
    pub fn equipped(&self, slot: SlotType) -> Option<&AttachmentId> {
        self.equipped.get(&slot)
    }

    /// Displayed attachments in slot order
    pub fn equipped_slots(&self) -> impl Iterator<Item = (SlotType, &AttachmentId)> {
        self.equipped.iter().map(|(slot, id)| (*slot, id))
    }

    pub fn is_equipped(&self, id: &AttachmentId) -> bool {
        self.equipped.values().any(|equipped| equipped == id)
    }

    /// Attachments whose mutations ran but that a later attachment
    /// displaced from their slot
    pub fn displaced(&self) -> Vec<&AttachmentId> {
        self.equip_sequence
            .iter()
            .filter(|id| !self.is_equipped(id))
            .collect()
    }

    pub fn into_definition(self) -> WeaponDefinition {
        self.stats
    }
}

impl Deref for DerivedWeaponDefinition {
    type Target = WeaponDefinition;

    fn deref(&self) -> &WeaponDefinition {
        &self.stats
    }
}

impl AsRef<WeaponDefinition> for DerivedWeaponDefinition {
    fn as_ref(&self) -> &WeaponDefinition {
        &self.stats
    }
}
