//! Attachment descriptors

use serde::{Deserialize, Serialize};

use crate::attachments::mutation::{Mutation, MutationError};
use crate::core::error::DataError;
use crate::core::types::AttachmentId;
use crate::weapons::definition::WeaponDefinition;

/// Mount category an attachment occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotType {
    Optic,
    Muzzle,
    Barrel,
    Underbarrel,
    Grip,
    Stock,
    Magazine,
    Ammunition,
    Trigger,
    Laser,
}

impl SlotType {
    pub fn all() -> &'static [SlotType] {
        &[
            SlotType::Optic,
            SlotType::Muzzle,
            SlotType::Barrel,
            SlotType::Underbarrel,
            SlotType::Grip,
            SlotType::Stock,
            SlotType::Magazine,
            SlotType::Ammunition,
            SlotType::Trigger,
            SlotType::Laser,
        ]
    }
}

/// Canonical attachment: the slot it fills and the mutations it applies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttachmentDefinition {
    pub id: AttachmentId,
    pub name: String,
    pub slot: SlotType,
    /// Ids that must also be in the equip sequence
    #[serde(default)]
    pub requires: Vec<AttachmentId>,
    /// Ids that must not be in the equip sequence
    #[serde(default)]
    pub excludes: Vec<AttachmentId>,
    #[serde(default)]
    pub mutations: Vec<Mutation>,
}

impl AttachmentDefinition {
    pub fn new(id: &str, name: &str, slot: SlotType) -> Self {
        Self {
            id: AttachmentId::from(id),
            name: name.to_string(),
            slot,
            requires: Vec::new(),
            excludes: Vec::new(),
            mutations: Vec::new(),
        }
    }

    pub fn requires(mut self, id: &str) -> Self {
        self.requires.push(AttachmentId::from(id));
        self
    }

    pub fn excludes(mut self, id: &str) -> Self {
        self.excludes.push(AttachmentId::from(id));
        self
    }

    pub fn mutate(mut self, mutation: Mutation) -> Self {
        self.mutations.push(mutation);
        self
    }

    /// Run every mutation in authored order
    pub fn apply(&self, def: &mut WeaponDefinition) {
        for mutation in &self.mutations {
            mutation.apply(def);
        }
    }

    /// Load-time validation of the authored mutations
    pub fn validate(&self) -> Result<(), DataError> {
        for mutation in &self.mutations {
            mutation.validate().map_err(|reason| match reason {
                MutationError::Table { zone, reason } => DataError::InvalidFalloffTable {
                    owner: self.id.to_string(),
                    zone,
                    reason,
                },
                reason => DataError::InvalidMutation {
                    attachment: self.id.clone(),
                    reason,
                },
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachments::mutation::Stat;
    use crate::weapons::catalog;
    use crate::weapons::falloff::{DamageFalloffTable, FalloffZone};

    #[test]
    fn test_apply_runs_mutations_in_order() {
        let attachment = AttachmentDefinition::new("test", "Test", SlotType::Magazine)
            .mutate(Mutation::set(Stat::MagazineSize, 10.0))
            .mutate(Mutation::add(Stat::MagazineSize, 5.0));
        let mut rifle = catalog::rifle();
        attachment.apply(&mut rifle);
        assert_eq!(rifle.firing.magazine_size, 15);
    }

    #[test]
    fn test_bad_override_table_reports_attachment_as_owner() {
        let attachment = AttachmentDefinition::new("bad_slug", "Bad", SlotType::Ammunition).mutate(
            Mutation::OverrideFalloff {
                zone: FalloffZone::Body,
                table: DamageFalloffTable::authored(&[(10.0, 50.0)]),
            },
        );
        match attachment.validate() {
            Err(DataError::InvalidFalloffTable { owner, zone, .. }) => {
                assert_eq!(owner, "bad_slug");
                assert_eq!(zone, FalloffZone::Body);
            }
            other => panic!("expected falloff error, got {:?}", other),
        }
    }

    #[test]
    fn test_non_finite_value_rejected() {
        let attachment = AttachmentDefinition::new("nan", "NaN", SlotType::Optic)
            .mutate(Mutation::set(Stat::AdsSpread, f32::NAN));
        assert!(matches!(
            attachment.validate(),
            Err(DataError::InvalidMutation { .. })
        ));
    }

    #[test]
    fn test_slot_list_is_complete_and_sorted() {
        let slots = SlotType::all();
        assert_eq!(slots.len(), 10);
        assert!(slots.windows(2).all(|w| w[0] < w[1]));
    }
}
