//! Player-chosen equip sequences

use serde::{Deserialize, Serialize};

use crate::attachments::registry::AttachmentRegistry;
use crate::core::error::{ArmoryError, CompositionError};
use crate::core::types::{attachment_ids, AttachmentId, WeaponId};
use crate::loadout::compose::compose_equip_set;
use crate::loadout::derived::DerivedWeaponDefinition;
use crate::weapons::registry::WeaponRegistry;

/// A weapon id and the attachments equipped on it, in UI equip order
///
/// This is also the compact form sent in snapshots: the derived
/// definition is recomposed on the receiving side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EquipSet {
    pub weapon: WeaponId,
    #[serde(default)]
    pub attachments: Vec<AttachmentId>,
}

impl EquipSet {
    pub fn new(weapon: &str, attachments: &[&str]) -> Self {
        Self {
            weapon: WeaponId::from(weapon),
            attachments: attachment_ids(attachments),
        }
    }

    /// Append an attachment to the end of the sequence
    pub fn with(mut self, attachment: &str) -> Self {
        self.attachments.push(AttachmentId::from(attachment));
        self
    }

    /// Remove every occurrence of an attachment
    pub fn without(mut self, attachment: &str) -> Self {
        self.attachments.retain(|id| id.as_str() != attachment);
        self
    }

    /// Equip set a derived definition was composed from
    pub fn of(derived: &DerivedWeaponDefinition) -> Self {
        Self {
            weapon: derived.id.clone(),
            attachments: derived.equip_sequence().to_vec(),
        }
    }

    pub fn compose(
        &self,
        weapons: &WeaponRegistry,
        attachments: &AttachmentRegistry,
    ) -> Result<DerivedWeaponDefinition, CompositionError> {
        compose_equip_set(self, weapons, attachments)
    }

    pub fn to_json(&self) -> Result<String, ArmoryError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ArmoryError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_and_without_keep_order() {
        let set = EquipSet::new("rifle", &["red_dot"])
            .with("suppressor")
            .with("extended_mag")
            .without("red_dot");
        assert_eq!(set.attachments, attachment_ids(&["suppressor", "extended_mag"]));
    }

    #[test]
    fn test_snapshot_round_trip_recomposes_identically() {
        let weapons = WeaponRegistry::builtin();
        let attachments = AttachmentRegistry::builtin();
        let set = EquipSet::new("carbine", &["suppressor", "drum_mag", "angled_grip"]);
        let derived = set.compose(&weapons, &attachments).unwrap();

        let restored = EquipSet::from_json(&EquipSet::of(&derived).to_json().unwrap()).unwrap();
        assert_eq!(restored, set);
        assert_eq!(restored.compose(&weapons, &attachments).unwrap(), derived);
    }

    #[test]
    fn test_json_shape_is_compact() {
        let json = EquipSet::new("pistol", &["red_dot"]).to_json().unwrap();
        assert_eq!(json, r#"{"weapon":"pistol","attachments":["red_dot"]}"#);
    }
}
