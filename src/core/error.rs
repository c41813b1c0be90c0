use thiserror::Error;

use crate::attachments::{MutationError, SlotType};
use crate::core::types::{AttachmentId, WeaponId};
use crate::weapons::falloff::{FalloffTableError, FalloffZone};

/// Failure to build a derived definition from an equip sequence
///
/// These are returned to the caller as values. The equip flow decides
/// whether to reject the loadout or repair it and retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompositionError {
    #[error("Unknown weapon: {0}")]
    UnknownWeapon(WeaponId),

    #[error("Unknown attachment: {0}")]
    UnknownAttachment(AttachmentId),

    #[error("Attachment {attachment} requires {missing}, which is not in the equip sequence")]
    UnmetDependency {
        attachment: AttachmentId,
        missing: AttachmentId,
    },

    #[error("Attachment {attachment} cannot be equipped together with {conflict}")]
    ConflictingAttachments {
        attachment: AttachmentId,
        conflict: AttachmentId,
    },

    #[error("Weapon {weapon} has no {slot:?} slot for attachment {attachment}")]
    IncompatibleSlot {
        weapon: WeaponId,
        attachment: AttachmentId,
        slot: SlotType,
    },
}

impl CompositionError {
    /// The attachment that caused the failure, if any
    pub fn attachment(&self) -> Option<&AttachmentId> {
        match self {
            CompositionError::UnknownWeapon(_) => None,
            CompositionError::UnknownAttachment(id) => Some(id),
            CompositionError::UnmetDependency { attachment, .. }
            | CompositionError::ConflictingAttachments { attachment, .. }
            | CompositionError::IncompatibleSlot { attachment, .. } => Some(attachment),
        }
    }
}

/// Load-time data validation failure
///
/// Raised once while registries are built, never per shot.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Invalid {zone:?} falloff table on {owner}: {reason}")]
    InvalidFalloffTable {
        owner: String,
        zone: FalloffZone,
        reason: FalloffTableError,
    },

    #[error("Invalid ballistics profile on {weapon}: {reason}")]
    InvalidProfile { weapon: WeaponId, reason: String },

    #[error("Duplicate weapon id: {0}")]
    DuplicateWeapon(WeaponId),

    #[error("Duplicate attachment id: {0}")]
    DuplicateAttachment(AttachmentId),

    #[error("Invalid mutation on attachment {attachment}: {reason}")]
    InvalidMutation {
        attachment: AttachmentId,
        reason: MutationError,
    },

    #[error("Attachment {attachment} references unknown attachment {reference}")]
    DanglingReference {
        attachment: AttachmentId,
        reference: AttachmentId,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error in {origin}: {source}")]
    Toml {
        origin: String,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Error, Debug)]
pub enum ArmoryError {
    #[error(transparent)]
    Composition(#[from] CompositionError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ArmoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unmet_dependency_message_names_both_ids() {
        let err = CompositionError::UnmetDependency {
            attachment: AttachmentId::from("subsonic_ammo"),
            missing: AttachmentId::from("suppressor"),
        };
        let msg = err.to_string();
        assert!(msg.contains("subsonic_ammo"));
        assert!(msg.contains("suppressor"));
    }

    #[test]
    fn test_error_reports_offending_attachment() {
        let err = CompositionError::UnknownAttachment(AttachmentId::from("laser"));
        assert_eq!(err.attachment(), Some(&AttachmentId::from("laser")));

        let err = CompositionError::UnknownWeapon(WeaponId::from("railgun"));
        assert_eq!(err.attachment(), None);
    }

    #[test]
    fn test_composition_error_converts_to_armory_error() {
        let err: ArmoryError = CompositionError::UnknownWeapon(WeaponId::from("x")).into();
        assert!(matches!(err, ArmoryError::Composition(_)));
    }
}
