//! Attachment registry

use ahash::{AHashMap, AHashSet};
use serde::Deserialize;
use std::borrow::Borrow;
use std::hash::Hash;
use std::path::Path;
use std::sync::OnceLock;

use crate::attachments::catalog;
use crate::attachments::definition::{AttachmentDefinition, SlotType};
use crate::core::data::{parse_toml, toml_files};
use crate::core::error::DataError;
use crate::core::types::{AttachmentId, RegistryStamp};

#[derive(Debug, Deserialize)]
struct AttachmentFile {
    #[serde(default, rename = "attachment")]
    attachments: Vec<AttachmentDefinition>,
}

/// Registry of canonical attachment definitions
#[derive(Debug)]
pub struct AttachmentRegistry {
    attachments: AHashMap<AttachmentId, AttachmentDefinition>,
    by_slot: AHashMap<SlotType, Vec<AttachmentId>>,
    stamp: RegistryStamp,
}

impl AttachmentRegistry {
    pub fn new() -> Self {
        Self {
            attachments: AHashMap::new(),
            by_slot: AHashMap::new(),
            stamp: RegistryStamp::next(),
        }
    }

    /// Registry holding the built-in catalog
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for attachment in catalog::all() {
            let id = attachment.id.clone();
            let inserted = registry.insert(attachment);
            debug_assert!(inserted.is_ok(), "built-in attachment {} rejected: {:?}", id, inserted);
            if let Err(e) = inserted {
                tracing::error!("Built-in attachment {} rejected: {}", id, e);
            }
        }
        let references = registry.validate_references();
        debug_assert!(references.is_ok(), "built-in catalog: {:?}", references);
        if let Err(e) = references {
            tracing::error!("Built-in attachment catalog is inconsistent: {}", e);
        }
        registry
    }

    /// Validate and register a definition
    ///
    /// `requires`/`excludes` may name attachments that are loaded later;
    /// call `validate_references` once everything is in.
    pub fn insert(&mut self, attachment: AttachmentDefinition) -> Result<(), DataError> {
        self.check(&attachment)?;
        self.register(attachment);
        Ok(())
    }

    fn check(&self, attachment: &AttachmentDefinition) -> Result<(), DataError> {
        if self.attachments.contains_key(&attachment.id) {
            return Err(DataError::DuplicateAttachment(attachment.id.clone()));
        }
        attachment.validate()
    }

    fn register(&mut self, attachment: AttachmentDefinition) {
        tracing::debug!(
            "Registered attachment {} ({:?}, {} mutations)",
            attachment.id,
            attachment.slot,
            attachment.mutations.len()
        );
        self.by_slot
            .entry(attachment.slot)
            .or_default()
            .push(attachment.id.clone());
        self.attachments.insert(attachment.id.clone(), attachment);
        self.stamp = RegistryStamp::next();
    }

    /// Check that every `requires`/`excludes` id is registered
    pub fn validate_references(&self) -> Result<(), DataError> {
        for id in self.ids() {
            let Some(attachment) = self.attachments.get(id) else {
                continue;
            };
            for reference in attachment.requires.iter().chain(&attachment.excludes) {
                if !self.attachments.contains_key(reference) {
                    return Err(DataError::DanglingReference {
                        attachment: attachment.id.clone(),
                        reference: reference.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Load `[[attachment]]` tables from TOML text
    ///
    /// Nothing is registered unless every entry in the file passes.
    pub fn load_str(
        &mut self,
        content: &str,
        origin: &str,
    ) -> Result<Vec<AttachmentId>, DataError> {
        let file: AttachmentFile = parse_toml(content, origin)?;

        let mut seen = AHashSet::with_capacity(file.attachments.len());
        for attachment in &file.attachments {
            self.check(attachment)?;
            if !seen.insert(&attachment.id) {
                return Err(DataError::DuplicateAttachment(attachment.id.clone()));
            }
        }

        let ids = file.attachments.iter().map(|a| a.id.clone()).collect();
        for attachment in file.attachments {
            self.register(attachment);
        }
        Ok(ids)
    }

    pub fn load_file(&mut self, path: &Path) -> Result<Vec<AttachmentId>, DataError> {
        let content = std::fs::read_to_string(path)?;
        self.load_str(&content, &path.display().to_string())
    }

    /// Load all .toml files from a directory recursively, then check
    /// cross-references
    pub fn load_directory(&mut self, path: &Path) -> Result<Vec<AttachmentId>, DataError> {
        let mut ids = Vec::new();
        for file in toml_files(path)? {
            ids.extend(self.load_file(&file)?);
        }
        self.validate_references()?;
        tracing::info!("Loaded {} attachments from {}", ids.len(), path.display());
        Ok(ids)
    }

    pub fn get<Q>(&self, id: &Q) -> Option<&AttachmentDefinition>
    where
        AttachmentId: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.attachments.get(id)
    }

    pub fn contains<Q>(&self, id: &Q) -> bool
    where
        AttachmentId: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.attachments.contains_key(id)
    }

    /// Attachments for a slot type, in registration order
    pub fn by_slot(&self, slot: SlotType) -> Vec<&AttachmentDefinition> {
        self.by_slot
            .get(&slot)
            .map(|ids| ids.iter().filter_map(|id| self.attachments.get(id)).collect())
            .unwrap_or_default()
    }

    pub fn ids(&self) -> Vec<&AttachmentId> {
        let mut ids: Vec<_> = self.attachments.keys().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.attachments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attachments.is_empty()
    }

    pub fn stamp(&self) -> RegistryStamp {
        self.stamp
    }
}

impl Default for AttachmentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// === GLOBAL REGISTRY ACCESS ===

static ATTACHMENTS: OnceLock<AttachmentRegistry> = OnceLock::new();

/// Process-wide attachment registry (built-in catalog unless installed first)
pub fn attachments() -> &'static AttachmentRegistry {
    ATTACHMENTS.get_or_init(AttachmentRegistry::builtin)
}

/// Install the process-wide registry (can only be called once)
pub fn install_attachments(registry: AttachmentRegistry) -> Result<(), AttachmentRegistry> {
    ATTACHMENTS.set(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachments::mutation::{Mutation, Stat};

    const FLASH_HIDER_TOML: &str = r#"
[[attachment]]
id = "flash_hider"
name = "Flash Hider"
slot = "muzzle"
excludes = ["suppressor"]

[[attachment.mutations]]
op = "scale"
stat = "recoil_yaw"
factor = 0.9

[[attachment.mutations]]
op = "when"
condition = { is = "automatic" }
then = [{ op = "scale", stat = "hip_spread", factor = 0.95 }]
"#;

    #[test]
    fn test_builtin_registry_holds_catalog() {
        let registry = AttachmentRegistry::builtin();
        assert_eq!(registry.len(), catalog::all().len());
        assert!(registry.validate_references().is_ok());
        assert!(registry.contains("subsonic_ammo"));
    }

    #[test]
    fn test_by_slot_index() {
        let registry = AttachmentRegistry::builtin();
        let optics: Vec<&str> = registry
            .by_slot(SlotType::Optic)
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(optics, vec!["red_dot", "scope_4x"]);
    }

    #[test]
    fn test_load_attachment_from_toml() {
        let mut registry = AttachmentRegistry::builtin();
        registry.load_str(FLASH_HIDER_TOML, "inline").unwrap();
        let hider = registry.get("flash_hider").unwrap();
        assert_eq!(hider.slot, SlotType::Muzzle);
        assert_eq!(hider.excludes, vec![AttachmentId::from("suppressor")]);
        assert_eq!(hider.mutations[0], Mutation::scale(Stat::RecoilYaw, 0.9));
        assert!(registry.validate_references().is_ok());
    }

    #[test]
    fn test_dangling_reference_detected() {
        let mut registry = AttachmentRegistry::new();
        registry.load_str(FLASH_HIDER_TOML, "inline").unwrap();
        let err = registry.validate_references().unwrap_err();
        assert!(matches!(err, DataError::DanglingReference { .. }));
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = AttachmentRegistry::new();
        registry.insert(catalog::red_dot()).unwrap();
        assert!(matches!(
            registry.insert(catalog::red_dot()),
            Err(DataError::DuplicateAttachment(_))
        ));
    }

    #[test]
    fn test_invalid_entry_rejects_whole_file() {
        let toml = format!(
            "{}{}",
            FLASH_HIDER_TOML,
            r#"
[[attachment]]
id = "bent_barrel"
name = "Bent Barrel"
slot = "barrel"

[[attachment.mutations]]
op = "scale"
stat = "muzzle_velocity"
factor = -1.0
"#
        );
        let mut registry = AttachmentRegistry::builtin();
        let stamp = registry.stamp();

        let err = registry.load_str(&toml, "mixed.toml").unwrap_err();
        assert!(matches!(err, DataError::InvalidMutation { .. }));
        assert!(!registry.contains("flash_hider"));
        assert!(!registry.contains("bent_barrel"));
        assert_eq!(registry.stamp(), stamp);
    }

    #[test]
    fn test_insert_changes_stamp() {
        let mut registry = AttachmentRegistry::new();
        let before = registry.stamp();
        registry.insert(catalog::bipod()).unwrap();
        assert_ne!(before, registry.stamp());
    }
}
