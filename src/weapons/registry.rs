//! Weapon definition registry
//!
//! Holds canonical weapon definitions keyed by id. Definitions are validated
//! on insert, so anything reachable through the registry satisfies the
//! falloff and ballistics invariants.

use ahash::{AHashMap, AHashSet};
use serde::Deserialize;
use std::borrow::Borrow;
use std::hash::Hash;
use std::path::Path;
use std::sync::OnceLock;

use crate::core::data::{parse_toml, toml_files};
use crate::core::error::DataError;
use crate::core::types::{RegistryStamp, WeaponId};
use crate::weapons::catalog;
use crate::weapons::definition::{WeaponCategory, WeaponDefinition};

/// On-disk layout: a list of `[[weapon]]` tables
#[derive(Debug, Deserialize)]
struct WeaponFile {
    #[serde(default, rename = "weapon")]
    weapons: Vec<WeaponDefinition>,
}

/// Registry of canonical weapon definitions
#[derive(Debug)]
pub struct WeaponRegistry {
    weapons: AHashMap<WeaponId, WeaponDefinition>,
    /// Category index for loadout screens
    by_category: AHashMap<WeaponCategory, Vec<WeaponId>>,
    stamp: RegistryStamp,
}

impl WeaponRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            weapons: AHashMap::new(),
            by_category: AHashMap::new(),
            stamp: RegistryStamp::next(),
        }
    }

    /// Registry holding the built-in catalog
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for weapon in catalog::all() {
            let id = weapon.id.clone();
            let inserted = registry.insert(weapon);
            debug_assert!(inserted.is_ok(), "built-in weapon {} rejected: {:?}", id, inserted);
            if let Err(e) = inserted {
                tracing::error!("Built-in weapon {} rejected: {}", id, e);
            }
        }
        registry
    }

    /// Validate and register a definition
    pub fn insert(&mut self, weapon: WeaponDefinition) -> Result<(), DataError> {
        self.check(&weapon)?;
        self.register(weapon);
        Ok(())
    }

    fn check(&self, weapon: &WeaponDefinition) -> Result<(), DataError> {
        if self.weapons.contains_key(&weapon.id) {
            return Err(DataError::DuplicateWeapon(weapon.id.clone()));
        }
        weapon.validate()
    }

    fn register(&mut self, weapon: WeaponDefinition) {
        tracing::debug!("Registered weapon {} ({:?})", weapon.id, weapon.category);
        self.by_category
            .entry(weapon.category)
            .or_default()
            .push(weapon.id.clone());
        self.weapons.insert(weapon.id.clone(), weapon);
        self.stamp = RegistryStamp::next();
    }

    /// Load `[[weapon]]` tables from TOML text
    ///
    /// `origin` names the source in error messages. The whole file is
    /// checked before anything is registered, so a rejected file leaves
    /// the registry untouched.
    pub fn load_str(&mut self, content: &str, origin: &str) -> Result<Vec<WeaponId>, DataError> {
        let file: WeaponFile = parse_toml(content, origin)?;

        let mut seen = AHashSet::with_capacity(file.weapons.len());
        for weapon in &file.weapons {
            self.check(weapon)?;
            if !seen.insert(&weapon.id) {
                return Err(DataError::DuplicateWeapon(weapon.id.clone()));
            }
        }

        let ids = file.weapons.iter().map(|w| w.id.clone()).collect();
        for weapon in file.weapons {
            self.register(weapon);
        }
        Ok(ids)
    }

    /// Load weapons from a TOML file
    pub fn load_file(&mut self, path: &Path) -> Result<Vec<WeaponId>, DataError> {
        let content = std::fs::read_to_string(path)?;
        self.load_str(&content, &path.display().to_string())
    }

    /// Load all .toml files from a directory recursively
    pub fn load_directory(&mut self, path: &Path) -> Result<Vec<WeaponId>, DataError> {
        let mut ids = Vec::new();
        for file in toml_files(path)? {
            ids.extend(self.load_file(&file)?);
        }
        Ok(ids)
    }

    /// Get a weapon by id
    pub fn get<Q>(&self, id: &Q) -> Option<&WeaponDefinition>
    where
        WeaponId: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.weapons.get(id)
    }

    pub fn contains<Q>(&self, id: &Q) -> bool
    where
        WeaponId: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.weapons.contains_key(id)
    }

    /// Weapons in a category, in registration order
    pub fn by_category(&self, category: WeaponCategory) -> Vec<&WeaponDefinition> {
        self.by_category
            .get(&category)
            .map(|ids| ids.iter().filter_map(|id| self.weapons.get(id)).collect())
            .unwrap_or_default()
    }

    /// All registered ids, sorted
    pub fn ids(&self) -> Vec<&WeaponId> {
        let mut ids: Vec<_> = self.weapons.keys().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.weapons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weapons.is_empty()
    }

    /// Changes whenever the registry contents change
    pub fn stamp(&self) -> RegistryStamp {
        self.stamp
    }
}

impl Default for WeaponRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// === GLOBAL REGISTRY ACCESS ===

static WEAPONS: OnceLock<WeaponRegistry> = OnceLock::new();

/// Process-wide weapon registry (built-in catalog unless installed first)
pub fn weapons() -> &'static WeaponRegistry {
    WEAPONS.get_or_init(WeaponRegistry::builtin)
}

/// Install the process-wide registry (can only be called once)
///
/// Returns Err if the registry was already initialized.
pub fn install_weapons(registry: WeaponRegistry) -> Result<(), WeaponRegistry> {
    WEAPONS.set(registry)
}
