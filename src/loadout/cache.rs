//! Shared cache of composed loadouts

use ahash::AHashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::attachments::registry::AttachmentRegistry;
use crate::core::error::CompositionError;
use crate::core::types::{AttachmentId, RegistryStamp, WeaponId};
use crate::loadout::compose::compose;
use crate::loadout::derived::DerivedWeaponDefinition;
use crate::loadout::equip::EquipSet;
use crate::weapons::registry::WeaponRegistry;

type CacheKey = (WeaponId, Vec<AttachmentId>);

#[derive(Debug, Default)]
struct CacheState {
    /// Registry stamps the entries were composed against
    stamps: Option<(RegistryStamp, RegistryStamp)>,
    entries: AHashMap<CacheKey, Arc<DerivedWeaponDefinition>>,
}

/// Composition results keyed by the full ordered equip sequence
///
/// Entries are immutable and handed out as `Arc`s. The cache remembers
/// which registry contents it was filled from and drops everything when
/// either registry changes. Failed compositions are not cached.
#[derive(Debug, Default)]
pub struct CompositionCache {
    state: RwLock<CacheState>,
}

impl CompositionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached derived definition for an equip set, composing on a miss
    pub fn get_or_compose(
        &self,
        set: &EquipSet,
        weapons: &WeaponRegistry,
        attachments: &AttachmentRegistry,
    ) -> Result<Arc<DerivedWeaponDefinition>, CompositionError> {
        let stamps = (weapons.stamp(), attachments.stamp());
        let key: CacheKey = (set.weapon.clone(), set.attachments.clone());

        {
            let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
            if state.stamps == Some(stamps) {
                if let Some(hit) = state.entries.get(&key) {
                    return Ok(Arc::clone(hit));
                }
            }
        }

        let base = weapons
            .get(&set.weapon)
            .ok_or_else(|| CompositionError::UnknownWeapon(set.weapon.clone()))?;
        let derived = Arc::new(compose(base, &set.attachments, attachments)?);

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if state.stamps != Some(stamps) {
            if !state.entries.is_empty() {
                tracing::warn!(
                    "Registry contents changed, dropping {} cached loadouts",
                    state.entries.len()
                );
            }
            state.entries.clear();
            state.stamps = Some(stamps);
        }
        // Another thread may have composed the same key meanwhile
        Ok(Arc::clone(state.entries.entry(key).or_insert(derived)))
    }

    pub fn len(&self) -> usize {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.entries.clear();
        state.stamps = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachments::catalog;

    #[test]
    fn test_hit_returns_same_entry() {
        let weapons = WeaponRegistry::builtin();
        let attachments = AttachmentRegistry::builtin();
        let cache = CompositionCache::new();
        let set = EquipSet::new("rifle", &["suppressor", "red_dot"]);

        let first = cache.get_or_compose(&set, &weapons, &attachments).unwrap();
        let second = cache.get_or_compose(&set, &weapons, &attachments).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_order_is_part_of_the_key() {
        let weapons = WeaponRegistry::builtin();
        let attachments = AttachmentRegistry::builtin();
        let cache = CompositionCache::new();

        let a = EquipSet::new("rifle", &["suppressor", "trigger_conversion", "subsonic_ammo"]);
        let b = EquipSet::new("rifle", &["suppressor", "subsonic_ammo", "trigger_conversion"]);
        let da = cache.get_or_compose(&a, &weapons, &attachments).unwrap();
        let db = cache.get_or_compose(&b, &weapons, &attachments).unwrap();
        assert_ne!(da.firing.fire_interval, db.firing.fire_interval);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_registry_change_invalidates() {
        let weapons = WeaponRegistry::builtin();
        let mut attachments = AttachmentRegistry::new();
        attachments.insert(catalog::red_dot()).unwrap();
        let cache = CompositionCache::new();
        let set = EquipSet::new("rifle", &["red_dot"]);

        let before = cache.get_or_compose(&set, &weapons, &attachments).unwrap();
        attachments.insert(catalog::suppressor()).unwrap();
        let after = cache.get_or_compose(&set, &weapons, &attachments).unwrap();

        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let weapons = WeaponRegistry::builtin();
        let attachments = AttachmentRegistry::builtin();
        let cache = CompositionCache::new();
        let set = EquipSet::new("rifle", &["subsonic_ammo"]);
        assert!(cache.get_or_compose(&set, &weapons, &attachments).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_shared_across_threads() {
        let weapons = WeaponRegistry::builtin();
        let attachments = AttachmentRegistry::builtin();
        let cache = CompositionCache::new();
        let set = EquipSet::new("carbine", &["compensator", "extended_mag"]);

        let results: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| cache.get_or_compose(&set, &weapons, &attachments)))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap().unwrap()).collect()
        });

        assert_eq!(cache.len(), 1);
        assert!(results.windows(2).all(|w| w[0] == w[1]));
    }
}
