//! Attachment composition
//!
//! Folds an ordered attachment sequence over a copy of a base weapon.
//! Every attachment's mutations run in sequence order against the
//! accumulating definition, so later attachments observe (and may branch
//! on) what earlier ones did. Only the whole ordered sequence identifies
//! a result; individual attachment effects are never cached or reordered.

use std::collections::BTreeMap;

use crate::attachments::registry::AttachmentRegistry;
use crate::core::error::CompositionError;
use crate::core::types::AttachmentId;
use crate::loadout::derived::DerivedWeaponDefinition;
use crate::loadout::equip::EquipSet;
use crate::weapons::definition::WeaponDefinition;
use crate::weapons::registry::WeaponRegistry;

/// Compose a derived definition from a base and an equip sequence
///
/// Per attachment, in order: the id must be registered, the weapon must
/// offer its slot, every `requires` id must be in the sequence and no
/// `excludes` id may be. When two attachments share a slot both sets of
/// mutations still apply; the later one is the equipped attachment.
pub fn compose(
    base: &WeaponDefinition,
    ids: &[AttachmentId],
    registry: &AttachmentRegistry,
) -> Result<DerivedWeaponDefinition, CompositionError> {
    let mut stats = base.clone();
    let mut equipped = BTreeMap::new();

    for id in ids {
        let attachment = registry
            .get(id)
            .ok_or_else(|| CompositionError::UnknownAttachment(id.clone()))?;

        if !base.has_slot(attachment.slot) {
            return Err(CompositionError::IncompatibleSlot {
                weapon: base.id.clone(),
                attachment: id.clone(),
                slot: attachment.slot,
            });
        }

        if let Some(missing) = attachment.requires.iter().find(|req| !ids.contains(req)) {
            return Err(CompositionError::UnmetDependency {
                attachment: id.clone(),
                missing: missing.clone(),
            });
        }

        if let Some(conflict) = attachment
            .excludes
            .iter()
            .find(|ex| *ex != id && ids.contains(ex))
        {
            return Err(CompositionError::ConflictingAttachments {
                attachment: id.clone(),
                conflict: conflict.clone(),
            });
        }

        attachment.apply(&mut stats);
        if let Some(previous) = equipped.insert(attachment.slot, id.clone()) {
            tracing::debug!(
                "{} displaces {} in {:?} slot on {}",
                id,
                previous,
                attachment.slot,
                base.id
            );
        }
    }

    tracing::debug!("Composed {} with {} attachments", base.id, ids.len());
    Ok(DerivedWeaponDefinition::new(stats, ids.to_vec(), equipped))
}

/// Resolve the weapon id of an equip set and compose it
pub fn compose_equip_set(
    set: &EquipSet,
    weapons: &WeaponRegistry,
    attachments: &AttachmentRegistry,
) -> Result<DerivedWeaponDefinition, CompositionError> {
    let base = weapons
        .get(&set.weapon)
        .ok_or_else(|| CompositionError::UnknownWeapon(set.weapon.clone()))?;
    compose(base, &set.attachments, attachments)
}

/// Compose, dropping offending attachments until the sequence is valid
///
/// Returns the derived definition and the ids that were dropped, in the
/// order they were dropped. Every occurrence of an offending id is
/// removed. Errors not caused by an attachment are returned unchanged.
pub fn compose_repaired(
    base: &WeaponDefinition,
    ids: &[AttachmentId],
    registry: &AttachmentRegistry,
) -> Result<(DerivedWeaponDefinition, Vec<AttachmentId>), CompositionError> {
    let mut remaining = ids.to_vec();
    let mut dropped = Vec::new();

    loop {
        match compose(base, &remaining, registry) {
            Ok(derived) => return Ok((derived, dropped)),
            Err(err) => {
                let Some(offender) = err.attachment().cloned() else {
                    return Err(err);
                };
                tracing::warn!("Dropping {} from {} loadout: {}", offender, base.id, err);
                remaining.retain(|id| *id != offender);
                dropped.push(offender);
            }
        }
    }
}
