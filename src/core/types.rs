//! Core identifier types used throughout the crate

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifier of a canonical weapon or throwable definition
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeaponId(pub String);

impl WeaponId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WeaponId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for WeaponId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WeaponId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Identifier of a canonical attachment definition
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttachmentId(pub String);

impl AttachmentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AttachmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for AttachmentId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AttachmentId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Version stamp of a registry's contents
///
/// Stamps are drawn from a process-wide counter, so two registries never
/// share one and every mutation yields a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegistryStamp(u64);

impl RegistryStamp {
    pub fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Build an attachment id list from string slices
pub fn attachment_ids(ids: &[&str]) -> Vec<AttachmentId> {
    ids.iter().map(|id| AttachmentId::from(*id)).collect()
}
