pub mod config;
pub mod data;
pub mod error;
pub mod types;

pub use config::{config, set_config, ArmoryConfig};
pub use error::{ArmoryError, CompositionError, DataError, Result};
pub use types::{AttachmentId, RegistryStamp, WeaponId};
