//! Attachment descriptors, their mutations and the attachment registry

pub mod catalog;
pub mod definition;
pub mod mutation;
pub mod registry;

pub use definition::{AttachmentDefinition, SlotType};
pub use mutation::{Condition, CustomMutation, Mutation, MutationError, Stat};
pub use registry::{attachments, install_attachments, AttachmentRegistry};
