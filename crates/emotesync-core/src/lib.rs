//! EmoteSync Core - Fundamental types and primitives
//!
//! This crate defines the core types shared by every EmoteSync crate:
//! - Identifiers (EmoteId, ControllerId, PeerId)
//! - The static emote catalog and sync groups
//! - Session roles
//! - The error taxonomy

pub mod catalog;
pub mod error;
pub mod id;
pub mod role;

pub use catalog::*;
pub use error::*;
pub use id::*;
pub use role::*;
