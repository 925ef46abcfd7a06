//! EmoteSync State - Controller registry and unlock ledger
//!
//! This crate holds the per-process state the relay protocol mutates:
//! - Controller registry (who is performing what)
//! - Unlock ledger (who has unlocked what, tier buckets, favorites, credits)
//! - Session policy (sharing and persistence rules)

pub mod ledger;
pub mod policy;
pub mod registry;

pub use ledger::*;
pub use policy::*;
pub use registry::*;
