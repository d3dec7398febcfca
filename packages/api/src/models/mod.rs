//! Models module.

mod identity;
mod role;

pub use identity::{Profile, SessionIdentity};
pub use role::Role;
