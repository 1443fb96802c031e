//! Session Management Module
//!
//! Roles and the persisted store holding the signed-in user.

pub mod role;
pub mod store;

pub use role::{Role, RoleSet};
pub use store::{SessionStore, SessionUser};
