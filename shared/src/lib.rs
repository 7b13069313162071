//! Types shared by the API server and its clients.
//!
//! The role guard lives here so the server check and the client route guard
//! evaluate exactly the same rule.

mod guard;
mod identity;
mod role;

pub use guard::{authorize, Decision};
pub use identity::Identity;
pub use role::{Role, UnknownRole};
