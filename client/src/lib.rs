//! Client side of the storefront: session persistence, navigation guards,
//! the shopping cart, and an HTTP client that carries the session token.

pub mod api;
pub mod cart;
pub mod error;
pub mod models;
pub mod route_guard;
pub mod session;

pub use api::ApiClient;
pub use cart::{Cart, CartItem};
pub use error::ClientError;
pub use route_guard::{guard, navigate, route_access, RouteAccess, RouteDecision};
pub use session::{FileStorage, MemoryStorage, Session, SessionStorage, SessionStore};
