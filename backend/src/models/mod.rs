use sqlx::SqlitePool;

mod error;
mod order;
mod product;
mod response;
mod token_claims;
mod user;

pub use error::{AppError, ErrorResponse};
pub use order::{NewOrder, Order, OrderItem, OrderStatus};
pub use product::{NewProduct, Product, ProductChanges, ProductFilter, ProductQuery};
pub use response::{CustomResponse, PageMeta};
pub use token_claims::TokenClaims;
pub use user::{Credentials, NewUser, User};

use crate::auth::TokenSettings;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub tokens: TokenSettings,
    pub bcrypt_cost: u32,
}
