use std::sync::Arc;

use axum::{extract::State, routing, Router};
use tracing::info;

use super::extract::{JsonBody, PathParam, QueryParams};
use crate::auth::AdminUser;
use crate::models::{
    AppError, AppState, CustomResponse, NewProduct, PageMeta, Product, ProductChanges,
    ProductQuery,
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", routing::get(read_products).post(create_product))
        .route(
            "/{id}",
            routing::get(read_product)
                .put(update_product)
                .delete(delete_product),
        )
}

async fn read_products(
    State(app_state): State<Arc<AppState>>,
    QueryParams(query): QueryParams<ProductQuery>,
) -> Result<CustomResponse<Vec<Product>>, AppError> {
    let filter = query.into_filter();
    let (products, total) = Product::search(&app_state.pool, &filter).await?;
    Ok(CustomResponse::ok("Products", products)
        .with_meta(PageMeta::new(filter.page, filter.limit, total)))
}

async fn read_product(
    State(app_state): State<Arc<AppState>>,
    PathParam(id): PathParam<i64>,
) -> Result<CustomResponse<Product>, AppError> {
    let product = Product::read_by_id(&app_state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Product"))?;
    Ok(CustomResponse::ok("Product", product))
}

async fn create_product(
    admin: AdminUser,
    State(app_state): State<Arc<AppState>>,
    JsonBody(new_product): JsonBody<NewProduct>,
) -> Result<CustomResponse<Product>, AppError> {
    let product = Product::create(&app_state.pool, new_product).await?;
    info!("Admin {} created product {} ({})", admin.identity.id, product.id, product.sku);
    Ok(CustomResponse::created("Product created", product))
}

async fn update_product(
    admin: AdminUser,
    State(app_state): State<Arc<AppState>>,
    PathParam(id): PathParam<i64>,
    JsonBody(changes): JsonBody<ProductChanges>,
) -> Result<CustomResponse<Product>, AppError> {
    let product = Product::update(&app_state.pool, id, changes)
        .await?
        .ok_or_else(|| AppError::not_found("Product"))?;
    info!("Admin {} updated product {}", admin.identity.id, id);
    Ok(CustomResponse::ok("Product updated", product))
}

async fn delete_product(
    admin: AdminUser,
    State(app_state): State<Arc<AppState>>,
    PathParam(id): PathParam<i64>,
) -> Result<CustomResponse<()>, AppError> {
    if !Product::delete(&app_state.pool, id).await? {
        return Err(AppError::not_found("Product"));
    }
    info!("Admin {} deleted product {}", admin.identity.id, id);
    Ok(CustomResponse::ok("Product deleted", ()))
}
