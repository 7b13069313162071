use serde::{Deserialize, Serialize};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};

use super::AppError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub sku: String,
    pub price: f64,
    pub category: String,
    pub stock: i64,
    pub in_stock: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub sku: String,
    pub price: f64,
    #[serde(default)]
    pub category: String,
    pub stock: Option<i64>,
    pub in_stock: Option<bool>,
}

/// Partial update: absent fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductChanges {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub stock: Option<i64>,
    pub in_stock: Option<bool>,
}

/// Query string of `GET /products`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub category: Option<String>,
    pub in_stock: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFilter {
    pub page: u32,
    pub limit: u32,
    pub category: Option<String>,
    pub in_stock: Option<bool>,
}

impl ProductQuery {
    pub const DEFAULT_LIMIT: u32 = 10;
    pub const MAX_LIMIT: u32 = 100;

    pub fn into_filter(self) -> ProductFilter {
        ProductFilter {
            page: self.page.unwrap_or(1).max(1),
            limit: self
                .limit
                .unwrap_or(Self::DEFAULT_LIMIT)
                .clamp(1, Self::MAX_LIMIT),
            // the list page sends `category=` when no category is picked
            category: self.category.filter(|c| !c.trim().is_empty()),
            in_stock: self.in_stock,
        }
    }
}

fn check_fields(name: &str, sku: &str, price: f64, stock: i64) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::validation_error("name", "is required"));
    }
    if sku.trim().is_empty() {
        return Err(AppError::validation_error("sku", "is required"));
    }
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::validation_error("price", "must be a non-negative number"));
    }
    if stock < 0 {
        return Err(AppError::validation_error("stock", "must not be negative"));
    }
    Ok(())
}

fn push_filters(builder: &mut QueryBuilder<'_, Sqlite>, filter: &ProductFilter) {
    if let Some(category) = &filter.category {
        builder.push(" AND category = ").push_bind(category.clone());
    }
    if let Some(in_stock) = filter.in_stock {
        builder.push(" AND in_stock = ").push_bind(in_stock);
    }
}

impl Product {
    pub async fn search(pool: &SqlitePool, filter: &ProductFilter) -> sqlx::Result<(Vec<Self>, i64)> {
        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM products WHERE 1 = 1");
        push_filters(&mut count, filter);
        let total: i64 = count.build_query_scalar().fetch_one(pool).await?;

        let offset = i64::from(filter.page - 1) * i64::from(filter.limit);
        let mut select = QueryBuilder::<Sqlite>::new("SELECT * FROM products WHERE 1 = 1");
        push_filters(&mut select, filter);
        select
            .push(" ORDER BY id LIMIT ")
            .push_bind(i64::from(filter.limit))
            .push(" OFFSET ")
            .push_bind(offset);
        let products = select.build_query_as::<Self>().fetch_all(pool).await?;
        Ok((products, total))
    }

    pub async fn read_by_id(pool: &SqlitePool, id: i64) -> sqlx::Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM products WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(pool: &SqlitePool, new_product: NewProduct) -> Result<Self, AppError> {
        let stock = new_product.stock.unwrap_or(0);
        check_fields(&new_product.name, &new_product.sku, new_product.price, stock)?;
        let in_stock = new_product.in_stock.unwrap_or(stock > 0);

        let sql = "INSERT INTO products (name, sku, price, category, stock, in_stock) \
                   VALUES (?, ?, ?, ?, ?, ?) RETURNING *";
        let product = sqlx::query_as::<_, Self>(sql)
            .bind(new_product.name.trim())
            .bind(new_product.sku.trim())
            .bind(new_product.price)
            .bind(new_product.category.trim())
            .bind(stock)
            .bind(in_stock)
            .fetch_one(pool)
            .await?;
        Ok(product)
    }

    pub async fn update(
        pool: &SqlitePool,
        id: i64,
        changes: ProductChanges,
    ) -> Result<Option<Self>, AppError> {
        let Some(mut product) = Self::read_by_id(pool, id).await? else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            product.name = name.trim().to_string();
        }
        if let Some(sku) = changes.sku {
            product.sku = sku.trim().to_string();
        }
        if let Some(price) = changes.price {
            product.price = price;
        }
        if let Some(category) = changes.category {
            product.category = category.trim().to_string();
        }
        if let Some(stock) = changes.stock {
            product.stock = stock;
            if changes.in_stock.is_none() {
                product.in_stock = stock > 0;
            }
        }
        if let Some(in_stock) = changes.in_stock {
            product.in_stock = in_stock;
        }
        check_fields(&product.name, &product.sku, product.price, product.stock)?;

        let sql = "UPDATE products SET name = ?, sku = ?, price = ?, category = ?, stock = ?, \
                   in_stock = ? WHERE id = ? RETURNING *";
        let updated = sqlx::query_as::<_, Self>(sql)
            .bind(&product.name)
            .bind(&product.sku)
            .bind(product.price)
            .bind(&product.category)
            .bind(product.stock)
            .bind(product.in_stock)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(updated)
    }

    /// Returns `false` when nothing was deleted.
    pub async fn delete(pool: &SqlitePool, id: i64) -> sqlx::Result<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
