use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use std::str::FromStr;

use super::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Paid,
    Shipped,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "paid" => Ok(OrderStatus::Paid),
            "shipped" => Ok(OrderStatus::Shipped),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(AppError::InternalServerError(format!(
                "Unknown order status '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    #[sqlx(rename = "product_id")]
    pub product: i64,
    pub quantity: i64,
    pub unit_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub user: i64,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub status: OrderStatus,
    pub created_at: String,
}

#[derive(Debug, FromRow)]
struct OrderRow {
    id: i64,
    user_id: i64,
    total_amount: f64,
    status: String,
    created_at: String,
}

/// Body of `POST /orders`. The owner always comes from the verified token,
/// so a `user` field in the payload is ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    #[serde(default)]
    pub status: Option<OrderStatus>,
}

impl NewOrder {
    /// Submitted totals are rounded to cents; allow up to one cent of drift.
    const TOTAL_EPSILON: f64 = 0.01;

    pub fn validate(&self) -> Result<(), AppError> {
        if self.items.is_empty() {
            return Err(AppError::validation_error("items", "an order needs at least one item"));
        }
        for item in &self.items {
            if item.quantity < 1 {
                return Err(AppError::validation_error("items.quantity", "must be at least 1"));
            }
            if !item.unit_price.is_finite() || item.unit_price < 0.0 {
                return Err(AppError::validation_error(
                    "items.unitPrice",
                    "must be a non-negative number",
                ));
            }
        }
        let expected: f64 = self
            .items
            .iter()
            .map(|item| item.unit_price * item.quantity as f64)
            .sum();
        if !self.total_amount.is_finite() || (self.total_amount - expected).abs() > Self::TOTAL_EPSILON {
            return Err(AppError::validation_error(
                "totalAmount",
                "does not match the sum of the items",
            ));
        }
        Ok(())
    }
}

impl Order {
    async fn items_for(pool: &SqlitePool, order_id: i64) -> sqlx::Result<Vec<OrderItem>> {
        sqlx::query_as::<_, OrderItem>(
            "SELECT product_id, quantity, unit_price FROM order_items WHERE order_id = ? ORDER BY id",
        )
        .bind(order_id)
        .fetch_all(pool)
        .await
    }

    async fn hydrate(pool: &SqlitePool, row: OrderRow) -> Result<Self, AppError> {
        let items = Self::items_for(pool, row.id).await?;
        Ok(Self {
            id: row.id,
            user: row.user_id,
            items,
            total_amount: row.total_amount,
            status: row.status.parse()?,
            created_at: row.created_at,
        })
    }

    async fn hydrate_all(pool: &SqlitePool, rows: Vec<OrderRow>) -> Result<Vec<Self>, AppError> {
        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            orders.push(Self::hydrate(pool, row).await?);
        }
        Ok(orders)
    }

    pub async fn read_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, AppError> {
        let row = sqlx::query_as::<_, OrderRow>("SELECT * FROM orders WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        match row {
            Some(row) => Ok(Some(Self::hydrate(pool, row).await?)),
            None => Ok(None),
        }
    }

    pub async fn read_all(pool: &SqlitePool) -> Result<Vec<Self>, AppError> {
        let rows = sqlx::query_as::<_, OrderRow>("SELECT * FROM orders ORDER BY id")
            .fetch_all(pool)
            .await?;
        Self::hydrate_all(pool, rows).await
    }

    pub async fn read_by_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<Self>, AppError> {
        let rows =
            sqlx::query_as::<_, OrderRow>("SELECT * FROM orders WHERE user_id = ? ORDER BY id")
                .bind(user_id)
                .fetch_all(pool)
                .await?;
        Self::hydrate_all(pool, rows).await
    }

    /// Inserts the order and its lines in one transaction.
    pub async fn create(pool: &SqlitePool, user_id: i64, new_order: NewOrder) -> Result<Self, AppError> {
        new_order.validate()?;
        let status = new_order.status.unwrap_or_default();
        let created_at = chrono::Utc::now().to_rfc3339();

        let mut tx = pool.begin().await?;
        for item in &new_order.items {
            let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE id = ?")
                .bind(item.product)
                .fetch_one(&mut *tx)
                .await?;
            if exists == 0 {
                return Err(AppError::BadRequest(format!(
                    "Product {} does not exist",
                    item.product
                )));
            }
        }

        let order_id: i64 = sqlx::query_scalar(
            "INSERT INTO orders (user_id, total_amount, status, created_at) VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(user_id)
        .bind(new_order.total_amount)
        .bind(status.as_str())
        .bind(&created_at)
        .fetch_one(&mut *tx)
        .await?;

        for item in &new_order.items {
            sqlx::query(
                "INSERT INTO order_items (order_id, product_id, quantity, unit_price) VALUES (?, ?, ?, ?)",
            )
            .bind(order_id)
            .bind(item.product)
            .bind(item.quantity)
            .bind(item.unit_price)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;

        Ok(Self {
            id: order_id,
            user: user_id,
            items: new_order.items,
            total_amount: new_order.total_amount,
            status,
            created_at,
        })
    }
}
