use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Pagination block attached to list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub page: u32,
    pub limit: u32,
    pub total: i64,
    pub pages: i64,
}

impl PageMeta {
    pub fn new(page: u32, limit: u32, total: i64) -> Self {
        let limit_i64 = i64::from(limit.max(1));
        Self {
            page,
            limit,
            total,
            pages: (total + limit_i64 - 1) / limit_i64,
        }
    }
}

/// Success envelope: `{"status": "success", "message", "data", "meta"?}`.
#[derive(Debug, Clone)]
pub struct CustomResponse<T> {
    code: StatusCode,
    body: ApiResponse<T>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
struct ApiResponse<T> {
    pub status: String,
    pub message: String,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
}

impl<T> CustomResponse<T>
where
    T: Serialize,
{
    pub fn api(code: StatusCode, message: &str, data: T) -> Self {
        Self {
            code,
            body: ApiResponse {
                status: "success".to_string(),
                message: message.to_string(),
                data,
                meta: None,
            },
        }
    }

    pub fn ok(message: &str, data: T) -> Self {
        Self::api(StatusCode::OK, message, data)
    }

    pub fn created(message: &str, data: T) -> Self {
        Self::api(StatusCode::CREATED, message, data)
    }

    pub fn with_meta(mut self, meta: PageMeta) -> Self {
        self.body.meta = Some(meta);
        self
    }
}

impl<T> IntoResponse for CustomResponse<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        (self.code, Json(self.body)).into_response()
    }
}
