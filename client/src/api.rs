use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use shared::Identity;
use tracing::debug;

use crate::models::{Order, OrderRequest, Page, PageMeta, Product, ProductInput, ProductParams};
use crate::session::{SessionStorage, SessionStore};
use crate::ClientError;

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
    #[serde(default)]
    meta: Option<PageMeta>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    message: String,
}

#[derive(Debug, Deserialize)]
struct LoginData {
    token: String,
    user: Identity,
}

#[derive(Serialize)]
struct CredentialsBody<'a> {
    email: &'a str,
    password: &'a str,
}

/// HTTP client for the storefront API. Owns the session store and attaches
/// `Authorization: Bearer <token>` to every request while logged in.
#[derive(Debug)]
pub struct ApiClient<S> {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore<S>,
}

impl<S: SessionStorage> ApiClient<S> {
    /// `base_url` points at the API root, e.g. `http://localhost:3000/api`.
    pub fn new(base_url: impl Into<String>, session: SessionStore<S>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn session(&self) -> &SessionStore<S> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut SessionStore<S> {
        &mut self.session
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let builder = self.http.request(method, url);
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<(T, Option<PageMeta>), ClientError> {
        let response = builder.send().await?;
        let response = check(response).await?;
        let envelope: Envelope<T> = response.json().await?;
        Ok((envelope.data, envelope.meta))
    }

    async fn data<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        Ok(self.send(builder).await?.0)
    }

    /// Authenticates and stores the returned token and identity.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<Identity, ClientError> {
        let builder = self
            .request(Method::POST, "/auth/login")
            .json(&CredentialsBody { email, password });
        let LoginData { token, user } = self.data(builder).await?;
        self.session.login(token, user.clone())?;
        debug!("Logged in as {} ({})", user.email, user.role);
        Ok(user)
    }

    /// Tokens are not revocable, so logging out only forgets the session.
    pub fn logout(&mut self) -> Result<(), ClientError> {
        self.session.logout()
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<Identity, ClientError> {
        let builder = self
            .request(Method::POST, "/auth/register")
            .json(&CredentialsBody { email, password });
        self.data(builder).await
    }

    pub async fn me(&self) -> Result<Identity, ClientError> {
        self.data(self.request(Method::GET, "/auth/me")).await
    }

    pub async fn get_products(&self, params: &ProductParams) -> Result<Page<Product>, ClientError> {
        let builder = self.request(Method::GET, "/products").query(params);
        let (items, meta) = self.send::<Vec<Product>>(builder).await?;
        let meta = meta.unwrap_or(PageMeta {
            page: params.page,
            limit: params.limit,
            total: items.len() as i64,
            pages: 1,
        });
        Ok(Page { items, meta })
    }

    pub async fn get_product(&self, id: i64) -> Result<Product, ClientError> {
        self.data(self.request(Method::GET, &format!("/products/{id}")))
            .await
    }

    pub async fn create_product(&self, input: &ProductInput) -> Result<Product, ClientError> {
        self.data(self.request(Method::POST, "/products").json(input))
            .await
    }

    pub async fn update_product(&self, id: i64, input: &ProductInput) -> Result<Product, ClientError> {
        self.data(self.request(Method::PUT, &format!("/products/{id}")).json(input))
            .await
    }

    pub async fn delete_product(&self, id: i64) -> Result<(), ClientError> {
        self.data::<serde_json::Value>(self.request(Method::DELETE, &format!("/products/{id}")))
            .await?;
        Ok(())
    }

    pub async fn create_order(&self, order: &OrderRequest) -> Result<Order, ClientError> {
        self.data(self.request(Method::POST, "/orders").json(order))
            .await
    }

    pub async fn get_orders(&self) -> Result<Vec<Order>, ClientError> {
        self.data(self.request(Method::GET, "/orders")).await
    }
}

/// Maps the error envelope onto [`ClientError`], keeping 401 and 403 apart.
async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = match response.json::<ErrorEnvelope>().await {
        Ok(body) => body.message,
        Err(_) => status.canonical_reason().unwrap_or("request failed").to_string(),
    };
    debug!("API call failed with {}: {}", status, message);
    Err(match status {
        StatusCode::UNAUTHORIZED => ClientError::Unauthorized(message),
        StatusCode::FORBIDDEN => ClientError::Forbidden(message),
        _ => ClientError::Api {
            status: status.as_u16(),
            message,
        },
    })
}
