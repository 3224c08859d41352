//! HTTP request builder and response parser for the shop API.
//!
//! # Design
//! `ShopClient` holds the `base_url` and the session's optional bearer token.
//! The token is an explicit field set through `set_auth_token` — there is no
//! process-wide default-header state; every `build_*` call attaches the
//! `Authorization` header itself when a token is present. Each operation is
//! split into a `build_*` method that produces an `HttpRequest` and a
//! `parse_*` method that consumes an `HttpResponse`. The caller executes the
//! actual HTTP round-trip, keeping the core deterministic and free of I/O
//! dependencies.

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    AddToCart, AddToCartResponse, Cart, CreateItem, CreateOrder, Item, LoginRequest,
    LoginResponse, Order, RegisterUser, RegisteredUser,
};

/// Client for the shop API: builds `HttpRequest` values and parses
/// `HttpResponse` values without touching the network.
///
/// The bearer token obtained at login is held here for the session lifetime
/// and attached to every subsequent request until cleared.
#[derive(Debug, Clone)]
pub struct ShopClient {
    base_url: String,
    token: Option<String>,
}

impl ShopClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Set or clear the bearer token attached to subsequent requests.
    pub fn set_auth_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn get(&self, path: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}{path}", self.base_url),
            headers: self.auth_headers(),
            body: None,
        }
    }

    fn post<T: serde::Serialize>(&self, path: &str, payload: &T) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(payload).map_err(|e| ApiError::Serialization(e.to_string()))?;
        let mut headers = vec![("content-type".to_string(), "application/json".to_string())];
        headers.extend(self.auth_headers());
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}{path}", self.base_url),
            headers,
            body: Some(body),
        })
    }

    fn auth_headers(&self) -> Vec<(String, String)> {
        match &self.token {
            Some(token) => vec![("authorization".to_string(), format!("Bearer {token}"))],
            None => Vec::new(),
        }
    }

    pub fn build_login(&self, input: &LoginRequest) -> Result<HttpRequest, ApiError> {
        self.post("/users/login", input)
    }

    pub fn build_list_items(&self) -> HttpRequest {
        self.get("/items")
    }

    pub fn build_add_to_cart(&self, input: &AddToCart) -> Result<HttpRequest, ApiError> {
        self.post("/carts", input)
    }

    pub fn build_list_carts(&self) -> HttpRequest {
        self.get("/carts")
    }

    pub fn build_list_orders(&self) -> HttpRequest {
        self.get("/orders")
    }

    pub fn build_create_order(&self, input: &CreateOrder) -> Result<HttpRequest, ApiError> {
        self.post("/orders", input)
    }

    pub fn build_register_user(&self, input: &RegisterUser) -> Result<HttpRequest, ApiError> {
        self.post("/users", input)
    }

    pub fn build_create_item(&self, input: &CreateItem) -> Result<HttpRequest, ApiError> {
        self.post("/items", input)
    }

    pub fn parse_login(&self, response: HttpResponse) -> Result<LoginResponse, ApiError> {
        check_status(&response, 200)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    pub fn parse_list_items(&self, response: HttpResponse) -> Result<Vec<Item>, ApiError> {
        check_status(&response, 200)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    pub fn parse_add_to_cart(&self, response: HttpResponse) -> Result<AddToCartResponse, ApiError> {
        check_status(&response, 200)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    pub fn parse_list_carts(&self, response: HttpResponse) -> Result<Vec<Cart>, ApiError> {
        check_status(&response, 200)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    pub fn parse_list_orders(&self, response: HttpResponse) -> Result<Vec<Order>, ApiError> {
        check_status(&response, 200)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    /// `POST /orders` confirms with a message body the front-end ignores;
    /// only the status matters.
    pub fn parse_create_order(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 200)
    }

    pub fn parse_register_user(&self, response: HttpResponse) -> Result<RegisteredUser, ApiError> {
        check_status(&response, 201)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    pub fn parse_create_item(&self, response: HttpResponse) -> Result<Item, ApiError> {
        check_status(&response, 201)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 401 {
        return Err(ApiError::Unauthorized);
    }
    Err(ApiError::Http {
        status: response.status,
        body: response.body.clone(),
    })
}
