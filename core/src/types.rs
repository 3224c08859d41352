//! Domain DTOs for the shop API.
//!
//! # Design
//! These types mirror the backend's schema but are defined independently from
//! the mock-server crate; integration tests catch schema drift between the
//! two. Responses carry more fields than the front-end uses (timestamps,
//! confirmation messages) — serde ignores the extras, so only what the UI
//! renders is modeled here. Identifiers are numeric, as the backend assigns
//! them.

use serde::{Deserialize, Serialize};

/// A purchasable item as returned by `GET /items`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub id: u64,
    pub name: String,
    pub status: String,
}

/// One cart as returned by `GET /carts`. The backend omits `items` for carts
/// with no lines, so it defaults to empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Cart {
    #[serde(default)]
    pub items: Vec<CartLine>,
}

/// A single line in a cart: which item sits in which cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartLine {
    pub cart_id: u64,
    pub item_id: u64,
}

/// A placed order as returned by `GET /orders`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Order {
    pub id: u64,
}

/// Request payload for `POST /users/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response payload of a successful login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoginResponse {
    pub token: String,
}

/// Request payload for `POST /carts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddToCart {
    pub item_id: u64,
}

/// Response payload of a successful add-to-cart. The backend also echoes the
/// item id and the full cart line; the front-end only needs the cart id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddToCartResponse {
    pub cart_id: u64,
}

/// Request payload for `POST /orders`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrder {
    pub cart_id: u64,
}

/// Request payload for `POST /users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUser {
    pub username: String,
    pub password: String,
}

/// Response payload of a successful registration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisteredUser {
    pub id: u64,
    pub username: String,
}

/// Request payload for `POST /items`. `status` defaults to `"active"` on the
/// server when omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateItem {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}
