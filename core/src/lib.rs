//! Client core for the shopping front-end.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! actual HTTP round-trip, making the core fully deterministic and testable.
//!
//! # Design
//! - `ShopClient` holds the base URL and the session's bearer token as an
//!   explicit field; there is no process-wide default-header state.
//! - `Session` is the view controller: a `Login`/`Items` state machine whose
//!   operations are `begin_*` / `finish_*` pairs around the I/O boundary,
//!   with user-facing output delivered as a drained `Notice` queue
//!   rather than ad-hoc alerts.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod session;
pub mod types;

pub use client::ShopClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use session::{Notice, Session, View};
pub use types::{
    AddToCart, AddToCartResponse, Cart, CartLine, CreateItem, CreateOrder, Item, LoginRequest,
    LoginResponse, Order, RegisterUser, RegisteredUser,
};
