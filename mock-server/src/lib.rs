//! In-memory shop backend for integration tests and manual front-end runs.
//!
//! Mirrors the production REST contract: open registration/login/item
//! endpoints, bearer-token auth on the cart and order endpoints, one open
//! cart per user that checkout closes.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    #[serde(skip)]
    pub password: String,
    #[serde(skip)]
    pub token: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    pub name: String,
    pub status: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Cart {
    pub id: u64,
    pub user_id: u64,
    pub status: String,
    pub items: Vec<CartItem>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CartItem {
    pub cart_id: u64,
    pub item_id: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    pub cart_id: u64,
    pub user_id: u64,
}

#[derive(Debug, Default)]
pub struct Store {
    users: Vec<User>,
    items: Vec<Item>,
    carts: Vec<Cart>,
    orders: Vec<Order>,
    next_id: u64,
}

impl Store {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/users", post(register_user))
        .route("/users/login", post(login))
        .route("/items", get(list_items).post(create_item))
        .route("/carts", get(list_carts).post(add_to_cart))
        .route("/orders", get(list_orders).post(create_order))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Resolve the caller's user id from a `Authorization: Bearer <token>`
/// header, as the production auth middleware does.
fn authenticate(store: &Store, headers: &HeaderMap) -> Result<u64, (StatusCode, Json<Value>)> {
    let unauthorized = |msg: &str| {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": msg })),
        )
    };
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| unauthorized("missing Authorization header"))?;

    let token = match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => token,
        _ => return Err(unauthorized("invalid Authorization header")),
    };

    store
        .users
        .iter()
        .find(|u| u.token.as_deref() == Some(token))
        .map(|u| u.id)
        .ok_or_else(|| unauthorized("invalid token"))
}

#[derive(Deserialize)]
struct Credentials {
    username: String,
    password: String,
}

async fn register_user(
    State(db): State<Db>,
    Json(input): Json<Credentials>,
) -> Result<(StatusCode, Json<User>), (StatusCode, Json<Value>)> {
    let mut store = db.write().await;
    if store.users.iter().any(|u| u.username == input.username) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "username already taken" })),
        ));
    }
    let user = User {
        id: store.next_id(),
        username: input.username,
        password: input.password,
        token: None,
    };
    store.users.push(user.clone());
    Ok((StatusCode::CREATED, Json(user)))
}

async fn login(
    State(db): State<Db>,
    Json(input): Json<Credentials>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let mut store = db.write().await;
    let user = store
        .users
        .iter_mut()
        .find(|u| u.username == input.username && u.password == input.password)
        .ok_or((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "invalid username/password" })),
        ))?;
    let token = Uuid::new_v4().to_string();
    user.token = Some(token.clone());
    Ok(Json(json!({ "token": token })))
}

#[derive(Deserialize)]
struct CreateItem {
    name: String,
    #[serde(default)]
    status: Option<String>,
}

async fn create_item(
    State(db): State<Db>,
    Json(input): Json<CreateItem>,
) -> (StatusCode, Json<Item>) {
    let mut store = db.write().await;
    let item = Item {
        id: store.next_id(),
        name: input.name,
        status: input.status.unwrap_or_else(|| "active".to_string()),
    };
    store.items.push(item.clone());
    (StatusCode::CREATED, Json(item))
}

async fn list_items(State(db): State<Db>) -> Json<Vec<Item>> {
    Json(db.read().await.items.clone())
}

#[derive(Deserialize)]
struct AddToCart {
    item_id: u64,
}

async fn add_to_cart(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<AddToCart>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let mut store = db.write().await;
    let user_id = authenticate(&store, &headers)?;

    // Reuse the caller's open cart if one exists.
    let cart_id = match store
        .carts
        .iter()
        .find(|c| c.user_id == user_id && c.status == "open")
    {
        Some(cart) => cart.id,
        None => {
            let id = store.next_id();
            store.carts.push(Cart {
                id,
                user_id,
                status: "open".to_string(),
                items: Vec::new(),
            });
            id
        }
    };

    let line = CartItem {
        cart_id,
        item_id: input.item_id,
    };
    store
        .carts
        .iter_mut()
        .find(|c| c.id == cart_id)
        .expect("cart just looked up or created")
        .items
        .push(line.clone());

    Ok(Json(json!({
        "message": "item added to cart",
        "cart_id": cart_id,
        "item_id": input.item_id,
        "cart_item": line,
    })))
}

async fn list_carts(
    State(db): State<Db>,
    headers: HeaderMap,
) -> Result<Json<Vec<Cart>>, (StatusCode, Json<Value>)> {
    let store = db.read().await;
    authenticate(&store, &headers)?;
    Ok(Json(store.carts.clone()))
}

#[derive(Deserialize)]
struct CreateOrder {
    cart_id: u64,
}

async fn create_order(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CreateOrder>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let mut store = db.write().await;
    let user_id = authenticate(&store, &headers)?;

    let order_id = store.next_id();
    let cart = store
        .carts
        .iter_mut()
        .find(|c| c.id == input.cart_id && c.user_id == user_id && c.status == "open")
        .ok_or((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "cart not found or not open" })),
        ))?;
    cart.status = "checked_out".to_string();

    let order = Order {
        id: order_id,
        cart_id: input.cart_id,
        user_id,
    };
    store.orders.push(order.clone());

    Ok(Json(json!({ "message": "order created", "order": order })))
}

async fn list_orders(
    State(db): State<Db>,
    headers: HeaderMap,
) -> Result<Json<Vec<Order>>, (StatusCode, Json<Value>)> {
    let store = db.read().await;
    let user_id = authenticate(&store, &headers)?;
    Ok(Json(
        store
            .orders
            .iter()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect(),
    ))
}
