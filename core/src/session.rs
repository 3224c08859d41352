//! Session state machine for the shopping front-end.
//!
//! # Design
//! `Session` owns the client-held state for one user interaction: the
//! `ShopClient` (with its bearer token), the current `View`, the fetched item
//! list, the active cart id, and a FIFO queue of user-facing `Notice`s.
//!
//! Operations mirror the client's build/parse split as `begin_*` / `finish_*`
//! pairs: `begin_*` produces the `HttpRequest` to execute (or declines
//! locally), `finish_*` consumes the `HttpResponse` and mutates state. The
//! host runs begin → execute → finish for each user action, then drains and
//! renders the notices. Remote failures never propagate out of `finish_*`;
//! each becomes a notice and the action is over — nothing is retried or
//! queued.

use std::collections::VecDeque;
use std::fmt;

use crate::client::ShopClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{AddToCart, CartLine, CreateOrder, Item, LoginRequest, Order};

/// Which screen the front-end is showing. Matched exhaustively by renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    Items,
}

/// A user-facing message produced by a session operation.
///
/// The presentation layer drains these after each action and renders
/// `Display`, which carries the exact user-facing text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Login was rejected by the server.
    InvalidCredentials,
    /// A protected call failed; the user must log in first.
    LoginRequired,
    /// An item landed in the cart.
    ItemAdded { item_id: u64 },
    /// Cart summary, one line per cart line.
    CartContents(Vec<CartLine>),
    /// The order list came back empty.
    NoOrders,
    /// The order list, one line per order.
    Orders(Vec<Order>),
    /// Checkout was attempted with no active cart; no request was made.
    EmptyCart,
    /// Checkout succeeded.
    OrderPlaced,
    /// A user-triggered action failed remotely; state was left untouched.
    RequestFailed(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::InvalidCredentials => write!(f, "Invalid username/password"),
            Notice::LoginRequired => write!(f, "Login required to continue"),
            Notice::ItemAdded { item_id } => write!(f, "Added item: {item_id}"),
            Notice::CartContents(lines) => {
                write!(f, "Cart items:")?;
                for line in lines {
                    write!(f, "\nCart: {} Item: {}", line.cart_id, line.item_id)?;
                }
                Ok(())
            }
            Notice::NoOrders => write!(f, "No orders yet"),
            Notice::Orders(orders) => {
                let mut first = true;
                for order in orders {
                    if !first {
                        writeln!(f)?;
                    }
                    write!(f, "Order {}", order.id)?;
                    first = false;
                }
                Ok(())
            }
            Notice::EmptyCart => write!(f, "Add items before checkout"),
            Notice::OrderPlaced => write!(f, "Order placed!"),
            Notice::RequestFailed(msg) => write!(f, "Request failed: {msg}"),
        }
    }
}

/// Client-held state for the current interaction, from application start to
/// teardown. Starts unauthenticated on the login view.
#[derive(Debug)]
pub struct Session {
    client: ShopClient,
    view: View,
    items: Vec<Item>,
    active_cart_id: Option<u64>,
    notices: VecDeque<Notice>,
}

impl Session {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: ShopClient::new(base_url),
            view: View::Login,
            items: Vec::new(),
            active_cart_id: None,
            notices: VecDeque::new(),
        }
    }

    pub fn view(&self) -> View {
        self.view
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// The cart id most recently created via add-to-cart, used as the
    /// checkout target. Set only by a successful add-to-cart, cleared only
    /// by a successful checkout.
    pub fn active_cart_id(&self) -> Option<u64> {
        self.active_cart_id
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.client.auth_token()
    }

    /// Remove and return all pending notices, oldest first.
    pub fn drain_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push_back(notice);
    }

    pub fn begin_login(&self, username: &str, password: &str) -> Result<HttpRequest, ApiError> {
        self.client.build_login(&LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    /// On success stores the token, activates it on the client, switches to
    /// the items view, and returns the follow-up items fetch — entering the
    /// items view always triggers one. On failure the session stays on the
    /// login view with no token.
    pub fn finish_login(&mut self, response: HttpResponse) -> Option<HttpRequest> {
        match self.client.parse_login(response) {
            Ok(login) => {
                self.client.set_auth_token(Some(login.token));
                self.view = View::Items;
                Some(self.begin_fetch_items())
            }
            Err(_) => {
                self.notify(Notice::InvalidCredentials);
                None
            }
        }
    }

    pub fn begin_fetch_items(&self) -> HttpRequest {
        self.client.build_list_items()
    }

    /// On success replaces the item list. On failure logs the error and
    /// leaves the list empty; the user sees no notice for this one.
    pub fn finish_fetch_items(&mut self, response: HttpResponse) {
        match self.client.parse_list_items(response) {
            Ok(items) => self.items = items,
            Err(err) => {
                log::error!("fetching items failed: {err}");
                self.items.clear();
            }
        }
    }

    pub fn begin_add_to_cart(&self, item_id: u64) -> Result<HttpRequest, ApiError> {
        self.client.build_add_to_cart(&AddToCart { item_id })
    }

    /// On success records the returned cart id as the checkout target. On
    /// failure (typically a missing or stale token) nothing changes.
    pub fn finish_add_to_cart(&mut self, item_id: u64, response: HttpResponse) {
        match self.client.parse_add_to_cart(response) {
            Ok(added) => {
                self.active_cart_id = Some(added.cart_id);
                self.notify(Notice::ItemAdded { item_id });
            }
            Err(_) => self.notify(Notice::LoginRequired),
        }
    }

    pub fn begin_show_cart(&self) -> HttpRequest {
        self.client.build_list_carts()
    }

    /// Flattens every cart's lines into one summary notice.
    pub fn finish_show_cart(&mut self, response: HttpResponse) {
        match self.client.parse_list_carts(response) {
            Ok(carts) => {
                let lines: Vec<CartLine> =
                    carts.into_iter().flat_map(|cart| cart.items).collect();
                self.notify(Notice::CartContents(lines));
            }
            Err(err) => self.notify(Notice::RequestFailed(err.to_string())),
        }
    }

    pub fn begin_show_orders(&self) -> HttpRequest {
        self.client.build_list_orders()
    }

    pub fn finish_show_orders(&mut self, response: HttpResponse) {
        match self.client.parse_list_orders(response) {
            Ok(orders) if orders.is_empty() => self.notify(Notice::NoOrders),
            Ok(orders) => self.notify(Notice::Orders(orders)),
            Err(err) => self.notify(Notice::RequestFailed(err.to_string())),
        }
    }

    /// Returns the order request for the active cart, or `None` when the
    /// action was declined locally — no request is made without an active
    /// cart.
    pub fn begin_checkout(&mut self) -> Option<HttpRequest> {
        let Some(cart_id) = self.active_cart_id else {
            self.notify(Notice::EmptyCart);
            return None;
        };
        match self.client.build_create_order(&CreateOrder { cart_id }) {
            Ok(req) => Some(req),
            Err(err) => {
                self.notify(Notice::RequestFailed(err.to_string()));
                None
            }
        }
    }

    /// On success clears the active cart. On failure the cart is retained so
    /// the user can retry checkout.
    pub fn finish_checkout(&mut self, response: HttpResponse) {
        match self.client.parse_create_order(response) {
            Ok(()) => {
                self.active_cart_id = None;
                self.notify(Notice::OrderPlaced);
            }
            Err(err) => self.notify(Notice::RequestFailed(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpMethod;

    fn session() -> Session {
        Session::new("http://localhost:3000")
    }

    fn logged_in_session() -> Session {
        let mut s = session();
        s.finish_login(HttpResponse::new(200, r#"{"token":"abc"}"#));
        s.drain_notices();
        s
    }

    #[test]
    fn session_starts_unauthenticated_on_login_view() {
        let s = session();
        assert_eq!(s.view(), View::Login);
        assert!(s.auth_token().is_none());
        assert!(s.items().is_empty());
        assert!(s.active_cart_id().is_none());
    }

    #[test]
    fn successful_login_activates_token_and_switches_view() {
        let mut s = session();
        let req = s.begin_login("bob", "pw").unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/users/login");

        let follow_up = s.finish_login(HttpResponse::new(200, r#"{"token":"abc"}"#));
        assert_eq!(s.view(), View::Items);
        assert_eq!(s.auth_token(), Some("abc"));
        assert!(s.drain_notices().is_empty());

        // Entering the items view triggers the fetch, with the token live.
        let follow_up = follow_up.expect("items fetch follows login");
        assert_eq!(follow_up.path, "http://localhost:3000/items");
        assert_eq!(follow_up.header("authorization"), Some("Bearer abc"));
    }

    #[test]
    fn failed_login_keeps_login_view_and_stores_no_token() {
        let mut s = session();
        let follow_up = s.finish_login(HttpResponse::new(401, r#"{"error":"invalid"}"#));
        assert!(follow_up.is_none());
        assert_eq!(s.view(), View::Login);
        assert!(s.auth_token().is_none());
        assert_eq!(s.drain_notices(), vec![Notice::InvalidCredentials]);
    }

    #[test]
    fn fetch_items_replaces_list_on_success() {
        let mut s = logged_in_session();
        s.finish_fetch_items(HttpResponse::new(
            200,
            r#"[{"id":1,"name":"Mug","status":"active"},{"id":2,"name":"Pen","status":"sold_out"}]"#,
        ));
        assert_eq!(s.items().len(), 2);
        assert_eq!(s.items()[1].name, "Pen");
    }

    #[test]
    fn fetch_items_failure_leaves_list_empty_without_notice() {
        let mut s = logged_in_session();
        s.finish_fetch_items(HttpResponse::new(
            200,
            r#"[{"id":1,"name":"Mug","status":"active"}]"#,
        ));
        s.finish_fetch_items(HttpResponse::new(500, "boom"));
        assert!(s.items().is_empty());
        assert!(s.drain_notices().is_empty());
    }

    #[test]
    fn add_to_cart_records_returned_cart_id() {
        let mut s = logged_in_session();
        s.finish_add_to_cart(42, HttpResponse::new(200, r#"{"cart_id":7}"#));
        assert_eq!(s.active_cart_id(), Some(7));
        let notices = s.drain_notices();
        assert_eq!(notices, vec![Notice::ItemAdded { item_id: 42 }]);
        assert_eq!(notices[0].to_string(), "Added item: 42");
    }

    #[test]
    fn add_to_cart_failure_changes_no_state() {
        let mut s = session();
        s.finish_add_to_cart(42, HttpResponse::new(401, r#"{"error":"invalid token"}"#));
        assert!(s.active_cart_id().is_none());
        assert_eq!(s.drain_notices(), vec![Notice::LoginRequired]);
    }

    #[test]
    fn show_cart_flattens_all_carts() {
        let mut s = logged_in_session();
        let body = r#"[
            {"id":1,"items":[{"cart_id":1,"item_id":4},{"cart_id":1,"item_id":5}]},
            {"id":2},
            {"id":3,"items":[{"cart_id":3,"item_id":9}]}
        ]"#;
        s.finish_show_cart(HttpResponse::new(200, body));
        let notices = s.drain_notices();
        match &notices[0] {
            Notice::CartContents(lines) => {
                assert_eq!(lines.len(), 3);
                assert_eq!(lines[2].cart_id, 3);
            }
            other => panic!("expected CartContents, got {other:?}"),
        }
        assert_eq!(
            notices[0].to_string(),
            "Cart items:\nCart: 1 Item: 4\nCart: 1 Item: 5\nCart: 3 Item: 9"
        );
    }

    #[test]
    fn show_orders_empty_notifies_no_orders() {
        let mut s = logged_in_session();
        s.finish_show_orders(HttpResponse::new(200, "[]"));
        let notices = s.drain_notices();
        assert_eq!(notices, vec![Notice::NoOrders]);
        assert_eq!(notices[0].to_string(), "No orders yet");
    }

    #[test]
    fn show_orders_lists_order_ids() {
        let mut s = logged_in_session();
        s.finish_show_orders(HttpResponse::new(200, r#"[{"id":3},{"id":4}]"#));
        let notices = s.drain_notices();
        assert_eq!(notices[0].to_string(), "Order 3\nOrder 4");
    }

    #[test]
    fn show_orders_failure_becomes_notice() {
        let mut s = logged_in_session();
        s.finish_show_orders(HttpResponse::new(500, "boom"));
        assert!(matches!(
            s.drain_notices().as_slice(),
            [Notice::RequestFailed(_)]
        ));
    }

    #[test]
    fn checkout_without_active_cart_makes_no_request() {
        let mut s = logged_in_session();
        assert!(s.begin_checkout().is_none());
        assert_eq!(s.drain_notices(), vec![Notice::EmptyCart]);
    }

    #[test]
    fn checkout_posts_active_cart_and_clears_it_on_success() {
        let mut s = logged_in_session();
        s.finish_add_to_cart(42, HttpResponse::new(200, r#"{"cart_id":7}"#));
        s.drain_notices();

        let req = s.begin_checkout().expect("active cart present");
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/orders");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["cart_id"], 7);

        s.finish_checkout(HttpResponse::new(200, r#"{"message":"order created"}"#));
        assert!(s.active_cart_id().is_none());
        assert_eq!(s.drain_notices(), vec![Notice::OrderPlaced]);
    }

    #[test]
    fn failed_checkout_retains_active_cart() {
        let mut s = logged_in_session();
        s.finish_add_to_cart(42, HttpResponse::new(200, r#"{"cart_id":7}"#));
        s.drain_notices();

        s.finish_checkout(HttpResponse::new(400, r#"{"error":"cart not found or not open"}"#));
        assert_eq!(s.active_cart_id(), Some(7));
        assert!(matches!(
            s.drain_notices().as_slice(),
            [Notice::RequestFailed(_)]
        ));
    }

    #[test]
    fn notices_drain_in_fifo_order() {
        let mut s = logged_in_session();
        s.finish_add_to_cart(1, HttpResponse::new(200, r#"{"cart_id":1}"#));
        s.finish_show_orders(HttpResponse::new(200, "[]"));
        let notices = s.drain_notices();
        assert_eq!(notices[0], Notice::ItemAdded { item_id: 1 });
        assert_eq!(notices[1], Notice::NoOrders);
        assert!(s.drain_notices().is_empty());
    }
}
