//! Cart route handlers.
//!
//! The cart slide-over and page use HTMX fragments for updates without full
//! page reloads. The cart record itself lives in the shopper's session via
//! [`CartStore`]; these handlers are the presentation surface over it.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{AppendHeaders, Html, IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use tavola_core::cart::{Cart, CartLine, MealSnapshot};
use tavola_core::types::MealId;

use crate::filters;
use crate::services::CartStore;
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartLineView {
    pub meal_id: String,
    pub name: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_price: String,
    pub image_url: Option<String>,
    pub restaurant_name: Option<String>,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub subtotal: String,
    pub item_count: u32,
    /// Distinct sellers in the cart; more than one blocks checkout.
    pub restaurant_count: usize,
}

// =============================================================================
// Type Conversions
// =============================================================================

/// Format an exact decimal amount as a display price string.
fn format_price(amount: Decimal) -> String {
    format!("${amount:.2}")
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.lines().iter().map(CartLineView::from).collect(),
            subtotal: format_price(cart.total_price()),
            item_count: cart.total_items(),
            restaurant_count: cart.restaurant_ids().len(),
        }
    }
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            meal_id: line.meal_id.to_string(),
            name: line.name.clone(),
            quantity: line.quantity,
            unit_price: format_price(line.unit_price),
            line_price: format_price(line.line_price()),
            image_url: line.image_url.clone(),
            restaurant_name: line.restaurant_name.clone(),
        }
    }
}

// =============================================================================
// Form and Query Types
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub meal_id: String,
    /// Units to add in this call; detail pages post the whole batch at once.
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub meal_id: String,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub meal_id: String,
}

/// Cart page query parameters.
#[derive(Debug, Deserialize)]
pub struct CartQuery {
    /// Notice code set by redirects from the checkout gate.
    pub notice: Option<String>,
}

/// Map a notice code from a redirect into shopper-facing copy.
fn notice_message(code: &str) -> Option<&'static str> {
    match code {
        "multi_restaurant" => Some(
            "Your cart has items from more than one restaurant. \
             Remove items until only one restaurant remains, then try again.",
        ),
        "order_failed" => Some("We couldn't place your order. Your cart is unchanged - please try again."),
        _ => None,
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub cart: CartView,
    pub notice: Option<&'static str>,
    pub nonce: String,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
#[instrument(skip(session, nonce))]
pub async fn show(
    session: Session,
    Query(query): Query<CartQuery>,
    crate::middleware::CspNonce(nonce): crate::middleware::CspNonce,
) -> impl IntoResponse {
    let cart = CartStore::from_session(&session).current().await;

    CartShowTemplate {
        cart: CartView::from(&cart),
        notice: query.notice.as_deref().and_then(notice_message),
        nonce,
    }
}

/// Add a meal to the cart (HTMX).
///
/// The call site supplies only the meal ID; the snapshot handed to the cart
/// (name, price, seller) is built here from the fetched catalog record, so
/// the price captured is the one the shopper saw. Adding never rejects a
/// restaurant mismatch - that is the checkout gate's job.
///
/// Returns the count badge with an HTMX trigger so the rest of the page can
/// refresh; the trigger fires once per batch, not once per unit.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Response {
    let meal_id = MealId::new(form.meal_id);
    let quantity = form.quantity.unwrap_or(1).max(1);

    let meal = match state.platform().get_meal(&meal_id).await {
        Ok(meal) => meal,
        Err(e) => {
            tracing::error!("Failed to fetch meal {meal_id} for add-to-cart: {e}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html("<span class=\"error\">Error adding to cart</span>"),
            )
                .into_response();
        }
    };

    let cart = CartStore::from_session(&session)
        .add(MealSnapshot::from(&meal), quantity)
        .await;

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate {
            count: cart.total_items(),
        },
    )
        .into_response()
}

/// Update a cart line's quantity (HTMX).
///
/// A quantity of zero removes the line; the cart never keeps a zero-quantity
/// entry.
#[instrument(skip(session))]
pub async fn update(session: Session, Form(form): Form<UpdateCartForm>) -> impl IntoResponse {
    let cart = CartStore::from_session(&session)
        .set_quantity(&MealId::new(form.meal_id), form.quantity)
        .await;

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from(&cart),
        },
    )
}

/// Remove a line from the cart (HTMX).
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<RemoveFromCartForm>) -> impl IntoResponse {
    let cart = CartStore::from_session(&session)
        .remove(&MealId::new(form.meal_id))
        .await;

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from(&cart),
        },
    )
}

/// Empty the cart (HTMX).
#[instrument(skip(session))]
pub async fn clear(session: Session) -> impl IntoResponse {
    let cart = CartStore::from_session(&session).clear().await;

    (
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: CartView::from(&cart),
        },
    )
}

/// Get cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> impl IntoResponse {
    let cart = CartStore::from_session(&session).current().await;

    CartCountTemplate {
        count: cart.total_items(),
    }
}
