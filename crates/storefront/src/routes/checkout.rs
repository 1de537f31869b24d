//! Checkout route handlers.
//!
//! The checkout surface is the collaborator the cart hands off to: it runs
//! the checkout gate, renders the summary from live cart state, relays the
//! order to the platform, and clears the cart only after the platform
//! confirms. There is deliberately no protection against the cart changing
//! between page load and submission - the gate re-runs on submit and the
//! platform revalidates the payload.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use tavola_core::cart::{CheckoutBlock, checkout_gate};

use crate::filters;
use crate::middleware::{OptionalAuth, platform_token};
use crate::platform::{CreateOrderRequest, PlatformError};
use crate::routes::cart::CartView;
use crate::services::CartStore;
use crate::state::AppState;

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout/show.html")]
pub struct CheckoutTemplate {
    pub cart: CartView,
    pub restaurant_name: String,
}

/// Translate a gate block into the redirect the surface performs.
///
/// The cart is left untouched on every path; the shopper resolves blocks
/// manually.
fn blocked_response(block: &CheckoutBlock) -> Response {
    match block {
        CheckoutBlock::NotAuthenticated => {
            Redirect::to("/auth/login?next=/checkout").into_response()
        }
        // Silent abort back to the cart page
        CheckoutBlock::EmptyCart => Redirect::to("/cart").into_response(),
        CheckoutBlock::MultipleRestaurants(_) => {
            Redirect::to("/cart?notice=multi_restaurant").into_response()
        }
    }
}

/// Display the checkout summary, gated on the cart's current state.
#[instrument(skip(state, session, auth))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    auth: OptionalAuth,
) -> Response {
    let cart = CartStore::from_session(&session).current().await;

    let restaurant_id = match checkout_gate(&cart, auth.0.is_some()) {
        Ok(id) => id.clone(),
        Err(block) => return blocked_response(&block),
    };

    // Prefer the live catalog name; fall back to the add-time snapshot
    let restaurant_name = match state.platform().get_restaurant(&restaurant_id).await {
        Ok(restaurant) => restaurant.name,
        Err(e) => {
            tracing::warn!("Falling back to snapshot name for checkout header: {e}");
            cart.lines()
                .iter()
                .find_map(|line| line.restaurant_name.clone())
                .unwrap_or_else(|| restaurant_id.to_string())
        }
    };

    CheckoutTemplate {
        cart: CartView::from(&cart),
        restaurant_name,
    }
    .into_response()
}

/// Submit the order to the platform.
///
/// Re-runs the gate against the cart as it exists now, relays the order
/// payload (snapshotted prices included; the platform owns final pricing),
/// and clears the cart only on upstream success.
#[instrument(skip(state, session, auth))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    auth: OptionalAuth,
) -> Response {
    let store = CartStore::from_session(&session);
    let cart = store.current().await;

    let restaurant_id = match checkout_gate(&cart, auth.0.is_some()) {
        Ok(id) => id.clone(),
        Err(block) => return blocked_response(&block),
    };

    let Some(token) = platform_token(&session).await else {
        // Identity present but the relayed token is gone; re-authenticate
        return Redirect::to("/auth/login?next=/checkout").into_response();
    };

    let request = CreateOrderRequest::from_cart(restaurant_id, &cart);

    match state.platform().create_order(&token, request).await {
        Ok(order) => {
            // The cart is spent once the platform confirms the order
            store.clear().await;
            Redirect::to(&format!("/account/orders?placed={}", order.id)).into_response()
        }
        Err(PlatformError::Unauthorized) => {
            Redirect::to("/auth/login?next=/checkout").into_response()
        }
        Err(e) => {
            tracing::error!("Order submission failed: {e}");
            Redirect::to("/cart?notice=order_failed").into_response()
        }
    }
}
