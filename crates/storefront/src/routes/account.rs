//! Account route handlers (require auth).
//!
//! Order history and profile are display-only relays: statuses and totals
//! come from the platform verbatim and no workflow logic runs here.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::middleware::{RequireAuth, platform_token};
use crate::models::CurrentUser;
use crate::platform::{Order, PlatformError};
use crate::state::AppState;

/// Order display data for templates.
#[derive(Clone)]
pub struct OrderView {
    pub id: String,
    pub restaurant_name: String,
    pub status: String,
    pub total: String,
    pub placed_at: String,
    pub items: Vec<OrderItemView>,
}

/// Order line display data for templates.
#[derive(Clone)]
pub struct OrderItemView {
    pub name: String,
    pub quantity: u32,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.to_string(),
            restaurant_name: order
                .restaurant_name
                .clone()
                .unwrap_or_else(|| order.restaurant_id.to_string()),
            status: order.status.label().to_string(),
            total: order.total.display(),
            placed_at: order.created_at.format("%B %-d, %Y %H:%M").to_string(),
            items: order
                .items
                .iter()
                .map(|item| OrderItemView {
                    name: item.name.clone(),
                    quantity: item.quantity,
                })
                .collect(),
        }
    }
}

/// Query parameters for the order history page.
#[derive(Debug, Deserialize)]
pub struct OrdersQuery {
    /// Order ID just placed by the checkout flow, for the success banner.
    pub placed: Option<String>,
}

/// Account overview template.
#[derive(Template, WebTemplate)]
#[template(path = "account/index.html")]
pub struct AccountTemplate {
    pub user: CurrentUser,
}

/// Order history template.
#[derive(Template, WebTemplate)]
#[template(path = "account/orders.html")]
pub struct OrdersTemplate {
    pub orders: Vec<OrderView>,
    pub placed: Option<String>,
}

/// Display the account overview.
#[instrument(skip(auth))]
pub async fn index(auth: RequireAuth) -> impl IntoResponse {
    AccountTemplate { user: auth.0 }
}

/// Display the shopper's order history.
#[instrument(skip(state, session, _auth))]
pub async fn orders(
    State(state): State<AppState>,
    session: Session,
    _auth: RequireAuth,
    Query(query): Query<OrdersQuery>,
) -> Response {
    let Some(token) = platform_token(&session).await else {
        return Redirect::to("/auth/login?next=/account/orders").into_response();
    };

    match state.platform().list_orders(&token).await {
        Ok(orders) => OrdersTemplate {
            orders: orders.iter().map(OrderView::from).collect(),
            placed: query.placed,
        }
        .into_response(),
        Err(PlatformError::Unauthorized) => {
            // Upstream session expired; the local copy is stale
            Redirect::to("/auth/login?next=/account/orders").into_response()
        }
        Err(e) => {
            tracing::error!("Failed to fetch order history: {e}");
            OrdersTemplate {
                orders: Vec::new(),
                placed: query.placed,
            }
            .into_response()
        }
    }
}
