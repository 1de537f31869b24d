//! Order queue route handlers.
//!
//! Status changes are relayed to the platform, which owns transition
//! legality. The console never reasons about the order workflow.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use tavola_core::{OrderId, OrderStatus};

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{RequireOperator, platform_token};
use crate::models::CurrentOperator;
use crate::platform::ProviderOrder;
use crate::state::AppState;

/// Order display data for console tables.
#[derive(Clone)]
pub struct OrderRow {
    pub id: String,
    pub customer_name: String,
    pub summary: String,
    pub total: String,
    pub status: String,
    pub status_value: String,
    pub placed_at: String,
}

impl From<&ProviderOrder> for OrderRow {
    fn from(order: &ProviderOrder) -> Self {
        let summary = order
            .items
            .iter()
            .map(|item| format!("{} x {}", item.quantity, item.name))
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            id: order.id.to_string(),
            customer_name: order
                .customer_name
                .clone()
                .unwrap_or_else(|| "Guest".to_string()),
            summary,
            total: order.total.display(),
            status: order.status.label().to_string(),
            status_value: serde_json::to_string(&order.status)
                .map(|s| s.trim_matches('"').to_string())
                .unwrap_or_default(),
            placed_at: order.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Status options offered in the console dropdown. The platform rejects
/// illegal transitions; this list is just the full vocabulary.
pub const STATUS_OPTIONS: &[(&str, &str)] = &[
    ("accepted", "Accepted"),
    ("preparing", "Preparing"),
    ("out_for_delivery", "Out for delivery"),
    ("delivered", "Delivered"),
    ("cancelled", "Cancelled"),
];

/// Status change form data.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
}

/// Order queue template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersTemplate {
    pub operator: CurrentOperator,
    pub orders: Vec<OrderRow>,
    pub status_options: &'static [(&'static str, &'static str)],
}

/// Display the order queue.
///
/// Providers see their incoming orders; admins see the marketplace-wide
/// recent list (read-only upstream for them).
#[instrument(skip(state, session, auth))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    auth: RequireOperator,
) -> Result<Response> {
    let operator = auth.0;

    let Some(token) = platform_token(&session).await else {
        return Ok(Redirect::to("/auth/login?error=session").into_response());
    };

    let orders = if operator.is_admin() {
        state.platform().recent_orders(&token).await?
    } else {
        state.platform().list_orders(&token).await?
    };

    Ok(OrdersTemplate {
        operator,
        orders: orders.iter().map(OrderRow::from).collect(),
        status_options: STATUS_OPTIONS,
    }
    .into_response())
}

/// Relay an order status change to the platform.
#[instrument(skip(state, session, _auth))]
pub async fn update_status(
    State(state): State<AppState>,
    session: Session,
    _auth: RequireOperator,
    Path(id): Path<String>,
    Form(form): Form<StatusForm>,
) -> Result<Response> {
    let Some(token) = platform_token(&session).await else {
        return Ok(Redirect::to("/auth/login?error=session").into_response());
    };

    let status = form
        .status
        .parse::<OrderStatus>()
        .map_err(AppError::BadRequest)?;

    state
        .platform()
        .update_order_status(&token, &OrderId::new(id), status)
        .await?;

    Ok(Redirect::to("/orders").into_response())
}
