//! Platform dashboard route handlers (admin role).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::{RequireOperator, platform_token};
use crate::models::CurrentOperator;
use crate::routes::orders::OrderRow;
use crate::state::AppState;

/// Dashboard stats display data.
#[derive(Clone)]
pub struct StatsView {
    pub total_orders: u64,
    pub total_revenue: String,
    pub active_restaurants: u32,
    pub registered_users: u64,
}

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub operator: CurrentOperator,
    pub stats: StatsView,
    pub recent_orders: Vec<OrderRow>,
}

/// Display the dashboard.
///
/// Providers have no marketplace-wide view; they land on their order queue
/// instead. Stats and recent orders are fetched from the platform verbatim.
#[instrument(skip(state, session, auth))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    auth: RequireOperator,
) -> Result<Response> {
    let operator = auth.0;

    if !operator.is_admin() {
        return Ok(Redirect::to("/orders").into_response());
    }

    let Some(token) = platform_token(&session).await else {
        return Ok(Redirect::to("/auth/login?error=session").into_response());
    };

    let stats = state.platform().stats(&token).await?;
    let recent_orders = state.platform().recent_orders(&token).await?;

    Ok(DashboardTemplate {
        operator,
        stats: StatsView {
            total_orders: stats.total_orders,
            total_revenue: stats.total_revenue.display(),
            active_restaurants: stats.active_restaurants,
            registered_users: stats.registered_users,
        },
        recent_orders: recent_orders.iter().map(OrderRow::from).collect(),
    }
    .into_response())
}
