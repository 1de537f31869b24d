//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::filters;
use crate::routes::restaurants::RestaurantView;
use crate::state::AppState;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    /// Featured restaurants, curated upstream.
    pub featured: Vec<RestaurantView>,
}

/// Display the home page.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    let featured = state.platform().featured_restaurants().await.map_or_else(
        |e| {
            tracing::error!("Failed to fetch featured restaurants: {e}");
            Vec::new()
        },
        |restaurants| restaurants.iter().map(RestaurantView::from).collect(),
    );

    HomeTemplate { featured }
}
