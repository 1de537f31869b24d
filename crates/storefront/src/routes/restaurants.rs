//! Restaurant catalog route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use tavola_core::RestaurantId;

use crate::error::Result;
use crate::filters;
use crate::platform::{Meal, Restaurant, Review};
use crate::state::AppState;

/// Restaurant display data for templates.
#[derive(Clone)]
pub struct RestaurantView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
    pub cuisine: Option<String>,
    pub rating: Option<String>,
    pub review_count: u32,
}

/// Meal card display data for templates.
#[derive(Clone)]
pub struct MealView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub image_url: Option<String>,
    pub category: Option<String>,
}

/// Review display data for templates.
#[derive(Clone)]
pub struct ReviewView {
    pub author_name: String,
    pub rating: String,
    pub comment: String,
    pub date: String,
}

// =============================================================================
// Type Conversions
// =============================================================================

/// Format an exact decimal amount as a display price string.
fn format_price(amount: Decimal) -> String {
    format!("${amount:.2}")
}

impl From<&Restaurant> for RestaurantView {
    fn from(restaurant: &Restaurant) -> Self {
        Self {
            id: restaurant.id.to_string(),
            name: restaurant.name.clone(),
            description: restaurant.description.clone(),
            image_url: restaurant.image_url.clone(),
            cuisine: restaurant.cuisine.clone(),
            rating: restaurant.average_rating.map(|r| format!("{r:.1}")),
            review_count: restaurant.review_count,
        }
    }
}

impl From<&Meal> for MealView {
    fn from(meal: &Meal) -> Self {
        Self {
            id: meal.id.to_string(),
            name: meal.name.clone(),
            description: meal.description.clone(),
            price: format_price(meal.price),
            image_url: meal.image_url.clone(),
            category: meal.category.clone(),
        }
    }
}

impl From<&Review> for ReviewView {
    fn from(review: &Review) -> Self {
        Self {
            author_name: review.author_name.clone(),
            rating: review.rating.to_string(),
            comment: review.comment.clone(),
            date: review.created_at.format("%B %-d, %Y").to_string(),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

/// Restaurant listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "restaurants/index.html")]
pub struct RestaurantsIndexTemplate {
    pub restaurants: Vec<RestaurantView>,
    pub total: u64,
    pub query: Option<String>,
}

/// Restaurant detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "restaurants/show.html")]
pub struct RestaurantShowTemplate {
    pub restaurant: RestaurantView,
    pub meals: Vec<MealView>,
    pub reviews: Vec<ReviewView>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the restaurant listing, optionally filtered by a search query.
///
/// The search itself happens upstream; the query string is relayed verbatim.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse> {
    let search = query.q.as_deref().filter(|q| !q.trim().is_empty());
    let list = state.platform().list_restaurants(search).await?;

    Ok(RestaurantsIndexTemplate {
        restaurants: list.restaurants.iter().map(RestaurantView::from).collect(),
        total: list.total,
        query: search.map(str::to_owned),
    })
}

/// Display a restaurant's detail page: menu plus aggregated reviews.
#[instrument(skip(state), fields(restaurant_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let restaurant_id = RestaurantId::new(id);

    let restaurant = state.platform().get_restaurant(&restaurant_id).await?;
    let meals = state.platform().list_meals(&restaurant_id).await?;

    // Reviews are decoration; a failed fetch should not take the page down
    let reviews = state
        .platform()
        .list_reviews(&restaurant_id)
        .await
        .map_or_else(
            |e| {
                tracing::warn!("Failed to fetch reviews for {restaurant_id}: {e}");
                Vec::new()
            },
            |reviews| reviews.iter().map(ReviewView::from).collect(),
        );

    Ok(RestaurantShowTemplate {
        restaurant: RestaurantView::from(&restaurant),
        meals: meals.iter().map(MealView::from).collect(),
        reviews,
    })
}
