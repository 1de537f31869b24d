//! Meal detail route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};
use rust_decimal::Decimal;
use tracing::instrument;

use tavola_core::MealId;

use crate::error::Result;
use crate::filters;
use crate::platform::Meal;
use crate::state::AppState;

/// Meal detail display data for templates.
#[derive(Clone)]
pub struct MealDetailView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub restaurant_id: String,
    pub restaurant_name: Option<String>,
}

/// Format an exact decimal amount as a display price string.
fn format_price(amount: Decimal) -> String {
    format!("${amount:.2}")
}

impl From<&Meal> for MealDetailView {
    fn from(meal: &Meal) -> Self {
        Self {
            id: meal.id.to_string(),
            name: meal.name.clone(),
            description: meal.description.clone(),
            price: format_price(meal.price),
            image_url: meal.image_url.clone(),
            category: meal.category.clone(),
            restaurant_id: meal.restaurant_id.to_string(),
            restaurant_name: meal.restaurant_name.clone(),
        }
    }
}

/// Meal detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "meals/show.html")]
pub struct MealShowTemplate {
    pub meal: MealDetailView,
}

/// Display a meal's detail page.
///
/// The quantity picker here posts one batched add-to-cart call for however
/// many units the shopper chose - a single cart write and one confirmation,
/// not one per unit.
#[instrument(skip(state), fields(meal_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let meal = state.platform().get_meal(&MealId::new(id)).await?;

    Ok(MealShowTemplate {
        meal: MealDetailView::from(&meal),
    })
}
