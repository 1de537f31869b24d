//! Menu management route handlers (provider role).
//!
//! All writes are relayed to the platform; validation and ownership checks
//! happen upstream.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use tavola_core::MealId;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{RequireOperator, platform_token};
use crate::models::CurrentOperator;
use crate::platform::{MealInput, ProviderMeal};
use crate::state::AppState;

/// Meal display data for the menu table.
#[derive(Clone)]
pub struct MealRow {
    pub id: String,
    pub name: String,
    pub price: String,
    pub category: String,
    pub available: bool,
}

impl From<&ProviderMeal> for MealRow {
    fn from(meal: &ProviderMeal) -> Self {
        Self {
            id: meal.id.to_string(),
            name: meal.name.clone(),
            price: format!("${:.2}", meal.price),
            category: meal.category.clone().unwrap_or_default(),
            available: meal.available,
        }
    }
}

/// Meal form data (create and edit share the shape).
#[derive(Debug, Deserialize)]
pub struct MealForm {
    pub name: String,
    pub description: String,
    pub price: String,
    pub image_url: Option<String>,
    pub category: Option<String>,
    /// Checkbox; present when checked.
    pub available: Option<String>,
}

impl MealForm {
    /// Convert the posted form into the relay payload.
    ///
    /// The only local parsing is the price string; everything else is
    /// passed through for the platform to validate.
    fn into_input(self) -> Result<MealInput> {
        let price = self
            .price
            .trim()
            .trim_start_matches('$')
            .parse::<Decimal>()
            .map_err(|_| AppError::BadRequest(format!("invalid price: {}", self.price)))?;

        Ok(MealInput {
            name: self.name,
            description: self.description,
            price,
            image_url: self.image_url.filter(|u| !u.trim().is_empty()),
            category: self.category.filter(|c| !c.trim().is_empty()),
            available: self.available.is_some(),
        })
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Menu listing template.
#[derive(Template, WebTemplate)]
#[template(path = "meals/index.html")]
pub struct MealsIndexTemplate {
    pub operator: CurrentOperator,
    pub meals: Vec<MealRow>,
}

/// Meal form template (shared by create and edit).
#[derive(Template, WebTemplate)]
#[template(path = "meals/form.html")]
pub struct MealFormTemplate {
    pub operator: CurrentOperator,
    pub heading: String,
    pub action: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub image_url: String,
    pub category: String,
    pub available: bool,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the provider's menu.
#[instrument(skip(state, session, auth))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    auth: RequireOperator,
) -> Result<Response> {
    let Some(token) = platform_token(&session).await else {
        return Ok(Redirect::to("/auth/login?error=session").into_response());
    };

    let meals = state.platform().list_meals(&token).await?;

    Ok(MealsIndexTemplate {
        operator: auth.0,
        meals: meals.iter().map(MealRow::from).collect(),
    }
    .into_response())
}

/// Display the new-meal form.
#[instrument(skip(auth))]
pub async fn new_form(auth: RequireOperator) -> impl IntoResponse {
    MealFormTemplate {
        operator: auth.0,
        heading: "Add a meal".to_string(),
        action: "/meals".to_string(),
        name: String::new(),
        description: String::new(),
        price: String::new(),
        image_url: String::new(),
        category: String::new(),
        available: true,
    }
}

/// Relay meal creation to the platform.
#[instrument(skip(state, session, _auth, form))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    _auth: RequireOperator,
    Form(form): Form<MealForm>,
) -> Result<Response> {
    let Some(token) = platform_token(&session).await else {
        return Ok(Redirect::to("/auth/login?error=session").into_response());
    };

    let input = form.into_input()?;
    state.platform().create_meal(&token, &input).await?;

    Ok(Redirect::to("/meals").into_response())
}

/// Display the edit form, prefilled from the platform's copy.
#[instrument(skip(state, session, auth), fields(meal_id = %id))]
pub async fn edit_form(
    State(state): State<AppState>,
    session: Session,
    auth: RequireOperator,
    Path(id): Path<String>,
) -> Result<Response> {
    let Some(token) = platform_token(&session).await else {
        return Ok(Redirect::to("/auth/login?error=session").into_response());
    };

    let meal_id = MealId::new(id);
    let meal = state.platform().get_meal(&token, &meal_id).await?;

    Ok(MealFormTemplate {
        operator: auth.0,
        heading: format!("Edit {}", meal.name),
        action: format!("/meals/{meal_id}"),
        name: meal.name,
        description: meal.description,
        price: format!("{:.2}", meal.price),
        image_url: meal.image_url.unwrap_or_default(),
        category: meal.category.unwrap_or_default(),
        available: meal.available,
    }
    .into_response())
}

/// Relay a meal update to the platform.
#[instrument(skip(state, session, _auth, form), fields(meal_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    _auth: RequireOperator,
    Path(id): Path<String>,
    Form(form): Form<MealForm>,
) -> Result<Response> {
    let Some(token) = platform_token(&session).await else {
        return Ok(Redirect::to("/auth/login?error=session").into_response());
    };

    let input = form.into_input()?;
    state
        .platform()
        .update_meal(&token, &MealId::new(id), &input)
        .await?;

    Ok(Redirect::to("/meals").into_response())
}

/// Relay a meal deletion to the platform.
#[instrument(skip(state, session, _auth), fields(meal_id = %id))]
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    _auth: RequireOperator,
    Path(id): Path<String>,
) -> Result<Response> {
    let Some(token) = platform_token(&session).await else {
        return Ok(Redirect::to("/auth/login?error=session").into_response());
    };

    state
        .platform()
        .delete_meal(&token, &MealId::new(id))
        .await?;

    Ok(Redirect::to("/meals").into_response())
}
