//! Operator authentication route handlers.
//!
//! Credentials are relayed to the platform; nothing is verified or stored
//! locally beyond the session copy of the profile and upstream token.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::middleware::{clear_current_operator, platform_token, set_current_operator};
use crate::models::CurrentOperator;
use crate::platform::PlatformError;
use crate::state::AppState;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Query parameters for error display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
}

/// Display the login page.
pub async fn login_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    let error = query.error.map(|code| match code.as_str() {
        "invalid" => "Invalid email or password.".to_string(),
        "session" => "Your session expired, please sign in again.".to_string(),
        _ => "Something went wrong, please try again.".to_string(),
    });

    LoginTemplate { error }
}

/// Handle operator login by relaying credentials to the platform.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    match state.platform().login(&form.email, &form.password).await {
        Ok(operator_session) => {
            let operator = CurrentOperator::from(operator_session.operator);
            if let Err(e) =
                set_current_operator(&session, &operator, &operator_session.token).await
            {
                tracing::error!("Failed to store operator login in session: {e}");
                return Redirect::to("/auth/login?error=session").into_response();
            }
            Redirect::to("/").into_response()
        }
        Err(PlatformError::Unauthorized) => {
            Redirect::to("/auth/login?error=invalid").into_response()
        }
        Err(e) => {
            tracing::error!("Operator login relay failed: {e}");
            Redirect::to("/auth/login?error=upstream").into_response()
        }
    }
}

/// Handle operator logout.
#[instrument(skip(state, session))]
pub async fn logout(State(state): State<AppState>, session: Session) -> Response {
    if let Some(token) = platform_token(&session).await {
        if let Err(e) = state.platform().logout(&token).await {
            tracing::warn!("Upstream operator logout failed: {e}");
        }
    }

    if let Err(e) = clear_current_operator(&session).await {
        tracing::error!("Failed to clear operator session: {e}");
    }

    Redirect::to("/auth/login").into_response()
}
