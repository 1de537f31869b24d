//! Authentication route handlers.
//!
//! Authentication is owned by the platform API; these handlers relay
//! credentials upstream and keep the resulting session token plus a display
//! copy of the profile in the local session. No credentials are stored or
//! verified here.

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
use crate::middleware::{clear_current_user, platform_token, set_current_user};
use crate::models::CurrentUser;
use crate::platform::PlatformError;
use crate::state::AppState;

// =============================================================================
// Form and Query Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub next: Option<String>,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub name: Option<String>,
}

/// Query parameters for error display and post-login destination.
#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    pub error: Option<String>,
    pub next: Option<String>,
}

/// Query parameters for error display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
}

/// Only allow same-site redirect targets after login.
fn sanitize_next(next: Option<String>) -> String {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path,
        _ => "/account".to_string(),
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub next: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub error: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the login page.
pub async fn login_page(Query(query): Query<LoginQuery>) -> impl IntoResponse {
    LoginTemplate {
        error: query.error.as_deref().map(error_message),
        next: query.next,
    }
}

/// Handle login form submission by relaying credentials to the platform.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    match state.platform().login(&form.email, &form.password).await {
        Ok(platform_session) => {
            let user = CurrentUser::from(platform_session.user);
            if let Err(e) = set_current_user(&session, &user, &platform_session.token).await {
                tracing::error!("Failed to store login in session: {e}");
                return Redirect::to("/auth/login?error=session").into_response();
            }
            Redirect::to(&sanitize_next(form.next)).into_response()
        }
        Err(PlatformError::Unauthorized) => {
            Redirect::to("/auth/login?error=invalid").into_response()
        }
        Err(e) => {
            tracing::error!("Login relay failed: {e}");
            Redirect::to("/auth/login?error=upstream").into_response()
        }
    }
}

/// Display the registration page.
pub async fn register_page(Query(query): Query<MessageQuery>) -> impl IntoResponse {
    RegisterTemplate {
        error: query.error.as_deref().map(error_message),
    }
}

/// Handle registration form submission by relaying it to the platform.
///
/// The only local validation is the password confirmation; everything else
/// (email uniqueness, password policy) is enforced upstream.
#[instrument(skip(state, session, form))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Response {
    if form.password != form.password_confirm {
        return Redirect::to("/auth/register?error=mismatch").into_response();
    }

    let name = form.name.as_deref().filter(|n| !n.trim().is_empty());

    match state
        .platform()
        .register(&form.email, &form.password, name)
        .await
    {
        Ok(platform_session) => {
            let user = CurrentUser::from(platform_session.user);
            if let Err(e) = set_current_user(&session, &user, &platform_session.token).await {
                tracing::error!("Failed to store registration in session: {e}");
                return Redirect::to("/auth/login?error=session").into_response();
            }
            Redirect::to("/account").into_response()
        }
        Err(PlatformError::Upstream { status: 409, .. }) => {
            Redirect::to("/auth/register?error=taken").into_response()
        }
        Err(e) => {
            tracing::error!("Registration relay failed: {e}");
            Redirect::to("/auth/register?error=upstream").into_response()
        }
    }
}

/// Handle logout: invalidate the upstream session, then the local one.
///
/// The cart record survives logout; signing out does not empty a cart.
#[instrument(skip(state, session))]
pub async fn logout(State(state): State<AppState>, session: Session) -> Response {
    if let Some(token) = platform_token(&session).await {
        // Best effort - a dead upstream session is already logged out
        if let Err(e) = state.platform().logout(&token).await {
            tracing::warn!("Upstream logout failed: {e}");
        }
    }

    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session on logout: {e}");
    }

    Redirect::to("/").into_response()
}

/// Map an error code from a redirect into shopper-facing copy.
fn error_message(code: &str) -> String {
    match code {
        "invalid" => "Invalid email or password.".to_string(),
        "mismatch" => "Passwords do not match.".to_string(),
        "taken" => "An account with this email already exists.".to_string(),
        "session" => "Your session expired, please try again.".to_string(),
        _ => "Something went wrong, please try again.".to_string(),
    }
}
