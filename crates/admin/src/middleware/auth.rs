//! Operator authentication extractors.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentOperator, session_keys};

/// Extractor that requires a logged-in operator.
///
/// Redirects to the login page when no operator session exists.
pub struct RequireOperator(pub CurrentOperator);

/// Rejection for unauthenticated console requests.
pub enum AuthRejection {
    RedirectToLogin,
    Unauthorized,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/auth/login").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireOperator
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AuthRejection::Unauthorized)?;

        let operator: CurrentOperator = session
            .get(session_keys::CURRENT_OPERATOR)
            .await
            .ok()
            .flatten()
            .ok_or(AuthRejection::RedirectToLogin)?;

        Ok(Self(operator))
    }
}

/// Store the operator identity and relayed platform token after login.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_operator(
    session: &Session,
    operator: &CurrentOperator,
    platform_token: &str,
) -> Result<(), tower_sessions::session::Error> {
    session
        .insert(session_keys::CURRENT_OPERATOR, operator)
        .await?;
    session
        .insert(session_keys::PLATFORM_TOKEN, platform_token)
        .await
}

/// Clear the operator session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_operator(
    session: &Session,
) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentOperator>(session_keys::CURRENT_OPERATOR)
        .await?;
    session
        .remove::<String>(session_keys::PLATFORM_TOKEN)
        .await?;
    Ok(())
}

/// Fetch the relayed platform session token, if an operator is logged in.
pub async fn platform_token(session: &Session) -> Option<String> {
    session
        .get::<String>(session_keys::PLATFORM_TOKEN)
        .await
        .ok()
        .flatten()
}
