//! Operator client for the platform API.
//!
//! Unlike the storefront client there is no response caching here: operator
//! views must reflect upstream state immediately after a relay.

use std::sync::Arc;

use reqwest::{Method, StatusCode, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

use tavola_core::{MealId, OrderId, OrderStatus};

use crate::config::PlatformApiConfig;
use crate::platform::PlatformError;
use crate::platform::types::{
    Credentials, MealInput, OperatorProfile, OperatorSession, PlatformStats, ProviderMeal,
    ProviderOrder, StatusChange,
};

/// Client for the platform's operator endpoints.
#[derive(Clone)]
pub struct OperatorClient {
    inner: Arc<OperatorClientInner>,
}

struct OperatorClientInner {
    client: reqwest::Client,
    base_url: String,
    session_cookie: String,
}

impl OperatorClient {
    /// Create a new operator client.
    ///
    /// # Panics
    ///
    /// Panics if the TLS backend cannot be initialized, which only happens
    /// in broken build environments.
    #[must_use]
    pub fn new(config: &PlatformApiConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("reqwest client with a timeout is always buildable");

        Self {
            inner: Arc::new(OperatorClientInner {
                client,
                base_url: config.base_url.clone(),
                session_cookie: config.session_cookie.clone(),
            }),
        }
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&impl Serialize>,
        token: Option<&str>,
    ) -> Result<reqwest::Response, PlatformError> {
        let url = format!("{}{path}", self.inner.base_url);
        let mut request = self.inner.client.request(method, url);

        if let Some(token) = token {
            request = request.header(
                header::COOKIE,
                format!("{}={token}", self.inner.session_cookie),
            );
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(PlatformError::Unauthorized);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(PlatformError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::error!(
                status = %status,
                body = %message.chars().take(500).collect::<String>(),
                "Platform API returned non-success status"
            );
            return Err(PlatformError::Upstream {
                status: status.as_u16(),
                message: message.chars().take(200).collect(),
            });
        }

        Ok(response)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&impl Serialize>,
        token: &str,
    ) -> Result<T, PlatformError> {
        let response = self.send(method, path, body, Some(token)).await?;
        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %text.chars().take(500).collect::<String>(),
                "Failed to parse platform API response"
            );
            PlatformError::Parse(e)
        })
    }

    fn extract_session_token(&self, response: &reqwest::Response) -> Option<String> {
        response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find_map(|raw| {
                let pair = raw.split(';').next()?;
                let (name, value) = pair.split_once('=')?;
                (name.trim() == self.inner.session_cookie).then(|| value.trim().to_string())
            })
    }

    // =========================================================================
    // Auth Relay
    // =========================================================================

    /// Relay an operator login to the platform.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` on bad credentials or a non-operator account.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<OperatorSession, PlatformError> {
        let body = Credentials { email, password };
        let response = self
            .send(Method::POST, "/operator/auth/login", Some(&body), None)
            .await?;

        let token = self.extract_session_token(&response).ok_or_else(|| {
            PlatformError::MalformedResponse("login response missing session cookie".to_string())
        })?;

        let text = response.text().await?;
        let operator: OperatorProfile = serde_json::from_str(&text)?;

        Ok(OperatorSession { token, operator })
    }

    /// Invalidate the upstream operator session.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn logout(&self, token: &str) -> Result<(), PlatformError> {
        self.send(
            Method::POST,
            "/operator/auth/logout",
            None::<&()>,
            Some(token),
        )
        .await?;
        Ok(())
    }

    // =========================================================================
    // Provider Console
    // =========================================================================

    /// Fetch the provider's own menu.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` if the relayed session has expired.
    #[instrument(skip(self, token))]
    pub async fn list_meals(&self, token: &str) -> Result<Vec<ProviderMeal>, PlatformError> {
        self.execute(Method::GET, "/provider/meals", None::<&()>, token)
            .await
    }

    /// Fetch one of the provider's meals.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the meal does not belong to this provider.
    #[instrument(skip(self, token), fields(meal_id = %meal_id))]
    pub async fn get_meal(
        &self,
        token: &str,
        meal_id: &MealId,
    ) -> Result<ProviderMeal, PlatformError> {
        self.execute(
            Method::GET,
            &format!("/provider/meals/{meal_id}"),
            None::<&()>,
            token,
        )
        .await
    }

    /// Relay a new-meal submission.
    ///
    /// # Errors
    ///
    /// Returns `Upstream` on validation failures.
    #[instrument(skip(self, token, input))]
    pub async fn create_meal(
        &self,
        token: &str,
        input: &MealInput,
    ) -> Result<ProviderMeal, PlatformError> {
        self.execute(Method::POST, "/provider/meals", Some(input), token)
            .await
    }

    /// Relay a meal edit.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Upstream` as reported by the platform.
    #[instrument(skip(self, token, input), fields(meal_id = %meal_id))]
    pub async fn update_meal(
        &self,
        token: &str,
        meal_id: &MealId,
        input: &MealInput,
    ) -> Result<ProviderMeal, PlatformError> {
        self.execute(
            Method::PUT,
            &format!("/provider/meals/{meal_id}"),
            Some(input),
            token,
        )
        .await
    }

    /// Relay a meal deletion.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the meal is already gone.
    #[instrument(skip(self, token), fields(meal_id = %meal_id))]
    pub async fn delete_meal(&self, token: &str, meal_id: &MealId) -> Result<(), PlatformError> {
        self.send(
            Method::DELETE,
            &format!("/provider/meals/{meal_id}"),
            None::<&()>,
            Some(token),
        )
        .await?;
        Ok(())
    }

    /// Fetch the provider's incoming orders.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` if the relayed session has expired.
    #[instrument(skip(self, token))]
    pub async fn list_orders(&self, token: &str) -> Result<Vec<ProviderOrder>, PlatformError> {
        self.execute(Method::GET, "/provider/orders", None::<&()>, token)
            .await
    }

    /// Relay an order status change. The platform enforces which
    /// transitions are legal; the console only displays the outcome.
    ///
    /// # Errors
    ///
    /// Returns `Upstream` if the platform rejects the transition.
    #[instrument(skip(self, token), fields(order_id = %order_id, status = %status))]
    pub async fn update_order_status(
        &self,
        token: &str,
        order_id: &OrderId,
        status: OrderStatus,
    ) -> Result<ProviderOrder, PlatformError> {
        self.execute(
            Method::PUT,
            &format!("/provider/orders/{order_id}/status"),
            Some(&StatusChange { status }),
            token,
        )
        .await
    }

    // =========================================================================
    // Admin Dashboard
    // =========================================================================

    /// Fetch marketplace-wide stats (admin role only; enforced upstream).
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for non-admin sessions.
    #[instrument(skip(self, token))]
    pub async fn stats(&self, token: &str) -> Result<PlatformStats, PlatformError> {
        self.execute(Method::GET, "/admin/stats", None::<&()>, token)
            .await
    }

    /// Fetch the most recent orders across the marketplace (admin role).
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` for non-admin sessions.
    #[instrument(skip(self, token))]
    pub async fn recent_orders(&self, token: &str) -> Result<Vec<ProviderOrder>, PlatformError> {
        self.execute(Method::GET, "/admin/orders/recent", None::<&()>, token)
            .await
    }
}
