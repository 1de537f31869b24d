//! Platform API client implementation.
//!
//! Plain HTTP/JSON over `reqwest` 0.13. Catalog reads are cached with
//! `moka` (5-minute TTL); authenticated calls relay the shopper's upstream
//! session cookie and are never cached.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::{Method, StatusCode, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use tavola_core::{MealId, RestaurantId};

use crate::config::PlatformApiConfig;
use crate::platform::PlatformError;
use crate::platform::cache::CacheValue;
use crate::platform::types::{
    CreateOrderRequest, Credentials, Meal, Order, PlatformSession, Registration, Restaurant,
    RestaurantList, Review, UserProfile,
};

/// Catalog cache TTL.
const CACHE_TTL: Duration = Duration::from_secs(300);

/// Client for the Tavola platform API.
///
/// Provides typed access to the catalog, auth relay, and order endpoints.
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct PlatformClient {
    inner: Arc<PlatformClientInner>,
}

struct PlatformClientInner {
    client: reqwest::Client,
    base_url: String,
    session_cookie: String,
    cache: Cache<String, CacheValue>,
}

impl PlatformClient {
    /// Create a new platform API client.
    ///
    /// # Panics
    ///
    /// Panics if the TLS backend cannot be initialized, which only happens
    /// in broken build environments.
    #[must_use]
    pub fn new(config: &PlatformApiConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(CACHE_TTL)
            .build();

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("reqwest client with a timeout is always buildable");

        Self {
            inner: Arc::new(PlatformClientInner {
                client,
                base_url: config.base_url.clone(),
                session_cookie: config.session_cookie.clone(),
                cache,
            }),
        }
    }

    /// Send a request and parse the JSON response body.
    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&impl Serialize>,
        token: Option<&str>,
    ) -> Result<T, PlatformError> {
        let response = self.send(method, path, body, token).await?;
        let response = Self::check_status(response, path).await?;
        Self::parse_body(response).await
    }

    /// Send a request, returning the raw response for callers that need
    /// headers (login/register read the upstream session cookie).
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
            // Cookie-based upstream auth: relay the shopper's session
            request = request.header(
                header::COOKIE,
                format!("{}={token}", self.inner.session_cookie),
            );
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        Ok(request.send().await?)
    }

    /// Map non-success statuses to the error taxonomy.
    async fn check_status(
        response: reqwest::Response,
        path: &str,
    ) -> Result<reqwest::Response, PlatformError> {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(PlatformError::RateLimited(retry_after));
        }

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

    /// Parse a JSON body, logging the raw payload on failure.
    async fn parse_body<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, PlatformError> {
        // Read as text first for better error diagnostics
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

    /// Extract the upstream session cookie value from a login/register
    /// response.
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
    // Catalog Methods (cached)
    // =========================================================================

    /// Get the restaurant listing, optionally filtered by a search query.
    ///
    /// Results without a query are cached; search results are not.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_restaurants(
        &self,
        query: Option<&str>,
    ) -> Result<RestaurantList, PlatformError> {
        let cache_key = "restaurants".to_string();

        if query.is_none()
            && let Some(CacheValue::Restaurants(restaurants)) =
                self.inner.cache.get(&cache_key).await
        {
            debug!("Cache hit for restaurant listing");
            let total = restaurants.len() as u64;
            return Ok(RestaurantList { restaurants, total });
        }

        let path = query.map_or_else(
            || "/restaurants".to_string(),
            |q| format!("/restaurants?q={}", urlencoding::encode(q)),
        );

        let list: RestaurantList = self
            .execute(Method::GET, &path, None::<&()>, None)
            .await?;

        if query.is_none() {
            self.inner
                .cache
                .insert(cache_key, CacheValue::Restaurants(list.restaurants.clone()))
                .await;
        }

        Ok(list)
    }

    /// Get the featured restaurants shown on the home page.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn featured_restaurants(&self) -> Result<Vec<Restaurant>, PlatformError> {
        let cache_key = "restaurants:featured".to_string();

        if let Some(CacheValue::Restaurants(restaurants)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for featured restaurants");
            return Ok(restaurants);
        }

        let list: RestaurantList = self
            .execute(Method::GET, "/restaurants/featured", None::<&()>, None)
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Restaurants(list.restaurants.clone()))
            .await;

        Ok(list.restaurants)
    }

    /// Get a restaurant by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the restaurant is not found or the request fails.
    #[instrument(skip(self), fields(restaurant_id = %restaurant_id))]
    pub async fn get_restaurant(
        &self,
        restaurant_id: &RestaurantId,
    ) -> Result<Restaurant, PlatformError> {
        let cache_key = format!("restaurant:{restaurant_id}");

        if let Some(CacheValue::Restaurant(restaurant)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for restaurant");
            return Ok(*restaurant);
        }

        let restaurant: Restaurant = self
            .execute(
                Method::GET,
                &format!("/restaurants/{restaurant_id}"),
                None::<&()>,
                None,
            )
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Restaurant(Box::new(restaurant.clone())))
            .await;

        Ok(restaurant)
    }

    /// Get a restaurant's menu.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(restaurant_id = %restaurant_id))]
    pub async fn list_meals(
        &self,
        restaurant_id: &RestaurantId,
    ) -> Result<Vec<Meal>, PlatformError> {
        let cache_key = format!("meals:{restaurant_id}");

        if let Some(CacheValue::Meals(meals)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for menu");
            return Ok(meals);
        }

        let meals: Vec<Meal> = self
            .execute(
                Method::GET,
                &format!("/restaurants/{restaurant_id}/meals"),
                None::<&()>,
                None,
            )
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Meals(meals.clone()))
            .await;

        Ok(meals)
    }

    /// Get a meal by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the meal is not found or the request fails.
    #[instrument(skip(self), fields(meal_id = %meal_id))]
    pub async fn get_meal(&self, meal_id: &MealId) -> Result<Meal, PlatformError> {
        let cache_key = format!("meal:{meal_id}");

        if let Some(CacheValue::Meal(meal)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for meal");
            return Ok(*meal);
        }

        let meal: Meal = self
            .execute(
                Method::GET,
                &format!("/meals/{meal_id}"),
                None::<&()>,
                None,
            )
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Meal(Box::new(meal.clone())))
            .await;

        Ok(meal)
    }

    /// Get a restaurant's reviews, aggregated and ordered upstream.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(restaurant_id = %restaurant_id))]
    pub async fn list_reviews(
        &self,
        restaurant_id: &RestaurantId,
    ) -> Result<Vec<Review>, PlatformError> {
        let cache_key = format!("reviews:{restaurant_id}");

        if let Some(CacheValue::Reviews(reviews)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for reviews");
            return Ok(reviews);
        }

        let reviews: Vec<Review> = self
            .execute(
                Method::GET,
                &format!("/restaurants/{restaurant_id}/reviews"),
                None::<&()>,
                None,
            )
            .await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Reviews(reviews.clone()))
            .await;

        Ok(reviews)
    }

    // =========================================================================
    // Auth Relay (not cached)
    // =========================================================================

    /// Relay a login to the platform.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` on bad credentials, or `MalformedResponse` if
    /// the platform accepted the login but sent no session cookie.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<PlatformSession, PlatformError> {
        let body = Credentials { email, password };
        let response = self
            .send(Method::POST, "/auth/login", Some(&body), None)
            .await?;
        let response = Self::check_status(response, "/auth/login").await?;

        let token = self.extract_session_token(&response).ok_or_else(|| {
            PlatformError::MalformedResponse("login response missing session cookie".to_string())
        })?;
        let user: UserProfile = Self::parse_body(response).await?;

        Ok(PlatformSession { token, user })
    }

    /// Relay a registration to the platform.
    ///
    /// # Errors
    ///
    /// Returns `Upstream` on validation failures (e.g., email taken), or
    /// `MalformedResponse` if no session cookie accompanied the new account.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<PlatformSession, PlatformError> {
        let body = Registration {
            email,
            password,
            name,
        };
        let response = self
            .send(Method::POST, "/auth/register", Some(&body), None)
            .await?;
        let response = Self::check_status(response, "/auth/register").await?;

        let token = self.extract_session_token(&response).ok_or_else(|| {
            PlatformError::MalformedResponse("register response missing session cookie".to_string())
        })?;
        let user: UserProfile = Self::parse_body(response).await?;

        Ok(PlatformSession { token, user })
    }

    /// Invalidate the upstream session.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; an already-dead upstream
    /// session reports `Unauthorized`, which callers may ignore.
    #[instrument(skip(self, token))]
    pub async fn logout(&self, token: &str) -> Result<(), PlatformError> {
        let response = self
            .send(Method::POST, "/auth/logout", None::<&()>, Some(token))
            .await?;
        Self::check_status(response, "/auth/logout").await?;
        Ok(())
    }

    /// Fetch the profile behind an upstream session token.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` if the token has expired upstream.
    #[instrument(skip(self, token))]
    pub async fn current_user(&self, token: &str) -> Result<UserProfile, PlatformError> {
        self.execute(Method::GET, "/auth/me", None::<&()>, Some(token))
            .await
    }

    // =========================================================================
    // Order Methods (not cached - mutable state)
    // =========================================================================

    /// Submit an order assembled from the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform rejects the order (pricing,
    /// availability, and state transitions are enforced upstream).
    #[instrument(skip(self, token, request), fields(restaurant_id = %request.restaurant_id))]
    pub async fn create_order(
        &self,
        token: &str,
        request: CreateOrderRequest,
    ) -> Result<Order, PlatformError> {
        self.execute(Method::POST, "/orders", Some(&request), Some(token))
            .await
    }

    /// Fetch the shopper's order history.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` if the relayed session has expired.
    #[instrument(skip(self, token))]
    pub async fn list_orders(&self, token: &str) -> Result<Vec<Order>, PlatformError> {
        self.execute(Method::GET, "/orders", None::<&()>, Some(token))
            .await
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_client_strips_nothing_from_base_url() {
        let config = PlatformApiConfig {
            base_url: "http://localhost:8080".to_string(),
            timeout: Duration::from_secs(5),
            session_cookie: "tavola_session".to_string(),
        };
        let client = PlatformClient::new(&config);
        assert_eq!(client.inner.base_url, "http://localhost:8080");
    }
}
