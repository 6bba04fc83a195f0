//! Auth gateway — the single HTTP boundary to the identity service.
//!
//! ARCHITECTURE
//! ============
//! Each operation issues exactly one outbound request. On success the
//! session store is reconciled (tokens + user for token-issuing operations,
//! user only for read-through profile fetches); on failure prior state is
//! left untouched and a typed error is surfaced to the caller. Logout is the
//! one asymmetric operation: the local session is cleared no matter what the
//! remote said, so the client can never stay authenticated after asking to
//! log out.
//!
//! The gateway never retries and enforces no timeout; timeouts belong to the
//! `reqwest` client handed in by the caller.

use reqwest::header::AUTHORIZATION;
use reqwest::{Method, RequestBuilder};

use crate::net::types::{
    AuthResponse, LoginRequest, MessageResponse, RegisterRequest, UpdateProfileRequest, User,
};
use crate::session::store::SessionStore;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The request did not complete (connect, TLS, or body decode failure).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("{message}")]
    Rejected { status: u16, message: String },
    /// The operation needs a stored token and the session is anonymous.
    /// No request was issued.
    #[error("not authenticated")]
    NotAuthenticated,
}

/// Client for the remote identity service. Cheap to clone.
#[derive(Clone)]
pub struct AuthGateway {
    client: reqwest::Client,
    base_url: String,
    store: SessionStore,
}

impl AuthGateway {
    /// Gateway with a default HTTP client. `base_url` is the API root,
    /// e.g. `http://127.0.0.1:8080/api`.
    #[must_use]
    pub fn new(base_url: impl Into<String>, store: SessionStore) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, store)
    }

    /// Gateway with a caller-configured client (timeouts, proxies).
    #[must_use]
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>, store: SessionStore) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        Self { client, base_url, store }
    }

    /// The session store this gateway reconciles.
    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    // =========================================================================
    // OPERATIONS
    // =========================================================================

    /// `POST /auth/login` — on success the store holds the new token pair
    /// and a user record built from the response.
    ///
    /// # Errors
    ///
    /// `Transport` or `Rejected`; the session is unchanged on either.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse, GatewayError> {
        let resp = self
            .request(Method::POST, "/auth/login")
            .json(credentials)
            .send()
            .await?;
        let resp = Self::accept(resp).await?;
        let auth: AuthResponse = resp.json().await?;
        self.store
            .set_authenticated(&auth.access_token, &auth.refresh_token, auth.to_user());
        tracing::debug!(username = %auth.username, "login succeeded");
        Ok(auth)
    }

    /// `POST /auth/register` — never mutates the session; the user still
    /// has to log in afterwards.
    ///
    /// # Errors
    ///
    /// `Transport` or `Rejected` (duplicate username, policy violation, …).
    pub async fn register(&self, registration: &RegisterRequest) -> Result<MessageResponse, GatewayError> {
        let resp = self
            .request(Method::POST, "/auth/register")
            .json(registration)
            .send()
            .await?;
        let resp = Self::accept(resp).await?;
        Ok(resp.json().await?)
    }

    /// `POST /auth/logout` — the local session is cleared unconditionally,
    /// before the remote outcome is inspected.
    ///
    /// # Errors
    ///
    /// `Transport` or `Rejected` from the remote call; the session is
    /// cleared even then.
    pub async fn logout(&self) -> Result<MessageResponse, GatewayError> {
        let request = self
            .request(Method::POST, "/auth/logout")
            .json(&serde_json::json!({}));
        let request = match self.store.access_token() {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {token}")),
            None => request,
        };
        let result = request.send().await;
        // Logout is always locally honored, reachable server or not.
        self.store.clear();
        let resp = Self::accept(result?).await?;
        Ok(resp.json().await?)
    }

    /// `POST /auth/refresh` — exchange the stored refresh token for a new
    /// pair. Issues no request when the session holds no refresh token.
    ///
    /// # Errors
    ///
    /// `NotAuthenticated` without a stored refresh token, else `Transport`
    /// or `Rejected`; the session is unchanged on failure.
    pub async fn refresh(&self) -> Result<AuthResponse, GatewayError> {
        let refresh_token = self
            .store
            .refresh_token()
            .ok_or(GatewayError::NotAuthenticated)?;
        let resp = self
            .request(Method::POST, "/auth/refresh")
            .json(&serde_json::json!({ "refreshToken": refresh_token }))
            .send()
            .await?;
        let resp = Self::accept(resp).await?;
        let auth: AuthResponse = resp.json().await?;
        self.store
            .set_authenticated(&auth.access_token, &auth.refresh_token, auth.to_user());
        tracing::debug!("token refresh succeeded");
        Ok(auth)
    }

    /// `GET /auth/me` — read-through refresh of the cached user record.
    /// Tokens are untouched.
    ///
    /// # Errors
    ///
    /// `NotAuthenticated` without a stored access token, else `Transport`
    /// or `Rejected`.
    pub async fn current_user(&self) -> Result<User, GatewayError> {
        let request = self.bearer(self.request(Method::GET, "/auth/me"))?;
        let resp = Self::accept(request.send().await?).await?;
        let user: User = resp.json().await?;
        self.store.set_user(user.clone());
        Ok(user)
    }

    /// `POST /auth/forgot-password` — request a reset email. No session
    /// mutation on any outcome.
    ///
    /// # Errors
    ///
    /// `Transport` or `Rejected`.
    pub async fn forgot_password(&self, email: &str) -> Result<MessageResponse, GatewayError> {
        let resp = self
            .request(Method::POST, "/auth/forgot-password")
            .json(&serde_json::json!({ "email": email }))
            .send()
            .await?;
        let resp = Self::accept(resp).await?;
        Ok(resp.json().await?)
    }

    /// `POST /auth/reset-password` — consume a reset token. No session
    /// mutation on any outcome.
    ///
    /// # Errors
    ///
    /// `Transport` or `Rejected` (expired or already-used token).
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<MessageResponse, GatewayError> {
        let resp = self
            .request(Method::POST, "/auth/reset-password")
            .json(&serde_json::json!({ "token": token, "newPassword": new_password }))
            .send()
            .await?;
        let resp = Self::accept(resp).await?;
        Ok(resp.json().await?)
    }

    /// `GET /auth/validate-reset-token?token=…` — probe a reset token
    /// before showing the new-password form.
    ///
    /// # Errors
    ///
    /// `Transport` or `Rejected`.
    pub async fn validate_reset_token(&self, token: &str) -> Result<MessageResponse, GatewayError> {
        let resp = self
            .request(Method::GET, "/auth/validate-reset-token")
            .query(&[("token", token)])
            .send()
            .await?;
        let resp = Self::accept(resp).await?;
        Ok(resp.json().await?)
    }

    /// `POST /auth/verify-email?token=…` — confirm an email address.
    /// No session mutation on any outcome.
    ///
    /// # Errors
    ///
    /// `Transport` or `Rejected`.
    pub async fn verify_email(&self, token: &str) -> Result<MessageResponse, GatewayError> {
        let resp = self
            .request(Method::POST, "/auth/verify-email")
            .query(&[("token", token)])
            .json(&serde_json::json!({}))
            .send()
            .await?;
        let resp = Self::accept(resp).await?;
        Ok(resp.json().await?)
    }

    /// `GET /users/profile` — full profile record; read-through refresh of
    /// the cached user.
    ///
    /// # Errors
    ///
    /// `NotAuthenticated` without a stored access token, else `Transport`
    /// or `Rejected`.
    pub async fn get_profile(&self) -> Result<User, GatewayError> {
        let request = self.bearer(self.request(Method::GET, "/users/profile"))?;
        let resp = Self::accept(request.send().await?).await?;
        let user: User = resp.json().await?;
        self.store.set_user(user.clone());
        Ok(user)
    }

    /// `PUT /users/profile` — update profile fields; the cached user is
    /// replaced from the response.
    ///
    /// # Errors
    ///
    /// `NotAuthenticated` without a stored access token, else `Transport`
    /// or `Rejected`.
    pub async fn update_profile(&self, changes: &UpdateProfileRequest) -> Result<User, GatewayError> {
        let request = self
            .bearer(self.request(Method::PUT, "/users/profile"))?
            .json(changes);
        let resp = Self::accept(request.send().await?).await?;
        let user: User = resp.json().await?;
        self.store.set_user(user.clone());
        Ok(user)
    }

    // =========================================================================
    // REQUEST PLUMBING
    // =========================================================================

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, format!("{}{path}", self.base_url))
    }

    fn bearer(&self, request: RequestBuilder) -> Result<RequestBuilder, GatewayError> {
        let token = self
            .store
            .access_token()
            .ok_or(GatewayError::NotAuthenticated)?;
        Ok(request.header(AUTHORIZATION, format!("Bearer {token}")))
    }

    /// Pass through success responses; turn everything else into
    /// `Rejected`, extracting the conventional `{message}` body when present.
    async fn accept(resp: reqwest::Response) -> Result<reqwest::Response, GatewayError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let message = resp
            .text()
            .await
            .ok()
            .and_then(|body| serde_json::from_str::<MessageResponse>(&body).ok())
            .map_or_else(
                || format!("request rejected (HTTP {})", status.as_u16()),
                |body| body.message,
            );
        tracing::debug!(status = status.as_u16(), %message, "request rejected");
        Err(GatewayError::Rejected { status: status.as_u16(), message })
    }
}

#[cfg(test)]
#[path = "gateway_test.rs"]
mod tests;
