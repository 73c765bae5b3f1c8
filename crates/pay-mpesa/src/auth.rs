//! # Authentication
//!
//! Customer sign-up plus customer and staff login. Every route hands back a
//! bearer token and the id and display name of the account; persisting them
//! is up to the caller.

use crate::client::{ApiClient, ErrorBody};
use pay_core::serde_ext::opt_string_or_number;
use pay_core::{Credential, Identity, PaymentError, PaymentResult, Session};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

const REGISTER_PATH: &str = "/register";
const LOGIN_PATH: &str = "/login";
const ADMIN_LOGIN_PATH: &str = "/admin-login";

/// Login client for customers and gallery staff
#[derive(Debug, Clone)]
pub struct AuthClient {
    client: ApiClient,
}

impl AuthClient {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Create a customer account; signs the new customer in.
    #[instrument(skip(self, password, phone))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        phone: &str,
    ) -> PaymentResult<Session> {
        if name.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
            return Err(PaymentError::ValidationFailed(
                "Name, email and password are required".to_string(),
            ));
        }

        let url = self.client.config().url(REGISTER_PATH);
        let body = RegisterRequest {
            name: name.trim(),
            email: email.trim(),
            password,
            phone: phone.trim(),
        };
        let response: AuthResponse = self
            .client
            .post_json(&url, &body, None, "registration")
            .await?;

        let session = response.into_session(false)?;
        info!(user_id = %session.identity.user_id, "Registered");
        Ok(session)
    }

    /// Customer login
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> PaymentResult<Session> {
        self.authenticate(LOGIN_PATH, email, password, false).await
    }

    /// Staff login; the identity is flagged as admin
    #[instrument(skip(self, password))]
    pub async fn login_admin(&self, email: &str, password: &str) -> PaymentResult<Session> {
        self.authenticate(ADMIN_LOGIN_PATH, email, password, true).await
    }

    async fn authenticate(
        &self,
        route: &str,
        email: &str,
        password: &str,
        is_admin: bool,
    ) -> PaymentResult<Session> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(PaymentError::ValidationFailed(
                "Email and password are required".to_string(),
            ));
        }

        let url = self.client.config().url(route);
        let body = LoginRequest {
            email: email.trim(),
            password,
        };
        let response: AuthResponse = self.client.post_json(&url, &body, None, "login").await?;

        let session = response.into_session(is_admin)?;
        info!(
            user_id = %session.identity.user_id,
            is_admin = session.identity.is_admin,
            "Logged in"
        );
        Ok(session)
    }
}

// =============================================================================
// Auth API Types
// =============================================================================

#[derive(Serialize)]
struct RegisterRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
    phone: &'a str,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    #[serde(default)]
    token: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    user_id: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    admin_id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(flatten)]
    error: ErrorBody,
}

impl AuthResponse {
    fn into_session(self, is_admin: bool) -> PaymentResult<Session> {
        let token = match self.token {
            Some(token) => token,
            None => {
                return Err(PaymentError::Unauthenticated(
                    self.error
                        .text()
                        .unwrap_or_else(|| "Login response has no token".to_string()),
                ))
            }
        };

        let user_id = if is_admin {
            self.admin_id.or(self.user_id)
        } else {
            self.user_id.or(self.admin_id)
        }
        .ok_or_else(|| {
            PaymentError::Serialization("Login response has no account id".to_string())
        })?;

        let identity = Identity::new(user_id, self.name.unwrap_or_default());
        let identity = if is_admin { identity.admin() } else { identity };

        Ok(Session {
            credential: Credential::new(token)?,
            identity,
        })
    }
}
