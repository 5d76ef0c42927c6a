//! Entry Form Gate
//!
//! A one-way gate in front of the data-entry form:
//! `Unauthenticated -> Authenticated`.
//!
//! Two ways through it:
//! - [`AuthGate::check_password`]: exact match against a configured literal.
//!   This keeps casual visitors out of the form and nothing more.
//! - [`AuthGate::login`]: hand the credentials to the API (`POST /token`) and
//!   keep the bearer token it returns for later submissions.

use async_trait::async_trait;
use serde::Deserialize;

use crate::client::ClientError;

/// Message shown when the gate rejects credentials
pub const INCORRECT_PASSWORD: &str = "Incorrect password";

/// Which check the gate runs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Compare against `auth.password`
    #[default]
    Password,
    /// Delegate to the API's token endpoint
    Token,
}

impl std::str::FromStr for AuthMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "password" => Ok(AuthMode::Password),
            "token" => Ok(AuthMode::Token),
            other => Err(format!("Unknown auth mode: {}. Use: password, token", other)),
        }
    }
}

/// Something that can exchange credentials for a bearer token
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    async fn issue_token(&self, username: &str, password: &str) -> Result<String, ClientError>;
}

/// Gate state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthState {
    #[default]
    Unauthenticated,
    Authenticated {
        /// Bearer token when the API issued one
        token: Option<String>,
    },
}

/// The gate itself
#[derive(Debug, Clone, Default)]
pub struct AuthGate {
    state: AuthState,
    message: Option<String>,
}

impl AuthGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, AuthState::Authenticated { .. })
    }

    /// Bearer token, if the API issued one
    pub fn token(&self) -> Option<&str> {
        match &self.state {
            AuthState::Authenticated { token } => token.as_deref(),
            AuthState::Unauthenticated => None,
        }
    }

    /// Last rejection message
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Exact comparison against the configured password.
    ///
    /// An empty configured password never matches.
    pub fn check_password(&mut self, expected: &str, input: &str) -> bool {
        if self.is_authenticated() {
            return true;
        }

        if !expected.is_empty() && input == expected {
            tracing::info!("Entry form unlocked");
            self.state = AuthState::Authenticated { token: None };
            self.message = None;
            true
        } else {
            tracing::warn!("Rejected entry form password");
            self.message = Some(INCORRECT_PASSWORD.to_string());
            false
        }
    }

    /// Ask the API for a token; a credential rejection reads as a wrong password
    pub async fn login<T: TokenIssuer + ?Sized>(
        &mut self,
        issuer: &T,
        username: &str,
        password: &str,
    ) -> bool {
        if self.is_authenticated() {
            return true;
        }

        let result = issuer.issue_token(username, password).await;
        self.accept_token(username, result)
    }

    /// Apply the outcome of a token request made elsewhere
    pub fn accept_token(&mut self, username: &str, result: Result<String, ClientError>) -> bool {
        match result {
            Ok(token) => {
                tracing::info!(%username, "Obtained API token");
                self.state = AuthState::Authenticated { token: Some(token) };
                self.message = None;
                true
            }
            Err(e) if e.is_unauthorized() => {
                tracing::warn!(%username, "API rejected credentials");
                self.message = Some(INCORRECT_PASSWORD.to_string());
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, "Token request failed");
                self.message = Some(e.to_string());
                false
            }
        }
    }
}
