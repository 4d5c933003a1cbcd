//! Admin surface client: invites and the user listing.
//!
//! Thin wrapper over the deployment's two admin routes. The server enforces
//! the admin allow-list; this client only carries the bearer credential.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::auth::{load_auth, AuthCredentials};
use crate::client::error_message;

/// Error type for admin operations.
#[derive(Debug)]
pub enum AdminError {
    /// No auth credentials configured
    NotAuthenticated,
    /// Network error
    Network(String),
    /// HTTP error with status code and server-supplied message
    Http(u16, String),
    /// JSON decoding error
    Parse(String),
}

impl fmt::Display for AdminError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdminError::NotAuthenticated => {
                write!(f, "not authenticated — run `roilens login` first")
            }
            AdminError::Network(msg) => write!(f, "network error: {}", msg),
            AdminError::Http(code, msg) => write!(f, "HTTP {}: {}", code, msg),
            AdminError::Parse(msg) => write!(f, "unreadable admin response: {}", msg),
        }
    }
}

impl std::error::Error for AdminError {}

/// One account as the user listing returns it. Every timestamp is optional:
/// invited accounts have no sign-in yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub last_sign_in_at: Option<String>,
    #[serde(default)]
    pub email_confirmed_at: Option<String>,
    #[serde(default)]
    pub invited_at: Option<String>,
    #[serde(default)]
    pub banned_until: Option<String>,
}

impl AdminUser {
    /// An account counts as active once it has signed in at least once.
    pub fn is_active(&self) -> bool {
        self.last_sign_in_at.is_some()
    }
}

/// Admin API client (blocking).
pub struct AdminClient {
    http: reqwest::blocking::Client,
    api_base: String,
    token: String,
}

impl AdminClient {
    /// Create a new client using saved auth credentials.
    pub fn from_saved_auth() -> Result<Self, AdminError> {
        let creds = load_auth().ok_or(AdminError::NotAuthenticated)?;
        Ok(Self::new(creds))
    }

    /// Create a new client with explicit credentials.
    pub fn new(creds: AuthCredentials) -> Self {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("roilens/{}", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            api_base: creds.api_base,
            token: creds.token,
        }
    }

    /// Invite a user by email. Returns the invited account's id when the
    /// server reports one.
    pub fn invite(&self, email: &str) -> Result<Option<String>, AdminError> {
        let url = format!("{}/api/invite-user", self.api_base);
        let body = serde_json::json!({ "email": email.trim().to_lowercase() });

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .map_err(|e| AdminError::Network(e.to_string()))?;

        let json = check(response)?;
        Ok(json["invitedUserId"].as_str().map(String::from))
    }

    /// List accounts, one page at a time, in the order the server returns.
    pub fn list_users(&self, page: u32, per_page: u32) -> Result<Vec<AdminUser>, AdminError> {
        let url = format!("{}/api/list-users", self.api_base);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .query(&[("page", page.to_string()), ("per_page", per_page.to_string())])
            .send()
            .map_err(|e| AdminError::Network(e.to_string()))?;

        let json = check(response)?;
        let users = json
            .get("users")
            .cloned()
            .unwrap_or_else(|| serde_json::Value::Array(Vec::new()));
        serde_json::from_value(users).map_err(|e| AdminError::Parse(e.to_string()))
    }
}

fn check(response: reqwest::blocking::Response) -> Result<serde_json::Value, AdminError> {
    let status = response.status().as_u16();
    if !response.status().is_success() {
        let body = response.text().unwrap_or_default();
        return Err(AdminError::Http(status, error_message(&body)));
    }
    response.json().map_err(|e| AdminError::Parse(e.to_string()))
}
