//! Row-store HTTP client.
//!
//! Blocking reqwest client (no Tokio runtime required). The store is a flat
//! row service: full-row JSON reads, upsert-by-id writes, one batch route for
//! import commits. Every request carries the bearer credential.

use std::time::Duration;

use roilens_core::{CrmMovement, EntryId, MovementId, WeeklyEntry};

use crate::auth::{load_auth, AuthCredentials};

/// Row-store API client (blocking).
#[derive(Clone)]
pub struct StoreClient {
    http: reqwest::blocking::Client,
    api_base: String,
    token: String,
}

/// Error type for store operations.
#[derive(Debug)]
pub enum StoreError {
    /// No auth credentials configured
    NotAuthenticated,
    /// Network error
    Network(String),
    /// HTTP error with status code and server-supplied message
    Http(u16, String),
    /// JSON decoding error
    Parse(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotAuthenticated => {
                write!(f, "not authenticated — run `roilens login` first")
            }
            StoreError::Network(msg) => write!(f, "network error: {}", msg),
            StoreError::Http(code, msg) => write!(f, "HTTP {}: {}", code, msg),
            StoreError::Parse(msg) => write!(f, "unreadable store response: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl StoreClient {
    /// Create a new client using saved auth credentials.
    pub fn from_saved_auth() -> Result<Self, StoreError> {
        let creds = load_auth().ok_or(StoreError::NotAuthenticated)?;
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

    /// Fetch every weekly entry the store holds, active and trashed alike.
    pub fn list_entries(&self) -> Result<Vec<WeeklyEntry>, StoreError> {
        let url = format!("{}/weekly-rows", self.api_base);
        let resp = self.get(&url)?;
        resp.json::<Vec<WeeklyEntry>>()
            .map_err(|e| StoreError::Parse(e.to_string()))
    }

    /// Fetch every CRM movement.
    pub fn list_movements(&self) -> Result<Vec<CrmMovement>, StoreError> {
        let url = format!("{}/crm-movements", self.api_base);
        let resp = self.get(&url)?;
        resp.json::<Vec<CrmMovement>>()
            .map_err(|e| StoreError::Parse(e.to_string()))
    }

    /// Upsert one weekly entry, keyed by its id.
    pub fn upsert_entry(&self, entry: &WeeklyEntry) -> Result<(), StoreError> {
        let url = format!("{}/weekly-rows/{}", self.api_base, entry.id);
        self.put_json(&url, entry).map(|_| ())
    }

    /// Permanently delete one weekly entry.
    pub fn delete_entry(&self, id: &EntryId) -> Result<(), StoreError> {
        let url = format!("{}/weekly-rows/{}", self.api_base, id);
        self.delete(&url)
    }

    /// Upsert the whole changed-row list of an import commit in one request.
    pub fn batch_upsert_entries(&self, entries: &[WeeklyEntry]) -> Result<(), StoreError> {
        let url = format!("{}/weekly-rows/batch", self.api_base);
        self.post_json(&url, entries).map(|_| ())
    }

    /// Upsert one CRM movement, keyed by its id.
    pub fn upsert_movement(&self, movement: &CrmMovement) -> Result<(), StoreError> {
        let url = format!("{}/crm-movements/{}", self.api_base, movement.id);
        self.put_json(&url, movement).map(|_| ())
    }

    /// Permanently delete one CRM movement.
    pub fn delete_movement(&self, id: &MovementId) -> Result<(), StoreError> {
        let url = format!("{}/crm-movements/{}", self.api_base, id);
        self.delete(&url)
    }

    // ── Internal helpers ────────────────────────────────────────────

    fn get(&self, url: &str) -> Result<reqwest::blocking::Response, StoreError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .map_err(|e| StoreError::Network(e.to_string()))?;
        check(response)
    }

    fn put_json<T: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<reqwest::blocking::Response, StoreError> {
        let response = self
            .http
            .put(url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .map_err(|e| StoreError::Network(e.to_string()))?;
        check(response)
    }

    fn post_json<T: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
    ) -> Result<reqwest::blocking::Response, StoreError> {
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .map_err(|e| StoreError::Network(e.to_string()))?;
        check(response)
    }

    fn delete(&self, url: &str) -> Result<(), StoreError> {
        let response = self
            .http
            .delete(url)
            .bearer_auth(&self.token)
            .send()
            .map_err(|e| StoreError::Network(e.to_string()))?;
        check(response).map(|_| ())
    }
}

fn check(
    response: reqwest::blocking::Response,
) -> Result<reqwest::blocking::Response, StoreError> {
    let status = response.status().as_u16();
    if !response.status().is_success() {
        let body = response.text().unwrap_or_default();
        return Err(StoreError::Http(status, error_message(&body)));
    }
    Ok(response)
}

/// Pull the server's `{"error": "..."}` message out of a failure body,
/// falling back to the raw text.
pub(crate) fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use roilens_core::{ChannelTag, MovementKind, MovementStatus};

    fn client_for(server: &MockServer) -> StoreClient {
        StoreClient::new(AuthCredentials::new("tok".into(), server.base_url()))
    }

    #[test]
    fn list_entries_parses_store_rows() {
        let server = MockServer::start();

        let rows = server.mock(|when, then| {
            when.method(GET)
                .path("/weekly-rows")
                .header("authorization", "Bearer tok");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(serde_json::json!([
                    {
                        "id": "e-1",
                        "year": 2025,
                        "month": 3,
                        "weekOfMonth": 1,
                        "weekStartDate": "2025-03-03",
                        "weekEndDate": "2025-03-09",
                        "channel": "WHATSAPP",
                        "spend": 1200.0,
                        "leads": 40,
                        "newCustomers": 5,
                        "numberOfSales": 9,
                        "revenue": 3900.0,
                        "notes": "",
                        "deletedAt": null
                    },
                    {
                        "id": "e-2",
                        "year": 2025,
                        "month": 3,
                        "weekOfMonth": 2,
                        "channel": "EMAIL-MKT",
                        "deletedAt": "2025-03-20T10:00:00Z"
                    }
                ]));
        });

        let entries = client_for(&server).list_entries().unwrap();

        rows.assert();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].spend, 1200.0);
        assert_eq!(entries[0].leads, Some(40.0));
        assert_eq!(entries[0].channel.as_str(), "WHATSAPP");
        assert!(entries[0].is_active());
        assert!(!entries[1].is_active());
    }

    #[test]
    fn list_movements_parses_the_crm_wire_names() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(GET).path("/crm-movements");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(serde_json::json!([
                    {
                        "id": "m-1",
                        "clienteId": "ana",
                        "fecha": "2025-03-04",
                        "created_at": "2025-03-04T12:00:00Z",
                        "tipoMovimiento": "venta",
                        "estado": "confirmado",
                        "monto": 3500,
                        "canalAtribucion": "WHATSAPP",
                        "deletedAt": null
                    }
                ]));
        });

        let movements = client_for(&server).list_movements().unwrap();

        assert_eq!(movements.len(), 1);
        assert_eq!(movements[0].customer_id.as_str(), "ana");
        assert_eq!(movements[0].kind, MovementKind::Sale);
        assert_eq!(movements[0].status, MovementStatus::Confirmed);
        assert_eq!(movements[0].amount, 3500.0);
    }

    #[test]
    fn upsert_puts_the_full_row_by_id() {
        let server = MockServer::start();
        let entry = WeeklyEntry::new(2025, 3, 1, ChannelTag::from("WHATSAPP"));

        let put = server.mock(|when, then| {
            when.method(PUT).path(format!("/weekly-rows/{}", entry.id));
            then.status(200);
        });

        client_for(&server).upsert_entry(&entry).unwrap();
        put.assert();
    }

    #[test]
    fn batch_upsert_posts_the_changed_list() {
        let server = MockServer::start();

        let batch = server.mock(|when, then| {
            when.method(POST).path("/weekly-rows/batch");
            then.status(200);
        });

        let entries = vec![
            WeeklyEntry::new(2025, 3, 1, ChannelTag::from("WHATSAPP")),
            WeeklyEntry::new(2025, 3, 2, ChannelTag::from("EMAIL-MKT")),
        ];
        client_for(&server).batch_upsert_entries(&entries).unwrap();
        batch.assert();
    }

    #[test]
    fn delete_hits_the_id_route() {
        let server = MockServer::start();

        let del = server.mock(|when, then| {
            when.method(DELETE).path("/weekly-rows/e-9");
            then.status(200);
        });

        client_for(&server).delete_entry(&EntryId::from("e-9")).unwrap();
        del.assert();
    }

    #[test]
    fn failure_surfaces_the_server_message() {
        let server = MockServer::start();

        server.mock(|when, then| {
            when.method(GET).path("/weekly-rows");
            then.status(500)
                .json_body(serde_json::json!({ "error": "row service unavailable" }));
        });

        let err = client_for(&server).list_entries().unwrap_err();
        match err {
            StoreError::Http(code, msg) => {
                assert_eq!(code, 500);
                assert_eq!(msg, "row service unavailable");
            }
            other => panic!("expected Http error, got {:?}", other),
        }
    }

    #[test]
    fn non_json_failure_body_passes_through() {
        assert_eq!(error_message("gateway timeout"), "gateway timeout");
        assert_eq!(error_message(r#"{"error":"nope"}"#), "nope");
        assert_eq!(error_message(r#"{"detail":"other"}"#), r#"{"detail":"other"}"#);
    }
}
