// SPDX-FileCopyrightText: 2026 Sol Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed client for the memento vault endpoints.
//!
//! Consumed by the vault screens; the pipeline itself never calls these.
//! Every request carries a client-generated request id. Destructive calls
//! are guarded locally: `delete` requires an explicit consent flag and
//! `clear_all` additionally requires the literal confirmation phrase, so a
//! miswired caller cannot erase the vault by accident.

use reqwest::header::{HeaderValue, CONTENT_TYPE};
use tracing::{info, warn};

use sol_config::model::ServerConfig;
use sol_core::SolError;

use crate::wire::{
    AckResponseBody, MementoClearAllRequest, MementoDeleteRequest, MementoItemResponse,
    MementoListResponse, MementoRecord, MementoUpsertRequest,
};

/// Header carrying the client request id on read-only calls.
pub const REQUEST_ID_HEADER: &str = "x-sol-request-id";

/// Literal phrase the caller must supply to clear the whole vault.
pub const CLEAR_ALL_CONFIRMATION_PHRASE: &str = "delete all mementos";

/// Thin HTTP client for `{base}/v1/mementos`.
pub struct MementoVaultClient {
    client: reqwest::Client,
    base_url: String,
}

impl MementoVaultClient {
    pub fn new(config: &ServerConfig) -> Result<Self, SolError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| SolError::Transport {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// List all mementos.
    pub async fn list(&self) -> Result<Vec<MementoRecord>, SolError> {
        let url = format!("{}/v1/mementos", self.base_url);
        let response = self
            .client
            .get(&url)
            .header(REQUEST_ID_HEADER, request_id()?)
            .send()
            .await
            .map_err(transport_err)?;

        let body: MementoListResponse = decode_success(response).await?;
        Ok(body.mementos)
    }

    /// Fetch one memento; `None` when the server does not know the id.
    pub async fn get(&self, id: &str) -> Result<Option<MementoRecord>, SolError> {
        let url = format!("{}/v1/mementos/{id}", self.base_url);
        let response = self
            .client
            .get(&url)
            .header(REQUEST_ID_HEADER, request_id()?)
            .send()
            .await
            .map_err(transport_err)?;

        if response.status().as_u16() == 404 {
            return Ok(None);
        }
        let body: MementoItemResponse = decode_success(response).await?;
        Ok(body.memento)
    }

    /// Create a memento and return the server's record of it.
    pub async fn create(
        &self,
        title: &str,
        body: &str,
        thread_id: Option<&str>,
    ) -> Result<MementoRecord, SolError> {
        let url = format!("{}/v1/mementos", self.base_url);
        let request = MementoUpsertRequest {
            client_request_id: uuid::Uuid::new_v4().to_string(),
            title: title.to_string(),
            body: body.to_string(),
            thread_id: thread_id.map(str::to_string),
        };
        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .json(&request)
            .send()
            .await
            .map_err(transport_err)?;

        let decoded: MementoItemResponse = decode_success(response).await?;
        decoded
            .memento
            .ok_or_else(|| SolError::BadResponse("create returned no memento".to_string()))
    }

    /// Update an existing memento.
    pub async fn update(&self, id: &str, title: &str, body: &str) -> Result<(), SolError> {
        let url = format!("{}/v1/mementos/{id}", self.base_url);
        let request = MementoUpsertRequest {
            client_request_id: uuid::Uuid::new_v4().to_string(),
            title: title.to_string(),
            body: body.to_string(),
            thread_id: None,
        };
        let response = self
            .client
            .put(&url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .json(&request)
            .send()
            .await
            .map_err(transport_err)?;

        check_ack(response).await
    }

    /// Delete one memento. `consent` must be explicitly true.
    pub async fn delete(&self, id: &str, consent: bool) -> Result<(), SolError> {
        if !consent {
            warn!(memento = id, "delete refused: consent flag not set");
            return Err(SolError::Internal(
                "memento delete requires explicit consent".to_string(),
            ));
        }

        let url = format!("{}/v1/mementos/{id}", self.base_url);
        let request = MementoDeleteRequest {
            client_request_id: uuid::Uuid::new_v4().to_string(),
            consent,
        };
        let response = self
            .client
            .delete(&url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .json(&request)
            .send()
            .await
            .map_err(transport_err)?;

        check_ack(response).await?;
        info!(memento = id, "memento deleted");
        Ok(())
    }

    /// Erase the whole vault. Requires consent plus the literal
    /// [`CLEAR_ALL_CONFIRMATION_PHRASE`].
    pub async fn clear_all(&self, consent: bool, confirmation: &str) -> Result<(), SolError> {
        if !consent || confirmation != CLEAR_ALL_CONFIRMATION_PHRASE {
            warn!("clear-all refused: consent or confirmation phrase missing");
            return Err(SolError::Internal(format!(
                "clear-all requires consent and the phrase `{CLEAR_ALL_CONFIRMATION_PHRASE}`"
            )));
        }

        let url = format!("{}/v1/mementos/clear-all", self.base_url);
        let request = MementoClearAllRequest {
            client_request_id: uuid::Uuid::new_v4().to_string(),
            consent,
            confirmation: confirmation.to_string(),
        };
        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .json(&request)
            .send()
            .await
            .map_err(transport_err)?;

        check_ack(response).await?;
        info!("memento vault cleared");
        Ok(())
    }
}

fn request_id() -> Result<HeaderValue, SolError> {
    HeaderValue::from_str(&uuid::Uuid::new_v4().to_string())
        .map_err(|e| SolError::Internal(format!("request id header: {e}")))
}

fn transport_err(e: reqwest::Error) -> SolError {
    SolError::Transport {
        message: format!("memento request failed: {e}"),
        source: Some(Box::new(e)),
    }
}

async fn decode_success<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, SolError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SolError::Http {
            status: status.as_u16(),
            body,
        });
    }
    let raw = response.text().await.map_err(transport_err)?;
    serde_json::from_str(&raw)
        .map_err(|e| SolError::BadResponse(format!("undecodable memento body: {e}")))
}

async fn check_ack(response: reqwest::Response) -> Result<(), SolError> {
    let body: AckResponseBody = decode_success(response).await?;
    if body.ok {
        Ok(())
    } else {
        Err(SolError::BadResponse(format!(
            "server did not acknowledge (status: {:?})",
            body.status
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(base_url: &str) -> MementoVaultClient {
        MementoVaultClient::new(&ServerConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout_secs: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn list_decodes_records_and_sends_request_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/mementos"))
            .and(header_exists(REQUEST_ID_HEADER))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "mementos": [
                    {"id": "mem-1", "title": "Likes tea", "body": "prefers green tea"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mementos = client(&server.uri()).list().await.unwrap();
        assert_eq!(mementos.len(), 1);
        assert_eq!(mementos[0].id, "mem-1");
    }

    #[tokio::test]
    async fn get_unknown_id_returns_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/mementos/mem-404"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let result = client(&server.uri()).get("mem-404").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn delete_without_consent_never_hits_the_network() {
        // No mock mounted: a request would fail loudly.
        let result = client("http://127.0.0.1:9").delete("mem-1", false).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn clear_all_requires_exact_phrase() {
        let result = client("http://127.0.0.1:9")
            .clear_all(true, "delete everything")
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn clear_all_with_phrase_posts_confirmation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/mementos/clear-all"))
            .and(body_partial_json(serde_json::json!({
                "consent": true,
                "confirmation": CLEAR_ALL_CONFIRMATION_PHRASE
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})),
            )
            .expect(1)
            .mount(&server)
            .await;

        client(&server.uri())
            .clear_all(true, CLEAR_ALL_CONFIRMATION_PHRASE)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn create_returns_server_record() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/mementos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "memento": {"id": "mem-9", "title": "t", "body": "b"}
            })))
            .mount(&server)
            .await;

        let record = client(&server.uri()).create("t", "b", None).await.unwrap();
        assert_eq!(record.id, "mem-9");
    }
}
