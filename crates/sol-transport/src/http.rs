// SPDX-FileCopyrightText: 2026 Sol Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP implementation of the chat transport.
//!
//! Provides [`HttpChatTransport`] which handles request construction, the
//! debug failure-simulation header, pending (202) handling, and manual
//! redirect following so every hop can be recorded for diagnostics.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, LOCATION};
use reqwest::{Method, StatusCode};
use tracing::{debug, info, warn};

use sol_config::model::ServerConfig;
use sol_core::types::{DecisionReply, MementoDecision, PacketEnvelope, PollReply, SendReply};
use sol_core::{ChatTransport, MementoTransport, PollingTransport, SolError};
use sol_diagnostics::{DiagnosticsEntry, DiagnosticsStore};

use crate::redirect::{RedirectHop, RedirectTracker};
use crate::retry::{self, TransportFailure};
use crate::wire::{
    AckResponseBody, ChatRequest, ChatResponseBody, MementoDecisionRequest, PollResponseBody,
};

/// Debug header instructing the dev server to answer with a simulated status.
pub const SIMULATE_STATUS_HEADER: &str = "x-sol-simulate-status";

/// The status the server simulates when the debug header is attached.
pub const SIMULATED_FAILURE_STATUS: u16 = 500;

/// Placeholder text returned for a 202 pending reply.
pub const PENDING_PLACEHOLDER: &str = "(response pending)";

/// Placeholder text when a 2xx body carries no assistant text.
pub const MISSING_ASSISTANT_PLACEHOLDER: &str = "(no response text)";

/// Follow limit for manual redirect handling.
const MAX_REDIRECT_FOLLOWS: usize = 5;

/// Diagnostics body snippets are truncated to this length.
const BODY_SNIPPET_MAX: usize = 256;

/// A transport-level failure with enough context for retry classification.
struct RequestFailure {
    error: SolError,
    failure: TransportFailure,
}

/// HTTP transport for the Sol chat server.
///
/// Redirects are disabled on the inner client and followed manually in
/// [`HttpChatTransport::execute`] so each hop lands in the redirect tracker.
pub struct HttpChatTransport {
    client: reqwest::Client,
    base_url: String,
    diagnostics: Arc<DiagnosticsStore>,
    redirects: RedirectTracker,
}

impl HttpChatTransport {
    /// Creates a new transport against the configured server.
    pub fn new(
        config: &ServerConfig,
        diagnostics: Arc<DiagnosticsStore>,
    ) -> Result<Self, SolError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| SolError::Transport {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            diagnostics,
            redirects: RedirectTracker::new(),
        })
    }

    /// Send a request, following redirects manually and recording each hop
    /// under the given per-attempt task id.
    async fn execute(
        &self,
        task_id: &str,
        mut method: Method,
        url: String,
        headers: HeaderMap,
        mut body: Option<serde_json::Value>,
    ) -> Result<reqwest::Response, RequestFailure> {
        let mut current = url;

        for _ in 0..=MAX_REDIRECT_FOLLOWS {
            let mut request = self
                .client
                .request(method.clone(), &current)
                .headers(headers.clone());
            if let Some(body) = &body {
                request = request.json(body);
            }

            let response = request.send().await.map_err(|e| RequestFailure {
                failure: TransportFailure::from_reqwest(&e),
                error: SolError::Transport {
                    message: format!("request to {current} failed: {e}"),
                    source: Some(Box::new(e)),
                },
            })?;

            let status = response.status();
            if !status.is_redirection() {
                return Ok(response);
            }

            let Some(location) = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
            else {
                // Redirect without a Location header: surface it as-is.
                return Ok(response);
            };

            let next = match reqwest::Url::parse(&current).and_then(|base| base.join(&location)) {
                Ok(next) => next.to_string(),
                Err(e) => {
                    return Err(RequestFailure {
                        failure: TransportFailure::Request,
                        error: SolError::Transport {
                            message: format!("invalid redirect target `{location}`: {e}"),
                            source: Some(Box::new(e)),
                        },
                    });
                }
            };

            self.redirects.record(
                task_id,
                RedirectHop {
                    from: current.clone(),
                    to: next.clone(),
                    status: status.as_u16(),
                    method: method.to_string(),
                },
            );
            debug!(task = task_id, status = status.as_u16(), to = %next, "following redirect");

            if status == StatusCode::SEE_OTHER {
                method = Method::GET;
                body = None;
            }
            current = next;
        }

        Err(RequestFailure {
            failure: TransportFailure::Request,
            error: SolError::Transport {
                message: format!("redirect limit exceeded at {current}"),
                source: None,
            },
        })
    }

    /// Pull the recorded redirect chain into a diagnostics entry.
    fn finish_entry(&self, entry: &mut DiagnosticsEntry, task_id: &str, elapsed_ms: u64) {
        entry.latency_ms = elapsed_ms;
        entry.redirects = self
            .redirects
            .consume_chain(task_id)
            .iter()
            .map(|hop| format!("{} -> {} ({})", hop.from, hop.to, hop.status))
            .collect();
    }
}

fn header_pairs(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.to_string(),
                value.to_str().unwrap_or("<opaque>").to_string(),
            )
        })
        .collect()
}

fn truncate_snippet(raw: &str) -> String {
    if raw.len() <= BODY_SNIPPET_MAX {
        raw.to_string()
    } else {
        let mut end = BODY_SNIPPET_MAX;
        while !raw.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}…", &raw[..end])
    }
}

#[async_trait]
impl ChatTransport for HttpChatTransport {
    fn name(&self) -> &str {
        "http"
    }

    async fn send(&self, envelope: &PacketEnvelope) -> Result<SendReply, SolError> {
        let start = Instant::now();
        let task_id = uuid::Uuid::new_v4().to_string();
        let url = format!("{}/v1/chat", self.base_url);

        let request = ChatRequest {
            thread_id: envelope.thread_id.clone(),
            client_request_id: envelope.packet_id.clone(),
            message: envelope.text.clone(),
        };
        let body = serde_json::to_value(&request)
            .map_err(|e| SolError::Internal(format!("chat request serialization: {e}")))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let simulate = envelope.kind.simulates_failure();
        if simulate {
            headers.insert(
                SIMULATE_STATUS_HEADER,
                HeaderValue::from_str(&SIMULATED_FAILURE_STATUS.to_string())
                    .map_err(|e| SolError::Internal(format!("simulate header: {e}")))?,
            );
        }

        let mut entry = DiagnosticsEntry::for_request("POST", &url, &header_pairs(&headers));
        entry.body_snippet = serde_json::to_string(&request)
            .ok()
            .map(|raw| truncate_snippet(&raw));

        let outcome = self
            .execute(&task_id, Method::POST, url, headers, Some(body))
            .await;
        let elapsed_ms = start.elapsed().as_millis() as u64;
        self.finish_entry(&mut entry, &task_id, elapsed_ms);

        let response = match outcome {
            Ok(response) => response,
            Err(failed) => {
                let decision = retry::classify(None, None, &HeaderMap::new(), Some(&failed.failure));
                entry.retryable = Some(decision.retryable);
                entry.error = Some(failed.error.to_string());
                self.diagnostics.record(entry);
                warn!(
                    packet = %envelope.packet_id,
                    thread = %envelope.thread_id,
                    elapsed_ms,
                    error = %failed.error,
                    "chat send failed"
                );
                return Err(failed.error);
            }
        };

        let status = response.status();
        entry.status = Some(status.as_u16());
        let response_headers = response.headers().clone();

        if simulate && status.as_u16() == SIMULATED_FAILURE_STATUS {
            let err = SolError::SimulatedFailure {
                status: status.as_u16(),
            };
            entry.retryable =
                Some(retry::classify(Some(status.as_u16()), None, &response_headers, None).retryable);
            entry.error = Some(err.to_string());
            self.diagnostics.record(entry);
            warn!(
                packet = %envelope.packet_id,
                thread = %envelope.thread_id,
                elapsed_ms,
                "chat send failed (simulated)"
            );
            return Err(err);
        }

        if status == StatusCode::ACCEPTED {
            // Pending: the server took the message but has no assistant text
            // yet. The body is deliberately not decoded.
            self.diagnostics.record(entry);
            info!(
                packet = %envelope.packet_id,
                thread = %envelope.thread_id,
                status = status.as_u16(),
                elapsed_ms,
                "chat send accepted, pending"
            );
            return Ok(SendReply {
                text: PENDING_PLACEHOLDER.to_string(),
                transmission_id: None,
                pending: true,
                idempotent_replay: false,
            });
        }

        if status.is_success() {
            let raw = match response.text().await {
                Ok(raw) => raw,
                Err(e) => {
                    let failure = TransportFailure::from_reqwest(&e);
                    entry.retryable = Some(
                        retry::classify(None, None, &HeaderMap::new(), Some(&failure)).retryable,
                    );
                    let err = SolError::Transport {
                        message: format!("failed to read response body: {e}"),
                        source: Some(Box::new(e)),
                    };
                    entry.error = Some(err.to_string());
                    self.diagnostics.record(entry);
                    warn!(
                        packet = %envelope.packet_id,
                        thread = %envelope.thread_id,
                        elapsed_ms,
                        error = %err,
                        "chat send failed"
                    );
                    return Err(err);
                }
            };

            match serde_json::from_str::<ChatResponseBody>(&raw) {
                Ok(decoded) => {
                    self.diagnostics.record(entry);
                    info!(
                        packet = %envelope.packet_id,
                        thread = %envelope.thread_id,
                        status = status.as_u16(),
                        elapsed_ms,
                        "chat send ok"
                    );
                    Ok(SendReply {
                        text: decoded
                            .assistant
                            .unwrap_or_else(|| MISSING_ASSISTANT_PLACEHOLDER.to_string()),
                        transmission_id: decoded.transmission_id,
                        pending: decoded.pending.unwrap_or(false),
                        idempotent_replay: decoded.idempotent_replay.unwrap_or(false),
                    })
                }
                Err(e) => {
                    let err = SolError::BadResponse(format!("undecodable chat body: {e}"));
                    entry.error = Some(err.to_string());
                    self.diagnostics.record(entry);
                    warn!(
                        packet = %envelope.packet_id,
                        thread = %envelope.thread_id,
                        elapsed_ms,
                        error = %err,
                        "chat send failed"
                    );
                    Err(err)
                }
            }
        } else {
            // Any other status: keep the body verbatim as diagnostic text.
            let body_text = response.text().await.unwrap_or_default();
            let decision =
                retry::classify(Some(status.as_u16()), Some(&body_text), &response_headers, None);
            entry.retryable = Some(decision.retryable);
            let err = SolError::Http {
                status: status.as_u16(),
                body: body_text,
            };
            entry.error = Some(err.to_string());
            self.diagnostics.record(entry);
            warn!(
                packet = %envelope.packet_id,
                thread = %envelope.thread_id,
                status = status.as_u16(),
                elapsed_ms,
                retryable = decision.retryable,
                "chat send failed"
            );
            Err(err)
        }
    }

    fn polling(&self) -> Option<&dyn PollingTransport> {
        Some(self)
    }

    fn mementos(&self) -> Option<&dyn MementoTransport> {
        Some(self)
    }
}

#[async_trait]
impl PollingTransport for HttpChatTransport {
    async fn poll(&self, transmission_id: &str) -> Result<PollReply, SolError> {
        let start = Instant::now();
        let task_id = uuid::Uuid::new_v4().to_string();
        let url = format!("{}/v1/chat/{transmission_id}", self.base_url);

        let mut entry = DiagnosticsEntry::for_request("GET", &url, &[]);
        let outcome = self
            .execute(&task_id, Method::GET, url, HeaderMap::new(), None)
            .await;
        let elapsed_ms = start.elapsed().as_millis() as u64;
        self.finish_entry(&mut entry, &task_id, elapsed_ms);

        let response = match outcome {
            Ok(response) => response,
            Err(failed) => {
                let decision = retry::classify(None, None, &HeaderMap::new(), Some(&failed.failure));
                entry.retryable = Some(decision.retryable);
                entry.error = Some(failed.error.to_string());
                self.diagnostics.record(entry);
                warn!(transmission = transmission_id, elapsed_ms, error = %failed.error, "poll failed");
                return Err(failed.error);
            }
        };

        let status = response.status();
        entry.status = Some(status.as_u16());
        let response_headers = response.headers().clone();

        if status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            match serde_json::from_str::<PollResponseBody>(&raw) {
                Ok(decoded) => {
                    self.diagnostics.record(entry);
                    debug!(transmission = transmission_id, elapsed_ms, "poll ok");
                    Ok(PollReply {
                        pending: decoded.pending.unwrap_or(status == StatusCode::ACCEPTED),
                        server_status: decoded.server_status,
                        text: decoded.assistant,
                    })
                }
                Err(e) => {
                    let err = SolError::BadResponse(format!("undecodable poll body: {e}"));
                    entry.error = Some(err.to_string());
                    self.diagnostics.record(entry);
                    Err(err)
                }
            }
        } else {
            let body_text = response.text().await.unwrap_or_default();
            let decision =
                retry::classify(Some(status.as_u16()), Some(&body_text), &response_headers, None);
            entry.retryable = Some(decision.retryable);
            let err = SolError::Http {
                status: status.as_u16(),
                body: body_text,
            };
            entry.error = Some(err.to_string());
            self.diagnostics.record(entry);
            warn!(transmission = transmission_id, status = status.as_u16(), elapsed_ms, "poll failed");
            Err(err)
        }
    }
}

#[async_trait]
impl MementoTransport for HttpChatTransport {
    async fn decide_memento(
        &self,
        thread_id: &str,
        memento_id: &str,
        decision: MementoDecision,
    ) -> Result<DecisionReply, SolError> {
        let start = Instant::now();
        let task_id = uuid::Uuid::new_v4().to_string();
        let url = format!(
            "{}/v1/threads/{thread_id}/mementos/{memento_id}/decision",
            self.base_url
        );

        let request = MementoDecisionRequest {
            client_request_id: uuid::Uuid::new_v4().to_string(),
            decision: decision.to_string(),
        };
        let body = serde_json::to_value(&request)
            .map_err(|e| SolError::Internal(format!("decision serialization: {e}")))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut entry = DiagnosticsEntry::for_request("POST", &url, &header_pairs(&headers));
        let outcome = self
            .execute(&task_id, Method::POST, url, headers, Some(body))
            .await;
        let elapsed_ms = start.elapsed().as_millis() as u64;
        self.finish_entry(&mut entry, &task_id, elapsed_ms);

        let response = match outcome {
            Ok(response) => response,
            Err(failed) => {
                entry.error = Some(failed.error.to_string());
                self.diagnostics.record(entry);
                warn!(thread = thread_id, memento = memento_id, elapsed_ms, error = %failed.error, "memento decision failed");
                return Err(failed.error);
            }
        };

        let status = response.status();
        entry.status = Some(status.as_u16());

        if status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let decoded: AckResponseBody = serde_json::from_str(&raw)
                .map_err(|e| SolError::BadResponse(format!("undecodable decision body: {e}")))?;
            self.diagnostics.record(entry);
            info!(thread = thread_id, memento = memento_id, %decision, elapsed_ms, "memento decision submitted");
            Ok(DecisionReply {
                ok: decoded.ok,
                status: decoded.status,
            })
        } else {
            let body_text = response.text().await.unwrap_or_default();
            let err = SolError::Http {
                status: status.as_u16(),
                body: body_text,
            };
            entry.error = Some(err.to_string());
            self.diagnostics.record(entry);
            warn!(thread = thread_id, memento = memento_id, status = status.as_u16(), elapsed_ms, "memento decision failed");
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sol_core::types::PacketKind;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_transport(base_url: &str) -> (HttpChatTransport, Arc<DiagnosticsStore>) {
        let diagnostics = Arc::new(DiagnosticsStore::new());
        let config = ServerConfig {
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout_secs: 5,
        };
        let transport = HttpChatTransport::new(&config, Arc::clone(&diagnostics)).unwrap();
        (transport, diagnostics)
    }

    fn envelope(kind: PacketKind) -> PacketEnvelope {
        PacketEnvelope {
            packet_id: "p1".to_string(),
            kind,
            thread_id: "t1".to_string(),
            message_ids: vec!["m1".to_string()],
            text: "hello there".to_string(),
            context_json: None,
            payload_json: None,
        }
    }

    #[tokio::test]
    async fn send_success_decodes_assistant_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "transmissionId": "srv-1",
                "assistant": "hi from the server"
            })))
            .mount(&server)
            .await;

        let (transport, diagnostics) = test_transport(&server.uri());
        let reply = transport.send(&envelope(PacketKind::Chat)).await.unwrap();

        assert_eq!(reply.text, "hi from the server");
        assert_eq!(reply.transmission_id.as_deref(), Some("srv-1"));
        assert!(!reply.pending);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.snapshot()[0].status, Some(200));
    }

    #[tokio::test]
    async fn send_uses_packet_id_as_idempotency_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat"))
            .and(body_partial_json(serde_json::json!({
                "threadId": "t1",
                "clientRequestId": "p1",
                "message": "hello there"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "assistant": "ok"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (transport, _) = test_transport(&server.uri());
        transport.send(&envelope(PacketKind::Chat)).await.unwrap();
    }

    #[tokio::test]
    async fn send_missing_assistant_falls_back_to_placeholder() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})),
            )
            .mount(&server)
            .await;

        let (transport, _) = test_transport(&server.uri());
        let reply = transport.send(&envelope(PacketKind::Chat)).await.unwrap();
        assert_eq!(reply.text, MISSING_ASSISTANT_PLACEHOLDER);
    }

    #[tokio::test]
    async fn send_202_is_pending_without_decoding() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat"))
            .respond_with(ResponseTemplate::new(202))
            .mount(&server)
            .await;

        let (transport, _) = test_transport(&server.uri());
        let reply = transport.send(&envelope(PacketKind::Chat)).await.unwrap();
        assert!(reply.pending);
        assert_eq!(reply.text, PENDING_PLACEHOLDER);
    }

    #[tokio::test]
    async fn send_error_carries_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat"))
            .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let (transport, diagnostics) = test_transport(&server.uri());
        let err = transport.send(&envelope(PacketKind::Chat)).await.unwrap_err();
        match err {
            SolError::Http { status, body } => {
                assert_eq!(status, 503);
                assert_eq!(body, "overloaded");
            }
            other => panic!("expected Http error, got {other:?}"),
        }
        // The 503 is classified retryable in the diagnostics record.
        assert_eq!(diagnostics.snapshot()[0].retryable, Some(true));
    }

    #[tokio::test]
    async fn debug_fail_kind_sends_simulate_header_and_raises_simulated_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat"))
            .and(header(SIMULATE_STATUS_HEADER, "500"))
            .respond_with(ResponseTemplate::new(500).set_body_string("simulated"))
            .expect(1)
            .mount(&server)
            .await;

        let (transport, _) = test_transport(&server.uri());
        let err = transport.send(&envelope(PacketKind::DebugFail)).await.unwrap_err();
        assert!(err.is_simulated(), "expected simulated failure, got {err:?}");
    }

    #[tokio::test]
    async fn genuine_500_is_not_a_simulated_failure() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let (transport, _) = test_transport(&server.uri());
        let err = transport.send(&envelope(PacketKind::Chat)).await.unwrap_err();
        assert!(!err.is_simulated());
        assert!(matches!(err, SolError::Http { status: 500, .. }));
    }

    #[tokio::test]
    async fn undecodable_2xx_body_is_bad_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
            .mount(&server)
            .await;

        let (transport, _) = test_transport(&server.uri());
        let err = transport.send(&envelope(PacketKind::Chat)).await.unwrap_err();
        assert!(matches!(err, SolError::BadResponse(_)));
    }

    #[tokio::test]
    async fn redirect_is_followed_and_recorded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat"))
            .respond_with(
                ResponseTemplate::new(307).insert_header("location", "/v1/chat-moved"),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/chat-moved"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "assistant": "moved and delivered"
            })))
            .mount(&server)
            .await;

        let (transport, diagnostics) = test_transport(&server.uri());
        let reply = transport.send(&envelope(PacketKind::Chat)).await.unwrap();
        assert_eq!(reply.text, "moved and delivered");

        let entry = &diagnostics.snapshot()[0];
        assert_eq!(entry.redirects.len(), 1);
        assert!(entry.redirects[0].contains("/v1/chat-moved"));
        assert!(entry.redirects[0].contains("307"));
    }

    #[tokio::test]
    async fn connection_failure_is_transport_error() {
        // Nothing listens here; the connect fails immediately.
        let (transport, diagnostics) = test_transport("http://127.0.0.1:9");
        let err = transport.send(&envelope(PacketKind::Chat)).await.unwrap_err();
        assert!(matches!(err, SolError::Transport { .. }), "got {err:?}");
        // Connectivity failures are classified retryable.
        assert_eq!(diagnostics.snapshot()[0].retryable, Some(true));
    }

    #[tokio::test]
    async fn poll_decodes_pending_state() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/chat/srv-9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "ok": true,
                "pending": true,
                "serverStatus": "processing"
            })))
            .mount(&server)
            .await;

        let (transport, _) = test_transport(&server.uri());
        let poll = transport.polling().expect("http transport supports polling");
        let reply = poll.poll("srv-9").await.unwrap();
        assert!(reply.pending);
        assert_eq!(reply.server_status.as_deref(), Some("processing"));
        assert!(reply.text.is_none());
    }

    #[tokio::test]
    async fn decide_memento_posts_decision() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/threads/t1/mementos/mem-1/decision"))
            .and(body_partial_json(serde_json::json!({"decision": "keep"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"ok": true, "status": "kept"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let (transport, _) = test_transport(&server.uri());
        let mementos = transport.mementos().expect("http transport supports mementos");
        let reply = mementos
            .decide_memento("t1", "mem-1", MementoDecision::Keep)
            .await
            .unwrap();
        assert!(reply.ok);
        assert_eq!(reply.status.as_deref(), Some("kept"));
    }
}
