// SPDX-FileCopyrightText: 2026 Sol Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire-format structures for the chat server's JSON API.
//!
//! Request bodies serialize exactly what the server expects; response bodies
//! deserialize leniently (every field optional or defaulted) so additive
//! server changes never break decoding.

use serde::{Deserialize, Serialize};

/// Body of `POST /v1/chat`.
///
/// `client_request_id` is the packet id, reused verbatim across retries so
/// the server can deduplicate repeated delivery attempts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub thread_id: String,
    pub client_request_id: String,
    pub message: String,
}

/// 2xx body of `POST /v1/chat`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChatResponseBody {
    pub ok: bool,
    pub transmission_id: Option<String>,
    pub assistant: Option<String>,
    pub idempotent_replay: Option<bool>,
    pub pending: Option<bool>,
    pub status: Option<String>,
    pub evidence_summary: Option<EvidenceSummary>,
    pub evidence: Option<Vec<EvidenceItem>>,
    pub output_envelope: Option<OutputEnvelope>,
}

/// Aggregate claim-checking metadata attached to a reply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EvidenceSummary {
    pub claim_count: Option<u32>,
    pub supported_count: Option<u32>,
    pub note: Option<String>,
}

/// One checked claim with its supporting source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EvidenceItem {
    pub claim: String,
    pub source: Option<String>,
    pub supported: Option<bool>,
}

/// Structured output attached to a reply when the server produced one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutputEnvelope {
    pub format: Option<String>,
    pub content: Option<serde_json::Value>,
}

/// Body of `GET /v1/chat/{transmissionId}` (polling endpoint).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PollResponseBody {
    pub ok: bool,
    pub transmission_id: Option<String>,
    pub pending: Option<bool>,
    pub server_status: Option<String>,
    pub assistant: Option<String>,
}

// --- Memento endpoints ---

/// A server-side memento record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MementoRecord {
    pub id: String,
    pub thread_id: Option<String>,
    pub title: String,
    pub body: String,
    pub created_at: Option<String>,
}

/// Body of memento create/update.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MementoUpsertRequest {
    pub client_request_id: String,
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
}

/// Body of memento delete. `consent` must be explicitly true.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MementoDeleteRequest {
    pub client_request_id: String,
    pub consent: bool,
}

/// Body of memento clear-all. Requires consent plus the literal
/// confirmation phrase.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MementoClearAllRequest {
    pub client_request_id: String,
    pub consent: bool,
    pub confirmation: String,
}

/// Body of the memento keep/discard decision endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MementoDecisionRequest {
    pub client_request_id: String,
    pub decision: String,
}

/// Generic acknowledgement body shared by memento mutations.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AckResponseBody {
    pub ok: bool,
    pub status: Option<String>,
}

/// Body of the memento list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MementoListResponse {
    pub ok: bool,
    pub mementos: Vec<MementoRecord>,
}

/// Body of the memento get/create endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MementoItemResponse {
    pub ok: bool,
    pub memento: Option<MementoRecord>,
}
