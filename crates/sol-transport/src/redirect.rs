// SPDX-FileCopyrightText: 2026 Sol Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-attempt accumulation of redirect hops, for diagnostics only.
//!
//! Chains are keyed by an opaque task id the transport mints per delivery
//! attempt, capped at the most recent hops to bound memory, and consumed
//! exactly once when the attempt's diagnostics entry is assembled. Nothing
//! here ever influences retry or delivery decisions.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Maximum hops retained per task; older hops are dropped.
pub const MAX_RECORDED_HOPS: usize = 3;

/// One observed redirect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectHop {
    pub from: String,
    pub to: String,
    pub status: u16,
    pub method: String,
}

/// Mutex-guarded map of in-flight redirect chains.
#[derive(Debug, Default)]
pub struct RedirectTracker {
    chains: Mutex<HashMap<String, VecDeque<RedirectHop>>>,
}

impl RedirectTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one hop for the given task, dropping the oldest beyond the cap.
    pub fn record(&self, task_id: &str, hop: RedirectHop) {
        let mut chains = self.chains.lock().expect("redirect lock poisoned");
        let chain = chains.entry(task_id.to_string()).or_default();
        if chain.len() == MAX_RECORDED_HOPS {
            chain.pop_front();
        }
        chain.push_back(hop);
    }

    /// Return and clear the recorded chain for a task (one-shot read).
    pub fn consume_chain(&self, task_id: &str) -> Vec<RedirectHop> {
        let mut chains = self.chains.lock().expect("redirect lock poisoned");
        chains
            .remove(task_id)
            .map(|chain| chain.into_iter().collect())
            .unwrap_or_default()
    }
}
