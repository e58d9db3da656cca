//! Latest-known snapshot of every server-backed resource.
//!
//! Each write replaces the whole snapshot for one resource type; there is no
//! merging and no history.

use std::{collections::HashMap, fmt, sync::Arc};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::{
    models::{Job, LogEntry, Person, Stats, Stream},
    utils::ChangeSignal,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Stats,
    Persons,
    Streams,
    Logs,
    Jobs,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 5] = [
        ResourceKind::Stats,
        ResourceKind::Persons,
        ResourceKind::Streams,
        ResourceKind::Logs,
        ResourceKind::Jobs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Stats => "stats",
            ResourceKind::Persons => "persons",
            ResourceKind::Streams => "streams",
            ResourceKind::Logs => "logs",
            ResourceKind::Jobs => "jobs",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How concurrent responses for the same resource are reconciled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WritePolicy {
    /// Every response is applied when it arrives; a slow response may
    /// overwrite a newer one.
    #[default]
    ArrivalOrder,
    /// A response is dropped when a later-issued request has already been
    /// applied for the same resource.
    LatestIssued,
}

/// A complete fetched value for one resource type.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Stats(Stats),
    Persons(Vec<Person>),
    Streams(Vec<Stream>),
    Logs(Vec<LogEntry>),
    Jobs(Vec<Job>),
}

impl Payload {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Payload::Stats(_) => ResourceKind::Stats,
            Payload::Persons(_) => ResourceKind::Persons,
            Payload::Streams(_) => ResourceKind::Streams,
            Payload::Logs(_) => ResourceKind::Logs,
            Payload::Jobs(_) => ResourceKind::Jobs,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot<T> {
    pub value: T,
    pub fetched_at: DateTime<Utc>,
}

impl<T> Snapshot<T> {
    fn now(value: T) -> Self {
        Self {
            value,
            fetched_at: Utc::now(),
        }
    }
}

/// Everything the store currently knows. `None` means never loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StoreSnapshot {
    pub stats: Option<Snapshot<Stats>>,
    pub persons: Option<Snapshot<Vec<Person>>>,
    pub streams: Option<Snapshot<Vec<Stream>>>,
    pub logs: Option<Snapshot<Vec<LogEntry>>>,
    pub jobs: Option<Snapshot<Vec<Job>>>,
}

impl StoreSnapshot {
    fn replace(&mut self, payload: Payload) {
        match payload {
            Payload::Stats(value) => self.stats = Some(Snapshot::now(value)),
            Payload::Persons(value) => self.persons = Some(Snapshot::now(value)),
            Payload::Streams(value) => self.streams = Some(Snapshot::now(value)),
            Payload::Logs(value) => self.logs = Some(Snapshot::now(value)),
            Payload::Jobs(value) => self.jobs = Some(Snapshot::now(value)),
        }
    }
}

/// Handed out before a request is sent; identifies its place in issue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub kind: ResourceKind,
    pub seq: u64,
}

#[derive(Default)]
struct StoreState {
    snapshot: StoreSnapshot,
    issued: HashMap<ResourceKind, u64>,
    applied: HashMap<ResourceKind, u64>,
}

#[derive(Clone)]
pub struct ResourceStore {
    state: Arc<Mutex<StoreState>>,
    policy: WritePolicy,
    signal: ChangeSignal,
}

impl ResourceStore {
    pub fn new(policy: WritePolicy, signal: ChangeSignal) -> Self {
        Self {
            state: Arc::new(Mutex::new(StoreState::default())),
            policy,
            signal,
        }
    }

    pub async fn issue(&self, kind: ResourceKind) -> Ticket {
        let mut state = self.state.lock().await;
        let seq = state.issued.entry(kind).or_insert(0);
        *seq += 1;
        Ticket { kind, seq: *seq }
    }

    /// Replace the snapshot for `ticket.kind`. Returns whether the payload
    /// was applied.
    pub async fn apply(&self, ticket: Ticket, payload: Payload) -> bool {
        if payload.kind() != ticket.kind {
            log::warn!(
                "dropping {} payload delivered for a {} request",
                payload.kind(),
                ticket.kind
            );
            return false;
        }

        {
            let mut state = self.state.lock().await;
            let last_applied = state.applied.get(&ticket.kind).copied().unwrap_or(0);
            if self.policy == WritePolicy::LatestIssued && ticket.seq < last_applied {
                log::debug!(
                    "discarding stale {} response #{} (already applied #{})",
                    ticket.kind,
                    ticket.seq,
                    last_applied
                );
                return false;
            }

            state.snapshot.replace(payload);
            state.applied.insert(ticket.kind, ticket.seq.max(last_applied));
        }

        self.signal.bump();
        true
    }

    pub async fn snapshot(&self) -> StoreSnapshot {
        self.state.lock().await.snapshot.clone()
    }
}
