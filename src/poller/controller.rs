use std::{collections::HashMap, sync::Arc};

use futures::future::join_all;
use log::{info, warn};
use tokio::{sync::Mutex, task::JoinHandle, time::Duration};
use tokio_util::sync::CancellationToken;

use crate::store::{ResourceKind, ResourceStore};

use super::{
    loop_worker::{poll_loop, run_fetch},
    FetchFn,
};

struct Registration {
    fetch: FetchFn,
    cadence: Option<Duration>,
    handle: Option<JoinHandle<()>>,
}

/// Owns one recurring timer per resource type.
#[derive(Clone)]
pub struct Poller {
    store: ResourceStore,
    registry: Arc<Mutex<HashMap<ResourceKind, Registration>>>,
    cancel_token: CancellationToken,
}

impl Poller {
    pub fn new(store: ResourceStore) -> Self {
        Self {
            store,
            registry: Arc::new(Mutex::new(HashMap::new())),
            cancel_token: CancellationToken::new(),
        }
    }

    /// Run `fetch` now and, when `cadence` is set, every `cadence` after that.
    /// Re-registering a resource replaces its previous timer.
    pub async fn register(&self, kind: ResourceKind, cadence: Option<Duration>, fetch: FetchFn) {
        let mut registry = self.registry.lock().await;
        if let Some(previous) = registry.remove(&kind) {
            if let Some(handle) = previous.handle {
                handle.abort();
            }
        }

        let handle = match cadence {
            Some(cadence) => Some(tokio::spawn(poll_loop(
                kind,
                cadence,
                fetch.clone(),
                self.store.clone(),
                self.cancel_token.child_token(),
            ))),
            None => {
                info!("{kind} loads on demand only");
                tokio::spawn(run_fetch(kind, fetch.clone(), self.store.clone()));
                None
            }
        };

        registry.insert(
            kind,
            Registration {
                fetch,
                cadence,
                handle,
            },
        );
    }

    /// Out-of-band fetch of one resource, outside its schedule. Resolves once
    /// the response has been applied (or dropped).
    pub async fn refresh(&self, kind: ResourceKind) -> bool {
        let fetch = {
            let registry = self.registry.lock().await;
            registry.get(&kind).map(|registration| registration.fetch.clone())
        };

        match fetch {
            Some(fetch) => run_fetch(kind, fetch, self.store.clone()).await,
            None => {
                warn!("refresh requested for unregistered resource {kind}");
                false
            }
        }
    }

    /// Refresh several resources concurrently.
    pub async fn refresh_many(&self, kinds: &[ResourceKind]) {
        join_all(kinds.iter().map(|kind| self.refresh(*kind))).await;
    }

    pub async fn refresh_all(&self) {
        self.refresh_many(&ResourceKind::ALL).await;
    }

    pub async fn cadence(&self, kind: ResourceKind) -> Option<Duration> {
        self.registry
            .lock()
            .await
            .get(&kind)
            .and_then(|registration| registration.cadence)
    }

    /// Stop every timer. Requests already in flight still complete.
    pub async fn shutdown(&self) {
        self.cancel_token.cancel();

        let handles: Vec<JoinHandle<()>> = {
            let mut registry = self.registry.lock().await;
            registry
                .values_mut()
                .filter_map(|registration| registration.handle.take())
                .collect()
        };

        for handle in handles {
            if let Err(err) = handle.await {
                warn!("poll loop task failed to join: {err}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::{
            testing::{client, FakeTransport},
            Method,
        },
        models::Stats,
        poller::fetcher_for,
        store::WritePolicy,
        utils::ChangeSignal,
    };

    const STATS: &str =
        r#"{"total_persons": 2, "total_embeddings": 9, "total_detections": 40, "active_streams": 1}"#;

    fn store(policy: WritePolicy) -> ResourceStore {
        ResourceStore::new(policy, ChangeSignal::new())
    }

    fn jobs_body(id: &str) -> String {
        format!(r#"{{"jobs": [{{"job_id": "{id}", "status": "processing", "progress": 10}}]}}"#)
    }

    #[tokio::test(start_paused = true)]
    async fn fires_immediately_then_on_cadence() {
        let transport = FakeTransport::new();
        transport.respond(Method::Get, "/api/stats", 200, STATS);
        let api = client(&transport);
        let store = store(WritePolicy::ArrivalOrder);
        let poller = Poller::new(store.clone());

        poller
            .register(
                ResourceKind::Stats,
                Some(Duration::from_secs(10)),
                fetcher_for(&api, ResourceKind::Stats, 10),
            )
            .await;
        tokio::time::sleep(Duration::from_secs(25)).await;

        assert_eq!(transport.call_count(Method::Get, "/api/stats"), 3);
        assert_eq!(store.snapshot().await.stats.unwrap().value.total_detections, 40);
        poller.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn failed_poll_keeps_cache_and_timer() {
        let transport = FakeTransport::new();
        transport.respond(Method::Get, "/api/stats", 200, STATS);
        transport.fail(Method::Get, "/api/stats");
        let api = client(&transport);
        let store = store(WritePolicy::ArrivalOrder);
        let poller = Poller::new(store.clone());

        poller
            .register(
                ResourceKind::Stats,
                Some(Duration::from_secs(30)),
                fetcher_for(&api, ResourceKind::Stats, 10),
            )
            .await;
        tokio::time::sleep(Duration::from_secs(65)).await;

        assert_eq!(transport.call_count(Method::Get, "/api/stats"), 3);
        let stats: Stats = store.snapshot().await.stats.unwrap().value;
        assert_eq!(stats.total_persons, 2);
        poller.shutdown().await;
    }

    async fn overlapping_jobs_polls(policy: WritePolicy) -> String {
        let transport = FakeTransport::new();
        // First poll is slow and lands after the second one.
        transport.respond_after(
            Method::Get,
            "/api/video/jobs",
            200,
            &jobs_body("issued-first"),
            Duration::from_secs(15),
        );
        transport.respond_after(
            Method::Get,
            "/api/video/jobs",
            200,
            &jobs_body("issued-second"),
            Duration::from_secs(1),
        );
        let api = client(&transport);
        let store = store(policy);
        let poller = Poller::new(store.clone());

        poller
            .register(
                ResourceKind::Jobs,
                Some(Duration::from_secs(10)),
                fetcher_for(&api, ResourceKind::Jobs, 10),
            )
            .await;
        tokio::time::sleep(Duration::from_secs(16)).await;
        poller.shutdown().await;

        assert_eq!(transport.call_count(Method::Get, "/api/video/jobs"), 2);
        store.snapshot().await.jobs.unwrap().value[0].job_id.clone()
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_polls_keep_last_arrival() {
        assert_eq!(
            overlapping_jobs_polls(WritePolicy::ArrivalOrder).await,
            "issued-first"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_polls_keep_latest_issue_when_sequenced() {
        assert_eq!(
            overlapping_jobs_polls(WritePolicy::LatestIssued).await,
            "issued-second"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn on_demand_resource_loads_once_and_refreshes() {
        let transport = FakeTransport::new();
        transport.respond(
            Method::Get,
            "/api/persons/",
            200,
            r#"[{"id": 1, "name": "Ana", "description": null}]"#,
        );
        let api = client(&transport);
        let store = store(WritePolicy::ArrivalOrder);
        let poller = Poller::new(store.clone());

        poller
            .register(
                ResourceKind::Persons,
                None,
                fetcher_for(&api, ResourceKind::Persons, 10),
            )
            .await;
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(transport.call_count(Method::Get, "/api/persons/"), 1);
        assert_eq!(poller.cadence(ResourceKind::Persons).await, None);

        assert!(poller.refresh(ResourceKind::Persons).await);
        assert_eq!(transport.call_count(Method::Get, "/api/persons/"), 2);
        assert_eq!(store.snapshot().await.persons.unwrap().value[0].name, "Ana");
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_timers_and_unknown_refresh_is_noop() {
        let transport = FakeTransport::new();
        transport.respond(Method::Get, "/api/rtsp/streams", 200, "[]");
        let api = client(&transport);
        let poller = Poller::new(store(WritePolicy::ArrivalOrder));

        poller
            .register(
                ResourceKind::Streams,
                Some(Duration::from_secs(10)),
                fetcher_for(&api, ResourceKind::Streams, 10),
            )
            .await;
        tokio::time::sleep(Duration::from_secs(1)).await;
        poller.shutdown().await;
        tokio::time::sleep(Duration::from_secs(60)).await;

        assert_eq!(transport.call_count(Method::Get, "/api/rtsp/streams"), 1);
        assert!(!poller.refresh(ResourceKind::Logs).await);
    }
}
