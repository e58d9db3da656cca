use std::sync::Arc;

use async_trait::async_trait;
use log::info;
use tokio::{
    sync::{watch, Mutex},
    time::Duration,
};

use crate::{
    api::ApiClient,
    forms::{Forms, UiState},
    mutations::MutationPipeline,
    notifications::NotificationQueue,
    poller::{fetcher_for, Poller},
    presentation::{self, DashboardView},
    settings::ConsoleSettings,
    store::{ResourceKind, ResourceStore},
    utils::ChangeSignal,
};

/// Asks the operator before a destructive request goes out.
#[async_trait]
pub trait Confirm: Send + Sync {
    async fn confirm(&self, prompt: &str) -> bool;
}

/// Everything the dashboard owns, built once at startup and handed to the
/// mutation pipeline and the renderer by reference.
#[derive(Clone)]
pub struct Console {
    pub(crate) api: ApiClient,
    pub(crate) store: ResourceStore,
    pub(crate) poller: Poller,
    pub(crate) notifications: NotificationQueue,
    pub(crate) ui: Arc<Mutex<UiState>>,
    pub(crate) confirm: Arc<dyn Confirm>,
    signal: ChangeSignal,
    settings: ConsoleSettings,
}

impl Console {
    pub fn new(api: ApiClient, settings: ConsoleSettings, confirm: Arc<dyn Confirm>) -> Self {
        let signal = ChangeSignal::new();
        let store = ResourceStore::new(settings.write_policy, signal.clone());

        Self {
            poller: Poller::new(store.clone()),
            notifications: NotificationQueue::new(settings.notification_timeout(), signal.clone()),
            ui: Arc::new(Mutex::new(UiState::new(settings.video.clone()))),
            api,
            store,
            confirm,
            signal,
            settings,
        }
    }

    fn cadence_for(&self, kind: ResourceKind) -> Option<Duration> {
        let cadence = &self.settings.cadence;
        let secs = match kind {
            ResourceKind::Stats => cadence.stats_secs,
            ResourceKind::Streams => cadence.streams_secs,
            ResourceKind::Logs => cadence.logs_secs,
            ResourceKind::Jobs => cadence.jobs_secs,
            ResourceKind::Persons => return None,
        };
        // A zero cadence would spin; treat it as on-demand.
        (secs > 0).then(|| Duration::from_secs(secs))
    }

    /// Register every resource with the poller; each loads immediately.
    pub async fn start(&self) {
        info!(
            "console syncing with {} (write policy {:?})",
            self.settings.base_url, self.settings.write_policy
        );

        for kind in ResourceKind::ALL {
            let fetch = fetcher_for(&self.api, kind, self.settings.logs_limit);
            self.poller.register(kind, self.cadence_for(kind), fetch).await;
        }
    }

    pub async fn shutdown(&self) {
        self.poller.shutdown().await;
    }

    pub fn mutations(&self) -> MutationPipeline<'_> {
        MutationPipeline::new(self)
    }

    pub fn poller(&self) -> &Poller {
        &self.poller
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    pub fn store(&self) -> &ResourceStore {
        &self.store
    }

    /// Fires whenever the store, the notifications or the forms change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.signal.subscribe()
    }

    /// Edit form inputs the way a keystroke or file picker would.
    pub async fn update_forms<F>(&self, edit: F)
    where
        F: FnOnce(&mut Forms) + Send,
    {
        {
            let mut ui = self.ui.lock().await;
            edit(&mut ui.forms);
        }
        self.signal.bump();
    }

    pub async fn forms(&self) -> Forms {
        self.ui.lock().await.forms.clone()
    }

    pub(crate) async fn set_recognition(&self, result: crate::models::RecognitionResult) {
        self.ui.lock().await.recognition = Some(result);
        self.signal.bump();
    }

    /// Collect current state and render it.
    pub async fn render(&self) -> DashboardView {
        let snapshot = self.store.snapshot().await;
        let ui = self.ui.lock().await.clone();
        let notifications = self.notifications.visible().await;
        presentation::render(&snapshot, &ui, &notifications, |segments| {
            self.api.link(segments)
        })
    }
}


#[cfg(test)]
mod tests {
    use super::{testing::*, *};
    use crate::api::{testing::FakeTransport, Method};

    #[tokio::test(start_paused = true)]
    async fn start_loads_everything_once_and_registers_cadences() {
        let transport = FakeTransport::new();
        transport.respond(
            Method::Get,
            "/api/stats",
            200,
            r#"{"total_persons": 1, "total_embeddings": 3, "total_detections": 0, "active_streams": 0}"#,
        );
        transport.respond(Method::Get, "/api/persons/", 200, "[]");
        transport.respond(Method::Get, "/api/rtsp/streams", 200, "[]");
        transport.respond(Method::Get, "/api/logs", 200, r#"{"logs": []}"#);
        transport.respond(Method::Get, "/api/video/jobs", 200, r#"{"jobs": []}"#);
        let console = console(&transport, ScriptedConfirm::new(true));

        console.start().await;
        tokio::time::sleep(Duration::from_secs(1)).await;

        for path in [
            "/api/stats",
            "/api/persons/",
            "/api/rtsp/streams",
            "/api/logs",
            "/api/video/jobs",
        ] {
            assert_eq!(transport.call_count(Method::Get, path), 1, "{path}");
        }
        assert_eq!(
            console.poller().cadence(ResourceKind::Streams).await,
            Some(Duration::from_secs(10))
        );
        assert_eq!(console.poller().cadence(ResourceKind::Persons).await, None);

        let snapshot = console.store().snapshot().await;
        assert!(snapshot.stats.is_some() && snapshot.jobs.is_some());
        console.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn stream_links_are_escaped() {
        let transport = FakeTransport::new();
        transport.respond(
            Method::Get,
            "/api/rtsp/streams",
            200,
            r#"[{"stream_id": "lobby cam", "fps": 5.0, "frame_count": 1}]"#,
        );
        let console = console(&transport, ScriptedConfirm::new(true));
        let fetch = fetcher_for(&console.api, ResourceKind::Streams, 10);
        console.poller().register(ResourceKind::Streams, None, fetch).await;
        tokio::time::sleep(Duration::from_millis(10)).await;

        let view = console.render().await;
        assert_eq!(
            view.streams.rows[0].view_url,
            "http://console.test/api/rtsp/streams/lobby%20cam/mjpeg"
        );
    }

    #[tokio::test]
    async fn form_edits_signal_a_redraw() {
        let transport = FakeTransport::new();
        let console = console(&transport, ScriptedConfirm::new(true));
        let mut changes = console.subscribe();

        console
            .update_forms(|forms| forms.person.name = "Ana".into())
            .await;

        assert!(changes.has_changed().unwrap());
        assert_eq!(console.forms().await.person.name, "Ana");
        assert!(transport.calls().is_empty());
    }
}
