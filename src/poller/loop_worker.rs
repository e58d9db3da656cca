use tokio::time::{Duration, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::store::{ResourceKind, ResourceStore};

use super::FetchFn;

// Set to false to silence per-poll logging.
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

/// Fires immediately, then every `cadence`, until cancelled.
///
/// Every tick spawns its own fetch: a slow request does not delay the next
/// tick and is not cancelled by it.
pub async fn poll_loop(
    kind: ResourceKind,
    cadence: Duration,
    fetch: FetchFn,
    store: ResourceStore,
    cancel_token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(cadence);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    log_info!("polling {} every {}s", kind, cadence.as_secs_f64());

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                tokio::spawn(run_fetch(kind, fetch.clone(), store.clone()));
            }
            _ = cancel_token.cancelled() => {
                log_info!("{} poll loop shutting down", kind);
                break;
            }
        }
    }
}

/// One fetch-and-replace cycle. Failures leave the cached snapshot alone and
/// are only logged.
pub async fn run_fetch(kind: ResourceKind, fetch: FetchFn, store: ResourceStore) -> bool {
    let ticket = store.issue(kind).await;

    match fetch().await {
        Ok(payload) => {
            let applied = store.apply(ticket, payload).await;
            log_debug!("{} poll #{} applied={}", kind, ticket.seq, applied);
            applied
        }
        Err(err) => {
            log_warn!("{} poll #{} failed: {err}", kind, ticket.seq);
            false
        }
    }
}
