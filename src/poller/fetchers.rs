use std::{future::Future, sync::Arc};

use futures::future::{BoxFuture, FutureExt};

use crate::{
    api::{ApiClient, ApiError},
    store::{Payload, ResourceKind},
};

/// Produces one complete snapshot per call. Cloned into every tick.
pub type FetchFn = Arc<dyn Fn() -> BoxFuture<'static, Result<Payload, ApiError>> + Send + Sync>;

pub fn fetch_fn<F, Fut>(fetch: F) -> FetchFn
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Payload, ApiError>> + Send + 'static,
{
    Arc::new(move || fetch().boxed())
}

/// The stock fetcher for each resource type.
pub fn fetcher_for(api: &ApiClient, kind: ResourceKind, logs_limit: u32) -> FetchFn {
    let api = api.clone();
    match kind {
        ResourceKind::Stats => fetch_fn(move || {
            let api = api.clone();
            async move { api.fetch_stats().await.map(Payload::Stats) }
        }),
        ResourceKind::Persons => fetch_fn(move || {
            let api = api.clone();
            async move { api.list_persons().await.map(Payload::Persons) }
        }),
        ResourceKind::Streams => fetch_fn(move || {
            let api = api.clone();
            async move { api.list_streams().await.map(Payload::Streams) }
        }),
        ResourceKind::Logs => fetch_fn(move || {
            let api = api.clone();
            async move { api.fetch_logs(logs_limit).await.map(Payload::Logs) }
        }),
        ResourceKind::Jobs => fetch_fn(move || {
            let api = api.clone();
            async move { api.list_jobs().await.map(Payload::Jobs) }
        }),
    }
}
