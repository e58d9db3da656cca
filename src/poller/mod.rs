pub mod controller;
pub mod fetchers;
pub mod loop_worker;

pub use controller::Poller;
pub use fetchers::{fetch_fn, fetcher_for, FetchFn};
