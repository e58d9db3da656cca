//! One file per server router; each adds methods to [`ApiClient`](super::ApiClient).

mod logs;
mod persons;
mod recognition;
mod stats;
mod streams;
mod video;

pub use video::{VideoOptions, YouTubeRequest};
