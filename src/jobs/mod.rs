//! How a video job is shown, derived from its status alone.

pub mod view;

pub use view::{job_list, job_view, BadgeColor, JobAction, JobView, ProgressBar};
