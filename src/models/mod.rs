//! Wire models for the recognition service.
//!
//! Field names follow the server's JSON exactly (snake_case), so none of these
//! types rename their fields.

mod helpers;
pub mod job;
pub mod log_entry;
pub mod person;
pub mod recognition;
pub mod stats;
pub mod stream;

pub use job::{Job, JobList, JobStatus, JobSubmitted, JobSummary};
pub use log_entry::{LogEntry, LogPage};
pub use person::{NewPerson, Person};
pub use recognition::{FaceRecognition, RecognitionResult, UploadImagesResult};
pub use stats::Stats;
pub use stream::{NewStream, Stream};
