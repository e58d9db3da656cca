//! The presentation tree. Everything here is plain data so a frontend (or a
//! test) can inspect exactly what would be drawn.

use serde::Serialize;

use crate::{forms::ControlState, jobs::JobView, models::JobSummary, notifications::Severity};

pub const NO_STREAMS: &str = "No active streams";
pub const NO_LOGS: &str = "No logs found";
pub const NO_JOBS: &str = "No processing jobs found";
pub const NO_FACES: &str = "No faces detected in the image.";
pub const UNKNOWN_PERSON: &str = "Unknown";
pub const SELECT_PLACEHOLDER: &str = "Select a person...";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub stats: Vec<StatCard>,
    pub persons: Section<PersonRow>,
    pub person_selector: Vec<SelectOption>,
    pub streams: Section<StreamRow>,
    pub logs: Section<LogRow>,
    pub jobs: Section<JobView>,
    pub recognition: Option<RecognitionPanel>,
    pub controls: ControlState,
    pub notifications: Vec<NotificationView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatCard {
    pub label: &'static str,
    /// `-` until stats have loaded once.
    pub value: String,
}

/// A list panel. `placeholder` is set when there are no rows to draw:
/// a loading hint before the first fetch, the empty-state message after.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section<T> {
    pub rows: Vec<T>,
    pub placeholder: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectOption {
    pub person_id: Option<i64>,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreamRow {
    pub stream_id: String,
    pub fps: String,
    pub frame_count: u64,
    pub view_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogRow {
    pub detected_at: String,
    pub person_name: String,
    pub confidence: String,
    pub source: String,
    pub source_info: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecognitionPanel {
    pub headline: String,
    pub severity: Severity,
    pub faces: Vec<FaceRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaceRow {
    pub label: String,
    pub confidence: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationView {
    /// 1-based position, what `dismiss <n>` refers to.
    pub index: usize,
    pub message: String,
    pub severity: Severity,
}

/// Shared by the summary line of completed jobs.
pub fn summary_line(summary: &JobSummary) -> String {
    format!(
        "{} face(s) detected, {} unique person(s)",
        summary.faces_detected, summary.unique_persons
    )
}
