use serde::Serialize;

use crate::models::{Job, JobStatus, JobSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeColor {
    Warning,
    Info,
    Success,
    Danger,
    Secondary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum JobAction {
    Cancel { job_id: String },
    DownloadReport { url: String },
    DownloadVideo { url: String },
    /// Same request as `Cancel`; the server drops finished jobs.
    Remove { job_id: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressBar {
    pub percent: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobView {
    pub job_id: String,
    pub title: String,
    pub source: String,
    pub badge: BadgeColor,
    pub badge_label: String,
    pub progress: Option<ProgressBar>,
    pub summary: Option<JobSummary>,
    pub actions: Vec<JobAction>,
}

pub fn badge_color(status: JobStatus) -> BadgeColor {
    match status {
        JobStatus::Queued => BadgeColor::Warning,
        JobStatus::Downloading | JobStatus::Processing => BadgeColor::Info,
        JobStatus::Completed => BadgeColor::Success,
        JobStatus::Failed => BadgeColor::Danger,
        JobStatus::Cancelled | JobStatus::Unknown => BadgeColor::Secondary,
    }
}

/// Only in-flight jobs carry a bar, whatever `progress` says.
pub fn progress_bar(job: &Job) -> Option<ProgressBar> {
    if !job.status.is_in_flight() {
        return None;
    }
    let percent = if job.progress.is_finite() {
        job.progress.clamp(0.0, 100.0)
    } else {
        0.0
    };
    Some(ProgressBar {
        percent,
        label: format!("{percent:.0}%"),
    })
}

/// `links` turns path segments into the URL handed to the operator.
pub fn actions(job: &Job, links: impl Fn(&[&str]) -> String) -> Vec<JobAction> {
    let job_id = job.job_id.clone();
    match job.status {
        JobStatus::Queued | JobStatus::Downloading | JobStatus::Processing => {
            vec![JobAction::Cancel { job_id }]
        }
        JobStatus::Completed => vec![
            JobAction::DownloadReport {
                url: links(&job.report_segments()[..]),
            },
            JobAction::DownloadVideo {
                url: links(&job.video_segments()[..]),
            },
            JobAction::Remove { job_id },
        ],
        JobStatus::Failed | JobStatus::Cancelled | JobStatus::Unknown => {
            vec![JobAction::Remove { job_id }]
        }
    }
}

pub fn short_id(job_id: &str) -> &str {
    match job_id.char_indices().nth(8) {
        Some((end, _)) => &job_id[..end],
        None => job_id,
    }
}

pub fn job_view(job: &Job, links: impl Fn(&[&str]) -> String) -> JobView {
    JobView {
        job_id: job.job_id.clone(),
        title: format!("Job {}", short_id(&job.job_id)),
        source: job.source.clone(),
        badge: badge_color(job.status),
        badge_label: job.status.as_str().to_uppercase(),
        progress: progress_bar(job),
        summary: job.summary.clone(),
        actions: actions(job, links),
    }
}

/// Newest first; the server lists jobs in submission order.
pub fn job_list(jobs: &[Job], links: impl Fn(&[&str]) -> String) -> Vec<JobView> {
    jobs.iter().rev().map(|job| job_view(job, &links)).collect()
}
