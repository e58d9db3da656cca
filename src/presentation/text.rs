use std::fmt::Write;

use crate::{
    jobs::{JobAction, JobView},
    notifications::Severity,
};

use super::view::*;

fn marker(severity: Severity) -> &'static str {
    match severity {
        Severity::Success => "[ok]",
        Severity::Info => "[i]",
        Severity::Warning => "[!]",
        Severity::Danger => "[x]",
    }
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n== {title} ==");
}

fn placeholder<T>(out: &mut String, section: &Section<T>) {
    if let Some(text) = &section.placeholder {
        let _ = writeln!(out, "  {text}");
    }
}

fn job_block(out: &mut String, job: &JobView) {
    let _ = writeln!(out, "  {} [{}] {}", job.title, job.badge_label, job.source);
    if let Some(bar) = &job.progress {
        let filled = (bar.percent / 5.0).round() as usize;
        let _ = writeln!(
            out,
            "    [{}{}] {}",
            "#".repeat(filled),
            ".".repeat(20 - filled.min(20)),
            bar.label
        );
    }
    if let Some(summary) = &job.summary {
        let _ = writeln!(out, "    {}", summary_line(summary));
    }
    for action in &job.actions {
        let line = match action {
            JobAction::Cancel { job_id } => format!("cancel-job {job_id}"),
            JobAction::Remove { job_id } => format!("cancel-job {job_id}  (remove)"),
            JobAction::DownloadReport { url } => format!("report: {url}"),
            JobAction::DownloadVideo { url } => format!("video:  {url}"),
        };
        let _ = writeln!(out, "    > {line}");
    }
}

/// Draws the dashboard for a plain terminal.
pub fn format_dashboard(view: &DashboardView) -> String {
    let mut out = String::new();

    for notification in &view.notifications {
        let _ = writeln!(
            out,
            "{} {}. {}",
            marker(notification.severity),
            notification.index,
            notification.message
        );
    }

    let cards: Vec<String> = view
        .stats
        .iter()
        .map(|card| format!("{}: {}", card.label, card.value))
        .collect();
    heading(&mut out, "Overview");
    let _ = writeln!(out, "  {}", cards.join(" | "));

    heading(&mut out, "Persons");
    placeholder(&mut out, &view.persons);
    for person in &view.persons.rows {
        match &person.description {
            Some(description) => {
                let _ = writeln!(out, "  #{} {} ({description})", person.id, person.name);
            }
            None => {
                let _ = writeln!(out, "  #{} {}", person.id, person.name);
            }
        }
    }
    if let Some(selected) = view.person_selector.iter().find(|option| option.selected) {
        let _ = writeln!(out, "  upload target: {}", selected.label);
    }

    if let Some(panel) = &view.recognition {
        heading(&mut out, "Recognition");
        let _ = writeln!(out, "  {} {}", marker(panel.severity), panel.headline);
        for face in &panel.faces {
            let _ = writeln!(
                out,
                "  {} {} (confidence {})",
                marker(face.severity),
                face.label,
                face.confidence
            );
        }
    }

    heading(&mut out, "Streams");
    placeholder(&mut out, &view.streams);
    for stream in &view.streams.rows {
        let _ = writeln!(
            out,
            "  {}  FPS: {} | Frames: {}  {}",
            stream.stream_id, stream.fps, stream.frame_count, stream.view_url
        );
    }

    heading(&mut out, "Recent detections");
    placeholder(&mut out, &view.logs);
    for log in &view.logs.rows {
        let _ = writeln!(
            out,
            "  {}  {:<20} {:>6}  {}  {}",
            log.detected_at, log.person_name, log.confidence, log.source, log.source_info
        );
    }

    heading(&mut out, "Video jobs");
    placeholder(&mut out, &view.jobs);
    for job in &view.jobs.rows {
        job_block(&mut out, job);
    }

    let controls = &view.controls;
    let enabled: Vec<&str> = [
        (controls.add_person, "add-person"),
        (controls.upload_images, "upload-images"),
        (controls.recognize, "recognize"),
        (controls.add_stream, "add-stream"),
        (controls.upload_video, "upload-video"),
        (controls.submit_youtube, "youtube"),
    ]
    .into_iter()
    .filter_map(|(on, name)| on.then_some(name))
    .collect();
    if !enabled.is_empty() {
        let _ = writeln!(out, "\nready: {}", enabled.join(", "));
    }

    out
}
