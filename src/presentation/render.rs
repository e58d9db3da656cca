use chrono::Local;

use crate::{
    forms::UiState,
    jobs::job_list,
    models::{LogEntry, Person, RecognitionResult, Stats, Stream},
    notifications::{Notification, Severity},
    store::{Snapshot, StoreSnapshot},
};

use super::view::*;

const LOADING: &str = "Loading...";

/// Build the whole dashboard from current state. Pure: the same inputs always
/// produce the same tree, and nothing here touches the store or the network.
pub fn render(
    snapshot: &StoreSnapshot,
    ui: &UiState,
    notifications: &[Notification],
    links: impl Fn(&[&str]) -> String,
) -> DashboardView {
    let persons = snapshot.persons.as_ref().map(|snap| snap.value.as_slice());

    DashboardView {
        stats: stat_cards(snapshot.stats.as_ref().map(|snap| &snap.value)),
        persons: section(snapshot.persons.as_ref(), None, |persons| {
            persons.iter().map(person_row).collect()
        }),
        person_selector: person_selector(persons.unwrap_or_default(), ui.forms.images.person_id),
        streams: section(snapshot.streams.as_ref(), Some(NO_STREAMS), |streams| {
            streams.iter().map(|stream| stream_row(stream, &links)).collect()
        }),
        logs: section(snapshot.logs.as_ref(), Some(NO_LOGS), |logs| {
            logs.iter().map(log_row).collect()
        }),
        jobs: section(snapshot.jobs.as_ref(), Some(NO_JOBS), |jobs| {
            job_list(jobs, &links)
        }),
        recognition: ui.recognition.as_ref().map(recognition_panel),
        controls: ui.forms.controls(),
        notifications: notifications
            .iter()
            .enumerate()
            .map(|(i, item)| NotificationView {
                index: i + 1,
                message: item.message.clone(),
                severity: item.severity,
            })
            .collect(),
    }
}

fn section<T, R>(
    snapshot: Option<&Snapshot<Vec<T>>>,
    empty: Option<&str>,
    rows: impl FnOnce(&[T]) -> Vec<R>,
) -> Section<R> {
    match snapshot {
        None => Section {
            rows: Vec::new(),
            placeholder: Some(LOADING.to_string()),
        },
        Some(snap) => {
            let rows = rows(&snap.value);
            let placeholder = if rows.is_empty() {
                empty.map(str::to_string)
            } else {
                None
            };
            Section { rows, placeholder }
        }
    }
}

fn stat_cards(stats: Option<&Stats>) -> Vec<StatCard> {
    let value = |pick: fn(&Stats) -> u64| {
        stats
            .map(|stats| pick(stats).to_string())
            .unwrap_or_else(|| "-".to_string())
    };

    vec![
        StatCard {
            label: "Registered persons",
            value: value(|s| s.total_persons),
        },
        StatCard {
            label: "Face samples",
            value: value(|s| s.total_embeddings),
        },
        StatCard {
            label: "Detections",
            value: value(|s| s.total_detections),
        },
        StatCard {
            label: "Active streams",
            value: value(|s| s.active_streams),
        },
        StatCard {
            label: "Uptime",
            value: stats
                .and_then(|s| s.uptime)
                .map(uptime)
                .unwrap_or_else(|| "-".to_string()),
        },
    ]
}

/// Whole minutes only; the server reports seconds as a float.
fn uptime(secs: f64) -> String {
    let minutes = (secs.max(0.0) / 60.0) as u64;
    match (minutes / 60, minutes % 60) {
        (0, m) => format!("{m}m"),
        (h, m) => format!("{h}h {m}m"),
    }
}

fn person_row(person: &Person) -> PersonRow {
    PersonRow {
        id: person.id,
        name: person.name.clone(),
        description: person.description.clone().filter(|d| !d.is_empty()),
    }
}

/// A selection that no longer matches a listed person shows as unselected.
fn person_selector(persons: &[Person], selected: Option<i64>) -> Vec<SelectOption> {
    let matched = selected.filter(|id| persons.iter().any(|person| person.id == *id));

    let mut options = Vec::with_capacity(persons.len() + 1);
    options.push(SelectOption {
        person_id: None,
        label: SELECT_PLACEHOLDER.to_string(),
        selected: matched.is_none(),
    });
    options.extend(persons.iter().map(|person| SelectOption {
        person_id: Some(person.id),
        label: person.name.clone(),
        selected: matched == Some(person.id),
    }));
    options
}

fn stream_row(stream: &Stream, links: impl Fn(&[&str]) -> String) -> StreamRow {
    StreamRow {
        stream_id: stream.stream_id.clone(),
        fps: format!("{:.1}", stream.fps),
        frame_count: stream.frame_count,
        view_url: links(&stream.view_segments()[..]),
    }
}

fn percent(confidence: f64) -> String {
    format!("{:.1}%", confidence * 100.0)
}

fn log_row(entry: &LogEntry) -> LogRow {
    LogRow {
        detected_at: entry
            .detected_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        person_name: entry
            .person_name
            .clone()
            .unwrap_or_else(|| UNKNOWN_PERSON.to_string()),
        confidence: percent(entry.confidence),
        source: entry.source.clone(),
        source_info: entry
            .source_info
            .clone()
            .filter(|info| !info.is_empty())
            .unwrap_or_else(|| "-".to_string()),
    }
}

fn recognition_panel(result: &RecognitionResult) -> RecognitionPanel {
    if result.faces_detected == 0 {
        return RecognitionPanel {
            headline: NO_FACES.to_string(),
            severity: Severity::Info,
            faces: Vec::new(),
        };
    }

    let faces = result
        .recognitions
        .iter()
        .enumerate()
        .map(|(i, face)| FaceRow {
            label: format!(
                "Face {}: {}",
                i + 1,
                face.person_name.as_deref().unwrap_or(UNKNOWN_PERSON)
            ),
            confidence: percent(face.confidence),
            severity: if face.person_id.is_some() {
                Severity::Success
            } else {
                Severity::Warning
            },
        })
        .collect();

    RecognitionPanel {
        headline: format!("{} face(s) detected:", result.faces_detected),
        severity: Severity::Success,
        faces,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    use super::*;
    use crate::{
        jobs::BadgeColor,
        models::{FaceRecognition, Job, JobStatus},
        settings::VideoDefaults,
    };

    fn at<T>(value: T) -> Option<Snapshot<T>> {
        Some(Snapshot {
            value,
            fetched_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
        })
    }

    fn link(segments: &[&str]) -> String {
        format!("http://console.test/{}", segments.join("/"))
    }

    fn loaded() -> StoreSnapshot {
        StoreSnapshot {
            stats: at(Stats {
                total_persons: 2,
                total_embeddings: 9,
                total_detections: 41,
                active_streams: 1,
                uptime: Some(11_545.7),
            }),
            persons: at(vec![
                Person {
                    id: 1,
                    name: "Ana".into(),
                    description: Some("front desk".into()),
                },
                Person {
                    id: 2,
                    name: "Bruno".into(),
                    description: None,
                },
            ]),
            streams: at(vec![Stream {
                stream_id: "cam1".into(),
                rtsp_url: None,
                fps: 12.345,
                frame_count: 880,
            }]),
            logs: at(vec![LogEntry {
                detected_at: Utc.with_ymd_and_hms(2026, 3, 1, 11, 59, 0).unwrap(),
                person_name: None,
                confidence: 0.8734,
                source: "rtsp".into(),
                source_info: None,
            }]),
            jobs: at(vec![
                Job {
                    job_id: "aaaaaaaa-1".into(),
                    status: JobStatus::Completed,
                    progress: 45.0,
                    source: "Upload: a.mp4".into(),
                    summary: None,
                },
                Job {
                    job_id: "bbbbbbbb-2".into(),
                    status: JobStatus::Processing,
                    progress: 60.0,
                    source: "YouTube: https://youtu.be/x".into(),
                    summary: None,
                },
            ]),
        }
    }

    fn ui() -> UiState {
        UiState::new(VideoDefaults::default())
    }

    #[test]
    fn rendering_is_idempotent() {
        let snapshot = loaded();
        let mut ui = ui();
        ui.forms.images.person_id = Some(2);
        let notifications = vec![Notification {
            id: Uuid::nil(),
            message: "Person added".into(),
            severity: Severity::Success,
            created_at: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 1).unwrap(),
        }];

        let first = render(&snapshot, &ui, &notifications, link);
        let second = render(&snapshot, &ui, &notifications, link);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn nothing_loaded_shows_loading_placeholders() {
        let view = render(&StoreSnapshot::default(), &ui(), &[], link);

        assert!(view.stats.iter().all(|card| card.value == "-"));
        assert_eq!(view.streams.placeholder.as_deref(), Some(LOADING));
        assert_eq!(view.jobs.placeholder.as_deref(), Some(LOADING));
        assert_eq!(view.person_selector.len(), 1);
    }

    #[test]
    fn empty_lists_show_their_messages() {
        let snapshot = StoreSnapshot {
            persons: at(Vec::new()),
            streams: at(Vec::new()),
            logs: at(Vec::new()),
            jobs: at(Vec::new()),
            ..Default::default()
        };

        let view = render(&snapshot, &ui(), &[], link);
        assert_eq!(view.streams.placeholder.as_deref(), Some(NO_STREAMS));
        assert_eq!(view.logs.placeholder.as_deref(), Some(NO_LOGS));
        assert_eq!(view.jobs.placeholder.as_deref(), Some(NO_JOBS));
        assert_eq!(view.persons.placeholder, None);
    }

    #[test]
    fn rows_are_formatted_for_display() {
        let view = render(&loaded(), &ui(), &[], link);

        assert_eq!(view.stats[2].value, "41");
        assert_eq!(view.stats[4].value, "3h 12m");
        let stream = &view.streams.rows[0];
        assert_eq!(stream.fps, "12.3");
        assert_eq!(stream.view_url, "http://console.test/api/rtsp/streams/cam1/mjpeg");

        let log = &view.logs.rows[0];
        assert_eq!(log.person_name, UNKNOWN_PERSON);
        assert_eq!(log.confidence, "87.3%");
        assert_eq!(log.source_info, "-");

        let jobs = &view.jobs.rows;
        assert_eq!(jobs[0].job_id, "bbbbbbbb-2");
        assert_eq!(jobs[0].badge, BadgeColor::Info);
        assert_eq!(jobs[1].progress, None);
    }

    #[test]
    fn uptime_formats_hours_and_minutes() {
        assert_eq!(uptime(59.0), "0m");
        assert_eq!(uptime(600.0), "10m");
        assert_eq!(uptime(7_260.0), "2h 1m");
    }

    #[test]
    fn stale_selection_renders_unselected() {
        let mut ui = ui();
        ui.forms.images.person_id = Some(99);

        let view = render(&loaded(), &ui, &[], link);
        let selected: Vec<_> = view
            .person_selector
            .iter()
            .filter(|option| option.selected)
            .collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].person_id, None);

        ui.forms.images.person_id = Some(2);
        let view = render(&loaded(), &ui, &[], link);
        assert!(view.person_selector[2].selected);
    }

    #[test]
    fn recognition_panel_colors_faces() {
        let mut ui = ui();
        ui.recognition = Some(RecognitionResult {
            faces_detected: 2,
            recognitions: vec![
                FaceRecognition {
                    person_id: Some(1),
                    person_name: Some("Ana".into()),
                    confidence: 0.912,
                },
                FaceRecognition {
                    person_id: None,
                    person_name: None,
                    confidence: 0.41,
                },
            ],
        });

        let panel = render(&loaded(), &ui, &[], link).recognition.unwrap();
        assert_eq!(panel.headline, "2 face(s) detected:");
        assert_eq!(panel.faces[0].severity, Severity::Success);
        assert_eq!(panel.faces[0].confidence, "91.2%");
        assert_eq!(panel.faces[1].severity, Severity::Warning);
        assert_eq!(panel.faces[1].label, "Face 2: Unknown");

        ui.recognition = Some(RecognitionResult {
            faces_detected: 0,
            recognitions: Vec::new(),
        });
        let panel = render(&loaded(), &ui, &[], link).recognition.unwrap();
        assert_eq!(panel.severity, Severity::Info);
        assert_eq!(panel.headline, NO_FACES);
    }
}
