//! Operator-side input state: what is typed into each form and which files are
//! attached. Control enablement is always derived from here, never stored.

use serde::Serialize;

use crate::{
    api::{endpoints::VideoOptions, UploadFile},
    models::RecognitionResult,
    settings::VideoDefaults,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonForm {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageUploadForm {
    pub person_id: Option<i64>,
    pub files: Vec<UploadFile>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamForm {
    pub stream_id: String,
    pub rtsp_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct YouTubeForm {
    pub url: String,
    pub quality: String,
    pub report_format: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Forms {
    pub person: PersonForm,
    pub images: ImageUploadForm,
    pub recognition_file: Option<UploadFile>,
    pub stream: StreamForm,
    pub video_file: Option<UploadFile>,
    pub youtube: YouTubeForm,
    pub video_options: VideoOptions,
    defaults: VideoDefaults,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ControlState {
    pub add_person: bool,
    pub upload_images: bool,
    pub recognize: bool,
    pub add_stream: bool,
    pub upload_video: bool,
    pub submit_youtube: bool,
}

impl Forms {
    pub fn new(defaults: VideoDefaults) -> Self {
        Self {
            person: PersonForm::default(),
            images: ImageUploadForm::default(),
            recognition_file: None,
            stream: StreamForm::default(),
            video_file: None,
            youtube: YouTubeForm {
                url: String::new(),
                quality: defaults.youtube_quality.clone(),
                report_format: defaults.youtube_report_format.clone(),
            },
            video_options: defaults.options.clone(),
            defaults,
        }
    }

    pub fn controls(&self) -> ControlState {
        ControlState {
            add_person: !self.person.name.trim().is_empty(),
            upload_images: self.images.person_id.is_some() && !self.images.files.is_empty(),
            recognize: self.recognition_file.is_some(),
            add_stream: !self.stream.stream_id.trim().is_empty()
                && !self.stream.rtsp_url.trim().is_empty(),
            upload_video: self.video_file.is_some(),
            submit_youtube: !self.youtube.url.trim().is_empty(),
        }
    }

    pub fn upload_report_format(&self) -> &str {
        &self.defaults.upload_report_format
    }

    pub fn reset_person(&mut self) {
        self.person = PersonForm::default();
    }

    /// The person selection survives; only the attached files are cleared.
    pub fn reset_image_files(&mut self) {
        self.images.files.clear();
    }

    pub fn reset_stream(&mut self) {
        self.stream = StreamForm::default();
    }

    pub fn reset_video_file(&mut self) {
        self.video_file = None;
    }

    pub fn reset_youtube(&mut self) {
        self.youtube = YouTubeForm {
            url: String::new(),
            quality: self.defaults.youtube_quality.clone(),
            report_format: self.defaults.youtube_report_format.clone(),
        };
    }
}

/// Local state that lives next to the resource store but is never polled.
#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    pub forms: Forms,
    /// Last recognition response, rendered as-is.
    pub recognition: Option<RecognitionResult>,
}

impl UiState {
    pub fn new(defaults: VideoDefaults) -> Self {
        Self {
            forms: Forms::new(defaults),
            recognition: None,
        }
    }
}
