use serde::{Deserialize, Serialize};

use crate::{
    api::{ApiClient, ApiError, ApiRequest, FormField, RequestBody, UploadFile},
    models::{Job, JobList, JobSubmitted},
};

/// Sampling options shared by both submission routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoOptions {
    /// Seconds between analysed frames.
    pub frame_interval: f64,
    pub max_frames: u32,
    pub generate_annotated: bool,
}

impl Default for VideoOptions {
    fn default() -> Self {
        Self {
            frame_interval: 1.0,
            max_frames: 300,
            generate_annotated: true,
        }
    }
}

impl VideoOptions {
    fn pairs(&self) -> [(&'static str, String); 3] {
        [
            ("frame_interval", self.frame_interval.to_string()),
            ("max_frames", self.max_frames.to_string()),
            ("generate_annotated", self.generate_annotated.to_string()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct YouTubeRequest {
    pub url: String,
    pub quality: String,
    pub report_format: String,
    pub options: VideoOptions,
}

impl ApiClient {
    pub async fn submit_video_upload(
        &self,
        file: &UploadFile,
        options: &VideoOptions,
        report_format: &str,
    ) -> Result<JobSubmitted, ApiError> {
        let mut fields = vec![FormField::file("file", file)];
        fields.extend(
            options
                .pairs()
                .into_iter()
                .map(|(name, value)| FormField::text(name, value)),
        );
        fields.push(FormField::text("report_format", report_format));

        self.fetch_json(
            ApiRequest::post(&["api", "video", "process-upload"])
                .body(RequestBody::Multipart(fields)),
        )
        .await
    }

    pub async fn submit_youtube(&self, request: &YouTubeRequest) -> Result<JobSubmitted, ApiError> {
        let mut pairs = vec![
            ("youtube_url".to_string(), request.url.clone()),
            ("quality".to_string(), request.quality.clone()),
        ];
        pairs.extend(
            request
                .options
                .pairs()
                .into_iter()
                .map(|(name, value)| (name.to_string(), value)),
        );
        pairs.push(("report_format".to_string(), request.report_format.clone()));

        self.fetch_json(
            ApiRequest::post(&["api", "video", "process-youtube"]).body(RequestBody::Form(pairs)),
        )
        .await
    }

    pub async fn list_jobs(&self) -> Result<Vec<Job>, ApiError> {
        let list: JobList = self
            .fetch_json(ApiRequest::get(&["api", "video", "jobs"]))
            .await?;
        Ok(list.jobs)
    }

    /// Cancels a running job, or removes a finished one.
    pub async fn cancel_job(&self, job_id: &str) -> Result<(), ApiError> {
        self.execute_unit(ApiRequest::delete(&["api", "video", "job", job_id]))
            .await
    }
}
