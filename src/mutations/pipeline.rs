use crate::{
    api::{endpoints::YouTubeRequest, ApiError},
    console::Console,
    models::{NewPerson, NewStream},
    store::ResourceKind,
};

use super::{Action, MutationOutcome};

// Set to false to silence mutation logging.
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_error, log_info};

/// Entry points for every operator write. Each call is one request/response
/// cycle: validate, send, then either clear inputs + refresh + notify, or
/// notify the failure and leave everything else alone.
pub struct MutationPipeline<'a> {
    console: &'a Console,
}

impl<'a> MutationPipeline<'a> {
    pub fn new(console: &'a Console) -> Self {
        Self { console }
    }

    async fn succeed(&self, refresh: &[ResourceKind], message: String) -> MutationOutcome {
        let poller = self.console.poller();
        let notifications = self.console.notifications();
        futures::join!(poller.refresh_many(refresh), notifications.success(message));
        MutationOutcome::Completed
    }

    async fn fail(&self, action: &str, err: ApiError, fallback: &str) -> MutationOutcome {
        log_error!("{action} failed: {err}");
        let message = err.detail().unwrap_or(fallback).to_string();
        self.console.notifications().danger(message).await;
        MutationOutcome::Failed
    }

    fn invalid(&self, action: &str, reason: &str) -> MutationOutcome {
        log_debug!("{action} blocked: {reason}");
        MutationOutcome::Invalid
    }

    async fn confirmed(&self, prompt: &str) -> bool {
        let accepted = self.console.confirm.confirm(prompt).await;
        if !accepted {
            log_debug!("declined: {prompt}");
        }
        accepted
    }

    /// Ask the operator if `action` needs it. Anything without a prompt passes.
    pub async fn confirm(&self, action: &Action) -> bool {
        match action.prompt() {
            Some(prompt) => self.confirmed(&prompt).await,
            None => true,
        }
    }

    /// Send `action` without asking; the caller already collected any
    /// confirmation through [`MutationPipeline::confirm`].
    pub async fn perform(&self, action: Action) -> MutationOutcome {
        match action {
            Action::AddPerson => self.create_person().await,
            Action::DeletePerson(id) => self.send_delete_person(id).await,
            Action::UploadImages => self.upload_images().await,
            Action::Recognize => self.recognize_image().await,
            Action::AddStream => self.add_stream().await,
            Action::RemoveStream(id) => self.send_remove_stream(&id).await,
            Action::UploadVideo => self.submit_video_upload().await,
            Action::YouTube => self.submit_youtube_job().await,
            Action::CancelJob(id) => self.send_cancel_job(&id).await,
        }
    }

    async fn confirm_then_perform(&self, action: Action) -> MutationOutcome {
        if !self.confirm(&action).await {
            return MutationOutcome::Declined;
        }
        self.perform(action).await
    }

    pub async fn create_person(&self) -> MutationOutcome {
        let person = {
            let ui = self.console.ui.lock().await;
            let form = &ui.forms.person;
            if form.name.trim().is_empty() {
                return self.invalid("create person", "name is empty");
            }
            NewPerson::new(&form.name, &form.description)
        };

        match self.console.api.create_person(&person).await {
            Ok(()) => {
                log_info!("created person '{}'", person.name);
                self.console.update_forms(|forms| forms.reset_person()).await;
                self.succeed(
                    &[ResourceKind::Persons, ResourceKind::Stats],
                    "Person added".into(),
                )
                .await
            }
            Err(err) => self.fail("create person", err, "Failed to add person").await,
        }
    }

    pub async fn delete_person(&self, person_id: i64) -> MutationOutcome {
        self.confirm_then_perform(Action::DeletePerson(person_id))
            .await
    }

    async fn send_delete_person(&self, person_id: i64) -> MutationOutcome {
        match self.console.api.delete_person(person_id).await {
            Ok(()) => {
                log_info!("deleted person {person_id}");
                self.succeed(
                    &[ResourceKind::Persons, ResourceKind::Stats],
                    "Person removed".into(),
                )
                .await
            }
            Err(err) => self.fail("delete person", err, "Failed to remove person").await,
        }
    }

    /// Uploads the attached images for the selected person.
    pub async fn upload_images(&self) -> MutationOutcome {
        let (person_id, files) = {
            let ui = self.console.ui.lock().await;
            let form = &ui.forms.images;
            let Some(person_id) = form.person_id else {
                return self.invalid("upload images", "no person selected");
            };
            if form.files.is_empty() {
                return self.invalid("upload images", "no files attached");
            }
            (person_id, form.files.clone())
        };

        match self.console.api.upload_images(person_id, &files).await {
            Ok(result) => {
                log_info!(
                    "uploaded {} image(s) for person {person_id}: {}",
                    files.len(),
                    result.message
                );
                self.console
                    .update_forms(|forms| forms.reset_image_files())
                    .await;
                // The person list itself does not change.
                self.succeed(&[ResourceKind::Stats], result.message).await
            }
            Err(err) => self.fail("upload images", err, "Failed to upload images").await,
        }
    }

    /// The result is shown directly from the response; the attached file
    /// stays so the operator can run it again.
    pub async fn recognize_image(&self) -> MutationOutcome {
        let file = {
            let ui = self.console.ui.lock().await;
            match &ui.forms.recognition_file {
                Some(file) => file.clone(),
                None => return self.invalid("recognize image", "no file attached"),
            }
        };

        match self.console.api.recognize_image(&file).await {
            Ok(result) => {
                log_info!(
                    "recognition on {} found {} face(s)",
                    file.file_name,
                    result.faces_detected
                );
                self.console.set_recognition(result).await;
                // A recognition can add detection log rows server-side.
                self.console.poller().refresh(ResourceKind::Stats).await;
                MutationOutcome::Completed
            }
            Err(err) => {
                self.fail("recognize image", err, "Failed to recognize image")
                    .await
            }
        }
    }

    pub async fn add_stream(&self) -> MutationOutcome {
        let stream = {
            let ui = self.console.ui.lock().await;
            let form = &ui.forms.stream;
            if form.stream_id.trim().is_empty() || form.rtsp_url.trim().is_empty() {
                return self.invalid("add stream", "stream id and url are required");
            }
            NewStream {
                stream_id: form.stream_id.trim().to_string(),
                rtsp_url: form.rtsp_url.trim().to_string(),
            }
        };

        match self.console.api.add_stream(&stream).await {
            Ok(()) => {
                log_info!("added stream {}", stream.stream_id);
                self.console.update_forms(|forms| forms.reset_stream()).await;
                self.succeed(
                    &[ResourceKind::Streams, ResourceKind::Stats],
                    "Stream added".into(),
                )
                .await
            }
            Err(err) => self.fail("add stream", err, "Failed to add stream").await,
        }
    }

    pub async fn remove_stream(&self, stream_id: &str) -> MutationOutcome {
        self.confirm_then_perform(Action::RemoveStream(stream_id.to_string()))
            .await
    }

    async fn send_remove_stream(&self, stream_id: &str) -> MutationOutcome {
        if stream_id.trim().is_empty() {
            return self.invalid("remove stream", "stream id is empty");
        }

        match self.console.api.remove_stream(stream_id).await {
            Ok(()) => {
                log_info!("removed stream {stream_id}");
                self.succeed(
                    &[ResourceKind::Streams, ResourceKind::Stats],
                    "Stream removed".into(),
                )
                .await
            }
            Err(err) => self.fail("remove stream", err, "Failed to remove stream").await,
        }
    }

    pub async fn submit_video_upload(&self) -> MutationOutcome {
        let (file, options, report_format) = {
            let ui = self.console.ui.lock().await;
            let forms = &ui.forms;
            let Some(file) = forms.video_file.clone() else {
                return self.invalid("video upload", "no file attached");
            };
            (
                file,
                forms.video_options.clone(),
                forms.upload_report_format().to_string(),
            )
        };

        match self
            .console
            .api
            .submit_video_upload(&file, &options, &report_format)
            .await
        {
            Ok(submitted) => {
                log_info!("queued video {} as job {}", file.file_name, submitted.job_id);
                self.console
                    .update_forms(|forms| forms.reset_video_file())
                    .await;
                self.succeed(
                    &[ResourceKind::Jobs],
                    format!("Video sent for processing. Job ID: {}", submitted.job_id),
                )
                .await
            }
            Err(err) => self.fail("video upload", err, "Failed to upload video").await,
        }
    }

    pub async fn submit_youtube_job(&self) -> MutationOutcome {
        let request = {
            let ui = self.console.ui.lock().await;
            let forms = &ui.forms;
            if forms.youtube.url.trim().is_empty() {
                return self.invalid("youtube job", "url is empty");
            }
            YouTubeRequest {
                url: forms.youtube.url.trim().to_string(),
                quality: forms.youtube.quality.clone(),
                report_format: forms.youtube.report_format.clone(),
                options: forms.video_options.clone(),
            }
        };

        match self.console.api.submit_youtube(&request).await {
            Ok(submitted) => {
                log_info!("queued {} as job {}", request.url, submitted.job_id);
                self.console.update_forms(|forms| forms.reset_youtube()).await;
                self.succeed(
                    &[ResourceKind::Jobs],
                    format!("YouTube processing started. Job ID: {}", submitted.job_id),
                )
                .await
            }
            Err(err) => {
                self.fail("youtube job", err, "Failed to start YouTube processing")
                    .await
            }
        }
    }

    /// Cancels an active job or removes a finished one; the server decides.
    pub async fn cancel_job(&self, job_id: &str) -> MutationOutcome {
        self.confirm_then_perform(Action::CancelJob(job_id.to_string()))
            .await
    }

    async fn send_cancel_job(&self, job_id: &str) -> MutationOutcome {
        if job_id.trim().is_empty() {
            return self.invalid("cancel job", "job id is empty");
        }

        match self.console.api.cancel_job(job_id).await {
            Ok(()) => {
                log_info!("cancelled job {job_id}");
                self.succeed(&[ResourceKind::Jobs], "Job cancelled".into())
                    .await
            }
            Err(err) => self.fail("cancel job", err, "Failed to cancel job").await,
        }
    }
}
