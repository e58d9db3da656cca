use crate::{
    api::{ApiClient, ApiError, ApiRequest, FormField, RequestBody, UploadFile},
    models::RecognitionResult,
};

impl ApiClient {
    pub async fn recognize_image(&self, file: &UploadFile) -> Result<RecognitionResult, ApiError> {
        self.fetch_json(
            ApiRequest::post(&["api", "recognition", "recognize-image"])
                .body(RequestBody::Multipart(vec![FormField::file("file", file)])),
        )
        .await
    }
}
