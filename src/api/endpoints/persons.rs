use crate::{
    api::{ApiClient, ApiError, ApiRequest, FormField, RequestBody, UploadFile},
    models::{NewPerson, Person, UploadImagesResult},
};

impl ApiClient {
    pub async fn list_persons(&self) -> Result<Vec<Person>, ApiError> {
        self.fetch_json(ApiRequest::get(&["api", "persons", ""]))
            .await
    }

    pub async fn create_person(&self, person: &NewPerson) -> Result<(), ApiError> {
        let body = serde_json::to_value(person).map_err(|err| ApiError::Decode(err.to_string()))?;
        self.execute_unit(ApiRequest::post(&["api", "persons", ""]).body(RequestBody::Json(body)))
            .await
    }

    pub async fn delete_person(&self, person_id: i64) -> Result<(), ApiError> {
        let id = person_id.to_string();
        self.execute_unit(ApiRequest::delete(&["api", "persons", &id]))
            .await
    }

    /// Each file goes out as a repeated `files` part.
    pub async fn upload_images(
        &self,
        person_id: i64,
        files: &[UploadFile],
    ) -> Result<UploadImagesResult, ApiError> {
        let id = person_id.to_string();
        let fields = files
            .iter()
            .map(|file| FormField::file("files", file))
            .collect();

        self.fetch_json(
            ApiRequest::post(&["api", "persons", &id, "upload-images"])
                .body(RequestBody::Multipart(fields)),
        )
        .await
    }
}
