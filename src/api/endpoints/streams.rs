use crate::{
    api::{ApiClient, ApiError, ApiRequest, RequestBody},
    models::{NewStream, Stream},
};

impl ApiClient {
    pub async fn list_streams(&self) -> Result<Vec<Stream>, ApiError> {
        self.fetch_json(ApiRequest::get(&["api", "rtsp", "streams"]))
            .await
    }

    pub async fn add_stream(&self, stream: &NewStream) -> Result<(), ApiError> {
        let body = serde_json::to_value(stream).map_err(|err| ApiError::Decode(err.to_string()))?;
        self.execute_unit(ApiRequest::post(&["api", "rtsp", "streams"]).body(RequestBody::Json(body)))
            .await
    }

    pub async fn remove_stream(&self, stream_id: &str) -> Result<(), ApiError> {
        self.execute_unit(ApiRequest::delete(&["api", "rtsp", "streams", stream_id]))
            .await
    }
}
