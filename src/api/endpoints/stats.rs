use crate::{
    api::{ApiClient, ApiError, ApiRequest},
    models::Stats,
};

impl ApiClient {
    pub async fn fetch_stats(&self) -> Result<Stats, ApiError> {
        self.fetch_json(ApiRequest::get(&["api", "stats"])).await
    }
}
