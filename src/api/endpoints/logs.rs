use crate::{
    api::{ApiClient, ApiError, ApiRequest},
    models::{LogEntry, LogPage},
};

impl ApiClient {
    /// Most recent detections, newest first, at most `limit` entries.
    pub async fn fetch_logs(&self, limit: u32) -> Result<Vec<LogEntry>, ApiError> {
        let page: LogPage = self
            .fetch_json(ApiRequest::get(&["api", "logs"]).query("limit", limit))
            .await?;
        Ok(page.logs)
    }
}

#[cfg(test)]
mod tests {
    use crate::api::{
        testing::{client, FakeTransport},
        Method,
    };

    #[tokio::test]
    async fn logs_are_limited_and_unwrapped() {
        let transport = FakeTransport::new();
        transport.respond(
            Method::Get,
            "/api/logs",
            200,
            r#"{"logs": [
                {"id": 7, "person_id": null, "person_name": "Unknown", "confidence": 0.41,
                 "source": "rtsp", "source_info": "cam1", "detected_at": "2024-05-01T09:30:00",
                 "bounding_box": null}
            ], "total": 120}"#,
        );

        let logs = client(&transport).fetch_logs(10).await.unwrap();

        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].source_info.as_deref(), Some("cam1"));
        let calls = transport.calls();
        assert_eq!(calls[0].query, vec![("limit".to_string(), "10".to_string())]);
    }
}
