use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Stream {
    pub stream_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rtsp_url: Option<String>,
    #[serde(default)]
    pub fps: f64,
    #[serde(default)]
    pub frame_count: u64,
}

impl Stream {
    /// MJPEG endpoint opened as a separate viewing target.
    pub fn view_segments(&self) -> [&str; 5] {
        ["api", "rtsp", "streams", &self.stream_id, "mjpeg"]
    }
}

/// Body of `POST /api/rtsp/streams`.
#[derive(Debug, Clone, Serialize)]
pub struct NewStream {
    pub stream_id: String,
    pub rtsp_url: String,
}
