use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FaceRecognition {
    #[serde(default)]
    pub person_id: Option<i64>,
    #[serde(default)]
    pub person_name: Option<String>,
    pub confidence: f64,
}

/// Response of `POST /api/recognition/recognize-image`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecognitionResult {
    pub faces_detected: u32,
    #[serde(default)]
    pub recognitions: Vec<FaceRecognition>,
}

/// Response of `POST /api/persons/{id}/upload-images`.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadImagesResult {
    pub message: String,
}
