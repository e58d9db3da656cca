use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Person {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Body of `POST /api/persons/`.
#[derive(Debug, Clone, Serialize)]
pub struct NewPerson {
    pub name: String,
    pub description: Option<String>,
}

impl NewPerson {
    /// Empty descriptions are sent as `null`, the name is trimmed.
    pub fn new(name: &str, description: &str) -> Self {
        let description = description.trim();
        Self {
            name: name.trim().to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
        }
    }
}
