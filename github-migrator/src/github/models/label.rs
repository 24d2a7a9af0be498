//! Labels.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    #[serde(default)]
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub default: bool,
}

/// Body of label create and update requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelParams {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub color: String,
}

impl From<&Label> for LabelParams {
    fn from(label: &Label) -> Self {
        Self {
            name: label.name.clone(),
            description: label.description.clone(),
            color: label.color.clone(),
        }
    }
}
