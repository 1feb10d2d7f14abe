use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_PROJECT_STEM;
use crate::error::ProjectError;
use crate::template::Design;

pub const PROJECT_VERSION: &str = "1.0";
const COMMENT_OPEN: &str = "<!--MUG_PAINTER_PROJECT_DATA:";
const COMMENT_CLOSE: &str = ":END_PROJECT_DATA-->";

/// Saved project: a name plus everything needed to regenerate the template.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub project_name: String,
    #[serde(flatten)]
    pub design: Design,
}

impl Default for ProjectRecord {
    fn default() -> Self {
        Self {
            version: PROJECT_VERSION.to_string(),
            timestamp: None,
            project_name: String::new(),
            design: Design::default(),
        }
    }
}

impl ProjectRecord {
    pub fn new(project_name: impl Into<String>, design: Design) -> Self {
        Self {
            project_name: project_name.into(),
            design,
            ..Self::default()
        }
    }

    pub fn to_json(&self) -> Result<String, ProjectError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, ProjectError> {
        Ok(serde_json::from_str(text)?)
    }

    /// File name stem: project name reduced to `[A-Za-z0-9_-]`.
    pub fn file_stem(&self) -> String {
        file_stem(&self.project_name)
    }
}

pub fn file_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect();
    if stem.is_empty() {
        DEFAULT_PROJECT_STEM.to_string()
    } else {
        stem
    }
}

/// Delimited base64 comment carrying the record, placed in front of the
/// download document.
pub fn metadata_comment(record: &ProjectRecord) -> Result<String, ProjectError> {
    let json = serde_json::to_string(record)?;
    Ok(format!("{COMMENT_OPEN}{}{COMMENT_CLOSE}", STANDARD.encode(json)))
}

/// Recovers a record embedded by [`metadata_comment`] anywhere in `text`.
pub fn parse_metadata_comment(text: &str) -> Result<ProjectRecord, ProjectError> {
    let start = text.find(COMMENT_OPEN).ok_or(ProjectError::MissingComment)? + COMMENT_OPEN.len();
    let len = text[start..]
        .find(COMMENT_CLOSE)
        .ok_or(ProjectError::MissingComment)?;
    let bytes = STANDARD.decode(text[start..start + len].trim())?;
    Ok(serde_json::from_slice(&bytes)?)
}
