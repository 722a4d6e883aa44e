use serde::{Deserialize, Serialize};

/// Body of the `createIssue` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateIssue {
    pub fields: NewIssueFields,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewIssueFields {
    pub project: ProjectRef,
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "issuetype")]
    pub issue_type: IssueTypeRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRef {
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueTypeRef {
    pub name: String,
}

impl CreateIssue {
    pub fn new(
        project_key: impl Into<String>,
        issue_type: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            fields: NewIssueFields {
                project: ProjectRef {
                    key: project_key.into(),
                },
                summary: summary.into(),
                description: None,
                issue_type: IssueTypeRef {
                    name: issue_type.into(),
                },
            },
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.fields.description = Some(description.into());
        self
    }

    pub fn project_key(&self) -> &str {
        &self.fields.project.key
    }
}

/// Partial update for the `updateIssue` call. `fields` sets values outright,
/// `update` carries JIRA's verb-style operations (`add`, `set`, `remove`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UpdateIssue {
    #[serde(skip_serializing_if = "serde_json::Map::is_empty", default)]
    pub fields: serde_json::Map<String, serde_json::Value>,
    #[serde(skip_serializing_if = "serde_json::Map::is_empty", default)]
    pub update: serde_json::Map<String, serde_json::Value>,
}

impl UpdateIssue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_field(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    pub fn operation(mut self, name: impl Into<String>, operations: serde_json::Value) -> Self {
        self.update.insert(name.into(), operations);
        self
    }

    pub fn summary(self, summary: impl Into<String>) -> Self {
        self.set_field("summary", serde_json::Value::String(summary.into()))
    }

    pub fn description(self, description: impl Into<String>) -> Self {
        self.set_field("description", serde_json::Value::String(description.into()))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.update.is_empty()
    }
}
