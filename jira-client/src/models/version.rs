use serde::{Deserialize, Serialize};

/// Response of `version/{id}/unresolvedIssueCount`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnresolvedIssueCount {
    #[serde(rename = "issuesUnresolvedCount")]
    pub issues_unresolved_count: u64,
    #[serde(rename = "self")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub self_url: Option<String>,
}
