use std::fmt;

use reqwest::Method;

/// Path of the session resource used by the login exchange.
pub const SESSION_PATH: &str = "rest/auth/1/session";

/// The fixed set of calls the client makes against JIRA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Login,
    GetIssue,
    GetUnresolvedIssueCount,
    GetProject,
    LinkIssues,
    CreateIssue,
    UpdateIssue,
}

/// Kind of entity reported missing when JIRA answers 404.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    IssueNumber,
    Version,
    Project,
}

impl Operation {
    pub fn name(self) -> &'static str {
        match self {
            Operation::Login => "login",
            Operation::GetIssue => "getIssue",
            Operation::GetUnresolvedIssueCount => "getUnresolvedIssueCount",
            Operation::GetProject => "getProject",
            Operation::LinkIssues => "issueLink",
            Operation::CreateIssue => "createIssue",
            Operation::UpdateIssue => "updateIssue",
        }
    }

    pub fn method(self) -> Method {
        match self {
            Operation::Login | Operation::LinkIssues | Operation::CreateIssue => Method::POST,
            Operation::UpdateIssue => Method::PUT,
            Operation::GetIssue | Operation::GetUnresolvedIssueCount | Operation::GetProject => {
                Method::GET
            }
        }
    }

    /// Entity named in the 404 message. Mutating calls report the project,
    /// as JIRA rejects them with 404 when the target project is unknown.
    pub fn missing_entity(self) -> EntityKind {
        match self {
            Operation::GetIssue => EntityKind::IssueNumber,
            Operation::GetUnresolvedIssueCount => EntityKind::Version,
            _ => EntityKind::Project,
        }
    }

    /// Resource path below `rest/api/{version}`, with `target` encoded as a
    /// single path segment.
    pub(crate) fn resource_path(self, target: Option<&str>) -> String {
        let segment = target
            .map(|t| urlencoding::encode(t).into_owned())
            .unwrap_or_default();
        match self {
            Operation::Login => String::new(),
            Operation::GetIssue | Operation::UpdateIssue => format!("/issue/{}", segment),
            Operation::CreateIssue if segment.is_empty() => "/issue".to_string(),
            Operation::CreateIssue => format!("/issue/{}", segment),
            Operation::GetUnresolvedIssueCount => {
                format!("/version/{}/unresolvedIssueCount", segment)
            }
            Operation::GetProject => format!("/project/{}", segment),
            Operation::LinkIssues => "/issueLink".to_string(),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityKind::IssueNumber => "issue number",
            EntityKind::Version => "version",
            EntityKind::Project => "project",
        })
    }
}
