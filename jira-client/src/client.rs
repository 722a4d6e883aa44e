use std::sync::Arc;

use reqwest::{Client, StatusCode, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::config::{Credentials, JiraConfig};
use crate::error::{Error, Result};
use crate::models::UnresolvedIssueCount;
use crate::operation::Operation;
use crate::request::RequestDescriptor;
use crate::session::SessionManager;

/// JIRA client that logs in before every call and replays the session
/// cookies on the call itself.
///
/// Clones share one session; calls on the same session run one at a time.
#[derive(Debug, Clone)]
pub struct JiraClient {
    config: Arc<JiraConfig>,
    sessions: Arc<SessionManager>,
}

impl JiraClient {
    pub fn new(config: JiraConfig, credentials: Credentials) -> Result<Self> {
        config.validate()?;

        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::InvalidConfiguration(format!("Failed to build HTTP client: {}", e)))?;

        let base_url = config.base_url()?;

        Ok(Self {
            config: Arc::new(config),
            sessions: Arc::new(SessionManager::new(client, base_url, credentials)),
        })
    }

    pub fn config(&self) -> &JiraConfig {
        &self.config
    }

    /// Log in without issuing a data request.
    pub async fn login(&self) -> Result<()> {
        self.sessions.login().await
    }

    /// Cookies stored by the most recent successful login.
    pub async fn session_tokens(&self) -> Vec<String> {
        self.sessions.current().await.tokens().to_vec()
    }

    /// Fetch an issue and return the document exactly as JIRA sent it.
    #[instrument(skip(self))]
    pub async fn get_issue(&self, issue_number: &str) -> Result<serde_json::Value> {
        let body = self.dispatch(Operation::GetIssue, Some(issue_number), None).await?;
        parse_body(Operation::GetIssue, &body)
    }

    #[instrument(skip(self))]
    pub async fn get_unresolved_issue_count(&self, version: &str) -> Result<u64> {
        let body = self
            .dispatch(Operation::GetUnresolvedIssueCount, Some(version), None)
            .await?;
        let count: UnresolvedIssueCount = parse_body(Operation::GetUnresolvedIssueCount, &body)?;
        Ok(count.issues_unresolved_count)
    }

    /// Fetch a project and return the document exactly as JIRA sent it.
    #[instrument(skip(self))]
    pub async fn get_project(&self, project_key: &str) -> Result<serde_json::Value> {
        let body = self.dispatch(Operation::GetProject, Some(project_key), None).await?;
        parse_body(Operation::GetProject, &body)
    }

    /// Link two issues. Usually called with [`crate::models::IssueLink`].
    #[instrument(skip(self, link))]
    pub async fn link_issues<B>(&self, link: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let body = to_document(Operation::LinkIssues, link)?;
        self.dispatch(Operation::LinkIssues, None, Some(body)).await?;
        Ok(())
    }

    /// Create an issue through the `issue` collection resource. The target
    /// project comes from the document itself.
    #[instrument(skip(self, issue))]
    pub async fn create_issue<B>(&self, issue: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let body = to_document(Operation::CreateIssue, issue)?;
        self.dispatch(Operation::CreateIssue, None, Some(body)).await?;
        Ok(())
    }

    /// Create an issue by posting to `issue/{target_key}`.
    #[instrument(skip(self, issue))]
    pub async fn create_issue_at<B>(&self, target_key: &str, issue: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let body = to_document(Operation::CreateIssue, issue)?;
        self.dispatch(Operation::CreateIssue, Some(target_key), Some(body))
            .await?;
        Ok(())
    }

    #[instrument(skip(self, update))]
    pub async fn update_issue<B>(&self, issue_key: &str, update: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let body = to_document(Operation::UpdateIssue, update)?;
        self.dispatch(Operation::UpdateIssue, Some(issue_key), Some(body))
            .await?;
        Ok(())
    }

    /// Log in, send one request under the fresh session and return the raw
    /// body of a 200 response. The session stays locked until the response
    /// body has been read.
    async fn dispatch(
        &self,
        operation: Operation,
        target: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> Result<Vec<u8>> {
        if target.is_some_and(|t| t.trim().is_empty()) {
            return Err(Error::InvalidInput {
                operation,
                reason: format!("{} must not be empty", operation.missing_entity()),
            });
        }

        let session = self.sessions.authenticate().await?;

        let path = format!(
            "{}{}",
            self.config.api_root(),
            operation.resource_path(target)
        );
        let mut descriptor = RequestDescriptor::new(operation, path);
        if let Some(body) = body {
            descriptor = descriptor.with_body(body);
        }
        session.attach(&mut descriptor)?;

        let response = descriptor
            .send(self.sessions.client(), self.sessions.base_url())
            .await?;

        match response.status() {
            StatusCode::OK => {
                let body = response
                    .bytes()
                    .await
                    .map_err(|source| Error::Transport { operation, source })?;
                debug!(%operation, bytes = body.len(), "Request succeeded");
                Ok(body.to_vec())
            }
            StatusCode::NOT_FOUND => {
                warn!(%operation, key = target.unwrap_or_default(), "JIRA answered 404");
                Err(Error::NotFound {
                    entity: operation.missing_entity(),
                    operation,
                    target: target.map(str::to_string),
                })
            }
            status => {
                warn!(%operation, status = status.as_u16(), "Unexpected status from JIRA");
                Err(Error::UnexpectedStatus {
                    status: status.as_u16(),
                    operation,
                })
            }
        }
    }
}

fn to_document<B>(operation: Operation, document: &B) -> Result<serde_json::Value>
where
    B: Serialize + ?Sized,
{
    serde_json::to_value(document).map_err(|e| Error::InvalidDocument {
        operation,
        reason: e.to_string(),
    })
}

fn parse_body<T: DeserializeOwned>(operation: Operation, body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| Error::MalformedResponse {
        operation,
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Scheme;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(mock_server: &MockServer) -> JiraClient {
        let address = mock_server.address();
        let config =
            JiraConfig::new(Scheme::Http, address.ip().to_string(), address.port(), "2").unwrap();
        JiraClient::new(config, Credentials::new("test", "test_password")).unwrap()
    }

    async fn mount_login(mock_server: &MockServer, cookie: &str) {
        Mock::given(method("POST"))
            .and(path("/rest/auth/1/session"))
            .and(body_json(json!({"username": "test", "password": "test_password"})))
            .respond_with(ResponseTemplate::new(200).insert_header("Set-Cookie", cookie))
            .mount(mock_server)
            .await;
    }

    #[test]
    fn test_jira_client_new() {
        let config = JiraConfig::new(Scheme::Https, "jira.example.com", 443, "2").unwrap();
        let client = JiraClient::new(config, Credentials::new("test", "secret")).unwrap();

        assert_eq!(client.config().host, "jira.example.com");
        assert_eq!(client.config().api_version, "2");
    }

    #[test]
    fn test_jira_client_new_validates_deserialized_config() {
        let config: JiraConfig = serde_json::from_value(json!({
            "scheme": "http",
            "host": "localhost",
            "port": 8080,
            "api_version": "2",
            "timeout_ms": 0
        }))
        .unwrap();

        let result = JiraClient::new(config, Credentials::new("test", "secret"));

        assert!(matches!(result, Err(Error::InvalidConfiguration(_))));
    }

    #[test]
    fn test_parse_body_reports_malformed_json() {
        let result: Result<serde_json::Value> = parse_body(Operation::GetIssue, b"<html>");
        match result.unwrap_err() {
            Error::MalformedResponse { operation, .. } => {
                assert_eq!(operation, Operation::GetIssue)
            }
            other => panic!("Expected MalformedResponse, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_get_issue_sends_session_cookie() {
        let mock_server = MockServer::start().await;
        mount_login(&mock_server, "JSESSIONID=abc123; Path=/").await;

        let issue = json!({
            "id": "10000",
            "key": "TT-3",
            "fields": { "summary": "Broken link", "customfield_10001": 5 }
        });
        Mock::given(method("GET"))
            .and(path("/rest/api/2/issue/TT-3"))
            .and(header("Cookie", "JSESSIONID=abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&issue))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;
        let result = client.get_issue("TT-3").await.unwrap();

        assert_eq!(result, issue);
        assert_eq!(client.session_tokens().await, vec!["JSESSIONID=abc123".to_string()]);
    }

    #[tokio::test]
    async fn test_get_unresolved_issue_count_extracts_field() {
        let mock_server = MockServer::start().await;
        mount_login(&mock_server, "JSESSIONID=abc123").await;

        Mock::given(method("GET"))
            .and(path("/rest/api/2/version/10001/unresolvedIssueCount"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "self": "http://localhost/rest/api/2/version/10001",
                "issuesUnresolvedCount": 7
            })))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;
        assert_eq!(client.get_unresolved_issue_count("10001").await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_update_issue_not_found() {
        let mock_server = MockServer::start().await;
        mount_login(&mock_server, "JSESSIONID=abc123").await;

        Mock::given(method("PUT"))
            .and(path("/rest/api/2/issue/NOPE-1"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server).await;
        let err = client
            .update_issue("NOPE-1", &json!({"fields": {"summary": "x"}}))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Invalid project during updateIssue: NOPE-1");
    }

    #[tokio::test]
    async fn test_empty_identifiers_are_rejected_before_login() {
        let mock_server = MockServer::start().await;
        mount_login(&mock_server, "JSESSIONID=abc123").await;
        let client = client_for(&mock_server).await;

        match client.get_project("").await.unwrap_err() {
            Error::InvalidInput { operation, .. } => assert_eq!(operation, Operation::GetProject),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
        assert!(client.get_issue("  ").await.is_err());
        assert!(client.get_unresolved_issue_count("").await.is_err());
        assert!(client.update_issue("", &json!({"fields": {}})).await.is_err());
        match client
            .create_issue_at("", &json!({"fields": {"summary": "x"}}))
            .await
            .unwrap_err()
        {
            Error::InvalidInput { operation, .. } => assert_eq!(operation, Operation::CreateIssue),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }

        assert!(mock_server.received_requests().await.unwrap().is_empty());
    }
}
