//! Login exchange and the cookie-based session it establishes.

use reqwest::header::{self, HeaderMap};
use reqwest::{Client, StatusCode};
use tokio::sync::{Mutex, MutexGuard};
use tracing::{info, instrument, warn};
use url::Url;

use crate::config::Credentials;
use crate::error::{Error, Result};
use crate::operation::{Operation, SESSION_PATH};
use crate::request::RequestDescriptor;

/// Cookies handed out by the last successful login, in response order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    tokens: Vec<String>,
}

impl Session {
    pub fn new(tokens: Vec<String>) -> Self {
        Self { tokens }
    }

    /// Collect the `name=value` part of every `Set-Cookie` header.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let tokens = headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(|cookie| cookie.split(';').next())
            .map(str::trim)
            .filter(|pair| !pair.is_empty())
            .map(str::to_string)
            .collect();
        Self { tokens }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Tokens joined with `;`. Empty when there are none.
    pub fn cookie_header(&self) -> String {
        self.tokens.join(";")
    }

    pub fn attach(&self, descriptor: &mut RequestDescriptor) -> Result<()> {
        descriptor.set_cookie_header(&self.cookie_header())
    }
}

/// Owns the credentials and the shared session of one client.
///
/// The session lock is taken before login and handed back to the caller, so
/// a whole login-then-request sequence runs without interleaving.
#[derive(Debug)]
pub struct SessionManager {
    client: Client,
    base_url: Url,
    credentials: Credentials,
    session: Mutex<Session>,
}

impl SessionManager {
    pub fn new(client: Client, base_url: Url, credentials: Credentials) -> Self {
        Self {
            client,
            base_url,
            credentials,
            session: Mutex::new(Session::default()),
        }
    }

    /// Log in and return the locked, freshly replaced session.
    #[instrument(skip(self))]
    pub async fn authenticate(&self) -> Result<MutexGuard<'_, Session>> {
        let mut session = self.session.lock().await;
        info!("Attempting to log in to JIRA");

        let descriptor = RequestDescriptor::new(Operation::Login, SESSION_PATH)
            .with_body(self.credentials.login_body());
        let response = descriptor.send(&self.client, &self.base_url).await?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::UNAUTHORIZED => {
                warn!("JIRA rejected the credentials");
                return Err(Error::AuthenticationFailed);
            }
            status => {
                warn!(status = status.as_u16(), "Unexpected status during login");
                return Err(Error::UnexpectedStatus {
                    status: status.as_u16(),
                    operation: Operation::Login,
                });
            }
        }

        *session = Session::from_headers(response.headers());
        info!(cookies = session.tokens().len(), "Logged in to JIRA successfully");
        Ok(session)
    }

    pub async fn login(&self) -> Result<()> {
        self.authenticate().await.map(|_| ())
    }

    /// Snapshot of the current session.
    pub async fn current(&self) -> Session {
        self.session.lock().await.clone()
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}
