pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod operation;
pub mod request;
pub mod session;

pub use client::JiraClient;
pub use config::{Credentials, JiraConfig, Scheme};
pub use error::{Error, Result};
pub use models::*;
pub use operation::{EntityKind, Operation};
pub use request::RequestDescriptor;
pub use session::{Session, SessionManager};
