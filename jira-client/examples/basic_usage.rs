/// Basic usage of the JIRA client
///
/// Logs in, reads an issue, a project and a version's unresolved count.
///
/// Set these before running (a `.env` file works too):
/// export JIRA_SCHEME=https
/// export JIRA_HOST=jira.example.com
/// export JIRA_PORT=443
/// export JIRA_API_VERSION=2
/// export JIRA_USER=your-user
/// export JIRA_PASSWORD=your-password
///
/// Optional: JIRA_ISSUE, JIRA_PROJECT, JIRA_VERSION, RUST_LOG
///
/// cargo run --example basic_usage
use dotenv::dotenv;
use std::env;
use tracing_subscriber::EnvFilter;

use jira_client::{Credentials, JiraClient, JiraConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("jira_client=info")),
        )
        .init();

    let config = JiraConfig::from_env()?;
    let credentials = Credentials::from_env()?;
    println!("Base URL: {}", config.base_url()?);
    println!("Username: {}", credentials.username());

    let client = JiraClient::new(config, credentials)?;

    let issue_key = env::var("JIRA_ISSUE").unwrap_or_else(|_| "TT-3".to_string());
    match client.get_issue(&issue_key).await {
        Ok(issue) => println!(
            "{}: {}",
            issue_key,
            issue["fields"]["summary"].as_str().unwrap_or("<no summary>")
        ),
        Err(e) => println!("Could not fetch {}: {}", issue_key, e),
    }

    let project_key = env::var("JIRA_PROJECT").unwrap_or_else(|_| "TTP".to_string());
    match client.get_project(&project_key).await {
        Ok(project) => println!(
            "Project {}: {}",
            project_key,
            project["name"].as_str().unwrap_or("<no name>")
        ),
        Err(e) => println!("Could not fetch project {}: {}", project_key, e),
    }

    if let Ok(version) = env::var("JIRA_VERSION") {
        let count = client.get_unresolved_issue_count(&version).await?;
        println!("Version {} has {} unresolved issues", version, count);
    }

    Ok(())
}
