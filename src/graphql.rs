// ABOUTME: Blocking GraphQL client for the Wiki.js API
// ABOUTME: Handles bearer auth, envelope parsing, and first-error-wins failures

use crate::model::Envelope;
use crate::settings::Settings;
use crate::{Error, Result};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde_json::{json, Value};

/// Anything that can execute a GraphQL document and hand back `data`.
pub trait GraphQl {
    fn send(&self, query: &str, variables: Value) -> Result<Value>;
}

pub struct GraphQlClient {
    client: Client,
    settings: Settings,
}

impl GraphQlClient {
    pub fn new(settings: Settings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("wikipub/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(GraphQlClient { client, settings })
    }
}

impl GraphQl for GraphQlClient {
    fn send(&self, query: &str, variables: Value) -> Result<Value> {
        if !self.settings.is_configured() {
            return Err(Error::Configuration(
                "Configure the API URL and bearer token first (wikipub config set-url / set-token)"
                    .into(),
            ));
        }

        let response = self
            .client
            .post(&self.settings.api_url)
            .header("Authorization", format!("Bearer {}", self.settings.bearer_token))
            .header("Content-Type", "application/json")
            .json(&json!({ "query": query, "variables": variables }))
            .send()?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::debug!(status = status.as_u16(), "graphql request rejected");
            return Err(Error::Transport {
                status: status.as_u16(),
            });
        }

        let body = response.text()?;
        let envelope: Envelope = serde_json::from_str(&body).map_err(|e| {
            tracing::debug!(error = %e, "unparseable graphql response");
            Error::Parse(e)
        })?;

        into_data(envelope)
    }
}

pub(crate) fn into_data(envelope: Envelope) -> Result<Value> {
    if let Some(first) = envelope.errors.and_then(|errors| errors.into_iter().next()) {
        return Err(Error::Remote(first.message));
    }
    Ok(envelope.data.unwrap_or(Value::Null))
}
