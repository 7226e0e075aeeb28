//! reqwest-backed [`ChatTransport`]

use super::error::{HttpTransportError, Result};
use crate::config::FileEndpointConfig;
use async_trait::async_trait;
use campaign_chat_application::{ChatRequest, ChatResponse, ChatTransport, TransportError};
use futures::StreamExt;
use reqwest::{Client, Url, header};
use std::time::Duration;
use tracing::{debug, info};

/// Chat transport that POSTs to an HTTP endpoint and streams the body
pub struct HttpChatTransport {
    client: Client,
    endpoint: Url,
    auth_token: Option<String>,
    api_key: Option<String>,
}

impl HttpChatTransport {
    pub fn new(endpoint: &str, connect_timeout: Duration) -> Result<Self> {
        let endpoint = Url::parse(endpoint).map_err(|e| HttpTransportError::InvalidEndpoint {
            url: endpoint.to_string(),
            reason: e.to_string(),
        })?;

        // No overall timeout: replies stream for as long as the backend
        // keeps producing. Inactivity is bounded by the controller.
        let client = Client::builder()
            .connect_timeout(connect_timeout)
            .user_agent(concat!("campaign-chat/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(HttpTransportError::Client)?;

        Ok(Self {
            client,
            endpoint,
            auth_token: None,
            api_key: None,
        })
    }

    /// Build from the `[endpoint]` section, reading secrets from the environment.
    pub fn from_config(config: &FileEndpointConfig) -> Result<Self> {
        let transport = Self::new(
            &config.url,
            Duration::from_secs(config.connect_timeout_secs),
        )?
        .with_auth_token(config.auth_token())
        .with_api_key(config.api_key());

        info!(
            "HTTP transport: {} (auth: {}, apikey: {})",
            transport.endpoint(),
            transport.auth_token.is_some(),
            transport.api_key.is_some()
        );
        Ok(transport)
    }

    pub fn with_auth_token(mut self, token: Option<String>) -> Self {
        self.auth_token = token;
        self
    }

    pub fn with_api_key(mut self, key: Option<String>) -> Self {
        self.api_key = key;
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ChatTransport for HttpChatTransport {
    async fn open(
        &self,
        request: &ChatRequest,
    ) -> std::result::Result<ChatResponse, TransportError> {
        let mut req = self
            .client
            .post(self.endpoint.clone())
            .header(header::ACCEPT, "text/event-stream")
            .json(request);

        if let Some(token) = &self.auth_token {
            req = req.bearer_auth(token);
        }
        if let Some(key) = &self.api_key {
            req = req.header("apikey", key);
        }

        debug!("POST {} ({} messages)", self.endpoint, request.messages.len());
        let response = req.send().await.map_err(HttpTransportError::Request)?;

        let status = response.status().as_u16();
        debug!(
            "HTTP {} (content-length: {:?})",
            status,
            response.content_length()
        );

        let body = if response.content_length() == Some(0) {
            None
        } else {
            Some(
                response
                    .bytes_stream()
                    .map(|chunk| {
                        chunk
                            .map(|bytes| bytes.to_vec())
                            .map_err(|e| TransportError::Read(e.to_string()))
                    })
                    .boxed(),
            )
        };

        Ok(ChatResponse::new(status, body))
    }
}
