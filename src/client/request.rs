//! Generic request execution with absorbed failures.
//!
//! A [`RequestExecutor`] owns the error state for one logical form/action.
//! Triggering it never returns an `Err`: failures are normalized into a
//! renderable [`ErrorAlert`] that the caller inspects, mirroring how the
//! auth views display a list of server messages instead of catching
//! exceptions.

use crate::client::NavigationContext;
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use tracing::{debug, error, instrument};

/// Fallback shown when a failure response violates the `{error: string}`
/// body contract.
pub const FALLBACK_ERROR_MESSAGE: &str = "something went wrong";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Immutable description of one call: endpoint path, method and optional
/// JSON body.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub endpoint: String,
    pub method: Method,
    pub body: Option<Value>,
}

impl RequestDescriptor {
    #[must_use]
    pub fn new(endpoint: impl Into<String>, method: Method) -> Self {
        Self {
            endpoint: endpoint.into(),
            method,
            body: None,
        }
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Renderable failure description: an ordered list of one or more messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorAlert {
    pub messages: Vec<String>,
}

impl ErrorAlert {
    #[must_use]
    pub fn from_message(message: impl Into<String>) -> Self {
        Self {
            messages: vec![message.into()],
        }
    }
}

impl fmt::Display for ErrorAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Ooops....")?;
        for message in &self.messages {
            writeln!(f, "  - {message}")?;
        }
        Ok(())
    }
}

type SuccessHook = Box<dyn Fn(&Value) + Send + Sync>;

/// One execution context per logical action: descriptor, optional success
/// hook, and the owned error state.
pub struct RequestExecutor {
    ctx: NavigationContext,
    descriptor: RequestDescriptor,
    on_success: Option<SuccessHook>,
    errors: Option<ErrorAlert>,
}

impl RequestExecutor {
    #[must_use]
    pub fn new(ctx: NavigationContext, descriptor: RequestDescriptor) -> Self {
        Self {
            ctx,
            descriptor,
            on_success: None,
            errors: None,
        }
    }

    /// Register a hook invoked with the response payload on success, before
    /// the trigger resolves.
    #[must_use]
    pub fn on_success(mut self, hook: impl Fn(&Value) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Box::new(hook));
        self
    }

    /// Current error state; `None` until a trigger fails.
    #[must_use]
    pub fn errors(&self) -> Option<&ErrorAlert> {
        self.errors.as_ref()
    }

    /// Perform the described call. Clears the error state first, then either
    /// resolves with the response payload (after invoking the success hook)
    /// or absorbs the failure into [`Self::errors`] and resolves with `None`.
    #[instrument(skip(self), fields(endpoint = %self.descriptor.endpoint, method = ?self.descriptor.method))]
    pub async fn trigger(&mut self) -> Option<Value> {
        self.errors = None;

        match self.perform().await {
            Ok(data) => {
                if let Some(hook) = &self.on_success {
                    hook(&data);
                }
                Some(data)
            }
            Err(alert) => {
                error!("request failed: {:?}", alert.messages);
                self.errors = Some(alert);
                None
            }
        }
    }

    async fn perform(&self) -> Result<Value, ErrorAlert> {
        let client = self
            .ctx
            .http_client()
            .map_err(|e| ErrorAlert::from_message(e.to_string()))?;

        let url = self
            .ctx
            .endpoint_url(&self.descriptor.endpoint)
            .map_err(|e| ErrorAlert::from_message(e.to_string()))?;

        let mut request = client.request(self.descriptor.method.as_reqwest(), &url);
        request = self.ctx.apply(request);

        if let Some(body) = &self.descriptor.body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ErrorAlert::from_message(format!("Unable to reach the server: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ErrorAlert::from_message(format!("Unable to read the response: {e}")))?;

        if !status.is_success() {
            // failure bodies carry `{error: string}`; anything else violates
            // the contract and maps to the fallback message
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .as_ref()
                .and_then(|body| body.get("error"))
                .and_then(Value::as_str)
                .map_or_else(|| FALLBACK_ERROR_MESSAGE.to_string(), ToString::to_string);

            return Err(ErrorAlert::from_message(message));
        }

        debug!("{} - {}", url, status);

        if text.is_empty() {
            return Ok(Value::Null);
        }

        // success bodies are JSON when the endpoint returns data, plain text
        // otherwise (e.g. "signup complete")
        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }
}
