pub mod codec;
pub mod hydrate;
pub mod request;
pub mod signup;

use anyhow::{anyhow, Result};
use reqwest::{Client, RequestBuilder};
use tracing::debug;
use url::Url;

pub static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

/// Current identity lookup, returns the session user as JSON.
pub const WHOAMI_PATH: &str = "/api/users/whoami";

/// Sign-up submission, accepts a binary-encoded credentials message.
pub const SIGNUP_PATH: &str = "/api/users/signup";

/// Server-side session termination.
pub const SIGNOUT_PATH: &str = "/api/users/signout";

/// Transport context bound to one page navigation: the API base URL plus the
/// session cookie to forward. The cookie is forwarded verbatim and never
/// mutated by the client.
#[derive(Debug, Clone)]
pub struct NavigationContext {
    base_url: String,
    cookie: Option<String>,
}

impl NavigationContext {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            cookie: None,
        }
    }

    #[must_use]
    pub fn with_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.cookie = Some(cookie.into());
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    /// Resolve an endpoint path against the base URL.
    /// # Errors
    /// Returns an error if the base URL cannot be parsed, has no host, or
    /// uses an unsupported scheme.
    pub fn endpoint_url(&self, path: &str) -> Result<String> {
        let url = Url::parse(&self.base_url)?;

        let scheme = url.scheme();

        let host = url
            .host()
            .ok_or_else(|| anyhow!("Error parsing URL: no host specified"))?
            .to_owned();

        let port = match url.port() {
            Some(p) => p,
            None => match scheme {
                "http" => 80,
                "https" => 443,
                _ => return Err(anyhow!("Error parsing URL: unsupported scheme {scheme}")),
            },
        };

        let endpoint_url = format!("{scheme}://{host}:{port}{path}");

        debug!("endpoint URL: {}", endpoint_url);

        Ok(endpoint_url)
    }

    pub(crate) fn http_client(&self) -> Result<Client> {
        Ok(Client::builder().user_agent(APP_USER_AGENT).build()?)
    }

    /// Attach the navigation cookie to an outgoing request, if present.
    pub(crate) fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.cookie {
            Some(cookie) => request.header(reqwest::header::COOKIE, cookie),
            None => request,
        }
    }
}
