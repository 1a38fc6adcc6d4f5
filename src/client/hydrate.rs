//! Page-bootstrap session hydration.
//!
//! Before a page is shown, the current identity is fetched from the auth
//! service and merged with the page's own initial data into [`PageProps`].
//! Identity is re-derived from the server on every navigation, nothing is
//! persisted client-side.

use crate::client::{NavigationContext, WHOAMI_PATH};
use anyhow::{anyhow, Result};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::future::Future;
use tracing::{debug, instrument};

/// Identity of the current session as reported by the auth service.
///
/// An empty object is the valid "no one signed in" state, not an error.
/// Server-supplied fields beyond `email` (e.g. a user id) are carried
/// through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionIdentity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SessionIdentity {
    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.email.is_some()
    }
}

/// Merged props handed to the rendered page: the page's own initial data
/// under the `pageProps` key, identity fields spread alongside it. The
/// container key keeps the two field sets disjoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageProps {
    #[serde(rename = "pageProps")]
    pub page_props: Value,
    #[serde(flatten)]
    pub identity: SessionIdentity,
}

/// Hydrate a page that declares no initial-data provider of its own.
///
/// # Errors
/// Returns an error if the identity lookup fails (see [`hydrate_with`]).
pub async fn hydrate(ctx: &NavigationContext) -> Result<PageProps> {
    let identity = fetch_identity(ctx).await?;

    Ok(PageProps {
        page_props: Value::Object(Map::new()),
        identity,
    })
}

/// Hydrate a page with its own initial-data provider. The provider receives
/// the same navigation context so server calls it makes carry the same
/// credentials as the page load itself. The identity lookup and the page
/// fetch are independent and run concurrently; only the merged shape is
/// guaranteed.
///
/// # Errors
/// Returns an error if the identity lookup fails with anything other than
/// "no session", or if the page's own provider fails. A failed bootstrap is
/// fatal for the page load rather than rendering with undefined identity.
pub async fn hydrate_with<F, Fut>(ctx: &NavigationContext, page_data: F) -> Result<PageProps>
where
    F: FnOnce(NavigationContext) -> Fut,
    Fut: Future<Output = Result<Value>>,
{
    let (identity, page_props) = tokio::try_join!(fetch_identity(ctx), page_data(ctx.clone()))?;

    Ok(PageProps {
        page_props,
        identity,
    })
}

/// Look up the current identity, forwarding the navigation cookie verbatim.
/// A 401 means no session and degrades to the anonymous identity.
#[instrument(skip(ctx))]
async fn fetch_identity(ctx: &NavigationContext) -> Result<SessionIdentity> {
    let client = ctx.http_client()?;

    let whoami_url = ctx.endpoint_url(WHOAMI_PATH)?;

    let response = ctx.apply(client.get(&whoami_url)).send().await?;

    let status = response.status();

    if status == StatusCode::UNAUTHORIZED {
        debug!("no session, hydrating as anonymous");
        return Ok(SessionIdentity::default());
    }

    if !status.is_success() {
        let json_response: Value = response.json().await.unwrap_or_default();

        return Err(anyhow!(
            "{} - {}, {}",
            whoami_url,
            status,
            json_response["error"].as_str().unwrap_or("")
        ));
    }

    Ok(response.json().await?)
}
