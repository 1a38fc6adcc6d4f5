//! Sign-up submission: validate credentials, encode them against the
//! `signin.SignIn` schema and post the raw bytes to the auth service.
//!
//! The body is sent byte-for-byte as `application/octet-stream`; no JSON
//! transform is applied. Unlike executor-driven calls, a failure here is
//! returned to the caller directly.

use crate::client::{codec, codec::Credentials, NavigationContext, SIGNUP_PATH};
use anyhow::{anyhow, Result};
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use tracing::{debug, instrument};

pub fn valid_email(email: &str) -> bool {
    regex::Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").map_or(false, |re| re.is_match(email))
}

/// Submit a sign-up request.
///
/// # Errors
/// Returns an error if the email address is malformed, if the credentials
/// fail schema validation (no bytes leave the client in that case), or if
/// the server rejects the submission.
#[instrument(skip(ctx, creds), fields(username = %creds.username))]
pub async fn submit(ctx: &NavigationContext, creds: &Credentials) -> Result<()> {
    if !valid_email(&creds.username) {
        return Err(anyhow!("invalid email address: {}", creds.username));
    }

    let payload = codec::encode_credentials(creds)?;

    let client = ctx.http_client()?;

    let signup_url = ctx.endpoint_url(SIGNUP_PATH)?;

    let response = ctx
        .apply(client.post(&signup_url))
        .header(CONTENT_TYPE, "application/octet-stream")
        .body(payload)
        .send()
        .await?;

    let status = response.status();

    if !status.is_success() {
        let json_response: Value = response.json().await.unwrap_or_default();

        return Err(anyhow!(
            "{} - {}, {}",
            signup_url,
            status,
            json_response["error"].as_str().unwrap_or("signup failed")
        ));
    }

    debug!("{} - {}", signup_url, status);

    Ok(())
}
