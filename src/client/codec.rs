//! Binary codec for the `signin.SignIn` credentials message.
//!
//! The schema is a byte-for-byte contract with the auth service: the server
//! decodes sign-up bodies with the same field names, types and tags. The
//! message is bound statically at compile time, there is no runtime schema
//! loading.

use prost::Message;
use secrecy::{ExposeSecret, SecretString};

/// Error returned by [`encode_credentials`] and [`decode_credentials`].
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// A required schema field is empty or absent.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    /// The raw bytes could not be decoded as a `signin.SignIn` message.
    #[error("failed to decode credentials: {0}")]
    Decode(#[from] prost::DecodeError),
}

/// Wire form of the shared `signin.SignIn` schema.
#[derive(Clone, PartialEq, Message)]
pub struct SignIn {
    #[prost(string, tag = "1")]
    pub username: String,
    #[prost(string, tag = "2")]
    pub password: String,
}

/// Application view of the credentials. The password stays behind `secrecy`
/// until the moment it is encoded onto the wire.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }
}

/// Validate credentials against the schema and encode them into protobuf bytes.
///
/// # Errors
///
/// Returns [`CodecError::MissingField`] if either required field is empty;
/// no bytes are produced in that case.
pub fn encode_credentials(creds: &Credentials) -> Result<Vec<u8>, CodecError> {
    if creds.username.is_empty() {
        return Err(CodecError::MissingField("username"));
    }
    if creds.password.expose_secret().is_empty() {
        return Err(CodecError::MissingField("password"));
    }

    let wire = SignIn {
        username: creds.username.clone(),
        password: creds.password.expose_secret().to_string(),
    };

    let mut out = Vec::with_capacity(wire.encoded_len());
    // Encoding into a Vec<u8> is infallible; the only error prost returns
    // here is `BufferTooSmall`, which cannot occur with a growable Vec.
    wire.encode(&mut out).unwrap_or_default();

    Ok(out)
}

/// Decode protobuf bytes into a `signin.SignIn` message.
///
/// Decoding is the server's job in the sign-up flow; this exists because the
/// schema is a shared contract and both directions must agree on it.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] for malformed bytes.
pub fn decode_credentials(bytes: &[u8]) -> Result<SignIn, CodecError> {
    Ok(SignIn::decode(bytes)?)
}
