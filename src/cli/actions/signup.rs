use crate::cli::globals::GlobalArgs;
use crate::client::{codec::Credentials, signup};
use anyhow::Result;
use secrecy::SecretString;

/// Handle the signup action: validate, encode and submit the credentials.
pub async fn handle(globals: &GlobalArgs, email: String, password: SecretString) -> Result<()> {
    let ctx = globals.navigation_context();

    let creds = Credentials {
        username: email,
        password,
    };

    signup::submit(&ctx, &creds).await?;

    println!("signup complete");

    Ok(())
}
