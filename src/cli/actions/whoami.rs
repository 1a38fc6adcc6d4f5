use crate::cli::globals::GlobalArgs;
use crate::client::hydrate;
use anyhow::Result;
use tracing::debug;

/// Handle the whoami action: hydrate the session and greet accordingly.
pub async fn handle(globals: &GlobalArgs) -> Result<()> {
    let ctx = globals.navigation_context();

    let props = hydrate::hydrate(&ctx).await?;

    debug!("identity: {:?}", props.identity);

    if props.identity.is_signed_in() {
        println!("Welcome! You are signed in!");
    } else {
        println!("Welcome! Please sign in to continue.");
    }

    Ok(())
}
