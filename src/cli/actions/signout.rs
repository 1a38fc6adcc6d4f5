use crate::cli::globals::GlobalArgs;
use crate::client::{
    request::{Method, RequestDescriptor, RequestExecutor},
    SIGNOUT_PATH,
};
use anyhow::{anyhow, Result};

/// Handle the signout action: terminate the server-side session and return
/// to the root on success. Executor failures surface as the exit error.
pub async fn handle(globals: &GlobalArgs) -> Result<()> {
    let ctx = globals.navigation_context();

    println!("Signing out");

    let mut executor =
        RequestExecutor::new(ctx, RequestDescriptor::new(SIGNOUT_PATH, Method::Get))
            .on_success(|_| println!("Signed out, returning to /"));

    executor.trigger().await;

    if let Some(alert) = executor.errors() {
        return Err(anyhow!("{alert}"));
    }

    Ok(())
}
