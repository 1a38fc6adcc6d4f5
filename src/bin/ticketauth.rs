use anyhow::Result;
use ticketauth::cli::{actions, actions::Action, start};

// Main function
#[tokio::main]
async fn main() -> Result<()> {
    // Start the program
    let (action, globals) = start()?;

    // Handle the action
    match action {
        Action::Whoami => actions::whoami::handle(&globals).await?,
        Action::Signup { email, password } => {
            actions::signup::handle(&globals, email, password).await?;
        }
        Action::Signout => actions::signout::handle(&globals).await?,
    }

    Ok(())
}
