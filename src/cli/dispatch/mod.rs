use crate::cli::{actions::Action, globals::GlobalArgs};
use anyhow::{anyhow, Context, Result};
use secrecy::SecretString;

/// Map parsed arguments to an action plus the global transport arguments.
/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<(Action, GlobalArgs)> {
    let api_url = matches
        .get_one::<String>("api-url")
        .cloned()
        .context("missing required argument: --api-url")?;

    let mut globals = GlobalArgs::new(api_url);

    if let Some(cookie) = matches.get_one::<String>("cookie") {
        globals.set_cookie(cookie.clone());
    }

    let action = match matches.subcommand() {
        Some(("whoami", _)) => Action::Whoami,
        Some(("signup", sub)) => Action::Signup {
            email: sub
                .get_one::<String>("email")
                .cloned()
                .context("missing required argument: --email")?,
            password: sub
                .get_one::<String>("password")
                .cloned()
                .map(SecretString::from)
                .context("missing required argument: --password")?,
        },
        Some(("signout", _)) => Action::Signout,
        _ => return Err(anyhow!("missing subcommand")),
    };

    Ok((action, globals))
}
