//! Maps validated CLI matches to the action the binary runs.

use crate::cli::{
    actions::{login, logout, register, routes, whoami, Action},
    globals::GlobalArgs,
};
use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;
use secrecy::SecretString;

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if the subcommand or one of its required arguments is missing.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    let globals = GlobalArgs::parse(matches);

    match matches.subcommand() {
        Some(("login", sub_m)) => Ok(Action::Login(login::Args {
            globals,
            email: required(sub_m, "email")?,
            password: secret(sub_m, "password")?,
        })),
        Some(("register", sub_m)) => Ok(Action::Register(register::Args {
            globals,
            name: required(sub_m, "name")?,
            email: required(sub_m, "email")?,
            password: secret(sub_m, "password")?,
            confirm_password: secret(sub_m, "confirm-password")?,
            require_verification: sub_m.get_flag("require-verification"),
        })),
        Some(("logout", _)) => Ok(Action::Logout(logout::Args { globals })),
        Some(("whoami", _)) => Ok(Action::Whoami(whoami::Args { globals })),
        Some(("routes", sub_m)) => Ok(Action::Routes(routes::Args {
            path: sub_m.get_one::<String>("path").cloned(),
        })),
        Some((name, _)) => Err(anyhow!("unknown subcommand: {name}")),
        None => Err(anyhow!("missing subcommand")),
    }
}

fn required(matches: &ArgMatches, id: &str) -> Result<String> {
    matches
        .get_one::<String>(id)
        .cloned()
        .with_context(|| format!("missing required argument: --{id}"))
}

fn secret(matches: &ArgMatches, id: &str) -> Result<SecretString> {
    required(matches, id).map(SecretString::from)
}
