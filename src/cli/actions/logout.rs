use crate::{app::App, cli::globals::GlobalArgs};
use anyhow::Result;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
}

/// Execute the logout action. Logging out without a session is not an error.
/// # Errors
/// Returns an error if the config is invalid or the session file cannot be updated.
pub fn execute(args: &Args) -> Result<()> {
    let app = App::new(args.globals.config())?;
    app.logout()?;
    println!("Logged out");
    Ok(())
}
