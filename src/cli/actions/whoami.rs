use crate::{app::App, cli::globals::GlobalArgs, session::User};
use anyhow::Result;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
}

/// Execute the whoami action.
/// # Errors
/// Returns an error if the config is invalid.
pub fn execute(args: &Args) -> Result<()> {
    let app = App::new(args.globals.config())?;
    println!("{}", describe(app.current_user().as_ref()));
    Ok(())
}

fn describe(user: Option<&User>) -> String {
    match user {
        Some(user) => format!("{} <{}> (id {})", user.name, user.email, user.id),
        None => "Not signed in".to_string(),
    }
}
