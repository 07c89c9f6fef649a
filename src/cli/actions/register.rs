use crate::{
    app::App,
    cli::{actions::report, globals::GlobalArgs},
    forms::SubmitOutcome,
};
use anyhow::{bail, Context, Result};
use secrecy::SecretString;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, instrument};

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub name: String,
    pub email: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
    pub require_verification: bool,
}

/// Execute the register action. With `require_verification` the account is
/// only created after the user confirms on stdin that the address is verified.
/// # Errors
/// Returns an error if the values fail validation, stdin closes before the
/// confirmation, or the backend rejects the registration.
#[instrument(skip_all)]
pub async fn execute(args: Args) -> Result<()> {
    let app = App::new(args.globals.config())?;

    let mut form = if args.require_verification {
        app.register_form_with_verification(false, |request| {
            println!("Verify {} and press Enter to continue", request.email);
        })
    } else {
        app.register_form()
    };
    form.set_full_name(&args.name);
    form.set_email(&args.email);
    form.set_password(args.password);
    form.set_confirm_password(args.confirm_password);

    let outcome = match form.submit().await {
        SubmitOutcome::VerificationRequested(_) => {
            wait_for_confirmation().await?;
            debug!("email confirmed on stdin");
            match form.confirm_verified().await {
                Some(outcome) => outcome,
                None => bail!("registration was not waiting for verification"),
            }
        }
        outcome => outcome,
    };

    let message = report(outcome)?;
    println!("{message}");

    Ok(())
}

async fn wait_for_confirmation() -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    lines
        .next_line()
        .await
        .context("failed to read confirmation from stdin")?
        .map(|_| ())
        .context("stdin closed before the email was verified")
}
