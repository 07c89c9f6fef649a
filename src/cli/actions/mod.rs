pub mod login;
pub mod logout;
pub mod register;
pub mod routes;
pub mod whoami;

// Internal "interpreter" for `Action`.
mod run;

use crate::{
    forms::{alert_message, SubmitOutcome},
    validation::{fields, FieldErrors},
};
use anyhow::{anyhow, Result};

#[derive(Debug)]
pub enum Action {
    Login(login::Args),
    Register(register::Args),
    Logout(logout::Args),
    Whoami(whoami::Args),
    Routes(routes::Args),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> Result<()> {
        run::execute(self).await
    }
}

/// Turns a form outcome into the line printed for the user, or the error the
/// command exits with.
pub(crate) fn report(outcome: SubmitOutcome) -> Result<String> {
    match outcome {
        SubmitOutcome::Succeeded { user, location } => Ok(format!(
            "Signed in as {} <{}>, continuing to {location}",
            user.name, user.email
        )),
        SubmitOutcome::VerificationRequested(request) => {
            Ok(format!("Verification requested for {}", request.email))
        }
        SubmitOutcome::Invalid(errors) => Err(anyhow!(describe_errors(&errors))),
        SubmitOutcome::Failed(err) => Err(anyhow!(alert_message(&err))),
        SubmitOutcome::Rejected => Err(anyhow!("a submission is already in progress")),
    }
}

fn describe_errors(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, message)| {
            let label = fields::label(field).map_or(field, |(label, _)| label);
            format!("{label}: {message}")
        })
        .collect::<Vec<_>>()
        .join("; ")
}
