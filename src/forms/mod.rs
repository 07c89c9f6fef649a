//! Login and registration forms. Each form holds its values, validates them
//! on submit, posts them through its own HTTP adapter and, on success, stores
//! the user in the session and navigates to the dashboard.
//!
//! Flow Overview: `Editing → Submitting → {Succeeded, Failed}`. A failed form
//! accepts input and can be submitted again; nothing is retried automatically.
//! The registration form can also park in `AwaitingVerification` until its
//! owner confirms the email address.
//!
//! A submission future borrows its form mutably, so a form cannot be dropped
//! while its request is pending without dropping the request too. A response
//! can therefore never land on a discarded form.

pub mod login;
pub mod register;

pub use login::LoginForm;
pub use register::{RegisterForm, VerificationRequest};

use crate::{
    api::AppError,
    routes::History,
    session::{AuthResponse, SessionStore, User},
    validation::FieldErrors,
};
use tokio::sync::watch;
use tracing::{debug, warn};

/// Path of the signed-in area.
pub const HOME_PATH: &str = "/";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormStatus {
    Editing,
    Submitting,
    AwaitingVerification,
    Succeeded,
    Failed(AppError),
}

impl FormStatus {
    /// Whether a new submission may start from this state.
    #[must_use]
    pub fn accepts_submit(&self) -> bool {
        !matches!(self, FormStatus::Submitting | FormStatus::Succeeded)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SubmitOutcome {
    /// Validation failed; the errors are also kept on the form.
    Invalid(FieldErrors),
    /// A submission is already running or the form already succeeded.
    Rejected,
    /// Registration is waiting for the owner to confirm the email.
    VerificationRequested(VerificationRequest),
    Succeeded { user: User, location: String },
    Failed(AppError),
}

/// How the form leaves the page after a successful submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Navigation {
    Push,
    Replace,
}

/// Marks a form as submitting. Dropped without `settle` (the submission
/// future was dropped mid-flight), it puts the form back into editing.
pub(crate) struct Pending<'a> {
    status: &'a watch::Sender<FormStatus>,
    settled: bool,
}

impl<'a> Pending<'a> {
    pub(crate) fn start(status: &'a watch::Sender<FormStatus>) -> Self {
        status.send_replace(FormStatus::Submitting);
        Self {
            status,
            settled: false,
        }
    }

    pub(crate) fn settle(mut self, outcome: &SubmitOutcome) {
        self.settled = true;
        let next = match outcome {
            SubmitOutcome::Succeeded { .. } => FormStatus::Succeeded,
            SubmitOutcome::Failed(err) => FormStatus::Failed(err.clone()),
            SubmitOutcome::VerificationRequested(_) => FormStatus::AwaitingVerification,
            SubmitOutcome::Invalid(_) | SubmitOutcome::Rejected => FormStatus::Editing,
        };
        self.status.send_replace(next);
    }
}

impl Drop for Pending<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.status.send_replace(FormStatus::Editing);
        }
    }
}

/// Adopts the user returned by an auth endpoint and navigates home.
pub(crate) fn complete(
    result: Result<AuthResponse, AppError>,
    session: &SessionStore,
    history: &History,
    navigation: Navigation,
) -> SubmitOutcome {
    let user = match result {
        Ok(AuthResponse { user: Some(user) }) => user,
        Ok(AuthResponse { user: None }) => {
            warn!("auth response did not include a user");
            return SubmitOutcome::Failed(AppError::Parse(
                "Response did not include a user.".to_string(),
            ));
        }
        Err(err) => return SubmitOutcome::Failed(err),
    };

    if let Err(err) = session.login(user.clone()) {
        return SubmitOutcome::Failed(AppError::Storage(format!("{err:#}")));
    }

    match navigation {
        Navigation::Push => history.push(HOME_PATH),
        Navigation::Replace => history.replace(HOME_PATH),
    }
    debug!(location = HOME_PATH, "submission succeeded");

    SubmitOutcome::Succeeded {
        user,
        location: HOME_PATH.to_string(),
    }
}

/// Text of the server error alert shown above a failed form.
#[must_use]
pub fn alert_message(err: &AppError) -> String {
    match err {
        AppError::Http { message, .. } => message.clone(),
        _ => err.to_string(),
    }
}
