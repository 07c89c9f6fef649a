//! Registration form. With email verification required, a valid submission
//! only reports the candidate email to the form's owner; the account is
//! created once the owner calls [`RegisterForm::confirm_verified`]. On success
//! the history entry is replaced with `/` so "back" does not return here.

use crate::{
    api::{use_client, FetchState, HttpClient},
    forms::{alert_message, complete, FormStatus, Navigation, Pending, SubmitOutcome},
    routes::{use_history, History},
    session::{client, use_auth, Context, RegisterRequest, SessionStore},
    validation::{validate_register, FieldErrors, RegisterValues},
};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, instrument};

/// Email handed to the owner when verification is required.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationRequest {
    pub email: String,
}

type OnSubmit = Box<dyn FnMut(VerificationRequest) + Send>;

pub struct RegisterForm {
    values: RegisterValues,
    errors: FieldErrors,
    status: watch::Sender<FormStatus>,
    client: HttpClient,
    session: Arc<SessionStore>,
    history: Arc<History>,
    mail_verified: bool,
    on_submit: Option<OnSubmit>,
}

impl RegisterForm {
    /// Builds a form that creates the account on the first valid submission.
    ///
    /// # Panics
    /// Panics if the context lacks the session store, HTTP adapter or history.
    #[must_use]
    pub fn new(context: &Context) -> Self {
        let (status, _) = watch::channel(FormStatus::Editing);
        Self {
            values: RegisterValues::default(),
            errors: FieldErrors::new(),
            status,
            client: use_client(context).fresh(),
            session: use_auth(context),
            history: use_history(context),
            mail_verified: true,
            on_submit: None,
        }
    }

    /// Builds a form gated on email verification: while `mail_verified` is
    /// false, valid submissions call `on_submit` instead of the backend.
    ///
    /// # Panics
    /// Panics if the context lacks the session store, HTTP adapter or history.
    pub fn with_verification(
        context: &Context,
        mail_verified: bool,
        on_submit: impl FnMut(VerificationRequest) + Send + 'static,
    ) -> Self {
        let mut form = Self::new(context);
        form.mail_verified = mail_verified;
        form.on_submit = Some(Box::new(on_submit));
        form
    }

    pub fn set_full_name(&mut self, full_name: &str) {
        self.values.full_name = full_name.to_string();
    }

    pub fn set_email(&mut self, email: &str) {
        self.values.email = email.to_string();
    }

    pub fn set_password(&mut self, password: SecretString) {
        self.values.password = password;
    }

    pub fn set_confirm_password(&mut self, confirm_password: SecretString) {
        self.values.confirm_password = confirm_password;
    }

    #[must_use]
    pub fn values(&self) -> &RegisterValues {
        &self.values
    }

    #[must_use]
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    #[must_use]
    pub fn status(&self) -> FormStatus {
        self.status.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FormStatus> {
        self.status.subscribe()
    }

    #[must_use]
    pub fn is_mail_verified(&self) -> bool {
        self.mail_verified
    }

    #[must_use]
    pub fn request_state(&self) -> FetchState {
        self.client.state()
    }

    #[must_use]
    pub fn server_error(&self) -> Option<String> {
        match &*self.status.borrow() {
            FormStatus::Failed(err) => Some(alert_message(err)),
            _ => None,
        }
    }

    #[must_use]
    pub fn submit_label(&self) -> &'static str {
        if self.client.is_loading() {
            "Signing up..."
        } else {
            "Signup with Email"
        }
    }

    /// Validates the values, then either reports the email for verification
    /// or creates the account.
    #[instrument(skip_all)]
    pub async fn submit(&mut self) -> SubmitOutcome {
        if !self.status.borrow().accepts_submit() {
            return SubmitOutcome::Rejected;
        }

        self.errors = validate_register(&self.values);
        if !self.errors.is_empty() {
            debug!(fields = ?self.errors.fields().collect::<Vec<_>>(), "register form invalid");
            self.status.send_replace(FormStatus::Editing);
            return SubmitOutcome::Invalid(self.errors.clone());
        }

        if !self.mail_verified {
            let request = VerificationRequest {
                email: self.values.email.clone(),
            };
            info!("email verification requested");
            self.status.send_replace(FormStatus::AwaitingVerification);
            if let Some(on_submit) = self.on_submit.as_mut() {
                on_submit(request.clone());
            }
            return SubmitOutcome::VerificationRequested(request);
        }

        self.create_account().await
    }

    /// Signals that the owner verified the email. The first signal flips the
    /// flag and, if the form is waiting on it, submits the values it holds
    /// now. Later signals do nothing.
    pub async fn confirm_verified(&mut self) -> Option<SubmitOutcome> {
        if self.mail_verified {
            return None;
        }
        self.mail_verified = true;

        if *self.status.borrow() != FormStatus::AwaitingVerification {
            return None;
        }

        info!("email verified, creating account");
        Some(self.submit().await)
    }

    async fn create_account(&mut self) -> SubmitOutcome {
        let pending = Pending::start(&self.status);
        let request = RegisterRequest {
            name: &self.values.full_name,
            email: &self.values.email,
            password: self.values.password.expose_secret(),
            password_confirmation: self.values.confirm_password.expose_secret(),
        };
        let result = client::register(&self.client, &request).await;

        let outcome = complete(result, &self.session, &self.history, Navigation::Replace);
        pending.settle(&outcome);
        outcome
    }
}
