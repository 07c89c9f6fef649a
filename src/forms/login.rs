//! Login form: email and password, posted to the login endpoint. On success
//! the user is stored in the session and the form pushes `/`.

use crate::{
    api::{use_client, FetchState, HttpClient},
    forms::{alert_message, complete, FormStatus, Navigation, Pending, SubmitOutcome},
    routes::{use_history, History},
    session::{client, use_auth, Context, LoginRequest, SessionStore},
    validation::{validate_login, FieldErrors, LoginValues},
};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, instrument};

pub struct LoginForm {
    values: LoginValues,
    errors: FieldErrors,
    status: watch::Sender<FormStatus>,
    client: HttpClient,
    session: Arc<SessionStore>,
    history: Arc<History>,
}

impl LoginForm {
    /// Builds an empty form wired to the services in `context`.
    ///
    /// # Panics
    /// Panics if the context lacks the session store, HTTP adapter or history.
    #[must_use]
    pub fn new(context: &Context) -> Self {
        let (status, _) = watch::channel(FormStatus::Editing);
        Self {
            values: LoginValues::default(),
            errors: FieldErrors::new(),
            status,
            client: use_client(context).fresh(),
            session: use_auth(context),
            history: use_history(context),
        }
    }

    pub fn set_email(&mut self, email: &str) {
        self.values.email = email.to_string();
    }

    pub fn set_password(&mut self, password: SecretString) {
        self.values.password = password;
    }

    #[must_use]
    pub fn values(&self) -> &LoginValues {
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

    /// State of the form's HTTP adapter.
    #[must_use]
    pub fn request_state(&self) -> FetchState {
        self.client.state()
    }

    /// Alert text for the last failed submission.
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
            "Authenticating..."
        } else {
            "Login with Email"
        }
    }

    /// Validates the values and, when they pass, posts them to the backend.
    #[instrument(skip_all)]
    pub async fn submit(&mut self) -> SubmitOutcome {
        if !self.status.borrow().accepts_submit() {
            return SubmitOutcome::Rejected;
        }

        self.errors = validate_login(&self.values);
        if !self.errors.is_empty() {
            debug!(fields = ?self.errors.fields().collect::<Vec<_>>(), "login form invalid");
            self.status.send_replace(FormStatus::Editing);
            return SubmitOutcome::Invalid(self.errors.clone());
        }

        let pending = Pending::start(&self.status);
        let request = LoginRequest {
            email: &self.values.email,
            password: self.values.password.expose_secret(),
        };
        let result = client::login(&self.client, &request).await;

        let outcome = complete(result, &self.session, &self.history, Navigation::Push);
        pending.settle(&outcome);
        outcome
    }
}
