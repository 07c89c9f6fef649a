//! Application bootstrap: hydrates the session from durable storage and
//! provides it, the HTTP adapter and the navigation history to every page
//! through one [`Context`].

use crate::{
    api::{AppError, HttpClient},
    config::AppConfig,
    forms::{LoginForm, RegisterForm, VerificationRequest},
    routes::{self, History, RouteMatch},
    session::{provide_auth, Context, FileStorage, SessionStore, Storage, User},
};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug)]
pub struct App {
    config: AppConfig,
    context: Context,
    session: Arc<SessionStore>,
    history: Arc<History>,
}

impl App {
    /// Builds the application with file-backed session storage.
    ///
    /// # Errors
    /// Returns `AppError::Config` if the config is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        config.validate()?;
        let storage = FileStorage::new(&config.session_file);
        let client = HttpClient::new(&config)?;
        Ok(Self::with_parts(config, storage, client))
    }

    /// Builds the application from explicit parts; the session is hydrated
    /// from `storage` immediately.
    #[must_use]
    pub fn with_parts(config: AppConfig, storage: impl Storage + 'static, client: HttpClient) -> Self {
        let session = Arc::new(SessionStore::hydrate(storage));
        let history = Arc::new(History::new(routes::ROUTES[0].path));

        let mut context = Context::new();
        provide_auth(&mut context, Arc::clone(&session));
        context.provide(Arc::new(client));
        context.provide(Arc::clone(&history));

        match session.current_user() {
            Some(user) => info!(user_id = %user.id, "session restored"),
            None => debug!("no session"),
        }

        Self {
            config,
            context,
            session,
            history,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub fn context(&self) -> &Context {
        &self.context
    }

    #[must_use]
    pub fn session(&self) -> Arc<SessionStore> {
        Arc::clone(&self.session)
    }

    #[must_use]
    pub fn history(&self) -> Arc<History> {
        Arc::clone(&self.history)
    }

    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.session.current_user()
    }

    /// Pushes `path` onto the history and resolves it.
    pub fn navigate(&self, path: &str) -> RouteMatch {
        self.history.push(path);
        routes::resolve(path)
    }

    #[must_use]
    pub fn current_route(&self) -> RouteMatch {
        routes::resolve(&self.history.current())
    }

    #[must_use]
    pub fn login_form(&self) -> LoginForm {
        LoginForm::new(&self.context)
    }

    /// Registration form that submits immediately.
    #[must_use]
    pub fn register_form(&self) -> RegisterForm {
        RegisterForm::new(&self.context)
    }

    /// Registration form gated on email verification.
    pub fn register_form_with_verification(
        &self,
        mail_verified: bool,
        on_submit: impl FnMut(VerificationRequest) + Send + 'static,
    ) -> RegisterForm {
        RegisterForm::with_verification(&self.context, mail_verified, on_submit)
    }

    /// Clears the session.
    ///
    /// # Errors
    /// Returns `AppError::Storage` if the durable entry cannot be removed.
    pub fn logout(&self) -> Result<(), AppError> {
        self.session
            .logout()
            .map_err(|err| AppError::Storage(format!("{err:#}")))
    }
}
