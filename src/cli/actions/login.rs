use crate::{app::App, cli::actions::report, cli::globals::GlobalArgs};
use anyhow::Result;
use secrecy::SecretString;
use tracing::instrument;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub email: String,
    pub password: SecretString,
}

/// Execute the login action.
/// # Errors
/// Returns an error if the config is invalid, the values fail validation or
/// the backend rejects the credentials.
#[instrument(skip_all)]
pub async fn execute(args: Args) -> Result<()> {
    let app = App::new(args.globals.config())?;

    let mut form = app.login_form();
    form.set_email(&args.email);
    form.set_password(args.password);

    let message = report(form.submit().await)?;
    println!("{message}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AppConfig, session::{FileStorage, SessionStore, User, UserId}};
    use serde_json::json;
    use std::net::TcpListener;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    #[tokio::test]
    async fn login_persists_session_file() -> Result<()> {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return Ok(());
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user": { "id": 1, "name": "A", "email": "a@b.com" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir()?;
        let session_file = dir.path().join("session.json");
        let args = Args {
            globals: GlobalArgs {
                api_url: Some(server.uri()),
                session_file: Some(session_file.clone()),
                timeout: None,
            },
            email: "a@b.com".to_string(),
            password: SecretString::from("secret".to_string()),
        };

        execute(args).await?;

        let session = SessionStore::hydrate(FileStorage::new(&session_file));
        assert_eq!(
            session.current_user(),
            Some(User::new(UserId::Number(1), "A", "a@b.com"))
        );
        Ok(())
    }

    #[tokio::test]
    async fn login_fails_on_invalid_email_before_any_request() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let args = Args {
            globals: GlobalArgs {
                api_url: Some(AppConfig::default().api_base_url),
                session_file: Some(dir.path().join("session.json")),
                timeout: None,
            },
            email: "nope".to_string(),
            password: SecretString::from("secret".to_string()),
        };

        let err = execute(args).await.err().map(|e| e.to_string());
        assert_eq!(err.as_deref(), Some("Email Address: Invalid email"));
        assert!(!dir.path().join("session.json").exists());
        Ok(())
    }
}
