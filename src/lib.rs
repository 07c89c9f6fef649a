//! # Authshell (authentication client)
//!
//! `authshell` is the client side of an email/password login flow: it keeps
//! the signed-in user, validates the login and registration forms, talks to
//! the REST backend and decides where to navigate afterwards.
//!
//! ## Core Authentication Flows
//!
//! ### Login
//!
//! 1. **Validate:** `email` must look like an address and `password` must be set.
//! 2. **Submit:** The form POSTs `{email, password}` to `/auth/login`.
//! 3. **Adopt:** The returned `{user}` is stored in the session and persisted, then
//!    the form navigates to `/`.
//!
//! ### Registration & Email Verification
//!
//! 1. **Validate:** Full name, email, password length and password confirmation.
//! 2. **Gate:** When the owner requires email verification the form only reports
//!    the candidate email and waits for `confirm_verified`.
//! 3. **Submit:** The form POSTs `{name, email, password, password_confirmation}`
//!    to `/auth/register`, logs the user in and replaces the history entry with `/`.
//!
//! ## Session
//!
//! The session store is the single writer of the signed-in user. It is handed
//! to pages through an explicit [`session::Context`] rather than global state,
//! and it keeps a copy in durable storage so a restart picks the user back up.

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod forms;
pub mod routes;
pub mod session;
pub mod validation;

pub const GIT_COMMIT_HASH: &str = match option_env!("AUTHSHELL_GIT_SHA") {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_user_agent_contains_version() {
        assert!(APP_USER_AGENT.starts_with("authshell/"));
        assert!(APP_USER_AGENT.ends_with(env!("CARGO_PKG_VERSION")));
    }
}
