pub mod logging;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ArgAction, ColorChoice, Command,
};
use std::path::PathBuf;

pub const ARG_API_URL: &str = "api-url";
pub const ARG_SESSION_FILE: &str = "session-file";
pub const ARG_TIMEOUT_MS: &str = "timeout-ms";

pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let command = Command::new("authshell")
        .about("Email and password authentication client")
        .version(env!("CARGO_PKG_VERSION"))
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(login())
        .subcommand(register())
        .subcommand(Command::new("logout").about("Clear the stored session"))
        .subcommand(Command::new("whoami").about("Show the signed-in user"))
        .subcommand(routes());

    let command = with_config_args(command);
    logging::with_args(command)
}

// Environment values for these are read by `AppConfig::load`; the flags win.
fn with_config_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_URL)
                .long("api-url")
                .help("Base URL of the auth API, example: https://api.tld/api")
                .global(true),
        )
        .arg(
            Arg::new(ARG_SESSION_FILE)
                .long("session-file")
                .help("File holding the persisted session")
                .global(true)
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new(ARG_TIMEOUT_MS)
                .long("timeout-ms")
                .help("Request timeout in milliseconds")
                .global(true)
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
}

fn email_arg() -> Arg {
    Arg::new("email")
        .short('e')
        .long("email")
        .help("Account email address")
        .required(true)
}

fn password_arg() -> Arg {
    Arg::new("password")
        .short('p')
        .long("password")
        .help("Account password")
        .env("AUTHSHELL_PASSWORD")
        .hide_env_values(true)
        .required(true)
}

fn login() -> Command {
    Command::new("login")
        .about("Sign in with email and password")
        .arg(email_arg())
        .arg(password_arg())
}

fn register() -> Command {
    Command::new("register")
        .about("Create an account and sign in")
        .arg(
            Arg::new("name")
                .short('n')
                .long("name")
                .help("Full name")
                .required(true),
        )
        .arg(email_arg())
        .arg(password_arg())
        .arg(
            Arg::new("confirm-password")
                .long("confirm-password")
                .help("Password confirmation")
                .env("AUTHSHELL_CONFIRM_PASSWORD")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new("require-verification")
                .long("require-verification")
                .help("Wait for the email address to be verified before creating the account")
                .action(ArgAction::SetTrue),
        )
}

fn routes() -> Command {
    Command::new("routes")
        .about("List the route table or resolve a path")
        .arg(Arg::new("path").help("Path to resolve, example: /auth/login"))
}
