//! `loginapp` — CLI for the LoginApp identity service.
//!
//! Each subcommand plays the role of one interactive page: it collects
//! input, runs the caller-side validation, invokes exactly one gateway
//! operation, and renders the outcome. Session state persists in the state
//! directory between invocations.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use serde_json::Value;

use loginapp::forms::{self, FormError};
use loginapp::net::gateway::{AuthGateway, GatewayError};
use loginapp::net::types::{LoginRequest, RegisterRequest, UpdateProfileRequest};
use loginapp::session::persist::SessionFile;
use loginapp::session::store::SessionStore;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("no usable state directory; pass --state-dir or set LOGINAPP_STATE_DIR")]
    MissingStateDir,
    #[error("{0}")]
    Form(#[from] FormError),
    #[error("{0}")]
    Gateway(#[from] GatewayError),
    #[error("http client construction failed: {0}")]
    Client(#[from] reqwest::Error),
    #[error("output rendering failed: {0}")]
    Render(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "loginapp", about = "LoginApp identity service CLI")]
struct Cli {
    /// API root of the identity service.
    #[arg(long, env = "LOGINAPP_BASE_URL", default_value = "http://127.0.0.1:8080/api")]
    base_url: String,

    /// Directory holding the persisted session (tokens and user record).
    #[arg(long, env = "LOGINAPP_STATE_DIR")]
    state_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and persist the issued token pair.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account. A verification email is sent; log in afterwards.
    Register(RegisterArgs),
    /// Log out. The local session is cleared even if the server is unreachable.
    Logout,
    /// Show the authenticated user, refreshed from the server.
    Whoami,
    /// Exchange the stored refresh token for a new token pair.
    Refresh,
    /// Request a password-reset email.
    ForgotPassword {
        #[arg(long)]
        email: String,
    },
    /// Set a new password using an emailed reset token.
    ResetPassword {
        #[arg(long)]
        token: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
    },
    /// Confirm an email address using an emailed verification token.
    VerifyEmail {
        #[arg(long)]
        token: String,
    },
    /// Show or update the user profile.
    Profile(ProfileCommand),
    /// Show the local session state. Touches no network.
    Status,
}

#[derive(Args, Debug)]
struct RegisterArgs {
    #[arg(long)]
    username: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    password: String,
    #[arg(long)]
    confirm_password: String,
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
}

#[derive(Args, Debug)]
struct ProfileCommand {
    #[command(subcommand)]
    command: ProfileSubcommand,
}

#[derive(Subcommand, Debug)]
enum ProfileSubcommand {
    /// Fetch and print the full profile record.
    Show,
    /// Update profile fields; absent flags are left unchanged.
    Update {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let state_dir = cli
        .state_dir
        .clone()
        .or_else(SessionFile::default_dir)
        .ok_or(CliError::MissingStateDir)?;
    let store = SessionStore::with_persistence(SessionFile::new(state_dir));

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;
    let gateway = AuthGateway::with_client(client, cli.base_url, store.clone());

    match cli.command {
        Command::Login { username, password } => run_login(&gateway, &username, &password).await,
        Command::Register(args) => run_register(&gateway, args).await,
        Command::Logout => run_logout(&gateway).await,
        Command::Whoami => run_whoami(&gateway).await,
        Command::Refresh => run_refresh(&gateway).await,
        Command::ForgotPassword { email } => run_forgot_password(&gateway, &email).await,
        Command::ResetPassword { token, password, confirm_password } => {
            run_reset_password(&gateway, &token, &password, &confirm_password).await
        }
        Command::VerifyEmail { token } => run_verify_email(&gateway, &token).await,
        Command::Profile(profile) => match profile.command {
            ProfileSubcommand::Show => run_profile_show(&gateway).await,
            ProfileSubcommand::Update { first_name, last_name, email } => {
                run_profile_update(&gateway, UpdateProfileRequest { first_name, last_name, email }).await
            }
        },
        Command::Status => {
            run_status(&store);
            Ok(())
        }
    }
}

async fn run_login(gateway: &AuthGateway, username: &str, password: &str) -> Result<(), CliError> {
    forms::validate_login(username, password)?;
    let auth = gateway
        .login(&LoginRequest { username: username.to_owned(), password: password.to_owned() })
        .await?;
    println!("Logged in as {}", auth.username);
    Ok(())
}

async fn run_register(gateway: &AuthGateway, args: RegisterArgs) -> Result<(), CliError> {
    forms::validate_registration(&args.username, &args.email, &args.password, &args.confirm_password)?;
    let resp = gateway
        .register(&RegisterRequest {
            username: args.username,
            email: args.email,
            password: args.password,
            first_name: args.first_name,
            last_name: args.last_name,
        })
        .await?;
    println!("{}", resp.message);
    Ok(())
}

async fn run_logout(gateway: &AuthGateway) -> Result<(), CliError> {
    match gateway.logout().await {
        Ok(resp) => {
            println!("{}", resp.message);
            Ok(())
        }
        Err(error) => {
            // The gateway already dropped the local session.
            println!("Logged out locally; the server could not be notified.");
            Err(error.into())
        }
    }
}

async fn run_whoami(gateway: &AuthGateway) -> Result<(), CliError> {
    match gateway.current_user().await {
        Ok(user) => print_json(&serde_json::to_value(&user)?),
        Err(error @ GatewayError::Rejected { status: 401, .. }) => {
            // The persisted session is stale; treat the user as logged out.
            gateway.store().clear();
            eprintln!("Session expired. Please log in again.");
            Err(error.into())
        }
        Err(GatewayError::NotAuthenticated) => {
            eprintln!("Not logged in.");
            Err(GatewayError::NotAuthenticated.into())
        }
        Err(error) => Err(error.into()),
    }
}

async fn run_refresh(gateway: &AuthGateway) -> Result<(), CliError> {
    let auth = gateway.refresh().await?;
    println!("Session refreshed for {}", auth.username);
    Ok(())
}

async fn run_forgot_password(gateway: &AuthGateway, email: &str) -> Result<(), CliError> {
    let email = forms::validate_recovery_email(email)?;
    let resp = gateway.forgot_password(&email).await?;
    println!("{}", resp.message);
    Ok(())
}

async fn run_reset_password(
    gateway: &AuthGateway,
    token: &str,
    password: &str,
    confirm_password: &str,
) -> Result<(), CliError> {
    // Probe the token first, as the reset page does on load.
    match gateway.validate_reset_token(token).await {
        Ok(_) => {}
        Err(error @ GatewayError::Rejected { .. }) => {
            eprintln!("This password reset link is invalid or has expired.");
            return Err(error.into());
        }
        Err(error) => return Err(error.into()),
    }

    forms::validate_new_password(password, confirm_password)?;
    let resp = gateway.reset_password(token, password).await?;
    println!("{}", resp.message);
    println!("You can now log in with your new password.");
    Ok(())
}

async fn run_verify_email(gateway: &AuthGateway, token: &str) -> Result<(), CliError> {
    match gateway.verify_email(token).await {
        Ok(resp) => {
            println!("{}", resp.message);
            Ok(())
        }
        Err(error @ GatewayError::Rejected { .. }) => {
            eprintln!("Email verification failed. The link may be invalid or expired.");
            Err(error.into())
        }
        Err(error) => Err(error.into()),
    }
}

async fn run_profile_show(gateway: &AuthGateway) -> Result<(), CliError> {
    let user = gateway.get_profile().await?;
    print_json(&serde_json::to_value(&user)?)
}

async fn run_profile_update(gateway: &AuthGateway, changes: UpdateProfileRequest) -> Result<(), CliError> {
    let user = gateway.update_profile(&changes).await?;
    print_json(&serde_json::to_value(&user)?)
}

fn run_status(store: &SessionStore) {
    let session = store.snapshot();
    if session.is_authenticated() {
        let username = session
            .user
            .map_or_else(|| "<unknown>".to_owned(), |user| user.username);
        println!("authenticated as {username}");
    } else {
        println!("anonymous");
    }
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
