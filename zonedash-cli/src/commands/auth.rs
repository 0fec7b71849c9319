//! Account commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use zonedash_api::Route;
use zonedash_core::Outcome;
use zonedash_core::services::{AuthService, SignupDraft};

use super::{App, read_line};
use crate::cli::GlobalOptions;
use crate::config::Settings;
use crate::output::{UserOutput, print_output, print_success};

#[derive(Args)]
pub struct LoginArgs {
    /// Account email.
    #[arg(long, required_unless_present = "github")]
    pub email: Option<String>,

    /// Password; read from stdin when omitted.
    #[arg(long, env = "ZONEDASH_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Print the GitHub sign-in URL instead.
    #[arg(long, conflicts_with_all = ["email", "password"])]
    pub github: bool,
}

#[derive(Args)]
pub struct OAuthCallbackArgs {
    /// Query string of the callback URL (`token=...` or `error=...`).
    pub query: String,
}

/// Signup steps.
#[derive(Subcommand)]
pub enum SignupCommand {
    /// Check the password and email a verification code.
    Start(SignupStartArgs),

    /// Verify the emailed code and sign in.
    Verify(SignupVerifyArgs),
}

#[derive(Args)]
pub struct SignupStartArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    /// Password; read from stdin when omitted.
    #[arg(long, env = "ZONEDASH_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Args)]
pub struct SignupVerifyArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    /// Password; read from stdin when omitted.
    #[arg(long, env = "ZONEDASH_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
    /// Code from the verification email.
    #[arg(long)]
    pub otp: String,
}

/// Password management.
#[derive(Subcommand)]
pub enum PasswordCommand {
    /// Email a reset code for a forgotten password.
    Forgot {
        #[arg(long)]
        email: String,
    },

    /// Set a new password with an emailed reset code.
    Reset {
        #[arg(long)]
        email: String,
        #[arg(long)]
        otp: String,
        /// New password; read from stdin when omitted.
        #[arg(long)]
        new_password: Option<String>,
    },

    /// Change the password of the signed-in account. Without `--otp` a code is
    /// emailed first; run again with the code to apply the change.
    Change {
        #[arg(long)]
        old_password: Option<String>,
        #[arg(long)]
        new_password: Option<String>,
        #[arg(long)]
        otp: Option<String>,
    },
}

/// Every account command, routed from the top level.
pub enum AuthCommand {
    Login(LoginArgs),
    Logout,
    Whoami,
    Signup(SignupCommand),
    Password(PasswordCommand),
    OAuthCallback(OAuthCallbackArgs),
}

async fn secret(value: Option<String>, label: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => read_line(label).await,
    }
}

impl AuthCommand {
    fn route(&self) -> Route {
        match self {
            Self::Login(_)
            | Self::Password(PasswordCommand::Forgot { .. } | PasswordCommand::Reset { .. }) => {
                Route::Login
            }
            Self::Signup(_) => Route::Signup,
            Self::OAuthCallback(_) => Route::OAuthCallback,
            Self::Whoami | Self::Password(PasswordCommand::Change { .. }) => Route::Settings,
            Self::Logout => Route::Dashboard,
        }
    }

    pub async fn run(self, settings: &Settings, global: &GlobalOptions) -> Result<Outcome> {
        let app = App::connect(settings, global, self.route()).await?;
        let auth = AuthService::new(app.ctx.clone());

        let outcome = match self {
            Self::Login(args) => {
                if args.github {
                    print_success(&auth.github_login_url(), app.json);
                    return Ok(app.finish(Outcome::Succeeded));
                }
                let email = args.email.unwrap_or_default();
                let password = secret(args.password, "Password").await?;
                match auth.login(&email, &password).await {
                    Ok(()) => {
                        print_success(&format!("Logged in as {}", email.trim()), app.json);
                        Outcome::Succeeded
                    }
                    Err(e) => app.fail(&e),
                }
            }
            Self::Logout => match auth.logout().await {
                Ok(()) => {
                    print_success("Logged out", app.json);
                    Outcome::Succeeded
                }
                Err(e) => app.fail(&e),
            },
            Self::Whoami => match auth.current_user().await {
                Ok(user) => {
                    print_output(&UserOutput(user), app.json);
                    Outcome::Succeeded
                }
                Err(e) => app.fail(&e),
            },
            Self::Signup(SignupCommand::Start(args)) => {
                let password = secret(args.password, "Password").await?;
                match auth.start_signup(&args.name, &args.email, &password).await {
                    Ok(()) => {
                        print_success(
                            "Verification code sent. Finish with `zonedash signup verify`.",
                            app.json,
                        );
                        Outcome::Succeeded
                    }
                    Err(e) => app.fail(&e),
                }
            }
            Self::Signup(SignupCommand::Verify(args)) => {
                let draft = SignupDraft {
                    name: args.name,
                    email: args.email,
                    password: secret(args.password, "Password").await?,
                    otp: args.otp,
                };
                match auth.complete_signup(&draft).await {
                    Ok(()) => {
                        print_success("Account created and signed in", app.json);
                        Outcome::Succeeded
                    }
                    Err(e) => app.fail(&e),
                }
            }
            Self::Password(PasswordCommand::Forgot { email }) => {
                report(&app, auth.request_password_reset(&email).await)
            }
            Self::Password(PasswordCommand::Reset {
                email,
                otp,
                new_password,
            }) => {
                let new_password = secret(new_password, "New password").await?;
                report(&app, auth.reset_password(&email, &otp, &new_password).await)
            }
            Self::Password(PasswordCommand::Change {
                old_password,
                new_password,
                otp,
            }) => {
                let old_password = secret(old_password, "Current password").await?;
                let new_password = secret(new_password, "New password").await?;
                match otp {
                    None => report(
                        &app,
                        auth.request_password_change(&old_password, &new_password).await,
                    ),
                    Some(otp) => report(
                        &app,
                        auth.change_password(&old_password, &new_password, &otp).await,
                    ),
                }
            }
            Self::OAuthCallback(args) => match auth.complete_oauth_callback(&args.query).await {
                Ok(()) => {
                    print_success("Signed in with GitHub", app.json);
                    Outcome::Succeeded
                }
                Err(e) => app.fail(&e),
            },
        };
        Ok(app.finish(outcome))
    }
}

fn report(app: &App, result: zonedash_core::CoreResult<&'static str>) -> Outcome {
    match result {
        Ok(message) => {
            print_success(message, app.json);
            Outcome::Succeeded
        }
        Err(e) => app.fail(&e),
    }
}
