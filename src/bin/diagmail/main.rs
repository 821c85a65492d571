#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Command line front end for mailing diagnostic reports

use std::{path::PathBuf, sync::Arc};

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use diagnostic_mailer::{
    domain::{
        communication::packager::ReportPackagerImpl,
        credentials::{resolve_secret, Secret, SecretStore},
        delivery::{
            DeliveryError, DeliveryOutcome, DeliveryPipeline, DeliveryRequest, DEFAULT_REPORT_PATH,
        },
    },
    infrastructure::{
        credentials::keyring_store::{KeyringSecretStore, DEFAULT_SERVICE_NAME},
        diagnostics::subprocess::{CommandCollector, DiagnosticToolConfig},
        email::smtp::{SMTPConfig, SMTPMailer},
        logging::{self, LoggingConfig},
    },
};
use tracing::info;

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
#[command(name = "diagmail", version, about)]
pub struct Args {
    /// Logging configuration
    #[clap(flatten)]
    pub logging: LoggingConfig,

    /// Keyring service name the credentials are stored under
    #[clap(long, env = "KEYRING_SERVICE", default_value = DEFAULT_SERVICE_NAME, global = true)]
    pub keyring_service: String,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Collect a diagnostic report and mail it
    Send(SendArgs),

    /// Save the relay password for an account
    SaveCredentials {
        /// The relay account
        #[clap(long, env = "SMTP_ACCOUNT")]
        account: String,

        /// The app-specific password
        #[clap(long, env = "SMTP_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Check whether a password is saved for an account
    LoadCredentials {
        /// The relay account
        #[clap(long, env = "SMTP_ACCOUNT")]
        account: String,
    },

    /// Remove the saved password for an account
    DeleteCredentials {
        /// The relay account
        #[clap(long, env = "SMTP_ACCOUNT")]
        account: String,
    },
}

/// Arguments for `send`
#[derive(Debug, clap::Args)]
pub struct SendArgs {
    /// The sender address
    #[clap(long, env = "SENDER_EMAIL")]
    pub sender: String,

    /// The recipient address
    #[clap(long, env = "RECEIVER_EMAIL")]
    pub recipient: String,

    /// The subject line
    #[clap(long, default_value = "DirectX Diagnostic Report")]
    pub subject: String,

    /// The message body
    #[clap(long, default_value = "")]
    pub body: String,

    /// The relay account, defaults to the sender
    #[clap(long, env = "SMTP_ACCOUNT")]
    pub account: Option<String>,

    /// The app-specific password, loaded from the keyring when omitted
    #[clap(long, env = "SMTP_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Where the diagnostic report is written
    #[clap(long, env = "REPORT_PATH", default_value = DEFAULT_REPORT_PATH)]
    pub output: PathBuf,

    /// The SMTP relay
    #[clap(flatten)]
    pub smtp: SMTPConfig,

    /// The diagnostic tool
    #[clap(flatten)]
    pub tool: DiagnosticToolConfig,
}

#[mutants::skip]
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    logging::init(&args.logging)?;

    let store = KeyringSecretStore::new(args.keyring_service);

    match args.command {
        Command::Send(send) => send_report(&store, send).await,
        Command::SaveCredentials { account, password } => {
            store.save(&account, &Secret::new(password))?;
            println!("Credentials saved securely!");
            Ok(())
        }
        Command::LoadCredentials { account } => {
            match store.load(&account)? {
                Some(_) => println!("Credentials found for {account}."),
                None => println!("No credentials found for the given email."),
            }
            Ok(())
        }
        Command::DeleteCredentials { account } => {
            store.delete(&account)?;
            println!("Credentials removed for {account}.");
            Ok(())
        }
    }
}

#[mutants::skip]
async fn send_report(store: &KeyringSecretStore, send: SendArgs) -> Result<()> {
    let account = send.account.unwrap_or_else(|| send.sender.clone());

    let secret = resolve_secret(store, &account, send.password.map(Secret::new))?
        .ok_or_else(|| anyhow!("no password given and none saved for {account}"))?;

    let pipeline = DeliveryPipeline::new(
        Arc::new(CommandCollector::new(send.tool)),
        Arc::new(ReportPackagerImpl::new()),
        Arc::new(SMTPMailer::from_config(send.smtp)),
    )
    .with_output(send.output);

    let request = DeliveryRequest {
        sender: send.sender,
        recipient: send.recipient,
        subject: send.subject,
        body: send.body,
        account,
        secret,
    };

    info!(output = %pipeline.output().display(), "starting delivery");

    let outcome = tokio::task::spawn_blocking(move || pipeline.run(&request)).await?;

    match outcome {
        DeliveryOutcome::Delivered => {
            println!("Email sent successfully!");
            Ok(())
        }
        DeliveryOutcome::Failed(err) => Err(anyhow!(describe(&err))),
    }
}

fn describe(err: &DeliveryError) -> String {
    match err {
        DeliveryError::ToolNotFound { program } => {
            format!("{program} command not found. Ensure DirectX is installed.")
        }
        DeliveryError::ToolExecutionFailed { exit_code: Some(code) } => {
            format!("The diagnostic tool failed with exit code {code}.")
        }
        DeliveryError::ToolExecutionFailed { exit_code: None } => {
            "The diagnostic tool was terminated before finishing.".to_string()
        }
        DeliveryError::AttachmentMissing { path } => {
            format!("Attachment file not found: {}", path.display())
        }
        DeliveryError::InvalidAddress { address } => {
            format!("Not a valid email address: {address}")
        }
        DeliveryError::AuthenticationFailed => {
            "Authentication failed. Check your email and app-specific password.".to_string()
        }
        DeliveryError::TransportError { detail } => {
            format!("Failed to send email: {detail}")
        }
        DeliveryError::UnknownError(e) => format!("An error occurred: {e}"),
    }
}
