use crate::cli::client_config;
use admissions::backend::BackendClient;
use admissions::error::AppError;
use admissions::files::FileHandle;
use admissions::workflows::email::{
    EmailBody, EmailGateway, EmailMessage, EmailRoute, HttpEmailGateway,
};
use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub(crate) enum EmailCommand {
    /// Send one message, optionally with attachments
    Send(SendArgs),
}

#[derive(Args, Debug)]
pub(crate) struct SendArgs {
    /// Recipient address; repeat the flag or separate with commas
    #[arg(long, required = true, value_delimiter = ',')]
    pub(crate) to: Vec<String>,
    #[arg(long)]
    pub(crate) subject: String,
    #[arg(long)]
    pub(crate) message: String,
    /// Send the message body as HTML
    #[arg(long)]
    pub(crate) html: bool,
    /// File to attach; may be repeated
    #[arg(long)]
    pub(crate) attach: Vec<PathBuf>,
    /// Use the public send endpoint instead of the admin one
    #[arg(long)]
    pub(crate) public: bool,
}

pub(crate) fn build_message(
    args: &SendArgs,
    attachments: Vec<FileHandle>,
) -> EmailMessage {
    let body = if args.html {
        EmailBody::Html(args.message.clone())
    } else {
        EmailBody::Text(args.message.clone())
    };
    let mut message = EmailMessage::new(String::new(), args.subject.clone(), body);
    message.to = args
        .to
        .iter()
        .map(|address| address.trim().to_string())
        .filter(|address| !address.is_empty())
        .collect();
    message.attachments = attachments;
    message
}

pub(crate) async fn run_email(command: EmailCommand) -> Result<(), AppError> {
    let EmailCommand::Send(args) = command;
    let config = client_config()?;

    let attachments = args
        .attach
        .iter()
        .map(FileHandle::from_path)
        .collect::<Result<Vec<_>, _>>()?;
    let message = build_message(&args, attachments);
    let route = if args.public {
        EmailRoute::Public
    } else {
        EmailRoute::Admin
    };

    let gateway = HttpEmailGateway::new(BackendClient::new(&config.backend)?, route);
    let recipients = message.to.len();
    gateway.send(message).await?;
    println!("[success] email sent to {recipients} recipient(s)");
    Ok(())
}
