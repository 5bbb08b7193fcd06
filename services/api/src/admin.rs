use crate::cli::{client_config, print_notices};
use crate::infra::{parse_assignment, parse_filter, ResourceKind};
use admissions::backend::{BackendClient, BackendError};
use admissions::error::AppError;
use admissions::workflows::admin::resource::{
    AdminResource, BlogPost, ContactMessage, Customer,
};
use admissions::workflows::admin::{
    AdminBackend, ContactInbox, HttpAdminBackend, ListQuery, RemoteCollection, ReplyOutcome,
    ViewEvent, DEFAULT_PAGE_SIZE,
};
use admissions::workflows::email::{EmailRoute, HttpEmailGateway};
use clap::{Args, Subcommand};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Subcommand, Debug)]
pub(crate) enum AdminCommand {
    /// Show one page of a collection, optionally narrowed and exported to CSV
    List(ListArgs),
    /// Create a record from `--set key=value` pairs
    Create {
        #[arg(value_enum)]
        resource: ResourceKind,
        #[arg(long = "set", value_parser = parse_assignment, required = true)]
        set: Vec<(String, Value)>,
    },
    /// Patch fields on an existing record
    Update {
        #[arg(value_enum)]
        resource: ResourceKind,
        id: String,
        #[arg(long = "set", value_parser = parse_assignment, required = true)]
        set: Vec<(String, Value)>,
    },
    /// Delete a record
    Delete {
        #[arg(value_enum)]
        resource: ResourceKind,
        id: String,
    },
    /// Email a reply to a contact message and mark it replied
    Reply {
        contact_id: String,
        #[arg(long)]
        message: String,
    },
}

#[derive(Args, Debug)]
pub(crate) struct ListArgs {
    #[arg(value_enum)]
    pub(crate) resource: ResourceKind,
    /// Case-insensitive text to look for in the loaded rows
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// Category filter such as `status=new`; `all` disables it
    #[arg(long = "filter", value_parser = parse_filter)]
    pub(crate) filters: Vec<(String, String)>,
    #[arg(long, default_value_t = 1)]
    pub(crate) page: u32,
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub(crate) limit: u32,
    /// Write the visible rows to this CSV file
    #[arg(long)]
    pub(crate) export: Option<PathBuf>,
}

impl AdminCommand {
    fn resource(&self) -> ResourceKind {
        match self {
            AdminCommand::List(args) => args.resource,
            AdminCommand::Create { resource, .. }
            | AdminCommand::Update { resource, .. }
            | AdminCommand::Delete { resource, .. } => *resource,
            AdminCommand::Reply { .. } => ResourceKind::Contacts,
        }
    }
}

pub(crate) async fn run_admin(command: AdminCommand) -> Result<(), AppError> {
    let config = client_config()?;
    let client = BackendClient::new(&config.backend)?;
    let backend = Arc::new(HttpAdminBackend::new(client.clone()));
    let sign_in = config.backend.sign_in_route.as_str();

    if let AdminCommand::Reply {
        contact_id,
        message,
    } = &command
    {
        let email = HttpEmailGateway::new(client, EmailRoute::Admin);
        let view = RemoteCollection::<ContactMessage, _>::new(backend, sign_in);
        return reply(ContactInbox::new(view), &email, contact_id, message).await;
    }

    match command.resource() {
        ResourceKind::Contacts => run_for::<ContactMessage, _>(backend, sign_in, command).await,
        ResourceKind::Customers => run_for::<Customer, _>(backend, sign_in, command).await,
        ResourceKind::Posts => run_for::<BlogPost, _>(backend, sign_in, command).await,
    }
}

/// Turn a finished view event into the command's result, printing its notices.
fn settle<R, B>(view: &mut RemoteCollection<R, B>, event: ViewEvent) -> Result<(), AppError>
where
    R: AdminResource,
    B: AdminBackend + ?Sized,
{
    print_notices(view.take_notices());
    match event {
        ViewEvent::Loaded { .. } | ViewEvent::Saved => Ok(()),
        ViewEvent::RedirectToSignIn(route) => {
            eprintln!("session missing or expired; sign in at {route}");
            Err(BackendError::Unauthorized.into())
        }
        ViewEvent::Failed(error) => Err(error.into()),
    }
}

pub(crate) fn check_facets<R: AdminResource>(filters: &[(String, String)]) -> Result<(), AppError> {
    match filters
        .iter()
        .find(|(name, _)| !R::FACETS.contains(&name.as_str()))
    {
        Some((name, _)) => Err(AppError::Invalid(format!(
            "'{name}' is not a filter for {}; use one of: {}",
            R::NAME,
            R::FACETS.join(", ")
        ))),
        None => Ok(()),
    }
}

pub(crate) fn to_object(pairs: Vec<(String, Value)>) -> Value {
    Value::Object(pairs.into_iter().collect::<Map<String, Value>>())
}

async fn run_for<R, B>(
    backend: Arc<B>,
    sign_in: &str,
    command: AdminCommand,
) -> Result<(), AppError>
where
    R: AdminResource,
    B: AdminBackend + ?Sized,
{
    let mut view = RemoteCollection::<R, B>::new(backend, sign_in);

    match command {
        AdminCommand::List(args) => {
            check_facets::<R>(&args.filters)?;
            let mut view = view.with_query(ListQuery {
                page: args.page.max(1),
                limit: args.limit.max(1),
                ..ListQuery::default()
            });
            let event = view.refresh().await;
            settle(&mut view, event)?;

            if let Some(search) = args.search {
                view.set_search(search);
            }
            for (name, value) in args.filters {
                view.set_facet(name, value);
            }
            print_table(&view);

            if let Some(path) = args.export {
                let written = view.export_visible(BufWriter::new(File::create(&path)?))?;
                println!("exported {written} {} to {}", R::NAME, path.display());
            }
            Ok(())
        }
        AdminCommand::Create { set, .. } => {
            let event = view.create(to_object(set)).await;
            settle(&mut view, event)
        }
        AdminCommand::Update { id, set, .. } => {
            let event = view.update(&id, to_object(set)).await;
            settle(&mut view, event)
        }
        AdminCommand::Delete { id, .. } => {
            let event = view.delete(&id).await;
            settle(&mut view, event)
        }
        AdminCommand::Reply { .. } => Err(AppError::Invalid(
            "replies are only available for contact messages".to_string(),
        )),
    }
}

fn print_table<R, B>(view: &RemoteCollection<R, B>)
where
    R: AdminResource,
    B: AdminBackend + ?Sized,
{
    println!("{}", R::CSV_HEADERS.join(" | "));
    let visible = view.visible();
    for row in &visible {
        println!("{}", row.csv_row().join(" | "));
    }

    let pagination = view.pagination();
    let more = if pagination.has_more {
        ", more on the next page"
    } else {
        ""
    };
    println!(
        "page {}: showing {} of {} loaded, {} total{more}",
        pagination.page,
        visible.len(),
        view.rows().len(),
        pagination.total
    );
}

async fn reply<B>(
    mut inbox: ContactInbox<B>,
    email: &HttpEmailGateway,
    contact_id: &str,
    message: &str,
) -> Result<(), AppError>
where
    B: AdminBackend + ?Sized,
{
    let event = inbox.view_mut().refresh().await;
    settle(inbox.view_mut(), event)?;
    while inbox.view().find(contact_id).is_none() {
        match inbox.view_mut().next_page().await {
            Some(event) => settle(inbox.view_mut(), event)?,
            None => break,
        }
    }

    let outcome = inbox.reply(email, contact_id, message).await;
    print_notices(inbox.view_mut().take_notices());
    match outcome {
        ReplyOutcome::Sent => Ok(()),
        ReplyOutcome::UnknownContact => Err(AppError::Invalid(format!(
            "no contact message with id '{contact_id}'"
        ))),
        ReplyOutcome::AlreadySending => Err(AppError::Invalid(
            "a reply is already being sent".to_string(),
        )),
        ReplyOutcome::EmailFailed(error) => Err(error.into()),
        ReplyOutcome::RedirectToSignIn(route) => {
            settle(inbox.view_mut(), ViewEvent::RedirectToSignIn(route))
        }
        ReplyOutcome::StatusNotUpdated(event) => settle(inbox.view_mut(), event),
    }
}
