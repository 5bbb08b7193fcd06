use admissions::workflows::admin::resource::{
    AdminResource, BlogPost, ContactMessage, Customer,
};
use chrono::{SecondsFormat, Utc};
use clap::ValueEnum;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Admin collections exposed by the portal backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum ResourceKind {
    Contacts,
    Customers,
    Posts,
}

impl ResourceKind {
    pub(crate) const ALL: [ResourceKind; 3] = [
        ResourceKind::Contacts,
        ResourceKind::Customers,
        ResourceKind::Posts,
    ];

    pub(crate) const fn endpoint(self) -> &'static str {
        match self {
            ResourceKind::Contacts => ContactMessage::ENDPOINT,
            ResourceKind::Customers => Customer::ENDPOINT,
            ResourceKind::Posts => BlogPost::ENDPOINT,
        }
    }

    const fn id_prefix(self) -> &'static str {
        match self {
            ResourceKind::Contacts => "contact",
            ResourceKind::Customers => "customer",
            ResourceKind::Posts => "post",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct StoredApplication {
    pub(crate) id: String,
    pub(crate) fields: HashMap<String, String>,
    pub(crate) files: Vec<StoredFile>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StoredFile {
    pub(crate) part: String,
    pub(crate) file_name: String,
    pub(crate) content_type: String,
    pub(crate) size: usize,
}

#[derive(Debug, Clone)]
pub(crate) struct OutboxEntry {
    pub(crate) to: Vec<String>,
    pub(crate) subject: String,
    pub(crate) is_html: bool,
    pub(crate) attachments: Vec<String>,
}

/// Everything the stub backend remembers between requests.
#[derive(Default)]
pub(crate) struct PortalStore {
    admin_token: Option<String>,
    sequence: AtomicU64,
    applications: Mutex<Vec<StoredApplication>>,
    collections: Mutex<HashMap<&'static str, Vec<Value>>>,
    outbox: Mutex<Vec<OutboxEntry>>,
}

impl PortalStore {
    pub(crate) fn new(admin_token: Option<String>) -> Self {
        Self {
            admin_token,
            ..Self::default()
        }
    }

    /// A store without a configured token rejects every admin call.
    pub(crate) fn is_authorized(&self, bearer: Option<&str>) -> bool {
        match (self.admin_token.as_deref(), bearer) {
            (Some(expected), Some(given)) => expected == given,
            _ => false,
        }
    }

    fn next_id(&self, prefix: &str) -> String {
        let value = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{prefix}-{value:06}")
    }

    pub(crate) fn record_application(
        &self,
        fields: HashMap<String, String>,
        files: Vec<StoredFile>,
    ) -> StoredApplication {
        let application = StoredApplication {
            id: self.next_id("app"),
            fields,
            files,
        };
        self.applications
            .lock()
            .expect("application mutex poisoned")
            .push(application.clone());
        application
    }

    pub(crate) fn applications(&self) -> Vec<StoredApplication> {
        self.applications
            .lock()
            .expect("application mutex poisoned")
            .clone()
    }

    pub(crate) fn rows(&self, kind: ResourceKind) -> Vec<Value> {
        self.collections
            .lock()
            .expect("collection mutex poisoned")
            .get(kind.endpoint())
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn insert(&self, kind: ResourceKind, body: Map<String, Value>) -> Value {
        let mut record = body;
        if !record.get("id").map(Value::is_string).unwrap_or(false) {
            record.insert("id".to_string(), json!(self.next_id(kind.id_prefix())));
        }
        record
            .entry("createdAt")
            .or_insert_with(|| json!(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)));

        let record = Value::Object(record);
        self.collections
            .lock()
            .expect("collection mutex poisoned")
            .entry(kind.endpoint())
            .or_default()
            .push(record.clone());
        record
    }

    /// Shallow-merge `patch` into the record; `None` when the id is unknown.
    pub(crate) fn patch(
        &self,
        kind: ResourceKind,
        id: &str,
        patch: &Map<String, Value>,
    ) -> Option<Value> {
        let mut guard = self.collections.lock().expect("collection mutex poisoned");
        let record = guard
            .get_mut(kind.endpoint())?
            .iter_mut()
            .find(|row| row["id"] == id)?;
        if let Some(target) = record.as_object_mut() {
            for (key, value) in patch.iter().filter(|(key, _)| key.as_str() != "id") {
                target.insert(key.clone(), value.clone());
            }
        }
        Some(record.clone())
    }

    pub(crate) fn remove(&self, kind: ResourceKind, id: &str) -> bool {
        let mut guard = self.collections.lock().expect("collection mutex poisoned");
        let Some(rows) = guard.get_mut(kind.endpoint()) else {
            return false;
        };
        let before = rows.len();
        rows.retain(|row| row["id"] != id);
        rows.len() != before
    }

    pub(crate) fn queue_email(&self, entry: OutboxEntry) {
        self.outbox.lock().expect("outbox mutex poisoned").push(entry);
    }

    pub(crate) fn outbox(&self) -> Vec<OutboxEntry> {
        self.outbox.lock().expect("outbox mutex poisoned").clone()
    }

    /// A few records so a freshly started stub has something to list.
    pub(crate) fn seed_demo_data(&self) {
        let contacts = [
            ("Ada Lovelace", "Campus tour", "new"),
            ("Grace Hopper", "Scholarship deadlines", "read"),
            ("Alan Turing", "Transfer credits", "new"),
        ];
        for (name, subject, status) in contacts {
            self.insert(
                ResourceKind::Contacts,
                object(json!({
                    "name": name,
                    "email": format!("{}@example.edu", name.to_lowercase().replace(' ', ".")),
                    "subject": subject,
                    "message": format!("Hello, I have a question about {}.", subject.to_lowercase()),
                    "status": status,
                })),
            );
        }

        self.insert(
            ResourceKind::Customers,
            object(json!({
                "name": "Northside Travel",
                "email": "groups@northside.example.com",
                "organization": "Northside Travel",
                "status": "lead",
                "source": "website",
            })),
        );

        self.insert(
            ResourceKind::Posts,
            object(json!({
                "title": "Open day this spring",
                "slug": "open-day-spring",
                "excerpt": "Meet faculty and tour the main campus.",
                "content": "Join us for tours, talks, and lunch on the main campus.",
                "author": "Admissions Office",
                "category": "events",
                "status": "published",
                "publishedAt": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            })),
        );
    }
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Parse a `key=value` argument; the value is read as JSON when it parses, else as text.
pub(crate) fn parse_assignment(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{raw}'"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

/// Parse a `key=value` argument keeping the value as text.
pub(crate) fn parse_filter(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    if key.trim().is_empty() {
        return Err(format!("missing key in '{raw}'"));
    }
    Ok((key.trim().to_string(), value.trim().to_string()))
}
