use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::backend::BackendError;
use crate::workflows::admin::backend::AdminBackend;
use crate::workflows::admin::query::{ListQuery, PageEnvelope, Pagination};
use crate::workflows::email::{EmailError, EmailGateway, EmailMessage};

pub(super) const SIGN_IN: &str = "/admin/login";

/// In-memory admin endpoint that pages and patches raw JSON rows.
#[derive(Default)]
pub(super) struct MemoryBackend {
    rows: Mutex<Vec<Value>>,
    failure: Mutex<Option<BackendError>>,
    calls: Mutex<Vec<String>>,
}

impl MemoryBackend {
    pub(super) fn with_rows(rows: Vec<Value>) -> Arc<Self> {
        Arc::new(Self {
            rows: Mutex::new(rows),
            ..Self::default()
        })
    }

    pub(super) fn fail_with(&self, error: BackendError) {
        *self.failure.lock().expect("failure mutex poisoned") = Some(error);
    }

    pub(super) fn recover(&self) {
        *self.failure.lock().expect("failure mutex poisoned") = None;
    }

    pub(super) fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }

    pub(super) fn row(&self, id: &str) -> Option<Value> {
        self.rows
            .lock()
            .expect("rows mutex poisoned")
            .iter()
            .find(|row| row["id"] == id)
            .cloned()
    }

    fn record(&self, call: String) -> Result<(), BackendError> {
        self.calls.lock().expect("calls mutex poisoned").push(call);
        match self.failure.lock().expect("failure mutex poisoned").clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl AdminBackend for MemoryBackend {
    async fn list(
        &self,
        endpoint: &str,
        query: &ListQuery,
    ) -> Result<PageEnvelope<Value>, BackendError> {
        self.record(format!("GET {endpoint}?page={}", query.page))?;
        let rows = self.rows.lock().expect("rows mutex poisoned");
        let limit = query.limit.max(1) as usize;
        let start = (query.page.max(1) as usize - 1) * limit;
        let data: Vec<Value> = rows.iter().skip(start).take(limit).cloned().collect();
        Ok(PageEnvelope {
            success: true,
            pagination: Some(Pagination {
                total: rows.len() as u64,
                page: query.page,
                limit: query.limit,
                has_more: start + data.len() < rows.len(),
            }),
            data,
            error: None,
        })
    }

    async fn create(&self, endpoint: &str, body: Value) -> Result<Value, BackendError> {
        self.record(format!("POST {endpoint}"))?;
        self.rows
            .lock()
            .expect("rows mutex poisoned")
            .push(body.clone());
        Ok(body)
    }

    async fn update(&self, endpoint: &str, id: &str, patch: Value) -> Result<Value, BackendError> {
        self.record(format!("PATCH {endpoint}/{id}"))?;
        let mut rows = self.rows.lock().expect("rows mutex poisoned");
        let row = rows
            .iter_mut()
            .find(|row| row["id"] == id)
            .ok_or(BackendError::Rejected {
                status: 404,
                message: "Record not found".to_string(),
            })?;
        if let (Some(target), Some(changes)) = (row.as_object_mut(), patch.as_object()) {
            for (key, value) in changes {
                target.insert(key.clone(), value.clone());
            }
        }
        Ok(row.clone())
    }

    async fn delete(&self, endpoint: &str, id: &str) -> Result<(), BackendError> {
        self.record(format!("DELETE {endpoint}/{id}"))?;
        self.rows
            .lock()
            .expect("rows mutex poisoned")
            .retain(|row| row["id"] != id);
        Ok(())
    }
}

#[derive(Default)]
pub(super) struct MemoryOutbox {
    sent: Mutex<Vec<EmailMessage>>,
    failure: Option<EmailError>,
}

impl MemoryOutbox {
    pub(super) fn failing(error: EmailError) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failure: Some(error),
        }
    }

    pub(super) fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().expect("outbox mutex poisoned").clone()
    }
}

#[async_trait]
impl EmailGateway for MemoryOutbox {
    async fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        message.validate()?;
        self.sent
            .lock()
            .expect("outbox mutex poisoned")
            .push(message);
        Ok(())
    }
}

pub(super) fn contact(id: &str, name: &str, subject: &str, status: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "email": format!("{}@example.edu", name.to_lowercase().replace(' ', ".")),
        "subject": subject,
        "message": format!("Question about {subject}.\nThanks!"),
        "status": status,
        "createdAt": "2025-03-04T09:30:00Z",
    })
}

pub(super) fn contacts() -> Vec<Value> {
    vec![
        contact("c-1", "Ada Lovelace", "Campus tour", "new"),
        contact("c-2", "Grace Hopper", "Scholarships", "read"),
        contact("c-3", "Alan Turing", "Campus housing", "new"),
        contact("c-4", "Edsger Dijkstra", "Transfer credits", "archived"),
    ]
}

pub(super) fn customer(id: &str, name: &str, status: &str, source: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "email": format!("{}@tours.example.com", name.to_lowercase()),
        "organization": "Northside Travel",
        "status": status,
        "source": source,
        "createdAt": "2025-01-10T12:00:00Z",
    })
}
