use crate::infra::{AppState, OutboxEntry, PortalStore, ResourceKind, StoredFile};
use admissions::files::FileHandle;
use admissions::workflows::admin::query::{ListFilter, Pagination, DEFAULT_PAGE_SIZE};
use admissions::workflows::email::{
    EmailBody, EmailMessage, ADMIN_EMAIL_PATH, PUBLIC_EMAIL_PATH,
};
use admissions::workflows::intake::{
    DocumentSlot, DraftField, FieldUpdate, WizardStep, INTAKE_PATH, SUBMIT_SUCCESS_MESSAGE,
};
use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use axum::{Extension, Json, Router};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Largest accepted transcript or recommendation upload.
pub(crate) const MAX_DOCUMENT_BYTES: usize = 10 * 1024 * 1024;

const REQUEST_BODY_LIMIT: usize = 2 * MAX_DOCUMENT_BYTES + 1024 * 1024;

const ALLOWED_DOCUMENT_TYPES: [&str; 5] = [
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "image/jpeg",
    "image/png",
];

type Store = State<Arc<PortalStore>>;

pub(crate) fn with_portal_routes(store: Arc<PortalStore>) -> Router {
    let admin = ResourceKind::ALL
        .into_iter()
        .fold(Router::<Arc<PortalStore>>::new(), |router, kind| {
            let collection = get(
                move |state: Store, headers: HeaderMap, query: Query<HashMap<String, String>>| {
                    list_records(state, headers, query, kind)
                },
            )
            .post(move |state: Store, headers: HeaderMap, body: Json<Value>| {
                create_record(state, headers, body, kind)
            });
            let item = patch(
                move |state: Store, headers: HeaderMap, id: Path<String>, body: Json<Value>| {
                    update_record(state, headers, id, body, kind)
                },
            )
            .delete(move |state: Store, headers: HeaderMap, id: Path<String>| {
                delete_record(state, headers, id, kind)
            });

            router
                .route(kind.endpoint(), collection)
                .route(&format!("{}/:id", kind.endpoint()), item)
        });

    Router::new()
        .route(INTAKE_PATH, post(apply_handler))
        .route(ADMIN_EMAIL_PATH, post(admin_email_handler))
        .route(PUBLIC_EMAIL_PATH, post(public_email_handler))
        .merge(admin)
        .layer(DefaultBodyLimit::max(REQUEST_BODY_LIMIT))
        .with_state(store)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

fn require_admin(store: &PortalStore, headers: &HeaderMap) -> Result<(), Response> {
    if store.is_authorized(bearer_token(headers)) {
        Ok(())
    } else {
        Err(error_response(StatusCode::UNAUTHORIZED, "Unauthorized"))
    }
}

pub(crate) async fn healthcheck() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// A multipart form read fully into memory.
#[derive(Default)]
struct FormParts {
    fields: HashMap<String, String>,
    files: Vec<(String, FileHandle)>,
}

async fn read_form(mut multipart: Multipart) -> Result<FormParts, Response> {
    let mut form = FormParts::default();
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Ok(form),
            Err(err) => return Err(error_response(err.status(), err.body_text())),
        };

        let name = field.name().unwrap_or_default().to_string();
        match field.file_name().map(str::to_string) {
            Some(file_name) => {
                let content_type = field
                    .content_type()
                    .and_then(|raw| raw.parse::<mime::Mime>().ok())
                    .filter(|mime| *mime != mime::APPLICATION_OCTET_STREAM)
                    .unwrap_or_else(|| mime_guess::from_path(&file_name).first_or_octet_stream());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|err| error_response(err.status(), err.body_text()))?;
                form.files
                    .push((name, FileHandle::new(file_name, content_type, bytes.to_vec())));
            }
            None => {
                let text = field
                    .text()
                    .await
                    .map_err(|err| error_response(err.status(), err.body_text()))?;
                form.fields.insert(name, text);
            }
        }
    }
}

fn check_document(part: &str, file: &FileHandle) -> Result<StoredFile, Response> {
    if file.len() > MAX_DOCUMENT_BYTES {
        return Err(error_response(
            StatusCode::PAYLOAD_TOO_LARGE,
            format!("{} exceeds the 10 MB limit", file.file_name()),
        ));
    }
    let essence = file.content_type().essence_str();
    if !ALLOWED_DOCUMENT_TYPES.contains(&essence) {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            format!(
                "{} has unsupported type {essence}; upload a PDF, Word document, JPEG, or PNG",
                file.file_name()
            ),
        ));
    }
    Ok(StoredFile {
        part: part.to_string(),
        file_name: file.file_name().to_string(),
        content_type: essence.to_string(),
        size: file.len(),
    })
}

pub(crate) async fn apply_handler(
    State(store): State<Arc<PortalStore>>,
    multipart: Multipart,
) -> Response {
    let form = match read_form(multipart).await {
        Ok(form) => form,
        Err(response) => return response,
    };

    let required = WizardStep::ALL
        .into_iter()
        .flat_map(|step| step.required_fields().iter().copied());
    let mut missing = Vec::new();
    for field in required {
        let present = match field {
            DraftField::Transcript | DraftField::Recommendation => {
                form.files.iter().any(|(name, _)| name == field.wire_name())
            }
            DraftField::Consent => true,
            _ => form
                .fields
                .get(field.wire_name())
                .map(|value| !value.trim().is_empty())
                .unwrap_or(false),
        };
        if !present {
            missing.push(field.label());
        }
    }
    if !missing.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            format!("Missing required fields: {}", missing.join(", ")),
        );
    }

    for field in DraftField::TEXT_FIELDS {
        if let Some(raw) = form.fields.get(field.wire_name()) {
            if let Err(err) = FieldUpdate::parse(field, raw) {
                return error_response(StatusCode::BAD_REQUEST, err.to_string());
            }
        }
    }

    let mut stored_files = Vec::new();
    for slot in DocumentSlot::ALL {
        if let Some((part, file)) = form
            .files
            .iter()
            .find(|(name, _)| name == slot.part_name())
        {
            match check_document(part, file) {
                Ok(stored) => stored_files.push(stored),
                Err(response) => return response,
            }
        }
    }

    let application = store.record_application(form.fields, stored_files);
    info!(
        application_id = %application.id,
        files = application.files.len(),
        "application received"
    );
    (
        StatusCode::CREATED,
        Json(json!({
            "applicationId": application.id,
            "message": SUBMIT_SUCCESS_MESSAGE,
        })),
    )
        .into_response()
}

fn string_values(row: &Value) -> Vec<&str> {
    row.as_object()
        .map(|map| map.values().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

/// The same narrowing the admin screens apply, over untyped rows.
fn matches_filter(filter: &ListFilter, row: &Value) -> bool {
    let needle = filter.search.trim().to_lowercase();
    let search_hit = needle.is_empty()
        || string_values(row)
            .iter()
            .any(|text| text.to_lowercase().contains(&needle));
    search_hit
        && filter
            .facets
            .iter()
            .filter(|(_, wanted)| !wanted.trim().is_empty() && !wanted.eq_ignore_ascii_case("all"))
            .all(|(name, wanted)| {
                row.get(name)
                    .and_then(Value::as_str)
                    .map(|actual| actual.eq_ignore_ascii_case(wanted.trim()))
                    .unwrap_or(false)
            })
}

pub(crate) async fn list_records(
    State(store): State<Arc<PortalStore>>,
    headers: HeaderMap,
    Query(mut params): Query<HashMap<String, String>>,
    kind: ResourceKind,
) -> Response {
    if let Err(response) = require_admin(&store, &headers) {
        return response;
    }

    let page = params
        .remove("page")
        .and_then(|raw| raw.parse::<u32>().ok())
        .unwrap_or(1)
        .max(1);
    let limit = params
        .remove("limit")
        .and_then(|raw| raw.parse::<u32>().ok())
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, 100);
    let filter = ListFilter {
        search: params.remove("search").unwrap_or_default(),
        facets: params.into_iter().collect(),
    };

    let rows: Vec<Value> = store
        .rows(kind)
        .into_iter()
        .filter(|row| matches_filter(&filter, row))
        .collect();
    let start = (page as usize - 1).saturating_mul(limit as usize);
    let data: Vec<Value> = rows.iter().skip(start).take(limit as usize).cloned().collect();
    let pagination = Pagination {
        total: rows.len() as u64,
        page,
        limit,
        has_more: start.saturating_add(data.len()) < rows.len(),
    };

    Json(json!({
        "success": true,
        "data": data,
        "pagination": pagination,
    }))
    .into_response()
}

fn body_object(body: Value) -> Result<Map<String, Value>, Response> {
    match body {
        Value::Object(map) => Ok(map),
        _ => Err(error_response(
            StatusCode::BAD_REQUEST,
            "Request body must be a JSON object",
        )),
    }
}

pub(crate) async fn create_record(
    State(store): State<Arc<PortalStore>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
    kind: ResourceKind,
) -> Response {
    if let Err(response) = require_admin(&store, &headers) {
        return response;
    }
    let body = match body_object(body) {
        Ok(body) => body,
        Err(response) => return response,
    };

    let record = store.insert(kind, body);
    info!(endpoint = kind.endpoint(), id = %record["id"], "record created");
    (
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": record })),
    )
        .into_response()
}

pub(crate) async fn update_record(
    State(store): State<Arc<PortalStore>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
    kind: ResourceKind,
) -> Response {
    if let Err(response) = require_admin(&store, &headers) {
        return response;
    }
    let patch = match body_object(body) {
        Ok(patch) => patch,
        Err(response) => return response,
    };

    match store.patch(kind, &id, &patch) {
        Some(record) => {
            info!(endpoint = kind.endpoint(), %id, "record updated");
            Json(json!({ "success": true, "data": record })).into_response()
        }
        None => error_response(StatusCode::NOT_FOUND, "Record not found"),
    }
}

pub(crate) async fn delete_record(
    State(store): State<Arc<PortalStore>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    kind: ResourceKind,
) -> Response {
    if let Err(response) = require_admin(&store, &headers) {
        return response;
    }

    if store.remove(kind, &id) {
        info!(endpoint = kind.endpoint(), %id, "record deleted");
        Json(json!({ "success": true })).into_response()
    } else {
        error_response(StatusCode::NOT_FOUND, "Record not found")
    }
}

async fn accept_email(store: &PortalStore, multipart: Multipart) -> Response {
    let form = match read_form(multipart).await {
        Ok(form) => form,
        Err(response) => return response,
    };

    let field = |name: &str| form.fields.get(name).cloned().unwrap_or_default();
    let recipients: Vec<String> = field("to")
        .split(',')
        .map(str::trim)
        .filter(|address| !address.is_empty())
        .map(str::to_string)
        .collect();
    let body = if field("isHtml").eq_ignore_ascii_case("true") {
        EmailBody::Html(field("message"))
    } else {
        EmailBody::Text(field("message"))
    };

    let mut message = EmailMessage::new(String::new(), field("subject"), body);
    message.to = recipients;
    message.attachments = form
        .files
        .into_iter()
        .filter(|(name, _)| name == "attachments")
        .map(|(_, file)| file)
        .collect();

    if let Err(err) = message.validate() {
        warn!(error = %err, "email rejected");
        return error_response(StatusCode::BAD_REQUEST, err.to_string());
    }

    let entry = OutboxEntry {
        to: message.to.clone(),
        subject: message.subject.clone(),
        is_html: message.body.is_html(),
        attachments: message
            .attachments
            .iter()
            .map(|file| file.file_name().to_string())
            .collect(),
    };
    info!(
        recipients = entry.to.len(),
        attachments = entry.attachments.len(),
        "email queued"
    );
    store.queue_email(entry);
    Json(json!({ "success": true, "message": "Email sent successfully" })).into_response()
}

pub(crate) async fn admin_email_handler(
    State(store): State<Arc<PortalStore>>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response {
    if let Err(response) = require_admin(&store, &headers) {
        return response;
    }
    accept_email(&store, multipart).await
}

pub(crate) async fn public_email_handler(
    State(store): State<Arc<PortalStore>>,
    multipart: Multipart,
) -> Response {
    accept_email(&store, multipart).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use admissions::backend::BackendClient;
    use admissions::config::BackendConfig;
    use admissions::workflows::email::{EmailGateway, EmailRoute, HttpEmailGateway};
    use admissions::workflows::intake::{
        FieldUpdate, HttpIntakeGateway, IntakeWizard, SubmitOutcome,
    };
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use reqwest::multipart::{Form, Part};
    use std::net::SocketAddr;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    const TOKEN: &str = "staff-secret";

    fn store() -> Arc<PortalStore> {
        let store = PortalStore::new(Some(TOKEN.to_string()));
        store.seed_demo_data();
        Arc::new(store)
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body readable");
        serde_json::from_slice(&bytes).expect("json body")
    }

    async fn spawn(store: Arc<PortalStore>) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        let app = with_portal_routes(store);
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("stub serves");
        });
        addr
    }

    fn text_fields() -> Vec<(&'static str, &'static str)> {
        vec![
            ("firstName", "Ada"),
            ("lastName", "Lovelace"),
            ("email", "ada@example.edu"),
            ("phone", "+44 20 7946 0000"),
            ("dateOfBirth", "2006-04-12"),
            ("nationality", "international"),
            ("gender", "female"),
            ("previousEducation", "Riverside High School"),
            ("gpa", "3.8"),
            ("graduationYear", "2024"),
            ("programChoice", "computer_science"),
            ("campusChoice", "online"),
            ("personalStatement", "I want to build analytical engines."),
        ]
    }

    fn form_with(transcript: Part) -> Form {
        text_fields()
            .into_iter()
            .fold(Form::new(), |form, (name, value)| form.text(name, value))
            .part("transcript", transcript)
    }

    async fn post_form(addr: SocketAddr, form: Form) -> (u16, Value) {
        let response = reqwest::Client::new()
            .post(format!("http://{addr}{INTAKE_PATH}"))
            .multipart(form)
            .send()
            .await
            .expect("request sent");
        let status = response.status().as_u16();
        let body = response.json::<Value>().await.expect("json body");
        (status, body)
    }

    fn pdf_part(name: &str, size: usize) -> Part {
        Part::bytes(vec![b'%'; size])
            .file_name(name.to_string())
            .mime_str("application/pdf")
            .expect("valid mime")
    }

    #[tokio::test]
    async fn healthcheck_and_readiness_report_status() {
        let readiness = Arc::new(AtomicBool::new(false));
        let state = AppState {
            readiness: readiness.clone(),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        let app = with_portal_routes(store()).layer(Extension(state));

        let response = app
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        readiness.store(true, std::sync::atomic::Ordering::Release);
        let response = app
            .oneshot(Request::get("/ready").body(Body::empty()).expect("request"))
            .await
            .expect("response");
        assert_eq!(json_body(response).await["status"], "ready");
    }

    #[tokio::test]
    async fn admin_routes_reject_missing_or_wrong_tokens() {
        let app = with_portal_routes(store());

        let response = app
            .clone()
            .oneshot(
                Request::get("/api/admin/contact")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["error"], "Unauthorized");

        let response = app
            .oneshot(
                Request::delete("/api/admin/customers/customer-000004")
                    .header(header::AUTHORIZATION, "Bearer guess")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn admin_list_pages_and_filters_rows() {
        let app = with_portal_routes(store());

        let response = app
            .oneshot(
                Request::get("/api/admin/contact?page=1&limit=1&status=new")
                    .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
        assert_eq!(body["data"][0]["name"], "Ada Lovelace");
        assert_eq!(
            body["pagination"],
            json!({ "total": 2, "page": 1, "limit": 1, "hasMore": true })
        );
    }

    #[tokio::test]
    async fn page_far_past_the_end_is_empty() {
        let app = with_portal_routes(store());

        let response = app
            .oneshot(
                Request::get("/api/admin/contact?page=50000000&limit=100")
                    .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["data"], json!([]));
        assert_eq!(
            body["pagination"],
            json!({ "total": 3, "page": 50000000, "limit": 100, "hasMore": false })
        );
    }

    #[tokio::test]
    async fn patch_of_unknown_record_is_not_found() {
        let app = with_portal_routes(store());

        let response = app
            .oneshot(
                Request::patch("/api/admin/blog/posts/post-999999")
                    .header(header::AUTHORIZATION, format!("Bearer {TOKEN}"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"status":"archived"}"#))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"], "Record not found");
    }

    #[tokio::test]
    async fn wizard_submission_is_accepted_and_stored() {
        let store = store();
        let addr = spawn(store.clone()).await;
        let client = BackendClient::new(&BackendConfig::new(format!("http://{addr}")))
            .expect("client builds");
        let gateway = HttpIntakeGateway::new(client);

        let mut wizard = IntakeWizard::new();
        for (name, raw) in text_fields() {
            let field = DraftField::from_wire_name(name).expect("known field");
            wizard.update_field(FieldUpdate::parse(field, raw).expect("valid answer"));
        }
        wizard.attach_file(
            DocumentSlot::Transcript,
            FileHandle::new("transcript.pdf", mime::APPLICATION_PDF, b"%PDF-1.7".to_vec()),
        );
        for _ in 0..3 {
            wizard.next().expect("advance");
        }
        wizard.set_consent(true);

        let outcome = wizard.submit(&gateway).await;

        assert!(matches!(outcome, SubmitOutcome::Submitted(_)));
        assert_eq!(wizard.notices()[0].message, SUBMIT_SUCCESS_MESSAGE);
        let stored = store.applications();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].fields["programChoice"], "computer_science");
        assert_eq!(stored[0].files[0].file_name, "transcript.pdf");
        assert_eq!(stored[0].files[0].content_type, "application/pdf");
    }

    #[tokio::test]
    async fn intake_rejects_missing_fields() {
        let addr = spawn(store()).await;
        let form = Form::new()
            .text("firstName", "Ada")
            .text("email", "ada@example.edu");

        let (status, body) = post_form(addr, form).await;

        assert_eq!(status, 400);
        let message = body["error"].as_str().expect("error message");
        assert!(message.starts_with("Missing required fields: Last name"));
        assert!(message.contains("Transcript"));
    }

    #[tokio::test]
    async fn intake_rejects_unsupported_and_oversized_documents() {
        let store = store();
        let addr = spawn(store.clone()).await;

        let script = Part::bytes(b"#!/bin/sh".to_vec())
            .file_name("transcript.sh")
            .mime_str("application/x-sh")
            .expect("valid mime");
        let (status, body) = post_form(addr, form_with(script)).await;
        assert_eq!(status, 400);
        assert!(body["error"]
            .as_str()
            .expect("error message")
            .contains("unsupported type application/x-sh"));

        let (status, body) =
            post_form(addr, form_with(pdf_part("huge.pdf", MAX_DOCUMENT_BYTES + 1))).await;
        assert_eq!(status, 413);
        assert_eq!(body["error"], "huge.pdf exceeds the 10 MB limit");

        assert!(store.applications().is_empty());
    }

    #[tokio::test]
    async fn intake_rejects_values_outside_the_choice_lists() {
        let addr = spawn(store()).await;
        let form = text_fields()
            .into_iter()
            .fold(Form::new(), |form, (name, value)| {
                let value = if name == "campusChoice" { "moon" } else { value };
                form.text(name, value)
            })
            .part("transcript", pdf_part("transcript.pdf", 64));

        let (status, body) = post_form(addr, form).await;

        assert_eq!(status, 400);
        assert!(body["error"].as_str().expect("error message").contains("moon"));
    }

    #[tokio::test]
    async fn email_routes_queue_valid_messages() {
        let store = store();
        let addr = spawn(store.clone()).await;
        let config = BackendConfig::new(format!("http://{addr}"));

        let public = HttpEmailGateway::new(
            BackendClient::new(&config).expect("client builds"),
            EmailRoute::Public,
        );
        let message = EmailMessage::new(
            "ada@example.edu",
            "Your campus tour",
            EmailBody::Html("<p>See you Friday.</p>".to_string()),
        )
        .with_attachment(FileHandle::new(
            "map.pdf",
            mime::APPLICATION_PDF,
            b"%PDF".to_vec(),
        ));
        public.send(message.clone()).await.expect("public send");

        let anonymous_admin = HttpEmailGateway::new(
            BackendClient::new(&config).expect("client builds"),
            EmailRoute::Admin,
        );
        let error = anonymous_admin
            .send(message)
            .await
            .expect_err("admin route needs a token");
        assert_eq!(error.to_string(), "authentication required");

        let outbox = store.outbox();
        assert_eq!(outbox.len(), 1);
        assert_eq!(outbox[0].to, vec!["ada@example.edu".to_string()]);
        assert!(outbox[0].is_html);
        assert_eq!(outbox[0].attachments, vec!["map.pdf".to_string()]);
    }
}
