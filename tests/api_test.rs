use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use candidacy_backend::{
    dto::detail_dto::{APPLICANT_NOT_AVAILABLE, APPLIED_AT_NOT_AVAILABLE, JOB_NOT_AVAILABLE},
    routes,
    services::profile_links::LinkOpener,
    store::{Collections, MemoryDocumentStore},
    utils::time::display_offset,
    AppState,
};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;

fn seeded_store() -> Arc<MemoryDocumentStore> {
    let store = Arc::new(MemoryDocumentStore::new());
    store.insert(
        "applications",
        "A1",
        json!({
            "jobId": "J1",
            "userId": "U1",
            "status": "Pendente",
            "companyId": "C1",
            "appliedAt": { "seconds": 1_740_832_245i64, "nanoseconds": 0 }
        }),
    );
    store.insert(
        "accounts",
        "U1",
        json!({
            "name_conta": "Joana Dev",
            "email": "joana@example.com",
            "telefone": "81999990000",
            "desc_sobre": "Backend developer",
            "instagram": "@joe.dev",
            "linkedin": "janedoe"
        }),
    );
    store
}

fn app(store: Arc<MemoryDocumentStore>) -> Router {
    let state = AppState::new(store, &Collections::default(), display_offset(-180));
    routes::router(state)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<JsonValue>) -> (StatusCode, JsonValue) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let res = app.clone().oneshot(request).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn open_session(app: &Router) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/sessions",
        Some(json!({ "application_id": "A1", "job_id": "J1", "applicant_id": "U1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["session_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn detail_with_deleted_job_shows_notice_and_applicant() {
    let app = app(seeded_store());

    let (status, body) = send(&app, "GET", "/api/applications/A1/detail?job_id=J1&applicant_id=U1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["application"]["id"], "A1");
    assert_eq!(body["application"]["status"], "Pendente");
    assert_eq!(body["application"]["applied_at_display"], "01/03/2025 às 09:30:45");
    assert!(body["job"].is_null());
    assert_eq!(body["job_notice"], JOB_NOT_AVAILABLE);
    assert_eq!(body["applicant"]["display_name"], "Joana Dev");
    assert_eq!(body["applicant"]["bio"], "Backend developer");
    assert_eq!(body["applicant"]["links"]["instagram"], "https://www.instagram.com/joe.dev");
    assert_eq!(body["applicant"]["links"]["linkedin"], "https://www.linkedin.com/in/janedoe");
    assert!(body.get("applicant_notice").is_none());
}

#[tokio::test]
async fn detail_with_everything_present() {
    let store = seeded_store();
    store.insert(
        "jobPostings",
        "J1",
        json!({
            "nome_vaga": "Dev Rust",
            "nome_empresa": "Acme",
            "localizacao": "Recife",
            "modalidade": "Remoto",
            "regime": "CLT",
            "salario": 5000,
            "email": "rh@acme.com"
        }),
    );
    store.insert("applications", "A1", json!({ "jobId": "J1", "userId": "U1" }));
    store.remove("accounts", "U1");
    let app = app(store);

    let (status, body) = send(&app, "GET", "/api/applications/A1/detail?job_id=J1&applicant_id=U1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["job"]["title"], "Dev Rust");
    assert_eq!(body["job"]["salary"], "5000");
    assert_eq!(body["application"]["status"], "Pendente");
    assert_eq!(body["application"]["applied_at_display"], APPLIED_AT_NOT_AVAILABLE);
    assert!(body["applicant"].is_null());
    assert_eq!(body["applicant_notice"], APPLICANT_NOT_AVAILABLE);
}

#[tokio::test]
async fn detail_error_statuses() {
    let store = seeded_store();
    let app = app(store.clone());

    let (status, body) = send(&app, "GET", "/api/applications/missing/detail?job_id=J1&applicant_id=U1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, "GET", "/api/applications/A1/detail?job_id=J1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(store.read_count(), 1);

    store.set_fail_reads(true);
    let (status, _) = send(&app, "GET", "/api/applications/A1/detail?job_id=J1&applicant_id=U1", None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn lists_every_status_with_its_action() {
    let app = app(seeded_store());
    let (status, body) = send(&app, "GET", "/api/statuses", None).await;
    assert_eq!(status, StatusCode::OK);
    let values: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["value"].as_str().unwrap())
        .collect();
    assert_eq!(values, ["Pendente", "Visualizada", "Aceita", "Rejeitada"]);
}

#[tokio::test]
async fn session_flow_end_to_end() {
    let store = seeded_store();
    let app = app(store.clone());
    let session_id = open_session(&app).await;

    let (status, body) = send(&app, "GET", &format!("/api/sessions/{}", session_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["loaded"], true);
    assert_eq!(body["busy"], false);
    assert_eq!(body["current_status"], "Pendente");
    assert_eq!(body["detail"]["job_notice"], JOB_NOT_AVAILABLE);

    let reads_before_update = store.read_count();
    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/sessions/{}/status", session_id),
        Some(json!({ "status": "Aceita" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["status"], "Aceita");
    assert_eq!(body["application_id"], "A1");

    let (_, body) = send(&app, "GET", &format!("/api/sessions/{}", session_id), None).await;
    assert_eq!(body["current_status"], "Aceita");
    assert_eq!(body["detail"]["application"]["status"], "Aceita");
    assert_eq!(store.read_count(), reads_before_update);

    let stored = store.snapshot("applications", "A1").unwrap();
    assert_eq!(stored["status"], "Aceita");
    assert_eq!(stored["companyId"], "C1");

    let (status, body) = send(&app, "POST", &format!("/api/sessions/{}/reload", session_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["current_status"], "Aceita");

    let (status, _) = send(&app, "DELETE", &format!("/api/sessions/{}", session_id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "GET", &format!("/api/sessions/{}", session_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn open_session_rejects_blank_ids_and_unknown_applications() {
    let app = app(seeded_store());

    let (status, _) = send(
        &app,
        "POST",
        "/api/sessions",
        Some(json!({ "application_id": "A1", "job_id": "", "applicant_id": "U1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/api/sessions",
        Some(json!({ "application_id": "nope", "job_id": "J1", "applicant_id": "U1" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, health) = send(&app, "GET", "/health", None).await;
    assert_eq!(health["open_sessions"], 0);
}

#[tokio::test]
async fn failed_status_write_keeps_previous_status() {
    let store = seeded_store();
    let app = app(store.clone());
    let session_id = open_session(&app).await;

    store.set_fail_writes(true);
    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/sessions/{}/status", session_id),
        Some(json!({ "status": "Rejeitada" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("status"));

    let (_, body) = send(&app, "GET", &format!("/api/sessions/{}", session_id), None).await;
    assert_eq!(body["current_status"], "Pendente");
    assert_eq!(body["busy"], false);
    assert_eq!(store.snapshot("applications", "A1").unwrap()["status"], "Pendente");
}

#[tokio::test]
async fn second_update_while_first_in_flight_is_conflict() {
    let store = seeded_store();
    let app = app(store.clone());
    let session_id = open_session(&app).await;
    store.set_write_delay(Some(Duration::from_millis(300)));

    let uri = format!("/api/sessions/{}/status", session_id);
    let first = {
        let app = app.clone();
        let uri = uri.clone();
        tokio::spawn(async move {
            send(&app, "PATCH", &uri, Some(json!({ "status": "Aceita" }))).await
        })
    };

    loop {
        let (_, body) = send(&app, "GET", &format!("/api/sessions/{}", session_id), None).await;
        if body["busy"] == true {
            break;
        }
        tokio::task::yield_now().await;
    }
    let (status, _) = send(&app, "PATCH", &uri, Some(json!({ "status": "Rejeitada" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = first.await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Aceita");
    assert_eq!(store.write_count(), 1);
}

#[tokio::test]
async fn unknown_status_value_is_rejected() {
    let app = app(seeded_store());
    let session_id = open_session(&app).await;
    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/sessions/{}/status", session_id),
        Some(json!({ "status": "Contratada" })),
    )
    .await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn resolves_profile_links() {
    let app = app(seeded_store());

    let (status, body) = send(&app, "GET", "/api/profile-links?network=instagram&handle=%40joe.dev", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"], "https://www.instagram.com/joe.dev");
    assert_eq!(body["input"], "@joe.dev");

    let (status, body) = send(&app, "GET", "/api/profile-links?network=linkedin&handle=janedoe", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"], "https://www.linkedin.com/in/janedoe");

    let (status, _) = send(&app, "GET", "/api/profile-links?network=tiktok&handle=joe", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/api/profile-links?network=instagram", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, "GET", "/api/profile-links?network=instagram&handle=http%3A%2F%2F", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("http://"));
}

/// Refuses every link, as a device without a browser would.
struct NoBrowser;

impl LinkOpener for NoBrowser {
    fn can_open(&self, _url: &str) -> bool {
        false
    }
}

#[tokio::test]
async fn unopenable_links_are_left_out_of_the_detail() {
    let state = AppState::new(seeded_store(), &Collections::default(), display_offset(-180))
        .with_link_opener(Arc::new(NoBrowser));
    let app = routes::router(state);

    let (status, body) = send(&app, "GET", "/api/applications/A1/detail?job_id=J1&applicant_id=U1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["applicant"]["instagram"], "@joe.dev");
    assert!(body["applicant"]["links"]["instagram"].is_null());
    assert!(body["applicant"]["links"]["email"].is_null());

    let (status, body) = send(&app, "GET", "/api/profile-links?network=linkedin&handle=janedoe", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("janedoe"));
}
