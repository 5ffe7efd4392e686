use axum::http::{self, Request, StatusCode};
use axum::response::Response;
use axum::routing::RouterIntoService;
use http_body_util::BodyExt;
use mock_server::{app, store::Client};
use serde_json::Value;
use tower::{Service, ServiceExt};

const TOKEN: &str = "Bearer test-token";

async fn body_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder()
        .uri(uri)
        .header(http::header::AUTHORIZATION, TOKEN)
        .body(String::new())
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, TOKEN)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty(method: &str, uri: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, TOKEN)
        .body(String::new())
        .unwrap()
}

async fn call(app: &mut RouterIntoService<String>, request: Request<String>) -> Response {
    ServiceExt::ready(app).await.unwrap().call(request).await.unwrap()
}

// --- auth ---

#[tokio::test]
async fn missing_bearer_token_is_401() {
    let resp = app()
        .oneshot(Request::builder().uri("/clients").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = body_json(resp).await;
    assert_eq!(body["detail"], "Missing bearer token");
}

#[tokio::test]
async fn blank_bearer_token_is_401() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/clients")
                .header(http::header::AUTHORIZATION, "Bearer   ")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- clients ---

#[tokio::test]
async fn list_clients_empty() {
    let resp = app().oneshot(get("/clients")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let clients: Vec<Client> = body_json(resp).await;
    assert!(clients.is_empty());
}

#[tokio::test]
async fn create_client_returns_201() {
    let resp = app()
        .oneshot(json_request("POST", "/clients", r#"{"type":"Company","name":"Acme"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let client: Client = body_json(resp).await;
    assert_eq!(client.name, "Acme");
    assert!(client.is_active);
    assert_eq!(client.job_count, Some(0));
}

#[tokio::test]
async fn create_client_blank_name_returns_400() {
    let resp = app()
        .oneshot(json_request("POST", "/clients", r#"{"name":"  "}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = body_json(resp).await;
    assert_eq!(body["detail"], "Name is required");
}

#[tokio::test]
async fn create_client_malformed_json_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/clients", r#"{"not_name":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn get_client_not_found() {
    let resp = app().oneshot(get("/clients/999")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = body_json(resp).await;
    assert_eq!(body["detail"], "Client not found");
}

#[tokio::test]
async fn get_client_bad_id_returns_400() {
    let resp = app().oneshot(get("/clients/not-a-number")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deactivated_clients_drop_out_of_active_list() {
    let mut app = app().into_service();

    let resp = call(&mut app, json_request("POST", "/clients", r#"{"name":"Acme"}"#)).await;
    let acme: Client = body_json(resp).await;
    call(&mut app, json_request("POST", "/clients", r#"{"name":"Globex"}"#)).await;

    let resp = call(&mut app, empty("PATCH", &format!("/clients/{}/deactivate", acme.id))).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    let active: Vec<Client> = body_json(call(&mut app, get("/clients?active_only=true")).await).await;
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].name, "Globex");

    let all: Vec<Client> = body_json(call(&mut app, get("/clients")).await).await;
    assert_eq!(all.len(), 2);
}

// --- jobs & invoices ---

#[tokio::test]
async fn job_for_unknown_client_is_404() {
    let resp = app()
        .oneshot(json_request("POST", "/jobs", r#"{"clientId":42,"title":"Roof"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invoice_lifecycle() {
    let mut app = app().into_service();

    let client: Client =
        body_json(call(&mut app, json_request("POST", "/clients", r#"{"name":"Acme"}"#)).await).await;
    let resp = call(
        &mut app,
        json_request(
            "POST",
            "/jobs",
            &format!(r#"{{"clientId":{},"title":"Roof","estimatedValue":1200}}"#, client.id),
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let job: Value = body_json(resp).await;
    assert_eq!(job["status"], "Lead");
    assert_eq!(job["clientName"], "Acme");
    let job_id = job["id"].as_i64().unwrap();

    // unknown status is rejected
    let resp = call(
        &mut app,
        json_request("PATCH", &format!("/jobs/{job_id}/status"), r#"{"status":"Done"}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = call(
        &mut app,
        json_request("POST", "/invoices", &format!(r#"{{"jobId":{job_id},"amount":0}}"#)),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let invoice: Value = body_json(resp).await;
    assert_eq!(invoice["status"], "Draft");
    assert_eq!(invoice["iteration"], 1);
    assert_eq!(invoice["jobTitle"], "Roof");
    let invoice_id = invoice["id"].as_i64().unwrap();

    // line items drive the amount
    let body = format!(
        r#"{{"invoiceId":{invoice_id},"description":"Shingles","quantity":4,"unitPrice":100}}"#
    );
    let resp = call(&mut app, json_request("POST", "/invoices/line-items", &body)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let item: Value = body_json(resp).await;
    assert_eq!(item["lineTotal"], 400.0);
    let item_id = item["id"].as_i64().unwrap();

    let resp = call(
        &mut app,
        json_request(
            "PUT",
            &format!("/invoices/line-items/{item_id}"),
            r#"{"description":"Shingles","quantity":5,"unitPrice":100}"#,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let invoice: Value = body_json(call(&mut app, get(&format!("/invoices/{invoice_id}"))).await).await;
    assert_eq!(invoice["amount"], 500.0);

    let items: Vec<Value> =
        body_json(call(&mut app, get(&format!("/invoices/{invoice_id}/line-items"))).await).await;
    assert_eq!(items.len(), 1);

    // partial, then full payment
    let payments = format!("/invoices/{invoice_id}/payments");
    let resp = call(
        &mut app,
        json_request("POST", &payments, r#"{"amount":200,"paidDate":"2024-06-01"}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let invoice: Value = body_json(call(&mut app, get(&format!("/invoices/{invoice_id}"))).await).await;
    assert_eq!(invoice["status"], "Partially Paid");

    call(
        &mut app,
        json_request("POST", &payments, r#"{"amount":300,"paidDate":"2024-06-15"}"#),
    )
    .await;
    let invoice: Value = body_json(call(&mut app, get(&format!("/invoices/{invoice_id}"))).await).await;
    assert_eq!(invoice["status"], "Paid");
    assert_eq!(invoice["paidDate"], "2024-06-15");
    assert_eq!(invoice["totalPaid"], 500.0);

    let resp = call(
        &mut app,
        json_request("POST", &payments, r#"{"amount":1,"paidDate":"2024-06-16"}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let paid: Vec<Value> = body_json(call(&mut app, get("/invoices?status=Paid")).await).await;
    assert_eq!(paid.len(), 1);
    let drafts: Vec<Value> = body_json(call(&mut app, get("/invoices?status=Draft")).await).await;
    assert!(drafts.is_empty());

    // jobs with invoices cannot be deleted
    let resp = call(&mut app, empty("DELETE", &format!("/jobs/{job_id}"))).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let summary: Value = body_json(call(&mut app, get("/dashboard/revenue-summary")).await).await;
    assert_eq!(summary["totalRevenue"], 500.0);
    assert_eq!(summary["paidInvoiceCount"], 1);

    let pipeline: Vec<Value> = body_json(call(&mut app, get("/dashboard/job-pipeline")).await).await;
    assert_eq!(pipeline.len(), 5);
    assert_eq!(pipeline[0]["status"], "Lead");
    assert_eq!(pipeline[0]["count"], 1);
    assert_eq!(pipeline[0]["totalValue"], 1200.0);
}

#[tokio::test]
async fn get_invoice_not_found() {
    let resp = app().oneshot(get("/invoices/999")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- expenses ---

#[tokio::test]
async fn expense_filters() {
    let mut app = app().into_service();

    let categories: Vec<Value> = body_json(call(&mut app, get("/expenses/categories")).await).await;
    assert_eq!(categories.len(), 2);
    let materials = categories[0]["id"].as_i64().unwrap();
    let fuel = categories[1]["id"].as_i64().unwrap();

    for (category, vendor, date, reimbursable) in [
        (materials, "Lumber Co", "2024-03-02", false),
        (fuel, "Gas Stop", "2024-03-10", true),
        (materials, "Hardware Hut", "2024-04-01", false),
    ] {
        let body = format!(
            r#"{{"categoryId":{category},"vendor":"{vendor}","amount":10,"expenseDate":"{date}","isReimbursable":{reimbursable}}}"#
        );
        let resp = call(&mut app, json_request("POST", "/expenses", &body)).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let march: Vec<Value> = body_json(
        call(&mut app, get("/expenses?dateFrom=2024-03-01&dateTo=2024-03-31")).await,
    )
    .await;
    assert_eq!(march.len(), 2);

    let reimbursable: Vec<Value> =
        body_json(call(&mut app, get("/expenses?isReimbursable=true")).await).await;
    assert_eq!(reimbursable.len(), 1);
    assert_eq!(reimbursable[0]["categoryName"], "Fuel");

    let by_category: Vec<Value> =
        body_json(call(&mut app, get(&format!("/expenses?categoryId={materials}"))).await).await;
    assert_eq!(by_category.len(), 2);

    // a category in use cannot be removed
    let resp = call(&mut app, empty("DELETE", &format!("/expenses/categories/{fuel}"))).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn expense_with_unknown_category_is_400() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/expenses",
            r#"{"categoryId":999,"vendor":"X","amount":1,"expenseDate":"2024-01-01"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- research ---

#[tokio::test]
async fn promote_lead_creates_client_and_contact() {
    let mut app = app().into_service();

    let resp = call(
        &mut app,
        json_request(
            "POST",
            "/research",
            r#"{"businessName":"Bakery","dateContacted":"2024-05-01","interestLevel":4,"wouldPay":1,"status":1}"#,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let lead: Value = body_json(resp).await;
    let lead_id = lead["researchLeadId"].as_i64().unwrap();

    let resp = call(
        &mut app,
        json_request(
            "POST",
            &format!("/research/{lead_id}/promote"),
            r#"{"clientType":"Company","clientName":"Bakery LLC","contactFirstName":"Sam","contactLastName":"Lee"}"#,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let promoted: Value = body_json(resp).await;
    assert_eq!(promoted["status"], 3);
    assert_eq!(promoted["clientName"], "Bakery LLC");
    assert_eq!(promoted["contactFirstName"], "Sam");

    let contacts: Vec<Value> = body_json(call(&mut app, get("/contacts")).await).await;
    assert_eq!(contacts.len(), 1);
    assert_eq!(contacts[0]["isPrimary"], true);

    // second promotion is refused
    let resp = call(
        &mut app,
        json_request(
            "POST",
            &format!("/research/{lead_id}/promote"),
            r#"{"clientName":"Again"}"#,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn lead_status_out_of_range_is_400() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/research",
            r#"{"businessName":"X","dateContacted":"2024-05-01","status":9}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- time clock ---

#[tokio::test]
async fn clock_invariants() {
    let mut app = app().into_service();

    let codes: Vec<Value> =
        body_json(call(&mut app, get("/timeclock/job-codes?active_only=true")).await).await;
    assert_eq!(codes.len(), 2);
    let install = codes[0]["id"].as_i64().unwrap();
    let travel = codes[1]["id"].as_i64().unwrap();

    let creds = r#""employeeId":"1001","passcode":"4321""#;

    let resp = call(
        &mut app,
        json_request("POST", "/timeclock/status", &format!("{{{creds}}}")),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let status: Value = body_json(resp).await;
    assert_eq!(status["isClockedIn"], false);
    assert_eq!(status["firstName"], "Pat");

    // clock-out before clock-in
    let resp = call(
        &mut app,
        json_request("POST", "/timeclock/clock-out", &format!("{{{creds}}}")),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = body_json(resp).await;
    assert_eq!(body["detail"], "Worker is not clocked in");

    let clock_in = format!(r#"{{{creds},"jobCodeId":{install}}}"#);
    let resp = call(&mut app, json_request("POST", "/timeclock/clock-in", &clock_in)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let punch: Value = body_json(resp).await;
    assert_eq!(punch["jobCodeCode"], 100);
    assert!(punch["clockOut"].is_null());

    let resp = call(&mut app, json_request("POST", "/timeclock/clock-in", &clock_in)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = body_json(resp).await;
    assert_eq!(body["detail"], "Worker is already clocked in");

    let switch = format!(r#"{{{creds},"jobCodeId":{travel}}}"#);
    let resp = call(&mut app, json_request("POST", "/timeclock/switch", &switch)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let punch: Value = body_json(resp).await;
    assert_eq!(punch["jobCodeName"], "Travel");

    let resp = call(
        &mut app,
        json_request("POST", "/timeclock/clock-out", &format!("{{{creds}}}")),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let punch: Value = body_json(resp).await;
    assert!(!punch["clockOut"].is_null());
    assert_eq!(punch["totalMinutes"], 0);

    let history: Vec<Value> = body_json(call(&mut app, get("/timeclock/history")).await).await;
    assert_eq!(history.len(), 2);
    let filtered: Vec<Value> = body_json(
        call(&mut app, get(&format!("/timeclock/history?job_code_id={install}"))).await,
    )
    .await;
    assert_eq!(filtered.len(), 1);
}

#[tokio::test]
async fn wrong_passcode_is_404() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/timeclock/status",
            r#"{"employeeId":"1001","passcode":"0000"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = body_json(resp).await;
    assert_eq!(body["detail"], "Invalid employee ID or passcode");
}

#[tokio::test]
async fn workers_never_expose_passcodes() {
    let resp = app().oneshot(get("/timeclock/workers")).await.unwrap();

    let workers: Vec<Value> = body_json(resp).await;
    assert_eq!(workers.len(), 1);
    assert_eq!(workers[0]["employeeId"], "1001");
    assert!(workers[0].get("passcode").is_none());
}

// --- notes ---

#[tokio::test]
async fn notes_crud() {
    let mut app = app().into_service();

    let resp = call(
        &mut app,
        json_request("POST", "/notes", r#"{"title":"Call supplier","isGlobal":true}"#),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let note: Value = body_json(resp).await;
    let id = note["noteId"].as_i64().unwrap();
    assert_eq!(note["authorName"], "Mock User");

    let resp = call(
        &mut app,
        json_request("PUT", &format!("/notes/{id}"), r#"{"title":"Call supplier today"}"#),
    )
    .await;
    let note: Value = body_json(resp).await;
    assert_eq!(note["title"], "Call supplier today");
    assert_eq!(note["isGlobal"], false);

    let resp = call(&mut app, empty("DELETE", &format!("/notes/{id}"))).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let resp = call(&mut app, empty("DELETE", &format!("/notes/{id}"))).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- dashboard ---

#[tokio::test]
async fn recent_activity_respects_limit() {
    let mut app = app().into_service();

    let client: Client =
        body_json(call(&mut app, json_request("POST", "/clients", r#"{"name":"Acme"}"#)).await).await;
    for title in ["A", "B", "C"] {
        let body = format!(r#"{{"clientId":{},"title":"{title}"}}"#, client.id);
        call(&mut app, json_request("POST", "/jobs", &body)).await;
    }

    let activity: Vec<Value> =
        body_json(call(&mut app, get("/dashboard/recent-activity?limit=2")).await).await;
    assert_eq!(activity.len(), 2);
    assert_eq!(activity[0]["entityType"], "Job");

    let income: Vec<Value> = body_json(call(&mut app, get("/dashboard/income-by-job")).await).await;
    assert!(income.is_empty());
}
