use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use std::time::Duration;
use tower::ServiceExt;

use spotgen::models::AppState;
use spotgen::routes::build_router;
use spotgen::services::InstanceCatalog;

const VALID_QUERY: &str = "instances=t3.micro%2Cm5.large&subnetIds=subnet-0123456789abcdef0\
&accountId=123456789012&launchTemplateId=lt-0123456789abcdef0&targetCapacity=2";

fn app_with_quiet(quiet: Duration) -> Router {
    let state = AppState::new("http://fleet.test".to_string(), InstanceCatalog::default(), quiet);
    build_router(state)
}

fn app() -> Router {
    app_with_quiet(Duration::from_millis(10))
}

async fn body_text(resp: axum::response::Response) -> String {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn form_post(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

fn location(resp: &axum::response::Response) -> String {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[tokio::test]
async fn test_index_renders_empty_form() {
    let resp = app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("AWS Spot Fleet Configuration Generator"));
    assert!(html.contains("Fill in the form"));
    // Validation messages are only shown after a submit.
    assert!(!html.contains("flash-error"));
}

#[tokio::test]
async fn test_index_shows_preview_for_valid_query() {
    let resp = app()
        .oneshot(Request::builder().uri(format!("/?{}", VALID_QUERY)).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("json-preview"));
    assert!(html.contains("arn:aws:iam::123456789012:role"));
    assert!(html.contains("filter=t3.micro|m5.large"));
}

#[tokio::test]
async fn test_index_search_filters_catalog() {
    let resp = app()
        .oneshot(Request::builder().uri("/?search=c52").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let html = body_text(resp).await;
    assert!(html.contains("value=\"c5.2xlarge\""));
    assert!(!html.contains("value=\"t3.micro\""));
}

#[tokio::test]
async fn test_api_config_valid_and_invalid() {
    let resp = app()
        .oneshot(Request::builder().uri(format!("/api/config?{}", VALID_QUERY)).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let doc: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();
    assert_eq!(doc["TargetCapacity"], 2);
    assert_eq!(doc["Type"], "maintain");
    let overrides = doc["LaunchTemplateConfigs"][0]["Overrides"].as_array().unwrap();
    assert_eq!(overrides.len(), 2);
    assert_eq!(overrides[0]["InstanceType"], "t3.micro");

    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/api/config?accountId=12345&launchTemplateId=lt-0123456789abcdef0&targetCapacity=2")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let err: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();
    assert_eq!(err["error"], "AWS Account ID must be exactly 12 digits");
}

#[tokio::test]
async fn test_download_is_attachment() {
    let resp = app()
        .oneshot(Request::builder().uri(format!("/download?{}", VALID_QUERY)).body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let disposition = resp.headers().get(header::CONTENT_DISPOSITION).unwrap().to_str().unwrap().to_string();
    assert_eq!(disposition, "attachment; filename=\"aws-spot-fleet-config.json\"");
    let text = body_text(resp).await;
    assert!(text.starts_with("{\n  \"IamFleetRole\""));
}

#[tokio::test]
async fn test_generate_redirects_with_share_query() {
    let body = "accountId=123456789012&launchTemplateId=lt-0123456789abcdef0&targetCapacity=2\
&instance=t3.micro&instance=m5.large&subnet=subnet-0123456789abcdef0&subnet="
        .to_string();
    let resp = app().oneshot(form_post("/generate", body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), format!("/?{}", VALID_QUERY));
}

#[tokio::test]
async fn test_generate_reports_first_failure() {
    let body = "accountId=&launchTemplateId=nope&targetCapacity=&instance=t3.micro".to_string();
    let resp = app().oneshot(form_post("/generate", body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_text(resp).await;
    assert!(html.contains("Please fill in all required fields"));
    assert!(!html.contains("AWS EC2 Launch Templates must start with"));
}

#[tokio::test]
async fn test_add_subnet_rejects_invalid_and_duplicate() {
    let resp = app()
        .oneshot(form_post("/subnets/add", "subnet=subnet-0123456789abcdef0&new_subnet=subnet-123".to_string()))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(resp).await.contains("AWS VPC Subnets must start with"));

    let resp = app()
        .oneshot(form_post(
            "/subnets/add",
            "subnet=subnet-0123456789abcdef0&new_subnet=subnet-0123456789abcdef0".to_string(),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(resp).await.contains("This subnet ID is already added"));
}

#[tokio::test]
async fn test_rejected_add_preview_skips_blank_subnet_rows() {
    let body = "accountId=123456789012&launchTemplateId=lt-0123456789abcdef0&targetCapacity=2\
&instance=t3.micro&instance=m5.large&subnet=subnet-0123456789abcdef0&subnet=&new_subnet=bad"
        .to_string();
    let resp = app().oneshot(form_post("/subnets/add", body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_text(resp).await;
    assert!(html.contains("json-preview"));
    // One override per instance type, none for the blank row.
    assert_eq!(html.matches("SubnetId").count(), 2);
}

#[tokio::test]
async fn test_add_and_remove_subnet() {
    let resp = app()
        .oneshot(form_post(
            "/subnets/add",
            "subnet=subnet-0123456789abcdef0&new_subnet=subnet-aaaaaaaaaaaaaaaaa".to_string(),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&resp),
        "/?subnetIds=subnet-0123456789abcdef0%2Csubnet-aaaaaaaaaaaaaaaaa"
    );

    let resp = app()
        .oneshot(form_post(
            "/subnets/remove",
            "subnet=subnet-0123456789abcdef0&subnet=subnet-aaaaaaaaaaaaaaaaa&remove_index=0".to_string(),
        ))
        .await
        .unwrap();
    assert_eq!(location(&resp), "/?subnetIds=subnet-aaaaaaaaaaaaaaaaa");
}

#[tokio::test]
async fn test_import_round_trip_and_failure() {
    let doc = app()
        .oneshot(Request::builder().uri(format!("/api/config?{}", VALID_QUERY)).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let json = body_text(doc).await;

    let body = format!("json={}&current_query=", urlencoding::encode(&json));
    let resp = app().oneshot(form_post("/import", body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), format!("/?{}", VALID_QUERY));

    let body = format!("json={}&current_query={}", urlencoding::encode("{not json"), urlencoding::encode(VALID_QUERY));
    let resp = app().oneshot(form_post("/import", body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_text(resp).await;
    assert!(html.contains("Import failed"));
    // The previous form is kept.
    assert!(html.contains("value=\"123456789012\""));
}

#[tokio::test]
async fn test_vantage_import_keeps_other_parameters() {
    let body = format!(
        "vantage_url={}&current_query={}",
        urlencoding::encode("https://instances.vantage.sh/?compare_on=true"),
        urlencoding::encode(VALID_QUERY)
    );
    let resp = app().oneshot(form_post("/vantage/import", body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    // An empty selection leaves the instance types already in the address bar.
    assert_eq!(location(&resp), format!("/?{}", VALID_QUERY));
}

#[tokio::test]
async fn test_vantage_import_replaces_selection() {
    let link = "https://instances.vantage.sh/?filter=c5.xlarge|t3.micro&selected=t3.micro,c5.xlarge&compare_on=true";
    let body = format!(
        "vantage_url={}&current_query={}",
        urlencoding::encode(link),
        urlencoding::encode("instances=m5.large&accountId=123456789012")
    );
    let resp = app().oneshot(form_post("/vantage/import", body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/?instances=t3.micro%2Cc5.xlarge&accountId=123456789012");

    let body = format!("vantage_url={}&current_query=", urlencoding::encode("https://example.com/?selected=t3.micro"));
    let resp = app().oneshot(form_post("/vantage/import", body)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(resp).await.contains("Invalid instances.vantage.sh URL"));
}

fn draft(editor: &str, text: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/api/editor/{}/draft", editor))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::json!({ "text": text }).to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_editor_draft_applied_and_rejected() {
    let json = body_text(
        app()
            .oneshot(Request::builder().uri(format!("/api/config?{}", VALID_QUERY)).body(Body::empty()).unwrap())
            .await
            .unwrap(),
    )
    .await;

    let resp = app().oneshot(draft("tab-1", &json)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let commit: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();
    assert_eq!(commit["status"], "applied");
    assert_eq!(commit["form"]["accountId"], "123456789012");
    assert_eq!(commit["shareQuery"], VALID_QUERY);

    let resp = app().oneshot(draft("tab-1", "{\"IamFleetRole\": 1")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let rejected: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();
    assert_eq!(rejected["status"], "rejected");
}

#[tokio::test]
async fn test_editor_only_latest_draft_is_applied() {
    let app = app_with_quiet(Duration::from_millis(200));
    let first = app.clone().oneshot(draft("tab-2", "{"));
    let second = async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        app.clone().oneshot(draft("tab-2", "{}")).await
    };
    let (first, second) = tokio::join!(first, second);
    assert_eq!(first.unwrap().status(), StatusCode::NO_CONTENT);
    // `{}` parses but has no fleet role.
    assert_eq!(second.unwrap().status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_stylesheet_served() {
    let resp = app()
        .oneshot(Request::builder().uri("/static/styles.css").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get(header::CONTENT_TYPE).unwrap(), "text/css");
    assert_eq!(resp.headers().get(header::CACHE_CONTROL).unwrap(), "no-store");
}
