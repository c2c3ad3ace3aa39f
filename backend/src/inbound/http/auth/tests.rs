//! Tests for the authentication handlers.

use actix_web::http::{Method, StatusCode};
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use crate::inbound::http::test_utils::{
    TestHarness, admin_body, employee_body, get, invite_code_of, register, send, send_json,
};

async fn post_json(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    uri: &str,
    body: Value,
) -> crate::inbound::http::test_utils::Reply {
    let request = actix_test::TestRequest::post()
        .uri(uri)
        .set_json(body)
        .to_request();
    send(app, request).await
}

#[actix_web::test]
async fn admin_registration_creates_company_and_session() {
    let harness = TestHarness::new();
    let app = actix_test::init_service(harness.app()).await;

    let admin = register(&app, admin_body("ada@acme.test", "Acme")).await;
    assert_eq!(admin.profile["role"], "COMPANY_ADMIN");
    assert_eq!(admin.profile["company"]["name"], "Acme");
    assert_eq!(harness.store.company_count(), 1);
    assert!(admin.profile.get("passwordHash").is_none());

    let me = get(&app, "/api/auth/me", &admin.cookie).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["email"], "ada@acme.test");
    assert_eq!(me.body["companyId"], admin.profile["companyId"]);
}

#[actix_web::test]
async fn admin_registration_without_company_name_is_rejected() {
    let harness = TestHarness::new();
    let app = actix_test::init_service(harness.app()).await;

    let mut body = admin_body("ada@acme.test", "Acme");
    body["companyName"] = json!("   ");
    let reply = post_json(&app, "/api/auth/register", body).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["details"]["field"], "companyName");
    assert_eq!(harness.store.company_count(), 0);
}

#[rstest]
#[case("EMPLOYEE")]
#[case("TECHNICIAN")]
#[actix_web::test]
async fn company_fields_are_ignored_for_non_admins(#[case] role: &str) {
    let harness = TestHarness::new();
    let app = actix_test::init_service(harness.app()).await;

    let mut body = employee_body("grace@acme.test");
    body["role"] = json!(role);
    body["companyName"] = json!("c".repeat(200));
    body["companyEmail"] = json!("not-an-email");
    let reply = post_json(&app, "/api/auth/register", body).await;
    assert_eq!(reply.status, StatusCode::CREATED, "{}", reply.body);
    assert_eq!(reply.body["user"]["role"], role);
    assert!(reply.body["user"]["companyId"].is_null());
    assert_eq!(harness.store.company_count(), 0);
}

#[actix_web::test]
async fn duplicate_email_registration_conflicts() {
    let harness = TestHarness::new();
    let app = actix_test::init_service(harness.app()).await;
    register(&app, employee_body("grace@acme.test")).await;

    let reply = post_json(
        &app,
        "/api/auth/register",
        employee_body("  GRACE@acme.test "),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CONFLICT);
    assert_eq!(reply.body["code"], "conflict");
}

#[rstest]
#[case("email", json!("not-an-email"), "invalid_email")]
#[case("password", json!("short"), "too_short")]
#[case("role", json!("JANITOR"), "invalid_value")]
#[case("firstName", json!("  "), "blank")]
#[case("lastName", json!("L"), "too_short")]
#[actix_web::test]
async fn registration_validates_fields(
    #[case] field: &str,
    #[case] value: Value,
    #[case] code: &str,
) {
    let harness = TestHarness::new();
    let app = actix_test::init_service(harness.app()).await;

    let mut body = employee_body("grace@acme.test");
    body[field] = value;
    let reply = post_json(&app, "/api/auth/register", body).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["code"], "invalid_request");
    assert_eq!(reply.body["details"]["field"], field);
    assert_eq!(reply.body["details"]["code"], code);
}

#[actix_web::test]
async fn registration_reports_missing_fields() {
    let harness = TestHarness::new();
    let app = actix_test::init_service(harness.app()).await;

    let reply = post_json(&app, "/api/auth/register", json!({"email": "x@acme.test"})).await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["details"]["field"], "password");
    assert_eq!(reply.body["details"]["code"], "missing_field");
}

#[rstest]
#[case("grace@acme.test", "wrong-password")]
#[case("nobody@acme.test", "correct-horse")]
#[actix_web::test]
async fn bad_credentials_are_unauthorised(#[case] email: &str, #[case] password: &str) {
    let harness = TestHarness::new();
    let app = actix_test::init_service(harness.app()).await;
    register(&app, employee_body("grace@acme.test")).await;

    let reply = post_json(
        &app,
        "/api/auth/login",
        json!({"email": email, "password": password}),
    )
    .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert_eq!(reply.body["message"], "invalid credentials");
    assert!(reply.cookie.is_none());
}

#[actix_web::test]
async fn login_opens_a_session() {
    let harness = TestHarness::new();
    let app = actix_test::init_service(harness.app()).await;
    register(&app, employee_body("grace@acme.test")).await;

    let reply = post_json(
        &app,
        "/api/auth/login",
        json!({"email": "Grace@Acme.test", "password": "correct-horse"}),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["user"]["email"], "grace@acme.test");

    let cookie = reply.cookie.expect("session cookie");
    let me = get(&app, "/api/auth/me", &cookie).await;
    assert_eq!(me.status, StatusCode::OK);
}

#[actix_web::test]
async fn me_requires_session() {
    let harness = TestHarness::new();
    let app = actix_test::init_service(harness.app()).await;

    let request = actix_test::TestRequest::get().uri("/api/auth/me").to_request();
    let reply = send(&app, request).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn joining_with_invite_code_links_company() {
    let harness = TestHarness::new();
    let app = actix_test::init_service(harness.app()).await;
    let admin = register(&app, admin_body("ada@acme.test", "Acme")).await;
    let code = invite_code_of(&app, &admin).await;
    let employee = register(&app, employee_body("grace@acme.test")).await;
    assert!(employee.profile["companyId"].is_null());

    let reply = send_json(
        &app,
        Method::POST,
        "/api/auth/join-company",
        &employee.cookie,
        json!({"inviteCode": code.to_lowercase()}),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["user"]["companyId"], admin.profile["companyId"]);
    assert!(
        reply.body["message"]
            .as_str()
            .is_some_and(|m| m.contains("Acme"))
    );

    let me = get(&app, "/api/auth/me", &employee.cookie).await;
    assert_eq!(me.body["company"]["name"], "Acme");
}

#[rstest]
#[case("ZZZZZZ", StatusCode::NOT_FOUND)]
#[case("ABC", StatusCode::BAD_REQUEST)]
#[actix_web::test]
async fn joining_with_bad_code_fails(#[case] code: &str, #[case] expected: StatusCode) {
    let harness = TestHarness::new();
    let app = actix_test::init_service(harness.app()).await;
    let employee = register(&app, employee_body("grace@acme.test")).await;

    let reply = send_json(
        &app,
        Method::POST,
        "/api/auth/join-company",
        &employee.cookie,
        json!({"inviteCode": code}),
    )
    .await;
    assert_eq!(reply.status, expected);
}

#[actix_web::test]
async fn logout_ends_the_session() {
    let harness = TestHarness::new();
    let app = actix_test::init_service(harness.app()).await;
    let account = register(&app, employee_body("grace@acme.test")).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/auth/logout")
        .cookie(account.cookie.clone())
        .to_request();
    let reply = send(&app, request).await;
    assert_eq!(reply.status, StatusCode::NO_CONTENT);

    let cleared = reply.cookie.expect("removal cookie");
    let me = get(&app, "/api/auth/me", &cleared).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);
}
