//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Value, json};

use crate::inbound::http::configure_api;
use crate::inbound::http::state::{HttpState, HttpStateAdapters};
use crate::test_support::{InMemoryStore, MutableClock, PlaintextHasher, SequentialInviteCodes};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

fn start_of_tests() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0)
        .single()
        .expect("valid fixture instant")
}

/// Real domain services over the in-memory store, with a hand-driven clock
/// and predictable invite codes (`T00001`, `T00002`, ...).
pub struct TestHarness {
    pub store: Arc<InMemoryStore>,
    pub clock: Arc<MutableClock>,
    state: HttpState,
}

impl TestHarness {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let clock = Arc::new(MutableClock::new(start_of_tests()));
        let state = HttpState::from_adapters(HttpStateAdapters {
            users: store.clone(),
            companies: store.clone(),
            tickets: store.clone(),
            comments: store.clone(),
            hasher: Arc::new(PlaintextHasher),
            invite_codes: Arc::new(SequentialInviteCodes::default()),
            clock: clock.clone(),
        });
        Self {
            store,
            clock,
            state,
        }
    }

    pub fn app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(web::Data::new(self.state.clone()))
            .wrap(test_session_middleware())
            .configure(configure_api)
    }
}

/// Status, JSON body (`Null` when empty) and refreshed session cookie.
#[derive(Debug)]
pub struct Reply {
    pub status: StatusCode,
    pub body: Value,
    pub cookie: Option<Cookie<'static>>,
}

pub async fn send(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    request: Request,
) -> Reply {
    let response = test::call_service(app, request).await;
    let status = response.status();
    let cookie = response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned);
    let bytes = test::read_body(response).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON response body")
    };
    Reply {
        status,
        body,
        cookie,
    }
}

/// `GET` with the session cookie attached.
pub async fn get(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    uri: &str,
    cookie: &Cookie<'static>,
) -> Reply {
    let request = test::TestRequest::get()
        .uri(uri)
        .cookie(cookie.clone())
        .to_request();
    send(app, request).await
}

/// JSON request with an arbitrary method and the session cookie attached.
pub async fn send_json(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    method: actix_web::http::Method,
    uri: &str,
    cookie: &Cookie<'static>,
    body: Value,
) -> Reply {
    let request = test::TestRequest::default()
        .method(method)
        .uri(uri)
        .cookie(cookie.clone())
        .set_json(body)
        .to_request();
    send(app, request).await
}

/// Registration body for a company-less employee.
pub fn employee_body(email: &str) -> Value {
    json!({
        "email": email,
        "password": "correct-horse",
        "firstName": "Grace",
        "lastName": "Hopper",
        "role": "EMPLOYEE",
    })
}

/// Registration body for a company administrator.
pub fn admin_body(email: &str, company: &str) -> Value {
    json!({
        "email": email,
        "password": "correct-horse",
        "firstName": "Ada",
        "lastName": "Lovelace",
        "role": "COMPANY_ADMIN",
        "companyName": company,
    })
}

/// A registered account: its session cookie and profile JSON.
pub struct Account {
    pub cookie: Cookie<'static>,
    pub profile: Value,
}

impl Account {
    pub fn id(&self) -> &str {
        self.profile["id"].as_str().expect("profile id")
    }

    pub fn company_id(&self) -> &str {
        self.profile["companyId"].as_str().expect("company id")
    }
}

pub async fn register(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    body: Value,
) -> Account {
    let request = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(body)
        .to_request();
    let reply = send(app, request).await;
    assert_eq!(reply.status, StatusCode::CREATED, "register: {}", reply.body);
    Account {
        cookie: reply.cookie.expect("session cookie"),
        profile: reply.body["user"].clone(),
    }
}

/// Register an employee and link them to `company` through its invite code.
pub async fn register_member(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    email: &str,
    invite_code: &str,
) -> Account {
    let account = register(app, employee_body(email)).await;
    let joined = send_json(
        app,
        actix_web::http::Method::POST,
        "/api/auth/join-company",
        &account.cookie,
        json!({ "inviteCode": invite_code }),
    )
    .await;
    assert_eq!(joined.status, StatusCode::OK, "join: {}", joined.body);
    Account {
        cookie: account.cookie,
        profile: joined.body["user"].clone(),
    }
}

/// Invite code of the company owned by `admin`.
pub async fn invite_code_of(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    admin: &Account,
) -> String {
    let company = get(
        app,
        &format!("/api/companies/{}", admin.company_id()),
        &admin.cookie,
    )
    .await;
    assert_eq!(company.status, StatusCode::OK, "company: {}", company.body);
    company.body["inviteCode"]
        .as_str()
        .expect("invite code")
        .to_owned()
}

/// Create a ticket as `account`, returning its JSON.
pub async fn create_ticket(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    account: &Account,
    title: &str,
) -> Value {
    let reply = send_json(
        app,
        actix_web::http::Method::POST,
        "/api/tickets",
        &account.cookie,
        json!({
            "title": title,
            "description": "The office printer jams on every job",
            "priority": "HIGH",
        }),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED, "ticket: {}", reply.body);
    reply.body
}
