//! Session middleware behavior: lazy creation, resume, tamper handling,
//! logout semantics, and the authorization gate's short-circuit.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::{test, web, App, HttpResponse, Responder};
use pretty_assertions::assert_eq;
use serde_json::{Map, Value};
use uuid::Uuid;

use bizdir::auth::RequireAuth;
use bizdir::config::SessionConfig;
use bizdir::session::{cookie, Session, SessionData, SessionLayer, SessionStore};

const TEST_SECRET: &str = "session-test-secret";
const COOKIE_NAME: &str = "sessionName";

fn test_session_config() -> SessionConfig {
    SessionConfig {
        secret: TEST_SECRET.to_string(),
        cookie_name: COOKIE_NAME.to_string(),
    }
}

/// Handler that signs a fixed principal into the session.
async fn sign_in(session: Session) -> impl Responder {
    let mut user = Map::new();
    user.insert(
        "business_id".to_string(),
        Value::String("0191d45e-0000-7000-8000-000000000001".to_string()),
    );
    user.insert("name".to_string(), Value::String("Corner Bakery".into()));
    session.set_user(user);
    HttpResponse::Ok().finish()
}

/// Handler that echoes the session's `user` mapping without touching it.
async fn whoami(session: Session) -> impl Responder {
    HttpResponse::Ok().json(session.user())
}

fn session_cookie_from<B>(resp: &actix_web::dev::ServiceResponse<B>) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|c| c.name() == COOKIE_NAME)
        .map(|c| c.into_owned())
}

#[actix_rt::test]
async fn test_read_only_request_creates_no_session() {
    let store = SessionStore::new();
    let app = test::init_service(
        App::new()
            .wrap(SessionLayer::new(&test_session_config(), store.clone()))
            .service(web::resource("/whoami").route(web::get().to(whoami))),
    )
    .await;

    let req = test::TestRequest::get().uri("/whoami").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(session_cookie_from(&resp).is_none());
    assert!(store.is_empty());
}

#[actix_rt::test]
async fn test_first_write_sets_cookie_and_persists() {
    let store = SessionStore::new();
    let app = test::init_service(
        App::new()
            .wrap(SessionLayer::new(&test_session_config(), store.clone()))
            .service(web::resource("/sign-in").route(web::post().to(sign_in)))
            .service(web::resource("/whoami").route(web::get().to(whoami))),
    )
    .await;

    let req = test::TestRequest::post().uri("/sign-in").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let session_cookie = session_cookie_from(&resp).expect("first write must set a cookie");
    assert_eq!(store.len(), 1);

    // The cookie value is a sealed token resolving to the stored session.
    let sid = cookie::open(session_cookie.value(), TEST_SECRET).expect("cookie must verify");
    assert!(store.load(&sid).is_some());

    // Resuming with the cookie sees the same user and, being read-only,
    // triggers no second Set-Cookie.
    let req = test::TestRequest::get()
        .uri("/whoami")
        .cookie(session_cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(session_cookie_from(&resp).is_none());

    let user: Map<String, Value> = test::read_body_json(resp).await;
    assert_eq!(
        user.get("name").and_then(Value::as_str),
        Some("Corner Bakery")
    );
}

#[actix_rt::test]
async fn test_tampered_cookie_is_treated_as_anonymous() {
    let store = SessionStore::new();
    let app = test::init_service(
        App::new()
            .wrap(SessionLayer::new(&test_session_config(), store.clone()))
            .service(web::resource("/whoami").route(web::get().to(whoami))),
    )
    .await;

    // A token sealed under a different secret must not resume anything.
    let foreign = cookie::seal(Uuid::new_v4(), "some-other-secret").unwrap();
    let req = test::TestRequest::get()
        .uri("/whoami")
        .cookie(Cookie::new(COOKIE_NAME, foreign))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let user: Map<String, Value> = test::read_body_json(resp).await;
    assert!(user.is_empty());
}

#[actix_rt::test]
async fn test_stale_cookie_for_unknown_session_is_anonymous() {
    let store = SessionStore::new();
    let app = test::init_service(
        App::new()
            .wrap(SessionLayer::new(&test_session_config(), store.clone()))
            .service(web::resource("/whoami").route(web::get().to(whoami))),
    )
    .await;

    // Correctly signed, but the store has no such record (e.g. restart).
    let stale = cookie::seal(Uuid::new_v4(), TEST_SECRET).unwrap();
    let req = test::TestRequest::get()
        .uri("/whoami")
        .cookie(Cookie::new(COOKIE_NAME, stale))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let user: Map<String, Value> = test::read_body_json(resp).await;
    assert!(user.is_empty());
}

#[actix_rt::test]
async fn test_logout_clears_user_to_empty_mapping() {
    let store = SessionStore::new();
    let app = test::init_service(
        App::new()
            .wrap(SessionLayer::new(&test_session_config(), store.clone()))
            .configure(bizdir::routes::config),
    )
    .await;

    // Seed an authenticated session directly in the store.
    let sid = Uuid::new_v4();
    let mut user = Map::new();
    user.insert(
        "business_id".to_string(),
        Value::String(Uuid::new_v4().to_string()),
    );
    store.save(sid, SessionData { user });

    let token = cookie::seal(sid, TEST_SECRET).unwrap();
    let req = test::TestRequest::get()
        .uri("/logout")
        .cookie(Cookie::new(COOKIE_NAME, token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, serde_json::json!({ "message": "Logged out" }));

    // The record survives, but its user is the empty mapping.
    let data = store.load(&sid).expect("session record must survive logout");
    assert!(data.user.is_empty());
}

#[actix_rt::test]
async fn test_logout_without_a_session_still_acknowledges() {
    let store = SessionStore::new();
    let app = test::init_service(
        App::new()
            .wrap(SessionLayer::new(&test_session_config(), store.clone()))
            .configure(bizdir::routes::config),
    )
    .await;

    let req = test::TestRequest::get().uri("/logout").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, serde_json::json!({ "message": "Logged out" }));

    // Nothing was written: no record, no cookie.
    assert!(store.is_empty());
}

#[actix_rt::test]
async fn test_gate_never_invokes_handler_when_unauthenticated() {
    let hits = Arc::new(AtomicUsize::new(0));

    async fn probe(hits: web::Data<Arc<AtomicUsize>>) -> impl Responder {
        hits.fetch_add(1, Ordering::SeqCst);
        HttpResponse::Ok().finish()
    }

    let store = SessionStore::new();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(hits.clone()))
            .wrap(SessionLayer::new(&test_session_config(), store.clone()))
            .service(
                web::resource("/probe")
                    .route(web::get().to(probe))
                    .wrap(RequireAuth),
            ),
    )
    .await;

    // No session at all.
    let req = test::TestRequest::get().uri("/probe").to_request();
    let status = match test::try_call_service(&app, req).await {
        Ok(resp) => resp.status(),
        Err(err) => err.error_response().status(),
    };
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(hits.load(Ordering::SeqCst), 0);

    // A session whose user was cleared is just as unauthenticated.
    let sid = Uuid::new_v4();
    store.save(sid, SessionData::default());
    let token = cookie::seal(sid, TEST_SECRET).unwrap();
    let req = test::TestRequest::get()
        .uri("/probe")
        .cookie(Cookie::new(COOKIE_NAME, token))
        .to_request();
    let status = match test::try_call_service(&app, req).await {
        Ok(resp) => resp.status(),
        Err(err) => err.error_response().status(),
    };
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(hits.load(Ordering::SeqCst), 0);

    // An authenticated session passes through to the handler exactly once.
    let sid = Uuid::new_v4();
    let mut user = Map::new();
    user.insert(
        "business_id".to_string(),
        Value::String(Uuid::new_v4().to_string()),
    );
    store.save(sid, SessionData { user });
    let token = cookie::seal(sid, TEST_SECRET).unwrap();
    let req = test::TestRequest::get()
        .uri("/probe")
        .cookie(Cookie::new(COOKIE_NAME, token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}
