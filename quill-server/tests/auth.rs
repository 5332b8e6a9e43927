mod common;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};

use quill_server::build_app;

#[actix_web::test]
async fn signup_sets_a_session_and_redirects_home() {
    let (_store, state) = common::state();
    let app = test::init_service(build_app(state)).await;

    let req = TestRequest::post()
        .uri("/auth/signup/")
        .set_form([
            ("username", "alice"),
            ("email", "alice@example.com"),
            ("password", "password123"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(common::location(&resp), "/");
    let cookie = common::session_cookie(&resp);
    assert!(cookie.starts_with("quill_session="));

    // the session opens auth-required pages
    let req = TestRequest::get()
        .uri("/new/")
        .insert_header(("Cookie", cookie))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn signup_validates_fields() {
    let (_store, state) = common::state();
    let app = test::init_service(build_app(state)).await;

    let req = TestRequest::post()
        .uri("/auth/signup/")
        .set_form([
            ("username", "bad name"),
            ("email", "not-an-email"),
            ("password", "short"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = common::read_json(resp).await;
    assert_eq!(body["template"], "signup.html");
    assert!(body["errors"]["username"].is_array());
    assert!(body["errors"]["email"].is_array());
    assert!(body["errors"]["password"].is_array());
}

#[actix_web::test]
async fn duplicate_username_is_a_field_error() {
    let (_store, state) = common::state();
    let app = test::init_service(build_app(state)).await;
    common::signup(&app, "alice").await;

    let req = TestRequest::post()
        .uri("/auth/signup/")
        .set_form([
            ("username", "alice"),
            ("email", "second@example.com"),
            ("password", "password123"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = common::read_json(resp).await;
    assert!(body["errors"]["username"].is_array());
}

#[actix_web::test]
async fn login_follows_the_next_target() {
    let (_store, state) = common::state();
    let app = test::init_service(build_app(state)).await;
    common::signup(&app, "alice").await;

    let req = TestRequest::post()
        .uri("/auth/login/")
        .set_form([
            ("username", "alice"),
            ("password", "password123"),
            ("next", "/new/"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(common::location(&resp), "/new/");
}

#[actix_web::test]
async fn login_next_cannot_leave_the_site() {
    let (_store, state) = common::state();
    let app = test::init_service(build_app(state)).await;
    common::signup(&app, "alice").await;

    let req = TestRequest::post()
        .uri("/auth/login/")
        .set_form([
            ("username", "alice"),
            ("password", "password123"),
            ("next", "https://evil.example/"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(common::location(&resp), "/");
}

#[actix_web::test]
async fn bad_credentials_redisplay_the_login_form() {
    let (_store, state) = common::state();
    let app = test::init_service(build_app(state)).await;
    common::signup(&app, "alice").await;

    let req = TestRequest::post()
        .uri("/auth/login/")
        .set_form([("username", "alice"), ("password", "wrong")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = common::read_json(resp).await;
    assert_eq!(body["template"], "login.html");
    assert!(body["errors"]["__all__"].is_array());
    assert_eq!(body["username"], "alice");
}

#[actix_web::test]
async fn login_form_echoes_the_next_target() {
    let (_store, state) = common::state();
    let app = test::init_service(build_app(state)).await;

    let req = TestRequest::get()
        .uri("/auth/login/?next=%2Ffollow%2F")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = common::read_json(resp).await;
    assert_eq!(body["next"], "/follow/");
}

#[actix_web::test]
async fn logout_clears_the_session() {
    let (_store, state) = common::state();
    let app = test::init_service(build_app(state)).await;
    let cookie = common::signup(&app, "alice").await;

    let req = TestRequest::post()
        .uri("/auth/logout/")
        .insert_header(("Cookie", cookie))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(common::location(&resp), "/");
    let cleared = common::session_cookie(&resp);
    assert!(cleared.starts_with("quill_session="));
}
