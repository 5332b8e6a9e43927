mod common;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};

use quill_server::build_app;
use quill_server::data::comment_repository::CommentRepository;

#[actix_web::test]
async fn commenting_requires_login() {
    let (store, state) = common::state();
    let app = test::init_service(build_app(state)).await;
    common::signup(&app, "alice").await;
    let alice = common::find_user(&store, "alice").await;
    let post = common::seed_post(&store, alice.id, "hello", None).await;

    let uri = format!("/alice/{}/comment", post.id);
    let req = TestRequest::post()
        .uri(&uri)
        .set_form([("text", "anon")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert!(common::location(&resp).starts_with("/auth/login/?next="));
    assert!(store.for_post(post.id).await.unwrap().is_empty());
}

#[actix_web::test]
async fn comment_is_bound_to_post_and_session_user() {
    let (store, state) = common::state();
    let app = test::init_service(build_app(state)).await;
    common::signup(&app, "alice").await;
    let bob_cookie = common::signup(&app, "bob").await;
    let alice = common::find_user(&store, "alice").await;
    let post = common::seed_post(&store, alice.id, "hello", None).await;
    let other = common::seed_post(&store, alice.id, "other", None).await;

    // hidden post/author fields are ignored; the path decides
    let other_id = other.id.to_string();
    let req = TestRequest::post()
        .uri(&format!("/alice/{}/comment", post.id))
        .insert_header(("Cookie", bob_cookie))
        .set_form([
            ("text", "nice post"),
            ("post", other_id.as_str()),
            ("author", "alice"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(common::location(&resp), format!("/alice/{}/", post.id));

    let comments = store.for_post(post.id).await.unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].text, "nice post");
    assert_eq!(comments[0].author, "bob");
    assert!(!comments[0].active);
    assert!(store.for_post(other.id).await.unwrap().is_empty());
}

#[actix_web::test]
async fn comments_render_oldest_first_on_the_detail_page() {
    let (store, state) = common::state();
    let app = test::init_service(build_app(state)).await;
    let cookie = common::signup(&app, "alice").await;
    let alice = common::find_user(&store, "alice").await;
    let post = common::seed_post(&store, alice.id, "hello", None).await;

    for text in ["first", "second"] {
        let req = TestRequest::post()
            .uri(&format!("/alice/{}/comment", post.id))
            .insert_header(("Cookie", cookie.clone()))
            .set_form([("text", text)])
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND);
    }

    let resp = test::call_service(
        &app,
        TestRequest::get()
            .uri(&format!("/alice/{}/", post.id))
            .to_request(),
    )
    .await;
    let body = common::read_json(resp).await;
    let comments = body["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["text"], "first");
    assert_eq!(comments[1]["text"], "second");
}

#[actix_web::test]
async fn invalid_comment_redisplays_with_errors() {
    let (store, state) = common::state();
    let app = test::init_service(build_app(state)).await;
    let cookie = common::signup(&app, "alice").await;
    let alice = common::find_user(&store, "alice").await;
    let post = common::seed_post(&store, alice.id, "hello", None).await;

    let req = TestRequest::post()
        .uri(&format!("/alice/{}/comment", post.id))
        .insert_header(("Cookie", cookie))
        .set_form([("text", "   ")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = common::read_json(resp).await;
    assert_eq!(body["template"], "post.html");
    assert!(body["form"]["errors"]["text"].is_array());
    assert!(store.for_post(post.id).await.unwrap().is_empty());
}

#[actix_web::test]
async fn commenting_on_a_missing_post_is_not_found() {
    let (store, state) = common::state();
    let app = test::init_service(build_app(state)).await;
    let cookie = common::signup(&app, "alice").await;
    let _ = store;

    let req = TestRequest::post()
        .uri(&format!("/alice/{}/comment", uuid::Uuid::new_v4()))
        .insert_header(("Cookie", cookie))
        .set_form([("text", "into the void")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
