mod common;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use chrono::{Duration, Utc};

use quill_server::build_app;

#[actix_web::test]
async fn index_is_paginated_newest_first() {
    let (store, state) = common::state();
    let app = test::init_service(build_app(state)).await;

    common::signup(&app, "alice").await;
    let alice = common::find_user(&store, "alice").await;
    let base = Utc::now() - Duration::hours(1);
    for i in 0..13 {
        common::seed_post_at(
            &store,
            alice.id,
            &format!("post {i}"),
            None,
            base + Duration::seconds(i),
        )
        .await;
    }

    let resp = test::call_service(&app, TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = common::read_json(resp).await;
    assert_eq!(body["template"], "index.html");
    assert_eq!(body["page"]["number"], 1);
    assert_eq!(body["page"]["total_items"], 13);
    assert_eq!(body["page"]["total_pages"], 2);
    assert_eq!(body["page"]["has_next"], true);
    let items = body["page"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 10);
    assert_eq!(items[0]["text"], "post 12");
    assert_eq!(items[9]["text"], "post 3");

    let resp = test::call_service(&app, TestRequest::get().uri("/?page=2").to_request()).await;
    let body = common::read_json(resp).await;
    assert_eq!(body["page"]["items"].as_array().unwrap().len(), 3);
    assert_eq!(body["page"]["has_previous"], true);
}

#[actix_web::test]
async fn page_parameter_is_forgiving() {
    let (store, state) = common::state();
    let app = test::init_service(build_app(state)).await;

    common::signup(&app, "alice").await;
    let alice = common::find_user(&store, "alice").await;
    let base = Utc::now() - Duration::hours(1);
    for i in 0..15 {
        common::seed_post_at(&store, alice.id, &format!("p{i}"), None, base + Duration::seconds(i))
            .await;
    }

    let resp =
        test::call_service(&app, TestRequest::get().uri("/?page=banana").to_request()).await;
    let body = common::read_json(resp).await;
    assert_eq!(body["page"]["number"], 1);

    let resp = test::call_service(&app, TestRequest::get().uri("/?page=99").to_request()).await;
    let body = common::read_json(resp).await;
    assert_eq!(body["page"]["number"], 2);
}

#[actix_web::test]
async fn group_feed_filters_strictly() {
    let (store, state) = common::state();
    let app = test::init_service(build_app(state)).await;

    common::signup(&app, "alice").await;
    let alice = common::find_user(&store, "alice").await;
    let cats = common::seed_group(&store, "Cats", "cats").await;
    common::seed_post(&store, alice.id, "in the group", Some(cats.id)).await;
    common::seed_post(&store, alice.id, "ungrouped", None).await;

    let resp =
        test::call_service(&app, TestRequest::get().uri("/group/cats/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = common::read_json(resp).await;
    assert_eq!(body["template"], "group.html");
    assert_eq!(body["group"]["slug"], "cats");
    let items = body["page"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["text"], "in the group");
    assert_eq!(items[0]["group_slug"], "cats");
}

#[actix_web::test]
async fn unknown_group_slug_is_not_found() {
    let (_store, state) = common::state();
    let app = test::init_service(build_app(state)).await;

    let resp =
        test::call_service(&app, TestRequest::get().uri("/group/nope/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = common::read_json(resp).await;
    assert_eq!(body["template"], "misc/404.html");
}

#[actix_web::test]
async fn profile_feed_filters_and_counts() {
    let (store, state) = common::state();
    let app = test::init_service(build_app(state)).await;

    common::signup(&app, "alice").await;
    common::signup(&app, "bob").await;
    let alice = common::find_user(&store, "alice").await;
    let bob = common::find_user(&store, "bob").await;
    common::seed_post(&store, alice.id, "mine", None).await;
    common::seed_post(&store, bob.id, "not mine", None).await;

    let resp = test::call_service(&app, TestRequest::get().uri("/alice/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = common::read_json(resp).await;
    assert_eq!(body["template"], "profile.html");
    assert_eq!(body["author"]["username"], "alice");
    assert_eq!(body["post_count"], 1);
    let items = body["page"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["author"], "alice");
}

#[actix_web::test]
async fn unknown_profile_is_not_found() {
    let (_store, state) = common::state();
    let app = test::init_service(build_app(state)).await;

    let resp = test::call_service(&app, TestRequest::get().uri("/ghost/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn follow_feed_requires_login() {
    let (_store, state) = common::state();
    let app = test::init_service(build_app(state)).await;

    let resp = test::call_service(&app, TestRequest::get().uri("/follow/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(common::location(&resp), "/auth/login/?next=%2Ffollow%2F");
}

#[actix_web::test]
async fn follow_feed_shows_followed_authors_only() {
    let (store, state) = common::state();
    let app = test::init_service(build_app(state)).await;

    common::signup(&app, "alice").await;
    common::signup(&app, "carol").await;
    let cookie = common::signup(&app, "bob").await;
    let alice = common::find_user(&store, "alice").await;
    let carol = common::find_user(&store, "carol").await;
    common::seed_post(&store, alice.id, "followed", None).await;
    common::seed_post(&store, carol.id, "not followed", None).await;

    let req = TestRequest::post()
        .uri("/alice/follow/")
        .insert_header(("Cookie", cookie.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    let req = TestRequest::get()
        .uri("/follow/")
        .insert_header(("Cookie", cookie))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = common::read_json(resp).await;
    assert_eq!(body["template"], "follow.html");
    let items = body["page"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["text"], "followed");
}

#[actix_web::test]
async fn index_cache_serves_identical_bytes_until_cleared() {
    let (store, state) = common::state();
    let cache = state.cache.clone();
    let app = test::init_service(build_app(state)).await;

    common::signup(&app, "alice").await;
    let alice = common::find_user(&store, "alice").await;
    common::seed_post(&store, alice.id, "first", None).await;

    let resp = test::call_service(&app, TestRequest::get().uri("/").to_request()).await;
    let first = test::read_body(resp).await;

    // an intervening write must not show up within the cache window
    common::seed_post(&store, alice.id, "second", None).await;

    let resp = test::call_service(&app, TestRequest::get().uri("/").to_request()).await;
    let second = test::read_body(resp).await;
    assert_eq!(first, second);

    cache.clear();

    let resp = test::call_service(&app, TestRequest::get().uri("/").to_request()).await;
    let third = test::read_body(resp).await;
    assert_ne!(first, third);
}

#[actix_web::test]
async fn unmatched_path_renders_the_404_page() {
    let (_store, state) = common::state();
    let app = test::init_service(build_app(state)).await;

    let resp = test::call_service(
        &app,
        TestRequest::get().uri("/no/such/route/here/").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = common::read_json(resp).await;
    assert_eq!(body["template"], "misc/404.html");
    assert_eq!(body["path"], "/no/such/route/here/");
}
