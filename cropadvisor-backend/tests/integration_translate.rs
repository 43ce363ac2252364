mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{body_json, session_from, Recording, TestApp};
use cropadvisor_auth::session::DEFAULT_MAX_ANONYMOUS;
use cropadvisor_model::FixedClassifier;
use cropadvisor_translate::TranslationGateway;
use serde_json::json;

fn recording_app() -> (TestApp, Arc<Recording>) {
    let rec = Arc::new(Recording::default());
    let app = TestApp::with(
        Arc::new(FixedClassifier::new("rice")),
        TranslationGateway::new(rec.clone()),
    );
    (app, rec)
}

#[tokio::test]
async fn english_short_circuits_the_translator() {
    let (app, rec) = recording_app();
    let token = app.login_as("alice", "pw").await;

    app.post_json("/set_language", json!({"lang": "fr"}), Some(&token))
        .await;
    let body = body_json(app.post_json("/translate", json!({"text": "Rice"}), Some(&token)).await).await;
    assert_eq!(body["translated"], "[fr] Rice");
    assert_eq!(rec.calls(), 1);

    app.post_json("/set_language", json!({"lang": "english"}), Some(&token))
        .await;
    let body = body_json(app.post_json("/translate", json!({"text": "Rice"}), Some(&token)).await).await;
    assert_eq!(body["translated"], "Rice");
    assert_eq!(rec.calls(), 1);
}

#[tokio::test]
async fn explicit_lang_wins_over_session() {
    let (app, rec) = recording_app();
    let body = body_json(
        app.post_json("/translate", json!({"text": "Maize", "lang": "hindi"}), None)
            .await,
    )
    .await;
    assert_eq!(body["translated"], "[hindi] Maize");

    let body = body_json(
        app.post_json("/translate", json!({"text": "Maize", "lang": "en"}), None)
            .await,
    )
    .await;
    assert_eq!(body["translated"], "Maize");
    assert_eq!(rec.calls(), 1);
}

#[tokio::test]
async fn no_lang_and_no_session_means_english() {
    let (app, rec) = recording_app();
    let body = body_json(app.post_json("/translate", json!({"text": "Jute"}), None).await).await;
    assert_eq!(body["translated"], "Jute");
    assert_eq!(rec.calls(), 0);
}

#[tokio::test]
async fn set_language_defaults_to_english() {
    let (app, _) = recording_app();
    let resp = app.post_json("/set_language", json!({}), None).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let token = session_from(&resp).unwrap();
    let session = app.state.sessions().current(&token).unwrap();
    assert_eq!(session.language, "english");
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn cookieless_set_language_does_not_accumulate_sessions() {
    let (app, _) = recording_app();
    let user = app.login_as("alice", "pw").await;
    for _ in 0..DEFAULT_MAX_ANONYMOUS + 100 {
        let resp = app
            .post_json("/set_language", json!({"lang": "fr"}), None)
            .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
    let sessions = app.state.sessions();
    assert_eq!(sessions.anonymous_count(), DEFAULT_MAX_ANONYMOUS);
    assert!(sessions.current(&user).is_some());
}

#[tokio::test]
async fn set_language_reuses_live_session() {
    let (app, _) = recording_app();
    let token = app.login_as("bob", "pw").await;
    let resp = app
        .post_json("/set_language", json!({"lang": "klingon"}), Some(&token))
        .await;
    assert!(session_from(&resp).is_none());
    assert_eq!(
        app.state.sessions().current(&token).unwrap().language,
        "klingon"
    );
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let (app, _) = recording_app();
    let resp = app
        .post_json("/translate", json!({"text": 42}), None)
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
