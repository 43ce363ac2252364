mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{body_json, body_string, Recording, TestApp};
use cropadvisor_model::{FixedClassifier, ForestModel};
use cropadvisor_translate::TranslationGateway;
use serde_json::json;

const SAMPLE: &str = "N=90&P=42&K=43&temperature=20.8&humidity=82&ph=6.5&rainfall=202.9";

#[tokio::test]
async fn predict_renders_crop_and_advice() {
    let app = TestApp::new();
    let token = app.login_as("alice", "pw").await;

    let resp = app.post_form("/predict", SAMPLE, Some(&token)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_string(resp).await;
    assert!(html.contains("Recommended crop: rice"));
    assert!(html.contains("Rice grows best in clayey soil"));
    assert!(html.contains("Use urea and potash-rich fertilizers"));
}

#[tokio::test]
async fn unknown_crop_gets_fallback_advice() {
    let app = TestApp::with(
        Arc::new(FixedClassifier::new("Quinoa")),
        TranslationGateway::disabled(),
    );
    let token = app.login_as("bob", "pw").await;

    let html = body_string(app.post_form("/predict", SAMPLE, Some(&token)).await).await;
    assert!(html.contains("Recommended crop: quinoa"));
    assert!(html.contains("No information available."));
    assert!(html.contains("Use balanced NPK fertilizers."));
}

#[tokio::test]
async fn malformed_sample_is_rejected_per_field() {
    let app = TestApp::new();
    let token = app.login_as("carol", "pw").await;

    let resp = app
        .post_form(
            "/predict",
            "N=abc&K=43&temperature=20&humidity=80&ph=6.5&rainfall=inf",
            Some(&token),
        )
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    let v = &body["validation"];
    assert_eq!(v["N"]["code"], "not_numeric");
    assert_eq!(v["P"]["code"], "required");
    assert_eq!(v["rainfall"]["code"], "not_finite");
    assert!(v.get("K").is_none());
}

#[tokio::test]
async fn forest_artifact_drives_prediction() {
    let model = ForestModel::from_json_str(
        r#"{
            "classes": ["Rice", "Chickpea"],
            "trees": [
                { "nodes": [
                    { "feature": 6, "threshold": 150.0, "left": 1, "right": 2 },
                    { "value": [0.0, 12.0] },
                    { "value": [20.0, 0.0] }
                ] }
            ]
        }"#,
    )
    .unwrap();
    let app = TestApp::with(Arc::new(model), TranslationGateway::disabled());
    let token = app.login_as("dave", "pw").await;

    let dry = "N=40&P=67&K=80&temperature=18&humidity=16&ph=7.2&rainfall=80";
    let html = body_string(app.post_form("/predict", dry, Some(&token)).await).await;
    assert!(html.contains("Recommended crop: chickpea"));

    let html = body_string(app.post_form("/predict", SAMPLE, Some(&token)).await).await;
    assert!(html.contains("Recommended crop: rice"));
}

#[tokio::test]
async fn advice_follows_session_language() {
    let rec = Arc::new(Recording::default());
    let app = TestApp::with(
        Arc::new(FixedClassifier::new("rice")),
        TranslationGateway::new(rec.clone()),
    );
    let token = app.login_as("erin", "pw").await;

    let html = body_string(app.post_form("/predict", SAMPLE, Some(&token)).await).await;
    assert!(html.contains("Rice grows best"));
    assert_eq!(rec.calls(), 0);

    let resp = app
        .post_json("/set_language", json!({"lang": "fr"}), Some(&token))
        .await;
    assert_eq!(body_json(resp).await["status"], "ok");

    let html = body_string(app.post_form("/predict", SAMPLE, Some(&token)).await).await;
    assert!(html.contains("[fr] Rice grows best"));
    assert!(html.contains("[fr] Use urea"));
    assert_eq!(rec.calls(), 2);
}

#[tokio::test]
async fn shipped_sample_model_serves_predictions() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/crop_model.json");
    let model = ForestModel::from_path(path).expect("shipped model loads");
    assert_eq!(model.classes.len(), 6);

    let app = TestApp::with(Arc::new(model), TranslationGateway::disabled());
    let token = app.login_as("erin", "pw").await;

    let html = body_string(app.post_form("/predict", SAMPLE, Some(&token)).await).await;
    assert!(html.contains("Recommended crop: rice"));

    let dry = "N=40&P=67&K=80&temperature=18&humidity=16&ph=7.3&rainfall=80";
    let html = body_string(app.post_form("/predict", dry, Some(&token)).await).await;
    assert!(html.contains("Recommended crop: chickpea"));

    let temperate = "N=78&P=48&K=20&temperature=22&humidity=65&ph=6.2&rainfall=85";
    let html = body_string(app.post_form("/predict", temperate, Some(&token)).await).await;
    assert!(html.contains("Recommended crop: maize"));
}

#[test]
fn default_config_points_at_shipped_model() {
    let cfg = cropadvisor_config::Config::default();
    let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("workspace root");
    assert!(root.join(&cfg.model.path).is_file());
}
