//! Shared fixtures for voiceguard-api integration tests

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use base64::Engine as _;
use http_body_util::BodyExt;
use serde_json::Value;
use std::io::Cursor;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;
use voiceguard_api::classifier::{Classifier, RandomClassifier};
use voiceguard_api::{build_router, AppState};
use voiceguard_common::config::ServiceConfig;

pub const TEST_API_KEY: &str = "test-key";

/// Configuration for generated audio
#[derive(Debug, Clone)]
pub struct ToneConfig {
    pub duration_seconds: f64,
    pub sample_rate: u32,
    pub channels: u16,
    pub frequency: f32,
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            duration_seconds: 1.0,
            sample_rate: 22_050,
            channels: 1,
            frequency: 440.0,
        }
    }
}

/// Generate an in-memory 16-bit WAV containing a sine tone
pub fn tone_wav_bytes(config: &ToneConfig) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: config.channels,
        sample_rate: config.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        let total_samples = (config.duration_seconds * config.sample_rate as f64) as usize;

        for i in 0..total_samples {
            let t = i as f32 / config.sample_rate as f32;
            let sample = (0.3 * (2.0 * std::f32::consts::PI * config.frequency * t).sin()
                * i16::MAX as f32) as i16;
            for _ in 0..config.channels {
                writer.write_sample(sample).unwrap();
            }
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

/// Base64 of a default one-second tone
pub fn tone_wav_base64() -> String {
    base64::engine::general_purpose::STANDARD.encode(tone_wav_bytes(&ToneConfig::default()))
}

/// Router plus the state and temp dir behind it
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub temp_dir: TempDir,
}

impl TestApp {
    /// Number of files left in the audio temp dir
    pub fn temp_file_count(&self) -> usize {
        std::fs::read_dir(self.temp_dir.path())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }
}

/// Test app backed by a seeded random classifier
pub fn test_app() -> TestApp {
    test_app_with(Arc::new(RandomClassifier::with_seed(1234)))
}

pub fn test_app_with(classifier: Arc<dyn Classifier>) -> TestApp {
    build_test_app(classifier, |_| {})
}

/// Test app whose request bodies are capped at `max_body_bytes`
pub fn test_app_with_body_limit(max_body_bytes: usize) -> TestApp {
    build_test_app(Arc::new(RandomClassifier::with_seed(1234)), |config| {
        config.max_body_bytes = max_body_bytes;
    })
}

fn build_test_app(
    classifier: Arc<dyn Classifier>,
    customize: impl FnOnce(&mut ServiceConfig),
) -> TestApp {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut config = ServiceConfig {
        api_key: TEST_API_KEY.to_string(),
        temp_dir: temp_dir.path().to_path_buf(),
        ..ServiceConfig::default()
    };
    customize(&mut config);

    let state = AppState::new(config, classifier).unwrap();
    let router = build_router(state.clone());

    TestApp {
        router,
        state,
        temp_dir,
    }
}

pub fn post_json(uri: &str, body: &Value, api_key: Option<&str>) -> Request<Body> {
    post_raw(uri, body.to_string(), api_key)
}

pub fn post_raw(uri: &str, body: String, api_key: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(key) = api_key {
        builder = builder.header("x-api-key", key);
    }
    builder.body(Body::from(body)).unwrap()
}

/// POST without a Content-Type header
pub fn post_untyped(uri: &str, body: String, api_key: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("POST").uri(uri);
    if let Some(key) = api_key {
        builder = builder.header("x-api-key", key);
    }
    builder.body(Body::from(body)).unwrap()
}

pub fn get(uri: &str, api_key: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(key) = api_key {
        builder = builder.header("x-api-key", key);
    }
    builder.body(Body::empty()).unwrap()
}
