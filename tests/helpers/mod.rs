//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use spooldb_api::AppState;
use spooldb_core::config::AppConfig;

const BOUNDARY: &str = "spooldb-test-boundary";

/// Test application over a temporary data tree.
pub struct TestApp {
    /// The Axum app for making test requests
    pub router: Router,
    /// Shared state, for poking at the cache directly
    pub state: AppState,
    /// Holds the data and store roots
    pub dir: tempfile::TempDir,
}

impl TestApp {
    /// A writable app over empty roots.
    pub async fn new() -> Self {
        Self::build(false).await
    }

    /// An app that rejects mutations.
    pub async fn read_only() -> Self {
        Self::build(true).await
    }

    async fn build(read_only: bool) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let data_root = dir.path().join("data");
        let stores_root = dir.path().join("stores");
        std::fs::create_dir_all(&data_root).unwrap();
        std::fs::create_dir_all(&stores_root).unwrap();

        let mut config = AppConfig::default();
        config.catalog.data_root = data_root.display().to_string();
        config.catalog.stores_root = stores_root.display().to_string();
        config.catalog.read_only = read_only;

        let state = AppState::from_config(config)
            .await
            .expect("Failed to build state");
        let router = spooldb_api::build_app(state.clone());

        Self { router, state, dir }
    }

    pub fn data_path(&self, rel: &str) -> PathBuf {
        self.dir.path().join("data").join(rel)
    }

    pub fn stores_path(&self, rel: &str) -> PathBuf {
        self.dir.path().join("stores").join(rel)
    }

    /// Write a raw file under the data root.
    pub fn put(&self, rel: &str, contents: &str) {
        write(&self.data_path(rel), contents);
    }

    /// Write a raw file under the store root.
    pub fn put_store(&self, rel: &str, contents: &str) {
        write(&self.stores_path(rel), contents);
    }

    /// A brand with one PLA filament in black, plus one store.
    pub fn seed(&self) {
        self.put(
            "Acme_3D/brand.json",
            r#"{"brand":"Acme 3D","website":"https://acme.example","logo":"","origin":"DE"}"#,
        );
        self.put("Acme_3D/PLA/material.json", r#"{"material":"PLA"}"#);
        self.put(
            "Acme_3D/PLA/PLA_Basic/filament.json",
            r#"{"name":"PLA Basic","density":1.24}"#,
        );
        self.put(
            "Acme_3D/PLA/PLA_Basic/Black/variant.json",
            r##"{"color_name":"Black","color_hex":"#000000"}"##,
        );
        self.put(
            "Acme_3D/PLA/PLA_Basic/Black/sizes.json",
            r#"[{"filament_weight":1000,"diameter":1.75,"purchase_links":[{"store_id":"amazon","url":"https://amazon.example/pla"}]},{"filament_weight":250,"diameter":1.75}]"#,
        );
        self.put_store(
            "amazon/store.json",
            r#"{"id":"amazon","name":"Amazon","storefront_url":"https://amazon.example","ships_from":"US","ships_to":["US","CA"]}"#,
        );
    }

    /// Make a JSON HTTP request to the test app
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body_str))
            .expect("Failed to build request");

        self.send(req).await
    }

    /// Make a multipart request with a `data` JSON part and an optional logo.
    pub async fn multipart(
        &self,
        method: &str,
        path: &str,
        data: Value,
        logo: Option<(&str, &[u8])>,
    ) -> TestResponse {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"data\"\r\n\r\n{data}\r\n"
            )
            .as_bytes(),
        );
        if let Some((file_name, bytes)) = logo {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"logo\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        let req = Request::builder()
            .method(method)
            .uri(path)
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .expect("Failed to build request");

        self.send(req).await
    }

    async fn send(&self, req: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 16 * 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestResponse {
    /// The `data` member of a success envelope.
    pub fn data(&self) -> &Value {
        &self.body["data"]
    }
}

fn write(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
}
