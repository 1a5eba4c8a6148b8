//! Integration tests for catalog reads, cache coherence and integrity.

mod helpers;

use http::StatusCode;

#[tokio::test]
async fn test_health() {
    let app = helpers::TestApp::new().await;
    let response = app.request("GET", "/api/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["status"], "ok");
    assert_eq!(response.data()["read_only"], false);
    assert_eq!(response.data()["cache_ready"], false);
}

#[tokio::test]
async fn test_empty_catalog() {
    let app = helpers::TestApp::new().await;
    let response = app.request("GET", "/api/catalog", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["success"], true);
    assert_eq!(response.data()["brands"], serde_json::json!({}));
    assert_eq!(response.data()["stores"], serde_json::json!({}));
}

#[tokio::test]
async fn test_full_catalog_shape() {
    let app = helpers::TestApp::new().await;
    app.seed();

    let response = app.request("GET", "/api/catalog", None).await;
    assert_eq!(response.status, StatusCode::OK);

    let brand = &response.data()["brands"]["Acme_3D"];
    assert_eq!(brand["brand"], "Acme 3D");
    assert_eq!(brand["origin"], "DE");
    let color = &brand["materials"]["PLA"]["filaments"]["PLA_Basic"]["colors"]["Black"];
    assert_eq!(color["variant"]["color_hex"], "#000000");
    assert_eq!(color["sizes"][0]["purchase_links"][0]["affiliate"], false);
    assert_eq!(color["sizes"][1]["purchase_links"], serde_json::json!([]));

    let store = &response.data()["stores"]["amazon"];
    assert_eq!(store["ships_from"], serde_json::json!(["US"]));
    assert_eq!(store["ships_to"], serde_json::json!(["US", "CA"]));
}

#[tokio::test]
async fn test_brand_listing_and_lookup() {
    let app = helpers::TestApp::new().await;
    app.seed();

    let response = app.request("GET", "/api/brands", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()[0]["key"], "Acme_3D");
    assert_eq!(response.data()[0]["filaments"], 1);

    let response = app.request("GET", "/api/brands/Acme%203D", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["website"], "https://acme.example");

    let response = app.request("GET", "/api/brands/Nobody", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["success"], false);
    assert_eq!(response.body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_color_and_store_lookup() {
    let app = helpers::TestApp::new().await;
    app.seed();

    let response = app
        .request(
            "GET",
            "/api/brands/Acme_3D/materials/PLA/filaments/PLA_Basic/colors/Black",
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["name"], "Black");
    assert_eq!(response.data()["sizes"].as_array().unwrap().len(), 2);

    let response = app.request("GET", "/api/stores/amazon", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["name"], "Amazon");

    let response = app.request("GET", "/api/stores", None).await;
    assert_eq!(response.data().as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_disk_changes_visible_only_after_refresh() {
    let app = helpers::TestApp::new().await;
    app.seed();
    app.request("GET", "/api/catalog", None).await;

    app.put(
        "Beta/brand.json",
        r#"{"brand":"Beta","website":"","logo":"","origin":""}"#,
    );
    let response = app.request("GET", "/api/brands/Beta", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app.request("POST", "/api/catalog/refresh", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["stats"]["brands"], 2);

    let response = app.request("GET", "/api/brands/Beta", None).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_failed_refresh_keeps_last_snapshot() {
    let app = helpers::TestApp::new().await;
    app.seed();
    let first = app.request("GET", "/api/catalog/info", None).await;
    let generation = first.data()["generation"].as_u64().unwrap();

    app.put("Acme_3D/PLA/material.json", "{ not json");
    let response = app.request("POST", "/api/catalog/refresh", None).await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["error"], "PARSE_ERROR");

    let response = app.request("GET", "/api/catalog/info", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.data()["generation"].as_u64().unwrap(), generation);
    let response = app.request("GET", "/api/brands/Acme_3D", None).await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_concurrent_reads_build_once() {
    let app = helpers::TestApp::new().await;
    app.seed();

    let reads = (0..8).map(|_| app.request("GET", "/api/catalog", None));
    for response in futures::future::join_all(reads).await {
        assert_eq!(response.status, StatusCode::OK);
    }
    assert_eq!(app.state.cache.generation(), 1);
}

#[tokio::test]
async fn test_integrity_report() {
    let app = helpers::TestApp::new().await;
    app.seed();
    app.put(
        "Acme_3D/PLA/PLA_Basic/Red/variant.json",
        r##"{"color_name":"Crimson","color_hex":"#DC143C"}"##,
    );
    app.put(
        "Acme_3D/PLA/PLA_Basic/Red/sizes.json",
        r#"[{"filament_weight":1000,"diameter":1.75,"purchase_links":[{"store_id":"ebay","url":"https://ebay.example"}]}]"#,
    );

    let response = app.request("GET", "/api/integrity", None).await;
    assert_eq!(response.status, StatusCode::OK);
    let issues = response.data()["issues"].as_array().unwrap();
    let kinds: Vec<&str> = issues.iter().map(|i| i["kind"].as_str().unwrap()).collect();
    assert_eq!(kinds.len(), 2);
    assert!(kinds.contains(&"folder_name_mismatch"));
    assert!(kinds.contains(&"unknown_store_reference"));

    let response = app
        .request("GET", "/api/integrity?store_ids=true", None)
        .await;
    let issues = response.data()["issues"].as_array().unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0]["kind"], "unknown_store_reference");
}

#[tokio::test]
async fn test_missing_data_root_is_not_found() {
    let app = helpers::TestApp::read_only().await;
    std::fs::remove_dir_all(app.data_path("")).unwrap();

    let response = app.request("GET", "/api/catalog", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
