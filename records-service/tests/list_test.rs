mod common;

use common::{TestApp, TEST_PATIENT};

async fn list(
    app: &TestApp,
    client: &reqwest::Client,
    user_id: &str,
    query: &[(&str, &str)],
) -> serde_json::Value {
    client
        .get(format!("{}/documents", app.address))
        .header("X-User-ID", user_id)
        .query(query)
        .send()
        .await
        .expect("Failed to execute list request")
        .json()
        .await
        .expect("Failed to parse JSON")
}

fn titles(body: &serde_json::Value) -> Vec<String> {
    body["documents"]
        .as_array()
        .expect("documents array expected")
        .iter()
        .map(|d| d["title"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn empty_search_returns_every_document() {
    let app = TestApp::spawn().await;
    let client = reqwest::Client::new();

    app.upload(&client, TEST_PATIENT, "a.pdf", &[]).await;
    app.upload(&client, TEST_PATIENT, "b.pdf", &[]).await;

    let body = list(&app, &client, TEST_PATIENT, &[]).await;
    assert_eq!(body["total"], 2);

    let filtered = list(&app, &client, TEST_PATIENT, &[("search", "")]).await;
    assert_eq!(filtered["total"], 2);

    app.cleanup().await;
}

#[tokio::test]
async fn search_matches_title_doctor_and_hospital_case_insensitively() {
    let app = TestApp::spawn().await;
    let client = reqwest::Client::new();

    app.upload(
        &client,
        TEST_PATIENT,
        "lipid-panel.pdf",
        &[("doctor_name", "Dr. Mehta")],
    )
    .await;
    app.upload(
        &client,
        TEST_PATIENT,
        "x-ray.png",
        &[("hospital_name", "City Hospital")],
    )
    .await;
    app.upload(&client, TEST_PATIENT, "note.pdf", &[]).await;

    let by_doctor = list(&app, &client, TEST_PATIENT, &[("search", "MEHTA")]).await;
    assert_eq!(titles(&by_doctor), vec!["lipid-panel.pdf"]);

    let by_hospital = list(&app, &client, TEST_PATIENT, &[("search", "city")]).await;
    assert_eq!(titles(&by_hospital), vec!["x-ray.png"]);

    let by_title = list(&app, &client, TEST_PATIENT, &[("search", "lipid")]).await;
    assert_eq!(titles(&by_title), vec!["lipid-panel.pdf"]);

    let no_match = list(&app, &client, TEST_PATIENT, &[("search", "cardiology")]).await;
    assert_eq!(no_match["total"], 0);

    app.cleanup().await;
}

#[tokio::test]
async fn timeline_view_reorders_by_document_date() {
    let app = TestApp::spawn().await;
    let client = reqwest::Client::new();

    // Uploaded first, but the medical event is recent.
    app.upload(
        &client,
        TEST_PATIENT,
        "recent-event.pdf",
        &[("document_date", "2024-06-01")],
    )
    .await;
    // Uploaded second, but the medical event is years old.
    app.upload(
        &client,
        TEST_PATIENT,
        "old-event.pdf",
        &[("document_date", "2020-01-15")],
    )
    .await;

    let list_view = list(&app, &client, TEST_PATIENT, &[("view", "list")]).await;
    assert_eq!(titles(&list_view), vec!["old-event.pdf", "recent-event.pdf"]);

    let timeline = list(&app, &client, TEST_PATIENT, &[("view", "timeline")]).await;
    assert_eq!(titles(&timeline), vec!["recent-event.pdf", "old-event.pdf"]);

    app.cleanup().await;
}
