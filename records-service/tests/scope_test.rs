mod common;

use axum::http::StatusCode;
use common::{TestApp, TEST_CLINICIAN, TEST_PATIENT};

#[tokio::test]
async fn clinician_lookup_normalizes_the_patient_key() {
    let app = TestApp::spawn().await;
    let client = reqwest::Client::new();

    // Entered lower-case, stored upper-case.
    let response = client
        .get(format!("{}/patients/pat123456", app.address))
        .header("X-User-ID", TEST_CLINICIAN)
        .send()
        .await
        .expect("Failed to execute request.");

    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["patient_key"], "PAT123456");
    assert_eq!(body["full_name"], "Asha Rao");
    assert_eq!(body["phone"], "555-0123");

    app.cleanup().await;
}

#[tokio::test]
async fn patient_cannot_lookup_other_patients() {
    let app = TestApp::spawn().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/patients/PAT123456", app.address))
        .header("X-User-ID", TEST_PATIENT)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(StatusCode::FORBIDDEN.as_u16(), response.status().as_u16());

    app.cleanup().await;
}

#[tokio::test]
async fn unknown_patient_key_is_not_found() {
    let app = TestApp::spawn().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/patients/PAT999999", app.address))
        .header("X-User-ID", TEST_CLINICIAN)
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(StatusCode::NOT_FOUND.as_u16(), response.status().as_u16());

    app.cleanup().await;
}

#[tokio::test]
async fn clinician_sees_the_target_patients_documents() {
    let app = TestApp::spawn().await;
    let client = reqwest::Client::new();

    app.upload(&client, TEST_PATIENT, "discharge.pdf", &[]).await;

    // Scoped to the patient via the lookup key.
    let response = client
        .get(format!("{}/documents", app.address))
        .header("X-User-ID", TEST_CLINICIAN)
        .query(&[("patient", "pat123456")])
        .send()
        .await
        .expect("Failed to execute request.");
    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["total"], 1);
    assert_eq!(body["documents"][0]["title"], "discharge.pdf");

    // Without a key the clinician sees only their own (empty) record set.
    let own: serde_json::Value = client
        .get(format!("{}/documents", app.address))
        .header("X-User-ID", TEST_CLINICIAN)
        .send()
        .await
        .expect("Failed to execute request.")
        .json()
        .await
        .expect("Failed to parse JSON");
    assert_eq!(own["total"], 0);

    app.cleanup().await;
}

#[tokio::test]
async fn patient_cannot_scope_to_another_patient() {
    let app = TestApp::spawn().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/documents", app.address))
        .header("X-User-ID", "some_other_patient")
        .query(&[("patient", "PAT123456")])
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(StatusCode::FORBIDDEN.as_u16(), response.status().as_u16());

    app.cleanup().await;
}
