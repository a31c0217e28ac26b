use reelforge_wire::HealthResponse;

use super::test_support::spawn;

#[tokio::test]
async fn health_reports_zero_active_jobs_and_cloud_disabled_for_a_fresh_store() {
    let server = spawn(None).await;
    let client = reqwest::Client::new();

    let response = client.get(format!("{}/health", server.base_url)).send().await.expect("request");
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let health: HealthResponse = response.json().await.expect("json");
    assert!(health.storage_ready);
    assert_eq!(health.active_job_count, 0);
    assert!(!health.cloud_enabled);
    assert!(health.orchestrator_heartbeat_age_ms.is_none());
}
