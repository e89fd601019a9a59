use flights_api::routes::health::healthz;

#[tokio::test]
async fn healthz_reports_healthy() {
    let response = healthz().await;
    assert_eq!(response.0.status, "healthy");
}
