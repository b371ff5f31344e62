//! End-to-end wiring from a TOML config file to live calls.

use std::time::Instant;

use service_client::config::load_config;
use service_client::{CircuitState, ClientError, ServiceClient};

mod common;

#[tokio::test]
async fn test_client_from_config_file() {
    let backend = common::start_programmable_backend(|| async { (502, "bad gateway".into()) }).await;

    let path = std::env::temp_dir().join(format!("service-client-{}.toml", uuid::Uuid::new_v4()));
    std::fs::write(
        &path,
        format!(
            "[breaker]\nmax_failures = 2\nreset_timeout_secs = 3600\n\n[http]\nbase_url = \"{}\"\nrequest_timeout_secs = 2\n",
            backend.base_url()
        ),
    )
    .unwrap();
    let config = load_config(&path);
    std::fs::remove_file(&path).unwrap_or_default();
    let mut config = config.unwrap();
    // The environment override must not redirect this test.
    config.http.base_url = backend.base_url().to_string();

    let client = ServiceClient::from_config(&config).unwrap();
    for _ in 0..2 {
        let err = client.try_get_template_data("welcome").await.unwrap_err();
        assert!(matches!(err, ClientError::Upstream { status: 502 }));
    }

    let err = client.try_get_template_data("welcome").await.unwrap_err();
    assert!(matches!(err, ClientError::CircuitOpen { .. }));
    assert_eq!(backend.hits(), 2);

    let snapshots = client.registry().snapshots(Instant::now());
    let template = snapshots.iter().find(|s| s.service == "template_service").unwrap();
    assert_eq!(template.state, CircuitState::Open);
    assert_eq!(template.failure_count, 2);
}
