//! Application run loop tests

use std::sync::Arc;
use std::time::Duration;

use evse_agent::app::options::AppOptions;
use evse_agent::app::run::run_with;
use evse_agent::evse::client::EvseClient;
use evse_agent::models::status::PowerState;
use evse_agent::workers::poller;
use tokio::sync::oneshot;
use tokio_test::assert_ok;

use crate::stub::StubTransport;

fn options(enabled: bool) -> AppOptions {
    let mut options = AppOptions::default();
    options.evse.enabled = enabled;
    options.evse.enable_control = true;
    options.evse.max_charge_current = 32;
    options.poller = poller::Options {
        interval: Duration::from_millis(10),
    };
    options
}

#[tokio::test]
async fn test_run_polls_until_shutdown() {
    let stub = Arc::new(StubTransport::with_status("active"));
    let options = options(true);
    let client = Arc::new(EvseClient::new(stub.clone(), &options.evse));
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let agent = tokio::spawn(async move {
        run_with(client, None, &options, async move {
            let _ = shutdown_rx.await;
        })
        .await
    });

    tokio::time::sleep(Duration::from_millis(100)).await;
    shutdown_tx.send(()).unwrap();
    assert_ok!(agent.await.unwrap());

    let calls = stub.total_calls();
    assert!(calls > 0);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(stub.total_calls(), calls);
}

#[tokio::test]
async fn test_run_without_polling() {
    let stub = Arc::new(StubTransport::with_status("active"));
    let options = options(false);
    let client = Arc::new(EvseClient::new(stub.clone(), &options.evse));

    let sleep = tokio::time::sleep(Duration::from_millis(50));
    assert_ok!(run_with(client, None, &options, sleep).await);

    assert_eq!(stub.total_calls(), 0);
}

#[tokio::test]
async fn test_client_controls_share_transport() {
    let stub = Arc::new(StubTransport::with_status("active"));
    let options = options(true);
    let client = EvseClient::new(stub.clone(), &options.evse);

    assert!(client.in_high_priority_state().await);
    assert_ok!(client.set_state(PowerState::Off).await);
    assert_eq!(assert_ok!(client.get_state().await), PowerState::Off);
    assert_eq!(assert_ok!(client.set_limit(64).await), 32);
    assert_eq!(stub.commands(), vec!["$SC 32"]);
}
