//! Status poller tests

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use evse_agent::evse::transport::DeviceTransport;
use evse_agent::telemetry::sink::{MetricSink, RecordingSink};
use evse_agent::telemetry::GaugeMetric;
use evse_agent::workers::poller::{self, poll_once, Options};
use tokio_test::{assert_err, assert_ok};

use crate::stub::StubTransport;

fn fast() -> Options {
    Options {
        interval: Duration::from_millis(10),
    }
}

#[tokio::test]
async fn test_poll_once_forwards_translated_metrics() {
    let stub = StubTransport::with_status("active");
    let sink = RecordingSink::new();

    assert_eq!(assert_ok!(poll_once(&stub, Some(&sink)).await), 3);

    let metrics = sink.metrics();
    assert!(metrics.contains(&GaugeMetric::new("openevse_amp", 16000.0)));
    assert!(metrics.contains(&GaugeMetric::new("openevse_ota_update", 0.0)));
    assert!(metrics.contains(&GaugeMetric::new("openevse_status", 1.0).with_tag("status:active")));
}

#[tokio::test]
async fn test_poll_once_without_sink_still_fetches() {
    let stub = StubTransport::with_status("active");

    assert_eq!(assert_ok!(poll_once(&stub, None).await), 0);
    assert_eq!(stub.fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_poll_once_fetch_failure() {
    let stub = StubTransport::unreachable();
    let sink = RecordingSink::new();

    assert_err!(poll_once(&stub, Some(&sink)).await);
    assert!(sink.metrics().is_empty());
}

#[tokio::test]
async fn test_poller_keeps_going_after_failures() {
    let stub = Arc::new(StubTransport::unreachable());
    let transport: Arc<dyn DeviceTransport> = stub.clone();

    let handle = poller::spawn(fast(), transport, None);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_ok!(handle.stop().await);

    assert!(stub.fetches.load(Ordering::SeqCst) >= 2);
}

#[tokio::test]
async fn test_no_device_calls_after_stop() {
    let stub = Arc::new(StubTransport::with_status("active"));
    let sink = Arc::new(RecordingSink::new());
    let transport: Arc<dyn DeviceTransport> = stub.clone();
    let metric_sink: Arc<dyn MetricSink> = sink.clone();

    let handle = poller::spawn(fast(), transport, Some(metric_sink));
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_ok!(handle.stop().await);

    let calls = stub.total_calls();
    assert!(calls > 0);
    assert!(!sink.metrics().is_empty());

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(stub.total_calls(), calls);
}

#[tokio::test]
async fn test_stop_before_first_tick() {
    let stub = Arc::new(StubTransport::with_status("active"));
    let transport: Arc<dyn DeviceTransport> = stub.clone();

    let handle = poller::spawn(Options::default(), transport, None);
    assert_ok!(handle.stop().await);

    assert_eq!(stub.total_calls(), 0);
}
