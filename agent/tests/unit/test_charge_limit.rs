//! Charge limit controller tests

use std::sync::Arc;

use evse_agent::errors::AgentError;
use evse_agent::evse::charge_limit::ChargeLimitController;
use tokio_test::assert_ok;

use crate::stub::StubTransport;

fn controller(stub: &Arc<StubTransport>) -> ChargeLimitController<Arc<StubTransport>> {
    ChargeLimitController::new(stub.clone(), 40)
}

#[tokio::test]
async fn test_set_limit_clamps_into_range() {
    let stub = Arc::new(StubTransport::default());
    let controller = controller(&stub);

    assert_eq!(assert_ok!(controller.set_limit(3).await), 6);
    assert_eq!(assert_ok!(controller.set_limit(50).await), 40);
    assert_eq!(assert_ok!(controller.set_limit(20).await), 20);

    assert_eq!(stub.commands(), vec!["$SC 6", "$SC 40", "$SC 20"]);
}

#[tokio::test]
async fn test_set_limit_rejected_reply() {
    let stub = Arc::new(StubTransport::default());
    stub.push_reply("$NK^21");

    let result = controller(&stub).set_limit(16).await;

    assert!(matches!(result, Err(AgentError::Protocol(_))));
    assert_eq!(stub.commands(), vec!["$SC 16"]);
}

#[tokio::test]
async fn test_get_limit_parses_middle_token() {
    let stub = Arc::new(StubTransport::default());
    stub.push_reply("$OK 24 0^2C");

    assert_eq!(assert_ok!(controller(&stub).get_limit().await), 24);
    assert_eq!(stub.commands(), vec!["$GE"]);
}

#[tokio::test]
async fn test_get_limit_unexpected_reply() {
    let stub = Arc::new(StubTransport::default());
    stub.push_reply("$OK");

    let result = controller(&stub).get_limit().await;
    assert!(matches!(result, Err(AgentError::Protocol(_))));
}

#[tokio::test]
async fn test_set_limit_negative_and_huge_requests() {
    let stub = Arc::new(StubTransport::default());
    let controller = controller(&stub);

    assert_eq!(assert_ok!(controller.set_limit(-3).await), 6);
    assert_eq!(assert_ok!(controller.set_limit(99_999_999_999).await), 40);

    assert_eq!(stub.commands(), vec!["$SC 6", "$SC 40"]);
}
