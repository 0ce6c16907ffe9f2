//! Failure handling of a scheduler tick
//!
//! Every failure ends the tick without a post and leaves the scheduler
//! running for the next one.

use std::sync::Arc;

use assert_matches::assert_matches;
use view_relay::{
    actors::messages::TickOutcome,
    error::{DeliveryError, FetchError, TickError},
    registry::ChannelRegistry,
};

use crate::helpers::*;

// The returned TickError is what the scheduler hands to its single log call
// (`log_tick`), so one failed fetch produces exactly one error log line.
#[tokio::test]
async fn test_fetch_failure_sends_nothing() {
    let registry = Arc::new(ChannelRegistry::new());
    registry.set(channel_a()).await;
    let source = MockSource::failing(FetchError::Status(503));
    let gateway = MockGateway::new();

    let handle = spawn_scheduler(registry, source.clone(), gateway.clone());

    let err = handle.tick_now().await.unwrap_err();

    assert_matches!(
        err.downcast_ref::<TickError>(),
        Some(TickError::Fetch(FetchError::Status(503)))
    );
    assert_eq!(source.calls(), 1);
    assert!(gateway.sent().is_empty());

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_unavailable_channel_skips_fetch() {
    let registry = Arc::new(ChannelRegistry::new());
    registry.set(channel_a()).await;
    let source = MockSource::returning(5);
    let gateway = MockGateway::new();
    gateway.mark_unavailable(channel_a());

    let handle = spawn_scheduler(registry, source.clone(), gateway.clone());

    let err = handle.tick_now().await.unwrap_err();

    assert_matches!(
        err.downcast_ref::<TickError>(),
        Some(TickError::Delivery(DeliveryError::ChannelUnavailable { channel, .. }))
            if *channel == channel_a()
    );
    assert_eq!(gateway.resolves(), 1);
    assert_eq!(source.calls(), 0);
    assert!(gateway.sent().is_empty());

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_rejected_send_is_reported() {
    let registry = Arc::new(ChannelRegistry::new());
    registry.set(channel_b()).await;
    let source = MockSource::returning(5);
    let gateway = MockGateway::new();
    gateway.reject_sends();

    let handle = spawn_scheduler(registry, source.clone(), gateway.clone());

    let err = handle.tick_now().await.unwrap_err();

    assert_matches!(
        err.downcast_ref::<TickError>(),
        Some(TickError::Delivery(DeliveryError::SendFailed { .. }))
    );
    assert_eq!(source.calls(), 1);

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_scheduler_survives_failed_tick() {
    let registry = Arc::new(ChannelRegistry::new());
    registry.set(channel_a()).await;
    let source = MockSource::failing(FetchError::EmptyResult);
    let gateway = MockGateway::new();

    let handle = spawn_scheduler(registry, source.clone(), gateway.clone());

    assert!(handle.tick_now().await.is_err());

    source.set_result(Ok(9_999));
    let outcome = handle.tick_now().await.unwrap();

    assert_matches!(outcome, TickOutcome::Delivered { count: 9_999, .. });
    assert_eq!(gateway.sent().len(), 1);

    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_tick_after_shutdown_fails() {
    let registry = Arc::new(ChannelRegistry::new());
    let handle = spawn_scheduler(registry, MockSource::returning(1), MockGateway::new());

    handle.shutdown().await.unwrap();

    let result = handle.tick_now().await;
    assert!(result.is_err(), "tick should fail after shutdown");
}
