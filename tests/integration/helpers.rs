//! Test doubles for the metrics provider and the chat gateway

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serenity::all::ChannelId;
use view_relay::{
    actors::scheduler::{SchedulerHandle, SchedulerSettings},
    discord::ChatGateway,
    error::{DeliveryError, FetchError},
    registry::ChannelRegistry,
    youtube::MetricsSource,
};

pub const VIDEO_ID: &str = "dQw4w9WgXcQ";

pub fn channel_a() -> ChannelId {
    ChannelId::new(1_000_000_000_000_001)
}

pub fn channel_b() -> ChannelId {
    ChannelId::new(1_000_000_000_000_002)
}

/// Metrics source returning a fixed result and counting calls
pub struct MockSource {
    result: Mutex<Result<u64, FetchError>>,
    calls: AtomicUsize,
}

impl MockSource {
    pub fn returning(count: u64) -> Arc<Self> {
        Arc::new(Self {
            result: Mutex::new(Ok(count)),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(error: FetchError) -> Arc<Self> {
        Arc::new(Self {
            result: Mutex::new(Err(error)),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn set_result(&self, result: Result<u64, FetchError>) {
        *self.result.lock().unwrap() = result;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MetricsSource for MockSource {
    async fn fetch_view_count(&self, video_id: &str) -> Result<u64, FetchError> {
        assert_eq!(video_id, VIDEO_ID);
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.lock().unwrap().clone()
    }
}

/// Chat gateway recording every delivered message
#[derive(Default)]
pub struct MockGateway {
    sent: Mutex<Vec<(ChannelId, String)>>,
    resolves: AtomicUsize,
    unavailable: Mutex<HashSet<ChannelId>>,
    reject_sends: AtomicBool,
    send_delays: Mutex<VecDeque<Duration>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn mark_unavailable(&self, channel: ChannelId) {
        self.unavailable.lock().unwrap().insert(channel);
    }

    pub fn reject_sends(&self) {
        self.reject_sends.store(true, Ordering::SeqCst);
    }

    /// Make the next send take `delay` before it completes
    pub fn delay_next_send(&self, delay: Duration) {
        self.send_delays.lock().unwrap().push_back(delay);
    }

    /// Highest number of sends that were running at the same time
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<(ChannelId, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn resolves(&self) -> usize {
        self.resolves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChatGateway for MockGateway {
    async fn resolve_channel(&self, channel: ChannelId) -> Result<String, DeliveryError> {
        self.resolves.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.lock().unwrap().contains(&channel) {
            return Err(DeliveryError::ChannelUnavailable {
                channel,
                reason: "Unknown Channel".to_string(),
            });
        }
        Ok(format!("channel-{channel}"))
    }

    async fn send_message(&self, channel: ChannelId, content: &str) -> Result<(), DeliveryError> {
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);

        let delay = self.send_delays.lock().unwrap().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.reject_sends.load(Ordering::SeqCst) {
            return Err(DeliveryError::SendFailed {
                channel,
                reason: "Missing Permissions".to_string(),
            });
        }
        self.sent
            .lock()
            .unwrap()
            .push((channel, content.to_string()));
        Ok(())
    }
}

/// Spawn a scheduler whose timer never fires during a test
pub fn spawn_scheduler(
    registry: Arc<ChannelRegistry>,
    source: Arc<dyn MetricsSource>,
    gateway: Arc<dyn ChatGateway>,
) -> SchedulerHandle {
    spawn_scheduler_every(registry, source, gateway, Duration::from_secs(3 * 60 * 60))
}

pub fn spawn_scheduler_every(
    registry: Arc<ChannelRegistry>,
    source: Arc<dyn MetricsSource>,
    gateway: Arc<dyn ChatGateway>,
    interval: Duration,
) -> SchedulerHandle {
    SchedulerHandle::spawn(
        SchedulerSettings {
            video_id: VIDEO_ID.to_string(),
            interval,
        },
        registry,
        source,
        gateway,
    )
}

pub fn videos_response(view_count: &str) -> serde_json::Value {
    serde_json::json!({
        "kind": "youtube#videoListResponse",
        "etag": "test",
        "items": [{
            "kind": "youtube#video",
            "etag": "test",
            "id": VIDEO_ID,
            "statistics": {
                "viewCount": view_count,
                "likeCount": "1000",
                "favoriteCount": "0",
                "commentCount": "50"
            }
        }],
        "pageInfo": {"totalResults": 1, "resultsPerPage": 1}
    })
}
