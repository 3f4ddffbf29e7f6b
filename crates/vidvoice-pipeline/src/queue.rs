//! The frame analysis queue.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, warn};
use vidvoice_core::{Frame, FrameId, QuotaStore};
use vidvoice_gemini::GeminiClient;

/// Outcome notifications from the analysis queue, delivered in backlog
/// order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameEvent {
    /// One frame settled with the model's description or an error marker.
    Completed { id: FrameId, description: String },
    /// The daily quota ran out and the remaining backlog was abandoned.
    /// Emitted at most once per queue lifetime.
    QuotaExhausted,
}

/// A vision service that turns one frame image into a short description.
///
/// Implementations never fail: a service error is substituted with an
/// error-marker description, so every dequeued frame reaches a terminal
/// status.
pub trait FrameAnalyzer: Send + Sync + 'static {
    fn describe(&self, image: &[u8]) -> impl Future<Output = String> + Send;
}

impl FrameAnalyzer for GeminiClient {
    async fn describe(&self, image: &[u8]) -> String {
        self.describe_frame(image).await
    }
}

/// Serializes frame analysis against two constraints: a minimum spacing
/// between consecutive requests and the daily quota. At most one drain task
/// runs per queue; enqueueing while it runs only appends to the backlog.
pub struct AnalysisQueue<A, Q> {
    inner: Arc<QueueInner<A, Q>>,
}

struct QueueInner<A, Q> {
    analyzer: A,
    quota: Q,
    /// Minimum spacing between consecutive analysis requests.
    interval: Duration,
    events: mpsc::UnboundedSender<FrameEvent>,
    backlog: Mutex<VecDeque<Frame>>,
    draining: AtomicBool,
    quota_notified: AtomicBool,
}

impl<A, Q> AnalysisQueue<A, Q>
where
    A: FrameAnalyzer,
    Q: QuotaStore + 'static,
{
    /// Create a queue and the receiving end of its event stream.
    pub fn new(
        analyzer: A,
        quota: Q,
        interval: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<FrameEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let inner = Arc::new(QueueInner {
            analyzer,
            quota,
            interval,
            events,
            backlog: Mutex::new(VecDeque::new()),
            draining: AtomicBool::new(false),
            quota_notified: AtomicBool::new(false),
        });
        (Self { inner }, rx)
    }

    /// Append frames to the backlog tail and make sure the drain task is
    /// running. Starting while one is active is a no-op.
    pub fn enqueue(&self, frames: Vec<Frame>) {
        self.inner.backlog.lock().unwrap().extend(frames);
        self.spawn_drain();
    }

    /// Discard the backlog. An in-flight request finishes naturally and its
    /// event is still delivered; nothing further is drained.
    pub fn clear(&self) {
        self.inner.backlog.lock().unwrap().clear();
    }

    /// Number of frames still waiting.
    pub fn backlog_len(&self) -> usize {
        self.inner.backlog.lock().unwrap().len()
    }

    fn spawn_drain(&self) {
        if self
            .inner
            .draining
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            tokio::spawn(drain(Arc::clone(&self.inner)));
        }
    }
}

async fn drain<A, Q>(inner: Arc<QueueInner<A, Q>>)
where
    A: FrameAnalyzer,
    Q: QuotaStore + 'static,
{
    loop {
        run_drain_pass(&inner).await;
        inner.draining.store(false, Ordering::SeqCst);

        // An enqueue may have raced the idle transition; pick its work up
        // instead of leaving it stranded.
        let refire = !inner.backlog.lock().unwrap().is_empty()
            && inner
                .draining
                .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok();
        if !refire {
            break;
        }
    }
}

async fn run_drain_pass<A, Q>(inner: &QueueInner<A, Q>)
where
    A: FrameAnalyzer,
    Q: QuotaStore,
{
    loop {
        if inner.backlog.lock().unwrap().is_empty() {
            debug!("Analysis backlog drained");
            return;
        }

        // The quota gate runs before each dequeue so exhaustion is caught
        // mid-batch without waiting out the pacing delay
        let stats = inner.quota.read();
        if stats.exhausted() {
            let abandoned = {
                let mut backlog = inner.backlog.lock().unwrap();
                let len = backlog.len();
                backlog.clear();
                len
            };
            if !inner.quota_notified.swap(true, Ordering::SeqCst) {
                warn!(
                    "Daily analysis quota exhausted, abandoning {} queued frames",
                    abandoned
                );
                let _ = inner.events.send(FrameEvent::QuotaExhausted);
            }
            return;
        }

        let frame = inner.backlog.lock().unwrap().pop_front();
        let Some(frame) = frame else { return };

        let started = Instant::now();
        inner.quota.increment();
        let description = inner.analyzer.describe(&frame.image).await;
        let _ = inner.events.send(FrameEvent::Completed {
            id: frame.id,
            description,
        });

        // Pace the next request; skip the wait when nothing is left
        if !inner.backlog.lock().unwrap().is_empty() {
            if let Some(wait) = inner.interval.checked_sub(started.elapsed()) {
                tokio::time::sleep(wait).await;
            }
        }
    }
}
