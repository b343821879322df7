use std::sync::Arc;

use foundation::bounds::GeoBounds;
use foundation::geo::Point;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::IngestError;
use crate::source::PointSource;
use crate::state::PointData;

/// Identifies one `start` call. Only the newest ticket is honored.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchTicket(u64);

#[derive(Debug)]
pub struct FetchCompletion {
    pub ticket: FetchTicket,
    pub result: Result<Vec<Point>, IngestError>,
}

/// Runs fetches as Tokio tasks and funnels their results into `PointData`.
///
/// A new `start` supersedes the one in flight: the old task is aborted and,
/// should its completion already be queued, it is discarded on arrival.
pub struct PointLoader {
    source: Arc<dyn PointSource>,
    bounds: GeoBounds,
    next_ticket: u64,
    in_flight: Option<(FetchTicket, JoinHandle<()>)>,
    tx: mpsc::UnboundedSender<FetchCompletion>,
    rx: mpsc::UnboundedReceiver<FetchCompletion>,
}

impl PointLoader {
    pub fn new(source: Arc<dyn PointSource>, bounds: GeoBounds) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            source,
            bounds,
            next_ticket: 0,
            in_flight: None,
            tx,
            rx,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn current_ticket(&self) -> Option<FetchTicket> {
        self.in_flight.as_ref().map(|(ticket, _)| *ticket)
    }

    /// Starts a fetch and marks `data` as loading.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(&mut self, data: &mut PointData) -> FetchTicket {
        if let Some((old, handle)) = self.in_flight.take() {
            debug!(ticket = old.0, "superseding in-flight fetch");
            handle.abort();
        }

        self.next_ticket += 1;
        let ticket = FetchTicket(self.next_ticket);
        data.begin();

        let source = Arc::clone(&self.source);
        let bounds = self.bounds;
        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            let result = source.fetch(bounds).await;
            // The receiver lives as long as the loader; a failed send means it is gone.
            let _ = tx.send(FetchCompletion { ticket, result });
        });
        self.in_flight = Some((ticket, handle));
        ticket
    }

    /// Applies `completion` if it belongs to the newest fetch.
    ///
    /// Returns `false` for stale completions, which leave `data` untouched.
    pub fn apply(&mut self, completion: FetchCompletion, data: &mut PointData) -> bool {
        if self.current_ticket() != Some(completion.ticket) {
            debug!(ticket = completion.ticket.0, "ignoring stale fetch completion");
            return false;
        }
        self.in_flight = None;
        if let Err(err) = &completion.result {
            warn!(%err, "point fetch failed");
        }
        data.finish(completion.result);
        true
    }

    /// Waits for the newest fetch and applies it.
    ///
    /// Returns `None` immediately when nothing is in flight. A task that ends
    /// without reporting back (a panicking source) settles as a network error.
    pub async fn settle(&mut self, data: &mut PointData) -> Option<FetchTicket> {
        loop {
            let (ticket, handle) = self.in_flight.as_mut()?;
            let ticket = *ticket;
            tokio::select! {
                biased;
                Some(completion) = self.rx.recv() => {
                    if self.apply(completion, data) {
                        return Some(ticket);
                    }
                }
                joined = handle => {
                    if let Err(err) = &joined
                        && !err.is_cancelled()
                    {
                        warn!(ticket = ticket.0, %err, "fetch task ended abnormally");
                    }
                    return self.poll(data);
                }
            }
        }
    }

    /// Applies whatever has already arrived without waiting.
    pub fn poll(&mut self, data: &mut PointData) -> Option<FetchTicket> {
        // Checked before draining: a finished task has queued its completion, if any.
        let finished = self
            .in_flight
            .as_ref()
            .is_some_and(|(_, handle)| handle.is_finished());

        let mut applied = None;
        while let Ok(completion) = self.rx.try_recv() {
            let ticket = completion.ticket;
            if self.apply(completion, data) {
                applied = Some(ticket);
            }
        }

        if finished && let Some(ticket) = self.current_ticket() {
            self.abandon(ticket, data);
            applied = Some(ticket);
        }
        applied
    }

    /// Settles a fetch whose task ended without sending a completion.
    fn abandon(&mut self, ticket: FetchTicket, data: &mut PointData) {
        let completion = FetchCompletion {
            ticket,
            result: Err(IngestError::Network("fetch task failed".into())),
        };
        self.apply(completion, data);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use foundation::bounds::GeoBounds;
    use foundation::geo::{LonLat, Point};

    use super::{FetchCompletion, PointLoader};
    use crate::error::IngestError;
    use crate::source::{BoxFuture, PointSource};
    use crate::state::PointData;

    /// Serves scripted responses in call order, each after its own delay.
    struct ScriptedSource {
        calls: AtomicUsize,
        script: Vec<(u64, Result<Vec<Point>, IngestError>)>,
    }

    impl ScriptedSource {
        fn new(script: Vec<(u64, Result<Vec<Point>, IngestError>)>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                script,
            })
        }
    }

    impl PointSource for ScriptedSource {
        fn fetch(&self, _bounds: GeoBounds) -> BoxFuture<'_, Result<Vec<Point>, IngestError>> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            let (delay_ms, result) = self.script[n].clone();
            Box::pin(async move {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                result
            })
        }
    }

    /// Panics inside the fetch task instead of returning.
    struct PanickingSource;

    fn explode() -> Result<Vec<Point>, IngestError> {
        panic!("source failed mid-fetch")
    }

    impl PointSource for PanickingSource {
        fn fetch(&self, _bounds: GeoBounds) -> BoxFuture<'_, Result<Vec<Point>, IngestError>> {
            Box::pin(async {
                tokio::task::yield_now().await;
                explode()
            })
        }
    }

    fn named(names: &[&str]) -> Vec<Point> {
        names
            .iter()
            .map(|n| Point::new(LonLat::new(-46.6, -23.5), *n))
            .collect()
    }

    fn bounds() -> GeoBounds {
        GeoBounds::new(-47.0, -46.0, -24.0, -23.0)
    }

    #[tokio::test]
    async fn successful_fetch_fills_data() {
        let source = ScriptedSource::new(vec![(0, Ok(named(&["a", "b"])))]);
        let mut loader = PointLoader::new(source, bounds());
        let mut data = PointData::new();

        let ticket = loader.start(&mut data);
        assert!(data.is_loading());
        assert_eq!(loader.settle(&mut data).await, Some(ticket));
        assert!(!data.is_loading());
        assert_eq!(data.points().len(), 2);
        assert!(!loader.is_pending());
        assert_eq!(loader.settle(&mut data).await, None);
    }

    #[tokio::test]
    async fn newer_fetch_supersedes_older() {
        let source = ScriptedSource::new(vec![
            (200, Ok(named(&["old"]))),
            (0, Ok(named(&["new-1", "new-2"]))),
        ]);
        let mut loader = PointLoader::new(source, bounds());
        let mut data = PointData::new();

        let first = loader.start(&mut data);
        // Let the first task call `fetch` before it is aborted.
        tokio::task::yield_now().await;
        let second = loader.start(&mut data);
        assert_ne!(first, second);

        assert_eq!(loader.settle(&mut data).await, Some(second));
        let names: Vec<&str> = data.points().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["new-1", "new-2"]);
    }

    #[tokio::test]
    async fn stale_completion_is_ignored() {
        let source = ScriptedSource::new(vec![(0, Ok(named(&["a"]))), (0, Ok(named(&["b"])))]);
        let mut loader = PointLoader::new(source, bounds());
        let mut data = PointData::new();

        let first = loader.start(&mut data);
        loader.start(&mut data);
        let stale = FetchCompletion {
            ticket: first,
            result: Ok(named(&["stale"])),
        };
        assert!(!loader.apply(stale, &mut data));
        assert!(data.is_loading());
        assert!(data.points().is_empty());
    }

    #[tokio::test]
    async fn failure_is_recorded_as_text() {
        let source = ScriptedSource::new(vec![
            (0, Ok(named(&["a"]))),
            (0, Err(IngestError::Http(503))),
        ]);
        let mut loader = PointLoader::new(source, bounds());
        let mut data = PointData::new();

        loader.start(&mut data);
        loader.settle(&mut data).await;
        loader.start(&mut data);
        loader.settle(&mut data).await;

        assert_eq!(data.error(), Some("HTTP 503"));
        assert_eq!(data.points().len(), 1);
    }

    #[tokio::test]
    async fn panicking_source_settles_as_failure() {
        let mut loader = PointLoader::new(Arc::new(PanickingSource), bounds());
        let mut data = PointData::new();

        let ticket = loader.start(&mut data);
        let settled = tokio::time::timeout(Duration::from_secs(2), loader.settle(&mut data))
            .await
            .expect("settle must not hang");

        assert_eq!(settled, Some(ticket));
        assert!(!data.is_loading());
        assert_eq!(data.error(), Some("network error: fetch task failed"));
        assert!(!loader.is_pending());
    }

    #[tokio::test]
    async fn poll_reaps_a_task_that_died() {
        let mut loader = PointLoader::new(Arc::new(PanickingSource), bounds());
        let mut data = PointData::new();

        let ticket = loader.start(&mut data);
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(loader.poll(&mut data), Some(ticket));
        assert!(!data.is_loading());
        assert!(data.error().is_some());
        assert_eq!(loader.poll(&mut data), None);
    }
}
