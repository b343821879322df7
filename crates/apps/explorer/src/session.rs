use std::sync::Arc;

use foundation::ids::CellId;
use ingest::{FetchTicket, PointLoader, PointSource, SAO_PAULO_BBOX};
use runtime::clock::Clock;
use tracing::{debug, info};

use crate::config::ExplorerConfig;
use crate::store::{Action, Explorer};

/// Upper bound on frames spent waiting for one camera transition.
const MAX_TRANSITION_FRAMES: u32 = 10_000;

/// Drives an [`Explorer`]: owns the point loader and the frame clock.
pub struct Session {
    explorer: Explorer,
    loader: PointLoader,
    clock: Clock,
}

impl Session {
    pub fn new(config: &ExplorerConfig, source: Arc<dyn PointSource>) -> Self {
        Self {
            explorer: Explorer::new(config),
            loader: PointLoader::new(source, SAO_PAULO_BBOX),
            clock: Clock::new(),
        }
    }

    pub fn explorer(&self) -> &Explorer {
        &self.explorer
    }

    pub fn explorer_mut(&mut self) -> &mut Explorer {
        &mut self.explorer
    }

    pub fn dispatch(&mut self, action: Action) -> bool {
        self.explorer.dispatch(action)
    }

    /// Starts a fetch without waiting; a fetch already in flight is superseded.
    pub fn reload(&mut self) -> FetchTicket {
        self.explorer.begin_fetch(&mut self.loader)
    }

    /// Fetches and waits for the result.
    pub async fn load(&mut self) -> Option<FetchTicket> {
        self.reload();
        self.explorer.settle_fetch(&mut self.loader).await
    }

    /// Advances the clock one frame and lets the camera settle if due.
    pub fn tick_ms(&mut self, frame_ms: u32) -> bool {
        let frame = self.clock.tick_ms(frame_ms);
        self.explorer.poll_fetch(&mut self.loader);
        self.explorer.dispatch(Action::Tick(frame.time))
    }

    /// Ticks until the camera is static. Returns the number of frames used.
    pub fn run_transition(&mut self, frame_ms: u32) -> u32 {
        let frame_ms = frame_ms.max(1);
        let mut frames = 0;
        while self.explorer.camera().is_transitioning() && frames < MAX_TRANSITION_FRAMES {
            self.tick_ms(frame_ms);
            frames += 1;
        }
        debug!(frames, "transition finished");
        frames
    }

    /// Chooses the `n` densest cells and confirms them.
    ///
    /// Returns the chosen ids; empty when there was nothing to choose.
    pub fn select_densest(&mut self, n: usize) -> Vec<CellId> {
        let cells = self.explorer.densest_cells(n);
        for cell in &cells {
            if !self.explorer.selection().contains(cell) {
                self.explorer.dispatch(Action::ToggleCell(cell.clone()));
            }
        }
        if !cells.is_empty() {
            self.explorer.dispatch(Action::Confirm(true));
            info!(cells = cells.len(), "selection confirmed");
        }
        cells
    }
}
