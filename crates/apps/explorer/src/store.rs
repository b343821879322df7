use std::sync::Arc;

use cells::{CellAggregate, CellAssignment, CellPipeline, CellSnapshot};
use foundation::bounds::GeoBounds;
use foundation::geo::Point;
use foundation::ids::CellId;
use foundation::time::Time;
use ingest::{FetchTicket, PointData, PointLoader};
use layers::{
    HexDataset, LayerDescriptor, LayerId, MapStyle, PickEvent, PickedObject, PointDataset,
    build_layer_stack, tooltip,
};
use runtime::event_bus::{Event, EventBus, EventKind};
use runtime::memo::{Identity, Memo};
use scene::{CameraController, FlyTo, PoseUpdate, SelectionState, Toggle, ViewPose};
use tracing::{debug, info, warn};

use crate::config::{ExplorerConfig, FlySettings, RESOLUTION_RANGE};

/// Everything the user (or the renderer) can do to the explorer.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetResolution(u8),
    ToggleCell(CellId),
    RemoveCell(CellId),
    ClearSelection,
    Confirm(bool),
    /// Click reported by the renderer.
    Pick(PickEvent),
    UserMove(ViewPose),
    SetPitch(f64),
    SetBearing(f64),
    SetMapStyle(MapStyle),
    /// Renderer finished the camera transition.
    TransitionEnded,
    /// Session clock moved.
    Tick(Time),
}

/// Application store. All state changes go through [`Explorer::dispatch`].
#[derive(Debug)]
pub struct Explorer {
    data: PointData,
    resolution: u8,
    pipeline: CellPipeline,
    selection: SelectionState,
    camera: CameraController,
    style: MapStyle,
    fly: FlySettings,
    selected_points: Memo<(Identity<[CellAssignment]>, u64), [Point]>,
    hex: Memo<(Identity<[CellAggregate]>, u64), HexDataset>,
    bus: EventBus,
}

impl Explorer {
    pub fn new(config: &ExplorerConfig) -> Self {
        Self {
            data: PointData::new(),
            resolution: config.resolution,
            pipeline: CellPipeline::default(),
            selection: SelectionState::new(),
            camera: CameraController::with_defaults(),
            style: MapStyle::default(),
            fly: config.fly,
            selected_points: Memo::new(),
            hex: Memo::new(),
            bus: EventBus::new(),
        }
    }

    pub fn resolution(&self) -> u8 {
        self.resolution
    }

    pub fn point_data(&self) -> &PointData {
        &self.data
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    pub fn style(&self) -> MapStyle {
        self.style
    }

    pub fn events(&self) -> &[Event] {
        self.bus.events()
    }

    pub fn drain_events(&mut self) -> Vec<Event> {
        self.bus.drain()
    }

    /// Kicks off a fetch; the point data switches to loading.
    pub fn begin_fetch(&mut self, loader: &mut PointLoader) -> FetchTicket {
        let ticket = loader.start(&mut self.data);
        self.bus.emit(EventKind::Ingest, format!("fetch {ticket:?} started"));
        ticket
    }

    /// Waits for the newest fetch and installs its outcome.
    pub async fn settle_fetch(&mut self, loader: &mut PointLoader) -> Option<FetchTicket> {
        let ticket = loader.settle(&mut self.data).await?;
        self.record_fetch(ticket);
        Some(ticket)
    }

    /// Installs a fetch outcome that has already arrived, if any.
    pub fn poll_fetch(&mut self, loader: &mut PointLoader) -> Option<FetchTicket> {
        let ticket = loader.poll(&mut self.data)?;
        self.record_fetch(ticket);
        Some(ticket)
    }

    fn record_fetch(&mut self, ticket: FetchTicket) {
        let message = match self.data.error() {
            Some(err) => format!("fetch {ticket:?} failed: {err}"),
            None => format!("fetch {ticket:?} loaded {} points", self.data.points().len()),
        };
        self.bus.emit(EventKind::Ingest, message);
    }

    /// Applies `action`. Returns `true` when observable state changed.
    pub fn dispatch(&mut self, action: Action) -> bool {
        debug!(?action, "dispatch");
        match action {
            Action::SetResolution(res) => self.set_resolution(res),
            Action::ToggleCell(cell) => self.toggle(cell),
            Action::RemoveCell(cell) => {
                let changed = self.selection.remove(&cell);
                if changed {
                    self.bus.emit(EventKind::Selection, format!("removed {cell}"));
                }
                changed
            }
            Action::ClearSelection => self.clear_selection(),
            Action::Confirm(true) => self.confirm(),
            Action::Confirm(false) => {
                let changed = self.selection.unconfirm();
                if changed {
                    self.bus.emit(EventKind::Selection, "unconfirmed");
                }
                changed
            }
            Action::Pick(event) => self.pick(event),
            Action::UserMove(raw) => pose_changed(self.camera.apply_user_move(raw)),
            Action::SetPitch(pitch) => pose_changed(self.camera.set_pitch(pitch)),
            Action::SetBearing(bearing) => pose_changed(self.camera.set_bearing(bearing)),
            Action::SetMapStyle(style) => {
                if style == self.style {
                    return false;
                }
                self.style = style;
                self.bus.emit(EventKind::Style, style.label);
                true
            }
            Action::TransitionEnded => {
                let settled = self.camera.complete_transition();
                self.settled(settled)
            }
            Action::Tick(now) => {
                let settled = self.camera.advance(now);
                self.settled(settled)
            }
        }
    }

    fn set_resolution(&mut self, res: u8) -> bool {
        let res = res.clamp(*RESOLUTION_RANGE.start(), *RESOLUTION_RANGE.end());
        if res == self.resolution {
            return false;
        }
        // Cell ids from the old resolution stay chosen; they simply match nothing.
        self.resolution = res;
        self.bus.emit(EventKind::Resolution, format!("resolution {res}"));
        true
    }

    fn toggle(&mut self, cell: CellId) -> bool {
        let label = cell.to_string();
        match self.selection.toggle(cell) {
            Toggle::Added => {
                self.bus.emit(EventKind::Selection, format!("added {label}"));
                true
            }
            Toggle::Removed => {
                self.bus.emit(EventKind::Selection, format!("removed {label}"));
                true
            }
            Toggle::Ignored => false,
        }
    }

    fn clear_selection(&mut self) -> bool {
        self.selection.clear();
        let pose = self.camera.reset_to_initial(self.fly.reset_duration_ms);
        self.bus.emit(EventKind::Selection, "cleared");
        self.bus.emit(
            EventKind::Camera,
            format!("reset to initial over {} ms", pose.transition_duration_ms),
        );
        true
    }

    fn confirm(&mut self) -> bool {
        let was_confirmed = self.selection.is_confirmed();
        if let Err(err) = self.selection.confirm() {
            warn!(%err, "confirm ignored");
            return false;
        }
        if was_confirmed {
            return false;
        }
        self.bus.emit(
            EventKind::Selection,
            format!("confirmed {} cells", self.selection.len()),
        );

        let points = self.selected_points();
        let Some(bounds) = GeoBounds::from_positions(points.iter().map(|p| p.position)) else {
            info!("confirmed selection has no points; camera unchanged");
            return true;
        };
        let request = FlyTo {
            bounds,
            viewport: self.fly.viewport,
            padding_px: self.fly.padding_px,
            max_zoom: self.fly.max_zoom,
            duration_ms: self.fly.duration_ms,
        };
        match self.camera.fly_to(request) {
            Some(target) => self.bus.emit(
                EventKind::Camera,
                format!(
                    "fly to ({:.4}, {:.4}) z{:.2}",
                    target.latitude, target.longitude, target.zoom
                ),
            ),
            None => debug!(?bounds, "no framing for selected points"),
        }
        true
    }

    fn pick(&mut self, event: PickEvent) -> bool {
        match event.object {
            PickedObject::Cell { cell_id, .. } if event.layer == LayerId::HEX_CELLS => {
                self.toggle(cell_id)
            }
            _ => false,
        }
    }

    fn settled(&mut self, pose: Option<ViewPose>) -> bool {
        let Some(pose) = pose else {
            return false;
        };
        self.bus.emit(
            EventKind::Camera,
            format!(
                "settled at ({:.4}, {:.4}) z{:.2}",
                pose.latitude, pose.longitude, pose.zoom
            ),
        );
        true
    }

    /// Assignments and aggregates for the current points and resolution.
    pub fn cells(&mut self) -> CellSnapshot {
        self.pipeline.run(self.data.points(), self.resolution)
    }

    /// Points inside chosen cells, in fetch order.
    pub fn selected_points(&mut self) -> Arc<[Point]> {
        let assignments = self.cells().assignments;
        let selection = &self.selection;
        self.selected_points.get_or_compute(
            (Identity::of(&assignments), selection.revision()),
            || Arc::from(selection.selected_points(&assignments)),
        )
    }

    pub fn hex_dataset(&mut self) -> Arc<HexDataset> {
        let aggregates = self.cells().aggregates;
        let selection = &self.selection;
        self.hex.get_or_compute(
            (Identity::of(&aggregates), selection.revision()),
            || Arc::new(HexDataset::from_selection(&aggregates, selection)),
        )
    }

    pub fn point_dataset(&mut self) -> Option<Arc<PointDataset>> {
        let points = self.selected_points();
        PointDataset::build(points, self.selection.is_confirmed()).map(Arc::new)
    }

    /// Ordered layer descriptors for the renderer.
    pub fn layers(&mut self) -> Vec<LayerDescriptor> {
        let cells = self.hex_dataset();
        let points = self.point_dataset();
        build_layer_stack(&self.style, cells, points)
    }

    /// Hover text for whatever the renderer reports under the cursor.
    pub fn tooltip(&self, event: &PickEvent) -> Option<String> {
        tooltip(&event.object)
    }

    /// The `n` cells with the most points, ties broken by id.
    pub fn densest_cells(&mut self, n: usize) -> Vec<CellId> {
        let aggregates = self.cells().aggregates;
        let mut ranked: Vec<&CellAggregate> = aggregates.iter().collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.cell_id.cmp(&b.cell_id)));
        ranked
            .into_iter()
            .take(n)
            .map(|agg| agg.cell_id.clone())
            .collect()
    }

    #[cfg(test)]
    pub(crate) fn load_points(&mut self, points: Vec<Point>) {
        self.data.begin();
        self.data.finish(Ok(points));
    }
}

fn pose_changed(update: PoseUpdate) -> bool {
    matches!(update, PoseUpdate::Changed(_))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use foundation::geo::{LonLat, Point};
    use foundation::ids::CellId;
    use layers::{CARTO_DARK, LayerId, OPEN_STREET_MAP, PickEvent, PickedObject};
    use pretty_assertions::assert_eq;
    use runtime::event_bus::EventKind;
    use scene::{INITIAL_POSE, SelectionPhase, TransitionKind};

    use super::{Action, Explorer};
    use crate::config::ExplorerConfig;

    /// Two clusters: around Praça da Sé and along Avenida Paulista.
    fn stops() -> Vec<Point> {
        [
            (-46.6333, -23.5505),
            (-46.6336, -23.5508),
            (-46.6330, -23.5502),
            (-46.6566, -23.5614),
            (-46.6560, -23.5610),
        ]
        .iter()
        .enumerate()
        .map(|(i, (lon, lat))| Point::new(LonLat::new(*lon, *lat), format!("stop {i}")))
        .collect()
    }

    fn loaded() -> Explorer {
        let mut explorer = Explorer::new(&ExplorerConfig::default());
        explorer.load_points(stops());
        explorer
    }

    fn layer_ids(explorer: &mut Explorer) -> Vec<LayerId> {
        use layers::Layer;
        explorer.layers().iter().map(Layer::id).collect()
    }

    fn select_all(explorer: &mut Explorer) {
        let ids: Vec<CellId> = explorer
            .cells()
            .aggregates
            .iter()
            .map(|a| a.cell_id.clone())
            .collect();
        for id in ids {
            assert!(explorer.dispatch(Action::ToggleCell(id)));
        }
    }

    #[test]
    fn confirm_on_empty_leaves_camera_alone() {
        let mut explorer = loaded();
        let revision = explorer.camera().revision();

        assert!(!explorer.dispatch(Action::Confirm(true)));
        assert!(!explorer.selection().is_confirmed());
        assert_eq!(explorer.camera().revision(), revision);
        assert!(!explorer.camera().is_transitioning());
    }

    #[test]
    fn confirm_flies_to_selected_points() {
        let mut explorer = loaded();
        select_all(&mut explorer);
        assert!(explorer.dispatch(Action::Confirm(true)));

        let pose = explorer.camera().pose();
        assert_eq!(pose.transition, TransitionKind::FlyTo);
        assert_eq!(pose.transition_duration_ms, 1500);
        assert!(pose.zoom <= 16.0);
        assert!((-46.6566..=-46.6330).contains(&pose.longitude));
        assert!((-23.5614..=-23.5502).contains(&pose.latitude));
        assert_eq!(pose.pitch, INITIAL_POSE.pitch);
        assert_eq!(explorer.selected_points().len(), 5);
    }

    #[test]
    fn clear_after_confirm_resets_camera() {
        let mut explorer = loaded();
        select_all(&mut explorer);
        explorer.dispatch(Action::Confirm(true));

        assert!(explorer.dispatch(Action::ClearSelection));
        assert_eq!(explorer.selection().phase(), SelectionPhase::Empty);
        let pose = explorer.camera().pose();
        assert_eq!(pose.transition, TransitionKind::FlyTo);
        assert!(pose.same_view(&INITIAL_POSE));
        assert_eq!(pose.transition_duration_ms, 1000);
    }

    #[test]
    fn transition_settles_on_tick() {
        let mut explorer = loaded();
        select_all(&mut explorer);
        explorer.dispatch(Action::Confirm(true));

        assert!(!explorer.dispatch(Action::Tick(foundation::time::Time(1.0))));
        assert!(explorer.dispatch(Action::Tick(foundation::time::Time(1.5))));
        assert!(!explorer.camera().is_transitioning());
        assert_eq!(explorer.camera().pose().transition, TransitionKind::None);
    }

    #[test]
    fn picks_toggle_cells_until_confirmed() {
        let mut explorer = loaded();
        let cell = explorer.cells().aggregates[0].clone();
        let pick = PickEvent {
            layer: LayerId::HEX_CELLS,
            object: PickedObject::Cell {
                cell_id: cell.cell_id.clone(),
                count: cell.count,
            },
        };

        assert!(explorer.dispatch(Action::Pick(pick.clone())));
        assert!(explorer.selection().contains(&cell.cell_id));
        explorer.dispatch(Action::Confirm(true));
        assert!(!explorer.dispatch(Action::Pick(pick)));
        assert!(explorer.selection().contains(&cell.cell_id));

        let marker = PickEvent {
            layer: LayerId::SELECTED_POINTS,
            object: PickedObject::Point(stops()[0].clone()),
        };
        assert!(!explorer.dispatch(Action::Pick(marker.clone())));
        assert_eq!(
            explorer.tooltip(&marker).as_deref(),
            Some("stop 0\n(-23.5505, -46.6333)")
        );
    }

    #[test]
    fn layers_follow_confirmation() {
        let mut explorer = loaded();
        select_all(&mut explorer);

        assert_eq!(
            layer_ids(&mut explorer),
            vec![LayerId::BASEMAP, LayerId::HEX_CELLS, LayerId::LABELS]
        );
        explorer.dispatch(Action::Confirm(true));
        assert_eq!(
            layer_ids(&mut explorer),
            vec![
                LayerId::BASEMAP,
                LayerId::HEX_CELLS,
                LayerId::SELECTED_POINTS,
                LayerId::LABELS
            ]
        );
    }

    #[test]
    fn derived_data_is_memoized() {
        let mut explorer = loaded();
        let first = explorer.hex_dataset();
        assert!(Arc::ptr_eq(&first, &explorer.hex_dataset()));

        let cell = explorer.cells().aggregates[0].cell_id.clone();
        explorer.dispatch(Action::ToggleCell(cell));
        let toggled = explorer.hex_dataset();
        assert!(!Arc::ptr_eq(&first, &toggled));
        assert!(Arc::ptr_eq(&toggled, &explorer.hex_dataset()));
    }

    #[test]
    fn resolution_is_clamped_and_keeps_selection() {
        let mut explorer = loaded();
        select_all(&mut explorer);
        let chosen = explorer.selection().len();

        assert!(explorer.dispatch(Action::SetResolution(42)));
        assert_eq!(explorer.resolution(), 10);
        assert!(!explorer.dispatch(Action::SetResolution(10)));
        assert_eq!(explorer.selection().len(), chosen);
        assert!(explorer.selected_points().is_empty());
        let resolution_events = explorer
            .events()
            .iter()
            .filter(|e| e.kind == EventKind::Resolution)
            .count();
        assert_eq!(resolution_events, 1);
    }

    #[test]
    fn user_moves_are_clamped() {
        let mut explorer = loaded();
        let far = scene::ViewPose::new(0.0, 0.0, 3.0, 30.0, 10.0);
        assert!(explorer.dispatch(Action::UserMove(far)));
        let pose = explorer.camera().pose();
        assert_eq!(pose.longitude, -46.30);
        assert_eq!(pose.latitude, -23.30);
        assert_eq!(pose.zoom, 9.0);
        assert!(!explorer.dispatch(Action::UserMove(far)));
    }

    #[test]
    fn confirm_with_no_points_in_cells_keeps_camera() {
        let mut explorer = loaded();
        select_all(&mut explorer);
        assert!(explorer.dispatch(Action::SetResolution(6)));
        let revision = explorer.camera().revision();

        assert!(explorer.dispatch(Action::Confirm(true)));
        assert!(explorer.selection().is_confirmed());
        assert!(explorer.selected_points().is_empty());
        assert_eq!(explorer.camera().revision(), revision);
        assert!(!explorer.camera().is_transitioning());
        assert_eq!(
            layer_ids(&mut explorer),
            vec![LayerId::BASEMAP, LayerId::HEX_CELLS, LayerId::LABELS]
        );
    }

    #[test]
    fn single_point_selection_confirms_without_flying() {
        let mut explorer = Explorer::new(&ExplorerConfig::default());
        explorer.load_points(stops().into_iter().take(1).collect());
        select_all(&mut explorer);
        let revision = explorer.camera().revision();

        assert!(explorer.dispatch(Action::Confirm(true)));
        assert!(explorer.selection().is_confirmed());
        assert_eq!(explorer.selected_points().len(), 1);
        assert_eq!(explorer.camera().revision(), revision);
        assert!(!explorer.camera().is_transitioning());
        assert!(explorer.camera().pose().same_view(&INITIAL_POSE));
    }

    #[test]
    fn removing_cells_unconfirms_then_empties() {
        let mut explorer = loaded();
        select_all(&mut explorer);
        explorer.dispatch(Action::Confirm(true));
        let ids: Vec<CellId> = explorer.selection().iter().cloned().collect();

        let (last, rest) = ids.split_last().expect("at least one cell");
        for id in rest {
            assert!(explorer.dispatch(Action::RemoveCell(id.clone())));
            assert_eq!(explorer.selection().phase(), SelectionPhase::Selecting);
        }
        assert!(explorer.dispatch(Action::RemoveCell(last.clone())));
        assert_eq!(explorer.selection().phase(), SelectionPhase::Empty);
        assert!(!explorer.dispatch(Action::RemoveCell(last.clone())));
    }

    #[test]
    fn transition_end_settles_once() {
        let mut explorer = loaded();
        select_all(&mut explorer);
        explorer.dispatch(Action::Confirm(true));
        assert!(explorer.camera().is_transitioning());

        assert!(explorer.dispatch(Action::TransitionEnded));
        assert!(!explorer.camera().is_transitioning());
        assert_eq!(explorer.camera().pose().transition, TransitionKind::None);
        assert!(!explorer.dispatch(Action::TransitionEnded));
    }

    #[test]
    fn pitch_and_bearing_are_clamped() {
        let mut explorer = loaded();

        assert!(explorer.dispatch(Action::SetPitch(80.0)));
        assert_eq!(explorer.camera().pose().pitch, 60.0);
        assert!(!explorer.dispatch(Action::SetPitch(75.0)));

        assert!(explorer.dispatch(Action::SetBearing(-200.0)));
        assert_eq!(explorer.camera().pose().bearing, -180.0);
        assert!(!explorer.dispatch(Action::SetBearing(-180.0)));
    }

    #[test]
    fn map_style_controls_label_overlay() {
        let mut explorer = loaded();

        assert!(explorer.dispatch(Action::SetMapStyle(OPEN_STREET_MAP)));
        assert_eq!(explorer.style(), OPEN_STREET_MAP);
        assert_eq!(layer_ids(&mut explorer), vec![LayerId::BASEMAP, LayerId::HEX_CELLS]);
        assert!(!explorer.dispatch(Action::SetMapStyle(OPEN_STREET_MAP)));

        assert!(explorer.dispatch(Action::SetMapStyle(CARTO_DARK)));
        assert_eq!(
            layer_ids(&mut explorer),
            vec![LayerId::BASEMAP, LayerId::HEX_CELLS, LayerId::LABELS]
        );
    }

    #[test]
    fn drained_events_are_not_repeated() {
        let mut explorer = loaded();
        select_all(&mut explorer);

        let drained = explorer.drain_events();
        assert!(!drained.is_empty());
        assert!(drained.iter().all(|e| e.kind == EventKind::Selection));
        assert!(explorer.events().is_empty());
    }
}
