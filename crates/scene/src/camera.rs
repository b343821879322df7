//! Map camera: clamped free movement plus animated fly-to transitions.
//!
//! The controller owns the single source-of-truth pose. It has two phases:
//! - `Static`: the pose is clamped to the view bounds.
//! - `Transitioning`: the pose is a fly-to target, not clamped, tagged with
//!   the transition markers until the transition completes.
//!
//! Completion is explicit: either the rendering engine reports it
//! (`complete_transition`) or the session clock passes the end of the span
//! (`advance`). Both settle the pose by re-applying the clamp.

use foundation::bounds::{GeoBounds, ViewBounds, ZoomRange};
use foundation::geo::LonLat;
use foundation::time::{Time, TimeSpan};
use tracing::debug;

use crate::fit::{MercatorFit, Viewport, ViewportFit};

/// Pitch slider range (degrees).
pub const PITCH_RANGE: (f64, f64) = (0.0, 60.0);
/// Bearing slider range (degrees).
pub const BEARING_RANGE: (f64, f64) = (-180.0, 180.0);

/// Greater São Paulo.
pub const SAO_PAULO_BOUNDS: ViewBounds = ViewBounds::new(
    GeoBounds::new(-47.06, -46.30, -24.05, -23.30),
    ZoomRange::new(9.0, 16.0),
);

pub const INITIAL_POSE: ViewPose = ViewPose::new(-46.6333, -23.5505, 10.0, 45.0, 0.0);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum TransitionKind {
    #[default]
    None,
    FlyTo,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewPose {
    pub longitude: f64,
    pub latitude: f64,
    pub zoom: f64,
    pub pitch: f64,
    pub bearing: f64,
    pub transition_duration_ms: u32,
    pub transition: TransitionKind,
}

impl ViewPose {
    pub const fn new(longitude: f64, latitude: f64, zoom: f64, pitch: f64, bearing: f64) -> Self {
        Self {
            longitude,
            latitude,
            zoom,
            pitch,
            bearing,
            transition_duration_ms: 0,
            transition: TransitionKind::None,
        }
    }

    pub fn center(&self) -> LonLat {
        LonLat::new(self.longitude, self.latitude)
    }

    pub fn is_transitioning(&self) -> bool {
        self.transition != TransitionKind::None
    }

    pub fn with_fly_to(mut self, duration_ms: u32) -> Self {
        self.transition = TransitionKind::FlyTo;
        self.transition_duration_ms = duration_ms;
        self
    }

    pub fn without_transition(mut self) -> Self {
        self.transition = TransitionKind::None;
        self.transition_duration_ms = 0;
        self
    }

    /// Same rendered view, ignoring transition markers.
    pub fn same_view(&self, other: &ViewPose) -> bool {
        self.longitude == other.longitude
            && self.latitude == other.latitude
            && self.zoom == other.zoom
            && self.pitch == other.pitch
            && self.bearing == other.bearing
    }

    fn clamped(self, bounds: &ViewBounds) -> Self {
        let c = bounds.area.clamp(self.center());
        Self {
            longitude: c.lon,
            latitude: c.lat,
            zoom: bounds.zoom.clamp(self.zoom),
            ..self
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum CameraPhase {
    Static,
    Transitioning { span: TimeSpan },
}

/// Result of feeding a user move to the controller.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PoseUpdate {
    /// The previous pose stands; nothing needs re-rendering.
    Unchanged,
    Changed(ViewPose),
}

/// Parameters of a fit-to-bounds flight.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FlyTo {
    pub bounds: GeoBounds,
    pub viewport: Viewport,
    pub padding_px: f64,
    pub max_zoom: f64,
    pub duration_ms: u32,
}

#[derive(Debug, Clone)]
pub struct CameraController<F = MercatorFit> {
    fit: F,
    bounds: ViewBounds,
    initial: ViewPose,
    pose: ViewPose,
    phase: CameraPhase,
    now: Time,
    revision: u64,
}

impl CameraController<MercatorFit> {
    /// São Paulo bounds, the fixed initial pose and Web Mercator fitting.
    pub fn with_defaults() -> Self {
        Self::new(SAO_PAULO_BOUNDS, INITIAL_POSE, MercatorFit)
    }
}

impl Default for CameraController<MercatorFit> {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl<F: ViewportFit> CameraController<F> {
    pub fn new(bounds: ViewBounds, initial: ViewPose, fit: F) -> Self {
        let initial = initial.without_transition().clamped(&bounds);
        Self {
            fit,
            bounds,
            initial,
            pose: initial,
            phase: CameraPhase::Static,
            now: Time::ZERO,
            revision: 0,
        }
    }

    pub fn pose(&self) -> ViewPose {
        self.pose
    }

    pub fn phase(&self) -> CameraPhase {
        self.phase
    }

    pub fn bounds(&self) -> &ViewBounds {
        &self.bounds
    }

    pub fn is_transitioning(&self) -> bool {
        matches!(self.phase, CameraPhase::Transitioning { .. })
    }

    /// Bumped whenever the pose is replaced.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Handles a user pan/zoom/rotate.
    ///
    /// Longitude, latitude and zoom are clamped; pitch and bearing pass
    /// through. A move that clamps to the current view is dropped, unless a
    /// transition is in flight: then the update is always emitted so the
    /// transition markers get cleared.
    pub fn apply_user_move(&mut self, raw: ViewPose) -> PoseUpdate {
        let next = raw.without_transition().clamped(&self.bounds);
        if !self.is_transitioning() && next.same_view(&self.pose) {
            return PoseUpdate::Unchanged;
        }
        self.phase = CameraPhase::Static;
        self.replace(next);
        PoseUpdate::Changed(next)
    }

    /// Starts a flight that frames `req.bounds`.
    ///
    /// Returns `None` (pose untouched) for a degenerate box or when the fit
    /// service finds no framing. The target is not clamped to the view bounds;
    /// only the zoom is capped at `req.max_zoom`.
    pub fn fly_to(&mut self, req: FlyTo) -> Option<ViewPose> {
        if req.bounds.is_degenerate() {
            debug!(bounds = ?req.bounds, "fly-to skipped: degenerate bounds");
            return None;
        }
        let fitted = self
            .fit
            .fit_bounds(req.viewport, &req.bounds, req.padding_px)?;

        let target = ViewPose {
            longitude: fitted.center.lon,
            latitude: fitted.center.lat,
            zoom: fitted.zoom.min(req.max_zoom),
            ..self.pose
        }
        .with_fly_to(req.duration_ms);

        debug!(
            lon = target.longitude,
            lat = target.latitude,
            zoom = target.zoom,
            duration_ms = req.duration_ms,
            "fly-to started"
        );
        self.begin_transition(target);
        Some(target)
    }

    /// Flies back to the initial pose.
    pub fn reset_to_initial(&mut self, duration_ms: u32) -> ViewPose {
        let target = self.initial.with_fly_to(duration_ms);
        self.begin_transition(target);
        target
    }

    /// Moves the controller's notion of "now"; settles a transition whose
    /// span has elapsed and returns the settled pose.
    pub fn advance(&mut self, now: Time) -> Option<ViewPose> {
        if now.0 > self.now.0 {
            self.now = now;
        }
        match self.phase {
            CameraPhase::Transitioning { span } if span.is_elapsed(self.now) => {
                Some(self.settle())
            }
            _ => None,
        }
    }

    /// Transition completion reported by the renderer.
    pub fn complete_transition(&mut self) -> Option<ViewPose> {
        if self.is_transitioning() {
            Some(self.settle())
        } else {
            None
        }
    }

    /// Pitch slider input, clamped to [`PITCH_RANGE`].
    pub fn set_pitch(&mut self, pitch: f64) -> PoseUpdate {
        let pitch = pitch.clamp(PITCH_RANGE.0, PITCH_RANGE.1);
        if pitch == self.pose.pitch {
            return PoseUpdate::Unchanged;
        }
        let next = ViewPose { pitch, ..self.pose };
        self.replace(next);
        PoseUpdate::Changed(next)
    }

    /// Bearing slider input, clamped to [`BEARING_RANGE`].
    pub fn set_bearing(&mut self, bearing: f64) -> PoseUpdate {
        let bearing = bearing.clamp(BEARING_RANGE.0, BEARING_RANGE.1);
        if bearing == self.pose.bearing {
            return PoseUpdate::Unchanged;
        }
        let next = ViewPose {
            bearing,
            ..self.pose
        };
        self.replace(next);
        PoseUpdate::Changed(next)
    }

    fn begin_transition(&mut self, target: ViewPose) {
        self.phase = CameraPhase::Transitioning {
            span: TimeSpan::starting_at(self.now, target.transition_duration_ms),
        };
        self.replace(target);
    }

    fn settle(&mut self) -> ViewPose {
        let settled = self.pose.without_transition().clamped(&self.bounds);
        self.phase = CameraPhase::Static;
        self.replace(settled);
        debug!(
            lon = settled.longitude,
            lat = settled.latitude,
            zoom = settled.zoom,
            "camera transition settled"
        );
        settled
    }

    fn replace(&mut self, pose: ViewPose) {
        self.pose = pose;
        self.revision += 1;
    }
}
