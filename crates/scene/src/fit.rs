use foundation::bounds::GeoBounds;
use foundation::geo::LonLat;
use foundation::math::mercator::{lon_lat_to_world, world_to_lon_lat};

/// Canvas size in CSS pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width_px: f64,
    pub height_px: f64,
}

impl Viewport {
    pub const fn new(width_px: f64, height_px: f64) -> Self {
        Self {
            width_px,
            height_px,
        }
    }
}

/// Camera center and zoom that frame a box.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FittedView {
    pub center: LonLat,
    pub zoom: f64,
}

/// Computes the camera that frames `bounds` inside `viewport` with a uniform
/// pixel margin. Returns `None` when no such camera exists (degenerate box or
/// padding that leaves no room).
pub trait ViewportFit {
    fn fit_bounds(&self, viewport: Viewport, bounds: &GeoBounds, padding_px: f64)
    -> Option<FittedView>;
}

/// Fit in Web Mercator world space (512 px world at zoom 0).
#[derive(Debug, Copy, Clone, Default)]
pub struct MercatorFit;

impl ViewportFit for MercatorFit {
    fn fit_bounds(
        &self,
        viewport: Viewport,
        bounds: &GeoBounds,
        padding_px: f64,
    ) -> Option<FittedView> {
        if bounds.is_degenerate() {
            return None;
        }

        let sw = lon_lat_to_world(LonLat::new(bounds.min_lon, bounds.min_lat));
        let ne = lon_lat_to_world(LonLat::new(bounds.max_lon, bounds.max_lat));
        let size = [(ne[0] - sw[0]).abs(), (ne[1] - sw[1]).abs()];

        let target_w = viewport.width_px - 2.0 * padding_px;
        let target_h = viewport.height_px - 2.0 * padding_px;
        if !(target_w > 0.0 && target_h > 0.0) {
            return None;
        }

        let scale = (target_w / size[0]).min(target_h / size[1]);
        let zoom = scale.log2();
        if !zoom.is_finite() {
            return None;
        }

        let center = world_to_lon_lat([0.5 * (sw[0] + ne[0]), 0.5 * (sw[1] + ne[1])]);
        Some(FittedView { center, zoom })
    }
}

#[cfg(test)]
mod tests {
    use foundation::bounds::GeoBounds;

    use super::{MercatorFit, Viewport, ViewportFit};

    #[test]
    fn frames_a_city_district() {
        let bounds = GeoBounds::new(-46.7, -46.6, -23.6, -23.5);
        let fit = MercatorFit
            .fit_bounds(Viewport::new(1024.0, 768.0), &bounds, 60.0)
            .unwrap();
        assert!(bounds.contains(fit.center));
        // Latitude is the limiting axis here: 0.1 degree over 648 px is just above zoom 12.
        assert!(fit.zoom > 12.0 && fit.zoom < 13.0, "zoom {}", fit.zoom);
    }

    #[test]
    fn more_padding_zooms_out() {
        let bounds = GeoBounds::new(-46.7, -46.6, -23.6, -23.5);
        let vp = Viewport::new(1024.0, 768.0);
        let tight = MercatorFit.fit_bounds(vp, &bounds, 0.0).unwrap();
        let loose = MercatorFit.fit_bounds(vp, &bounds, 200.0).unwrap();
        assert!(loose.zoom < tight.zoom);
    }

    #[test]
    fn degenerate_inputs_have_no_fit() {
        let vp = Viewport::new(1024.0, 768.0);
        let point = GeoBounds::new(-46.6, -46.6, -23.5, -23.5);
        assert!(MercatorFit.fit_bounds(vp, &point, 60.0).is_none());

        let bounds = GeoBounds::new(-46.7, -46.6, -23.6, -23.5);
        assert!(MercatorFit.fit_bounds(vp, &bounds, 400.0).is_none());
    }
}
