use egui::{Pos2, Rect, Vec2};
use mapscreen::{LatLng, Region};

/// Smallest span a region may shrink to, in degrees
const MIN_SPAN: f64 = 1e-4;

/// Equirectangular mapping of a region onto a screen rectangle
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    region: Region,
    rect: Rect,
}

impl Projection {
    pub fn new(region: Region, rect: Rect) -> Self {
        Self { region, rect }
    }

    fn degrees_per_pixel(&self) -> (f64, f64) {
        let width = self.rect.width().max(1.0) as f64;
        let height = self.rect.height().max(1.0) as f64;
        (
            self.region.span.lat.max(MIN_SPAN) / height,
            self.region.span.lng.max(MIN_SPAN) / width,
        )
    }

    pub fn to_screen(&self, coordinate: LatLng) -> Pos2 {
        let (lat_scale, lng_scale) = self.degrees_per_pixel();
        let center = self.rect.center();
        Pos2::new(
            center.x + ((coordinate.lng - self.region.center.lng) / lng_scale) as f32,
            center.y - ((coordinate.lat - self.region.center.lat) / lat_scale) as f32,
        )
    }

    pub fn to_geo(&self, pos: Pos2) -> LatLng {
        let (lat_scale, lng_scale) = self.degrees_per_pixel();
        let center = self.rect.center();
        LatLng::new(
            self.region.center.lat - (pos.y - center.y) as f64 * lat_scale,
            self.region.center.lng + (pos.x - center.x) as f64 * lng_scale,
        )
    }

    /// Region after dragging the map by `delta` pixels
    pub fn panned(&self, delta: Vec2) -> Region {
        let (lat_scale, lng_scale) = self.degrees_per_pixel();
        let center = LatLng::new(
            (self.region.center.lat + delta.y as f64 * lat_scale).clamp(-85.0, 85.0),
            self.region.center.lng - delta.x as f64 * lng_scale,
        );
        Region::new(center, self.region.span)
    }

    /// Region after zooming by `factor` (> 1 zooms out)
    pub fn zoomed(&self, factor: f64) -> Region {
        let span = LatLng::new(
            (self.region.span.lat * factor).clamp(MIN_SPAN, 170.0),
            (self.region.span.lng * factor).clamp(MIN_SPAN, 360.0),
        );
        Region::new(self.region.center, span)
    }
}
