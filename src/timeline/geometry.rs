use crate::error::{Error, Result};
use crate::range::Range;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimelineGeometry {
    width_pixels: f64,
    duration_seconds: f64,
}

impl TimelineGeometry {
    pub fn new(width_pixels: f64, duration_seconds: f64) -> Result<Self> {
        let geometry = Self {
            width_pixels,
            duration_seconds,
        };

        if geometry.pixels().is_degenerate() || geometry.seconds().is_degenerate() {
            return Err(geometry.invalid());
        }

        Ok(geometry)
    }

    pub fn width_pixels(&self) -> f64 {
        self.width_pixels
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    fn pixels(&self) -> Range {
        Range::new(0.0, self.width_pixels)
    }

    fn seconds(&self) -> Range {
        Range::new(0.0, self.duration_seconds)
    }

    fn invalid(&self) -> Error {
        Error::InvalidGeometry {
            width: self.width_pixels,
            duration: self.duration_seconds,
        }
    }

    pub fn to_pixels(&self, time_seconds: f64) -> f64 {
        self.pixels()
            .map_value_from_range(self.seconds(), time_seconds)
    }

    /// `pixels` is clamped to the track before conversion, so the result is
    /// always within `[0, duration]`.
    pub fn to_time(&self, pixels: f64) -> f64 {
        let pixels = self.pixels().clamp(pixels);
        self.seconds().map_value_from_range(self.pixels(), pixels)
    }
}

pub fn to_pixels(time_seconds: f64, width_pixels: f64, duration_seconds: f64) -> Result<f64> {
    TimelineGeometry::new(width_pixels, duration_seconds).map(|g| g.to_pixels(time_seconds))
}

pub fn to_time(pixels: f64, width_pixels: f64, duration_seconds: f64) -> Result<f64> {
    TimelineGeometry::new(width_pixels, duration_seconds).map(|g| g.to_time(pixels))
}
