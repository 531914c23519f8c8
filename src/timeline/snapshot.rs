use crate::timeline::drag::DragMode;
use crate::video::thumbnail::Thumbnail;

/// `MM:SS`, zero padded. Minutes keep counting past the hour.
pub fn time_display_text(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    let minutes = total / 60;
    let seconds = total % 60;

    format!("{:0>2}:{:0>2}", minutes, seconds)
}

#[derive(Clone, Debug, PartialEq)]
pub struct TimelineSnapshot {
    pub thumbnails: Vec<Thumbnail>,
    pub slider_position: f64,
    /// `(start, end)` handle positions in pixels, present while trimming.
    pub trim_handles: Option<(f64, f64)>,
    pub time_label: String,
    pub drag_mode: DragMode,
    pub is_playing: bool,
    pub width_pixels: f64,
    pub opacity_falloff: f64,
    pub min_opacity: f64,
}

impl TimelineSnapshot {
    pub fn current_thumbnail_index(&self) -> Option<usize> {
        if self.thumbnails.is_empty() || self.width_pixels <= 0.0 {
            return None;
        }

        let slot = self.width_pixels / self.thumbnails.len() as f64;
        let index = (self.slider_position / slot).round().max(0.0) as usize;
        Some(index)
    }

    pub fn thumbnail_opacity(&self, index: usize) -> f64 {
        let Some(current) = self.current_thumbnail_index() else {
            return 1.0;
        };

        let distance = index.abs_diff(current) as f64;
        if distance == 0.0 {
            return 1.0;
        }
        if distance > self.opacity_falloff || self.opacity_falloff <= 0.0 {
            return self.min_opacity;
        }
        1.0 - (distance / self.opacity_falloff) * (1.0 - self.min_opacity)
    }

    pub fn thumbnail_slot(&self, index: usize) -> Option<(f64, f64)> {
        if index >= self.thumbnails.len() {
            return None;
        }

        let width = self.width_pixels / self.thumbnails.len() as f64;
        Some((width * index as f64, width))
    }
}
