use std::time::Duration;

pub static NUM_THUMBNAILS: usize = 50;
pub static THUMBNAIL_WIDTH: u32 = 160;
pub static THUMBNAIL_HEIGHT: u32 = 90;
pub static JPEG_QUALITY: u8 = 80;
pub static HANDLE_HIT_RADIUS: f64 = 10.0;
pub static CAPTURE_TIMEOUT: Duration = Duration::from_secs(5);
pub static MIN_TRIM_SECONDS: f64 = 0.001;
pub static OPACITY_FALLOFF: f64 = 3.0;
pub static MIN_OPACITY: f64 = 0.1;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CapturePolicy {
    /// One handle, one capture at a time, results land in plan order.
    #[default]
    Sequential,
    /// Plan is split across every handle given; results are ordered by time on insert.
    Concurrent,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TimelineConfig {
    pub thumbnail_count: usize,
    pub thumbnail_width: u32,
    pub thumbnail_height: u32,
    pub jpeg_quality: u8,
    pub hit_radius: f64,
    pub capture_timeout: Duration,
    pub capture_policy: CapturePolicy,
    pub trim_enabled: bool,
    pub min_trim_seconds: f64,
    pub opacity_falloff: f64,
    pub min_opacity: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            thumbnail_count: NUM_THUMBNAILS,
            thumbnail_width: THUMBNAIL_WIDTH,
            thumbnail_height: THUMBNAIL_HEIGHT,
            jpeg_quality: JPEG_QUALITY,
            hit_radius: HANDLE_HIT_RADIUS,
            capture_timeout: CAPTURE_TIMEOUT,
            capture_policy: CapturePolicy::default(),
            trim_enabled: true,
            min_trim_seconds: MIN_TRIM_SECONDS,
            opacity_falloff: OPACITY_FALLOFF,
            min_opacity: MIN_OPACITY,
        }
    }
}

impl TimelineConfig {
    pub fn with_thumbnail_count(mut self, count: usize) -> Self {
        self.thumbnail_count = count;
        self
    }

    pub fn with_thumbnail_size(mut self, width: u32, height: u32) -> Self {
        self.thumbnail_width = width;
        self.thumbnail_height = height;
        self
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality.clamp(1, 100);
        self
    }

    pub fn with_hit_radius(mut self, radius: f64) -> Self {
        self.hit_radius = radius;
        self
    }

    pub fn with_capture_timeout(mut self, timeout: Duration) -> Self {
        self.capture_timeout = timeout;
        self
    }

    pub fn with_capture_policy(mut self, policy: CapturePolicy) -> Self {
        self.capture_policy = policy;
        self
    }

    pub fn with_trim_enabled(mut self, enabled: bool) -> Self {
        self.trim_enabled = enabled;
        self
    }
}
