use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;
use tokio::sync::Mutex;
use tracing::debug;

use crate::config::TimelineConfig;
use crate::error::{Error, Result};
use crate::video::resource::{ResourceTag, ResourceTracker};
use crate::video::surface::VideoSurface;

#[derive(Clone, Debug, PartialEq)]
pub struct Thumbnail {
    src: Arc<[u8]>,
    time: f64,
}

impl Thumbnail {
    pub fn new(src: Arc<[u8]>, time: f64) -> Self {
        Self { src, time }
    }

    /// JPEG bytes.
    pub fn src(&self) -> &[u8] {
        &self.src
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn data_url(&self) -> String {
        format!("data:image/jpeg;base64,{}", STANDARD.encode(&self.src))
    }
}

fn encode_thumbnail(frame: &DynamicImage, width: u32, height: u32, quality: u8) -> Result<Arc<[u8]>> {
    let scaled = frame.thumbnail_exact(width, height).to_rgb8();

    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality)
        .encode_image(&scaled)
        .map_err(|err| Error::RasterizeFailure(err.to_string()))?;

    Ok(Arc::from(bytes))
}

/// Turns seek targets into thumbnails on one capture handle.
///
/// Captures are one-in-flight: the handle stays locked from the seek until the
/// frame has been drawn, so concurrent callers queue up in arrival order and a
/// landed seek can only ever be attributed to the request that issued it.
pub struct FrameCapture<S> {
    surface: Mutex<S>,
    tag: ResourceTag,
    tracker: ResourceTracker,
    width: u32,
    height: u32,
    quality: u8,
    timeout: Duration,
}

impl<S: VideoSurface> FrameCapture<S> {
    pub fn new(surface: S, tracker: ResourceTracker, config: &TimelineConfig) -> Self {
        Self {
            surface: Mutex::new(surface),
            tag: tracker.current(),
            tracker,
            width: config.thumbnail_width.max(1),
            height: config.thumbnail_height.max(1),
            quality: config.jpeg_quality.clamp(1, 100),
            timeout: config.capture_timeout,
        }
    }

    pub fn tag(&self) -> ResourceTag {
        self.tag
    }

    pub async fn duration(&self) -> Option<f64> {
        self.surface.lock().await.duration()
    }

    fn ensure_current(&self) -> Result<()> {
        if self.tracker.is_current(self.tag) {
            Ok(())
        } else {
            Err(Error::StaleCompletion)
        }
    }

    pub async fn capture_frame(&self, time: f64) -> Result<Thumbnail> {
        let mut surface = self.surface.lock().await;
        self.ensure_current()?;

        match tokio::time::timeout(self.timeout, surface.seek(time)).await {
            Ok(landed) => landed?,
            Err(_) => return Err(Error::CaptureTimeout { time }),
        }

        if let Err(err) = self.ensure_current() {
            debug!(time, tag = self.tag.id(), "seek landed for superseded resource");
            return Err(err);
        }

        let frame = surface.rasterize()?;
        drop(surface);

        let src = encode_thumbnail(&frame, self.width, self.height, self.quality)?;
        Ok(Thumbnail::new(src, time))
    }
}
