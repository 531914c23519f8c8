use std::future::Future;
use std::sync::Arc;

use image::DynamicImage;

use crate::error::Result;

/// A capture-dedicated video handle, never the one the user watches.
pub trait VideoSurface {
    fn duration(&self) -> Option<f64>;

    /// Seeks to `seconds` and resolves once the handle reports the seek landed.
    fn seek(&mut self, seconds: f64) -> impl Future<Output = Result<()>>;

    fn rasterize(&mut self) -> Result<DynamicImage>;
}

pub trait PlaybackHandle {
    fn current_time(&self) -> f64;

    fn set_current_time(&mut self, seconds: f64);
}

/// Fire and forget: failures are logged by the caller and never reach the timeline.
pub trait Uploader {
    fn upload(&self, name: &str, bytes: Arc<[u8]>) -> anyhow::Result<()>;
}
