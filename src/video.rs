#[cfg(feature = "gstreamer")]
pub mod gst_surface;
pub mod resource;
pub mod sequencer;
pub mod surface;
pub mod thumbnail;

#[cfg(feature = "gstreamer")]
pub use gst_surface::GstSurface;
pub use resource::{ResourceTag, ResourceTracker};
pub use sequencer::{plan_capture_times, CaptureReport, ThumbnailJob, ThumbnailSequencer};
pub use surface::{PlaybackHandle, Uploader, VideoSurface};
pub use thumbnail::{FrameCapture, Thumbnail};
