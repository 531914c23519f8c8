pub mod config;
pub mod engine;
pub mod error;
pub mod range;
pub mod timeline;
pub mod video;

pub use config::{CapturePolicy, TimelineConfig};
pub use engine::{TimelineEngine, VideoResource};
pub use error::{Error, Result};
pub use timeline::{DragMode, PointerEvent, TimelineSnapshot, TouchEvent, TrimRange};
pub use video::{PlaybackHandle, Thumbnail, Uploader, VideoSurface};
