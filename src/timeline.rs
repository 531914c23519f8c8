pub mod drag;
pub mod geometry;
pub mod playback;
pub mod snapshot;
pub mod trim;

pub use drag::{DragMode, DragStateMachine, DragUpdate, PointerEvent, TouchEvent, TouchPhase, TouchPoint};
pub use geometry::TimelineGeometry;
pub use playback::{PlaybackState, PlaybackSync, ProgressOutcome};
pub use snapshot::{time_display_text, TimelineSnapshot};
pub use trim::TrimRange;
