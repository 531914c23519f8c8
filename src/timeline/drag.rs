use tracing::debug;

use crate::error::Result;
use crate::timeline::geometry::TimelineGeometry;
use crate::timeline::trim::TrimRange;

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum DragMode {
    #[default]
    Idle,
    DraggingPlayhead,
    DraggingTrimStart,
    DraggingTrimEnd,
}

impl DragMode {
    pub fn is_idle(&self) -> bool {
        matches!(self, DragMode::Idle)
    }

    pub fn is_playhead(&self) -> bool {
        matches!(self, DragMode::DraggingPlayhead)
    }

    pub fn is_active(&self) -> bool {
        !self.is_idle()
    }
}

/// Pointer input in track-local pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PointerEvent {
    Down { x: f64 },
    Move { x: f64 },
    Up,
    Leave,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum TouchPhase {
    Start,
    Move,
    End,
    Cancel,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TouchPoint {
    pub id: i64,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TouchEvent {
    pub phase: TouchPhase,
    pub touches: Vec<TouchPoint>,
}

impl TouchEvent {
    pub fn new(phase: TouchPhase, touches: Vec<TouchPoint>) -> Self {
        Self { phase, touches }
    }

    pub fn primary(&self) -> Option<&TouchPoint> {
        self.touches.first()
    }

    /// Start and move without any touch point carry no position and are dropped.
    pub fn to_pointer(&self) -> Option<PointerEvent> {
        match self.phase {
            TouchPhase::Start => self.primary().map(|touch| PointerEvent::Down { x: touch.x }),
            TouchPhase::Move => self.primary().map(|touch| PointerEvent::Move { x: touch.x }),
            TouchPhase::End => Some(PointerEvent::Up),
            TouchPhase::Cancel => Some(PointerEvent::Leave),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum DragUpdate {
    Seek { time: f64, pixels: f64 },
    TrimStart { time: f64 },
    TrimEnd { time: f64 },
}

/// Trim handles win when within `radius` pixels, the nearest one when both
/// qualify. On an exact tie the side the pointer sits on decides: right of
/// the handles picks the end handle. Anything else grabs the playhead.
pub fn hit_test(
    x: f64,
    geometry: &TimelineGeometry,
    trim: Option<&TrimRange>,
    radius: f64,
) -> DragMode {
    let Some(trim) = trim else {
        return DragMode::DraggingPlayhead;
    };

    let start_px = geometry.to_pixels(trim.start_seconds());
    let end_px = geometry.to_pixels(trim.end_seconds());
    let start_distance = (x - start_px).abs();
    let end_distance = (x - end_px).abs();

    let start_hit = start_distance <= radius;
    let end_hit = end_distance <= radius;

    match (start_hit, end_hit) {
        (true, true) => {
            if start_distance < end_distance {
                DragMode::DraggingTrimStart
            } else if end_distance < start_distance {
                DragMode::DraggingTrimEnd
            } else if x > start_px {
                DragMode::DraggingTrimEnd
            } else {
                DragMode::DraggingTrimStart
            }
        }
        (true, false) => DragMode::DraggingTrimStart,
        (false, true) => DragMode::DraggingTrimEnd,
        (false, false) => DragMode::DraggingPlayhead,
    }
}

#[derive(Debug, Clone)]
pub struct DragStateMachine {
    mode: DragMode,
    hit_radius: f64,
    prev_target: Option<f64>,
}

impl DragStateMachine {
    pub fn new(hit_radius: f64) -> Self {
        Self {
            mode: DragMode::Idle,
            hit_radius,
            prev_target: None,
        }
    }

    pub fn mode(&self) -> DragMode {
        self.mode
    }

    pub fn reset(&mut self) {
        self.mode = DragMode::Idle;
        self.prev_target = None;
    }

    pub fn pointer(
        &mut self,
        event: PointerEvent,
        geometry: Result<TimelineGeometry>,
        trim: Option<&mut TrimRange>,
    ) -> Result<Option<DragUpdate>> {
        match event {
            PointerEvent::Down { x } => {
                let geometry = geometry?;
                let mode = hit_test(x, &geometry, trim.as_deref(), self.hit_radius);
                debug!(?mode, x, "drag begin");

                self.mode = mode;
                self.prev_target = None;

                // click-to-seek only applies to the playhead; grabbing a handle doesn't move it
                if mode.is_playhead() {
                    return Ok(self.drag_update(x, &geometry, trim));
                }
                Ok(None)
            }
            PointerEvent::Move { x } => {
                if self.mode.is_idle() {
                    return Ok(None);
                }
                let geometry = geometry?;
                Ok(self.drag_update(x, &geometry, trim))
            }
            PointerEvent::Up | PointerEvent::Leave => {
                if self.mode.is_active() {
                    debug!(mode = ?self.mode, "drag end");
                }
                self.reset();
                Ok(None)
            }
        }
    }

    fn drag_update(
        &mut self,
        x: f64,
        geometry: &TimelineGeometry,
        trim: Option<&mut TrimRange>,
    ) -> Option<DragUpdate> {
        if self.prev_target == Some(x) {
            return None;
        }
        self.prev_target = Some(x);

        let time = geometry.to_time(x);

        match self.mode {
            DragMode::Idle => None,
            DragMode::DraggingPlayhead => Some(DragUpdate::Seek {
                time,
                pixels: geometry.to_pixels(time),
            }),
            DragMode::DraggingTrimStart => trim.map(|trim| DragUpdate::TrimStart {
                time: trim.set_start(time),
            }),
            DragMode::DraggingTrimEnd => trim.map(|trim| DragUpdate::TrimEnd {
                time: trim.set_end(time),
            }),
        }
    }
}
