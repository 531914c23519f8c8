use crate::timeline::drag::DragMode;
use crate::timeline::trim::TrimRange;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlaybackState {
    pub current_time_seconds: f64,
    pub is_playing: bool,
    pub is_dragging: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ProgressOutcome {
    /// Native time crossed the trim end; playback must jump here.
    pub seek_to: Option<f64>,
    pub display_time: Option<f64>,
}

#[derive(Clone, Debug, Default)]
pub struct PlaybackSync {
    state: PlaybackState,
}

impl PlaybackSync {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn reset(&mut self) {
        self.state = PlaybackState {
            is_playing: self.state.is_playing,
            ..Default::default()
        };
    }

    pub fn set_playing(&mut self, is_playing: bool) {
        self.state.is_playing = is_playing;
    }

    pub fn set_drag_mode(&mut self, mode: DragMode) {
        self.state.is_dragging = mode.is_active();
    }

    /// The trim loop is enforced on every signal, dragging or not. The display
    /// only follows native time while no control is being dragged.
    pub fn on_progress(&mut self, native_time: f64, trim: Option<&TrimRange>) -> ProgressOutcome {
        if native_time.is_nan() {
            return ProgressOutcome::default();
        }

        let mut outcome = ProgressOutcome::default();
        let mut time = native_time;

        if let Some(trim) = trim {
            if time >= trim.end_seconds() {
                time = trim.start_seconds();
                outcome.seek_to = Some(time);
            }
        }

        if !self.state.is_dragging {
            self.state.current_time_seconds = time;
            outcome.display_time = Some(time);
        }

        outcome
    }

    pub fn on_user_seek(&mut self, time: f64) {
        self.state.current_time_seconds = time;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trim(start: f64, end: f64) -> TrimRange {
        let mut trim = TrimRange::new(10.0, 0.001).unwrap();
        trim.set_end(end);
        trim.set_start(start);
        trim
    }

    #[test]
    fn follows_native_time_when_idle() {
        let mut sync = PlaybackSync::new();

        let outcome = sync.on_progress(3.25, None);

        assert_eq!(outcome.display_time, Some(3.25));
        assert_eq!(outcome.seek_to, None);
        assert_eq!(sync.state().current_time_seconds, 3.25);
    }

    #[test]
    fn ignores_native_time_while_dragging() {
        let mut sync = PlaybackSync::new();
        sync.on_user_seek(7.0);
        sync.set_drag_mode(DragMode::DraggingPlayhead);

        let outcome = sync.on_progress(3.0, None);

        assert_eq!(outcome.display_time, None);
        assert_eq!(sync.state().current_time_seconds, 7.0);
        assert!(sync.state().is_dragging);

        sync.set_drag_mode(DragMode::Idle);
        assert!(!sync.state().is_dragging);
    }

    #[test]
    fn loops_back_to_trim_start() {
        let mut sync = PlaybackSync::new();
        let trim = trim(2.0, 5.0);

        assert_eq!(sync.on_progress(4.9, Some(&trim)).seek_to, None);

        let outcome = sync.on_progress(5.2, Some(&trim));
        assert_eq!(outcome.seek_to, Some(2.0));
        assert_eq!(outcome.display_time, Some(2.0));
        assert_eq!(sync.state().current_time_seconds, 2.0);

        // reaching the end exactly also wraps
        assert_eq!(sync.on_progress(5.0, Some(&trim)).seek_to, Some(2.0));
    }

    #[test]
    fn loop_enforced_while_dragging() {
        let mut sync = PlaybackSync::new();
        let trim = trim(2.0, 5.0);
        sync.set_drag_mode(DragMode::DraggingTrimEnd);

        let outcome = sync.on_progress(6.0, Some(&trim));

        assert_eq!(outcome.seek_to, Some(2.0));
        assert_eq!(outcome.display_time, None);
    }

    #[test]
    fn nan_time_is_ignored() {
        let mut sync = PlaybackSync::new();
        sync.on_user_seek(1.0);

        assert_eq!(sync.on_progress(f64::NAN, None), ProgressOutcome::default());
        assert_eq!(sync.state().current_time_seconds, 1.0);
    }
}
