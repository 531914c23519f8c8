use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::TimelineConfig;
use crate::error::{Error, Result};
use crate::timeline::{
    time_display_text, DragMode, DragStateMachine, DragUpdate, PlaybackState, PlaybackSync,
    PointerEvent, ProgressOutcome, TimelineGeometry, TimelineSnapshot, TouchEvent, TrimRange,
};
use crate::video::{
    FrameCapture, PlaybackHandle, ResourceTag, ResourceTracker, Thumbnail, ThumbnailJob,
    ThumbnailSequencer, Uploader, VideoSurface,
};

pub struct VideoResource<S> {
    name: String,
    bytes: Option<Arc<[u8]>>,
    capture_handles: Vec<S>,
}

impl<S> VideoResource<S> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bytes: None,
            capture_handles: Vec::new(),
        }
    }

    pub fn with_bytes(mut self, bytes: impl Into<Arc<[u8]>>) -> Self {
        self.bytes = Some(bytes.into());
        self
    }

    pub fn with_capture_handle(mut self, handle: S) -> Self {
        self.capture_handles.push(handle);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Ties the timeline to one playing video at a time.
pub struct TimelineEngine<P, S> {
    config: TimelineConfig,
    player: P,
    tracker: ResourceTracker,
    tag: Option<ResourceTag>,
    pending_handles: Vec<S>,
    sequencer: ThumbnailSequencer,
    thumbnails: watch::Receiver<Vec<Thumbnail>>,
    duration: Option<f64>,
    track_left: f64,
    track_width: f64,
    slider_position: f64,
    trim: Option<TrimRange>,
    drag: DragStateMachine,
    sync: PlaybackSync,
    uploader: Option<Box<dyn Uploader>>,
}

impl<P: PlaybackHandle, S: VideoSurface> TimelineEngine<P, S> {
    pub fn new(player: P, config: TimelineConfig) -> Self {
        let sequencer = ThumbnailSequencer::new();
        let thumbnails = sequencer.thumbnails();

        Self {
            drag: DragStateMachine::new(config.hit_radius),
            config,
            player,
            tracker: ResourceTracker::new(),
            tag: None,
            pending_handles: Vec::new(),
            sequencer,
            thumbnails,
            duration: None,
            track_left: 0.0,
            track_width: 0.0,
            slider_position: 0.0,
            trim: None,
            sync: PlaybackSync::new(),
            uploader: None,
        }
    }

    pub fn with_uploader(mut self, uploader: impl Uploader + 'static) -> Self {
        self.uploader = Some(Box::new(uploader));
        self
    }

    /// Replaces whatever video was loaded before.
    pub fn accept_video_resource(&mut self, resource: VideoResource<S>) {
        let tag = self.tracker.advance();
        info!(
            name = %resource.name,
            tag = tag.id(),
            handles = resource.capture_handles.len(),
            "accepted video resource"
        );

        self.tag = Some(tag);
        self.pending_handles = resource.capture_handles;
        self.sequencer = ThumbnailSequencer::new();
        self.thumbnails = self.sequencer.thumbnails();
        self.duration = None;
        self.trim = None;
        self.slider_position = 0.0;
        self.drag.reset();
        self.sync.reset();

        if let (Some(uploader), Some(bytes)) = (&self.uploader, resource.bytes) {
            if let Err(err) = uploader.upload(&resource.name, bytes) {
                warn!(name = %resource.name, "upload failed: {err:#}");
            }
        }
    }

    pub fn discover_duration(&mut self) -> Result<ThumbnailJob<S>> {
        if self.sequencer.is_started() {
            return Err(Error::CaptureAlreadyStarted);
        }
        let duration = self
            .pending_handles
            .first()
            .and_then(VideoSurface::duration)
            .ok_or_else(|| Error::ResourceUnavailable("duration not known yet".into()))?;

        self.on_duration_discovered(duration)
    }

    /// Only the first usable duration per resource starts capture.
    pub fn on_duration_discovered(&mut self, duration_seconds: f64) -> Result<ThumbnailJob<S>> {
        if self.sequencer.is_started() {
            return Err(Error::CaptureAlreadyStarted);
        }
        let trim = TrimRange::new(duration_seconds, self.config.min_trim_seconds)?;

        let captures = std::mem::take(&mut self.pending_handles)
            .into_iter()
            .map(|handle| FrameCapture::new(handle, self.tracker.clone(), &self.config))
            .collect();
        let job = self
            .sequencer
            .start(captures, duration_seconds, &self.config)?;

        self.duration = Some(duration_seconds);
        self.trim = self.config.trim_enabled.then_some(trim);
        self.slider_position = 0.0;
        debug!(duration = duration_seconds, "timeline ready");

        Ok(job)
    }

    pub fn set_track_layout(&mut self, left: f64, width_pixels: f64) {
        self.track_left = left;
        self.track_width = width_pixels;

        match self.geometry() {
            Ok(geometry) => {
                self.slider_position = geometry.to_pixels(self.sync.state().current_time_seconds)
            }
            Err(err) => debug!(%err, "slider left in place"),
        }
    }

    pub fn geometry(&self) -> Result<TimelineGeometry> {
        TimelineGeometry::new(self.track_width, self.duration.unwrap_or(f64::NAN))
    }

    pub fn pointer(&mut self, event: PointerEvent) -> Option<DragUpdate> {
        let event = match event {
            PointerEvent::Down { x } => PointerEvent::Down {
                x: x - self.track_left,
            },
            PointerEvent::Move { x } => PointerEvent::Move {
                x: x - self.track_left,
            },
            other => other,
        };

        let geometry = self.geometry();
        let result = self.drag.pointer(event, geometry, self.trim.as_mut());
        self.sync.set_drag_mode(self.drag.mode());

        match result {
            Ok(Some(update)) => {
                if let DragUpdate::Seek { time, pixels } = update {
                    self.seek(time, Some(pixels));
                }
                Some(update)
            }
            Ok(None) => None,
            Err(err) => {
                debug!(%err, ?event, "pointer event skipped");
                None
            }
        }
    }

    pub fn touch(&mut self, event: &TouchEvent) -> Option<DragUpdate> {
        event.to_pointer().and_then(|pointer| self.pointer(pointer))
    }

    pub fn on_time_update(&mut self) -> ProgressOutcome {
        let outcome = self
            .sync
            .on_progress(self.player.current_time(), self.trim.as_ref());

        if let Some(start) = outcome.seek_to {
            debug!(start, "looping back to trim start");
            self.player.set_current_time(start);
        }

        if let Some(time) = outcome.display_time {
            match self.geometry() {
                Ok(geometry) => self.slider_position = geometry.to_pixels(time),
                Err(err) => debug!(%err, time, "slider left in place"),
            }
        }

        outcome
    }

    pub fn on_play(&mut self) {
        self.sync.set_playing(true);
    }

    pub fn on_pause(&mut self) {
        self.sync.set_playing(false);
    }

    pub fn seek_to_thumbnail(&mut self, index: usize) -> Option<f64> {
        let time = self.thumbnails.borrow().get(index).map(Thumbnail::time)?;
        let pixels = self.geometry().ok().map(|geometry| geometry.to_pixels(time));

        self.seek(time, pixels);
        Some(time)
    }

    fn seek(&mut self, time: f64, pixels: Option<f64>) {
        if let Some(pixels) = pixels {
            self.slider_position = pixels;
        }
        self.sync.on_user_seek(time);
        self.player.set_current_time(time);
    }

    pub fn snapshot(&self) -> TimelineSnapshot {
        let state = self.sync.state();
        let trim_handles = match (self.trim, self.geometry()) {
            (Some(trim), Ok(geometry)) => Some((
                geometry.to_pixels(trim.start_seconds()),
                geometry.to_pixels(trim.end_seconds()),
            )),
            _ => None,
        };

        TimelineSnapshot {
            thumbnails: self.thumbnails.borrow().clone(),
            slider_position: self.slider_position,
            trim_handles,
            time_label: time_display_text(state.current_time_seconds),
            drag_mode: self.drag.mode(),
            is_playing: state.is_playing,
            width_pixels: self.track_width,
            opacity_falloff: self.config.opacity_falloff,
            min_opacity: self.config.min_opacity,
        }
    }

    pub fn thumbnails(&self) -> watch::Receiver<Vec<Thumbnail>> {
        self.thumbnails.clone()
    }

    pub fn trim_range(&self) -> Option<TrimRange> {
        self.trim
    }

    pub fn drag_mode(&self) -> DragMode {
        self.drag.mode()
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.sync.state()
    }

    pub fn slider_position(&self) -> f64 {
        self.slider_position
    }

    pub fn duration(&self) -> Option<f64> {
        self.duration
    }

    pub fn tag(&self) -> Option<ResourceTag> {
        self.tag
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut P {
        &mut self.player
    }
}
