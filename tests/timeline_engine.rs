use std::sync::{Arc, Mutex};
use std::time::Duration;

use approx::assert_relative_eq;
use image::{DynamicImage, Rgb, RgbImage};

use scrubline::timeline::{DragUpdate, TouchPhase, TouchPoint};
use scrubline::{
    CapturePolicy, DragMode, Error, PlaybackHandle, PointerEvent, Result, TimelineConfig,
    TimelineEngine, TouchEvent, Uploader, VideoResource, VideoSurface,
};

#[derive(Debug, Default)]
struct Player {
    time: f64,
}

impl PlaybackHandle for Player {
    fn current_time(&self) -> f64 {
        self.time
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.time = seconds;
    }
}

/// Capture handle whose frames get brighter with time.
struct Clip {
    duration: f64,
    position: f64,
    delay: Duration,
}

impl Clip {
    fn new(duration: f64) -> Self {
        Self {
            duration,
            position: 0.0,
            delay: Duration::from_millis(1),
        }
    }
}

impl VideoSurface for Clip {
    fn duration(&self) -> Option<f64> {
        Some(self.duration)
    }

    async fn seek(&mut self, seconds: f64) -> Result<()> {
        tokio::time::sleep(self.delay).await;
        self.position = seconds;
        Ok(())
    }

    fn rasterize(&mut self) -> Result<DynamicImage> {
        let level = (self.position / self.duration * 255.0) as u8;
        Ok(DynamicImage::ImageRgb8(RgbImage::from_pixel(
            240,
            135,
            Rgb([level, level, level]),
        )))
    }
}

struct BrokenUploader(Arc<Mutex<usize>>);

impl Uploader for BrokenUploader {
    fn upload(&self, _name: &str, _bytes: Arc<[u8]>) -> anyhow::Result<()> {
        *self.0.lock().unwrap() += 1;
        anyhow::bail!("storage offline")
    }
}

fn loaded(duration: f64, config: TimelineConfig) -> TimelineEngine<Player, Clip> {
    let mut engine = TimelineEngine::new(Player::default(), config);
    engine.accept_video_resource(VideoResource::new("clip.mp4").with_capture_handle(Clip::new(duration)));
    engine
}

fn times(engine: &TimelineEngine<Player, Clip>) -> Vec<f64> {
    engine
        .snapshot()
        .thumbnails
        .iter()
        .map(|thumbnail| thumbnail.time())
        .collect()
}

#[tokio::test]
async fn ten_second_video_scenario() {
    let mut engine = loaded(10.0, TimelineConfig::default());
    engine.set_track_layout(0.0, 500.0);

    let report = engine.discover_duration().unwrap().run().await;

    assert_eq!(report.captured, 50);
    let captured = times(&engine);
    assert_eq!(captured.len(), 50);
    for (i, time) in captured.iter().enumerate() {
        assert_relative_eq!(*time, 10.0 * i as f64 / 49.0, epsilon = 1e-12);
    }

    // left handle from 0px to t=3
    engine.pointer(PointerEvent::Down { x: 0.0 });
    assert_eq!(engine.drag_mode(), DragMode::DraggingTrimStart);
    engine.pointer(PointerEvent::Move { x: 150.0 });
    engine.pointer(PointerEvent::Up);
    assert_relative_eq!(engine.trim_range().unwrap().start_seconds(), 3.0, epsilon = 1e-9);

    // right handle in to t=5
    engine.pointer(PointerEvent::Down { x: 500.0 });
    assert_eq!(engine.drag_mode(), DragMode::DraggingTrimEnd);
    engine.pointer(PointerEvent::Move { x: 250.0 });
    engine.pointer(PointerEvent::Up);
    assert_relative_eq!(engine.trim_range().unwrap().end_seconds(), 5.0, epsilon = 1e-9);

    // left handle dragged past the right one stops just short of it
    engine.pointer(PointerEvent::Down { x: 150.0 });
    engine.pointer(PointerEvent::Move { x: 420.0 });
    engine.pointer(PointerEvent::Up);

    let trim = engine.trim_range().unwrap();
    assert!(trim.start_seconds() < 5.0);
    assert_relative_eq!(trim.start_seconds(), 5.0, epsilon = 0.01);
    assert_eq!(trim.end_seconds(), 5.0);
    assert_eq!(engine.drag_mode(), DragMode::Idle);
}

#[test]
fn playback_loops_inside_trim() {
    let mut engine = loaded(10.0, TimelineConfig::default());
    engine.on_duration_discovered(10.0).unwrap();
    engine.set_track_layout(0.0, 500.0);

    // trim to {2, 5}
    engine.pointer(PointerEvent::Down { x: 500.0 });
    engine.pointer(PointerEvent::Move { x: 250.0 });
    engine.pointer(PointerEvent::Up);
    engine.pointer(PointerEvent::Down { x: 0.0 });
    engine.pointer(PointerEvent::Move { x: 100.0 });
    engine.pointer(PointerEvent::Up);
    engine.on_play();

    engine.player_mut().time = 4.5;
    engine.on_time_update();
    assert_eq!(engine.player().time, 4.5);

    engine.player_mut().time = 5.2;
    let outcome = engine.on_time_update();

    assert_relative_eq!(outcome.seek_to.unwrap(), 2.0, epsilon = 1e-9);
    assert_relative_eq!(engine.player().time, 2.0, epsilon = 1e-9);
    assert_relative_eq!(engine.slider_position(), 100.0, epsilon = 1e-6);
    assert_eq!(engine.snapshot().time_label, "00:02");
}

#[test]
fn dragging_playhead_wins_over_native_progress() {
    let mut engine = loaded(60.0, TimelineConfig::default());
    engine.on_duration_discovered(60.0).unwrap();
    engine.set_track_layout(20.0, 600.0);

    engine.pointer(PointerEvent::Down { x: 320.0 });
    assert_eq!(engine.player().time, 30.0);

    // the video keeps reporting its own progress mid-drag
    engine.player_mut().time = 31.0;
    engine.on_time_update();
    assert_eq!(engine.slider_position(), 300.0);
    assert_eq!(engine.snapshot().time_label, "00:30");

    let update = engine.pointer(PointerEvent::Move { x: 470.0 });
    assert_eq!(
        update,
        Some(DragUpdate::Seek {
            time: 45.0,
            pixels: 450.0
        })
    );
    engine.pointer(PointerEvent::Leave);

    engine.player_mut().time = 46.0;
    engine.on_time_update();
    assert_relative_eq!(engine.slider_position(), 460.0);
}

#[test]
fn touch_drives_the_same_machine() {
    let mut engine = loaded(10.0, TimelineConfig::default());
    engine.on_duration_discovered(10.0).unwrap();
    engine.set_track_layout(0.0, 500.0);
    let touch = |x| TouchPoint { id: 1, x, y: 12.0 };

    engine.touch(&TouchEvent::new(TouchPhase::Start, vec![touch(498.0)]));
    assert_eq!(engine.drag_mode(), DragMode::DraggingTrimEnd);

    engine.touch(&TouchEvent::new(TouchPhase::Move, vec![touch(400.0)]));
    engine.touch(&TouchEvent::new(TouchPhase::End, vec![]));

    assert_eq!(engine.drag_mode(), DragMode::Idle);
    assert_relative_eq!(engine.trim_range().unwrap().end_seconds(), 8.0);
    assert_eq!(engine.snapshot().trim_handles, Some((0.0, 400.0)));
}

#[tokio::test(start_paused = true)]
async fn concurrent_capture_stays_ordered() {
    let config = TimelineConfig::default()
        .with_thumbnail_count(9)
        .with_capture_policy(CapturePolicy::Concurrent);
    let mut engine = TimelineEngine::new(Player::default(), config);

    let mut slow = Clip::new(8.0);
    slow.delay = Duration::from_millis(50);
    engine.accept_video_resource(
        VideoResource::new("clip.mp4")
            .with_capture_handle(slow)
            .with_capture_handle(Clip::new(8.0))
            .with_capture_handle(Clip::new(8.0)),
    );

    let report = engine.discover_duration().unwrap().run().await;

    assert_eq!(report.captured, 9);
    assert_eq!(times(&engine), (0..9).map(f64::from).collect::<Vec<_>>());
}

#[tokio::test]
async fn replaced_video_discards_old_captures() {
    let config = TimelineConfig::default().with_thumbnail_count(6);
    let mut engine = loaded(5.0, config);
    engine.set_track_layout(0.0, 500.0);
    let old_job = engine.discover_duration().unwrap();

    engine.accept_video_resource(VideoResource::new("next.mp4").with_capture_handle(Clip::new(20.0)));
    let new_job = engine.discover_duration().unwrap();

    let (old_report, new_report) = tokio::join!(old_job.run(), new_job.run());

    assert!(old_report.stale);
    assert_eq!(new_report.captured, 6);
    assert_eq!(times(&engine), vec![0.0, 4.0, 8.0, 12.0, 16.0, 20.0]);
    assert_eq!(engine.trim_range().unwrap().end_seconds(), 20.0);
}

#[test]
fn rediscovering_duration_is_a_caller_error() {
    let mut engine = loaded(5.0, TimelineConfig::default());

    assert!(engine.on_duration_discovered(5.0).is_ok());
    assert!(matches!(
        engine.discover_duration(),
        Err(Error::CaptureAlreadyStarted)
    ));
    assert!(matches!(
        engine.on_duration_discovered(5.0),
        Err(Error::CaptureAlreadyStarted)
    ));
}

#[test]
fn upload_failure_does_not_reach_the_timeline() {
    let attempts = Arc::new(Mutex::new(0));
    let mut engine = TimelineEngine::new(Player::default(), TimelineConfig::default())
        .with_uploader(BrokenUploader(attempts.clone()));

    engine.accept_video_resource(
        VideoResource::new("clip.mp4")
            .with_bytes(vec![1u8, 2, 3])
            .with_capture_handle(Clip::new(4.0)),
    );

    assert_eq!(*attempts.lock().unwrap(), 1);
    assert!(engine.on_duration_discovered(4.0).is_ok());
    assert!(engine.tag().is_some());
}
