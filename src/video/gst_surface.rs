use std::time::Duration;

use gst::prelude::*;
use gst::{ClockTime, MessageView, SeekFlags, State};
use gst_app::AppSink;
use gst_video::VideoFrameExt;
use image::{DynamicImage, GenericImageView, ImageBuffer, Rgb};
use tracing::debug;

use crate::error::{Error, Result};
use crate::video::surface::VideoSurface;

// a seek onto the very last instant prerolls nothing
static END_GUARD_SECONDS: f64 = 0.05;
static PREROLL_WAIT_SECONDS: u64 = 10;
static BUS_POLL_INTERVAL: Duration = Duration::from_millis(5);

fn unavailable(err: impl ToString) -> Error {
    Error::ResourceUnavailable(err.to_string())
}

fn raster(err: impl ToString) -> Error {
    Error::RasterizeFailure(err.to_string())
}

static SETTLED: [gst::MessageType; 2] = [gst::MessageType::AsyncDone, gst::MessageType::Error];

fn settled(msg: gst::Message) -> Result<()> {
    match msg.view() {
        MessageView::Error(err) => Err(unavailable(err.error())),
        _ => Ok(()),
    }
}

fn wait_for_preroll(bus: &gst::Bus) -> Result<()> {
    bus.timed_pop_filtered(ClockTime::from_seconds(PREROLL_WAIT_SECONDS), &SETTLED)
        .ok_or_else(|| unavailable("pipeline never settled"))
        .and_then(settled)
}

// stops consuming bus messages as soon as the future is dropped
async fn wait_for_async_done(bus: &gst::Bus) -> Result<()> {
    loop {
        if let Some(msg) = bus.pop_filtered(&SETTLED) {
            return settled(msg);
        }
        tokio::time::sleep(BUS_POLL_INTERVAL).await;
    }
}

/// Paused decode pipeline used purely for grabbing frames.
#[derive(Debug)]
pub struct GstSurface {
    pipeline: gst::Pipeline,
    appsink: AppSink,
    duration: Option<f64>,
}

impl GstSurface {
    /// Blocks until the first frame has prerolled.
    pub fn open(uri: &str) -> Result<Self> {
        Self::launch(&format!(
            "uridecodebin uri={uri} ! videoconvert ! appsink name=sink"
        ))
    }

    /// Any pipeline description ending in `appsink name=sink`.
    pub fn launch(description: &str) -> Result<Self> {
        gst::init().map_err(unavailable)?;

        let pipeline = gst::parse::launch(description)
            .map_err(unavailable)?
            .downcast::<gst::Pipeline>()
            .map_err(|_| unavailable("expected a gst pipeline"))?;

        let appsink = pipeline
            .by_name("sink")
            .ok_or_else(|| unavailable("sink element not found"))?
            .downcast::<AppSink>()
            .map_err(|_| unavailable("sink element is not an appsink"))?;

        appsink.set_property("sync", false);
        appsink.set_caps(Some(
            &gst_video::VideoCapsBuilder::new()
                .format(gst_video::VideoFormat::Rgbx)
                .build(),
        ));

        pipeline.set_state(State::Paused).map_err(unavailable)?;
        let bus = pipeline.bus().ok_or_else(|| unavailable("pipeline has no bus"))?;
        wait_for_preroll(&bus)?;

        let duration = pipeline
            .query_duration::<ClockTime>()
            .map(|duration| duration.nseconds() as f64 / 1e9);
        debug!(description, ?duration, "opened capture pipeline");

        Ok(Self {
            pipeline,
            appsink,
            duration,
        })
    }
}

impl VideoSurface for GstSurface {
    fn duration(&self) -> Option<f64> {
        self.duration
    }

    async fn seek(&mut self, seconds: f64) -> Result<()> {
        let seconds = match self.duration {
            Some(duration) => seconds.min((duration - END_GUARD_SECONDS).max(0.0)),
            None => seconds,
        };
        let timestamp =
            gst::GenericFormattedValue::from(ClockTime::from_nseconds((seconds.max(0.0) * 1e9) as u64));

        let bus = self
            .pipeline
            .bus()
            .ok_or_else(|| unavailable("pipeline has no bus"))?;

        // completions left over from a seek whose caller gave up
        while let Some(msg) = bus.pop_filtered(&SETTLED) {
            debug!(kind = ?msg.type_(), "dropped stale bus message");
        }

        self.pipeline
            .seek_simple(SeekFlags::FLUSH | SeekFlags::ACCURATE, timestamp)
            .map_err(unavailable)?;

        wait_for_async_done(&bus).await
    }

    fn rasterize(&mut self) -> Result<DynamicImage> {
        let sample = self.appsink.pull_preroll().map_err(raster)?;
        let buffer = sample.buffer().ok_or_else(|| raster("sample without buffer"))?;
        let caps = sample.caps().ok_or_else(|| raster("sample without caps"))?;
        let info = gst_video::VideoInfo::from_caps(caps).map_err(raster)?;

        let frame =
            gst_video::VideoFrameRef::from_buffer_ref_readable(buffer, &info).map_err(raster)?;

        let img = image::FlatSamples::<&[u8]> {
            samples: frame.plane_data(0).map_err(raster)?,
            layout: image::flat::SampleLayout {
                channels: 3,
                channel_stride: 1,
                width: frame.width(),
                width_stride: 4,
                height: frame.height(),
                height_stride: frame.plane_stride()[0] as usize,
            },
            color_hint: Some(image::ColorType::Rgb8),
        };
        let view = img
            .as_view::<Rgb<u8>>()
            .map_err(|err| raster(format!("{err:?}")))?;

        let rgb = ImageBuffer::from_fn(view.width(), view.height(), |x, y| view.get_pixel(x, y));
        Ok(DynamicImage::ImageRgb8(rgb))
    }
}

impl Drop for GstSurface {
    fn drop(&mut self) {
        if let Err(err) = self.pipeline.set_state(State::Null) {
            debug!(%err, "could not stop capture pipeline");
        }
    }
}
