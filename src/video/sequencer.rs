use futures::future::join_all;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::{CapturePolicy, TimelineConfig};
use crate::error::{Error, Result};
use crate::video::resource::ResourceTag;
use crate::video::surface::VideoSurface;
use crate::video::thumbnail::{FrameCapture, Thumbnail};

/// Evenly spaced capture times over `[0, duration]`, both ends included.
pub fn plan_capture_times(duration_seconds: f64, count: usize) -> Result<Vec<f64>> {
    if !duration_seconds.is_finite() || duration_seconds <= 0.0 {
        return Err(Error::InvalidGeometry {
            width: f64::NAN,
            duration: duration_seconds,
        });
    }

    let plan = match count {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let last = count - 1;
            (0..count)
                .map(|i| {
                    if i == last {
                        duration_seconds
                    } else {
                        duration_seconds * i as f64 / last as f64
                    }
                })
                .collect()
        }
    };

    Ok(plan)
}

fn insert_ordered(thumbnails: &mut Vec<Thumbnail>, thumbnail: Thumbnail) -> bool {
    let index = thumbnails.partition_point(|existing| existing.time() < thumbnail.time());

    if thumbnails
        .get(index)
        .is_some_and(|existing| existing.time() == thumbnail.time())
    {
        return false;
    }

    thumbnails.insert(index, thumbnail);
    true
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct CaptureReport {
    pub planned: usize,
    pub captured: usize,
    /// Plan times that produced no thumbnail.
    pub gaps: Vec<f64>,
    pub stale: bool,
}

impl CaptureReport {
    fn merge(&mut self, other: CaptureReport) {
        self.captured += other.captured;
        self.gaps.extend(other.gaps);
        self.stale |= other.stale;
    }
}

/// Owns the thumbnail collection of one video resource.
///
/// Consumers watch the collection; every published value is a complete,
/// ordered snapshot, growing as captures land.
pub struct ThumbnailSequencer {
    publisher: Option<watch::Sender<Vec<Thumbnail>>>,
    thumbnails: watch::Receiver<Vec<Thumbnail>>,
}

impl Default for ThumbnailSequencer {
    fn default() -> Self {
        Self::new()
    }
}

impl ThumbnailSequencer {
    pub fn new() -> Self {
        let (publisher, thumbnails) = watch::channel(Vec::new());
        Self {
            publisher: Some(publisher),
            thumbnails,
        }
    }

    pub fn is_started(&self) -> bool {
        self.publisher.is_none()
    }

    pub fn thumbnails(&self) -> watch::Receiver<Vec<Thumbnail>> {
        self.thumbnails.clone()
    }

    pub fn start<S: VideoSurface>(
        &mut self,
        captures: Vec<FrameCapture<S>>,
        duration_seconds: f64,
        config: &TimelineConfig,
    ) -> Result<ThumbnailJob<S>> {
        if self.is_started() {
            return Err(Error::CaptureAlreadyStarted);
        }
        let Some(tag) = captures.first().map(|capture| capture.tag()) else {
            return Err(Error::NoCaptureHandle);
        };

        let plan = plan_capture_times(duration_seconds, config.thumbnail_count)?;
        let publisher = self.publisher.take().ok_or(Error::CaptureAlreadyStarted)?;

        info!(
            count = plan.len(),
            duration = duration_seconds,
            handles = captures.len(),
            policy = ?config.capture_policy,
            "planned thumbnail capture"
        );

        Ok(ThumbnailJob {
            plan,
            captures,
            publisher,
            policy: config.capture_policy,
            tag,
        })
    }
}

pub struct ThumbnailJob<S> {
    plan: Vec<f64>,
    captures: Vec<FrameCapture<S>>,
    publisher: watch::Sender<Vec<Thumbnail>>,
    policy: CapturePolicy,
    tag: ResourceTag,
}

impl<S: VideoSurface> ThumbnailJob<S> {
    pub fn plan(&self) -> &[f64] {
        &self.plan
    }

    pub fn tag(&self) -> ResourceTag {
        self.tag
    }

    pub async fn run(self) -> CaptureReport {
        let mut report = CaptureReport {
            planned: self.plan.len(),
            ..Default::default()
        };

        match self.policy {
            CapturePolicy::Sequential => {
                let times = self.plan.iter().copied();
                report.merge(capture_times(&self.captures[0], times, &self.publisher).await);
            }
            CapturePolicy::Concurrent => {
                let handles = self.captures.len();
                let workers = self.captures.iter().enumerate().map(|(i, capture)| {
                    let times = self.plan.iter().copied().skip(i).step_by(handles);
                    capture_times(capture, times, &self.publisher)
                });

                for outcome in join_all(workers).await {
                    report.merge(outcome);
                }
                report.gaps.sort_by(f64::total_cmp);
            }
        }

        if report.stale {
            debug!(tag = self.tag.id(), "thumbnail capture abandoned for replaced resource");
        } else {
            info!(
                captured = report.captured,
                gaps = report.gaps.len(),
                "thumbnail capture finished"
            );
        }

        report
    }
}

async fn capture_times<S: VideoSurface>(
    capture: &FrameCapture<S>,
    times: impl Iterator<Item = f64>,
    publisher: &watch::Sender<Vec<Thumbnail>>,
) -> CaptureReport {
    let mut report = CaptureReport::default();

    for time in times {
        match capture.capture_frame(time).await {
            Ok(thumbnail) => {
                publisher.send_modify(|thumbnails| {
                    insert_ordered(thumbnails, thumbnail);
                });
                report.captured += 1;
            }
            Err(Error::StaleCompletion) => {
                report.stale = true;
                break;
            }
            Err(err) if err.is_gap() => {
                warn!(time, %err, "thumbnail capture failed, leaving a gap");
                report.gaps.push(time);
            }
            Err(err) => {
                warn!(time, %err, "thumbnail capture abandoned");
                break;
            }
        }
    }

    report
}
