use std::path::PathBuf;

use argh::FromArgs;
use tracing_subscriber::EnvFilter;

use scrubline::config::{NUM_THUMBNAILS, THUMBNAIL_HEIGHT, THUMBNAIL_WIDTH};
use scrubline::timeline::time_display_text;
use scrubline::video::plan_capture_times;

#[derive(FromArgs)]
/// Thumbnail planning and capture for video timelines.
struct Cli {
    #[argh(subcommand)]
    command: Command,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Command {
    Plan(PlanArgs),
    Thumbnails(ThumbnailArgs),
}

#[derive(FromArgs)]
/// Print the capture times planned for a video.
#[argh(subcommand, name = "plan")]
struct PlanArgs {
    #[argh(positional)]
    /// video duration in seconds
    duration: f64,

    #[argh(option, default = "NUM_THUMBNAILS")]
    /// number of thumbnails
    count: usize,
}

#[derive(FromArgs)]
/// Capture a thumbnail strip from a video and write it as jpeg files.
#[argh(subcommand, name = "thumbnails")]
#[cfg_attr(not(feature = "gstreamer"), allow(dead_code))]
struct ThumbnailArgs {
    #[argh(positional)]
    /// video uri, e.g. file:///tmp/clip.mp4
    uri: String,

    #[argh(option, default = "NUM_THUMBNAILS")]
    /// number of thumbnails
    count: usize,

    #[argh(option, default = "THUMBNAIL_WIDTH")]
    /// thumbnail width in pixels
    width: u32,

    #[argh(option, default = "THUMBNAIL_HEIGHT")]
    /// thumbnail height in pixels
    height: u32,

    #[argh(option, default = "PathBuf::from(\".\")")]
    /// output directory
    out: PathBuf,

    #[argh(option, default = "5")]
    /// seconds to wait for each seek to land
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("scrubline=info")),
        )
        .init();

    let cli: Cli = argh::from_env();

    match cli.command {
        Command::Plan(args) => plan(args),
        Command::Thumbnails(args) => thumbnails(args).await,
    }
}

fn plan(args: PlanArgs) -> anyhow::Result<()> {
    let plan = plan_capture_times(args.duration, args.count)?;

    for (i, time) in plan.iter().enumerate() {
        println!("{i:>4}  {time:>10.3}  {}", time_display_text(*time));
    }

    Ok(())
}

#[cfg(feature = "gstreamer")]
async fn thumbnails(args: ThumbnailArgs) -> anyhow::Result<()> {
    use std::time::Duration;

    use anyhow::Context;
    use scrubline::video::{FrameCapture, GstSurface, ResourceTracker, ThumbnailSequencer};
    use scrubline::{TimelineConfig, VideoSurface};
    use tracing::info;

    let config = TimelineConfig::default()
        .with_thumbnail_count(args.count)
        .with_thumbnail_size(args.width, args.height)
        .with_capture_timeout(Duration::from_secs(args.timeout_secs));

    let surface = GstSurface::open(&args.uri)?;
    let duration = surface
        .duration()
        .with_context(|| format!("{} reports no duration", args.uri))?;

    let tracker = ResourceTracker::new();
    tracker.advance();
    let mut sequencer = ThumbnailSequencer::new();
    let thumbnails = sequencer.thumbnails();

    let captures = vec![FrameCapture::new(surface, tracker, &config)];
    let report = sequencer.start(captures, duration, &config)?.run().await;

    std::fs::create_dir_all(&args.out)
        .with_context(|| format!("creating {}", args.out.display()))?;

    for (i, thumbnail) in thumbnails.borrow().iter().enumerate() {
        let path = args.out.join(format!("thumbnail_{i}.jpg"));
        std::fs::write(&path, thumbnail.src())
            .with_context(|| format!("writing {}", path.display()))?;
    }

    info!(
        captured = report.captured,
        gaps = ?report.gaps,
        out = %args.out.display(),
        "wrote thumbnails"
    );

    Ok(())
}

#[cfg(not(feature = "gstreamer"))]
async fn thumbnails(args: ThumbnailArgs) -> anyhow::Result<()> {
    anyhow::bail!(
        "cannot capture {}: scrubline was built without the `gstreamer` feature",
        args.uri
    )
}
