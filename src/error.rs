use thiserror::Error;

/// Errors raised by the timeline engine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("timeline geometry is not usable (width {width}, duration {duration})")]
    InvalidGeometry { width: f64, duration: f64 },

    #[error("seek to {time:.3}s did not land in time")]
    CaptureTimeout { time: f64 },

    #[error("could not rasterize frame: {0}")]
    RasterizeFailure(String),

    #[error("video resource unavailable: {0}")]
    ResourceUnavailable(String),

    /// A completion arrived for a video resource that has since been replaced.
    #[error("completion belongs to a superseded video resource")]
    StaleCompletion,

    #[error("thumbnail capture already started for this resource")]
    CaptureAlreadyStarted,

    #[error("no capture handle was provided")]
    NoCaptureHandle,
}

impl Error {
    /// Errors the sequencer records as a missing thumbnail before moving on.
    pub fn is_gap(&self) -> bool {
        matches!(
            self,
            Error::CaptureTimeout { .. } | Error::RasterizeFailure(_) | Error::ResourceUnavailable(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
