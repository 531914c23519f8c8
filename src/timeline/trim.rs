use crate::error::{Error, Result};

/// Always holds `0 <= start < end <= duration`; the setters clamp.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrimRange {
    start_seconds: f64,
    end_seconds: f64,
    duration_seconds: f64,
    min_gap: f64,
}

impl TrimRange {
    pub fn new(duration_seconds: f64, min_gap: f64) -> Result<Self> {
        if !duration_seconds.is_finite() || duration_seconds <= 0.0 {
            return Err(Error::InvalidGeometry {
                width: f64::NAN,
                duration: duration_seconds,
            });
        }

        Ok(Self {
            start_seconds: 0.0,
            end_seconds: duration_seconds,
            duration_seconds,
            min_gap: min_gap.max(0.0),
        })
    }

    pub fn start_seconds(&self) -> f64 {
        self.start_seconds
    }

    pub fn end_seconds(&self) -> f64 {
        self.end_seconds
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    pub fn set_start(&mut self, time_seconds: f64) -> f64 {
        let upper = (self.end_seconds - self.min_gap).max(0.0);
        let start = if time_seconds.is_nan() {
            self.start_seconds
        } else {
            time_seconds.clamp(0.0, upper)
        };

        self.start_seconds = if start < self.end_seconds { start } else { 0.0 };
        self.start_seconds
    }

    pub fn set_end(&mut self, time_seconds: f64) -> f64 {
        let lower = (self.start_seconds + self.min_gap).min(self.duration_seconds);
        let end = if time_seconds.is_nan() {
            self.end_seconds
        } else {
            time_seconds.clamp(lower, self.duration_seconds)
        };

        self.end_seconds = if end > self.start_seconds {
            end
        } else {
            self.duration_seconds
        };
        self.end_seconds
    }

    pub fn is_full(&self) -> bool {
        self.start_seconds == 0.0 && self.end_seconds == self.duration_seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn holds_invariant(trim: &TrimRange) -> bool {
        0.0 <= trim.start_seconds()
            && trim.start_seconds() < trim.end_seconds()
            && trim.end_seconds() <= trim.duration_seconds()
    }

    #[test]
    fn starts_full_length() {
        let trim = TrimRange::new(10.0, 0.001).unwrap();

        assert_eq!(trim.start_seconds(), 0.0);
        assert_eq!(trim.end_seconds(), 10.0);
        assert!(trim.is_full());
    }

    #[test]
    fn rejects_unknown_duration() {
        assert!(TrimRange::new(0.0, 0.001).is_err());
        assert!(TrimRange::new(f64::NAN, 0.001).is_err());
    }

    #[test]
    fn start_never_crosses_end() {
        let mut trim = TrimRange::new(10.0, 0.001).unwrap();
        trim.set_end(5.0);

        let start = trim.set_start(7.5);

        assert!(start < 5.0);
        assert_relative_eq!(start, 5.0 - 0.001);
        assert!(holds_invariant(&trim));
    }

    #[test]
    fn end_never_crosses_start() {
        let mut trim = TrimRange::new(10.0, 0.001).unwrap();
        trim.set_start(4.0);

        let end = trim.set_end(1.0);

        assert!(end > 4.0);
        assert!(holds_invariant(&trim));
    }

    #[test]
    fn clamps_to_video_bounds() {
        let mut trim = TrimRange::new(10.0, 0.001).unwrap();

        assert_eq!(trim.set_start(-3.0), 0.0);
        assert_eq!(trim.set_end(42.0), 10.0);
        assert_eq!(trim.set_start(f64::NAN), 0.0);
    }

    #[test]
    fn invariant_survives_arbitrary_drags() {
        let mut trim = TrimRange::new(3.0, 0.001).unwrap();
        let targets = [2.9, -1.0, 3.5, 1.5, 1.5, 0.0, 3.0, 2.999, 0.0005, 2.9995];

        for (i, target) in targets.iter().enumerate() {
            if i % 2 == 0 {
                trim.set_start(*target);
            } else {
                trim.set_end(*target);
            }
            assert!(holds_invariant(&trim), "broken after {:?}", trim);
        }
    }

    #[test]
    fn tiny_video_keeps_a_valid_window() {
        let mut trim = TrimRange::new(0.0005, 0.001).unwrap();

        trim.set_start(0.0004);
        trim.set_end(0.0);

        assert!(holds_invariant(&trim));
    }
}
