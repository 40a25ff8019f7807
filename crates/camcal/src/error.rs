use camcal_solve::SolveError;

use crate::ConfigError;

/// Why a calibration or correction run produced no result.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CalibrationError {
    #[error("need at least {required} frames, got {got}")]
    InsufficientFrames { got: usize, required: usize },

    #[error("left/right frame counts differ ({left} vs {right})")]
    FrameCountMismatch { left: usize, right: usize },

    #[error("pattern detected in {left} left frames but {right} right frames")]
    DetectionCountMismatch { left: usize, right: usize },

    #[error("frame {index} is {}x{}, expected {}x{}", .got.0, .got.1, .expected.0, .expected.1)]
    DimensionMismatch {
        index: usize,
        expected: (usize, usize),
        got: (usize, usize),
    },

    #[error("stereo pair needs two distinct cameras, got {id} twice")]
    SameCamera { id: String },

    #[error("frame {index} has no pixels")]
    EmptyFrame { index: usize },

    #[error(transparent)]
    Solve(#[from] SolveError),

    #[error("processing fault: {0}")]
    Processing(String),

    #[error("cancelled")]
    Cancelled,
}

impl CalibrationError {
    /// Rejected inputs, as opposed to faults while processing valid ones.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InsufficientFrames { .. }
                | Self::FrameCountMismatch { .. }
                | Self::DetectionCountMismatch { .. }
                | Self::DimensionMismatch { .. }
                | Self::EmptyFrame { .. }
                | Self::SameCamera { .. }
        )
    }
}

/// Errors raised while constructing an engine.
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert!(CalibrationError::InsufficientFrames { got: 3, required: 10 }.is_validation());
        assert!(CalibrationError::DetectionCountMismatch { left: 9, right: 10 }.is_validation());
        assert!(CalibrationError::SameCamera { id: "cam0".into() }.is_validation());
        assert!(!CalibrationError::Processing("boom".into()).is_validation());
        assert!(!CalibrationError::Cancelled.is_validation());
        assert!(!CalibrationError::Solve(SolveError::NoPointSets).is_validation());
    }

    #[test]
    fn messages_carry_the_cause() {
        let e = CalibrationError::DimensionMismatch {
            index: 3,
            expected: (640, 480),
            got: (320, 240),
        };
        assert_eq!(e.to_string(), "frame 3 is 320x240, expected 640x480");
    }
}
