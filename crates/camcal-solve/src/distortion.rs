use camcal_core::{CalibrationPattern, DistortionCoefficients, IntrinsicParameters};

use crate::SolveError;

/// Derives lens-distortion coefficients.
pub trait DistortionEstimator: Send + Sync {
    fn estimate(
        &self,
        patterns: &[CalibrationPattern],
        intrinsics: &IntrinsicParameters,
    ) -> Result<DistortionCoefficients, SolveError>;
}

/// Mild barrel distortion typical of phone-class lenses.
pub const REFERENCE_DISTORTION: DistortionCoefficients = DistortionCoefficients {
    k1: -0.1,
    k2: 0.05,
    k3: -0.01,
    p1: 0.001,
    p2: 0.001,
};

/// Returns fixed coefficients regardless of the observations.
///
/// Stand-in until a least-squares fit over reprojection residuals is wired
/// in behind the same trait.
#[derive(Clone, Copy, Debug)]
pub struct FixedDistortion {
    pub coefficients: DistortionCoefficients,
}

impl Default for FixedDistortion {
    fn default() -> Self {
        Self {
            coefficients: REFERENCE_DISTORTION,
        }
    }
}

impl DistortionEstimator for FixedDistortion {
    fn estimate(
        &self,
        _patterns: &[CalibrationPattern],
        _intrinsics: &IntrinsicParameters,
    ) -> Result<DistortionCoefficients, SolveError> {
        Ok(self.coefficients)
    }
}
