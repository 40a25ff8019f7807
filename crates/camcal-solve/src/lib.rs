//! Estimators turning detected target points into calibration parameters.
//!
//! Each estimator sits behind a small trait so a higher-fidelity solver can
//! replace the bundled one without touching orchestration or storage:
//!
//! | trait | bundled implementation |
//! |---|---|
//! | [`IntrinsicEstimator`] | [`CoarseIntrinsics`]: focal from image size, centred principal point |
//! | [`DistortionEstimator`] | [`FixedDistortion`]: constant reference coefficients |
//! | [`ColorCalibrator`] | [`NeutralColor`]: unit gains, identity matrix |
//! | [`StereoSolver`] | [`ReferenceStereo`]: identity rotation, fixed 50 mm baseline |
//!
//! [`assess_quality`] is a plain function of the total point count.

mod color;
mod distortion;
mod error;
mod intrinsics;
mod quality;
mod stereo;

pub use color::{ColorCalibrator, NeutralColor};
pub use distortion::{DistortionEstimator, FixedDistortion, REFERENCE_DISTORTION};
pub use error::SolveError;
pub use intrinsics::{field_of_view_deg, CoarseIntrinsics, IntrinsicEstimator};
pub use quality::{assess_quality, total_points};
pub use stereo::{ReferenceStereo, StereoGeometry, StereoInput, StereoSolver};
