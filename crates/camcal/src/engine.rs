//! Worker pool, cancellation scope and the public calibration surface.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use camcal_core::{CameraCalibration, PatternKind, RgbImage, StereoCalibration};
use log::{info, warn};

use crate::cancel::{CancelScope, CancelToken};
use crate::config::CalibrationConfig;
use crate::corrector::ImageCorrector;
use crate::pipeline::{now_ms, CalibrationPipeline};
use crate::snapshot::CalibrationSnapshot;
use crate::store::CalibrationStore;
use crate::task::CalibrationTask;
use crate::{CalibrationError, EngineError};

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}

/// Runs calibration and correction work on a dedicated pool and owns the
/// calibration store.
///
/// Every operation is a one-shot task; the returned [`CalibrationTask`]
/// resolves to `None` on rejection, failure or cancellation. Nothing runs on
/// the caller's thread, so frame delivery elsewhere is never stalled.
pub struct CalibrationEngine {
    pool: rayon::ThreadPool,
    pipeline: Arc<CalibrationPipeline>,
    store: Arc<CalibrationStore>,
    scope: CancelScope,
}

impl CalibrationEngine {
    pub fn new(config: CalibrationConfig) -> Result<Self, EngineError> {
        let pipeline = CalibrationPipeline::from_config(&config);
        Self::with_pipeline(config, pipeline)
    }

    /// Use custom estimators; `config` still sizes the pool.
    pub fn with_pipeline(
        config: CalibrationConfig,
        pipeline: CalibrationPipeline,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        let name = config.thread_name.clone();
        let mut builder =
            rayon::ThreadPoolBuilder::new().thread_name(move |idx| format!("{name}-{idx}"));
        if let Some(n) = config.worker_threads {
            builder = builder.num_threads(n);
        }
        let pool = builder.build()?;
        info!(
            "calibration engine started with {} workers",
            pool.current_num_threads()
        );
        Ok(Self {
            pool,
            pipeline: Arc::new(pipeline),
            store: Arc::new(CalibrationStore::new()),
            scope: CancelScope::default(),
        })
    }

    pub fn store(&self) -> &Arc<CalibrationStore> {
        &self.store
    }

    pub fn corrector(&self) -> ImageCorrector {
        ImageCorrector::new(self.store.clone())
    }

    /// Spawn `work` under the current cancellation token.
    fn submit<T, F>(&self, op: &'static str, work: F) -> CalibrationTask<T>
    where
        T: Send + 'static,
        F: FnOnce(&CancelToken) -> Result<Option<T>, CalibrationError> + Send + 'static,
    {
        let token = self.scope.token();
        let (tx, task) = CalibrationTask::channel();
        self.pool.spawn(move || {
            let outcome = match token.check() {
                Ok(()) => panic::catch_unwind(AssertUnwindSafe(|| work(&token)))
                    .unwrap_or_else(|p| Err(CalibrationError::Processing(panic_message(p)))),
                Err(e) => Err(e),
            };
            let value = match outcome {
                Ok(v) => v,
                Err(CalibrationError::Cancelled) => {
                    info!("{op}: cancelled");
                    None
                }
                Err(e) if e.is_validation() => {
                    warn!("{op}: rejected: {e}");
                    None
                }
                Err(e) => {
                    warn!("{op}: failed: {e}");
                    None
                }
            };
            let _ = tx.send(value);
        });
        task
    }

    /// Calibrate one camera and store the record under `camera_id`.
    pub fn calibrate_single_camera(
        &self,
        camera_id: &str,
        images: Vec<RgbImage>,
        kind: PatternKind,
    ) -> CalibrationTask<CameraCalibration> {
        let pipeline = self.pipeline.clone();
        let store = self.store.clone();
        let camera_id = camera_id.to_string();
        self.submit("calibrate_single_camera", move |token| {
            let record = pipeline.calibrate_camera(&camera_id, &images, kind, token)?;
            if !store.publish_camera(token.generation(), record.clone()) {
                return Err(CalibrationError::Cancelled);
            }
            Ok(Some(record))
        })
    }

    /// Calibrate a camera pair. On success the stereo record and both
    /// camera records are stored together.
    pub fn calibrate_stereo_camera(
        &self,
        left_id: &str,
        right_id: &str,
        left_images: Vec<RgbImage>,
        right_images: Vec<RgbImage>,
        kind: PatternKind,
    ) -> CalibrationTask<StereoCalibration> {
        let pipeline = self.pipeline.clone();
        let store = self.store.clone();
        let (left_id, right_id) = (left_id.to_string(), right_id.to_string());
        self.submit("calibrate_stereo_camera", move |token| {
            let record = pipeline.calibrate_stereo(
                &left_id,
                &right_id,
                &left_images,
                &right_images,
                kind,
                token,
            )?;
            if !store.publish_stereo(token.generation(), record.clone()) {
                return Err(CalibrationError::Cancelled);
            }
            Ok(Some(record))
        })
    }

    pub fn get_calibration_data(&self, camera_id: &str) -> Option<CameraCalibration> {
        self.store.camera(camera_id)
    }

    /// Symmetric in the two ids.
    pub fn get_stereo_calibration_data(&self, a: &str, b: &str) -> Option<StereoCalibration> {
        self.store.stereo(a, b)
    }

    /// Undistort a copy of `image`; `None` if `camera_id` is uncalibrated.
    pub fn undistort(&self, image: &RgbImage, camera_id: &str) -> CalibrationTask<RgbImage> {
        let corrector = self.corrector();
        let image = image.clone();
        let camera_id = camera_id.to_string();
        self.submit("undistort", move |_| Ok(corrector.undistort(&image, &camera_id)))
    }

    /// Color-correct a copy of `image`; `None` if `camera_id` is uncalibrated.
    pub fn color_correct(&self, image: &RgbImage, camera_id: &str) -> CalibrationTask<RgbImage> {
        let corrector = self.corrector();
        let image = image.clone();
        let camera_id = camera_id.to_string();
        self.submit("color_correct", move |_| {
            Ok(corrector.color_correct(&image, &camera_id))
        })
    }

    pub fn export_calibration_data(&self) -> CalibrationSnapshot {
        let (cameras, stereo) = self.store.records();
        CalibrationSnapshot {
            cameras,
            stereo,
            exported_at_ms: now_ms(),
        }
    }

    /// Replace the store contents with `snapshot`.
    pub fn import_calibration_data(&self, snapshot: CalibrationSnapshot) {
        let (cameras, pairs) = (snapshot.cameras.len(), snapshot.stereo.len());
        self.store.replace_all(snapshot.cameras, snapshot.stereo);
        info!("imported {cameras} camera and {pairs} stereo calibrations");
    }

    /// Cancel all outstanding work and clear the store.
    pub fn cleanup(&self) {
        let store = &self.store;
        self.scope
            .cancel_all(|| CancelToken::for_generation(store.reset()));
        info!("calibration engine cleaned up");
    }
}

impl Drop for CalibrationEngine {
    fn drop(&mut self) {
        self.scope.cancel_current();
    }
}
