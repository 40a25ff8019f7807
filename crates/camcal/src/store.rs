//! Keyed storage of the latest calibration per camera and per camera pair.

use std::collections::HashMap;

use camcal_core::{CameraCalibration, StereoCalibration};
use parking_lot::RwLock;

/// Unordered pair of camera ids, stored in lexicographic order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StereoKey {
    first: String,
    second: String,
}

impl StereoKey {
    pub fn new(a: &str, b: &str) -> Self {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        Self {
            first: first.to_string(),
            second: second.to_string(),
        }
    }

    pub fn of(record: &StereoCalibration) -> Self {
        Self::new(&record.left.camera_id, &record.right.camera_id)
    }

    pub fn ids(&self) -> (&str, &str) {
        (&self.first, &self.second)
    }
}

#[derive(Debug, Default)]
struct StoreState {
    generation: u64,
    cameras: HashMap<String, CameraCalibration>,
    stereo: HashMap<StereoKey, StereoCalibration>,
}

/// Last-write-wins store of calibration records.
///
/// Both maps sit behind one lock: readers always see whole records, and a
/// reset or import is observed either entirely or not at all. Writers
/// belonging to a superseded generation are refused.
#[derive(Debug, Default)]
pub struct CalibrationStore {
    state: RwLock<StoreState>,
}

impl CalibrationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn camera(&self, camera_id: &str) -> Option<CameraCalibration> {
        self.state.read().cameras.get(camera_id).cloned()
    }

    /// Lookup is symmetric in `a` and `b`.
    pub fn stereo(&self, a: &str, b: &str) -> Option<StereoCalibration> {
        self.state.read().stereo.get(&StereoKey::new(a, b)).cloned()
    }

    /// Calibrated camera ids, sorted.
    pub fn camera_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.state.read().cameras.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Calibrated pairs, sorted.
    pub fn stereo_keys(&self) -> Vec<StereoKey> {
        let mut keys: Vec<StereoKey> = self.state.read().stereo.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn is_empty(&self) -> bool {
        let state = self.state.read();
        state.cameras.is_empty() && state.stereo.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.state.read().generation
    }

    /// All records, each group sorted by key, read under a single lock.
    pub fn records(&self) -> (Vec<CameraCalibration>, Vec<StereoCalibration>) {
        let state = self.state.read();
        let mut cameras: Vec<CameraCalibration> = state.cameras.values().cloned().collect();
        cameras.sort_by(|a, b| a.camera_id.cmp(&b.camera_id));
        let mut stereo: Vec<(StereoKey, StereoCalibration)> = state
            .stereo
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        stereo.sort_by(|a, b| a.0.cmp(&b.0));
        (cameras, stereo.into_iter().map(|(_, v)| v).collect())
    }

    /// Store `record` if `generation` is still current.
    pub(crate) fn publish_camera(&self, generation: u64, record: CameraCalibration) -> bool {
        let mut state = self.state.write();
        if state.generation != generation {
            return false;
        }
        state.cameras.insert(record.camera_id.clone(), record);
        true
    }

    /// Store a stereo record together with both of its camera records if
    /// `generation` is still current.
    pub(crate) fn publish_stereo(&self, generation: u64, record: StereoCalibration) -> bool {
        let mut state = self.state.write();
        if state.generation != generation {
            return false;
        }
        state
            .cameras
            .insert(record.left.camera_id.clone(), record.left.clone());
        state
            .cameras
            .insert(record.right.camera_id.clone(), record.right.clone());
        state.stereo.insert(StereoKey::of(&record), record);
        true
    }

    /// Replace the full contents. The generation is kept.
    pub fn replace_all(&self, cameras: Vec<CameraCalibration>, stereo: Vec<StereoCalibration>) {
        let cameras = cameras
            .into_iter()
            .map(|c| (c.camera_id.clone(), c))
            .collect();
        let stereo = stereo.into_iter().map(|s| (StereoKey::of(&s), s)).collect();
        let mut state = self.state.write();
        state.cameras = cameras;
        state.stereo = stereo;
    }

    /// Clear both maps and start a new generation.
    pub(crate) fn reset(&self) -> u64 {
        let mut state = self.state.write();
        state.cameras.clear();
        state.stereo.clear();
        state.generation += 1;
        state.generation
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use camcal_core::{
        ColorCalibrationData, DistortionCoefficients, ExtrinsicParameters, IntrinsicParameters,
        Mat3, Vec3,
    };

    pub(crate) fn camera(id: &str, quality: f64) -> CameraCalibration {
        CameraCalibration {
            camera_id: id.to_string(),
            intrinsics: IntrinsicParameters {
                fx: 200.0,
                fy: 200.0,
                cx: 100.0,
                cy: 100.0,
                image_width: 200,
                image_height: 200,
                fov_horizontal_deg: 53.13,
                fov_vertical_deg: 53.13,
            },
            distortion: DistortionCoefficients::default(),
            color: ColorCalibrationData::neutral(),
            quality_score: quality,
            timestamp_ms: 1,
        }
    }

    pub(crate) fn stereo(left: &str, right: &str) -> StereoCalibration {
        StereoCalibration {
            left: camera(left, 0.95),
            right: camera(right, 0.95),
            extrinsics: ExtrinsicParameters {
                rotation: Mat3::identity(),
                translation: Vec3::new(50.0, 0.0, 0.0),
                baseline_mm: 50.0,
                convergence_angle_deg: 0.0,
            },
            fundamental: Mat3::identity(),
            essential: Mat3::identity(),
            rectification_quality: 0.9,
            epipolar_error_px: 0.5,
        }
    }

    #[test]
    fn key_is_unordered() {
        assert_eq!(StereoKey::new("b", "a"), StereoKey::new("a", "b"));
        assert_eq!(StereoKey::new("b", "a").ids(), ("a", "b"));
    }

    #[test]
    fn last_write_wins() {
        let store = CalibrationStore::new();
        assert!(store.camera("cam0").is_none());
        assert!(store.publish_camera(0, camera("cam0", 0.6)));
        assert!(store.publish_camera(0, camera("cam0", 0.95)));
        assert_eq!(store.camera("cam0"), Some(camera("cam0", 0.95)));
        assert_eq!(store.camera_ids(), vec!["cam0".to_string()]);
    }

    #[test]
    fn stereo_lookup_is_symmetric_and_deduplicated() {
        let store = CalibrationStore::new();
        assert!(store.publish_stereo(0, stereo("camR", "camL")));
        assert!(store.publish_stereo(0, stereo("camL", "camR")));
        assert_eq!(store.stereo_keys().len(), 1);
        assert_eq!(store.stereo("camL", "camR"), store.stereo("camR", "camL"));
        assert_eq!(store.stereo("camL", "camR"), Some(stereo("camL", "camR")));
        // both inner calibrations are published alongside
        assert!(store.camera("camL").is_some());
        assert!(store.camera("camR").is_some());
    }

    #[test]
    fn stale_generation_is_refused() {
        let store = CalibrationStore::new();
        assert!(store.publish_camera(0, camera("cam0", 0.95)));
        assert_eq!(store.reset(), 1);
        assert!(store.is_empty());
        assert!(!store.publish_camera(0, camera("cam1", 0.95)));
        assert!(!store.publish_stereo(0, stereo("a", "b")));
        assert!(store.is_empty());
        assert!(store.publish_camera(1, camera("cam1", 0.95)));
    }

    #[test]
    fn replace_all_keys_stereo_by_canonical_pair() {
        let store = CalibrationStore::new();
        store.publish_camera(0, camera("old", 0.6));
        store.replace_all(vec![camera("x", 0.75)], vec![stereo("z", "y")]);
        assert!(store.camera("old").is_none());
        assert!(store.camera("x").is_some());
        assert!(store.stereo("y", "z").is_some());
        let (cams, pairs) = store.records();
        assert_eq!(cams.len(), 1);
        assert_eq!(pairs.len(), 1);
    }
}
