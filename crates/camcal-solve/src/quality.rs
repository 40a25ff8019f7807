use camcal_core::CalibrationPattern;

/// Score a run from the total number of detected points.
pub fn assess_quality(total_points: usize) -> f64 {
    match total_points {
        n if n > 500 => 0.95,
        n if n > 300 => 0.85,
        n if n > 150 => 0.75,
        _ => 0.60,
    }
}

pub fn total_points(patterns: &[CalibrationPattern]) -> usize {
    patterns.iter().map(|p| p.points.len()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers() {
        let scores: Vec<f64> = [600, 400, 200, 50].into_iter().map(assess_quality).collect();
        assert_eq!(scores, vec![0.95, 0.85, 0.75, 0.60]);
    }

    #[test]
    fn thresholds_are_exclusive() {
        assert_eq!(assess_quality(501), 0.95);
        assert_eq!(assess_quality(500), 0.85);
        assert_eq!(assess_quality(300), 0.75);
        assert_eq!(assess_quality(150), 0.60);
        assert_eq!(assess_quality(0), 0.60);
    }
}
