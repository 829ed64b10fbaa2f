use crate::prelude::PlacementConfig;

/// One proposed offset from the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub bearing_deg: f64,
    pub distance_m: f64,
}

/// Source of candidate offsets for successive search attempts.
pub trait CandidateStrategy {
    fn candidate(&self, attempt: usize) -> Candidate;
}

/// Zig-zags left and right of the camera direction, reaching further out
/// and wider as attempts accumulate and as the camera collects more pins.
#[derive(Debug, Clone)]
pub struct SpreadStrategy {
    facing_deg: f64,
    base_distance_m: f64,
    distance_variation_m: f64,
    max_offset_deg: f64,
    max_attempts: usize,
}

impl SpreadStrategy {
    pub fn new(facing_deg: f64, existing_pins: usize, config: &PlacementConfig) -> Self {
        let band = config.max_distance_m - config.base_distance_m;
        Self {
            facing_deg,
            base_distance_m: config.base_distance_m,
            distance_variation_m: (existing_pins as f64 * 2.0).min(band),
            max_offset_deg: config.half_angle_deg() * 0.8,
            max_attempts: config.max_attempts,
        }
    }

    pub fn distance_variation_m(&self) -> f64 {
        self.distance_variation_m
    }
}

impl CandidateStrategy for SpreadStrategy {
    fn candidate(&self, attempt: usize) -> Candidate {
        let progress = if self.max_attempts == 0 {
            0.0
        } else {
            attempt as f64 / self.max_attempts as f64
        };
        let side = if attempt % 2 == 0 { 1.0 } else { -1.0 };

        Candidate {
            bearing_deg: self.facing_deg + self.max_offset_deg * side * progress,
            distance_m: self.base_distance_m + self.distance_variation_m * (0.3 + 0.7 * progress),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_attempt_looks_straight_ahead() {
        let strategy = SpreadStrategy::new(90.0, 3, &PlacementConfig::default());
        let candidate = strategy.candidate(0);
        assert_eq!(candidate.bearing_deg, 90.0);
        assert!((candidate.distance_m - (5.0 + 6.0 * 0.3)).abs() < 1e-12);
    }

    #[test]
    fn attempts_alternate_sides_and_widen() {
        let strategy = SpreadStrategy::new(0.0, 2, &PlacementConfig::default());
        let offsets: Vec<f64> = (0..6).map(|i| strategy.candidate(i).bearing_deg).collect();

        assert!(offsets[1] < 0.0 && offsets[2] > 0.0 && offsets[3] < 0.0);
        assert!(offsets[3].abs() > offsets[1].abs());
        // 24 degrees cap, scaled by 5/20
        assert!((offsets[5] + 24.0 * 0.25).abs() < 1e-12);
    }

    #[test]
    fn variation_is_capped_by_distance_band() {
        let config = PlacementConfig::default();
        let strategy = SpreadStrategy::new(0.0, 50, &config);
        assert_eq!(strategy.distance_variation_m(), 20.0);

        for attempt in 0..config.max_attempts {
            let candidate = strategy.candidate(attempt);
            assert!(candidate.distance_m >= config.base_distance_m);
            assert!(candidate.distance_m <= config.max_distance_m);
            assert!((candidate.bearing_deg).abs() <= config.half_angle_deg() * 0.8);
        }
    }

    #[test]
    fn distance_grows_with_attempts() {
        let strategy = SpreadStrategy::new(0.0, 4, &PlacementConfig::default());
        let distances: Vec<f64> = (0..20).map(|i| strategy.candidate(i).distance_m).collect();
        assert!(distances.windows(2).all(|pair| pair[1] > pair[0]));
    }
}
