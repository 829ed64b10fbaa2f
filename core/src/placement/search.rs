use log::debug;
use rand::Rng;
use serde::Serialize;

use crate::math::bearing::normalize_bearing;
use crate::math::geodesy::{GeoPoint, Geodesy};
use crate::placement::candidate::{CandidateStrategy, SpreadStrategy};
use crate::prelude::{PlacementConfig, PlacementResult};

/// How a placement was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum PlacementOutcome {
    /// The camera had no pins; placed straight ahead at the base distance.
    FirstPin,
    /// A search candidate cleared every existing pin.
    Accepted { attempt: usize },
    /// Every candidate collided; placed at random inside the cone.
    Fallback,
}

/// Coordinate chosen for a new pin, with the offset that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub point: GeoPoint,
    /// Bearing from the camera, normalized to `[0, 360)`.
    pub bearing_deg: f64,
    pub distance_m: f64,
    pub outcome: PlacementOutcome,
}

impl Placement {
    fn new(point: GeoPoint, bearing_deg: f64, distance_m: f64, outcome: PlacementOutcome) -> Self {
        Self {
            point,
            bearing_deg: normalize_bearing(bearing_deg),
            distance_m,
            outcome,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.outcome == PlacementOutcome::Fallback
    }
}

/// Bounded search for a pin position inside a camera's field of view.
#[derive(Debug, Clone)]
pub struct PlacementSearch {
    config: PlacementConfig,
    geodesy: Geodesy,
}

impl PlacementSearch {
    pub fn new(config: PlacementConfig) -> PlacementResult<Self> {
        config.validate()?;
        let geodesy = Geodesy::new(config.earth_radius_m);
        Ok(Self { config, geodesy })
    }

    /// Picks a coordinate for a new pin seen by a camera at `origin` facing
    /// `facing_deg`, given the positions of the camera's existing pins.
    ///
    /// Never fails: when the search budget runs out the pin lands at a random
    /// spot in the cone without any separation check. A non-finite origin or
    /// facing yields a non-finite point rather than a panic.
    pub fn place<R: Rng + ?Sized>(
        &self,
        origin: GeoPoint,
        facing_deg: f64,
        existing: &[GeoPoint],
        rng: &mut R,
    ) -> Placement {
        if existing.is_empty() {
            let distance = self.config.base_distance_m;
            let point = self.geodesy.destination(origin, facing_deg, distance);
            return Placement::new(point, facing_deg, distance, PlacementOutcome::FirstPin);
        }

        let strategy = SpreadStrategy::new(facing_deg, existing.len(), &self.config);
        self.place_with(&strategy, origin, facing_deg, existing, rng)
    }

    /// Runs the candidate search with an arbitrary strategy.
    pub fn place_with<S, R>(
        &self,
        strategy: &S,
        origin: GeoPoint,
        facing_deg: f64,
        existing: &[GeoPoint],
        rng: &mut R,
    ) -> Placement
    where
        S: CandidateStrategy + ?Sized,
        R: Rng + ?Sized,
    {
        for attempt in 0..self.config.max_attempts {
            let candidate = strategy.candidate(attempt);
            let point = self
                .geodesy
                .destination(origin, candidate.bearing_deg, candidate.distance_m);

            if self.is_clear(point, existing) {
                debug!(
                    "accepted candidate {} at {:.2} m, bearing {:.2}",
                    attempt, candidate.distance_m, candidate.bearing_deg
                );
                return Placement::new(
                    point,
                    candidate.bearing_deg,
                    candidate.distance_m,
                    PlacementOutcome::Accepted { attempt },
                );
            }
        }

        debug!(
            "no candidate cleared {} pins in {} attempts, falling back",
            existing.len(),
            self.config.max_attempts
        );
        self.fallback(origin, facing_deg, rng)
    }

    fn is_clear(&self, point: GeoPoint, existing: &[GeoPoint]) -> bool {
        existing
            .iter()
            .all(|&pin| self.geodesy.haversine_distance(point, pin) >= self.config.min_separation_m)
    }

    fn fallback<R: Rng + ?Sized>(&self, origin: GeoPoint, facing_deg: f64, rng: &mut R) -> Placement {
        let spread = self.config.half_angle_deg() * 0.8;
        // unit draws scaled by hand; gen_range panics on non-finite bounds
        let band = self.config.max_distance_m - self.config.base_distance_m;
        let distance = self.config.base_distance_m + band * rng.gen::<f64>();
        let bearing = facing_deg + spread * (2.0 * rng.gen::<f64>() - 1.0);
        let point = self.geodesy.destination(origin, bearing, distance);
        Placement::new(point, bearing, distance, PlacementOutcome::Fallback)
    }
}

impl Default for PlacementSearch {
    fn default() -> Self {
        let config = PlacementConfig::default();
        Self {
            geodesy: Geodesy::new(config.earth_radius_m),
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::bearing::angular_offset;
    use crate::placement::candidate::Candidate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const CAMERA: GeoPoint = GeoPoint {
        latitude: 14.5995,
        longitude: 120.9842,
    };

    fn assert_in_band(search: &PlacementSearch, placement: &Placement) {
        let config = &search.config;
        let measured = search.geodesy.haversine_distance(CAMERA, placement.point);
        assert!(
            measured >= config.base_distance_m - 1e-6 && measured <= config.max_distance_m + 1e-6,
            "distance {measured} outside band"
        );
    }

    #[test]
    fn first_pin_sits_straight_ahead_at_base_distance() {
        let search = PlacementSearch::default();
        let mut rng = StdRng::seed_from_u64(1);
        let placement = search.place(CAMERA, 90.0, &[], &mut rng);

        assert_eq!(placement.outcome, PlacementOutcome::FirstPin);
        assert_eq!(placement.point, search.geodesy.destination(CAMERA, 90.0, 5.0));
        assert_eq!(placement.distance_m, 5.0);
    }

    #[test]
    fn clustered_pins_push_search_outward() {
        let search = PlacementSearch::default();
        let geo = search.geodesy;
        let existing = [
            geo.destination(CAMERA, 90.0, 5.0),
            geo.destination(CAMERA, 90.0, 5.5),
            geo.destination(CAMERA, 95.0, 5.0),
        ];
        let mut rng = StdRng::seed_from_u64(7);
        let placement = search.place(CAMERA, 90.0, &existing, &mut rng);

        assert!(matches!(placement.outcome, PlacementOutcome::Accepted { attempt } if attempt > 0));
        for pin in existing {
            assert!(geo.haversine_distance(placement.point, pin) >= 2.0);
        }
        assert_in_band(&search, &placement);
    }

    #[test]
    fn accepted_placements_stay_in_cone_and_band() {
        let search = PlacementSearch::default();
        let geo = search.geodesy;
        let mut rng = StdRng::seed_from_u64(11);
        let mut existing = Vec::new();

        for _ in 0..12 {
            let placement = search.place(CAMERA, 350.0, &existing, &mut rng);
            assert_in_band(&search, &placement);
            if !placement.is_fallback() {
                let bearing = geo.initial_bearing(CAMERA, placement.point);
                assert!(angular_offset(bearing, 350.0).abs() <= 24.0 + 1e-6);
                for &pin in &existing {
                    assert!(geo.haversine_distance(placement.point, pin) >= 2.0);
                }
            }
            assert!((0.0..360.0).contains(&placement.bearing_deg));
            existing.push(placement.point);
        }
    }

    #[test]
    fn impossible_separation_falls_back_inside_cone() {
        let config = PlacementConfig {
            min_separation_m: 1_000.0,
            ..Default::default()
        };
        let search = PlacementSearch::new(config).unwrap();
        let geo = search.geodesy;
        let existing = [geo.destination(CAMERA, 45.0, 5.0)];

        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let placement = search.place(CAMERA, 45.0, &existing, &mut rng);
            assert!(placement.is_fallback());
            assert_in_band(&search, &placement);
            assert!(angular_offset(placement.bearing_deg, 45.0).abs() <= 24.0 + 1e-9);
        }
    }

    #[test]
    fn zero_attempt_budget_goes_straight_to_fallback() {
        let search = PlacementSearch::new(PlacementConfig {
            max_attempts: 0,
            ..Default::default()
        })
        .unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let existing = [GeoPoint::new(0.0, 0.0)];
        let placement = search.place(CAMERA, 0.0, &existing, &mut rng);
        assert!(placement.is_fallback());
    }

    #[test]
    fn fallback_is_reproducible_for_a_seed() {
        let search = PlacementSearch::new(PlacementConfig {
            max_attempts: 1,
            min_separation_m: 500.0,
            ..Default::default()
        })
        .unwrap();
        let existing = [CAMERA];
        let first = search.place(CAMERA, 180.0, &existing, &mut StdRng::seed_from_u64(99));
        let second = search.place(CAMERA, 180.0, &existing, &mut StdRng::seed_from_u64(99));
        assert_eq!(first, second);
    }

    struct FixedStrategy(Vec<Candidate>);

    impl CandidateStrategy for FixedStrategy {
        fn candidate(&self, attempt: usize) -> Candidate {
            self.0[attempt % self.0.len()]
        }
    }

    #[test]
    fn custom_strategy_is_searched_in_order() {
        let search = PlacementSearch::default();
        let geo = search.geodesy;
        let existing = [geo.destination(CAMERA, 0.0, 10.0)];
        let strategy = FixedStrategy(vec![
            Candidate {
                bearing_deg: 0.0,
                distance_m: 10.5,
            },
            Candidate {
                bearing_deg: -10.0,
                distance_m: 15.0,
            },
        ]);
        let mut rng = StdRng::seed_from_u64(0);
        let placement = search.place_with(&strategy, CAMERA, 0.0, &existing, &mut rng);

        assert_eq!(placement.outcome, PlacementOutcome::Accepted { attempt: 1 });
        assert_eq!(placement.bearing_deg, 350.0);
        assert_eq!(placement.distance_m, 15.0);
    }

    #[test]
    fn inverted_distance_band_is_rejected_at_construction() {
        let config = PlacementConfig {
            base_distance_m: 10.0,
            max_distance_m: 5.0,
            max_attempts: 0,
            ..Default::default()
        };
        assert!(matches!(
            PlacementSearch::new(config),
            Err(crate::prelude::PlacementError::InvalidConfig(_))
        ));
    }

    #[test]
    fn non_finite_facing_falls_back_without_panicking() {
        let search = PlacementSearch::new(PlacementConfig {
            max_attempts: 1,
            min_separation_m: 1e6,
            ..Default::default()
        })
        .unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let placement = search.place(CAMERA, f64::NAN, &[CAMERA], &mut rng);
        assert!(placement.is_fallback());
        assert!(placement.point.longitude.is_nan());
    }
}
