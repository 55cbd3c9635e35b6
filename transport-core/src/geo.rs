//! Great-circle distance and the linear distance tariff.

use serde::{Deserialize, Serialize};

use crate::{Amount, TransportConfig};

/// Latitude and longitude in degrees. No range validation is applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Unrounded haversine distance on a sphere of the given radius.
pub fn haversine_km(a: Coordinate, b: Coordinate, radius_km: f64) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    // abs() keeps the result bit-identical when the endpoints are swapped.
    let half_dlat = (lat_b - lat_a).abs() / 2.0;
    let half_dlon = (b.longitude - a.longitude).abs().to_radians() / 2.0;

    let h = half_dlat.sin().powi(2) + lat_a.cos() * lat_b.cos() * half_dlon.sin().powi(2);
    // Rounding can push h just past 1 for antipodal points.
    let h = if h > 1.0 { 1.0 } else { h };
    let central_angle = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    radius_km * central_angle
}

/// Distance in kilometres rounded to two decimals.
pub fn distance_km(a: Coordinate, b: Coordinate, config: &TransportConfig) -> f64 {
    round_to_hundredths(haversine_km(a, b, config.earth_radius_km))
}

/// `round(distance * tariff)` to whole units. Zero, negative, or NaN input
/// costs nothing; an overflowing product saturates at [`Amount::MAX`].
pub fn tariff_cost(distance_km: f64, config: &TransportConfig) -> Amount {
    let raw = (distance_km * config.tariff_per_km).round();
    if raw > 0.0 {
        raw.min(Amount::MAX)
    } else {
        0.0
    }
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const CHENNAI: Coordinate = Coordinate {
        latitude: 13.08,
        longitude: 80.27,
    };
    const MADURAI: Coordinate = Coordinate {
        latitude: 9.93,
        longitude: 78.12,
    };

    #[test]
    fn chennai_to_madurai() {
        let config = TransportConfig::default();
        let distance = distance_km(CHENNAI, MADURAI, &config);
        assert!((distance - 421.37).abs() < 1e-9, "got {distance}");
        assert_eq!(tariff_cost(distance, &config), 421_370.0);
    }

    #[test]
    fn self_distance_is_zero() {
        let config = TransportConfig::default();
        assert_eq!(distance_km(CHENNAI, CHENNAI, &config), 0.0);
        assert_eq!(tariff_cost(0.0, &config), 0.0);
    }

    #[test]
    fn tariff_follows_configured_rate() {
        let config = TransportConfig {
            tariff_per_km: 2.5,
            ..TransportConfig::default()
        };
        assert_eq!(tariff_cost(10.0, &config), 25.0);
        assert_eq!(tariff_cost(0.19, &config), 0.0);
        assert_eq!(tariff_cost(0.2, &config), 1.0);
    }

    #[test]
    fn degenerate_input_never_panics() {
        let config = TransportConfig::default();
        let broken = Coordinate::new(f64::NAN, 80.0);
        assert!(distance_km(broken, MADURAI, &config).is_nan());
        assert_eq!(tariff_cost(f64::NAN, &config), 0.0);
        assert_eq!(tariff_cost(f64::NEG_INFINITY, &config), 0.0);
        assert_eq!(tariff_cost(-3.0, &config), 0.0);
    }

    #[test]
    fn overflowing_tariff_saturates() {
        let config = TransportConfig {
            tariff_per_km: f64::MAX,
            ..TransportConfig::default()
        };
        assert_eq!(tariff_cost(421.37, &config), f64::MAX);
        assert_eq!(tariff_cost(f64::INFINITY, &TransportConfig::default()), f64::MAX);
    }

    #[test]
    fn antipodes_stay_finite() {
        let config = TransportConfig::default();
        let distance = distance_km(Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 180.0), &config);
        assert!((distance - 20015.09).abs() < 0.01, "got {distance}");
    }

    fn coordinate() -> impl Strategy<Value = Coordinate> {
        (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lng)| Coordinate::new(lat, lng))
    }

    proptest! {
        #[test]
        fn distance_is_symmetric(a in coordinate(), b in coordinate()) {
            let config = TransportConfig::default();
            prop_assert_eq!(distance_km(a, b, &config), distance_km(b, a, &config));
            prop_assert!(tariff_cost(distance_km(a, b, &config), &config) >= 0.0);
        }

        #[test]
        fn self_distance_is_always_zero(a in coordinate()) {
            prop_assert_eq!(distance_km(a, a, &TransportConfig::default()), 0.0);
        }

        #[test]
        fn cost_is_monotonic(d1 in 0.0f64..25_000.0, d2 in 0.0f64..25_000.0) {
            let config = TransportConfig::default();
            let (near, far) = if d1 <= d2 { (d1, d2) } else { (d2, d1) };
            prop_assert!(tariff_cost(near, &config) <= tariff_cost(far, &config));
        }
    }
}
