//! Scene-unit sizes and distances derived from Earth's.

/// Default Earth radius in scene units.
pub const DEFAULT_EARTH_RADIUS: f64 = 2.0;
/// Default Earth-Sun distance in scene units.
pub const DEFAULT_EARTH_DISTANCE: f64 = 100.0;
/// Factor applied to the Sun's true relative radius.
pub const DEFAULT_SUN_COMPRESSION: f64 = 0.1;

/// Base lengths everything else is a ratio of.
///
/// Real ratios are kept between bodies, except the Sun, whose radius is
/// multiplied by `sun_compression` so the inner planets are not swallowed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleParams {
    pub earth_radius: f64,
    pub earth_distance: f64,
    pub sun_compression: f64,
}

impl Default for ScaleParams {
    fn default() -> Self {
        Self {
            earth_radius: DEFAULT_EARTH_RADIUS,
            earth_distance: DEFAULT_EARTH_DISTANCE,
            sun_compression: DEFAULT_SUN_COMPRESSION,
        }
    }
}

impl ScaleParams {
    /// Radius of a sphere `ratio` times Earth's.
    pub fn radius(&self, ratio: f64) -> f64 {
        self.earth_radius * ratio
    }

    /// Radius of a sphere `ratio` times Earth's, then compressed.
    pub fn compressed_radius(&self, ratio: f64) -> f64 {
        self.radius(ratio) * self.sun_compression
    }

    /// Orbital distance `ratio` times Earth's.
    pub fn distance(&self, ratio: f64) -> f64 {
        self.earth_distance * ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let scale = ScaleParams::default();
        assert_eq!(scale.radius(1.0), 2.0);
        assert_eq!(scale.distance(1.0), 100.0);
    }

    #[test]
    fn test_sun_is_compressed_below_true_size() {
        let scale = ScaleParams::default();
        let sun = scale.compressed_radius(109.0);
        assert!((sun - 21.8).abs() < 1e-9);
        assert!(sun < scale.radius(109.0));
        // Larger than the terrestrial planets, but Jupiter (11.21x) edges past it.
        assert!(sun > scale.radius(1.0));
        assert!(sun < scale.radius(11.21));
    }

    #[test]
    fn test_jupiter_distance_ratio() {
        let scale = ScaleParams::default();
        assert!((scale.distance(5.19) - 519.0).abs() < 1e-9);
    }
}
