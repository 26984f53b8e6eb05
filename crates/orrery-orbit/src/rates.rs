//! Per-frame angular rates derived from real periods.
//!
//! The base unit is [`RateParams::earth_day`], the angle Earth turns about its
//! own axis in one frame. Everything else is that angle divided by a period
//! measured in Earth days, or the derived Earth-year angle divided by a period
//! measured in Earth years.

/// Angle per frame for one Earth rotation, in radians.
pub const DEFAULT_EARTH_DAY: f64 = 0.02;

/// Earth days per Earth year.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// A sidereal period, in whichever unit the catalog records it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OrbitalPeriod {
    Days(f64),
    Years(f64),
}

/// How a body turns about its own axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpinMode {
    /// Spins once per `period_days`.
    Free { period_days: f64 },
    /// Same period, minus the parent's inherited spin, so the net turn in the
    /// composed frame is `earth_day / period_days`.
    TidallyLocked { period_days: f64 },
    /// Does not spin on its own (rings ride along with their parent).
    Fixed,
}

/// Base angles the whole system is scaled against.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RateParams {
    pub earth_day: f64,
}

impl Default for RateParams {
    fn default() -> Self {
        Self {
            earth_day: DEFAULT_EARTH_DAY,
        }
    }
}

impl RateParams {
    /// `earth_day` is the angle Earth spins per frame.
    pub fn new(earth_day: f64) -> Self {
        Self { earth_day }
    }

    /// Angle per frame for one Earth revolution about the Sun.
    pub fn earth_year(&self) -> f64 {
        self.earth_day / DAYS_PER_YEAR
    }

    /// Spin per frame for a body that rotates once every `period_days`.
    pub fn spin_rate(&self, period_days: f64) -> f64 {
        self.earth_day / period_days
    }

    /// Revolution per frame for the given orbital period.
    ///
    /// Day periods scale against the Earth day, year periods against the Earth
    /// year. Both agree for the same physical period.
    pub fn revolution_rate(&self, period: OrbitalPeriod) -> f64 {
        match period {
            OrbitalPeriod::Days(days) => self.earth_day / days,
            OrbitalPeriod::Years(years) => self.earth_year() / years,
        }
    }

    /// Unsigned local spin rate for a spin mode.
    ///
    /// `parent_spin` is the parent's signed spin step; only tidally locked
    /// bodies use it.
    pub fn spin_for(&self, mode: SpinMode, parent_spin: f64) -> f64 {
        match mode {
            SpinMode::Free { period_days } => self.spin_rate(period_days),
            SpinMode::TidallyLocked { period_days } => self.spin_rate(period_days) - parent_spin,
            SpinMode::Fixed => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_earth_spins_one_day_per_day() {
        let rates = RateParams::default();
        assert_eq!(rates.spin_rate(1.0), DEFAULT_EARTH_DAY);
    }

    #[test]
    fn test_mercury_spin_rate() {
        let rates = RateParams::default();
        let mercury = rates.spin_rate(58.6);
        assert!((mercury * 1000.0 - 20.0 / 58.6).abs() < 1e-12);
    }

    #[test]
    fn test_day_and_year_periods_agree() {
        let rates = RateParams::new(0.05);
        let by_days = rates.revolution_rate(OrbitalPeriod::Days(11.86 * DAYS_PER_YEAR));
        let by_years = rates.revolution_rate(OrbitalPeriod::Years(11.86));
        assert!((by_days - by_years).abs() < 1e-15);
    }

    #[test]
    fn test_earth_year_is_one_year_revolution() {
        let rates = RateParams::default();
        assert_eq!(
            rates.revolution_rate(OrbitalPeriod::Years(1.0)),
            rates.earth_year()
        );
    }

    #[test]
    fn test_tidal_lock_cancels_parent_spin() {
        let rates = RateParams::default();
        let earth_spin = rates.spin_rate(1.0);
        let moon = rates.spin_for(SpinMode::TidallyLocked { period_days: 27.32 }, earth_spin);
        let moon_rotation = rates.spin_rate(27.32);
        assert!((moon - (moon_rotation - rates.earth_day)).abs() < 1e-15);
        assert!(moon < 0.0);
    }

    #[test]
    fn test_fixed_spin_is_zero() {
        let rates = RateParams::default();
        assert_eq!(rates.spin_for(SpinMode::Fixed, 0.3), 0.0);
    }
}
