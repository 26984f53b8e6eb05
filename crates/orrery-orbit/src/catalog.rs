//! Fixed constants for the bodies of the solar system.
//!
//! Sizes are ratios of Earth's radius, distances ratios of Earth's orbital
//! distance, periods in Earth days or Earth years. Entries are listed so that
//! every parent and pivot precedes the bodies that reference it.

use crate::body::Direction;
use crate::rates::{OrbitalPeriod, SpinMode};

pub const SUN: &str = "Sun";
pub const MERCURY: &str = "Mercury";
pub const VENUS: &str = "Venus";
pub const EARTH: &str = "Earth";
pub const MOON: &str = "Moon";
pub const MARS: &str = "Mars";
pub const JUPITER: &str = "Jupiter";
pub const SATURN: &str = "Saturn";
pub const SATURN_RING: &str = "Saturn Ring";
pub const URANUS: &str = "Uranus";
pub const NEPTUNE: &str = "Neptune";

/// Moon's sidereal rotation and orbital period, in Earth days.
pub const MOON_PERIOD_DAYS: f64 = 27.32;

/// Broad category of a catalog entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Class {
    Star,
    Planet,
    Moon,
    Ring,
}

/// Size of a body relative to Earth, or to its parent for rings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Extent {
    /// Radius as a multiple of Earth's.
    Sphere(f64),
    /// Radius as a multiple of Earth's, then scaled by the sun compression.
    CompressedSphere(f64),
    /// Annulus radii as multiples of the parent's radius.
    Ring { inner: f64, outer: f64 },
}

/// Initial offset of a body from its pivot, along `-Z`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Distance {
    /// Sits on its pivot.
    Center,
    /// Multiple of Earth's orbital distance.
    EarthDistances(f64),
    /// Multiple of Earth's radius.
    EarthRadii(f64),
}

/// One catalog entry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodySpec {
    pub name: &'static str,
    pub class: Class,
    /// Frame the body lives in. `None` is the world frame.
    pub parent: Option<&'static str>,
    /// Body revolved around. `None` is the world origin.
    pub pivot: Option<&'static str>,
    pub extent: Extent,
    pub distance: Distance,
    pub spin: SpinMode,
    /// `None` for bodies that do not revolve.
    pub orbit: Option<OrbitalPeriod>,
    pub rotation: Direction,
    pub revolution: Direction,
}

const fn planet(
    name: &'static str,
    radius: f64,
    distance: f64,
    rotation_days: f64,
    orbit: OrbitalPeriod,
    rotation: Direction,
) -> BodySpec {
    BodySpec {
        name,
        class: Class::Planet,
        parent: None,
        pivot: Some(SUN),
        extent: Extent::Sphere(radius),
        distance: Distance::EarthDistances(distance),
        spin: SpinMode::Free {
            period_days: rotation_days,
        },
        orbit: Some(orbit),
        rotation,
        revolution: Direction::Prograde,
    }
}

/// The solar system, Sun first.
pub const CATALOG: &[BodySpec] = &[
    BodySpec {
        name: SUN,
        class: Class::Star,
        parent: None,
        pivot: None,
        extent: Extent::CompressedSphere(109.0),
        distance: Distance::Center,
        spin: SpinMode::Free { period_days: 25.38 },
        orbit: None,
        rotation: Direction::Prograde,
        revolution: Direction::Prograde,
    },
    planet(MERCURY, 0.38, 0.39, 58.6, OrbitalPeriod::Days(87.97), Direction::Prograde),
    planet(VENUS, 0.95, 0.72, 243.0, OrbitalPeriod::Days(224.7), Direction::Retrograde),
    planet(EARTH, 1.0, 1.0, 1.0, OrbitalPeriod::Years(1.0), Direction::Prograde),
    BodySpec {
        name: MOON,
        class: Class::Moon,
        parent: Some(EARTH),
        pivot: Some(EARTH),
        extent: Extent::Sphere(0.27),
        distance: Distance::EarthRadii(5.0),
        spin: SpinMode::TidallyLocked {
            period_days: MOON_PERIOD_DAYS,
        },
        orbit: Some(OrbitalPeriod::Days(MOON_PERIOD_DAYS)),
        rotation: Direction::Prograde,
        revolution: Direction::Prograde,
    },
    planet(MARS, 0.53, 1.52, 1.03, OrbitalPeriod::Years(1.88), Direction::Prograde),
    planet(JUPITER, 11.21, 5.19, 0.41, OrbitalPeriod::Years(11.86), Direction::Prograde),
    planet(SATURN, 9.45, 9.54, 0.45, OrbitalPeriod::Years(29.46), Direction::Prograde),
    BodySpec {
        name: SATURN_RING,
        class: Class::Ring,
        parent: Some(SATURN),
        pivot: Some(SATURN),
        extent: Extent::Ring {
            inner: 1.1,
            outer: 1.3,
        },
        distance: Distance::Center,
        spin: SpinMode::Fixed,
        orbit: None,
        rotation: Direction::Prograde,
        revolution: Direction::Prograde,
    },
    planet(URANUS, 4.01, 19.19, 0.72, OrbitalPeriod::Years(84.01), Direction::Retrograde),
    planet(NEPTUNE, 3.88, 30.07, 0.67, OrbitalPeriod::Years(164.8), Direction::Prograde),
];

/// Looks up a catalog entry by name.
pub fn spec(name: &str) -> Option<&'static BodySpec> {
    CATALOG.iter().find(|s| s.name == name)
}
