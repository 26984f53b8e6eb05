//! Celestial bodies, the solar-system aggregate, and the per-frame orbital animator.
//!
//! Every body spins about its own vertical axis and revolves about a pivot by
//! fixed angular increments per frame. There is no gravity here: rates come
//! from real rotation/orbital periods scaled to an arbitrary per-frame
//! "Earth day" angle, and sizes come from real ratios scaled to Earth.

pub mod animator;
pub mod body;
pub mod catalog;
pub mod error;
pub mod rates;
pub mod scale;
pub mod system;

pub use animator::{OrbitalAnimator, VERTICAL_AXIS};
pub use body::{Body, BodyId, BodyKind, Direction, Pivot};
pub use catalog::{BodySpec, CATALOG, Class, Distance, Extent};
pub use error::SystemError;
pub use rates::{DAYS_PER_YEAR, DEFAULT_EARTH_DAY, OrbitalPeriod, RateParams, SpinMode};
pub use scale::ScaleParams;
pub use system::{BodyDesc, SolarSystem, SystemBuilder};
