//! The [`Body`] record and its small supporting types.

use orrery_math::Transform;

/// Index of a body inside its [`SolarSystem`](crate::SolarSystem).
///
/// Ids are handed out in insertion order, which is also the update order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub(crate) usize);

impl BodyId {
    /// Position of the body in traversal order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Sense of rotation relative to the prograde bodies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Direction {
    /// Counter-clockwise seen from `+Y`, like most of the solar system.
    #[default]
    Prograde,
    /// Clockwise seen from `+Y` (Venus and Uranus spin this way).
    Retrograde,
}

impl Direction {
    /// `+1.0` for prograde, `-1.0` for retrograde.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Prograde => 1.0,
            Direction::Retrograde => -1.0,
        }
    }
}

/// What a body is, and for rings, how wide it is.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BodyKind {
    /// Emits the scene's point light and is drawn unlit.
    Star,
    Planet,
    /// Orbits a planet rather than the Sun.
    Moon,
    /// A flat annulus. Radii are absolute, in scene units.
    Ring { inner_radius: f64, outer_radius: f64 },
}

/// The point a body revolves around.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Pivot {
    /// The world origin.
    #[default]
    Origin,
    /// Another body's world position, read at the moment of each update.
    Body(BodyId),
}

/// One celestial object with its orbital parameters and current transform.
#[derive(Clone, Debug)]
pub struct Body {
    pub name: String,
    pub kind: BodyKind,
    /// Sphere radius, or the outer radius for rings.
    pub radius: f64,
    /// Distance from the pivot at creation time.
    pub orbital_radius: f64,
    /// Radians per frame about the local vertical axis, before `rotation_direction`.
    pub axial_spin_rate: f64,
    /// Radians per frame about the pivot, before `revolution_direction`.
    pub revolution_rate: f64,
    pub rotation_direction: Direction,
    pub revolution_direction: Direction,
    /// Frame this body's transform is expressed in. `None` is the world frame.
    pub parent: Option<BodyId>,
    /// Point this body revolves around.
    pub pivot: Pivot,
    pub(crate) transform: Transform,
    pub(crate) initial: Transform,
    pub(crate) spin_angle: f64,
    pub(crate) revolution_angle: f64,
}

impl Body {
    /// Transform relative to the parent frame.
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Transform the body was created with.
    pub fn initial_transform(&self) -> &Transform {
        &self.initial
    }

    /// Signed spin applied per frame.
    pub fn spin_step(&self) -> f64 {
        self.rotation_direction.sign() * self.axial_spin_rate
    }

    /// Signed revolution applied per frame.
    pub fn revolution_step(&self) -> f64 {
        self.revolution_direction.sign() * self.revolution_rate
    }

    /// Cumulative axial spin in `[0, 2π)`.
    pub fn spin_angle(&self) -> f64 {
        self.spin_angle
    }

    /// Cumulative revolution in `[0, 2π)`.
    pub fn revolution_angle(&self) -> f64 {
        self.revolution_angle
    }

    /// Inner and outer radii for rings, `None` for spheres.
    pub fn ring_radii(&self) -> Option<(f64, f64)> {
        match self.kind {
            BodyKind::Ring {
                inner_radius,
                outer_radius,
            } => Some((inner_radius, outer_radius)),
            _ => None,
        }
    }
}
