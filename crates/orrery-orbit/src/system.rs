//! The [`SolarSystem`] aggregate and its builder.

use glam::DVec3;
use orrery_math::Transform;

use crate::body::{Body, BodyId, BodyKind, Direction, Pivot};
use crate::catalog::{BodySpec, CATALOG, Class, Distance, Extent};
use crate::error::SystemError;
use crate::rates::RateParams;
use crate::scale::ScaleParams;

/// Everything needed to add one body to a [`SystemBuilder`].
///
/// The body starts `orbital_radius` units from its pivot along `-Z`, with an
/// identity orientation.
#[derive(Clone, Debug)]
pub struct BodyDesc {
    pub name: String,
    pub kind: BodyKind,
    pub radius: f64,
    pub orbital_radius: f64,
    pub axial_spin_rate: f64,
    pub revolution_rate: f64,
    pub rotation_direction: Direction,
    pub revolution_direction: Direction,
    pub parent: Option<BodyId>,
    pub pivot: Pivot,
}

impl BodyDesc {
    /// A motionless body at the world origin.
    pub fn new(name: impl Into<String>, kind: BodyKind, radius: f64) -> Self {
        Self {
            name: name.into(),
            kind,
            radius,
            orbital_radius: 0.0,
            axial_spin_rate: 0.0,
            revolution_rate: 0.0,
            rotation_direction: Direction::Prograde,
            revolution_direction: Direction::Prograde,
            parent: None,
            pivot: Pivot::Origin,
        }
    }

    /// Sets the unsigned spin per frame and its sense.
    pub fn spin(mut self, rate: f64, direction: Direction) -> Self {
        self.axial_spin_rate = rate;
        self.rotation_direction = direction;
        self
    }

    /// Revolves the body `radius` units from `pivot`, `rate` radians per frame.
    pub fn orbit(mut self, pivot: Pivot, radius: f64, rate: f64, direction: Direction) -> Self {
        self.pivot = pivot;
        self.orbital_radius = radius;
        self.revolution_rate = rate;
        self.revolution_direction = direction;
        self
    }

    /// Expresses the body's transform in `parent`'s frame.
    pub fn child_of(mut self, parent: BodyId) -> Self {
        self.parent = Some(parent);
        self
    }
}

/// Accumulates bodies in traversal order, checking references as it goes.
#[derive(Default)]
pub struct SystemBuilder {
    bodies: Vec<Body>,
}

impl SystemBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a body. Its parent and pivot must already have been added.
    pub fn add(&mut self, desc: BodyDesc) -> Result<BodyId, SystemError> {
        if self.bodies.iter().any(|b| b.name == desc.name) {
            return Err(SystemError::DuplicateName(desc.name));
        }
        let known = |id: BodyId| id.0 < self.bodies.len();
        if let Some(parent) = desc.parent
            && !known(parent)
        {
            return Err(SystemError::UnknownBody {
                name: desc.name,
                id: parent,
            });
        }
        if let Pivot::Body(pivot) = desc.pivot
            && !known(pivot)
        {
            return Err(SystemError::UnknownBody {
                name: desc.name,
                id: pivot,
            });
        }

        let pivot_local = pivot_in_parent(&self.bodies, desc.pivot, desc.parent);
        let transform =
            Transform::from_position(pivot_local + DVec3::new(0.0, 0.0, -desc.orbital_radius));

        let id = BodyId(self.bodies.len());
        self.bodies.push(Body {
            name: desc.name,
            kind: desc.kind,
            radius: desc.radius,
            orbital_radius: desc.orbital_radius,
            axial_spin_rate: desc.axial_spin_rate,
            revolution_rate: desc.revolution_rate,
            rotation_direction: desc.rotation_direction,
            revolution_direction: desc.revolution_direction,
            parent: desc.parent,
            pivot: desc.pivot,
            transform,
            initial: transform,
            spin_angle: 0.0,
            revolution_angle: 0.0,
        });
        Ok(id)
    }

    /// Finishes the system. Every reference was checked by [`add`](Self::add).
    pub fn build(self) -> SolarSystem {
        SolarSystem {
            bodies: self.bodies,
        }
    }
}

/// Owns every body, in an order where parents and pivots come first.
#[derive(Clone, Debug)]
pub struct SolarSystem {
    pub(crate) bodies: Vec<Body>,
}

impl SolarSystem {
    /// Starts an empty [`SystemBuilder`].
    pub fn builder() -> SystemBuilder {
        SystemBuilder::new()
    }

    /// Builds the full solar system from [`CATALOG`].
    pub fn from_catalog(scale: &ScaleParams, rates: &RateParams) -> Result<Self, SystemError> {
        Self::from_specs(CATALOG, scale, rates)
    }

    /// Builds a system from catalog-style entries, resolving names in order.
    pub fn from_specs(
        specs: &[BodySpec],
        scale: &ScaleParams,
        rates: &RateParams,
    ) -> Result<Self, SystemError> {
        let mut builder = SystemBuilder::new();
        for spec in specs {
            let parent = builder.resolve(spec.name, spec.parent)?;
            let pivot = builder
                .resolve(spec.name, spec.pivot)?
                .map_or(Pivot::Origin, Pivot::Body);

            let parent_radius = parent.map_or(0.0, |p| builder.bodies[p.0].radius);
            let (kind, radius) = match spec.extent {
                Extent::Sphere(ratio) => (class_kind(spec.class), scale.radius(ratio)),
                Extent::CompressedSphere(ratio) => {
                    (class_kind(spec.class), scale.compressed_radius(ratio))
                }
                Extent::Ring { inner, outer } => (
                    BodyKind::Ring {
                        inner_radius: parent_radius * inner,
                        outer_radius: parent_radius * outer,
                    },
                    parent_radius * outer,
                ),
            };
            let orbital_radius = match spec.distance {
                Distance::Center => 0.0,
                Distance::EarthDistances(ratio) => scale.distance(ratio),
                Distance::EarthRadii(ratio) => scale.radius(ratio),
            };
            let parent_spin = parent.map_or(0.0, |p| builder.bodies[p.0].spin_step());
            let spin = rates.spin_for(spec.spin, parent_spin);
            let revolution = spec.orbit.map_or(0.0, |period| rates.revolution_rate(period));

            let desc = BodyDesc::new(spec.name, kind, radius)
                .spin(spin, spec.rotation)
                .orbit(pivot, orbital_radius, revolution, spec.revolution);
            let desc = match parent {
                Some(p) => desc.child_of(p),
                None => desc,
            };
            builder.add(desc)?;
        }
        let system = builder.build();
        log::debug!("built solar system with {} bodies", system.len());
        Ok(system)
    }

    /// Number of bodies.
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Bodies in traversal order.
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Every id, in traversal order.
    pub fn ids(&self) -> impl Iterator<Item = BodyId> {
        (0..self.bodies.len()).map(BodyId)
    }

    /// `None` for an id this system never issued.
    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id.0)
    }

    /// Looks a body up by its exact name.
    pub fn find(&self, name: &str) -> Option<BodyId> {
        find_in(&self.bodies, name)
    }

    /// World-space transform, composed along the parent chain. `None` for an
    /// id this system never issued.
    pub fn world_transform(&self, id: BodyId) -> Option<Transform> {
        self.body(id)?;
        Some(world_transform_in(&self.bodies, id))
    }

    /// World-space position of a revolution pivot. `None` if the pivot body
    /// is not part of this system.
    pub fn pivot_position(&self, pivot: Pivot) -> Option<DVec3> {
        match pivot {
            Pivot::Origin => Some(DVec3::ZERO),
            Pivot::Body(id) => self.world_transform(id).map(|t| t.position),
        }
    }

    /// Restores every initial transform and zeroes the angle accumulators.
    pub fn reset(&mut self) {
        for body in &mut self.bodies {
            body.transform = body.initial;
            body.spin_angle = 0.0;
            body.revolution_angle = 0.0;
        }
        log::info!("solar system reset");
    }
}

impl SystemBuilder {
    fn find(&self, name: &str) -> Option<BodyId> {
        find_in(&self.bodies, name)
    }

    /// Looks up a catalog reference made by `owner`.
    fn resolve(&self, owner: &str, name: Option<&str>) -> Result<Option<BodyId>, SystemError> {
        let Some(name) = name else {
            return Ok(None);
        };
        self.find(name)
            .map(Some)
            .ok_or_else(|| SystemError::UnresolvedName {
                name: owner.to_string(),
                missing: name.to_string(),
            })
    }
}

fn class_kind(class: Class) -> BodyKind {
    match class {
        Class::Star => BodyKind::Star,
        Class::Planet => BodyKind::Planet,
        Class::Moon => BodyKind::Moon,
        Class::Ring => BodyKind::Ring {
            inner_radius: 0.0,
            outer_radius: 0.0,
        },
    }
}

fn find_in(bodies: &[Body], name: &str) -> Option<BodyId> {
    bodies.iter().position(|b| b.name == name).map(BodyId)
}

/// Callers pass ids the builder has already checked against `bodies`, and
/// every parent precedes its child, so indexing cannot go out of range.
pub(crate) fn world_transform_in(bodies: &[Body], id: BodyId) -> Transform {
    let body = &bodies[id.0];
    let mut world = body.transform;
    let mut next = body.parent;
    while let Some(parent) = next {
        let p = &bodies[parent.0];
        world = p.transform * world;
        next = p.parent;
    }
    world
}

/// Pivot position expressed in `parent`'s frame.
pub(crate) fn pivot_in_parent(bodies: &[Body], pivot: Pivot, parent: Option<BodyId>) -> DVec3 {
    let world = match pivot {
        Pivot::Origin => DVec3::ZERO,
        Pivot::Body(id) => world_transform_in(bodies, id).position,
    };
    match parent {
        Some(p) => world_transform_in(bodies, p).inverse_transform_point(world),
        None => world,
    }
}
