//! Mirrors a [`SolarSystem`] into a [`Scene`], once at startup and then every
//! frame.

use std::path::PathBuf;

use glam::Vec3;
use orrery_mesh::Shape;
use orrery_orbit::{BodyId, BodyKind, SolarSystem};

use crate::appearance::appearance_for;
use crate::error::SceneError;
use crate::graph::{NodeId, Scene};
use crate::light::{AmbientLight, PointLight};
use crate::material::MeshFactory;

/// Tessellation and asset settings used when building the scene.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneOptions {
    pub texture_dir: PathBuf,
    pub sphere_segments: u32,
    pub ring_segments: u32,
    pub sun_light_intensity: f32,
    pub ambient_intensity: f32,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            texture_dir: PathBuf::from("texture"),
            sphere_segments: 20,
            ring_segments: 64,
            sun_light_intensity: 1.0,
            ambient_intensity: 0.15,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BindError<E> {
    #[error("failed to create mesh for '{body}'")]
    Mesh {
        body: String,
        #[source]
        source: E,
    },

    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Body-to-node mapping. Indexed by body traversal position.
#[derive(Clone, Debug)]
pub struct SceneBinding {
    nodes: Vec<NodeId>,
    sun: Option<NodeId>,
}

impl SceneBinding {
    /// Creates one node and mesh per body, mirroring the body hierarchy.
    ///
    /// The first star gets the scene's point light.
    pub fn build<F: MeshFactory>(
        system: &SolarSystem,
        factory: &mut F,
        options: &SceneOptions,
    ) -> Result<(Scene, Self), BindError<F::Error>> {
        let mut scene = Scene::new();
        scene.ambient = AmbientLight {
            intensity: options.ambient_intensity,
            ..AmbientLight::default()
        };
        let mut nodes = Vec::with_capacity(system.len());
        let mut sun = None;

        for body in system.bodies() {
            let shape = match body.kind {
                BodyKind::Ring {
                    inner_radius,
                    outer_radius,
                } => Shape::ring(
                    inner_radius as f32,
                    outer_radius as f32,
                    options.ring_segments,
                ),
                _ => Shape::sphere(body.radius as f32, options.sphere_segments),
            };
            let material = appearance_for(&body.name).material(&options.texture_dir);
            let mesh = factory
                .create_mesh(&shape, &material)
                .map_err(|source| BindError::Mesh {
                    body: body.name.clone(),
                    source,
                })?;

            let node = scene.add_node(body.name.clone(), *body.transform());
            scene.set_mesh(node, mesh)?;
            if let Some(parent) = body.parent {
                scene.add_child(nodes[parent.index()], node)?;
            }
            if body.kind == BodyKind::Star && sun.is_none() {
                scene.add_point_light(PointLight::attached(
                    node,
                    Vec3::ONE,
                    options.sun_light_intensity,
                ));
                sun = Some(node);
            }
            nodes.push(node);
        }

        log::info!(
            "scene built: {} nodes, {} point lights",
            scene.len(),
            scene.point_lights().len()
        );
        Ok((scene, Self { nodes, sun }))
    }

    /// Scene node that mirrors `body`.
    pub fn node_for(&self, body: BodyId) -> Option<NodeId> {
        self.nodes.get(body.index()).copied()
    }

    /// Node carrying the point light, if the system has a star.
    pub fn sun_node(&self) -> Option<NodeId> {
        self.sun
    }

    /// Copies every body's local transform into its node.
    pub fn sync(&self, system: &SolarSystem, scene: &mut Scene) -> Result<(), SceneError> {
        for (body, &node) in system.bodies().iter().zip(&self.nodes) {
            scene.set_local(node, *body.transform())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::{Material, MaterialKind, MeshHandle};
    use orrery_orbit::{OrbitalAnimator, RateParams, ScaleParams, catalog};
    use std::convert::Infallible;

    #[derive(Default)]
    struct RecordingFactory {
        created: Vec<(Shape, Material)>,
    }

    impl MeshFactory for RecordingFactory {
        type Error = Infallible;

        fn create_mesh(
            &mut self,
            shape: &Shape,
            material: &Material,
        ) -> Result<MeshHandle, Infallible> {
            self.created.push((*shape, material.clone()));
            Ok(MeshHandle(self.created.len() as u32 - 1))
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("out of buffers")]
    struct OutOfBuffers;

    struct FailingFactory;

    impl MeshFactory for FailingFactory {
        type Error = OutOfBuffers;

        fn create_mesh(&mut self, _: &Shape, _: &Material) -> Result<MeshHandle, OutOfBuffers> {
            Err(OutOfBuffers)
        }
    }

    fn system() -> SolarSystem {
        SolarSystem::from_catalog(&ScaleParams::default(), &RateParams::default()).unwrap()
    }

    #[test]
    fn test_build_mirrors_hierarchy() {
        let system = system();
        let mut factory = RecordingFactory::default();
        let (scene, binding) =
            SceneBinding::build(&system, &mut factory, &SceneOptions::default()).unwrap();

        assert_eq!(scene.len(), system.len());
        assert_eq!(factory.created.len(), system.len());

        let earth = binding.node_for(system.find(catalog::EARTH).unwrap()).unwrap();
        let moon = binding.node_for(system.find(catalog::MOON).unwrap()).unwrap();
        assert_eq!(scene.node(moon).unwrap().parent(), Some(earth));
        // Planets hang off the origin, not the Sun.
        assert_eq!(scene.node(earth).unwrap().parent(), None);
    }

    #[test]
    fn test_ring_and_sun_meshes() {
        let system = system();
        let mut factory = RecordingFactory::default();
        let options = SceneOptions {
            sphere_segments: 12,
            ..SceneOptions::default()
        };
        SceneBinding::build(&system, &mut factory, &options).unwrap();

        let (sun_shape, sun_material) = &factory.created[0];
        assert_eq!(sun_material.kind, MaterialKind::Basic);
        assert!(matches!(
            sun_shape,
            Shape::Sphere {
                width_segments: 12,
                ..
            }
        ));

        let ring_index = system.find(catalog::SATURN_RING).unwrap().index();
        let (ring_shape, ring_material) = &factory.created[ring_index];
        assert!(ring_material.transparent);
        let saturn_radius = system
            .body(system.find(catalog::SATURN).unwrap())
            .unwrap()
            .radius as f32;
        match ring_shape {
            Shape::Ring {
                inner_radius,
                outer_radius,
                ..
            } => {
                assert!((inner_radius / saturn_radius - 1.1).abs() < 1e-5);
                assert!((outer_radius / saturn_radius - 1.3).abs() < 1e-5);
            }
            other => panic!("expected ring, got {other:?}"),
        }
    }

    #[test]
    fn test_sun_carries_point_light() {
        let system = system();
        let (scene, binding) = SceneBinding::build(
            &system,
            &mut RecordingFactory::default(),
            &SceneOptions::default(),
        )
        .unwrap();
        let sun = binding.sun_node().unwrap();
        assert_eq!(scene.point_lights().len(), 1);
        assert_eq!(scene.point_lights()[0].attached_to, Some(sun));
    }

    #[test]
    fn test_sync_follows_animation() {
        let mut system = system();
        let (mut scene, binding) = SceneBinding::build(
            &system,
            &mut RecordingFactory::default(),
            &SceneOptions::default(),
        )
        .unwrap();

        OrbitalAnimator::new().advance(&mut system, 500);
        binding.sync(&system, &mut scene).unwrap();

        for id in system.ids() {
            let node = binding.node_for(id).unwrap();
            assert!(
                scene
                    .world_transform(node)
                    .approx_eq(&system.world_transform(id).unwrap(), 1e-9)
            );
        }
    }

    #[test]
    fn test_factory_error_names_body() {
        let err = SceneBinding::build(&system(), &mut FailingFactory, &SceneOptions::default())
            .unwrap_err();
        match err {
            BindError::Mesh { body, .. } => assert_eq!(body, catalog::SUN),
            other => panic!("unexpected error {other:?}"),
        }
    }
}
