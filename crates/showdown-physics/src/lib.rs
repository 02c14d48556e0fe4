//! Showdown Physics - Map geometry queries using rapier3d
//!
//! Provides the static map the character moves through, the query capability
//! the locomotion code consumes, and a kinematic character body.

mod character_body;
mod query;

pub use character_body::{CharacterBody, CharacterBodyConfig};
pub use query::{GeometryQuery, MapLayers, ProbeHit};

use glam::Vec3;
use nalgebra::Unit;
use rapier3d::prelude::*;
use tracing::debug;

/// Static collision geometry for a map.
///
/// Colliders are tagged with [`MapLayers`] through their collision groups.
/// Call [`MapGeometry::finalize`] after adding colliders so queries see them.
pub struct MapGeometry {
    /// Rigid body storage (map colliders are parentless, so this stays empty)
    pub(crate) rigid_body_set: RigidBodySet,
    /// Collider storage
    pub(crate) collider_set: ColliderSet,
    /// Query pipeline for raycasts and shape overlap tests
    pub(crate) query_pipeline: QueryPipeline,
}

impl MapGeometry {
    /// Create an empty map
    pub fn new() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Rebuild the query acceleration structure after adding colliders
    pub fn finalize(&mut self) {
        self.query_pipeline.update(&self.collider_set);
        debug!("Map geometry finalized with {} colliders", self.collider_set.len());
    }

    /// Number of colliders in the map
    pub fn collider_count(&self) -> usize {
        self.collider_set.len()
    }

    /// Add a static collider on the given layer
    pub fn add_static_collider(&mut self, collider: Collider, layer: MapLayers) -> ColliderHandle {
        let mut collider = collider;
        collider.set_collision_groups(InteractionGroups::new(
            Group::from_bits_truncate(layer.bits()),
            Group::ALL,
        ));
        self.collider_set.insert(collider)
    }

    /// Get a collider by handle
    pub fn get_collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.collider_set.get(handle)
    }

    /// Create an infinite ground plane at height `y`
    pub fn create_ground(&mut self, y: f32) -> ColliderHandle {
        let normal = Unit::new_normalize(vector![0.0, 1.0, 0.0]);
        let ground = ColliderBuilder::halfspace(normal)
            .translation(vector![0.0, y, 0.0])
            .friction(0.0)
            .restitution(0.0)
            .build();
        self.add_static_collider(ground, MapLayers::GROUND)
    }

    /// Create a static axis-aligned box
    pub fn create_static_box(
        &mut self,
        half_extents: Vec3,
        position: Vec3,
        layer: MapLayers,
    ) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(vector![position.x, position.y, position.z])
            .friction(0.0)
            .build();
        self.add_static_collider(collider, layer)
    }

    /// Create a ramp: a box tilted around the Z axis by `angle_degrees`.
    ///
    /// Positive angles rise toward -X.
    pub fn create_ramp(
        &mut self,
        half_extents: Vec3,
        position: Vec3,
        angle_degrees: f32,
        layer: MapLayers,
    ) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(vector![position.x, position.y, position.z])
            .rotation(vector![0.0, 0.0, angle_degrees.to_radians()])
            .friction(0.0)
            .build();
        self.add_static_collider(collider, layer)
    }

    /// Create a trigger volume (ignored by map queries)
    pub fn create_trigger(&mut self, half_extents: Vec3, position: Vec3) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(vector![position.x, position.y, position.z])
            .sensor(true)
            .build();
        self.add_static_collider(collider, MapLayers::ALL)
    }

    /// Query filter matching map colliders on `layers`, skipping sensors
    pub(crate) fn filter(layers: MapLayers) -> QueryFilter<'static> {
        QueryFilter::default()
            .exclude_sensors()
            .groups(InteractionGroups::new(
                Group::ALL,
                Group::from_bits_truncate(layers.bits()),
            ))
    }

    /// Cast a ray and get detailed hit information
    pub fn raycast_detailed(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        layers: MapLayers,
    ) -> Option<RaycastHit> {
        let ray = Ray::new(
            point![origin.x, origin.y, origin.z],
            vector![direction.x, direction.y, direction.z],
        );

        self.query_pipeline
            .cast_ray_and_get_normal(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                max_distance,
                true,
                Self::filter(layers),
            )
            .map(|(handle, intersection)| RaycastHit {
                collider: handle,
                distance: intersection.time_of_impact,
                point: origin + direction * intersection.time_of_impact,
                normal: Vec3::new(
                    intersection.normal.x,
                    intersection.normal.y,
                    intersection.normal.z,
                ),
            })
    }
}

impl Default for MapGeometry {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryQuery for MapGeometry {
    fn check_box(&self, center: Vec3, half_extents: Vec3, layers: MapLayers) -> bool {
        let shape = Cuboid::new(vector![half_extents.x, half_extents.y, half_extents.z]);
        let shape_pos = Isometry::translation(center.x, center.y, center.z);

        self.query_pipeline
            .intersection_with_shape(
                &self.rigid_body_set,
                &self.collider_set,
                &shape_pos,
                &shape,
                Self::filter(layers),
            )
            .is_some()
    }

    fn probe_downward(&self, origin: Vec3, max_distance: f32, layers: MapLayers) -> Option<ProbeHit> {
        self.raycast_detailed(origin, Vec3::NEG_Y, max_distance, layers)
            .map(|hit| ProbeHit {
                distance: hit.distance,
                normal: hit.normal,
            })
    }
}

/// Detailed raycast hit information
#[derive(Debug, Clone)]
pub struct RaycastHit {
    /// The collider that was hit
    pub collider: ColliderHandle,
    /// Distance along the ray to the hit point
    pub distance: f32,
    /// World-space hit point
    pub point: Vec3,
    /// Surface normal at hit point
    pub normal: Vec3,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_map() -> MapGeometry {
        let mut map = MapGeometry::new();
        map.create_ground(0.0);
        map.finalize();
        map
    }

    #[test]
    fn test_ground_creation() {
        let mut map = MapGeometry::new();
        let ground = map.create_ground(0.0);
        assert!(map.get_collider(ground).is_some());
        assert_eq!(map.collider_count(), 1);
    }

    #[test]
    fn test_probe_downward_hits_ground() {
        let map = flat_map();
        let hit = map
            .probe_downward(Vec3::new(0.0, 10.0, 0.0), 100.0, MapLayers::ALL)
            .expect("ground below");
        assert!((hit.distance - 10.0).abs() < 1e-3);
        assert!((hit.normal - Vec3::Y).length() < 1e-3);
    }

    #[test]
    fn test_probe_respects_range() {
        let map = flat_map();
        assert!(map
            .probe_downward(Vec3::new(0.0, 10.0, 0.0), 4.0, MapLayers::ALL)
            .is_none());
    }

    #[test]
    fn test_check_box_overlap() {
        let map = flat_map();
        let half = Vec3::new(0.3, 0.1, 0.3);
        assert!(map.check_box(Vec3::new(0.0, 0.05, 0.0), half, MapLayers::ALL));
        assert!(!map.check_box(Vec3::new(0.0, 2.0, 0.0), half, MapLayers::ALL));
    }

    #[test]
    fn test_layer_filtering() {
        let mut map = MapGeometry::new();
        map.create_static_box(Vec3::splat(1.0), Vec3::ZERO, MapLayers::PROPS);
        map.finalize();

        assert!(map.check_box(Vec3::ZERO, Vec3::splat(0.5), MapLayers::PROPS));
        assert!(!map.check_box(Vec3::ZERO, Vec3::splat(0.5), MapLayers::GROUND));
    }

    #[test]
    fn test_triggers_are_ignored() {
        let mut map = MapGeometry::new();
        map.create_trigger(Vec3::splat(1.0), Vec3::ZERO);
        map.finalize();

        assert!(!map.check_box(Vec3::ZERO, Vec3::splat(0.5), MapLayers::ALL));
        assert!(map
            .probe_downward(Vec3::new(0.0, 5.0, 0.0), 10.0, MapLayers::ALL)
            .is_none());
    }

    #[test]
    fn test_ramp_normal() {
        let mut map = MapGeometry::new();
        map.create_ramp(Vec3::new(5.0, 0.5, 5.0), Vec3::ZERO, 30.0, MapLayers::GROUND);
        map.finalize();

        let hit = map
            .probe_downward(Vec3::new(0.0, 5.0, 0.0), 10.0, MapLayers::ALL)
            .expect("ramp below");
        let angle = showdown_core::math::angle_between(Vec3::Y, hit.normal);
        assert!((angle - 30.0).abs() < 0.1, "angle was {angle}");
    }
}
