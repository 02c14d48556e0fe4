//! Geometry queries against static map colliders

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Bit mask selecting which map collider layers a query sees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapLayers(pub u32);

impl MapLayers {
    /// Walkable floors, ramps and platforms
    pub const GROUND: MapLayers = MapLayers(1 << 0);
    /// Walls and ceilings
    pub const STRUCTURE: MapLayers = MapLayers(1 << 1);
    /// Decorative props that the character should ignore
    pub const PROPS: MapLayers = MapLayers(1 << 2);
    /// Every layer
    pub const ALL: MapLayers = MapLayers(u32::MAX);
    /// No layer
    pub const NONE: MapLayers = MapLayers(0);

    /// Raw bits
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Whether any layer is shared with `other`
    pub fn intersects(self, other: MapLayers) -> bool {
        self.0 & other.0 != 0
    }
}

impl Default for MapLayers {
    fn default() -> Self {
        MapLayers::GROUND | MapLayers::STRUCTURE
    }
}

impl std::ops::BitOr for MapLayers {
    type Output = MapLayers;

    fn bitor(self, rhs: MapLayers) -> MapLayers {
        MapLayers(self.0 | rhs.0)
    }
}

/// Result of a successful downward probe
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeHit {
    /// Distance from the probe origin to the surface
    pub distance: f32,
    /// Surface normal at the hit point
    pub normal: Vec3,
}

/// Read-only queries the locomotion code needs from the world.
///
/// Implementations ignore trigger volumes and only consider colliders on the
/// requested layers. A miss is a normal outcome, not an error.
pub trait GeometryQuery {
    /// Whether an axis-aligned box overlaps any map collider
    fn check_box(&self, center: Vec3, half_extents: Vec3, layers: MapLayers) -> bool;

    /// Cast a ray straight down from `origin`, up to `max_distance`
    fn probe_downward(&self, origin: Vec3, max_distance: f32, layers: MapLayers) -> Option<ProbeHit>;
}
