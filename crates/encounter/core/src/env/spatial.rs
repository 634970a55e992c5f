use glam::Vec3;

use crate::types::AnchorId;

/// Result of a bounded line query against static world collision.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Anchor owning the hit collider, when the world knows one.
    pub anchor: Option<AnchorId>,
    pub point: Vec3,
}

/// Spatial queries answered by the host world.
///
/// All queries are synchronous and bounded.
pub trait SpatialOracle: Send + Sync {
    /// World position of an anchor, `None` if the anchor no longer exists.
    fn position(&self, anchor: AnchorId) -> Option<Vec3>;

    /// Facing direction of an anchor. Need not be normalized.
    fn forward(&self, anchor: AnchorId) -> Option<Vec3>;

    /// First static-collision hit on the segment `from -> to`.
    fn linecast(&self, from: Vec3, to: Vec3) -> Option<RayHit>;

    /// Whether a sphere of `radius` at `point` overlaps static collision.
    fn is_blocked(&self, _point: Vec3, _radius: f32) -> bool {
        false
    }
}
