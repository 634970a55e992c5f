use std::fmt;

/// Identifier of a spatial anchor known to the host world (a boss root, a
/// weapon muzzle, the player, a minion container, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnchorId(pub u32);

impl AnchorId {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

/// Position of a mechanic in the controller's registration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MechanicIndex(pub usize);

impl fmt::Display for MechanicIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mechanic[{}]", self.0)
    }
}

/// Percentage in `0..=100` converted to a `0..=1` ratio.
#[inline]
pub(crate) fn percent_to_ratio(percent: f32) -> f32 {
    percent / 100.0
}
