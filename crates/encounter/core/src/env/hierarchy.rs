use crate::types::AnchorId;

/// Parent/child structure of the host scene.
pub trait HierarchyOracle: Send + Sync {
    fn parent(&self, anchor: AnchorId) -> Option<AnchorId>;

    /// True for anchors that own a cooldown scope (typically a boss root).
    fn is_owner_root(&self, anchor: AnchorId) -> bool;
}

/// Live member count of a designated population root (minions, turrets, ...).
pub trait PopulationOracle: Send + Sync {
    fn member_count(&self, root: AnchorId) -> usize;
}
