use std::fmt;

use crate::env::HierarchyOracle;
use crate::types::AnchorId;

/// Identifier of a global cooldown group.
///
/// `0` is the "ungrouped" sentinel: always ready and never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CooldownGroupId(pub u64);

impl CooldownGroupId {
    pub const UNGROUPED: Self = Self(0);

    /// Tag bit of anchor-derived ids. Literal integers never carry it, so
    /// the two namespaces are disjoint and anchor ids are never 0.
    const ANCHOR_NAMESPACE: u64 = 1 << 63;

    pub const fn is_ungrouped(self) -> bool {
        self.0 == 0
    }

    pub const fn from_anchor(anchor: AnchorId) -> Self {
        Self(Self::ANCHOR_NAMESPACE | anchor.0 as u64)
    }

    /// Literal group integer, with the anchor tag bit cleared.
    pub const fn from_custom(value: u64) -> Self {
        Self(value & !Self::ANCHOR_NAMESPACE)
    }

    pub const fn is_anchor_derived(self) -> bool {
        self.0 & Self::ANCHOR_NAMESPACE != 0
    }
}

impl fmt::Display for CooldownGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group:{:#x}", self.0)
    }
}

/// How a mechanic resolves its global cooldown group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GroupIdSource {
    /// Nearest owner-root ancestor of the mechanic's anchor.
    #[default]
    OwnerRoot,
    /// Identity of an explicitly configured anchor.
    CustomAnchor,
    /// A literal integer shared by convention.
    CustomInt,
    /// No grouping.
    None,
}

/// Resolves a group id following `source`.
///
/// # Arguments
///
/// * `anchor` - Start of the owner-root walk (the mechanic's owner)
/// * `custom_anchor` - Anchor used by [`GroupIdSource::CustomAnchor`]
/// * `custom_int` - Literal used by [`GroupIdSource::CustomInt`]; the top bit is ignored
/// * `source` - Strategy selecting one of the above
/// * `hierarchy` - Parent lookups for the owner-root walk
/// * `max_depth` - Most parents the walk may climb
///
/// # Returns
///
/// The resolved group, or [`CooldownGroupId::UNGROUPED`] when the source
/// has nothing to resolve from. When the walk finds no owner root, the last
/// ancestor it reached stands in for it; without a hierarchy oracle the
/// anchor itself does.
pub fn compute_group_id(
    anchor: Option<AnchorId>,
    custom_anchor: Option<AnchorId>,
    custom_int: u64,
    source: GroupIdSource,
    hierarchy: Option<&dyn HierarchyOracle>,
    max_depth: usize,
) -> CooldownGroupId {
    match source {
        GroupIdSource::None => CooldownGroupId::UNGROUPED,
        GroupIdSource::CustomInt => CooldownGroupId::from_custom(custom_int),
        GroupIdSource::CustomAnchor => custom_anchor
            .map(CooldownGroupId::from_anchor)
            .unwrap_or(CooldownGroupId::UNGROUPED),
        GroupIdSource::OwnerRoot => {
            let Some(anchor) = anchor else {
                return CooldownGroupId::UNGROUPED;
            };
            let root = match hierarchy {
                Some(hierarchy) => find_owner_root(anchor, hierarchy, max_depth),
                None => anchor,
            };
            CooldownGroupId::from_anchor(root)
        }
    }
}

fn find_owner_root(anchor: AnchorId, hierarchy: &dyn HierarchyOracle, max_depth: usize) -> AnchorId {
    let mut current = anchor;
    for _ in 0..max_depth {
        if hierarchy.is_owner_root(current) {
            return current;
        }
        match hierarchy.parent(current) {
            Some(parent) => current = parent,
            None => return current,
        }
    }
    if hierarchy.is_owner_root(current) {
        return current;
    }
    tracing::warn!(
        "owner-root walk from {} gave up after {} parents at {}",
        anchor,
        max_depth,
        current
    );
    current
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Chain 0 <- 1 <- 2 <- ... ; `root` marks the owner root.
    struct Chain {
        root: Option<u32>,
    }

    impl HierarchyOracle for Chain {
        fn parent(&self, anchor: AnchorId) -> Option<AnchorId> {
            (anchor.0 > 0).then(|| AnchorId(anchor.0 - 1))
        }

        fn is_owner_root(&self, anchor: AnchorId) -> bool {
            self.root == Some(anchor.0)
        }
    }

    #[test]
    fn owner_root_walks_to_nearest_marked_ancestor() {
        let chain = Chain { root: Some(3) };
        let id = compute_group_id(Some(AnchorId(6)), None, 0, GroupIdSource::OwnerRoot, Some(&chain), 32);
        assert_eq!(id, CooldownGroupId::from_anchor(AnchorId(3)));
    }

    #[test]
    fn owner_root_falls_back_to_topmost_ancestor() {
        let chain = Chain { root: None };
        let id = compute_group_id(Some(AnchorId(4)), None, 0, GroupIdSource::OwnerRoot, Some(&chain), 32);
        assert_eq!(id, CooldownGroupId::from_anchor(AnchorId(0)));
    }

    #[test]
    fn owner_root_walk_is_bounded() {
        let chain = Chain { root: None };
        let id = compute_group_id(Some(AnchorId(100)), None, 0, GroupIdSource::OwnerRoot, Some(&chain), 5);
        assert_eq!(id, CooldownGroupId::from_anchor(AnchorId(95)));

        let id = compute_group_id(Some(AnchorId(10)), None, 0, GroupIdSource::OwnerRoot, Some(&chain), 1);
        assert_eq!(id, CooldownGroupId::from_anchor(AnchorId(9)));

        let id = compute_group_id(Some(AnchorId(10)), None, 0, GroupIdSource::OwnerRoot, Some(&chain), 0);
        assert_eq!(id, CooldownGroupId::from_anchor(AnchorId(10)));
    }

    #[test]
    fn root_at_the_depth_bound_is_found() {
        let chain = Chain { root: Some(7) };
        let id = compute_group_id(Some(AnchorId(10)), None, 0, GroupIdSource::OwnerRoot, Some(&chain), 3);
        assert_eq!(id, CooldownGroupId::from_anchor(AnchorId(7)));
        let id = compute_group_id(Some(AnchorId(10)), None, 0, GroupIdSource::OwnerRoot, Some(&chain), 2);
        assert_eq!(id, CooldownGroupId::from_anchor(AnchorId(8)));
    }

    #[test]
    fn large_custom_ints_stay_out_of_the_anchor_namespace() {
        for value in [(1u64 << 32) | 5, CooldownGroupId::from_anchor(AnchorId(5)).0, u64::MAX] {
            let id = compute_group_id(None, None, value, GroupIdSource::CustomInt, None, 8);
            assert!(!id.is_anchor_derived(), "{id}");
            assert_ne!(id, CooldownGroupId::from_anchor(AnchorId(5)));
        }
        assert_eq!(
            compute_group_id(None, None, (1u64 << 32) | 5, GroupIdSource::CustomInt, None, 8),
            CooldownGroupId((1u64 << 32) | 5)
        );
        assert!(CooldownGroupId::from_anchor(AnchorId(u32::MAX)).is_anchor_derived());
    }

    #[test]
    fn literal_and_sentinel_sources() {
        assert_eq!(
            compute_group_id(None, None, 7, GroupIdSource::CustomInt, None, 8),
            CooldownGroupId(7)
        );
        assert!(compute_group_id(Some(AnchorId(1)), None, 7, GroupIdSource::None, None, 8).is_ungrouped());
        assert!(compute_group_id(None, None, 0, GroupIdSource::CustomAnchor, None, 8).is_ungrouped());
        assert_ne!(
            CooldownGroupId::from_anchor(AnchorId(7)),
            CooldownGroupId(7),
            "anchor ids are namespaced away from literal ints"
        );
        assert!(!CooldownGroupId::from_anchor(AnchorId(0)).is_ungrouped());
    }
}
