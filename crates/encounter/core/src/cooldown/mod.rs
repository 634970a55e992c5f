//! Named cooldown groups shared between mechanics.
//!
//! Mechanics resolving to the same [`CooldownGroupId`] rate-limit each other:
//! an activation pushes a duration into the group and no grouped mechanic
//! fires until it elapses. Extensions follow a "highest wins" rule, so a
//! shorter push arriving later never shortens a longer cooldown already in
//! place.
mod group;

pub use group::{CooldownGroupId, GroupIdSource, compute_group_id};

use std::collections::HashMap;
use std::sync::RwLock;

/// Table of `group -> ready_at` timestamps behind one coarse lock.
///
/// All operations are O(1) except [`prune`](Self::prune). A poisoned lock is
/// absorbed: reads report the group as ready and writes become no-ops.
#[derive(Debug, Default)]
pub struct CooldownGroupService {
    ready_at: RwLock<HashMap<CooldownGroupId, f32>>,
}

impl CooldownGroupService {
    pub fn new() -> Self {
        Self {
            ready_at: RwLock::new(HashMap::new()),
        }
    }

    pub fn is_ready(&self, group: CooldownGroupId, now: f32) -> bool {
        self.remaining(group, now) <= 0.0
    }

    /// Seconds until `group` is ready, `0` when it already is.
    pub fn remaining(&self, group: CooldownGroupId, now: f32) -> f32 {
        if group.is_ungrouped() {
            return 0.0;
        }
        let Ok(table) = self.ready_at.read() else {
            return 0.0;
        };
        table
            .get(&group)
            .map(|ready_at| (ready_at - now).max(0.0))
            .unwrap_or(0.0)
    }

    /// Extends `group` to at least `now + duration`.
    pub fn push_cooldown(&self, group: CooldownGroupId, duration: f32, now: f32) {
        if group.is_ungrouped() || duration <= 0.0 {
            return;
        }
        let Ok(mut table) = self.ready_at.write() else {
            tracing::warn!("cooldown table lock poisoned; dropping push for {}", group);
            return;
        };
        let candidate = now + duration;
        let entry = table.entry(group).or_insert(candidate);
        if candidate > *entry {
            *entry = candidate;
        }
    }

    pub fn clear_group(&self, group: CooldownGroupId) {
        if let Ok(mut table) = self.ready_at.write() {
            table.remove(&group);
        }
    }

    pub fn clear_all(&self) {
        if let Ok(mut table) = self.ready_at.write() {
            table.clear();
        }
    }

    /// Drops every entry that is already ready. Returns how many were removed.
    pub fn prune(&self, now: f32) -> usize {
        let Ok(mut table) = self.ready_at.write() else {
            return 0;
        };
        let before = table.len();
        table.retain(|_, ready_at| *ready_at > now);
        before - table.len()
    }

    pub fn len(&self) -> usize {
        self.ready_at.read().map(|table| table.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
