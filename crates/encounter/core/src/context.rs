//! Shared per-encounter blackboard.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use glam::Vec3;

use crate::env::{OracleBundle, compute_seed};
use crate::types::AnchorId;

/// Roll streams keep independent kinds of randomness apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum RollStream {
    Condition = 1,
    Chance = 2,
    Pick = 3,
    Spawn = 4,
}

/// Mutable record shared by every component of one encounter.
///
/// Owned by the [`PhaseController`](crate::phase::PhaseController) and
/// lent out by reference; there is exactly one per encounter. Getters return
/// neutral defaults when a collaborator is missing (`hp01 == 1.0` without a
/// health oracle, `None` positions without a spatial oracle).
#[derive(Debug)]
pub struct EncounterContext {
    boss: Option<AnchorId>,
    player: Option<AnchorId>,
    oracles: OracleBundle,
    hp01: f32,
    now: f32,
    frame: u64,
    phase_started_at: f32,
    seed: u64,
    roll_nonce: Cell<u64>,
    captured_population: RefCell<HashMap<AnchorId, usize>>,
}

impl EncounterContext {
    pub fn new(oracles: OracleBundle) -> Self {
        let mut ctx = Self {
            boss: None,
            player: None,
            oracles,
            hp01: 1.0,
            now: 0.0,
            frame: 0,
            phase_started_at: 0.0,
            seed: 0,
            roll_nonce: Cell::new(0),
            captured_population: RefCell::new(HashMap::new()),
        };
        ctx.refresh_health();
        ctx
    }

    pub fn with_boss(mut self, boss: AnchorId) -> Self {
        self.boss = Some(boss);
        self
    }

    pub fn with_player(mut self, player: AnchorId) -> Self {
        self.player = Some(player);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn boss(&self) -> Option<AnchorId> {
        self.boss
    }

    pub fn player(&self) -> Option<AnchorId> {
        self.player
    }

    pub fn set_player(&mut self, player: Option<AnchorId>) {
        self.player = player;
    }

    pub fn oracles(&self) -> &OracleBundle {
        &self.oracles
    }

    /// Current health ratio in `[0, 1]`.
    pub fn hp01(&self) -> f32 {
        self.hp01
    }

    pub fn now(&self) -> f32 {
        self.now
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Seconds since the current main phase was entered.
    pub fn phase_time(&self) -> f32 {
        (self.now - self.phase_started_at).max(0.0)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Advances the clock by `dt` and re-reads health.
    pub(crate) fn advance(&mut self, dt: f32) {
        self.now += dt.max(0.0);
        self.frame += 1;
        self.refresh_health();
    }

    pub(crate) fn mark_phase_start(&mut self) {
        self.phase_started_at = self.now;
    }

    fn refresh_health(&mut self) {
        self.hp01 = match self.oracles.health() {
            Ok(health) => health.ratio(),
            Err(_) => 1.0,
        };
    }

    pub fn position(&self, anchor: AnchorId) -> Option<Vec3> {
        self.oracles.spatial().ok()?.position(anchor)
    }

    pub fn forward(&self, anchor: AnchorId) -> Option<Vec3> {
        self.oracles.spatial().ok()?.forward(anchor)
    }

    /// Distance between the boss and player anchors.
    pub fn boss_to_player_distance(&self) -> Option<f32> {
        let boss = self.position(self.boss?)?;
        let player = self.position(self.player?)?;
        Some(boss.distance(player))
    }

    /// Live member count of `root`, `0` without a population oracle.
    pub fn population(&self, root: AnchorId) -> usize {
        self.oracles
            .population()
            .map(|population| population.member_count(root))
            .unwrap_or(0)
    }

    /// Member count of `root` as first observed during this encounter.
    pub fn captured_population(&self, root: AnchorId) -> usize {
        if let Some(count) = self.captured_population.borrow().get(&root) {
            return *count;
        }
        let count = self.population(root);
        self.captured_population.borrow_mut().insert(root, count);
        count
    }

    /// Uniform roll in `[0, 1)`; every call consumes one nonce.
    pub fn roll_unit(&self, stream: RollStream) -> f32 {
        let seed = self.next_seed(stream);
        self.oracles.rng().unit(seed)
    }

    /// Uniform index in `[0, len)`; every call consumes one nonce.
    pub fn roll_index(&self, stream: RollStream, len: usize) -> usize {
        let seed = self.next_seed(stream);
        self.oracles.rng().index(seed, len)
    }

    fn next_seed(&self, stream: RollStream) -> u64 {
        let nonce = self.roll_nonce.get();
        self.roll_nonce.set(nonce.wrapping_add(1));
        compute_seed(self.seed, self.frame, nonce, stream as u32)
    }
}
