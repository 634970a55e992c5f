//! Choosing which eligible holders an activation uses.

use super::config::SelectionMode;
use crate::context::{EncounterContext, RollStream};
use crate::types::AnchorId;

/// Selection knobs copied out of the trigger config for one activation.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SelectionRules {
    pub mode: SelectionMode,
    pub chance: f32,
    pub max_per_activation: usize,
    pub guarantee_at_least_one: bool,
}

impl SelectionRules {
    fn cap(&self) -> usize {
        if self.max_per_activation == 0 {
            usize::MAX
        } else {
            self.max_per_activation
        }
    }
}

/// Picks holders out of `eligible`.
///
/// `round_robin_cursor` persists across activations. When the mode yields
/// nothing but `eligible` is non-empty and the guarantee is set, one eligible
/// holder is appended regardless of chance.
pub(crate) fn select(
    rules: &SelectionRules,
    eligible: &[AnchorId],
    round_robin_cursor: &mut usize,
    ctx: &EncounterContext,
) -> Vec<AnchorId> {
    let mut chosen = Vec::new();
    if eligible.is_empty() {
        return chosen;
    }
    let cap = rules.cap();

    match rules.mode {
        SelectionMode::All => {
            for holder in eligible {
                if chosen.len() >= cap {
                    break;
                }
                if roll_chance(rules.chance, ctx) {
                    chosen.push(*holder);
                }
            }
        }
        SelectionMode::RandomOne => {
            let pick = eligible[ctx.roll_index(RollStream::Pick, eligible.len())];
            if roll_chance(rules.chance, ctx) {
                chosen.push(pick);
            }
        }
        SelectionMode::RandomSome { count } => {
            let mut pool = eligible.to_vec();
            let take = count.min(pool.len());
            // partial Fisher-Yates: only the first `take` slots are shuffled
            for i in 0..take {
                let j = i + ctx.roll_index(RollStream::Pick, pool.len() - i);
                pool.swap(i, j);
            }
            for holder in pool.into_iter().take(take) {
                if chosen.len() >= cap {
                    break;
                }
                if roll_chance(rules.chance, ctx) {
                    chosen.push(holder);
                }
            }
        }
        SelectionMode::RoundRobin => {
            let len = eligible.len();
            let start = *round_robin_cursor % len;
            let mut consumed = 0;
            for offset in 0..len {
                if chosen.len() >= cap {
                    break;
                }
                consumed = offset + 1;
                let holder = eligible[(start + offset) % len];
                if roll_chance(rules.chance, ctx) {
                    chosen.push(holder);
                }
            }
            *round_robin_cursor = (start + consumed.max(1)) % len;
        }
    }

    if chosen.is_empty() && rules.guarantee_at_least_one {
        chosen.push(eligible[ctx.roll_index(RollStream::Pick, eligible.len())]);
    }

    chosen
}

fn roll_chance(chance: f32, ctx: &EncounterContext) -> bool {
    if chance >= 1.0 {
        true
    } else if chance <= 0.0 {
        false
    } else {
        ctx.roll_unit(RollStream::Chance) < chance
    }
}
