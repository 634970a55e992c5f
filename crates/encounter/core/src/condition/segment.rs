use crate::context::EncounterContext;
use crate::types::AnchorId;

/// Where a segment edge reads its segment count from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PopulationMode {
    /// Count captured once per encounter, on first evaluation.
    #[default]
    Static,
    /// Count re-read on every evaluation.
    Dynamic,
}

impl PopulationMode {
    pub fn count(self, ctx: &EncounterContext, root: AnchorId) -> usize {
        match self {
            Self::Static => ctx.captured_population(root),
            Self::Dynamic => ctx.population(root),
        }
    }
}

/// True when `ratio` sits within the clamped window around the nearest
/// multiple of `1 / segments`.
///
/// The half-width is clamped to half a segment so windows of adjacent edges
/// never overlap.
pub fn near_segment_edge(ratio: f32, count: usize, half_width: f32) -> bool {
    let seg_size = 1.0 / count.max(1) as f32;
    let nearest = (ratio / seg_size).round() * seg_size;
    (ratio - nearest).abs() <= edge_window(count, half_width)
}

/// Effective half-width of each edge window for `count` segments.
pub fn edge_window(count: usize, half_width: f32) -> f32 {
    let seg_size = 1.0 / count.max(1) as f32;
    half_width.max(0.0).min(seg_size * 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hits_within_window_of_each_edge() {
        // 4 segments: edges at 0, .25, .5, .75, 1
        assert!(near_segment_edge(0.74, 4, 0.02));
        assert!(near_segment_edge(0.5, 4, 0.0));
        assert!(!near_segment_edge(0.6, 4, 0.02));
    }

    #[test]
    fn oversized_window_is_clamped_to_half_segment() {
        // seg = 0.25: adjacent edges 0.25 apart, so each window spans at most 0.125
        assert_eq!(edge_window(4, 0.5), 0.125);
        assert_eq!(edge_window(4, 0.05), 0.05);
        assert_eq!(edge_window(4, -1.0), 0.0);
        assert!(2.0 * edge_window(4, 10.0) <= 0.25);
        assert!(!near_segment_edge(0.6875, 4, 0.05));
        assert!(near_segment_edge(0.6875, 4, 0.5));
        // exactly between edges is at distance seg/2, the clamped bound
        assert!(near_segment_edge(0.375, 4, 10.0));
    }

    #[test]
    fn zero_count_is_one_segment() {
        assert!(near_segment_edge(0.98, 0, 0.05));
        assert!(!near_segment_edge(0.5, 0, 0.05));
    }
}
