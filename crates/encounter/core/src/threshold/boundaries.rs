use crate::types::percent_to_ratio;

/// Slice of the `0..=1` range a tracker places its boundaries in.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Domain {
    /// The whole range; only interior boundaries are used.
    #[default]
    Full,
    /// `low..=high` in percent. The endpoints themselves become boundaries
    /// only when flagged.
    Scoped {
        low: f32,
        high: f32,
        #[cfg_attr(feature = "serde", serde(default))]
        include_low: bool,
        #[cfg_attr(feature = "serde", serde(default))]
        include_high: bool,
    },
}

impl Domain {
    /// Normalised `(low, high)` ratio bounds.
    fn bounds(&self) -> (f32, f32) {
        match *self {
            Self::Full => (0.0, 1.0),
            Self::Scoped { low, high, .. } => {
                let low = percent_to_ratio(low).clamp(0.0, 1.0);
                let high = percent_to_ratio(high).clamp(0.0, 1.0);
                (low.min(high), low.max(high))
            }
        }
    }
}

/// Boundaries splitting `domain` into `segments` equal parts, ordered high to low.
///
/// Yields `segments - 1` interior values plus whichever scoped endpoints are
/// included.
pub(crate) fn build_boundaries(segments: usize, domain: &Domain) -> Vec<f32> {
    let segments = segments.max(1);
    let (low, high) = domain.bounds();
    let span = high - low;

    let mut boundaries = Vec::with_capacity(segments + 1);
    if let Domain::Scoped {
        include_high: true, ..
    } = domain
    {
        boundaries.push(high);
    }
    for k in (1..segments).rev() {
        boundaries.push(low + span * k as f32 / segments as f32);
    }
    if let Domain::Scoped {
        include_low: true, ..
    } = domain
    {
        boundaries.push(low);
    }
    boundaries.dedup();
    boundaries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(actual: &[f32], expected: &[f32]) -> bool {
        actual.len() == expected.len()
            && actual.iter().zip(expected).all(|(a, e)| (a - e).abs() < 1e-5)
    }

    #[test]
    fn full_domain_has_interior_boundaries_only() {
        let boundaries = build_boundaries(5, &Domain::Full);
        assert!(close(&boundaries, &[0.8, 0.6, 0.4, 0.2]));
        assert!(build_boundaries(1, &Domain::Full).is_empty());
        assert!(build_boundaries(0, &Domain::Full).is_empty());
    }

    #[test]
    fn scoped_endpoints_only_when_flagged() {
        let scoped = Domain::Scoped {
            low: 20.0,
            high: 60.0,
            include_low: false,
            include_high: true,
        };
        assert!(close(&build_boundaries(2, &scoped), &[0.6, 0.4]));

        let reversed = Domain::Scoped {
            low: 60.0,
            high: 20.0,
            include_low: true,
            include_high: false,
        };
        assert!(close(&build_boundaries(2, &reversed), &[0.4, 0.2]));
    }
}
