use super::Condition;
use crate::context::EncounterContext;

/// A list of conditions combined with AND (`require_all`) or OR.
///
/// An empty group always passes: an absent gate does not block.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ConditionGroup {
    pub require_all: bool,
    pub items: Vec<Condition>,
}

impl ConditionGroup {
    pub fn all(items: Vec<Condition>) -> Self {
        Self {
            require_all: true,
            items,
        }
    }

    pub fn any(items: Vec<Condition>) -> Self {
        Self {
            require_all: false,
            items,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn evaluate(&self, ctx: &EncounterContext) -> bool {
        if self.items.is_empty() {
            return true;
        }
        if self.require_all {
            self.items.iter().all(|condition| condition.evaluate(ctx))
        } else {
            self.items.iter().any(|condition| condition.evaluate(ctx))
        }
    }
}

impl Default for ConditionGroup {
    fn default() -> Self {
        Self::all(Vec::new())
    }
}

/// Evaluates an optional gate; `None` passes.
pub(crate) fn passes(group: Option<&ConditionGroup>, ctx: &EncounterContext) -> bool {
    group.is_none_or(|group| group.evaluate(ctx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::OracleBundle;

    fn ctx() -> EncounterContext {
        // hp01 == 1.0 without a health oracle
        EncounterContext::new(OracleBundle::empty())
    }

    #[test]
    fn empty_group_passes_either_way() {
        assert!(ConditionGroup::all(vec![]).evaluate(&ctx()));
        assert!(ConditionGroup::any(vec![]).evaluate(&ctx()));
        assert!(passes(None, &ctx()));
    }

    #[test]
    fn all_versus_any() {
        let items = vec![
            Condition::HpAbove { percent: 90.0 },
            Condition::HpBelow { percent: 10.0 },
        ];
        assert!(!ConditionGroup::all(items.clone()).evaluate(&ctx()));
        assert!(ConditionGroup::any(items).evaluate(&ctx()));
    }
}
