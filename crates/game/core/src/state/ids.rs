use std::collections::BTreeMap;

use crate::env::Faction;
use crate::state::{PieceId, RuleId, StatusId};

/// Per-battle id allocator.
///
/// Each prefix owns a monotonically increasing counter starting at 1. Counters
/// are part of the battle state, so ids stay unique across serialization and
/// never collide between concurrent battles.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct IdGenerator {
    counters: BTreeMap<String, u64>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `"{prefix}-{n}"` and advances the prefix counter.
    pub fn next(&mut self, prefix: &str) -> String {
        let counter = self.counters.entry(prefix.to_owned()).or_insert(0);
        *counter += 1;
        format!("{prefix}-{counter}")
    }

    pub fn next_piece_id(&mut self, faction: Faction) -> PieceId {
        PieceId(self.next(faction.as_str()))
    }

    pub fn next_status_id(&mut self) -> StatusId {
        StatusId(self.next("status"))
    }

    pub fn next_rule_id(&mut self) -> RuleId {
        RuleId(self.next("rule"))
    }

    /// Last value handed out for a prefix, `0` if none.
    pub fn current(&self, prefix: &str) -> u64 {
        self.counters.get(prefix).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_count_independently() {
        let mut ids = IdGenerator::new();
        assert_eq!(ids.next_piece_id(Faction::Red).as_str(), "red-1");
        assert_eq!(ids.next_piece_id(Faction::Blue).as_str(), "blue-1");
        assert_eq!(ids.next_piece_id(Faction::Red).as_str(), "red-2");
        assert_eq!(ids.next_rule_id().as_str(), "rule-1");
        assert_eq!(ids.next_status_id().as_str(), "status-1");
        assert_eq!(ids.current("red"), 2);
    }
}
