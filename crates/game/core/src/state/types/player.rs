use super::common::PlayerId;

/// Per-player resource pools.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerTurnMeta {
    pub player_id: PlayerId,
    /// Earned on kills, spent on super/ultimate skills. Carries across turns.
    pub charge_points: u32,
    /// Spent on moves and skills, regenerated at the start of each own turn.
    pub action_points: u32,
    pub max_action_points: u32,
}

impl PlayerTurnMeta {
    pub fn new(player_id: PlayerId, action_points: u32, max_action_points: u32) -> Self {
        Self {
            player_id,
            charge_points: 0,
            action_points: action_points.min(max_action_points),
            max_action_points,
        }
    }

    /// Adds action points without exceeding the cap. Returns the amount gained.
    pub fn regenerate(&mut self, amount: u32) -> u32 {
        let before = self.action_points;
        self.action_points = self
            .action_points
            .saturating_add(amount)
            .min(self.max_action_points);
        self.action_points - before
    }

    /// Spends action points, returning false (and spending nothing) if short.
    pub fn spend_action_points(&mut self, amount: u32) -> bool {
        match self.action_points.checked_sub(amount) {
            Some(rest) => {
                self.action_points = rest;
                true
            }
            None => false,
        }
    }

    /// Spends charge points, returning false (and spending nothing) if short.
    pub fn spend_charge_points(&mut self, amount: u32) -> bool {
        match self.charge_points.checked_sub(amount) {
            Some(rest) => {
                self.charge_points = rest;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regenerate_respects_cap() {
        let mut meta = PlayerTurnMeta::new(PlayerId::from("p1"), 9, 10);
        assert_eq!(meta.regenerate(3), 1);
        assert_eq!(meta.action_points, 10);
        assert_eq!(meta.regenerate(1), 0);
    }

    #[test]
    fn spending_more_than_available_changes_nothing() {
        let mut meta = PlayerTurnMeta::new(PlayerId::from("p1"), 2, 10);
        assert!(!meta.spend_action_points(3));
        assert_eq!(meta.action_points, 2);
        assert!(!meta.spend_charge_points(1));
        assert_eq!(meta.charge_points, 0);
    }
}
