//! Piece templates implementing [`tactics_core::PieceOracle`].
use tactics_core::{PieceOracle, PieceTemplate};

/// PieceOracle implementation with static templates, in catalog order.
pub struct PieceOracleImpl {
    templates: Vec<PieceTemplate>,
}

impl PieceOracleImpl {
    pub fn new(templates: Vec<PieceTemplate>) -> Self {
        Self { templates }
    }

    /// Ids offered in piece selection.
    pub fn selectable_ids(&self) -> Vec<String> {
        self.templates
            .iter()
            .filter(|t| t.selectable)
            .map(|t| t.id.clone())
            .collect()
    }
}

impl PieceOracle for PieceOracleImpl {
    fn all_pieces(&self) -> Vec<PieceTemplate> {
        self.templates.clone()
    }

    fn piece(&self, id: &str) -> Option<PieceTemplate> {
        self.templates.iter().find(|t| t.id == id).cloned()
    }
}
