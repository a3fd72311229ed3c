use tactics_core::{Faction, PieceTemplate, TemplateSkill};

pub(super) fn all() -> Vec<PieceTemplate> {
    vec![
        // Red
        PieceTemplate::new("knight", "Knight", Faction::Red)
            .with_stats(40, 8, 3, 2)
            .with_skill("basic_attack")
            .with_skill("shield_wall")
            .with_skill("war_cry"),
        PieceTemplate::new("ranger", "Ranger", Faction::Red)
            .with_stats(26, 9, 1, 3)
            .with_skill("basic_attack")
            .with_skill("venom_bolt")
            .with_skill("meteor"),
        PieceTemplate::new("cleric", "Cleric", Faction::Red)
            .with_stats(28, 5, 1, 3)
            .with_skill("basic_attack")
            .with_skill("mend")
            .with_skill("vampiric_strikes"),
        // Blue
        PieceTemplate::new("berserker", "Berserker", Faction::Blue)
            .with_stats(45, 10, 1, 2)
            .with_skill("cleave")
            .with_skill("bloodlust")
            .with_skill("execute"),
        PieceTemplate::new("assassin", "Assassin", Faction::Blue)
            .with_stats(24, 11, 0, 4)
            .with_skill("lacerate")
            .with_skill("blink")
            .with_skill("execute"),
        PieceTemplate::new("shaman", "Shaman", Faction::Blue)
            .with_stats(30, 6, 1, 3)
            .with_skill("basic_attack")
            .with_skill("venom_bolt")
            .with_skill("thorn_hide"),
        training_dummy(),
    ]
}

/// Practice target. Not offered in piece selection.
fn training_dummy() -> PieceTemplate {
    let mut dummy = PieceTemplate::new("training_dummy", "Training Dummy", Faction::Neutral)
        .with_stats(60, 0, 0, 1);
    dummy.skills.push(TemplateSkill {
        skill_id: "thorn_hide".into(),
        initial_charges: 0,
    });
    dummy.selectable = false;
    dummy
}
