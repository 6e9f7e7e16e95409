use niuma_game::{
    ContentTables, DataLoader, DefeatCause, DeltaValue, EmbeddedLoader, EventTone, GameController,
    ResourceKind, RulesConfig,
};

#[test]
fn embedded_loader_serves_valid_defaults() {
    let loader = EmbeddedLoader;
    let content = loader.load_content().unwrap();
    let rules = loader.load_rules().unwrap();
    content.validate().unwrap();
    rules.validate().unwrap();
    assert!(GameController::new(content, rules, 1).is_ok());
}

#[test]
fn every_card_costs_something_listed() {
    let content = ContentTables::embedded().unwrap();
    for card in content.cards.iter().chain(&content.night_actions) {
        assert!(!card.cost.is_empty(), "{} has no cost", card.id);
        assert!(!card.gain.is_empty(), "{} has no gain", card.id);
        assert!(!card.name.is_empty());
    }
}

#[test]
fn lottery_is_the_only_random_gain() {
    let content = ContentTables::embedded().unwrap();
    let random: Vec<_> = content
        .night_actions
        .iter()
        .filter(|card| card.gain.values().any(DeltaValue::is_random))
        .map(|card| card.id.as_str())
        .collect();
    assert_eq!(random, vec!["gacha"]);
    let gacha = &content.night_actions[2];
    assert_eq!(gacha.gain[&ResourceKind::Money].preview(), None);
    assert_eq!(gacha.gain[&ResourceKind::Sanity].preview(), Some(2));
    assert!(content.cards.iter().all(|card| !card.gain.values().any(DeltaValue::is_random)));
}

#[test]
fn events_cover_both_tones() {
    let content = ContentTables::embedded().unwrap();
    let negative = content
        .events
        .iter()
        .filter(|event| event.tone == EventTone::Neg)
        .count();
    let positive = content
        .events
        .iter()
        .filter(|event| event.tone == EventTone::Pos)
        .count();
    assert_eq!((negative, positive), (3, 2));
    assert_eq!(
        content.event("subway").map(|event| event.effect_delta().len()),
        Some(2)
    );
}

#[test]
fn every_defeat_has_its_own_narrative() {
    let content = ContentTables::embedded().unwrap();
    let mut reasons: Vec<_> = DefeatCause::PRIORITY
        .iter()
        .map(|cause| content.messages.defeat.reason(*cause))
        .collect();
    assert!(reasons.iter().all(|reason| !reason.is_empty()));
    reasons.sort_unstable();
    reasons.dedup();
    assert_eq!(reasons.len(), 4);
}

#[test]
fn custom_content_round_trips_through_json() {
    let json = r#"{
        "cards": [{"id": "nap", "name": "Nap", "desc": "", "cost": {"energy": 1}, "gain": {"health": 4}}],
        "night_actions": [{"id": "walk", "name": "Walk", "desc": "", "gain": {"sanity": 3}}],
        "events": [{"id": "calm", "title": "Calm", "desc": "", "tone": "neutral"}],
        "messages": {
            "welcome": "hi", "morning": "day {day}: {title}", "insufficient": "no",
            "play_card": "{name}", "end_work": "off", "sleep": "zzz", "rent": "-{rent}",
            "talent_selected": "{talent}",
            "defeat": {"bankrupt": "b", "overwork": "o", "breakdown": "m", "fired": "f"}
        }
    }"#;
    let content = ContentTables::from_json(json).unwrap();
    content.validate().unwrap();
    assert!(content.talents.is_empty());
    assert!(content.night_actions[0].cost.is_empty());
    assert!(content.events[0].effect.is_empty());
    let game = GameController::new(content, RulesConfig::default(), 3).unwrap();
    assert_eq!(game.state().journal.latest().unwrap().text, "hi");
}
