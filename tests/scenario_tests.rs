//! Scenario decoding tests: raw records through to a running registry.

use mission_script::{
    build_trigger, load_cell_tags, ActionParams, CellCoord, HouseId, MapFormat, ObjectId,
    ObjectKind, RawTriggerDef, ScenarioConfig, ScenarioError, ScenarioEvent, SimWorld, TagId,
    TriggerRegistry, TriggerState, ANY_HOUSE,
};

/// Decode a complete raw definition and run it to firing.
#[test]
fn test_decoded_trigger_runs() {
    let mut world = SimWorld::new();
    world.add_house(HouseId::new(0), 1000);
    world.add_house(HouseId::new(1), 1000);
    let outpost = ObjectId::new(10);
    world.add_object(outpost, HouseId::new(0), ObjectKind::Building);

    let def = RawTriggerDef {
        name: "outpost-falls".into(),
        house: 0,
        tag: None,
        link: None,
        repeating: false,
        disabled: false,
        watched: vec![10],
        // DestroyedBy(any house)
        conditions: vec![(4, ActionParams::new(vec![-1]))],
        // StartCountdown(120 s)
        executors: vec![(17, ActionParams::new(vec![120]))],
    };

    let mut reg = TriggerRegistry::new(ScenarioConfig::new(30));
    let id = reg.register(build_trigger(&def).unwrap());

    reg.dispatch(ScenarioEvent::destroyed(
        outpost,
        HouseId::new(0),
        ObjectKind::Building,
        ObjectId::new(900),
        HouseId::new(1),
    ));
    reg.tick(&mut world);

    assert_eq!(reg.trigger(id).unwrap().state(), TriggerState::Fired);
    assert!(world.countdown.running);
    assert_eq!(world.countdown.seconds, 120);
}

/// Multi-condition definitions decode into conjunctive triggers.
#[test]
fn test_decoded_conjunction() {
    let def = RawTriggerDef {
        name: "timed-and-broke".into(),
        house: ANY_HOUSE,
        // ElapsedTime(5 s) AND CreditsReach(house 1, 2000)
        conditions: vec![
            (13, ActionParams::new(vec![5])),
            (15, ActionParams::new(vec![1, 2000])),
        ],
        ..RawTriggerDef::default()
    };

    let trigger = build_trigger(&def).unwrap();
    assert_eq!(trigger.conditions.len(), 2);
    assert_eq!(trigger.house, None);
}

/// Malformed definitions fail at decode time, not mid-mission.
#[test]
fn test_decode_failures_are_loud() {
    let bad_kind = RawTriggerDef {
        name: "bad-kind".into(),
        house: ANY_HOUSE,
        conditions: vec![(42, ActionParams::default())],
        ..RawTriggerDef::default()
    };
    assert!(matches!(
        build_trigger(&bad_kind),
        Err(ScenarioError::UnknownConditionKind(42))
    ));

    let bad_house = RawTriggerDef {
        name: "bad-house".into(),
        house: 300,
        conditions: vec![(1, ActionParams::default())],
        ..RawTriggerDef::default()
    };
    assert!(matches!(
        build_trigger(&bad_house),
        Err(ScenarioError::ParamOutOfRange { value: 300, .. })
    ));

    let short_params = RawTriggerDef {
        name: "short".into(),
        house: ANY_HOUSE,
        // BuildingsDestroyedReach needs house and count.
        conditions: vec![(11, ActionParams::new(vec![1]))],
        ..RawTriggerDef::default()
    };
    assert!(matches!(
        build_trigger(&short_params),
        Err(ScenarioError::MissingParam { index: 1 })
    ));

    let tagless_entry = RawTriggerDef {
        name: "tagless".into(),
        house: ANY_HOUSE,
        // EnteredBy(any house), but no cell tag to match against.
        conditions: vec![(2, ActionParams::new(vec![-1]))],
        ..RawTriggerDef::default()
    };
    assert!(matches!(
        build_trigger(&tagless_entry),
        Err(ScenarioError::MissingTag { .. })
    ));
}

/// The same world-unit placement decodes to different cells per format.
#[test]
fn test_cell_tag_format_divisors() {
    let entries = [(1280, 2560, TagId::new(3)), (1281, 2561, TagId::new(3))];

    let legacy = load_cell_tags(&entries, MapFormat::Legacy);
    assert_eq!(legacy.tag_at(CellCoord::new(10, 20)), Some(TagId::new(3)));

    let modern = load_cell_tags(&entries, MapFormat::Modern);
    assert_eq!(modern.tag_at(CellCoord::new(5, 10)), Some(TagId::new(3)));
    assert_eq!(modern.tag_at(CellCoord::new(10, 20)), None);
}

/// Disabled-at-load triggers stay dormant until enabled.
#[test]
fn test_decoded_disabled_trigger() {
    let mut world = SimWorld::new();
    world.add_house(HouseId::new(0), 1000);

    let def = RawTriggerDef {
        name: "sleeper".into(),
        house: ANY_HOUSE,
        disabled: true,
        conditions: vec![(1, ActionParams::default())], // Always
        ..RawTriggerDef::default()
    };

    let mut reg = TriggerRegistry::new(ScenarioConfig::new(30));
    let id = reg.register(build_trigger(&def).unwrap());

    reg.tick(&mut world);
    assert_eq!(reg.trigger(id).unwrap().state(), TriggerState::Disabled);

    reg.enable_trigger(id);
    reg.tick(&mut world);
    assert_eq!(reg.trigger(id).unwrap().state(), TriggerState::Fired);
}
