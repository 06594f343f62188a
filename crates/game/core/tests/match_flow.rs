use tactics_core::{
    AbilityCatalog, AbilityDefinition, AbilityEffect, AbilityId, Command, CommandRejection, Env,
    GridDimensions, GridPosition, GridSnapshot, MatchConfig, MatchEngine, MatchEnv, MatchEvent,
    MatchState, MoveRejection, Phase, PlayerId, StatusEffectInstance, StatusEffectKind, Unit,
    UnitId, ZoneCatalog, ZoneEffect, ZonePlacement, ZoneSpec, ZoneTypeId,
};

const EMBER_FIELD: AbilityId = AbilityId(1);
const LANCE: AbilityId = AbilityId(2);
const EMBER: ZoneTypeId = ZoneTypeId(1);
const SEAR: ZoneTypeId = ZoneTypeId(2);

struct Fixture {
    grid: GridSnapshot,
    abilities: AbilityCatalog,
    zones: ZoneCatalog,
}

impl Fixture {
    fn new() -> Self {
        let abilities = [
            AbilityDefinition {
                id: EMBER_FIELD,
                name: "ember field".into(),
                range: 3,
                resource_cost: 2,
                cooldown: 1,
                charge: 5,
                overload_threshold: 0,
                effect: AbilityEffect::CreateZone(EMBER),
            },
            AbilityDefinition {
                id: LANCE,
                name: "lance".into(),
                range: 4,
                resource_cost: 3,
                cooldown: 0,
                charge: 4,
                overload_threshold: 4,
                effect: AbilityEffect::Damage(20),
            },
        ]
        .into_iter()
        .collect();
        let zones = [
            ZoneSpec::new(EMBER, "ember", 0, 1, ZoneEffect::Damage(15)),
            ZoneSpec::new(SEAR, "sear", 0, 1, ZoneEffect::Damage(10))
                .with_tags(["fire"])
                .with_merge([SEAR], 3)
                .with_resonance(["fire"], 150),
        ]
        .into_iter()
        .collect();

        Self {
            grid: GridSnapshot::new(GridDimensions::new(10, 10)),
            abilities,
            zones,
        }
    }

    fn env(&self) -> MatchEnv<'_> {
        Env::with_all(&self.grid, &self.abilities, &self.zones).as_match_env()
    }
}

fn started(fixture: &Fixture, config: MatchConfig, units: Vec<Unit>) -> MatchState {
    let env = fixture.env();
    let mut state = MatchState::new(config);
    let mut engine = MatchEngine::new(&mut state);
    for unit in units {
        engine.spawn_unit(&env, unit).unwrap();
    }
    assert_eq!(engine.start(&env).unwrap(), Phase::MovementPhase);
    engine.drain_events();
    state
}

fn skirmish() -> Vec<Unit> {
    vec![
        Unit::new(UnitId(1), PlayerId::One, GridPosition::new(2, 2))
            .with_ability(EMBER_FIELD)
            .with_ability(LANCE),
        Unit::new(UnitId(2), PlayerId::Two, GridPosition::new(4, 2)),
    ]
}

fn afflicted(mut unit: Unit, kind: StatusEffectKind) -> Unit {
    assert!(
        unit.status_effects
            .add(StatusEffectInstance::new(kind, 2, UnitId(99), 0), 4)
    );
    unit
}

fn end_movement(engine: &mut MatchEngine<'_>, env: &MatchEnv<'_>) {
    engine.submit(env, &Command::end_phase(900, PlayerId::One)).unwrap();
    engine.submit(env, &Command::end_phase(901, PlayerId::Two)).unwrap();
}

#[test]
fn contested_destination_goes_to_lower_unit_id() {
    let fixture = Fixture::new();
    let env = fixture.env();
    let mut state = started(
        &fixture,
        MatchConfig::default(),
        vec![
            Unit::new(UnitId(1), PlayerId::One, GridPosition::new(4, 5)),
            Unit::new(UnitId(2), PlayerId::Two, GridPosition::new(6, 5)),
        ],
    );
    let mut engine = MatchEngine::new(&mut state);
    let target = GridPosition::new(5, 5);

    engine
        .submit(&env, &Command::move_unit(1, PlayerId::Two, UnitId(2), target))
        .unwrap();
    engine
        .submit(&env, &Command::move_unit(2, PlayerId::One, UnitId(1), target))
        .unwrap();

    // Queued only: nobody has moved yet.
    let snapshot = engine.snapshot();
    assert_eq!(snapshot.unit(UnitId(1)).unwrap().position, GridPosition::new(4, 5));
    assert_eq!(snapshot.unit(UnitId(2)).unwrap().position, GridPosition::new(6, 5));

    end_movement(&mut engine, &env);

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.phase, Phase::AuraPhase1A);
    assert_eq!(snapshot.unit(UnitId(1)).unwrap().position, target);
    assert_eq!(snapshot.unit(UnitId(2)).unwrap().position, GridPosition::new(6, 5));

    let rejections: Vec<_> = engine
        .drain_events()
        .into_iter()
        .filter_map(|event| match event {
            MatchEvent::MoveRejected { unit, reason, .. } => Some((unit, reason)),
            _ => None,
        })
        .collect();
    assert_eq!(
        rejections,
        vec![(UnitId(2), MoveRejection::Conflict { winner: UnitId(1) })]
    );
}

#[test]
fn movement_batch_runs_when_quota_is_met() {
    let fixture = Fixture::new();
    let env = fixture.env();
    let config = MatchConfig::default().with_move_thresholds(4, 1);
    let mut state = started(&fixture, config, skirmish());
    let mut engine = MatchEngine::new(&mut state);

    engine
        .submit(&env, &Command::move_unit(1, PlayerId::One, UnitId(1), GridPosition::new(2, 3)))
        .unwrap();
    assert_eq!(engine.state().current_phase(), Phase::MovementPhase);
    engine
        .submit(&env, &Command::move_unit(2, PlayerId::Two, UnitId(2), GridPosition::new(4, 1)))
        .unwrap();

    let state = engine.state();
    assert_eq!(state.current_phase(), Phase::AuraPhase1A);
    let mover = state.units.get(UnitId(1)).unwrap();
    assert_eq!(mover.position, GridPosition::new(2, 3));
    assert!(mover.has_moved_this_turn);
    assert_eq!(state.grid.occupant(GridPosition::new(4, 1)), Some(UnitId(2)));
}

#[test]
fn validation_gates_run_in_order() {
    let fixture = Fixture::new();
    let env = fixture.env();
    let mut state = started(&fixture, MatchConfig::default(), skirmish());
    let mut engine = MatchEngine::new(&mut state);

    let foreign = Command::move_unit(1, PlayerId::Two, UnitId(1), GridPosition::new(2, 3));
    assert_eq!(
        engine.submit(&env, &foreign),
        Err(CommandRejection::NotOwner {
            unit: UnitId(1),
            player: PlayerId::Two
        })
    );

    let cast = Command::use_ability(2, PlayerId::One, UnitId(1), LANCE, GridPosition::new(4, 2));
    assert!(matches!(
        engine.submit(&env, &cast),
        Err(CommandRejection::WrongPhase {
            phase: Phase::MovementPhase,
            ..
        })
    ));

    let far = Command::move_unit(3, PlayerId::One, UnitId(1), GridPosition::new(9, 9));
    assert!(matches!(
        engine.submit(&env, &far),
        Err(CommandRejection::Unreachable { .. })
    ));

    let first = Command::move_unit(4, PlayerId::One, UnitId(1), GridPosition::new(2, 3));
    engine.submit(&env, &first).unwrap();
    let second = Command::move_unit(5, PlayerId::One, UnitId(1), GridPosition::new(2, 1));
    assert_eq!(
        engine.submit(&env, &second),
        Err(CommandRejection::ActionSlotUsed(UnitId(1)))
    );
}

#[test]
fn zone_from_ability_hits_once_at_resolution_and_expires() {
    let fixture = Fixture::new();
    let env = fixture.env();
    let mut state = started(&fixture, MatchConfig::default(), skirmish());
    let mut engine = MatchEngine::new(&mut state);
    end_movement(&mut engine, &env);
    assert_eq!(engine.state().current_phase(), Phase::AuraPhase1A);

    let cast = Command::use_ability(10, PlayerId::One, UnitId(1), EMBER_FIELD, GridPosition::new(4, 2));
    engine.submit(&env, &cast).unwrap();

    // One activation is the default cap, so the sub-phase has passed to player 2.
    assert_eq!(engine.state().current_phase(), Phase::AuraPhase1B);
    assert_eq!(engine.state().units.get(UnitId(2)).unwrap().hp.current, 100);

    engine.submit(&env, &Command::end_phase(11, PlayerId::Two)).unwrap();
    engine.submit(&env, &Command::end_phase(12, PlayerId::One)).unwrap();
    engine.submit(&env, &Command::end_phase(13, PlayerId::Two)).unwrap();

    let state = engine.state();
    assert_eq!(state.current_phase(), Phase::MovementPhase);
    assert_eq!(state.turn_number(), 2);
    assert!(state.zones.is_empty());

    let caster = state.units.get(UnitId(1)).unwrap();
    assert_eq!(caster.aura.current, 8);
    assert_eq!(caster.overload.current, 5);
    assert_eq!(caster.cooldown(EMBER_FIELD), 0);
    assert_eq!(state.units.get(UnitId(2)).unwrap().hp.current, 85);

    let events = engine.drain_events();
    let hits = events
        .iter()
        .filter(|event| matches!(event, MatchEvent::UnitDamaged { unit: UnitId(2), .. }))
        .count();
    assert_eq!(hits, 1);
    assert!(events.iter().any(|event| matches!(event, MatchEvent::ZoneExpired { .. })));
    assert!(events.contains(&MatchEvent::TurnChanged { turn: 2 }));
}

#[test]
fn full_turn_is_eight_phase_changes() {
    let fixture = Fixture::new();
    let env = fixture.env();
    let mut state = started(&fixture, MatchConfig::default(), skirmish());
    let mut engine = MatchEngine::new(&mut state);

    engine.advance(&env).unwrap();
    while engine.state().current_phase() != Phase::MovementPhase {
        engine.advance(&env).unwrap();
    }

    let changes = engine
        .drain_events()
        .into_iter()
        .filter(|event| matches!(event, MatchEvent::PhaseChanged { .. }))
        .count();
    assert_eq!(changes, 8);
    assert_eq!(engine.state().turn_number(), 2);
}

#[test]
fn overflowing_a_cell_voids_it_for_two_turns() {
    let fixture = Fixture::new();
    let env = fixture.env();
    let config = MatchConfig::default().with_max_zones_per_tile(4);
    let mut state = started(&fixture, config, skirmish());
    let mut engine = MatchEngine::new(&mut state);
    let cell = GridPosition::new(7, 7);

    for _ in 0..4 {
        let placement = engine.place_zone(&env, EMBER, cell, UnitId(1)).unwrap();
        assert!(placement.created_zone().is_some());
    }
    let placement = engine.place_zone(&env, EMBER, cell, UnitId(1)).unwrap();
    assert!(placement.created_zone().is_none());
    assert!(matches!(placement, ZonePlacement::Resonance { .. }));
    assert_eq!(engine.state().zones.active_count_at(cell), 0);
    assert_eq!(
        engine.state().zones.void_at(cell).map(|void| void.remaining_duration),
        Some(2)
    );

    // Turn 1 ends: one turn of void left.
    engine.force_transition_to(Phase::AuraPhase2B);
    engine.advance(&env).unwrap();
    assert_eq!(engine.state().turn_number(), 2);
    assert_eq!(
        engine.place_zone(&env, EMBER, cell, UnitId(1)).unwrap(),
        ZonePlacement::RejectedVoid
    );

    // Turn 2 ends: the void lifts.
    engine.force_transition_to(Phase::AuraPhase2B);
    engine.advance(&env).unwrap();
    assert!(!engine.state().zones.is_void(cell));
    assert!(
        engine
            .place_zone(&env, EMBER, cell, UnitId(1))
            .unwrap()
            .created_zone()
            .is_some()
    );
}

#[test]
fn overloaded_lance_scales_damage_and_spends_charge() {
    let fixture = Fixture::new();
    let env = fixture.env();
    let mut units = skirmish();
    units[0] = units[0].clone().with_overload(4, 10);
    let mut state = started(&fixture, MatchConfig::default(), units);
    let mut engine = MatchEngine::new(&mut state);
    end_movement(&mut engine, &env);

    let cast = Command::use_ability(20, PlayerId::One, UnitId(1), LANCE, GridPosition::new(4, 2)).overloaded();
    engine.submit(&env, &cast).unwrap();

    let state = engine.state();
    assert_eq!(state.units.get(UnitId(2)).unwrap().hp.current, 70);
    assert_eq!(state.units.get(UnitId(1)).unwrap().overload.current, 0);
}

#[test]
fn killing_the_last_enemy_ends_the_match() {
    let fixture = Fixture::new();
    let env = fixture.env();
    let mut units = skirmish();
    units[1] = units[1].clone().with_hp(10, 100);
    let mut state = started(&fixture, MatchConfig::default(), units);
    let mut engine = MatchEngine::new(&mut state);
    end_movement(&mut engine, &env);

    let cast = Command::use_ability(30, PlayerId::One, UnitId(1), LANCE, GridPosition::new(4, 2));
    engine.submit(&env, &cast).unwrap();

    let state = engine.state();
    assert_eq!(state.current_phase(), Phase::GameOver);
    assert_eq!(state.outcome, Some(Some(PlayerId::One)));
    assert!(!state.grid.is_occupied(GridPosition::new(4, 2)));
    assert!(
        engine
            .drain_events()
            .contains(&MatchEvent::MatchEnded { winner: Some(PlayerId::One) })
    );

    let late = Command::end_phase(31, PlayerId::Two);
    assert!(matches!(
        engine.submit(&env, &late),
        Err(CommandRejection::WrongPhase {
            phase: Phase::GameOver,
            ..
        })
    ));
}

#[test]
fn missing_grid_aborts_without_touching_state() {
    let fixture = Fixture::new();
    let mut state = started(&fixture, MatchConfig::default(), skirmish());
    let before = state.clone();
    let mut engine = MatchEngine::new(&mut state);

    let empty: MatchEnv<'_> = Env::empty();
    let command = Command::move_unit(1, PlayerId::One, UnitId(1), GridPosition::new(2, 3));
    assert!(matches!(
        engine.submit(&empty, &command),
        Err(CommandRejection::Oracle(_))
    ));
    assert_eq!(state, before);
}

#[test]
fn forcing_resolution_runs_zone_pass_and_reaches_next_turn() {
    let fixture = Fixture::new();
    let env = fixture.env();
    let mut state = started(&fixture, MatchConfig::default(), skirmish());
    let mut engine = MatchEngine::new(&mut state);
    engine
        .place_zone(&env, EMBER, GridPosition::new(4, 2), UnitId(1))
        .unwrap();

    let change = engine.force_transition_to(Phase::Resolution);
    assert_eq!(change.to, Phase::Resolution);

    let state = engine.state();
    assert_eq!(state.current_phase(), Phase::MovementPhase);
    assert_eq!(state.turn_number(), 2);
    assert_eq!(state.zones.resolved_turn(), Some(1));
    assert!(state.zones.is_empty());
    assert_eq!(state.units.get(UnitId(2)).unwrap().hp.current, 85);

    // The match accepts commands again instead of sitting in a system phase.
    let step = Command::move_unit(40, PlayerId::One, UnitId(1), GridPosition::new(2, 3));
    engine.submit(&env, &step).unwrap();
}

#[test]
fn forcing_other_system_phases_settles_into_movement() {
    let fixture = Fixture::new();
    let mut state = started(&fixture, MatchConfig::default(), skirmish());
    let mut engine = MatchEngine::new(&mut state);

    engine.force_transition_to(Phase::Opening);
    assert_eq!(engine.state().current_phase(), Phase::MovementPhase);
    assert_eq!(engine.state().turn_number(), 1);

    engine.force_transition_to(Phase::EndTurn);
    assert_eq!(engine.state().current_phase(), Phase::MovementPhase);
    assert_eq!(engine.state().turn_number(), 2);
    assert!(
        engine
            .drain_events()
            .contains(&MatchEvent::TurnChanged { turn: 2 })
    );
}

#[test]
fn reposition_moves_at_once_in_owner_sub_phase() {
    let fixture = Fixture::new();
    let env = fixture.env();
    let mut state = started(&fixture, MatchConfig::default(), skirmish());
    let mut engine = MatchEngine::new(&mut state);
    end_movement(&mut engine, &env);
    engine.drain_events();
    assert_eq!(engine.state().current_phase(), Phase::AuraPhase1A);

    // 1A belongs to player one.
    let early = Command::reposition(50, PlayerId::Two, UnitId(2), GridPosition::new(4, 3));
    assert!(matches!(
        engine.submit(&env, &early),
        Err(CommandRejection::WrongPhase {
            phase: Phase::AuraPhase1A,
            ..
        })
    ));

    let step = Command::reposition(51, PlayerId::One, UnitId(1), GridPosition::new(2, 3));
    engine.submit(&env, &step).unwrap();

    let state = engine.state();
    assert_eq!(state.current_phase(), Phase::AuraPhase1A);
    assert_eq!(state.units.get(UnitId(1)).unwrap().position, GridPosition::new(2, 3));
    assert_eq!(state.grid.occupant(GridPosition::new(2, 3)), Some(UnitId(1)));
    assert!(!state.grid.is_occupied(GridPosition::new(2, 2)));
    assert!(engine.drain_events().contains(&MatchEvent::UnitMoved {
        unit: UnitId(1),
        from: GridPosition::new(2, 2),
        to: GridPosition::new(2, 3),
    }));

    let again = Command::reposition(52, PlayerId::One, UnitId(1), GridPosition::new(2, 4));
    assert_eq!(
        engine.submit(&env, &again),
        Err(CommandRejection::ActionSlotUsed(UnitId(1)))
    );
}

#[test]
fn rooted_units_cannot_move_or_reposition() {
    let fixture = Fixture::new();
    let env = fixture.env();
    let mut units = skirmish();
    units[0] = afflicted(units[0].clone(), StatusEffectKind::Rooted);
    let mut state = started(&fixture, MatchConfig::default(), units);
    let mut engine = MatchEngine::new(&mut state);

    let walk = Command::move_unit(60, PlayerId::One, UnitId(1), GridPosition::new(2, 3));
    assert_eq!(
        engine.submit(&env, &walk),
        Err(CommandRejection::Rooted(UnitId(1)))
    );

    end_movement(&mut engine, &env);
    let step = Command::reposition(61, PlayerId::One, UnitId(1), GridPosition::new(2, 3));
    assert_eq!(
        engine.submit(&env, &step),
        Err(CommandRejection::Rooted(UnitId(1)))
    );
    assert_eq!(
        engine.state().units.get(UnitId(1)).unwrap().position,
        GridPosition::new(2, 2)
    );
}

#[test]
fn silenced_units_cannot_cast() {
    let fixture = Fixture::new();
    let env = fixture.env();
    let mut units = skirmish();
    units[0] = afflicted(units[0].clone(), StatusEffectKind::Silenced);
    let mut state = started(&fixture, MatchConfig::default(), units);
    let mut engine = MatchEngine::new(&mut state);
    end_movement(&mut engine, &env);

    let cast = Command::use_ability(70, PlayerId::One, UnitId(1), LANCE, GridPosition::new(4, 2));
    assert_eq!(
        engine.submit(&env, &cast),
        Err(CommandRejection::Silenced(UnitId(1)))
    );

    let state = engine.state();
    assert_eq!(state.current_phase(), Phase::AuraPhase1A);
    assert_eq!(state.units.get(UnitId(2)).unwrap().hp.current, 100);
    assert_eq!(state.units.get(UnitId(1)).unwrap().aura.current, 10);
}

#[test]
fn merged_fire_zones_resonate_at_resolution() {
    let fixture = Fixture::new();
    let env = fixture.env();
    let mut state = started(&fixture, MatchConfig::default(), skirmish());
    let mut engine = MatchEngine::new(&mut state);
    let cell = GridPosition::new(4, 2);

    assert!(
        engine
            .place_zone(&env, SEAR, cell, UnitId(1))
            .unwrap()
            .created_zone()
            .is_some()
    );
    assert!(matches!(
        engine.place_zone(&env, SEAR, cell, UnitId(1)).unwrap(),
        ZonePlacement::Merged { stacks: 2, .. }
    ));

    end_movement(&mut engine, &env);
    engine.submit(&env, &Command::end_phase(80, PlayerId::One)).unwrap();
    engine.submit(&env, &Command::end_phase(81, PlayerId::Two)).unwrap();
    engine.submit(&env, &Command::end_phase(82, PlayerId::One)).unwrap();
    engine.submit(&env, &Command::end_phase(83, PlayerId::Two)).unwrap();

    // Two stacks of 10, scaled by 150%.
    let state = engine.state();
    assert_eq!(state.turn_number(), 2);
    assert_eq!(state.units.get(UnitId(2)).unwrap().hp.current, 70);
}
