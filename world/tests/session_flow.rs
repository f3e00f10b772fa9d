use glam::Vec2;
use sky_chaser_core::{
    Command, DamageCause, Event, GameState, HeldActions, JumpKind, LevelIndex,
};
use sky_chaser_world::{apply, query, World};

fn run(world: &mut World, command: Command) -> Vec<Event> {
    let mut events = Vec::new();
    apply(world, command, &mut events);
    events
}

fn tick(world: &mut World, held: HeldActions) -> Vec<Event> {
    run(world, Command::Tick { held })
}

fn started() -> World {
    let mut world = World::new();
    let _ = run(&mut world, Command::StartGame);
    world
}

fn settle(world: &mut World) {
    for _ in 0..120 {
        let _ = tick(world, HeldActions::default());
    }
}

#[test]
fn player_settles_on_the_platform_below_spawn() {
    let mut world = started();
    settle(&mut world);

    let player = query::player(&world).expect("player");
    assert!(player.on_ground);
    assert!(player.can_double_jump);
    assert_eq!(player.velocity.y, 0.0);
    assert_eq!(player.bounds.bottom(), 200.0);
    assert_eq!(player.score, 10, "the coin above the landing spot is collected");
    assert_eq!(query::game_state(&world), GameState::Playing);
}

#[test]
fn third_jump_is_refused_until_landing() {
    let mut world = started();
    settle(&mut world);

    let first = run(&mut world, Command::Jump);
    assert!(matches!(
        first.as_slice(),
        [Event::Jumped {
            kind: JumpKind::Ground,
            ..
        }]
    ));
    let _ = tick(&mut world, HeldActions::default());

    let second = run(&mut world, Command::Jump);
    assert!(matches!(
        second.as_slice(),
        [Event::Jumped {
            kind: JumpKind::Double,
            ..
        }]
    ));
    assert_eq!(query::player(&world).expect("player").velocity.y, -16.0);
    let _ = tick(&mut world, HeldActions::default());

    assert!(run(&mut world, Command::Jump).is_empty());

    settle(&mut world);
    assert!(!run(&mut world, Command::Jump).is_empty());
}

#[test]
fn walking_off_the_level_edge_costs_a_life_and_respawns() {
    let mut world = started();
    settle(&mut world);

    let left = HeldActions {
        left: true,
        ..HeldActions::default()
    };
    let mut log = Vec::new();
    for _ in 0..300 {
        let events = tick(&mut world, left);
        let respawned = events
            .iter()
            .any(|event| matches!(event, Event::PlayerRespawned { .. }));
        log.extend(events);
        if respawned {
            break;
        }
    }

    let falls: Vec<&Event> = log
        .iter()
        .filter(|event| {
            matches!(
                event,
                Event::PlayerDamaged { .. } | Event::PlayerRespawned { .. }
            )
        })
        .collect();
    assert!(
        matches!(
            falls.as_slice(),
            [
                Event::PlayerDamaged {
                    lives: 2,
                    cause: DamageCause::Fall,
                    ..
                },
                Event::PlayerRespawned { position },
            ] if *position == Vec2::new(100.0, 100.0)
        ),
        "unexpected fall sequence: {falls:?}"
    );

    let player = query::player(&world).expect("player");
    assert_eq!(player.lives, 2);
    assert_eq!(player.bounds.left(), 100.0);
    assert_eq!(player.bounds.top(), 100.0);
    assert_eq!(player.velocity.y, 0.0);
    assert!(player.is_invulnerable());
    assert_eq!(query::game_state(&world), GameState::Playing);
}

#[test]
fn menu_round_trip_starts_a_fresh_session() {
    let mut world = started();
    settle(&mut world);

    let events = run(&mut world, Command::ReturnToMenu);
    assert_eq!(
        events,
        vec![Event::GameStateChanged {
            from: GameState::Playing,
            to: GameState::Menu,
        }]
    );

    let events = run(&mut world, Command::StartGame);
    assert!(events.contains(&Event::LevelLoaded {
        level: LevelIndex::FIRST
    }));
    let player = query::player(&world).expect("player");
    assert_eq!(player.score, 0);
    assert_eq!(query::coins_remaining(&world), 18);

    assert!(run(&mut world, Command::EndSession).is_empty());
    let _ = run(&mut world, Command::ReturnToMenu);
    assert_eq!(run(&mut world, Command::EndSession), vec![Event::SessionEnded]);
    assert!(query::is_terminated(&world));
}

#[test]
fn identical_command_streams_replay_identically() {
    fn script(world: &mut World) -> Vec<Event> {
        let mut log = run(world, Command::StartGame);
        for step in 0..400_u32 {
            let held = HeldActions {
                left: step % 150 > 100,
                right: step % 90 < 40,
                up: false,
            };
            if step % 37 == 0 {
                log.extend(run(world, Command::Jump));
            }
            log.extend(tick(world, held));
        }
        log
    }

    let mut first = World::new();
    let mut second = World::new();
    assert_eq!(script(&mut first), script(&mut second));
    assert_eq!(query::player(&first), query::player(&second));
    assert_eq!(query::camera_offset(&first), query::camera_offset(&second));
}

#[test]
fn camera_stays_within_level_bounds() {
    let mut world = started();
    let bounds = query::level_bounds(&world).expect("level loaded");
    for step in 0..300_u32 {
        if step % 20 == 0 {
            let _ = run(&mut world, Command::Jump);
        }
        let _ = tick(
            &mut world,
            HeldActions {
                right: true,
                ..HeldActions::default()
            },
        );
        let offset = query::camera_offset(&world);
        assert!(offset >= bounds.top);
        assert!(offset <= bounds.bottom - 600.0);
    }
}
