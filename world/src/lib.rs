#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Sky Chaser.
//!
//! The world is mutated exclusively through [`apply`], which executes a single
//! [`Command`] and reports what happened as [`Event`]s. Adapters and systems
//! observe the world through the read-only functions in [`query`].

mod camera;
mod entities;
mod levels;
mod particles;
mod player;

use glam::Vec2;
use log::{debug, error, info, warn};
use sky_chaser_core::{
    Command, DamageCause, Event, GameState, HeldActions, LevelIndex, Outcome, WELCOME_BANNER,
};

pub use entities::{Coin, Enemy, Platform};
pub use levels::{LevelBounds, LevelError, LEVEL_COUNT};
pub use particles::Particle;

use camera::Camera;
use levels::Level;
use particles::ParticleSystem;
use player::{Player, StepOutcome};

#[derive(Debug)]
struct Session {
    level: Level,
    player: Player,
    particles: ParticleSystem,
    camera: Camera,
}

impl Session {
    fn fresh() -> Result<Self, LevelError> {
        let level = Level::build(LevelIndex::FIRST)?;
        let player = Player::new(level.spawn)?;
        Ok(Self::assemble(level, player))
    }

    fn next_level(&self) -> Result<Self, LevelError> {
        let level = Level::build(self.level.index.next())?;
        let player = self.player.carried_over(level.spawn)?;
        Ok(Self::assemble(level, player))
    }

    fn assemble(level: Level, player: Player) -> Self {
        let camera = Camera::snapped(player.center().y, &level.bounds);
        Self {
            level,
            player,
            particles: ParticleSystem::default(),
            camera,
        }
    }
}

/// Represents the authoritative Sky Chaser world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    state: GameState,
    outcome: Option<Outcome>,
    session: Option<Session>,
    step: u64,
    terminated: bool,
}

impl World {
    /// Creates a world resting on the title menu.
    #[must_use]
    pub fn new() -> Self {
        Self {
            banner: WELCOME_BANNER,
            state: GameState::Menu,
            outcome: None,
            session: None,
            step: 0,
            terminated: false,
        }
    }

    fn transition(&mut self, to: GameState, out_events: &mut Vec<Event>) {
        let from = self.state;
        if from == to {
            return;
        }

        self.state = to;
        info!("game state {from:?} -> {to:?}");
        out_events.push(Event::GameStateChanged { from, to });
    }

    fn begin(&mut self, session: Result<Session, LevelError>, out_events: &mut Vec<Event>) {
        let session = match session {
            Ok(session) => session,
            Err(error) => {
                error!("failed to load level: {error}");
                return;
            }
        };

        let level = session.level.index;
        info!("loaded level {}", level.number());
        self.session = Some(session);
        self.outcome = None;
        out_events.push(Event::LevelLoaded { level });
        self.transition(GameState::Playing, out_events);
    }

    fn finish(&mut self, outcome: Outcome, out_events: &mut Vec<Event>) {
        self.outcome = Some(outcome);
        out_events.push(Event::GameOver { outcome });
        self.transition(GameState::GameOver, out_events);
    }

    fn simulate(&mut self, held: HeldActions, out_events: &mut Vec<Event>) {
        let Some(session) = self.session.as_mut() else {
            warn!("playing without a loaded level");
            return;
        };
        let Session {
            level,
            player,
            particles,
            camera,
        } = session;

        match player.update(held, &level.platforms, &level.bounds, level.spawn) {
            StepOutcome::Moved => {}
            StepOutcome::Fell {
                position,
                damaged,
                released_grapple,
            } => {
                if damaged {
                    out_events.push(Event::PlayerDamaged {
                        position,
                        lives: player.lives(),
                        cause: DamageCause::Fall,
                    });
                }
                out_events.push(Event::PlayerRespawned {
                    position: level.spawn,
                });
                if released_grapple {
                    out_events.push(Event::GrappleReleased);
                }
            }
        }

        let player_bounds = *player.bounds();
        let mut collected = Vec::new();
        level.coins.retain(|coin| {
            let hit = coin.bounds().overlaps(&player_bounds);
            if hit {
                collected.push((coin.id(), coin.bounds().center()));
            }
            !hit
        });
        for (coin, position) in collected {
            let score = player.collect_coin();
            out_events.push(Event::CoinCollected {
                coin,
                position,
                score,
            });
        }

        if !player.is_invulnerable()
            && level
                .enemies
                .iter()
                .any(|enemy| enemy.bounds().overlaps(player.bounds()))
            && player.take_damage()
        {
            player.knock_back();
            out_events.push(Event::PlayerDamaged {
                position: player.center(),
                lives: player.lives(),
                cause: DamageCause::Enemy,
            });
        }

        for enemy in &mut level.enemies {
            let owner = enemy
                .platform()
                .and_then(|id| levels::platform_bounds(&level.platforms, id));
            enemy.patrol(owner);
        }
        particles.advance();
        for coin in &mut level.coins {
            coin.animate();
        }

        let cleared = level.coins.is_empty();
        let defeated = player.lives() == 0;
        let completed = level.index;
        let is_final = level.is_final();
        camera.follow(player.center().y, &level.bounds);

        if defeated {
            info!("out of lives with score {}", player.score());
            self.finish(Outcome::Defeat, out_events);
        } else if cleared {
            out_events.push(Event::LevelCompleted { level: completed });
            if is_final {
                self.finish(Outcome::Victory, out_events);
            } else {
                self.transition(GameState::LevelComplete, out_events);
            }
        }
    }

    fn idle(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.player.count_down_invulnerability();
            session.particles.advance();
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating its state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if world.terminated {
        warn!("ignoring {command:?} after the session ended");
        return;
    }

    match (world.state, command) {
        (_, Command::Tick { held }) => {
            world.step = world.step.saturating_add(1);
            out_events.push(Event::TimeAdvanced { step: world.step });
            if world.state == GameState::Playing {
                world.simulate(held, out_events);
            } else {
                world.idle();
            }
        }
        (GameState::Menu, Command::StartGame)
        | (GameState::GameOver | GameState::LevelComplete, Command::RestartGame) => {
            world.begin(Session::fresh(), out_events);
        }
        (GameState::LevelComplete, Command::AdvanceLevel) => {
            if let Some(session) = world.session.as_ref() {
                let next = session.next_level();
                world.begin(next, out_events);
            }
        }
        (GameState::Playing, Command::ReturnToMenu) => {
            world.session = None;
            world.outcome = None;
            world.transition(GameState::Menu, out_events);
        }
        (
            GameState::Menu | GameState::GameOver | GameState::LevelComplete,
            Command::EndSession,
        ) => {
            info!("session ended after {} steps", world.step);
            world.terminated = true;
            out_events.push(Event::SessionEnded);
        }
        (GameState::Playing, Command::Jump) => {
            if let Some(session) = world.session.as_mut() {
                let bounds = session.player.bounds();
                let feet = Vec2::new(bounds.center().x, bounds.bottom());
                if let Some(kind) = session.player.jump() {
                    out_events.push(Event::Jumped { feet, kind });
                }
            }
        }
        (GameState::Playing, Command::AttachGrapple { anchor }) => {
            if let Some(session) = world.session.as_mut() {
                match session.player.start_grapple(anchor) {
                    Ok(rest_length) => out_events.push(Event::GrappleAttached {
                        anchor,
                        rest_length,
                    }),
                    Err(reason) => out_events.push(Event::GrappleRejected { anchor, reason }),
                }
            }
        }
        (GameState::Playing, Command::ReleaseGrapple) => {
            if let Some(session) = world.session.as_mut() {
                if session.player.end_grapple() {
                    out_events.push(Event::GrappleReleased);
                }
            }
        }
        (_, Command::SpawnParticles { particles }) => {
            if let Some(session) = world.session.as_mut() {
                session.particles.spawn(particles);
            }
        }
        (state, command) => {
            debug!("ignoring {command:?} while {state:?}");
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use glam::Vec2;
    use sky_chaser_core::{GameState, LevelIndex, Outcome, PlayerSnapshot};

    use super::{Coin, Enemy, LevelBounds, Particle, Platform, World, LEVEL_COUNT};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Reports the active phase of the session.
    #[must_use]
    pub fn game_state(world: &World) -> GameState {
        world.state
    }

    /// How the last session ended, while in [`GameState::GameOver`].
    #[must_use]
    pub fn outcome(world: &World) -> Option<Outcome> {
        world.outcome
    }

    /// Index of the loaded level, if any.
    #[must_use]
    pub fn level_index(world: &World) -> Option<LevelIndex> {
        world.session.as_ref().map(|session| session.level.index)
    }

    /// Number of built-in levels.
    #[must_use]
    pub const fn level_count() -> u32 {
        LEVEL_COUNT
    }

    /// Extent of the loaded level.
    #[must_use]
    pub fn level_bounds(world: &World) -> Option<LevelBounds> {
        world.session.as_ref().map(|session| session.level.bounds)
    }

    /// Captures the player's state, if a level is loaded.
    #[must_use]
    pub fn player(world: &World) -> Option<PlayerSnapshot> {
        world
            .session
            .as_ref()
            .map(|session| session.player.snapshot())
    }

    /// Platforms of the loaded level in layout order.
    #[must_use]
    pub fn platforms(world: &World) -> &[Platform] {
        world
            .session
            .as_ref()
            .map_or(&[], |session| session.level.platforms.as_slice())
    }

    /// Coins that have not been collected yet.
    #[must_use]
    pub fn coins(world: &World) -> &[Coin] {
        world
            .session
            .as_ref()
            .map_or(&[], |session| session.level.coins.as_slice())
    }

    /// Number of coins left before the level is complete.
    #[must_use]
    pub fn coins_remaining(world: &World) -> usize {
        coins(world).len()
    }

    /// Enemies of the loaded level.
    #[must_use]
    pub fn enemies(world: &World) -> &[Enemy] {
        world
            .session
            .as_ref()
            .map_or(&[], |session| session.level.enemies.as_slice())
    }

    /// Grapple anchor points of the loaded level.
    #[must_use]
    pub fn grapple_anchors(world: &World) -> &[Vec2] {
        world
            .session
            .as_ref()
            .map_or(&[], |session| session.level.anchors.as_slice())
    }

    /// Live cosmetic particles.
    #[must_use]
    pub fn particles(world: &World) -> &[Particle] {
        world
            .session
            .as_ref()
            .map_or(&[], |session| session.particles.particles())
    }

    /// World y coordinate shown at the top edge of the viewport.
    #[must_use]
    pub fn camera_offset(world: &World) -> f32 {
        world
            .session
            .as_ref()
            .map_or(0.0, |session| session.camera.offset_y())
    }

    /// Number of fixed steps executed since the world was created.
    #[must_use]
    pub fn step(world: &World) -> u64 {
        world.step
    }

    /// Reports whether the session was terminated and adapters should exit.
    #[must_use]
    pub fn is_terminated(world: &World) -> bool {
        world.terminated
    }
}
