//! Built-in level layouts.
//!
//! Layouts are plain data. Enemies reference the platform they patrol by its
//! explicit [`PlatformId`], never by position in the platform list, so
//! reordering platforms cannot rebind an enemy.

use glam::Vec2;
use sky_chaser_core::{tuning, Aabb, CoinId, EnemyId, GeometryError, LevelIndex, PlatformId};
use thiserror::Error;

use crate::entities::{Coin, Enemy, Platform};

/// Number of levels shipped with the game.
pub const LEVEL_COUNT: u32 = 3;

const SPAWN_POINT: Vec2 = Vec2::new(100.0, 100.0);
const COINS_PER_PLATFORM: u32 = 3;
const COIN_LIFT: f32 = 30.0;
const GROUND: PlatformSpec = PlatformSpec::new(0, 0.0, 560.0, 800.0, 40.0);

/// Vertical extent of a level in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelBounds {
    /// Highest y coordinate the camera may show.
    pub top: f32,
    /// The player is out of bounds once their top edge passes this y coordinate.
    pub bottom: f32,
}

/// Errors raised while instantiating a level layout.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum LevelError {
    /// No layout exists for the requested index.
    #[error("level {} does not exist ({LEVEL_COUNT} levels available)", .index.number())]
    UnknownLevel {
        /// Index that was requested.
        index: LevelIndex,
    },
    /// An enemy references a platform id absent from the layout.
    #[error("level {} binds an enemy to missing platform {}", .index.number(), .platform.get())]
    UnknownPlatform {
        /// Level containing the broken reference.
        index: LevelIndex,
        /// Platform id that could not be resolved.
        platform: PlatformId,
    },
    /// A layout rectangle has a non-positive extent.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

#[derive(Clone, Copy, Debug)]
struct PlatformSpec {
    id: u32,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl PlatformSpec {
    const fn new(id: u32, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            id,
            x,
            y,
            width,
            height,
        }
    }
}

#[derive(Debug)]
struct LayoutSpec {
    top: f32,
    platforms: &'static [PlatformSpec],
    enemy_platforms: &'static [u32],
    anchors: &'static [(f32, f32)],
}

const LAYOUTS: [LayoutSpec; LEVEL_COUNT as usize] = [
    LayoutSpec {
        top: 0.0,
        platforms: &[
            PlatformSpec::new(1, 100.0, 450.0, 200.0, 20.0),
            PlatformSpec::new(2, 400.0, 400.0, 150.0, 20.0),
            PlatformSpec::new(3, 200.0, 320.0, 100.0, 20.0),
            PlatformSpec::new(4, 400.0, 250.0, 200.0, 20.0),
            PlatformSpec::new(5, 100.0, 200.0, 150.0, 20.0),
            PlatformSpec::new(6, 550.0, 150.0, 200.0, 20.0),
        ],
        enemy_platforms: &[2, 4],
        anchors: &[(300.0, 100.0), (500.0, 80.0), (150.0, 120.0), (650.0, 200.0)],
    },
    LayoutSpec {
        top: -400.0,
        platforms: &[
            PlatformSpec::new(1, 80.0, 460.0, 160.0, 20.0),
            PlatformSpec::new(2, 330.0, 390.0, 140.0, 20.0),
            PlatformSpec::new(3, 560.0, 320.0, 180.0, 20.0),
            PlatformSpec::new(4, 300.0, 240.0, 160.0, 20.0),
            PlatformSpec::new(5, 60.0, 170.0, 180.0, 20.0),
            PlatformSpec::new(6, 320.0, 90.0, 160.0, 20.0),
            PlatformSpec::new(7, 580.0, 20.0, 180.0, 20.0),
            PlatformSpec::new(8, 340.0, -60.0, 140.0, 20.0),
            PlatformSpec::new(9, 100.0, -150.0, 200.0, 20.0),
        ],
        enemy_platforms: &[3, 5, 9],
        anchors: &[
            (200.0, 60.0),
            (450.0, -10.0),
            (650.0, -100.0),
            (250.0, -250.0),
            (550.0, 150.0),
        ],
    },
    LayoutSpec {
        top: -800.0,
        platforms: &[
            PlatformSpec::new(1, 600.0, 470.0, 150.0, 20.0),
            PlatformSpec::new(2, 380.0, 400.0, 120.0, 20.0),
            PlatformSpec::new(3, 140.0, 330.0, 160.0, 20.0),
            PlatformSpec::new(4, 400.0, 250.0, 200.0, 20.0),
            PlatformSpec::new(5, 650.0, 180.0, 120.0, 20.0),
            PlatformSpec::new(6, 420.0, 100.0, 120.0, 20.0),
            PlatformSpec::new(7, 150.0, 30.0, 200.0, 20.0),
            PlatformSpec::new(8, 420.0, -50.0, 140.0, 20.0),
            PlatformSpec::new(9, 640.0, -130.0, 140.0, 20.0),
            PlatformSpec::new(10, 380.0, -210.0, 160.0, 20.0),
            PlatformSpec::new(11, 120.0, -300.0, 200.0, 20.0),
            PlatformSpec::new(12, 400.0, -390.0, 220.0, 20.0),
        ],
        enemy_platforms: &[1, 4, 7, 11, 12],
        anchors: &[
            (300.0, 200.0),
            (560.0, 40.0),
            (260.0, -120.0),
            (560.0, -280.0),
            (300.0, -420.0),
            (650.0, -500.0),
        ],
    },
];

/// Instantiated level owned by the world for the duration of a session phase.
#[derive(Clone, Debug)]
pub(crate) struct Level {
    pub(crate) index: LevelIndex,
    pub(crate) platforms: Vec<Platform>,
    pub(crate) coins: Vec<Coin>,
    pub(crate) enemies: Vec<Enemy>,
    pub(crate) anchors: Vec<Vec2>,
    pub(crate) spawn: Vec2,
    pub(crate) bounds: LevelBounds,
}

impl Level {
    /// Builds the layout registered for `index`.
    pub(crate) fn build(index: LevelIndex) -> Result<Self, LevelError> {
        let layout = usize::try_from(index.get())
            .ok()
            .and_then(|slot| LAYOUTS.get(slot))
            .ok_or(LevelError::UnknownLevel { index })?;

        let mut platforms = Vec::with_capacity(layout.platforms.len() + 1);
        platforms.push(platform_from_spec(GROUND)?);
        for spec in layout.platforms {
            platforms.push(platform_from_spec(*spec)?);
        }

        let mut coins = Vec::new();
        for spec in layout.platforms {
            for slot in 0..COINS_PER_PLATFORM {
                let offset = (slot as f32 * spec.width / COINS_PER_PLATFORM as f32).floor()
                    + (spec.width / 6.0).floor();
                let position = Vec2::new(spec.x + offset, spec.y - COIN_LIFT);
                let bounds = Aabb::from_position_and_size(position, tuning::COIN_SIZE)?;
                let id = CoinId::new(coins.len() as u32);
                let phase = coins.len() as f32 * 0.7;
                coins.push(Coin::new(id, bounds, phase));
            }
        }

        let mut enemies = Vec::with_capacity(layout.enemy_platforms.len());
        for raw in layout.enemy_platforms {
            let platform = PlatformId::new(*raw);
            let owner_bounds = platform_bounds(&platforms, platform)
                .ok_or(LevelError::UnknownPlatform { index, platform })?;
            let position = Vec2::new(
                owner_bounds.left() + (owner_bounds.width() / 2.0).floor(),
                owner_bounds.top() - tuning::ENEMY_SIZE.y,
            );
            let bounds = Aabb::from_position_and_size(position, tuning::ENEMY_SIZE)?;
            let patrol_distance = owner_bounds.width() - tuning::ENEMY_SIZE.x;
            let id = EnemyId::new(enemies.len() as u32);
            enemies.push(Enemy::new(id, bounds, Some(platform), patrol_distance));
        }

        let anchors = layout
            .anchors
            .iter()
            .map(|&(x, y)| Vec2::new(x, y))
            .collect();

        Ok(Self {
            index,
            platforms,
            coins,
            enemies,
            anchors,
            spawn: SPAWN_POINT,
            bounds: LevelBounds {
                top: layout.top,
                bottom: tuning::VIEWPORT_HEIGHT,
            },
        })
    }

    pub(crate) fn is_final(&self) -> bool {
        self.index.number() >= LEVEL_COUNT
    }
}

/// Looks up the collision box of the platform carrying `id`.
pub(crate) fn platform_bounds(platforms: &[Platform], id: PlatformId) -> Option<&Aabb> {
    platforms
        .iter()
        .find(|platform| platform.id() == id)
        .map(Platform::bounds)
}

fn platform_from_spec(spec: PlatformSpec) -> Result<Platform, GeometryError> {
    let bounds = Aabb::new(spec.x, spec.y, spec.width, spec.height)?;
    Ok(Platform::new(PlatformId::new(spec.id), bounds))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_layout_builds() {
        for raw in 0..LEVEL_COUNT {
            let level = Level::build(LevelIndex::new(raw)).expect("layout should build");
            assert!(level.platforms.len() > 1);
            assert!(!level.coins.is_empty());
            assert!(level
                .platforms
                .iter()
                .any(|platform| platform.bounds().width() >= tuning::VIEWPORT_WIDTH));
            for enemy in &level.enemies {
                let owner = enemy.platform().expect("enemies are platform bound");
                assert!(platform_bounds(&level.platforms, owner).is_some());
            }
        }
    }

    #[test]
    fn unknown_level_is_reported() {
        let error = Level::build(LevelIndex::new(LEVEL_COUNT)).expect_err("no fourth level");
        assert_eq!(
            error,
            LevelError::UnknownLevel {
                index: LevelIndex::new(LEVEL_COUNT)
            }
        );
    }

    #[test]
    fn first_level_matches_classic_layout() {
        let level = Level::build(LevelIndex::FIRST).expect("first level");
        assert_eq!(level.platforms.len(), 7);
        assert_eq!(level.coins.len(), 18);
        assert_eq!(level.enemies.len(), 2);
        assert_eq!(level.spawn, Vec2::new(100.0, 100.0));

        let first_coin = level.coins[0].bounds().position();
        assert_eq!(first_coin, Vec2::new(133.0, 420.0));
        let third_coin = level.coins[2].bounds().position();
        assert_eq!(third_coin, Vec2::new(266.0, 420.0));

        let patrol = level
            .enemies
            .iter()
            .find(|enemy| enemy.platform() == Some(PlatformId::new(4)))
            .expect("enemy on the wide middle platform");
        assert_eq!(patrol.bounds().position(), Vec2::new(500.0, 220.0));
        assert_eq!(patrol.start_x(), 500.0);
        assert_eq!(patrol.patrol_distance(), 170.0);
    }

    #[test]
    fn only_the_last_layout_is_final() {
        let finals: Vec<bool> = (0..LEVEL_COUNT)
            .map(|raw| Level::build(LevelIndex::new(raw)).expect("layout").is_final())
            .collect();
        assert_eq!(finals, vec![false, false, true]);
    }
}
