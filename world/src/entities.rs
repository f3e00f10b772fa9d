//! Passive and scripted level inhabitants: platforms, coins and enemies.

use glam::Vec2;
use sky_chaser_core::{tuning, Aabb, CoinId, EnemyId, PlatformId};

/// Static rectangle the player can stand on.
#[derive(Clone, Debug, PartialEq)]
pub struct Platform {
    id: PlatformId,
    bounds: Aabb,
}

impl Platform {
    pub(crate) const fn new(id: PlatformId, bounds: Aabb) -> Self {
        Self { id, bounds }
    }

    /// Identifier assigned by the level layout.
    #[must_use]
    pub const fn id(&self) -> PlatformId {
        self.id
    }

    /// Collision box of the platform.
    #[must_use]
    pub const fn bounds(&self) -> &Aabb {
        &self.bounds
    }
}

/// Collectible coin hovering above a platform.
#[derive(Clone, Debug, PartialEq)]
pub struct Coin {
    id: CoinId,
    bounds: Aabb,
    hover_phase: f32,
}

impl Coin {
    pub(crate) const fn new(id: CoinId, bounds: Aabb, hover_phase: f32) -> Self {
        Self {
            id,
            bounds,
            hover_phase,
        }
    }

    /// Identifier assigned when the level was built.
    #[must_use]
    pub const fn id(&self) -> CoinId {
        self.id
    }

    /// Collision box of the coin. Hovering is cosmetic and never moves it.
    #[must_use]
    pub const fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Animation phase in radians used to bob the coin when drawn.
    #[must_use]
    pub const fn hover_phase(&self) -> f32 {
        self.hover_phase
    }

    pub(crate) fn animate(&mut self) {
        self.hover_phase = (self.hover_phase + tuning::COIN_HOVER_RATE) % std::f32::consts::TAU;
    }
}

/// Enemy walking back and forth along a platform.
#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    id: EnemyId,
    bounds: Aabb,
    platform: Option<PlatformId>,
    start_x: f32,
    patrol_distance: f32,
    direction: f32,
    speed: f32,
}

impl Enemy {
    pub(crate) fn new(
        id: EnemyId,
        bounds: Aabb,
        platform: Option<PlatformId>,
        patrol_distance: f32,
    ) -> Self {
        Self {
            id,
            start_x: bounds.left(),
            bounds,
            platform,
            patrol_distance,
            direction: 1.0,
            speed: tuning::ENEMY_SPEED,
        }
    }

    /// Identifier assigned when the level was built.
    #[must_use]
    pub const fn id(&self) -> EnemyId {
        self.id
    }

    /// Collision box of the enemy.
    #[must_use]
    pub const fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Platform that confines the patrol, if any.
    #[must_use]
    pub const fn platform(&self) -> Option<PlatformId> {
        self.platform
    }

    /// Left edge the patrol started from.
    #[must_use]
    pub const fn start_x(&self) -> f32 {
        self.start_x
    }

    /// Distance walked to the right of `start_x` before turning around.
    #[must_use]
    pub const fn patrol_distance(&self) -> f32 {
        self.patrol_distance
    }

    /// `1.0` while walking right, `-1.0` while walking left.
    #[must_use]
    pub const fn direction(&self) -> f32 {
        self.direction
    }

    /// Advances the patrol by one step.
    ///
    /// `owner` is the collision box of the platform the enemy is bound to; the
    /// enemy never leaves its horizontal extent.
    pub(crate) fn patrol(&mut self, owner: Option<&Aabb>) {
        self.bounds.translate(Vec2::new(self.speed * self.direction, 0.0));

        if self.bounds.left() > self.start_x + self.patrol_distance {
            self.direction = -1.0;
        } else if self.bounds.left() < self.start_x {
            self.direction = 1.0;
        }

        let Some(owner) = owner else {
            return;
        };

        if self.bounds.right() > owner.right() {
            self.bounds.set_right(owner.right());
            self.direction = -1.0;
        } else if self.bounds.left() < owner.left() {
            self.bounds.set_left(owner.left());
            self.direction = 1.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enemy_on(owner: &Aabb) -> Enemy {
        let bounds = Aabb::from_position_and_size(
            Vec2::new(owner.left() + owner.width() / 2.0, owner.top() - 30.0),
            tuning::ENEMY_SIZE,
        )
        .expect("valid enemy");
        Enemy::new(
            EnemyId::new(0),
            bounds,
            Some(PlatformId::new(4)),
            owner.width() - 30.0,
        )
    }

    #[test]
    fn patrol_turns_at_platform_edge() {
        let owner = Aabb::new(400.0, 250.0, 200.0, 20.0).expect("valid platform");
        let mut enemy = enemy_on(&owner);
        assert_eq!(enemy.start_x(), 500.0);
        assert_eq!(enemy.patrol_distance(), 170.0);

        let mut rightmost = f32::MIN;
        let mut leftmost = f32::MAX;
        let mut flips = 0;
        let mut last_direction = enemy.direction();
        for _ in 0..400 {
            enemy.patrol(Some(&owner));
            rightmost = rightmost.max(enemy.bounds().left());
            leftmost = leftmost.min(enemy.bounds().left());
            assert!(enemy.bounds().right() <= owner.right());
            assert!(enemy.bounds().left() >= owner.left());
            if enemy.direction() != last_direction {
                flips += 1;
                last_direction = enemy.direction();
            }
        }

        assert_eq!(rightmost, 570.0);
        assert!(leftmost >= 498.0);
        assert!(flips >= 4, "expected the patrol to reverse repeatedly");
    }

    #[test]
    fn unbound_patrol_uses_distance_only() {
        let bounds = Aabb::from_position_and_size(Vec2::new(0.0, 0.0), tuning::ENEMY_SIZE)
            .expect("valid enemy");
        let mut enemy = Enemy::new(EnemyId::new(1), bounds, None, 10.0);

        for _ in 0..6 {
            enemy.patrol(None);
        }

        assert_eq!(enemy.bounds().left(), 12.0);
        assert_eq!(enemy.direction(), -1.0);
        enemy.patrol(None);
        assert_eq!(enemy.bounds().left(), 10.0);
    }

    #[test]
    fn coin_phase_wraps() {
        let bounds = Aabb::from_position_and_size(Vec2::ZERO, tuning::COIN_SIZE).expect("coin");
        let mut coin = Coin::new(CoinId::new(0), bounds, 6.25);
        coin.animate();
        assert!(coin.hover_phase() < std::f32::consts::TAU);
        assert_eq!(coin.bounds(), &bounds);
    }
}
