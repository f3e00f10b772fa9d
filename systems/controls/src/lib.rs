#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure input system that translates control frames into world commands.
//!
//! The system follows the session phase by observing
//! [`Event::GameStateChanged`], so a frame is interpreted against the phase
//! the world reported most recently.

use glam::Vec2;
use sky_chaser_core::{tuning, Command, ControlFrame, Event, GameState, PlayerSnapshot, Trigger};

/// Input system mapping [`ControlFrame`]s onto [`Command`]s.
#[derive(Clone, Debug)]
pub struct Controls {
    state: GameState,
}

impl Default for Controls {
    fn default() -> Self {
        Self::new()
    }
}

impl Controls {
    /// Creates a controls system expecting the title menu.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: GameState::Menu,
        }
    }

    /// Phase the system currently interprets input against.
    #[must_use]
    pub const fn state(&self) -> GameState {
        self.state
    }

    /// Consumes world events and one control frame, emitting commands.
    ///
    /// Triggers are translated in order and the batch always ends with a
    /// [`Command::Tick`] carrying the held actions.
    pub fn handle(
        &mut self,
        events: &[Event],
        frame: &ControlFrame,
        player: Option<&PlayerSnapshot>,
        anchors: &[Vec2],
        out: &mut Vec<Command>,
    ) {
        for event in events {
            if let Event::GameStateChanged { to, .. } = event {
                self.state = *to;
            }
        }

        for trigger in &frame.triggers {
            if let Some(command) = self.translate(*trigger, player, anchors) {
                out.push(command);
            }
        }

        out.push(Command::Tick { held: frame.held });
    }

    fn translate(
        &self,
        trigger: Trigger,
        player: Option<&PlayerSnapshot>,
        anchors: &[Vec2],
    ) -> Option<Command> {
        match (self.state, trigger) {
            (GameState::Menu, Trigger::Start) => Some(Command::StartGame),
            (GameState::Playing, Trigger::Jump) => Some(Command::Jump),
            (GameState::Playing, Trigger::GrappleNearest) => {
                let player = player.filter(|player| !player.is_grappling())?;
                nearest_anchor(player.center(), anchors)
                    .map(|anchor| Command::AttachGrapple { anchor })
            }
            (GameState::Playing, Trigger::PointerPressed { world }) => {
                if player.is_some_and(PlayerSnapshot::is_grappling) {
                    Some(Command::ReleaseGrapple)
                } else {
                    Some(Command::AttachGrapple { anchor: world })
                }
            }
            (GameState::Playing, Trigger::ReleaseGrapple) => Some(Command::ReleaseGrapple),
            (GameState::Playing, Trigger::Cancel) => Some(Command::ReturnToMenu),
            (GameState::LevelComplete, Trigger::NextLevel) => Some(Command::AdvanceLevel),
            (GameState::LevelComplete | GameState::GameOver, Trigger::Restart) => {
                Some(Command::RestartGame)
            }
            (GameState::Menu | GameState::LevelComplete | GameState::GameOver, Trigger::Cancel) => {
                Some(Command::EndSession)
            }
            _ => None,
        }
    }
}

/// Closest anchor strictly within grapple range of `origin`.
#[must_use]
pub fn nearest_anchor(origin: Vec2, anchors: &[Vec2]) -> Option<Vec2> {
    anchors
        .iter()
        .map(|anchor| (*anchor, origin.distance(*anchor)))
        .filter(|(_, distance)| *distance < tuning::GRAPPLE_RANGE)
        .min_by(|left, right| left.1.total_cmp(&right.1))
        .map(|(anchor, _)| anchor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_anchor_prefers_closest_in_range() {
        let anchors = [
            Vec2::new(300.0, 100.0),
            Vec2::new(150.0, 120.0),
            Vec2::new(115.0, 400.0),
        ];
        let origin = Vec2::new(115.0, 125.0);
        assert_eq!(
            nearest_anchor(origin, &anchors),
            Some(Vec2::new(150.0, 120.0))
        );
    }

    #[test]
    fn anchors_at_exact_range_are_skipped() {
        let origin = Vec2::ZERO;
        let anchors = [Vec2::new(tuning::GRAPPLE_RANGE, 0.0)];
        assert_eq!(nearest_anchor(origin, &anchors), None);
    }

    #[test]
    fn state_follows_world_events() {
        let mut controls = Controls::new();
        let mut out = Vec::new();
        controls.handle(
            &[Event::GameStateChanged {
                from: GameState::Menu,
                to: GameState::Playing,
            }],
            &ControlFrame::default(),
            None,
            &[],
            &mut out,
        );
        assert_eq!(controls.state(), GameState::Playing);
        assert_eq!(
            out,
            vec![Command::Tick {
                held: Default::default()
            }]
        );
    }
}
