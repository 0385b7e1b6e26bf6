/// Notifications raised by the launch loop for the presentation layer.
/// Events are queued in the order they happen and drained once per frame.

use std::collections::VecDeque;

use crate::catalog::{CargoAmount, CargoId, RocketTypeId};

/// The rocket that just became active, with its loadout at purchase.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveRocket {
    pub rocket: RocketTypeId,
    pub starting_cargo: Vec<CargoAmount>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A new rocket was selected, or `None` when the active one went away
    ActiveRocketChanged(Option<ActiveRocket>),
    ActiveRocketLaunched,
    ActiveRocketDestroyed,
    PeakHeightReached { height: f64, achieved_orbit: bool },
    LoopIncreased(u32),
    /// `changed` is the cargo type whose quantity moved
    CargoUpdated {
        changed: CargoId,
        cargo: Vec<CargoAmount>,
        cargo_weight: f64,
        max_weight: f64,
    },
    CurrencyChanged,
    /// Engine started: booster audio and backwash particles
    EngineIgnited,
    EngineCutOff,
    /// Rocket blew up: hide the sprite, play the explosion
    Exploded,
    /// Short user-facing message
    Alert(String),
}

/// FIFO of pending events.
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: VecDeque<GameEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        self.events.push_back(event);
    }

    /// Take every pending event, oldest first
    pub fn drain(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_preserves_order_and_empties() {
        let mut queue = EventQueue::new();
        queue.push(GameEvent::LoopIncreased(1));
        queue.push(GameEvent::ActiveRocketLaunched);
        queue.push(GameEvent::CurrencyChanged);

        let drained = queue.drain();
        assert_eq!(
            drained,
            vec![
                GameEvent::LoopIncreased(1),
                GameEvent::ActiveRocketLaunched,
                GameEvent::CurrencyChanged,
            ]
        );
        assert!(queue.is_empty());
        assert!(queue.drain().is_empty());
    }
}
