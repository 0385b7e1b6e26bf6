/// The launch loop: one active rocket at a time.
/// Owns the currency ledger and the active rocket. UI actions come in as
/// method calls, the frame clock drives `tick`, and everything the displays
/// need comes out as `GameEvent`s in the order it happened.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::catalog::{CargoAmount, CargoId, Catalog, CurrencyAmount, RocketType, RocketTypeId};
use crate::currency::CurrencyLedger;
use crate::events::{ActiveRocket, EventQueue, GameEvent};
use crate::flight::{CollisionKind, FlightEffect, FlightPhase, RocketInstance};
use crate::tuning::{
    height_reward, orbit_bonus, CONTROL_ORDER, ORBIT_ALTITUDE, PREBURN_STEP, SHIFT_ORDER,
    SINGLE_ORDER,
};

pub const UNSTABLE_LAUNCH_MESSAGE: &str =
    "Your preburn was too short,\nthe rocket became unstable and failed to launch.";

/// Order size picked with modifier keys held on the cargo buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuantityModifier {
    #[default]
    Single,
    Shift,
    Control,
}

impl QuantityModifier {
    /// Shift takes precedence when both keys are held
    pub fn from_keys(shift: bool, control: bool) -> Self {
        if shift {
            QuantityModifier::Shift
        } else if control {
            QuantityModifier::Control
        } else {
            QuantityModifier::Single
        }
    }

    pub fn multiplier(&self) -> u32 {
        match self {
            QuantityModifier::Single => SINGLE_ORDER,
            QuantityModifier::Shift => SHIFT_ORDER,
            QuantityModifier::Control => CONTROL_ORDER,
        }
    }
}

/// Result of a cargo add/remove request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CargoOrder {
    /// Cargo bought; new quantity on board
    Loaded { amount: u32 },
    /// Cargo sold back; new quantity on board
    Unloaded { amount: u32 },
    NothingToRemove,
    NoActiveRocket,
    RocketInFlight,
    UnknownCargo,
    OverWeight,
    CannotAfford,
}

impl CargoOrder {
    pub fn is_success(&self) -> bool {
        matches!(self, CargoOrder::Loaded { .. } | CargoOrder::Unloaded { .. })
    }

    /// Tooltip text for the cargo menu (empty on success)
    pub fn message(&self) -> &'static str {
        match self {
            CargoOrder::Loaded { .. } | CargoOrder::Unloaded { .. } => "",
            CargoOrder::NothingToRemove => "There is none of this cargo on board.",
            CargoOrder::NoActiveRocket => "Select a rocket first.",
            CargoOrder::RocketInFlight => "Cargo can't be changed once the rocket has launched.",
            CargoOrder::UnknownCargo => "Unknown cargo.",
            CargoOrder::OverWeight => {
                "Adding this item would put the rocket over its weight limit."
            }
            CargoOrder::CannotAfford => "You can't afford this cargo.",
        }
    }
}

/// Running totals shown on the statistics panel
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaunchStats {
    pub launches: u32,
    pub orbits: u32,
    pub destroyed: u32,
    pub no_launches: u32,
    pub best_height: f64,
    pub last_peak_height: Option<f64>,
}

pub struct LaunchCoordinator {
    catalog: Catalog,
    currency: CurrencyLedger,
    active: Option<RocketInstance>,
    current_loop: u32,
    stats: LaunchStats,
    events: EventQueue,
    rng: ChaCha8Rng,
}

impl LaunchCoordinator {
    /// Start a game: starting balances credited, no rocket selected.
    /// `seed` only affects the cosmetic tumble of falling rockets.
    pub fn new(catalog: Catalog, seed: u64) -> Self {
        let mut events = EventQueue::new();
        let currency = CurrencyLedger::with_starting_balances(&catalog, &mut events);
        Self {
            catalog,
            currency,
            active: None,
            current_loop: 0,
            stats: LaunchStats::default(),
            events,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    // ==========================================
    // Rocket Selection and Launch
    // ==========================================

    /// Whether the price is covered, counting the refund of the rocket on the pad
    pub fn can_afford_rocket(&self, id: RocketTypeId) -> bool {
        match self.catalog.rocket_type(id) {
            Some(rocket) => self.can_afford_replacement(&rocket.cost),
            None => false,
        }
    }

    fn can_afford_replacement(&self, cost: &[CurrencyAmount]) -> bool {
        let refund = self.active.as_ref().map(|r| r.cost()).unwrap_or_default();
        self.currency.can_afford_with_credit(cost, 1, refund)
    }

    /// Buy a rocket and make it the active one.
    ///
    /// A rocket already on the pad is refunded in full and discarded
    /// without a destroyed notification. Returns false and changes
    /// nothing if the type is unknown, the current rocket is flying, or
    /// the price isn't covered (counting the refund).
    pub fn select_rocket(&mut self, id: RocketTypeId) -> bool {
        let rocket_type = match self.catalog.rocket_type(id) {
            Some(rocket) => rocket.clone(),
            None => {
                log::warn!("select_rocket: unknown rocket type {}", id);
                return false;
            }
        };

        if self.active.as_ref().is_some_and(|r| r.has_launched()) {
            return false;
        }

        if !self.can_afford_replacement(&rocket_type.cost) {
            return false;
        }

        let instance = match RocketInstance::new(&self.catalog, &rocket_type) {
            Some(instance) => instance,
            None => {
                log::warn!("select_rocket: catalog has no fuel cargo type");
                return false;
            }
        };

        if let Some(mut previous) = self.active.take() {
            self.currency.add_all(previous.cost(), 1, &mut self.events);
            previous.discard();
        }
        self.currency.spend(&rocket_type.cost, 1, &mut self.events);

        log::info!("selected rocket {} ({})", rocket_type.name, id);
        let starting_cargo = instance.cargo_snapshot();
        self.active = Some(instance);
        self.events.push(GameEvent::ActiveRocketChanged(Some(ActiveRocket {
            rocket: id,
            starting_cargo,
        })));
        true
    }

    /// Start the preburn of the active rocket and count a new loop.
    /// No-op without a rocket, or if it's already flying.
    pub fn launch_current_rocket(&mut self) -> bool {
        let rocket = match self.active.as_mut() {
            Some(rocket) => rocket,
            None => return false,
        };
        if !rocket.phase().can_launch() {
            return false;
        }

        self.current_loop += 1;
        self.events.push(GameEvent::LoopIncreased(self.current_loop));
        rocket.begin_launch();
        self.stats.launches += 1;
        log::info!("loop {}: launching rocket {}", self.current_loop, rocket.rocket_type());
        true
    }

    /// Advance the active rocket by `dt` seconds
    pub fn tick(&mut self, dt: f64) {
        let (effects, before, after) = match self.active.as_mut() {
            Some(rocket) => {
                let before = rocket.phase();
                let effects = rocket.tick(dt, &mut self.rng);
                (effects, before, rocket.phase())
            }
            None => return,
        };

        if before != FlightPhase::NoLaunch && after == FlightPhase::NoLaunch {
            self.stats.no_launches += 1;
            log::info!("rocket ran out of fuel before liftoff");
        }
        self.apply_effects(effects);
    }

    /// The active rocket hit an obstacle or was shot down
    pub fn report_collision(&mut self, kind: CollisionKind) -> bool {
        let effects = match self.active.as_mut() {
            Some(rocket) => rocket.destroy(kind),
            None => return false,
        };
        self.apply_effects(effects);
        true
    }

    // ==========================================
    // Cargo and Preburn
    // ==========================================

    /// Buy `modifier` units of cargo onto the active rocket
    pub fn add_cargo(&mut self, cargo_id: CargoId, modifier: QuantityModifier) -> CargoOrder {
        let qty = modifier.multiplier();
        let cargo = match self.catalog.cargo_type(cargo_id) {
            Some(cargo) => cargo.clone(),
            None => return CargoOrder::UnknownCargo,
        };
        let rocket = match self.active.as_mut() {
            Some(rocket) => rocket,
            None => return CargoOrder::NoActiveRocket,
        };
        if !rocket.phase().can_launch() {
            return CargoOrder::RocketInFlight;
        }
        if !rocket.has_weight_available(cargo.unit_weight * qty as f64) {
            return CargoOrder::OverWeight;
        }
        if !self.currency.can_afford(&cargo.cost, qty) {
            return CargoOrder::CannotAfford;
        }

        self.currency.spend(&cargo.cost, qty, &mut self.events);
        let (amount, effect) = rocket.load_cargo(&cargo, qty);
        self.apply_effects(vec![effect]);
        CargoOrder::Loaded { amount }
    }

    /// Sell back up to `modifier` units of cargo from the active rocket
    pub fn remove_cargo(&mut self, cargo_id: CargoId, modifier: QuantityModifier) -> CargoOrder {
        let cargo = match self.catalog.cargo_type(cargo_id) {
            Some(cargo) => cargo.clone(),
            None => return CargoOrder::UnknownCargo,
        };
        let rocket = match self.active.as_mut() {
            Some(rocket) => rocket,
            None => return CargoOrder::NoActiveRocket,
        };
        if !rocket.phase().can_launch() {
            return CargoOrder::RocketInFlight;
        }
        if !rocket.cargo().contains(cargo_id) {
            return CargoOrder::NothingToRemove;
        }

        let (removed, effect) = rocket.unload_cargo(&cargo, modifier.multiplier());
        let amount = rocket.cargo().get(cargo_id);
        self.currency.add_all(&cargo.cost, removed, &mut self.events);
        self.apply_effects(vec![effect]);
        CargoOrder::Unloaded { amount }
    }

    pub fn increase_preburn(&mut self) -> bool {
        self.adjust_preburn(PREBURN_STEP)
    }

    pub fn decrease_preburn(&mut self) -> bool {
        self.adjust_preburn(-PREBURN_STEP)
    }

    fn adjust_preburn(&mut self, delta: f64) -> bool {
        let rocket = match self.active.as_mut() {
            Some(rocket) => rocket,
            None => return false,
        };
        if rocket.has_launched() {
            return false;
        }
        // Snap to the step so repeated clicks don't drift
        let scale = 1.0 / PREBURN_STEP;
        let next = ((rocket.preburn_duration() + delta) * scale).round() / scale;
        rocket.set_preburn_duration(next.max(0.0));
        true
    }

    // ==========================================
    // Outcomes
    // ==========================================

    fn apply_effects(&mut self, effects: Vec<FlightEffect>) {
        for effect in effects {
            match effect {
                FlightEffect::Launched => self.events.push(GameEvent::ActiveRocketLaunched),
                FlightEffect::EngineIgnited => self.events.push(GameEvent::EngineIgnited),
                FlightEffect::EngineCutOff => self.events.push(GameEvent::EngineCutOff),
                FlightEffect::Exploded => self.events.push(GameEvent::Exploded),
                FlightEffect::CargoUpdated {
                    changed,
                    cargo,
                    cargo_weight,
                    max_weight,
                } => self.events.push(GameEvent::CargoUpdated {
                    changed,
                    cargo,
                    cargo_weight,
                    max_weight,
                }),
                FlightEffect::Unstable { refund } => {
                    self.currency.add_all(&refund, 1, &mut self.events);
                    self.events
                        .push(GameEvent::Alert(UNSTABLE_LAUNCH_MESSAGE.to_string()));
                }
                FlightEffect::PeakHeightReached {
                    height,
                    achieved_orbit,
                } => self.on_peak_height(height, achieved_orbit),
                FlightEffect::Destroyed => self.on_destroyed(),
            }
        }
    }

    /// Peak pays height/2; orbit pays height/3 on top and retires the rocket
    fn on_peak_height(&mut self, height: f64, achieved_orbit: bool) {
        self.events.push(GameEvent::PeakHeightReached {
            height,
            achieved_orbit,
        });
        self.stats.last_peak_height = Some(height);
        self.stats.best_height = self.stats.best_height.max(height);

        if achieved_orbit {
            self.stats.orbits += 1;
            self.reward(orbit_bonus(height));
        }
        self.reward(height_reward(height));

        if achieved_orbit {
            log::info!("orbit achieved at {:.1}", height);
            self.active = None;
            self.events.push(GameEvent::ActiveRocketChanged(None));
        }
    }

    /// Rocket lost: pay for the height reached unless its peak already paid
    fn on_destroyed(&mut self) {
        let rocket = match self.active.take() {
            Some(rocket) => rocket,
            None => return,
        };
        if !rocket.peak_reported() {
            self.reward(height_reward(rocket.max_height()));
        }
        self.stats.destroyed += 1;
        self.events.push(GameEvent::ActiveRocketChanged(None));
        self.events.push(GameEvent::ActiveRocketDestroyed);
    }

    fn reward(&mut self, amount: i64) {
        if amount > 0 {
            self.currency
                .add(self.catalog.reward_currency, amount, &mut self.events);
        }
    }

    // ==========================================
    // Queries
    // ==========================================

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn currency(&self) -> &CurrencyLedger {
        &self.currency
    }

    pub fn stats(&self) -> &LaunchStats {
        &self.stats
    }

    pub fn current_loop(&self) -> u32 {
        self.current_loop
    }

    pub fn has_active_rocket(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_rocket(&self) -> Option<&RocketInstance> {
        self.active.as_ref()
    }

    pub fn active_rocket_type(&self) -> Option<&RocketType> {
        self.active
            .as_ref()
            .and_then(|r| self.catalog.rocket_type(r.rocket_type()))
    }

    /// Preburn started and the flight hasn't ended
    pub fn is_launch_in_progress(&self) -> bool {
        self.active.as_ref().is_some_and(|r| r.has_launched())
    }

    pub fn preburn_duration(&self) -> f64 {
        self.active.as_ref().map_or(0.0, |r| r.preburn_duration())
    }

    pub fn remaining_preburn(&self) -> f64 {
        self.active.as_ref().map_or(0.0, |r| r.remaining_preburn())
    }

    pub fn height(&self) -> f64 {
        self.active.as_ref().map_or(0.0, |r| r.height())
    }

    /// Height as a fraction of orbit altitude, clamped to [0, 1]
    pub fn height_normalized(&self) -> f64 {
        (self.height() / ORBIT_ALTITUDE).clamp(0.0, 1.0)
    }

    pub fn cargo_snapshot(&self) -> Option<Vec<CargoAmount>> {
        self.active.as_ref().map(|r| r.cargo_snapshot())
    }

    /// Whether `extra` cargo weight still fits on the active rocket
    pub fn has_weight_available(&self, extra: f64) -> bool {
        self.active
            .as_ref()
            .is_some_and(|r| r.has_weight_available(extra))
    }

    /// Take every event raised since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CurrencyId;

    const CR: CurrencyId = CurrencyId(1);
    const FUEL: CargoId = CargoId(1);
    const SATELLITE: CargoId = CargoId(2);
    const SPARROW: RocketTypeId = RocketTypeId(1);
    const KESTREL: RocketTypeId = RocketTypeId(2);
    const ATLAS: RocketTypeId = RocketTypeId(3);
    const DT: f64 = 0.125;

    fn coordinator() -> LaunchCoordinator {
        let mut coordinator = LaunchCoordinator::new(Catalog::default_catalog(), 42);
        coordinator.drain_events();
        coordinator
    }

    fn with_sparrow() -> LaunchCoordinator {
        let mut coordinator = coordinator();
        assert!(coordinator.select_rocket(SPARROW));
        coordinator.drain_events();
        coordinator
    }

    fn count(events: &[GameEvent], wanted: &GameEvent) -> usize {
        events.iter().filter(|e| *e == wanted).count()
    }

    fn force(coordinator: &mut LaunchCoordinator, phase: FlightPhase, height: f64, speed: f64) {
        coordinator
            .active
            .as_mut()
            .unwrap()
            .force_flight(phase, height, speed);
    }

    #[test]
    fn test_new_coordinator() {
        let mut coordinator = LaunchCoordinator::new(Catalog::default_catalog(), 1);
        assert_eq!(coordinator.currency().get(CR), 500);
        assert!(!coordinator.has_active_rocket());
        assert_eq!(coordinator.current_loop(), 0);
        assert_eq!(
            coordinator.drain_events(),
            vec![GameEvent::CurrencyChanged, GameEvent::CurrencyChanged]
        );
    }

    #[test]
    fn test_select_rocket_spends_and_announces() {
        let mut coordinator = coordinator();
        assert!(coordinator.can_afford_rocket(SPARROW));
        assert!(coordinator.select_rocket(SPARROW));

        assert_eq!(coordinator.currency().get(CR), 450);
        assert_eq!(coordinator.active_rocket_type().unwrap().name, "Sparrow");
        assert_eq!(
            coordinator.drain_events(),
            vec![
                GameEvent::CurrencyChanged,
                GameEvent::ActiveRocketChanged(Some(ActiveRocket {
                    rocket: SPARROW,
                    starting_cargo: vec![CargoAmount::new(FUEL, 100)],
                })),
            ]
        );
    }

    #[test]
    fn test_select_unaffordable_rocket_is_noop() {
        let mut coordinator = coordinator();
        assert!(!coordinator.can_afford_rocket(ATLAS));
        assert!(!coordinator.select_rocket(ATLAS));
        assert!(!coordinator.select_rocket(RocketTypeId(99)));

        assert!(!coordinator.has_active_rocket());
        assert_eq!(coordinator.currency().get(CR), 500);
        assert!(coordinator.drain_events().is_empty());
    }

    #[test]
    fn test_select_replaces_active_rocket_with_refund() {
        let mut coordinator = with_sparrow();
        assert!(coordinator.select_rocket(KESTREL));

        assert_eq!(coordinator.currency().get(CR), 500 - 200);
        let events = coordinator.drain_events();
        let changed: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::ActiveRocketChanged(active) => Some(active.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(
            changed,
            vec![Some(ActiveRocket {
                rocket: KESTREL,
                starting_cargo: vec![CargoAmount::new(FUEL, 200)],
            })]
        );
        assert_eq!(count(&events, &GameEvent::ActiveRocketDestroyed), 0);
        assert_eq!(coordinator.stats().destroyed, 0);
    }

    #[test]
    fn test_refund_counts_toward_replacement_price() {
        let mut coordinator = with_sparrow();
        let mut scratch = EventQueue::new();
        coordinator
            .currency
            .spend(&[CurrencyAmount::new(CR, 300)], 1, &mut scratch);
        assert_eq!(coordinator.currency().get(CR), 150);

        // 150 on hand + 50 back from the Sparrow covers the Kestrel
        assert!(coordinator.select_rocket(KESTREL));
        assert_eq!(coordinator.currency().get(CR), 0);
    }

    #[test]
    fn test_affordability_gate_matches_selection() {
        let mut coordinator = with_sparrow();
        let mut scratch = EventQueue::new();
        coordinator
            .currency
            .spend(&[CurrencyAmount::new(CR, 300)], 1, &mut scratch);

        // Not affordable on the balance alone, affordable with the Sparrow's refund
        assert!(!coordinator.currency().can_afford(&[CurrencyAmount::new(CR, 200)], 1));
        assert!(coordinator.can_afford_rocket(KESTREL));
        assert!(coordinator.select_rocket(KESTREL));

        // 0 left and the Kestrel only refunds 200
        assert!(!coordinator.can_afford_rocket(ATLAS));
        assert!(!coordinator.select_rocket(ATLAS));
    }

    #[test]
    fn test_select_refused_while_flying() {
        let mut coordinator = with_sparrow();
        coordinator.launch_current_rocket();
        coordinator.tick(DT);

        assert!(!coordinator.select_rocket(KESTREL));
        assert_eq!(coordinator.active_rocket().unwrap().rocket_type(), SPARROW);
    }

    #[test]
    fn test_launch_without_rocket_is_noop() {
        let mut coordinator = coordinator();
        assert!(!coordinator.launch_current_rocket());
        coordinator.tick(DT);
        assert_eq!(coordinator.current_loop(), 0);
        assert!(coordinator.drain_events().is_empty());
    }

    #[test]
    fn test_launch_counts_loop_and_starts_preburn() {
        let mut coordinator = with_sparrow();
        assert!(coordinator.launch_current_rocket());
        assert_eq!(coordinator.drain_events(), vec![GameEvent::LoopIncreased(1)]);
        assert!(coordinator.is_launch_in_progress());

        coordinator.tick(DT);
        let events = coordinator.drain_events();
        assert_eq!(events[0], GameEvent::ActiveRocketLaunched);
        assert_eq!(events[1], GameEvent::EngineIgnited);
        assert!(matches!(events[2], GameEvent::CargoUpdated { .. }));
        assert_eq!(coordinator.remaining_preburn(), 1.0 - DT);

        // Already flying
        assert!(!coordinator.launch_current_rocket());
        assert_eq!(coordinator.current_loop(), 1);
        assert_eq!(coordinator.stats().launches, 1);
    }

    #[test]
    fn test_collision_rewards_half_height() {
        let mut coordinator = with_sparrow();
        force(&mut coordinator, FlightPhase::Launch, 450.0, 150.0);

        assert!(coordinator.report_collision(CollisionKind::SolidObject));
        assert_eq!(coordinator.currency().get(CR), 450 + 225);
        assert!(!coordinator.has_active_rocket());

        let events = coordinator.drain_events();
        assert_eq!(count(&events, &GameEvent::ActiveRocketDestroyed), 1);
        assert_eq!(count(&events, &GameEvent::ActiveRocketChanged(None)), 1);
        assert_eq!(count(&events, &GameEvent::Exploded), 1);
        assert_eq!(coordinator.stats().destroyed, 1);

        assert!(!coordinator.report_collision(CollisionKind::Projectile));
    }

    #[test]
    fn test_orbit_pays_bonus_and_base_reward() {
        let mut coordinator = with_sparrow();
        force(&mut coordinator, FlightPhase::BurnedOut, 1200.0, 0.0);
        coordinator.tick(DT);

        assert_eq!(coordinator.currency().get(CR), 450 + 400 + 600);
        assert!(!coordinator.has_active_rocket());

        let events = coordinator.drain_events();
        assert_eq!(
            events[0],
            GameEvent::PeakHeightReached {
                height: 1200.0,
                achieved_orbit: true,
            }
        );
        assert_eq!(count(&events, &GameEvent::ActiveRocketChanged(None)), 1);
        assert_eq!(count(&events, &GameEvent::ActiveRocketDestroyed), 0);
        assert_eq!(coordinator.stats().orbits, 1);
        assert_eq!(coordinator.stats().best_height, 1200.0);
    }

    #[test]
    fn test_peak_then_crash_pays_once() {
        let mut coordinator = with_sparrow();
        force(&mut coordinator, FlightPhase::BurnedOut, 500.0, 0.0);
        coordinator.tick(DT);
        assert_eq!(coordinator.currency().get(CR), 450 + 250);
        assert!(coordinator.has_active_rocket());
        assert_eq!(coordinator.stats().last_peak_height, Some(500.0));

        coordinator.report_collision(CollisionKind::SolidObject);
        assert_eq!(coordinator.currency().get(CR), 450 + 250);
        let events = coordinator.drain_events();
        assert_eq!(count(&events, &GameEvent::ActiveRocketDestroyed), 1);
    }

    #[test]
    fn test_unstable_launch_refunds_rocket() {
        let mut coordinator = with_sparrow();
        while coordinator.preburn_duration() > 0.0 {
            assert!(coordinator.decrease_preburn());
        }
        coordinator.launch_current_rocket();
        coordinator.tick(DT);
        coordinator.tick(DT);

        assert!(!coordinator.has_active_rocket());
        assert_eq!(coordinator.currency().get(CR), 500);
        let events = coordinator.drain_events();
        assert_eq!(
            count(&events, &GameEvent::Alert(UNSTABLE_LAUNCH_MESSAGE.to_string())),
            1
        );
        assert_eq!(count(&events, &GameEvent::ActiveRocketDestroyed), 1);
        assert!(!events
            .iter()
            .any(|e| matches!(e, GameEvent::PeakHeightReached { .. })));
    }

    #[test]
    fn test_no_launch_then_refuel_and_retry() {
        let mut coordinator = with_sparrow();
        assert_eq!(
            coordinator.remove_cargo(FUEL, QuantityModifier::Control),
            CargoOrder::Unloaded { amount: 0 }
        );
        assert_eq!(coordinator.currency().get(CR), 550);

        coordinator.launch_current_rocket();
        coordinator.tick(DT);
        assert_eq!(
            coordinator.active_rocket().unwrap().phase(),
            FlightPhase::NoLaunch
        );
        assert_eq!(coordinator.stats().no_launches, 1);
        assert!(!coordinator.is_launch_in_progress());

        assert_eq!(
            coordinator.add_cargo(FUEL, QuantityModifier::Control),
            CargoOrder::Loaded { amount: 100 }
        );
        assert!(coordinator.launch_current_rocket());
        assert_eq!(coordinator.current_loop(), 2);
    }

    #[test]
    fn test_add_cargo_checks_weight_then_funds() {
        let mut coordinator = with_sparrow();

        assert_eq!(
            coordinator.add_cargo(SATELLITE, QuantityModifier::Single),
            CargoOrder::Loaded { amount: 1 }
        );
        assert_eq!(coordinator.currency().get(CR), 410);
        let events = coordinator.drain_events();
        assert_eq!(events[0], GameEvent::CurrencyChanged);
        assert_eq!(
            events[1],
            GameEvent::CargoUpdated {
                changed: SATELLITE,
                cargo: vec![CargoAmount::new(FUEL, 100), CargoAmount::new(SATELLITE, 1)],
                cargo_weight: 125.0,
                max_weight: 250.0,
            }
        );

        assert_eq!(
            coordinator.add_cargo(SATELLITE, QuantityModifier::Shift),
            CargoOrder::OverWeight
        );
        assert_eq!(
            coordinator.add_cargo(FUEL, QuantityModifier::Control),
            CargoOrder::Loaded { amount: 200 }
        );
        assert_eq!(coordinator.active_rocket().unwrap().fuel(), 200.0);
        assert!(!coordinator.has_weight_available(60.0));
        assert!(coordinator.has_weight_available(25.0));

        let mut kestrel = LaunchCoordinator::new(Catalog::default_catalog(), 42);
        assert!(kestrel.select_rocket(KESTREL));
        // 10 satellites fit exactly but cost 400 of the 300 left
        assert_eq!(
            kestrel.add_cargo(SATELLITE, QuantityModifier::Shift),
            CargoOrder::CannotAfford
        );
        assert_eq!(kestrel.currency().get(CR), 300);
    }

    #[test]
    fn test_remove_cargo_refunds_and_clamps() {
        let mut coordinator = with_sparrow();
        coordinator.add_cargo(SATELLITE, QuantityModifier::Single);
        assert_eq!(
            coordinator.remove_cargo(SATELLITE, QuantityModifier::Shift),
            CargoOrder::Unloaded { amount: 0 }
        );
        assert_eq!(coordinator.currency().get(CR), 450);
        assert_eq!(
            coordinator.cargo_snapshot(),
            Some(vec![CargoAmount::new(FUEL, 100)])
        );
        assert_eq!(
            coordinator.remove_cargo(SATELLITE, QuantityModifier::Single),
            CargoOrder::NothingToRemove
        );
    }

    #[test]
    fn test_cargo_orders_need_a_rocket_on_the_pad() {
        let mut coordinator = coordinator();
        assert_eq!(
            coordinator.add_cargo(FUEL, QuantityModifier::Single),
            CargoOrder::NoActiveRocket
        );
        assert_eq!(
            coordinator.add_cargo(CargoId(99), QuantityModifier::Single),
            CargoOrder::UnknownCargo
        );
        assert_eq!(coordinator.cargo_snapshot(), None);

        coordinator.select_rocket(SPARROW);
        coordinator.launch_current_rocket();
        coordinator.tick(DT);
        let order = coordinator.add_cargo(FUEL, QuantityModifier::Single);
        assert_eq!(order, CargoOrder::RocketInFlight);
        assert!(!order.is_success());
        assert!(!order.message().is_empty());
    }

    #[test]
    fn test_quantity_modifiers() {
        assert_eq!(QuantityModifier::from_keys(false, false).multiplier(), 1);
        assert_eq!(QuantityModifier::from_keys(true, false).multiplier(), 10);
        assert_eq!(QuantityModifier::from_keys(false, true).multiplier(), 100);
        assert_eq!(QuantityModifier::from_keys(true, true), QuantityModifier::Shift);
    }

    #[test]
    fn test_height_queries() {
        let mut coordinator = coordinator();
        assert_eq!(coordinator.height(), 0.0);
        assert_eq!(coordinator.height_normalized(), 0.0);

        coordinator.select_rocket(SPARROW);
        force(&mut coordinator, FlightPhase::Launch, 450.0, 150.0);
        assert_eq!(coordinator.height_normalized(), 0.45);
        force(&mut coordinator, FlightPhase::Launch, 2500.0, 150.0);
        assert_eq!(coordinator.height_normalized(), 1.0);
        force(&mut coordinator, FlightPhase::BurnedOut, -1.0, 0.0);
        assert_eq!(coordinator.height_normalized(), 0.0);
    }

    #[test]
    fn test_preburn_controls() {
        let mut coordinator = coordinator();
        assert!(!coordinator.increase_preburn());

        coordinator.select_rocket(SPARROW);
        assert!(coordinator.increase_preburn());
        assert_eq!(coordinator.preburn_duration(), 1.1);
        coordinator.decrease_preburn();
        coordinator.decrease_preburn();
        assert_eq!(coordinator.preburn_duration(), 0.9);

        coordinator.launch_current_rocket();
        assert!(!coordinator.increase_preburn());
    }

    #[test]
    fn test_same_seed_same_game() {
        let play = || {
            let mut coordinator = LaunchCoordinator::new(Catalog::default_catalog(), 9);
            coordinator.select_rocket(SPARROW);
            coordinator.launch_current_rocket();
            for _ in 0..600 {
                coordinator.tick(DT);
            }
            let rotation = coordinator
                .active_rocket()
                .map(|r| r.rotation_degrees());
            (coordinator.drain_events(), coordinator.currency().balances(), rotation)
        };
        assert_eq!(play(), play());
    }
}
