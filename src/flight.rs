use rand::Rng;
use rand_distr::{Distribution, Uniform};

use crate::cargo::CargoLedger;
use crate::catalog::{
    CargoAmount, CargoId, CargoType, Catalog, CurrencyAmount, RocketType, RocketTypeId,
};
use crate::tuning::{
    drag_divisor, gravity_factor, lerp, ASCENT_RAMP_RATE, COAST_RAMP_RATE, DESCENT_FLOOR,
    FUEL_BURN_RATE, HULL_WEIGHT, MIN_ASCENT_LIFT, ORBIT_ALTITUDE, STABILITY_FACTOR,
    TUMBLE_MAX_DEGREES,
};

/// Where a rocket is in its flight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightPhase {
    /// On the pad, waiting for the launch button
    Idle,
    /// Engine lit on the pad, counting down the preburn
    PreLaunch,
    /// Climbing under power
    Launch,
    /// Out of fuel: coasting up, then falling
    BurnedOut,
    /// Ran dry before liftoff
    NoLaunch,
    OrbitAchieved,
    Destroyed,
}

impl FlightPhase {
    /// Engine lit or airborne
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            FlightPhase::PreLaunch | FlightPhase::Launch | FlightPhase::BurnedOut
        )
    }

    /// No further simulation happens in these phases
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            FlightPhase::NoLaunch | FlightPhase::OrbitAchieved | FlightPhase::Destroyed
        )
    }

    /// Phases from which the launch button starts a preburn.
    /// A rocket that ran dry on the pad can be refuelled and tried again.
    pub fn can_launch(&self) -> bool {
        matches!(self, FlightPhase::Idle | FlightPhase::NoLaunch)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FlightPhase::Idle => "Idle",
            FlightPhase::PreLaunch => "Preburn",
            FlightPhase::Launch => "Ascent",
            FlightPhase::BurnedOut => "Burned out",
            FlightPhase::NoLaunch => "Failed to launch",
            FlightPhase::OrbitAchieved => "Orbit achieved",
            FlightPhase::Destroyed => "Destroyed",
        }
    }
}

/// What the rocket ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionKind {
    SolidObject,
    Projectile,
}

/// Outcome of a simulation step, in the order it happened.
#[derive(Debug, Clone, PartialEq)]
pub enum FlightEffect {
    /// First tick of a preburn
    Launched,
    EngineIgnited,
    EngineCutOff,
    /// `changed` is the cargo type whose quantity moved
    CargoUpdated {
        changed: CargoId,
        cargo: Vec<CargoAmount>,
        cargo_weight: f64,
        max_weight: f64,
    },
    /// Preburn too short for the load; the purchase price is refunded
    Unstable { refund: Vec<CurrencyAmount> },
    PeakHeightReached { height: f64, achieved_orbit: bool },
    Exploded,
    /// Destroyed notification, absent when suppressed
    Destroyed,
}

/// One purchased rocket and its flight state.
#[derive(Debug, Clone)]
pub struct RocketInstance {
    rocket_type: RocketTypeId,
    cost: Vec<CurrencyAmount>,
    fuel_type: CargoType,
    cargo: CargoLedger,
    max_weight: f64,
    /// Fractional fuel; the cargo ledger holds its floor
    fuel: f64,
    /// Hull plus cargo
    weight: f64,
    /// Speed budget: the ascent target, then drained by weight while coasting
    travel_speed: f64,
    current_speed: f64,
    lerp_time: f64,
    preburn_duration: f64,
    launch_timer: f64,
    height: f64,
    max_height: f64,
    rotation_degrees: f64,
    phase: FlightPhase,
    engine_running: bool,
    launch_reported: bool,
    peak_reported: bool,
    suppress_destroyed: bool,
}

impl RocketInstance {
    /// Fresh rocket on the pad, loaded with the type's starting cargo.
    /// Returns `None` if the catalog has no fuel cargo type.
    pub fn new(catalog: &Catalog, rocket: &RocketType) -> Option<Self> {
        let fuel_type = catalog.fuel_type()?.clone();
        let cargo = CargoLedger::from_amounts(catalog, &rocket.starting_cargo);
        let fuel = cargo.get(fuel_type.id) as f64;
        let weight = HULL_WEIGHT + cargo.total_weight();

        Some(Self {
            rocket_type: rocket.id,
            cost: rocket.cost.clone(),
            fuel_type,
            cargo,
            max_weight: rocket.max_weight,
            fuel,
            weight,
            travel_speed: rocket.travel_speed,
            current_speed: 0.0,
            lerp_time: 0.0,
            preburn_duration: rocket.preburn_duration,
            launch_timer: rocket.preburn_duration,
            height: 0.0,
            max_height: 0.0,
            rotation_degrees: 0.0,
            phase: FlightPhase::Idle,
            engine_running: false,
            launch_reported: false,
            peak_reported: false,
            suppress_destroyed: false,
        })
    }

    // ==========================================
    // Commands
    // ==========================================

    /// Start the preburn countdown. Ignored unless idle or after a failed launch.
    pub fn begin_launch(&mut self) -> bool {
        if !self.phase.can_launch() {
            return false;
        }
        self.launch_timer = self.preburn_duration;
        self.launch_reported = false;
        self.set_phase(FlightPhase::PreLaunch);
        true
    }

    /// Advance the simulation by `dt` seconds.
    /// `rng` only drives the cosmetic tumble while falling.
    pub fn tick<R: Rng + ?Sized>(&mut self, dt: f64, rng: &mut R) -> Vec<FlightEffect> {
        let mut effects = Vec::new();
        match self.phase {
            FlightPhase::PreLaunch => self.tick_preburn(dt, &mut effects),
            FlightPhase::Launch => self.tick_ascent(dt, &mut effects),
            FlightPhase::BurnedOut => self.tick_burned_out(dt, rng, &mut effects),
            FlightPhase::Idle
            | FlightPhase::NoLaunch
            | FlightPhase::OrbitAchieved
            | FlightPhase::Destroyed => {}
        }
        effects
    }

    /// Collision with an obstacle or a projectile: destroyed whatever the phase.
    pub fn destroy(&mut self, cause: CollisionKind) -> Vec<FlightEffect> {
        let mut effects = Vec::new();
        if self.phase == FlightPhase::Destroyed {
            return effects;
        }
        log::info!(
            "rocket {} destroyed by {:?} at height {:.1}",
            self.rocket_type,
            cause,
            self.height
        );
        self.enter_destroyed(true, &mut effects);
        effects
    }

    /// Drop the rocket quietly (it's being replaced). No destroyed notification.
    pub fn discard(&mut self) -> Vec<FlightEffect> {
        let mut effects = Vec::new();
        self.suppress_destroyed_notification();
        if self.phase != FlightPhase::Destroyed {
            self.enter_destroyed(false, &mut effects);
        }
        effects
    }

    pub fn suppress_destroyed_notification(&mut self) {
        self.suppress_destroyed = true;
    }

    /// Put `amount` more units aboard, returns the new quantity.
    /// Loading fuel fills the tank.
    pub fn load_cargo(&mut self, cargo: &CargoType, amount: u32) -> (u32, FlightEffect) {
        let total = self.cargo.add(cargo, amount);
        (total, self.cargo_changed(cargo.id))
    }

    /// Take up to `amount` units off, returns how many came off
    pub fn unload_cargo(&mut self, cargo: &CargoType, amount: u32) -> (u32, FlightEffect) {
        let removed = self.cargo.remove(cargo, amount);
        (removed, self.cargo_changed(cargo.id))
    }

    fn cargo_changed(&mut self, changed: CargoId) -> FlightEffect {
        if changed == self.fuel_type.id {
            self.fuel = self.cargo.get(changed) as f64;
        }
        self.weight = HULL_WEIGHT + self.cargo.total_weight();
        self.cargo_updated(changed)
    }

    /// Change the preburn length (clamped at 0). Ignored mid-flight.
    pub fn set_preburn_duration(&mut self, seconds: f64) {
        if self.phase.is_in_flight() {
            return;
        }
        self.preburn_duration = seconds.max(0.0);
        self.launch_timer = self.preburn_duration;
    }

    // ==========================================
    // Phases
    // ==========================================

    fn tick_preburn(&mut self, dt: f64, effects: &mut Vec<FlightEffect>) {
        if !self.launch_reported {
            self.launch_reported = true;
            effects.push(FlightEffect::Launched);
        }
        if !self.engine_running {
            self.engine_running = true;
            effects.push(FlightEffect::EngineIgnited);
        }

        self.burn_fuel(dt, effects);
        if self.fuel <= 0.0 {
            self.stop_engine(effects);
            self.set_phase(FlightPhase::NoLaunch);
            return;
        }

        self.launch_timer -= dt;
        if self.launch_timer < 0.0 {
            self.set_phase(FlightPhase::Launch);
        }
    }

    fn tick_ascent(&mut self, dt: f64, effects: &mut Vec<FlightEffect>) {
        // Checked against the current load every tick, burned fuel included
        if self.preburn_duration * STABILITY_FACTOR < self.cargo.total_weight() {
            log::info!(
                "rocket {} unstable: preburn {:.1}s for cargo weight {:.1}",
                self.rocket_type,
                self.preburn_duration,
                self.cargo.total_weight()
            );
            effects.push(FlightEffect::Unstable {
                refund: self.cost.clone(),
            });
            self.enter_destroyed(true, effects);
            return;
        }

        if self.fuel > 0.0 {
            self.current_speed = lerp(0.0, self.travel_speed, self.lerp_time);
            self.lerp_time += ASCENT_RAMP_RATE * dt;

            let mut lift = self.current_speed - self.weight / drag_divisor(self.height);
            if lift < 0.0 {
                lift = MIN_ASCENT_LIFT;
            }
            self.climb(lift * dt);
            self.burn_fuel(dt, effects);
        } else {
            self.stop_engine(effects);
            self.set_phase(FlightPhase::BurnedOut);
        }
    }

    fn tick_burned_out<R: Rng + ?Sized>(
        &mut self,
        dt: f64,
        rng: &mut R,
        effects: &mut Vec<FlightEffect>,
    ) {
        if self.travel_speed > 0.0 {
            self.current_speed = lerp(0.0, self.travel_speed, self.lerp_time);
            self.lerp_time += COAST_RAMP_RATE * dt;

            let lift = (self.current_speed - self.weight / drag_divisor(self.height)).max(0.0);
            self.climb(lift * dt);
            self.travel_speed -= self.weight * dt;
            return;
        }

        self.current_speed = 0.0;
        let achieved_orbit = self.height > ORBIT_ALTITUDE;
        if !self.peak_reported {
            self.peak_reported = true;
            log::info!(
                "rocket {} peaked at {:.1} (orbit: {})",
                self.rocket_type,
                self.height,
                achieved_orbit
            );
            effects.push(FlightEffect::PeakHeightReached {
                height: self.height,
                achieved_orbit,
            });
        }

        if achieved_orbit {
            self.set_phase(FlightPhase::OrbitAchieved);
            return;
        }

        let fall = self.weight * gravity_factor(self.height) * dt;
        self.height = (self.height - fall).max(DESCENT_FLOOR);

        let tumble = Uniform::new(0.0, TUMBLE_MAX_DEGREES);
        self.rotation_degrees = (self.rotation_degrees + tumble.sample(rng)) % 360.0;
    }

    // ==========================================
    // Helpers
    // ==========================================

    fn burn_fuel(&mut self, dt: f64, effects: &mut Vec<FlightEffect>) {
        self.fuel = (self.fuel - FUEL_BURN_RATE * dt).max(0.0);
        self.cargo.set(&self.fuel_type, self.fuel.floor() as u32);
        self.weight = HULL_WEIGHT + self.cargo.total_weight();
        effects.push(self.cargo_updated(self.fuel_type.id));
    }

    fn climb(&mut self, delta: f64) {
        self.height += delta;
        self.max_height = self.max_height.max(self.height);
    }

    fn stop_engine(&mut self, effects: &mut Vec<FlightEffect>) {
        if self.engine_running {
            self.engine_running = false;
            effects.push(FlightEffect::EngineCutOff);
        }
    }

    fn enter_destroyed(&mut self, explode: bool, effects: &mut Vec<FlightEffect>) {
        self.stop_engine(effects);
        self.current_speed = 0.0;
        self.set_phase(FlightPhase::Destroyed);
        if explode {
            effects.push(FlightEffect::Exploded);
        }
        if !self.suppress_destroyed {
            effects.push(FlightEffect::Destroyed);
        }
    }

    fn set_phase(&mut self, phase: FlightPhase) {
        log::debug!(
            "rocket {}: {} -> {}",
            self.rocket_type,
            self.phase.display_name(),
            phase.display_name()
        );
        self.phase = phase;
    }

    fn cargo_updated(&self, changed: CargoId) -> FlightEffect {
        FlightEffect::CargoUpdated {
            changed,
            cargo: self.cargo.snapshot(),
            cargo_weight: self.cargo.total_weight(),
            max_weight: self.max_weight,
        }
    }

    // ==========================================
    // Queries
    // ==========================================

    pub fn rocket_type(&self) -> RocketTypeId {
        self.rocket_type
    }

    /// Purchase price, refunded on replacement or instability
    pub fn cost(&self) -> &[CurrencyAmount] {
        &self.cost
    }

    pub fn phase(&self) -> FlightPhase {
        self.phase
    }

    /// Preburn started and the flight hasn't ended
    pub fn has_launched(&self) -> bool {
        self.phase.is_in_flight()
    }

    pub fn cargo(&self) -> &CargoLedger {
        &self.cargo
    }

    pub fn cargo_snapshot(&self) -> Vec<CargoAmount> {
        self.cargo.snapshot()
    }

    pub fn cargo_weight(&self) -> f64 {
        self.cargo.total_weight()
    }

    pub fn max_weight(&self) -> f64 {
        self.max_weight
    }

    /// Whether `extra` weight still fits under the cargo limit
    pub fn has_weight_available(&self, extra: f64) -> bool {
        self.cargo.total_weight() + extra <= self.max_weight
    }

    pub fn fuel(&self) -> f64 {
        self.fuel
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Highest altitude reached so far
    pub fn max_height(&self) -> f64 {
        self.max_height
    }

    pub fn rotation_degrees(&self) -> f64 {
        self.rotation_degrees
    }

    pub fn preburn_duration(&self) -> f64 {
        self.preburn_duration
    }

    pub fn remaining_preburn(&self) -> f64 {
        self.launch_timer
    }

    pub fn engine_running(&self) -> bool {
        self.engine_running
    }

    pub fn peak_reported(&self) -> bool {
        self.peak_reported
    }

    /// Jump straight into a phase at a given altitude and speed budget.
    #[cfg(test)]
    pub(crate) fn force_flight(&mut self, phase: FlightPhase, height: f64, travel_speed: f64) {
        self.phase = phase;
        self.height = height;
        self.max_height = self.max_height.max(height);
        self.travel_speed = travel_speed;
    }
}
