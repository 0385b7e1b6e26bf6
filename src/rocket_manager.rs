use godot::prelude::*;
use rand::Rng;

use crate::catalog::{CargoAmount, CargoId, Catalog, CurrencyAmount};
use crate::coordinator::{LaunchCoordinator, QuantityModifier};
use crate::events::GameEvent;
use crate::flight::CollisionKind;
use crate::preferences::Preferences;

/// Godot node driving the launch loop.
/// Ticks the coordinator on the physics clock and re-emits its events as signals.
/// Catalog entries are addressed by their index in the catalog lists.
#[derive(GodotClass)]
#[class(base=Node)]
pub struct RocketManager {
    base: Base<Node>,
    game: LaunchCoordinator,
    preferences: Preferences,
    /// Message from the last refused cargo order
    last_cargo_message: String,
}

impl RocketManager {
    fn new_game(catalog: Catalog) -> LaunchCoordinator {
        LaunchCoordinator::new(catalog, rand::thread_rng().gen())
    }

    /// Emit one signal per pending coordinator event, in order
    fn flush_events(&mut self) {
        for event in self.game.drain_events() {
            match event {
                GameEvent::ActiveRocketChanged(active) => {
                    let (index, starting_cargo) = match active {
                        Some(a) => (
                            self.game
                                .catalog()
                                .rockets
                                .iter()
                                .position(|r| r.id == a.rocket)
                                .map(|i| i as i32)
                                .unwrap_or(-1),
                            self.cargo_amounts(&a.starting_cargo),
                        ),
                        None => (-1, self.cargo_amounts(&[])),
                    };
                    self.base_mut().emit_signal(
                        "active_rocket_changed",
                        &[Variant::from(index), Variant::from(starting_cargo)],
                    );
                }
                GameEvent::ActiveRocketLaunched => {
                    self.base_mut().emit_signal("active_rocket_launched", &[]);
                }
                GameEvent::ActiveRocketDestroyed => {
                    self.base_mut().emit_signal("active_rocket_destroyed", &[]);
                }
                GameEvent::PeakHeightReached {
                    height,
                    achieved_orbit,
                } => {
                    self.base_mut().emit_signal(
                        "peak_height_reached",
                        &[Variant::from(height), Variant::from(achieved_orbit)],
                    );
                }
                GameEvent::LoopIncreased(current_loop) => {
                    self.base_mut()
                        .emit_signal("loop_increased", &[Variant::from(current_loop as i32)]);
                }
                GameEvent::CargoUpdated {
                    changed,
                    cargo,
                    cargo_weight,
                    max_weight,
                } => {
                    let changed_index = self.cargo_index(changed);
                    let amounts = self.cargo_amounts(&cargo);
                    self.base_mut().emit_signal(
                        "cargo_updated",
                        &[
                            Variant::from(changed_index),
                            Variant::from(amounts),
                            Variant::from(cargo_weight),
                            Variant::from(max_weight),
                        ],
                    );
                }
                GameEvent::CurrencyChanged => {
                    self.base_mut().emit_signal("currency_changed", &[]);
                }
                GameEvent::EngineIgnited => {
                    self.base_mut().emit_signal("engine_ignited", &[]);
                }
                GameEvent::EngineCutOff => {
                    self.base_mut().emit_signal("engine_cut_off", &[]);
                }
                GameEvent::Exploded => {
                    self.base_mut().emit_signal("exploded", &[]);
                }
                GameEvent::Alert(message) => {
                    self.base_mut()
                        .emit_signal("alert", &[Variant::from(GString::from(message.as_str()))]);
                }
            }
        }
    }

    /// Quantities in catalog cargo order, 0 for cargo not carried
    fn cargo_amounts(&self, cargo: &[CargoAmount]) -> PackedInt32Array {
        let amounts: Vec<i32> = self
            .game
            .catalog()
            .cargo_amounts_in_order(cargo)
            .iter()
            .map(|&a| a as i32)
            .collect();
        PackedInt32Array::from(amounts.as_slice())
    }

    fn cargo_index(&self, id: CargoId) -> i32 {
        self.game
            .catalog()
            .cargo_index(id)
            .map(|i| i as i32)
            .unwrap_or(-1)
    }

    fn modifier(shift: bool, ctrl: bool) -> QuantityModifier {
        QuantityModifier::from_keys(shift, ctrl)
    }
}

#[godot_api]
impl INode for RocketManager {
    fn init(base: Base<Node>) -> Self {
        godot_print!("RocketManager initialized");
        Self {
            base,
            game: Self::new_game(Catalog::default_catalog()),
            preferences: Preferences::default(),
            last_cargo_message: String::new(),
        }
    }

    fn ready(&mut self) {
        // Starting balances were queued before anything could listen
        self.flush_events();
    }

    fn physics_process(&mut self, delta: f64) {
        self.game.tick(delta);
        self.flush_events();
    }
}

#[godot_api]
impl RocketManager {
    // ==========================================
    // Signals
    // ==========================================

    /// Index of the new active rocket type (-1 when none) and its
    /// loadout in catalog cargo order
    #[signal]
    fn active_rocket_changed(rocket_index: i32, starting_cargo: PackedInt32Array);

    #[signal]
    fn active_rocket_launched();

    #[signal]
    fn active_rocket_destroyed();

    #[signal]
    fn peak_height_reached(height: f64, achieved_orbit: bool);

    #[signal]
    fn loop_increased(current_loop: i32);

    /// Full manifest in catalog cargo order, plus the index that changed
    #[signal]
    fn cargo_updated(
        changed_index: i32,
        cargo: PackedInt32Array,
        cargo_weight: f64,
        max_weight: f64,
    );

    #[signal]
    fn currency_changed();

    #[signal]
    fn engine_ignited();

    #[signal]
    fn engine_cut_off();

    #[signal]
    fn exploded();

    #[signal]
    fn alert(message: GString);

    // ==========================================
    // Catalog
    // ==========================================

    /// Replace the catalog and start a new game. Returns false (and keeps
    /// the current game) if the JSON doesn't parse or validate.
    #[func]
    pub fn load_catalog_json(&mut self, json: GString) -> bool {
        match Catalog::from_json(&json.to_string()) {
            Ok(catalog) => {
                self.game = Self::new_game(catalog);
                self.flush_events();
                let empty = self.cargo_amounts(&[]);
                self.base_mut().emit_signal(
                    "active_rocket_changed",
                    &[Variant::from(-1), Variant::from(empty)],
                );
                true
            }
            Err(e) => {
                godot_print!("Failed to load catalog: {}", e);
                false
            }
        }
    }

    #[func]
    pub fn get_rocket_type_count(&self) -> i32 {
        self.game.catalog().rockets.len() as i32
    }

    #[func]
    pub fn get_rocket_type_name(&self, index: i32) -> GString {
        GString::from(
            self.game
                .catalog()
                .rockets
                .get(index as usize)
                .map(|r| r.name.as_str())
                .unwrap_or(""),
        )
    }

    /// Sprite resource path for the rocket type at index
    #[func]
    pub fn get_rocket_type_sprite(&self, index: i32) -> GString {
        GString::from(
            self.game
                .catalog()
                .rockets
                .get(index as usize)
                .map(|r| r.sprite.as_str())
                .unwrap_or(""),
        )
    }

    /// BBCode tooltip for the rocket menu
    #[func]
    pub fn get_rocket_tooltip(&self, index: i32) -> GString {
        let catalog = self.game.catalog();
        let text = catalog
            .rockets
            .get(index as usize)
            .map(|r| catalog.rocket_tooltip(r))
            .unwrap_or_default();
        GString::from(text.as_str())
    }

    #[func]
    pub fn get_cargo_type_count(&self) -> i32 {
        self.game.catalog().cargo.len() as i32
    }

    #[func]
    pub fn get_cargo_type_name(&self, index: i32) -> GString {
        GString::from(
            self.game
                .catalog()
                .cargo
                .get(index as usize)
                .map(|c| c.name.as_str())
                .unwrap_or(""),
        )
    }

    #[func]
    pub fn get_cargo_tooltip(&self, index: i32) -> GString {
        let catalog = self.game.catalog();
        let text = catalog
            .cargo
            .get(index as usize)
            .map(|c| catalog.cargo_tooltip(c))
            .unwrap_or_default();
        GString::from(text.as_str())
    }

    #[func]
    pub fn get_currency_count(&self) -> i32 {
        self.game.catalog().currencies.len() as i32
    }

    #[func]
    pub fn get_currency_name(&self, index: i32) -> GString {
        GString::from(
            self.game
                .catalog()
                .currencies
                .get(index as usize)
                .map(|c| c.name.as_str())
                .unwrap_or(""),
        )
    }

    // ==========================================
    // Currency
    // ==========================================

    #[func]
    pub fn get_currency_balance(&self, index: i32) -> i64 {
        self.game
            .catalog()
            .currencies
            .get(index as usize)
            .map(|c| self.game.currency().get(c.id))
            .unwrap_or(0)
    }

    /// Balance formatted for the currency display, e.g. "[color=#f5c542]CR500[/color]"
    #[func]
    pub fn get_currency_label(&self, index: i32) -> GString {
        let catalog = self.game.catalog();
        let text = catalog
            .currencies
            .get(index as usize)
            .map(|c| catalog.cost_label(&[CurrencyAmount::new(c.id, self.game.currency().get(c.id))]))
            .unwrap_or_default();
        GString::from(text.as_str())
    }

    // ==========================================
    // Rocket Selection and Launch
    // ==========================================

    #[func]
    pub fn can_afford_rocket(&self, index: i32) -> bool {
        self.game
            .catalog()
            .rockets
            .get(index as usize)
            .map(|r| self.game.can_afford_rocket(r.id))
            .unwrap_or(false)
    }

    /// Buy the rocket type at index and make it active
    #[func]
    pub fn select_rocket(&mut self, index: i32) -> bool {
        let id = match self.game.catalog().rockets.get(index as usize) {
            Some(rocket) => rocket.id,
            None => return false,
        };
        let selected = self.game.select_rocket(id);
        self.flush_events();
        selected
    }

    #[func]
    pub fn launch_current_rocket(&mut self) -> bool {
        let launched = self.game.launch_current_rocket();
        self.flush_events();
        launched
    }

    /// Collision from the physics scene; `projectile` for shots, false for obstacles
    #[func]
    pub fn report_collision(&mut self, projectile: bool) -> bool {
        let kind = if projectile {
            CollisionKind::Projectile
        } else {
            CollisionKind::SolidObject
        };
        let hit = self.game.report_collision(kind);
        self.flush_events();
        hit
    }

    #[func]
    pub fn has_active_rocket(&self) -> bool {
        self.game.has_active_rocket()
    }

    /// Index of the active rocket type, -1 when none
    #[func]
    pub fn get_active_rocket_index(&self) -> i32 {
        let catalog = self.game.catalog();
        self.game
            .active_rocket_type()
            .and_then(|active| catalog.rockets.iter().position(|r| r.id == active.id))
            .map(|i| i as i32)
            .unwrap_or(-1)
    }

    #[func]
    pub fn is_launch_in_progress(&self) -> bool {
        self.game.is_launch_in_progress()
    }

    #[func]
    pub fn get_phase_name(&self) -> GString {
        GString::from(
            self.game
                .active_rocket()
                .map(|r| r.phase().display_name())
                .unwrap_or(""),
        )
    }

    #[func]
    pub fn get_current_loop(&self) -> i32 {
        self.game.current_loop() as i32
    }

    // ==========================================
    // Cargo
    // ==========================================

    /// Quantity of the cargo type at index on the active rocket
    #[func]
    pub fn get_cargo_amount(&self, index: i32) -> i32 {
        let cargo = match self.game.catalog().cargo.get(index as usize) {
            Some(cargo) => cargo.id,
            None => return 0,
        };
        self.game
            .active_rocket()
            .map(|r| r.cargo().get(cargo) as i32)
            .unwrap_or(0)
    }

    /// Buy 1, 10 (shift) or 100 (ctrl) units onto the active rocket
    #[func]
    pub fn add_cargo(&mut self, index: i32, shift: bool, ctrl: bool) -> bool {
        let cargo = match self.game.catalog().cargo.get(index as usize) {
            Some(cargo) => cargo.id,
            None => return false,
        };
        let order = self.game.add_cargo(cargo, Self::modifier(shift, ctrl));
        self.last_cargo_message = order.message().to_string();
        self.flush_events();
        order.is_success()
    }

    #[func]
    pub fn remove_cargo(&mut self, index: i32, shift: bool, ctrl: bool) -> bool {
        let cargo = match self.game.catalog().cargo.get(index as usize) {
            Some(cargo) => cargo.id,
            None => return false,
        };
        let order = self.game.remove_cargo(cargo, Self::modifier(shift, ctrl));
        self.last_cargo_message = order.message().to_string();
        self.flush_events();
        order.is_success()
    }

    /// Why the last cargo order was refused (empty if it went through)
    #[func]
    pub fn get_last_cargo_message(&self) -> GString {
        GString::from(self.last_cargo_message.as_str())
    }

    #[func]
    pub fn has_weight_available(&self, extra: f64) -> bool {
        self.game.has_weight_available(extra)
    }

    #[func]
    pub fn get_cargo_weight(&self) -> f64 {
        self.game
            .active_rocket()
            .map(|r| r.cargo_weight())
            .unwrap_or(0.0)
    }

    #[func]
    pub fn get_max_weight(&self) -> f64 {
        self.game
            .active_rocket()
            .map(|r| r.max_weight())
            .unwrap_or(0.0)
    }

    #[func]
    pub fn get_fuel(&self) -> f64 {
        self.game.active_rocket().map(|r| r.fuel()).unwrap_or(0.0)
    }

    // ==========================================
    // Preburn
    // ==========================================

    #[func]
    pub fn get_preburn_duration(&self) -> f64 {
        self.game.preburn_duration()
    }

    #[func]
    pub fn get_remaining_preburn(&self) -> f64 {
        self.game.remaining_preburn()
    }

    #[func]
    pub fn increase_preburn(&mut self) -> bool {
        self.game.increase_preburn()
    }

    #[func]
    pub fn decrease_preburn(&mut self) -> bool {
        self.game.decrease_preburn()
    }

    // ==========================================
    // Flight Display
    // ==========================================

    #[func]
    pub fn get_height(&self) -> f64 {
        self.game.height()
    }

    /// Height as a fraction of orbit altitude, for the altimeter
    #[func]
    pub fn get_height_normalized(&self) -> f64 {
        self.game.height_normalized()
    }

    #[func]
    pub fn get_rotation_degrees(&self) -> f64 {
        self.game
            .active_rocket()
            .map(|r| r.rotation_degrees())
            .unwrap_or(0.0)
    }

    #[func]
    pub fn get_launch_count(&self) -> i32 {
        self.game.stats().launches as i32
    }

    #[func]
    pub fn get_orbit_count(&self) -> i32 {
        self.game.stats().orbits as i32
    }

    #[func]
    pub fn get_destroyed_count(&self) -> i32 {
        self.game.stats().destroyed as i32
    }

    #[func]
    pub fn get_best_height(&self) -> f64 {
        self.game.stats().best_height
    }

    // ==========================================
    // Preferences
    // ==========================================

    #[func]
    pub fn get_sfx_volume(&self) -> i64 {
        i64::from(self.preferences.sfx_volume)
    }

    #[func]
    pub fn set_sfx_volume(&mut self, volume: i64) {
        self.preferences.set_sfx_volume(volume);
    }

    #[func]
    pub fn get_music_volume(&self) -> i64 {
        i64::from(self.preferences.music_volume)
    }

    #[func]
    pub fn set_music_volume(&mut self, volume: i64) {
        self.preferences.set_music_volume(volume);
    }

    /// Linear gain for the SFX bus
    #[func]
    pub fn get_sfx_gain(&self) -> f64 {
        self.preferences.sfx_gain()
    }

    #[func]
    pub fn get_music_gain(&self) -> f64 {
        self.preferences.music_gain()
    }

    #[func]
    pub fn save_preferences_json(&self) -> GString {
        match self.preferences.to_json() {
            Ok(json) => GString::from(json.as_str()),
            Err(e) => {
                godot_print!("Failed to save preferences: {}", e);
                GString::new()
            }
        }
    }

    /// Restore saved settings; keeps the current ones if the JSON is bad
    #[func]
    pub fn load_preferences_json(&mut self, json: GString) -> bool {
        match Preferences::from_json(&json.to_string()) {
            Ok(prefs) => {
                self.preferences = prefs;
                true
            }
            Err(e) => {
                godot_print!("Failed to load preferences: {}", e);
                false
            }
        }
    }
}
