use godot::prelude::*;

pub mod cargo;
pub mod catalog;
pub mod coordinator;
pub mod currency;
pub mod events;
pub mod flight;
pub mod preferences;
pub mod tuning;

mod rocket_manager;

struct RocketLoopExtension;

#[gdextension]
unsafe impl ExtensionLibrary for RocketLoopExtension {}
