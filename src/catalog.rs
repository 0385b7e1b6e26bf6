/// Immutable reference data: currencies, cargo and rocket types.
/// A catalog is loaded once (built in, or parsed from JSON) and never
/// mutated afterwards. Everything else refers to its entries by id.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identity of a currency in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyId(pub u32);

/// Identity of a cargo type in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CargoId(pub u32);

/// Identity of a rocket type in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RocketTypeId(pub u32);

impl fmt::Display for CurrencyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for CargoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for RocketTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A quantity of one currency. Used for costs, refunds and rewards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyAmount {
    pub currency: CurrencyId,
    pub amount: i64,
}

impl CurrencyAmount {
    pub fn new(currency: CurrencyId, amount: i64) -> Self {
        Self { currency, amount }
    }
}

/// A quantity of one cargo type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CargoAmount {
    pub cargo: CargoId,
    pub amount: u32,
}

impl CargoAmount {
    pub fn new(cargo: CargoId, amount: u32) -> Self {
        Self { cargo, amount }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyType {
    pub id: CurrencyId,
    pub name: String,
    /// Prefix shown in front of amounts, e.g. "CR"
    pub short_name: String,
    /// RGB hex without the leading '#'
    pub color_hex: String,
    /// Resource path of the icon, resolved by the UI
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CargoType {
    pub id: CargoId,
    pub name: String,
    /// Weight of a single unit
    pub unit_weight: f64,
    /// Price of a single unit
    pub cost: Vec<CurrencyAmount>,
    #[serde(default)]
    pub orbit_bonus_value: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RocketType {
    pub id: RocketTypeId,
    pub name: String,
    /// Resource path of the sprite/scene, resolved by the UI
    #[serde(default)]
    pub sprite: String,
    /// Seconds of engine burn on the pad before liftoff
    pub preburn_duration: f64,
    /// Top speed reached by the end of the ascent ramp
    pub travel_speed: f64,
    /// Cargo weight limit (hull excluded)
    pub max_weight: f64,
    pub cost: Vec<CurrencyAmount>,
    pub starting_cargo: Vec<CargoAmount>,
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate {kind} id {id}")]
    DuplicateId { kind: &'static str, id: u32 },
    #[error("{owner} references unknown currency {id}")]
    UnknownCurrency { owner: String, id: CurrencyId },
    #[error("{owner} references unknown cargo {id}")]
    UnknownCargo { owner: String, id: CargoId },
    #[error("{owner} has a negative {field}")]
    NegativeValue { owner: String, field: &'static str },
}

/// The full set of reference data for a game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub currencies: Vec<CurrencyType>,
    pub cargo: Vec<CargoType>,
    pub rockets: Vec<RocketType>,
    /// Cargo type burned by the engines
    pub fuel_cargo: CargoId,
    /// Currency paid out for height and orbit
    pub reward_currency: CurrencyId,
    /// Balances granted when a new game starts
    #[serde(default)]
    pub starting_currency: Vec<CurrencyAmount>,
}

impl Catalog {
    /// Parse and validate a catalog from JSON.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn currency(&self, id: CurrencyId) -> Option<&CurrencyType> {
        self.currencies.iter().find(|c| c.id == id)
    }

    pub fn cargo_type(&self, id: CargoId) -> Option<&CargoType> {
        self.cargo.iter().find(|c| c.id == id)
    }

    pub fn rocket_type(&self, id: RocketTypeId) -> Option<&RocketType> {
        self.rockets.iter().find(|r| r.id == id)
    }

    /// Position of a cargo type in `cargo`, the order the menus list it in
    pub fn cargo_index(&self, id: CargoId) -> Option<usize> {
        self.cargo.iter().position(|c| c.id == id)
    }

    /// Quantities laid out in `cargo` order, 0 for types not in `amounts`
    pub fn cargo_amounts_in_order(&self, amounts: &[CargoAmount]) -> Vec<u32> {
        self.cargo
            .iter()
            .map(|c| {
                amounts
                    .iter()
                    .find(|a| a.cargo == c.id)
                    .map(|a| a.amount)
                    .unwrap_or(0)
            })
            .collect()
    }

    /// The designated fuel cargo type.
    /// Only `None` for catalogs that bypassed `validate()`.
    pub fn fuel_type(&self) -> Option<&CargoType> {
        self.cargo_type(self.fuel_cargo)
    }

    /// Check ids are unique and every reference resolves.
    pub fn validate(&self) -> Result<(), CatalogError> {
        check_unique("currency", self.currencies.iter().map(|c| c.id.0))?;
        check_unique("cargo", self.cargo.iter().map(|c| c.id.0))?;
        check_unique("rocket", self.rockets.iter().map(|r| r.id.0))?;

        if self.cargo_type(self.fuel_cargo).is_none() {
            return Err(CatalogError::UnknownCargo {
                owner: "catalog fuel".to_string(),
                id: self.fuel_cargo,
            });
        }
        if self.currency(self.reward_currency).is_none() {
            return Err(CatalogError::UnknownCurrency {
                owner: "catalog reward".to_string(),
                id: self.reward_currency,
            });
        }
        self.check_costs("starting currency", &self.starting_currency)?;

        for cargo in &self.cargo {
            if cargo.unit_weight < 0.0 {
                return Err(CatalogError::NegativeValue {
                    owner: cargo.name.clone(),
                    field: "unit weight",
                });
            }
            self.check_costs(&cargo.name, &cargo.cost)?;
        }

        for rocket in &self.rockets {
            let fields = [
                ("preburn duration", rocket.preburn_duration),
                ("travel speed", rocket.travel_speed),
                ("max weight", rocket.max_weight),
            ];
            if let Some((field, _)) = fields.iter().find(|(_, v)| *v < 0.0) {
                return Err(CatalogError::NegativeValue {
                    owner: rocket.name.clone(),
                    field: *field,
                });
            }
            self.check_costs(&rocket.name, &rocket.cost)?;
            for amount in &rocket.starting_cargo {
                if self.cargo_type(amount.cargo).is_none() {
                    return Err(CatalogError::UnknownCargo {
                        owner: rocket.name.clone(),
                        id: amount.cargo,
                    });
                }
            }
        }

        Ok(())
    }

    fn check_costs(&self, owner: &str, cost: &[CurrencyAmount]) -> Result<(), CatalogError> {
        match cost.iter().find(|a| self.currency(a.currency).is_none()) {
            Some(missing) => Err(CatalogError::UnknownCurrency {
                owner: owner.to_string(),
                id: missing.currency,
            }),
            None => Ok(()),
        }
    }

    // ==========================================
    // Tooltips
    // ==========================================
    // Rendered as BBCode for RichTextLabel.

    /// Colored cost fragments, e.g. "[color=#f5c542]CR40[/color]"
    pub fn cost_label(&self, cost: &[CurrencyAmount]) -> String {
        cost.iter()
            .filter_map(|amount| {
                self.currency(amount.currency).map(|c| {
                    format!("[color=#{}]{}{}[/color]", c.color_hex, c.short_name, amount.amount)
                })
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Cargo menu label: name followed by its unit price
    pub fn cargo_tooltip(&self, cargo: &CargoType) -> String {
        format!("{} ({})", cargo.name, self.cost_label(&cargo.cost))
    }

    /// Rocket select tooltip: limits, starting loadout and price
    pub fn rocket_tooltip(&self, rocket: &RocketType) -> String {
        let mut text = format!(
            "{}\nMax Weight: {}\nStarting Cargo:\n",
            rocket.name, rocket.max_weight
        );
        for amount in &rocket.starting_cargo {
            if let Some(cargo) = self.cargo_type(amount.cargo) {
                text.push_str(&format!(
                    " * {}: {} ({})\n",
                    cargo.name,
                    amount.amount as f64 * cargo.unit_weight,
                    amount.amount
                ));
            }
        }
        text.push_str("\nCost: ");
        text.push_str(&self.cost_label(&rocket.cost));
        text.trim_end().to_string()
    }

    // ==========================================
    // Built-in data
    // ==========================================

    /// The stock catalog shipped with the game.
    pub fn default_catalog() -> Self {
        let credits = CurrencyId(1);
        let data = CurrencyId(2);
        let fuel = CargoId(1);
        let satellite = CargoId(2);
        let probe = CargoId(3);
        let capsule = CargoId(4);

        Self {
            currencies: vec![
                CurrencyType {
                    id: credits,
                    name: "Credits".to_string(),
                    short_name: "CR".to_string(),
                    color_hex: "f5c542".to_string(),
                    icon: "res://icons/credits.png".to_string(),
                },
                CurrencyType {
                    id: data,
                    name: "Research Data".to_string(),
                    short_name: "DT".to_string(),
                    color_hex: "4fc3f7".to_string(),
                    icon: "res://icons/data.png".to_string(),
                },
            ],
            cargo: vec![
                CargoType {
                    id: fuel,
                    name: "Fuel".to_string(),
                    unit_weight: 1.0,
                    cost: vec![CurrencyAmount::new(credits, 1)],
                    orbit_bonus_value: 0,
                },
                CargoType {
                    id: satellite,
                    name: "Satellite".to_string(),
                    unit_weight: 25.0,
                    cost: vec![CurrencyAmount::new(credits, 40)],
                    orbit_bonus_value: 50,
                },
                CargoType {
                    id: probe,
                    name: "Science Probe".to_string(),
                    unit_weight: 10.0,
                    cost: vec![CurrencyAmount::new(credits, 15), CurrencyAmount::new(data, 2)],
                    orbit_bonus_value: 20,
                },
                CargoType {
                    id: capsule,
                    name: "Crew Capsule".to_string(),
                    unit_weight: 60.0,
                    cost: vec![CurrencyAmount::new(credits, 120), CurrencyAmount::new(data, 10)],
                    orbit_bonus_value: 150,
                },
            ],
            rockets: vec![
                RocketType {
                    id: RocketTypeId(1),
                    name: "Sparrow".to_string(),
                    sprite: "res://rockets/sparrow.tscn".to_string(),
                    preburn_duration: 1.0,
                    travel_speed: 150.0,
                    max_weight: 250.0,
                    cost: vec![CurrencyAmount::new(credits, 50)],
                    starting_cargo: vec![CargoAmount::new(fuel, 100)],
                },
                RocketType {
                    id: RocketTypeId(2),
                    name: "Kestrel".to_string(),
                    sprite: "res://rockets/kestrel.tscn".to_string(),
                    preburn_duration: 2.0,
                    travel_speed: 260.0,
                    max_weight: 450.0,
                    cost: vec![CurrencyAmount::new(credits, 200)],
                    starting_cargo: vec![CargoAmount::new(fuel, 200)],
                },
                RocketType {
                    id: RocketTypeId(3),
                    name: "Atlas".to_string(),
                    sprite: "res://rockets/atlas.tscn".to_string(),
                    preburn_duration: 3.0,
                    travel_speed: 400.0,
                    max_weight: 900.0,
                    cost: vec![CurrencyAmount::new(credits, 600), CurrencyAmount::new(data, 20)],
                    starting_cargo: vec![
                        CargoAmount::new(fuel, 300),
                        CargoAmount::new(satellite, 1),
                    ],
                },
            ],
            fuel_cargo: fuel,
            reward_currency: credits,
            starting_currency: vec![CurrencyAmount::new(credits, 500), CurrencyAmount::new(data, 25)],
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::default_catalog()
    }
}

fn check_unique(kind: &'static str, ids: impl Iterator<Item = u32>) -> Result<(), CatalogError> {
    let mut seen = BTreeSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CatalogError::DuplicateId { kind, id });
        }
    }
    Ok(())
}
