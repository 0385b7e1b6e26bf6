use rocket_loop::catalog::Catalog;
use rocket_loop::coordinator::{LaunchCoordinator, QuantityModifier};
use rocket_loop::events::GameEvent;
use rocket_loop::flight::{CollisionKind, FlightPhase};

const DT: f64 = 1.0 / 60.0;
const MAX_TICKS: u32 = 60 * 120;

fn main() {
    println!("=== Rocket Launch Loop Demo ===\n");

    let catalog = Catalog::default_catalog();
    let mut game = LaunchCoordinator::new(catalog.clone(), 7);
    game.drain_events();

    for attempt in 1..=6 {
        // Most expensive rocket we can pay for
        let rocket = catalog
            .rockets
            .iter()
            .rev()
            .find(|r| game.can_afford_rocket(r.id));
        let rocket = match rocket {
            Some(rocket) => rocket,
            None => {
                println!("Out of money after {} loops.", attempt - 1);
                break;
            }
        };

        println!("Loop #{}: {}", attempt, rocket.name);
        println!("{}", "-".repeat(40));
        game.select_rocket(rocket.id);

        // A little extra fuel; much more and the preburn can't stabilise it
        let order = game.add_cargo(catalog.fuel_cargo, QuantityModifier::Shift);
        if !order.is_success() {
            println!("  {}", order.message());
        }
        game.launch_current_rocket();

        for _ in 0..MAX_TICKS {
            game.tick(DT);
            print_events(&mut game);

            let landed = game
                .active_rocket()
                .map(|r| r.phase() == FlightPhase::BurnedOut && r.peak_reported() && r.height() <= 0.0)
                .unwrap_or(false);
            if landed {
                game.report_collision(CollisionKind::SolidObject);
                print_events(&mut game);
            }

            let idle = game
                .active_rocket()
                .map(|r| r.phase() == FlightPhase::NoLaunch)
                .unwrap_or(true);
            if idle {
                break;
            }
        }

        let balances: Vec<String> = game
            .currency()
            .balances()
            .iter()
            .map(|b| format!("{}", b.amount))
            .collect();
        println!("  balances: {}\n", balances.join(" / "));
    }

    let stats = game.stats();
    println!("=== Statistics ===");
    println!("Launches:  {}", stats.launches);
    println!("Orbits:    {}", stats.orbits);
    println!("Destroyed: {}", stats.destroyed);
    println!("Best peak: {:.1}", stats.best_height);
}

fn print_events(game: &mut LaunchCoordinator) {
    for event in game.drain_events() {
        match event {
            GameEvent::ActiveRocketLaunched => println!("  preburn started"),
            GameEvent::EngineCutOff => println!("  engine cut off at {:.1}", game.height()),
            GameEvent::PeakHeightReached {
                height,
                achieved_orbit,
            } => {
                if achieved_orbit {
                    println!("  ORBIT at {:.1}", height);
                } else {
                    println!("  peak at {:.1}", height);
                }
            }
            GameEvent::ActiveRocketDestroyed => println!("  rocket destroyed"),
            GameEvent::Alert(message) => println!("  ! {}", message.replace('\n', " ")),
            _ => {}
        }
    }
}
