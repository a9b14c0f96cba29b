//! Headless scripted session over the built-in catalog.
//!
//! Starts a fresh command deck, clicks up to the first producers, then
//! fast-forwards through several minutes of play, printing the economy
//! after each phase.
//!
//! Run with: `cargo run -p starfoundry-data --example headless`

use starfoundry_core::clock::FixedClock;
use starfoundry_core::resource::ResourceKind;
use starfoundry_core::save::MemoryStore;
use starfoundry_core::session::{Session, Status};
use starfoundry_data::builtin_catalog;

fn print_economy(label: &str, session: &Session<MemoryStore, FixedClock>) {
    let state = &session.engine().state;
    let metrics = session.engine().metrics();
    println!("=== {label} ===");
    println!(
        "  Stardust {:>12.1}  ({:+.2}/s)",
        state.resources[ResourceKind::Stardust],
        metrics.rates[ResourceKind::Stardust],
    );
    println!(
        "  Energy   {:>12.1}  ({:+.2}/s net, ratio {:.2})",
        state.resources[ResourceKind::Energy],
        metrics.net_energy_rate,
        metrics.energy_ratio,
    );
    println!(
        "  Research {:>12.1}  ({:+.2}/s)",
        state.resources[ResourceKind::Research],
        metrics.rates[ResourceKind::Research],
    );
    println!();
}

fn run_secs(session: &mut Session<MemoryStore, FixedClock>, secs: u64) {
    // One frame per second is plenty for a headless run.
    for _ in 0..secs {
        session.clock().advance_secs(1.0);
        session.frame();
    }
}

fn main() {
    let catalog = match builtin_catalog() {
        Ok(catalog) => catalog,
        Err(e) => {
            eprintln!("built-in catalog failed to load: {e}");
            return;
        }
    };

    let mut session = Session::new(catalog, MemoryStore::new(), FixedClock::new(0));
    session.start();

    // Phase 1: click up 25 Stardust and deploy the first drone wing.
    for _ in 0..25 {
        session.manual_action();
    }
    println!("{:?}", session.buy_producer("drone"));
    print_economy("first drone deployed", &session);

    // Phase 2: five minutes of passive production, reinvested in drones.
    run_secs(&mut session, 300);
    while session.buy_producer("drone") != Status::InsufficientResources {}
    print_economy("after 5 minutes of reinvestment", &session);

    // Phase 3: a reactor banks Energy, then a research lab comes online
    // (clicking covers the Stardust shortfall).
    for _ in 0..2_000 {
        session.manual_action();
    }
    println!("{:?}", session.buy_producer("reactor"));
    run_secs(&mut session, 60);
    println!("{:?}", session.buy_producer("researchLab"));
    run_secs(&mut session, 300);
    print_economy("research online", &session);

    // Phase 4: spend Research on the first upgrade once it is affordable.
    while session.engine().state.resources[ResourceKind::Research] < 45.0 {
        run_secs(&mut session, 60);
    }
    println!("{:?}", session.purchase_upgrade("precisionExtraction"));
    print_economy("first upgrade researched", &session);

    println!("--- event log (newest first) ---");
    for entry in session.engine().state.log.entries() {
        println!("  [{:>7}s] {}", entry.timestamp / 1000, entry.message);
    }
}
