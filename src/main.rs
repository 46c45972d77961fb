mod args;
mod gate;
mod geocode;
mod location;
mod probes;
mod providers;
mod report;

use std::time::Duration;

use args::Args;
use clap::Parser;
use gate::GateDecision;
use report::{Outcome, Renderer};

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let renderer = Renderer::new(atty::is(atty::Stream::Stdout));

    let snapshot = probes::capture(args.verbose).await;
    if args.verbose {
        if let Ok(dump) = serde_json::to_string(&snapshot) {
            eprintln!("geo-doctor: snapshot {dump}");
        }
    }

    let decision = gate::evaluate(&snapshot);
    let advisory = gate::fallback_advisory(&snapshot);
    for line in renderer.preamble(&snapshot, &decision, advisory) {
        println!("{line}");
    }
    // A blocked gate is a diagnostic outcome, not a process error.
    if matches!(decision, GateDecision::Blocked { .. }) {
        return;
    }

    let timeout = Duration::from_secs(args.timeout);
    let outcome = match providers::acquire(timeout, args.verbose).await {
        Some(fix) => {
            let address = geocode::resolve(&fix, args.verbose).await;
            Outcome::Located { fix, address }
        }
        None => Outcome::Unknown,
    };
    for line in renderer.outcome(&outcome) {
        println!("{line}");
    }
}
