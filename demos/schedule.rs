//! A small task-scheduling problem over interval domains: task A must
//! finish before B and C start, and B and C may not overlap.

use std::sync::Arc;

use angusto::{
    render_stats_table, ConstraintRef, Domain, DomainMap, FiniteIntervalDistributor,
    FiniteIntervalDomain, NoOverlap, Repository, Solver, StartsAfterEnd,
};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(about = "Schedule three tasks of equal length in a shared window")]
struct Args {
    /// End of the scheduling window (the window is [0, horizon)).
    #[arg(long, default_value_t = 15)]
    horizon: i64,

    /// Length of each task.
    #[arg(long, default_value_t = 5)]
    length: i64,

    /// Emit the schedules as JSON instead of text.
    #[arg(long)]
    json: bool,
}

fn main() -> angusto::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let variables = vec!["A".to_string(), "B".to_string(), "C".to_string()];
    let mut domains = DomainMap::new();
    for name in &variables {
        domains.insert(
            name.clone(),
            Box::new(FiniteIntervalDomain::with_lengths(
                0,
                args.horizon,
                args.length,
                args.length,
            )?) as Box<dyn Domain>,
        );
    }
    let repository = Repository::with_constraints(
        variables,
        domains,
        [
            Arc::new(StartsAfterEnd::new("B", "A")) as ConstraintRef,
            Arc::new(StartsAfterEnd::new("C", "A")),
            Arc::new(NoOverlap::new("B", "C")),
        ],
    )?;

    let solver = Solver::new(Box::new(FiniteIntervalDistributor));
    let (solutions, stats) = solver.solve(repository)?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&solutions).expect("assignments serialize")
        );
    } else {
        for (index, solution) in solutions.iter().enumerate() {
            println!("schedule {}:", index + 1);
            for task in ["A", "B", "C"] {
                println!("  {} -> {}", task, solution.get(task).unwrap());
            }
        }
        println!("\n{}", render_stats_table(&stats));
    }
    Ok(())
}
