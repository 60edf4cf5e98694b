//! N-queens: place N queens on an N x N board so that none attack another.

use angusto::{make_predicate, render_stats_table, Repository, Solver};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(about = "Solve the N-queens problem")]
struct Args {
    /// Board size.
    #[arg(short, long, default_value_t = 8)]
    n: usize,

    /// Count every solution instead of printing the first.
    #[arg(long)]
    all: bool,
}

fn build_repository(n: usize) -> angusto::Result<Repository> {
    let variables: Vec<String> = (0..n).map(|row| format!("Q{}", row)).collect();
    let mut domains = angusto::DomainMap::new();
    for variable in &variables {
        domains.insert(
            variable.clone(),
            Box::new(angusto::FiniteDomain::of_ints(0..n as i64)) as Box<dyn angusto::Domain>,
        );
    }
    let mut repository = Repository::new(variables.clone(), domains)?;
    for i in 0..n {
        for j in (i + 1)..n {
            let row_gap = (j - i) as i64;
            repository.add_constraint(make_predicate(
                [variables[i].as_str(), variables[j].as_str()],
                format!("rows {} and {} do not attack", i, j),
                move |v| {
                    let (a, b) = (v[0].as_int().unwrap(), v[1].as_int().unwrap());
                    a != b && (a - b).abs() != row_gap
                },
            ))?;
        }
    }
    Ok(repository)
}

fn main() -> angusto::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let repository = build_repository(args.n)?;
    let solver = Solver::default();

    if args.all {
        let (solutions, stats) = solver.solve(repository)?;
        println!("{} solutions for n = {}", solutions.len(), args.n);
        println!("\n{}", render_stats_table(&stats));
        return Ok(());
    }

    let (solution, stats) = solver.solve_one(repository)?;
    match solution {
        Some(solution) => {
            for row in 0..args.n {
                let column = solution
                    .get(&format!("Q{}", row))
                    .and_then(|v| v.as_int())
                    .unwrap();
                let mut line = vec!['.'; args.n];
                line[column as usize] = 'Q';
                println!("{}", line.into_iter().collect::<String>());
            }
        }
        None => println!("no solution for n = {}", args.n),
    }
    println!("\n{}", render_stats_table(&stats));
    Ok(())
}
