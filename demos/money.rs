//! SEND + MORE = MONEY, the classic cryptarithmetic puzzle.

use std::sync::Arc;

use angusto::{
    make_predicate, render_stats_table, AllDistinct, Assignment, BasicConstraint, Repository,
    Solver, Value,
};

fn digit(values: &[Value], index: usize) -> i64 {
    values[index].as_int().unwrap()
}

fn build_repository() -> angusto::Result<Repository> {
    let letters = ["s", "e", "n", "d", "m", "o", "r", "y"];
    let variables: Vec<String> = letters.iter().map(|l| l.to_string()).collect();
    let mut domains = angusto::DomainMap::new();
    for letter in &variables {
        domains.insert(
            letter.clone(),
            Box::new(angusto::FiniteDomain::of_ints(0..10)) as Box<dyn angusto::Domain>,
        );
    }

    let mut repository = Repository::new(variables, domains)?;
    repository.add_constraint(Arc::new(AllDistinct::new(letters)))?;
    repository.add_constraint(Arc::new(BasicConstraint::not_equals("m", 0)))?;
    repository.add_constraint(Arc::new(BasicConstraint::not_equals("s", 0)))?;
    repository.add_constraint(make_predicate(["s", "m", "o"], "s + m carries", |v| {
        digit(v, 0) + digit(v, 1) == 10 * digit(v, 1) + digit(v, 2)
            || digit(v, 0) + digit(v, 1) == 10 * digit(v, 1) + digit(v, 2) - 1
    }))?;
    repository.add_constraint(make_predicate(["d", "e", "y"], "d + e ends in y", |v| {
        (digit(v, 0) + digit(v, 1)) % 10 == digit(v, 2)
    }))?;
    repository.add_constraint(make_predicate(["n", "r", "e"], "n + r carries", |v| {
        let rhs = digit(v, 2);
        (digit(v, 0) + digit(v, 1)) % 10 == rhs || (digit(v, 0) + digit(v, 1)) % 10 == rhs - 1
    }))?;
    repository.add_constraint(make_predicate(["o", "e", "n"], "o + e carries", |v| {
        let rhs = digit(v, 2);
        (digit(v, 0) + digit(v, 1)) % 10 == rhs || (digit(v, 0) + digit(v, 1)) % 10 == rhs - 1
    }))?;
    repository.add_constraint(make_predicate(letters, "send + more == money", |v| {
        let [s, e, n, d, m, o, r, y] = [
            digit(v, 0),
            digit(v, 1),
            digit(v, 2),
            digit(v, 3),
            digit(v, 4),
            digit(v, 5),
            digit(v, 6),
            digit(v, 7),
        ];
        1000 * s + 100 * e + 10 * n + d + 1000 * m + 100 * o + 10 * r + e
            == 10000 * m + 1000 * o + 100 * n + 10 * e + y
    }))?;
    Ok(repository)
}

fn display(solution: &Assignment) {
    let digit = |letter: &str| solution.get(letter).unwrap().to_string();
    println!(
        "  SEND        {}{}{}{}",
        digit("s"),
        digit("e"),
        digit("n"),
        digit("d")
    );
    println!(
        "+ MORE      + {}{}{}{}",
        digit("m"),
        digit("o"),
        digit("r"),
        digit("e")
    );
    println!("------      -----");
    println!(
        " MONEY      {}{}{}{}{}",
        digit("m"),
        digit("o"),
        digit("n"),
        digit("e"),
        digit("y")
    );
}

fn main() -> angusto::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let repository = build_repository()?;
    let solver = Solver::default();
    let (solution, stats) = solver.solve_one(repository)?;

    match solution {
        Some(solution) => display(&solution),
        None => println!("no solution"),
    }
    println!("\n{}", render_stats_table(&stats));
    Ok(())
}
