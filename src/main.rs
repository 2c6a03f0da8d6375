use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgEnum, Parser};
use log::{error, info, warn};
use serde::Serialize;

use tanker_alloc::{
    candidates::Candidates,
    cost::CargoBasis,
    error::{Error, Result},
    exact::solve_exact,
    greedy::GreedyAllocator,
    models::{CarrierUsage, DemandMode, ModelConfig},
    problem::Problem,
    report::{Comparison, Report},
    solver::{Solver, SolverConfig},
    tariffs::Tariffs,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ArgEnum)]
enum Method {
    Greedy,
    Exact,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ArgEnum)]
enum Demand {
    Single,
    Aggregate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ArgEnum)]
enum Usage {
    AtMostOnce,
    ExactlyOnce,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ArgEnum)]
enum Basis {
    Freight,
    Capacity,
    Demand,
}

/// Assigns a tanker fleet to shipping routes at minimum cost.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Tariff tables (JSON). The embedded reference fleet is used when omitted
    #[clap(long, parse(from_os_str))]
    tariffs: Option<PathBuf>,
    #[clap(long, arg_enum, default_value = "greedy")]
    method: Method,
    /// One carrier per route, or several carriers whose capacities add up to the demand
    #[clap(long, arg_enum, default_value = "single")]
    demand: Demand,
    /// Whether every carrier must be assigned
    #[clap(long, arg_enum, default_value = "at-most-once")]
    usage: Usage,
    /// The quantity the commodity price is charged on
    #[clap(long, arg_enum, default_value = "freight")]
    basis: Basis,
    /// Split this total equally across the destinations instead of the demand table
    #[clap(long)]
    equal_split: Option<f64>,
    /// Solver time limit in seconds
    #[clap(long, parse(try_from_str = parse_time_limit))]
    time_limit: Option<Duration>,
    /// Print the reports as JSON
    #[clap(long)]
    json: bool,
}

#[derive(Debug, Default, Serialize)]
struct Output {
    #[serde(skip_serializing_if = "Option::is_none")]
    greedy: Option<Report>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exact: Option<Report>,
    #[serde(skip_serializing_if = "Option::is_none")]
    comparison: Option<Comparison>,
}

/// Non-negative, finite seconds
fn parse_time_limit(s: &str) -> std::result::Result<Duration, String> {
    let seconds: f64 = s.parse().map_err(|e| format!("`{}` is not a number: {}", s, e))?;
    Duration::try_from_secs_f64(seconds).map_err(|e| format!("invalid time limit `{}`: {}", s, e))
}

#[cfg(feature = "gurobi")]
fn exact_solver(config: SolverConfig) -> Result<Box<dyn Solver>> {
    Ok(Box::new(tanker_alloc::solver::GurobiSolver::new(config)))
}

#[cfg(not(feature = "gurobi"))]
fn exact_solver(_config: SolverConfig) -> Result<Box<dyn Solver>> {
    Err(Error::Solver(
        "no solver backend available, rebuild with `--features gurobi`".to_string(),
    ))
}

/// Runs the requested methods. Bad tables fail the whole run, while a failed exact run is
/// returned next to the reports that were already produced.
fn allocate(args: &Args) -> Result<(Output, Option<Error>)> {
    let tariffs = match &args.tariffs {
        Some(path) => {
            info!("Loading tariffs from {}", path.display());
            Tariffs::from_path(path)?
        }
        None => Tariffs::reference(),
    };
    let tariffs = match args.equal_split {
        Some(total) => tariffs.with_equal_split(total),
        None => tariffs,
    };

    let basis = match args.basis {
        Basis::Freight => CargoBasis::Freight,
        Basis::Capacity => CargoBasis::Capacity,
        Basis::Demand => CargoBasis::Demand,
    };
    let config = ModelConfig {
        demand: match args.demand {
            Demand::Single => DemandMode::SingleCarrier,
            Demand::Aggregate => DemandMode::Aggregate,
        },
        usage: match args.usage {
            Usage::AtMostOnce => CarrierUsage::AtMostOnce,
            Usage::ExactlyOnce => CarrierUsage::ExactlyOnce,
        },
    };
    let exact = matches!(args.method, Method::Exact | Method::Both);
    if exact {
        config.check(basis)?;
    }

    let problem = Problem::new(&tariffs)?;
    let candidates = Candidates::new(&problem, basis)?;

    let mut output = Output::default();

    let allocation = match args.method {
        Method::Greedy | Method::Both => Some(GreedyAllocator::new(&problem, &candidates).run()),
        Method::Exact => None,
    };
    if let Some(allocation) = &allocation {
        output.greedy = Some(Report::from_allocation(&problem, allocation));
    }
    if !exact {
        return Ok((output, None));
    }

    let solver_config = SolverConfig {
        time_limit: args.time_limit,
        ..SolverConfig::default()
    };
    let solution = exact_solver(solver_config).and_then(|mut solver| {
        solve_exact(
            &problem,
            &candidates,
            &config,
            &mut solver,
            allocation.as_ref(),
        )
    });
    let solution = match solution {
        Ok(solution) => solution,
        Err(e) => return Ok((output, Some(e))),
    };
    output.exact = Some(Report::from_solution(&problem, &solution));

    if let Some(allocation) = &allocation {
        if allocation.is_partial() {
            warn!("Greedy allocation is partial, the comparison leaves out its unserved routes");
        }
        output.comparison = Some(Comparison::new(
            allocation.total_cost(),
            solution.total_cost(),
        ));
    }
    Ok((output, None))
}

fn render(output: &Output, json: bool) -> Result<String> {
    if json {
        return serde_json::to_string_pretty(output).map_err(Error::Output);
    }
    let mut text = String::new();
    for report in output.greedy.iter().chain(output.exact.iter()) {
        text.push_str(&format!("{}\n\n", report));
    }
    if let Some(comparison) = &output.comparison {
        text.push_str(&format!("{}\n", comparison));
    }
    Ok(text)
}

fn run(args: Args) -> Result<()> {
    let (output, failure) = allocate(&args)?;
    let text = render(&output, args.json)?;
    if !text.is_empty() {
        println!("{}", text.trim_end());
    }
    match failure {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Args::parse()) {
        error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
