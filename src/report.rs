//! Renders an allocation or an exact solution as a text table or JSON.

use std::fmt;

use serde::Serialize;

use crate::{
    candidates::Candidate,
    exact::AssignmentSolution,
    greedy::Allocation,
    problem::{Cost, Problem, Quantity, RouteIndex},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Greedy allocation serving every route
    Complete,
    /// Greedy allocation leaving some routes unserved
    Partial,
    Optimal,
    /// Best solution found before the solver was stopped
    Feasible,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Complete => "complete",
            Status::Partial => "partial",
            Status::Optimal => "optimal",
            Status::Feasible => "feasible",
        };
        write!(f, "{}", s)
    }
}

/// One carrier serving one route
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportLine {
    pub carrier: String,
    pub origin: String,
    pub destination: String,
    /// Quantity delivered by the carrier: its capacity, capped at the route's demand
    pub quantity: Quantity,
    pub cost: Cost,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub method: String,
    pub status: Status,
    pub lines: Vec<ReportLine>,
    /// Labels of the routes without a carrier
    pub unserved: Vec<String>,
    pub total_cost: Cost,
}

impl Report {
    fn new<'a>(
        problem: &Problem,
        method: &str,
        status: Status,
        chosen: impl Iterator<Item = &'a Candidate>,
        unserved: &[RouteIndex],
    ) -> Report {
        let lines: Vec<ReportLine> = chosen
            .map(|c| {
                let route = problem.route(c.route);
                ReportLine {
                    carrier: problem.carrier(c.carrier).name().to_string(),
                    origin: problem.port(route.origin).name().to_string(),
                    destination: problem.destination(route.destination).to_string(),
                    quantity: c.capacity.min(route.demand),
                    cost: c.cost,
                }
            })
            .collect();
        let total_cost = lines.iter().map(|l| l.cost).sum();

        Report {
            method: method.to_string(),
            status,
            lines,
            unserved: unserved.iter().map(|r| problem.route_label(*r)).collect(),
            total_cost,
        }
    }

    pub fn from_allocation(problem: &Problem, allocation: &Allocation) -> Report {
        let status = if allocation.is_partial() {
            Status::Partial
        } else {
            Status::Complete
        };
        Report::new(
            problem,
            "greedy",
            status,
            allocation.assignments(),
            &allocation.unserved(),
        )
    }

    pub fn from_solution(problem: &Problem, solution: &AssignmentSolution) -> Report {
        let status = if solution.is_optimal() {
            Status::Optimal
        } else {
            Status::Feasible
        };
        Report::new(
            problem,
            "exact",
            status,
            solution.assignments(),
            &solution.unserved(),
        )
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} assignment ({})", self.method, self.status)?;
        writeln!(
            f,
            "{:<14} {:<16} {:<12} {:>12} {:>14}",
            "carrier", "origin", "destination", "quantity", "cost"
        )?;
        for line in &self.lines {
            writeln!(
                f,
                "{:<14} {:<16} {:<12} {:>12.0} {:>14.2}",
                line.carrier, line.origin, line.destination, line.quantity, line.cost
            )?;
        }
        for route in &self.unserved {
            writeln!(f, "unserved: {}", route)?;
        }
        write!(f, "total cost: {:.2}", self.total_cost)
    }
}

/// Greedy total against the exact total
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Comparison {
    pub greedy: Cost,
    pub exact: Cost,
    /// `greedy - exact`
    pub gap: Cost,
    /// Gap relative to the exact total. Zero when the exact total is zero.
    pub relative_gap: f64,
}

impl Comparison {
    pub fn new(greedy: Cost, exact: Cost) -> Comparison {
        let gap = greedy - exact;
        let relative_gap = if exact.abs() > f64::EPSILON {
            gap / exact
        } else {
            0.0
        };
        Comparison {
            greedy,
            exact,
            gap,
            relative_gap,
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "greedy {:.2} vs exact {:.2}: gap {:.2} ({:.2}%)",
            self.greedy,
            self.exact,
            self.gap,
            self.relative_gap * 100.0
        )
    }
}
