//! TSP + MTZ formulation over the reachable arcs of a cost/time matrix.
//!
//! Columns, in creation order:
//! - `x[a]` binary, one per reachable arc `a = (i, j)`
//! - `u[i]` continuous sequence counter in `[0, n]`
//! - `is_start[i]`, `is_end[i]` binary, fixed to 0 where the trip rules forbid them
//!
//! Rows:
//! - exactly one start and one end; in a round trip `is_start[i] == is_end[i]`
//! - flow: `out(k) - in(k) = is_start[k] - is_end[k]`
//! - degree caps: `in(k) <= 1`, `out(k) <= 1`
//! - coverage of required `k`: `in(k) + is_start[k] - [rt] is_end[k] = 1`
//! - at least one arc
//! - MTZ per arc: `u[i] - u[j] + n x[i,j] <= n - 1 + [rt] n is_start[j]`
//!
//! Each arc costs `edge_objective(i, j)`. In a round trip the stay at the
//! end city is refunded through a `-weight_cost * stay_cost` coefficient on
//! `is_end`, since the last arrival is home.

use highs::{Col, RowProblem};

use itinerary_core::{CostTimeMatrix, Solution, Topology, TripRules};

/// Column positions in the solution vector.
pub(crate) struct Layout {
    pub arcs: Vec<(usize, usize)>,
    pub n: usize,
}

impl Layout {
    pub fn x(&self, arc: usize) -> usize {
        arc
    }

    pub fn is_start(&self, city: usize) -> usize {
        self.arcs.len() + self.n + city
    }

    pub fn is_end(&self, city: usize) -> usize {
        self.arcs.len() + 2 * self.n + city
    }

    pub fn columns(&self) -> usize {
        self.arcs.len() + 3 * self.n
    }

    /// Reads the chosen arcs and endpoints back out of a column vector.
    /// `None` when the vector is short or names no start or end.
    pub fn decode(&self, values: &[f64]) -> Option<Solution> {
        if values.len() < self.columns() {
            return None;
        }
        let active = |col: usize| values[col] > 0.5;

        let start = (0..self.n).find(|&i| active(self.is_start(i)))?;
        let end = (0..self.n).find(|&i| active(self.is_end(i)))?;
        let mut next = vec![None; self.n];
        for (a, &(i, j)) in self.arcs.iter().enumerate() {
            if active(self.x(a)) {
                next[i] = Some(j);
            }
        }
        Some(Solution::Successors { next, start, end })
    }
}

fn upper(allowed: bool) -> f64 {
    if allowed {
        1.0
    } else {
        0.0
    }
}

pub(crate) fn build(matrix: &CostTimeMatrix, rules: &TripRules) -> (RowProblem, Layout) {
    let n = matrix.len();
    let big_n = n as f64;
    let round_trip = rules.topology == Topology::RoundTrip;
    let arcs: Vec<(usize, usize)> = matrix.reachable_pairs().collect();

    let mut problem = RowProblem::default();

    let x: Vec<Col> = arcs
        .iter()
        .map(|&(i, j)| problem.add_integer_column(matrix.edge_objective(i, j), 0.0..=1.0))
        .collect();
    let u: Vec<Col> = (0..n).map(|_| problem.add_column(0.0, 0.0..=big_n)).collect();
    let is_start: Vec<Col> = (0..n)
        .map(|i| problem.add_integer_column(0.0, 0.0..=upper(rules.is_origin(i))))
        .collect();
    let is_end: Vec<Col> = (0..n)
        .map(|i| {
            let refund = if round_trip {
                -matrix.weight_cost() * matrix.stay_cost(i)
            } else {
                0.0
            };
            problem.add_integer_column(refund, 0.0..=upper(rules.is_end(i)))
        })
        .collect();

    let mut inflow: Vec<Vec<(Col, f64)>> = vec![Vec::new(); n];
    let mut outflow: Vec<Vec<(Col, f64)>> = vec![Vec::new(); n];
    for (a, &(i, j)) in arcs.iter().enumerate() {
        outflow[i].push((x[a], 1.0));
        inflow[j].push((x[a], 1.0));
    }

    problem.add_row(1.0..=1.0, is_start.iter().map(|&c| (c, 1.0)));
    problem.add_row(1.0..=1.0, is_end.iter().map(|&c| (c, 1.0)));
    problem.add_row(1.0.., x.iter().map(|&c| (c, 1.0)));

    for k in 0..n {
        let mut flow: Vec<(Col, f64)> = outflow[k].clone();
        flow.extend(inflow[k].iter().map(|&(c, _)| (c, -1.0)));
        flow.push((is_start[k], -1.0));
        flow.push((is_end[k], 1.0));
        problem.add_row(0.0..=0.0, flow);

        problem.add_row(..=1.0, inflow[k].iter().copied());
        problem.add_row(..=1.0, outflow[k].iter().copied());

        if round_trip {
            problem.add_row(0.0..=0.0, [(is_start[k], 1.0), (is_end[k], -1.0)]);
        }

        if rules.is_required(k) {
            let mut cover: Vec<(Col, f64)> = inflow[k].clone();
            cover.push((is_start[k], 1.0));
            if round_trip {
                cover.push((is_end[k], -1.0));
            }
            problem.add_row(1.0..=1.0, cover);
        }
    }

    for (a, &(i, j)) in arcs.iter().enumerate() {
        let mut mtz = vec![(u[i], 1.0), (u[j], -1.0), (x[a], big_n)];
        if round_trip {
            // arcs back into the start close the cycle
            mtz.push((is_start[j], -big_n));
        }
        problem.add_row(..=big_n - 1.0, mtz);
    }

    (problem, Layout { arcs, n })
}
