//! Non-dominated sorting and crowding distance over (cost, duration).

use crate::genome::Fitness;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParetoCompare {
    ADominatesB,
    Equal,
    BDominatesA,
}

/// Both objectives are minimised. Incomparable points are `Equal`.
pub fn pareto_compare(a: &Fitness, b: &Fitness) -> ParetoCompare {
    let a_better = a.cost < b.cost || a.duration < b.duration;
    let b_better = b.cost < a.cost || b.duration < a.duration;
    match (a_better, b_better) {
        (true, false) => ParetoCompare::ADominatesB,
        (false, true) => ParetoCompare::BDominatesA,
        _ => ParetoCompare::Equal,
    }
}

/// Fast non-dominated sort. Returns index fronts, best first.
pub fn non_dominated_sort(points: &[Fitness]) -> Vec<Vec<usize>> {
    let n = points.len();
    let mut dominates: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut dominated_by = vec![0usize; n];

    for i in 0..n {
        for j in (i + 1)..n {
            match pareto_compare(&points[i], &points[j]) {
                ParetoCompare::ADominatesB => {
                    dominates[i].push(j);
                    dominated_by[j] += 1;
                }
                ParetoCompare::BDominatesA => {
                    dominates[j].push(i);
                    dominated_by[i] += 1;
                }
                ParetoCompare::Equal => {}
            }
        }
    }

    let mut fronts = Vec::new();
    let mut current: Vec<usize> = (0..n).filter(|&i| dominated_by[i] == 0).collect();
    while !current.is_empty() {
        let mut next = Vec::new();
        for &i in &current {
            for &j in &dominates[i] {
                dominated_by[j] -= 1;
                if dominated_by[j] == 0 {
                    next.push(j);
                }
            }
        }
        fronts.push(current);
        current = next;
    }
    fronts
}

/// Crowding distance of every member of `front`, in the same order.
/// Boundary points get infinity.
pub fn crowding_distance(points: &[Fitness], front: &[usize]) -> Vec<f64> {
    let m = front.len();
    let mut distance = vec![0.0; m];
    if m <= 2 {
        return vec![f64::INFINITY; m];
    }

    let objectives: [fn(&Fitness) -> f64; 2] = [|f| f.cost, |f| f.duration];
    for objective in objectives {
        let mut order: Vec<usize> = (0..m).collect();
        order.sort_by(|&a, &b| objective(&points[front[a]]).total_cmp(&objective(&points[front[b]])));

        let low = objective(&points[front[order[0]]]);
        let high = objective(&points[front[order[m - 1]]]);
        distance[order[0]] = f64::INFINITY;
        distance[order[m - 1]] = f64::INFINITY;
        let span = high - low;
        if span <= 0.0 {
            continue;
        }
        for k in 1..m - 1 {
            let before = objective(&points[front[order[k - 1]]]);
            let after = objective(&points[front[order[k + 1]]]);
            distance[order[k]] += (after - before) / span;
        }
    }
    distance
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fit(cost: f64, duration: f64) -> Fitness {
        Fitness { cost, duration }
    }

    #[test]
    fn compare_points() {
        assert_eq!(pareto_compare(&fit(1.0, 1.0), &fit(2.0, 2.0)), ParetoCompare::ADominatesB);
        assert_eq!(pareto_compare(&fit(1.0, 3.0), &fit(1.0, 2.0)), ParetoCompare::BDominatesA);
        assert_eq!(pareto_compare(&fit(1.0, 3.0), &fit(2.0, 2.0)), ParetoCompare::Equal);
        assert_eq!(pareto_compare(&fit(1.0, 1.0), &fit(1.0, 1.0)), ParetoCompare::Equal);
    }

    #[test]
    fn sorts_into_fronts() {
        let points = vec![
            fit(1.0, 5.0),
            fit(2.0, 2.0),
            fit(5.0, 1.0),
            fit(3.0, 3.0),
            fit(6.0, 6.0),
            Fitness::PENALTY,
        ];
        let fronts = non_dominated_sort(&points);
        assert_eq!(fronts, vec![vec![0, 1, 2], vec![3], vec![4], vec![5]]);
    }

    #[test]
    fn boundary_points_are_infinitely_crowded() {
        let points = vec![fit(1.0, 5.0), fit(2.0, 2.0), fit(5.0, 1.0), fit(3.0, 1.5)];
        let front = vec![0, 1, 2, 3];
        let distance = crowding_distance(&points, &front);
        assert!(distance[0].is_infinite());
        assert!(distance[2].is_infinite());
        assert!(distance[1].is_finite() && distance[3].is_finite());
        // (3-1)/4 + (5-1.5)/4 for point 1, (5-2)/4 + (2-1)/4 for point 3
        assert!((distance[1] - 1.375).abs() < 1e-12);
        assert!((distance[3] - 1.0).abs() < 1e-12);
    }
}
