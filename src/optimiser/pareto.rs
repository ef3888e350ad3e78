//! Dominance, non-dominated sorting and crowding distance.
//!
//! All objective vectors are in minimisation form.

use std::cmp::Ordering;

/// `a` dominates `b`: no worse in every objective and strictly better in
/// at least one.
pub fn dominates(a: &[f64], b: &[f64]) -> bool {
    let mut strictly_better = false;
    for (x, y) in a.iter().zip(b) {
        if x > y {
            return false;
        }
        if x < y {
            strictly_better = true;
        }
    }
    strictly_better
}

/// Fast non-dominated sort.
///
/// Returns the fronts as lists of indices into `points`; front 0 holds the
/// points no other point dominates.
pub fn non_dominated_sort(points: &[Vec<f64>]) -> Vec<Vec<usize>> {
    let n = points.len();
    let mut dominated_by: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut domination_count = vec![0usize; n];
    let mut fronts: Vec<Vec<usize>> = Vec::new();
    let mut current = Vec::new();

    for p in 0..n {
        for q in 0..n {
            if p == q {
                continue;
            }
            if dominates(&points[p], &points[q]) {
                dominated_by[p].push(q);
            } else if dominates(&points[q], &points[p]) {
                domination_count[p] += 1;
            }
        }
        if domination_count[p] == 0 {
            current.push(p);
        }
    }

    while !current.is_empty() {
        let mut next = Vec::new();
        for &p in &current {
            for &q in &dominated_by[p] {
                domination_count[q] -= 1;
                if domination_count[q] == 0 {
                    next.push(q);
                }
            }
        }
        fronts.push(std::mem::replace(&mut current, next));
    }
    fronts
}

/// Pareto rank of every point (its front number).
pub fn ranks(fronts: &[Vec<usize>], n: usize) -> Vec<usize> {
    let mut rank = vec![usize::MAX; n];
    for (r, front) in fronts.iter().enumerate() {
        for &i in front {
            rank[i] = r;
        }
    }
    rank
}

/// Crowding distance of each member of `front`, in `front` order.
///
/// Boundary points of every objective get infinite distance. Objectives
/// with a zero or non-finite spread within the front contribute nothing.
pub fn crowding_distance(points: &[Vec<f64>], front: &[usize]) -> Vec<f64> {
    let len = front.len();
    let mut distance = vec![0.0; len];
    if len <= 2 {
        return vec![f64::INFINITY; len];
    }
    let objectives = points[front[0]].len();
    let mut order: Vec<usize> = (0..len).collect();

    for m in 0..objectives {
        let key = |i: usize| points[front[i]][m];
        order.sort_by(|&a, &b| key(a).total_cmp(&key(b)));
        let lo = key(order[0]);
        let hi = key(order[len - 1]);
        distance[order[0]] = f64::INFINITY;
        distance[order[len - 1]] = f64::INFINITY;

        let spread = hi - lo;
        if !spread.is_finite() || spread <= 0.0 {
            continue;
        }
        for w in 1..len - 1 {
            let gap = key(order[w + 1]) - key(order[w - 1]);
            if gap.is_finite() {
                distance[order[w]] += gap / spread;
            }
        }
    }
    distance
}

/// NSGA-II crowded comparison: lower rank first, then larger distance.
pub fn crowded_cmp(rank_a: usize, dist_a: f64, rank_b: usize, dist_b: f64) -> Ordering {
    rank_a
        .cmp(&rank_b)
        .then_with(|| dist_b.total_cmp(&dist_a))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dominance_needs_strict_improvement() {
        assert!(dominates(&[1.0, 2.0], &[1.0, 3.0]));
        assert!(!dominates(&[1.0, 2.0], &[1.0, 2.0]));
        assert!(!dominates(&[1.0, 4.0], &[2.0, 3.0]));
    }

    #[test]
    fn infinite_objectives_compare() {
        assert!(dominates(&[1.0, 5.0], &[1.0, f64::INFINITY]));
    }

    #[test]
    fn sorts_into_fronts() {
        let points = vec![
            vec![1.0, 5.0],
            vec![2.0, 2.0],
            vec![5.0, 1.0],
            vec![3.0, 3.0],
            vec![6.0, 6.0],
        ];
        let fronts = non_dominated_sort(&points);
        assert_eq!(fronts.len(), 3);
        let mut first = fronts[0].clone();
        first.sort();
        assert_eq!(first, vec![0, 1, 2]);
        assert_eq!(fronts[1], vec![3]);
        assert_eq!(fronts[2], vec![4]);
        assert_eq!(ranks(&fronts, 5), vec![0, 0, 0, 1, 2]);
    }

    #[test]
    fn dominating_point_is_rank_zero_and_alone() {
        let points = vec![vec![3.0, 3.0], vec![0.0, 0.0], vec![1.0, 4.0], vec![4.0, 1.0]];
        let fronts = non_dominated_sort(&points);
        assert_eq!(fronts[0], vec![1]);
    }

    #[test]
    fn crowding_rewards_isolation() {
        let points = vec![
            vec![0.0, 10.0],
            vec![1.0, 9.0],
            vec![2.0, 8.0],
            vec![8.0, 2.0],
            vec![10.0, 0.0],
        ];
        let front = [0, 1, 2, 3, 4];
        let d = crowding_distance(&points, &front);
        assert!(d[0].is_infinite() && d[4].is_infinite());
        assert!(d[3] > d[1]);
    }

    #[test]
    fn small_fronts_are_all_boundary() {
        let points = vec![vec![0.0], vec![1.0]];
        assert_eq!(crowding_distance(&points, &[0, 1]), vec![f64::INFINITY; 2]);
    }

    #[test]
    fn crowded_comparison_orders_rank_then_distance() {
        assert_eq!(crowded_cmp(0, 0.1, 1, 5.0), Ordering::Less);
        assert_eq!(crowded_cmp(1, 5.0, 1, 0.1), Ordering::Less);
    }
}
