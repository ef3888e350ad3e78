//! Variation operators over grid-index genomes.

use rand::Rng;

use super::space::Genome;

/// Per-parameter uniform crossover; each gene is swapped with
/// probability one half.
pub fn uniform_crossover<R: Rng + ?Sized>(
    a: &[usize],
    b: &[usize],
    rng: &mut R,
) -> (Genome, Genome) {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| if rng.random_bool(0.5) { (y, x) } else { (x, y) })
        .unzip()
}

/// Moves each gene with probability `rate` by up to `max_steps` grid
/// steps in either direction, clamped to its axis.
pub fn mutate<R: Rng + ?Sized>(
    genome: &mut [usize],
    axes: &[usize],
    rate: f64,
    max_steps: usize,
    rng: &mut R,
) {
    let rate = rate.clamp(0.0, 1.0);
    for (gene, &len) in genome.iter_mut().zip(axes) {
        if len <= 1 || max_steps == 0 || !rng.random_bool(rate) {
            continue;
        }
        let steps = rng.random_range(1..=max_steps);
        let top = len - 1;
        *gene = if rng.random_bool(0.5) {
            (*gene + steps).min(top)
        } else {
            gene.saturating_sub(steps)
        };
    }
}

/// Default per-gene mutation rate: one gene per genome on average.
pub fn default_mutation_rate(dimensions: usize) -> f64 {
    if dimensions == 0 { 0.0 } else { 1.0 / dimensions as f64 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn crossover_keeps_genes_per_position() {
        let mut rng = StdRng::seed_from_u64(1);
        let a = vec![0, 1, 2, 3];
        let b = vec![9, 8, 7, 6];
        let (c, d) = uniform_crossover(&a, &b, &mut rng);
        for i in 0..4 {
            let mut pair = [c[i], d[i]];
            pair.sort();
            let mut parents = [a[i], b[i]];
            parents.sort();
            assert_eq!(pair, parents);
        }
    }

    #[test]
    fn mutation_stays_on_axis() {
        let mut rng = StdRng::seed_from_u64(3);
        let axes = [5, 1, 11];
        for _ in 0..200 {
            let mut g = vec![4, 0, 0];
            mutate(&mut g, &axes, 1.0, 3, &mut rng);
            assert!(g[0] < 5 && g[1] == 0 && g[2] < 11);
        }
    }

    #[test]
    fn zero_rate_is_identity() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut g = vec![2, 2];
        mutate(&mut g, &[5, 5], 0.0, 3, &mut rng);
        assert_eq!(g, vec![2, 2]);
    }
}
