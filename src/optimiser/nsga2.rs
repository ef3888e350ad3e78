//! NSGA-II multi-objective search.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::evaluate::{Candidate, Evaluator, Tally};
use super::operators::{default_mutation_rate, mutate, uniform_crossover};
use super::pareto::{crowded_cmp, crowding_distance, non_dominated_sort, ranks};
use super::space::Genome;
use super::{OptimisationResult, Outcome, first_front, unique_genomes};
use crate::error::SimError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Nsga2Config {
    pub population_size: usize,
    pub generations: usize,
    pub crossover_probability: f64,
    /// Per-gene mutation probability; `None` mutates one gene per genome on
    /// average.
    pub mutation_rate: Option<f64>,
    pub max_mutation_steps: usize,
    pub seed: u64,
}

impl Default for Nsga2Config {
    fn default() -> Self {
        Self {
            population_size: 40,
            generations: 30,
            crossover_probability: 0.9,
            mutation_rate: None,
            max_mutation_steps: 2,
            seed: 42,
        }
    }
}

/// Rank and crowding distance of every population member.
struct Ranking {
    rank: Vec<usize>,
    distance: Vec<f64>,
}

impl Ranking {
    fn of(population: &[Candidate]) -> Self {
        let points = objective_points(population);
        let fronts = non_dominated_sort(&points);
        let mut distance = vec![0.0; population.len()];
        for front in &fronts {
            for (&i, d) in front.iter().zip(crowding_distance(&points, front)) {
                distance[i] = d;
            }
        }
        Self {
            rank: ranks(&fronts, population.len()),
            distance,
        }
    }

    /// Binary tournament on (rank, crowding distance).
    fn tournament<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let n = self.rank.len();
        let a = rng.random_range(0..n);
        let b = rng.random_range(0..n);
        if crowded_cmp(self.rank[b], self.distance[b], self.rank[a], self.distance[a]).is_lt() {
            b
        } else {
            a
        }
    }
}

/// Runs NSGA-II and returns the final first front.
///
/// # Errors
///
/// `SimError::Config` for a population below two.
pub fn run(ev: &Evaluator<'_, '_>, config: &Nsga2Config) -> Result<OptimisationResult, SimError> {
    if config.population_size < 2 {
        return Err(SimError::Config(
            "nsga2.population_size must be at least 2".into(),
        ));
    }
    let space = ev.space();
    let axes = space.axis_lengths();
    let rate = config
        .mutation_rate
        .unwrap_or_else(|| default_mutation_rate(space.dimensions()));
    let size = config.population_size;
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut tally = Tally::default();

    info!(
        "NSGA-II: population {}, {} generations, {} objectives",
        size,
        config.generations,
        ev.objectives().len()
    );

    let initial: Vec<Genome> = (0..size).map(|_| space.random_genome(&mut rng)).collect();
    let batch = ev.evaluate_batch(&initial)?;
    tally.record(&batch);
    let mut population = batch.candidates;
    let mut generations = 0;

    for generation in 1..=config.generations {
        if tally.cancelled || population.is_empty() {
            break;
        }

        let ranking = Ranking::of(&population);
        let mut offspring: Vec<Genome> = Vec::with_capacity(size + 1);
        while offspring.len() < size {
            let a = &population[ranking.tournament(&mut rng)].genome;
            let b = &population[ranking.tournament(&mut rng)].genome;
            let (mut c, mut d) = if rng.random_bool(config.crossover_probability.clamp(0.0, 1.0)) {
                uniform_crossover(a, b, &mut rng)
            } else {
                (a.clone(), b.clone())
            };
            mutate(&mut c, &axes, rate, config.max_mutation_steps, &mut rng);
            mutate(&mut d, &axes, rate, config.max_mutation_steps, &mut rng);
            offspring.push(c);
            offspring.push(d);
        }
        offspring.truncate(size);

        let batch = ev.evaluate_batch(&offspring)?;
        tally.record(&batch);
        population.extend(batch.candidates);
        population = survivors(population, size);
        generations = generation;

        info!(
            "Generation {}: {} in first front, {} feasible offspring",
            generation,
            Ranking::of(&population).rank.iter().filter(|r| **r == 0).count(),
            batch.evaluations - batch.failures
        );

        if tally.cancelled {
            break;
        }
    }

    if tally.cancelled {
        warn!("NSGA-II cancelled after {} generations", generations);
    }

    let front = first_front(population);
    let outcome = if front.is_empty() {
        Outcome::NoFeasibleCandidate
    } else {
        Outcome::ParetoFront(front)
    };
    Ok(OptimisationResult::new(ev.objectives(), outcome, tally, generations))
}

fn objective_points(population: &[Candidate]) -> Vec<Vec<f64>> {
    population.iter().map(|c| c.objectives.clone()).collect()
}

/// Fills the next population front by front; the front that does not fit
/// whole is truncated by descending crowding distance. Repeated genomes
/// compete once.
fn survivors(combined: Vec<Candidate>, size: usize) -> Vec<Candidate> {
    let combined = unique_genomes(combined);
    let points = objective_points(&combined);
    let fronts = non_dominated_sort(&points);
    let mut pool: Vec<Option<Candidate>> = combined.into_iter().map(Some).collect();
    let mut next = Vec::with_capacity(size);

    for front in fronts {
        let room = size - next.len();
        if room == 0 {
            break;
        }
        if front.len() <= room {
            next.extend(front.iter().filter_map(|&i| pool[i].take()));
            continue;
        }
        let distance = crowding_distance(&points, &front);
        let mut order: Vec<usize> = (0..front.len()).collect();
        order.sort_by(|&a, &b| distance[b].total_cmp(&distance[a]));
        next.extend(order.into_iter().take(room).filter_map(|k| pool[front[k]].take()));
        break;
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Comparison, SimulationMetrics, SimulationResult};
    use crate::task::TaskData;

    fn candidate(objectives: Vec<f64>) -> Candidate {
        // Distinct objectives get distinct genomes.
        let genome = objectives.iter().map(|v| (v * 100.0) as usize).collect();
        Candidate {
            genome,
            task: TaskData::default(),
            objectives,
            result: SimulationResult {
                baseline: SimulationMetrics::default(),
                metrics: SimulationMetrics::default(),
                comparison: Comparison::default(),
                horizon_years: 1.0,
                lifetime_years: 15,
            },
        }
    }

    #[test]
    fn survivors_prefer_better_fronts() {
        let combined = vec![
            candidate(vec![5.0, 5.0]),
            candidate(vec![1.0, 4.0]),
            candidate(vec![4.0, 1.0]),
            candidate(vec![6.0, 6.0]),
        ];
        let next = survivors(combined, 2);
        let mut kept: Vec<Vec<f64>> = next.into_iter().map(|c| c.objectives).collect();
        kept.sort_by(|a, b| a[0].total_cmp(&b[0]));
        assert_eq!(kept, vec![vec![1.0, 4.0], vec![4.0, 1.0]]);
    }

    #[test]
    fn last_front_truncated_by_crowding() {
        let combined = vec![
            candidate(vec![0.0, 10.0]),
            candidate(vec![1.0, 9.0]),
            candidate(vec![5.0, 5.0]),
            candidate(vec![10.0, 0.0]),
        ];
        let next = survivors(combined, 3);
        let kept: Vec<Vec<f64>> = next.into_iter().map(|c| c.objectives).collect();
        // The crowded point next to a boundary is dropped.
        assert!(!kept.contains(&vec![1.0, 9.0]));
        assert_eq!(kept.len(), 3);
    }

    #[test]
    fn repeated_genomes_survive_once() {
        let combined = vec![
            candidate(vec![1.0, 1.0]),
            candidate(vec![1.0, 1.0]),
            candidate(vec![1.0, 1.0]),
            candidate(vec![2.0, 0.5]),
            candidate(vec![3.0, 3.0]),
        ];
        let next = survivors(combined, 4);
        let mut genomes: Vec<Genome> = next.into_iter().map(|c| c.genome).collect();
        assert_eq!(genomes.len(), 3);
        genomes.sort();
        genomes.dedup();
        assert_eq!(genomes.len(), 3);
    }

    #[test]
    fn dominating_candidate_ranks_first() {
        let population = vec![
            candidate(vec![2.0, 2.0]),
            candidate(vec![0.5, 0.5]),
            candidate(vec![1.0, 3.0]),
        ];
        let ranking = Ranking::of(&population);
        assert_eq!(ranking.rank[1], 0);
        assert!(ranking.rank[0] > 0 && ranking.rank[2] > 0);
    }
}
