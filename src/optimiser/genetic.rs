//! Single-objective genetic algorithm over grid-index genomes.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::evaluate::{Candidate, Evaluator, Tally};
use super::operators::{default_mutation_rate, mutate, uniform_crossover};
use super::space::Genome;
use super::{OptimisationResult, Outcome};
use crate::error::SimError;

/// Parent selection scheme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    /// Probability proportional to how far a candidate beats the worst.
    Roulette,
    /// Linear ranking: the best of `n` is weighted `n`, the worst 1.
    #[default]
    Rank,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneticConfig {
    pub population_size: usize,
    /// Generation budget after the initial population.
    pub generations: usize,
    pub selection: Selection,
    pub crossover_probability: f64,
    /// Per-gene mutation probability; `None` mutates one gene per genome on
    /// average.
    pub mutation_rate: Option<f64>,
    /// Largest move of a mutated gene, in grid steps.
    pub max_mutation_steps: usize,
    /// Best candidates copied unchanged into the next generation.
    pub elitism: usize,
    /// Generations without improvement before stopping.
    pub stall_generations: usize,
    /// Smallest fitness decrease that counts as an improvement.
    pub tolerance: f64,
    /// Objective weights of the scalar fitness; empty weighs all equally.
    pub weights: Vec<f64>,
    pub seed: u64,
}

impl Default for GeneticConfig {
    fn default() -> Self {
        Self {
            population_size: 40,
            generations: 50,
            selection: Selection::Rank,
            crossover_probability: 0.9,
            mutation_rate: None,
            max_mutation_steps: 2,
            elitism: 2,
            stall_generations: 10,
            tolerance: 1e-6,
            weights: Vec::new(),
            seed: 42,
        }
    }
}

#[derive(Clone)]
struct Scored {
    fitness: f64,
    candidate: Candidate,
}

/// Runs the genetic algorithm and returns the best candidate seen.
///
/// # Errors
///
/// `SimError::Config` for a population below two or a weight list whose
/// length does not match the objectives.
pub fn run(ev: &Evaluator<'_, '_>, config: &GeneticConfig) -> Result<OptimisationResult, SimError> {
    if config.population_size < 2 {
        return Err(SimError::Config(
            "genetic_algorithm.population_size must be at least 2".into(),
        ));
    }
    let weights = if config.weights.is_empty() {
        vec![1.0; ev.objectives().len()]
    } else if config.weights.len() == ev.objectives().len() {
        config.weights.clone()
    } else {
        return Err(SimError::Config(format!(
            "genetic_algorithm.weights has {} entries for {} objectives",
            config.weights.len(),
            ev.objectives().len()
        )));
    };

    let space = ev.space();
    let axes = space.axis_lengths();
    let rate = config
        .mutation_rate
        .unwrap_or_else(|| default_mutation_rate(space.dimensions()));
    let elitism = config.elitism.min(config.population_size - 1);
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut tally = Tally::default();

    info!(
        "Genetic algorithm: population {}, {} generations, {:?} selection",
        config.population_size, config.generations, config.selection
    );

    let initial: Vec<Genome> = (0..config.population_size)
        .map(|_| space.random_genome(&mut rng))
        .collect();
    let batch = ev.evaluate_batch(&initial)?;
    tally.record(&batch);
    let mut population = score(batch.candidates, &weights);
    sort_by_fitness(&mut population);

    let mut best: Option<Scored> = population.first().cloned();
    let mut stall = 0;
    let mut generations = 0;

    for generation in 1..=config.generations {
        if tally.cancelled || population.is_empty() {
            break;
        }

        let selection_weights = selection_weights(&population, config.selection);
        let total: f64 = selection_weights.iter().sum();
        let wanted = config.population_size - elitism.min(population.len());
        let mut offspring: Vec<Genome> = Vec::with_capacity(wanted + 1);
        while offspring.len() < wanted {
            let a = &population[pick(&selection_weights, total, &mut rng)].candidate.genome;
            let b = &population[pick(&selection_weights, total, &mut rng)].candidate.genome;
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
        offspring.truncate(wanted);

        let batch = ev.evaluate_batch(&offspring)?;
        tally.record(&batch);

        population.truncate(elitism);
        population.extend(score(batch.candidates, &weights));
        sort_by_fitness(&mut population);
        generations = generation;

        let improved = match (&best, population.first()) {
            (Some(b), Some(top)) => top.fitness < b.fitness - config.tolerance,
            (None, Some(_)) => true,
            _ => false,
        };
        if improved {
            best = population.first().cloned();
            stall = 0;
        } else {
            stall += 1;
        }
        info!(
            "Generation {}: best fitness {:.4}, {} feasible of {}",
            generation,
            best.as_ref().map_or(f64::INFINITY, |b| b.fitness),
            batch.evaluations - batch.failures,
            offspring.len()
        );

        if tally.cancelled {
            break;
        }
        if stall >= config.stall_generations {
            info!("Converged after {} generations without improvement", stall);
            break;
        }
    }

    if tally.cancelled {
        warn!("Genetic algorithm cancelled after {} generations", generations);
    }

    let outcome = match best {
        Some(b) => Outcome::Best(Box::new(b.candidate)),
        None => Outcome::NoFeasibleCandidate,
    };
    Ok(OptimisationResult::new(ev.objectives(), outcome, tally, generations))
}

fn score(candidates: Vec<Candidate>, weights: &[f64]) -> Vec<Scored> {
    candidates
        .into_iter()
        .map(|candidate| Scored {
            fitness: weighted_sum(&candidate.objectives, weights),
            candidate,
        })
        .collect()
}

/// Scalar fitness; lower is better.
pub fn weighted_sum(objectives: &[f64], weights: &[f64]) -> f64 {
    objectives
        .iter()
        .zip(weights)
        .filter(|(_, w)| **w != 0.0)
        .map(|(o, w)| o * w)
        .sum()
}

fn sort_by_fitness(population: &mut [Scored]) {
    population.sort_by(|a, b| a.fitness.total_cmp(&b.fitness));
}

/// Selection weights of a population sorted best first.
fn selection_weights(population: &[Scored], selection: Selection) -> Vec<f64> {
    let n = population.len();
    match selection {
        Selection::Rank => (0..n).map(|i| (n - i) as f64).collect(),
        Selection::Roulette => {
            let worst = population
                .iter()
                .map(|s| s.fitness)
                .filter(|f| f.is_finite())
                .fold(f64::NEG_INFINITY, f64::max);
            population
                .iter()
                .map(|s| {
                    if s.fitness.is_finite() {
                        worst - s.fitness
                    } else {
                        0.0
                    }
                })
                .collect()
        }
    }
}

/// Index drawn with probability proportional to `weights`; uniform when
/// the weights carry no information.
fn pick<R: Rng + ?Sized>(weights: &[f64], total: f64, rng: &mut R) -> usize {
    if !(total.is_finite() && total > 0.0) {
        return rng.random_range(0..weights.len());
    }
    let mut target = rng.random::<f64>() * total;
    for (i, w) in weights.iter().enumerate() {
        if target < *w {
            return i;
        }
        target -= w;
    }
    weights.len() - 1
}
