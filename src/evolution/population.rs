//! Generational genetic algorithm over a population of recipes.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;

use rand::Rng;

use crate::schema::{
    EvolutionConfig, EvolutionHistory, EvolutionStats, GenerationStats, Recipe, StopReason,
};

use super::selection::{ParentSelector, select_survivors};
use super::{EvolutionError, InspiringSet, RecipeRng};

/// The current generation of recipes plus everything needed to breed the next.
pub struct Population {
    config: EvolutionConfig,
    recipes: Vec<Recipe>,
    inspiring: InspiringSet,
    rng: RecipeRng,
    generation: usize,
    next_id: u64,
    history: EvolutionHistory,
    cancelled: Arc<AtomicBool>,
}

impl Population {
    /// Create a population from the seed corpus.
    ///
    /// The inspiring set is derived here, once, from the seed recipes.
    pub fn new(recipes: Vec<Recipe>, config: EvolutionConfig) -> Result<Self, EvolutionError> {
        config.validate()?;
        if recipes.is_empty() {
            return Err(EvolutionError::EmptyPopulation);
        }

        let rng = match config.random_seed {
            Some(seed) => RecipeRng::new(seed),
            None => RecipeRng::random(),
        };
        let inspiring = Self::build_inspiring_set(&recipes);
        let next_id = recipes.iter().map(Recipe::id).max().map_or(0, |id| id + 1);

        log::info!(
            "Population of {} recipes, {} ingredients in the inspiring set",
            recipes.len(),
            inspiring.len()
        );

        Ok(Self {
            config,
            recipes,
            inspiring,
            rng,
            generation: 0,
            next_id,
            history: EvolutionHistory::default(),
            cancelled: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Union of every ingredient name in `recipes`.
    pub fn build_inspiring_set(recipes: &[Recipe]) -> InspiringSet {
        InspiringSet::from_recipes(recipes)
    }

    /// Get cancellation handle.
    ///
    /// Setting it stops [`run`](Self::run) at the next generation boundary.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancelled)
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Generations completed so far.
    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn inspiring_set(&self) -> &InspiringSet {
        &self.inspiring
    }

    pub fn history(&self) -> &EvolutionHistory {
        &self.history
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    /// Sample two distinct parent indices, weighted by fitness.
    pub fn select_pair<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<(usize, usize), EvolutionError> {
        Ok(ParentSelector::new(&self.recipes)?.select_pair(rng))
    }

    /// Cross two parents at a random pivot and mutate the child.
    ///
    /// The child takes `parent1`'s ingredient lines before the pivot and
    /// `parent2`'s lines from the pivot on. Names present in both halves are
    /// summed when the child is parsed.
    pub fn crossover<R: Rng + ?Sized>(
        &self,
        parent1: &Recipe,
        parent2: &Recipe,
        id: u64,
        rng: &mut R,
    ) -> Result<Recipe, EvolutionError> {
        let shortest = parent1.len().min(parent2.len());
        let pivot = if shortest == 0 {
            0
        } else {
            rng.gen_range(0..shortest)
        };

        let lines = crossover_lines(parent1, parent2, pivot);
        let mut child = Recipe::from_lines(id, lines)?;
        child.mutate(&self.inspiring, &self.config.mutation, rng);
        Ok(child)
    }

    /// Breed one offspring with its own generator.
    fn breed(
        &self,
        selector: &ParentSelector,
        id: u64,
        seed: u64,
    ) -> Result<Recipe, EvolutionError> {
        let mut rng = RecipeRng::new(seed);
        let (i, j) = selector.select_pair(&mut rng);
        self.crossover(&self.recipes[i], &self.recipes[j], id, &mut rng)
    }

    /// Breed offspring in parallel.
    #[cfg(not(target_arch = "wasm32"))]
    fn breed_all(
        &self,
        selector: &ParentSelector,
        first_id: u64,
        seeds: &[u64],
    ) -> Result<Vec<Recipe>, EvolutionError> {
        if self.config.parallel {
            seeds
                .par_iter()
                .enumerate()
                .map(|(i, &seed)| self.breed(selector, first_id + i as u64, seed))
                .collect()
        } else {
            self.breed_sequential(selector, first_id, seeds)
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn breed_all(
        &self,
        selector: &ParentSelector,
        first_id: u64,
        seeds: &[u64],
    ) -> Result<Vec<Recipe>, EvolutionError> {
        self.breed_sequential(selector, first_id, seeds)
    }

    fn breed_sequential(
        &self,
        selector: &ParentSelector,
        first_id: u64,
        seeds: &[u64],
    ) -> Result<Vec<Recipe>, EvolutionError> {
        seeds
            .iter()
            .enumerate()
            .map(|(i, &seed)| self.breed(selector, first_id + i as u64, seed))
            .collect()
    }

    /// Run a single generation step.
    ///
    /// Breeds one offspring per current recipe, then keeps the fitter part of
    /// the old and new populations. On error the population is unchanged.
    pub fn generation_step(&mut self) -> Result<GenerationStats, EvolutionError> {
        let selector = ParentSelector::new(&self.recipes)?;

        // Child seeds are drawn up front so results do not depend on thread
        // scheduling.
        let seeds: Vec<u64> = (0..self.recipes.len())
            .map(|_| self.rng.next_seed())
            .collect();
        let offspring = self.breed_all(&selector, self.next_id, &seeds)?;
        let bred = offspring.len();

        let old = std::mem::take(&mut self.recipes);
        self.recipes = select_survivors(old, offspring, self.config.survivors);
        self.next_id += bred as u64;
        self.generation += 1;

        let stats = GenerationStats::from_population(self.generation, bred, &self.recipes);
        self.history.record(&stats);
        log::debug!(
            "Generation {}: {} recipes, best={}, avg={:.2}",
            stats.generation,
            stats.population_size,
            stats.best_fitness,
            stats.avg_fitness
        );
        Ok(stats)
    }

    /// Run evolution with progress callback.
    pub fn run_with_callback<F>(
        &mut self,
        generations: usize,
        mut callback: F,
    ) -> Result<EvolutionStats, EvolutionError>
    where
        F: FnMut(&GenerationStats),
    {
        let start_time = Instant::now();
        let start_generation = self.generation;
        let mut total_offspring = 0u64;

        let mut stop_reason = StopReason::MaxGenerations;
        for _ in 0..generations {
            if self.cancelled.load(Ordering::Relaxed) {
                stop_reason = StopReason::Cancelled;
                break;
            }
            let stats = self.generation_step()?;
            total_offspring += stats.offspring as u64;
            callback(&stats);
        }

        let completed = self.generation - start_generation;
        log::info!(
            "Evolution stopped after {} generations ({:?})",
            completed,
            stop_reason
        );

        Ok(EvolutionStats {
            generations: completed,
            total_offspring,
            best_fitness: self.recipes.iter().map(Recipe::fitness).max().unwrap_or(0),
            final_population: self.recipes.len(),
            elapsed_seconds: start_time.elapsed().as_secs_f64(),
            stop_reason,
        })
    }

    /// Run `generations` generation steps.
    pub fn run(&mut self, generations: usize) -> Result<EvolutionStats, EvolutionError> {
        self.run_with_callback(generations, |_| {})
    }

    /// The `k` fittest recipes in ascending fitness order (fittest last).
    ///
    /// Ties keep population order.
    pub fn top_k(&self, k: usize) -> Vec<&Recipe> {
        let mut sorted: Vec<&Recipe> = self.recipes.iter().collect();
        sorted.sort_by_key(|r| r.fitness());
        let start = sorted.len().saturating_sub(k);
        sorted.split_off(start)
    }
}

/// Ingredient lines of a crossover child before duplicate merging:
/// `parent1[..pivot]` followed by `parent2[pivot..]`.
pub fn crossover_lines(parent1: &Recipe, parent2: &Recipe, pivot: usize) -> Vec<String> {
    let head = parent1.ingredients().iter().take(pivot);
    let tail = parent2.ingredients().iter().skip(pivot);
    head.chain(tail).map(ToString::to_string).collect()
}
