//! Parent selection and survivor selection.

use rand::Rng;

use crate::schema::{Recipe, SurvivorSplit};

use super::EvolutionError;

/// Fitness-proportionate (roulette wheel) sampler over a fixed population.
///
/// Weights are captured once, so a selector can be shared by every offspring
/// bred in one generation.
#[derive(Debug, Clone)]
pub struct ParentSelector {
    weights: Vec<f64>,
    total: f64,
}

impl ParentSelector {
    /// Capture fitness weights, rejecting populations that cannot yield two
    /// distinct weighted parents.
    pub fn new(recipes: &[Recipe]) -> Result<Self, EvolutionError> {
        if recipes.len() < 2 {
            return Err(EvolutionError::DegenerateSelection(format!(
                "need at least 2 recipes, population has {}",
                recipes.len()
            )));
        }

        let weights: Vec<f64> = recipes.iter().map(|r| r.fitness() as f64).collect();
        let total: f64 = weights.iter().sum();
        if total <= 0.0 {
            return Err(EvolutionError::DegenerateSelection(
                "total fitness is zero".to_string(),
            ));
        }
        if weights.iter().filter(|&&w| w > 0.0).count() < 2 {
            return Err(EvolutionError::DegenerateSelection(
                "fewer than 2 recipes have nonzero fitness".to_string(),
            ));
        }

        Ok(Self { weights, total })
    }

    /// Draw two distinct indices without replacement.
    pub fn select_pair<R: Rng + ?Sized>(&self, rng: &mut R) -> (usize, usize) {
        let first = self.spin(rng, None);
        let second = self.spin(rng, Some(first));
        (first, second)
    }

    /// One roulette spin, optionally with one index removed from the wheel.
    fn spin<R: Rng + ?Sized>(&self, rng: &mut R, exclude: Option<usize>) -> usize {
        let total = match exclude {
            Some(idx) => self.total - self.weights[idx],
            None => self.total,
        };

        let target = rng.gen_range(0.0..total);
        let mut cumulative = 0.0;
        let mut last = 0;
        for (i, &weight) in self.weights.iter().enumerate() {
            if Some(i) == exclude || weight <= 0.0 {
                continue;
            }
            cumulative += weight;
            last = i;
            if target < cumulative {
                return i;
            }
        }
        // Rounding can leave target a hair above the final cumulative sum.
        last
    }
}

/// The fittest `keep` recipes, in ascending fitness order.
///
/// The sort is stable, so equal-fitness recipes keep their relative order.
pub fn fittest(mut recipes: Vec<Recipe>, keep: usize) -> Vec<Recipe> {
    recipes.sort_by_key(Recipe::fitness);
    let start = recipes.len().saturating_sub(keep);
    recipes.split_off(start)
}

/// Merge the fitter part of the old population with the fitter part of the
/// offspring. Old survivors come first.
pub fn select_survivors(
    old: Vec<Recipe>,
    offspring: Vec<Recipe>,
    split: SurvivorSplit,
) -> Vec<Recipe> {
    let (keep_old, keep_new) = split.keep_counts(old.len(), offspring.len());
    let mut next = fittest(old, keep_old);
    next.extend(fittest(offspring, keep_new));
    next
}
