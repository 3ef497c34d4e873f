//! Progress and result types for evolution runs.

use serde::{Deserialize, Serialize};

use super::Recipe;

/// Statistics recorded after each generation step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationStats {
    /// Generation number reached by this step (1-based).
    pub generation: usize,
    /// Offspring bred during the step.
    pub offspring: usize,
    /// Population size after survivor selection.
    pub population_size: usize,
    /// Highest fitness in the new population.
    pub best_fitness: usize,
    /// Lowest fitness in the new population.
    pub worst_fitness: usize,
    /// Mean fitness of the new population.
    pub avg_fitness: f64,
}

impl GenerationStats {
    /// Summarize a freshly selected population.
    pub fn from_population(generation: usize, offspring: usize, recipes: &[Recipe]) -> Self {
        let fitnesses = recipes.iter().map(Recipe::fitness);
        let best_fitness = fitnesses.clone().max().unwrap_or(0);
        let worst_fitness = fitnesses.clone().min().unwrap_or(0);
        let avg_fitness = if recipes.is_empty() {
            0.0
        } else {
            fitnesses.sum::<usize>() as f64 / recipes.len() as f64
        };

        Self {
            generation,
            offspring,
            population_size: recipes.len(),
            best_fitness,
            worst_fitness,
            avg_fitness,
        }
    }
}

/// Evolution history for plotting.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EvolutionHistory {
    /// Best fitness per generation.
    pub best_fitness: Vec<usize>,
    /// Average fitness per generation.
    pub avg_fitness: Vec<f64>,
    /// Population size per generation.
    pub population_size: Vec<usize>,
}

impl EvolutionHistory {
    pub fn record(&mut self, stats: &GenerationStats) {
        self.best_fitness.push(stats.best_fitness);
        self.avg_fitness.push(stats.avg_fitness);
        self.population_size.push(stats.population_size);
    }

    pub fn len(&self) -> usize {
        self.best_fitness.len()
    }

    pub fn is_empty(&self) -> bool {
        self.best_fitness.is_empty()
    }
}

/// Statistics from an evolution run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionStats {
    /// Generations completed by this run.
    pub generations: usize,
    /// Offspring bred by this run.
    pub total_offspring: u64,
    /// Best fitness in the final population.
    pub best_fitness: usize,
    /// Size of the final population.
    pub final_population: usize,
    /// Time taken (in seconds).
    pub elapsed_seconds: f64,
    /// Reason for stopping.
    pub stop_reason: StopReason,
}

/// Reason evolution stopped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum StopReason {
    /// Ran the requested number of generations.
    MaxGenerations,
    /// Cancelled at a generation boundary.
    Cancelled,
}

/// A ranked recipe for export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeSnapshot {
    /// Rank, 1 being the fittest.
    pub rank: usize,
    pub id: u64,
    pub name: String,
    pub fitness: usize,
    /// Canonical ingredient lines.
    pub ingredients: Vec<String>,
}

impl RecipeSnapshot {
    pub fn new(rank: usize, recipe: &Recipe) -> Self {
        Self {
            rank,
            id: recipe.id(),
            name: recipe.name(),
            fitness: recipe.fitness(),
            ingredients: recipe.ingredient_lines(),
        }
    }
}

/// Everything written to `summary.json` at the end of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Size of the inspiring set.
    pub inspiring_set_size: usize,
    pub stats: EvolutionStats,
    pub history: EvolutionHistory,
    /// Fittest recipes, best first.
    pub ranked: Vec<RecipeSnapshot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_stats() {
        let recipes = vec![
            Recipe::from_lines(0, ["1 oz Gin"]).unwrap(),
            Recipe::from_lines(1, ["1 oz Gin", "1 oz Tonic", "1 oz Lime"]).unwrap(),
        ];
        let stats = GenerationStats::from_population(1, 2, &recipes);
        assert_eq!(stats.best_fitness, 3);
        assert_eq!(stats.worst_fitness, 1);
        assert_eq!(stats.population_size, 2);
        assert!((stats.avg_fitness - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_population_stats() {
        let stats = GenerationStats::from_population(3, 0, &[]);
        assert_eq!(stats.best_fitness, 0);
        assert_eq!(stats.avg_fitness, 0.0);
    }

    #[test]
    fn test_history_record() {
        let mut history = EvolutionHistory::default();
        let recipes = vec![Recipe::from_lines(0, ["1 oz Gin"]).unwrap()];
        history.record(&GenerationStats::from_population(1, 1, &recipes));
        assert_eq!(history.len(), 1);
        assert_eq!(history.population_size, vec![1]);
    }

    #[test]
    fn test_snapshot_serialization() {
        let recipe = Recipe::from_lines(4, ["2 oz Gin", "1 oz Tonic"]).unwrap();
        let snapshot = RecipeSnapshot::new(1, &recipe);
        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: RecipeSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.name, "recipe_4");
        assert_eq!(parsed.ingredients, vec!["2.00 oz Gin", "1.00 oz Tonic"]);
    }
}
