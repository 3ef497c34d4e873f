//! Genetic algorithm over recipes.
//!
//! # Overview
//!
//! - **Mutation** (`mutation`): change, add, delete and swap operators on
//!   [`Recipe`](crate::schema::Recipe)
//! - **Selection** (`selection`): fitness-proportionate parent sampling and
//!   survivor selection
//! - **Population** (`population`): crossover and the generation loop
//! - **Archive** (`archive`): seed corpus loading and ranked result output
//!
//! # Example
//!
//! ```rust,no_run
//! use recipe_evolution::evolution::{Population, load_corpus};
//! use recipe_evolution::schema::EvolutionConfig;
//!
//! let recipes = load_corpus("input").unwrap();
//! let config = EvolutionConfig {
//!     random_seed: Some(42),
//!     ..Default::default()
//! };
//!
//! let mut population = Population::new(recipes, config).unwrap();
//! population
//!     .run_with_callback(20, |stats| {
//!         println!("Generation {}: best fitness = {}", stats.generation, stats.best_fitness);
//!     })
//!     .unwrap();
//!
//! for recipe in population.top_k(5).iter().rev() {
//!     println!("{}", recipe);
//! }
//! ```

mod archive;
mod inspiring;
mod mutation;
mod population;
mod rng;
mod selection;

pub use archive::{ArchiveError, RecipeArchive, SUMMARY_FILE, load_corpus, snapshots};
pub use inspiring::InspiringSet;
pub use mutation::MutationKind;
pub use population::{Population, crossover_lines};
pub use rng::RecipeRng;
pub use selection::{ParentSelector, fittest, select_survivors};

use crate::schema::{ConfigError, ParseError};

/// Errors raised by the evolution engine.
#[derive(Debug, thiserror::Error)]
pub enum EvolutionError {
    #[error("Population is empty")]
    EmptyPopulation,
    #[error("Cannot select two distinct parents: {0}")]
    DegenerateSelection(String),
    #[error("Offspring could not be parsed: {0}")]
    Parse(#[from] ParseError),
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}
