//! Recipe Evolution - Genetic algorithm over ingredient formulations.
//!
//! This crate evolves a population of recipes (lists of ingredient amounts)
//! by fitness-proportionate selection, single-point crossover and four
//! mutation operators. Fitness is the number of distinct ingredients.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Recipe data model, configuration and run result types
//! - `evolution`: Mutation, selection, the generation loop and corpus I/O
//!
//! # Example
//!
//! ```rust
//! use recipe_evolution::{
//!     schema::{EvolutionConfig, Recipe},
//!     evolution::Population,
//! };
//!
//! let recipes = vec![
//!     Recipe::from_lines(0, ["2 oz Gin", "1 oz Tonic", "0.5 oz Lime"]).unwrap(),
//!     Recipe::from_lines(1, ["2 oz Rum", "1 oz Lime", "1 oz Mint", "0.5 oz Sugar"]).unwrap(),
//! ];
//! let config = EvolutionConfig {
//!     random_seed: Some(42),
//!     ..Default::default()
//! };
//!
//! let mut population = Population::new(recipes, config).unwrap();
//! population.run(3).unwrap();
//!
//! let best = population.top_k(1)[0];
//! println!("Fittest: {} with {} ingredients", best.name(), best.fitness());
//! ```

pub mod evolution;
pub mod schema;

// Re-export commonly used types
pub use evolution::{EvolutionError, Population};
pub use schema::{EvolutionConfig, Ingredient, Recipe};
