//! Recipe Evolution CLI - Evolve a recipe corpus for N generations.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process;

use recipe_evolution::{
    evolution::{Population, RecipeArchive, load_corpus, snapshots},
    schema::{EvolutionConfig, RunSummary},
};

/// Optional configuration file read from the working directory.
const CONFIG_FILE: &str = "evolution.json";

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 2 {
        eprintln!("Usage: {} [generations]", args[0]);
        eprintln!();
        eprintln!("Evolve the recipes in the input directory and write the fittest.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  generations  Number of generations to run");
        eprintln!("               (falls back to \"generations\" in the config, then a prompt)");
        eprintln!();
        eprintln!("Settings are read from {} when present.", CONFIG_FILE);
        process::exit(1);
    }

    // Load configuration
    let mut config = if Path::new(CONFIG_FILE).exists() {
        EvolutionConfig::load(Path::new(CONFIG_FILE)).unwrap_or_else(|e| {
            log::error!("Failed to load configuration: {}", e);
            process::exit(1);
        })
    } else {
        EvolutionConfig::default()
    };
    if let Err(e) = config.validate() {
        log::error!("Invalid configuration: {}", e);
        process::exit(1);
    }

    let arg = args.get(1).map(String::as_str);
    let generations = resolve_generations(arg, config.generations, prompt_generations)
        .unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            process::exit(1);
        });
    config.generations = Some(generations);

    println!("Reading Initial Recipe Files");
    let recipes = load_corpus(&config.input_dir).unwrap_or_else(|e| {
        log::error!("Failed to load recipes: {}", e);
        process::exit(1);
    });

    let top_k = config.top_k;
    let output_dir = config.output_dir.clone();
    let mut population = Population::new(recipes, config).unwrap_or_else(|e| {
        log::error!("Failed to build population: {}", e);
        process::exit(1);
    });
    println!(
        "There are {} possible ingredients in the inspiring set",
        population.inspiring_set().len()
    );

    let stats = population
        .run_with_callback(generations, |s| {
            println!(
                "Running genetic algorithm for generation {} (population {}, best fitness {})",
                s.generation, s.population_size, s.best_fitness
            );
        })
        .unwrap_or_else(|e| {
            log::error!("Evolution failed: {}", e);
            process::exit(1);
        });

    // Best first
    let ranked: Vec<_> = population.top_k(top_k).into_iter().rev().collect();

    let archive = RecipeArchive::with_output_dir(&output_dir).unwrap_or_else(|e| {
        log::error!("Failed to create output directory: {}", e);
        process::exit(1);
    });
    if let Err(e) = archive.write_ranked(&ranked) {
        log::error!("Failed to write recipes: {}", e);
        process::exit(1);
    }

    let summary = RunSummary {
        inspiring_set_size: population.inspiring_set().len(),
        stats,
        history: population.history().clone(),
        ranked: snapshots(&ranked),
    };
    if let Err(e) = archive.write_summary(&summary) {
        log::error!("Failed to write summary: {}", e);
        process::exit(1);
    }

    println!("All done :)");
}

/// Generation count from the argument, else the config, else `prompt`.
fn resolve_generations<F>(
    arg: Option<&str>,
    configured: Option<usize>,
    prompt: F,
) -> Result<usize, String>
where
    F: FnOnce() -> Result<usize, String>,
{
    match (arg, configured) {
        (Some(arg), _) => parse_generations(arg),
        (None, Some(n)) => Ok(n),
        (None, None) => prompt(),
    }
}

/// Parse a positive generation count.
fn parse_generations(input: &str) -> Result<usize, String> {
    match input.trim().parse::<usize>() {
        Ok(0) => Err("generations must be a positive integer".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("invalid generation count: {:?}", input.trim())),
    }
}

fn prompt_generations() -> Result<usize, String> {
    print!("How many generations would you like to run this algorithm for? ");
    io::stdout().flush().map_err(|e| e.to_string())?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| e.to_string())?;
    parse_generations(&line)
}
