//! Seed corpus loading and ranked recipe output.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::schema::{ParseError, Recipe, RecipeSnapshot, RunSummary};

/// File name of the JSON run summary.
pub const SUMMARY_FILE: &str = "summary.json";

/// Load every regular file in `dir` as one recipe.
///
/// Files are read in name order and numbered from zero, so the recipe built
/// from the first file is `recipe_0`.
pub fn load_corpus<P: AsRef<Path>>(dir: P) -> Result<Vec<Recipe>, ArchiveError> {
    let dir = dir.as_ref();
    let io_err = |source: io::Error| ArchiveError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() {
            paths.push(path);
        } else {
            log::warn!("Skipping non-file entry {}", path.display());
        }
    }
    paths.sort();

    let mut recipes = Vec::with_capacity(paths.len());
    for (id, path) in paths.into_iter().enumerate() {
        let content = fs::read_to_string(&path).map_err(|source| ArchiveError::Io {
            path: path.clone(),
            source,
        })?;
        let recipe = Recipe::from_lines(id as u64, content.lines())
            .map_err(|source| ArchiveError::Parse { path, source })?;
        recipes.push(recipe);
    }

    if recipes.is_empty() {
        return Err(ArchiveError::EmptyCorpus(dir.to_path_buf()));
    }

    log::info!("Loaded {} recipes from {}", recipes.len(), dir.display());
    Ok(recipes)
}

/// Writer for a run's ranked recipes and summary.
#[derive(Debug, Clone)]
pub struct RecipeArchive {
    output_dir: PathBuf,
}

impl RecipeArchive {
    /// Use `dir` for output, creating it if needed.
    pub fn with_output_dir<P: AsRef<Path>>(dir: P) -> Result<Self, ArchiveError> {
        let path = dir.as_ref().to_path_buf();
        fs::create_dir_all(&path).map_err(|source| ArchiveError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(Self { output_dir: path })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write one file per recipe, `rank_1` for the first.
    ///
    /// `ranked` must be ordered best first.
    pub fn write_ranked(&self, ranked: &[&Recipe]) -> Result<Vec<PathBuf>, ArchiveError> {
        let mut paths = Vec::with_capacity(ranked.len());
        for (i, recipe) in ranked.iter().enumerate() {
            let path = self.output_dir.join(format!("rank_{}", i + 1));
            fs::write(&path, recipe.to_string()).map_err(|source| ArchiveError::Io {
                path: path.clone(),
                source,
            })?;
            paths.push(path);
        }
        Ok(paths)
    }

    /// Write the run summary as pretty JSON.
    pub fn write_summary(&self, summary: &RunSummary) -> Result<PathBuf, ArchiveError> {
        let path = self.output_dir.join(SUMMARY_FILE);
        let json = serde_json::to_string_pretty(summary)?;
        fs::write(&path, json).map_err(|source| ArchiveError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

/// Snapshots of `ranked` (best first), numbered from 1.
pub fn snapshots(ranked: &[&Recipe]) -> Vec<RecipeSnapshot> {
    ranked
        .iter()
        .enumerate()
        .map(|(i, recipe)| RecipeSnapshot::new(i + 1, recipe))
        .collect()
}

/// Errors from reading the corpus or writing results.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
    #[error("No recipes found in {0}")]
    EmptyCorpus(PathBuf),
    #[error("Failed to serialize summary: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{EvolutionHistory, EvolutionStats, StopReason};
    use tempfile::tempdir;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_load_corpus_in_name_order() {
        let dir = tempdir().unwrap();
        write(dir.path(), "b.txt", "1 oz Rum\n2 oz Lime\n");
        write(dir.path(), "a.txt", "2 oz Gin\n1 oz Gin\n4 oz Tonic\n\n");
        fs::create_dir(dir.path().join("nested")).unwrap();

        let recipes = load_corpus(dir.path()).unwrap();
        assert_eq!(recipes.len(), 2);
        assert_eq!(recipes[0].name(), "recipe_0");
        assert!(recipes[0].contains("Gin"));
        assert_eq!(recipes[0].fitness(), 2);
        assert_eq!(recipes[1].name(), "recipe_1");
        assert!(recipes[1].contains("Rum"));
    }

    #[test]
    fn test_load_corpus_parse_error() {
        let dir = tempdir().unwrap();
        write(dir.path(), "bad.txt", "1 oz Gin\nsplash of soda\n");

        let err = load_corpus(dir.path()).unwrap_err();
        match err {
            ArchiveError::Parse { path, .. } => assert!(path.ends_with("bad.txt")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_load_corpus_rejects_overflowing_sum() {
        let dir = tempdir().unwrap();
        write(dir.path(), "a.txt", "1 oz Gin\n");
        write(dir.path(), "b.txt", "1e308 oz Rum\n1e308 oz Rum\n1 oz Lime\n");

        match load_corpus(dir.path()).unwrap_err() {
            ArchiveError::Parse { path, source } => {
                assert!(path.ends_with("b.txt"));
                assert!(matches!(source, ParseError::InvalidAmount(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_load_corpus_empty_dir() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            load_corpus(dir.path()),
            Err(ArchiveError::EmptyCorpus(_))
        ));
    }

    #[test]
    fn test_load_corpus_missing_dir() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            load_corpus(dir.path().join("missing")),
            Err(ArchiveError::Io { .. })
        ));
    }

    #[test]
    fn test_write_ranked() {
        let dir = tempdir().unwrap();
        let archive = RecipeArchive::with_output_dir(dir.path().join("out")).unwrap();
        let best = Recipe::from_lines(3, ["50 oz Gin", "25 oz Tonic", "25 oz Lime"]).unwrap();
        let second = Recipe::from_lines(8, ["60 oz Rum", "40 oz Mint"]).unwrap();

        let paths = archive.write_ranked(&[&best, &second]).unwrap();
        assert_eq!(paths.len(), 2);
        assert!(paths[0].ends_with("rank_1"));

        let content = fs::read_to_string(&paths[0]).unwrap();
        assert_eq!(
            content,
            "recipe_3 (3 ingredients)\n50.00 oz Gin\n25.00 oz Tonic\n25.00 oz Lime\n"
        );
        let content = fs::read_to_string(&paths[1]).unwrap();
        assert!(content.starts_with("recipe_8 (2 ingredients)\n"));
    }

    #[test]
    fn test_write_summary() {
        let dir = tempdir().unwrap();
        let archive = RecipeArchive::with_output_dir(dir.path()).unwrap();
        let recipe = Recipe::from_lines(0, ["1 oz Gin"]).unwrap();
        let summary = RunSummary {
            inspiring_set_size: 1,
            stats: EvolutionStats {
                generations: 0,
                total_offspring: 0,
                best_fitness: 1,
                final_population: 1,
                elapsed_seconds: 0.0,
                stop_reason: StopReason::MaxGenerations,
            },
            history: EvolutionHistory::default(),
            ranked: snapshots(&[&recipe]),
        };

        let path = archive.write_summary(&summary).unwrap();
        let parsed: RunSummary = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(parsed.ranked.len(), 1);
        assert_eq!(parsed.ranked[0].rank, 1);
        assert_eq!(parsed.ranked[0].name, "recipe_0");
    }
}
