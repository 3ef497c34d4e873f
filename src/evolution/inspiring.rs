//! The inspiring set: every ingredient name known to the initial corpus.

use std::collections::BTreeSet;

use crate::schema::Recipe;

/// Fixed universe of ingredient names used by add and swap mutations.
///
/// Built once from the seed corpus and never extended; names created later
/// by crossover are not fed back. Names are kept sorted so sampling by index
/// is reproducible under a fixed seed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InspiringSet {
    names: BTreeSet<String>,
}

impl InspiringSet {
    /// Union of all ingredient names across `recipes`.
    pub fn from_recipes(recipes: &[Recipe]) -> Self {
        let names = recipes
            .iter()
            .flat_map(|r| r.ingredients().iter().map(|i| i.name().to_string()))
            .collect();
        Self { names }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Names not already used by `recipe`.
    pub fn missing_from<'a>(&'a self, recipe: &Recipe) -> Vec<&'a str> {
        self.iter().filter(|name| !recipe.contains(name)).collect()
    }
}

impl<S: Into<String>> FromIterator<S> for InspiringSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}
