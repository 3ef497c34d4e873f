//! Recipe and ingredient types.
//!
//! A recipe is an ordered list of named quantities measured in fluid ounces.
//! The canonical text form of an ingredient (`"<amount> oz <name>"`) doubles
//! as the line format of the seed corpus and of the ranked result files.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::NormalizationConfig;

/// Separator between amount and name in the text form.
pub const AMOUNT_SEPARATOR: &str = " oz ";

/// Totals within this distance of the target are treated as normalized.
pub const NORMALIZE_TOLERANCE: f64 = 1e-9;

/// A named quantity in fluid ounces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    name: String,
    amount: f64,
}

impl Ingredient {
    pub fn new(name: impl Into<String>, amount: f64) -> Self {
        Self {
            name: name.into(),
            amount,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Amount in fluid ounces.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn set_amount(&mut self, amount: f64) {
        self.amount = amount;
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}{}{}", self.amount, AMOUNT_SEPARATOR, self.name)
    }
}

impl FromStr for Ingredient {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (amount, name) = line
            .split_once(AMOUNT_SEPARATOR)
            .ok_or_else(|| ParseError::MissingSeparator(line.to_string()))?;

        let amount: f64 = amount
            .trim()
            .parse()
            .map_err(|_| ParseError::InvalidAmount(amount.trim().to_string()))?;
        if !amount.is_finite() {
            return Err(ParseError::InvalidAmount(amount.to_string()));
        }
        if amount < 0.0 {
            return Err(ParseError::NegativeAmount(amount));
        }

        let name = name.trim();
        if name.is_empty() {
            return Err(ParseError::EmptyName(line.to_string()));
        }

        Ok(Self::new(name, amount))
    }
}

/// An evolvable formulation: an ordered list of uniquely named ingredients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    id: u64,
    ingredients: Vec<Ingredient>,
}

impl Recipe {
    /// Create a recipe from already-built ingredients.
    ///
    /// Ingredients sharing a name are merged by summing their amounts.
    pub fn new(id: u64, ingredients: Vec<Ingredient>) -> Self {
        Self {
            id,
            ingredients: merge_duplicates(ingredients),
        }
    }

    /// Parse a recipe from text lines of the form `"<amount> oz <name>"`.
    ///
    /// Blank lines are ignored. Repeated names are summed into a single
    /// ingredient that keeps the position of the first occurrence. A merged
    /// amount or recipe total that overflows to infinity is rejected.
    pub fn from_lines<I, S>(id: u64, lines: I) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut parsed = Vec::new();
        for (idx, line) in lines.into_iter().enumerate() {
            let line = line.as_ref();
            if line.trim().is_empty() {
                continue;
            }
            let ingredient = line.parse::<Ingredient>().map_err(|e| ParseError::AtLine {
                line: idx + 1,
                source: Box::new(e),
            })?;
            parsed.push(ingredient);
        }

        let recipe = Self::new(id, parsed);
        if let Some(i) = recipe.ingredients.iter().find(|i| !i.amount.is_finite()) {
            let detail = format!("{} (sum for {})", i.amount, i.name);
            return Err(ParseError::InvalidAmount(detail));
        }
        let total = recipe.total_amount();
        if !total.is_finite() {
            return Err(ParseError::InvalidAmount(format!("{} (recipe total)", total)));
        }
        Ok(recipe)
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Display name, `recipe_<id>`.
    pub fn name(&self) -> String {
        format!("recipe_{}", self.id)
    }

    pub fn ingredients(&self) -> &[Ingredient] {
        &self.ingredients
    }

    pub(crate) fn ingredients_mut(&mut self) -> &mut Vec<Ingredient> {
        &mut self.ingredients
    }

    pub fn len(&self) -> usize {
        self.ingredients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ingredients.is_empty()
    }

    /// Fitness proxy: the number of distinct ingredients.
    pub fn fitness(&self) -> usize {
        self.ingredients.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.ingredients.iter().any(|i| i.name == name)
    }

    pub fn total_amount(&self) -> f64 {
        self.ingredients.iter().map(|i| i.amount).sum()
    }

    /// Canonical text lines, one per ingredient.
    pub fn ingredient_lines(&self) -> Vec<String> {
        self.ingredients.iter().map(ToString::to_string).collect()
    }

    /// Rescale amounts to sum to 100 oz, pruning anything under 0.01 oz.
    pub fn normalize(&mut self) {
        self.normalize_with(&NormalizationConfig::default());
    }

    /// Rescale amounts to `config.target_total`.
    ///
    /// A recipe already at the target, or with a zero or non-finite total, is
    /// left as is.
    /// Ingredients that fall below `config.min_amount` after scaling are
    /// dropped and the survivors are rescaled once more, so the result always
    /// sums to the target and a second call is a no-op.
    pub fn normalize_with(&mut self, config: &NormalizationConfig) {
        let total = self.total_amount();
        if total == 0.0
            || !total.is_finite()
            || (total - config.target_total).abs() <= NORMALIZE_TOLERANCE
        {
            return;
        }

        let factor = config.target_total / total;
        let before = self.ingredients.len();
        self.ingredients = std::mem::take(&mut self.ingredients)
            .into_iter()
            .map(|mut i| {
                i.amount *= factor;
                i
            })
            .filter(|i| i.amount >= config.min_amount)
            .collect();

        if self.ingredients.len() < before {
            let survivors = self.total_amount();
            if survivors > 0.0 {
                let factor = config.target_total / survivors;
                for ingredient in &mut self.ingredients {
                    ingredient.amount *= factor;
                }
            }
        }
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({} ingredients)", self.name(), self.fitness())?;
        for ingredient in &self.ingredients {
            writeln!(f, "{}", ingredient)?;
        }
        Ok(())
    }
}

/// Sum amounts of same-named ingredients, keeping first-appearance order.
fn merge_duplicates(ingredients: Vec<Ingredient>) -> Vec<Ingredient> {
    let mut merged: Vec<Ingredient> = Vec::with_capacity(ingredients.len());
    let mut positions: HashMap<String, usize> = HashMap::new();

    for ingredient in ingredients {
        match positions.get(&ingredient.name) {
            Some(&pos) => merged[pos].amount += ingredient.amount,
            None => {
                positions.insert(ingredient.name.clone(), merged.len());
                merged.push(ingredient);
            }
        }
    }

    merged
}

/// Errors from parsing ingredient lines.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Missing ' oz ' separator in line: {0:?}")]
    MissingSeparator(String),
    #[error("Amount is not a finite number: {0:?}")]
    InvalidAmount(String),
    #[error("Amount must be non-negative, got {0}")]
    NegativeAmount(f64),
    #[error("Ingredient name is empty in line: {0:?}")]
    EmptyName(String),
    #[error("Line {line}: {source}")]
    AtLine {
        line: usize,
        #[source]
        source: Box<ParseError>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_parse_ingredient() {
        let ing: Ingredient = "1.5 oz Lime Juice".parse().unwrap();
        assert_eq!(ing.name(), "Lime Juice");
        assert!((ing.amount() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_parse_trims_line_endings() {
        let ing: Ingredient = "2 oz Gin\n".parse().unwrap();
        assert_eq!(ing.name(), "Gin");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "2 Gin".parse::<Ingredient>(),
            Err(ParseError::MissingSeparator(_))
        ));
        assert!(matches!(
            "two oz Gin".parse::<Ingredient>(),
            Err(ParseError::InvalidAmount(_))
        ));
        assert!(matches!(
            "NaN oz Gin".parse::<Ingredient>(),
            Err(ParseError::InvalidAmount(_))
        ));
        assert!(matches!(
            "-1 oz Gin".parse::<Ingredient>(),
            Err(ParseError::NegativeAmount(_))
        ));
        assert!(matches!(
            "1 oz  ".parse::<Ingredient>(),
            Err(ParseError::EmptyName(_)) | Err(ParseError::MissingSeparator(_))
        ));
    }

    #[test]
    fn test_display_two_decimals() {
        let ing = Ingredient::new("Vermouth", 33.333333);
        assert_eq!(ing.to_string(), "33.33 oz Vermouth");
        assert_eq!(Ingredient::new("Gin", 3.0).to_string(), "3.00 oz Gin");
    }

    #[test]
    fn test_duplicate_lines_are_summed() {
        let recipe = Recipe::from_lines(0, ["1 oz Gin", "2 oz Gin"]).unwrap();
        assert_eq!(recipe.fitness(), 1);
        assert_eq!(recipe.ingredients()[0].name(), "Gin");
        assert!((recipe.ingredients()[0].amount() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_overflowing_duplicate_sum_rejected() {
        let err = Recipe::from_lines(0, ["1e308 oz A", "1e308 oz A", "1 oz B"]).unwrap_err();
        assert!(matches!(err, ParseError::InvalidAmount(_)));
    }

    #[test]
    fn test_overflowing_total_rejected() {
        let err = Recipe::from_lines(0, ["1e308 oz A", "1e308 oz B"]).unwrap_err();
        assert!(matches!(err, ParseError::InvalidAmount(_)));
    }

    #[test]
    fn test_normalize_leaves_infinite_total() {
        let mut recipe = Recipe::new(
            0,
            vec![Ingredient::new("A", f64::INFINITY), Ingredient::new("B", 1.0)],
        );
        recipe.normalize();
        assert_eq!(recipe.fitness(), 2);
    }

    #[test]
    fn test_merge_keeps_first_position() {
        let recipe =
            Recipe::from_lines(0, ["1 oz Gin", "1 oz Tonic", "", "4 oz Gin", "1 oz Lime"]).unwrap();
        let names: Vec<_> = recipe.ingredients().iter().map(|i| i.name()).collect();
        assert_eq!(names, ["Gin", "Tonic", "Lime"]);
        assert!((recipe.ingredients()[0].amount() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_parse_error_reports_line() {
        let err = Recipe::from_lines(0, ["1 oz Gin", "oops"]).unwrap_err();
        match err {
            ParseError::AtLine { line, source } => {
                assert_eq!(line, 2);
                assert!(matches!(*source, ParseError::MissingSeparator(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_name_and_display() {
        let recipe = Recipe::from_lines(7, ["1 oz Gin", "3 oz Tonic"]).unwrap();
        assert_eq!(recipe.name(), "recipe_7");
        assert_eq!(
            recipe.to_string(),
            "recipe_7 (2 ingredients)\n1.00 oz Gin\n3.00 oz Tonic\n"
        );
    }

    #[test]
    fn test_normalize_scales_to_hundred() {
        let mut recipe = Recipe::from_lines(0, ["1 oz Gin", "3 oz Tonic"]).unwrap();
        recipe.normalize();
        assert!((recipe.total_amount() - 100.0).abs() < 1e-9);
        assert!((recipe.ingredients()[0].amount() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_zero_total_is_noop() {
        let mut recipe = Recipe::new(0, vec![Ingredient::new("Ice", 0.0)]);
        let before = recipe.clone();
        recipe.normalize();
        assert_eq!(recipe, before);

        let mut empty = Recipe::new(1, Vec::new());
        empty.normalize();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_normalize_prunes_trace_amounts() {
        let mut recipe = Recipe::new(
            0,
            vec![
                Ingredient::new("Gin", 1000.0),
                Ingredient::new("Bitters", 0.0001),
            ],
        );
        recipe.normalize();
        assert_eq!(recipe.fitness(), 1);
        assert!(!recipe.contains("Bitters"));
        assert!((recipe.total_amount() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_custom_target() {
        let config = NormalizationConfig {
            target_total: 10.0,
            min_amount: 0.5,
        };
        let mut recipe = Recipe::from_lines(0, ["1 oz Gin", "1 oz Tonic", "0.04 oz Salt"]).unwrap();
        recipe.normalize_with(&config);
        assert_eq!(recipe.fitness(), 2);
        assert!((recipe.total_amount() - 10.0).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn prop_normalize_sums_to_hundred(amounts in prop::collection::vec(0.001f64..500.0, 1..20)) {
            let ingredients = amounts
                .iter()
                .enumerate()
                .map(|(i, &a)| Ingredient::new(format!("ing{i}"), a))
                .collect();
            let mut recipe = Recipe::new(0, ingredients);
            recipe.normalize();
            prop_assert!((recipe.total_amount() - 100.0).abs() < 1e-6);
            prop_assert!(recipe.ingredients().iter().all(|i| i.amount() >= 0.01));
        }

        #[test]
        fn prop_normalize_is_idempotent(amounts in prop::collection::vec(0.0f64..500.0, 0..20)) {
            let ingredients = amounts
                .iter()
                .enumerate()
                .map(|(i, &a)| Ingredient::new(format!("ing{i}"), a))
                .collect();
            let mut recipe = Recipe::new(0, ingredients);
            recipe.normalize();
            let once = recipe.clone();
            recipe.normalize();
            prop_assert_eq!(once, recipe);
        }
    }
}
