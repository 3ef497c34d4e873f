//! Mutation operators on recipes.
//!
//! All operators pick ingredients by position and are silent no-ops when
//! there is nothing to act on (empty recipe, exhausted candidate names).

use rand::Rng;
use rand::seq::SliceRandom;

use crate::schema::{Ingredient, MutationConfig, Recipe};

use super::InspiringSet;

/// The four mutation operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    /// Rescale one ingredient's amount.
    ChangeAmount,
    /// Append an ingredient from the inspiring set.
    AddIngredient,
    /// Remove one ingredient.
    DeleteIngredient,
    /// Rename one ingredient to another inspiring name.
    SwapIngredient,
}

impl MutationKind {
    pub const ALL: [MutationKind; 4] = [
        MutationKind::ChangeAmount,
        MutationKind::AddIngredient,
        MutationKind::DeleteIngredient,
        MutationKind::SwapIngredient,
    ];
}

impl Recipe {
    /// Multiply a random ingredient's amount by a factor drawn uniformly from
    /// `factor_bounds`. Results are clamped at zero.
    ///
    /// Returns the index of the changed ingredient.
    pub fn change_amount<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        factor_bounds: (f64, f64),
    ) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        let idx = rng.gen_range(0..self.len());
        let factor = rng.gen_range(factor_bounds.0..=factor_bounds.1);
        let ingredient = &mut self.ingredients_mut()[idx];
        ingredient.set_amount((ingredient.amount() * factor).max(0.0));
        Some(idx)
    }

    /// Append an inspiring ingredient the recipe does not yet contain, with
    /// an amount drawn uniformly from `[amount_bounds.0, amount_bounds.1)`.
    ///
    /// Returns the index of the new ingredient.
    pub fn add_ingredient<R: Rng + ?Sized>(
        &mut self,
        inspiring: &InspiringSet,
        rng: &mut R,
        amount_bounds: (f64, f64),
    ) -> Option<usize> {
        let candidates = inspiring.missing_from(self);
        let name = (*candidates.choose(rng)?).to_string();
        let amount = if amount_bounds.0 < amount_bounds.1 {
            rng.gen_range(amount_bounds.0..amount_bounds.1)
        } else {
            amount_bounds.0
        };
        self.ingredients_mut().push(Ingredient::new(name, amount));
        Some(self.len() - 1)
    }

    /// Remove a random ingredient.
    pub fn delete_ingredient<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Ingredient> {
        if self.is_empty() {
            return None;
        }
        let idx = rng.gen_range(0..self.len());
        Some(self.ingredients_mut().remove(idx))
    }

    /// Rename a random ingredient to another inspiring name, keeping its
    /// amount.
    ///
    /// Every name already in the recipe is excluded, not only the one being
    /// replaced, so no duplicate can appear. This makes the swap a no-op
    /// whenever the recipe already holds every inspiring name, even if other
    /// names exist that differ from the chosen ingredient.
    ///
    /// Returns the index of the renamed ingredient.
    pub fn swap_ingredient<R: Rng + ?Sized>(
        &mut self,
        inspiring: &InspiringSet,
        rng: &mut R,
    ) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        let idx = rng.gen_range(0..self.len());
        let candidates = inspiring.missing_from(self);
        let name = (*candidates.choose(rng)?).to_string();
        self.ingredients_mut()[idx].set_name(name);
        Some(idx)
    }

    /// Apply one uniformly chosen operator with probability
    /// `config.probability`, then normalize.
    ///
    /// Returns the operator applied, or `None` if the recipe was left alone.
    pub fn mutate<R: Rng + ?Sized>(
        &mut self,
        inspiring: &InspiringSet,
        config: &MutationConfig,
        rng: &mut R,
    ) -> Option<MutationKind> {
        if !rng.gen_bool(config.probability) {
            return None;
        }

        let kind = MutationKind::ALL[rng.gen_range(0..MutationKind::ALL.len())];
        match kind {
            MutationKind::ChangeAmount => {
                self.change_amount(rng, config.amount_factor_bounds);
            }
            MutationKind::AddIngredient => {
                self.add_ingredient(inspiring, rng, config.new_amount_bounds);
            }
            MutationKind::DeleteIngredient => {
                self.delete_ingredient(rng);
            }
            MutationKind::SwapIngredient => {
                self.swap_ingredient(inspiring, rng);
            }
        }
        log::trace!("{}: applied {:?}", self.name(), kind);

        self.normalize_with(&config.normalization);
        Some(kind)
    }
}
