// ABOUTME: In-memory recipe catalog that cooking sessions are started from
// ABOUTME: Concurrent create/get/list with optional demo seeding at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use autofood_core::errors::{AppError, AppResult};
use autofood_core::models::{Instruction, Recipe};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Recipes are immutable once created, so the catalog hands out `Arc`s
#[derive(Debug, Default)]
pub struct RecipeCatalog {
    recipes: DashMap<Uuid, Arc<Recipe>>,
}

impl RecipeCatalog {
    /// Create an empty catalog
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and store a new recipe
    ///
    /// # Errors
    /// Returns a validation error from [`Recipe::new`].
    pub fn create(
        &self,
        name: &str,
        servings: u32,
        instructions: Vec<Instruction>,
    ) -> AppResult<Arc<Recipe>> {
        let recipe = Arc::new(Recipe::new(name.trim(), servings, instructions)?);
        self.recipes.insert(recipe.id, Arc::clone(&recipe));
        info!(recipe_id = %recipe.id, name = %recipe.name, steps = recipe.instructions.len(), "Recipe created");
        Ok(recipe)
    }

    /// Look up a recipe
    ///
    /// # Errors
    /// Returns `ResourceNotFound` for unknown ids.
    pub fn get(&self, id: Uuid) -> AppResult<Arc<Recipe>> {
        self.recipes
            .get(&id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| AppError::not_found(format!("Recipe {id}")).with_resource_id(id.to_string()))
    }

    /// All recipes, oldest first
    #[must_use]
    pub fn list(&self) -> Vec<Arc<Recipe>> {
        let mut recipes: Vec<_> = self
            .recipes
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        recipes.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.name.cmp(&b.name)));
        recipes
    }

    /// Number of recipes
    #[must_use]
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// Whether the catalog is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Add a couple of recipes so a fresh server has something to cook
    ///
    /// # Errors
    /// Only fails if the built-in recipes stop passing validation.
    pub fn seed_demo_recipes(&self) -> AppResult<usize> {
        self.create(
            "Garden Salad",
            2,
            vec![
                Instruction::timed("Wash and dry the lettuce", 3.0),
                Instruction::timed("Slice tomatoes and cucumber", 5.0),
                Instruction::timed("Toss with dressing", 1.0),
            ],
        )?;
        self.create(
            "Roast Chicken",
            4,
            vec![
                Instruction::timed("Preheat oven to 200C", 10.0),
                Instruction::timed("Season the chicken", 5.0),
                Instruction::timed("Roast until the core reaches 74C", 75.0),
                Instruction {
                    step: "Rest before carving".to_owned(),
                    timing_minutes: None,
                },
            ],
        )?;
        info!("Seeded {} demo recipes", self.len());
        Ok(self.len())
    }
}
