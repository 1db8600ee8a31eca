use std::cmp::Ordering;
use std::collections::HashSet;

use crate::models::{normalize_ingredient, MatchQuery, Recipe, RecipeMatch};
use crate::services::catalog::CatalogProvider;

/// Ranks catalog recipes against a set of ingredients on hand
///
/// Stateless apart from the borrowed recipe slice, so one matcher can serve any
/// number of concurrent callers.
pub struct Matcher<'a> {
    recipes: &'a [Recipe],
}

impl<'a> Matcher<'a> {
    /// Creates a matcher over the provider's recipes
    pub fn new(provider: &'a dyn CatalogProvider) -> Self {
        Self {
            recipes: provider.all_recipes(),
        }
    }

    /// Creates a matcher over an arbitrary recipe slice
    pub fn from_recipes(recipes: &'a [Recipe]) -> Self {
        Self { recipes }
    }

    /// Filters, scores and ranks every recipe for `query`
    ///
    /// Recipes are filtered first (difficulty, cooking time, dietary tags) and
    /// only the survivors are scored. An empty ingredient list browses every
    /// surviving recipe with a score of 0. Results are ordered by score
    /// descending, then cooking time ascending, then title, and truncated to
    /// `limit` when one is given.
    pub fn find_matches(&self, query: &MatchQuery, limit: Option<usize>) -> Vec<RecipeMatch<'a>> {
        let on_hand: HashSet<String> = query
            .ingredients
            .iter()
            .map(|name| normalize_ingredient(name))
            .filter(|name| !name.is_empty())
            .collect();

        let mut matches: Vec<RecipeMatch<'a>> = self
            .recipes
            .iter()
            .filter(|recipe| passes_filters(recipe, query))
            .map(|recipe| score_recipe(recipe, &on_hand, query))
            .collect();

        let survivors = matches.len();
        matches.sort_by(compare_matches);

        if let Some(limit) = limit {
            matches.truncate(limit);
        }

        tracing::debug!(
            candidates = self.recipes.len(),
            survivors,
            returned = matches.len(),
            ingredients = on_hand.len(),
            "Recipe matching completed"
        );

        matches
    }
}

/// Convenience wrapper around [`Matcher::find_matches`]
pub fn match_recipes<'a>(
    provider: &'a dyn CatalogProvider,
    query: &MatchQuery,
    limit: Option<usize>,
) -> Vec<RecipeMatch<'a>> {
    Matcher::new(provider).find_matches(query, limit)
}

fn passes_filters(recipe: &Recipe, query: &MatchQuery) -> bool {
    if let Some(difficulty) = query.difficulty {
        if recipe.difficulty != difficulty {
            return false;
        }
    }

    if i64::from(recipe.cooking_time_minutes) > query.max_time {
        return false;
    }

    recipe.satisfies_dietary(&query.dietary_filters)
}

fn score_recipe<'a>(recipe: &'a Recipe, on_hand: &HashSet<String>, query: &MatchQuery) -> RecipeMatch<'a> {
    let overlap_ingredients = overlap_ingredients(recipe, on_hand);
    let score = coverage_score(overlap_ingredients.len(), recipe.ingredients.len());
    let reasons = build_reasons(recipe, overlap_ingredients.len(), query);

    RecipeMatch {
        recipe,
        score,
        overlap_ingredients,
        reasons,
    }
}

/// Recipe ingredients present in `on_hand`, in recipe order
///
/// A name that normalizes to one already listed is skipped, so the count
/// never exceeds the number of distinct recipe ingredients.
fn overlap_ingredients<'a>(recipe: &'a Recipe, on_hand: &HashSet<String>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    recipe
        .ingredients
        .iter()
        .filter(|name| {
            let normalized = normalize_ingredient(name);
            on_hand.contains(&normalized) && seen.insert(normalized)
        })
        .map(String::as_str)
        .collect()
}

/// Integer percentage of `total` covered by `overlap`, rounded half up
pub fn coverage_score(overlap: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let percent = (overlap * 200 + total) / (2 * total);
    percent.min(100) as u8
}

fn build_reasons(recipe: &Recipe, overlap: usize, query: &MatchQuery) -> Vec<String> {
    let mut reasons = Vec::new();

    if overlap > 0 {
        reasons.push(format!(
            "{} of {} ingredients on hand",
            overlap,
            recipe.ingredients.len()
        ));
    }

    reasons.push(format!("Ready in {} minutes", recipe.cooking_time_minutes));

    for tag in recipe
        .dietary
        .iter()
        .filter(|tag| query.dietary_filters.contains(tag))
    {
        reasons.push(format!("Matches {} preference", tag));
    }

    reasons
}

fn compare_matches(a: &RecipeMatch<'_>, b: &RecipeMatch<'_>) -> Ordering {
    b.score
        .cmp(&a.score)
        .then_with(|| a.recipe.cooking_time_minutes.cmp(&b.recipe.cooking_time_minutes))
        .then_with(|| a.recipe.title.cmp(&b.recipe.title))
        .then_with(|| a.recipe.id.cmp(&b.recipe.id))
}
