//! Translation from the third-party recipe shape into the internal one.
//! Pure; fetching lives in the client.

use lazy_static::lazy_static;
use regex::Regex;

use crate::recipes::repo::{IngredientEntry, NewRecipe};

use super::client::SourceRecipe;

/// Imported descriptions are capped at this many characters.
pub const MAX_DESCRIPTION_CHARS: usize = 500;

lazy_static! {
    static ref MARKUP_RE: Regex = Regex::new(r"<[^>]+>").unwrap();
}

pub fn convert(source: SourceRecipe) -> NewRecipe {
    let ingredients: Vec<IngredientEntry> = source
        .extended_ingredients
        .into_iter()
        .map(|ing| IngredientEntry {
            name: ing.name,
            quantity: ing.amount.map(|amount| amount.to_string()),
            unit: ing.unit.filter(|unit| !unit.is_empty()),
        })
        .collect();

    // Only the first instruction group; later groups tend to repeat the main
    // steps for sub-recipes.
    let instructions = source
        .analyzed_instructions
        .into_iter()
        .next()
        .map(|group| {
            group
                .steps
                .iter()
                .map(|s| s.step.as_str())
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default();

    let (prep_time, cook_time) = match (source.preparation_minutes, source.cooking_minutes) {
        (None, None) => match source.ready_in_minutes {
            Some(total) => {
                let (prep, cook) = split_total_time(total);
                (Some(prep), Some(cook))
            }
            None => (None, None),
        },
        explicit => explicit,
    };

    let description = source
        .summary
        .as_deref()
        .map(strip_markup)
        .filter(|text| !text.is_empty());

    let source_url = source
        .source_url
        .filter(|url| !url.is_empty())
        .or(source.spoonacular_source_url.filter(|url| !url.is_empty()));

    NewRecipe {
        title: source.title,
        description,
        ingredients,
        instructions,
        prep_time,
        cook_time,
        servings: source.servings,
        source_url,
    }
}

/// When the source only reports a total time, attribute 30% to prep and 70%
/// to cooking.
fn split_total_time(total: i32) -> (i32, i32) {
    (total * 3 / 10, total * 7 / 10)
}

fn strip_markup(summary: &str) -> String {
    let text = MARKUP_RE.replace_all(summary, "");
    if text.chars().count() > MAX_DESCRIPTION_CHARS {
        text.chars().take(MAX_DESCRIPTION_CHARS).collect()
    } else {
        text.into_owned()
    }
}
