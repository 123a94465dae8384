//! Ingredient matching and ranking for the ingredient-search endpoint.
//!
//! Everything here is a pure function over an already-fetched candidate set;
//! scoping (own recipes + default recipes) is the caller's job. The scan is
//! O(recipes x recipe_ingredients x query_terms) with no pre-computation,
//! which holds up fine for per-user collection sizes.

use crate::error::AppError;

use super::repo::Recipe;

/// Lowercase and trim the raw query names, dropping entries that are empty
/// afterwards. Fails when nothing usable remains.
pub fn normalize_query(raw: &[String]) -> Result<Vec<String>, AppError> {
    let normalized: Vec<String> = raw
        .iter()
        .map(|name| name.trim().to_lowercase())
        .filter(|name| !name.is_empty())
        .collect();
    if normalized.is_empty() {
        return Err(AppError::InvalidInput(
            "At least one ingredient is required".into(),
        ));
    }
    Ok(normalized)
}

/// Bidirectional substring test: "flour" finds "all-purpose flour", and
/// "cake flour" still finds a bare "flour" entry through the reverse branch.
/// Deliberately permissive; see the note in DESIGN.md before tightening.
fn names_match(query: &str, ingredient: &str) -> bool {
    ingredient.contains(query) || query.contains(ingredient)
}

/// Number of distinct query names found in the recipe. Each query name counts
/// once no matter how many recipe entries it hits; scanning stops at the
/// first hit. Entries without a usable name contribute nothing.
pub fn match_count(query: &[String], recipe: &Recipe) -> usize {
    let names: Vec<String> = recipe
        .ingredients
        .iter()
        .map(|entry| entry.name.to_lowercase())
        .filter(|name| !name.is_empty())
        .collect();
    query
        .iter()
        .filter(|q| names.iter().any(|name| names_match(q, name)))
        .count()
}

/// Filter, order and page the candidate set.
///
/// `match_all` keeps only recipes containing every query name; otherwise one
/// hit suffices. Results are ordered by match count, then by most recent
/// creation; remaining ties keep the candidate order (the sort is stable).
pub fn rank(
    candidates: Vec<Recipe>,
    query: &[String],
    match_all: bool,
    limit: i64,
    offset: i64,
) -> Vec<Recipe> {
    let mut scored: Vec<(usize, Recipe)> = candidates
        .into_iter()
        .map(|recipe| (match_count(query, &recipe), recipe))
        .filter(|(count, _)| {
            if match_all {
                *count == query.len()
            } else {
                *count > 0
            }
        })
        .collect();

    scored.sort_by(|a, b| (b.0, b.1.created_at).cmp(&(a.0, a.1.created_at)));

    scored
        .into_iter()
        .map(|(_, recipe)| recipe)
        .skip(offset as usize)
        .take(limit as usize)
        .collect()
}

#[cfg(test)]
mod tests {
    use sqlx::types::Json;
    use time::OffsetDateTime;

    use super::*;
    use crate::recipes::repo::IngredientEntry;

    fn entry(name: &str) -> IngredientEntry {
        IngredientEntry {
            name: name.to_string(),
            quantity: None,
            unit: None,
        }
    }

    fn recipe(id: i64, names: &[&str], created_unix: i64) -> Recipe {
        let created = OffsetDateTime::from_unix_timestamp(created_unix).unwrap();
        Recipe {
            id,
            title: format!("recipe {id}"),
            description: None,
            ingredients: Json(names.iter().map(|n| entry(n)).collect()),
            instructions: String::new(),
            prep_time: None,
            cook_time: None,
            servings: None,
            source_url: None,
            user_id: None,
            created_at: created,
            updated_at: created,
        }
    }

    fn query(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn normalization_lowercases_trims_and_drops_empties() {
        let raw = vec![" Flour ".to_string(), "".to_string()];
        let normalized = normalize_query(&raw).expect("one usable name remains");
        assert_eq!(normalized, vec!["flour".to_string()]);
    }

    #[test]
    fn normalization_is_idempotent() {
        let raw = vec!["flour".to_string(), "brown sugar".to_string()];
        let once = normalize_query(&raw).unwrap();
        let twice = normalize_query(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_and_whitespace_queries_are_rejected() {
        assert!(matches!(
            normalize_query(&[]),
            Err(AppError::InvalidInput(_))
        ));
        let blank = vec![" ".to_string(), "".to_string()];
        assert!(matches!(
            normalize_query(&blank),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn partial_match_counts_each_query_name_once() {
        // Scenario A: "flour" hits "all-purpose flour"; "sugar" hits nothing.
        let r1 = recipe(1, &["all-purpose flour", "butter"], 100);
        let q = query(&["flour", "sugar"]);
        assert_eq!(match_count(&q, &r1), 1);

        let included = rank(vec![r1], &q, false, 20, 0);
        assert_eq!(included.len(), 1);
    }

    #[test]
    fn match_all_requires_every_query_name() {
        // Scenario B.
        let r1 = recipe(1, &["all-purpose flour", "butter"], 100);
        let r2 = recipe(2, &["flour", "sugar", "egg"], 200);
        let q = query(&["flour", "sugar"]);

        assert_eq!(match_count(&q, &r2), 2);
        let included = rank(vec![r1, r2], &q, true, 20, 0);
        assert_eq!(included.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn reverse_containment_also_matches() {
        // A longer query still finds a shorter recipe entry.
        let r = recipe(1, &["flour"], 100);
        let q = query(&["cake flour"]);
        assert_eq!(match_count(&q, &r), 1);

        // Which is also why "oil" finds "broiled beef".
        let r = recipe(2, &["broiled beef"], 100);
        let q = query(&["oil"]);
        assert_eq!(match_count(&q, &r), 1);
    }

    #[test]
    fn duplicate_recipe_entries_do_not_inflate_the_count() {
        let r = recipe(1, &["flour", "flour", "flour"], 100);
        let q = query(&["flour"]);
        assert_eq!(match_count(&q, &r), 1);
    }

    #[test]
    fn unnamed_entries_contribute_nothing() {
        let r = recipe(1, &["", ""], 100);
        let q = query(&["flour"]);
        assert_eq!(match_count(&q, &r), 0);
        assert!(rank(vec![r], &q, false, 20, 0).is_empty());
    }

    #[test]
    fn zero_ingredient_recipes_never_satisfy_match_all() {
        let r = recipe(1, &[], 100);
        let q = query(&["flour"]);
        assert!(rank(vec![r], &q, true, 20, 0).is_empty());
    }

    #[test]
    fn match_count_grows_with_satisfying_entries() {
        let q = query(&["flour", "sugar", "egg"]);
        let mut names: Vec<&str> = vec![];
        let mut last = 0;
        for name in ["flour", "sugar", "egg"] {
            names.push(name);
            let count = match_count(&q, &recipe(1, &names, 100));
            assert!(count >= last);
            last = count;
        }
        assert_eq!(last, 3);
    }

    #[test]
    fn match_all_results_are_a_subset_of_match_any() {
        let candidates = vec![
            recipe(1, &["flour", "sugar"], 100),
            recipe(2, &["flour"], 200),
            recipe(3, &["butter"], 300),
            recipe(4, &["sugar", "flour", "egg"], 400),
        ];
        let q = query(&["flour", "sugar"]);

        let all = rank(candidates.clone(), &q, true, 100, 0);
        let any = rank(candidates, &q, false, 100, 0);
        let any_ids: Vec<i64> = any.iter().map(|r| r.id).collect();
        for r in &all {
            assert!(any_ids.contains(&r.id));
        }
    }

    #[test]
    fn more_matches_rank_first_then_newer_recipes() {
        // Scenario E plus the primary key: id 3 has both names, ids 1 and 2
        // tie on one match and order by creation time.
        let candidates = vec![
            recipe(1, &["flour"], 100),
            recipe(2, &["sugar"], 200),
            recipe(3, &["flour", "sugar"], 50),
        ];
        let q = query(&["flour", "sugar"]);

        let ranked = rank(candidates, &q, false, 20, 0);
        assert_eq!(ranked.iter().map(|r| r.id).collect::<Vec<_>>(), vec![3, 2, 1]);
    }

    #[test]
    fn equal_scores_keep_candidate_order() {
        // Same match count, same timestamp: stable sort keeps input order.
        let candidates = vec![
            recipe(10, &["flour"], 100),
            recipe(11, &["flour"], 100),
            recipe(12, &["flour"], 100),
        ];
        let q = query(&["flour"]);
        let ranked = rank(candidates, &q, false, 20, 0);
        assert_eq!(
            ranked.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![10, 11, 12]
        );
    }

    #[test]
    fn pages_concatenate_to_the_full_result() {
        let candidates: Vec<Recipe> = (0..7)
            .map(|i| recipe(i, &["flour"], 100 + i))
            .collect();
        let q = query(&["flour"]);

        let full = rank(candidates.clone(), &q, false, 100, 0);
        let mut paged = Vec::new();
        let page_size = 3;
        let mut offset = 0;
        loop {
            let page = rank(candidates.clone(), &q, false, page_size, offset);
            if page.is_empty() {
                break;
            }
            offset += page.len() as i64;
            paged.extend(page);
        }

        assert_eq!(
            paged.iter().map(|r| r.id).collect::<Vec<_>>(),
            full.iter().map(|r| r.id).collect::<Vec<_>>()
        );
    }

    #[test]
    fn offset_past_the_end_yields_nothing() {
        let candidates = vec![recipe(1, &["flour"], 100)];
        let q = query(&["flour"]);
        assert!(rank(candidates, &q, false, 20, 5).is_empty());
    }
}
