//! Two-tier name search: names starting with the query come first, then names that merely
//! contain it.

use foodgram::basic_models::Ingredient;
use itertools::Itertools;

/// Anything that can be searched by its display name.
pub trait Named {
    fn name(&self) -> &str;
}

impl Named for Ingredient {
    fn name(&self) -> &str {
        &self.name
    }
}

/// How well a name matched the query. Lower sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rank {
    Prefix = 1,
    Contains = 2,
}

/// Rank a single name against an already-lowercased query.
pub fn rank(name: &str, lowered_query: &str) -> Option<Rank> {
    let name = name.to_lowercase();
    if name.starts_with(lowered_query) {
        Some(Rank::Prefix)
    } else if name.contains(lowered_query) {
        Some(Rank::Contains)
    } else {
        None
    }
}

/// Search `items` for `query`, case-insensitively.
///
/// Prefix matches come before substring matches and each group keeps the order of `items`.
/// An empty (or all-whitespace) query returns every item unchanged.
pub fn ranked_search<'a, T: Named>(items: &'a [T], query: &str) -> Vec<&'a T> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return items.iter().collect();
    }
    items
        .iter()
        .filter_map(|item| rank(item.name(), &query).map(|r| (r, item)))
        // stable sort keeps the collection order within a rank
        .sorted_by_key(|(r, _)| *r)
        .map(|(_, item)| item)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ingredient(id: i64, name: &str) -> Ingredient {
        Ingredient {
            id,
            name: name.into(),
            measurement_unit: "g".into(),
        }
    }

    fn names(results: &[&Ingredient]) -> Vec<String> {
        results.iter().map(|i| i.name.clone()).collect()
    }

    fn pantry() -> Vec<Ingredient> {
        vec![
            ingredient(1, "brown sugar"),
            ingredient(2, "salt"),
            ingredient(3, "sugar"),
            ingredient(4, "Sugar syrup"),
            ingredient(5, "vanilla sugar"),
            ingredient(6, "water"),
        ]
    }

    #[test]
    fn prefix_matches_come_first() {
        let items = pantry();
        let results = ranked_search(&items, "sug");
        assert_eq!(
            names(&results),
            ["sugar", "Sugar syrup", "brown sugar", "vanilla sugar"]
        );
    }

    #[test]
    fn matching_ignores_case() {
        let items = pantry();
        assert_eq!(
            names(&ranked_search(&items, "SUGAR S")),
            ["Sugar syrup"]
        );
        assert_eq!(names(&ranked_search(&items, "WaT")), ["water"]);
    }

    #[test]
    fn cyrillic_names_fold_case() {
        let items = vec![ingredient(1, "Мука пшеничная"), ingredient(2, "Соль")];
        assert_eq!(names(&ranked_search(&items, "мука")), ["Мука пшеничная"]);
    }

    #[test]
    fn no_match_is_empty() {
        let items = pantry();
        assert!(ranked_search(&items, "saffron").is_empty());
    }

    #[test]
    fn empty_query_returns_everything() {
        let items = pantry();
        assert_eq!(ranked_search(&items, "").len(), items.len());
        assert_eq!(ranked_search(&items, "   ").len(), items.len());
    }

    #[test]
    fn every_match_appears_once_and_prefixes_lead() {
        let items = pantry();
        for query in ["s", "a", "ar", "sugar", "r"] {
            let results = ranked_search(&items, query);
            let ids = results.iter().map(|i| i.id).collect::<Vec<_>>();
            assert_eq!(ids.iter().unique().count(), ids.len());
            let expected = items
                .iter()
                .filter(|i| i.name.to_lowercase().contains(query))
                .count();
            assert_eq!(results.len(), expected);
            let ranks = results
                .iter()
                .map(|i| rank(&i.name, query).unwrap())
                .collect::<Vec<_>>();
            assert!(ranks.windows(2).all(|w| w[0] <= w[1]), "{query}");
        }
    }
}
