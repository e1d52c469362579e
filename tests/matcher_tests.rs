#[cfg(test)]
mod tests {
    use fridgechef::matcher::{adaptive_threshold, rank_recipes, score_missing};
    use fridgechef::model::{Difficulty, Recipe};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn recipe(title: &str, ingredients: &[&str]) -> Recipe {
        Recipe {
            id: String::new(),
            title: title.to_string(),
            description: String::new(),
            ingredients: strings(ingredients),
            instructions: vec![],
            prep_time: 15,
            cook_time: 30,
            servings: 4,
            cuisine: vec!["International".to_string()],
            dietary_tags: vec![],
            difficulty: Difficulty::Medium,
            tips: None,
            variations: None,
        }
    }

    #[test]
    fn test_adaptive_threshold_boundary_values() {
        assert_eq!(adaptive_threshold(0), 2);
        assert_eq!(adaptive_threshold(3), 3);
        assert_eq!(adaptive_threshold(4), 2);
        assert_eq!(adaptive_threshold(10), 2);
    }

    #[test]
    fn test_missing_ingredient_scoring() {
        let available = strings(&["tomatoes", "onions", "olive oil"]);
        let (missing, count) =
            score_missing(&strings(&["tomatoes", "garlic", "olive oil"]), &available);
        assert_eq!(missing, vec!["garlic"]);
        assert_eq!(count, 1);
    }

    #[test]
    fn test_fuzzy_match_tolerates_phrase_variants() {
        let available = strings(&["peppers", "milk"]);
        let (missing, count) = score_missing(
            &strings(&["red bell peppers", "whole milk", "sugar"]),
            &available,
        );
        assert_eq!(missing, vec!["sugar"]);
        assert_eq!(count, 1);
    }

    #[test]
    fn test_small_pantry_scenario() {
        // Two-item pantry tolerates three missing ingredients
        let available = strings(&["rice", "eggs"]);
        let candidates = vec![recipe(
            "Fried Rice",
            &["rice", "eggs", "soy sauce", "scallions", "sesame oil"],
        )];

        let ranked = rank_recipes(candidates, &available);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].missing_count, 3);
    }

    #[test]
    fn test_end_to_end_scenario() {
        let available = strings(&["eggs", "milk", "bread", "butter"]);
        let candidates = vec![
            recipe("Recipe 1", &["eggs", "salt", "pepper"]),
            recipe("Recipe 2", &["eggs", "milk", "flour", "sugar", "yeast"]),
        ];

        // Pantry of 4 -> threshold 2; recipe 1 misses salt and pepper and is
        // included, recipe 2 misses three things and is excluded
        let ranked = rank_recipes(candidates, &available);

        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].recipe.title, "Recipe 1");
        assert_eq!(ranked[0].missing_ingredients, vec!["salt", "pepper"]);
        assert_eq!(ranked[0].missing_count, 2);
    }

    #[test]
    fn test_ranking_surfaces_perfect_matches_first() {
        let available = strings(&["eggs", "milk", "bread"]);
        let candidates = vec![
            recipe("Toast Plus", &["bread", "jam"]),
            recipe("French Toast", &["eggs", "milk", "bread"]),
            recipe("Eggy Bread", &["eggs", "bread", "cinnamon"]),
        ];

        let ranked = rank_recipes(candidates, &available);
        let titles: Vec<&str> = ranked.iter().map(|r| r.recipe.title.as_str()).collect();

        // Zero-missing first, then one-missing candidates in generation order
        assert_eq!(titles, vec!["French Toast", "Toast Plus", "Eggy Bread"]);
    }
}
