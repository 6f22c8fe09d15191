use diesel::pg::Pg;
use diesel::prelude::*;

use crate::database::schema::{ingredient, recipe, recipe_ingredient};

/// Optional search criteria, every present field narrows the result further.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecipeFilter {
    pub text: Option<String>,
    pub include: Option<String>,
    pub exclude: Option<String>,
    pub servings: Option<i32>,
    pub vegetarian: Option<bool>,
}

impl RecipeFilter {
    /// Blank strings count as "not supplied".
    pub fn new(
        text: Option<String>,
        include: Option<String>,
        exclude: Option<String>,
        servings: Option<i32>,
        vegetarian: Option<bool>,
    ) -> Self {
        Self {
            text: non_blank(text),
            include: non_blank(include),
            exclude: non_blank(exclude),
            servings,
            vegetarian,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.include.is_none()
            && self.exclude.is_none()
            && self.servings.is_none()
            && self.vegetarian.is_none()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

/// Builds the search over `recipe`.
///
/// Text is matched as a substring of the title or the instructions. Include
/// and exclude are `ILIKE` patterns matched against ingredient titles through
/// a subquery on the association table.
pub fn find_query(filter: &RecipeFilter) -> recipe::BoxedQuery<'static, Pg> {
    let mut query = recipe::table.into_boxed();

    if let Some(text) = &filter.text {
        let pattern = format!("%{text}%");
        query = query.filter(
            recipe::title
                .ilike(pattern.clone())
                .or(recipe::instructions.ilike(pattern)),
        );
    }

    if let Some(include) = &filter.include {
        let matching_ingredients = ingredient::table
            .filter(ingredient::title.ilike(include.clone()))
            .select(ingredient::id);
        let matching_recipes = recipe_ingredient::table
            .filter(recipe_ingredient::ingredient_id.eq_any(matching_ingredients))
            .select(recipe_ingredient::recipe_id);

        query = query.filter(recipe::id.eq_any(matching_recipes));
    }

    if let Some(exclude) = &filter.exclude {
        let matching_ingredients = ingredient::table
            .filter(ingredient::title.ilike(exclude.clone()))
            .select(ingredient::id);
        let matching_recipes = recipe_ingredient::table
            .filter(recipe_ingredient::ingredient_id.eq_any(matching_ingredients))
            .select(recipe_ingredient::recipe_id);

        query = query.filter(recipe::id.ne_all(matching_recipes));
    }

    if let Some(servings) = filter.servings {
        query = query.filter(recipe::serves.eq(servings));
    }

    if let Some(vegetarian) = filter.vegetarian {
        query = query.filter(recipe::vegetarian.eq(vegetarian));
    }

    query.order(recipe::id.asc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::debug_query;

    fn render(filter: &RecipeFilter) -> String {
        debug_query::<Pg, _>(&find_query(filter)).to_string()
    }

    #[test]
    fn test_blank_values_are_dropped() {
        let filter = RecipeFilter::new(
            Some("".to_owned()),
            Some("   ".to_owned()),
            None,
            None,
            None,
        );
        assert!(filter.is_empty());
    }

    #[test]
    fn test_no_filter_has_no_where_clause() {
        let sql = render(&RecipeFilter::default());

        assert!(sql.contains("FROM \"recipe\""));
        assert!(!sql.contains("WHERE"));
        assert!(sql.contains("ORDER BY \"recipe\".\"id\" ASC"));
    }

    #[test]
    fn test_text_matches_title_or_instructions() {
        let filter = RecipeFilter::new(Some("taco".to_owned()), None, None, None, None);
        let sql = render(&filter);

        assert!(sql.contains("\"recipe\".\"title\" ILIKE"));
        assert!(sql.contains("\"recipe\".\"instructions\" ILIKE"));
        assert!(sql.contains(" OR "));
        assert!(sql.contains("%taco%"));
    }

    #[test]
    fn test_include_and_exclude_use_subqueries() {
        let filter = RecipeFilter::new(
            None,
            Some("basil".to_owned()),
            Some("carrot".to_owned()),
            None,
            None,
        );
        let sql = render(&filter);

        let subquery = "SELECT \"recipe_ingredient\".\"recipe_id\" FROM \"recipe_ingredient\"";
        assert_eq!(sql.matches(subquery).count(), 2);
        assert!(sql.contains("NOT IN") || sql.contains("!= ALL"));
        assert!(sql.contains("\"ingredient\".\"title\" ILIKE"));
        assert!(sql.contains("basil"));
        assert!(sql.contains("carrot"));
        assert!(!sql.contains("%basil%"));
    }

    #[test]
    fn test_equality_filters() {
        let filter = RecipeFilter::new(None, None, None, Some(2), Some(true));
        let sql = render(&filter);

        assert!(sql.contains("\"recipe\".\"serves\" = $"));
        assert!(sql.contains("\"recipe\".\"vegetarian\" = $"));
        assert!(!sql.contains("ILIKE"));
    }
}
