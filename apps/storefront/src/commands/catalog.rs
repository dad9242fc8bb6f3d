//! # Catalog Commands
//!
//! Read-only browsing of occasions and card templates.

use keytowish_core::Occasion;
use tracing::debug;

use crate::error::ApiResult;
use crate::state::{CatalogState, CatalogTemplate, CategorySummary};

/// Every occasion category with its template count.
pub fn list_categories(catalog: &CatalogState) -> Vec<CategorySummary> {
    debug!("list_categories command");
    catalog.categories()
}

/// Templates for an occasion, or the whole catalog when none is given.
///
/// ## Arguments
/// * `occasion` - display name, slug or camelCase name ("New Baby",
///   "new-baby", "newBaby")
///
/// ## Errors
/// `VALIDATION_ERROR` for an unknown occasion.
pub fn list_templates(
    catalog: &CatalogState,
    occasion: Option<&str>,
) -> ApiResult<Vec<CatalogTemplate>> {
    debug!(occasion = ?occasion, "list_templates command");

    let occasion = occasion
        .filter(|o| !o.trim().is_empty())
        .map(str::parse::<Occasion>)
        .transpose()?;

    Ok(catalog.templates(occasion))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_list_templates_filters() {
        let catalog = CatalogState::seeded().unwrap();
        assert_eq!(list_templates(&catalog, None).unwrap().len(), 10);
        assert_eq!(list_templates(&catalog, Some("")).unwrap().len(), 10);

        let anniversary = list_templates(&catalog, Some("anniversary")).unwrap();
        let ids: Vec<&str> = anniversary.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a2", "a3", "a4"]);
    }

    #[test]
    fn test_unknown_occasion() {
        let catalog = CatalogState::seeded().unwrap();
        let err = list_templates(&catalog, Some("Halloween")).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.fields[0].field(), "occasion");
    }

    #[test]
    fn test_list_categories() {
        let catalog = CatalogState::seeded().unwrap();
        let categories = list_categories(&catalog);
        assert_eq!(categories.len(), 7);
        assert_eq!(categories[6].name, "Job Success");
    }
}
