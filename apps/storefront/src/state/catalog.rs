//! # Catalog State
//!
//! The card templates customers can buy, seeded at startup and read-only
//! afterwards. Prices are kept as their display strings in the seed and
//! parsed once into [`Money`].

use keytowish_core::error::CoreResult;
use keytowish_core::{CoreError, Money, Occasion, TemplateCandidate};
use serde::Serialize;
use ts_rs::TS;

/// One purchasable card design.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CatalogTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image_url: String,
    pub price: Money,
    pub occasion: Occasion,
}

impl CatalogTemplate {
    /// The cart's view of this template.
    pub fn to_candidate(&self) -> TemplateCandidate {
        TemplateCandidate {
            id: self.id.clone(),
            name: self.name.clone(),
            unit_price: self.price,
            image_ref: self.image_url.clone(),
            category: Some(self.occasion.display_name().to_string()),
        }
    }
}

/// A browsable occasion with how many templates it currently has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    pub occasion: Occasion,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub template_count: usize,
}

/// (id, name, description, image, price, occasion)
type SeedRow = (&'static str, &'static str, &'static str, &'static str, &'static str, Occasion);

const SEED: &[SeedRow] = &[
    (
        "b1",
        "Birthday Balloons",
        "Colorful balloons for a joyful birthday celebration",
        "https://images.unsplash.com/photo-1530103862676-de8c9debad1d?auto=format&fit=crop&q=80&w=400&h=250",
        "$4.99",
        Occasion::Birthday,
    ),
    (
        "b2",
        "Birthday Cake",
        "Beautiful cake design for the special day",
        "https://images.unsplash.com/photo-1578922746376-051049a0bdf2?auto=format&fit=crop&q=80&w=400&h=250",
        "$4.99",
        Occasion::Birthday,
    ),
    (
        "b3",
        "Birthday Party",
        "Festive party theme for birthdays",
        "https://images.unsplash.com/photo-1464349095431-e9a21285b5f3?auto=format&fit=crop&q=80&w=400&h=250",
        "$4.99",
        Occasion::Birthday,
    ),
    (
        "b4",
        "Birthday Gifts",
        "Presents and gifts themed card",
        "https://images.unsplash.com/photo-1549465220-1a8b9238cd48?auto=format&fit=crop&q=80&w=400&h=250",
        "$4.99",
        Occasion::Birthday,
    ),
    (
        "b5",
        "Confetti Birthday",
        "Colorful confetti celebration design",
        "https://images.unsplash.com/photo-1527359443443-84a48aec73d2?auto=format&fit=crop&q=80&w=400&h=250",
        "$4.99",
        Occasion::Birthday,
    ),
    (
        "b6",
        "Birthday Candles",
        "Glowing candles for birthday wishes",
        "https://images.unsplash.com/photo-1563729784474-d77dbb933a9e?auto=format&fit=crop&q=80&w=400&h=250",
        "$4.99",
        Occasion::Birthday,
    ),
    (
        "a1",
        "Happy Anniversary",
        "Classic anniversary design for your loved one",
        "https://images.unsplash.com/photo-1537633552985-df8429e8048b?auto=format&fit=crop&q=80&w=400&h=250",
        "$4.99",
        Occasion::Anniversary,
    ),
    (
        "a2",
        "Hearts & Roses",
        "Romantic design with hearts and roses",
        "https://images.unsplash.com/photo-1527162788840-22b038312791?auto=format&fit=crop&q=80&w=400&h=250",
        "$4.99",
        Occasion::Anniversary,
    ),
    (
        "a3",
        "Golden Years",
        "Elegant gold design for milestone anniversaries",
        "https://images.unsplash.com/photo-1523438885200-e635ba2c371e?auto=format&fit=crop&q=80&w=400&h=250",
        "$4.99",
        Occasion::Anniversary,
    ),
    (
        "a4",
        "Forever Love",
        "Timeless design celebrating eternal love",
        "https://images.unsplash.com/photo-1494774157365-9e04c6720e47?auto=format&fit=crop&q=80&w=400&h=250",
        "$4.99",
        Occasion::Anniversary,
    ),
];

/// Read-only template catalog.
#[derive(Debug, Clone, Default)]
pub struct CatalogState {
    templates: Vec<CatalogTemplate>,
}

impl CatalogState {
    /// Builds a catalog from explicit templates.
    pub fn new(templates: Vec<CatalogTemplate>) -> Self {
        CatalogState { templates }
    }

    /// The built-in birthday and anniversary collection.
    ///
    /// ## Errors
    /// A seed price that is not a valid amount.
    pub fn seeded() -> CoreResult<Self> {
        let templates = SEED
            .iter()
            .map(|&(id, name, description, image_url, price, occasion)| -> CoreResult<CatalogTemplate> {
                Ok(CatalogTemplate {
                    id: id.to_string(),
                    name: name.to_string(),
                    description: description.to_string(),
                    image_url: image_url.to_string(),
                    price: price.parse::<Money>()?,
                    occasion,
                })
            })
            .collect::<CoreResult<Vec<_>>>()?;

        Ok(CatalogState::new(templates))
    }

    /// Templates for one occasion, or all of them, in catalog order.
    pub fn templates(&self, occasion: Option<Occasion>) -> Vec<CatalogTemplate> {
        self.templates
            .iter()
            .filter(|t| occasion.map_or(true, |o| t.occasion == o))
            .cloned()
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&CatalogTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Looks up `id` and turns it into a cart candidate.
    pub fn candidate(&self, id: &str) -> CoreResult<TemplateCandidate> {
        self.get(id)
            .map(CatalogTemplate::to_candidate)
            .ok_or_else(|| CoreError::TemplateNotFound(id.to_string()))
    }

    /// Every occasion with its template count, in display order.
    pub fn categories(&self) -> Vec<CategorySummary> {
        Occasion::ALL
            .into_iter()
            .map(|occasion| CategorySummary {
                occasion,
                name: occasion.display_name().to_string(),
                slug: occasion.slug().to_string(),
                description: occasion.description().to_string(),
                template_count: self.templates.iter().filter(|t| t.occasion == occasion).count(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_parses() {
        let catalog = CatalogState::seeded().unwrap();
        assert_eq!(catalog.templates(None).len(), 10);
        assert_eq!(catalog.templates(Some(Occasion::Birthday)).len(), 6);
        assert_eq!(catalog.templates(Some(Occasion::Anniversary)).len(), 4);
        assert!(catalog.templates(Some(Occasion::Graduation)).is_empty());
        assert!(catalog.templates(None).iter().all(|t| t.price.cents() == 499));
    }

    #[test]
    fn test_candidate_lookup() {
        let catalog = CatalogState::seeded().unwrap();
        let candidate = catalog.candidate("a2").unwrap();
        assert_eq!(candidate.name, "Hearts & Roses");
        assert_eq!(candidate.category.as_deref(), Some("Anniversary"));

        assert!(matches!(
            catalog.candidate("zz9"),
            Err(CoreError::TemplateNotFound(id)) if id == "zz9"
        ));
    }

    #[test]
    fn test_categories_cover_every_occasion() {
        let categories = CatalogState::seeded().unwrap().categories();
        assert_eq!(categories.len(), 7);
        assert_eq!(categories[0].slug, "birthday");
        assert_eq!(categories[0].template_count, 6);
        assert_eq!(categories[2].name, "New Baby");
        assert_eq!(categories[2].template_count, 0);
    }
}
