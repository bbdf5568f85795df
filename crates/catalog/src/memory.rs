use async_trait::async_trait;
use offerly_core::{Category, Criteria, Offer};

use crate::CatalogClient;

/// The demo catalog data set. Mirrors what the hosted catalog service
/// serves, so offline runs and tests see the same offers.
pub fn sample_offers() -> Vec<Offer> {
    vec![
        Offer {
            id: 1,
            title: "50% off shoes".to_string(),
            category: Category::Fashion,
            price: 50.0,
            discount: 50.0,
            rating: 4.5,
        },
        Offer {
            id: 2,
            title: "Discounted laptop".to_string(),
            category: Category::Electronics,
            price: 900.0,
            discount: 10.0,
            rating: 4.2,
        },
        Offer {
            id: 3,
            title: "Buy 1 Get 1 Free T-shirt".to_string(),
            category: Category::Fashion,
            price: 20.0,
            discount: 50.0,
            rating: 4.0,
        },
        Offer {
            id: 4,
            title: "Smartphone Sale".to_string(),
            category: Category::Electronics,
            price: 600.0,
            discount: 15.0,
            rating: 4.3,
        },
    ]
}

/// Catalog backed by a fixed offer list; used for tests and `chat --offline`.
#[derive(Clone, Debug)]
pub struct InMemoryCatalog {
    offers: Vec<Offer>,
}

impl InMemoryCatalog {
    pub fn new(offers: Vec<Offer>) -> Self {
        Self { offers }
    }

    pub fn with_sample_offers() -> Self {
        Self::new(sample_offers())
    }
}

#[async_trait]
impl CatalogClient for InMemoryCatalog {
    async fn fetch(&self, criteria: &Criteria) -> Vec<Offer> {
        self.offers.iter().filter(|offer| offer.matches(criteria)).cloned().collect()
    }
}
