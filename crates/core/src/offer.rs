use serde::{Deserialize, Serialize};

use crate::criteria::{Category, Criteria};

/// A single catalog item. Owned by the catalog service; immutable here.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub id: u64,
    pub title: String,
    pub category: Category,
    pub price: f64,
    pub discount: f64,
    pub rating: f64,
}

impl Offer {
    /// AND semantics: every supplied filter must hold.
    pub fn matches(&self, criteria: &Criteria) -> bool {
        if let Some(category) = criteria.category {
            if self.category != category {
                return false;
            }
        }
        if let Some(max_price) = criteria.max_price {
            if self.price > max_price {
                return false;
            }
        }
        if let Some(min_discount) = criteria.min_discount {
            if self.discount < min_discount {
                return false;
            }
        }
        if let Some(min_rating) = criteria.min_rating {
            if self.rating < min_rating {
                return false;
            }
        }
        true
    }
}

/// Orders offers for the final answer: best discount first, rating breaks
/// ties. The sort is stable, so offers equal on both keys keep their
/// original fetch order.
pub fn sort_for_presentation(offers: &mut [Offer]) {
    offers.sort_by(|a, b| {
        b.discount.total_cmp(&a.discount).then_with(|| b.rating.total_cmp(&a.rating))
    });
}

#[cfg(test)]
mod tests {
    use super::{sort_for_presentation, Offer};
    use crate::criteria::{Category, Criteria};

    fn offer(id: u64, discount: f64, rating: f64) -> Offer {
        Offer {
            id,
            title: format!("offer-{id}"),
            category: Category::Fashion,
            price: 25.0,
            discount,
            rating,
        }
    }

    #[test]
    fn sorts_by_discount_then_rating_descending() {
        let mut offers = vec![offer(1, 10.0, 4.0), offer(2, 50.0, 4.5), offer(3, 50.0, 3.0)];
        sort_for_presentation(&mut offers);

        let ids = offers.iter().map(|o| o.id).collect::<Vec<_>>();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn equal_offers_keep_fetch_order() {
        let mut offers = vec![offer(7, 20.0, 4.0), offer(8, 20.0, 4.0), offer(9, 20.0, 4.0)];
        sort_for_presentation(&mut offers);

        let ids = offers.iter().map(|o| o.id).collect::<Vec<_>>();
        assert_eq!(ids, vec![7, 8, 9]);
    }

    #[test]
    fn matches_applies_every_supplied_filter() {
        let subject = Offer {
            id: 1,
            title: "50% off shoes".to_string(),
            category: Category::Fashion,
            price: 50.0,
            discount: 50.0,
            rating: 4.5,
        };

        assert!(subject.matches(&Criteria::default()));
        assert!(subject.matches(&Criteria {
            category: Some(Category::Fashion),
            max_price: Some(60.0),
            ..Criteria::default()
        }));
        assert!(!subject.matches(&Criteria {
            category: Some(Category::Electronics),
            ..Criteria::default()
        }));
        assert!(!subject.matches(&Criteria { max_price: Some(49.0), ..Criteria::default() }));
        assert!(!subject.matches(&Criteria { min_discount: Some(60.0), ..Criteria::default() }));
        assert!(!subject.matches(&Criteria { min_rating: Some(4.6), ..Criteria::default() }));
    }
}
