use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Fashion,
    Electronics,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fashion => "fashion",
            Self::Electronics => "electronics",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accumulated filter constraints for a conversation. An absent field means
/// "no constraint". Fields are only ever added or overwritten across turns,
/// never removed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Criteria {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_discount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_rating: Option<f64>,
}

impl Criteria {
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.max_price.is_none()
            && self.min_discount.is_none()
            && self.min_rating.is_none()
    }

    /// Key-wise merge: fields set in the patch overwrite, absent fields keep
    /// their current value.
    pub fn merge(&mut self, patch: CriteriaPatch) {
        if let Some(category) = patch.category {
            self.category = Some(category);
        }
        if let Some(max_price) = patch.max_price {
            self.max_price = Some(max_price);
        }
        if let Some(min_discount) = patch.min_discount {
            self.min_discount = Some(min_discount);
        }
        if let Some(min_rating) = patch.min_rating {
            self.min_rating = Some(min_rating);
        }
    }

    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(category) = self.category {
            parts.push(format!("category {category}"));
        }
        if let Some(max_price) = self.max_price {
            parts.push(format!("price under ${max_price}"));
        }
        if let Some(min_discount) = self.min_discount {
            parts.push(format!("discount at least {min_discount}%"));
        }
        if let Some(min_rating) = self.min_rating {
            parts.push(format!("rating at least {min_rating}"));
        }
        if parts.is_empty() {
            "no constraints".to_string()
        } else {
            parts.join(", ")
        }
    }
}

impl fmt::Display for Criteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

/// Partial criteria decoded from untrusted semi-structured text (an LLM
/// reply). Unknown fields are dropped by the typed decode; out-of-range
/// values are dropped by [`CriteriaPatch::sanitized`] before merging.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct CriteriaPatch {
    pub category: Option<Category>,
    pub max_price: Option<f64>,
    pub min_discount: Option<f64>,
    pub min_rating: Option<f64>,
}

impl CriteriaPatch {
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.max_price.is_none()
            && self.min_discount.is_none()
            && self.min_rating.is_none()
    }

    /// Drops values that violate the domain ranges: max_price must be
    /// non-negative, min_discount non-negative, min_rating within 0..=5.
    /// Non-finite numbers are dropped as well.
    pub fn sanitized(self) -> Self {
        Self {
            category: self.category,
            max_price: self.max_price.filter(|value| value.is_finite() && *value >= 0.0),
            min_discount: self.min_discount.filter(|value| value.is_finite() && *value >= 0.0),
            min_rating: self
                .min_rating
                .filter(|value| value.is_finite() && (0.0..=5.0).contains(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Category, Criteria, CriteriaPatch};

    #[test]
    fn merge_overwrites_set_fields_and_keeps_the_rest() {
        let mut criteria = Criteria {
            category: Some(Category::Fashion),
            max_price: Some(60.0),
            ..Criteria::default()
        };

        criteria.merge(CriteriaPatch { min_rating: Some(4.5), ..CriteriaPatch::default() });
        assert_eq!(criteria.category, Some(Category::Fashion));
        assert_eq!(criteria.max_price, Some(60.0));
        assert_eq!(criteria.min_rating, Some(4.5));

        criteria.merge(CriteriaPatch { max_price: Some(30.0), ..CriteriaPatch::default() });
        assert_eq!(criteria.max_price, Some(30.0));
        assert_eq!(criteria.min_rating, Some(4.5));
    }

    #[test]
    fn patch_decode_drops_unrecognized_fields() {
        let patch: CriteriaPatch =
            serde_json::from_str(r#"{"max_price": 50, "color": "red", "brand": "acme"}"#)
                .expect("patch should decode");
        assert_eq!(patch.max_price, Some(50.0));
        assert!(patch.category.is_none());
    }

    #[test]
    fn patch_decode_rejects_unknown_category_value() {
        let result = serde_json::from_str::<CriteriaPatch>(r#"{"category": "books"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn sanitize_drops_out_of_range_values() {
        let patch = CriteriaPatch {
            category: Some(Category::Electronics),
            max_price: Some(-10.0),
            min_discount: Some(20.0),
            min_rating: Some(7.5),
        };

        let clean = patch.sanitized();
        assert_eq!(clean.category, Some(Category::Electronics));
        assert!(clean.max_price.is_none());
        assert_eq!(clean.min_discount, Some(20.0));
        assert!(clean.min_rating.is_none());
    }

    #[test]
    fn summary_lists_only_set_constraints() {
        let criteria = Criteria {
            category: Some(Category::Fashion),
            max_price: Some(60.0),
            ..Criteria::default()
        };
        assert_eq!(criteria.summary(), "category fashion, price under $60");
        assert_eq!(Criteria::default().summary(), "no constraints");
    }

    #[test]
    fn none_fields_are_skipped_when_serialized() {
        let criteria = Criteria { max_price: Some(50.0), ..Criteria::default() };
        let json = serde_json::to_value(&criteria).expect("criteria should serialize");
        assert_eq!(json, serde_json::json!({"max_price": 50.0}));
    }
}
