use crate::criteria::Criteria;

const RATING_STEP: f64 = 0.5;
const DISCOUNT_STEP: f64 = 10.0;

/// Rule-based revision of criteria from a follow-up answer.
///
/// An affirmative or intensifying cue ("yes" or "higher") combined with
/// "rating" raises min_rating by 0.5; combined with "discount" raises
/// min_discount by 10. Rating takes priority when both words appear.
/// Ambiguous or negative answers leave the criteria unchanged.
pub fn apply_followup(criteria: &Criteria, user_response: &str) -> Criteria {
    let normalized = user_response.to_ascii_lowercase();
    let mut updated = criteria.clone();

    let affirmative = normalized.contains("yes") || normalized.contains("higher");
    if !affirmative {
        return updated;
    }

    if normalized.contains("rating") {
        updated.min_rating = Some(updated.min_rating.unwrap_or(0.0) + RATING_STEP);
    } else if normalized.contains("discount") {
        updated.min_discount = Some(updated.min_discount.unwrap_or(0.0) + DISCOUNT_STEP);
    }

    updated
}
