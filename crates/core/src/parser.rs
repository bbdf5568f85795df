use crate::criteria::{Category, Criteria};

// Keyword sets for category detection. Fashion is checked first: when a
// query mentions both, fashion wins. This priority is deliberate and locked
// by tests, not an accident of evaluation order.
const FASHION_KEYWORDS: [&str; 4] = ["fashion", "clothes", "shirt", "shoes"];
const ELECTRONICS_KEYWORDS: [&str; 4] = ["electronics", "laptop", "smartphone", "phone"];

/// Rule-based extraction of filter criteria from a free-text query.
///
/// Recognized patterns (all case-insensitive):
/// - category keywords (see the keyword sets above)
/// - `under $N` / `below $N` → max_price; `below` overrides `under`
/// - `discount above N` / `N% off` → min_discount; `N% off` overrides
/// - `rating above N` (decimals allowed) → min_rating
///
/// Text that matches nothing yields empty criteria, never an error.
pub fn parse_query(query: &str) -> Criteria {
    let normalized = normalize_text(query);
    let tokens = tokenize(&normalized);

    Criteria {
        category: extract_category(&normalized),
        max_price: extract_max_price(&tokens),
        min_discount: extract_min_discount(&tokens),
        min_rating: extract_min_rating(&tokens),
    }
}

fn normalize_text(text: &str) -> String {
    text.to_ascii_lowercase()
}

fn tokenize(text: &str) -> Vec<String> {
    let mut sanitized = String::with_capacity(text.len());
    for character in text.chars() {
        if character.is_ascii_alphanumeric() || matches!(character, '$' | '%' | '.') {
            sanitized.push(character);
        } else {
            sanitized.push(' ');
        }
    }
    sanitized.split_whitespace().map(|token| token.to_string()).collect()
}

fn extract_category(normalized_text: &str) -> Option<Category> {
    if FASHION_KEYWORDS.iter().any(|keyword| normalized_text.contains(keyword)) {
        return Some(Category::Fashion);
    }
    if ELECTRONICS_KEYWORDS.iter().any(|keyword| normalized_text.contains(keyword)) {
        return Some(Category::Electronics);
    }
    None
}

fn extract_max_price(tokens: &[String]) -> Option<f64> {
    let mut under = None;
    let mut below = None;

    for window in tokens.windows(2) {
        if let [keyword, value] = window {
            match keyword.as_str() {
                "under" => under = parse_money_token(value).or(under),
                "below" => below = parse_money_token(value).or(below),
                _ => {}
            }
        }
    }

    // Explicit priority: `below` overrides `under` when both are present.
    below.or(under)
}

fn extract_min_discount(tokens: &[String]) -> Option<f64> {
    let mut above = None;
    for window in tokens.windows(3) {
        if let [first, second, value] = window {
            if first == "discount" && second == "above" {
                above = parse_number_token(value).or(above);
            }
        }
    }

    let mut percent_off = None;
    for window in tokens.windows(2) {
        if let [value, keyword] = window {
            if keyword == "off" {
                if let Some(raw) = value.strip_suffix('%') {
                    percent_off = parse_number_token(raw).or(percent_off);
                }
            }
        }
    }

    // Explicit priority: `N% off` overrides `discount above N`.
    percent_off.or(above)
}

fn extract_min_rating(tokens: &[String]) -> Option<f64> {
    let mut rating = None;
    for window in tokens.windows(3) {
        if let [first, second, value] = window {
            if first == "rating" && second == "above" {
                rating = parse_number_token(value).or(rating);
            }
        }
    }
    rating
}

fn parse_money_token(token: &str) -> Option<f64> {
    parse_number_token(token.trim_start_matches('$'))
}

fn parse_number_token(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|value| value.is_finite() && *value >= 0.0)
}
