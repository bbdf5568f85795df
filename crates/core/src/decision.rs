/// Outcome of a single turn: either present the current offers or ask the
/// user a clarifying question. Produced fresh each turn, never stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    Conclude,
    Ask { question: String },
}

impl Decision {
    pub fn is_conclude(&self) -> bool {
        matches!(self, Self::Conclude)
    }
}

/// A result set larger than this asks the user to narrow down instead of
/// dumping the whole list.
pub const MAX_PRESENTABLE_OFFERS: usize = 10;

pub fn decide_by_rules(offer_count: usize) -> Decision {
    if offer_count == 0 {
        Decision::Ask {
            question: "No offers found. Would you like to adjust your criteria?".to_string(),
        }
    } else if offer_count > MAX_PRESENTABLE_OFFERS {
        Decision::Ask {
            question: "Found many offers. Would you like to narrow down by rating or discount?"
                .to_string(),
        }
    } else {
        Decision::Conclude
    }
}

#[cfg(test)]
mod tests {
    use super::{decide_by_rules, Decision};

    #[test]
    fn empty_result_set_asks_to_adjust() {
        let decision = decide_by_rules(0);
        let question = match decision {
            Decision::Ask { question } => question,
            Decision::Conclude => String::new(),
        };
        assert!(question.contains("No offers found"));
    }

    #[test]
    fn boundary_at_ten_offers() {
        assert!(decide_by_rules(10).is_conclude());
        assert!(!decide_by_rules(11).is_conclude());
    }

    #[test]
    fn oversized_result_set_asks_to_narrow() {
        let decision = decide_by_rules(25);
        let question = match decision {
            Decision::Ask { question } => question,
            Decision::Conclude => String::new(),
        };
        assert!(question.contains("narrow down"));
    }

    #[test]
    fn small_result_set_concludes() {
        assert!(decide_by_rules(1).is_conclude());
        assert!(decide_by_rules(5).is_conclude());
    }
}
