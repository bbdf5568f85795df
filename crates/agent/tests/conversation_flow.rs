//! End-to-end conversation flows over the in-memory catalog, covering the
//! ask-then-refine loop, capability-delegated turns, and degradation when
//! the capability is down.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use offerly_agent::llm::{LlmClient, LlmError};
use offerly_agent::AgentRuntime;
use offerly_catalog::InMemoryCatalog;
use offerly_core::{AgentMode, Category, Offer};

fn fashion_offer(id: u64, price: f64, discount: f64, rating: f64) -> Offer {
    Offer {
        id,
        title: format!("fashion deal {id}"),
        category: Category::Fashion,
        price,
        discount,
        rating,
    }
}

/// Twelve fashion offers: four with a token discount, eight with a real one.
fn crowded_catalog() -> InMemoryCatalog {
    let mut offers = Vec::new();
    for id in 1..=4u64 {
        offers.push(fashion_offer(id, 10.0 * id as f64, 5.0, 3.5));
    }
    for id in 5..=12u64 {
        offers.push(fashion_offer(id, 10.0 * id as f64, 20.0 + id as f64, 4.0));
    }
    InMemoryCatalog::new(offers)
}

fn rule_runtime(catalog: InMemoryCatalog) -> AgentRuntime {
    AgentRuntime::new(AgentMode::Fake, Duration::from_secs(60), Arc::new(catalog), None)
        .expect("runtime should build")
}

#[tokio::test]
async fn ask_then_refine_until_concluded() {
    let runtime = rule_runtime(crowded_catalog());

    let first = runtime.advance("shopper", "fashion deals").await.expect("turn should run");
    assert!(!first.done);
    assert!(first.offers.is_empty(), "a follow-up question carries no offers");
    assert!(first.message.contains("narrow down"));

    let second =
        runtime.advance("shopper", "yes, a higher discount").await.expect("turn should run");
    assert!(second.done);
    assert_eq!(second.offers.len(), 8, "the discount floor drops the token-discount offers");

    let discounts = second.offers.iter().map(|offer| offer.discount).collect::<Vec<_>>();
    let mut expected = discounts.clone();
    expected.sort_by(|a, b| b.total_cmp(a));
    assert_eq!(discounts, expected, "concluded offers are sorted by discount descending");
}

#[tokio::test]
async fn sessions_do_not_share_criteria() {
    let runtime = rule_runtime(InMemoryCatalog::with_sample_offers());

    let fashion = runtime.advance("a", "fashion under $60").await.expect("turn should run");
    let electronics = runtime.advance("b", "electronics").await.expect("turn should run");

    let fashion_ids = fashion.offers.iter().map(|o| o.id).collect::<Vec<_>>();
    let electronics_ids = electronics.offers.iter().map(|o| o.id).collect::<Vec<_>>();
    assert_eq!(fashion_ids, vec![1, 3]);
    assert_eq!(electronics_ids, vec![4, 2], "sorted by discount: smartphone before laptop");
}

/// Answers criteria prompts and decision prompts with canned JSON, wrapped
/// in the kind of commentary a real model produces.
struct ScriptedCapability;

#[async_trait]
impl LlmClient for ScriptedCapability {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        if prompt.contains("next_action") {
            Ok(r#"Happy to help! {"next_action": "CONCLUDE"}"#.to_string())
        } else {
            Ok(r#"Extracted: {"category": "fashion", "max_price": 60}"#.to_string())
        }
    }
}

struct DownCapability;

#[async_trait]
impl LlmClient for DownCapability {
    async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
        Err(LlmError::Unavailable("connect timeout".to_string()))
    }
}

#[tokio::test]
async fn capability_delegated_turn_concludes_from_scripted_replies() {
    let runtime = AgentRuntime::new(
        AgentMode::Auto,
        Duration::from_secs(60),
        Arc::new(InMemoryCatalog::with_sample_offers()),
        Some(Arc::new(ScriptedCapability)),
    )
    .expect("runtime should build");

    let outcome = runtime
        .advance("shopper", "nice fashion stuff below sixty dollars")
        .await
        .expect("turn should run");
    assert!(outcome.done);
    let ids = outcome.offers.iter().map(|o| o.id).collect::<Vec<_>>();
    assert_eq!(ids, vec![1, 3], "criteria came from the capability, not the rule parser");
}

#[tokio::test]
async fn dead_capability_behaves_like_forced_rule_mode() {
    let degraded = AgentRuntime::new(
        AgentMode::Auto,
        Duration::from_secs(60),
        Arc::new(InMemoryCatalog::with_sample_offers()),
        Some(Arc::new(DownCapability)),
    )
    .expect("runtime should build");
    let forced_rules = rule_runtime(InMemoryCatalog::with_sample_offers());

    for query in ["fashion under $60", "electronics", "rating above 4.2"] {
        let from_degraded =
            degraded.advance(query, query).await.expect("degraded turn should run");
        let from_rules =
            forced_rules.advance(query, query).await.expect("rule turn should run");

        assert_eq!(from_degraded.offers, from_rules.offers, "query: {query}");
        assert_eq!(from_degraded.done, from_rules.done, "query: {query}");
    }
}
