//! Explanation service with a primary -> secondary -> canned fallback chain
//!
//! Explanations are an overlay on top of the engine's numbers. Every public
//! method returns displayable text; generator failures are logged and
//! absorbed here, never propagated.

use crate::core::error::{ExplorerError, Result};
use crate::explorer::SliderChangeEvent;
use crate::indicators::IndicatorVector;
use crate::llm::client::TextGenerator;
use crate::llm::context::IndicatorContext;
use crate::llm::prompts::{
    country_insight_prompt, fallback_facts, fallback_insight, parse_numbered_facts,
    question_prompt, slider_facts_prompt, EXPLAIN_SYSTEM_PROMPT,
};

pub struct ExplanationService<G> {
    primary: G,
    secondary: Option<G>,
}

impl<G: TextGenerator> ExplanationService<G> {
    pub fn new(primary: G) -> Self {
        Self {
            primary,
            secondary: None,
        }
    }

    /// Generator tried when the primary one fails
    pub fn with_secondary(mut self, secondary: G) -> Self {
        self.secondary = Some(secondary);
        self
    }

    /// Facts about one slider change; falls back to canned facts
    pub async fn slider_facts(&self, change: &SliderChangeEvent) -> Vec<String> {
        let prompt = slider_facts_prompt(change);
        match self.generate(&prompt).await {
            Some(text) => {
                let facts = parse_numbered_facts(&text);
                if facts.is_empty() {
                    tracing::warn!("Explanation reply had no numbered facts, using defaults");
                    fallback_facts(change)
                } else {
                    facts
                }
            }
            None => fallback_facts(change),
        }
    }

    /// Short overview of a country's current statistics
    pub async fn country_insight(&self, country: &str, values: &IndicatorVector) -> String {
        let ctx = IndicatorContext::new(country, *values);
        self.generate(&country_insight_prompt(&ctx))
            .await
            .map(|text| text.trim().to_string())
            .unwrap_or_else(|| fallback_insight(country))
    }

    /// Free-text answer; falls back to the raw statistics
    pub async fn ask(&self, question: &str, ctx: &IndicatorContext) -> String {
        self.generate(&question_prompt(question, ctx))
            .await
            .map(|text| text.trim().to_string())
            .unwrap_or_else(|| ctx.summary())
    }

    /// Walk the chain; `None` means every generator failed
    async fn generate(&self, prompt: &str) -> Option<String> {
        match non_empty(self.primary.complete(EXPLAIN_SYSTEM_PROMPT, prompt).await) {
            Ok(text) => return Some(text),
            Err(e) => tracing::warn!("Primary explanation call failed: {}", e),
        }

        let secondary = self.secondary.as_ref()?;
        match non_empty(secondary.complete(EXPLAIN_SYSTEM_PROMPT, prompt).await) {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!("Secondary explanation call failed: {}", e);
                None
            }
        }
    }
}

fn non_empty(result: Result<String>) -> Result<String> {
    match result {
        Ok(text) if text.trim().is_empty() => Err(ExplorerError::LlmError("Empty response".into())),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::FieldId;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Canned {
        reply: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl Canned {
        fn ok(reply: &'static str) -> Self {
            Self {
                reply: Some(reply),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                reply: None,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl TextGenerator for Canned {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply
                .map(str::to_string)
                .ok_or_else(|| ExplorerError::LlmError("offline".into()))
        }
    }

    fn change() -> SliderChangeEvent {
        SliderChangeEvent {
            field: FieldId::AirQuality,
            old_value: 35.0,
            new_value: 60.0,
            country: "China".into(),
            resulting: IndicatorVector::new(78.2, 60.0, 58.0, 0.2, 12_720.0, 8.0),
        }
    }

    #[tokio::test]
    async fn test_primary_success_skips_secondary() {
        let service = ExplanationService::new(Canned::ok("1. One.\n2. Two."))
            .with_secondary(Canned::failing());
        let facts = service.slider_facts(&change()).await;
        assert_eq!(facts, vec!["One.", "Two."]);
        assert_eq!(service.secondary.as_ref().unwrap().calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_secondary_used_when_primary_fails() {
        let service = ExplanationService::new(Canned::failing())
            .with_secondary(Canned::ok("China is industrialising fast."));
        let insight = service.country_insight("China", &change().resulting).await;
        assert_eq!(insight, "China is industrialising fast.");
        assert_eq!(service.primary.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_canned_facts_when_all_fail() {
        let service =
            ExplanationService::new(Canned::failing()).with_secondary(Canned::failing());
        let facts = service.slider_facts(&change()).await;
        assert_eq!(facts, fallback_facts(&change()));
    }

    #[tokio::test]
    async fn test_unnumbered_reply_uses_canned_facts() {
        let service = ExplanationService::new(Canned::ok("Air quality matters a lot."));
        let facts = service.slider_facts(&change()).await;
        assert_eq!(facts.len(), 3);
    }

    #[tokio::test]
    async fn test_blank_primary_reply_falls_through() {
        let service = ExplanationService::new(Canned::ok("   "))
            .with_secondary(Canned::ok("Answer from backup."));
        let ctx = IndicatorContext::new("China", change().resulting);
        assert_eq!(service.ask("why?", &ctx).await, "Answer from backup.");
    }

    #[tokio::test]
    async fn test_ask_falls_back_to_statistics() {
        let service = ExplanationService::new(Canned::failing());
        let ctx = IndicatorContext::new("China", change().resulting);
        let answer = service.ask("What drives emissions?", &ctx).await;
        assert_eq!(answer, ctx.summary());
        assert!(answer.contains("Carbon Emissions"));
    }

    #[tokio::test]
    async fn test_insight_fallback_welcomes_country() {
        let service = ExplanationService::new(Canned::failing());
        let values = crate::indicators::IndicatorStore::default_vector();
        let insight = service.country_insight("Chad", &values).await;
        assert!(insight.starts_with("Welcome to Chad!"));
    }
}
