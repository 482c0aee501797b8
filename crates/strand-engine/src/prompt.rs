//! Prompt builders and AI reply payloads
//!
//! The generator contract is camelCase JSON: mutations come back as an
//! array of `{title, description, mutationRationale}`, syntheses as one
//! `{mergedTitle, mergedDescription, thematicBridge, retainedElements}`
//! object. Replies are often fenced in markdown; parsing strips that.

use serde::Deserialize;
use std::collections::HashMap;
use strand_types::record::{Idea, IdeaSourceSummary};

pub(crate) const CROSSOVER_SYSTEM_PROMPT: &str = "You are a product strategist breeding app \
concepts. Given two parent ideas, invent hybrid concepts that genuinely combine the core \
mechanics and audiences of both parents. Reply with only a JSON array of objects with keys \
title, description, mutationRationale.";

pub(crate) const REPURPOSING_SYSTEM_PROMPT: &str = "You are a product strategist repurposing an \
app concept. Transplant the parent idea's core mechanic into new domains, market segments, or \
platforms while keeping what makes it work. Reply with only a JSON array of objects with keys \
title, description, mutationRationale.";

pub(crate) const SYNTHESIS_SYSTEM_PROMPT: &str = "You are a product strategist merging several \
selected app concepts into one coherent pitch. Find the theme that bridges them and keep the \
strongest elements of each. Reply with only a JSON object with keys mergedTitle, \
mergedDescription, thematicBridge, and retainedElements (a map from source id to an array of \
kept feature names).";

/// One mutation variant as returned by the generator
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MutationReply {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub mutation_rationale: String,
}

/// The merged pitch as returned by the generator
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SynthesisReply {
    pub merged_title: String,
    pub merged_description: String,
    #[serde(default)]
    pub thematic_bridge: String,
    #[serde(default)]
    pub retained_elements: HashMap<String, Vec<String>>,
}

pub(crate) fn crossover_user_prompt(primary: &Idea, secondary: &Idea, count: usize) -> String {
    format!(
        "Create {count} hybrid concepts from these two parents.\n\n\
         Parent A: {}\n{}\nKeywords: {}\n\n\
         Parent B: {}\n{}\nKeywords: {}",
        primary.title,
        primary.description,
        primary.dna.join(", "),
        secondary.title,
        secondary.description,
        secondary.dna.join(", "),
    )
}

pub(crate) fn repurposing_user_prompt(parent: &Idea, count: usize) -> String {
    format!(
        "Create {count} repurposed concepts from this parent.\n\n\
         Parent: {}\n{}\nKeywords: {}",
        parent.title,
        parent.description,
        parent.dna.join(", "),
    )
}

pub(crate) fn synthesis_user_prompt(sources: &[IdeaSourceSummary]) -> String {
    let mut prompt = String::from("Merge these selected concepts into one pitch.\n");
    for source in sources {
        prompt.push_str(&format!(
            "\nSource {}: {}\n{}\nKey features: {}\n",
            source.id,
            source.title,
            source.description,
            source.key_features.join(", "),
        ));
    }
    prompt
}

/// Strip a surrounding markdown code fence, if any
pub(crate) fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let trimmed = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    trimmed.strip_suffix("```").unwrap_or(trimmed).trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use strand_types::SessionId;

    #[test]
    fn mutation_reply_parses_camel_case() {
        let raw = r#"[{"title":"t","description":"d","mutationRationale":"r"}]"#;
        let replies: Vec<MutationReply> = serde_json::from_str(raw).unwrap();
        assert_eq!(replies[0].mutation_rationale, "r");
    }

    #[test]
    fn synthesis_reply_defaults_optional_fields() {
        let raw = r#"{"mergedTitle":"t","mergedDescription":"d"}"#;
        let reply: SynthesisReply = serde_json::from_str(raw).unwrap();
        assert!(reply.thematic_bridge.is_empty());
        assert!(reply.retained_elements.is_empty());
    }

    #[test]
    fn fences_are_stripped() {
        assert_eq!(strip_code_fences("```json\n[]\n```"), "[]");
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("  [1]  "), "[1]");
    }

    #[test]
    fn prompts_embed_parent_content() {
        let session = SessionId::new();
        let a = Idea::new(session, "Alpha", "desc a", 1, vec!["ai".into()]);
        let b = Idea::new(session, "Beta", "desc b", 1, vec!["iot".into()]);

        let crossover = crossover_user_prompt(&a, &b, 3);
        assert!(crossover.contains("Alpha"));
        assert!(crossover.contains("Beta"));
        assert!(crossover.contains("ai"));

        let repurpose = repurposing_user_prompt(&a, 2);
        assert!(repurpose.contains("desc a"));
    }
}
