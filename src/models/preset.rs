//! Compiled-in search presets.
//!
//! The table is a `const` and the lookup index is built once on first use; nothing
//! mutates either afterwards.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use serde::Serialize;

/// A named search configuration.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct SearchPreset {
    pub name: &'static str,
    pub group: &'static str,
    pub description: &'static str,
    pub keywords: &'static [&'static str],
    pub query: &'static str,
    /// Recommended minimum score
    pub min_score: u8,
    /// Recommended maximum age in days
    pub max_age_days: u32,
}

/// Display order of preset groups.
pub const GROUPS: &[&str] = &[
    "LLM & NLP",
    "Computer Vision",
    "Machine Learning",
    "Safety & Alignment",
    "Data & Training",
];

const fn preset(
    name: &'static str,
    group: &'static str,
    description: &'static str,
    keywords: &'static [&'static str],
    query: &'static str,
) -> SearchPreset {
    SearchPreset {
        name,
        group,
        description,
        keywords,
        query,
        min_score: 50,
        max_age_days: 180,
    }
}

const PRESET_TABLE: &[SearchPreset] = &[
    // LLM & NLP
    preset(
        "llm-reasoning",
        "LLM & NLP",
        "LLM reasoning and chain-of-thought",
        &["large language model", "reasoning", "chain of thought", "CoT"],
        "large language model reasoning chain of thought",
    ),
    preset(
        "llm-agent",
        "LLM & NLP",
        "LLM-based agents and tool use",
        &["large language model", "agent", "tool use", "planning"],
        "large language model agent tool use planning",
    ),
    preset(
        "llm-eval",
        "LLM & NLP",
        "LLM evaluation and benchmarks",
        &["large language model", "evaluation", "benchmark", "assessment"],
        "large language model evaluation benchmark",
    ),
    preset(
        "rag",
        "LLM & NLP",
        "Retrieval-Augmented Generation",
        &["retrieval augmented generation", "RAG", "knowledge retrieval"],
        "retrieval augmented generation RAG",
    ),
    preset(
        "prompt",
        "LLM & NLP",
        "Prompt engineering and optimization",
        &["prompt engineering", "prompt optimization", "in-context learning"],
        "prompt engineering optimization in-context learning",
    ),
    // Computer Vision
    preset(
        "diffusion",
        "Computer Vision",
        "Diffusion models for image generation",
        &["diffusion model", "image generation", "stable diffusion"],
        "diffusion model image generation",
    ),
    preset(
        "multimodal",
        "Computer Vision",
        "Multimodal learning and vision-language",
        &["multimodal", "vision language", "CLIP", "visual understanding"],
        "multimodal vision language model",
    ),
    preset(
        "video",
        "Computer Vision",
        "Video understanding and generation",
        &["video understanding", "video generation", "temporal modeling"],
        "video understanding generation temporal",
    ),
    // Machine Learning
    preset(
        "transformer",
        "Machine Learning",
        "Transformer architecture improvements",
        &["transformer", "attention mechanism", "efficient transformer"],
        "transformer attention mechanism efficient",
    ),
    preset(
        "finetune",
        "Machine Learning",
        "Fine-tuning and adaptation methods",
        &["fine-tuning", "LoRA", "adapter", "parameter efficient"],
        "fine-tuning LoRA adapter parameter efficient",
    ),
    preset(
        "distill",
        "Machine Learning",
        "Knowledge distillation and compression",
        &["knowledge distillation", "model compression", "pruning", "quantization"],
        "knowledge distillation model compression",
    ),
    preset(
        "rl",
        "Machine Learning",
        "Reinforcement learning",
        &["reinforcement learning", "RLHF", "reward model", "policy optimization"],
        "reinforcement learning RLHF reward model",
    ),
    // Safety & Alignment
    preset(
        "alignment",
        "Safety & Alignment",
        "AI alignment and safety",
        &["AI alignment", "safety", "value alignment", "constitutional AI"],
        "AI alignment safety value",
    ),
    preset(
        "jailbreak",
        "Safety & Alignment",
        "Jailbreak attacks and defenses",
        &["jailbreak", "adversarial attack", "LLM security", "red teaming"],
        "jailbreak adversarial attack LLM security",
    ),
    preset(
        "hallucination",
        "Safety & Alignment",
        "Hallucination detection and mitigation",
        &["hallucination", "factuality", "faithfulness", "grounding"],
        "hallucination detection factuality LLM",
    ),
    // Data & Training
    preset(
        "data-synthesis",
        "Data & Training",
        "Synthetic data generation",
        &["synthetic data", "data augmentation", "data generation"],
        "synthetic data generation augmentation",
    ),
    preset(
        "scaling",
        "Data & Training",
        "Scaling laws and large-scale training",
        &["scaling law", "large scale training", "compute optimal"],
        "scaling law large scale training",
    ),
];

static PRESETS: LazyLock<BTreeMap<&'static str, &'static SearchPreset>> =
    LazyLock::new(|| PRESET_TABLE.iter().map(|p| (p.name, p)).collect());

impl SearchPreset {
    /// Look up a preset by name.
    pub fn get(name: &str) -> Option<&'static SearchPreset> {
        PRESETS.get(name).copied()
    }

    /// All presets sorted by name.
    pub fn all() -> impl Iterator<Item = &'static SearchPreset> {
        PRESETS.values().copied()
    }

    /// Presets of one group, in table order.
    pub fn in_group(group: &str) -> impl Iterator<Item = &'static SearchPreset> + '_ {
        PRESET_TABLE.iter().filter(move |p| p.group == group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_known_preset() {
        let p = SearchPreset::get("rag").unwrap();
        assert_eq!(p.query, "retrieval augmented generation RAG");
        assert_eq!(p.min_score, 50);
        assert_eq!(p.max_age_days, 180);
    }

    #[test]
    fn test_get_unknown_preset() {
        assert!(SearchPreset::get("astrology").is_none());
    }

    #[test]
    fn test_names_are_unique() {
        assert_eq!(SearchPreset::all().count(), PRESET_TABLE.len());
    }

    #[test]
    fn test_every_preset_belongs_to_a_listed_group() {
        let grouped: usize = GROUPS.iter().map(|g| SearchPreset::in_group(g).count()).sum();
        assert_eq!(grouped, PRESET_TABLE.len());
    }
}
