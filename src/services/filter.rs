// src/services/filter.rs

//! Two-level quality assessment.
//!
//! Level 1 is a hard gate: a paper needs at least one strong signal (acceptance, DOI,
//! journal reference or broad empirical vocabulary) and at least two evaluation keywords.
//! Level 2 is an additive 0-100 score built from [`SCORE_RULES`], applied in table order.
//! Everything here is pure; a [`QualityFilter`] can be shared freely across tasks.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{FilterConfig, LinkType, Paper};

/// Keyword tables. All entries are lower case.
pub mod rules {
    pub const EVALUATION: &[&str] = &[
        "evaluation",
        "experiment",
        "benchmark",
        "ablation",
        "baseline",
        "dataset",
        "metric",
    ];
    pub const ABLATION_BASELINE: &[&str] = &["ablation", "baseline"];
    pub const DATASET_BENCHMARK: &[&str] = &["dataset", "benchmark"];
    pub const LIMITATION: &[&str] = &["limitation", "assumption", "constraint"];
    pub const HYPE: &[&str] = &["revolutionary", "groundbreaking", "first ever", "first-ever"];
    pub const FRAMEWORK: &[&str] = &["framework", "perspective"];

    /// Evaluation keywords needed for the gate's minimum.
    pub const MIN_EVALUATION: usize = 2;
    /// Evaluation keywords that count as strong empirical evidence.
    pub const STRONG_EVALUATION: usize = 3;

    pub const DEFAULT_MIN_SCORE: u8 = 60;
}

static ACCEPTED_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(accepted|to appear|camera[- ]?ready|proceedings)")
        .expect("accepted pattern is valid")
});

static CODE_REPO_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://(github\.com|gitlab\.com)/\S+").expect("code repo pattern is valid")
});

/// Per-paper facts the gate and the score rules look at.
pub struct Signals<'a> {
    paper: &'a Paper,
    abstract_lower: String,
    title_lower: String,
    eval_count: usize,
    accepted: bool,
}

impl<'a> Signals<'a> {
    pub fn from_paper(paper: &'a Paper) -> Self {
        let abstract_lower = paper.abstract_text.to_lowercase();
        let title_lower = paper.title.to_lowercase();
        let eval_count = count_keywords(&abstract_lower, rules::EVALUATION);
        let accepted = ACCEPTED_PATTERN.is_match(&paper.comments);

        Self {
            paper,
            abstract_lower,
            title_lower,
            eval_count,
            accepted,
        }
    }

    /// Distinct evaluation keywords found in the abstract.
    pub fn eval_count(&self) -> usize {
        self.eval_count
    }

    pub fn has_accepted_signal(&self) -> bool {
        self.accepted
    }

    pub fn has_publication_ref(&self) -> bool {
        !self.paper.doi.is_empty() || !self.paper.journal_ref.is_empty()
    }

    fn abstract_has_any(&self, keywords: &[&str]) -> bool {
        contains_any(&self.abstract_lower, keywords)
    }

    fn has_hype(&self) -> bool {
        contains_any(&self.abstract_lower, rules::HYPE) || contains_any(&self.title_lower, rules::HYPE)
    }

    /// A repository URL in the abstract or comments, or among the links.
    pub fn has_code_link(&self) -> bool {
        let paper = self.paper;
        CODE_REPO_PATTERN.is_match(&paper.abstract_text)
            || CODE_REPO_PATTERN.is_match(&paper.comments)
            || paper
                .links
                .iter()
                .any(|l| l.link_type == LinkType::Code || CODE_REPO_PATTERN.is_match(&l.url))
    }

    /// Level 1 gate.
    pub fn passes_gate(&self) -> bool {
        let strong_signal = self.accepted
            || self.has_publication_ref()
            || self.eval_count >= rules::STRONG_EVALUATION;
        strong_signal && self.eval_count >= rules::MIN_EVALUATION
    }
}

/// One additive scoring rule.
pub struct ScoreRule {
    pub delta: i32,
    pub label: &'static str,
    pub applies: fn(&Signals<'_>) -> bool,
}

impl ScoreRule {
    /// Rendered contribution, e.g. `"+30 acceptance signal"`.
    pub fn detail(&self) -> String {
        format!("{:+} {}", self.delta, self.label)
    }
}

/// Level 2 rules in evaluation order. Hype looks at title and abstract, the framework
/// penalty only at the abstract.
pub const SCORE_RULES: &[ScoreRule] = &[
    ScoreRule {
        delta: 30,
        label: "acceptance signal",
        applies: |s| s.has_accepted_signal(),
    },
    ScoreRule {
        delta: 20,
        label: "DOI/journal reference",
        applies: |s| s.has_publication_ref(),
    },
    ScoreRule {
        delta: 15,
        label: "strong empirical evidence",
        applies: |s| s.eval_count() >= rules::STRONG_EVALUATION,
    },
    ScoreRule {
        delta: 10,
        label: "ablation/baseline study",
        applies: |s| s.abstract_has_any(rules::ABLATION_BASELINE),
    },
    ScoreRule {
        delta: 10,
        label: "dataset/benchmark",
        applies: |s| s.abstract_has_any(rules::DATASET_BENCHMARK),
    },
    ScoreRule {
        delta: 10,
        label: "code link present",
        applies: |s| s.has_code_link(),
    },
    ScoreRule {
        delta: 5,
        label: "limitation discussion",
        applies: |s| s.abstract_has_any(rules::LIMITATION),
    },
    ScoreRule {
        delta: 5,
        label: "multi-version iteration",
        applies: |s| s.paper.version() >= 2,
    },
    ScoreRule {
        delta: -10,
        label: "hype language",
        applies: |s| s.has_hype(),
    },
    ScoreRule {
        delta: -25,
        label: "unvalidated framework claim",
        applies: |s| s.abstract_has_any(rules::FRAMEWORK) && s.eval_count() == 0,
    },
];

/// Level 2 score with its ordered contributions.
pub fn score(signals: &Signals<'_>) -> (u8, Vec<String>) {
    let mut total = 0i32;
    let mut details = Vec::new();

    for rule in SCORE_RULES.iter().filter(|r| (r.applies)(signals)) {
        total += rule.delta;
        details.push(rule.detail());
    }

    // clamp keeps the value in 0..=100, so the cast is lossless
    (total.clamp(0, 100) as u8, details)
}

fn count_keywords(text_lower: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|kw| text_lower.contains(*kw)).count()
}

fn contains_any(text_lower: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|kw| text_lower.contains(kw))
}

/// Outcome of assessing one paper.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterResult {
    pub paper: Paper,
    pub passed_level1: bool,
    pub score: u8,
    pub details: Vec<String>,
}

impl FilterResult {
    /// Whether the paper clears both levels at `min_score`.
    pub fn passes(&self, min_score: u8) -> bool {
        self.passed_level1 && self.score >= min_score
    }
}

/// Quality gate plus scorer with a pass threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityFilter {
    pub min_score: u8,
}

impl Default for QualityFilter {
    fn default() -> Self {
        Self {
            min_score: rules::DEFAULT_MIN_SCORE,
        }
    }
}

impl QualityFilter {
    pub fn new(min_score: u8) -> Self {
        Self { min_score }
    }

    pub fn from_config(config: &FilterConfig) -> Self {
        Self::new(config.min_score)
    }

    /// Assess one paper.
    pub fn evaluate(&self, paper: &Paper) -> FilterResult {
        let signals = Signals::from_paper(paper);
        let passed_level1 = signals.passes_gate();
        let (score, details) = score(&signals);

        FilterResult {
            paper: paper.clone(),
            passed_level1,
            score,
            details,
        }
    }

    /// Assess every paper, in input order.
    pub fn apply(&self, papers: &[Paper]) -> Vec<FilterResult> {
        papers.iter().map(|p| self.evaluate(p)).collect()
    }

    /// Papers passing both levels, in input order, with score and details attached.
    pub fn filter_passed(&self, papers: &[Paper]) -> Vec<Paper> {
        self.select(self.apply(papers))
    }

    /// Keep the passing results and attach their score to the paper.
    pub fn select(&self, results: Vec<FilterResult>) -> Vec<Paper> {
        results
            .into_iter()
            .filter(|r| r.passes(self.min_score))
            .map(|r| Paper {
                score: r.score,
                score_details: r.details,
                ..r.paper
            })
            .collect()
    }
}
