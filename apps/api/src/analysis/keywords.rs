//! Keyword statistics: key-skill ranking, requirement matching and
//! industry detection.

use std::collections::{BTreeMap, HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::analysis::{is_stop_word, round_to};
use crate::models::resume::ResumeData;

static TERM: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("valid regex"));

const INDUSTRY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "tech",
        &["software", "development", "programming", "api", "database", "cloud", "agile", "devops"],
    ),
    (
        "finance",
        &["financial", "analysis", "investment", "portfolio", "risk", "compliance", "audit"],
    ),
    (
        "marketing",
        &["marketing", "campaign", "seo", "social media", "brand", "content", "analytics"],
    ),
    (
        "healthcare",
        &["patient", "clinical", "medical", "healthcare", "diagnosis", "treatment", "care"],
    ),
    (
        "education",
        &["teaching", "curriculum", "student", "learning", "education", "training", "instruction"],
    ),
];

/// Splits free text into lowercase words. Surrounding punctuation is
/// stripped; `+` and `#` survive so `c++` and `c#` stay intact.
pub(crate) fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric() && c != '+' && c != '#')
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
}

/// Text the keyword ranking looks at: responsibilities, every skill, and
/// project descriptions and technologies.
fn skills_corpus(resume: &ResumeData) -> String {
    let mut parts: Vec<&str> = resume.responsibilities().map(String::as_str).collect();
    parts.extend(resume.skills.iter_all().map(String::as_str));
    for project in &resume.projects {
        parts.push(&project.description);
        parts.push(&project.technologies);
    }
    parts.join(" ").to_lowercase()
}

/// Most prominent unigrams and bigrams in the résumé.
///
/// With a single document every term shares the same inverse document
/// frequency, so TF-IDF ranking reduces to raw term frequency. Stop words
/// are removed before bigrams are formed. Ties are broken alphabetically.
pub fn extract_key_skills(resume: &ResumeData, top_n: usize) -> Vec<String> {
    let corpus = skills_corpus(resume);
    let tokens: Vec<&str> = TERM
        .find_iter(&corpus)
        .map(|m| m.as_str())
        .filter(|t| !is_stop_word(t))
        .collect();

    let mut counts: HashMap<String, usize> = HashMap::new();
    for token in &tokens {
        *counts.entry((*token).to_string()).or_default() += 1;
    }
    for pair in tokens.windows(2) {
        *counts.entry(format!("{} {}", pair[0], pair[1])).or_default() += 1;
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(top_n);
    ranked.into_iter().map(|(term, _)| term).collect()
}

/// Percentage of `requirements` found in the résumé, rounded to 2 decimals.
///
/// The résumé side is every listed skill plus every non-stop word longer
/// than two characters from the responsibilities. A requirement matches
/// when it occurs inside any of those (case-insensitive).
pub fn calculate_skill_match(resume: &ResumeData, requirements: &[String]) -> f64 {
    if requirements.is_empty() {
        return 0.0;
    }

    let mut resume_terms: HashSet<String> =
        resume.skills.iter_all().map(|s| s.to_lowercase()).collect();
    for responsibility in resume.responsibilities() {
        resume_terms.extend(
            words(responsibility).filter(|w| w.chars().count() > 2 && !is_stop_word(w)),
        );
    }

    let matches = requirements
        .iter()
        .map(|r| r.trim().to_lowercase())
        .filter(|req| resume_terms.iter().any(|term| term.contains(req.as_str())))
        .count();

    round_to(matches as f64 / requirements.len() as f64 * 100.0, 2)
}

/// Industries whose keywords appear in responsibilities or skills, with the
/// keywords that matched. Industries with no hits are omitted.
pub fn extract_industry_keywords(resume: &ResumeData) -> BTreeMap<String, Vec<String>> {
    let text = resume
        .responsibilities()
        .chain(resume.skills.iter_all())
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    INDUSTRY_KEYWORDS
        .iter()
        .filter_map(|(industry, keywords)| {
            let hits: Vec<String> = keywords
                .iter()
                .filter(|kw| text.contains(**kw))
                .map(|kw| kw.to_string())
                .collect();
            (!hits.is_empty()).then(|| (industry.to_string(), hits))
        })
        .collect()
}
