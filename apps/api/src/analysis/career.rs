//! Career progression, achievement mining and improvement suggestions.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::{Regex, RegexSet};
use serde::{Deserialize, Serialize};

use crate::models::resume::{Experience, ResumeData};

const PROMOTION_KEYWORDS: &[&str] = &["senior", "lead", "manager", "director", "vp", "chief"];

static ACHIEVEMENT_PATTERNS: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([
        r"(?i)(?:increased|improved|enhanced|boosted).*?(\d+%?)",
        r"(?i)(?:reduced|decreased|cut|saved).*?(\d+%?)",
        r"(?i)(?:generated|drove|delivered).*?(\$[\d,]+|\d+%?)",
        r"(?i)(?:managed|led|oversaw).*?(\d+)",
        r"(?i)(?:achieved|accomplished|completed).*",
        r"(?i)(?:awarded|recognized|honored).*",
    ])
    .expect("valid achievement patterns")
});

static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CareerProgression {
    pub progression_type: String,
    pub progression_score: u32,
    pub total_positions: usize,
    pub unique_companies: usize,
}

/// Scores title growth across adjacent roles (newest first).
///
/// A promotion keyword that is new in the later title earns 2 points. A
/// keyword carried over within the same company earns 1.
pub fn analyze_career_progression(experience: &[Experience]) -> CareerProgression {
    if experience.is_empty() {
        return CareerProgression {
            progression_type: "No experience data".to_string(),
            progression_score: 0,
            total_positions: 0,
            unique_companies: 0,
        };
    }

    let mut score = 0;
    for pair in experience.windows(2) {
        let (current, previous) = (&pair[0], &pair[1]);
        let current_title = current.position.to_lowercase();
        let previous_title = previous.position.to_lowercase();

        for keyword in PROMOTION_KEYWORDS {
            if !current_title.contains(keyword) {
                continue;
            }
            if !previous_title.contains(keyword) {
                score += 2;
            } else if current.company == previous.company {
                score += 1;
            }
        }
    }

    let progression_type = match score {
        s if s >= 4 => "Strong upward progression",
        s if s >= 2 => "Steady career growth",
        _ => "Lateral movement or early career",
    };
    let unique_companies = experience
        .iter()
        .map(|e| e.company.as_str())
        .collect::<HashSet<_>>()
        .len();

    CareerProgression {
        progression_type: progression_type.to_string(),
        progression_score: score,
        total_positions: experience.len(),
        unique_companies,
    }
}

/// Quantified or award-style responsibility bullets, followed by the
/// explicit achievements list. Duplicates are dropped, first occurrence wins.
pub fn extract_achievements(resume: &ResumeData) -> Vec<String> {
    let mut seen: HashSet<&String> = HashSet::new();
    resume
        .responsibilities()
        .filter(|r| ACHIEVEMENT_PATTERNS.is_match(r))
        .chain(resume.achievements.iter())
        .filter(|a| seen.insert(*a))
        .cloned()
        .collect()
}

fn is_blank(field: &Option<String>) -> bool {
    field.as_deref().map_or(true, |s| s.trim().is_empty())
}

/// Concrete edits that would make the résumé stronger.
pub fn suggest_improvements(resume: &ResumeData) -> Vec<String> {
    let mut suggestions = Vec::new();
    let info = &resume.personal_info;

    if is_blank(&info.email) {
        suggestions.push("Add email address for contact information".to_string());
    }
    if is_blank(&info.phone) {
        suggestions.push("Add phone number for easier contact".to_string());
    }
    if is_blank(&info.linkedin) {
        suggestions.push("Add LinkedIn profile to showcase professional network".to_string());
    }
    if is_blank(&resume.summary) {
        suggestions
            .push("Add a professional summary to highlight your value proposition".to_string());
    }

    for (i, exp) in resume.experience.iter().enumerate() {
        let company = if exp.company.trim().is_empty() {
            format!("Company {}", i + 1)
        } else {
            exp.company.clone()
        };
        if exp.responsibilities.len() < 3 {
            suggestions.push(format!("Add more details to position at {company}"));
        }
        if !exp.responsibilities.iter().any(|r| DIGITS.is_match(r)) {
            suggestions.push(format!(
                "Add quantifiable achievements for position at {company}"
            ));
        }
    }

    if resume.skills.total() < 10 {
        suggestions.push("Add more relevant skills to improve keyword matching".to_string());
    }

    for edu in &resume.education {
        if is_blank(&edu.end_date) {
            let institution = if edu.institution.trim().is_empty() {
                "education"
            } else {
                edu.institution.as_str()
            };
            suggestions.push(format!("Add graduation date for {institution}"));
        }
    }

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures::{sample_resume, with_education};
    use crate::models::resume::Education;

    fn role(company: &str, position: &str) -> Experience {
        Experience {
            company: company.into(),
            position: position.into(),
            ..Experience::default()
        }
    }

    #[test]
    fn test_progression_empty() {
        let p = analyze_career_progression(&[]);
        assert_eq!(p.progression_type, "No experience data");
        assert_eq!(p.total_positions, 0);
    }

    #[test]
    fn test_progression_strong() {
        let roles = vec![
            role("Acme", "Engineering Director"),
            role("Acme", "Senior Engineering Manager"),
            role("Initech", "Software Engineer"),
        ];
        // director new (+2); senior+manager new over "software engineer" (+4)
        let p = analyze_career_progression(&roles);
        assert_eq!(p.progression_score, 6);
        assert_eq!(p.progression_type, "Strong upward progression");
        assert_eq!(p.total_positions, 3);
        assert_eq!(p.unique_companies, 2);
    }

    #[test]
    fn test_progression_same_company_carry_over() {
        let roles = vec![role("Acme", "Senior Engineer II"), role("Acme", "Senior Engineer")];
        let p = analyze_career_progression(&roles);
        assert_eq!(p.progression_score, 1);
        assert_eq!(p.progression_type, "Lateral movement or early career");

        let roles = vec![role("Acme", "Senior Engineer"), role("Other", "Senior Engineer")];
        assert_eq!(analyze_career_progression(&roles).progression_score, 0);
    }

    #[test]
    fn test_progression_steady() {
        let roles = vec![role("A", "Tech Lead"), role("B", "Developer")];
        let p = analyze_career_progression(&roles);
        assert_eq!(p.progression_score, 2);
        assert_eq!(p.progression_type, "Steady career growth");
    }

    #[test]
    fn test_extract_achievements_dedups_in_order() {
        let mut resume = sample_resume();
        resume.achievements = vec![
            "Managed team of 5 developers".into(),
            "Awarded employee of the year".into(),
        ];
        let achievements = extract_achievements(&resume);
        assert_eq!(
            achievements,
            vec![
                "Led development of microservices architecture reducing latency by 40%",
                "Managed team of 5 developers",
                "Awarded employee of the year",
            ]
        );
    }

    #[test]
    fn test_achievement_patterns_are_case_insensitive() {
        let mut resume = ResumeData::default();
        resume.experience.push(Experience {
            responsibilities: vec![
                "INCREASED revenue 3x".into(),
                "Wrote documentation".into(),
                "completed migration ahead of schedule".into(),
            ],
            ..Experience::default()
        });
        assert_eq!(
            extract_achievements(&resume),
            vec!["INCREASED revenue 3x", "completed migration ahead of schedule"]
        );
    }

    #[test]
    fn test_suggestions_for_sample() {
        let suggestions = suggest_improvements(&sample_resume());
        assert_eq!(
            suggestions,
            vec![
                "Add LinkedIn profile to showcase professional network",
                "Add a professional summary to highlight your value proposition",
                "Add more relevant skills to improve keyword matching",
            ]
        );
    }

    #[test]
    fn test_suggestions_for_thin_positions_and_education() {
        let mut resume = with_education(ResumeData::default());
        resume.experience.push(role("", "Intern"));
        resume.education.push(Education {
            degree: "MSc".into(),
            ..Education::default()
        });

        let suggestions = suggest_improvements(&resume);
        assert!(suggestions.contains(&"Add email address for contact information".to_string()));
        assert!(suggestions.contains(&"Add more details to position at Company 1".to_string()));
        assert!(suggestions
            .contains(&"Add quantifiable achievements for position at Company 1".to_string()));
        assert!(suggestions.contains(&"Add graduation date for education".to_string()));
        assert!(!suggestions
            .iter()
            .any(|s| s == "Add graduation date for State University"));
    }
}
