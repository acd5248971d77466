//! Composite outputs built from the individual analytics: generated
//! summary, cover-letter talking points, résumé comparison and the bundled
//! analysis report.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::analysis::ats::{calculate_ats_score, AtsScore};
use crate::analysis::career::{
    analyze_career_progression, extract_achievements, suggest_improvements, CareerProgression,
};
use crate::analysis::dates::calculate_experience_years;
use crate::analysis::is_stop_word;
use crate::analysis::keywords::{
    calculate_skill_match, extract_industry_keywords, extract_key_skills, words,
};
use crate::models::resume::ResumeData;

const DEFAULT_TOP_SKILLS: usize = 10;

fn latest_position(resume: &ResumeData) -> Option<&str> {
    resume
        .experience
        .first()
        .map(|e| e.position.trim())
        .filter(|p| !p.is_empty())
}

/// One-paragraph professional summary: latest title, total experience,
/// first listed degree, and the three strongest key skills.
///
/// Returns an empty string when the résumé has none of those.
pub fn generate_summary(resume: &ResumeData, as_of: NaiveDate) -> String {
    let years = calculate_experience_years(&resume.experience, as_of);
    let degree = resume
        .education
        .first()
        .map(|e| e.degree.trim())
        .filter(|d| !d.is_empty());

    let mut opening = Vec::new();
    if let Some(position) = latest_position(resume) {
        opening.push(format!("Experienced {position}"));
    }
    if years > 0.0 {
        opening.push(format!("with {years:.1} years of professional experience"));
    }
    if let Some(degree) = degree {
        opening.push(format!("holding a {degree}"));
    }

    let mut sentences = Vec::new();
    if !opening.is_empty() {
        sentences.push(opening.join(" "));
    }
    let skills = extract_key_skills(resume, 5);
    if !skills.is_empty() {
        let top: Vec<&str> = skills.iter().take(3).map(String::as_str).collect();
        sentences.push(format!("Skilled in {}", top.join(", ")));
    }

    if sentences.is_empty() {
        String::new()
    } else {
        format!("{}.", sentences.join(". "))
    }
}

/// Talking points for a cover letter aimed at `job_description`.
pub fn generate_cover_letter_points(
    resume: &ResumeData,
    job_description: &str,
    as_of: NaiveDate,
) -> Vec<String> {
    let mut points = Vec::new();

    if let Some(first) = extract_achievements(resume).into_iter().next() {
        points.push(format!("Key Achievement: {first}"));
    }

    let years = calculate_experience_years(&resume.experience, as_of);
    if years > 0.0 {
        let position = latest_position(resume).unwrap_or_default();
        points.push(format!("{years:.1} years of experience as {position}"));
    }

    let job_keywords: Vec<String> = words(job_description)
        .filter(|w| w.chars().count() > 3 && !is_stop_word(w))
        .collect();
    let matching: Vec<&str> = resume
        .skills
        .iter_all()
        .filter(|skill| {
            let skill = skill.to_lowercase();
            job_keywords.iter().any(|kw| skill.contains(kw.as_str()))
        })
        .map(String::as_str)
        .take(3)
        .collect();
    if !matching.is_empty() {
        points.push(format!("Relevant skills: {}", matching.join(", ")));
    }

    if let Some(edu) = resume.education.first() {
        let degree = edu.degree.trim();
        if !degree.is_empty() {
            match edu.field_of_study.as_deref().map(str::trim) {
                Some(field) if !field.is_empty() => {
                    points.push(format!("Educational background: {degree} in {field}"))
                }
                _ => points.push(format!("Educational background: {degree}")),
            }
        }
    }

    points
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pair<T> {
    pub first: T,
    pub second: T,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillOverlap {
    pub first_only: Vec<String>,
    pub second_only: Vec<String>,
    pub common: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeComparison {
    pub experience_years: Pair<f64>,
    pub skills_count: Pair<usize>,
    pub ats_scores: Pair<AtsScore>,
    pub unique_skills: SkillOverlap,
}

fn skill_set(resume: &ResumeData) -> BTreeSet<String> {
    resume.skills.iter_all().map(|s| s.to_lowercase()).collect()
}

/// Side-by-side comparison. Skill sets are compared case-insensitively and
/// listed in sorted order.
pub fn compare_resumes(first: &ResumeData, second: &ResumeData, as_of: NaiveDate) -> ResumeComparison {
    let a = skill_set(first);
    let b = skill_set(second);

    ResumeComparison {
        experience_years: Pair {
            first: calculate_experience_years(&first.experience, as_of),
            second: calculate_experience_years(&second.experience, as_of),
        },
        skills_count: Pair {
            first: first.skills.total(),
            second: second.skills.total(),
        },
        ats_scores: Pair {
            first: calculate_ats_score(first),
            second: calculate_ats_score(second),
        },
        unique_skills: SkillOverlap {
            first_only: a.difference(&b).cloned().collect(),
            second_only: b.difference(&a).cloned().collect(),
            common: a.intersection(&b).cloned().collect(),
        },
    }
}

/// Optional job context for `analyze`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisOptions {
    #[serde(default)]
    pub job_requirements: Vec<String>,
    #[serde(default)]
    pub job_description: Option<String>,
    #[serde(default)]
    pub top_skills: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub experience_years: f64,
    pub ats_score: AtsScore,
    pub key_skills: Vec<String>,
    pub generated_summary: String,
    pub achievements: Vec<String>,
    pub suggestions: Vec<String>,
    pub career_progression: CareerProgression,
    pub industry_keywords: BTreeMap<String, Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skill_match: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_letter_points: Option<Vec<String>>,
}

/// Runs every analytic over one résumé.
pub fn analyze(resume: &ResumeData, options: &AnalysisOptions, as_of: NaiveDate) -> AnalysisReport {
    let requirements: Vec<String> = options
        .job_requirements
        .iter()
        .map(|r| r.trim())
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect();
    let job_description = options
        .job_description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty());

    AnalysisReport {
        experience_years: calculate_experience_years(&resume.experience, as_of),
        ats_score: calculate_ats_score(resume),
        key_skills: extract_key_skills(resume, options.top_skills.unwrap_or(DEFAULT_TOP_SKILLS)),
        generated_summary: generate_summary(resume, as_of),
        achievements: extract_achievements(resume),
        suggestions: suggest_improvements(resume),
        career_progression: analyze_career_progression(&resume.experience),
        industry_keywords: extract_industry_keywords(resume),
        skill_match: (!requirements.is_empty())
            .then(|| calculate_skill_match(resume, &requirements)),
        cover_letter_points: job_description
            .map(|jd| generate_cover_letter_points(resume, jd, as_of)),
    }
}
