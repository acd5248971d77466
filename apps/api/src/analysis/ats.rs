//! ATS compatibility score.
//!
//! Five sections add up to 100 points:
//! personal info 20, experience 30, education 15, skills 20, keywords 15.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::analysis::round_to;
use crate::models::resume::ResumeData;

pub const MAX_ATS_SCORE: u32 = 100;

const ACTION_VERBS: &[&str] = &["managed", "led", "developed", "created", "implemented", "achieved"];

static QUANTIFIED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+%|\$\d+|\d+\+").expect("valid regex"));

/// Points earned per section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AtsBreakdown {
    pub personal_info: u32,
    pub experience: u32,
    pub education: u32,
    pub skills: u32,
    pub keywords: u32,
}

impl AtsBreakdown {
    pub fn total(&self) -> u32 {
        self.personal_info + self.experience + self.education + self.skills + self.keywords
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtsScore {
    pub total_score: u32,
    pub max_score: u32,
    pub percentage: f64,
    pub breakdown: AtsBreakdown,
}

fn present(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|s| !s.trim().is_empty())
}

fn personal_info_points(resume: &ResumeData) -> u32 {
    let info = &resume.personal_info;
    [
        !info.name.trim().is_empty(),
        present(&info.email),
        present(&info.phone),
        present(&info.location),
    ]
    .into_iter()
    .filter(|ok| *ok)
    .count() as u32
        * 5
}

fn experience_points(resume: &ResumeData) -> u32 {
    let experience = &resume.experience;
    if experience.is_empty() {
        return 0;
    }
    let mut points = 10;
    if experience.iter().all(|e| present(&e.start_date)) {
        points += 10;
    }
    if experience.iter().all(|e| e.responsibilities.len() >= 2) {
        points += 10;
    }
    points
}

fn education_points(resume: &ResumeData) -> u32 {
    let education = &resume.education;
    if education.is_empty() {
        return 0;
    }
    let complete = education
        .iter()
        .all(|e| !e.degree.trim().is_empty() && !e.institution.trim().is_empty());
    if complete {
        15
    } else {
        10
    }
}

fn skills_points(resume: &ResumeData) -> u32 {
    match resume.skills.total() {
        n if n >= 10 => 20,
        n if n >= 5 => 10,
        _ => 0,
    }
}

fn keyword_points(resume: &ResumeData) -> u32 {
    let text = resume
        .responsibilities()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let mut points = 0;
    if ACTION_VERBS.iter().any(|verb| text.contains(verb)) {
        points += 10;
    }
    if QUANTIFIED.is_match(&text) {
        points += 5;
    }
    points
}

/// Scores how well the résumé's structure suits applicant tracking systems.
pub fn calculate_ats_score(resume: &ResumeData) -> AtsScore {
    let breakdown = AtsBreakdown {
        personal_info: personal_info_points(resume),
        experience: experience_points(resume),
        education: education_points(resume),
        skills: skills_points(resume),
        keywords: keyword_points(resume),
    };
    let total_score = breakdown.total();

    AtsScore {
        total_score,
        max_score: MAX_ATS_SCORE,
        percentage: round_to(total_score as f64 / MAX_ATS_SCORE as f64 * 100.0, 2),
        breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fixtures::{sample_resume, with_education};
    use crate::models::resume::Education;

    #[test]
    fn test_sample_resume_breakdown() {
        let score = calculate_ats_score(&sample_resume());
        assert_eq!(
            score.breakdown,
            AtsBreakdown {
                personal_info: 20,
                experience: 30,
                education: 0,
                skills: 10,
                keywords: 15,
            }
        );
        assert_eq!(score.total_score, 75);
        assert_eq!(score.max_score, 100);
        assert_eq!(score.percentage, 75.0);
    }

    #[test]
    fn test_empty_resume_scores_zero() {
        let score = calculate_ats_score(&ResumeData::default());
        assert_eq!(score.total_score, 0);
        assert_eq!(score.breakdown, AtsBreakdown::default());
    }

    #[test]
    fn test_education_partial_credit() {
        let mut resume = with_education(sample_resume());
        assert_eq!(calculate_ats_score(&resume).breakdown.education, 15);

        resume.education.push(Education {
            institution: "Bootcamp".into(),
            ..Education::default()
        });
        assert_eq!(calculate_ats_score(&resume).breakdown.education, 10);
    }

    #[test]
    fn test_undated_role_loses_points() {
        let mut resume = sample_resume();
        resume.experience[0].start_date = None;
        resume.experience[0].responsibilities.truncate(1);
        assert_eq!(calculate_ats_score(&resume).breakdown.experience, 10);
    }

    #[test]
    fn test_keyword_points() {
        let mut resume = sample_resume();
        resume.experience[0].responsibilities = vec!["Wrote docs".into(), "Saved $300".into()];
        assert_eq!(calculate_ats_score(&resume).breakdown.keywords, 5);

        resume.experience[0].responsibilities = vec!["Developed tooling".into()];
        assert_eq!(calculate_ats_score(&resume).breakdown.keywords, 10);
    }

    #[test]
    fn test_ten_skills_earn_full_points() {
        let mut resume = sample_resume();
        resume.skills.languages.push("Spanish".into());
        assert_eq!(calculate_ats_score(&resume).breakdown.skills, 20);
    }
}
