// Resume enhancement analytics.
// Everything here is a pure function over an extracted `ResumeData`.
// Anything that depends on "today" takes an explicit `as_of` date.

pub mod ats;
pub mod career;
pub mod dates;
pub mod handlers;
pub mod keywords;
pub mod report;

use once_cell::sync::Lazy;
use std::collections::HashSet;

pub use report::{analyze, compare_resumes, AnalysisOptions, AnalysisReport, ResumeComparison};

/// Common English function words, ignored by keyword extraction and matching.
const STOP_WORD_LIST: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst", "an",
    "and", "another", "any", "anyhow", "anyone", "anything", "anyway", "anywhere", "are",
    "around", "as", "at", "back", "be", "became", "because", "become", "becomes", "becoming",
    "been", "before", "beforehand", "behind", "being", "below", "beside", "besides", "between",
    "beyond", "both", "but", "by", "can", "cannot", "could", "did", "do", "does", "doing", "done",
    "down", "due", "during", "each", "eg", "either", "else", "elsewhere", "enough", "etc", "even",
    "ever", "every", "everyone", "everything", "everywhere", "except", "few", "for", "former",
    "formerly", "from", "further", "had", "has", "have", "having", "he", "hence", "her", "here",
    "hereafter", "hereby", "herein", "hers", "herself", "him", "himself", "his", "how",
    "however", "i", "ie", "if", "in", "indeed", "into", "is", "it", "its", "itself", "just",
    "last", "latter", "least", "less", "made", "many", "may", "me", "meanwhile", "might", "mine",
    "more", "moreover", "most", "mostly", "much", "must", "my", "myself", "namely", "neither",
    "never", "nevertheless", "next", "no", "nobody", "none", "nor", "not", "nothing", "now",
    "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto", "or", "other",
    "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own", "per", "perhaps",
    "please", "rather", "re", "same", "several", "she", "should", "since", "so", "some",
    "somehow", "someone", "something", "sometime", "sometimes", "somewhere", "still", "such",
    "than", "that", "the", "their", "theirs", "them", "themselves", "then", "thence", "there",
    "thereafter", "thereby", "therefore", "therein", "thereupon", "these", "they", "this",
    "those", "though", "through", "throughout", "thru", "thus", "to", "together", "too",
    "toward", "towards", "under", "until", "up", "upon", "us", "very", "via", "was", "we",
    "well", "were", "what", "whatever", "when", "whence", "whenever", "where", "whereafter",
    "whereas", "whereby", "wherein", "whereupon", "wherever", "whether", "which", "while",
    "whither", "who", "whoever", "whole", "whom", "whose", "why", "will", "with", "within",
    "without", "would", "yet", "you", "your", "yours", "yourself", "yourselves",
];

static STOP_WORDS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| STOP_WORD_LIST.iter().copied().collect());

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(word)
}

/// Rounds half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::models::resume::{Education, Experience, PersonalInfo, ResumeData, Skills};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    /// A mid-career engineer with one current role.
    pub fn sample_resume() -> ResumeData {
        ResumeData {
            personal_info: PersonalInfo {
                name: "John Doe".into(),
                email: Some("john.doe@email.com".into()),
                phone: Some("+1-234-567-8900".into()),
                location: Some("San Francisco, CA".into()),
                ..PersonalInfo::default()
            },
            experience: vec![Experience {
                company: "Tech Corp".into(),
                position: "Senior Software Engineer".into(),
                start_date: Some("2020".into()),
                end_date: Some("Present".into()),
                responsibilities: strings(&[
                    "Led development of microservices architecture reducing latency by 40%",
                    "Managed team of 5 developers",
                    "Implemented CI/CD pipeline using Jenkins and Docker",
                ]),
                ..Experience::default()
            }],
            skills: Skills {
                technical: strings(&["Python", "JavaScript", "Docker", "AWS"]),
                soft: strings(&["Leadership", "Communication"]),
                languages: Vec::new(),
                tools: strings(&["Git", "Jenkins", "Kubernetes"]),
            },
            ..ResumeData::default()
        }
    }

    pub fn with_education(mut resume: ResumeData) -> ResumeData {
        resume.education.push(Education {
            institution: "State University".into(),
            degree: "BSc".into(),
            field_of_study: Some("Computer Science".into()),
            end_date: Some("2015".into()),
            ..Education::default()
        });
        resume
    }
}
