use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::models::lenient;

/// Name written into the fallback record when the model output cannot be parsed.
pub const PLACEHOLDER_NAME: &str = "Error parsing resume";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub linkedin: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub github: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub website: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    #[serde(default, deserialize_with = "lenient::string")]
    pub company: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub position: String,
    #[serde(default, deserialize_with = "lenient::opt_date")]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_date")]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub responsibilities: Vec<String>,
}

impl Experience {
    /// True when the role has no end yet (`end_date == "Present"`).
    pub fn is_current(&self) -> bool {
        self.end_date
            .as_deref()
            .map(lenient::is_present_marker)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Education {
    #[serde(default, deserialize_with = "lenient::string")]
    pub institution: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub degree: String,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub field_of_study: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub gpa: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Skills {
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub technical: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub soft: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub languages: Vec<String>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub tools: Vec<String>,
}

impl Skills {
    /// All skills across technical, soft, languages and tools, in that order.
    pub fn iter_all(&self) -> impl Iterator<Item = &String> {
        self.technical
            .iter()
            .chain(&self.soft)
            .chain(&self.languages)
            .chain(&self.tools)
    }

    pub fn total(&self) -> usize {
        self.technical.len() + self.soft.len() + self.languages.len() + self.tools.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient::joined_string")]
    pub technologies: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub link: String,
}

/// The structured résumé record returned by the extraction endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeData {
    #[serde(default, deserialize_with = "lenient::object_or_default")]
    pub personal_info: PersonalInfo,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "object_list")]
    pub experience: Vec<Experience>,
    #[serde(default, deserialize_with = "object_list")]
    pub education: Vec<Education>,
    #[serde(default, deserialize_with = "lenient::object_or_default")]
    pub skills: Skills,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub certifications: Vec<String>,
    #[serde(default, deserialize_with = "project_list")]
    pub projects: Vec<Project>,
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub achievements: Vec<String>,
}

impl ResumeData {
    /// Minimal record used when the model output cannot be recovered.
    pub fn placeholder() -> Self {
        Self {
            personal_info: PersonalInfo {
                name: PLACEHOLDER_NAME.to_string(),
                ..PersonalInfo::default()
            },
            ..Self::default()
        }
    }

    /// All responsibility bullets across every position.
    pub fn responsibilities(&self) -> impl Iterator<Item = &String> {
        self.experience.iter().flat_map(|e| e.responsibilities.iter())
    }
}

/// Keeps the list items that deserialize; drops the rest.
fn object_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter(Value::is_object)
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

/// Like `object_list`, but a bare string item becomes a project with that name.
fn project_list<'de, D>(deserializer: D) -> Result<Vec<Project>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(name) => lenient::non_blank(name).map(|name| Project {
                    name,
                    ..Project::default()
                }),
                Value::Object(_) => serde_json::from_value(item).ok(),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}
