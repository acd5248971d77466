// Resume extraction prompt.

pub const RESUME_EXTRACTION_PROMPT: &str = r#"You are an expert resume parser. Extract all information from the following resume and return it in valid JSON format.

IMPORTANT RULES:
1. Extract ALL information present in the resume
2. Use "Present" for current positions
3. Extract dates in original format found in resume
4. Preserve exact wording for job responsibilities
5. Categorize skills appropriately
6. Return ONLY valid JSON, no explanations

Required JSON structure:
{
    "personal_info": {
        "name": "",
        "email": "",
        "phone": "",
        "location": "",
        "linkedin": "",
        "github": "",
        "website": ""
    },
    "summary": "",
    "experience": [
        {
            "company": "",
            "position": "",
            "start_date": "",
            "end_date": "",
            "location": "",
            "responsibilities": []
        }
    ],
    "education": [
        {
            "institution": "",
            "degree": "",
            "field_of_study": "",
            "start_date": "",
            "end_date": "",
            "gpa": "",
            "location": ""
        }
    ],
    "skills": {
        "technical": [],
        "soft": [],
        "languages": [],
        "tools": []
    },
    "certifications": [],
    "projects": [
        {
            "name": "",
            "description": "",
            "technologies": "",
            "link": ""
        }
    ],
    "achievements": []
}

Resume text:
{resume_text}

Return ONLY the JSON:"#;

pub fn build_extraction_prompt(resume_text: &str) -> String {
    RESUME_EXTRACTION_PROMPT.replace("{resume_text}", resume_text)
}
