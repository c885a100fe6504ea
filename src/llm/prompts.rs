//! Prompt templates for remote skill extraction

use crate::config::PromptSchema;

/// Prompt templates for the two extraction schemas
#[derive(Debug, Clone)]
pub struct PromptTemplates {
    pub categorized: String,
    pub flat: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            categorized: CATEGORIZED_TEMPLATE.to_string(),
            flat: FLAT_TEMPLATE.to_string(),
        }
    }
}

impl PromptTemplates {
    /// Render the extraction prompt for the given schema. The resume text
    /// is truncated to `max_chars` characters before substitution so the
    /// prompt stays inside the model context window.
    pub fn render(&self, schema: PromptSchema, resume_text: &str, max_chars: usize) -> String {
        let template = match schema {
            PromptSchema::Categorized => &self.categorized,
            PromptSchema::Flat => &self.flat,
        };

        let truncated: String = resume_text.chars().take(max_chars).collect();
        template.replace("{resume}", &truncated)
    }
}

const CATEGORIZED_TEMPLATE: &str = r#"You are a professional skill extractor capable of analyzing resumes across all domains: technical, business, creative, academic, and manual trades.

Your task is to return ONLY the skills and tools that are explicitly mentioned in the text below. Use the exact words and avoid making assumptions.

Rules:
1. Only include skills and tools mentioned verbatim in the resume.
2. Do not infer skills from job titles or company names.
3. Follow the exact JSON schema given below without modifications.
4. Extract skills from all sections: experience, education, projects, awards, skills, etc.
5. Categorize skills accurately. If unsure where a skill belongs, place it in "other_technical" or "domain_expertise".

Resume Text:
{resume}

Output JSON format:
{
    "technical_skills": {
        "programming_languages": [],
        "software_tools": [],
        "engineering_skills": [],
        "data_skills": [],
        "design_skills": [],
        "hardware_skills": [],
        "scientific_methods": [],
        "other_technical": []
    },
    "business_skills": {
        "management": [],
        "financial": [],
        "operational": [],
        "administrative": []
    },
    "soft_skills": [],
    "languages": [],
    "certifications": [],
    "domain_expertise": [],
    "creative_skills": [],
    "manual_skills": []
}

Examples:
- "JavaScript" -> programming_languages
- "Docker" -> software_tools
- "UX design" -> design_skills
- "Project Management" -> business_skills.management
- "Spanish" -> languages
- "Certified Scrum Master" -> certifications

REMEMBER: Return only what's visible. Never assume. Never hallucinate."#;

const FLAT_TEMPLATE: &str = r#"You are a professional skill extractor. Return ONLY the skills and tools that are explicitly mentioned in the text below, using the exact words from the text.

Rules:
1. Put every skill or tool mentioned verbatim in the resume into "skills".
2. Put terms that look like skills but that you cannot quote verbatim from the text into "uncertain_terms".
3. Do not infer skills from job titles or company names.
4. Follow the exact JSON schema given below without modifications.

Resume Text:
{resume}

Output JSON format:
{
    "skills": [],
    "uncertain_terms": []
}

REMEMBER: Return only what's visible. Never assume. Never hallucinate."#;
