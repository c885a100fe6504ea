//! Skill extraction schema: the fixed response shapes and their helpers

use serde::{Deserialize, Serialize};

/// Nested technical skill categories. Every key is always present on the
/// wire; missing keys deserialize to empty lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TechnicalSkills {
    #[serde(default)]
    pub programming_languages: Vec<String>,
    #[serde(default)]
    pub software_tools: Vec<String>,
    #[serde(default)]
    pub engineering_skills: Vec<String>,
    #[serde(default)]
    pub data_skills: Vec<String>,
    #[serde(default)]
    pub design_skills: Vec<String>,
    #[serde(default)]
    pub hardware_skills: Vec<String>,
    #[serde(default)]
    pub scientific_methods: Vec<String>,
    #[serde(default)]
    pub other_technical: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusinessSkills {
    #[serde(default)]
    pub management: Vec<String>,
    #[serde(default)]
    pub financial: Vec<String>,
    #[serde(default)]
    pub operational: Vec<String>,
    #[serde(default)]
    pub administrative: Vec<String>,
}

/// The categorized skills schema. `SkillProfile::default()` is the empty
/// template: all category keys present, all lists empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillProfile {
    #[serde(default)]
    pub technical_skills: TechnicalSkills,
    #[serde(default)]
    pub business_skills: BusinessSkills,
    #[serde(default)]
    pub soft_skills: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub domain_expertise: Vec<String>,
    #[serde(default)]
    pub creative_skills: Vec<String>,
    #[serde(default)]
    pub manual_skills: Vec<String>,
}

impl SkillProfile {
    /// All category lists in schema order.
    pub fn lists(&self) -> Vec<&Vec<String>> {
        vec![
            &self.technical_skills.programming_languages,
            &self.technical_skills.software_tools,
            &self.technical_skills.engineering_skills,
            &self.technical_skills.data_skills,
            &self.technical_skills.design_skills,
            &self.technical_skills.hardware_skills,
            &self.technical_skills.scientific_methods,
            &self.technical_skills.other_technical,
            &self.business_skills.management,
            &self.business_skills.financial,
            &self.business_skills.operational,
            &self.business_skills.administrative,
            &self.soft_skills,
            &self.languages,
            &self.certifications,
            &self.domain_expertise,
            &self.creative_skills,
            &self.manual_skills,
        ]
    }

    /// Mutable view of every category list, same order as `lists`.
    pub fn lists_mut(&mut self) -> Vec<&mut Vec<String>> {
        vec![
            &mut self.technical_skills.programming_languages,
            &mut self.technical_skills.software_tools,
            &mut self.technical_skills.engineering_skills,
            &mut self.technical_skills.data_skills,
            &mut self.technical_skills.design_skills,
            &mut self.technical_skills.hardware_skills,
            &mut self.technical_skills.scientific_methods,
            &mut self.technical_skills.other_technical,
            &mut self.business_skills.management,
            &mut self.business_skills.financial,
            &mut self.business_skills.operational,
            &mut self.business_skills.administrative,
            &mut self.soft_skills,
            &mut self.languages,
            &mut self.certifications,
            &mut self.domain_expertise,
            &mut self.creative_skills,
            &mut self.manual_skills,
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.lists().iter().all(|list| list.is_empty())
    }

    pub fn total_skills(&self) -> usize {
        self.lists().iter().map(|list| list.len()).sum()
    }
}

/// The flat skills schema: one list plus the model's explicit
/// "not sure" bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlatSkills {
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub uncertain_terms: Vec<String>,
}

impl FlatSkills {
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty() && self.uncertain_terms.is_empty()
    }
}

/// Which backend produced an extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    Ner,
    RemoteInference,
    Disabled,
}

/// Raw or validated skill output in one of the two schema shapes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExtractedSkills {
    Categorized(SkillProfile),
    Flat(FlatSkills),
}

impl ExtractedSkills {
    pub fn is_empty(&self) -> bool {
        match self {
            ExtractedSkills::Categorized(profile) => profile.is_empty(),
            ExtractedSkills::Flat(flat) => flat.is_empty(),
        }
    }
}

/// Per-request extraction outcome. `validated` marks whether every skill
/// string passed the substring check against the source text; unvalidated
/// output carries no such guarantee.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionResult {
    pub skills: ExtractedSkills,
    pub strategy: StrategyKind,
    pub validated: bool,
}

impl ExtractionResult {
    pub fn new(skills: ExtractedSkills, strategy: StrategyKind, validated: bool) -> Self {
        Self {
            skills,
            strategy,
            validated,
        }
    }

    /// Empty categorized template, every schema key present.
    pub fn empty_categorized(strategy: StrategyKind, validated: bool) -> Self {
        Self::new(
            ExtractedSkills::Categorized(SkillProfile::default()),
            strategy,
            validated,
        )
    }

    /// Empty flat template.
    pub fn empty_flat(strategy: StrategyKind, validated: bool) -> Self {
        Self::new(
            ExtractedSkills::Flat(FlatSkills::default()),
            strategy,
            validated,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Every skill string in schema order, deduplicated case-insensitively
    /// (first occurrence keeps its casing). Uncertain terms are excluded;
    /// they never feed downstream consumers.
    pub fn flatten(&self) -> Vec<String> {
        match &self.skills {
            ExtractedSkills::Categorized(profile) => {
                dedup_case_insensitive(profile.lists().into_iter().flatten().cloned())
            }
            ExtractedSkills::Flat(flat) => dedup_case_insensitive(flat.skills.iter().cloned()),
        }
    }
}

/// Order-preserving case-insensitive dedup; the first occurrence wins.
pub fn dedup_case_insensitive<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = std::collections::HashSet::new();
    let mut result = Vec::new();
    for item in items {
        if seen.insert(item.to_lowercase()) {
            result.push(item);
        }
    }
    result
}
