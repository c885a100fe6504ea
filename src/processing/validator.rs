//! Substring validation of extractor output against the source text

use crate::error::{Result, ResumeSkillsError};
use crate::processing::schema::{dedup_case_insensitive, ExtractedSkills, FlatSkills, SkillProfile};
use aho_corasick::AhoCorasick;
use std::collections::HashSet;

/// Filters raw extractor output down to terms that literally occur in the
/// source text, case-folded. The output keeps the full schema shape; terms
/// that fail the check are dropped silently. Empty and whitespace-only
/// strings are never considered mentioned.
pub fn validate(skills: ExtractedSkills, source_text: &str) -> Result<ExtractedSkills> {
    match skills {
        ExtractedSkills::Categorized(profile) => Ok(ExtractedSkills::Categorized(
            validate_profile(profile, source_text)?,
        )),
        ExtractedSkills::Flat(flat) => Ok(ExtractedSkills::Flat(validate_flat(flat, source_text)?)),
    }
}

pub fn validate_profile(raw: SkillProfile, source_text: &str) -> Result<SkillProfile> {
    let terms: Vec<String> = raw.lists().into_iter().flatten().cloned().collect();
    let mentioned = mentioned_terms(&terms, source_text)?;

    let mut validated = raw;
    for list in validated.lists_mut() {
        let kept = retain_mentioned(std::mem::take(list), &mentioned);
        *list = kept;
    }
    Ok(validated)
}

pub fn validate_flat(raw: FlatSkills, source_text: &str) -> Result<FlatSkills> {
    let mentioned = mentioned_terms(&raw.skills, source_text)?;

    Ok(FlatSkills {
        skills: retain_mentioned(raw.skills, &mentioned),
        // Uncertain terms are the model's explicit "not sure" bucket; they
        // skip the substring check but still drop blanks.
        uncertain_terms: dedup_case_insensitive(
            raw.uncertain_terms
                .into_iter()
                .filter(|term| !term.trim().is_empty()),
        ),
    })
}

/// Lowercased forms of every term that occurs as a substring of the
/// lowercased source text. One automaton, one scan over the text.
fn mentioned_terms(terms: &[String], source_text: &str) -> Result<HashSet<String>> {
    let patterns: Vec<String> = terms
        .iter()
        .filter(|term| !term.trim().is_empty())
        .map(|term| term.to_lowercase())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    if patterns.is_empty() {
        return Ok(HashSet::new());
    }

    let matcher = AhoCorasick::new(&patterns).map_err(|e| {
        ResumeSkillsError::TextProcessing(format!("Failed to build validation matcher: {}", e))
    })?;

    let source_lower = source_text.to_lowercase();
    let mut mentioned = HashSet::new();
    for mat in matcher.find_overlapping_iter(&source_lower) {
        mentioned.insert(patterns[mat.pattern().as_usize()].clone());
        if mentioned.len() == patterns.len() {
            break;
        }
    }
    Ok(mentioned)
}

fn retain_mentioned(list: Vec<String>, mentioned: &HashSet<String>) -> Vec<String> {
    dedup_case_insensitive(
        list.into_iter()
            .filter(|term| mentioned.contains(&term.to_lowercase())),
    )
}
