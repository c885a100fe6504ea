//! Output formatters for skill reports - console and JSON

use crate::config::OutputFormat;
use crate::error::Result;
use crate::processing::engine::SkillReport;
use crate::processing::schema::{ExtractedSkills, StrategyKind};
use colored::Colorize;

/// Trait for formatting skill reports
pub trait OutputFormatter {
    fn format_report(&self, report: &SkillReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Console formatter with colors and section headers
pub struct ConsoleFormatter {
    use_colors: bool,
}

/// JSON formatter for API integration and structured data
pub struct JsonFormatter {
    pretty: bool,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn header(&self, report: &SkillReport) -> String {
        let strategy = match report.extraction.strategy {
            StrategyKind::Ner => "NER (token classification)",
            StrategyKind::RemoteInference => "Remote inference",
            StrategyKind::Disabled => "Disabled",
        };
        let validated = if report.extraction.validated {
            "validated against source".green()
        } else {
            "unvalidated".yellow()
        };

        format!(
            "{}\n{}\n📄 Source: {} characters\n🔧 Strategy: {} ({})\n🕐 Generated: {}\n",
            "📋 Skill Extraction Report".bold().cyan(),
            "═".repeat(50),
            report.source_chars,
            strategy,
            validated,
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        )
    }

    fn skills_section(&self, skills: &ExtractedSkills) -> String {
        let mut out = String::new();
        out.push_str(&format!("\n{}\n", "🎯 Extracted Skills".bold()));

        match skills {
            ExtractedSkills::Categorized(profile) => {
                let categories: [(&str, &Vec<String>); 18] = [
                    ("Programming Languages", &profile.technical_skills.programming_languages),
                    ("Software Tools", &profile.technical_skills.software_tools),
                    ("Engineering Skills", &profile.technical_skills.engineering_skills),
                    ("Data Skills", &profile.technical_skills.data_skills),
                    ("Design Skills", &profile.technical_skills.design_skills),
                    ("Hardware Skills", &profile.technical_skills.hardware_skills),
                    ("Scientific Methods", &profile.technical_skills.scientific_methods),
                    ("Other Technical", &profile.technical_skills.other_technical),
                    ("Management", &profile.business_skills.management),
                    ("Financial", &profile.business_skills.financial),
                    ("Operational", &profile.business_skills.operational),
                    ("Administrative", &profile.business_skills.administrative),
                    ("Soft Skills", &profile.soft_skills),
                    ("Languages", &profile.languages),
                    ("Certifications", &profile.certifications),
                    ("Domain Expertise", &profile.domain_expertise),
                    ("Creative Skills", &profile.creative_skills),
                    ("Manual Skills", &profile.manual_skills),
                ];

                let mut any = false;
                for (name, list) in categories {
                    if list.is_empty() {
                        continue;
                    }
                    any = true;
                    out.push_str(&format!("  • {}: {}\n", name.bold(), list.join(", ")));
                }
                if !any {
                    out.push_str(&format!("  {}\n", "No skills found".dimmed()));
                }
            }
            ExtractedSkills::Flat(flat) => {
                if flat.skills.is_empty() {
                    out.push_str(&format!("  {}\n", "No skills found".dimmed()));
                } else {
                    for skill in &flat.skills {
                        out.push_str(&format!("  • {}\n", skill));
                    }
                }
                if !flat.uncertain_terms.is_empty() {
                    out.push_str(&format!("\n{}\n", "❓ Uncertain Terms".bold().yellow()));
                    for term in &flat.uncertain_terms {
                        out.push_str(&format!("  • {}\n", term.dimmed()));
                    }
                }
            }
        }
        out
    }

    fn recommendations_section(&self, report: &SkillReport) -> String {
        if report.recommendations.is_empty() {
            return String::new();
        }

        let mut out = format!("\n{}\n", "💡 Recommended Skills".bold());
        for (i, rec) in report.recommendations.iter().enumerate() {
            let score = format!("{:.3}", rec.score);
            let colored_score = if rec.score >= 0.5 {
                score.green()
            } else if rec.score >= 0.25 {
                score.yellow()
            } else {
                score.normal()
            };
            out.push_str(&format!(
                "  {}. {} (score: {})\n     {}\n",
                i + 1,
                rec.skill.bold(),
                colored_score,
                rec.reason.dimmed()
            ));
        }
        out
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &SkillReport) -> Result<String> {
        if !self.use_colors {
            colored::control::set_override(false);
        }

        let mut output = self.header(report);
        output.push_str(&self.skills_section(&report.extraction.skills));
        output.push_str(&self.recommendations_section(report));

        if !self.use_colors {
            colored::control::unset_override();
        }
        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &SkillReport) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        Ok(json)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}
