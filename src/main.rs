//! Resume skills: skill extraction and recommendation tool

use clap::Parser;
use log::{error, info};
use resume_skills::cli::{self, Cli, Commands, ConfigAction, ModelAction};
use resume_skills::config::{Config, OutputFormat};
use resume_skills::error::{Result, ResumeSkillsError};
use resume_skills::input::file_detector::DocumentFormat;
use resume_skills::input::manager::InputManager;
use resume_skills::ner::ModelManager;
use resume_skills::output::{ConsoleFormatter, JsonFormatter, OutputFormatter};
use resume_skills::processing::{SkillEngine, SkillReport};
use std::path::{Path, PathBuf};
use std::process;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, mut config: Config) -> Result<()> {
    match command {
        Commands::Extract {
            file,
            text,
            declared,
            recommend,
            format,
            output,
        } => {
            let output_format =
                cli::parse_output_format(&format).map_err(ResumeSkillsError::InvalidInput)?;

            let source_text = match (&file, text) {
                (Some(path), None) => {
                    cli::validate_file_extension(path, &["pdf", "docx", "txt", "md", "markdown"])
                        .map_err(ResumeSkillsError::InvalidInput)?;
                    info!("Extracting text from {}", path.display());
                    let mut input_manager = InputManager::new();
                    input_manager.extract_text(path).await?
                }
                (None, Some(text)) => text,
                (None, None) => {
                    return Err(ResumeSkillsError::InvalidInput(
                        "Provide a resume file or --text".to_string(),
                    ));
                }
                (Some(_), Some(_)) => unreachable!("clap rejects file together with --text"),
            };

            if source_text.trim().is_empty() {
                println!("⚠️  The document yielded no text; the report will be empty");
            }

            if !recommend {
                config.recommender.enabled = false;
            }

            println!("🔧 Initializing skill engine...");
            let engine = SkillEngine::new(&config).await?;

            println!("🔍 Extracting skills...");
            let report = engine.analyze(&source_text, &declared).await?;

            emit_report(&report, output_format, output.as_deref(), &config)?;
        }

        Commands::Recommend { skills, top_k } => {
            // Recommendation-only run: no extraction backend needed.
            config.extraction.strategy = resume_skills::config::ExtractionStrategy::None;
            config.recommender.enabled = true;
            if let Some(top_k) = top_k {
                config.recommender.top_k = top_k;
            }

            println!("🔧 Initializing recommender...");
            let engine = SkillEngine::new(&config).await?;

            let recommendations = engine.recommend(&[], &skills)?;
            if recommendations.is_empty() {
                println!("No recommendations (catalog covered or no known skills)");
            } else {
                println!("💡 Recommended Skills:\n");
                for (i, rec) in recommendations.iter().enumerate() {
                    println!("  {}. {} (score: {:.3})", i + 1, rec.skill, rec.score);
                    println!("     {}", rec.reason);
                }
            }
        }

        Commands::Batch {
            dir,
            format,
            output,
        } => {
            let output_format =
                cli::parse_output_format(&format).map_err(ResumeSkillsError::InvalidInput)?;

            let documents = collect_documents(&dir)?;
            if documents.is_empty() {
                println!("⚠️  No supported documents found in {}", dir.display());
                return Ok(());
            }
            println!("📂 Found {} documents in {}", documents.len(), dir.display());

            if let Some(out_dir) = &output {
                std::fs::create_dir_all(out_dir)?;
            }

            println!("🔧 Initializing skill engine...");
            let engine = SkillEngine::new(&config).await?;
            let mut input_manager = InputManager::new();

            for path in documents {
                println!("\n📄 Processing {}", path.display());
                let text = input_manager.extract_text(&path).await?;
                let report = engine.analyze(&text, &[]).await?;

                match &output {
                    Some(out_dir) => {
                        let target = batch_output_path(out_dir, &path, output_format);
                        let rendered = render_report(&report, output_format, &config)?;
                        std::fs::write(&target, rendered)?;
                        println!("💾 Saved report to {}", target.display());
                    }
                    None => emit_report(&report, output_format, None, &config)?,
                }
            }
        }

        Commands::Models { action } => {
            config.ensure_models_dir()?;
            let manager = ModelManager::new(config.models_dir().clone()).await?;

            match action {
                ModelAction::List => {
                    println!("📚 Model Roles\n");
                    println!("  • NER model: {}", config.models.ner_model);
                    println!("  • Embedding model: {}", config.models.embedding_model);

                    let downloaded = manager.list_downloaded().await?;
                    if downloaded.is_empty() {
                        println!("\n💡 No checkpoints downloaded yet. Get started with:");
                        println!("   resume-skills models download {}", config.models.ner_model);
                    } else {
                        println!("\n✅ Downloaded checkpoints:");
                        for model in downloaded {
                            println!("  • {}", model);
                        }
                    }
                }

                ModelAction::Download { model } => {
                    if manager.is_downloaded(&model).await {
                        println!("✅ Model '{}' is already downloaded", model);
                        return Ok(());
                    }
                    let path = manager.download(&model).await?;
                    println!("📁 Location: {}", path.display());
                }

                ModelAction::Remove { model } => {
                    manager.remove(&model).await?;
                    println!("✅ Model '{}' removed", model);
                }

                ModelAction::Dir => {
                    println!("{}", config.models_dir().display());
                }
            }
        }

        Commands::Config { action } => match action {
            Some(ConfigAction::Show) | None => {
                println!("⚙️  Current Configuration\n");
                println!("Extraction strategy: {:?}", config.extraction.strategy);
                println!("Prompt schema: {:?}", config.extraction.prompt_schema);
                println!("Validation: {}", config.extraction.validate);
                println!("\nInference server: {}", config.ollama.endpoint);
                println!("Model: {}", config.ollama.model);
                println!("Timeout: {}s", config.ollama.timeout_secs);
                println!("\nModels directory: {}", config.models_dir().display());
                println!("NER model: {}", config.models.ner_model);
                println!("Embedding model: {}", config.models.embedding_model);
                println!("\nRecommendations: {}", config.recommender.enabled);
                println!("Catalog: {}", config.recommender.catalog_path.display());
                println!("Top-k: {}", config.recommender.top_k);
            }

            Some(ConfigAction::Init) => {
                let default_config = Config::default();
                default_config.save()?;
                println!("✅ Default configuration written");
            }
        },
    }

    Ok(())
}

/// Render and print a report, or save it when an output path is given.
fn emit_report(
    report: &SkillReport,
    format: OutputFormat,
    output: Option<&Path>,
    config: &Config,
) -> Result<()> {
    let rendered = render_report(report, format, config)?;
    match output {
        Some(path) => {
            std::fs::write(path, rendered)?;
            println!("💾 Saved report to {}", path.display());
        }
        None => println!("{}", rendered),
    }
    Ok(())
}

fn render_report(report: &SkillReport, format: OutputFormat, config: &Config) -> Result<String> {
    match format {
        OutputFormat::Console => {
            ConsoleFormatter::new(config.output.color_output).format_report(report)
        }
        OutputFormat::Json => JsonFormatter::default().format_report(report),
    }
}

/// Supported documents in a directory, sorted by path for stable runs.
fn collect_documents(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(ResumeSkillsError::InvalidInput(format!(
            "Not a directory: {}",
            dir.display()
        )));
    }

    let mut documents = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let supported = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| DocumentFormat::from_extension(ext) != DocumentFormat::Unknown)
            .unwrap_or(false);
        if supported {
            documents.push(path);
        }
    }
    documents.sort();
    Ok(documents)
}

fn batch_output_path(out_dir: &Path, source: &Path, format: OutputFormat) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "report".to_string());
    let extension = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
    };
    out_dir.join(format!("{}.{}", stem, extension))
}
