use crate::agents::{Agent, AgentOrchestrator, BrowserAgent};
use crate::common::GenerationParams;
use crate::config::Config;
use crate::document;
use crate::{log_debug, log_info, log_warn};
use crate::playground::{EditKind, NOTHING_GENERATED_MESSAGE, Playground};
use crate::services::{ImageSearch, OpenRouterService, PixabayClient};
use crate::ui::{self, rgb};
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Where `generate` sends its page
#[derive(Debug, Clone)]
pub struct OutputTarget {
    pub path: PathBuf,
    pub frame: bool,
    pub print: bool,
}

/// Run the pipeline once and write the assembled page
pub async fn handle_generate_command(
    mut config: Config,
    prompt: &str,
    params: &GenerationParams,
    target: OutputTarget,
) -> Result<()> {
    if params.apply_to_config(&mut config) {
        log_debug!("Using model override {}", config.openrouter.model);
    }

    let images = PixabayClient::from_config(&config);
    let mut request = params.to_request(prompt);
    if request.image_query().is_some() && !images.has_credentials() {
        log_warn!("No Pixabay key configured; dropping image requirement");
        ui::print_warning("No image API key configured; generating without images.");
        if let Some(requirements) = request.requirements.as_mut() {
            requirements.images = None;
        }
    }

    let orchestrator = AgentOrchestrator::new(
        Arc::new(OpenRouterService::new(&config)),
        Arc::new(images),
        &config,
    );

    let spinner = ui::create_spinner("Generating page...");
    let result = orchestrator.generate(&request).await;
    spinner.finish_and_clear();
    let result = result?;

    let page = document::assemble(&result.html, &result.css, &result.js);
    let page = if target.frame {
        document::preview_frame(&page)
    } else {
        page
    };

    if target.print {
        println!("{page}");
        return Ok(());
    }

    std::fs::write(&target.path, &page)
        .with_context(|| format!("Failed to write {}", target.path.display()))?;

    ui::print_success(&format!(
        "Page written to {} (layout: {}, images: {})",
        target.path.display(),
        result.meta.layout.as_deref().unwrap_or("standard"),
        result.meta.image_count.unwrap_or(0)
    ));
    Ok(())
}

/// Print the input analysis as JSON
pub async fn handle_analyze_command(input: String) -> Result<()> {
    let analysis = BrowserAgent::new().process(input).await?;
    println!("{}", serde_json::to_string_pretty(&analysis)?);
    Ok(())
}

/// Print, and optionally save, the effective configuration
pub fn handle_config_command(config: &Config, save: bool, path: Option<&Path>) -> Result<()> {
    if save {
        match path {
            Some(path) => config.save_to(path)?,
            None => config.save()?,
        }
        log_info!("Effective configuration saved");
        ui::print_success("Configuration saved.");
        ui::print_newline();
    }

    print_configuration(&config.redacted());
    Ok(())
}

fn print_configuration(config: &Config) {
    let cyan = rgb::NEON_CYAN;
    let coral = rgb::CORAL;
    let yellow = rgb::ELECTRIC_YELLOW;
    let green = rgb::SUCCESS_GREEN;
    let dim = rgb::DIM_WHITE;
    let purple = rgb::ELECTRIC_PURPLE;

    println!();
    println!(
        "{}  {}  {}",
        "━━━".truecolor(purple.0, purple.1, purple.2),
        "SITESMITH CONFIGURATION".truecolor(cyan.0, cyan.1, cyan.2).bold(),
        "━━━".truecolor(purple.0, purple.1, purple.2)
    );
    println!();

    print_section_header("OPENROUTER");
    print_config_row("Model", &config.openrouter.model, cyan, true);
    print_config_row("Endpoint", &config.openrouter.base_url, dim, false);
    print_config_row("API Key", key_display(&config.openrouter.api_key), green, false);
    print_config_row(
        "Temperature",
        &config.openrouter.temperature.to_string(),
        coral,
        false,
    );
    print_config_row(
        "Max Tokens",
        &config.openrouter.max_tokens.to_string(),
        coral,
        false,
    );

    println!();
    print_section_header("IMAGES");
    print_config_row("Endpoint", &config.images.base_url, dim, false);
    print_config_row("API Key", key_display(&config.images.api_key), green, false);
    print_config_row(
        "Max Images",
        &config.images.max_images.to_string(),
        coral,
        false,
    );

    println!();
    print_section_header("LIMITS");
    print_config_row(
        "Cache",
        &format!("{} min", config.cache.duration_minutes),
        yellow,
        false,
    );
    print_config_row(
        "Rate Limit",
        &format!(
            "{} / {} ms",
            config.rate_limit.max_requests, config.rate_limit.window_ms
        ),
        yellow,
        false,
    );

    if let Some(general) = config.prompts.general.as_deref() {
        println!();
        print_section_header("GENERAL PROMPT");
        for line in general.lines() {
            println!("  {}", line.truecolor(dim.0, dim.1, dim.2).italic());
        }
    }

    println!();
    let sep = rgb::DIM_SEPARATOR;
    println!("{}", "─".repeat(40).truecolor(sep.0, sep.1, sep.2));
    println!();
}

fn key_display(key: &str) -> &str {
    if key.is_empty() { "(not set)" } else { key }
}

fn print_section_header(name: &str) {
    let purple = rgb::ELECTRIC_PURPLE;
    let sep = rgb::DIM_SEPARATOR;
    println!(
        "{} {} {}",
        "─".truecolor(purple.0, purple.1, purple.2),
        name.truecolor(purple.0, purple.1, purple.2).bold(),
        "─"
            .repeat(30 - name.len().min(28))
            .truecolor(sep.0, sep.1, sep.2)
    );
}

fn print_config_row(label: &str, value: &str, value_color: (u8, u8, u8), highlight: bool) {
    let dim = rgb::DIM_WHITE;
    let label_styled = format!("{label:>12}").truecolor(dim.0, dim.1, dim.2);

    let value_styled = if highlight {
        value
            .truecolor(value_color.0, value_color.1, value_color.2)
            .bold()
    } else {
        value.truecolor(value_color.0, value_color.1, value_color.2)
    };

    println!("{label_styled}  {value_styled}");
}

// ═══════════════════════════════════════════════════════════════════════════════
// Studio
// ═══════════════════════════════════════════════════════════════════════════════

/// One line typed into the playground
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudioCommand {
    Submit(String),
    Revise(String),
    Versions,
    Restore(usize),
    Edit { tag: String, instruction: String },
    Style { tag: String, declarations: String },
    Duplicate(String),
    Delete(String),
    Save(PathBuf),
    Show,
    Help,
    Quit,
    Invalid(String),
}

impl StudioCommand {
    /// Lines starting with `:` are commands; anything else goes to the address bar
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let Some(command) = line.strip_prefix(':') else {
            return Self::Submit(line.to_string());
        };

        let (name, arg) = command
            .split_once(char::is_whitespace)
            .map_or((command, ""), |(n, a)| (n, a.trim()));

        match name {
            "revise" | "r" => Self::Revise(arg.to_string()),
            "versions" | "v" => Self::Versions,
            "restore" => arg.parse().map_or_else(
                |_| Self::Invalid(format!("Expected a version id, got '{arg}'")),
                Self::Restore,
            ),
            "edit" | "e" => match split_tag(arg) {
                Some((tag, instruction)) if !instruction.is_empty() => Self::Edit {
                    tag,
                    instruction: instruction.to_string(),
                },
                _ => Self::Invalid("Usage: :edit <tag> <instruction>".to_string()),
            },
            "style" => match split_tag(arg) {
                Some((tag, declarations)) if !declarations.is_empty() => Self::Style {
                    tag,
                    declarations: declarations.to_string(),
                },
                _ => Self::Invalid("Usage: :style <tag> <prop: value; ...>".to_string()),
            },
            "duplicate" | "dup" => split_tag(arg).map_or_else(
                || Self::Invalid("Usage: :duplicate <tag>".to_string()),
                |(tag, _)| Self::Duplicate(tag),
            ),
            "delete" | "del" => split_tag(arg).map_or_else(
                || Self::Invalid("Usage: :delete <tag>".to_string()),
                |(tag, _)| Self::Delete(tag),
            ),
            "save" if !arg.is_empty() => Self::Save(PathBuf::from(arg)),
            "save" => Self::Invalid("Usage: :save <path>".to_string()),
            "show" => Self::Show,
            "help" | "h" => Self::Help,
            "quit" | "q" | "exit" => Self::Quit,
            other => Self::Invalid(format!("Unknown command ':{other}'. Type :help")),
        }
    }
}

/// Leading tag name (angle brackets optional) and the rest of the line
fn split_tag(arg: &str) -> Option<(String, &str)> {
    let (tag, rest) = arg
        .split_once(char::is_whitespace)
        .map_or((arg, ""), |(t, r)| (t, r.trim()));
    let tag = tag.trim_start_matches('<').trim_end_matches('>');
    (!tag.is_empty()).then(|| (tag.to_lowercase(), rest))
}

const STUDIO_HELP: &str = "  <description>      generate a page (cached for repeated input)
  :revise <text>     revise the current page
  :versions          list versions
  :restore <id>      make a version current
  :edit <tag> <text> rewrite the first <tag> element
  :style <tag> <css> merge declarations into its inline style
  :duplicate <tag>   copy the first <tag> element
  :delete <tag>      remove the first <tag> element
  :save <path>       write the current page to a file
  :show              print the current page
  :help              show this help
  :quit              leave the playground";

/// Interactive playground on stdin
pub async fn handle_studio_command(config: &Config) -> Result<()> {
    let mut playground = Playground::from_config(config);

    ui::print_message(&ui::create_gradient_text("✦ Sitesmith playground"));
    ui::print_message(STUDIO_HELP);
    ui::print_newline();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match StudioCommand::parse(&line) {
            StudioCommand::Quit => break,
            command => run_studio_command(&mut playground, command).await,
        }
    }

    Ok(())
}

async fn run_studio_command(playground: &mut Playground, command: StudioCommand) {
    match command {
        StudioCommand::Submit(input) => {
            let spinner = ui::create_spinner("Generating page...");
            let outcome = playground.submit(&input).await;
            spinner.finish_and_clear();
            match outcome {
                Ok(submission) if submission.from_cache => ui::print_info(&format!(
                    "Loaded from cache as version {}",
                    submission.version
                )),
                Ok(submission) => ui::print_success(&format!(
                    "Version {} ready ({} bytes)",
                    submission.version,
                    submission.document.len()
                )),
                Err(e) => ui::print_error(&e.to_string()),
            }
        }
        StudioCommand::Revise(prompt) => {
            let spinner = ui::create_spinner("Applying revision...");
            let outcome = playground.revise(&prompt).await;
            spinner.finish_and_clear();
            match outcome {
                Ok(_) => ui::print_success(&format!("Revision: {prompt}")),
                Err(e) => ui::print_error(&e.to_string()),
            }
        }
        StudioCommand::Versions => print_versions(playground),
        StudioCommand::Restore(id) => match playground.restore(id) {
            Some(_) => ui::print_success(&format!("Restored version {id}")),
            None => ui::print_error(&format!("No version {id}")),
        },
        StudioCommand::Edit { tag, instruction } => {
            let spinner = ui::create_spinner("Editing element...");
            let outcome = playground.edit_content(&tag, &instruction).await;
            spinner.finish_and_clear();
            report_edit(outcome, EditKind::Content);
        }
        StudioCommand::Style { tag, declarations } => {
            report_edit(playground.style_element(&tag, &declarations), EditKind::Style);
        }
        StudioCommand::Duplicate(tag) => {
            report_edit(playground.duplicate_element(&tag), EditKind::Duplicated);
        }
        StudioCommand::Delete(tag) => {
            report_edit(playground.delete_element(&tag), EditKind::Deleted);
        }
        StudioCommand::Save(path) => match playground.current_document() {
            Some(page) => match std::fs::write(&path, page) {
                Ok(()) => ui::print_success(&format!("Saved to {}", path.display())),
                Err(e) => ui::print_error(&format!("Failed to save {}: {e}", path.display())),
            },
            None => ui::print_warning(NOTHING_GENERATED_MESSAGE),
        },
        StudioCommand::Show => match playground.current_document() {
            Some(page) => ui::print_bordered_content(page),
            None => ui::print_warning(NOTHING_GENERATED_MESSAGE),
        },
        StudioCommand::Help => ui::print_message(STUDIO_HELP),
        StudioCommand::Invalid(message) => ui::print_error(&message),
        StudioCommand::Quit => {}
    }
}

fn report_edit(outcome: crate::error::Result<usize>, kind: EditKind) {
    match outcome {
        Ok(version) => ui::print_success(&format!("{} (version {version})", kind.description())),
        Err(e) => ui::print_error(&e.to_string()),
    }
}

fn print_versions(playground: &Playground) {
    if playground.versions().is_empty() {
        ui::print_warning("No versions yet");
        return;
    }

    let current = playground.current_version();
    for version in playground.versions() {
        let marker = if current == Some(version.id) { "✦" } else { " " };
        let time = version
            .timestamp
            .with_timezone(&chrono::Local)
            .format("%H:%M:%S");
        ui::print_message(&format!(
            "{} {:>3}  {}  {}",
            marker.magenta().bold(),
            version.id,
            time.to_string().dimmed(),
            version.description
        ));
    }
}
