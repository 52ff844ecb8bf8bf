use crate::commands;
use crate::common::GenerationParams;
use crate::config::Config;
use crate::log_debug;
use crate::ui;
use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand, crate_version};
use std::path::PathBuf;

const LOG_FILE: &str = "sitesmith-debug.log";

/// Default output file for `generate`
pub const DEFAULT_OUTPUT: &str = "sitesmith-output.html";

/// CLI structure defining the available commands and global arguments
#[derive(Parser)]
#[command(
    author,
    version = crate_version!(),
    about = "Sitesmith: AI website generator playground",
    long_about = "Sitesmith turns a one-line description into a complete web page, using stock images, canned layouts and an LLM code generator.",
    disable_version_flag = true,
    styles = get_styles(),
)]
pub struct Cli {
    /// Subcommands available for the CLI
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Log debug messages to a file
    #[arg(
        short = 'l',
        long = "log",
        global = true,
        help = "Log debug messages to a file"
    )]
    pub log: bool,

    /// Specify a custom log file path
    #[arg(
        long = "log-file",
        global = true,
        help = "Specify a custom log file path"
    )]
    pub log_file: Option<String>,

    /// Suppress non-essential output (spinners, waiting messages, etc.)
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        help = "Suppress non-essential output"
    )]
    pub quiet: bool,

    /// Display the version
    #[arg(
        short = 'v',
        long = "version",
        global = true,
        help = "Display the version"
    )]
    pub version: bool,

    /// Use an explicit configuration file
    #[arg(
        short = 'c',
        long = "config",
        global = true,
        help = "Path to a configuration file"
    )]
    pub config: Option<PathBuf>,
}

/// Enumeration of available subcommands
#[derive(Subcommand)]
#[command(subcommand_negates_reqs = true)]
#[command(subcommand_precedence_over_arg = true)]
pub enum Commands {
    /// Generate a page from a description
    #[command(
        about = "Generate a web page from a description",
        long_about = "Run the image, layout and code generation stages once and write the assembled page."
    )]
    Generate {
        /// What the page should be
        prompt: String,

        #[command(flatten)]
        params: GenerationParams,

        /// Output file
        #[arg(short, long, default_value = DEFAULT_OUTPUT, help = "Output file")]
        output: PathBuf,

        /// Write the sandboxed preview frame instead of the bare document
        #[arg(long, help = "Wrap the page in a sandboxed preview iframe")]
        frame: bool,

        /// Print the page to stdout instead of writing a file
        #[arg(short, long, help = "Print the page to stdout and exit")]
        print: bool,
    },

    /// Interactive playground
    #[command(
        about = "Start the interactive playground",
        long_about = "Type a description to generate a page, then revise it, browse versions and restore earlier ones. Type :help inside the playground for commands."
    )]
    Studio,

    /// Classify an input the way the address bar does
    #[command(about = "Analyze an input and print the result as JSON")]
    Analyze {
        /// URL or description
        input: String,
    },

    /// Show or save the effective configuration
    #[command(
        about = "Show the effective configuration",
        long_about = "Print the configuration after file and environment overrides, with API keys masked."
    )]
    Config {
        /// Write the effective configuration to the config file
        #[arg(long, help = "Save the effective configuration")]
        save: bool,
    },
}

/// Define custom styles for Clap
fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Magenta.on_default().bold())
        .usage(AnsiColor::Cyan.on_default().bold())
        .literal(AnsiColor::Green.on_default().bold())
        .placeholder(AnsiColor::Yellow.on_default())
        .valid(AnsiColor::Blue.on_default().bold())
        .invalid(AnsiColor::Red.on_default().bold())
        .error(AnsiColor::Red.on_default().bold())
}

/// Parse the command-line arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

/// Main function to parse arguments and handle the command
pub async fn main() -> anyhow::Result<()> {
    let cli = parse_args();

    if cli.version {
        ui::print_version(crate_version!());
        return Ok(());
    }

    let config = load_config(cli.config.as_deref())?;

    if cli.log {
        crate::logger::enable_logging();
        let log_file = cli.log_file.as_deref().unwrap_or(LOG_FILE);
        crate::logger::set_log_file(log_file)?;

        crate::logger::set_verbose_logging(config.logging.verbose);
        if config.logging.verbose {
            log_debug!("Verbose logging enabled - will show HTTP requests and external library logs");
        }
    } else {
        crate::logger::disable_logging();
    }

    if cli.quiet {
        ui::set_quiet_mode(true);
    }

    if let Some(command) = cli.command {
        handle_command(command, config, cli.config).await
    } else {
        let _ = Cli::parse_from(["sitesmith", "--help"]);
        Ok(())
    }
}

fn load_config(path: Option<&std::path::Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_with_path(path),
        None => Config::load(),
    }
}

/// Dispatch a parsed subcommand
pub async fn handle_command(
    command: Commands,
    config: Config,
    config_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    match command {
        Commands::Generate {
            prompt,
            params,
            output,
            frame,
            print,
        } => {
            log_debug!(
                "Handling 'generate' with params: {:?}, output: {}, frame: {}, print: {}",
                params,
                output.display(),
                frame,
                print
            );
            commands::handle_generate_command(
                config,
                &prompt,
                &params,
                commands::OutputTarget {
                    path: output,
                    frame,
                    print,
                },
            )
            .await
        }
        Commands::Studio => commands::handle_studio_command(&config).await,
        Commands::Analyze { input } => commands::handle_analyze_command(input).await,
        Commands::Config { save } => {
            commands::handle_config_command(&config, save, config_path.as_deref())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ImageType;

    #[test]
    fn test_generate_arguments() {
        let cli = Cli::parse_from([
            "sitesmith",
            "generate",
            "a ramen shop",
            "--layout",
            "landing",
            "--image-type",
            "illustration",
            "--frame",
            "-q",
        ]);

        assert!(cli.quiet);
        match cli.command {
            Some(Commands::Generate {
                prompt,
                params,
                output,
                frame,
                print,
            }) => {
                assert_eq!(prompt, "a ramen shop");
                assert_eq!(params.layout.as_deref(), Some("landing"));
                assert_eq!(params.image_type, Some(ImageType::Illustration));
                assert_eq!(output, PathBuf::from(DEFAULT_OUTPUT));
                assert!(frame);
                assert!(!print);
            }
            _ => panic!("expected generate command"),
        }
    }

    #[test]
    fn test_config_flag_is_global() {
        let cli = Cli::parse_from(["sitesmith", "config", "--config", "/tmp/s.toml", "--save"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/s.toml")));
        assert!(matches!(cli.command, Some(Commands::Config { save: true })));
    }
}
