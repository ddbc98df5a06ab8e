// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use indicatif::{ProgressBar, ProgressStyle};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, debug, error, info, warn};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use walkdir::WalkDir;

use xcstrings_translator::app_config::{self, Config};
use xcstrings_translator::model_catalog::fetch_available_models;
use xcstrings_translator::providers::openai::OpenAI;
use xcstrings_translator::storage::PreferenceStore;
use xcstrings_translator::{Controller, SUPPORTED_LANGUAGES, SessionState, TranslationSettings};

/// Catalog file extension
const CATALOG_EXTENSION: &str = "xcstrings";

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate string catalogs
    Translate(TranslateArgs),

    /// Show per-language translation progress of a catalog
    Progress(ProgressArgs),

    /// List the languages offered for translation
    Languages,

    /// List the chat models available to an API key
    Models(ModelsArgs),

    /// Generate shell completions for xcstrings-translator
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Catalog file, or directory searched for *.xcstrings files
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Target language code (repeatable, e.g. -l fr -l de)
    #[arg(short, long = "language")]
    languages: Vec<String>,

    /// Retranslate strings that already have a translation
    #[arg(short, long)]
    force: bool,

    /// Output file (single input file only); the input is rewritten otherwise
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Description of the app, passed to the model with every request
    #[arg(long)]
    context: Option<String>,

    /// String key to leave untranslated (repeatable)
    #[arg(long)]
    exclude: Vec<String>,

    /// Store the API key, model and context as preferences
    #[arg(long)]
    remember: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct ProgressArgs {
    /// Catalog file
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Languages to report on; every language in the catalog when omitted
    #[arg(short, long = "language")]
    languages: Vec<String>,

    /// String key to leave out of the totals (repeatable)
    #[arg(long)]
    exclude: Vec<String>,
}

#[derive(Parser, Debug)]
struct ModelsArgs {
    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,
}

/// xcstrings-translator - Translate Xcode string catalogs with OpenAI models
#[derive(Parser, Debug)]
#[command(name = "xcstrings-translator")]
#[command(version)]
#[command(about = "Translate Xcode string catalogs with OpenAI models")]
#[command(long_about = "xcstrings-translator fills in missing translations of Xcode string catalogs (.xcstrings)
using OpenAI chat models, 10 strings per request with up to 10 requests in flight.

EXAMPLES:
    xcstrings-translator translate Localizable.xcstrings -l fr -l de
    xcstrings-translator translate Localizable.xcstrings -l ja --force
    xcstrings-translator translate App/ -l es -m gpt-5-mini --context \"Fitness tracker\"
    xcstrings-translator progress Localizable.xcstrings
    xcstrings-translator models
    xcstrings-translator completions bash > xcstrings-translator.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically. The API key is read from --api-key, then
    OPENAI_API_KEY, then the config file, then stored preferences. The model and
    app context fall back to stored preferences when neither flags nor the config
    file set them; --remember stores the current values.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger::new(level)))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Colour and emoji for a level
    fn decoration(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "❌"),
            Level::Warn => ("1;33", "🚧"),
            Level::Info => ("1;32", ""),
            Level::Debug => ("1;36", "🔍"),
            Level::Trace => ("1;35", "📋"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (colour, emoji) = Self::decoration(record.level());
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {} {}\x1B[0m",
                colour,
                now,
                emoji,
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Trace lets every record reach the logger; the effective level is set with set_max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Translate(args) => run_translate(args).await,
        Commands::Progress(args) => run_progress(args),
        Commands::Languages => {
            list_languages();
            Ok(())
        }
        Commands::Models(args) => run_models(args).await,
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "xcstrings-translator", &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Load the config file, applying the command-line log level first
fn load_config(config_path: &str, log_level: Option<CliLogLevel>) -> Result<Config> {
    if let Some(level) = &log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = Config::load_or_create(Path::new(config_path))?;

    match log_level {
        Some(level) => config.log_level = level.into(),
        None => log::set_max_level(config.log_level.to_level_filter()),
    }

    Ok(config)
}

fn open_preferences() -> Option<PreferenceStore> {
    match PreferenceStore::open_default() {
        Ok(store) => Some(store),
        Err(e) => {
            warn!("Preferences unavailable: {}", e);
            None
        }
    }
}

/// Settings from the command line and config file, falling back to stored preferences
fn resolve_settings(config: &Config, store: Option<&PreferenceStore>) -> Result<TranslationSettings> {
    let preferences = store.map(|s| s.load()).unwrap_or_default();
    let settings = config.translation.to_settings(&preferences);
    if settings.api_key.is_empty() {
        return Err(anyhow!("No API key: pass --api-key, set OPENAI_API_KEY or add it to the config file"));
    }
    Ok(settings)
}

fn client_for(config: &Config, api_key: &str) -> OpenAI {
    OpenAI::new_with_timeout(
        api_key,
        config.translation.endpoint.clone(),
        Duration::from_secs(config.translation.timeout_secs),
    )
}

/// The input file, or every catalog below the input directory
fn collect_catalogs(input_path: &Path) -> Result<Vec<PathBuf>> {
    if input_path.is_file() {
        return Ok(vec![input_path.to_path_buf()]);
    }
    if !input_path.is_dir() {
        return Err(anyhow!("Input path does not exist: {:?}", input_path));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(input_path)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == CATALOG_EXTENSION))
        .collect();
    files.sort();
    Ok(files)
}

fn progress_bar(total: u64, language: &str) -> ProgressBar {
    let progress_bar = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} strings ({percent}%) {msg} {eta}")
        .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress_bar.set_style(style.progress_chars("█▓▒░"));
    progress_bar.set_message(format!("Translating {}", language));
    progress_bar
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    let mut config = load_config(&options.config_path, options.log_level.clone())?;

    if let Some(model) = &options.model {
        config.translation.model = Some(model.clone());
    }
    if let Some(api_key) = &options.api_key {
        config.translation.api_key = api_key.clone();
    }
    if let Some(context) = &options.context {
        config.translation.app_context = context.clone();
    }
    if !options.languages.is_empty() {
        config.target_languages = options.languages.clone();
    }

    config.validate().context("Configuration validation failed")?;

    if config.target_languages.is_empty() {
        return Err(anyhow!("No target languages: pass --language or set target_languages in the config file"));
    }

    let store = open_preferences();
    let mut settings = resolve_settings(&config, store.as_ref())?;
    debug!("Using model {}", settings.model);

    if options.remember {
        settings.save_api_key = true;
        if let Some(store) = &store {
            store.save_settings(&settings)?;
            info!("Saved preferences to {}", store.path().display());
        }
    }

    let files = collect_catalogs(&options.input_path)?;
    if files.is_empty() {
        warn!("No .{} files found in {:?}", CATALOG_EXTENSION, options.input_path);
        return Ok(());
    }
    if options.output.is_some() && files.len() > 1 {
        return Err(anyhow!("--output can only be used with a single input file"));
    }

    let start_time = Instant::now();
    let mut failures = 0;

    for file in &files {
        let output = options.output.clone().unwrap_or_else(|| file.clone());
        if let Err(e) = translate_file(file, &output, &config, &settings, &options).await {
            error!("Failed to translate {}: {:#}", file.display(), e);
            failures += 1;
        }
    }

    info!(
        "Processed {} catalog(s) in {:.1}s",
        files.len(),
        start_time.elapsed().as_secs_f64()
    );

    if failures > 0 {
        return Err(anyhow!("{} of {} catalog(s) failed", failures, files.len()));
    }
    Ok(())
}

async fn translate_file(
    input: &Path,
    output: &Path,
    config: &Config,
    settings: &TranslationSettings,
    options: &TranslateArgs,
) -> Result<()> {
    info!("Translating {}", input.display());

    let json = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read catalog: {}", input.display()))?;

    let client = client_for(config, &settings.api_key);
    let mut controller = Controller::new(client, settings.clone());
    controller.load_catalog(&json)?;
    controller.update(|s| s.exclude_keys(options.exclude.iter().cloned()));

    if !config.expects_source_language(&controller.state().source_language) {
        warn!(
            "{} is written in {}, expected {}",
            input.display(),
            controller.state().source_language,
            config.source_language
        );
    }

    debug!(
        "Catalog source language {}, {} translatable strings",
        controller.state().source_language,
        controller.state().translatable_strings().len()
    );

    for code in &config.target_languages {
        if *code == controller.state().source_language {
            warn!("Skipping {}: it is the catalog's source language", code);
            continue;
        }

        let bar = progress_bar(0, code);
        let summary = controller
            .translate_language_with_progress(code, options.force, |completed, total| {
                bar.set_length(total as u64);
                bar.set_position(completed as u64);
            })
            .await?;
        bar.finish_and_clear();

        if summary.requested == 0 {
            info!("{}: already up to date", code);
        } else if summary.failed > 0 {
            warn!(
                "{}: {} translated, {} failed of {}",
                code, summary.translated, summary.failed, summary.requested
            );
        } else {
            info!("{}: {} strings translated", code, summary.translated);
        }
    }

    let text = controller.output_json()?;
    std::fs::write(output, text)
        .with_context(|| format!("Failed to write catalog: {}", output.display()))?;
    info!("Success: {}", output.display());

    info!("{}", controller.token_usage().summary());
    Ok(())
}

fn run_progress(options: ProgressArgs) -> Result<()> {
    let json = std::fs::read_to_string(&options.input_path)
        .with_context(|| format!("Failed to read catalog: {}", options.input_path.display()))?;

    let state = SessionState::default()
        .load_catalog(&json)?
        .exclude_keys(options.exclude.iter().cloned());
    let state = options.languages.iter().fold(state, |s, code| s.add_language(code));

    for progress in state.progress_for(&options.languages) {
        println!(
            "{:<10} {:<28} {:>5}/{:<5} {:>5.1}%",
            progress.language_code,
            progress.language_name,
            progress.translated_strings,
            progress.total_strings,
            progress.percentage()
        );
    }
    Ok(())
}

fn list_languages() {
    for language in SUPPORTED_LANGUAGES {
        println!("{:<10} {:<28} {}", language.code, language.name, language.native);
    }
}

async fn run_models(options: ModelsArgs) -> Result<()> {
    let mut config = load_config(&options.config_path, None)?;
    if let Some(api_key) = options.api_key {
        config.translation.api_key = api_key;
    }
    let store = open_preferences();
    let settings = resolve_settings(&config, store.as_ref())?;

    let models = fetch_available_models(&client_for(&config, &settings.api_key)).await?;
    if models.is_empty() {
        warn!("No chat models available for this API key");
    }
    for model in models {
        println!("{:<28} {:<28} {}", model.id, model.name, model.description);
    }
    Ok(())
}
