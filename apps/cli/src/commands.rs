//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use specgen_core::{DocumentFileExtractor, Generator};
use specgen_shared::{
    BuildConfig, CONFIG_FILE_NAME, DependencyLevel, Dialect, load_config, load_config_from,
    split_list,
};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// specgen: emit API descriptions as JSON, YAML and Rust sources.
#[derive(Parser)]
#[command(
    name = "specgen",
    version,
    about = "Emit API descriptions as JSON, YAML and embeddable Rust sources.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to ./specgen.toml when present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Generate the documentation artifacts.
    Init(InitArgs),

    /// Configuration management.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Write a config file with defaults.
    Init,
    /// Show resolved configuration.
    Show(InitArgs),
}

/// Dependency parse level flag values.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub(crate) enum DependencyFlag {
    None,
    Models,
    Operations,
    All,
}

impl From<DependencyFlag> for DependencyLevel {
    fn from(flag: DependencyFlag) -> Self {
        match flag {
            DependencyFlag::None => DependencyLevel::None,
            DependencyFlag::Models => DependencyLevel::Models,
            DependencyFlag::Operations => DependencyLevel::Operations,
            DependencyFlag::All => DependencyLevel::All,
        }
    }
}

/// Build flags. Every flag left unset keeps the config file's value.
#[derive(Args, Debug, Default)]
pub(crate) struct InitArgs {
    /// Directories to search, comma separated.
    #[arg(short = 'd', long = "dir")]
    pub search_dirs: Option<String>,

    /// Directories and files to exclude, comma separated.
    #[arg(long)]
    pub exclude: Option<String>,

    /// File holding the general API info, relative to a search dir.
    #[arg(short = 'g', long = "general-info")]
    pub main_api_file: Option<String>,

    /// Output directory.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output types, comma separated: rs, json, yaml.
    #[arg(long = "output-types", visible_alias = "ot")]
    pub output_types: Option<String>,

    /// Instance name distinguishing several documents in one project.
    #[arg(long)]
    pub instance_name: Option<String>,

    /// Variant prefix for alternate artifact sets.
    #[arg(long)]
    pub state: Option<String>,

    /// Dialect to emit: swagger2 or openapi3.
    #[arg(long, value_parser = parse_dialect)]
    pub target_dialect: Option<Dialect>,

    /// Type overrides file.
    #[arg(long)]
    pub overrides_file: Option<String>,

    /// Placeholder delimiters of the generated source, as `left,right`.
    #[arg(long = "template-delims", visible_alias = "td")]
    pub template_delims: Option<String>,

    /// Stamp the generation time into the generated source.
    #[arg(long)]
    pub generated_time: bool,

    /// Dependency parse depth.
    #[arg(long)]
    pub parse_depth: Option<u32>,

    /// How far dependencies are parsed.
    #[arg(long, value_enum)]
    pub parse_dependency: Option<DependencyFlag>,

    #[arg(long)]
    pub parse_vendor: bool,

    #[arg(long)]
    pub parse_internal: bool,

    #[arg(long)]
    pub strict: bool,

    #[arg(long)]
    pub required_by_default: bool,

    #[arg(long)]
    pub parse_func_body: bool,

    /// Property naming strategy: camelcase, snakecase or pascalcase.
    #[arg(long)]
    pub prop_naming_strategy: Option<String>,

    /// Only include operations with these tags, comma separated.
    #[arg(long)]
    pub tags: Option<String>,
}

fn parse_dialect(value: &str) -> std::result::Result<Dialect, String> {
    value.parse().map_err(|e: specgen_shared::SpecgenError| e.to_string())
}

impl InitArgs {
    /// Layer the flags over `config`.
    pub fn apply(&self, config: &mut BuildConfig) -> Result<()> {
        if let Some(dirs) = &self.search_dirs {
            config.search_dirs = split_list(dirs);
        }
        if let Some(excludes) = &self.exclude {
            config.excludes = split_list(excludes);
        }
        if let Some(main) = &self.main_api_file {
            config.main_api_file = main.clone();
        }
        if let Some(output) = &self.output {
            config.output_dir = output.clone();
        }
        if let Some(types) = &self.output_types {
            config.output_types = split_list(types);
        }
        if let Some(name) = &self.instance_name {
            config.instance_name = name.clone();
        }
        if let Some(state) = &self.state {
            config.state = state.clone();
        }
        if let Some(dialect) = self.target_dialect {
            config.target_dialect = dialect;
        }
        if let Some(file) = &self.overrides_file {
            config.overrides_file = file.clone();
        }
        if let Some(delims) = &self.template_delims {
            let (left, right) = delims
                .split_once(',')
                .ok_or_else(|| eyre!("template delimiters must be given as 'left,right'"))?;
            config.left_template_delim = left.trim().to_string();
            config.right_template_delim = right.trim().to_string();
        }
        if let Some(depth) = self.parse_depth {
            config.parse_depth = depth;
        }
        if let Some(level) = self.parse_dependency {
            config.parse.parse_dependency = level.into();
        }
        if let Some(strategy) = &self.prop_naming_strategy {
            config.parse.prop_naming_strategy = strategy.clone();
        }
        if let Some(tags) = &self.tags {
            config.parse.tags = split_list(tags);
        }

        config.generated_time |= self.generated_time;
        config.parse.parse_vendor |= self.parse_vendor;
        config.parse.parse_internal |= self.parse_internal;
        config.parse.strict |= self.strict;
        config.parse.required_by_default |= self.required_by_default;
        config.parse.parse_func_body |= self.parse_func_body;

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "specgen=info",
        1 => "specgen=debug",
        _ => "specgen=trace",
    };

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Init(args) => cmd_init(config_path, &args),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(config_path),
            ConfigAction::Show(args) => cmd_config_show(config_path, &args),
        },
    }
}

/// Defaults, then the config file, then flags.
fn resolve_config(config_path: Option<&Path>, args: &InitArgs) -> Result<BuildConfig> {
    let mut config = match config_path {
        Some(path) => load_config_from(path)?,
        None => load_config(Path::new("."))?,
    };
    args.apply(&mut config)?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_init(config_path: Option<&Path>, args: &InitArgs) -> Result<()> {
    let mut config = resolve_config(config_path, args)?;
    info!(
        dirs = %config.search_dirs.join(","),
        main_api_file = %config.main_api_file,
        "generating documentation"
    );

    let report = Generator::new().build(&mut config, &DocumentFileExtractor)?;

    for artifact in &report.artifacts {
        println!(
            "  {:<16} {} ({} bytes)",
            artifact.kind.to_string(),
            artifact.path.display(),
            artifact.size_bytes
        );
    }
    for skipped in &report.skipped {
        println!("  skipped          output type '{skipped}' not supported");
    }
    println!(
        "  Time:            {:.1}s",
        report.elapsed.as_secs_f64()
    );
    Ok(())
}

fn cmd_config_init(config_path: Option<&Path>) -> Result<()> {
    let path = config_path.map_or_else(|| PathBuf::from(CONFIG_FILE_NAME), Path::to_path_buf);
    if path.exists() {
        return Err(eyre!("config file already exists at {}", path.display()));
    }

    let toml_str = toml::to_string_pretty(&BuildConfig::default())?;
    std::fs::write(&path, toml_str)?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config_path: Option<&Path>, args: &InitArgs) -> Result<()> {
    let mut config = resolve_config(config_path, args)?;
    config.apply_defaults();
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}
