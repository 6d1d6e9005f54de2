//! Command-line front end for the wikilinker renderer.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process;
use wikilinker_config::SiteConfig;
use wikilinker_engine::{Attribs, LinkOptions, Linker, PageIndex, Query, Site, TocSection, Viewer};

#[derive(Parser)]
#[command(name = "wikilinker", about = "Render wiki links, edit summaries and tables of contents", version)]
struct Cli {
    /// Host settings file (defaults to ~/.config/wikilinker/host-settings.toml)
    #[arg(short, long, env = "WIKILINKER_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Content language code, overriding the host settings
    #[arg(short, long, global = true)]
    lang: Option<String>,

    /// TOML file of existing pages, keyed by prefixed title
    #[arg(short, long, global = true)]
    pages: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a link to a page
    Link {
        target: String,
        /// Link contents as HTML
        #[arg(long)]
        text: Option<String>,
        /// Treat the target as existing
        #[arg(long, conflicts_with = "broken")]
        known: bool,
        /// Treat the target as missing
        #[arg(long)]
        broken: bool,
        #[arg(long)]
        no_classes: bool,
    },
    /// Render an edit summary as a comment block
    Comment {
        summary: String,
        /// Page the summary belongs to
        #[arg(long)]
        title: Option<String>,
        /// Section links stay on the current page
        #[arg(long)]
        local: bool,
    },
    /// Render a table of contents from a TOML section list
    Toc { sections: PathBuf },
    /// Load and validate the host settings
    CheckConfig,
}

#[derive(Deserialize)]
struct Outline {
    sections: Vec<TocSection>,
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<String> {
    let settings = load_settings(cli.config.as_deref())?;

    let mut config = settings
        .as_ref()
        .map(SiteConfig::linker_config)
        .unwrap_or_default();
    if let Some(lang) = cli.lang {
        config.language = lang;
    }
    let site = Site::new(config).context("Failed to load the content language")?;
    let pages = match &cli.pages {
        Some(path) => load_pages(path)?,
        None => PageIndex::new(),
    };
    let viewer = Viewer::new();
    let linker = Linker::new(&site, &pages, &viewer);

    match cli.command {
        Commands::Link {
            target,
            text,
            known,
            broken,
            no_classes,
        } => {
            let mut options = LinkOptions {
                known,
                broken,
                ..LinkOptions::default()
            };
            if no_classes {
                options = options.noclasses();
            }
            Ok(linker.link_text_target(&target, text.as_deref(), &Attribs::new(), &Query::new(), options))
        }
        Commands::Comment { summary, title, local } => {
            let title = match title {
                Some(text) => Some(
                    site.new_title(&text)
                        .with_context(|| format!("Invalid page title {text:?}"))?,
                ),
                None => None,
            };
            Ok(linker.comment_block(&summary, title.as_ref(), local))
        }
        Commands::Toc { sections } => {
            let content = std::fs::read_to_string(&sections)
                .with_context(|| format!("Failed to read {}", sections.display()))?;
            let outline: Outline = toml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", sections.display()))?;
            Ok(linker.generate_toc(&outline.sections))
        }
        Commands::CheckConfig => match &settings {
            Some(settings) => Ok(summarise(settings)),
            None => bail!(
                "No host settings found at {}",
                config_path(cli.config.as_deref()).display()
            ),
        },
    }
}

fn config_path(explicit: Option<&Path>) -> PathBuf {
    explicit.map(Path::to_path_buf).unwrap_or_else(SiteConfig::config_path)
}

fn load_settings(explicit: Option<&Path>) -> Result<Option<SiteConfig>> {
    let path = config_path(explicit);
    log::info!("Config path: {}", path.display());
    let settings = SiteConfig::load_from_path(&path)?;
    if settings.is_none() {
        log::info!("No host settings file, using defaults");
    }
    Ok(settings)
}

fn load_pages(path: &Path) -> Result<PageIndex> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read pages file {}", path.display()))?;
    let pages: PageIndex = toml::from_str(&content)
        .with_context(|| format!("Failed to parse pages file {}", path.display()))?;
    log::debug!("Loaded {} pages", pages.len());
    Ok(pages)
}

/// One line per setting. Passwords and keys are reported as set or unset.
fn summarise(settings: &SiteConfig) -> String {
    let set_or_unset = |value: &str| if value.is_empty() { "unset" } else { "set" };
    let path_or_unset = |path: &Option<PathBuf>| {
        path.as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "unset".to_string())
    };

    let mut lines = vec![
        format!("server: {}", settings.server),
        format!("sitename: {}", settings.linker.sitename),
        format!("language: {}", settings.linker.language),
        format!(
            "database: {} {}@{}/{}",
            settings.database.db_type, settings.database.user, settings.database.server, settings.database.name
        ),
        format!("database password: {}", set_or_unset(&settings.database.password)),
        format!("secret key: {}", set_or_unset(&settings.secret_key)),
        format!("upload directory: {}", path_or_unset(&settings.upload_directory)),
        format!("convert command: {}", path_or_unset(&settings.image_magick_convert_command)),
        format!("diff3: {}", path_or_unset(&settings.diff3)),
    ];
    if !settings.squid_servers.is_empty() {
        lines.push(format!("squid servers: {}", settings.squid_servers.join(", ")));
    }
    for (name, module) in &settings.virtual_rest.modules {
        lines.push(format!("rest module {name}: {}", module.url));
    }
    if let Some(smtp) = &settings.smtp {
        lines.push(format!(
            "smtp: {}:{}{}",
            smtp.host,
            smtp.port,
            if smtp.auth { " (auth)" } else { "" }
        ));
    }
    lines.join("\n")
}
