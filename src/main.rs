use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info, warn};

use rowgrid::config::AppConfig;
use rowgrid::feed::{load_all, FeedQuery, FeedTab, JsonFilePageSource, MediaFeed};
use rowgrid::layout::LayoutEngine;
use rowgrid::models::{Layout, MediaItem};
use rowgrid::render::{HtmlRenderer, HtmlSnippetInserter, Inserter, Renderer, TextRenderer};
use rowgrid::scanner::{FileScanner, ScanConfig};

/// Packs media of mixed aspect ratios into full-width rows.
#[derive(Parser, Debug)]
#[command(name = "rowgrid", version, about)]
struct Cli {
    /// Config file path override.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Row width in pixels.
    #[arg(long, global = true)]
    container_width: Option<f64>,

    /// Gap between items and rows in pixels.
    #[arg(long, global = true)]
    gap: Option<f64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Lay out the media files in a directory.
    Scan {
        dir: PathBuf,
        /// Only look at the top level of DIR.
        #[arg(long)]
        no_recursive: bool,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Lay out feed pages saved as JSON, one file per page.
    Feed {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(long, default_value_t = FeedTab::Gif)]
        tab: FeedTab,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Print the insertion snippet for one item of a feed page.
    Insert {
        file: PathBuf,
        #[arg(long)]
        id: String,
        #[arg(long, default_value_t = FeedTab::Gif)]
        tab: FeedTab,
    },
    /// Print the effective configuration.
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Html,
    Text,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rowgrid=info".parse()?),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = effective_config(&cli)?;

    match cli.command {
        Command::Scan {
            dir,
            no_recursive,
            format,
        } => {
            let scanner = FileScanner::with_config(ScanConfig {
                recursive: !no_recursive,
                ..Default::default()
            });
            let (items, _) = scanner.scan_directory(&dir).await?;
            let layout = LayoutEngine::new(config.layout.clone()).layout(&items);
            emit(&layout, format, &config)
        }
        Command::Feed { files, tab, format } => {
            let feed = load_feed(&files, tab, &config)?;
            let layout = LayoutEngine::new(config.layout.clone()).layout(feed.items());
            emit(&layout, format, &config)
        }
        Command::Insert { file, id, tab } => {
            let feed = load_feed(&[file], tab, &config)?;
            let item = find_item(feed.items(), &id)?;
            let mut inserter = HtmlSnippetInserter::new(io::stdout().lock());
            inserter.insert(item)?;
            Ok(())
        }
        Command::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

fn effective_config(cli: &Cli) -> Result<AppConfig> {
    let mut config =
        AppConfig::load_or_default(cli.config.as_deref()).context("Failed to load config")?;

    if let Some(width) = cli.container_width {
        config.layout.container_width = width;
    }
    if let Some(gap) = cli.gap {
        config.layout.gap = gap;
    }
    config.validate().context("Invalid command-line override")?;

    Ok(config)
}

fn load_feed(files: &[PathBuf], tab: FeedTab, config: &AppConfig) -> Result<MediaFeed> {
    let query = FeedQuery::trending(tab);
    debug!(
        url = %query.page_url(&config.feed.base_url, 1, config.feed.page_size),
        "Replaying saved pages"
    );

    let source = JsonFilePageSource::new(files.to_vec());
    let mut feed = MediaFeed::new(query, config.feed.page_size);
    let max_pages = match config.feed.max_pages {
        0 => u32::MAX,
        n => n,
    };
    load_all(&source, &mut feed, max_pages).context("Failed to load feed pages")?;

    if (feed.pages_loaded() as usize) < files.len() {
        warn!(
            "Feed ended after {} of {} files (short page or page limit)",
            feed.pages_loaded(),
            files.len()
        );
    }

    info!("Loaded {} items from {} pages", feed.len(), feed.pages_loaded());
    Ok(feed)
}

fn find_item<'a>(items: &'a [MediaItem], id: &str) -> Result<&'a MediaItem> {
    items
        .iter()
        .find(|item| item.id == id)
        .with_context(|| format!("No item with id {id}"))
}

fn emit(layout: &Layout, format: Format, config: &AppConfig) -> Result<()> {
    let output = match format {
        Format::Json => serde_json::to_string_pretty(layout)? + "\n",
        Format::Html => HtmlRenderer {
            corner_radius: config.render.corner_radius,
        }
        .render(layout),
        Format::Text => TextRenderer.render(layout),
    };

    let mut stdout = io::stdout().lock();
    stdout.write_all(output.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
