use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use newsdata::config::{default_config_path, find_config_file, load_config, ConfigFile};
use newsdata::{
    ArchiveNewsQuery, Article, CryptoNewsQuery, LatestNewsQuery, NewsDataClient, NewsQuery,
    NewsSource, SourcesQuery, Timeframe,
};
use std::io::IsTerminal;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// NewsData - Search latest, archived and crypto news from the NewsData.io API
#[derive(Parser, Debug)]
#[command(name = "newsdata")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search latest, archived and crypto news from the NewsData.io API", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (-v for debug, -vv for trace)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = OutputFormat::Auto)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Table if stdout is a terminal, JSON otherwise
    Auto,
    /// Table format (human-readable)
    Table,
    /// One JSON object per line, printed as results arrive
    Json,
    /// Plain text, printed as results arrive
    Plain,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// News published in the past 48 hours
    Latest {
        /// Search term
        #[arg(default_value = "")]
        query: String,

        /// Window such as "6" (hours) or "90m" (minutes)
        #[arg(long)]
        timeframe: Option<Timeframe>,

        /// AI tags (comma-separated)
        #[arg(long, value_delimiter = ',')]
        tag: Vec<String>,

        /// positive, negative or neutral
        #[arg(long)]
        sentiment: Option<String>,

        /// Regions (comma-separated)
        #[arg(long, value_delimiter = ',')]
        region: Vec<String>,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Historical news
    Archive {
        /// Search term
        #[arg(default_value = "")]
        query: String,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Cryptocurrency news
    Crypto {
        /// Search term
        #[arg(default_value = "")]
        query: String,

        /// Coin symbols (comma-separated, e.g. btc,eth)
        #[arg(long, value_delimiter = ',')]
        coin: Vec<String>,

        /// AI tags (comma-separated)
        #[arg(long, value_delimiter = ',')]
        tag: Vec<String>,

        /// positive, negative or neutral
        #[arg(long)]
        sentiment: Option<String>,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// List news sources
    Sources {
        #[arg(long)]
        country: Option<String>,

        #[arg(long)]
        language: Option<String>,

        #[arg(long)]
        category: Option<String>,

        /// top, medium or low
        #[arg(long)]
        priority: Option<String>,

        /// Source domain URL
        #[arg(long)]
        domain_url: Option<String>,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Write a configuration file with every default spelled out
    Init {
        /// Where to write it (default: per-user config directory)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the configuration file in use
    Path,

    /// Print the effective configuration (API key masked)
    Show {
        /// Print only what the configuration file itself sets
        #[arg(long)]
        file: bool,
    },
}

/// Filters shared by the article commands
#[derive(Args, Debug)]
struct FilterArgs {
    /// Maximum number of articles (0 = all the server reports)
    #[arg(long, short = 'n', default_value_t = 10)]
    max: u64,

    /// Search in titles only
    #[arg(long, conflicts_with = "query")]
    title: Option<String>,

    /// Search in titles, URLs and meta data
    #[arg(long, conflicts_with_all = ["query", "title"])]
    meta: Option<String>,

    /// Languages (comma-separated)
    #[arg(long, short, value_delimiter = ',')]
    language: Vec<String>,

    /// Countries (comma-separated)
    #[arg(long, short = 'c', value_delimiter = ',')]
    country: Vec<String>,

    /// Categories (comma-separated)
    #[arg(long, value_delimiter = ',')]
    category: Vec<String>,

    /// Categories to exclude (comma-separated)
    #[arg(long, value_delimiter = ',')]
    exclude_category: Vec<String>,

    /// Domains (comma-separated)
    #[arg(long, value_delimiter = ',')]
    domain: Vec<String>,

    /// Domains to exclude (comma-separated)
    #[arg(long, value_delimiter = ',')]
    exclude_domain: Vec<String>,

    /// top, medium or low
    #[arg(long)]
    priority: Option<String>,

    /// Results per request (1-50)
    #[arg(long)]
    size: Option<u32>,

    /// Drop articles the API marks as duplicates
    #[arg(long)]
    remove_duplicates: bool,

    /// Continue from a page token printed by an earlier run
    #[arg(long)]
    page: Option<String>,
}

impl FilterArgs {
    fn apply<Q: NewsQuery>(&self, mut query: Q) -> Q {
        if let Some(title) = &self.title {
            query = query.query_in_title(title.as_str());
        }
        if let Some(meta) = &self.meta {
            query = query.query_in_metadata(meta.as_str());
        }
        query = query
            .languages(self.language.iter().cloned())
            .countries(self.country.iter().cloned())
            .categories(self.category.iter().cloned())
            .exclude_categories(self.exclude_category.iter().cloned())
            .domains(self.domain.iter().cloned())
            .exclude_domains(self.exclude_domain.iter().cloned());
        if let Some(priority) = &self.priority {
            query = query.priority_domain(priority.as_str());
        }
        if let Some(size) = self.size {
            query = query.size(size);
        }
        if let Some(page) = &self.page {
            query = query.page(page.as_str());
        }
        query
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().or_else(find_config_file);
    let mut config = load_config(config_path.as_deref()).context("failed to load configuration")?;
    if let Some(timeout) = cli.timeout {
        config.http.timeout_secs = timeout;
    }

    let level = if cli.quiet {
        "error".to_string()
    } else {
        match cli.verbose {
            0 => config.logging.level.clone(),
            1 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("newsdata={}", level)));
    let json_logs = config.logging.format.as_deref() == Some("json");
    tracing_subscriber::registry()
        .with(filter)
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json_logs).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();

    if let Some(path) = &config_path {
        tracing::debug!("Using config file: {}", path.display());
    }

    let format = resolve_format(cli.output);

    match cli.command {
        Commands::Config { action } => run_config(action, config_path, &config),
        Commands::Sources {
            country,
            language,
            category,
            priority,
            domain_url,
        } => {
            let client = NewsDataClient::from_config(&config)?;
            let mut query = SourcesQuery::new();
            if let Some(country) = country {
                query = query.country(country);
            }
            if let Some(language) = language {
                query = query.language(language);
            }
            if let Some(category) = category {
                query = query.category(category);
            }
            if let Some(priority) = priority {
                query = query.priority_domain(priority);
            }
            if let Some(domain_url) = domain_url {
                query = query.domain_url(domain_url);
            }
            let sources = client.list_sources(&query).await?;
            output_sources(&sources, format)
        }
        Commands::Latest {
            query,
            timeframe,
            tag,
            sentiment,
            region,
            filters,
        } => {
            let mut latest = filters
                .apply(LatestNewsQuery::new(query))
                .tags(tag)
                .regions(region);
            if let Some(timeframe) = timeframe {
                latest = latest.timeframe(timeframe);
            }
            if let Some(sentiment) = sentiment {
                latest = latest.sentiment(sentiment);
            }
            if filters.remove_duplicates {
                latest = latest.remove_duplicates();
            }
            let client = NewsDataClient::from_config(&config)?;
            run_articles(&client, latest, filters.max, format).await
        }
        Commands::Archive {
            query,
            from,
            to,
            filters,
        } => {
            let mut archive = filters.apply(ArchiveNewsQuery::new(query));
            if let Some(from) = from {
                archive = archive.from_date(from);
            }
            if let Some(to) = to {
                archive = archive.to_date(to);
            }
            let client = NewsDataClient::from_config(&config)?;
            run_articles(&client, archive, filters.max, format).await
        }
        Commands::Crypto {
            query,
            coin,
            tag,
            sentiment,
            from,
            to,
            filters,
        } => {
            let mut crypto = filters
                .apply(CryptoNewsQuery::new(query))
                .coins(coin)
                .tags(tag);
            if let Some(sentiment) = sentiment {
                crypto = crypto.sentiment(sentiment);
            }
            if let Some(from) = from {
                crypto = crypto.from_date(from);
            }
            if let Some(to) = to {
                crypto = crypto.to_date(to);
            }
            if filters.remove_duplicates {
                crypto = crypto.remove_duplicates();
            }
            let client = NewsDataClient::from_config(&config)?;
            run_articles(&client, crypto, filters.max, format).await
        }
    }
}

fn resolve_format(format: OutputFormat) -> OutputFormat {
    if format == OutputFormat::Auto {
        if std::io::stdout().is_terminal() {
            OutputFormat::Table
        } else {
            OutputFormat::Json
        }
    } else {
        format
    }
}

/// Run a retrieval, printing as articles arrive. Ctrl-C cancels the session.
async fn run_articles<Q: NewsQuery>(
    client: &NewsDataClient,
    query: Q,
    max: u64,
    format: OutputFormat,
) -> Result<()> {
    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let mut session = client.retrieve(query, max, cancel)?;
    let mut collected = Vec::new();
    let mut outcome = Ok(());

    while let Some(item) = session.next().await {
        match item {
            Ok(article) => match format {
                OutputFormat::Json => println!("{}", serde_json::to_string(&article)?),
                OutputFormat::Plain => print_plain(&article),
                _ => collected.push(article),
            },
            Err(err) => outcome = Err(err),
        }
    }

    if !collected.is_empty() {
        print_table(&collected);
    }

    match outcome {
        Ok(()) => {
            if let Some(token) = session.next_page_token() {
                eprintln!("More results available: --page {}", token);
            }
            Ok(())
        }
        Err(err) if err.is_cancelled() => {
            eprintln!("Cancelled after {} articles", session.emitted());
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

fn print_plain(article: &Article) {
    println!("{} ({})", article.title, article.source_label());
    println!("  URL: {}", article.link);
    if let Some(date) = article.pub_date {
        println!("  Published: {}", date);
    }
    if !article.category.is_empty() {
        println!("  Category: {}", article.category.join(", "));
    }
    println!();
}

fn print_table(articles: &[Article]) {
    use comfy_table::{Attribute, Cell, Table};
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Title", "Source", "Published", "Language"]);

    for article in articles {
        let published = article
            .pub_date
            .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();

        table.add_row(vec![
            Cell::new(truncate(&article.title, 60)).add_attribute(Attribute::Bold),
            Cell::new(truncate(article.source_label(), 25)),
            Cell::new(published),
            Cell::new(&article.language),
        ]);
    }
    println!("{table}");
}

fn output_sources(sources: &[NewsSource], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            for source in sources {
                println!("{}", serde_json::to_string(source)?);
            }
        }
        OutputFormat::Plain => {
            for source in sources {
                println!("{} ({})", source.name, source.id);
                println!("  URL: {}", source.url);
                if !source.category.is_empty() {
                    println!("  Category: {}", source.category.join(", "));
                }
                println!();
            }
        }
        _ => {
            use comfy_table::{Cell, Table};
            let mut table = Table::new();
            table.load_preset(comfy_table::presets::UTF8_FULL);
            table.set_header(vec!["ID", "Name", "Priority", "Categories", "Languages"]);
            for source in sources {
                table.add_row(vec![
                    Cell::new(&source.id),
                    Cell::new(truncate(&source.name, 30)),
                    Cell::new(source.priority),
                    Cell::new(truncate(&source.category.join(", "), 30)),
                    Cell::new(truncate(&source.language.join(", "), 20)),
                ]);
            }
            println!("{table}");
        }
    }
    Ok(())
}

fn masked(mut file: ConfigFile) -> ConfigFile {
    if file.api.key.is_some() {
        file.api.key = Some("********".to_string());
    }
    file
}

fn run_config(
    action: ConfigAction,
    config_path: Option<PathBuf>,
    config: &newsdata::config::Config,
) -> Result<()> {
    match action {
        ConfigAction::Init { path, force } => {
            let Some(path) = path.or_else(default_config_path) else {
                bail!("no config directory available; pass --path");
            };
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            ConfigFile::create_default().save(&path)?;
            println!("Wrote {}", path.display());
        }
        ConfigAction::Path => match config_path {
            Some(path) => println!("{}", path.display()),
            None => println!("No configuration file found"),
        },
        ConfigAction::Show { file: false } => {
            print!("{}", toml::to_string_pretty(&masked(ConfigFile::from(config)))?);
        }
        ConfigAction::Show { file: true } => {
            let Some(path) = config_path else {
                bail!("no configuration file found");
            };
            let on_disk = ConfigFile::load(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            println!("# {}", path.display());
            print!("{}", toml::to_string_pretty(&masked(on_disk))?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_latest() {
        let cli = Cli::try_parse_from([
            "newsdata", "latest", "rust", "--max", "25", "-l", "en,fr", "--timeframe", "90m",
        ])
        .unwrap();
        match cli.command {
            Commands::Latest {
                query,
                timeframe,
                filters,
                ..
            } => {
                assert_eq!(query, "rust");
                assert_eq!(timeframe, Some(Timeframe::Minutes(90)));
                assert_eq!(filters.max, 25);
                assert_eq!(filters.language, vec!["en", "fr"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_filters_apply() {
        let cli = Cli::try_parse_from([
            "newsdata", "archive", "--title", "election", "--from", "2024-01-01", "-c", "us",
        ])
        .unwrap();
        let Commands::Archive { query, filters, from, .. } = cli.command else {
            panic!("expected archive");
        };
        let archive = filters.apply(ArchiveNewsQuery::new(query));
        assert_eq!(archive.base.query_in_title, "election");
        assert_eq!(archive.base.countries, vec!["us"]);
        assert_eq!(from, NaiveDate::from_ymd_opt(2024, 1, 1));
    }

    #[test]
    fn test_config_show_file_masks_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("newsdata.toml");
        std::fs::write(&path, "[api]\nkey = \"pub_secret\"\n\n[http]\ntimeout_secs = 9\n").unwrap();

        let shown = masked(ConfigFile::load(&path).unwrap());
        assert_eq!(shown.api.key.as_deref(), Some("********"));
        assert_eq!(shown.http.timeout_secs, Some(9));
        assert_eq!(shown.api.base_url, None);

        let cli = Cli::try_parse_from(["newsdata", "config", "show", "--file"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config {
                action: ConfigAction::Show { file: true }
            }
        ));
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééééééééééé", 6), "ééé...");
    }

    #[test]
    fn test_output_format_values() {
        assert_eq!(resolve_format(OutputFormat::Json), OutputFormat::Json);
        assert_eq!(resolve_format(OutputFormat::Plain), OutputFormat::Plain);
    }
}
