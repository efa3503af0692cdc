//! cineview - terminal movie and TV discovery client.

/// Application configuration (TOML).
mod config;
/// Terminal UI components.
mod tui;

use std::fs::File;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use cineview_api::tmdb::{
    LocalTmdbApi, MovieList, SearchMovieParams, SearchTvParams, TmdbClient, TvList, image_url,
};
use cineview_core::browser::Browser;
use cineview_core::content::{ContentItem, ContentKind, ContentRef, from_page};
use cineview_core::overlay::{
    Avatar, CreditsView, DetailFull, ImageView, OverlayController, OverlayRequest, PersonView,
    rating_view,
};
use cineview_core::route::{Route, is_valid_keyword, normalize_keyword};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{AppConfig, TmdbAuth, log_path_for, resolve_config_path};
use crate::tui::run_browser;

/// CLI argument parser.
#[derive(Parser)]
#[command(name = "cineview", about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Browse movies and TV shows interactively.
    Browse(BrowseArgs),
    /// Query TMDB API.
    Tmdb(TmdbCommand),
    /// Show or create the config file.
    Config(ConfigCommand),
    /// Print shell completions.
    Completions(CompletionsArgs),
}

/// Arguments for the `browse` subcommand.
#[derive(clap::Args)]
struct BrowseArgs {
    /// Initial route, e.g. "/show/1399" or "/search?keyword=matrix".
    #[arg(long, default_value = "/")]
    route: String,
}

/// Arguments for the `tmdb` subcommand.
#[derive(clap::Args)]
struct TmdbCommand {
    /// TMDB subcommand to run.
    #[command(subcommand)]
    command: TmdbSubcommands,
}

/// Available TMDB subcommands.
#[derive(Subcommand)]
enum TmdbSubcommands {
    /// List a movie catalog.
    Movies(TmdbMoviesArgs),
    /// List a TV catalog.
    Shows(TmdbShowsArgs),
    /// Search movies and TV shows.
    Search(TmdbSearchArgs),
    /// Show details and credits for one title.
    Details(TmdbDetailsArgs),
    /// Print the full URL for an image path.
    ImageUrl(TmdbImageUrlArgs),
}

/// Movie catalog lists.
#[derive(Clone, Copy, ValueEnum)]
enum MovieListArg {
    /// Now playing in theaters.
    NowPlaying,
    /// Popular.
    Popular,
    /// Top rated.
    TopRated,
    /// Upcoming releases.
    Upcoming,
}

impl From<MovieListArg> for MovieList {
    fn from(arg: MovieListArg) -> Self {
        match arg {
            MovieListArg::NowPlaying => Self::NowPlaying,
            MovieListArg::Popular => Self::Popular,
            MovieListArg::TopRated => Self::TopRated,
            MovieListArg::Upcoming => Self::Upcoming,
        }
    }
}

/// TV catalog lists.
#[derive(Clone, Copy, ValueEnum)]
enum TvListArg {
    /// Airing in the next seven days.
    OnTheAir,
    /// Airing today.
    AiringToday,
    /// Popular.
    Popular,
    /// Top rated.
    TopRated,
}

impl From<TvListArg> for TvList {
    fn from(arg: TvListArg) -> Self {
        match arg {
            TvListArg::OnTheAir => Self::OnTheAir,
            TvListArg::AiringToday => Self::AiringToday,
            TvListArg::Popular => Self::Popular,
            TvListArg::TopRated => Self::TopRated,
        }
    }
}

/// Content kind argument.
#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    /// A movie.
    Movie,
    /// A TV show.
    Show,
}

impl From<KindArg> for ContentKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Movie => Self::Movie,
            KindArg::Show => Self::Show,
        }
    }
}

/// Arguments for the `tmdb movies` subcommand.
#[derive(clap::Args)]
struct TmdbMoviesArgs {
    /// Which list to fetch.
    #[arg(long, value_enum, default_value = "now-playing")]
    list: MovieListArg,
}

/// Arguments for the `tmdb shows` subcommand.
#[derive(clap::Args)]
struct TmdbShowsArgs {
    /// Which list to fetch.
    #[arg(long, value_enum, default_value = "on-the-air")]
    list: TvListArg,
}

/// Arguments for the `tmdb search` subcommand.
#[derive(clap::Args)]
struct TmdbSearchArgs {
    /// Search keyword (at least 2 characters).
    #[arg(long)]
    keyword: String,
}

/// Arguments for the `tmdb details` subcommand.
#[derive(clap::Args)]
struct TmdbDetailsArgs {
    /// Movie or show.
    #[arg(long, value_enum)]
    kind: KindArg,

    /// TMDB ID.
    #[arg(long)]
    id: u64,
}

/// Arguments for the `tmdb image-url` subcommand.
#[derive(clap::Args)]
struct TmdbImageUrlArgs {
    /// Image path as returned by TMDB, e.g. "/abc.jpg".
    #[arg(long)]
    path: String,

    /// Size token, e.g. "w500" (default: original).
    #[arg(long)]
    size: Option<String>,
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Print the effective configuration.
    Show,
    /// Write a config file with default values.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

/// Arguments for the `completions` subcommand.
#[derive(clap::Args)]
struct CompletionsArgs {
    /// Target shell.
    shell: Shell,
}

/// Builds a `TmdbClient` from the environment and config.
///
/// `TMDB_API_KEY` wins over `[tmdb].api_key`; `TMDB_API_TOKEN` is used
/// when no API key is available.
///
/// # Errors
///
/// Returns an error if no credentials are available or the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client(config: &AppConfig) -> Result<TmdbClient> {
    let auth = config
        .tmdb
        .resolve_auth(
            std::env::var("TMDB_API_KEY").ok(),
            std::env::var("TMDB_API_TOKEN").ok(),
        )
        .context(
            "TMDB credentials are required: set TMDB_API_KEY, [tmdb].api_key in config.toml, or TMDB_API_TOKEN",
        )?;

    let builder = match auth {
        TmdbAuth::ApiKey(key) => TmdbClient::builder().api_key(key),
        TmdbAuth::Token(token) => TmdbClient::builder().api_token(token),
    };
    builder
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()
        .context("failed to build TMDB client")
}

/// Loads the config for `dir`.
fn load_config(dir: Option<&PathBuf>) -> Result<AppConfig> {
    let path = resolve_config_path(dir)?;
    AppConfig::load(&path)
}

/// Logs one content row.
fn log_item(item: &ContentItem) {
    let year = item
        .year()
        .map_or_else(|| String::from("-"), |y| y.to_string());
    let rating = rating_view(item.vote_average(), item.vote_count())
        .map_or_else(|| String::from("-"), |r| r.average);
    tracing::info!(
        "{}\t{}\t{}\t{}",
        item.id(),
        year,
        rating,
        item.display_name()
    );
}

/// Runs the `browse` subcommand.
///
/// # Errors
///
/// Returns an error if the client cannot be built or the TUI fails.
#[instrument(skip_all)]
async fn run_browse(args: &BrowseArgs, config: &AppConfig) -> Result<()> {
    let client = Arc::new(build_tmdb_client(config)?);
    let route = Route::parse(&args.route);
    tracing::info!(%route, "starting browser");

    let mut browser = Browser::new(client, config.browser_config());
    browser.navigate(route);
    run_browser(&mut browser, config.ui.animation()).await
}

/// Runs the `tmdb movies` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_tmdb_movies(args: &TmdbMoviesArgs, config: &AppConfig) -> Result<()> {
    let client = build_tmdb_client(config)?;
    let list = MovieList::from(args.list);
    let params = config.browser_config().list;

    let page = client
        .movie_list(list, &params)
        .await
        .with_context(|| format!("TMDB {} request failed", list.path()))?;

    tracing::info!("Total results: {}", page.total_results);
    tracing::info!("ID\tYear\tRating\tTitle");
    for item in &from_page(page) {
        log_item(item);
    }

    Ok(())
}

/// Runs the `tmdb shows` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_tmdb_shows(args: &TmdbShowsArgs, config: &AppConfig) -> Result<()> {
    let client = build_tmdb_client(config)?;
    let list = TvList::from(args.list);
    let params = config.browser_config().list;

    let page = client
        .tv_list(list, &params)
        .await
        .with_context(|| format!("TMDB {} request failed", list.path()))?;

    tracing::info!("Total results: {}", page.total_results);
    tracing::info!("ID\tYear\tRating\tName");
    for item in &from_page(page) {
        log_item(item);
    }

    Ok(())
}

/// Runs the `tmdb search` subcommand.
///
/// # Errors
///
/// Returns an error if the keyword is too short, the TMDB client fails to
/// build, or either search request fails.
#[instrument(skip_all)]
async fn run_tmdb_search(args: &TmdbSearchArgs, config: &AppConfig) -> Result<()> {
    if !is_valid_keyword(&args.keyword) {
        bail!("--keyword must contain at least 2 characters");
    }
    let keyword = normalize_keyword(&args.keyword);
    let client = build_tmdb_client(config)?;

    let mut movie_params =
        SearchMovieParams::new(keyword.clone()).language(config.tmdb.language.clone());
    if let Some(region) = &config.tmdb.region {
        movie_params = movie_params.region(region.clone());
    }
    let show_params = SearchTvParams::new(keyword).language(config.tmdb.language.clone());

    let (movies, shows) = futures::try_join!(
        async {
            client
                .search_movie(&movie_params)
                .await
                .context("TMDB search/movie request failed")
        },
        async {
            client
                .search_tv(&show_params)
                .await
                .context("TMDB search/tv request failed")
        },
    )?;

    for (heading, items) in [("Movies", from_page(movies)), ("TV Shows", from_page(shows))] {
        tracing::info!("{heading} ({})", items.len());
        if items.is_empty() {
            tracing::info!("  No results");
        }
        for item in &items {
            log_item(item);
        }
    }

    Ok(())
}

/// Fetches detail and credits, then profile images, through an overlay controller.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the detail request fails.
#[instrument(skip_all, fields(id = args.id))]
async fn run_tmdb_details(args: &TmdbDetailsArgs, config: &AppConfig) -> Result<()> {
    let client = build_tmdb_client(config)?;
    let kind = ContentKind::from(args.kind);
    let target = ContentRef { kind, id: args.id };
    let language = config.tmdb.language.as_str();
    let overlay_config = config.browser_config().overlay;

    let (detail, credits) = futures::try_join!(
        async {
            let detail = match kind {
                ContentKind::Movie => client
                    .movie_details(target.id, language)
                    .await
                    .map(DetailFull::from),
                ContentKind::Show => client
                    .tv_details(target.id, language)
                    .await
                    .map(DetailFull::from),
            };
            detail.context("TMDB details request failed")
        },
        async {
            let credits = match kind {
                ContentKind::Movie => client.movie_credits(target.id, language).await,
                ContentKind::Show => client.tv_credits(target.id, language).await,
            };
            credits.context("TMDB credits request failed")
        },
    )?;

    let mut overlay = OverlayController::open(OverlayRequest::new(target), overlay_config);
    overlay.apply_detail(Ok(detail));
    let people = overlay.apply_credits(Ok(credits));

    let images = futures::future::join_all(people.iter().map(|person_id| {
        let client = &client;
        async move {
            let result = client
                .person_images(*person_id)
                .await
                .map(|images| images.profiles.into_iter().next().map(|p| p.file_path));
            (*person_id, result)
        }
    }))
    .await;
    for (person_id, result) in images {
        overlay.apply_person_image(person_id, result);
    }

    let view = overlay.view();
    tracing::info!("{} [{}]", view.title, view.kind);
    if let Some(tagline) = &view.tagline {
        tracing::info!("{tagline}");
    }
    if !view.genres.is_empty() {
        tracing::info!("Genres: {}", view.genres.join(", "));
    }
    if !view.facts.is_empty() {
        tracing::info!("{}", view.facts.join(" | "));
    }
    match &view.rating {
        Some(rating) => tracing::info!("Rating: {} ({} votes)", rating.average, rating.votes),
        None => tracing::info!("Rating: not rated"),
    }
    match &view.image {
        ImageView::Image(url) => tracing::info!("Backdrop: {url}"),
        ImageView::Placeholder(text) => tracing::info!("Backdrop: {text}"),
    }
    tracing::info!("{}", view.overview);
    if let CreditsView::Ready { cast, crew } = &view.credits {
        tracing::info!("Cast:");
        cast.iter().for_each(log_person);
        tracing::info!("Crew:");
        crew.iter().for_each(log_person);
    }
    tracing::info!("{}", view.web_url);

    Ok(())
}

/// Logs one cast or crew row.
fn log_person(person: &PersonView) {
    let avatar = match &person.avatar {
        Avatar::Loading => "...",
        Avatar::Image(url) => url.as_str(),
        Avatar::Placeholder(text) => text,
    };
    tracing::info!("  {}\t{}\t{}", person.name, person.role, avatar);
}

/// Runs the `tmdb image-url` subcommand.
#[allow(clippy::unnecessary_wraps)]
fn run_tmdb_image_url(args: &TmdbImageUrlArgs) -> Result<()> {
    tracing::info!("{}", image_url(&args.path, args.size.as_deref()));
    Ok(())
}

/// Runs the `config show` subcommand.
///
/// # Errors
///
/// Returns an error if the config file cannot be read or serialized.
#[instrument(skip_all)]
fn run_config_show(dir: Option<&PathBuf>) -> Result<()> {
    let path = resolve_config_path(dir)?;
    let config = AppConfig::load(&path)?;
    tracing::info!("# {}", path.display());
    for line in config.to_redacted_toml()?.lines() {
        tracing::info!("{line}");
    }
    Ok(())
}

/// Runs the `config init` subcommand.
///
/// # Errors
///
/// Returns an error if the file exists (without `--force`) or cannot be written.
#[instrument(skip_all)]
fn run_config_init(dir: Option<&PathBuf>, force: bool) -> Result<()> {
    let path = resolve_config_path(dir)?;
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    AppConfig::default().save(&path)?;
    tracing::info!("Wrote {}", path.display());
    Ok(())
}

/// Writes completions for `shell` to stdout.
fn run_completions(args: &CompletionsArgs) {
    let mut command = Cli::command();
    clap_complete::generate(args.shell, &mut command, "cineview", &mut std::io::stdout());
}

/// Log destination: stdout, or a file while the TUI owns the terminal.
fn log_writer(cli: &Cli) -> Result<(BoxMakeWriter, bool)> {
    if !matches!(cli.command, Commands::Browse(_)) {
        let ansi = std::io::stdout().is_terminal();
        return Ok((BoxMakeWriter::new(std::io::stdout), ansi));
    }
    let log_path = log_path_for(&resolve_config_path(cli.dir.as_ref())?);
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    let file = File::create(&log_path)
        .with_context(|| format!("failed to create {}", log_path.display()))?;
    Ok((BoxMakeWriter::new(Mutex::new(file)), false))
}

/// Flushes OpenTelemetry metrics on exit.
#[cfg(feature = "otel")]
struct TelemetryGuard {
    meter_provider: Option<opentelemetry_sdk::metrics::SdkMeterProvider>,
}

#[cfg(feature = "otel")]
impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.meter_provider.take()
            && let Err(err) = provider.shutdown()
        {
            tracing::debug!("failed to shut down meter provider: {err}");
        }
    }
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let (writer, ansi) = log_writer(&cli)?;

    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer)
            .init();
    }

    #[cfg(feature = "otel")]
    let _telemetry = {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer);

        let otlp_enabled = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT").is_ok();

        let otel_layer = otlp_enabled
            .then(|| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            })
            .flatten();

        let meter_provider = otlp_enabled
            .then(|| {
                let exporter = opentelemetry_otlp::MetricExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;
                let provider = opentelemetry_sdk::metrics::SdkMeterProvider::builder()
                    .with_periodic_exporter(exporter)
                    .build();
                opentelemetry::global::set_meter_provider(provider.clone());
                Some(provider)
            })
            .flatten();

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();

        TelemetryGuard { meter_provider }
    };

    let dir = cli.dir.as_ref();
    match &cli.command {
        Commands::Browse(args) => run_browse(args, &load_config(dir)?).await,
        Commands::Tmdb(tmdb) => match &tmdb.command {
            TmdbSubcommands::Movies(args) => run_tmdb_movies(args, &load_config(dir)?).await,
            TmdbSubcommands::Shows(args) => run_tmdb_shows(args, &load_config(dir)?).await,
            TmdbSubcommands::Search(args) => run_tmdb_search(args, &load_config(dir)?).await,
            TmdbSubcommands::Details(args) => run_tmdb_details(args, &load_config(dir)?).await,
            TmdbSubcommands::ImageUrl(args) => run_tmdb_image_url(args),
        },
        Commands::Config(cmd) => match cmd.command {
            ConfigSubcommands::Show => run_config_show(dir),
            ConfigSubcommands::Init { force } => run_config_init(dir, force),
        },
        Commands::Completions(args) => {
            run_completions(args);
            Ok(())
        }
    }
}
