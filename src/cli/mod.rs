//! CLI mode for cloud-academy-dl: argument parsing, settings and the download run.

mod progress;

use std::path::PathBuf;

use clap::Parser;
use futures::TryStreamExt;

use crate::config::{DEFAULT_OUTPUT_DIR, FileConfig, default_config_path};
use crate::{
    ConfigError, ContentResolver, CourseUrl, CourseWalker, Credentials, DownloadConfig,
    HttpTransport, Materializer, Resolution, SessionStats, SessionStatsBuilder,
};

pub use progress::{ConsoleProgress, make_progress_bar, print_summary};

/// Download the videos and subtitles of a Cloud Academy course module.
#[derive(Debug, Clone, Parser)]
#[command(name = "cloud-academy-dl", version, about)]
pub struct Args {
    /// URL of any step page of the course module.
    pub url: String,

    /// Text file holding the `authorization: Bearer` and `cookie:` request headers.
    #[arg(long, value_name = "FILE")]
    pub cookie: Option<PathBuf>,

    /// Root directory for downloaded courses.
    #[arg(long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Video resolution: 360, 720 or 1080.
    #[arg(long, value_name = "HEIGHT")]
    pub res: Option<String>,

    /// Configuration file to read defaults from.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Validated inputs for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Parsed course URL.
    pub course_url: CourseUrl,
    /// Request headers for page fetches.
    pub credentials: Credentials,
    /// Where and what to download.
    pub download: DownloadConfig,
}

impl Settings {
    /// Loads the config file (explicit or default location) and merges it with `args`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the config file or any argument is invalid.
    pub fn resolve(args: &Args) -> Result<Self, ConfigError> {
        let file = match &args.config {
            Some(path) => FileConfig::load(path)?.ok_or_else(|| ConfigError::ConfigFile {
                path: path.clone(),
                reason: "file not found".to_string(),
            })?,
            None => match default_config_path() {
                Some(path) => FileConfig::load(&path)?.unwrap_or_default(),
                None => FileConfig::default(),
            },
        };
        Self::resolve_with(args, file)
    }

    /// Merges `args` over `file`. Command-line values win.
    ///
    /// Resolution is checked first, then the cookie file, then the URL.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn resolve_with(args: &Args, file: FileConfig) -> Result<Self, ConfigError> {
        let resolution = match &args.res {
            Some(res) => res.parse::<Resolution>()?,
            None => file.resolution.unwrap_or_default(),
        };

        let cookie_path = args
            .cookie
            .clone()
            .or(file.cookie_file)
            .ok_or(ConfigError::MissingCookieFile)?;
        let credentials = Credentials::from_file(&cookie_path)?;

        let course_url = CourseUrl::parse(&args.url)?;

        let output_dir = args
            .out
            .clone()
            .or(file.output_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

        Ok(Self {
            course_url,
            credentials,
            download: DownloadConfig::new()
                .with_resolution(resolution)
                .with_output_dir(output_dir),
        })
    }
}

/// Initializes the `log` backend. `RUST_LOG` overrides the default filter.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .try_init();
}

/// Runs a full download from command-line arguments.
///
/// # Errors
///
/// Returns an error if the arguments are invalid or the course metadata cannot be
/// resolved. Individual file failures are reported and counted, not returned.
pub async fn run(args: &Args) -> crate::Result<SessionStats> {
    let settings = Settings::resolve(args)?;
    download_course(settings).await
}

/// Walks the course and materializes every job in order.
///
/// # Errors
///
/// Returns an error if a metadata page cannot be fetched or understood.
pub async fn download_course(settings: Settings) -> crate::Result<SessionStats> {
    let resolver = ContentResolver::new(&settings.credentials)?;
    let walker = CourseWalker::open(resolver, settings.course_url, settings.download).await?;

    println!("Course : {}", walker.course().course_title);
    println!("Module : {}", walker.course().module_title);

    let materializer = Materializer::new(HttpTransport::new()?);
    let progress = ConsoleProgress::new();
    let mut stats = SessionStatsBuilder::new();

    let jobs = walker.jobs();
    futures::pin_mut!(jobs);
    loop {
        let job = match jobs.try_next().await {
            Ok(Some(job)) => job,
            Ok(None) => break,
            Err(e) => {
                log::error!("Course walk stopped: {e}");
                return Err(e);
            }
        };
        let outcome = materializer.materialize(&job, &progress).await;
        stats.record(&outcome);
    }

    let stats = stats.build();
    print_summary(&stats);
    println!("Done!");
    Ok(stats)
}
