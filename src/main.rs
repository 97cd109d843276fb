// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use cliphub::app_config::{self, Config};
use cliphub::app_controller::{AdminAction, AdminOutcome, Controller, DirectorySink};
use cliphub::file_utils::FileManager;
use cliphub::model::{AgeRating, MediaSource, MovieMetadata, VideoItem};

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
    /// Export one video or audio file as a standalone player
    Single(SingleArgs),

    /// Export every media file of a directory as one channel
    Channel(ChannelArgs),

    /// Export a multi-channel hub described by a JSON manifest
    Hub(HubArgs),

    /// Edit a delivered artifact through its admin console
    Admin(AdminArgs),

    /// Parse a WEBVTT file and print its normalized form
    Cues {
        /// Cue file to inspect
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Generate shell completions for cliphub
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct SingleArgs {
    /// Media file to embed
    #[arg(value_name = "MEDIA")]
    media: PathBuf,

    /// Title, defaults to the file name
    #[arg(long)]
    title: Option<String>,

    #[arg(long, default_value = "")]
    description: String,

    #[arg(long, default_value = "")]
    genre: String,

    /// Age rating (L, 10, 12, 14, 16, 18)
    #[arg(long, default_value = "L")]
    rating: String,

    /// WEBVTT cue file
    #[arg(long, value_name = "FILE")]
    subtitles: Option<PathBuf>,

    /// Thumbnail image
    #[arg(long, value_name = "FILE")]
    thumbnail: Option<PathBuf>,

    /// Admin secret; enables the admin console
    #[arg(long)]
    secret: Option<String>,

    /// Also write a public copy without the admin console
    #[arg(long)]
    public_copy: bool,

    /// Hide the watermark
    #[arg(long)]
    no_watermark: bool,

    /// Fill metadata with the configured enrichment provider
    #[arg(long)]
    enrich: bool,

    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,
}

#[derive(Args, Debug)]
struct ChannelArgs {
    /// Directory to scan for media
    #[arg(value_name = "DIR")]
    dir: PathBuf,

    #[arg(long)]
    name: String,

    #[arg(long, default_value = "")]
    description: String,

    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,
}

#[derive(Args, Debug)]
struct HubArgs {
    /// Hub manifest
    #[arg(value_name = "MANIFEST")]
    manifest: PathBuf,

    /// Also write a public copy without the admin console
    #[arg(long)]
    public_copy: bool,

    /// Fill metadata with the configured enrichment provider
    #[arg(long)]
    enrich: bool,

    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,
}

#[derive(Args, Debug)]
struct AdminArgs {
    /// Artifact to edit
    #[arg(value_name = "ARTIFACT")]
    artifact: PathBuf,

    /// Secret of the artifact
    #[arg(long)]
    secret: String,

    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    #[command(subcommand)]
    action: AdminCommand,
}

#[derive(Subcommand, Debug)]
enum AdminCommand {
    /// Show channels and videos
    List,
    /// Append an empty channel
    AddChannel { name: String },
    /// Delete a channel by index
    DeleteChannel { index: usize },
    /// Append a media file to a channel
    AddVideo {
        channel: usize,
        file: PathBuf,
        #[arg(long)]
        title: Option<String>,
    },
    /// Delete a video by channel and video index
    DeleteVideo { channel: usize, video: usize },
    /// Save with a new secret; an empty secret makes the copy public
    SetSecret { secret: String },
    /// Save a copy keeping the current secret
    Backup,
    /// Save a public copy without the admin console
    Public,
    /// Rename a single-media artifact
    RenameTitle { title: String },
}

impl From<AdminCommand> for AdminAction {
    fn from(command: AdminCommand) -> Self {
        match command {
            AdminCommand::List => AdminAction::List,
            AdminCommand::AddChannel { name } => AdminAction::AddChannel { name },
            AdminCommand::DeleteChannel { index } => AdminAction::DeleteChannel { index },
            AdminCommand::AddVideo { channel, file, title } => AdminAction::AddVideo { channel, file, title },
            AdminCommand::DeleteVideo { channel, video } => AdminAction::DeleteVideo { channel, video },
            AdminCommand::SetSecret { secret } => AdminAction::SetSecret { secret },
            AdminCommand::Backup => AdminAction::Backup,
            AdminCommand::Public => AdminAction::Public,
            AdminCommand::RenameTitle { title } => AdminAction::RenameTitle { title },
        }
    }
}

/// cliphub - self-contained video hubs
///
/// Packages videos, subtitles and metadata into single HTML files that play
/// offline and can be administered after delivery.
#[derive(Parser, Debug)]
#[command(name = "cliphub")]
#[command(version)]
#[command(about = "Self-contained video hub generator")]
#[command(long_about = "cliphub packages media into single HTML artifacts with an embedded player and admin console.

EXAMPLES:
    cliphub single movie.mp4 --secret s3cret --public-copy   # Admin + public copy
    cliphub channel ./clips --name \"My Channel\"             # Legacy single-channel export
    cliphub hub hub.json --public-copy                       # Multi-channel hub from a manifest
    cliphub admin Hub_ADM.html --secret s3cret list          # Inspect a delivered artifact
    cliphub admin Hub_ADM.html --secret s3cret add-channel News
    cliphub cues movie.vtt                                   # Normalize a cue file
    cliphub completions bash > cliphub.bash                  # Generate bash completions

CONFIGURATION:
    Configuration is stored in cliphub.json by default. If the file doesn't
    exist, a default one is created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "cliphub.json", global = true)]
    config: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger { level: LevelFilter::Trace }))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
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
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Some(cmd_log_level) = &cli.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level((&level).into());
    }

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "cliphub", &mut std::io::stdout());
            Ok(())
        }
        Commands::Cues { file } => run_cues(&file),
        command => {
            let config = load_config(&cli.config, cli.log_level.is_some())?;
            let controller = Controller::with_config(config)?;
            run_command(&controller, command).await
        }
    }
}

fn load_config(path: &Path, level_from_cli: bool) -> Result<Config> {
    let config = Config::load_or_create(path)?;
    config.validate().context("Configuration validation failed")?;

    if !level_from_cli {
        log::set_max_level((&config.log_level).into());
    }
    Ok(config)
}

async fn run_command(controller: &Controller, command: Commands) -> Result<()> {
    match command {
        Commands::Single(args) => {
            if !FileManager::file_exists(&args.media) {
                return Err(anyhow!("Input file does not exist: {:?}", args.media));
            }
            let sink = DirectorySink::new(&args.output_dir);
            let video = single_video(&args)?;
            controller
                .export_single(Some(video), args.public_copy, args.enrich, &sink)
                .await?;
        }
        Commands::Channel(args) => {
            let sink = DirectorySink::new(&args.output_dir);
            controller
                .export_channel(&args.dir, &args.name, &args.description, &sink)
                .await?;
        }
        Commands::Hub(args) => {
            if !FileManager::file_exists(&args.manifest) {
                return Err(anyhow!("Manifest does not exist: {:?}", args.manifest));
            }
            let sink = DirectorySink::new(&args.output_dir);
            controller
                .export_manifest(&args.manifest, args.public_copy, args.enrich, &sink)
                .await?;
        }
        Commands::Admin(args) => {
            let sink = DirectorySink::new(&args.output_dir);
            let outcome = controller
                .run_admin(&args.artifact, &args.secret, args.action.into(), &sink)
                .await?;
            if let AdminOutcome::Listing(listing) = outcome {
                print!("{}", listing);
            }
        }
        Commands::Cues { .. } | Commands::Completions { .. } => {}
    }
    Ok(())
}

fn single_video(args: &SingleArgs) -> Result<VideoItem> {
    let media = MediaSource::file(&args.media);
    let title = args
        .title
        .clone()
        .or_else(|| media.stem())
        .unwrap_or_default();
    let rating: AgeRating = args.rating.parse()?;

    let mut video = VideoItem::new(
        MovieMetadata {
            title,
            description: args.description.clone(),
            genre: args.genre.clone(),
            age_rating: rating,
        },
        media,
    );
    if let Some(subtitles) = &args.subtitles {
        let mut cues = cliphub::cue_codec::parse(&FileManager::read_to_string(subtitles)?);
        cliphub::cue_codec::sort_by_start(&mut cues);
        if cues.is_empty() {
            warn!("No cues found in {:?}", subtitles);
        } else {
            video.set_cues(&cues);
        }
    }
    if let Some(thumbnail) = &args.thumbnail {
        video.thumbnail = Some(FileManager::read_data_uri(thumbnail)?);
    }
    video.export_config.show_watermark = !args.no_watermark;
    video.export_config.secret = args.secret.clone().filter(|s| !s.is_empty());
    Ok(video)
}

fn run_cues(file: &Path) -> Result<()> {
    let report = Controller::inspect_cues(file)?;
    print!("{}", report.normalized);
    info!(
        "{} cue(s), {} dropped, {} with unreadable timing",
        report.cue_count, report.dropped, report.undisplayable
    );
    Ok(())
}
