use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use godotkit::config::{self, KitConfig};
use godotkit::feed::{self, FeedResolution, HttpFeedSource};
use godotkit::project::{
    self, FieldChange, ProjectChanges, ProjectFile, ProjectKeys, ProjectUpdater, UpdateReport,
};
use godotkit::version::Version;

#[derive(Parser)]
#[command(name = "godotkit")]
#[command(version, about = "Godot project descriptor maintenance and engine release discovery")]
struct Cli {
    /// Config file (defaults to $XDG_CONFIG_HOME/godotkit/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless GODOTKIT_LOG is set
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print project metadata
    Show { project: PathBuf },

    /// Print the latest engine release from the feed
    Latest {
        #[arg(long)]
        prerelease: bool,
        #[arg(long)]
        feed_url: Option<String>,
    },

    /// Set the engine version of a project
    SetVersion { project: PathBuf, version: String },

    /// Set the icon of a project
    SetIcon { project: PathBuf, icon: String },

    /// Set the project name
    SetName { project: PathBuf, name: String },

    /// Set the project description
    SetDescription { project: PathBuf, description: String },

    /// Set the project's own version (not the engine version)
    SetProjectVersion { project: PathBuf, version: String },

    /// Replace the project tags
    SetTags { project: PathBuf, tags: Vec<String> },

    /// Move a project to the latest engine release when it is newer
    Upgrade {
        project: PathBuf,
        #[arg(long)]
        prerelease: bool,
        #[arg(long)]
        feed_url: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _guard = godotkit::logging::init(&config::log_path(), cli.verbose)
        .context("Failed to initialize logging")?;

    let config_path = cli.config.clone().unwrap_or_else(config::config_path);
    let config = config::load_config(&config_path)?;
    let updater = ProjectUpdater::new(config.project.keys.clone());

    match cli.command {
        Command::Show { project } => show(&project, updater.keys()),
        Command::Latest {
            prerelease,
            feed_url,
        } => {
            let resolution = runtime()?.block_on(fetch_releases(&config, feed_url.as_deref()))?;
            let include_prerelease = prerelease || config.feed.include_prerelease;
            match resolution.latest(include_prerelease) {
                Some(release) => {
                    print!("{}", release.version);
                    if let Some(date) = release.published_at {
                        print!(" ({})", date.format("%Y-%m-%d"));
                    }
                    println!();
                }
                None => println!("No release found"),
            }
            println!("Skipped {} feed entries", resolution.skipped.len());
            Ok(())
        }
        Command::SetVersion { project, version } => {
            let version = Version::parse(&version)?;
            let report = project::update_file(&project, &updater, Some(&version), None)?;
            print_report(&project, &report);
            Ok(())
        }
        Command::SetIcon { project, icon } => {
            let report = project::update_file(&project, &updater, None, Some(&icon))?;
            print_report(&project, &report);
            Ok(())
        }
        Command::SetName { project, name } => apply(
            &project,
            &updater,
            ProjectChanges {
                name: Some(name),
                ..ProjectChanges::default()
            },
        ),
        Command::SetDescription {
            project,
            description,
        } => apply(
            &project,
            &updater,
            ProjectChanges {
                description: Some(description),
                ..ProjectChanges::default()
            },
        ),
        Command::SetProjectVersion { project, version } => apply(
            &project,
            &updater,
            ProjectChanges {
                version: Some(version),
                ..ProjectChanges::default()
            },
        ),
        Command::SetTags { project, tags } => apply(
            &project,
            &updater,
            ProjectChanges {
                tags: Some(tags),
                ..ProjectChanges::default()
            },
        ),
        Command::Upgrade {
            project,
            prerelease,
            feed_url,
        } => {
            let current = ProjectFile::open(&project)?
                .metadata(updater.keys())
                .compatibility_version;
            let resolution = runtime()?.block_on(fetch_releases(&config, feed_url.as_deref()))?;
            let include_prerelease = prerelease || config.feed.include_prerelease;
            let Some(release) = resolution.latest(include_prerelease) else {
                println!("No release found");
                return Ok(());
            };

            if current.as_ref().is_some_and(|current| *current >= release.version) {
                println!("{} is up to date", project.display());
                return Ok(());
            }
            let report = project::update_file(&project, &updater, Some(&release.version), None)?;
            print_report(&project, &report);
            Ok(())
        }
    }
}

fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?)
}

async fn fetch_releases(config: &KitConfig, feed_url: Option<&str>) -> anyhow::Result<FeedResolution> {
    let url = feed_url.unwrap_or(&config.feed.url);
    let source = HttpFeedSource::new(url, Duration::from_millis(config.feed.timeout))?;
    feed::discover(&source)
        .await
        .with_context(|| format!("Failed to discover releases from {}", url))
}

fn apply(path: &Path, updater: &ProjectUpdater, changes: ProjectChanges) -> anyhow::Result<()> {
    let report = project::apply_to_file(path, updater, &changes)?;
    print_report(path, &report);
    Ok(())
}

fn show(path: &Path, keys: &ProjectKeys) -> anyhow::Result<()> {
    let metadata = ProjectFile::open(path)?.metadata(keys);

    println!("name:        {}", metadata.name);
    println!("description: {}", metadata.description);
    if let Some(version) = &metadata.version {
        println!("version:     {}", version);
    }
    if !metadata.tags.is_empty() {
        println!("tags:        {}", metadata.tags.join(", "));
    }
    if let Some(icon) = &metadata.icon {
        println!("icon:        {}", icon);
    }
    if !metadata.features.is_empty() {
        println!("features:    {}", metadata.features.join(", "));
    }
    if let Some(engine) = &metadata.compatibility_version {
        println!("engine:      {}", engine);
    }
    Ok(())
}

fn print_report(path: &Path, report: &UpdateReport) {
    for (field, change) in report.fields() {
        let outcome = match change {
            FieldChange::Created => "created",
            FieldChange::Updated => "updated",
            FieldChange::Unchanged => "unchanged",
            FieldChange::Missing => "not present, skipped",
        };
        println!("{}: {} {}", path.display(), field, outcome);
    }
}
