use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rlsmerge::config::AppConfig;
use rlsmerge::release::{Release, Role};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "rlsmerge", version, about = "Merge scraped release metadata into one canonical record")]
struct Cli {
    /// Path to the config file (defaults to the XDG config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile records from several sources into one
    Merge {
        /// Source records as SOURCE=FILE (e.g. Tidal=tidal.json)
        #[arg(required = true, value_parser = parse_source_file)]
        sources: Vec<(String, PathBuf)>,

        /// Record to merge into, e.g. one built from file tags by `base`
        #[arg(long)]
        base: Option<PathBuf>,

        /// Write the result here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Normalize one scraped record before merging
    Prepare {
        file: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Regenerate release artists from track credits
    Artists {
        file: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Build a base record from the tags of a release directory
    Base {
        dir: PathBuf,

        /// Media of the files (CD, WEB, Vinyl...)
        #[arg(long)]
        media: Option<String>,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Check a record against the upload rules
    Validate { file: PathBuf },

    /// Print a human-readable summary of a record
    Show { file: PathBuf },
}

fn parse_source_file(value: &str) -> std::result::Result<(String, PathBuf), String> {
    match value.split_once('=') {
        Some((source, file)) if !source.is_empty() && !file.is_empty() => {
            Ok((source.to_string(), PathBuf::from(file)))
        }
        _ => Err(format!("expected SOURCE=FILE, got {value:?}")),
    }
}

fn read_release(path: &Path) -> Result<Release> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

fn write_release(release: &Release, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(release).context("Failed to serialize release")?;
    match output {
        Some(path) => {
            std::fs::write(path, json + "\n")
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Wrote {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load config file (optional, defaults if missing)
    let config = AppConfig::load(cli.config.as_deref());

    match cli.command {
        Commands::Merge {
            sources,
            base,
            output,
        } => {
            let mut records = Vec::with_capacity(sources.len());
            for (source, path) in &sources {
                records.push((source.clone(), read_release(path)?));
            }
            let base = base.as_deref().map(read_release).transpose()?;

            let merged = rlsmerge::merge::reconcile(records, base, &config.merge_options())
                .context("Merge failed")?;
            write_release(&merged, output.as_deref())?;
        }

        Commands::Prepare { file, output } => {
            let release = read_release(&file)?;
            let prepared = rlsmerge::prepare::prepare_scraped(release, &config.prepare_options());
            write_release(&prepared, output.as_deref())?;
        }

        Commands::Artists { file, output } => {
            let mut release = read_release(&file)?;
            let (artists, tracks) = rlsmerge::artists::generate_artists(release.tracks);
            release.artists = artists;
            release.tracks = tracks;
            write_release(&release, output.as_deref())?;
        }

        Commands::Base { dir, media, output } => {
            let release = rlsmerge::scanner::build_base_release(&dir, media.as_deref())
                .with_context(|| format!("Failed to read {}", dir.display()))?;
            write_release(&release, output.as_deref())?;
        }

        Commands::Validate { file } => {
            let release = read_release(&file)?;
            match rlsmerge::validate::validate_release(&release) {
                Ok(()) => println!("{}: OK", file.display()),
                Err(e) => anyhow::bail!("{}: {}", file.display(), e),
            }
        }

        Commands::Show { file } => {
            let release = read_release(&file)?;
            print_release(&release);
        }
    }

    Ok(())
}

fn print_release(release: &Release) {
    let or_dash = |v: Option<&str>| v.unwrap_or("-").to_string();
    let year = |v: Option<i32>| v.map(|y| y.to_string()).unwrap_or_else(|| "-".into());

    let mut credits: Vec<String> = Vec::new();
    for role in Role::ALL {
        let names = release.artist_names(role);
        if !names.is_empty() {
            credits.push(format!("{} ({})", names.join(", "), role));
        }
    }

    println!("Artists:    {}", credits.join("; "));
    println!("Title:      {}", release.title);
    println!("Type:       {}", or_dash(release.rls_type.map(|t| t.as_str())));
    println!("Year:       {} (group {})", year(release.year), year(release.group_year));
    println!("Date:       {}", or_dash(release.date.as_deref()));
    println!("Edition:    {}", or_dash(release.edition_title.as_deref()));
    println!("Label:      {}", or_dash(release.label.as_deref()));
    println!("Catno:      {}", or_dash(release.catno.as_deref()));
    println!("UPC:        {}", or_dash(release.upc.as_deref()));
    println!("Source:     {}", or_dash(release.media.as_deref()));
    println!("Genres:     {}", release.genres.join("; "));
    for url in &release.urls {
        println!("URL:        {}", url);
    }
    println!();
    println!("{:<6} {:<50} {}", "#", "Title", "Artists");
    println!("{}", "-".repeat(80));
    for track in release.tracks.iter() {
        let artists: Vec<String> = track
            .artists
            .iter()
            .map(|a| match a.role {
                Role::Main => a.name.clone(),
                role => format!("{} ({})", a.name, role),
            })
            .collect();
        println!(
            "{:<6} {:<50} {}",
            format!("{}-{}", track.disc, track.number),
            track.title.as_deref().unwrap_or("-"),
            artists.join(", ")
        );
    }
}
