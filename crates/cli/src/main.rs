use clap::{Parser, Subcommand};
use mdx_core::MdxArchive;
use mdx_files::PayloadInfo;
use mdx_fixtures::{generate_all, FixtureConfig};
use mdx_uuid::SystemIdentity;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mdx")]
#[command(about = "MDX archive fixture generator and inspector")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write every example archive and conformance case
    Generate {
        /// Directory for the example archives
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Directory for the alignment conformance cases
        #[arg(long)]
        conformance_dir: Option<PathBuf>,
        /// Also unpack the demonstration archive here
        #[arg(long)]
        extract_dir: Option<PathBuf>,
    },
    /// Show an archive's manifest summary and members
    Inspect {
        /// Path to an .mdx archive
        archive: PathBuf,
    },
    /// Check every member against the manifest
    Verify {
        /// Path to an .mdx archive
        archive: PathBuf,
    },
    /// Unpack an archive into a directory
    Extract {
        /// Path to an .mdx archive
        archive: PathBuf,
        /// Destination directory
        dir: PathBuf,
    },
    /// Print the checksum, size and media type of a file
    Checksum {
        /// File to describe
        file: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Generate {
            output_dir,
            conformance_dir,
            extract_dir,
        }) => {
            let mut config = FixtureConfig::from_env()?;
            if let Some(dir) = output_dir {
                config = config.with_output_dir(dir);
            }
            if let Some(dir) = conformance_dir {
                config = config.with_conformance_dir(dir);
            }
            if let Some(dir) = extract_dir {
                config = config.with_extract_dir(dir);
            }

            let report = generate_all(&config, &SystemIdentity)?;
            for archive in &report.archives {
                println!(
                    "Created {} ({} members, {} bytes)",
                    archive.path.display(),
                    archive.members,
                    archive.bytes
                );
            }
            if !report.extracted_files.is_empty() {
                println!("Extracted {} files", report.extracted_files.len());
            }
            println!(
                "Wrote {} conformance files to {}",
                report.conformance_files.len(),
                config.conformance_dir().display()
            );
        }
        Some(Commands::Inspect { archive }) => {
            let mut mdx = MdxArchive::open(&archive)?;
            let manifest = mdx.manifest().clone();
            println!("Title: {}", manifest.document.title);
            println!("Version: {}", manifest.document.version);
            println!("MDX version: {}", manifest.mdx_version);
            println!("Entry point: {}", manifest.content.entry_point);
            println!("Assets: {}", manifest.assets.len());
            println!("Stylesheets: {}", manifest.styles.stylesheets.len());
            match mdx.history()? {
                Some(history) => println!(
                    "History: {} versions (current {})",
                    history.versions.len(),
                    history.current_version
                ),
                None => println!("History: none"),
            }
            match mdx.annotations()? {
                Some(annotations) => println!("Annotations: {}", annotations.len()),
                None => println!("Annotations: none"),
            }
            println!("Members:");
            for entry in mdx.entries()? {
                println!(
                    "  {:<45} {:>8} bytes ({} compressed)",
                    entry.name, entry.size, entry.compressed_size
                );
            }
        }
        Some(Commands::Verify { archive }) => {
            let mut mdx = MdxArchive::open(&archive)?;
            let report = mdx.verify()?;
            if report.is_ok() {
                println!(
                    "{}: OK ({} members checked)",
                    archive.display(),
                    report.members_checked
                );
            } else {
                for issue in &report.issues {
                    eprintln!("{}: {}", archive.display(), issue);
                }
                std::process::exit(1);
            }
        }
        Some(Commands::Extract { archive, dir }) => {
            let mut mdx = MdxArchive::open(&archive)?;
            let written = mdx.extract_to(&dir)?;
            println!("Extracted {} files to {}", written.len(), dir.display());
        }
        Some(Commands::Checksum { file }) => {
            let info = PayloadInfo::from_file(&file)?;
            println!("{}", info.checksum);
            println!("size: {} bytes", info.size_bytes);
            match info.media_type {
                Some(media_type) => println!("media type: {}", media_type),
                None => println!("media type: unknown"),
            }
        }
        None => {
            println!("Use 'mdx --help' for commands");
        }
    }

    Ok(())
}
