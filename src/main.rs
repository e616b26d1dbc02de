use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Parser};
use leiflat::{Config, ConvertError, Converter, DocumentStats, EmptyDocumentPolicy, Profile};

#[cfg(feature = "memory_tracking")]
#[global_allocator]
static GLOBAL: leiflat::memory::TrackingAllocator = leiflat::memory::TrackingAllocator;

#[cfg(all(feature = "mimalloc", not(feature = "memory_tracking")))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Convert LEI registration XML files to Turtle or tab-separated rows
#[derive(Parser, Debug)]
#[command(name = "leiflat", version, about)]
struct Cli {
    /// Output profile
    #[arg(short, long, value_enum, default_value_t = Profile::Turtle)]
    profile: Profile,

    /// Fail documents that produce no record
    #[arg(long)]
    reject_empty: bool,

    /// Output buffer size in bytes
    #[arg(long, value_name = "BYTES", default_value_t = leiflat::sink::DEFAULT_CAPACITY)]
    buffer_size: usize,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Input files; standard input when none is given or for `-`
    files: Vec<PathBuf>,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn convert_one<W: Write>(converter: &mut Converter<W>, path: &Path) -> anyhow::Result<DocumentStats> {
    #[cfg(feature = "memory_tracking")]
    let run_peak = leiflat::memory::reset_peak();

    let converted = converter.convert_path(path);

    #[cfg(feature = "memory_tracking")]
    {
        log::info!(
            "{}: peak heap {} bytes, {} still held",
            path.display(),
            leiflat::memory::peak(),
            leiflat::memory::current()
        );
        leiflat::memory::raise_peak(run_peak);
    }

    let stats = converted.with_context(|| format!("cannot convert `{}'", path.display()))?;
    log::info!(
        "{}: {:?}, {} records emitted, {} discarded",
        path.display(),
        stats.dialect,
        stats.emitted,
        stats.discarded
    );
    Ok(stats)
}

fn is_fatal(err: &anyhow::Error) -> bool {
    err.downcast_ref::<ConvertError>().is_some_and(ConvertError::is_fatal)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = Config::new()
        .with_profile(cli.profile)
        .with_output_capacity(cli.buffer_size)
        .with_empty_document(if cli.reject_empty {
            EmptyDocumentPolicy::Reject
        } else {
            EmptyDocumentPolicy::Accept
        });

    let mut files = cli.files;
    if files.is_empty() {
        files.push(PathBuf::from("-"));
    }

    let mut converter = Converter::new(io::stdout().lock(), config);
    let mut failed: u32 = 0;
    for path in &files {
        if let Err(err) = convert_one(&mut converter, path) {
            failed += 1;
            eprintln!("leiflat: Error: {err:#}");
            if is_fatal(&err) {
                log::error!("output is no longer writable, skipping remaining inputs");
                break;
            }
        }
    }
    if let Err(err) = converter.finish() {
        eprintln!("leiflat: Error: {:#}", anyhow::Error::from(err));
        failed += 1;
    }

    #[cfg(feature = "memory_tracking")]
    log::info!("peak heap usage: {} bytes", leiflat::memory::peak());

    ExitCode::from(failed.min(255) as u8)
}
