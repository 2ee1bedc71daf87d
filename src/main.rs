use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use scripture_prep::{
    execute_compose, execute_fetch, execute_normalize, BollsClient, BollsConfig, BookMatcher,
    BookTarget, ComposeConfig, FetchConfig, NormalizeConfig, TranslationInput,
};

#[derive(Parser)]
#[command(name = "scripture-prep")]
#[command(author, version, about = "Prepare a multi-translation Bible text corpus", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download a translation from the bolls.life API into a CSV file
    Fetch {
        /// Translation identifier (e.g. YLT, NKJV)
        #[arg(short, long, default_value = "YLT")]
        translation: String,

        /// Output CSV file [default: <TRANSLATION>_Bible.csv]
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// API base URL [default: $SCRIPTURE_API_BASE or https://bolls.life]
        #[arg(long)]
        api_base: Option<String>,

        /// Delay between chapter requests in milliseconds
        #[arg(long, default_value = "100")]
        delay_ms: u64,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Standardize book names and repair mojibake in a directory of CSV files
    Normalize {
        /// Directory containing raw CSV files
        #[arg(short, long)]
        input_dir: PathBuf,

        /// Directory for cleaned CSV files and the cleaning log
        #[arg(short, long)]
        output_dir: PathBuf,

        /// Cross-reference workbook with one column per translation code
        #[arg(short, long)]
        xref: PathBuf,

        /// Sheet holding the cross-reference
        #[arg(long, default_value = "STANDARD_BOOK_LIST")]
        sheet: String,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Write side-by-side chapter documents for one book from two translations
    Compose {
        /// First translation CSV (middle column)
        #[arg(long)]
        left: PathBuf,

        /// Second translation CSV (right column)
        #[arg(long)]
        right: PathBuf,

        /// Column heading for the first translation [default: file-name prefix]
        #[arg(long)]
        left_code: Option<String>,

        /// Column heading for the second translation [default: file-name prefix]
        #[arg(long)]
        right_code: Option<String>,

        /// Root of the chapter document tree
        #[arg(short, long)]
        output_root: PathBuf,

        /// Book slug used for directory and file names
        #[arg(long, default_value = "2-timothy")]
        slug: String,

        /// Testament directory
        #[arg(long, default_value = "new-testament")]
        testament: String,

        /// Book name as shown in messages
        #[arg(long, default_value = "2 Timothy")]
        label: String,

        /// Short book spelling to accept (repeatable)
        #[arg(long = "short-form", default_values_t = vec!["2 timothy".to_string()])]
        short_forms: Vec<String>,

        /// Long-form marker that must appear with the keyword (repeatable)
        #[arg(long = "long-marker", default_values_t = vec!["second epistle".to_string()])]
        long_markers: Vec<String>,

        /// Distinguishing word required alongside a long-form marker
        #[arg(long, default_value = "timothy")]
        keyword: String,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Fetch {
            translation,
            output,
            api_base,
            delay_ms,
            verbose,
        } => {
            setup_logging(verbose);
            fetch(translation, output, api_base, delay_ms).await
        }
        Commands::Normalize {
            input_dir,
            output_dir,
            xref,
            sheet,
            verbose,
        } => {
            setup_logging(verbose);
            normalize(NormalizeConfig {
                input_dir,
                output_dir,
                xref_path: xref,
                xref_sheet: sheet,
            })
        }
        Commands::Compose {
            left,
            right,
            left_code,
            right_code,
            output_root,
            slug,
            testament,
            label,
            short_forms,
            long_markers,
            keyword,
            verbose,
        } => {
            setup_logging(verbose);
            let target = BookTarget {
                label,
                slug,
                testament,
                matcher: BookMatcher::new(long_markers, keyword, short_forms),
            };
            compose(ComposeConfig {
                left: translation_input(left, left_code),
                right: translation_input(right, right_code),
                target,
                output_root,
            })
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn translation_input(path: PathBuf, code: Option<String>) -> TranslationInput {
    let mut input = TranslationInput::from_path(path);
    if let Some(code) = code {
        input.code = code;
    }
    input
}

async fn fetch(
    translation: String,
    output: Option<PathBuf>,
    api_base: Option<String>,
    delay_ms: u64,
) -> Result<()> {
    let api_config = match api_base {
        Some(base) => BollsConfig::new(base),
        None => BollsConfig::from_env(),
    };
    info!("Connecting to {} for {}...", api_config.base_url, translation);

    let config = FetchConfig {
        translation,
        delay: Duration::from_millis(delay_ms),
    };
    let output = output.unwrap_or_else(|| config.default_output());
    let client = BollsClient::new(api_config);

    let result = execute_fetch(&client, &config, &output).await?;

    info!(
        "Complete: {} books, {} chapters ({} skipped), {} verses",
        result.books, result.chapters_requested, result.chapters_skipped, result.rows_written
    );
    info!("Saved to {:?}", output);
    Ok(())
}

fn normalize(config: NormalizeConfig) -> Result<()> {
    let result = execute_normalize(&config)?;

    info!(
        "Complete: {} files cleaned, {} skipped",
        result.written.len(),
        result.skipped.len()
    );
    info!("Cleaned files: {:?}", config.output_dir);
    info!("Log file: {:?}", result.log_path);
    Ok(())
}

fn compose(config: ComposeConfig) -> Result<()> {
    let result = execute_compose(&config)?;

    info!(
        "Complete: {} chapter documents for {}",
        result.documents.len(),
        config.target.label
    );
    Ok(())
}
