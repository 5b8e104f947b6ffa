use clap::{Parser, Subcommand};
use colored::Colorize;
use examtrack::cli;
use examtrack::error::ExamResult;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "examtrack")]
#[command(about = "Exam result ingestion and analytics for three-band Excel exports.")]
#[command(long_about = "ExamTrack - exam result ingestion and analytics
Reads school exam exports (three stacked header rows above an 'Öğr.No' row),
stores one batch per exam and reports rankings, trends and net scores.

COMMANDS:
  parse    - Preview how an export is parsed (nothing saved)
  save     - Parse an export and replace that exam in the database
  exams    - List grade tiers and their exams in chronological order
  rank     - Top-N list for one exam or averaged across all exams
  student  - Score history, trend and latest net scores for one student
  movers   - Biggest risers and fallers against the previous exam

EXAMPLES:
  examtrack parse deneme3.xlsx
  examtrack save deneme3.xlsx --db okul.db
  examtrack rank --tier 8 --class 8-A,8-B -o top40.xlsx
  examtrack student --tier 8 --name \"Ayşe Yılmaz\"
  examtrack movers --tier 8 --exam Deneme-3")]
#[command(version)]
struct Cli {
    /// YAML config file (database, top_n, movers_limit, insert_chunk_size, cache_ttl_secs)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database path (overrides the config file)
    #[arg(long, global = true, env = "EXAMTRACK_DB")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Preview how an export is parsed without saving it
    Parse {
        /// Path to the .xlsx export
        file: PathBuf,

        /// Number of records to preview
        #[arg(short, long, default_value_t = 10)]
        rows: usize,
    },

    #[command(long_about = "Parse an export and save it.

Every row previously saved under the same exam name is replaced, so
re-uploading a corrected file never duplicates records. Two different
exams that share a name overwrite each other.")]
    /// Parse an export and replace that exam in the database
    Save {
        /// Path to the .xlsx export
        file: PathBuf,
    },

    /// List grade tiers and their exams
    Exams {
        /// Only this grade tier
        #[arg(short, long)]
        tier: Option<u32>,
    },

    /// Top-N ranking for a grade tier
    Rank {
        /// Grade tier (e.g. 8)
        #[arg(short, long)]
        tier: u32,

        /// Single exam; averages across all exams when omitted
        #[arg(short, long)]
        exam: Option<String>,

        /// Class labels to include, comma-separated (default: all)
        #[arg(short, long = "class", value_delimiter = ',')]
        classes: Vec<String>,

        /// List length (default from config)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Also write the list to an .xlsx file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Per-student report
    Student {
        /// Grade tier (e.g. 8)
        #[arg(short, long)]
        tier: u32,

        /// Full name exactly as saved
        #[arg(short, long)]
        name: String,

        /// Also write the report to an .xlsx file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Risers and fallers against the previous exam
    Movers {
        /// Grade tier (e.g. 8)
        #[arg(short, long)]
        tier: u32,

        /// Exam to compare with its predecessor
        #[arg(short, long)]
        exam: String,
    },
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("examtrack=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: Cli) -> ExamResult<()> {
    let Cli {
        config,
        db,
        command,
    } = args;
    let open = || cli::open_tracker(config.as_deref(), db.clone());

    match command {
        Commands::Parse { file, rows } => cli::parse(file, rows),

        Commands::Save { file } => cli::save(&open()?, file),

        Commands::Exams { tier } => cli::exams(&open()?, tier),

        Commands::Rank {
            tier,
            exam,
            classes,
            limit,
            output,
        } => cli::rank(&open()?, tier, exam, classes, limit, output),

        Commands::Student { tier, name, output } => cli::student(&open()?, tier, name, output),

        Commands::Movers { tier, exam } => cli::movers(&open()?, tier, exam),
    }
}

fn main() {
    init_tracing();
    if let Err(e) = run(Cli::parse()) {
        eprintln!("{} {}", "❌ Error:".bold().red(), e);
        std::process::exit(1);
    }
}
