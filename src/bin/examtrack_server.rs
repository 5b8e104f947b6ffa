//! ExamTrack API Server binary
//!
//! HTTP REST API over the exam results database.

use clap::Parser;
use examtrack::api::{run_api_server, ApiConfig};
use examtrack::config::AppConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "examtrack-server")]
#[command(version)]
#[command(about = "ExamTrack API Server - HTTP REST API for exam results and reports")]
#[command(long_about = r#"
ExamTrack API Server - HTTP REST API

Endpoints:
  - POST /api/v1/upload    - Parse an exam export (optionally save it)
  - POST /api/v1/exams     - Grade tiers with their exams and classes
  - POST /api/v1/rankings  - Top-N list (single exam or all exams)
  - POST /api/v1/student   - Student history, trend and net scores
  - POST /api/v1/movers    - Risers and fallers vs. the previous exam

Additional endpoints:
  - GET  /health           - Health check
  - GET  /version          - Server version info
  - GET  /                 - API documentation

Example usage:
  examtrack-server                           # Start on localhost:8080
  examtrack-server --host 0.0.0.0 --port 3000 --db /srv/okul.db

  curl -X POST http://localhost:8080/api/v1/rankings \
    -H "Content-Type: application/json" \
    -d '{"grade_tier": 8, "exam": "Deneme-3"}'
"#)]
struct Args {
    /// Host address to bind to (use 0.0.0.0 for all interfaces)
    #[arg(short = 'H', long, default_value = "127.0.0.1", env = "EXAMTRACK_HOST")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "8080", env = "EXAMTRACK_PORT")]
    port: u16,

    /// YAML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// SQLite database path (overrides the config file)
    #[arg(long, env = "EXAMTRACK_DB")]
    db: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut app = AppConfig::load(args.config.as_deref())?;
    if let Some(db) = args.db {
        app.database = db;
    }

    let config = ApiConfig {
        host: args.host,
        port: args.port,
        app,
    };

    run_api_server(config).await
}
