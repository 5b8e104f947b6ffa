use crate::config::AppConfig;
use crate::core::{ExamSelection, MoverComparison};
use crate::error::ExamResult;
use crate::excel::{ExcelImporter, ReportExporter};
use crate::parser::{self, ParsedExam};
use crate::report::{format_score, format_timestamp, RankedList};
use crate::store::{RecordStore, SqliteStore};
use crate::tracker::Tracker;
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Build a tracker over the SQLite store. `db` overrides the configured path.
pub fn open_tracker(
    config_path: Option<&Path>,
    db: Option<PathBuf>,
) -> ExamResult<Tracker<SqliteStore>> {
    let mut config = AppConfig::load(config_path)?;
    if let Some(db) = db {
        config.database = db;
    }
    Tracker::open(config)
}

/// Pad or cut `text` to `width` characters (column-aligned output)
fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count > width {
        let cut: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{cut}…")
    } else {
        format!("{text}{}", " ".repeat(width - count))
    }
}

fn print_parsed(parsed: &ParsedExam, preview: usize) {
    println!("   Exam:    {}", parsed.exam_name().bright_yellow().bold());
    println!("   Records: {}", parsed.records.len());
    println!("   Columns: {}\n", parsed.sheet.columns.len());

    println!("{}", "📋 Columns:".bold().cyan());
    for chunk in parsed.sheet.columns.chunks(6) {
        println!("   {}", chunk.join(", "));
    }
    println!();

    if parsed.summary_row_count() > 0 {
        println!(
            "{}",
            format!(
                "⚠️  {} summary row(s) excluded (Genel Ortalama / Kurum Ortalaması)",
                parsed.summary_row_count()
            )
            .yellow()
        );
        println!();
    }

    let shown = parsed.records.len().min(preview);
    if shown == 0 {
        return;
    }
    println!("{}", format!("🔍 First {shown} record(s):").bold().cyan());
    println!("{}", "─".repeat(72));
    for record in parsed.records.iter().take(shown) {
        println!(
            "   {:>8}  {}  {:<6} {:>8}  tier {}",
            record
                .student_id
                .map_or_else(|| "-".to_string(), |id| id.to_string()),
            fit(&record.full_name, 28),
            record.class_label.as_deref().unwrap_or("-"),
            format_score(record.overall_score),
            record
                .grade_tier
                .map_or_else(|| "-".to_string(), |t| t.to_string()),
        );
    }
    println!("{}", "─".repeat(72));
}

/// Execute the parse command: preview an export without saving
pub fn parse(file: PathBuf, preview: usize) -> ExamResult<()> {
    println!("{}", "📝 ExamTrack - Parse Preview".bold().green());
    println!("   File: {}\n", file.display());

    let grid = ExcelImporter::new(&file).read_grid()?;
    let parsed = parser::parse_grid(&grid)?;
    print_parsed(&parsed, preview);

    println!("\n{}", "✅ Parsed (nothing saved)".bold().green());
    Ok(())
}

/// Execute the save command: parse and replace the exam in the store
pub fn save<S: RecordStore>(tracker: &Tracker<S>, file: PathBuf) -> ExamResult<()> {
    println!("{}", "📝 ExamTrack - Save Exam".bold().green());
    println!("   File: {}\n", file.display());

    let parsed = tracker.parse_file(&file)?;
    print_parsed(&parsed, 5);

    let written = tracker.save(&parsed)?;
    println!(
        "\n{}",
        format!(
            "✅ Saved {} record(s) as '{}' (previous rows for this exam replaced)",
            written,
            parsed.exam_name()
        )
        .bold()
        .green()
    );
    Ok(())
}

/// Execute the exams command: list tiers and their exams in canonical order
pub fn exams<S: RecordStore>(tracker: &Tracker<S>, tier: Option<u32>) -> ExamResult<()> {
    println!("{}", "📚 ExamTrack - Exams".bold().green());
    println!();

    let tiers = match tier {
        Some(t) => vec![t],
        None => tracker.grade_tiers()?,
    };
    if tiers.is_empty() {
        println!("{}", "   No saved exams yet".dimmed());
        return Ok(());
    }

    for t in tiers {
        let exams = tracker.exams(t)?;
        println!("{}", format!("Grade {t}").bold().cyan());
        if exams.is_empty() {
            println!("   {}", "no exams".dimmed());
        }
        for (i, exam) in exams.iter().enumerate() {
            println!("   {:>2}. {}", i + 1, exam.bright_blue());
        }
    }
    Ok(())
}

fn print_ranked_list(list: &RankedList) {
    println!("\n{}", format!("🏆 {}", list.title).bold().cyan());
    let width = 56 + list.exam_columns.len() * 10 + if list.is_cross_exam() { 16 } else { 10 };
    println!("{}", "─".repeat(width));

    print!("{:>4}  {:>8}  {}  {:<6}", "#", "ID", fit("Name", 28), "Class");
    if list.is_cross_exam() {
        print!(" {:>5}", "Exams");
        for column in &list.exam_columns {
            print!(" {:>9}", column);
        }
        println!(" {:>9}", "Average".bold());
    } else {
        println!(" {:>9}", "Score".bold());
    }
    println!("{}", "─".repeat(width));

    for row in &list.rows {
        print!(
            "{:>4}  {:>8}  {}  {:<6}",
            row.rank,
            row.student_id
                .map_or_else(|| "-".to_string(), |id| id.to_string()),
            fit(&row.name, 28),
            row.class_label.as_deref().unwrap_or("-"),
        );
        if list.is_cross_exam() {
            print!(" {:>5}", row.exam_count.unwrap_or(0));
            for score in &row.exam_scores {
                print!(" {:>9}", format_score(*score));
            }
        }
        println!(" {:>9}", format_score(row.average).green());
    }
    println!("{}", "─".repeat(width));

    if list.is_cross_exam() {
        for (column, exam) in list.exam_columns.iter().zip(&list.exam_names) {
            println!("   {} = {}", column.dimmed(), exam);
        }
    }
}

/// Execute the rank command
pub fn rank<S: RecordStore>(
    tracker: &Tracker<S>,
    tier: u32,
    exam: Option<String>,
    classes: Vec<String>,
    limit: Option<usize>,
    output: Option<PathBuf>,
) -> ExamResult<()> {
    println!("{}", "🏆 ExamTrack - Rankings".bold().green());

    let selection = ExamSelection::from_option(exam);
    let classes = (!classes.is_empty()).then_some(classes);
    let list = tracker.rankings(tier, &selection, classes.as_deref(), limit)?;

    let kpis = tracker.summary(tier, &selection, classes.as_deref())?;
    println!(
        "   Students: {}   Average: {}   Max: {}",
        kpis.students,
        format_score(kpis.average),
        format_score(kpis.max)
    );

    if list.rows.is_empty() {
        println!("\n{}", "   No scored records match this selection".yellow());
        if let Some(path) = output {
            println!(
                "   {}",
                format!("Excel report not written: {}", path.display()).yellow()
            );
        }
        return Ok(());
    }
    print_ranked_list(&list);

    if let Some(path) = output {
        ReportExporter::new().export_ranked_list(&list, &path)?;
        println!("\n{}", "✅ Excel report written".bold().green());
        println!("   File: {}", path.display());
    }
    Ok(())
}

/// Execute the student command
pub fn student<S: RecordStore>(
    tracker: &Tracker<S>,
    tier: u32,
    name: String,
    output: Option<PathBuf>,
) -> ExamResult<()> {
    println!("{}", "👤 ExamTrack - Student Report".bold().green());

    let report = tracker.student_report(tier, &name)?;
    println!("   Name:  {}", report.name.bright_blue().bold());
    println!("   Grade: {}", report.grade_tier);
    println!("   Trend: {}", report.verdict.label().bright_yellow());
    println!("   {}\n", report.comment.italic());

    println!("{}", "📈 History:".bold().cyan());
    println!("{}", "─".repeat(56));
    for entry in &report.history {
        println!(
            "   {}  {:<6} {:>9}  {}",
            fit(&entry.exam_name, 18),
            entry.class_label.as_deref().unwrap_or("-"),
            format_score(entry.score),
            format_timestamp(&entry.created_at).dimmed()
        );
    }
    println!("{}", "─".repeat(56));

    if !report.net_chart.is_empty() {
        println!("\n{}", "🧮 Net scores (latest exam):".bold().cyan());
        for (subject, net) in report.net_chart.labels.iter().zip(&report.net_chart.values) {
            println!("   {} {:>7.2}", fit(subject, 20), net);
        }
    }

    if let Some(path) = output {
        ReportExporter::new().export_student_report(&report, &path)?;
        println!("\n{}", "✅ Excel report written".bold().green());
        println!("   File: {}", path.display());
    }
    Ok(())
}

/// Execute the movers command
pub fn movers<S: RecordStore>(tracker: &Tracker<S>, tier: u32, exam: String) -> ExamResult<()> {
    println!("{}", "📊 ExamTrack - Risers and Fallers".bold().green());

    match tracker.movers(tier, &exam)? {
        MoverComparison::UnknownExam { exam } => {
            println!(
                "\n{}",
                format!("   Unknown exam '{exam}' for grade {tier}").yellow()
            );
            println!("   Run 'examtrack exams --tier {tier}' to list saved exams");
        }
        MoverComparison::NoPredecessor { exam } => {
            println!(
                "\n{}",
                format!("   '{exam}' has no earlier exam to compare with").yellow()
            );
        }
        MoverComparison::Compared {
            previous_exam,
            current_exam,
            risers,
            fallers,
        } => {
            println!(
                "   {} → {}\n",
                previous_exam.dimmed(),
                current_exam.bright_yellow().bold()
            );
            for (title, list) in [("⬆️  Risers", &risers), ("⬇️  Fallers", &fallers)] {
                println!("{}", title.bold().cyan());
                if list.is_empty() {
                    println!("   {}", "no students sat both exams".dimmed());
                }
                for m in list.iter() {
                    let delta = format!("{:+.2}", m.delta);
                    let delta = if m.delta >= 0.0 { delta.green() } else { delta.red() };
                    println!(
                        "   {} {:>8.2} → {:>8.2}  {}",
                        fit(&m.name, 28),
                        m.previous,
                        m.current,
                        delta
                    );
                }
                println!();
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
