//! Orchestration: parse, save and the analytic views over one record store
//!
//! A [`Tracker`] owns its store, the per-exam save locks and the corpus
//! cache. Nothing here is process-global; the CLI and the API server each
//! construct their own.

use crate::config::AppConfig;
use crate::core::ordering::{for_classes, for_tier};
use crate::core::{
    class_labels, classify_trend, compare_with_previous, exam_order, grade_tiers, net_scores,
    student_names, summarize, top_across_exams, top_single_exam, ExamSelection, Kpis,
    MoverComparison,
};
use crate::error::{ExamError, ExamResult};
use crate::excel::ExcelImporter;
use crate::parser::{parse_grid, ParsedExam};
use crate::report::{ChartSeries, HistoryRow, RankedList, StudentReport};
use crate::store::{CorpusCache, ExamLocks, RecordStore, SqliteStore};
use crate::types::StoredRecord;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub struct Tracker<S: RecordStore> {
    store: S,
    config: AppConfig,
    locks: ExamLocks,
    cache: CorpusCache,
}

impl<S: RecordStore> Tracker<S> {
    pub fn new(store: S, config: AppConfig) -> Self {
        let cache = CorpusCache::new(config.cache_ttl());
        Self {
            store,
            config,
            locks: ExamLocks::new(),
            cache,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read an exam export and run the parse pipeline. Nothing is saved.
    pub fn parse_file(&self, path: &Path) -> ExamResult<ParsedExam> {
        let grid = ExcelImporter::new(path).read_grid()?;
        parse_grid(&grid)
    }

    /// Replace every stored row of the exam with this batch.
    ///
    /// The cache is invalidated only after the store accepted the batch.
    pub fn save(&self, exam: &ParsedExam) -> ExamResult<usize> {
        let name = exam.exam_name();
        let written = self
            .locks
            .with_lock(name, || self.store.replace_exam(name, &exam.records))?;
        self.cache.invalidate();
        info!(exam = name, rows = written, "saved exam");
        Ok(written)
    }

    /// Full corpus snapshot, served from the cache while fresh
    pub fn corpus(&self) -> ExamResult<Arc<Vec<StoredRecord>>> {
        self.cache.get_or_fetch(|| self.store.fetch_all())
    }

    pub fn invalidate_cache(&self) {
        self.cache.invalidate();
    }

    fn tier(&self, tier: u32) -> ExamResult<Vec<StoredRecord>> {
        Ok(for_tier(&self.corpus()?, tier))
    }

    pub fn grade_tiers(&self) -> ExamResult<Vec<u32>> {
        Ok(grade_tiers(&self.corpus()?))
    }

    /// Exams sat by the tier, in canonical exam order
    pub fn exams(&self, tier: u32) -> ExamResult<Vec<String>> {
        Ok(exam_order(&self.tier(tier)?))
    }

    pub fn class_labels(&self, tier: u32) -> ExamResult<Vec<String>> {
        Ok(class_labels(&self.tier(tier)?))
    }

    pub fn students(&self, tier: u32) -> ExamResult<Vec<String>> {
        Ok(student_names(&self.tier(tier)?))
    }

    /// Top-N list for one tier. `classes = None` keeps every class;
    /// `limit = None` uses the configured list length.
    pub fn rankings(
        &self,
        tier: u32,
        selection: &ExamSelection,
        classes: Option<&[String]>,
        limit: Option<usize>,
    ) -> ExamResult<RankedList> {
        let records = self.tier(tier)?;
        let limit = limit.unwrap_or(self.config.top_n);
        let selected = for_classes(&records, classes);

        let list = match selection {
            ExamSelection::Single(exam) => RankedList {
                grade_tier: tier,
                title: format!("Grade {tier} top {limit}: {exam}"),
                exam_columns: Vec::new(),
                exam_names: vec![exam.clone()],
                rows: top_single_exam(&selected, exam, limit),
            },
            ExamSelection::All => {
                let ranking = top_across_exams(&selected, &exam_order(&records), limit);
                RankedList {
                    grade_tier: tier,
                    title: format!("Grade {tier} top {limit}: all exams (average)"),
                    exam_columns: ranking.exam_columns,
                    exam_names: ranking.exam_names,
                    rows: ranking.rows,
                }
            }
        };
        Ok(list)
    }

    /// Chronological history, trend verdict and latest net scores for one
    /// student, matched by full name within the tier
    pub fn student_report(&self, tier: u32, name: &str) -> ExamResult<StudentReport> {
        let mut history: Vec<StoredRecord> = self
            .tier(tier)?
            .into_iter()
            .filter(|r| r.full_name == name)
            .collect();
        if history.is_empty() {
            return Err(ExamError::Validation(format!(
                "No records for student '{name}' in grade {tier}"
            )));
        }
        history.sort_by_key(|r| r.created_at);

        let scores: Vec<Option<f64>> = history.iter().map(|r| r.overall_score).collect();
        let verdict = classify_trend(&scores);

        let mut score_chart = ChartSeries::default();
        for record in &history {
            if let Some(score) = record.overall_score {
                score_chart.push(record.exam_name.clone(), score);
            }
        }

        let mut nets: Vec<(String, f64)> = history
            .last()
            .map(|latest| net_scores(&latest.payload).into_iter().collect())
            .unwrap_or_default();
        nets.sort_by(|a, b| b.1.total_cmp(&a.1));
        let mut net_chart = ChartSeries::default();
        for (subject, net) in nets {
            net_chart.push(subject, net);
        }

        Ok(StudentReport {
            name: name.to_string(),
            grade_tier: tier,
            verdict,
            comment: verdict.comment().to_string(),
            history: history
                .into_iter()
                .map(|r| HistoryRow {
                    exam_name: r.exam_name,
                    class_label: r.class_label,
                    score: r.overall_score,
                    created_at: r.created_at,
                })
                .collect(),
            score_chart,
            net_chart,
        })
    }

    /// Risers and fallers between `exam` and the exam before it
    pub fn movers(&self, tier: u32, exam: &str) -> ExamResult<MoverComparison> {
        let records = self.tier(tier)?;
        let order = exam_order(&records);
        Ok(compare_with_previous(
            &records,
            &order,
            exam,
            self.config.movers_limit,
        ))
    }

    /// Headline figures for the tier, narrowed like [`Tracker::rankings`]
    pub fn summary(
        &self,
        tier: u32,
        selection: &ExamSelection,
        classes: Option<&[String]>,
    ) -> ExamResult<Kpis> {
        let records = for_classes(&self.tier(tier)?, classes);
        let kpis = match selection {
            ExamSelection::All => summarize(&records),
            ExamSelection::Single(exam) => {
                let in_exam: Vec<StoredRecord> = records
                    .into_iter()
                    .filter(|r| &r.exam_name == exam)
                    .collect();
                summarize(&in_exam)
            }
        };
        Ok(kpis)
    }
}

impl Tracker<SqliteStore> {
    /// Open (or create) the configured SQLite database
    pub fn open(config: AppConfig) -> ExamResult<Self> {
        let store = SqliteStore::open(&config.database)?.with_chunk_size(config.insert_chunk_size);
        Ok(Self::new(store, config))
    }
}
