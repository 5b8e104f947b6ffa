//! Report exporter: ranked lists and student reports as `.xlsx`

use crate::error::{ExamError, ExamResult};
use crate::report::{format_timestamp, ChartSeries, RankedList, StudentReport};
use rust_xlsxwriter::{Chart, ChartType, Format, Workbook, Worksheet, XlsxError};
use std::path::Path;
use tracing::{info, warn};

const RANKING_SHEET: &str = "Ranking";
const REPORT_SHEET: &str = "Report";
const CHART_DATA_SHEET: &str = "ChartData";

/// First data row of the student history table
const HISTORY_FIRST_ROW: u32 = 7;

fn export_err(context: &str) -> impl Fn(XlsxError) -> ExamError + '_ {
    move |e| ExamError::Export(format!("Failed to {}: {}", context, e))
}

/// Writes report models to Excel workbooks
pub struct ReportExporter {
    bold: Format,
    score: Format,
}

impl Default for ReportExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportExporter {
    pub fn new() -> Self {
        Self {
            bold: Format::new().set_bold(),
            score: Format::new().set_num_format("0.00"),
        }
    }

    /// One sheet: title, header row, one line per ranked student
    pub fn export_ranked_list(&self, list: &RankedList, output_path: &Path) -> ExamResult<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(RANKING_SHEET)
            .map_err(export_err("set worksheet name"))?;

        worksheet
            .write_string_with_format(0, 0, &list.title, &self.bold)
            .map_err(export_err("write title"))?;

        let mut headers: Vec<&str> = vec!["Rank", "ID", "Name", "Class"];
        if list.is_cross_exam() {
            headers.push("Exams");
            headers.extend(list.exam_columns.iter().map(String::as_str));
            headers.push("Average");
        } else {
            headers.push("Score");
        }
        for (col, header) in headers.iter().enumerate() {
            worksheet
                .write_string_with_format(2, col as u16, *header, &self.bold)
                .map_err(export_err("write header"))?;
        }

        for (i, row) in list.rows.iter().enumerate() {
            let r = 3 + i as u32;
            worksheet
                .write_number(r, 0, row.rank as f64)
                .map_err(export_err("write rank"))?;
            if let Some(id) = row.student_id {
                worksheet
                    .write_number(r, 1, id as f64)
                    .map_err(export_err("write student id"))?;
            }
            worksheet
                .write_string(r, 2, &row.name)
                .map_err(export_err("write name"))?;
            if let Some(class) = &row.class_label {
                worksheet
                    .write_string(r, 3, class)
                    .map_err(export_err("write class"))?;
            }

            let mut col: u16 = 4;
            if list.is_cross_exam() {
                if let Some(count) = row.exam_count {
                    worksheet
                        .write_number(r, col, count as f64)
                        .map_err(export_err("write exam count"))?;
                }
                col += 1;
                for score in &row.exam_scores {
                    self.write_score(worksheet, r, col, *score)?;
                    col += 1;
                }
            }
            self.write_score(worksheet, r, col, row.average)?;
        }

        if list.is_cross_exam() {
            let legend_row = 4 + list.rows.len() as u32;
            for (i, (column, exam)) in list.exam_columns.iter().zip(&list.exam_names).enumerate() {
                worksheet
                    .write_string(legend_row + i as u32, 0, format!("{column} = {exam}"))
                    .map_err(export_err("write exam legend"))?;
            }
        }

        worksheet.set_column_width(2, 28).map_err(export_err("size columns"))?;

        workbook
            .save(output_path)
            .map_err(|e| ExamError::Export(format!("Failed to save Excel file: {}", e)))?;
        info!(path = %output_path.display(), rows = list.rows.len(), "exported ranked list");
        Ok(())
    }

    /// Header block, chronological score table, trend and net charts
    pub fn export_student_report(
        &self,
        report: &StudentReport,
        output_path: &Path,
    ) -> ExamResult<()> {
        let mut workbook = Workbook::new();

        let worksheet = workbook.add_worksheet();
        worksheet
            .set_name(REPORT_SHEET)
            .map_err(export_err("set worksheet name"))?;

        worksheet
            .write_string_with_format(0, 0, "Student report", &self.bold)
            .map_err(export_err("write title"))?;
        let header: [(&str, String); 4] = [
            ("Name", report.name.clone()),
            ("Grade tier", report.grade_tier.to_string()),
            ("Trend", report.verdict.label().to_string()),
            ("Comment", report.comment.clone()),
        ];
        for (i, (label, value)) in header.iter().enumerate() {
            let r = 1 + i as u32;
            worksheet
                .write_string_with_format(r, 0, *label, &self.bold)
                .map_err(export_err("write report header"))?;
            worksheet
                .write_string(r, 1, value)
                .map_err(export_err("write report header"))?;
        }

        for (col, title) in ["Exam", "Class", "Score", "Date"].iter().enumerate() {
            worksheet
                .write_string_with_format(HISTORY_FIRST_ROW - 1, col as u16, *title, &self.bold)
                .map_err(export_err("write history header"))?;
        }
        for (i, entry) in report.history.iter().enumerate() {
            let r = HISTORY_FIRST_ROW + i as u32;
            worksheet
                .write_string(r, 0, &entry.exam_name)
                .map_err(export_err("write history"))?;
            worksheet
                .write_string(r, 1, entry.class_label.as_deref().unwrap_or("-"))
                .map_err(export_err("write history"))?;
            match entry.score {
                Some(score) => worksheet
                    .write_number_with_format(r, 2, score, &self.score)
                    .map_err(export_err("write history"))?,
                None => worksheet
                    .write_string(r, 2, "-")
                    .map_err(export_err("write history"))?,
            };
            worksheet
                .write_string(r, 3, format_timestamp(&entry.created_at))
                .map_err(export_err("write history"))?;
        }
        worksheet.set_column_width(0, 18).map_err(export_err("size columns"))?;
        worksheet.set_column_width(1, 12).map_err(export_err("size columns"))?;
        worksheet.set_column_width(3, 18).map_err(export_err("size columns"))?;

        let chart_row = HISTORY_FIRST_ROW + report.history.len() as u32 + 2;
        if let Some(chart) = series_chart(ChartType::Line, "Score trend", &report.score_chart, 0) {
            worksheet
                .insert_chart(chart_row, 0, &chart)
                .map_err(export_err("insert score chart"))?;
        } else {
            warn!(student = %report.name, "no scores to chart");
        }
        if let Some(chart) = series_chart(
            ChartType::Column,
            "Net scores (latest exam)",
            &report.net_chart,
            3,
        ) {
            worksheet
                .insert_chart(chart_row + 16, 0, &chart)
                .map_err(export_err("insert net chart"))?;
        } else {
            warn!(student = %report.name, "no net scores to chart");
        }

        let data = workbook.add_worksheet();
        data.set_name(CHART_DATA_SHEET)
            .map_err(export_err("set worksheet name"))?;
        write_series(data, &report.score_chart, 0)?;
        write_series(data, &report.net_chart, 3)?;

        workbook
            .save(output_path)
            .map_err(|e| ExamError::Export(format!("Failed to save Excel file: {}", e)))?;
        info!(path = %output_path.display(), student = %report.name, "exported student report");
        Ok(())
    }

    fn write_score(
        &self,
        worksheet: &mut Worksheet,
        row: u32,
        col: u16,
        score: Option<f64>,
    ) -> ExamResult<()> {
        if let Some(score) = score {
            worksheet
                .write_number_with_format(row, col, score, &self.score)
                .map_err(export_err("write score"))?;
        }
        Ok(())
    }
}

/// Labels in column `col`, values in `col + 1`, starting at row 0
fn write_series(worksheet: &mut Worksheet, series: &ChartSeries, col: u16) -> ExamResult<()> {
    for (i, (label, value)) in series.labels.iter().zip(&series.values).enumerate() {
        worksheet
            .write_string(i as u32, col, label)
            .map_err(export_err("write chart data"))?;
        worksheet
            .write_number(i as u32, col + 1, *value)
            .map_err(export_err("write chart data"))?;
    }
    Ok(())
}

fn series_chart(kind: ChartType, title: &str, series: &ChartSeries, col: u16) -> Option<Chart> {
    if series.is_empty() {
        return None;
    }
    let last = series.len() as u32 - 1;
    let mut chart = Chart::new(kind);
    chart
        .add_series()
        .set_categories((CHART_DATA_SHEET, 0, col, last, col))
        .set_values((CHART_DATA_SHEET, 0, col + 1, last, col + 1));
    chart.title().set_name(title);
    chart.legend().set_hidden();
    Some(chart)
}
