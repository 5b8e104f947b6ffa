//! Shared fixtures: synthetic exam exports written with rust_xlsxwriter

#![allow(dead_code)]

use rust_xlsxwriter::{Format, Workbook};
use std::path::{Path, PathBuf};

/// One student line of a generated export
pub struct Line {
    pub id: Option<f64>,
    pub name: &'static str,
    pub class: &'static str,
    pub score: Option<f64>,
    pub turkce: [f64; 3],
    pub matematik: [f64; 3],
}

pub fn line(id: f64, name: &'static str, class: &'static str, score: f64) -> Line {
    Line {
        id: Some(id),
        name,
        class,
        score: Some(score),
        turkce: [15.0, 3.0, 2.0],
        matematik: [12.0, 6.0, 2.0],
    }
}

/// Column names the generated layout must resolve to
pub const EXPECTED_COLUMNS: [&str; 13] = [
    "OgrNo",
    "AdSoyad",
    "Sinif",
    "LGS_Puan",
    "Türkçe_D",
    "Türkçe_Y",
    "Türkçe_N",
    "Matematik_D",
    "Matematik_Y",
    "Matematik_N",
    "Derece_Sınıf",
    "Derece_Genel",
    "Dereceler",
];

/// Write an export with the three-band header in rows 3-5 (anchor on row 5),
/// a school banner in row 1 and the exam name in row 2.
///
/// `summary_at` inserts a "Genel Ortalama" row before that data line; a
/// "Kurum Ortalaması" row is always appended after the data.
pub fn write_export(path: &Path, exam: &str, lines: &[Line], summary_at: Option<usize>) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let plain = Format::new();

    sheet.write_string(0, 0, "Cemil Meriç Ortaokulu").unwrap();
    sheet.write_string(1, 0, exam).unwrap();

    // Group band (merged cells read back as one value followed by blanks)
    sheet.write_string(2, 3, "LGS").unwrap();
    sheet.merge_range(2, 4, 2, 6, "Sözel", &plain).unwrap();
    sheet.merge_range(2, 7, 2, 9, "Sayısal", &plain).unwrap();

    // Subject band
    sheet.write_string(3, 3, "Puan").unwrap();
    sheet.merge_range(3, 4, 3, 6, "Türkçe", &plain).unwrap();
    sheet.merge_range(3, 7, 3, 9, "Matematik", &plain).unwrap();
    sheet.merge_range(3, 10, 3, 11, "Dereceler", &plain).unwrap();

    // Measurement band
    let measurement = [
        "Öğr.No",
        "Adı Soyadı",
        "Sınıf",
        "",
        "D",
        "Y",
        "N",
        "D",
        "Y",
        "N",
        "Sınıf",
        "Genel",
    ];
    for (col, text) in measurement.iter().enumerate() {
        if !text.is_empty() {
            sheet.write_string(4, col as u16, *text).unwrap();
        }
    }

    let mut row: u32 = 5;
    for (i, l) in lines.iter().enumerate() {
        if summary_at == Some(i) {
            sheet.write_string(row, 0, "Genel Ortalama").unwrap();
            sheet.write_number(row, 3, 350.0).unwrap();
            row += 1;
        }
        if let Some(id) = l.id {
            sheet.write_number(row, 0, id).unwrap();
        }
        sheet.write_string(row, 1, l.name).unwrap();
        sheet.write_string(row, 2, l.class).unwrap();
        match l.score {
            Some(score) => sheet.write_number(row, 3, score).unwrap(),
            None => sheet.write_string(row, 3, "Girmedi").unwrap(),
        };
        for (k, v) in l.turkce.iter().chain(l.matematik.iter()).enumerate() {
            sheet.write_number(row, 4 + k as u16, *v).unwrap();
        }
        sheet.write_number(row, 10, (i + 1) as f64).unwrap();
        sheet.write_number(row, 11, (i + 10) as f64).unwrap();
        sheet.write_string(row, 12, "-").unwrap();
        row += 1;
    }
    sheet.write_string(row, 0, "Kurum Ortalaması").unwrap();
    sheet.write_number(row, 3, 352.5).unwrap();

    workbook.save(path).unwrap();
}

/// Export whose identifier header was renamed, so no anchor row exists
pub fn write_export_without_anchor(path: &Path) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(1, 0, "Deneme-9").unwrap();
    sheet.write_string(4, 0, "Numara").unwrap();
    sheet.write_string(4, 1, "Adı Soyadı").unwrap();
    sheet.write_number(5, 0, 1.0).unwrap();
    sheet.write_string(5, 1, "Ali").unwrap();
    workbook.save(path).unwrap();
}

/// Three-student export at `dir/<file>`
pub fn sample_export(dir: &Path, file: &str, exam: &str, scores: [f64; 3]) -> PathBuf {
    let path = dir.join(file);
    write_export(
        &path,
        exam,
        &[
            line(101.0, "Ayşe Yılmaz", "8-A", scores[0]),
            line(102.0, "Mehmet Demir", "8-A", scores[1]),
            line(103.0, "Zeynep Kaya", "8-B", scores[2]),
        ],
        Some(1),
    );
    path
}
