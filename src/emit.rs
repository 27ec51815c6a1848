//! Writes a report table to `<YYYYMMDD>_<slug>.<ext>`.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rust_xlsxwriter::Workbook;

use crate::error::Result;
use crate::models::{Cell, ReportTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ReportFormat {
    #[default]
    Xlsx,
    Csv,
}

impl ReportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Xlsx => "xlsx",
            ReportFormat::Csv => "csv",
        }
    }
}

pub fn report_path(out_dir: &Path, slug: &str, date: NaiveDate, format: ReportFormat) -> PathBuf {
    out_dir.join(format!(
        "{}_{}.{}",
        date.format("%Y%m%d"),
        slug,
        format.extension()
    ))
}

/// Replaces any file already at the target path.
pub fn emit(
    table: &ReportTable,
    out_dir: &Path,
    date: NaiveDate,
    format: ReportFormat,
) -> Result<PathBuf> {
    fs::create_dir_all(out_dir)?;
    let path = report_path(out_dir, table.slug, date, format);

    match format {
        ReportFormat::Xlsx => write_xlsx(table, &path)?,
        ReportFormat::Csv => write_csv(table, &path)?,
    }

    log::debug!("wrote {} rows to {}", table.rows.len(), path.display());
    Ok(path)
}

fn write_xlsx(table: &ReportTable, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col, name) in table.columns().into_iter().enumerate() {
        worksheet.write_string(0, col as u16, name)?;
    }

    for (index, row) in table.rows.iter().enumerate() {
        let row_num = index as u32 + 1;
        for (col, (_, cell)) in row.fields.iter().enumerate() {
            match cell {
                Cell::Text(text) => {
                    worksheet.write_string(row_num, col as u16, text.as_str())?;
                }
                Cell::Count(count) => {
                    worksheet.write_number(row_num, col as u16, *count as f64)?;
                }
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

fn write_csv(table: &ReportTable, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(table.columns())?;
    for row in &table.rows {
        writer.write_record(row.fields.iter().map(|(_, cell)| cell.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}
