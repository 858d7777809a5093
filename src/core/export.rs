//! Export Formatter - spend records to downloadable files.
//!
//! Two encodings are produced from the same chronologically sorted selection:
//! a fully quoted CSV file and a paginated plain-text report. Both are named
//! `expenses-<label>` with the matching extension.

use crate::{
    config::app::ExportConfig,
    core::calendar,
    errors::{Error, Result},
    models::{PaymentMethod, SpendRecord},
};
use chrono::{NaiveDate, NaiveDateTime};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use rust_decimal::{Decimal, RoundingStrategy};
use std::{
    fmt::Write as _,
    path::{Path, PathBuf},
};
use tracing::info;

const PAGE_BREAK: char = '\u{c}';
const DATE_WIDTH: usize = 12;
const PURPOSE_WIDTH: usize = 32;
const AMOUNT_WIDTH: usize = 16;
const METHOD_WIDTH: usize = 6;

/// Inclusive date range plus the label used in titles and file names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPeriod {
    /// First day included
    pub from: NaiveDate,
    /// Last day included
    pub to: NaiveDate,
    /// Label such as `October-2026`
    pub label: String,
}

impl ExportPeriod {
    /// A whole calendar month, labelled `<MonthName>-<YYYY>`.
    pub fn month(year: i32, month: u32) -> Result<Self> {
        let (from, to) = calendar::month_bounds(year, month)?;
        Ok(Self {
            from,
            to,
            label: from.format("%B-%Y").to_string(),
        })
    }

    /// Whether `date` falls inside the period.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        (self.from..=self.to).contains(&date)
    }
}

/// Output encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Delimited text
    Csv,
    /// Paginated plain-text report
    Document,
}

/// An encoded export, ready to be saved or handed to a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    /// Suggested file name
    pub file_name: String,
    /// MIME type of `contents`
    pub content_type: &'static str,
    /// Encoded bytes (UTF-8)
    pub contents: Vec<u8>,
}

impl ExportFile {
    /// Writes the file into `dir` and returns the full path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.contents)?;
        info!("Export written to {}", path.display());
        Ok(path)
    }
}

/// Spends inside `period`, oldest first (by date, then creation time).
#[must_use]
pub fn select_for_export<'a>(spends: &'a [SpendRecord], period: &ExportPeriod) -> Vec<&'a SpendRecord> {
    let mut selected: Vec<&SpendRecord> = spends.iter().filter(|s| period.contains(s.date)).collect();
    selected.sort_by(|a, b| a.date.cmp(&b.date).then(a.created_at.cmp(&b.created_at)));
    selected
}

/// Selects the period's spends and encodes them in `format`.
pub fn export_spends(
    spends: &[SpendRecord],
    period: &ExportPeriod,
    format: ExportFormat,
    options: &ExportConfig,
    generated_at: NaiveDateTime,
) -> Result<ExportFile> {
    let records = select_for_export(spends, period);
    match format {
        ExportFormat::Csv => to_csv(&records, &period.label),
        ExportFormat::Document => to_document(&records, &period.label, options, generated_at),
    }
}

fn ensure_not_empty(records: &[&SpendRecord]) -> Result<()> {
    if records.is_empty() {
        return Err(Error::validation("No records to export for selected period"));
    }
    Ok(())
}

fn total_of(records: &[&SpendRecord]) -> Decimal {
    records.iter().map(|r| r.amount).sum()
}

fn total_for(records: &[&SpendRecord], method: PaymentMethod) -> Decimal {
    records
        .iter()
        .filter(|r| r.method == method)
        .map(|r| r.amount)
        .sum()
}

/// Encodes records as CSV with every cell quoted and a trailing `TOTAL` row.
pub fn to_csv(records: &[&SpendRecord], label: &str) -> Result<ExportFile> {
    ensure_not_empty(records)?;

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(["Date", "Purpose", "Amount", "Payment Method"])?;
    for record in records {
        writer.write_record([
            record.date.format("%Y-%m-%d").to_string(),
            record.purpose.clone(),
            two_places(record.amount),
            record.method.label().to_string(),
        ])?;
    }
    writer.write_record([
        String::new(),
        "TOTAL".to_string(),
        two_places(total_of(records)),
        String::new(),
    ])?;

    let contents = writer.into_inner().map_err(|e| Error::Export {
        message: e.to_string(),
    })?;

    Ok(ExportFile {
        file_name: format!("expenses-{label}.csv"),
        content_type: "text/csv;charset=utf-8",
        contents,
    })
}

/// Renders records as a paginated text report.
///
/// The title and summary open the first page; every page repeats the table
/// header and ends with a `Generated on ... | Page i of n` footer. The total
/// row closes the table on the last page. Pages are separated by form feeds.
pub fn to_document(
    records: &[&SpendRecord],
    label: &str,
    options: &ExportConfig,
    generated_at: NaiveDateTime,
) -> Result<ExportFile> {
    ensure_not_empty(records)?;

    let symbol = options.currency_symbol.as_str();
    let pages: Vec<&[&SpendRecord]> = records.chunks(options.rows_per_page.max(1)).collect();
    let page_count = pages.len();
    let rule = "-".repeat(DATE_WIDTH + PURPOSE_WIDTH + AMOUNT_WIDTH + METHOD_WIDTH + 9);
    let generated = generated_at.format("%b %d, %Y %H:%M");

    let mut out = String::new();
    for (index, page) in pages.iter().enumerate() {
        if index == 0 {
            writeln!(out, "{}", options.app_name).map_err(fmt_error)?;
            writeln!(out, "Monthly Expense Report - {label}").map_err(fmt_error)?;
            writeln!(out).map_err(fmt_error)?;
            writeln!(
                out,
                "Total Expenses: {}",
                format_money(total_of(records), symbol)
            )
            .map_err(fmt_error)?;
            writeln!(
                out,
                "Hand: {}  |  GPay: {}",
                format_money(total_for(records, PaymentMethod::Hand), symbol),
                format_money(total_for(records, PaymentMethod::Gpay), symbol)
            )
            .map_err(fmt_error)?;
            writeln!(out).map_err(fmt_error)?;
        }

        table_row(&mut out, "Date", "Purpose", "Amount", "Method")?;
        writeln!(out, "{rule}").map_err(fmt_error)?;
        for record in *page {
            table_row(
                &mut out,
                &record.date.format("%b %d, %Y").to_string(),
                &record.purpose,
                &format_money(record.amount, symbol),
                record.method.label(),
            )?;
        }
        if index + 1 == page_count {
            writeln!(out, "{rule}").map_err(fmt_error)?;
            table_row(&mut out, "", "Total", &format_money(total_of(records), symbol), "")?;
        }

        writeln!(out).map_err(fmt_error)?;
        write!(out, "Generated on {generated} | Page {} of {page_count}", index + 1)
            .map_err(fmt_error)?;
        if index + 1 < page_count {
            out.push('\n');
            out.push(PAGE_BREAK);
        }
        out.push('\n');
    }

    Ok(ExportFile {
        file_name: format!("expenses-{label}.txt"),
        content_type: "text/plain;charset=utf-8",
        contents: out.into_bytes(),
    })
}

fn table_row(out: &mut String, date: &str, purpose: &str, amount: &str, method: &str) -> Result<()> {
    writeln!(
        out,
        "{date:<DATE_WIDTH$} | {:<PURPOSE_WIDTH$} | {amount:>AMOUNT_WIDTH$} | {method:<METHOD_WIDTH$}",
        truncate(purpose, PURPOSE_WIDTH)
    )
    .map_err(fmt_error)?;
    Ok(())
}

fn fmt_error(e: std::fmt::Error) -> Error {
    Error::Export {
        message: e.to_string(),
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width - 1).collect();
        cut.push('~');
        cut
    }
}

/// Amount rounded half away from zero and printed with exactly two decimals.
fn two_places(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}")
}

/// Formats an amount with two decimals and Indian digit grouping, e.g. `₹12,34,567.50`.
#[must_use]
pub fn format_money(amount: Decimal, symbol: &str) -> String {
    let rounded = two_places(amount.abs());
    let (integer, fraction) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));

    let grouped = if integer.len() <= 3 {
        integer.to_string()
    } else {
        let (head, last_three) = integer.split_at(integer.len() - 3);
        let mut groups: Vec<&str> = Vec::new();
        let mut rest = head;
        while rest.len() > 2 {
            let (left, pair) = rest.split_at(rest.len() - 2);
            groups.push(pair);
            rest = left;
        }
        groups.push(rest);
        groups.reverse();
        format!("{},{last_three}", groups.join(","))
    };

    let sign = if amount.is_sign_negative() && !amount.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{symbol}{grouped}.{fraction}")
}
