use crate::domain::report::{ReportSummary, TransactionKind};
use crate::infrastructure::export::{ExportError, REPORT_TITLE, TRANSACTION_HEADERS, format_date};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};
use tracing::{debug, instrument};

const SHEET_NAME: &str = "Financial Report";
const CURRENCY_FORMAT: &str = "\"R$\" #,##0.00";

struct Styles {
    title: Format,
    heading: Format,
    header: Format,
    label: Format,
    cell: Format,
    income: Format,
    expense: Format,
}

impl Styles {
    fn new() -> Self {
        let currency = Format::new()
            .set_num_format(CURRENCY_FORMAT)
            .set_border(FormatBorder::Thin);
        Self {
            title: Format::new().set_bold().set_font_size(16),
            heading: Format::new().set_bold().set_font_size(12),
            header: Format::new()
                .set_bold()
                .set_background_color(Color::Silver)
                .set_align(FormatAlign::Center)
                .set_border(FormatBorder::Thin),
            label: Format::new().set_bold(),
            cell: Format::new().set_border(FormatBorder::Thin),
            income: currency.clone().set_font_color(Color::Green),
            expense: currency.set_font_color(Color::Red),
        }
    }
}

fn as_number(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}

fn fill_sheet(sheet: &mut Worksheet, report: &ReportSummary) -> Result<(), XlsxError> {
    let styles = Styles::new();
    sheet.set_name(SHEET_NAME)?;

    sheet.write_string_with_format(0, 0, REPORT_TITLE, &styles.title)?;
    sheet.write_string(
        1,
        0,
        format!(
            "Period: {} to {}",
            format_date(report.start_date),
            format_date(report.end_date)
        ),
    )?;

    sheet.write_string_with_format(3, 0, "Period Summary", &styles.heading)?;
    let balance_style = if report.balance.is_sign_negative() {
        &styles.expense
    } else {
        &styles.income
    };
    let summary = [
        ("Total Income", report.total_income, &styles.income),
        ("Total Expenses", report.total_expense, &styles.expense),
        ("Balance", report.balance, balance_style),
    ];
    let mut row: u32 = 4;
    for (label, value, style) in summary {
        sheet.write_string_with_format(row, 0, label, &styles.label)?;
        sheet.write_number_with_format(row, 1, as_number(value), style)?;
        row += 1;
    }
    sheet.write_string_with_format(row, 0, "Incomes", &styles.label)?;
    sheet.write_number(row, 1, report.income_count as f64)?;
    row += 1;
    sheet.write_string_with_format(row, 0, "Expenses", &styles.label)?;
    sheet.write_number(row, 1, report.expense_count as f64)?;
    row += 2;

    sheet.write_string_with_format(row, 0, "Detailed Transactions", &styles.heading)?;
    row += 1;
    for (col, header) in TRANSACTION_HEADERS.iter().enumerate() {
        sheet.write_string_with_format(row, col as u16, *header, &styles.header)?;
    }
    row += 1;

    for line in &report.transactions {
        sheet.write_string_with_format(row, 0, format_date(line.date), &styles.cell)?;
        sheet.write_string_with_format(row, 1, line.type_display_name, &styles.cell)?;
        sheet.write_string_with_format(row, 2, line.category_display_name, &styles.cell)?;
        sheet.write_string_with_format(row, 3, &line.description, &styles.cell)?;
        let amount_style = match line.kind {
            TransactionKind::Income => &styles.income,
            TransactionKind::Expense => &styles.expense,
        };
        sheet.write_number_with_format(row, 4, as_number(line.amount), amount_style)?;
        row += 1;
    }

    row += 1;
    sheet.write_string_with_format(row, 0, "Total records", &styles.label)?;
    sheet.write_number_with_format(row, 1, report.record_count() as f64, &styles.cell)?;

    sheet.autofit();
    // the title would otherwise stretch the first column
    sheet.set_column_width(0, 14)?;
    Ok(())
}

/// Renders the report as a single-sheet XLSX workbook.
#[instrument(skip(report), fields(transactions = report.transactions.len()))]
pub fn render_xlsx(report: &ReportSummary) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    fill_sheet(workbook.add_worksheet(), report)?;
    let bytes = workbook.save_to_buffer()?;
    debug!(bytes = bytes.len(), "XLSX report rendered");
    Ok(bytes)
}
