use crate::domain::report::{ReportSummary, TransactionKind};
use crate::infrastructure::export::{
    ExportError, REPORT_TITLE, TRANSACTION_HEADERS, format_currency, format_date,
};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Rgb,
};
use rust_decimal::Decimal;
use tracing::{debug, instrument};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 15.0;
const ROW_HEIGHT: f32 = 6.5;
const COLUMNS: [f32; 5] = [15.0, 40.0, 62.0, 100.0, 165.0];
const DESCRIPTION_CHARS: usize = 34;

fn income_color() -> Color {
    Color::Rgb(Rgb::new(0.0, 0.5, 0.0, None))
}

fn expense_color() -> Color {
    Color::Rgb(Rgb::new(0.8, 0.0, 0.0, None))
}

fn text_color() -> Color {
    Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None))
}

fn pdf_error(e: printpdf::Error) -> ExportError {
    ExportError::Pdf(format!("{:?}", e))
}

/// Writes top to bottom, starting a new page whenever the cursor hits the bottom margin.
struct Cursor {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
    pages: usize,
}

impl Cursor {
    fn text(&self, text: &str, size: f32, x: f32, bold: bool) {
        let font = if bold { &self.bold } else { &self.regular };
        self.layer.use_text(text, size, Mm(x), Mm(self.y), font);
    }

    fn colored_text(&self, text: &str, size: f32, x: f32, bold: bool, color: Color) {
        self.layer.set_fill_color(color);
        self.text(text, size, x, bold);
        self.layer.set_fill_color(text_color());
    }

    fn rule(&self) {
        let line = Line {
            points: vec![
                (Point::new(Mm(MARGIN), Mm(self.y - 1.5)), false),
                (Point::new(Mm(PAGE_WIDTH - MARGIN), Mm(self.y - 1.5)), false),
            ],
            is_closed: false,
        };
        self.layer.set_outline_thickness(0.5);
        self.layer.add_line(line);
    }

    fn advance(&mut self, by: f32) {
        self.y -= by;
    }

    /// Moves to a fresh page when fewer than `needed` millimetres remain.
    fn ensure_room(&mut self, needed: f32) -> bool {
        if self.y - needed >= MARGIN {
            return false;
        }
        self.pages += 1;
        let (page, layer) = self.doc.add_page(
            Mm(PAGE_WIDTH),
            Mm(PAGE_HEIGHT),
            format!("Page {}", self.pages),
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT - MARGIN;
        true
    }
}

fn amount_color(amount: Decimal) -> Color {
    if amount.is_sign_negative() {
        expense_color()
    } else {
        income_color()
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    cut.push_str("...");
    cut
}

fn table_header(cursor: &mut Cursor) {
    for (header, x) in TRANSACTION_HEADERS.iter().zip(COLUMNS) {
        cursor.text(header, 10.0, x, true);
    }
    cursor.rule();
    cursor.advance(ROW_HEIGHT + 1.0);
}

/// Renders the report as an A4 PDF document.
#[instrument(skip(report), fields(transactions = report.transactions.len()))]
pub fn render_pdf(report: &ReportSummary) -> Result<Vec<u8>, ExportError> {
    let (doc, page, layer) =
        PdfDocument::new(REPORT_TITLE, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Page 1");
    let regular = doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_error)?;
    let layer = doc.get_page(page).get_layer(layer);

    let mut cursor = Cursor {
        doc,
        layer,
        regular,
        bold,
        y: PAGE_HEIGHT - MARGIN - 5.0,
        pages: 1,
    };

    cursor.text(REPORT_TITLE, 20.0, MARGIN, true);
    cursor.advance(10.0);
    cursor.text(
        &format!(
            "Period: {} to {}",
            format_date(report.start_date),
            format_date(report.end_date)
        ),
        12.0,
        MARGIN,
        false,
    );
    cursor.advance(12.0);

    cursor.text("Period Summary", 14.0, MARGIN, true);
    cursor.rule();
    cursor.advance(9.0);
    let summary = [
        ("Total Income", report.total_income, income_color()),
        ("Total Expenses", report.total_expense, expense_color()),
        ("Balance", report.balance, amount_color(report.balance)),
    ];
    for (label, value, color) in summary {
        cursor.text(label, 11.0, MARGIN, true);
        cursor.colored_text(&format_currency(value), 11.0, 70.0, true, color);
        cursor.advance(ROW_HEIGHT);
    }
    cursor.text(
        &format!(
            "Incomes: {}    Expenses: {}",
            report.income_count, report.expense_count
        ),
        10.0,
        MARGIN,
        false,
    );
    cursor.advance(14.0);

    cursor.text("Detailed Transactions", 14.0, MARGIN, true);
    cursor.advance(9.0);
    table_header(&mut cursor);

    if report.transactions.is_empty() {
        cursor.text("No transactions in this period.", 10.0, MARGIN, false);
        cursor.advance(ROW_HEIGHT);
    }

    for line in &report.transactions {
        if cursor.ensure_room(ROW_HEIGHT) {
            table_header(&mut cursor);
        }
        cursor.text(&format_date(line.date), 9.0, COLUMNS[0], false);
        cursor.text(line.type_display_name, 9.0, COLUMNS[1], false);
        cursor.text(&truncate(line.category_display_name, 18), 9.0, COLUMNS[2], false);
        cursor.text(&truncate(&line.description, DESCRIPTION_CHARS), 9.0, COLUMNS[3], false);
        let color = match line.kind {
            TransactionKind::Income => income_color(),
            TransactionKind::Expense => expense_color(),
        };
        cursor.colored_text(&format_currency(line.amount), 9.0, COLUMNS[4], false, color);
        cursor.advance(ROW_HEIGHT);
    }

    cursor.ensure_room(ROW_HEIGHT * 2.0);
    cursor.advance(ROW_HEIGHT);
    cursor.text(
        &format!("Total records: {}", report.record_count()),
        10.0,
        MARGIN,
        false,
    );

    let pages = cursor.pages;
    let bytes = cursor.doc.save_to_bytes().map_err(pdf_error)?;
    debug!(pages, bytes = bytes.len(), "PDF report rendered");
    Ok(bytes)
}
