//! Single-page PDF trade report.
//!
//! Fixed A4 layout, one labeled field per line, mirroring the dashboard
//! metrics. The artifact is staged through a named temporary file that is
//! removed on every exit path, including write failure.

use printpdf::{BuiltinFont, Mm, PdfDocument};
use std::io::BufWriter;
use tempfile::NamedTempFile;

use crate::error::ReportError;
use crate::models::SignalLevels;

/// Name offered for the downloadable artifact.
pub const REPORT_FILE_NAME: &str = "trade_report.pdf";

pub const REPORT_CONTENT_TYPE: &str = "application/pdf";

const MARGIN_X_MM: f32 = 17.6;
const TOP_LINE_Y_MM: f32 = 282.2;
const LINE_STEP_MM: f32 = 10.6;
const FONT_SIZE: f32 = 12.0;

/// The eight report lines, top to bottom: title, user, ticker, then one
/// labeled figure per line.
pub fn report_lines(user_email: &str, ticker: &str, levels: &SignalLevels) -> [String; 8] {
    [
        "Stock Trading Report".to_string(),
        format!("User: {}", user_email),
        format!("Stock: {}", ticker),
        format!("Price: ${:.2}", levels.latest_price),
        format!("Best Entry: ${:.2}", levels.best_entry),
        format!("Target: ${:.2}", levels.target),
        format!("Stop Loss: ${:.2}", levels.stop_loss),
        format!("Signal: {}", levels.signal),
    ]
}

/// Render the report for one computed signal and return the PDF bytes.
pub fn render_trade_report(
    user_email: &str,
    ticker: &str,
    levels: &SignalLevels,
) -> Result<Vec<u8>, ReportError> {
    let (doc, page, layer) = PdfDocument::new("Trade Report", Mm(210.0), Mm(297.0), "report");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ReportError::Pdf(e.to_string()))?;
    let layer = doc.get_page(page).get_layer(layer);

    let lines = report_lines(user_email, ticker, levels);

    for (i, line) in lines.iter().enumerate() {
        let y = Mm(TOP_LINE_Y_MM - LINE_STEP_MM * i as f32);
        layer.use_text(line.as_str(), FONT_SIZE, Mm(MARGIN_X_MM), y, &font);
    }

    // Scoped acquisition: the temp file is deleted when `staging` drops, on
    // success and on every error path.
    let staging = NamedTempFile::new()?;
    let handle = staging.as_file().try_clone()?;
    doc.save(&mut BufWriter::new(handle))
        .map_err(|e| ReportError::Pdf(e.to_string()))?;

    let bytes = std::fs::read(staging.path())?;
    Ok(bytes)
}
