//! QR code rendering for terminal pairing.

use kurumi_core::error::KurumiError;

/// Generate a compact QR code for terminal display using Unicode half-block characters.
///
/// Packs two rows of modules into one line of text using `▀`, `▄`, `█`, and space,
/// with a one-module quiet zone so phone cameras lock on in dark terminals.
pub fn generate_qr_terminal(qr_data: &str) -> Result<String, KurumiError> {
    use qrcode::{Color, EcLevel, QrCode};

    let code = QrCode::with_error_correction_level(qr_data.as_bytes(), EcLevel::L)
        .map_err(|e| KurumiError::Channel(format!("QR generation failed: {e}")))?;

    let width = code.width();
    let colors: Vec<Color> = code.into_colors();
    // Coordinates include the quiet zone: module (r, c) lives at (r - 1, c - 1).
    let is_dark = |row: usize, col: usize| -> bool {
        match (row.checked_sub(1), col.checked_sub(1)) {
            (Some(r), Some(c)) if r < width && c < width => colors[r * width + c] == Color::Dark,
            _ => false,
        }
    };

    let total = width + 2;
    let mut out = String::with_capacity(total * (total / 2 + 1) * 3);
    let mut row = 0;
    while row < total {
        for col in 0..total {
            out.push(match (is_dark(row, col), is_dark(row + 1, col)) {
                (true, true) => '█',
                (true, false) => '▀',
                (false, true) => '▄',
                (false, false) => ' ',
            });
        }
        out.push('\n');
        row += 2;
    }

    Ok(out)
}
