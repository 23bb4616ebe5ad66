//! Styled terminal rendering of an extraction result.
//!
//! The font family cannot be changed in a terminal; color, bold and italic
//! are applied to header, table body and footer alike.

use console::{Alignment, Style, measure_text_width, pad_str};

use ink2text_core::render::TABLE_HEAD;
use ink2text_core::{ExtractionResult, FormattingPreferences, Rgb};

/// Render the result, or an empty string when there is nothing to show.
pub fn render(result: &ExtractionResult, prefs: &FormattingPreferences) -> String {
    if !result.has_content() {
        return String::new();
    }

    let text_style = text_style(prefs);
    let mut segments = Vec::new();

    if !result.header_text.trim().is_empty() {
        segments.push(paragraph(&result.header_lines(), &text_style));
    }
    if !result.items.is_empty() {
        segments.push(table(result, &text_style));
    }
    if !result.footer_text.trim().is_empty() {
        segments.push(paragraph(&result.footer_lines(), &text_style));
    }

    segments.join("\n\n")
}

fn text_style(prefs: &FormattingPreferences) -> Style {
    let mut style = Style::new().color256(ansi256(prefs.text_color));
    if prefs.bold {
        style = style.bold();
    }
    if prefs.italic {
        style = style.italic();
    }
    style
}

/// Nearest entry of the 6x6x6 xterm color cube.
pub fn ansi256(color: Rgb) -> u8 {
    let level = |c: u8| ((u16::from(c) * 5 + 127) / 255) as u8;
    16 + 36 * level(color.r) + 6 * level(color.g) + level(color.b)
}

fn paragraph(lines: &[&str], style: &Style) -> String {
    lines
        .iter()
        .map(|line| style.apply_to(line).to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

fn table(result: &ExtractionResult, style: &Style) -> String {
    let head_style = Style::new().white().on_color256(236).bold();

    let item_width = result
        .items
        .iter()
        .map(|i| measure_text_width(&i.item))
        .chain([measure_text_width(TABLE_HEAD[0])])
        .max()
        .unwrap_or(0);
    let rate_width = result
        .items
        .iter()
        .map(|i| measure_text_width(&i.rate))
        .chain([measure_text_width(TABLE_HEAD[1])])
        .max()
        .unwrap_or(0);

    let rule = |left: &str, mid: &str, right: &str| {
        format!(
            "{}{}{}{}{}",
            left,
            "─".repeat(item_width + 2),
            mid,
            "─".repeat(rate_width + 2),
            right
        )
    };
    let row = |item: String, rate: String| format!("│ {} │ {} │", item, rate);

    let mut lines = Vec::with_capacity(result.items.len() + 4);
    lines.push(rule("┌", "┬", "┐"));
    lines.push(row(
        head_style
            .apply_to(pad_str(TABLE_HEAD[0], item_width, Alignment::Left, None))
            .to_string(),
        head_style
            .apply_to(pad_str(TABLE_HEAD[1], rate_width, Alignment::Right, None))
            .to_string(),
    ));
    lines.push(rule("├", "┼", "┤"));
    for item in &result.items {
        lines.push(row(
            style
                .apply_to(pad_str(&item.item, item_width, Alignment::Left, None))
                .to_string(),
            style
                .apply_to(pad_str(&item.rate, rate_width, Alignment::Right, None))
                .to_string(),
        ));
    }
    lines.push(rule("└", "┴", "┘"));

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use console::strip_ansi_codes;
    use ink2text_core::Item;
    use pretty_assertions::assert_eq;

    fn crown_rates() -> ExtractionResult {
        ExtractionResult {
            header_text: "Crown Rates".to_string(),
            items: vec![Item::new("Pen", "10")],
            footer_text: "Min Qty 10\nFolder only Rate".to_string(),
        }
    }

    #[test]
    fn test_render_crown_rates() {
        let rendered = render(&crown_rates(), &FormattingPreferences::default());
        let plain = strip_ansi_codes(&rendered);

        assert_eq!(
            plain,
            "Crown Rates\n\
             \n\
             ┌───────────┬──────────┐\n\
             │ Item Name │ Rate (₹) │\n\
             ├───────────┼──────────┤\n\
             │ Pen       │       10 │\n\
             └───────────┴──────────┘\n\
             \n\
             Min Qty 10\n\
             Folder only Rate"
        );
    }

    #[test]
    fn test_no_table_without_items() {
        let result = ExtractionResult {
            header_text: "Just a note".to_string(),
            ..Default::default()
        };
        let rendered = render(&result, &FormattingPreferences::default());
        assert_eq!(strip_ansi_codes(&rendered), "Just a note");
    }

    #[test]
    fn test_empty_result_renders_nothing() {
        assert_eq!(render(&ExtractionResult::default(), &FormattingPreferences::default()), "");
    }

    #[test]
    fn test_ansi256_cube() {
        assert_eq!(ansi256(Rgb::new(0, 0, 0)), 16);
        assert_eq!(ansi256(Rgb::new(255, 255, 255)), 231);
        assert_eq!(ansi256(Rgb::new(255, 0, 0)), 196);
        assert_eq!(ansi256(Rgb::new(236, 72, 153)), 16 + 36 * 5 + 6 + 3);
    }
}
