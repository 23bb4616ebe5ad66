//! Standard Type1 fonts, WinAnsi encoding and glyph metrics.

use crate::models::formatting::FontFamily;

/// One of the base-14 fonts used for export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    TimesRoman,
    TimesBold,
    TimesItalic,
    TimesBoldItalic,
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
}

impl StandardFont {
    pub const ALL: [StandardFont; 12] = [
        StandardFont::Helvetica,
        StandardFont::HelveticaBold,
        StandardFont::HelveticaOblique,
        StandardFont::HelveticaBoldOblique,
        StandardFont::TimesRoman,
        StandardFont::TimesBold,
        StandardFont::TimesItalic,
        StandardFont::TimesBoldItalic,
        StandardFont::Courier,
        StandardFont::CourierBold,
        StandardFont::CourierOblique,
        StandardFont::CourierBoldOblique,
    ];

    /// Pick the face for a family and style.
    pub fn select(family: FontFamily, bold: bool, italic: bool) -> Self {
        use StandardFont::*;
        match (family, bold, italic) {
            (FontFamily::Sans, false, false) => Helvetica,
            (FontFamily::Sans, true, false) => HelveticaBold,
            (FontFamily::Sans, false, true) => HelveticaOblique,
            (FontFamily::Sans, true, true) => HelveticaBoldOblique,
            (FontFamily::Serif, false, false) => TimesRoman,
            (FontFamily::Serif, true, false) => TimesBold,
            (FontFamily::Serif, false, true) => TimesItalic,
            (FontFamily::Serif, true, true) => TimesBoldItalic,
            (FontFamily::Mono, false, false) => Courier,
            (FontFamily::Mono, true, false) => CourierBold,
            (FontFamily::Mono, false, true) => CourierOblique,
            (FontFamily::Mono, true, true) => CourierBoldOblique,
        }
    }

    /// PostScript name.
    pub fn base_font(self) -> &'static str {
        use StandardFont::*;
        match self {
            Helvetica => "Helvetica",
            HelveticaBold => "Helvetica-Bold",
            HelveticaOblique => "Helvetica-Oblique",
            HelveticaBoldOblique => "Helvetica-BoldOblique",
            TimesRoman => "Times-Roman",
            TimesBold => "Times-Bold",
            TimesItalic => "Times-Italic",
            TimesBoldItalic => "Times-BoldItalic",
            Courier => "Courier",
            CourierBold => "Courier-Bold",
            CourierOblique => "Courier-Oblique",
            CourierBoldOblique => "Courier-BoldOblique",
        }
    }

    /// Name in the page resource dictionary.
    pub fn resource_name(self) -> String {
        let index = Self::ALL.iter().position(|f| *f == self).unwrap_or(0);
        format!("F{}", index + 1)
    }

    fn widths(self) -> Option<&'static [u16; 95]> {
        use StandardFont::*;
        match self {
            Helvetica | HelveticaOblique => Some(&HELVETICA),
            HelveticaBold | HelveticaBoldOblique => Some(&HELVETICA_BOLD),
            // Italic Times faces are measured with the upright widths.
            TimesRoman | TimesItalic => Some(&TIMES_ROMAN),
            TimesBold | TimesBoldItalic => Some(&TIMES_BOLD),
            Courier | CourierBold | CourierOblique | CourierBoldOblique => None,
        }
    }

    /// Advance width of one encoded byte in 1/1000 em.
    pub fn glyph_width(self, byte: u8) -> u16 {
        match self.widths() {
            None => 600,
            Some(table) if (32..=126).contains(&byte) => table[usize::from(byte - 32)],
            Some(table) => table[usize::from(b'n' - 32)],
        }
    }

    /// Width of encoded text in points.
    pub fn text_width(self, text: &[u8], size: f32) -> f32 {
        let units: u32 = text.iter().map(|b| u32::from(self.glyph_width(*b))).sum();
        units as f32 * size / 1000.0
    }
}

/// Encode text for a WinAnsi standard font.
///
/// Characters outside the encoding are replaced; the rupee sign becomes
/// `Rs.` since no standard font carries it.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\t' => out.push(b' '),
            '\u{20}'..='\u{7E}' | '\u{A0}'..='\u{FF}' => out.push(c as u8),
            '₹' => out.extend_from_slice(b"Rs."),
            '€' => out.push(0x80),
            '‚' => out.push(0x82),
            '„' => out.push(0x84),
            '…' => out.push(0x85),
            '‘' => out.push(0x91),
            '’' => out.push(0x92),
            '“' => out.push(0x93),
            '”' => out.push(0x94),
            '•' => out.push(0x95),
            '–' => out.push(0x96),
            '—' => out.push(0x97),
            '™' => out.push(0x99),
            c if c.is_control() => {}
            _ => out.push(b'?'),
        }
    }
    out
}

#[rustfmt::skip]
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

#[rustfmt::skip]
const TIMES_ROMAN: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 278, 278, 564, 564, 564, 444,
    921, 722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722,
    556, 722, 667, 556, 611, 722, 722, 944, 722, 722, 611, 333, 278, 333, 469, 500,
    333, 444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500,
    500, 500, 333, 389, 278, 500, 500, 722, 500, 500, 444, 480, 200, 480, 541,
];

#[rustfmt::skip]
const TIMES_BOLD: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500, 333, 333, 570, 570, 570, 500,
    930, 722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944, 722, 778,
    611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667, 333, 278, 333, 581, 500,
    333, 500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833, 556, 500,
    556, 556, 444, 389, 333, 556, 500, 722, 500, 500, 444, 394, 220, 394, 520,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_faces() {
        assert_eq!(StandardFont::select(FontFamily::Sans, false, false).base_font(), "Helvetica");
        assert_eq!(StandardFont::select(FontFamily::Serif, true, true).base_font(), "Times-BoldItalic");
        assert_eq!(StandardFont::select(FontFamily::Mono, false, true).base_font(), "Courier-Oblique");
    }

    #[test]
    fn test_resource_names_are_unique() {
        let mut names: Vec<String> = StandardFont::ALL.iter().map(|f| f.resource_name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 12);
        assert_eq!(StandardFont::Helvetica.resource_name(), "F1");
    }

    #[test]
    fn test_text_width() {
        // "Pen" in Helvetica: 667 + 556 + 556
        let width = StandardFont::Helvetica.text_width(b"Pen", 10.0);
        assert!((width - 17.79).abs() < 0.01);
        assert_eq!(StandardFont::Courier.text_width(b"abcd", 10.0), 24.0);
    }

    #[test]
    fn test_encode_win_ansi() {
        assert_eq!(encode_win_ansi("Rate (₹)"), b"Rate (Rs.)".to_vec());
        assert_eq!(encode_win_ansi("café"), vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(encode_win_ansi("a\tb"), b"a b".to_vec());
        assert_eq!(encode_win_ansi("日"), b"?".to_vec());
    }
}
