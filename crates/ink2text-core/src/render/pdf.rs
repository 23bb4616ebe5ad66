//! Paginated PDF export using lopdf.
//!
//! Layout is done in millimetres on an A4 portrait page and converted to
//! points when operations are emitted. Every page, including pages created by
//! overflow, receives the page header band, title and page-number footer.

use chrono::NaiveDate;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use tracing::{debug, info};

use super::fonts::{StandardFont, encode_win_ansi};
use crate::error::Result;
use crate::models::config::ExportConfig;
use crate::models::extraction::ExtractionResult;
use crate::models::formatting::{FormattingPreferences, Rgb};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN_LEFT: f32 = 15.0;
const MARGIN_RIGHT: f32 = 15.0;
const MARGIN_TOP: f32 = 32.0;
const MARGIN_BOTTOM: f32 = 14.0;
const BLOCK_GAP: f32 = 5.0;

const BODY_FONT_SIZE: f32 = 10.0;
const LINE_HEIGHT_FACTOR: f32 = 1.15;
const TEXT_PADDING: f32 = 1.76;
const CELL_PADDING: f32 = 2.5;
const RATE_COLUMN_WIDTH: f32 = 40.0;
const GRID_LINE_WIDTH: f32 = 0.1;

const ACCENT: Rgb = Rgb::new(236, 72, 153);
const BODY_TEXT: Rgb = Rgb::new(40, 40, 40);
const DATE_TEXT: Rgb = Rgb::new(100, 100, 100);
const FOOTER_TEXT: Rgb = Rgb::new(150, 150, 150);
const HEAD_FILL: Rgb = Rgb::new(30, 41, 59);
const HEAD_TEXT: Rgb = Rgb::WHITE;
const GRID_LINE: Rgb = Rgb::new(200, 200, 200);

/// Column headings of the item table.
pub const TABLE_HEAD: [&str; 2] = ["Item Name", "Rate (₹)"];

fn mm(value: f32) -> f32 {
    value * 72.0 / 25.4
}

fn pt_to_mm(value: f32) -> f32 {
    value * 25.4 / 72.0
}

fn line_height(size: f32) -> f32 {
    pt_to_mm(size * LINE_HEIGHT_FACTOR)
}

/// Renders an [`ExtractionResult`] to PDF bytes.
pub struct PdfExporter<'a> {
    export: &'a ExportConfig,
    preferences: FormattingPreferences,
    date: NaiveDate,
}

impl<'a> PdfExporter<'a> {
    /// Exporter dated today.
    pub fn new(export: &'a ExportConfig, preferences: FormattingPreferences) -> Self {
        Self {
            export,
            preferences,
            date: chrono::Local::now().date_naive(),
        }
    }

    /// Override the date printed in the page header.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    /// Render the document. Returns `Ok(None)` when there is nothing to export.
    pub fn export(&self, result: &ExtractionResult) -> Result<Option<Vec<u8>>> {
        if !result.has_content() {
            debug!("Nothing to export");
            return Ok(None);
        }

        let mut layout = Layout::new(self);

        if !result.header_text.is_empty() {
            layout.text_block(&result.header_text);
        }
        if !result.items.is_empty() {
            layout.table(result);
        }
        if !result.footer_text.is_empty() {
            layout.text_block(&result.footer_text);
        }

        let pages = layout.finish();
        info!("Exporting {} page(s)", pages.len());
        self.write_document(pages).map(Some)
    }

    fn body_font(&self) -> StandardFont {
        StandardFont::select(self.preferences.font_family, self.preferences.bold, self.preferences.italic)
    }

    fn head_font(&self) -> StandardFont {
        StandardFont::select(self.preferences.font_family, true, false)
    }

    fn write_document(&self, pages: Vec<Vec<Operation>>) -> Result<Vec<u8>> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut fonts = lopdf::Dictionary::new();
        for font in StandardFont::ALL {
            let font_id = doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => font.base_font(),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(font.resource_name(), font_id);
        }
        let resources_id = doc.add_object(dictionary! {
            "Font" => fonts,
        });

        let mut page_ids = Vec::with_capacity(pages.len());
        for operations in pages {
            let content = Content { operations };
            let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            page_ids.push(page_id);
        }

        let count = i64::try_from(page_ids.len()).unwrap_or(i64::MAX);
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => page_ids.iter().map(|id| (*id).into()).collect::<Vec<Object>>(),
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), Object::Real(mm(PAGE_WIDTH)), Object::Real(mm(PAGE_HEIGHT))],
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(encode_win_ansi(&self.export.title)),
            "Producer" => Object::string_literal("ink2text"),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);
        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)?;
        Ok(bytes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
}

/// Page-by-page operation builder with a vertical cursor.
struct Layout<'e, 'a> {
    exporter: &'e PdfExporter<'a>,
    pages: Vec<Vec<Operation>>,
    y: f32,
}

impl<'e, 'a> Layout<'e, 'a> {
    fn new(exporter: &'e PdfExporter<'a>) -> Self {
        let mut layout = Self {
            exporter,
            pages: Vec::new(),
            y: MARGIN_TOP,
        };
        layout.new_page();
        layout
    }

    fn finish(self) -> Vec<Vec<Operation>> {
        self.pages
    }

    fn content_width() -> f32 {
        PAGE_WIDTH - MARGIN_LEFT - MARGIN_RIGHT
    }

    fn bottom() -> f32 {
        PAGE_HEIGHT - MARGIN_BOTTOM
    }

    fn ops(&mut self) -> &mut Vec<Operation> {
        if self.pages.is_empty() {
            self.pages.push(Vec::new());
        }
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    /// Start a page and draw its header band, title and footer.
    fn new_page(&mut self) {
        self.pages.push(Vec::new());
        let number = self.pages.len();
        let export = self.exporter.export;
        let date = self.exporter.date.format("%B %-d, %Y").to_string();
        debug!("Starting page {}", number);

        self.text(&export.shop_name, MARGIN_LEFT, 15.0, StandardFont::HelveticaBold, 11.0, ACCENT, Align::Left);
        self.text(
            &date,
            PAGE_WIDTH - MARGIN_RIGHT,
            15.0,
            StandardFont::Helvetica,
            11.0,
            DATE_TEXT,
            Align::Right,
        );
        self.text(&export.title, MARGIN_LEFT, 25.0, StandardFont::HelveticaBold, 18.0, BODY_TEXT, Align::Left);
        self.text(
            &format!("Page {number}"),
            MARGIN_LEFT,
            PAGE_HEIGHT - 10.0,
            StandardFont::Helvetica,
            9.0,
            FOOTER_TEXT,
            Align::Left,
        );

        self.y = MARGIN_TOP;
    }

    /// Draw one line of text with its baseline at `baseline` (mm from top).
    #[allow(clippy::too_many_arguments)]
    fn text(&mut self, text: &str, x: f32, baseline: f32, font: StandardFont, size: f32, color: Rgb, align: Align) {
        let encoded = encode_win_ansi(text);
        self.encoded_text(encoded, x, baseline, font, size, color, align);
    }

    #[allow(clippy::too_many_arguments)]
    fn encoded_text(
        &mut self,
        encoded: Vec<u8>,
        x: f32,
        baseline: f32,
        font: StandardFont,
        size: f32,
        color: Rgb,
        align: Align,
    ) {
        let x_pt = match align {
            Align::Left => mm(x),
            Align::Right => mm(x) - font.text_width(&encoded, size),
        };
        let y_pt = mm(PAGE_HEIGHT - baseline);
        let [r, g, b] = color.to_unit();

        self.ops().extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![font.resource_name().into(), Object::Real(size)]),
            Operation::new("rg", vec![Object::Real(r), Object::Real(g), Object::Real(b)]),
            Operation::new("Td", vec![Object::Real(x_pt), Object::Real(y_pt)]),
            Operation::new("Tj", vec![Object::string_literal(encoded)]),
            Operation::new("ET", vec![]),
        ]);
    }

    fn rect(&mut self, x: f32, top: f32, width: f32, height: f32, fill: Option<Rgb>, stroke: Option<Rgb>) {
        let rect = Operation::new(
            "re",
            vec![
                Object::Real(mm(x)),
                Object::Real(mm(PAGE_HEIGHT - top - height)),
                Object::Real(mm(width)),
                Object::Real(mm(height)),
            ],
        );
        let ops = self.ops();
        if let Some(color) = fill {
            let [r, g, b] = color.to_unit();
            ops.push(Operation::new("rg", vec![Object::Real(r), Object::Real(g), Object::Real(b)]));
            ops.push(rect.clone());
            ops.push(Operation::new("f", vec![]));
        }
        if let Some(color) = stroke {
            let [r, g, b] = color.to_unit();
            ops.push(Operation::new("w", vec![Object::Real(mm(GRID_LINE_WIDTH))]));
            ops.push(Operation::new("RG", vec![Object::Real(r), Object::Real(g), Object::Real(b)]));
            ops.push(rect);
            ops.push(Operation::new("S", vec![]));
        }
    }

    /// Plain paragraph; embedded newlines start new lines, long lines wrap.
    fn text_block(&mut self, text: &str) {
        let font = self.exporter.body_font();
        let size = BODY_FONT_SIZE;
        let line_h = line_height(size);
        let width = Self::content_width() - 2.0 * TEXT_PADDING;

        let lines: Vec<Vec<u8>> = text
            .split('\n')
            .flat_map(|line| wrap(&encode_win_ansi(line), font, size, width))
            .collect();

        self.y += TEXT_PADDING;
        for line in lines {
            if self.y + line_h > Self::bottom() {
                self.new_page();
                self.y += TEXT_PADDING;
            }
            let baseline = self.y + line_h * 0.8;
            self.encoded_text(line, MARGIN_LEFT + TEXT_PADDING, baseline, font, size, BODY_TEXT, Align::Left);
            self.y += line_h;
        }
        self.y += TEXT_PADDING + BLOCK_GAP;
    }

    /// Item/rate grid with a filled header row repeated on every page.
    fn table(&mut self, result: &ExtractionResult) {
        let body_font = self.exporter.body_font();
        let size = BODY_FONT_SIZE;
        let line_h = line_height(size);
        let name_width = Self::content_width() - RATE_COLUMN_WIDTH;

        self.table_head();

        for item in &result.items {
            let name_lines = wrap(&encode_win_ansi(&item.item), body_font, size, name_width - 2.0 * CELL_PADDING);
            let rate_lines = wrap(
                &encode_win_ansi(&item.rate),
                body_font,
                size,
                RATE_COLUMN_WIDTH - 2.0 * CELL_PADDING,
            );
            let total = name_lines.len().max(rate_lines.len());

            let full_height = total as f32 * line_h + 2.0 * CELL_PADDING;
            let fresh_page_room = Self::bottom() - MARGIN_TOP - self.head_height();

            let mut start = 0;
            while start < total {
                let room = Self::bottom() - self.y - 2.0 * CELL_PADDING;
                let fits = (room / line_h).floor().max(0.0) as usize;
                let row_fits_here = self.y + full_height <= Self::bottom();
                let row_fits_fresh = full_height <= fresh_page_room;

                if fits == 0 || (start == 0 && !row_fits_here && row_fits_fresh) {
                    self.new_page();
                    self.table_head();
                    continue;
                }

                let take = fits.min(total - start);
                let chunk = start..start + take;
                let height = take as f32 * line_h + 2.0 * CELL_PADDING;

                self.rect(MARGIN_LEFT, self.y, name_width, height, None, Some(GRID_LINE));
                self.rect(MARGIN_LEFT + name_width, self.y, RATE_COLUMN_WIDTH, height, None, Some(GRID_LINE));

                for (row, index) in chunk.enumerate() {
                    let baseline = self.y + CELL_PADDING + row as f32 * line_h + line_h * 0.8;
                    if let Some(line) = name_lines.get(index) {
                        self.encoded_text(
                            line.clone(),
                            MARGIN_LEFT + CELL_PADDING,
                            baseline,
                            body_font,
                            size,
                            BODY_TEXT,
                            Align::Left,
                        );
                    }
                    if let Some(line) = rate_lines.get(index) {
                        self.encoded_text(
                            line.clone(),
                            PAGE_WIDTH - MARGIN_RIGHT - CELL_PADDING,
                            baseline,
                            body_font,
                            size,
                            BODY_TEXT,
                            Align::Right,
                        );
                    }
                }

                self.y += height;
                start += take;
                if start < total {
                    self.new_page();
                    self.table_head();
                }
            }
        }

        self.y += BLOCK_GAP;
    }

    fn head_height(&self) -> f32 {
        line_height(BODY_FONT_SIZE) + 2.0 * CELL_PADDING
    }

    fn table_head(&mut self) {
        let font = self.exporter.head_font();
        let height = self.head_height();
        if self.y + height > Self::bottom() {
            self.new_page();
        }

        let name_width = Self::content_width() - RATE_COLUMN_WIDTH;
        let baseline = self.y + CELL_PADDING + line_height(BODY_FONT_SIZE) * 0.8;

        self.rect(MARGIN_LEFT, self.y, name_width, height, Some(HEAD_FILL), Some(GRID_LINE));
        self.rect(
            MARGIN_LEFT + name_width,
            self.y,
            RATE_COLUMN_WIDTH,
            height,
            Some(HEAD_FILL),
            Some(GRID_LINE),
        );
        self.text(TABLE_HEAD[0], MARGIN_LEFT + CELL_PADDING, baseline, font, BODY_FONT_SIZE, HEAD_TEXT, Align::Left);
        self.text(
            TABLE_HEAD[1],
            PAGE_WIDTH - MARGIN_RIGHT - CELL_PADDING,
            baseline,
            font,
            BODY_FONT_SIZE,
            HEAD_TEXT,
            Align::Right,
        );

        self.y += height;
    }
}

/// Greedy word wrap of encoded text to `width` millimetres.
///
/// Words wider than a full line are broken between characters. An empty input
/// yields one empty line so that blank lines keep their height.
fn wrap(text: &[u8], font: StandardFont, size: f32, width: f32) -> Vec<Vec<u8>> {
    let fits = |line: &[u8]| pt_to_mm(font.text_width(line, size)) <= width;
    let mut lines = Vec::new();
    let mut current: Vec<u8> = Vec::new();

    for word in text.split(|b| *b == b' ') {
        let mut candidate = current.clone();
        if !candidate.is_empty() {
            candidate.push(b' ');
        }
        candidate.extend_from_slice(word);

        if fits(&candidate) {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        for byte in word {
            current.push(*byte);
            if !fits(&current) && current.len() > 1 {
                current.pop();
                lines.push(std::mem::take(&mut current));
                current.push(*byte);
            }
        }
    }

    lines.push(current);
    lines
}
