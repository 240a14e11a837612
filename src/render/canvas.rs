//! A single-page drawing surface over `lopdf` content streams.
//!
//! Coordinates are PDF points with the origin at the bottom-left corner of a
//! US Letter page, the same convention the payslip and certificate layouts use.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

use super::metrics::string_width;
use crate::error::{EngineError, EngineResult};

/// Page width in points.
pub const PAGE_WIDTH: f32 = 612.0;

/// Page height in points.
pub const PAGE_HEIGHT: f32 = 792.0;

/// The two standard faces the layouts use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    /// Helvetica.
    Regular,
    /// Helvetica-Bold.
    Bold,
}

impl Font {
    fn resource_name(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

fn render_error(e: impl std::fmt::Display) -> EngineError {
    EngineError::PdfRender {
        message: e.to_string(),
    }
}

/// The WinAnsi code for characters that WinAnsi places in 0x80..=0x9F.
pub(super) fn win_ansi_extra(c: char) -> Option<u8> {
    let code = match c {
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => return None,
    };
    Some(code)
}

/// Encodes text for a WinAnsi font; characters WinAnsi lacks become `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match u32::from(c) {
            0x80..=0x9F => b'?',
            code => u8::try_from(code)
                .ok()
                .or_else(|| win_ansi_extra(c))
                .unwrap_or(b'?'),
        })
        .collect()
}

/// Accumulates drawing operations for one page.
///
/// # Example
///
/// ```
/// use planilla_engine::render::{Canvas, Font};
///
/// let mut canvas = Canvas::new();
/// canvas.set_font(Font::Bold, 12.0);
/// canvas.draw_string(50.0, 750.0, "BOLETA DE PAGO");
/// canvas.line(50.0, 740.0, 562.0, 740.0);
///
/// let bytes = canvas.finish("Boleta").unwrap();
/// assert!(bytes.starts_with(b"%PDF"));
/// ```
#[derive(Debug)]
pub struct Canvas {
    operations: Vec<Operation>,
    font: Font,
    size: f32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// Creates an empty page with Helvetica 10 selected.
    pub fn new() -> Self {
        Self {
            operations: Vec::new(),
            font: Font::Regular,
            size: 10.0,
        }
    }

    /// Selects the font used by subsequent text.
    pub fn set_font(&mut self, font: Font, size: f32) {
        self.font = font;
        self.size = size;
    }

    /// Width of `text` in the current font.
    pub fn text_width(&self, text: &str) -> f32 {
        string_width(text, self.font, self.size)
    }

    /// Draws text with its left edge at `x`.
    pub fn draw_string(&mut self, x: f32, y: f32, text: &str) {
        self.operations.extend([
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![
                    Object::Name(self.font.resource_name().as_bytes().to_vec()),
                    Object::Real(self.size),
                ],
            ),
            Operation::new("Td", vec![Object::Real(x), Object::Real(y)]),
            Operation::new("Tj", vec![Object::string_literal(win_ansi(text))]),
            Operation::new("ET", vec![]),
        ]);
    }

    /// Draws text with its right edge at `x`.
    pub fn draw_right_string(&mut self, x: f32, y: f32, text: &str) {
        let width = self.text_width(text);
        self.draw_string(x - width, y, text);
    }

    /// Draws text centred on `x`.
    pub fn draw_centred_string(&mut self, x: f32, y: f32, text: &str) {
        let width = self.text_width(text);
        self.draw_string(x - width / 2.0, y, text);
    }

    /// Strokes a straight line.
    pub fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.operations.extend([
            Operation::new("m", vec![Object::Real(x1), Object::Real(y1)]),
            Operation::new("l", vec![Object::Real(x2), Object::Real(y2)]),
            Operation::new("S", vec![]),
        ]);
    }

    /// Sets the stroke width for subsequent lines.
    pub fn set_line_width(&mut self, width: f32) {
        self.operations
            .push(Operation::new("w", vec![Object::Real(width)]));
    }

    /// Number of drawing operations recorded so far.
    pub fn operation_count(&self) -> usize {
        self.operations.len()
    }

    /// Writes the page into a complete PDF document.
    pub fn finish(self, title: &str) -> EngineResult<Vec<u8>> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let bold_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                Font::Regular.resource_name() => regular_id,
                Font::Bold.resource_name() => bold_id,
            },
        });

        let content = Content {
            operations: self.operations,
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().map_err(render_error)?,
        ));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), Object::Real(PAGE_WIDTH), Object::Real(PAGE_HEIGHT)],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(win_ansi(title)),
            "Producer" => Object::string_literal(concat!("planilla-engine ", env!("CARGO_PKG_VERSION"))),
        });
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);
        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).map_err(render_error)?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_ansi_keeps_latin1_and_replaces_the_rest() {
        assert_eq!(win_ansi("Año"), vec![b'A', 0xF1, b'o']);
        assert_eq!(win_ansi("N°"), vec![b'N', 0xB0]);
        assert_eq!(win_ansi("Ω"), vec![b'?']);
        // C1 controls have no glyph; their codes belong to the punctuation below
        assert_eq!(win_ansi("\u{92}"), vec![b'?']);
    }

    #[test]
    fn test_win_ansi_maps_typographic_punctuation() {
        assert_eq!(win_ansi("José’s"), vec![b'J', b'o', b's', 0xE9, 0x92, b's']);
        assert_eq!(win_ansi("“sí”"), vec![0x93, b's', 0xED, 0x94]);
        assert_eq!(win_ansi("€ 1—2…"), vec![0x80, b' ', b'1', 0x97, b'2', 0x85]);
        assert_eq!(win_ansi("‘–•™"), vec![0x91, 0x96, 0x95, 0x99]);
    }

    #[test]
    fn test_each_string_is_one_text_object() {
        let mut canvas = Canvas::new();
        canvas.draw_string(10.0, 10.0, "uno");
        canvas.draw_right_string(100.0, 10.0, "dos");
        assert_eq!(canvas.operation_count(), 10);
    }

    #[test]
    fn test_right_and_centred_strings_are_offset_by_width() {
        let mut canvas = Canvas::new();
        canvas.set_font(Font::Regular, 10.0);
        let width = canvas.text_width("ABC");

        canvas.draw_right_string(200.0, 50.0, "ABC");
        canvas.draw_centred_string(200.0, 50.0, "ABC");

        let x_of = |op: &Operation| match op.operands[0] {
            Object::Real(x) => x,
            _ => panic!("expected a real operand"),
        };
        assert!((x_of(&canvas.operations[2]) - (200.0 - width)).abs() < 0.001);
        assert!((x_of(&canvas.operations[7]) - (200.0 - width / 2.0)).abs() < 0.001);
    }

    #[test]
    fn test_finished_document_loads_back() {
        let mut canvas = Canvas::new();
        canvas.set_font(Font::Bold, 12.0);
        canvas.draw_centred_string(PAGE_WIDTH / 2.0, 700.0, "CERTIFICADO");
        canvas.set_line_width(0.5);
        canvas.line(50.0, 690.0, 562.0, 690.0);

        let bytes = canvas.finish("Prueba").unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }
}
