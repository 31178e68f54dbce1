//! Single page PDF invoices drawn directly with `lopdf`.
//!
//! Coordinates are PDF points on a US Letter page with the origin in the
//! bottom left corner. Text uses the standard Helvetica faces so nothing has
//! to be embedded besides an optional JPEG logo.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream, StringFormat};

use crate::billing::DATE_FORMAT;
use crate::error::AssetError;
use crate::layout::{Letterhead, Section, BANK_ACCOUNT};

const PAGE_WIDTH: i64 = 612;
const PAGE_HEIGHT: i64 = 792;
const MARGIN: i64 = 72;
const LOGO_SIZE: i64 = 100;
const SPACER: i64 = 12;

const BODY_SIZE: i64 = 10;
const HEADING_SIZE: i64 = 12;
const TITLE_SIZE: i64 = 18;

const COLUMN_WIDTH: i64 = 200;
const ROW_HEIGHT: i64 = 18;
const HEADER_HEIGHT: i64 = 24;

const LOGO_NAME: &str = "Im1";

#[derive(Debug, Clone, Copy, PartialEq)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    fn name(self) -> Object {
        match self {
            Font::Regular => Object::Name(b"F1".to_vec()),
            Font::Bold => Object::Name(b"F2".to_vec()),
        }
    }

    // Rough average glyph width of Helvetica in thousandths of an em
    fn approx_width(self, text: &str, size: i64) -> i64 {
        let em = match self {
            Font::Regular => 530,
            Font::Bold => 580,
        };
        text.chars().count() as i64 * size * em / 1000
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Color {
    Black,
    White,
    Grey,
    DarkGreen,
    Beige,
}

impl Color {
    fn rgb(self) -> Vec<Object> {
        let (r, g, b) = match self {
            Color::Black => (0.0, 0.0, 0.0),
            Color::White => (1.0, 1.0, 1.0),
            Color::Grey => (0.5, 0.5, 0.5),
            Color::DarkGreen => (0.0, 0.392, 0.0),
            Color::Beige => (0.961, 0.961, 0.863),
        };
        vec![Object::Real(r), Object::Real(g), Object::Real(b)]
    }
}

/// How the invoice sections are laid out on the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Style {
    /// Section headings followed by "Label: value" lines.
    Paragraphs,
    /// A two column grid whose first row is drawn as a header.
    Table,
}

/// A JPEG logo, embedded as-is with the DCT filter.
#[derive(Debug, Clone, PartialEq)]
pub struct Logo {
    width: u16,
    height: u16,
    components: u8,
    data: Vec<u8>,
}

impl Logo {
    pub fn load(path: &Path) -> Result<Self, AssetError> {
        Self::from_jpeg(fs::read(path)?)
    }

    /// Read the dimensions from the first SOF segment of a baseline,
    /// extended or progressive JPEG.
    pub fn from_jpeg(data: Vec<u8>) -> Result<Self, AssetError> {
        if !data.starts_with(&[0xFF, 0xD8]) {
            return Err(AssetError::NotJpeg);
        }

        let mut pos = 2;
        while pos + 4 <= data.len() {
            if data[pos] != 0xFF {
                return Err(AssetError::NotJpeg);
            }
            let marker = data[pos + 1];
            if marker == 0xFF {
                pos += 1;
                continue;
            }
            let length = u16::from_be_bytes([data[pos + 2], data[pos + 3]]);
            let segment = pos + 4;
            match marker {
                0xC0..=0xC2 => {
                    if length < 8 || segment + 6 > data.len() {
                        return Err(AssetError::Truncated);
                    }
                    let height =
                        u16::from_be_bytes([data[segment + 1], data[segment + 2]]);
                    let width =
                        u16::from_be_bytes([data[segment + 3], data[segment + 4]]);
                    let components = data[segment + 5];
                    if !matches!(components, 1 | 3 | 4) {
                        return Err(AssetError::Components(components));
                    }
                    return Ok(Self {
                        width,
                        height,
                        components,
                        data,
                    });
                }
                // scan data or end of image before any frame header
                0xDA | 0xD9 => break,
                _ => pos += 2 + length as usize,
            }
        }
        Err(AssetError::Truncated)
    }

    pub fn dimensions(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    fn to_stream(&self) -> Stream {
        let color_space = match self.components {
            1 => "DeviceGray",
            4 => "DeviceCMYK",
            _ => "DeviceRGB",
        };
        Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => Object::Integer(self.width.into()),
                "Height" => Object::Integer(self.height.into()),
                "ColorSpace" => color_space,
                "BitsPerComponent" => Object::Integer(8),
                "Filter" => "DCTDecode",
            },
            self.data.clone(),
        )
    }
}

/// Everything printed on a PDF invoice.
pub struct PdfInvoice<'a> {
    pub title: &'a str,
    pub issued: NaiveDate,
    pub letterhead: &'a Letterhead,
    pub sections: Vec<Section>,
    pub style: Style,
    pub logo: Option<Logo>,
}

impl PdfInvoice<'_> {
    pub fn to_bytes(&self) -> Result<Vec<u8>, lopdf::Error> {
        let mut doc = Document::with_version("1.7");

        let pages_id = doc.new_object_id();
        let regular_id = doc.add_object(type1_font("Helvetica"));
        let bold_id = doc.add_object(type1_font("Helvetica-Bold"));

        let mut xobjects = Dictionary::new();
        if let Some(logo) = &self.logo {
            let logo_id = doc.add_object(logo.to_stream());
            xobjects.set(LOGO_NAME, Object::Reference(logo_id));
        }

        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => Object::Reference(regular_id),
                "F2" => Object::Reference(bold_id),
            },
            "XObject" => xobjects,
        });

        let content = Content {
            operations: self.draw(),
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(PAGE_WIDTH),
                Object::Integer(PAGE_HEIGHT),
            ],
            "Contents" => Object::Reference(content_id),
            "Resources" => Object::Reference(resources_id),
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => Object::Integer(1),
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        let info_id = doc.add_object(dictionary! {
            "Title" => Object::string_literal(self.title),
            "Producer" => Object::string_literal(concat!(
                env!("CARGO_PKG_NAME"),
                " ",
                env!("CARGO_PKG_VERSION")
            )),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));
        doc.trailer.set("Info", Object::Reference(info_id));

        let mut output = Vec::new();
        doc.save_to(&mut output)?;
        Ok(output)
    }

    fn draw(&self) -> Vec<Operation> {
        let mut page = Page::new();

        if self.logo.is_some() {
            page.y -= LOGO_SIZE;
            page.image(MARGIN, page.y, LOGO_SIZE);
            page.y -= SPACER;
        }

        for (i, line) in self.letterhead.lines().iter().enumerate() {
            let font = if i == 0 { Font::Bold } else { Font::Regular };
            page.line(font, BODY_SIZE, Color::Grey, line);
        }
        page.y -= SPACER;

        page.y -= TITLE_SIZE + 6;
        page.centered(Font::Bold, TITLE_SIZE, Color::Black, self.title);
        page.line(
            Font::Regular,
            BODY_SIZE,
            Color::Black,
            &format!("Date: {}", self.issued.format(DATE_FORMAT)),
        );
        page.y -= SPACER;

        match self.style {
            Style::Paragraphs => page.paragraphs(&self.sections),
            Style::Table => page.table(&self.sections),
        }
        page.y -= SPACER;

        page.line(Font::Bold, BODY_SIZE, Color::Grey, "Payment Instructions:");
        for line in BANK_ACCOUNT.instructions() {
            page.line(Font::Regular, BODY_SIZE, Color::Grey, &line);
        }
        page.y -= SPACER;
        page.line(
            Font::Regular,
            BODY_SIZE,
            Color::Grey,
            &format!(
                "Contact: For any questions, feel free to reach out at {}.",
                self.letterhead.email
            ),
        );

        page.operations
    }
}

fn type1_font(base: &str) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base,
        "Encoding" => "WinAnsiEncoding",
    }
}

/// Encode text for a simple font with WinAnsi encoding. Latin-1 maps onto
/// the same code points, anything else is replaced.
fn pdf_text(text: &str) -> Object {
    let bytes = text
        .chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect();
    Object::String(bytes, StringFormat::Literal)
}

fn rect(x: i64, y: i64, width: i64, height: i64) -> Vec<Object> {
    vec![
        Object::Integer(x),
        Object::Integer(y),
        Object::Integer(width),
        Object::Integer(height),
    ]
}

/// Drawing cursor moving down the page.
struct Page {
    operations: Vec<Operation>,
    y: i64,
}

impl Page {
    fn new() -> Self {
        Self {
            operations: Vec::new(),
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn op(&mut self, operator: &str, operands: Vec<Object>) {
        self.operations.push(Operation::new(operator, operands));
    }

    fn text(&mut self, font: Font, size: i64, color: Color, x: i64, y: i64, text: &str) {
        self.op("BT", vec![]);
        self.op("rg", color.rgb());
        self.op("Tf", vec![font.name(), Object::Integer(size)]);
        self.op("Td", vec![Object::Integer(x), Object::Integer(y)]);
        self.op("Tj", vec![pdf_text(text)]);
        self.op("ET", vec![]);
    }

    fn line(&mut self, font: Font, size: i64, color: Color, text: &str) {
        self.y -= size + 4;
        self.text(font, size, color, MARGIN, self.y, text);
    }

    fn centered(&mut self, font: Font, size: i64, color: Color, text: &str) {
        let x = (PAGE_WIDTH - font.approx_width(text, size)) / 2;
        self.text(font, size, color, x.max(MARGIN), self.y, text);
    }

    fn fill(&mut self, color: Color, x: i64, y: i64, width: i64, height: i64) {
        self.op("q", vec![]);
        self.op("rg", color.rgb());
        self.op("re", rect(x, y, width, height));
        self.op("f", vec![]);
        self.op("Q", vec![]);
    }

    fn stroke(&mut self, x: i64, y: i64, width: i64, height: i64) {
        self.op("q", vec![]);
        self.op("RG", Color::Black.rgb());
        self.op("w", vec![Object::Integer(1)]);
        self.op("re", rect(x, y, width, height));
        self.op("S", vec![]);
        self.op("Q", vec![]);
    }

    fn image(&mut self, x: i64, y: i64, size: i64) {
        self.op("q", vec![]);
        self.op(
            "cm",
            vec![
                Object::Integer(size),
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(size),
                Object::Integer(x),
                Object::Integer(y),
            ],
        );
        self.op("Do", vec![Object::Name(LOGO_NAME.as_bytes().to_vec())]);
        self.op("Q", vec![]);
    }

    fn paragraphs(&mut self, sections: &[Section]) {
        for section in sections {
            self.line(Font::Bold, HEADING_SIZE, Color::Black, section.title);
            for field in section.fields.iter() {
                let label = format!("{}: ", field.label);
                self.line(Font::Bold, BODY_SIZE, Color::Black, &label);
                let x = MARGIN + Font::Bold.approx_width(&label, BODY_SIZE);
                self.text(Font::Regular, BODY_SIZE, Color::Black, x, self.y, &field.value);
            }
            self.y -= SPACER / 2;
        }
    }

    fn table(&mut self, sections: &[Section]) {
        let left = (PAGE_WIDTH - 2 * COLUMN_WIDTH) / 2;
        let rows = sections.iter().flat_map(|s| s.fields.iter());

        for (i, field) in rows.enumerate() {
            let header = i == 0;
            let (height, background, color, font) = if header {
                (HEADER_HEIGHT, Color::DarkGreen, Color::White, Font::Bold)
            } else {
                (ROW_HEIGHT, Color::Beige, Color::Black, Font::Regular)
            };
            self.y -= height;
            self.fill(background, left, self.y, 2 * COLUMN_WIDTH, height);

            let baseline = if header { self.y + 12 } else { self.y + 5 };
            for (column, text) in [&field.label, &field.value].into_iter().enumerate() {
                let x = left + column as i64 * COLUMN_WIDTH;
                self.stroke(x, self.y, COLUMN_WIDTH, height);
                let width = font.approx_width(text, BODY_SIZE);
                let inset = ((COLUMN_WIDTH - width) / 2).max(4);
                self.text(font, BODY_SIZE, color, x + inset, baseline, text);
            }
        }
    }
}
