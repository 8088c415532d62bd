//! Typesets plain text into a paginated PDF document.
//!
//! Used to turn generated checklist text into a publishable artifact. Layout
//! is deliberately simple: a title line, then line-wrapped body text in a
//! built-in font, paginated A4.

use printpdf::{BuiltinFont, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, Point, Pt, TextItem};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 14.0;
const LINE_STEP_MM: f32 = 5.0;
const BODY_SIZE_PT: f32 = 10.0;
const TITLE_SIZE_PT: f32 = 13.0;
const WRAP_COLUMNS: usize = 96;

#[derive(Debug)]
pub enum TypesetError {
    EmptyInput,
}

impl std::fmt::Display for TypesetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypesetError::EmptyInput => write!(f, "nothing to typeset"),
        }
    }
}

impl std::error::Error for TypesetError {}

/// Render `body` under `title` into PDF bytes.
pub fn text_to_pdf(title: &str, body: &str) -> Result<Vec<u8>, TypesetError> {
    if body.trim().is_empty() {
        return Err(TypesetError::EmptyInput);
    }

    let mut lines: Vec<String> = Vec::new();
    for raw in body.lines() {
        let cleaned = sanitize(raw);
        if cleaned.trim().is_empty() {
            lines.push(String::new());
            continue;
        }
        lines.extend(wrap(&cleaned, WRAP_COLUMNS));
    }

    let mut doc = PdfDocument::new(title);
    let mut pages: Vec<PdfPage> = Vec::new();

    let top = PAGE_HEIGHT_MM - MARGIN_MM;
    let bottom = MARGIN_MM;
    let mut cursor = top;
    let mut ops: Vec<Op> = page_header(title, top);
    cursor -= 2.0 * LINE_STEP_MM;

    for line in &lines {
        if cursor < bottom {
            ops.push(Op::EndTextSection);
            pages.push(PdfPage::new(
                Mm(PAGE_WIDTH_MM),
                Mm(PAGE_HEIGHT_MM),
                std::mem::take(&mut ops),
            ));
            ops.push(Op::StartTextSection);
            cursor = top;
        }
        if !line.is_empty() {
            ops.push(Op::SetTextCursor {
                pos: Point::new(Mm(MARGIN_MM), Mm(cursor)),
            });
            ops.push(Op::SetFontSizeBuiltinFont {
                size: Pt(BODY_SIZE_PT),
                font: BuiltinFont::Helvetica,
            });
            ops.push(Op::WriteTextBuiltinFont {
                items: vec![TextItem::Text(line.clone())],
                font: BuiltinFont::Helvetica,
            });
        }
        cursor -= LINE_STEP_MM;
    }

    ops.push(Op::EndTextSection);
    pages.push(PdfPage::new(
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        ops,
    ));

    let mut warnings = Vec::new();
    let bytes = doc
        .with_pages(pages)
        .save(&PdfSaveOptions::default(), &mut warnings);
    Ok(bytes)
}

fn page_header(title: &str, top: f32) -> Vec<Op> {
    vec![
        Op::StartTextSection,
        Op::SetTextCursor {
            pos: Point::new(Mm(MARGIN_MM), Mm(top)),
        },
        Op::SetFontSizeBuiltinFont {
            size: Pt(TITLE_SIZE_PT),
            font: BuiltinFont::HelveticaBold,
        },
        Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(sanitize(title))],
            font: BuiltinFont::HelveticaBold,
        },
    ]
}

/// Built-in fonts only cover the Latin range; anything outside it is replaced
/// rather than silently mis-encoded.
fn sanitize(raw: &str) -> String {
    raw.chars()
        .map(|c| match c {
            '\t' => ' ',
            c if c.is_ascii() && !c.is_control() => c,
            c if c.is_control() => ' ',
            _ => '?',
        })
        .collect()
}

fn wrap(line: &str, columns: usize) -> Vec<String> {
    let mut wrapped = Vec::new();
    let mut current = String::new();
    for word in line.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.len() + 1 + word.len() <= columns {
            current.push(' ');
            current.push_str(word);
        } else {
            wrapped.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        wrapped.push(current);
    }
    wrapped
}
