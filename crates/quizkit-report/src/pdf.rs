//! Minimal PDF 1.4 writer for paginated text.
//!
//! The document is modelled as an object graph with a fixed numbering
//! scheme: catalog `1`, page tree `2`, then for page `i` (zero-based) the
//! page object `3 + 2i` and its content stream `4 + 2i`, and the shared font
//! last at `3 + 2n`. Serialization renders every object once, computes byte
//! offsets, and only then writes the body and cross-reference table, so the
//! offsets in the xref always point at the `N 0 obj` token of their object.

use std::fmt::Write as _;

/// Baseline of the first line on a page.
pub const TOP_Y: i32 = 780;
/// Vertical distance between consecutive lines.
pub const LINE_HEIGHT: i32 = 18;
/// A new page is opened before placing a line below this baseline.
pub const BOTTOM_MARGIN: i32 = 60;
const LEFT_X: i32 = 50;
const FONT_SIZE: i32 = 12;
const MEDIA_BOX: &str = "[0 0 612 792]";

/// A line of escaped text at a fixed baseline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedLine {
    pub text: String,
    pub y: i32,
}

/// The lines of one page, top to bottom.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub lines: Vec<PlacedLine>,
}

impl Page {
    fn content_stream(&self) -> String {
        self.lines
            .iter()
            .map(|line| {
                format!(
                    "BT /F1 {FONT_SIZE} Tf {LEFT_X} {} Td ({}) Tj ET",
                    line.y, line.text
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Escape one line for use inside a PDF literal string.
///
/// Backslash and parentheses are backslash-escaped, line breaks collapse to
/// a single space and other control characters become spaces. Characters
/// with a WinAnsi code point above 0x7F are written as octal escapes; the
/// rest of non-ASCII becomes `?`.
pub fn escape_pdf_text(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' | '(' | ')' => {
                out.push('\\');
                out.push(ch);
            }
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push(' ');
            }
            c if c.is_control() => out.push(' '),
            c if c.is_ascii() => out.push(c),
            c => match win_ansi_code(c) {
                Some(code) => {
                    let _ = write!(out, "\\{code:03o}");
                }
                None => out.push('?'),
            },
        }
    }
    out
}

/// WinAnsiEncoding byte for a non-ASCII character, if it has one.
fn win_ansi_code(c: char) -> Option<u8> {
    let code = match c {
        '\u{00A0}'..='\u{00FF}' => return u8::try_from(u32::from(c)).ok(),
        '€' => 0x80,
        '‚' => 0x82,
        '„' => 0x84,
        '…' => 0x85,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '™' => 0x99,
        _ => return None,
    };
    Some(code)
}

/// Escape `lines` and lay them out top to bottom across as many pages as
/// needed. Always returns at least one page.
pub fn paginate(lines: &[String]) -> Vec<Page> {
    let mut pages = Vec::new();
    let mut current = Page::default();
    let mut y = TOP_Y;

    for line in lines {
        if y < BOTTOM_MARGIN {
            pages.push(std::mem::take(&mut current));
            y = TOP_Y;
        }
        current.lines.push(PlacedLine {
            text: escape_pdf_text(line),
            y,
        });
        y -= LINE_HEIGHT;
    }

    if !current.lines.is_empty() {
        pages.push(current);
    }
    if pages.is_empty() {
        pages.push(Page {
            lines: vec![PlacedLine {
                text: " ".to_string(),
                y: TOP_Y,
            }],
        });
    }
    pages
}

/// Number of lines that fit on one page.
pub fn lines_per_page() -> usize {
    let mut count = 0;
    let mut y = TOP_Y;
    while y >= BOTTOM_MARGIN {
        count += 1;
        y -= LINE_HEIGHT;
    }
    count
}

/// One indirect object of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfObject {
    Catalog { pages: u32 },
    PageTree { kids: Vec<u32> },
    Page { contents: u32, font: u32 },
    Content { commands: String },
    Font,
}

impl PdfObject {
    /// The object's dictionary (and stream, for content objects).
    pub fn body(&self) -> String {
        match self {
            PdfObject::Catalog { pages } => format!("<< /Type /Catalog /Pages {pages} 0 R >>"),
            PdfObject::PageTree { kids } => {
                let refs = kids
                    .iter()
                    .map(|kid| format!("{kid} 0 R"))
                    .collect::<Vec<_>>()
                    .join(" ");
                format!("<< /Type /Pages /Count {} /Kids [{refs}] >>", kids.len())
            }
            PdfObject::Page { contents, font } => format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox {MEDIA_BOX} /Contents {contents} 0 R \
                 /Resources << /Font << /F1 {font} 0 R >> >> >>"
            ),
            PdfObject::Content { commands } => format!(
                "<< /Length {} >>\nstream\n{commands}\nendstream",
                commands.len()
            ),
            PdfObject::Font => {
                "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
                    .to_string()
            }
        }
    }
}

/// All objects of a document, stored so that `objects[i]` is object `i + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentGraph {
    objects: Vec<PdfObject>,
}

impl DocumentGraph {
    /// Number the objects for `pages` using the fixed scheme.
    pub fn from_pages(pages: &[Page]) -> Self {
        let page_number = |idx: usize| 3 + 2 * idx as u32;
        let font = page_number(pages.len());

        let mut objects = Vec::with_capacity(3 + 2 * pages.len());
        objects.push(PdfObject::Catalog { pages: 2 });
        objects.push(PdfObject::PageTree {
            kids: (0..pages.len()).map(page_number).collect(),
        });
        for (idx, page) in pages.iter().enumerate() {
            objects.push(PdfObject::Page {
                contents: page_number(idx) + 1,
                font,
            });
            objects.push(PdfObject::Content {
                commands: page.content_stream(),
            });
        }
        objects.push(PdfObject::Font);
        Self { objects }
    }

    pub fn objects(&self) -> &[PdfObject] {
        &self.objects
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn page_count(&self) -> usize {
        self.objects
            .iter()
            .filter(|o| matches!(o, PdfObject::Page { .. }))
            .count()
    }

    /// Write the document: header, objects in ascending order, xref, trailer.
    pub fn serialize(&self) -> Vec<u8> {
        const HEADER: &str = "%PDF-1.4\n";

        // Pass one: frame every object and record where it will start.
        let framed: Vec<String> = self
            .objects
            .iter()
            .enumerate()
            .map(|(idx, object)| format!("{} 0 obj\n{}\nendobj\n", idx + 1, object.body()))
            .collect();
        let mut offsets = Vec::with_capacity(framed.len());
        let mut cursor = HEADER.len();
        for chunk in &framed {
            offsets.push(cursor);
            cursor += chunk.len();
        }
        let xref_offset = cursor;

        // Pass two: emit.
        let size = self.objects.len() + 1;
        let mut out = String::with_capacity(xref_offset + 20 * size + 64);
        out.push_str(HEADER);
        for chunk in &framed {
            out.push_str(chunk);
        }
        let _ = write!(out, "xref\n0 {size}\n0000000000 65535 f \n");
        for offset in &offsets {
            let _ = writeln!(out, "{offset:010} 00000 n ");
        }
        let _ = write!(
            out,
            "trailer << /Size {size} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n"
        );
        out.into_bytes()
    }
}

/// Paginate `lines` and serialize them as a complete PDF document.
pub fn synthesize(lines: &[String]) -> Vec<u8> {
    let pages = paginate(lines);
    let graph = DocumentGraph::from_pages(&pages);
    tracing::debug!(
        pages = graph.page_count(),
        objects = graph.object_count(),
        "synthesized pdf"
    );
    graph.serialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("line {i}")).collect()
    }

    #[test]
    fn escapes_string_delimiters() {
        assert_eq!(escape_pdf_text(r"a\b (c)"), r"a\\b \(c\)");
    }

    #[test]
    fn collapses_line_breaks() {
        assert_eq!(escape_pdf_text("one\r\ntwo\nthree\rfour"), "one two three four");
        assert_eq!(escape_pdf_text("tab\there"), "tab here");
    }

    #[test]
    fn non_ascii_uses_win_ansi() {
        assert_eq!(escape_pdf_text("café"), "caf\\351");
        assert_eq!(escape_pdf_text("a • b"), "a \\225 b");
        assert_eq!(escape_pdf_text("→"), "?");
    }

    #[test]
    fn page_holds_forty_one_lines() {
        assert_eq!(lines_per_page(), 41);
        let pages = paginate(&lines(41));
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].lines.last().map(|l| l.y), Some(60));

        let pages = paginate(&lines(42));
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].lines[0].y, TOP_Y);
        assert_eq!(pages[1].lines[0].text, "line 41");
    }

    #[test]
    fn zero_lines_still_produce_a_page() {
        let pages = paginate(&[]);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].lines.len(), 1);
        assert_eq!(pages[0].lines[0].text, " ");
    }

    #[test]
    fn object_numbering_is_stable() {
        let pages = paginate(&lines(90));
        let graph = DocumentGraph::from_pages(&pages);
        assert_eq!(graph.page_count(), 3);
        assert_eq!(graph.object_count(), 9);
        assert_eq!(
            graph.objects()[1],
            PdfObject::PageTree {
                kids: vec![3, 5, 7]
            }
        );
        assert_eq!(
            graph.objects()[6],
            PdfObject::Page {
                contents: 8,
                font: 9
            }
        );
        assert_eq!(graph.objects()[8], PdfObject::Font);
    }

    #[test]
    fn content_length_matches_stream() {
        let pages = paginate(&["Hello (world)".to_string()]);
        let graph = DocumentGraph::from_pages(&pages);
        let body = graph.objects()[3].body();
        let commands = "BT /F1 12 Tf 50 780 Td (Hello \\(world\\)) Tj ET";
        assert_eq!(
            body,
            format!("<< /Length {} >>\nstream\n{commands}\nendstream", commands.len())
        );
    }

    #[test]
    fn output_is_deterministic() {
        assert_eq!(synthesize(&lines(50)), synthesize(&lines(50)));
    }
}
