#![deny(clippy::unwrap_used, clippy::expect_used)]

/// Width of an A4 page in points.
pub const PAGE_WIDTH: f64 = 595.28;
/// Height of an A4 page in points.
pub const PAGE_HEIGHT: f64 = 841.89;
/// Horizontal position in points where every line begins.
pub const LEFT_MARGIN: f64 = 56.0;
/// Vertical position in points of the baseline of the first line.
pub const TOP_MARGIN: f64 = 780.0;
/// The leading, which is the distance in points between two consecutive baselines.
pub const LINE_HEIGHT: f64 = 16.0;
/// Size in points of the text.
pub const FONT_SIZE: f64 = 12.0;
/// The monospaced standard font used for the whole document, which is never embedded.
pub const BASE_FONT: &str = "Courier";
/// The key under which the font is named in the resources of the page.
pub const FONT_RESOURCE_NAME: &str = "F1";
/// The version of the PDF specification declared in the header.
pub const PDF_VERSION: &str = "1.4";

/// The capacity of a page as the page height divided by the leading. This ignores the top margin,
/// see `visible_lines_per_page` for the number of lines which actually land on the page.
pub fn lines_per_page() -> usize {
    (PAGE_HEIGHT / LINE_HEIGHT).floor() as usize
}

/// The number of baselines between the top margin and the lower edge of the page. The following
/// lines are drawn outside of it because the document never breaks into a second page.
pub fn visible_lines_per_page() -> usize {
    (TOP_MARGIN / LINE_HEIGHT).floor() as usize + 1
}

/// Escapes the characters which have a special meaning inside a PDF literal string, which are
/// the parentheses and the backslash, by preceding each of them with a backslash.
pub fn escape_pdf_string(text: &str) -> String {
    let mut escaped_text = String::with_capacity(text.len());
    for character in text.chars() {
        if matches!(character, '(' | ')' | '\\') {
            escaped_text.push('\\');
        }
        escaped_text.push(character);
    }

    escaped_text
}

/// Builds the content stream which draws the given lines one below the other, starting
/// from the top-left corner of the page.
///
/// The stream begins a text object, selects the font and the leading, moves the text
/// matrix to the margins and then, for each line, shows it and moves to the next line.
pub fn content_stream(lines: &[String]) -> Vec<u8> {
    let mut stream = String::new();
    // Begin the text object and set the font, the leading and the starting position
    stream.push_str("BT\n");
    stream.push_str(&format!("/{} {:.2} Tf\n", FONT_RESOURCE_NAME, FONT_SIZE));
    stream.push_str(&format!("{:.2} TL\n", LINE_HEIGHT));
    stream.push_str(&format!("1 0 0 1 {:.2} {:.2} Tm\n", LEFT_MARGIN, TOP_MARGIN));
    for line in lines {
        // Show the line and then move down by the leading
        stream.push_str(&format!("({}) Tj\nT*\n", escape_pdf_string(line)));
    }
    stream.push_str("ET\n");

    stream.into_bytes()
}

/// The objects of a single-page document. The position of a variant in `PdfObject::ALL`
/// determines its object number, so the objects reference each other through the
/// variants and never through hand-written numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfObject {
    /// The root of the document, pointing at the page tree.
    Catalog,
    /// The page tree, containing the only page.
    Pages,
    /// The page itself, with its size, contents and resources.
    Page,
    /// The content stream drawing the text of the page.
    Contents,
    /// The standard Type1 font used by the content stream.
    Font,
}

impl PdfObject {
    /// All the objects in the order in which they are numbered and serialized.
    pub const ALL: [PdfObject; 5] = [
        PdfObject::Catalog,
        PdfObject::Pages,
        PdfObject::Page,
        PdfObject::Contents,
        PdfObject::Font,
    ];

    /// The object number, starting from 1 because the object 0 is the head of the free list.
    pub fn number(self) -> usize {
        self as usize + 1
    }

    /// An indirect reference to this object, such as `2 0 R`.
    fn reference(self) -> String {
        format!("{} 0 R", self.number())
    }

    /// The serialized body of the object, which is what goes between `obj` and `endobj`.
    fn body(self, content: &[u8]) -> Vec<u8> {
        match self {
            PdfObject::Catalog => format!(
                "<< /Type /Catalog /Pages {} >>\n",
                PdfObject::Pages.reference()
            )
            .into_bytes(),
            PdfObject::Pages => format!(
                "<< /Type /Pages /Kids [{}] /Count 1 >>\n",
                PdfObject::Page.reference()
            )
            .into_bytes(),
            PdfObject::Page => format!(
                "<< /Type /Page /Parent {} /MediaBox [0 0 {:.2} {:.2}] /Contents {} /Resources << /Font << /{} {} >> >> >>\n",
                PdfObject::Pages.reference(),
                PAGE_WIDTH,
                PAGE_HEIGHT,
                PdfObject::Contents.reference(),
                FONT_RESOURCE_NAME,
                PdfObject::Font.reference(),
            )
            .into_bytes(),
            PdfObject::Contents => {
                let mut stream_object =
                    format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
                stream_object.extend_from_slice(content);
                // The end-of-line marker before `endstream` is not counted in the length
                if !content.ends_with(b"\n") {
                    stream_object.push(b'\n');
                }
                stream_object.extend_from_slice(b"endstream\n");
                stream_object
            }
            PdfObject::Font => format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{} >>\n",
                BASE_FONT
            )
            .into_bytes(),
        }
    }
}

/// The cross-reference table, recording where each object begins inside the file.
#[derive(Debug, Clone, Default)]
struct CrossReferenceTable {
    /// The byte offset of each object, indexed by object number minus one.
    object_offsets: Vec<usize>,
}

impl CrossReferenceTable {
    fn record(&mut self, object: PdfObject, offset: usize) {
        debug_assert_eq!(object.number(), self.object_offsets.len() + 1);
        self.object_offsets.push(offset);
    }

    /// The number of entries, counting the head of the free list.
    fn size(&self) -> usize {
        self.object_offsets.len() + 1
    }

    /// Writes the `xref` section, where every entry is exactly 20 bytes long.
    fn write_to(&self, pdf_bytes: &mut Vec<u8>) {
        pdf_bytes.extend_from_slice(b"xref\n");
        pdf_bytes.extend_from_slice(format!("0 {}\n", self.size()).as_bytes());
        pdf_bytes.extend_from_slice(b"0000000000 65535 f \n");
        for offset in self.object_offsets.iter() {
            pdf_bytes.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
        }
    }
}

/// Assembles a complete single-page A4 document around the given content stream.
///
/// The objects are written one after the other and the offset of each is recorded right
/// before its header is written, so the cross-reference table points at the first digit of
/// every `N 0 obj` line. The result is the whole file, ready to be written to disk.
pub fn assemble_single_page_pdf(content: &[u8]) -> Vec<u8> {
    let mut pdf_bytes = format!("%PDF-{}\n", PDF_VERSION).into_bytes();

    let mut cross_reference_table = CrossReferenceTable::default();
    for object in PdfObject::ALL {
        cross_reference_table.record(object, pdf_bytes.len());
        pdf_bytes.extend_from_slice(format!("{} 0 obj\n", object.number()).as_bytes());
        pdf_bytes.extend_from_slice(&object.body(content));
        pdf_bytes.extend_from_slice(b"endobj\n");
    }
    debug_assert!(cross_reference_table
        .object_offsets
        .iter()
        .zip(PdfObject::ALL)
        .all(|(offset, object)| pdf_bytes[*offset..]
            .starts_with(format!("{} 0 obj", object.number()).as_bytes())));

    let cross_reference_offset = pdf_bytes.len();
    cross_reference_table.write_to(&mut pdf_bytes);

    pdf_bytes.extend_from_slice(b"trailer\n");
    pdf_bytes.extend_from_slice(
        format!(
            "<< /Size {} /Root {} >>\n",
            cross_reference_table.size(),
            PdfObject::Catalog.reference()
        )
        .as_bytes(),
    );
    pdf_bytes.extend_from_slice(b"startxref\n");
    pdf_bytes.extend_from_slice(format!("{}\n", cross_reference_offset).as_bytes());
    pdf_bytes.extend_from_slice(b"%%EOF\n");

    pdf_bytes
}
