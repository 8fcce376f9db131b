// PDF Exporter: draws the preview layout onto a single A4 page with lopdf.
// Always uses print framing; the caller's draft and layout are never touched.
// Assembly is CPU-bound and must run inside tokio::task::spawn_blocking.

pub mod font_metrics;
pub mod handlers;
pub mod photo;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, Stream};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::ResumeDraft;
use crate::preview::{
    self, EducationBlock, Header, JobBlock, MainColumn, Preview, ProficiencyBar, Sidebar,
    CERTIFICATIONS_HEADING, CONTACT_HEADING, EDUCATION_HEADING, EXPERIENCE_HEADING,
    LANGUAGES_HEADING, PLACEHOLDER_HINT, PLACEHOLDER_TITLE, SKILLS_HEADING, SUMMARY_HEADING,
};

pub use font_metrics::PdfFont;
pub use photo::Photo;

/// A4 portrait in points.
pub const PAGE_WIDTH: f32 = 595.28;
pub const PAGE_HEIGHT: f32 = 841.89;

const SIDEBAR_WIDTH: f32 = 165.0;
const SIDEBAR_PADDING: f32 = 12.0;
const MAIN_LEFT: f32 = SIDEBAR_WIDTH + 12.0;
const MAIN_RIGHT_PADDING: f32 = 18.0;
const TOP_PADDING: f32 = 18.0;
const BOTTOM_MARGIN: f32 = 18.0;
const PHOTO_DIAMETER: f32 = 60.0;
const PHOTO_RING: f32 = 2.25;

/// Resource name of the profile photo XObject.
const PHOTO_RESOURCE: &str = "Im1";

const NAME_SIZE: f32 = 24.0;
const TITLE_SIZE: f32 = 12.0;
const HEADING_SIZE: f32 = 8.5;
const BODY_SIZE: f32 = 8.0;
const SMALL_SIZE: f32 = 7.0;
const LINE_SPACING: f32 = 1.45;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("PDF assembly failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("failed to write PDF: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct PdfExport {
    pub filename: String,
    pub bytes: Vec<u8>,
    /// Lines dropped because they fell below the bottom of the page.
    pub clipped_lines: usize,
}

/// Renders `draft` as a one-page A4 PDF.
pub fn export_pdf(draft: &ResumeDraft) -> Result<PdfExport, ExportError> {
    let mut canvas = Canvas::default();
    let photo = match preview::render(draft) {
        Preview::Placeholder => {
            draw_placeholder(&mut canvas);
            None
        }
        Preview::Resume(layout) => {
            let photo = layout.sidebar.photo.as_deref().and_then(decode_photo);
            draw_sidebar(&mut canvas, &layout.sidebar, photo.is_some());
            draw_main(&mut canvas, &layout.main);
            photo
        }
    };

    if canvas.clipped_lines > 0 {
        warn!(
            clipped_lines = canvas.clipped_lines,
            "Resume does not fit on one page, overflow clipped"
        );
    }

    let clipped_lines = canvas.clipped_lines;
    let bytes = assemble(canvas.ops, photo)?;
    Ok(PdfExport {
        filename: filename_for(&draft.name),
        bytes,
        clipped_lines,
    })
}

/// An unreadable photo is left out rather than failing the export.
fn decode_photo(url: &str) -> Option<Photo> {
    match Photo::from_data_url(url) {
        Ok(photo) => {
            debug!(has_alpha = photo.has_alpha(), "Embedding profile photo");
            Some(photo)
        }
        Err(e) => {
            warn!(error = %e, "Skipping unreadable profile photo");
            None
        }
    }
}

/// `<name>.pdf`, or `resume.pdf` for a blank name. Characters that would
/// break a quoted header parameter are replaced.
pub fn filename_for(name: &str) -> String {
    let name = name.trim();
    let stem: String = if name.is_empty() {
        "resume".to_string()
    } else {
        name.chars()
            .map(|c| match c {
                '"' | '\\' | '/' => '_',
                c if c.is_control() => '_',
                c => c,
            })
            .collect()
    };
    format!("{stem}.pdf")
}

fn assemble(ops: Vec<Operation>, photo: Option<Photo>) -> Result<Vec<u8>, ExportError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut fonts = lopdf::Dictionary::new();
    for font in PdfFont::ALL {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => font.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });
        fonts.set(font.resource_name(), font_id);
    }
    let mut resources = dictionary! { "Font" => fonts };
    if let Some(photo) = photo {
        let image_id = photo.add_to(&mut doc);
        let mut xobjects = Dictionary::new();
        xobjects.set(PHOTO_RESOURCE, image_id);
        resources.set("XObject", xobjects);
    }
    let resources_id = doc.add_object(resources);

    let content = Content { operations: ops };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), Object::Real(PAGE_WIDTH), Object::Real(PAGE_HEIGHT)],
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok(bytes)
}

// ────────────────────────────────────────────────────────────────────────────
// Drawing primitives
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
struct Rgb(f32, f32, f32);

const SIDEBAR_FILL: Rgb = Rgb(0.118, 0.161, 0.231);
const WHITE: Rgb = Rgb(1.0, 1.0, 1.0);
const SIDEBAR_MUTED: Rgb = Rgb(0.62, 0.66, 0.72);
const BAR_TRACK: Rgb = Rgb(0.2, 0.255, 0.333);
const ACCENT: Rgb = Rgb(0.231, 0.51, 0.965);
const TEXT_PRIMARY: Rgb = Rgb(0.067, 0.094, 0.153);
const TEXT_SECONDARY: Rgb = Rgb(0.294, 0.333, 0.388);
const TEXT_MUTED: Rgb = Rgb(0.612, 0.639, 0.686);
const SUBTITLE: Rgb = Rgb(0.42, 0.447, 0.502);
const DIVIDER: Rgb = Rgb(0.898, 0.906, 0.922);

#[derive(Default)]
struct Canvas {
    ops: Vec<Operation>,
    clipped_lines: usize,
}

impl Canvas {
    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb) {
        self.ops.push(Operation::new("q", vec![]));
        self.set_fill(color);
        self.ops.push(Operation::new(
            "re",
            vec![Object::Real(x), Object::Real(y), Object::Real(w), Object::Real(h)],
        ));
        self.ops.push(Operation::new("f", vec![]));
        self.ops.push(Operation::new("Q", vec![]));
    }

    fn text(&mut self, font: PdfFont, size: f32, x: f32, y: f32, color: Rgb, text: &str) {
        self.ops.push(Operation::new("BT", vec![]));
        self.ops.push(Operation::new(
            "Tf",
            vec![Object::Name(font.resource_name().as_bytes().to_vec()), Object::Real(size)],
        ));
        self.set_fill(color);
        self.ops.push(Operation::new("Td", vec![Object::Real(x), Object::Real(y)]));
        self.ops.push(Operation::new(
            "Tj",
            vec![Object::string_literal(win_ansi(text))],
        ));
        self.ops.push(Operation::new("ET", vec![]));
    }

    /// Draws the photo XObject clipped to a circle, with a ring around it.
    fn photo(&mut self, cx: f32, cy: f32, diameter: f32, ring: Rgb) {
        let r = diameter / 2.0;
        self.ops.push(Operation::new("q", vec![]));
        self.circle(cx, cy, r);
        self.ops.push(Operation::new("W", vec![]));
        self.ops.push(Operation::new("n", vec![]));
        self.ops.push(Operation::new(
            "cm",
            vec![
                Object::Real(diameter),
                0.into(),
                0.into(),
                Object::Real(diameter),
                Object::Real(cx - r),
                Object::Real(cy - r),
            ],
        ));
        self.ops.push(Operation::new(
            "Do",
            vec![Object::Name(PHOTO_RESOURCE.as_bytes().to_vec())],
        ));
        self.ops.push(Operation::new("Q", vec![]));

        let Rgb(red, green, blue) = ring;
        self.ops.push(Operation::new("q", vec![]));
        self.ops.push(Operation::new(
            "RG",
            vec![Object::Real(red), Object::Real(green), Object::Real(blue)],
        ));
        self.ops.push(Operation::new("w", vec![Object::Real(PHOTO_RING)]));
        self.circle(cx, cy, r);
        self.ops.push(Operation::new("S", vec![]));
        self.ops.push(Operation::new("Q", vec![]));
    }

    /// Appends a closed circle path built from four Bezier arcs.
    fn circle(&mut self, cx: f32, cy: f32, r: f32) {
        let k = r * 0.552_284_8;
        let mut curve = |points: [f32; 6]| {
            self.ops.push(Operation::new(
                "c",
                points.iter().map(|&v| Object::Real(v)).collect(),
            ));
        };
        curve([cx + r, cy + k, cx + k, cy + r, cx, cy + r]);
        curve([cx - k, cy + r, cx - r, cy + k, cx - r, cy]);
        curve([cx - r, cy - k, cx - k, cy - r, cx, cy - r]);
        curve([cx + k, cy - r, cx + r, cy - k, cx + r, cy]);
        self.ops.push(Operation::new("h", vec![]));
    }

    fn set_fill(&mut self, Rgb(r, g, b): Rgb) {
        self.ops.push(Operation::new(
            "rg",
            vec![Object::Real(r), Object::Real(g), Object::Real(b)],
        ));
    }
}

/// A run of text drawn with one font.
struct Span<'a> {
    font: PdfFont,
    size: f32,
    color: Rgb,
    text: &'a str,
}

/// A vertical flow of content between two x positions, filled top-down.
/// Once a line does not fit, everything after it is clipped as well.
struct Column {
    x: f32,
    width: f32,
    y: f32,
    bottom: f32,
    full: bool,
}

impl Column {
    fn new(x: f32, width: f32) -> Self {
        Column {
            x,
            width,
            y: PAGE_HEIGHT - TOP_PADDING,
            bottom: BOTTOM_MARGIN,
            full: false,
        }
    }

    /// Reserves a line of `height`; returns its baseline, or `None` when the
    /// column is out of room.
    fn next_line(&mut self, canvas: &mut Canvas, height: f32) -> Option<f32> {
        if self.full || self.y - height < self.bottom {
            self.full = true;
            canvas.clipped_lines += 1;
            return None;
        }
        self.y -= height;
        Some(self.y + height * 0.25)
    }

    fn gap(&mut self, height: f32) {
        self.y -= height;
    }

    fn paragraph(&mut self, canvas: &mut Canvas, span: Span<'_>, indent: f32) {
        let metrics = span.font.metrics();
        for source_line in span.text.lines() {
            for line in metrics.wrap(source_line, self.width - indent, span.size) {
                if let Some(baseline) = self.next_line(canvas, span.size * LINE_SPACING) {
                    canvas.text(span.font, span.size, self.x + indent, baseline, span.color, &line);
                }
            }
        }
    }

    /// One line with left-to-right spans and an optional right-aligned span.
    fn row(&mut self, canvas: &mut Canvas, left: &[Span<'_>], right: Option<Span<'_>>) {
        let height = left
            .iter()
            .chain(right.as_ref())
            .map(|s| s.size)
            .fold(0.0_f32, f32::max)
            * LINE_SPACING;
        let Some(baseline) = self.next_line(canvas, height) else {
            return;
        };

        let mut x = self.x;
        for span in left {
            canvas.text(span.font, span.size, x, baseline, span.color, span.text);
            x += span.font.width_pt(span.text, span.size);
        }
        if let Some(span) = right {
            let w = span.font.width_pt(span.text, span.size);
            canvas.text(span.font, span.size, self.x + self.width - w, baseline, span.color, span.text);
        }
    }

    fn heading(&mut self, canvas: &mut Canvas, title: &str, color: Rgb, rule: Rgb) {
        self.gap(4.0);
        let bold = Span {
            font: PdfFont::Bold,
            size: HEADING_SIZE,
            color,
            text: title,
        };
        if let Some(baseline) = self.next_line(canvas, HEADING_SIZE * LINE_SPACING) {
            canvas.text(bold.font, bold.size, self.x, baseline, bold.color, bold.text);
            canvas.fill_rect(self.x, baseline - 4.0, self.width, 0.75, rule);
            self.gap(6.0);
        }
    }
}

/// Encodes `text` for a WinAnsiEncoding font. Characters the encoding
/// cannot carry become `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\u{a0}'..='\u{ff}' => c as u32 as u8,
            '€' => 0x80,
            '‚' => 0x82,
            '„' => 0x84,
            '…' => 0x85,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '™' => 0x99,
            '\t' => b' ',
            _ => b'?',
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Resume layout
// ────────────────────────────────────────────────────────────────────────────

fn draw_placeholder(canvas: &mut Canvas) {
    let mut column = Column::new(MAIN_LEFT, PAGE_WIDTH - MAIN_LEFT - MAIN_RIGHT_PADDING);
    column.gap(PAGE_HEIGHT / 3.0);
    column.paragraph(
        canvas,
        Span {
            font: PdfFont::Bold,
            size: 14.0,
            color: TEXT_PRIMARY,
            text: PLACEHOLDER_TITLE,
        },
        0.0,
    );
    column.paragraph(
        canvas,
        Span {
            font: PdfFont::Regular,
            size: 10.0,
            color: TEXT_MUTED,
            text: PLACEHOLDER_HINT,
        },
        0.0,
    );
}

fn draw_sidebar(canvas: &mut Canvas, sidebar: &Sidebar, with_photo: bool) {
    canvas.fill_rect(0.0, 0.0, SIDEBAR_WIDTH, PAGE_HEIGHT, SIDEBAR_FILL);
    let mut column = Column::new(SIDEBAR_PADDING, SIDEBAR_WIDTH - 2.0 * SIDEBAR_PADDING);

    if with_photo {
        let cy = column.y - PHOTO_DIAMETER / 2.0;
        canvas.photo(SIDEBAR_WIDTH / 2.0, cy, PHOTO_DIAMETER, ACCENT);
        column.gap(PHOTO_DIAMETER + 10.0);
    }

    if !sidebar.contact.is_empty() {
        column.heading(canvas, CONTACT_HEADING, WHITE, ACCENT);
        for contact in &sidebar.contact {
            column.paragraph(canvas, sidebar_item(contact), 0.0);
            column.gap(2.0);
        }
    }
    if !sidebar.skills.is_empty() {
        column.heading(canvas, SKILLS_HEADING, WHITE, ACCENT);
        sidebar.skills.iter().for_each(|bar| draw_bar(canvas, &mut column, bar));
    }
    if !sidebar.languages.is_empty() {
        column.heading(canvas, LANGUAGES_HEADING, WHITE, ACCENT);
        sidebar.languages.iter().for_each(|bar| draw_bar(canvas, &mut column, bar));
    }
    if !sidebar.certifications.is_empty() {
        column.heading(canvas, CERTIFICATIONS_HEADING, WHITE, ACCENT);
        for cert in &sidebar.certifications {
            column.paragraph(canvas, sidebar_item(cert), 0.0);
            column.gap(2.0);
        }
    }
}

fn sidebar_item(text: &str) -> Span<'_> {
    Span {
        font: PdfFont::Regular,
        size: SMALL_SIZE,
        color: WHITE,
        text,
    }
}

fn draw_bar(canvas: &mut Canvas, column: &mut Column, bar: &ProficiencyBar) {
    column.row(
        canvas,
        &[Span {
            font: PdfFont::Regular,
            size: SMALL_SIZE,
            color: WHITE,
            text: &bar.label,
        }],
        Some(Span {
            font: PdfFont::Regular,
            size: SMALL_SIZE,
            color: SIDEBAR_MUTED,
            text: &bar.level,
        }),
    );
    if let Some(baseline) = column.next_line(canvas, 6.0) {
        let y = baseline + 1.5;
        canvas.fill_rect(column.x, y, column.width, 2.25, BAR_TRACK);
        let filled = column.width * f32::from(bar.percent) / 100.0;
        canvas.fill_rect(column.x, y, filled, 2.25, ACCENT);
    }
}

fn draw_main(canvas: &mut Canvas, main: &MainColumn) {
    let mut column = Column::new(MAIN_LEFT, PAGE_WIDTH - MAIN_LEFT - MAIN_RIGHT_PADDING);

    if let Some(header) = &main.header {
        draw_header(canvas, &mut column, header);
    }
    if let Some(summary) = &main.summary {
        column.heading(canvas, SUMMARY_HEADING, TEXT_PRIMARY, DIVIDER);
        column.paragraph(
            canvas,
            Span {
                font: PdfFont::Regular,
                size: BODY_SIZE,
                color: TEXT_SECONDARY,
                text: summary,
            },
            0.0,
        );
        column.gap(6.0);
    }
    if !main.experience.is_empty() {
        column.heading(canvas, EXPERIENCE_HEADING, TEXT_PRIMARY, DIVIDER);
        main.experience.iter().for_each(|job| draw_job(canvas, &mut column, job));
    }
    if !main.education.is_empty() {
        column.heading(canvas, EDUCATION_HEADING, TEXT_PRIMARY, DIVIDER);
        main.education.iter().for_each(|edu| draw_education(canvas, &mut column, edu));
    }
}

fn draw_header(canvas: &mut Canvas, column: &mut Column, header: &Header) {
    if !header.name.trim().is_empty() {
        column.paragraph(
            canvas,
            Span {
                font: PdfFont::Bold,
                size: NAME_SIZE,
                color: TEXT_PRIMARY,
                text: &header.name,
            },
            0.0,
        );
    }
    if let Some(title) = &header.title {
        column.gap(2.0);
        column.paragraph(
            canvas,
            Span {
                font: PdfFont::Regular,
                size: TITLE_SIZE,
                color: SUBTITLE,
                text: title,
            },
            0.0,
        );
    }
    column.gap(6.0);
    if let Some(baseline) = column.next_line(canvas, 8.0) {
        canvas.fill_rect(column.x, baseline, column.width, 0.75, DIVIDER);
    }
}

fn draw_job(canvas: &mut Canvas, column: &mut Column, job: &JobBlock) {
    let company = job.company.as_ref().map(|c| format!(" - {c}"));
    let mut left = vec![Span {
        font: PdfFont::Bold,
        size: BODY_SIZE,
        color: TEXT_PRIMARY,
        text: &job.job_title,
    }];
    if let Some(company) = &company {
        left.push(Span {
            font: PdfFont::Bold,
            size: BODY_SIZE - 0.5,
            color: ACCENT,
            text: company,
        });
    }
    let right = job.duration.as_deref().map(|text| Span {
        font: PdfFont::Regular,
        size: SMALL_SIZE,
        color: TEXT_MUTED,
        text,
    });
    column.row(canvas, &left, right);

    if let Some(responsibilities) = &job.responsibilities {
        let text = responsibilities.to_plain_text();
        column.paragraph(
            canvas,
            Span {
                font: PdfFont::Regular,
                size: SMALL_SIZE + 0.25,
                color: TEXT_SECONDARY,
                text: &text,
            },
            9.0,
        );
    }
    column.gap(6.0);
}

fn draw_education(canvas: &mut Canvas, column: &mut Column, edu: &EducationBlock) {
    let degree = edu.degree.as_ref().map(|d| format!(" - {d}"));
    let mut left = vec![Span {
        font: PdfFont::Bold,
        size: BODY_SIZE,
        color: TEXT_PRIMARY,
        text: &edu.institution,
    }];
    if let Some(degree) = &degree {
        left.push(Span {
            font: PdfFont::Regular,
            size: SMALL_SIZE,
            color: TEXT_SECONDARY,
            text: degree,
        });
    }
    let right = edu.year.as_deref().map(|text| Span {
        font: PdfFont::Regular,
        size: SMALL_SIZE,
        color: TEXT_MUTED,
        text,
    });
    column.row(canvas, &left, right);

    if let Some(details) = &edu.details {
        column.paragraph(
            canvas,
            Span {
                font: PdfFont::Oblique,
                size: SMALL_SIZE - 0.25,
                color: TEXT_MUTED,
                text: details,
            },
            0.0,
        );
    }
    column.gap(5.0);
}
