//! Report Export
//!
//! Lays a session out as a paginated A4 report. The output is a list of
//! positioned elements per page; turning that into PDF bytes (or plain text)
//! is the job of a [`DocumentSink`](crate::capabilities::DocumentSink).
//!
//! # Layout
//!
//! All positions are millimetres from the top-left corner. Text advances by
//! `size × 0.4` mm per line. A text block moves to a new page when
//! `y + size × 1.5` would cross the bottom margin; the suggestions heading and
//! each code block additionally require 20 mm of room. Glyph widths are
//! approximated from the font size, so wrapping is deterministic for a given
//! input.
//!
//! # Sections
//!
//! ```text
//! BugAI Code Analysis Report      (title, centred)
//! Date / Language
//! Analysis Summary
//! Bugs Found                      (table, or "No bugs were found.")
//! Suggestions                     (bullets, or "No suggestions were provided.")
//! Corrected Code                  (omitted when blank)
//! Original Analyzed Code          (omitted when blank)
//! ```

use std::fmt::Write as _;

use chrono::{NaiveDate, Utc};

use crate::model::{display_timestamp, AnalysisSession};
use crate::render::NO_EXPLANATION_TEXT;

/// Page width in mm (A4)
pub const PAGE_WIDTH: f64 = 210.0;
/// Page height in mm (A4)
pub const PAGE_HEIGHT: f64 = 297.0;
/// Margin on every side in mm
pub const MARGIN: f64 = 20.0;
/// Title font size in pt
pub const TITLE_SIZE: f64 = 18.0;
/// Section heading font size in pt
pub const HEADING_SIZE: f64 = 14.0;
/// Body font size in pt
pub const BODY_SIZE: f64 = 10.0;
/// Code font size in pt
pub const CODE_SIZE: f64 = 8.0;
/// Line advance per pt of font size, in mm
pub const LINE_ADVANCE: f64 = 0.4;
/// Page-break look-ahead per pt of font size
pub const BREAK_FACTOR: f64 = 1.5;
/// Room required before the suggestions heading and each code block
pub const SECTION_RESERVE: f64 = 20.0;
/// Padding added to a code block's height
pub const CODE_BLOCK_PADDING: f64 = 10.0;
/// Code text inset from the block's left edge
pub const CODE_TEXT_INSET: f64 = 5.0;
/// Code text offset from the block's top edge
pub const CODE_TEXT_OFFSET: f64 = 8.0;
/// Table cell padding
pub const CELL_PADDING: f64 = 2.0;
/// Report title
pub const REPORT_TITLE: &str = "BugAI Code Analysis Report";

const PT_TO_MM: f64 = 0.3528;
const PROPORTIONAL_EM: f64 = 0.5;
const MONOSPACE_EM: f64 = 0.6;
const TAB_WIDTH: usize = 4;

/// Usable width between the margins
#[must_use]
pub fn content_width() -> f64 {
    PAGE_WIDTH - MARGIN * 2.0
}

/// Typeface weight/slant
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontStyle {
    /// Regular
    Normal,
    /// Headings
    Bold,
    /// Empty-section notices
    Italic,
}

/// Horizontal anchoring of a text element
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    /// `x` is the left edge
    Left,
    /// `x` is the centre
    Center,
}

/// One row of the findings table
#[derive(Clone, Debug, PartialEq)]
pub struct TableRow {
    /// Top edge
    pub y: f64,
    /// Row height including padding
    pub height: f64,
    /// Wrapped lines per cell
    pub cells: Vec<Vec<String>>,
}

/// A positioned drawing instruction
#[derive(Clone, Debug, PartialEq)]
pub enum Element {
    /// Wrapped text
    Text {
        /// Anchor x
        x: f64,
        /// Baseline of the first line
        y: f64,
        /// Font size in pt
        size: f64,
        /// Font style
        style: FontStyle,
        /// Anchoring
        align: Align,
        /// Already-wrapped lines
        lines: Vec<String>,
    },
    /// A grid table (one page's share of it)
    Table {
        /// Left edge
        x: f64,
        /// Column widths in mm
        column_widths: Vec<f64>,
        /// Header row, repeated on every page the table spans
        header: TableRow,
        /// Body rows on this page
        rows: Vec<TableRow>,
    },
    /// Shaded monospace block
    CodeBlock {
        /// Left edge of the shading
        x: f64,
        /// Top edge of the shading
        y: f64,
        /// Shading width
        width: f64,
        /// Shading height
        height: f64,
        /// Where the first code line starts
        text_origin: (f64, f64),
        /// Already-wrapped code lines
        lines: Vec<String>,
    },
}

/// One page of the report
#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    /// 1-based page number
    pub number: usize,
    /// Elements in drawing order
    pub elements: Vec<Element>,
}

/// A laid-out report
#[derive(Clone, Debug, PartialEq)]
pub struct ReportDocument {
    /// File name without extension (`BugAI_Report_YYYY-MM-DD`)
    pub file_stem: String,
    /// Pages in order
    pub pages: Vec<Page>,
}

impl ReportDocument {
    /// File name with the `.pdf` extension
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.pdf", self.file_stem)
    }

    /// File name for the plain-text rendition (`.txt`)
    #[must_use]
    pub fn text_file_name(&self) -> String {
        format!("{}.txt", self.file_stem)
    }

    /// Text of every section heading, in order
    #[must_use]
    pub fn headings(&self) -> Vec<String> {
        self.pages
            .iter()
            .flat_map(|page| &page.elements)
            .filter_map(|element| match element {
                Element::Text {
                    size,
                    style: FontStyle::Bold,
                    lines,
                    ..
                } if (*size - HEADING_SIZE).abs() < f64::EPSILON => Some(lines.join(" ")),
                _ => None,
            })
            .collect()
    }

    /// Whether any text, cell or code line contains `needle`
    #[must_use]
    pub fn contains_text(&self, needle: &str) -> bool {
        self.to_plain_text().contains(needle)
    }

    /// Plain-text rendition, page by page
    #[must_use]
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        for page in &self.pages {
            let _ = writeln!(out, "=== Page {} ===", page.number);
            for element in &page.elements {
                render_element(&mut out, element);
            }
        }
        out
    }
}

fn render_element(out: &mut String, element: &Element) {
    match element {
        Element::Text { lines, .. } => {
            for line in lines {
                let _ = writeln!(out, "{line}");
            }
        }
        Element::Table { header, rows, .. } => {
            for row in std::iter::once(header).chain(rows) {
                let cells: Vec<String> = row.cells.iter().map(|cell| cell.join(" ")).collect();
                let _ = writeln!(out, "| {} |", cells.join(" | "));
            }
        }
        Element::CodeBlock { lines, .. } => {
            for line in lines {
                let _ = writeln!(out, "    {line}");
            }
        }
    }
}

/// Lays out sessions as reports dated `generated_on`
#[derive(Clone, Copy, Debug)]
pub struct ReportExporter {
    generated_on: NaiveDate,
}

impl ReportExporter {
    /// Exporter stamping files with `generated_on`
    #[must_use]
    pub fn new(generated_on: NaiveDate) -> Self {
        Self { generated_on }
    }

    /// Exporter stamping files with today's UTC date
    #[must_use]
    pub fn today() -> Self {
        Self::new(Utc::now().date_naive())
    }

    /// Lay out `session`
    #[must_use]
    pub fn export(&self, session: &AnalysisSession) -> ReportDocument {
        let mut layout = Layout::new();

        layout.add_text(REPORT_TITLE, TITLE_SIZE, FontStyle::Bold, 15.0, Align::Center);
        layout.add_text(
            &format!("Date: {}", display_timestamp(&session.timestamp)),
            BODY_SIZE,
            FontStyle::Normal,
            5.0,
            Align::Left,
        );
        layout.add_text(
            &format!("Language: {}", session.language),
            BODY_SIZE,
            FontStyle::Normal,
            10.0,
            Align::Left,
        );

        layout.add_text("Analysis Summary", HEADING_SIZE, FontStyle::Bold, 8.0, Align::Left);
        let summary = session
            .explanation
            .as_deref()
            .filter(|text| !text.is_empty())
            .unwrap_or(NO_EXPLANATION_TEXT);
        layout.add_text(summary, BODY_SIZE, FontStyle::Normal, 15.0, Align::Left);

        layout.add_text("Bugs Found", HEADING_SIZE, FontStyle::Bold, 8.0, Align::Left);
        if session.bugs.is_empty() {
            layout.add_text("No bugs were found.", BODY_SIZE, FontStyle::Italic, 15.0, Align::Left);
        } else {
            let rows: Vec<[String; 3]> = session
                .bugs
                .iter()
                .map(|bug| {
                    [
                        bug.line
                            .map_or_else(|| "N/A".to_string(), |line| line.to_string()),
                        bug.severity.to_string(),
                        bug.description_or_default().to_string(),
                    ]
                })
                .collect();
            layout.add_table(&rows);
        }

        layout.reserve(SECTION_RESERVE);
        layout.add_text("Suggestions", HEADING_SIZE, FontStyle::Bold, 8.0, Align::Left);
        if session.suggestions.is_empty() {
            layout.add_text(
                "No suggestions were provided.",
                BODY_SIZE,
                FontStyle::Italic,
                15.0,
                Align::Left,
            );
        } else {
            for suggestion in &session.suggestions {
                layout.add_text(
                    &format!("\u{2022} {suggestion}"),
                    BODY_SIZE,
                    FontStyle::Normal,
                    5.0,
                    Align::Left,
                );
            }
            layout.y += 10.0;
        }

        if let Some(code) = session.corrected_code_text() {
            layout.add_code_block("Corrected Code", code);
        }
        if !session.code.trim().is_empty() {
            layout.add_code_block("Original Analyzed Code", &session.code);
        }

        let document = ReportDocument {
            file_stem: format!("BugAI_Report_{}", self.generated_on.format("%Y-%m-%d")),
            pages: layout.finish(),
        };
        tracing::debug!(
            file = %document.file_name(),
            pages = document.pages.len(),
            "Report laid out"
        );
        document
    }
}

/// Running cursor over a growing list of pages
struct Layout {
    pages: Vec<Page>,
    y: f64,
}

impl Layout {
    fn new() -> Self {
        Self {
            pages: vec![Page {
                number: 1,
                elements: Vec::new(),
            }],
            y: MARGIN,
        }
    }

    fn bottom() -> f64 {
        PAGE_HEIGHT - MARGIN
    }

    fn new_page(&mut self) {
        let number = self.pages.len() + 1;
        self.pages.push(Page {
            number,
            elements: Vec::new(),
        });
        self.y = MARGIN;
    }

    fn push(&mut self, element: Element) {
        if let Some(page) = self.pages.last_mut() {
            page.elements.push(element);
        }
    }

    /// Break unless `height` mm fit below the cursor
    fn reserve(&mut self, height: f64) {
        if self.y + height > Self::bottom() {
            self.new_page();
        }
    }

    fn add_text(&mut self, text: &str, size: f64, style: FontStyle, space_after: f64, align: Align) {
        self.reserve(size * BREAK_FACTOR);

        let lines = wrap_prose(text, content_width(), size);
        let x = match align {
            Align::Left => MARGIN,
            Align::Center => PAGE_WIDTH / 2.0,
        };
        let advance = lines_height(lines.len(), size) + space_after;

        self.push(Element::Text {
            x,
            y: self.y,
            size,
            style,
            align,
            lines,
        });
        self.y += advance;
    }

    fn add_table(&mut self, rows: &[[String; 3]]) {
        let description_width = content_width() - 30.0;
        let narrow = (content_width() - description_width) / 2.0;
        let column_widths = vec![narrow, narrow, description_width];

        let make_row = |cells: &[String], y: f64| {
            let cells: Vec<Vec<String>> = cells
                .iter()
                .zip(&column_widths)
                .map(|(text, width)| wrap_prose(text, width - CELL_PADDING * 2.0, BODY_SIZE))
                .collect();
            let tallest = cells.iter().map(Vec::len).max().unwrap_or(1);
            TableRow {
                y,
                height: lines_height(tallest, BODY_SIZE) + CELL_PADDING * 2.0,
                cells,
            }
        };

        let header_cells = ["Line".to_string(), "Severity".to_string(), "Description".to_string()];
        let mut header = make_row(&header_cells[..], self.y);
        self.reserve(header.height);
        header.y = self.y;
        self.y += header.height;

        let mut page_rows = Vec::new();
        for cells in rows {
            let mut row = make_row(&cells[..], self.y);
            if self.y + row.height > Self::bottom() {
                // A header with no rows under it moves along with the row
                if !page_rows.is_empty() {
                    self.push(Element::Table {
                        x: MARGIN,
                        column_widths: column_widths.clone(),
                        header: header.clone(),
                        rows: std::mem::take(&mut page_rows),
                    });
                }
                self.new_page();
                header.y = self.y;
                self.y += header.height;
            }
            row.y = self.y;
            self.y += row.height;
            page_rows.push(row);
        }

        self.push(Element::Table {
            x: MARGIN,
            column_widths,
            header,
            rows: page_rows,
        });
        self.y += 10.0;
    }

    fn add_code_block(&mut self, title: &str, code: &str) {
        self.reserve(SECTION_RESERVE);
        self.add_text(title, HEADING_SIZE, FontStyle::Bold, 8.0, Align::Left);

        let width = content_width();
        let mut lines = wrap_code(code, width - 10.0, CODE_SIZE);
        if self.y + lines_height(lines.len(), CODE_SIZE) + CODE_BLOCK_PADDING > Self::bottom() {
            self.new_page();
        }

        // Blocks taller than a page continue on the next one
        while !lines.is_empty() {
            let room = Self::bottom() - self.y - CODE_BLOCK_PADDING;
            let fit = lines_fitting(room, CODE_SIZE).clamp(1, lines.len());
            let rest = lines.split_off(fit);
            let height = lines_height(lines.len(), CODE_SIZE) + CODE_BLOCK_PADDING;

            self.push(Element::CodeBlock {
                x: MARGIN,
                y: self.y,
                width,
                height,
                text_origin: (MARGIN + CODE_TEXT_INSET, self.y + CODE_TEXT_OFFSET),
                lines,
            });
            self.y += height + 10.0;

            lines = rest;
            if !lines.is_empty() {
                self.new_page();
            }
        }
    }

    fn finish(self) -> Vec<Page> {
        self.pages
    }
}

#[allow(clippy::cast_precision_loss)]
fn lines_height(count: usize, size: f64) -> f64 {
    count as f64 * size * LINE_ADVANCE
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn lines_fitting(room: f64, size: f64) -> usize {
    if room <= 0.0 {
        return 0;
    }
    (room / (size * LINE_ADVANCE)).floor() as usize
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn chars_per_line(width: f64, size: f64, em: f64) -> usize {
    ((width / (size * PT_TO_MM * em)).floor() as usize).max(1)
}

fn wrap_prose(text: &str, width: f64, size: f64) -> Vec<String> {
    let columns = chars_per_line(width, size, PROPORTIONAL_EM);
    textwrap::wrap(text, columns)
        .into_iter()
        .map(|line| line.into_owned())
        .collect()
}

/// Hard-wrap code at a fixed column, keeping indentation
fn wrap_code(code: &str, width: f64, size: f64) -> Vec<String> {
    let columns = chars_per_line(width, size, MONOSPACE_EM);
    let mut wrapped = Vec::new();

    for line in code.lines() {
        let expanded = line.replace('\t', &" ".repeat(TAB_WIDTH));
        let chars: Vec<char> = expanded.trim_end().chars().collect();
        if chars.is_empty() {
            wrapped.push(String::new());
            continue;
        }
        for chunk in chars.chunks(columns) {
            wrapped.push(chunk.iter().collect());
        }
    }
    wrapped
}
