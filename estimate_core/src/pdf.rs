//! # PDF Generation Module
//!
//! Renders an [`EstimateReport`] to a one-document PDF using Typst.
//!
//! ## Architecture
//!
//! - The Typst template is embedded as a string constant
//! - Report data is injected by placeholder replacement before compilation
//! - Fonts come from `typst-assets`, so rendering needs no files on disk
//! - Output is raw PDF bytes (`Vec<u8>`)
//!
//! ## Example
//!
//! ```rust,no_run
//! use estimate_core::pdf::render_estimate_pdf;
//! # fn demo(report: estimate_core::file_io::EstimateReport) {
//! let pdf_bytes = render_estimate_pdf(&report).unwrap();
//! std::fs::write("estimate.pdf", pdf_bytes).unwrap();
//! # }
//! ```

use chrono::Utc;
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::calculations::pricing::Family;
use crate::errors::{EstimateError, EstimateResult};
use crate::file_io::EstimateReport;

// ============================================================================
// Typst World Implementation
// ============================================================================

/// A minimal Typst world compiling one in-memory document.
struct PdfWorld {
    main: Source,
    book: LazyHash<FontBook>,
    fonts: Vec<Font>,
    library: LazyHash<Library>,
}

impl PdfWorld {
    fn new(source: String) -> Self {
        let fonts = Self::load_fonts();
        let book = FontBook::from_fonts(&fonts);

        PdfWorld {
            main: Source::detached(source),
            book: LazyHash::new(book),
            fonts,
            library: LazyHash::new(Library::default()),
        }
    }

    fn load_fonts() -> Vec<Font> {
        typst_assets::fonts()
            .flat_map(|font_bytes| Font::iter(Bytes::new(font_bytes.to_vec())))
            .collect()
    }
}

impl World for PdfWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.fonts.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let now = Utc::now();
        Datetime::from_ymd(
            now.format("%Y").to_string().parse().ok()?,
            now.format("%m").to_string().parse().ok()?,
            now.format("%d").to_string().parse().ok()?,
        )
    }
}

// ============================================================================
// Template
// ============================================================================

const ESTIMATE_TEMPLATE: &str = r##"
#set page(
  paper: "a4",
  margin: (top: 2cm, bottom: 2cm, left: 2cm, right: 2cm),
  header: align(right)[
    #text(size: 9pt, fill: gray)[Ravel - indicative façade renovation estimate]
  ],
  footer: context [
    #line(length: 100%, stroke: 0.5pt + gray)
    #v(4pt)
    #grid(
      columns: (1fr, 1fr, 1fr),
      align(left)[#text(size: 9pt)[Rates {{RATES_VERSION}}]],
      align(center)[#text(size: 9pt)[Page #counter(page).display()]],
      align(right)[#text(size: 9pt)[{{DATE}}]],
    )
  ]
)

#set text(font: "Libertinus Serif", size: 10.5pt)

#align(center)[
  #block(width: 100%, fill: rgb("#f0f0f0"), inset: 12pt, radius: 4pt)[
    #text(size: 18pt, weight: "bold")[Façade renovation estimate]
    #v(4pt)
    #text(size: 13pt)[{{ADDRESS}}]
  ]
]

#v(10pt)

#grid(
  columns: (1fr, 1fr),
  gutter: 20pt,
  [
    *Building*
    #table(
      columns: (auto, 1fr),
      stroke: none,
      [Height:], [{{HEIGHT}} m],
      [Treated perimeter:], [{{PERIMETER}} m],
      [Treated surface:], [{{SURFACE}} m²],
      [Faces:], [{{FACES}}],
    )
  ],
  [
    *Façade*
    #table(
      columns: (auto, 1fr),
      stroke: none,
      [Support:], [{{SUPPORT}}],
      [Condition:], [{{CONDITION}}],
      [Finish:], [{{FINISH}}],
      [Surface price:], [{{SURFACE_PRICE}} / m²],
    )
  ],
)

#v(10pt)

#table(
  columns: (1fr, auto, auto, auto, auto),
  align: (left, right, left, right, right),
  fill: (_, row) => if row == 0 { rgb("#e0e0e0") },
  [*Item*], [*Qty*], [*Unit*], [*Unit price*], [*Amount*],
{{ROWS}}
)

#v(10pt)

#align(right)[
  #table(
    columns: (auto, auto),
    stroke: none,
    align: (left, right),
    [Total excl. tax:], [*{{TOTAL}}*],
    [VAT:], [{{VAT}}],
    [Total incl. tax:], [*{{TOTAL_TTC}}*],
  )
]

#v(16pt)

#text(size: 9pt, fill: gray)[
  Indicative figures computed from declared dimensions and condition. This
  document is not a quotation; a site survey is required before any order.
]
"##;

/// Render a report to PDF bytes.
///
/// # Returns
///
/// * `Ok(Vec<u8>)` - PDF file as bytes
/// * `Err(EstimateError::RenderFailed)` - Typst compilation or PDF export failed
pub fn render_estimate_pdf(report: &EstimateReport) -> EstimateResult<Vec<u8>> {
    let world = PdfWorld::new(estimate_source(report));

    let warned = typst::compile(&world);
    let document = warned.output.map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        EstimateError::RenderFailed {
            reason: format!("Typst compilation failed: {}", error_msgs.join("; ")),
        }
    })?;

    typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        EstimateError::RenderFailed {
            reason: format!("PDF rendering failed: {}", error_msgs.join("; ")),
        }
    })
}

/// Typst source for a report
fn estimate_source(report: &EstimateReport) -> String {
    let result = &report.result;
    let g = &report.geometry;

    ESTIMATE_TEMPLATE
        .replace("{{RATES_VERSION}}", &escape_typst(&result.rates_version))
        .replace("{{DATE}}", &report.generated_at.format("%Y-%m-%d").to_string())
        .replace("{{ADDRESS}}", &escape_typst(report.address_label()))
        .replace("{{HEIGHT}}", &format!("{:.2}", g.height_m))
        .replace("{{PERIMETER}}", &format!("{:.2}", g.treated_perimeter_m))
        .replace("{{SURFACE}}", &format!("{:.2}", g.treated_surface_m2))
        .replace("{{FACES}}", &g.face_count.to_string())
        .replace("{{SUPPORT}}", result.support.display_name())
        .replace("{{CONDITION}}", result.condition.display_name())
        .replace("{{FINISH}}", result.finish.display_name())
        .replace("{{SURFACE_PRICE}}", &result.surface_unit_price.display_fr())
        .replace("{{ROWS}}", &build_rows(report))
        .replace("{{TOTAL}}", &result.total.display_fr())
        .replace("{{VAT}}", &result.vat.display_fr())
        .replace("{{TOTAL_TTC}}", &result.total_incl_tax.display_fr())
}

/// Table rows grouped by family, each group closed by its subtotal
fn build_rows(report: &EstimateReport) -> String {
    let result = &report.result;
    let mut rows = Vec::new();

    for (family, subtotal) in result.family_subtotals() {
        rows.push(format!("  table.cell(colspan: 5)[_{}_],", family_title(family)));
        for line in result.lines.iter().filter(|l| l.family == family) {
            rows.push(format!(
                "  [{}], [{:.2}], [{}], [{}], [{}],",
                escape_typst(&line.description),
                line.quantity,
                line.unit.symbol(),
                line.unit_price.display_fr(),
                line.amount.display_fr()
            ));
        }
        rows.push(format!("  [], [], [], [Subtotal], [*{}*],", subtotal.display_fr()));
    }

    rows.join("\n")
}

fn family_title(family: Family) -> String {
    escape_typst(family.display_name())
}

/// Escape special Typst characters in user-provided text
fn escape_typst(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '*' => "\\*".to_string(),
            '_' => "\\_".to_string(),
            '#' => "\\#".to_string(),
            '$' => "\\$".to_string(),
            '@' => "\\@".to_string(),
            '<' => "\\<".to_string(),
            '>' => "\\>".to_string(),
            '[' => "\\[".to_string(),
            ']' => "\\]".to_string(),
            '\\' => "\\\\".to_string(),
            '`' => "\\`".to_string(),
            _ => c.to_string(),
        })
        .collect()
}
