use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::fonts::{Font, to_winansi_bytes};
use crate::geometry::mm_to_pt;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Paint {
    /// Outline with the given line width (mm).
    Stroke(f32),
    /// Solid gray fill, 0.0 = black, 1.0 = white.
    Fill(f32),
}

/// Drawing sink. Coordinates are millimeters from the top-left page corner;
/// `text` positions the baseline. Pages are 1-based.
pub trait Surface {
    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, paint: Paint);
    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, width: f32);
    fn text(&mut self, x: f32, baseline: f32, text: &str, font: Font);

    /// Measure with the same metrics `text` draws with.
    fn measure(&self, text: &str, font: Font) -> f32 {
        font.text_width(text)
    }

    /// Append a page and make it current.
    fn new_page(&mut self);
    /// Make an existing page current.
    fn set_page(&mut self, page_index: usize);
    fn page_count(&self) -> usize;
}

/// Discards every drawing call; only tracks pages. Used for the counting pass.
#[derive(Debug, Default)]
pub struct NullSurface {
    pages: usize,
}

impl NullSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Surface for NullSurface {
    fn rect(&mut self, _x: f32, _y: f32, _w: f32, _h: f32, _paint: Paint) {}
    fn line(&mut self, _x1: f32, _y1: f32, _x2: f32, _y2: f32, _width: f32) {}
    fn text(&mut self, _x: f32, _baseline: f32, _text: &str, _font: Font) {}

    fn new_page(&mut self) {
        self.pages += 1;
    }

    fn set_page(&mut self, _page_index: usize) {}

    fn page_count(&self) -> usize {
        self.pages
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        paint: Paint,
    },
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        width: f32,
    },
    Text {
        x: f32,
        baseline: f32,
        text: String,
        font: &'static str,
        size: f32,
    },
}

/// Keeps every drawing call in memory, tagged with its page.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub ops: Vec<(usize, DrawOp)>,
    pages: usize,
    current: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops_on(&self, page_index: usize) -> impl Iterator<Item = &DrawOp> {
        self.ops
            .iter()
            .filter(move |(p, _)| *p == page_index)
            .map(|(_, op)| op)
    }

    pub fn texts_on(&self, page_index: usize) -> Vec<&str> {
        self.ops_on(page_index)
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn push(&mut self, op: DrawOp) {
        self.ops.push((self.current, op));
    }
}

impl Surface for RecordingSurface {
    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, paint: Paint) {
        self.push(DrawOp::Rect { x, y, w, h, paint });
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, width: f32) {
        self.push(DrawOp::Line {
            x1,
            y1,
            x2,
            y2,
            width,
        });
    }

    fn text(&mut self, x: f32, baseline: f32, text: &str, font: Font) {
        self.push(DrawOp::Text {
            x,
            baseline,
            text: text.to_string(),
            font: font.face.base_font,
            size: font.size,
        });
    }

    fn new_page(&mut self) {
        self.pages += 1;
        self.current = self.pages;
    }

    fn set_page(&mut self, page_index: usize) {
        if (1..=self.pages).contains(&page_index) {
            self.current = page_index;
        }
    }

    fn page_count(&self) -> usize {
        self.pages
    }
}

/// Document info written into the PDF trailer.
#[derive(Clone, Debug, Default)]
pub struct PdfInfo {
    pub title: String,
    pub subject: String,
}

/// Writes one content stream per page with pdf-writer. Fonts are the
/// non-embedded base-14 faces, registered in first-use order.
pub struct PdfSurface {
    width: f32,
    height: f32,
    pages: Vec<Content>,
    current: usize,
    fonts: Vec<&'static str>,
}

impl PdfSurface {
    pub fn new(width_mm: f32, height_mm: f32) -> Self {
        PdfSurface {
            width: width_mm,
            height: height_mm,
            pages: Vec::new(),
            current: 0,
            fonts: Vec::new(),
        }
    }

    fn content(&mut self) -> &mut Content {
        if self.pages.is_empty() {
            self.new_page();
        }
        &mut self.pages[self.current]
    }

    fn flip(&self, y: f32) -> f32 {
        mm_to_pt(self.height - y)
    }

    fn font_name(&mut self, base_font: &'static str) -> String {
        let idx = match self.fonts.iter().position(|f| *f == base_font) {
            Some(i) => i,
            None => {
                self.fonts.push(base_font);
                self.fonts.len() - 1
            }
        };
        format!("F{}", idx + 1)
    }

    /// Assemble the final PDF bytes.
    pub fn finish(mut self, info: &PdfInfo) -> Vec<u8> {
        if self.pages.is_empty() {
            self.new_page();
        }

        let mut pdf = Pdf::new();
        let mut next_id = 1i32;
        let mut alloc = || {
            let r = Ref::new(next_id);
            next_id += 1;
            r
        };

        let catalog_id = alloc();
        let pages_id = alloc();
        let info_id = alloc();

        let font_pairs: Vec<(String, Ref)> = self
            .fonts
            .iter()
            .enumerate()
            .map(|(i, base)| {
                let font_ref = alloc();
                pdf.type1_font(font_ref)
                    .base_font(Name(base.as_bytes()))
                    .encoding_predefined(Name(b"WinAnsiEncoding"));
                (format!("F{}", i + 1), font_ref)
            })
            .collect();

        let n = self.pages.len();
        let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
        let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

        for (i, c) in self.pages.into_iter().enumerate() {
            let raw = c.finish();
            let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
            pdf.stream(content_ids[i], &compressed)
                .filter(Filter::FlateDecode);
        }

        pdf.catalog(catalog_id).pages(pages_id);
        pdf.pages(pages_id)
            .kids(page_ids.iter().copied())
            .count(n as i32);

        let media_box = Rect::new(0.0, 0.0, mm_to_pt(self.width), mm_to_pt(self.height));
        for i in 0..n {
            let mut page = pdf.page(page_ids[i]);
            page.media_box(media_box)
                .parent(pages_id)
                .contents(content_ids[i]);
            let mut resources = page.resources();
            let mut fonts = resources.fonts();
            for (name, font_ref) in &font_pairs {
                fonts.pair(Name(name.as_bytes()), *font_ref);
            }
        }

        pdf.document_info(info_id)
            .title(TextStr(&info.title))
            .subject(TextStr(&info.subject))
            .producer(TextStr("paperform"));

        pdf.finish()
    }
}

impl Surface for PdfSurface {
    fn rect(&mut self, x: f32, y: f32, w: f32, h: f32, paint: Paint) {
        let (px, py) = (mm_to_pt(x), self.flip(y + h));
        let (pw, ph) = (mm_to_pt(w), mm_to_pt(h));
        let content = self.content();
        content.save_state();
        match paint {
            Paint::Stroke(width) => {
                content.set_line_width(mm_to_pt(width));
                content.rect(px, py, pw, ph);
                content.stroke();
            }
            Paint::Fill(gray) => {
                content.set_fill_gray(gray);
                content.rect(px, py, pw, ph);
                content.fill_nonzero();
            }
        }
        content.restore_state();
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, width: f32) {
        let (px1, py1) = (mm_to_pt(x1), self.flip(y1));
        let (px2, py2) = (mm_to_pt(x2), self.flip(y2));
        let content = self.content();
        content.save_state();
        content.set_line_width(mm_to_pt(width));
        content.move_to(px1, py1);
        content.line_to(px2, py2);
        content.stroke();
        content.restore_state();
    }

    fn text(&mut self, x: f32, baseline: f32, text: &str, font: Font) {
        let bytes = to_winansi_bytes(text);
        if bytes.is_empty() {
            return;
        }
        let name = self.font_name(font.face.base_font);
        let (px, py) = (mm_to_pt(x), self.flip(baseline));
        self.content()
            .begin_text()
            .set_font(Name(name.as_bytes()), font.size)
            .next_line(px, py)
            .show(Str(&bytes))
            .end_text();
    }

    fn new_page(&mut self) {
        self.pages.push(Content::new());
        self.current = self.pages.len() - 1;
    }

    fn set_page(&mut self, page_index: usize) {
        if (1..=self.pages.len()).contains(&page_index) {
            self.current = page_index - 1;
        }
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }
}
