use crate::fonts::Font;
use crate::geometry::PageGeometry;
use crate::model::ChromeTemplate;

use super::blocks::BORDER_WIDTH;
use super::layout::TypeSet;
use super::surface::{Paint, Surface};

pub const HEADER_HEIGHT: f32 = 14.0;
pub const LOGO_WIDTH: f32 = 30.0;
pub const PAGE_CELL_WIDTH: f32 = 32.0;
pub const META_HEIGHT: f32 = 6.0;
pub const BANNER_HEIGHT: f32 = 6.0;
/// Space between the chrome and the first content line.
pub const CHROME_GAP: f32 = 4.0;

pub const TITLE_SIZE: f32 = 12.0;
pub const TITLE_MIN_SIZE: f32 = 7.0;
const SMALL_SIZE: f32 = 8.0;
const FOOTER_SIZE: f32 = 7.0;
const CELL_PADDING: f32 = 2.0;
const LOGO_INSET: f32 = 2.0;
const BANNER_FILL: f32 = 0.92;

/// Everything the chrome of one page depends on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChromeContext<'a> {
    pub page_index: usize,
    pub total_pages: usize,
    pub document_code: &'a str,
    pub version: &'a str,
    pub title: &'a str,
    pub banner: Option<&'a str>,
    pub footer: Option<&'a str>,
}

impl<'a> ChromeContext<'a> {
    pub fn new(template: &'a ChromeTemplate, page_index: usize, total_pages: usize) -> Self {
        ChromeContext {
            page_index,
            total_pages,
            document_code: &template.document_code,
            version: &template.version,
            title: &template.title,
            banner: template.banner.as_deref().filter(|b| !b.trim().is_empty()),
            footer: template.footer.as_deref().filter(|f| !f.trim().is_empty()),
        }
    }

    pub fn page_label(&self) -> String {
        format!("Page {} of {}", self.page_index, self.total_pages)
    }
}

/// Vertical space the chrome takes above the content area.
pub fn chrome_height(template: &ChromeTemplate) -> f32 {
    let banner = template
        .banner
        .as_deref()
        .is_some_and(|b| !b.trim().is_empty());
    let banner_h = if banner { BANNER_HEIGHT } else { 0.0 };
    HEADER_HEIGHT + META_HEIGHT + banner_h + CHROME_GAP
}

/// Largest size, at most `nominal`, at which `text` fits in `available` mm.
/// Scales proportionally and rounds down to 0.1pt; never goes below `floor`.
pub fn fit_font_size(text: &str, font: Font, available: f32, nominal: f32, floor: f32) -> f32 {
    let width = font.with_size(nominal).text_width(text);
    if width <= available {
        return nominal;
    }
    let scaled = (nominal * available / width * 10.0).floor() / 10.0;
    if scaled < floor {
        log::warn!("{text:?} does not fit {available:.1}mm even at {floor}pt");
        return floor;
    }
    scaled
}

/// Header band, metadata band and banner, painted when a page opens.
pub fn paint_header(
    surface: &mut dyn Surface,
    geometry: &PageGeometry,
    ctx: &ChromeContext<'_>,
    ts: &TypeSet,
) {
    let x0 = geometry.content_left();
    let width = geometry.content_width();
    let y0 = geometry.margins.top;

    // Logo placeholder: the region is reserved and framed, never filled.
    surface.rect(x0, y0, LOGO_WIDTH, HEADER_HEIGHT, Paint::Stroke(BORDER_WIDTH));
    let (lx1, ly1) = (x0 + LOGO_INSET, y0 + LOGO_INSET);
    let (lx2, ly2) = (x0 + LOGO_WIDTH - LOGO_INSET, y0 + HEADER_HEIGHT - LOGO_INSET);
    surface.line(lx1, ly1, lx2, ly2, BORDER_WIDTH / 2.0);
    surface.line(lx1, ly2, lx2, ly1, BORDER_WIDTH / 2.0);

    let title_x = x0 + LOGO_WIDTH;
    let title_w = width - LOGO_WIDTH - PAGE_CELL_WIDTH;
    surface.rect(title_x, y0, title_w, HEADER_HEIGHT, Paint::Stroke(BORDER_WIDTH));
    let size = fit_font_size(
        ctx.title,
        ts.bold,
        title_w - 2.0 * CELL_PADDING,
        TITLE_SIZE,
        TITLE_MIN_SIZE,
    );
    centered_text(surface, ctx.title, ts.bold.with_size(size), title_x, title_w, y0, HEADER_HEIGHT);

    let page_x = title_x + title_w;
    surface.rect(page_x, y0, PAGE_CELL_WIDTH, HEADER_HEIGHT, Paint::Stroke(BORDER_WIDTH));
    let label = ctx.page_label();
    let size = fit_font_size(
        &label,
        ts.regular,
        PAGE_CELL_WIDTH - 2.0 * CELL_PADDING,
        SMALL_SIZE,
        TITLE_MIN_SIZE / 2.0,
    );
    centered_text(surface, &label, ts.regular.with_size(size), page_x, PAGE_CELL_WIDTH, y0, HEADER_HEIGHT);

    let meta_y = y0 + HEADER_HEIGHT;
    surface.rect(x0, meta_y, width, META_HEIGHT, Paint::Stroke(BORDER_WIDTH));
    let small = ts.regular.with_size(SMALL_SIZE);
    let baseline = meta_y + (META_HEIGHT + small.cap_height()) / 2.0;
    let code = format!("Code: {}", ctx.document_code);
    surface.text(x0 + CELL_PADDING, baseline, &code, small);
    let version = format!("Version: {}", ctx.version);
    let version_w = surface.measure(&version, small);
    surface.text(x0 + width - CELL_PADDING - version_w, baseline, &version, small);

    if let Some(banner) = ctx.banner {
        let banner_y = meta_y + META_HEIGHT;
        surface.rect(x0, banner_y, width, BANNER_HEIGHT, Paint::Fill(BANNER_FILL));
        surface.rect(x0, banner_y, width, BANNER_HEIGHT, Paint::Stroke(BORDER_WIDTH));
        let size = fit_font_size(banner, ts.bold, width - 2.0 * CELL_PADDING, SMALL_SIZE, TITLE_MIN_SIZE / 2.0);
        centered_text(surface, banner, ts.bold.with_size(size), x0, width, banner_y, BANNER_HEIGHT);
    }
}

/// Footer text and page number in the bottom margin, painted when a page closes.
pub fn paint_footer(
    surface: &mut dyn Surface,
    geometry: &PageGeometry,
    ctx: &ChromeContext<'_>,
    ts: &TypeSet,
) {
    let Some(footer) = ctx.footer else {
        return;
    };
    let font = ts.regular.with_size(FOOTER_SIZE);
    let x0 = geometry.content_left();
    let width = geometry.content_width();
    let rule_y = geometry.height - geometry.margins.bottom;
    let baseline = rule_y + (geometry.margins.bottom / 2.0).min(5.0);
    surface.line(x0, rule_y, x0 + width, rule_y, BORDER_WIDTH);
    surface.text(x0, baseline, footer, font);
    let label = ctx.page_label();
    let label_w = surface.measure(&label, font);
    surface.text(x0 + width - label_w, baseline, &label, font);
}

fn centered_text(surface: &mut dyn Surface, text: &str, font: Font, x: f32, w: f32, y: f32, h: f32) {
    if text.is_empty() {
        return;
    }
    let tx = x + (w - surface.measure(text, font)) / 2.0;
    let baseline = y + (h + font.cap_height()) / 2.0;
    surface.text(tx, baseline, text, font);
}
