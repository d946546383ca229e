//! Page geometry in millimeters.
//!
//! Layout works top-down: the origin is the top-left corner of the page and
//! `y` grows toward the bottom edge. Only the PDF surface flips to PDF's
//! bottom-left, point-based space.

use crate::error::Error;
use crate::model::{Margins, Orientation, PageLimits, PageSetup};

pub const A4_SHORT: f32 = 210.0;
pub const A4_LONG: f32 = 297.0;

const PT_PER_MM: f32 = 72.0 / 25.4;

pub fn mm_to_pt(mm: f32) -> f32 {
    mm * PT_PER_MM
}

pub fn pt_to_mm(pt: f32) -> f32 {
    pt / PT_PER_MM
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margins: Margins,
    /// Height of the chrome painted above the content area on every page.
    pub chrome_height: f32,
    limits: PageLimits,
}

impl PageGeometry {
    pub fn new(page: &PageSetup, limits: PageLimits, chrome_height: f32) -> Result<Self, Error> {
        let (width, height) = match page.orientation {
            Orientation::Portrait => (A4_SHORT, A4_LONG),
            Orientation::Landscape => (A4_LONG, A4_SHORT),
        };
        let m = page.margins;
        if [m.top, m.bottom, m.left, m.right].iter().any(|v| *v < 0.0) {
            return Err(Error::InvalidDocument("margins must not be negative".into()));
        }
        let geometry = PageGeometry {
            width,
            height,
            margins: m,
            chrome_height,
            limits,
        };
        if geometry.content_width() <= 0.0 {
            return Err(Error::InvalidDocument(format!(
                "left/right margins leave no content width on a {width}mm page"
            )));
        }
        for page_index in [1, 2] {
            let top = geometry.content_top(page_index);
            let bottom = geometry.bottom_limit(page_index);
            if bottom <= top || bottom > height {
                return Err(Error::InvalidDocument(format!(
                    "page {page_index}: bottom limit {bottom:.1}mm must lie between the content top {top:.1}mm and the page edge {height:.1}mm"
                )));
            }
        }
        Ok(geometry)
    }

    pub fn content_left(&self) -> f32 {
        self.margins.left
    }

    pub fn content_width(&self) -> f32 {
        self.width - self.margins.left - self.margins.right
    }

    /// First y available to content on the given (1-based) page.
    pub fn content_top(&self, _page_index: usize) -> f32 {
        self.margins.top + self.chrome_height
    }

    /// Last y content may reach on the given (1-based) page.
    pub fn bottom_limit(&self, page_index: usize) -> f32 {
        let configured = if page_index <= 1 {
            self.limits.first_page
        } else {
            self.limits.other_pages
        };
        configured.unwrap_or(self.height - self.margins.bottom)
    }

    pub fn usable_height(&self, page_index: usize) -> f32 {
        self.bottom_limit(page_index) - self.content_top(page_index)
    }
}
