use serde::Deserialize;

#[derive(Clone, Copy, Debug, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: f32, // mm
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Margins {
    pub fn uniform(mm: f32) -> Self {
        Self {
            top: mm,
            bottom: mm,
            left: mm,
            right: mm,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(15.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct PageSetup {
    pub orientation: Orientation,
    pub margins: Margins,
}

/// Absolute bottom limits (mm from the top edge of the page) for the first
/// page and for every later page. `None` falls back to the bottom margin;
/// the footer, when present, is drawn inside that margin.
#[derive(Clone, Copy, Debug, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageLimits {
    pub first_page: Option<f32>,
    pub other_pages: Option<f32>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextStyle {
    pub font: String,
    pub bold_font: String,
    pub font_size: f32,   // points
    pub line_height: f32, // mm
    pub padding: f32,     // mm, inside boxes and table cells
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font: "Helvetica".to_string(),
            bold_font: "Helvetica-Bold".to_string(),
            font_size: 9.0,
            line_height: 4.5,
            padding: 1.5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChromeTemplate {
    pub title: String,
    pub document_code: String,
    pub version: String,
    /// Repeated under the metadata band on every page.
    pub banner: Option<String>,
    /// Printed in the bottom margin on every page.
    pub footer: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabeledLine {
    pub label: String,
    #[serde(default)]
    pub value: String,
    pub label_width: f32, // mm
    #[serde(default = "default_true")]
    pub underline: bool,
}

#[derive(Clone, Debug, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct TextBox {
    pub label: String,
    pub text: String,
    pub width: Option<f32>,  // mm, None = full content width
    pub height: Option<f32>, // mm, minimum box height
}

#[derive(Clone, Debug, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct CheckboxOption {
    pub label: String,
    pub checked: bool,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CheckboxGroup {
    pub label: Option<String>,
    pub options: Vec<CheckboxOption>,
    pub columns: usize,
}

impl Default for CheckboxGroup {
    fn default() -> Self {
        Self {
            label: None,
            options: Vec::new(),
            columns: 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Column {
    pub header: String,
    pub width: f32, // mm
    pub align: Align,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RowHeight {
    Fixed(f32),
    Auto { min: f32 },
}

impl Default for RowHeight {
    fn default() -> Self {
        RowHeight::Auto { min: 6.0 }
    }
}

#[derive(Clone, Debug, PartialEq, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
    pub row_height: RowHeight,
}

impl Table {
    pub fn has_header(&self) -> bool {
        self.columns.iter().any(|c| !c.header.trim().is_empty())
    }
}

/// Fixed vertical gap.
#[derive(Clone, Copy, Debug, PartialEq, Default, Deserialize)]
pub struct Spacer {
    pub height: f32, // mm
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum Block {
    LabeledLine(LabeledLine),
    TextBox(TextBox),
    CheckboxGroup(CheckboxGroup),
    Table(Table),
    Spacer(Spacer),
}

impl Block {
    pub fn kind(&self) -> &'static str {
        match self {
            Block::LabeledLine(_) => "LabeledLine",
            Block::TextBox(_) => "TextBox",
            Block::CheckboxGroup(_) => "CheckboxGroup",
            Block::Table(_) => "Table",
            Block::Spacer(_) => "Spacer",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Section {
    pub heading: Option<String>,
    pub blocks: Vec<Block>,
}

#[derive(Clone, Debug, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Document {
    pub page: PageSetup,
    pub limits: PageLimits,
    pub style: TextStyle,
    pub chrome: ChromeTemplate,
    pub sections: Vec<Section>,
}

fn default_true() -> bool {
    true
}
