#![allow(dead_code)]

use paperform::model::{
    Block, CheckboxGroup, CheckboxOption, ChromeTemplate, Column, Document, LabeledLine, RowHeight,
    Section, Spacer, Table, TextBox,
};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A4 portrait, default margins, no banner or footer: content runs from
/// y = 39mm (15mm margin + 24mm chrome) to y = 282mm and is 180mm wide.
pub const CONTENT_TOP: f32 = 39.0;
pub const CONTENT_WIDTH: f32 = 180.0;

pub fn chrome(title: &str) -> ChromeTemplate {
    ChromeTemplate {
        title: title.to_string(),
        document_code: "VX-CS-014".to_string(),
        version: "3.1".to_string(),
        ..Default::default()
    }
}

pub fn document(sections: Vec<Section>) -> Document {
    Document {
        chrome: chrome("Screening Visit"),
        sections,
        ..Default::default()
    }
}

pub fn section(heading: Option<&str>, blocks: Vec<Block>) -> Section {
    Section {
        heading: heading.map(str::to_string),
        blocks,
    }
}

pub fn single(blocks: Vec<Block>) -> Document {
    document(vec![section(None, blocks)])
}

pub fn labeled(label: &str, value: &str) -> Block {
    Block::LabeledLine(LabeledLine {
        label: label.to_string(),
        value: value.to_string(),
        label_width: 40.0,
        underline: true,
    })
}

pub fn text_box(label: &str, text: &str, height: Option<f32>) -> Block {
    Block::TextBox(TextBox {
        label: label.to_string(),
        text: text.to_string(),
        width: None,
        height,
    })
}

pub fn spacer(height: f32) -> Block {
    Block::Spacer(Spacer { height })
}

pub fn checkboxes(options: &[(&str, bool)], columns: usize) -> Block {
    Block::CheckboxGroup(CheckboxGroup {
        label: Some("Sex".to_string()),
        options: options
            .iter()
            .map(|(label, checked)| CheckboxOption {
                label: label.to_string(),
                checked: *checked,
            })
            .collect(),
        columns,
    })
}

/// Full-width columns split evenly.
pub fn columns(headers: &[&str]) -> Vec<Column> {
    let width = CONTENT_WIDTH / headers.len() as f32;
    headers
        .iter()
        .map(|h| Column {
            header: h.to_string(),
            width,
            ..Default::default()
        })
        .collect()
}

pub fn table(headers: &[&str], rows: Vec<Vec<&str>>, row_height: RowHeight) -> Block {
    Block::Table(Table {
        columns: columns(headers),
        rows: rows
            .into_iter()
            .map(|r| r.into_iter().map(str::to_string).collect())
            .collect(),
        row_height,
    })
}

pub fn numbered_rows(n: usize, cols: usize) -> Vec<Vec<String>> {
    (1..=n)
        .map(|i| (0..cols).map(|c| format!("r{i}c{c}")).collect())
        .collect()
}

pub fn table_owned(headers: &[&str], rows: Vec<Vec<String>>, row_height: RowHeight) -> Block {
    Block::Table(Table {
        columns: columns(headers),
        rows,
        row_height,
    })
}

/// Count page objects in a PDF written by this crate.
pub fn pdf_page_count(bytes: &[u8]) -> usize {
    let needle = b"/Type /Page";
    bytes
        .windows(needle.len() + 1)
        .filter(|w| &w[..needle.len()] == needle && w[needle.len()] != b's')
        .count()
}
