mod common;

use common::*;
use paperform::model::{Column, RowHeight, Table};
use paperform::pdf::blocks::{CHECKBOX_LABEL_OFFSET, CHECKBOX_SIZE};
use paperform::pdf::surface::{DrawOp, NullSurface, Paint, RecordingSurface};
use paperform::{BlankCells, Error};

const CHECK_STROKE: f32 = 0.35;

fn record(doc: &paperform::Document) -> RecordingSurface {
    let mut surface = RecordingSurface::new();
    paperform::render_to_surface(doc, &BlankCells, &mut surface).expect("render");
    surface
}

fn check_strokes(surface: &RecordingSurface) -> usize {
    surface
        .ops_on(1)
        .filter(|op| matches!(op, DrawOp::Line { width, .. } if *width == CHECK_STROKE))
        .count()
}

fn text_x(surface: &RecordingSurface, text: &str) -> f32 {
    surface
        .ops_on(1)
        .find_map(|op| match op {
            DrawOp::Text { x, text: t, .. } if t == text => Some(*x),
            _ => None,
        })
        .unwrap_or_else(|| panic!("{text:?} not drawn"))
}

#[test]
fn exactly_one_check_mark_whatever_the_order() {
    init_logging();
    let variants = [
        vec![("Male", true), ("Female", false)],
        vec![("Male", false), ("Female", true)],
        vec![("Female", true), ("Male", false)],
        vec![("Female", false), ("Male", true)],
    ];
    for options in &variants {
        for columns in [1, 2] {
            let surface = record(&single(vec![checkboxes(options, columns)]));
            assert_eq!(check_strokes(&surface), 2, "{options:?} in {columns} column(s)");
        }
    }

    let none = record(&single(vec![checkboxes(&[("Male", false), ("Female", false)], 2)]));
    assert_eq!(check_strokes(&none), 0);
}

#[test]
fn checked_state_does_not_move_labels() {
    let checked = record(&single(vec![checkboxes(&[("Neutered", true)], 1)]));
    let unchecked = record(&single(vec![checkboxes(&[("Neutered", false)], 1)]));
    assert_eq!(text_x(&checked, "Neutered"), text_x(&unchecked, "Neutered"));

    let box_x = checked
        .ops_on(1)
        .find_map(|op| match op {
            DrawOp::Rect { x, w, .. } if *w == CHECKBOX_SIZE => Some(*x),
            _ => None,
        })
        .expect("checkbox drawn");
    assert!((text_x(&checked, "Neutered") - box_x - CHECKBOX_LABEL_OFFSET).abs() < 1e-4);
}

#[test]
fn text_box_grows_instead_of_clipping() {
    let lines: Vec<String> = (1..=7).map(|i| format!("Finding {i}")).collect();
    let mut doc = single(vec![text_box("Clinical notes", &lines.join("\n"), Some(35.0))]);
    doc.style.line_height = 5.0;
    let surface = record(&doc);

    let (top, height) = surface
        .ops_on(1)
        .find_map(|op| match op {
            DrawOp::Rect { y, w, h, paint: Paint::Stroke(_), .. }
                if (*w - CONTENT_WIDTH).abs() < 1e-3 && *h > 30.0 =>
            {
                Some((*y, *h))
            }
            _ => None,
        })
        .expect("text box frame");
    assert!(height >= 7.0 * 5.0, "box is {height}mm");
    assert!((height - (7.0 * 5.0 + 2.0 * doc.style.padding)).abs() < 1e-3);

    for line in &lines {
        let baseline = surface
            .ops_on(1)
            .find_map(|op| match op {
                DrawOp::Text { baseline, text, .. } if text == line => Some(*baseline),
                _ => None,
            })
            .unwrap_or_else(|| panic!("{line:?} not drawn"));
        assert!(baseline > top && baseline < top + height, "{line:?} outside the box");
    }
}

#[test]
fn declared_height_is_a_minimum() {
    let doc = single(vec![text_box("", "short", Some(40.0))]);
    let composition = paperform::render_to_surface(&doc, &BlankCells, &mut NullSurface::new())
        .expect("render");
    assert!((composition.placements[0].height - 40.0).abs() < 1e-3);
}

#[test]
fn empty_value_still_reserves_an_underlined_line() {
    let doc = single(vec![labeled("Signature", "")]);
    let mut surface = RecordingSurface::new();
    let composition = paperform::render_to_surface(&doc, &BlankCells, &mut surface)
        .expect("render");

    assert!((composition.placements[0].height - doc.style.line_height).abs() < 1e-4);
    let underline = surface.ops_on(1).any(|op| {
        matches!(op, DrawOp::Line { x1, x2, .. }
            if (*x1 - (15.0 + 40.0)).abs() < 1e-3 && (*x2 - (15.0 + CONTENT_WIDTH)).abs() < 1e-3)
    });
    assert!(underline);
}

#[test]
fn long_values_wrap_onto_more_lines() {
    let value = "Presented with acute onset vomiting and lethargy after suspected ingestion of \
                 a foreign body during a walk in the park two days prior to admission";
    let doc = single(vec![labeled("Presenting complaint", value)]);
    let composition = paperform::render_to_surface(&doc, &BlankCells, &mut NullSurface::new())
        .expect("render");
    assert!(composition.placements[0].height >= 2.0 * doc.style.line_height);
}

#[test]
fn column_widths_must_fill_the_content_width() {
    let doc = single(vec![paperform::model::Block::Table(Table {
        columns: vec![
            Column { header: "Date".into(), width: 60.0, ..Default::default() },
            Column { header: "Drug".into(), width: 60.0, ..Default::default() },
        ],
        rows: vec![vec!["a".into(), "b".into()]],
        row_height: RowHeight::default(),
    })]);
    let err = paperform::render(&doc).unwrap_err();
    assert!(matches!(err, Error::InvalidDocument(_)), "got {err}");
}

#[test]
fn rows_wider_than_the_table_are_rejected() {
    let doc = single(vec![table(&["Date", "Drug"], vec![vec!["a", "b", "c"]], RowHeight::default())]);
    assert!(matches!(paperform::render(&doc), Err(Error::InvalidDocument(_))));
}

#[test]
fn unknown_font_fails_before_layout() {
    let mut doc = single(vec![labeled("Owner", "J. Smith")]);
    doc.style.font = "Comic Sans MS".to_string();
    assert!(matches!(paperform::count_pages(&doc, &BlankCells), Err(Error::Measurement(_))));
}

#[test]
fn fixed_rows_keep_their_height() {
    let long = "a very long cell value that would need several lines at this width";
    let doc = single(vec![table(
        &["Note", "Flag"],
        vec![vec![long, "x"], vec!["short", "y"]],
        RowHeight::Fixed(6.0),
    )]);
    let composition = paperform::render_to_surface(&doc, &BlankCells, &mut NullSurface::new())
        .expect("render");
    for p in composition.placements.iter().skip(1) {
        assert!((p.height - 6.0).abs() < 1e-4);
    }
}
