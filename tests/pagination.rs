mod common;

use common::*;
use paperform::model::{Document, PageLimits, RowHeight};
use paperform::pdf::surface::{NullSurface, RecordingSurface};
use paperform::{BlankCells, Error, KeepAll, LayoutWarning, UnitKind};

fn long_form() -> Document {
    let mut blocks = vec![
        labeled("Owner", "J. Smith"),
        labeled("Animal ID", "CAN-0042"),
        checkboxes(&[("Male", true), ("Female", false)], 2),
        text_box("History", "Intermittent lameness, left hind.\nNo prior surgery.", Some(20.0)),
    ];
    blocks.push(table_owned(
        &["Date", "Drug", "Dose", "Route"],
        numbered_rows(70, 4),
        RowHeight::default(),
    ));
    blocks.push(text_box("Investigator comments", "", Some(30.0)));
    document(vec![
        section(Some("Enrollment"), blocks),
        section(Some("Sign-off"), vec![labeled("Signature", ""), labeled("Date", "")]),
    ])
}

#[test]
fn empty_document_is_one_page_with_chrome_once() {
    init_logging();
    let doc = document(Vec::new());
    let mut surface = RecordingSurface::new();
    let composition = paperform::render_to_surface(&doc, &BlankCells, &mut surface)
        .expect("render");

    assert_eq!(composition.pages, 1);
    assert!(composition.placements.is_empty());
    let texts = surface.texts_on(1);
    assert_eq!(texts.iter().filter(|t| **t == "Page 1 of 1").count(), 1);
    assert_eq!(texts.iter().filter(|t| **t == "Screening Visit").count(), 1);
    assert!(surface.texts_on(2).is_empty());

    let export = paperform::render(&doc).expect("render pdf");
    assert_eq!(export.pages, 1);
    assert_eq!(pdf_page_count(&export.bytes), 1);
}

#[test]
fn per_page_budgets_split_twenty_five_rows_22_and_3() {
    init_logging();
    let mut doc = single(vec![table_owned(
        &[""],
        numbered_rows(25, 1),
        RowHeight::Auto { min: 8.0 },
    )]);
    doc.limits = PageLimits {
        first_page: Some(CONTENT_TOP + 180.0),
        other_pages: Some(CONTENT_TOP + 190.0),
    };

    let composition = paperform::render_to_surface(&doc, &BlankCells, &mut NullSurface::new())
        .expect("render");
    assert_eq!(composition.pages, 2);
    assert_eq!(composition.table_rows_on(1, 0), 22);
    assert_eq!(composition.table_rows_on(2, 0), 3);
    assert!(composition.warnings.is_empty());
}

#[test]
fn counting_pass_agrees_with_final_pass() {
    init_logging();
    let docs = [document(Vec::new()), long_form(), single(vec![spacer(500.0)])];
    for doc in &docs {
        let counted = paperform::count_pages(doc, &BlankCells).expect("count");
        let export = paperform::render(doc).expect("render");
        assert_eq!(counted, export.pages);
        assert_eq!(pdf_page_count(&export.bytes), export.pages);
    }
}

#[test]
fn final_pass_labels_every_page_with_the_true_total() {
    let doc = long_form();
    let mut surface = RecordingSurface::new();
    let composition = paperform::render_to_surface(&doc, &BlankCells, &mut surface)
        .expect("render");
    assert!(composition.pages >= 2, "expected a multi-page form");

    let n = composition.pages;
    for page in 1..=n {
        let label = format!("Page {page} of {n}");
        assert!(
            surface.texts_on(page).contains(&label.as_str()),
            "page {page} is missing {label:?}"
        );
    }
}

#[test]
fn rendering_is_byte_identical() {
    let doc = long_form();
    let a = paperform::render(&doc).expect("first render");
    let b = paperform::render(&doc).expect("second render");
    assert_eq!(a.bytes, b.bytes);
}

#[test]
fn cursor_only_moves_down_within_a_page() {
    let doc = long_form();
    let composition = paperform::render_to_surface(&doc, &BlankCells, &mut NullSurface::new())
        .expect("render");

    let mut last = (0usize, f32::MIN);
    for p in &composition.placements {
        if p.page == last.0 {
            assert!(p.y > last.1, "{:?} placed above its predecessor", p.kind);
        } else {
            assert_eq!(p.page, last.0 + 1, "pages must be consecutive");
            assert!((p.y - CONTENT_TOP).abs() < 1e-3, "page {} starts at {}", p.page, p.y);
        }
        last = (p.page, p.y);
    }
}

#[test]
fn blank_rows_are_dropped_in_both_passes() {
    let rows = vec![
        vec!["01/02", "Meloxicam"],
        vec!["", ""],
        vec!["03/02", "Gabapentin"],
        vec!["  ", "\t"],
        vec!["", "Tramadol"],
        vec!["", ""],
    ];
    let doc = single(vec![table(&["Date", "Drug"], rows, RowHeight::default())]);

    let composition = paperform::render_to_surface(&doc, &BlankCells, &mut NullSurface::new())
        .expect("render");
    assert_eq!(composition.table_rows_on(1, 0), 3);

    let kept_all = paperform::render_to_surface(&doc, &KeepAll, &mut NullSurface::new())
        .expect("render");
    assert_eq!(kept_all.table_rows_on(1, 0), 6);
}

#[test]
fn table_header_repeats_on_continuation_pages() {
    let doc = single(vec![table_owned(
        &["Date", "Drug"],
        numbered_rows(60, 2),
        RowHeight::default(),
    )]);
    let mut surface = RecordingSurface::new();
    let composition = paperform::render_to_surface(&doc, &BlankCells, &mut surface)
        .expect("render");
    assert!(composition.pages >= 2);

    for page in 1..=composition.pages {
        let first = composition
            .placements_on(page)
            .next()
            .expect("every page holds something");
        assert_eq!(first.kind, UnitKind::TableHeader { table: 0 });
        assert!(surface.texts_on(page).contains(&"Drug"));
    }
    let rows: usize = (1..=composition.pages)
        .map(|p| composition.table_rows_on(p, 0))
        .sum();
    assert_eq!(rows, 60);
}

#[test]
fn heading_moves_with_the_block_it_introduces() {
    // 236mm of spacer leaves room for the heading line but not for the
    // heading plus the line below it.
    let doc = document(vec![
        section(None, vec![spacer(236.0)]),
        section(Some("Medication"), vec![labeled("Drug", "Meloxicam")]),
    ]);
    let composition = paperform::render_to_surface(&doc, &BlankCells, &mut NullSurface::new())
        .expect("render");

    assert_eq!(composition.pages, 2);
    let heading = composition
        .placements
        .iter()
        .find(|p| matches!(p.kind, UnitKind::Heading { .. }))
        .expect("heading placed");
    assert_eq!(heading.page, 2);
}

#[test]
fn oversized_unit_gets_its_own_page_and_a_warning() {
    init_logging();
    let text = vec!["observation"; 80].join("\n");
    let doc = single(vec![
        labeled("Owner", "J. Smith"),
        text_box("Daily log", &text, None),
        labeled("Signature", ""),
    ]);

    let export = paperform::render(&doc).expect("render");
    assert_eq!(export.pages, 3);
    assert_eq!(export.warnings.len(), 1);
    match &export.warnings[0] {
        LayoutWarning::Overflow { page, block, height, available } => {
            assert_eq!(*page, 2);
            assert_eq!(*block, "TextBox");
            assert!(height > available);
        }
    }
}

#[test]
fn spacer_taller_than_a_page_terminates() {
    let doc = single(vec![spacer(1000.0), spacer(1000.0)]);
    let composition = paperform::render_to_surface(&doc, &BlankCells, &mut NullSurface::new())
        .expect("render");
    assert_eq!(composition.pages, 2);
    assert_eq!(composition.warnings.len(), 2);
}

/// One cell of `lines` lines: 4.5mm each plus 3mm padding.
fn tall_row(lines: usize) -> Vec<String> {
    vec![vec!["reading"; lines].join("\n")]
}

fn bottom_of(p: &paperform::Placement) -> f32 {
    p.y + p.height
}

const BOTTOM_LIMIT: f32 = 282.0;

#[test]
fn header_is_not_stranded_when_it_cannot_share_a_page_with_its_row() {
    init_logging();
    // 53 lines make a 241.5mm row: it fits the 243mm page alone, but not
    // under a 7.5mm header.
    let doc = single(vec![table_owned(&["Observation"], vec![tall_row(53)], RowHeight::default())]);
    let composition = paperform::render_to_surface(&doc, &BlankCells, &mut NullSurface::new())
        .expect("render");

    assert_eq!(composition.pages, 1);
    let kinds: Vec<UnitKind> = composition.placements_on(1).map(|p| p.kind).collect();
    assert_eq!(
        kinds,
        vec![UnitKind::TableHeader { table: 0 }, UnitKind::TableRow { table: 0, row: 0 }]
    );

    let row = &composition.placements[1];
    assert!(bottom_of(row) > BOTTOM_LIMIT);
    assert_eq!(composition.warnings.len(), 1);
    match &composition.warnings[0] {
        LayoutWarning::Overflow { page, block, height, available } => {
            assert_eq!(*page, 1);
            assert_eq!(*block, "TableRow");
            assert!((height - 241.5).abs() < 1e-3);
            assert!((available - (BOTTOM_LIMIT - row.y)).abs() < 1e-3);
        }
    }
}

#[test]
fn continuation_row_that_only_fits_alone_skips_the_repeated_header() {
    let rows = vec![vec!["baseline".to_string()], tall_row(53)];
    let doc = single(vec![table_owned(&["Observation"], rows, RowHeight::default())]);
    let composition = paperform::render_to_surface(&doc, &BlankCells, &mut NullSurface::new())
        .expect("render");

    assert_eq!(composition.pages, 2);
    let first_on_2 = composition.placements_on(2).next().expect("page 2 content");
    assert_eq!(first_on_2.kind, UnitKind::TableRow { table: 0, row: 1 });
    assert!(composition.warnings.is_empty(), "{:?}", composition.warnings);
}

#[test]
fn every_placement_past_the_limit_is_reported() {
    let rows = vec![tall_row(30), tall_row(60), tall_row(2), tall_row(53), tall_row(54)];
    let doc = single(vec![
        labeled("Owner", "J. Smith"),
        table_owned(&["Observation"], rows, RowHeight::default()),
        text_box("Daily log", &vec!["entry"; 70].join("\n"), None),
    ]);
    let composition = paperform::render_to_surface(&doc, &BlankCells, &mut NullSurface::new())
        .expect("render");

    let overflowing: Vec<(usize, f32)> = composition
        .placements
        .iter()
        .filter(|p| bottom_of(p) > BOTTOM_LIMIT + 1e-3)
        .map(|p| (p.page, p.height))
        .collect();
    let warned: Vec<(usize, f32)> = composition
        .warnings
        .iter()
        .map(|w| match w {
            LayoutWarning::Overflow { page, height, .. } => (*page, *height),
        })
        .collect();
    assert!(!overflowing.is_empty());
    assert_eq!(overflowing, warned);
}

#[test]
fn reused_surface_is_rejected_untouched() {
    let doc = single(vec![labeled("Owner", "J. Smith")]);
    let mut surface = RecordingSurface::new();
    paperform::render_to_surface(&doc, &BlankCells, &mut surface).expect("first render");
    let ops = surface.ops.len();

    let err = paperform::render_to_surface(&doc, &BlankCells, &mut surface).unwrap_err();
    assert!(matches!(err, Error::SurfaceNotEmpty(1)), "got {err}");
    assert_eq!(surface.ops.len(), ops);
    assert_eq!(surface.texts_on(2), Vec::<&str>::new());
}
