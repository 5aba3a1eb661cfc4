// Pagination properties and reference scenarios against the headless surface

use paged_editor_wasm::engine::{PaginationEngine, PassOutcome};
use paged_editor_wasm::models::{PageGeometry, PaginationConfig, Rect, SpacerKind};
use paged_editor_wasm::pagination::{
    DecorationSet, GeometryProvider, HeadlessStyle, HeadlessSurface, LayoutHost,
};

fn style(line_height: f64) -> HeadlessStyle {
    HeadlessStyle {
        line_height,
        chars_per_line: 10,
        char_width: 8.0,
        padding: 96.0,
        block_gap: 0.0,
    }
}

fn paginate(surface: &mut HeadlessSurface) -> PaginationEngine {
    let mut engine = PaginationEngine::new(PaginationConfig::default()).expect("default config is valid");
    engine.mount(surface);
    let outcome = engine.recompute(surface);
    assert!(matches!(outcome, PassOutcome::Applied { .. }), "pass should run, got {:?}", outcome);
    engine
}

fn in_band(geometry: &PageGeometry, rect: &Rect) -> bool {
    let page = geometry.page_at(rect.top);
    rect.top >= geometry.usable_top(page) - 1e-6 && rect.bottom <= geometry.usable_bottom(page) + 1e-6
}

/// A document mixing short and long paragraphs with images that fit a band
fn mixed_document() -> HeadlessSurface {
    HeadlessSurface::new(style(20.0))
        .with_paragraph(300)
        .with_image(200.0)
        .with_paragraph(250)
        .with_image(500.0)
        .with_paragraph(900)
        .with_image(100.0)
        .with_paragraph(35)
}

#[test]
fn test_short_paragraph_stays_on_first_page() {
    // 40 lines of 20px: natural height 800px
    let mut surface = HeadlessSurface::new(style(20.0)).with_paragraph(400);
    let engine = paginate(&mut surface);

    assert!(engine.decorations().is_empty());
    assert_eq!(engine.page_count(), 1);
}

#[test]
fn test_image_crossing_page_end_moves_to_next_page() {
    // 67 lines of 12px end exactly at 900px
    let mut surface = HeadlessSurface::new(style(12.0))
        .with_paragraph(670)
        .with_image(1200.0);
    let image = surface.blocks()[1];
    assert_eq!(surface.node_rect(&image).map(|r| r.top), Some(900.0));

    let engine = paginate(&mut surface);
    let set = engine.decorations();

    assert_eq!(set.len(), 1);
    let spacer = &set.decorations[0];
    assert_eq!(spacer.kind, SpacerKind::Block);
    assert_eq!(spacer.position, image.position);
    assert_eq!(spacer.height, (1056.0 + 24.0 + 96.0) - 900.0);
    assert_eq!(surface.node_rect(&image).map(|r| r.top), Some(1176.0));
}

#[test]
fn test_paragraph_split_at_first_crossing_line() {
    // 104px image, then a paragraph from 200px to 1100px
    let mut surface = HeadlessSurface::new(style(20.0))
        .with_image(104.0)
        .with_paragraph(450);
    let paragraph = surface.blocks()[1];
    assert_eq!(surface.node_rect(&paragraph), Some(Rect::new(200.0, 1100.0)));

    let engine = paginate(&mut surface);
    let set = engine.decorations();

    assert_eq!(set.len(), 1);
    let spacer = &set.decorations[0];
    assert_eq!(spacer.kind, SpacerKind::Inline);
    // Line 38 is the first one whose bottom passes 960px
    assert_eq!(spacer.position, paragraph.position + 1 + 380);
    assert_eq!(spacer.height, 1176.0 - 960.0);
    assert_eq!(engine.page_of(paragraph.position + 1), Some(0));
    assert_eq!(engine.page_of(spacer.position), Some(1));
}

#[test]
fn test_every_line_lands_inside_a_band() {
    let mut surface = mixed_document();
    let engine = paginate(&mut surface);
    let geometry = *engine.geometry();

    for line in surface.line_rects() {
        assert!(in_band(&geometry, &line), "line {:?} crosses a page boundary", line);
    }
    for (block, rect) in surface.blocks().iter().zip(surface.block_rects()) {
        if block.is_atomic {
            assert!(in_band(&geometry, &rect), "image {:?} crosses a page boundary", rect);
        }
    }
    assert!(engine.page_count() >= 4);
}

#[test]
fn test_pagination_never_changes_content() {
    let mut surface = mixed_document();
    let before = surface.content().to_vec();
    let size_before = surface.content_size();

    let mut engine = paginate(&mut surface);
    engine.recompute(&mut surface);

    assert_eq!(surface.content(), before.as_slice());
    assert_eq!(surface.content_size(), size_before);
}

#[test]
fn test_recompute_is_idempotent() {
    let mut surface = mixed_document();
    let mut engine = paginate(&mut surface);
    let first = engine.decorations();

    engine.recompute(&mut surface);
    assert_eq!(engine.decorations(), first);
    assert_eq!(surface.applied(), &first);
}

#[test]
fn test_page_assignment_is_monotonic() {
    let mut surface = mixed_document();
    let engine = paginate(&mut surface);
    let placements = engine.state().placements();

    assert_eq!(placements.len(), surface.blocks().len());
    for pair in placements.windows(2) {
        assert!(pair[1].first_page >= pair[0].last_page, "{:?}", pair);
    }
}

#[test]
fn test_fitting_blocks_get_no_spacer() {
    let mut surface = HeadlessSurface::new(style(20.0))
        .with_paragraph(100)
        .with_image(150.0)
        .with_paragraph(120)
        .with_paragraph(80);
    let engine = paginate(&mut surface);

    assert!(engine.decorations().is_empty());
}

#[test]
fn test_inline_spacers_sit_on_line_starts() {
    let mut surface = mixed_document();
    let engine = paginate(&mut surface);

    let mut natural = surface.clone();
    natural.apply_decorations(&DecorationSet::empty());
    let epsilon = engine.config().line_epsilon;

    let inline: Vec<_> = engine
        .decorations()
        .decorations
        .into_iter()
        .filter(|d| d.kind == SpacerKind::Inline)
        .collect();
    assert!(!inline.is_empty());

    for spacer in inline {
        let here = natural.rect_at(spacer.position).expect("spacer sits on a character");
        if let Some(prev) = natural.rect_at(spacer.position - 1) {
            assert!(
                (here.top - prev.top).abs() > epsilon,
                "spacer at {} splits a visual line",
                spacer.position
            );
        }
    }
}

#[test]
fn test_paragraph_starting_just_above_page_end_moves_entirely() {
    // Image ends at 956px; the paragraph's first line crosses 960px
    let mut surface = HeadlessSurface::new(style(20.0))
        .with_image(860.0)
        .with_paragraph(50);
    let paragraph = surface.blocks()[1];
    let engine = paginate(&mut surface);
    let set = engine.decorations();

    assert_eq!(set.len(), 1);
    assert_eq!(set.decorations[0].kind, SpacerKind::Inline);
    assert_eq!(set.decorations[0].position, paragraph.position + 1);
    assert_eq!(set.decorations[0].height, 1176.0 - 956.0);
    assert_eq!(surface.rect_at(paragraph.position + 1).map(|r| r.top), Some(1176.0));
    assert_eq!(engine.page_of(paragraph.position), Some(1));
    assert_eq!(engine.page_of(paragraph.position + 30), Some(1));
}

#[test]
fn test_unmeasurable_first_char_moves_with_its_line() {
    let mut surface = HeadlessSurface::new(style(20.0))
        .with_image(860.0)
        .with_paragraph(50);
    let paragraph = surface.blocks()[1];
    surface.mark_unmeasurable(paragraph.position + 1);
    let engine = paginate(&mut surface);
    let set = engine.decorations();

    assert_eq!(set.len(), 1);
    assert_eq!(set.decorations[0].position, paragraph.position + 1);
    let geometry = *engine.geometry();
    for line in surface.line_rects() {
        assert!(in_band(&geometry, &line), "line {:?} crosses a page boundary", line);
    }
}

#[test]
fn test_paragraph_starting_in_bottom_margin_is_pushed_whole() {
    // Image ends exactly on the usable bottom; the paragraph starts in the margin
    let mut surface = HeadlessSurface::new(style(20.0))
        .with_image(864.0)
        .with_paragraph(50);
    let paragraph = surface.blocks()[1];
    let engine = paginate(&mut surface);
    let set = engine.decorations();

    assert_eq!(set.len(), 1);
    assert_eq!(set.decorations[0].kind, SpacerKind::Block);
    assert_eq!(set.decorations[0].position, paragraph.position);
    assert_eq!(surface.node_rect(&paragraph).map(|r| r.top), Some(1176.0));
}

#[test]
fn test_unmeasurable_paragraph_is_left_overflowing() {
    let mut surface = HeadlessSurface::new(style(20.0)).with_paragraph(600);
    for pos in 0..=602 {
        surface.mark_unmeasurable(pos);
    }
    let engine = paginate(&mut surface);

    assert!(engine.decorations().is_empty());
    assert_eq!(engine.state().placements().len(), 1);
}
