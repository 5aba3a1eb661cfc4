// Recomputation scheduling and spacer carry-over between passes

use paged_editor_wasm::engine::{PaginationEngine, PassOutcome};
use paged_editor_wasm::models::{PaginationConfig, SpacerKind};
use paged_editor_wasm::pagination::{HeadlessStyle, HeadlessSurface, LayoutHost};
use paged_editor_wasm::scheduler::Effect;

fn surface() -> HeadlessSurface {
    // 60 lines of 20px from 96px to 1296px
    HeadlessSurface::new(HeadlessStyle {
        line_height: 20.0,
        chars_per_line: 10,
        char_width: 8.0,
        padding: 96.0,
        block_gap: 0.0,
    })
    .with_paragraph(600)
}

fn engine() -> PaginationEngine {
    PaginationEngine::new(PaginationConfig::default()).expect("default config is valid")
}

/// Mount and let the settle timer and first frame run
fn mounted(surface: &mut HeadlessSurface) -> PaginationEngine {
    let mut engine = engine();
    assert_eq!(engine.mount(surface), vec![Effect::ArmTimer(100.0)]);
    surface.set_clock(100.0);
    assert_eq!(engine.on_timer(surface.now()), vec![Effect::RequestFrame]);
    assert!(matches!(engine.on_frame(surface), PassOutcome::Applied { .. }));
    engine
}

fn only_spacer(engine: &PaginationEngine) -> (usize, f64, SpacerKind) {
    let spacers = engine.state().spacers();
    assert_eq!(spacers.len(), 1, "{:?}", spacers);
    (spacers[0].position, spacers[0].height, spacers[0].kind)
}

#[test]
fn test_first_pass_runs_after_settle_delay() {
    let mut surface = surface();
    let mut engine = engine();

    engine.mount(&surface);
    assert_eq!(engine.on_frame(&mut surface), PassOutcome::Idle);
    assert!(engine.state().is_empty());

    surface.set_clock(100.0);
    engine.on_timer(surface.now());
    assert_eq!(engine.on_frame(&mut surface), PassOutcome::Applied { spacers: 1, pages: 2 });
    assert_eq!(only_spacer(&engine), (431, 220.0, SpacerKind::Inline));
}

#[test]
fn test_typing_before_split_carries_spacer_along() {
    let mut surface = surface();
    let mut engine = mounted(&mut surface);

    let mapping = surface.insert_text(0, 10, 5).expect("text block");
    surface.set_clock(1000.0);
    assert_eq!(engine.on_mutation(&mapping, surface.now()), vec![Effect::ArmTimer(500.0)]);

    // Shifted with the text, height untouched until the next pass
    assert_eq!(only_spacer(&engine), (436, 220.0, SpacerKind::Inline));
    assert_eq!(engine.decorations().decorations[0].position, 436);

    surface.set_clock(1500.0);
    assert_eq!(engine.on_timer(surface.now()), vec![Effect::RequestFrame]);
    assert!(matches!(engine.on_frame(&mut surface), PassOutcome::Applied { .. }));

    // 605 characters wrap the same way: the split is back on a line start
    assert_eq!(only_spacer(&engine), (431, 220.0, SpacerKind::Inline));
}

#[test]
fn test_typing_after_split_leaves_spacer_in_place() {
    let mut surface = surface();
    let mut engine = mounted(&mut surface);

    let mapping = surface.insert_text(0, 500, 3).expect("text block");
    engine.on_mutation(&mapping, 1000.0);

    assert_eq!(only_spacer(&engine), (431, 220.0, SpacerKind::Inline));
}

#[test]
fn test_deleting_across_split_collapses_spacer_position() {
    let mut surface = surface();
    let mut engine = mounted(&mut surface);

    let mapping = surface.delete_text(0, 420, 20).expect("text block");
    engine.on_mutation(&mapping, 1000.0);

    let (position, height, _) = only_spacer(&engine);
    assert_eq!(position, 421);
    assert_eq!(height, 220.0);
}

#[test]
fn test_rapid_mutations_restart_debounce() {
    let mut surface = surface();
    let mut engine = mounted(&mut surface);

    let mapping = surface.insert_text(0, 0, 1).expect("text block");
    assert_eq!(engine.on_mutation(&mapping, 1000.0), vec![Effect::ArmTimer(500.0)]);
    let mapping = surface.insert_text(0, 0, 1).expect("text block");
    assert_eq!(
        engine.on_mutation(&mapping, 1300.0),
        vec![Effect::CancelTimer, Effect::ArmTimer(500.0)]
    );

    // The first timer's callback is stale
    assert!(engine.on_timer(1500.0).is_empty());
    assert_eq!(engine.on_frame(&mut surface), PassOutcome::Idle);

    assert_eq!(engine.on_timer(1800.0), vec![Effect::RequestFrame]);
    assert!(matches!(engine.on_frame(&mut surface), PassOutcome::Applied { .. }));
}

#[test]
fn test_resize_overrides_pending_debounce() {
    let mut surface = surface();
    let mut engine = mounted(&mut surface);

    let mapping = surface.insert_text(0, 0, 1).expect("text block");
    engine.on_mutation(&mapping, 1000.0);
    assert_eq!(engine.on_resize(), vec![Effect::CancelTimer, Effect::RequestFrame]);

    assert!(matches!(engine.on_frame(&mut surface), PassOutcome::Applied { .. }));
    // The debounce never fires afterwards
    assert!(engine.on_timer(1500.0).is_empty());
    assert_eq!(engine.on_frame(&mut surface), PassOutcome::Idle);
}

#[test]
fn test_pass_pins_height_and_reflows() {
    let mut surface = surface();
    let _engine = mounted(&mut surface);

    assert_eq!(surface.pinned_height(), None);
    let history = surface.pin_history();
    assert_eq!(history.len(), 2);
    assert!(history[0].is_some());
    assert_eq!(history[1], None);
    assert!(surface.reflow_count() >= 1);
}

#[test]
fn test_detached_surface_is_skipped() {
    let mut surface = surface();
    let mut engine = engine();
    engine.mount(&surface);
    surface.detach();

    assert_eq!(engine.on_timer(100.0), vec![Effect::RequestFrame]);
    assert_eq!(engine.on_frame(&mut surface), PassOutcome::SkippedDetached);
    assert!(engine.state().is_empty());
    assert!(surface.applied().is_empty());
}

#[test]
fn test_dispose_cancels_and_silences_callbacks() {
    let mut surface = surface();
    let mut engine = mounted(&mut surface);

    let mapping = surface.insert_text(0, 0, 1).expect("text block");
    engine.on_mutation(&mapping, 1000.0);
    assert_eq!(engine.dispose(), vec![Effect::CancelTimer]);

    assert!(engine.on_timer(1500.0).is_empty());
    assert_eq!(engine.on_frame(&mut surface), PassOutcome::SkippedDisposed);
    assert_eq!(engine.recompute(&mut surface), PassOutcome::SkippedDisposed);
    assert!(engine.on_mutation(&mapping, 2000.0).is_empty());
    assert!(engine.configure(1000.0, 10.0).is_err());
    assert!(engine.dispose().is_empty());
}

#[test]
fn test_configure_schedules_immediate_pass() {
    let mut surface = surface();
    let mut engine = mounted(&mut surface);

    let effects = engine.configure(800.0, 16.0).expect("valid geometry");
    assert_eq!(effects, vec![Effect::RequestFrame]);
    assert!(matches!(engine.on_frame(&mut surface), PassOutcome::Applied { .. }));

    // Usable band is now 96..704; line 30 (top 696) is the first to cross
    let (position, height, kind) = only_spacer(&engine);
    assert_eq!(kind, SpacerKind::Inline);
    assert_eq!(position, 1 + 300);
    assert_eq!(height, (800.0 + 16.0 + 96.0) - 696.0);
}

#[test]
fn test_invalid_geometry_is_rejected() {
    let mut surface = surface();
    let mut engine = mounted(&mut surface);

    assert!(engine.configure(150.0, 0.0).is_err());
    assert_eq!(engine.config().page_height, 1056.0);
}
