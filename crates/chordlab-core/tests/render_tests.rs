use chordlab_core::combos::CombinationIndex;
use chordlab_core::engine::Phase;
use chordlab_core::render::{GridRenderer, Palette, Rgb};

mod common;
use common::{engine_with, small_catalog, small_layout};

fn renderer() -> GridRenderer {
    GridRenderer::new(6, 22, Palette::default())
}

fn index() -> CombinationIndex {
    CombinationIndex::build(&small_catalog(), &small_layout()).unwrap()
}

#[test]
fn fresh_trial_renders_the_idle_grid() {
    let mut engine = engine_with(small_catalog(), vec![0], 30);
    engine.start();

    let grid = renderer().render(&engine, &index(), true);
    assert_eq!(grid.rows(), 6);
    assert_eq!(grid.cols(), 22);
    assert_eq!(grid.count_not(Rgb::WHITE), 0);
}

#[test]
fn lit_disabled_renders_idle_regardless_of_presses() {
    let mut engine = engine_with(small_catalog(), vec![0], 30);
    engine.start();
    engine.on_key_down("control");

    let grid = renderer().render(&engine, &index(), false);
    assert_eq!(grid.count_not(Rgb::WHITE), 0);
}

#[test]
fn one_held_key_lights_itself_and_every_partner() {
    let mut engine = engine_with(small_catalog(), vec![0], 30);
    engine.start();
    engine.on_key_down("control");

    let grid = renderer().render(&engine, &index(), true);

    // control itself plus its partner set {a, g}; nothing else.
    assert_eq!(grid.get(5, 1), Rgb::BLUE);
    assert_eq!(grid.get(3, 2), Rgb::GREEN);
    assert_eq!(grid.get(3, 6), Rgb::GREEN);
    assert_eq!(grid.count_not(Rgb::WHITE), 3);
}

#[test]
fn a_complete_chord_lights_both_keys_without_hints() {
    let mut engine = engine_with(small_catalog(), vec![0], 30);
    engine.start();
    engine.on_key_down("control");
    engine.on_key_down("a");

    let grid = renderer().render(&engine, &index(), true);
    assert_eq!(engine.phase(), Phase::ResultPending);
    assert_eq!(grid.get(5, 1), Rgb::GREEN);
    assert_eq!(grid.get(3, 2), Rgb::GREEN);
    assert_eq!(grid.count_not(Rgb::WHITE), 2);
}

#[test]
fn the_grid_resets_once_the_result_is_reported() {
    let mut engine = engine_with(small_catalog(), vec![0], 30);
    engine.start();
    engine.on_key_down("control");
    engine.on_key_down("a");
    engine.finalize_result().unwrap();

    let grid = renderer().render(&engine, &index(), true);
    assert_eq!(grid.count_not(Rgb::WHITE), 0);
}

#[test]
fn resting_renders_idle() {
    // Block size 1 makes every trial end on a block boundary.
    let mut engine = engine_with(small_catalog(), vec![0, 0], 1);
    engine.start();
    engine.on_key_down("control");
    engine.on_key_down("a");
    engine.finalize_result().unwrap();

    assert_eq!(engine.phase(), Phase::Resting);
    let grid = renderer().render(&engine, &index(), true);
    assert_eq!(grid.count_not(Rgb::WHITE), 0);
}

#[test]
fn exhausted_renders_idle() {
    let mut engine = engine_with(small_catalog(), vec![], 30);
    engine.start();

    assert_eq!(engine.phase(), Phase::Exhausted);
    let grid = renderer().render(&engine, &index(), true);
    assert_eq!(grid.count_not(Rgb::WHITE), 0);
}

#[test]
fn a_held_key_outside_the_layout_keeps_the_grid_idle() {
    let mut engine = engine_with(small_catalog(), vec![0], 30);
    engine.start();
    engine.on_key_down("space");

    let grid = renderer().render(&engine, &index(), true);
    assert_eq!(grid.count_not(Rgb::WHITE), 0);
}

#[test]
fn a_custom_palette_flows_through() {
    let palette = Palette {
        idle: Rgb::BLACK,
        active: Rgb::RED,
        hint: Rgb::BLUE,
        pressed: Rgb::WHITE,
    };
    let mut engine = engine_with(small_catalog(), vec![0], 30);
    engine.start();
    engine.on_key_down("control");

    let grid = GridRenderer::new(6, 22, palette).render(&engine, &index(), true);
    assert_eq!(grid.get(5, 1), Rgb::RED);
    assert_eq!(grid.get(3, 2), Rgb::BLUE);
    assert_eq!(grid.count_not(Rgb::BLACK), 3);
}
