//! Benchmarks for key-down dispatch
//!
//! Run with: cargo bench dispatch

use std::rc::Rc;

use keymacro::{Chord, KeyEventBus, MacroAction, MacroRegistry, Modifiers, SyntheticKeyEvent};

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

/// Registry with `count` macros on distinct letter/modifier chords
fn populated_registry(count: usize) -> (Rc<KeyEventBus>, MacroRegistry) {
    let bus = Rc::new(KeyEventBus::new());
    let registry = MacroRegistry::with_defaults(bus.clone());

    for i in 0..count {
        let key = char::from(b'a' + (i % 26) as u8).to_string();
        let mods = Modifiers::new(i % 2 == 0, (i / 2) % 2 == 0, (i / 4) % 2 == 0, false);
        registry
            .register(
                format!("macro-{}", i),
                Chord::new(key, mods),
                MacroAction::infallible(|| {}),
                None,
            )
            .ok();
    }

    registry.start();
    (bus, registry)
}

// ============================================================================
// Dispatch
// ============================================================================

#[divan::bench(args = [10, 100, 1_000])]
fn dispatch_hit(bencher: divan::Bencher, count: usize) {
    let (bus, _registry) = populated_registry(count);

    bencher.bench_local(|| {
        let event =
            SyntheticKeyEvent::new("A").with_mods(Modifiers::CTRL | Modifiers::ALT | Modifiers::SHIFT);
        bus.emit(divan::black_box(&event));
        event.default_prevented_count()
    });
}

#[divan::bench(args = [10, 100, 1_000])]
fn dispatch_miss(bencher: divan::Bencher, count: usize) {
    let (bus, _registry) = populated_registry(count);

    bencher.bench_local(|| {
        let event = SyntheticKeyEvent::new("F13");
        bus.emit(divan::black_box(&event));
    });
}

#[divan::bench]
fn dispatch_text_entry(bencher: divan::Bencher) {
    let (bus, _registry) = populated_registry(100);

    bencher.bench_local(|| {
        let event = SyntheticKeyEvent::new("a").with_mods(Modifiers::CTRL).on("TEXTAREA");
        bus.emit(divan::black_box(&event));
    });
}

// ============================================================================
// Chord parsing
// ============================================================================

#[divan::bench(args = ["s", "ctrl+shift+s", "ctrl+alt+shift+meta+pagedown"])]
fn parse_chord(label: &str) -> Chord {
    divan::black_box(label).parse().unwrap()
}
