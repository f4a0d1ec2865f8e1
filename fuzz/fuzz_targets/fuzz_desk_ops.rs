#![no_main]

use arbitrary::Arbitrary;
use folio_core::{Point, Size};
use folio_layout::{Desk, LayoutEngine, PanelKey};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    Open(u8),
    Close(u8),
    Toggle(u8),
    Minimize(u8),
    Pin(u8, bool),
    Move(u8, f64, f64),
    Raise(u8),
    Resize(u16, u16),
    Reset,
}

fn key(i: u8) -> PanelKey {
    PanelKey::ALL[usize::from(i) % PanelKey::ALL.len()]
}

fuzz_target!(|ops: Vec<Op>| {
    let mut desk = Desk::new(LayoutEngine::default(), Size::new(1440.0, 900.0));
    let mut last_z = desk.highest_z_index();

    for op in ops.into_iter().take(256) {
        let regenerates = matches!(op, Op::Reset | Op::Resize(..));
        let _ = match op {
            Op::Open(i) => desk.open(key(i)),
            Op::Close(i) => desk.close(key(i)),
            Op::Toggle(i) => desk.toggle(key(i)),
            Op::Minimize(i) => desk.minimize(key(i)),
            Op::Pin(i, pinned) => desk.pin(key(i), pinned),
            Op::Move(i, x, y) => desk.update_position(key(i), Point::new(x, y)),
            Op::Raise(i) => desk.bring_to_front(key(i)),
            Op::Resize(w, h) => desk.resize(Size::new(f64::from(w), f64::from(h))),
            Op::Reset => desk.reset_all(),
        };

        // Only regenerated defaults lower the z counter; it always bounds every panel.
        assert!(regenerates || desk.highest_z_index() >= last_z);
        last_z = desk.highest_z_index();
        for k in PanelKey::ALL {
            let state = desk.state(k);
            assert!(state.z_index <= desk.highest_z_index());
            assert!(state.position.is_finite());
        }
    }
});
