#![no_main]

use folio_core::{Rect, Size};
use folio_layout::{Desk, LayoutEngine, LayoutSnapshot, PanelKey, ViewportClass};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Stored documents come from an untrusted origin. Decoding must never
    // panic, and anything it accepts must restore to an in-bounds desk.
    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };
    let engine = LayoutEngine::default();
    let viewport = Size::new(1440.0, 900.0);
    let defaults = engine.default_snapshot(ViewportClass::Large, viewport);
    let Ok(loaded) = LayoutSnapshot::from_json(json, &defaults) else {
        return;
    };

    let desk = Desk::restore(engine, viewport, &loaded.snapshot);
    let canvas = Rect::from_size(viewport);
    for key in PanelKey::ALL {
        let state = desk.state(key);
        assert!(state.position.is_finite(), "{key:?} position not finite");
        assert!(state.position.x >= 0.0 && state.position.y >= 0.0);
        let dims = key.spec().dimensions;
        if dims.width <= viewport.width && dims.height <= viewport.height {
            assert!(canvas.contains_rect(&Rect::from_origin(state.position, dims)));
        }
        assert!(state.z_index <= desk.highest_z_index());
    }
    assert!(desk.snapshot().to_json().is_ok());
});
