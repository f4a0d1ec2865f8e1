//! Drag sessions never commit a position outside the canvas.

use folio_core::event::PointerSample;
use folio_core::{Point, Size};
use folio_layout::PanelKey;
use folio_runtime::{CancellationToken, FolioConfig, MemoryStorage, SubscriptionCommand};
use folio_web::WebDesk;
use proptest::prelude::*;

fn panel_key() -> impl Strategy<Value = PanelKey> {
    proptest::sample::select(PanelKey::ALL.to_vec())
}

fn pointer() -> impl Strategy<Value = (f64, f64)> {
    (-5000.0f64..5000.0, -5000.0f64..5000.0)
}

proptest! {
    #[test]
    fn committed_position_stays_on_canvas(
        key in panel_key(),
        width in 768.0f64..2600.0,
        height in 200.0f64..1600.0,
        grid_snap in any::<bool>(),
        momentum in any::<bool>(),
        moves in prop::collection::vec(pointer(), 0..24),
        release in pointer(),
    ) {
        let mut config = FolioConfig::default();
        config.drag.grid_snap = grid_snap;
        config.drag.momentum = momentum;
        let mut web = WebDesk::new(config, Box::new(MemoryStorage::new()));
        let viewport = Size::new(width, height);
        let _ = web.initialize(viewport, &CancellationToken::never()).unwrap();
        let _ = web.app_mut().open(key);

        let mut commands: Vec<SubscriptionCommand> = Vec::new();
        let mut t = 0.0;
        let down = web.pointer_down(key, 0, PointerSample::new(9, Point::ORIGIN, t), true);
        commands.extend(down.subscriptions);
        for (x, y) in moves {
            t += 16.0;
            let _ = web.pointer_move(PointerSample::new(9, Point::new(x, y), t));
        }
        let up = web.pointer_up(PointerSample::new(9, Point::new(release.0, release.1), t + 16.0));
        commands.extend(up.subscriptions);

        let dims = key.dimensions();
        let max_x = (width - dims.width).max(0.0);
        let max_y = (height - dims.height).max(0.0);
        let (_, committed) = up.live.unwrap();
        prop_assert!((0.0..=max_x).contains(&committed.x), "x {} outside [0, {max_x}]", committed.x);
        prop_assert!((0.0..=max_y).contains(&committed.y), "y {} outside [0, {max_y}]", committed.y);
        prop_assert_eq!(web.app().desk().unwrap().state(key).position, committed);

        let starts = commands.iter().filter(|c| matches!(c, SubscriptionCommand::Start(_))).count();
        let stops = commands.iter().filter(|c| matches!(c, SubscriptionCommand::Stop(_))).count();
        prop_assert_eq!(starts, 2);
        prop_assert_eq!(stops, 2);
        let _ = web.teardown();
    }
}
