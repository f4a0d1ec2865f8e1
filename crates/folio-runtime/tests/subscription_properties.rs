//! Listener bookkeeping across arbitrary reconcile sequences.

use folio_runtime::{HostSubscriptions, Listener, SubscriptionCommand};
use proptest::prelude::*;

fn listener() -> impl Strategy<Value = Listener> {
    prop_oneof![
        Just(Listener::Resize),
        Just(Listener::KeyDown),
        Just(Listener::Blur),
        Just(Listener::Visibility),
        (1u32..4).prop_map(|pointer_id| Listener::PointerMove { pointer_id }),
        (1u32..4).prop_map(|pointer_id| Listener::PointerUp { pointer_id }),
    ]
}

proptest! {
    #[test]
    fn every_start_is_stopped_exactly_once(
        rounds in prop::collection::vec(prop::collection::vec(listener(), 0..8), 0..16),
    ) {
        let mut subs = HostSubscriptions::new();
        let mut commands = Vec::new();
        for desired in rounds {
            commands.extend(subs.reconcile(desired.clone()));
            for l in &desired {
                prop_assert!(subs.is_active(*l));
            }
            prop_assert!(subs.active().len() <= desired.len());
        }
        commands.extend(subs.stop_all());
        prop_assert!(subs.active().is_empty());

        let mut live: Vec<u64> = Vec::new();
        for command in &commands {
            match command {
                SubscriptionCommand::Start(l) => {
                    prop_assert!(!live.contains(&l.id()), "started twice: {:?}", l);
                    live.push(l.id());
                }
                SubscriptionCommand::Stop(l) => {
                    let pos = live.iter().position(|id| *id == l.id());
                    prop_assert!(pos.is_some(), "stopped while not running: {:?}", l);
                    if let Some(pos) = pos {
                        live.remove(pos);
                    }
                }
            }
        }
        prop_assert!(live.is_empty());
        prop_assert!(subs.stop_all().is_empty());
    }
}
