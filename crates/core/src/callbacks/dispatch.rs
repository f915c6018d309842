//! Engine callback entry point
//!
//! The single function the engine bridge invokes on the audio thread for
//! every event callback. Lifetime decisions happen under the registry lock;
//! handler invocation and package deallocation happen outside it.

use soundlink_sdk::{CallbackType, EventCallbackInfo};

use super::package::PackageKey;
use super::registry::CallbackRegistry;

impl CallbackRegistry {
    /// Dispatch one engine callback to its registered package
    ///
    /// Resolves the package from `info.package`; unknown or stale cookies
    /// are silent no-ops (the engine can signal for a package that is
    /// already gone). On `END_OF_EVENT` the package is unregistered from
    /// the map *before* its handler runs, so a concurrent
    /// [`remove_package`](Self::remove_package) or
    /// [`unregister_game_object`](Self::unregister_game_object) racing
    /// with event completion resolves to exactly one winner at the map.
    pub fn dispatch_event(&self, event_type: CallbackType, info: &EventCallbackInfo) {
        if info.package == 0 {
            return;
        }
        let key = PackageKey::from_cookie(info.package);
        let game_object = info.game_object;

        let package = {
            let mut state = self.state.lock();
            if event_type.contains(CallbackType::END_OF_EVENT)
                && state.by_object.contains_key(&game_object)
            {
                // The event is over; this removal is the serialization
                // point deciding who frees the package.
                let package = state.packages.remove(key);
                if package.is_some() {
                    self.remove_from_set(&mut state, key, game_object);
                }
                package
            } else {
                state.packages.get(key).cloned()
            }
        };

        let Some(package) = package else {
            return;
        };

        if package.flags().intersects(event_type) {
            package.handle(event_type, info, &self.tasks);
        }

        // Last reference frees the package here, after the handler has
        // returned and with the lock released.
        drop(package);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
    use std::sync::Arc;

    use soundlink_sdk::{
        CallbackType, EventCallbackInfo, GameObjectId, PlayingId,
    };

    use crate::callbacks::registry::tests::{drop_tracking_delegate, test_registry};
    use crate::callbacks::{CallbackKind, DelegateEventInfo, LatentAction, PackageKey};
    use crate::config::CallbackConfig;

    fn info_for(key: PackageKey, game_object: GameObjectId) -> EventCallbackInfo {
        let mut info = EventCallbackInfo::new(game_object, PlayingId(1));
        info.package = key.to_cookie();
        info
    }

    static EOE_INVOKED: AtomicUsize = AtomicUsize::new(0);
    static EOE_USER_DATA: AtomicU64 = AtomicU64::new(0);

    fn recording_callback(event_type: CallbackType, info: &EventCallbackInfo) {
        assert_eq!(event_type, CallbackType::END_OF_EVENT);
        EOE_INVOKED.fetch_add(1, Ordering::Relaxed);
        EOE_USER_DATA.store(info.user_data, Ordering::Relaxed);
    }

    #[test]
    fn test_end_of_event_invokes_once_with_user_data_and_frees() {
        let (registry, _queue, _) = test_registry(&CallbackConfig::default());
        let id = GameObjectId(42);

        let key = registry.create_function_callback(
            Some(recording_callback),
            0xC0FFEE,
            CallbackType::END_OF_EVENT,
            id,
        );
        assert!(registry.has_active_events(id));

        let info = info_for(key, id);
        registry.dispatch_event(CallbackType::END_OF_EVENT, &info);

        assert_eq!(EOE_INVOKED.load(Ordering::Relaxed), 1);
        assert_eq!(EOE_USER_DATA.load(Ordering::Relaxed), 0xC0FFEE);
        assert!(!registry.has_active_events(id));

        // The engine signalling again for the freed package is a no-op
        registry.dispatch_event(CallbackType::END_OF_EVENT, &info);
        assert_eq!(EOE_INVOKED.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_end_of_event_frees_even_when_not_subscribed() {
        let (registry, queue, _) = test_registry(&CallbackConfig::default());
        let id = GameObjectId(6);
        let drops = Arc::new(AtomicUsize::new(0));

        // Subscribed to markers only; completion still ends the lifetime
        let key =
            registry.create_delegate_callback(drop_tracking_delegate(&drops), CallbackType::MARKER, id);

        registry.dispatch_event(CallbackType::END_OF_EVENT, &info_for(key, id));

        assert_eq!(queue.len(), 0);
        assert_eq!(drops.load(Ordering::Relaxed), 1);
        assert!(!registry.has_active_events(id));
    }

    #[test]
    fn test_intermediate_callback_keeps_package_alive() {
        let (registry, queue, _) = test_registry(&CallbackConfig::default());
        let id = GameObjectId(8);
        let hits = Arc::new(AtomicUsize::new(0));

        let hits_clone = Arc::clone(&hits);
        let key = registry.create_delegate_callback(
            Arc::new(move |kind, _info: DelegateEventInfo| {
                assert_eq!(kind, CallbackKind::MusicSyncBeat);
                hits_clone.fetch_add(1, Ordering::Relaxed);
            }),
            CallbackType::MUSIC_SYNC_BEAT,
            id,
        );

        let info = info_for(key, id);
        registry.dispatch_event(CallbackType::MUSIC_SYNC_BEAT, &info);
        registry.dispatch_event(CallbackType::MUSIC_SYNC_BEAT, &info);

        assert_eq!(queue.process(), 2);
        assert_eq!(hits.load(Ordering::Relaxed), 2);
        assert!(registry.has_active_events(id));
    }

    #[test]
    fn test_unknown_and_stale_cookies_are_noops() {
        let (registry, queue, _) = test_registry(&CallbackConfig::default());
        let id = GameObjectId(3);

        // Unset cookie
        let info = EventCallbackInfo::new(id, PlayingId(1));
        registry.dispatch_event(CallbackType::END_OF_EVENT, &info);

        // Garbage cookie
        let mut info = EventCallbackInfo::new(id, PlayingId(1));
        info.package = 0xBAD0_BAD0_BAD0_BAD0;
        registry.dispatch_event(CallbackType::END_OF_EVENT, &info);

        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn test_dispatch_after_unregister_is_noop() {
        let (registry, queue, _) = test_registry(&CallbackConfig::default());
        let id = GameObjectId(11);
        let drops = Arc::new(AtomicUsize::new(0));

        let key = registry.create_delegate_callback(
            drop_tracking_delegate(&drops),
            CallbackType::END_OF_EVENT,
            id,
        );
        registry.unregister_game_object(id);
        assert_eq!(drops.load(Ordering::Relaxed), 1);

        registry.dispatch_event(CallbackType::END_OF_EVENT, &info_for(key, id));
        assert_eq!(queue.len(), 0);
        assert_eq!(drops.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_latent_action_resumed_on_end_of_event() {
        let (registry, _queue, _) = test_registry(&CallbackConfig::default());
        let id = GameObjectId(14);

        let action = LatentAction::new();
        let key = registry.create_latent_callback(&action, id);

        registry.dispatch_event(CallbackType::END_OF_EVENT, &info_for(key, id));

        assert!(action.is_finished());
        assert!(!registry.has_active_events(id));
    }

    #[test]
    fn test_concurrent_completion_and_removal_single_winner() {
        let (registry, queue, _) = test_registry(&CallbackConfig::default());
        let id = GameObjectId(21);
        let invoked = Arc::new(AtomicUsize::new(0));
        let drops = Arc::new(AtomicUsize::new(0));

        struct CountOnDrop(Arc<AtomicUsize>);
        impl Drop for CountOnDrop {
            fn drop(&mut self) {
                self.0.fetch_add(1, Ordering::Relaxed);
            }
        }

        for round in 0..200 {
            let guard = CountOnDrop(Arc::clone(&drops));
            let invoked_clone = Arc::clone(&invoked);
            let key = registry.create_delegate_callback(
                Arc::new(move |_, _| {
                    let _ = &guard;
                    invoked_clone.fetch_add(1, Ordering::Relaxed);
                }),
                CallbackType::END_OF_EVENT,
                id,
            );
            let info = info_for(key, id);

            std::thread::scope(|scope| {
                scope.spawn(|| registry.dispatch_event(CallbackType::END_OF_EVENT, &info));
                scope.spawn(|| registry.remove_package(key, id));
            });

            // The handler ran at most once, and only if the dispatch won
            // the race. Processing the queue releases the last delegate
            // reference, so exactly one free per round is observable here.
            let processed = queue.process();
            assert!(processed <= 1);
            assert_eq!(drops.load(Ordering::Relaxed), round + 1);
            assert!(!registry.has_active_events(id));
        }

        assert!(invoked.load(Ordering::Relaxed) <= 200);
    }
}
