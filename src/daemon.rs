//! The notification daemon core.
//!
//! [`Daemon`] owns every notification, the reserved screen space and the
//! timers. It is driven from a single event loop: bus requests, surface
//! events, topology changes and due timers all come in through its methods,
//! and outbound bus signals queue up until [`Daemon::drain_signals`].

use crate::backend::{Content, Display, Renderer, SurfaceEvent, SurfaceId};
use crate::config::VERSION;
use crate::state::{
    lifecycle::{FadeMode, Lifecycle, State, Step},
    monitors::Monitors,
    placement::{Corner, PlacementEngine},
    registry::{NotificationEntry, Registry},
    scheduler::{Scheduler, Task},
};
use corner_notifications_config::{ConfigError, NotificationsConfig, SettingValue};
use corner_notifications_util::{CloseReason, Notification};
use std::time::Instant;

pub const CAPABILITIES: [&str; 6] = [
    "actions",
    "body",
    "body-hyperlinks",
    "body-markup",
    "icon-static",
    "x-canonical-private-icon-only",
];

pub const SERVER_NAME: &str = "Corner Notify Daemon";
pub const SERVER_VENDOR: &str = "Corner";
pub const SPEC_VERSION: &str = "1.2";

/// (name, vendor, version, spec_version)
pub fn server_information() -> (&'static str, &'static str, &'static str, &'static str) {
    (SERVER_NAME, SERVER_VENDOR, VERSION, SPEC_VERSION)
}

/// Outbound bus signal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    ActionInvoked { id: u32, action: String },
    NotificationClosed { id: u32, reason: CloseReason },
}

pub struct Daemon<R, D> {
    config: NotificationsConfig,
    renderer: R,
    display: D,
    monitors: Monitors,
    placement: PlacementEngine,
    registry: Registry,
    scheduler: Scheduler,
    signals: Vec<Signal>,
}

impl<R: Renderer, D: Display> Daemon<R, D> {
    pub fn new(config: NotificationsConfig, renderer: R, display: D) -> Self {
        let mut monitors = Monitors::new();
        monitors.refresh(&display);

        Self {
            config,
            renderer,
            display,
            monitors,
            placement: PlacementEngine::default(),
            registry: Registry::new(),
            scheduler: Scheduler::new(),
            signals: Vec::new(),
        }
    }

    /// Handle a `Notify` request and return the id of the notification.
    pub fn notify(&mut self, notification: Notification, now: Instant) -> u32 {
        let timeout = notification.urgency().effective_timeout(
            notification.expire_timeout,
            self.config.expire_timeout_default_ms(),
        );

        // critical notifications never expire and get through
        if timeout != 0 && self.config.do_not_disturb {
            let id = self.registry.generate_id();
            tracing::debug!(
                "Do not disturb, hiding notification {} from {}",
                id,
                notification.app_name
            );
            return id;
        }

        let content = Content::from(&notification);
        let transient = notification.transient();

        let replaces_id = notification.replaces_id;
        if replaces_id != 0 {
            if self.registry.contains(replaces_id) {
                self.replace(replaces_id, content, transient, timeout, now);
                return replaces_id;
            }
            tracing::debug!(
                "Notification {} to replace is gone, showing a new one",
                replaces_id
            );
        }

        let id = self.registry.generate_id();
        let opacity = self.config.initial_opacity;
        let surface = self.renderer.create_surface(&content);
        self.renderer.set_opacity(surface, opacity);
        let size = self.renderer.size(surface);

        self.registry.insert(NotificationEntry {
            id,
            content,
            transient,
            surface,
            size,
            placement: None,
            lifecycle: Lifecycle::new(id, timeout, opacity),
        });
        self.place(id, now);

        id
    }

    fn replace(&mut self, id: u32, content: Content, transient: bool, timeout: u32, now: Instant) {
        let opacity = self.config.initial_opacity;
        let Some(entry) = self.registry.get_mut(id) else {
            return;
        };

        self.renderer.update_content(entry.surface, &content);
        entry.content = content;
        entry.transient = transient;
        entry
            .lifecycle
            .replace(&mut self.scheduler, now, timeout, opacity);
        self.renderer
            .set_opacity(entry.surface, entry.lifecycle.opacity());

        let size = self.renderer.size(entry.surface);
        if let Some(placement) = entry.placement.filter(|_| size == entry.size) {
            // same slot, but undo a slide that was in progress
            self.renderer
                .move_to(entry.surface, placement.rect.x, placement.rect.y);
            return;
        }

        entry.size = size;
        self.place(id, now);
    }

    /// Handle a `CloseNotification` request. Unknown ids are ignored.
    pub fn close_notification(&mut self, id: u32) {
        if !self.close(id, CloseReason::CloseNotification) {
            tracing::debug!("No notification {} to close", id);
        }
    }

    pub fn surface_event(&mut self, surface: SurfaceId, event: SurfaceEvent, now: Instant) {
        let Some(id) = self.registry.by_surface(surface) else {
            tracing::trace!("Event {:?} for unknown surface {:?}", event, surface);
            return;
        };

        match event {
            SurfaceEvent::PointerEnter => {
                if let Some(entry) = self.registry.get_mut(id) {
                    entry.lifecycle.pointer_enter(&mut self.scheduler);
                }
                self.sync_surface(id);
            }
            SurfaceEvent::PointerLeave => {
                if let Some(entry) = self.registry.get_mut(id) {
                    entry.lifecycle.pointer_leave(&mut self.scheduler, now);
                }
                self.sync_surface(id);
            }
            SurfaceEvent::ButtonRelease => {
                self.close(id, CloseReason::Dismissed);
            }
            SurfaceEvent::ActionClicked(action) => {
                let offered = self.registry.get(id).is_some_and(|entry| {
                    entry
                        .content
                        .actions
                        .iter()
                        .any(|offered_action| offered_action.id.to_string() == action)
                });
                if !offered {
                    tracing::warn!("Notification {} has no action {:?}", id, action);
                    return;
                }
                tracing::trace!("action clicked for {id}: {action}");
                self.signals.push(Signal::ActionInvoked { id, action });
                self.close(id, CloseReason::Dismissed);
            }
            SurfaceEvent::SizeAllocated { width, height } => {
                let Some(entry) = self.registry.get_mut(id) else {
                    return;
                };
                if entry.size != (width, height) {
                    entry.size = (width, height);
                    self.place(id, now);
                }
            }
        }
    }

    /// Run every timer due at `now`.
    pub fn run_due(&mut self, now: Instant) {
        while let Some((handle, task)) = self.scheduler.pop_due(now) {
            let id = task.notification();
            let step = match task {
                Task::Expire(_) => {
                    let mode = self.fade_mode();
                    self.registry.get_mut(id).map_or(Step::Ignored, |entry| {
                        entry
                            .lifecycle
                            .expire(&mut self.scheduler, now, handle, mode)
                    })
                }
                Task::FadeTick(_) => self.registry.get_mut(id).map_or(Step::Ignored, |entry| {
                    entry.lifecycle.fade_tick(&mut self.scheduler, now, handle)
                }),
            };

            match step {
                Step::Ignored => tracing::trace!("Stale {:?}", task),
                Step::Updated => self.sync_surface(id),
                Step::Close => {
                    self.close(id, CloseReason::Expired);
                }
            }
        }
    }

    /// Monitors or dock struts changed: recompute workareas and lay every
    /// notification out again from scratch.
    pub fn topology_changed(&mut self, now: Instant) {
        self.monitors.refresh(&self.display);
        self.placement.clear();

        let ids = self.registry.ids();
        for &id in &ids {
            if let Some(entry) = self.registry.get_mut(id) {
                entry.placement = None;
                entry.size = self.renderer.size(entry.surface);
            }
        }
        for id in ids {
            self.place(id, now);
        }
    }

    /// Apply a pushed settings update.
    pub fn apply_setting(
        &mut self,
        key: &str,
        value: SettingValue,
        now: Instant,
    ) -> Result<(), ConfigError> {
        self.config.apply(key, value)?;
        tracing::debug!("Setting {} updated", key);

        if key == "notify-location" {
            // notifications left unplaced by a bad location get another try
            for id in self.registry.ids() {
                if self
                    .registry
                    .get(id)
                    .is_some_and(|entry| entry.lifecycle.state() == State::Pending)
                {
                    self.place(id, now);
                }
            }
        }

        Ok(())
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    pub fn drain_signals(&mut self) -> Vec<Signal> {
        std::mem::take(&mut self.signals)
    }

    /// Reserve a slot for the notification and move its surface there.
    /// The first successful placement shows it.
    fn place(&mut self, id: u32, now: Instant) {
        let corner = match Corner::try_from(self.config.notify_location) {
            Ok(corner) => corner,
            Err(location) => {
                tracing::warn!("Invalid notify location: {}", location);
                return;
            }
        };

        let monitor = self.target_monitor();
        let Some(workarea) = self.monitors.workarea(monitor) else {
            tracing::warn!("No monitor to show notification {} on", id);
            return;
        };

        let Some(entry) = self.registry.get_mut(id) else {
            return;
        };
        if let Some(old) = entry.placement.take() {
            self.placement.release(old.reservation);
        }

        let placement = self.placement.place(workarea, monitor, entry.size, corner);
        tracing::trace!(
            "Notification {} at {:?} on monitor {}",
            id,
            placement.rect,
            monitor
        );
        entry.placement = Some(placement);
        self.renderer.move_to(
            entry.surface,
            placement.rect.x + entry.lifecycle.slide_offset(),
            placement.rect.y,
        );

        if entry.lifecycle.state() == State::Pending {
            entry.lifecycle.show(&mut self.scheduler, now);
            self.renderer
                .set_opacity(entry.surface, entry.lifecycle.opacity());
        }
    }

    fn target_monitor(&self) -> usize {
        if self.config.primary_monitor {
            self.monitors.primary()
        } else {
            let (x, y) = self.display.pointer_position();
            self.monitors.monitor_at(x, y)
        }
    }

    fn fade_mode(&self) -> FadeMode {
        let fade = self.config.do_fadeout && self.renderer.supports_translucency();
        let toward_right = Corner::try_from(self.config.notify_location)
            .ok()
            .map(Corner::is_right);
        FadeMode::new(fade, self.config.do_slideout, toward_right)
    }

    /// Push the lifecycle's opacity and slide position to the renderer.
    fn sync_surface(&mut self, id: u32) {
        let Some(entry) = self.registry.get(id) else {
            return;
        };

        self.renderer
            .set_opacity(entry.surface, entry.lifecycle.opacity());
        if let Some(placement) = entry.placement {
            self.renderer.move_to(
                entry.surface,
                placement.rect.x + entry.lifecycle.slide_offset(),
                placement.rect.y,
            );
        }
    }

    /// Close a notification, free its slot and queue the closed signal.
    fn close(&mut self, id: u32, reason: CloseReason) -> bool {
        let Some(mut entry) = self.registry.remove(id) else {
            return false;
        };

        entry.lifecycle.close(&mut self.scheduler);
        if let Some(placement) = entry.placement {
            self.placement.release(placement.reservation);
        }
        self.renderer.destroy(entry.surface);

        tracing::debug!("Notification {} closed: {:?}", id, reason);
        self.signals.push(Signal::NotificationClosed { id, reason });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::headless::{HeadlessRenderer, StaticDisplay};
    use crate::constants::{FADE_STEPS, SLIDE_STEP};
    use corner_notifications_config::{BOTTOM_RIGHT, TOP_LEFT};
    use corner_notifications_util::{ActionId, Hint, Image, NotificationAction, Rect, StrutPartial};
    use std::path::PathBuf;
    use std::time::Duration;

    type TestDaemon = Daemon<HeadlessRenderer, StaticDisplay>;

    fn daemon_with(config: NotificationsConfig, display: StaticDisplay) -> TestDaemon {
        Daemon::new(config, HeadlessRenderer::new(true), display)
    }

    fn daemon() -> TestDaemon {
        daemon_with(
            NotificationsConfig::default(),
            StaticDisplay::single(1920, 1080),
        )
    }

    fn request(summary: &str, hints: Vec<Hint>, expire_timeout: i32) -> Notification {
        Notification {
            replaces_id: 0,
            app_name: "test".to_string(),
            app_icon: String::new(),
            summary: summary.to_string(),
            body: String::new(),
            actions: Vec::new(),
            hints,
            expire_timeout,
        }
    }

    fn entry(daemon: &TestDaemon, id: u32) -> &NotificationEntry {
        daemon.registry.get(id).unwrap()
    }

    fn rect(daemon: &TestDaemon, id: u32) -> Rect {
        entry(daemon, id).placement.unwrap().rect
    }

    fn closed(daemon: &mut TestDaemon) -> Vec<(u32, CloseReason)> {
        daemon
            .drain_signals()
            .into_iter()
            .filter_map(|signal| match signal {
                Signal::NotificationClosed { id, reason } => Some((id, reason)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_ids_are_unique_and_nonzero() {
        let now = Instant::now();
        let mut daemon = daemon();
        daemon.registry.set_next_id(u32::MAX - 2);

        let ids: Vec<u32> = (0..6)
            .map(|i| daemon.notify(request(&format!("n{}", i), Vec::new(), -1), now))
            .collect();

        assert!(!ids.contains(&0));
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(daemon.registry.len(), 6);
    }

    #[test]
    fn test_replacement_keeps_id_and_slot() {
        let now = Instant::now();
        let mut daemon = daemon();
        let id = daemon.notify(request("Downloading", Vec::new(), -1), now);
        let before = entry(&daemon, id).placement.unwrap();

        let mut update = request("Downloaded", Vec::new(), -1);
        update.replaces_id = id;
        assert_eq!(daemon.notify(update, now), id);

        assert_eq!(daemon.registry.len(), 1);
        let entry = entry(&daemon, id);
        assert_eq!(entry.content.summary, "Downloaded");
        assert_eq!(entry.placement, Some(before));
        assert_eq!(daemon.placement.len(), 1);
        assert_eq!(
            daemon.renderer.surface(entry.surface).unwrap().content.summary,
            "Downloaded"
        );
    }

    #[test]
    fn test_replacing_unknown_id_creates_new_notification() {
        let now = Instant::now();
        let mut daemon = daemon();

        let mut stale = request("Hello", Vec::new(), -1);
        stale.replaces_id = 42;
        let id = daemon.notify(stale, now);

        assert_ne!(id, 42);
        assert!(daemon.registry.contains(id));
    }

    #[test]
    fn test_replacement_with_new_size_moves() {
        let now = Instant::now();
        let mut daemon = daemon();
        let id = daemon.notify(request("short", Vec::new(), -1), now);
        let before = rect(&daemon, id);

        let mut update = request("long", Vec::new(), -1);
        update.body = "one\ntwo\nthree".to_string();
        update.replaces_id = id;
        daemon.notify(update, now);

        let after = rect(&daemon, id);
        assert!(after.height > before.height);
        assert_eq!(after.bottom(), before.bottom());
        assert_eq!(daemon.placement.len(), 1);
    }

    #[test]
    fn test_placements_do_not_overlap() {
        let now = Instant::now();
        let mut daemon = daemon();

        for i in 0..30 {
            daemon.notify(request(&format!("n{}", i), Vec::new(), 0), now);
        }

        let placements: Vec<_> = daemon
            .registry
            .ids()
            .into_iter()
            .filter_map(|id| entry(&daemon, id).placement)
            .filter(|p| !p.fallback)
            .collect();
        assert_eq!(placements.len(), 30);
        for (i, a) in placements.iter().enumerate() {
            for b in &placements[i + 1..] {
                assert!(!a.rect.intersects(&b.rect), "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_full_screen_falls_back_to_corner() {
        let now = Instant::now();
        let mut daemon = daemon_with(
            NotificationsConfig::default(),
            StaticDisplay::single(300, 56),
        );

        let first = daemon.notify(request("first", Vec::new(), 0), now);
        let second = daemon.notify(request("second", Vec::new(), 0), now);

        assert!(!entry(&daemon, first).placement.unwrap().fallback);
        assert!(entry(&daemon, second).placement.unwrap().fallback);
        assert_eq!(rect(&daemon, first), rect(&daemon, second));
    }

    #[test]
    fn test_close_releases_only_own_rectangle() {
        let now = Instant::now();
        let mut daemon = daemon();
        let ids: Vec<u32> = (0..3)
            .map(|i| daemon.notify(request(&format!("n{}", i), Vec::new(), 0), now))
            .collect();
        let before: Vec<_> = daemon.placement.reservations(0).collect();
        let removed = entry(&daemon, ids[1]).placement.unwrap().reservation;

        daemon.close_notification(ids[1]);

        let mut expected = before.clone();
        expected.retain(|(reservation, _)| *reservation != removed);
        assert_eq!(expected.len(), 2);
        assert_eq!(daemon.placement.reservations(0).collect::<Vec<_>>(), expected);
        assert_eq!(closed(&mut daemon), vec![(ids[1], CloseReason::CloseNotification)]);

        // closing again is a no-op
        daemon.close_notification(ids[1]);
        assert!(daemon.drain_signals().is_empty());
    }

    #[test]
    fn test_critical_never_expires() {
        let now = Instant::now();
        let mut daemon = daemon();
        let id = daemon.notify(request("Battery low", vec![Hint::Urgency(2)], 5000), now);

        let entry = entry(&daemon, id);
        assert_eq!(entry.lifecycle.timeout(), None);
        assert_eq!(entry.lifecycle.state(), State::Displayed);
        assert_eq!(daemon.next_deadline(), None);
    }

    #[test]
    fn test_do_not_disturb() {
        let now = Instant::now();
        let config = NotificationsConfig {
            do_not_disturb: true,
            ..Default::default()
        };
        let mut daemon = daemon_with(config, StaticDisplay::single(1920, 1080));

        let hidden = daemon.notify(request("Chat", Vec::new(), 5000), now);
        assert_ne!(hidden, 0);
        assert!(daemon.registry.is_empty());
        assert_eq!(daemon.renderer.live_surfaces(), 0);

        let shown = daemon.notify(request("Battery low", vec![Hint::Urgency(2)], 5000), now);
        assert_ne!(shown, hidden);
        assert_eq!(entry(&daemon, shown).lifecycle.state(), State::Displayed);
    }

    #[test]
    fn test_hover_resets_timeout() {
        let start = Instant::now();
        let mut daemon = daemon();
        let id = daemon.notify(request("Hello", Vec::new(), 10_000), start);
        let surface = entry(&daemon, id).surface;

        let later = start + Duration::from_millis(8_000);
        daemon.run_due(later);
        daemon.surface_event(surface, SurfaceEvent::PointerEnter, later);
        assert_eq!(daemon.next_deadline(), None);
        assert_eq!(daemon.renderer.surface(surface).unwrap().opacity, 1.0);

        daemon.surface_event(surface, SurfaceEvent::PointerLeave, later);
        assert_eq!(
            daemon.next_deadline(),
            Some(later + Duration::from_millis(10_000))
        );
        assert_eq!(daemon.renderer.surface(surface).unwrap().opacity, 0.9);
    }

    #[test]
    fn test_topology_reflow_onto_remaining_monitor() {
        let now = Instant::now();
        let display = StaticDisplay::new(vec![
            Rect::new(0, 0, 1920, 1080),
            Rect::new(1920, 0, 1920, 1080),
        ]);
        let mut daemon = daemon_with(NotificationsConfig::default(), display);

        let a = daemon.notify(request("a", Vec::new(), 0), now);
        daemon.display.pointer = (2500, 500);
        let b = daemon.notify(request("b", Vec::new(), 0), now);
        let c = daemon.notify(request("c", Vec::new(), 0), now);
        assert_eq!(entry(&daemon, a).placement.unwrap().monitor, 0);
        assert_eq!(entry(&daemon, b).placement.unwrap().monitor, 1);

        daemon.display.monitors.truncate(1);
        daemon.topology_changed(now);

        let rects: Vec<Rect> = [a, b, c].iter().map(|&id| rect(&daemon, id)).collect();
        for id in [a, b, c] {
            assert_eq!(entry(&daemon, id).placement.unwrap().monitor, 0);
        }
        for (i, r) in rects.iter().enumerate() {
            assert!(r.right() <= 1920);
            for other in &rects[i + 1..] {
                assert!(!r.intersects(other));
            }
        }
        assert_eq!(daemon.placement.reservations(1).count(), 0);
        assert_eq!(daemon.placement.len(), 3);
    }

    #[test]
    fn test_notifications_avoid_bottom_panel() {
        let now = Instant::now();
        let mut display = StaticDisplay::single(1920, 1080);
        display.struts.push(StrutPartial {
            bottom: 40,
            bottom_start_x: 0,
            bottom_end_x: 1919,
            ..Default::default()
        });
        let mut daemon = daemon_with(NotificationsConfig::default(), display);

        let id = daemon.notify(request("Hello", Vec::new(), -1), now);
        assert_eq!(daemon.monitors.workarea(0), Some(Rect::new(0, 0, 1920, 1040)));
        assert_eq!(rect(&daemon, id).bottom(), 1040);
    }

    #[test]
    fn test_image_path_beats_app_icon() {
        let now = Instant::now();
        let mut daemon = daemon();
        let mut notification = request(
            "Photo",
            vec![Hint::ImagePath(Image::from_path_or_name("/tmp/a.png".to_string()))],
            -1,
        );
        notification.app_icon = "folder".to_string();

        let id = daemon.notify(notification, now);
        let surface = entry(&daemon, id).surface;
        assert_eq!(
            daemon.renderer.surface(surface).unwrap().content.icon,
            Some(Image::File(PathBuf::from("/tmp/a.png")))
        );
    }

    #[test]
    fn test_expire_without_translucency_closes() {
        let start = Instant::now();
        let mut daemon = Daemon::new(
            NotificationsConfig::default(),
            HeadlessRenderer::new(false),
            StaticDisplay::single(1920, 1080),
        );
        let id = daemon.notify(request("Hello", Vec::new(), 1000), start);

        daemon.run_due(start + Duration::from_millis(999));
        assert!(daemon.registry.contains(id));

        daemon.run_due(start + Duration::from_millis(1000));
        assert!(daemon.registry.is_empty());
        assert_eq!(daemon.placement.len(), 0);
        assert_eq!(daemon.renderer.live_surfaces(), 0);
        assert_eq!(closed(&mut daemon), vec![(id, CloseReason::Expired)]);
    }

    #[test]
    fn test_default_timeout_comes_from_config() {
        let now = Instant::now();
        let mut daemon = daemon();
        let id = daemon.notify(request("Hello", Vec::new(), -1), now);

        assert_eq!(
            entry(&daemon, id).lifecycle.timeout(),
            Some(Duration::from_secs(10))
        );
    }

    #[test]
    fn test_fade_out_then_close() {
        let start = Instant::now();
        let mut daemon = daemon();
        let id = daemon.notify(request("Hello", Vec::new(), 1000), start);
        let surface = entry(&daemon, id).surface;

        let mut now = start + Duration::from_millis(1000);
        daemon.run_due(now);
        assert_eq!(entry(&daemon, id).lifecycle.state(), State::FadingOut);

        let mut last_opacity = daemon.renderer.surface(surface).unwrap().opacity;
        for _ in 0..FADE_STEPS - 1 {
            now = daemon.next_deadline().unwrap();
            daemon.run_due(now);
            let opacity = daemon.renderer.surface(surface).unwrap().opacity;
            assert!(opacity < last_opacity);
            last_opacity = opacity;
        }
        assert!(daemon.registry.contains(id));

        now = daemon.next_deadline().unwrap();
        daemon.run_due(now);
        assert!(!daemon.registry.contains(id));
        assert_eq!(closed(&mut daemon), vec![(id, CloseReason::Expired)]);
    }

    #[test]
    fn test_slide_out_moves_toward_edge() {
        let start = Instant::now();
        let config = NotificationsConfig {
            do_slideout: true,
            notify_location: BOTTOM_RIGHT,
            ..Default::default()
        };
        let mut daemon = daemon_with(config, StaticDisplay::single(1920, 1080));
        let id = daemon.notify(request("Hello", Vec::new(), 1000), start);
        let surface = entry(&daemon, id).surface;
        let home = rect(&daemon, id);

        daemon.run_due(start + Duration::from_millis(1000));
        let tick = daemon.next_deadline().unwrap();
        daemon.run_due(tick);

        assert_eq!(
            daemon.renderer.surface(surface).unwrap().position,
            Some((home.x + SLIDE_STEP, home.y))
        );
        // the reservation does not slide
        assert_eq!(rect(&daemon, id), home);

        daemon.surface_event(surface, SurfaceEvent::PointerEnter, tick);
        assert_eq!(
            daemon.renderer.surface(surface).unwrap().position,
            Some((home.x, home.y))
        );
    }

    #[test]
    fn test_click_dismisses() {
        let now = Instant::now();
        let mut daemon = daemon();
        let id = daemon.notify(request("Hello", Vec::new(), -1), now);
        let surface = entry(&daemon, id).surface;

        daemon.surface_event(surface, SurfaceEvent::ButtonRelease, now);
        assert_eq!(closed(&mut daemon), vec![(id, CloseReason::Dismissed)]);
        assert_eq!(daemon.next_deadline(), None);

        // late events for the destroyed surface are ignored
        daemon.surface_event(surface, SurfaceEvent::ButtonRelease, now);
        assert!(daemon.drain_signals().is_empty());
    }

    #[test]
    fn test_action_click_invokes_then_dismisses() {
        let now = Instant::now();
        let mut daemon = daemon();
        let mut notification = request("Hello", Vec::new(), -1);
        notification.actions = vec![NotificationAction {
            id: ActionId::Custom("reply".to_string()),
            label: "Reply".to_string(),
        }];
        let id = daemon.notify(notification, now);
        let surface = entry(&daemon, id).surface;

        daemon.surface_event(surface, SurfaceEvent::ActionClicked("reply".to_string()), now);
        assert_eq!(
            daemon.drain_signals(),
            vec![
                Signal::ActionInvoked {
                    id,
                    action: "reply".to_string()
                },
                Signal::NotificationClosed {
                    id,
                    reason: CloseReason::Dismissed
                },
            ]
        );
    }

    #[test]
    fn test_unoffered_action_is_ignored() {
        let now = Instant::now();
        let mut daemon = daemon();
        let id = daemon.notify(request("Hello", Vec::new(), -1), now);
        let surface = entry(&daemon, id).surface;

        daemon.surface_event(surface, SurfaceEvent::ActionClicked("reply".to_string()), now);
        assert!(daemon.drain_signals().is_empty());
        assert!(daemon.registry.get(id).is_some());
    }

    #[test]
    fn test_size_allocation_replaces() {
        let now = Instant::now();
        let config = NotificationsConfig {
            notify_location: TOP_LEFT,
            ..Default::default()
        };
        let mut daemon = daemon_with(config, StaticDisplay::single(1920, 1080));
        let first = daemon.notify(request("first", Vec::new(), 0), now);
        let second = daemon.notify(request("second", Vec::new(), 0), now);
        let surface = entry(&daemon, first).surface;

        daemon.renderer.resize(surface, 300, 200);
        daemon.surface_event(
            surface,
            SurfaceEvent::SizeAllocated {
                width: 300,
                height: 200,
            },
            now,
        );

        let grown = rect(&daemon, first);
        assert_eq!(grown.height, 200);
        assert!(!grown.intersects(&rect(&daemon, second)));
        assert_eq!(daemon.placement.len(), 2);
    }

    #[test]
    fn test_invalid_location_leaves_notification_pending() {
        let now = Instant::now();
        let config = NotificationsConfig {
            notify_location: 9,
            ..Default::default()
        };
        let mut daemon = daemon_with(config, StaticDisplay::single(1920, 1080));

        let id = daemon.notify(request("Hello", Vec::new(), -1), now);
        let surface = entry(&daemon, id).surface;
        assert_eq!(entry(&daemon, id).lifecycle.state(), State::Pending);
        assert_eq!(daemon.renderer.surface(surface).unwrap().position, None);
        assert_eq!(daemon.next_deadline(), None);

        daemon
            .apply_setting("notify-location", SettingValue::Int(TOP_LEFT as i64), now)
            .unwrap();
        assert_eq!(entry(&daemon, id).lifecycle.state(), State::Expiring);
        assert_eq!(daemon.renderer.surface(surface).unwrap().position, Some((0, 0)));
    }

    #[test]
    fn test_primary_monitor_setting() {
        let now = Instant::now();
        let mut display = StaticDisplay::new(vec![
            Rect::new(0, 0, 1920, 1080),
            Rect::new(1920, 0, 1920, 1080),
        ]);
        display.primary = 1;
        let mut daemon = daemon_with(NotificationsConfig::default(), display);

        let on_pointer = daemon.notify(request("a", Vec::new(), 0), now);
        assert_eq!(entry(&daemon, on_pointer).placement.unwrap().monitor, 0);

        daemon
            .apply_setting("primary-monitor", SettingValue::Bool(true), now)
            .unwrap();
        let on_primary = daemon.notify(request("b", Vec::new(), 0), now);
        assert_eq!(entry(&daemon, on_primary).placement.unwrap().monitor, 1);

        assert!(
            daemon
                .apply_setting("primary-monitor", SettingValue::Double(1.0), now)
                .is_err()
        );
    }

    #[test]
    fn test_server_information() {
        let (name, vendor, version, spec_version) = server_information();
        assert_eq!(name, "Corner Notify Daemon");
        assert_eq!(vendor, "Corner");
        assert_eq!(version, env!("CARGO_PKG_VERSION"));
        assert_eq!(spec_version, "1.2");
        assert!(CAPABILITIES.contains(&"body-markup"));
    }
}
