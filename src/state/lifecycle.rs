use super::scheduler::{Scheduler, Task, TaskHandle};
use crate::constants::{FADE_STEPS, FADE_TICK, HOVER_OPACITY, OPACITY_EPSILON, SLIDE_STEP, SLIDE_TICK};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Created but not placed yet
    Pending,
    /// Visible with no expiration running
    Displayed,
    /// Visible with the expiration timer running
    Expiring,
    FadingOut,
    Closed,
}

/// How an expired notification leaves the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeMode {
    /// Close right away
    Instant,
    Fade,
    /// Fade at twice the tick rate while moving sideways; the sign of the
    /// step gives the direction
    Slide(i32),
}

impl FadeMode {
    pub fn new(fade: bool, slide: bool, toward_right: Option<bool>) -> Self {
        match (fade, slide, toward_right) {
            (false, _, _) => FadeMode::Instant,
            (true, true, Some(true)) => FadeMode::Slide(SLIDE_STEP),
            (true, true, Some(false)) => FadeMode::Slide(-SLIDE_STEP),
            (true, true, None) => {
                tracing::warn!("Cannot slide out without a valid notify location");
                FadeMode::Slide(0)
            }
            (true, false, _) => FadeMode::Fade,
        }
    }

    fn tick(self) -> Duration {
        match self {
            FadeMode::Slide(_) => SLIDE_TICK,
            _ => FADE_TICK,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Nothing to do; a stale or foreign timer fired
    Ignored,
    /// Visual state changed, keep going
    Updated,
    /// The notification must close as expired
    Close,
}

/// Per-notification display state machine and its timers.
///
/// Timer handles live here so that every transition cancels exactly the
/// timers it supersedes.
#[derive(Debug)]
pub struct Lifecycle {
    id: u32,
    state: State,
    timeout: Option<Duration>,
    normal_opacity: f64,
    opacity: f64,
    slide_offset: i32,
    fade_mode: FadeMode,
    hovered: bool,
    expire: Option<TaskHandle>,
    fade: Option<TaskHandle>,
}

impl Lifecycle {
    /// `timeout_ms` of 0 never expires.
    pub fn new(id: u32, timeout_ms: u32, normal_opacity: f64) -> Self {
        Self {
            id,
            state: State::Pending,
            timeout: timeout_from_ms(timeout_ms),
            normal_opacity,
            opacity: normal_opacity,
            slide_offset: 0,
            fade_mode: FadeMode::Instant,
            hovered: false,
            expire: None,
            fade: None,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Horizontal distance slid away from the reserved position
    pub fn slide_offset(&self) -> i32 {
        self.slide_offset
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn expire_handle(&self) -> Option<TaskHandle> {
        self.expire
    }

    pub fn fade_handle(&self) -> Option<TaskHandle> {
        self.fade
    }

    /// First successful placement.
    pub fn show(&mut self, scheduler: &mut Scheduler, now: Instant) {
        if self.state == State::Pending {
            self.start_expiration(scheduler, now);
        }
    }

    /// Cancel pending timers and restart the display time from `now`.
    fn start_expiration(&mut self, scheduler: &mut Scheduler, now: Instant) {
        self.cancel_timers(scheduler);
        self.opacity = self.normal_opacity;
        self.slide_offset = 0;

        match self.timeout {
            Some(timeout) if !self.hovered => {
                self.expire = Some(scheduler.schedule(now + timeout, Task::Expire(self.id)));
                self.state = State::Expiring;
            }
            _ => self.state = State::Displayed,
        }
    }

    pub fn pointer_enter(&mut self, scheduler: &mut Scheduler) {
        self.hovered = true;
        if matches!(self.state, State::Pending | State::Closed) {
            return;
        }

        self.cancel_timers(scheduler);
        self.opacity = HOVER_OPACITY;
        self.slide_offset = 0;
        self.state = State::Displayed;
    }

    pub fn pointer_leave(&mut self, scheduler: &mut Scheduler, now: Instant) {
        self.hovered = false;
        if matches!(self.state, State::Pending | State::Closed) {
            return;
        }

        self.start_expiration(scheduler, now);
    }

    /// The expiration timer fired.
    pub fn expire(
        &mut self,
        scheduler: &mut Scheduler,
        now: Instant,
        handle: TaskHandle,
        mode: FadeMode,
    ) -> Step {
        if self.state != State::Expiring || self.expire != Some(handle) {
            return Step::Ignored;
        }
        self.expire = None;

        if mode == FadeMode::Instant {
            return Step::Close;
        }

        self.fade_mode = mode;
        self.state = State::FadingOut;
        self.fade = Some(scheduler.schedule(now + mode.tick(), Task::FadeTick(self.id)));
        Step::Updated
    }

    /// A fade timer fired: lower the opacity one step and slide if asked to.
    pub fn fade_tick(&mut self, scheduler: &mut Scheduler, now: Instant, handle: TaskHandle) -> Step {
        if self.state != State::FadingOut || self.fade != Some(handle) {
            return Step::Ignored;
        }
        self.fade = None;

        if let FadeMode::Slide(step) = self.fade_mode {
            self.slide_offset += step;
        }

        let delta = self.normal_opacity / FADE_STEPS as f64;
        self.opacity = (self.opacity - delta).max(0.0);

        if self.opacity <= OPACITY_EPSILON {
            return Step::Close;
        }

        self.fade = Some(scheduler.schedule(
            now + self.fade_mode.tick(),
            Task::FadeTick(self.id),
        ));
        Step::Updated
    }

    /// New content arrived for this notification: reset display time and opacity.
    pub fn replace(
        &mut self,
        scheduler: &mut Scheduler,
        now: Instant,
        timeout_ms: u32,
        normal_opacity: f64,
    ) {
        self.timeout = timeout_from_ms(timeout_ms);
        self.normal_opacity = normal_opacity;

        match self.state {
            State::Pending => self.opacity = normal_opacity,
            State::Closed => {}
            _ if self.hovered => {
                self.cancel_timers(scheduler);
                self.opacity = HOVER_OPACITY;
                self.slide_offset = 0;
                self.state = State::Displayed;
            }
            _ => self.start_expiration(scheduler, now),
        }
    }

    /// Enter `Closed`. Returns false if it was already closed.
    pub fn close(&mut self, scheduler: &mut Scheduler) -> bool {
        if self.state == State::Closed {
            return false;
        }
        self.cancel_timers(scheduler);
        self.state = State::Closed;
        true
    }

    fn cancel_timers(&mut self, scheduler: &mut Scheduler) {
        if let Some(handle) = self.expire.take() {
            scheduler.cancel(handle);
        }
        if let Some(handle) = self.fade.take() {
            scheduler.cancel(handle);
        }
    }
}

fn timeout_from_ms(timeout_ms: u32) -> Option<Duration> {
    (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms as u64))
}
