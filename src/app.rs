//! The event loop.
//!
//! One task owns the [`Daemon`]. Bus calls, surface events and settings
//! updates arrive as [`Input`] over a channel and are handled strictly in
//! arrival order; between inputs the loop sleeps until the next timer is due.

use crate::backend::{
    Display, Renderer, SurfaceEvent, SurfaceId,
    headless::{HeadlessRenderer, StaticDisplay},
};
use crate::constants::HEADLESS_SCREEN;
use crate::daemon::Daemon;
use crate::subscriptions::notifications::Conns;
use corner_notifications_config::{ConfigError, NotificationsConfig, SettingValue};
use corner_notifications_util::Notification;
use std::ops::ControlFlow;
use std::time::Instant;
use tokio::sync::oneshot;
use tracing::error;

#[derive(Debug)]
pub enum Input {
    Notify {
        notification: Notification,
        reply: oneshot::Sender<u32>,
    },
    CloseNotification(u32),
    /// Forwarded by the toolkit binding
    Surface(SurfaceId, SurfaceEvent),
    TopologyChanged,
    Setting {
        key: String,
        value: SettingValue,
        reply: oneshot::Sender<Result<(), ConfigError>>,
    },
    Quit,
}

/// Run the daemon until it is asked to quit.
pub async fn run(config: NotificationsConfig) -> anyhow::Result<()> {
    let (width, height) = HEADLESS_SCREEN;
    let daemon = Daemon::new(
        config,
        HeadlessRenderer::new(true),
        StaticDisplay::single(width, height),
    );

    let machine = Machine::<Start, _, _>::new(daemon);
    let (waiting, conns) = machine.exec().await?;
    waiting.exec(conns).await;

    Ok(())
}

struct Start;
struct Waiting;

struct Machine<S, R, D> {
    daemon: Daemon<R, D>,
    marker: core::marker::PhantomData<S>,
}

impl<S, R: Renderer, D: Display> Machine<S, R, D> {
    pub fn new(daemon: Daemon<R, D>) -> Self {
        Self {
            daemon,
            marker: core::marker::PhantomData,
        }
    }

    pub fn transition<Next>(self) -> Machine<Next, R, D> {
        Machine::<Next, R, D> {
            daemon: self.daemon,
            marker: core::marker::PhantomData,
        }
    }
}

impl<R: Renderer, D: Display> Machine<Start, R, D> {
    pub async fn exec(self) -> zbus::Result<(Machine<Waiting, R, D>, Conns)> {
        match Conns::new().await {
            Ok(conns) => {
                tracing::info!("Serving notifications");
                Ok((self.transition::<Waiting>(), conns))
            }
            Err(err) => {
                error!("Failed to create connection {}", err);
                Err(err)
            }
        }
    }
}

impl<R: Renderer, D: Display> Machine<Waiting, R, D> {
    pub async fn exec(mut self, mut conns: Conns) {
        loop {
            let deadline = self.daemon.next_deadline();
            tokio::select! {
                next = conns.rx.recv() => {
                    // The channel was closed, so we are done
                    let Some(input) = next else {
                        return;
                    };
                    if handle(&mut self.daemon, input, Instant::now()).is_break() {
                        tracing::info!("Quitting");
                        return;
                    }
                }
                _ = sleep_until(deadline) => {
                    self.daemon.run_due(Instant::now());
                }
            }

            for signal in self.daemon.drain_signals() {
                conns.emit(&signal).await;
            }
        }
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline.into()).await,
        None => std::future::pending().await,
    }
}

/// Apply one input to the daemon. Breaks on `Quit`.
pub fn handle<R: Renderer, D: Display>(
    daemon: &mut Daemon<R, D>,
    input: Input,
    now: Instant,
) -> ControlFlow<()> {
    match input {
        Input::Notify {
            notification,
            reply,
        } => {
            let id = daemon.notify(notification, now);
            if reply.send(id).is_err() {
                tracing::debug!("Caller of notification {} went away", id);
            }
        }
        Input::CloseNotification(id) => daemon.close_notification(id),
        Input::Surface(surface, event) => daemon.surface_event(surface, event, now),
        Input::TopologyChanged => daemon.topology_changed(now),
        Input::Setting { key, value, reply } => {
            let result = daemon.apply_setting(&key, value, now);
            if let Err(err) = &result {
                tracing::warn!("{}", err);
            }
            _ = reply.send(result);
        }
        Input::Quit => return ControlFlow::Break(()),
    }

    ControlFlow::Continue(())
}
