use crate::{
    app::Input,
    config::{ADMIN_PATH, NOTIFICATIONS_NAME, NOTIFICATIONS_PATH},
    constants::{DBUS_CONNECT_ATTEMPTS, DBUS_RETRY_DELAY, INPUT_CHANNEL_CAPACITY},
    daemon::{self, Signal},
};
use corner_notifications_config::SettingValue;
use corner_notifications_util::Notification;
use std::collections::HashMap;
use tokio::sync::{
    mpsc::{Receiver, Sender, channel},
    oneshot,
};
use tracing::error;

use zbus::{
    Connection, connection::Builder as ConnectionBuilder, fdo, interface,
    object_server::SignalEmitter, zvariant::Value,
};

#[derive(Debug)]
pub struct Conns {
    notifications: Connection,
    pub tx: Sender<Input>,
    pub rx: Receiver<Input>,
}

impl Conns {
    /// Own the notification bus name and serve both interfaces.
    pub async fn new() -> zbus::Result<Self> {
        let (tx, rx) = channel(INPUT_CHANNEL_CAPACITY);

        for _ in 0..DBUS_CONNECT_ATTEMPTS {
            if let Some(conn) = ConnectionBuilder::session()
                .ok()
                .and_then(|conn| conn.name(NOTIFICATIONS_NAME).ok())
                .and_then(|conn| {
                    conn.serve_at(NOTIFICATIONS_PATH, Notifications(tx.clone()))
                        .ok()
                })
                .and_then(|conn| conn.serve_at(ADMIN_PATH, Admin(tx.clone())).ok())
                .map(ConnectionBuilder::build)
            {
                match conn.await {
                    Ok(conn) => {
                        return Ok(Self {
                            notifications: conn,
                            tx,
                            rx,
                        });
                    }
                    Err(err) => error!("Failed to connect to the session bus {}", err),
                }
            } else {
                error!("Failed to create connection at {}", NOTIFICATIONS_PATH);
            }
            tokio::time::sleep(DBUS_RETRY_DELAY).await;
        }

        Err(zbus::Error::Failure(
            "Failed to create the dbus server".to_string(),
        ))
    }

    pub async fn emit(&self, signal: &Signal) {
        let object_server = self.notifications.object_server();
        let Ok(iface_ref) = object_server
            .interface::<_, Notifications>(NOTIFICATIONS_PATH)
            .await
        else {
            error!("Notifications interface is not served, dropping {:?}", signal);
            return;
        };

        let result = match signal {
            Signal::ActionInvoked { id, action } => {
                Notifications::action_invoked(iface_ref.signal_emitter(), *id, action).await
            }
            Signal::NotificationClosed { id, reason } => {
                Notifications::notification_closed(iface_ref.signal_emitter(), *id, *reason as u32)
                    .await
            }
        };

        if let Err(err) = result {
            error!("Failed to signal {:?}: {}", signal, err);
        }
    }
}

pub struct Notifications(Sender<Input>);

#[interface(name = "org.freedesktop.Notifications")]
impl Notifications {
    async fn close_notification(&self, id: u32) {
        if let Err(err) = self.0.send(Input::CloseNotification(id)).await {
            error!("Failed to send close notification: {}", err);
        }
    }

    async fn get_capabilities(&self) -> Vec<&'static str> {
        daemon::CAPABILITIES.to_vec()
    }

    #[zbus(out_args("name", "vendor", "version", "spec_version"))]
    async fn get_server_information(
        &self,
    ) -> (&'static str, &'static str, &'static str, &'static str) {
        daemon::server_information()
    }

    /// Malformed hints are dropped here. The id comes back from the event
    /// loop once the notification is registered.
    #[allow(clippy::too_many_arguments)]
    async fn notify(
        &self,
        app_name: &str,
        replaces_id: u32,
        app_icon: &str,
        summary: &str,
        body: &str,
        actions: Vec<&str>,
        hints: HashMap<&str, Value<'_>>,
        expire_timeout: i32,
    ) -> fdo::Result<u32> {
        let notification = Notification::new(
            app_name,
            replaces_id,
            app_icon,
            summary,
            body,
            actions,
            hints,
            expire_timeout,
        );

        let (reply, id) = oneshot::channel();
        self.0
            .send(Input::Notify {
                notification,
                reply,
            })
            .await
            .map_err(|err| {
                error!("Failed to send notification: {}", err);
                fdo::Error::Failed("The daemon is shutting down".to_string())
            })?;

        id.await
            .map_err(|_| fdo::Error::Failed("The daemon is shutting down".to_string()))
    }

    #[zbus(signal)]
    async fn action_invoked(
        signal_ctxt: &SignalEmitter<'_>,
        id: u32,
        action_key: &str,
    ) -> zbus::Result<()>;

    /// id	UINT32	The ID of the notification that was closed.
    /// reason	UINT32
    ///
    /// 1 - The notification expired.
    ///
    /// 2 - The notification was dismissed by the user.
    ///
    /// 3 - The notification was closed by a call to CloseNotification.
    ///
    /// 4 - Undefined/reserved reasons.
    #[zbus(signal)]
    async fn notification_closed(
        signal_ctxt: &SignalEmitter<'_>,
        id: u32,
        reason: u32,
    ) -> zbus::Result<()>;
}

/// Daemon control: settings pushed by a settings frontend, and shutdown.
pub struct Admin(Sender<Input>);

#[interface(name = "org.corner.Notifyd")]
impl Admin {
    async fn quit(&self) {
        if let Err(err) = self.0.send(Input::Quit).await {
            error!("Failed to send quit: {}", err);
        }
    }

    /// The monitor layout or a dock changed size.
    async fn screen_changed(&self) {
        if let Err(err) = self.0.send(Input::TopologyChanged).await {
            error!("Failed to send screen change: {}", err);
        }
    }

    async fn set_setting(&self, key: &str, value: Value<'_>) -> fdo::Result<()> {
        let Some(value) = setting_value(&value) else {
            return Err(fdo::Error::InvalidArgs(format!(
                "Unsupported value type for '{}'",
                key
            )));
        };

        let (reply, result) = oneshot::channel();
        self.0
            .send(Input::Setting {
                key: key.to_string(),
                value,
                reply,
            })
            .await
            .map_err(|_| fdo::Error::Failed("The daemon is shutting down".to_string()))?;

        match result.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(fdo::Error::InvalidArgs(err.to_string())),
            Err(_) => Err(fdo::Error::Failed(
                "The daemon is shutting down".to_string(),
            )),
        }
    }
}

fn setting_value(value: &Value<'_>) -> Option<SettingValue> {
    Some(match value {
        Value::Bool(b) => SettingValue::Bool(*b),
        Value::U8(i) => SettingValue::Int((*i).into()),
        Value::I16(i) => SettingValue::Int((*i).into()),
        Value::U16(i) => SettingValue::Int((*i).into()),
        Value::I32(i) => SettingValue::Int((*i).into()),
        Value::U32(i) => SettingValue::Int((*i).into()),
        Value::I64(i) => SettingValue::Int(*i),
        Value::F64(f) => SettingValue::Double(*f),
        Value::Value(inner) => return setting_value(inner),
        _ => return None,
    })
}
