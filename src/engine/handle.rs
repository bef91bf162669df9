use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot};

use crate::engine::errors::ConsentError;
use crate::engine::events::{UserAction, WidgetCommand, WidgetEvent, WidgetSnapshot};
use crate::engine::widget::WidgetId;

/// Cloneable handle to a widget running on a tokio task.
///
/// Every method fails with [`ConsentError::WidgetClosed`] once the widget
/// has been torn down.
#[derive(Clone)]
pub struct WidgetHandle {
    widget: WidgetId,
    /// Command sender into the widget run loop
    cmd_tx: mpsc::Sender<WidgetCommand>,
    /// Event bus of the widget, used for new subscriptions
    event_tx: broadcast::Sender<WidgetEvent>,
}

impl std::fmt::Debug for WidgetHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetHandle")
            .field("widget", &self.widget)
            .field("cmd_tx", &self.cmd_tx)
            .finish()
    }
}

impl WidgetHandle {
    pub fn new(
        widget: WidgetId,
        cmd_tx: mpsc::Sender<WidgetCommand>,
        event_tx: broadcast::Sender<WidgetEvent>,
    ) -> Self {
        Self {
            widget,
            cmd_tx,
            event_tx,
        }
    }

    pub fn id(&self) -> WidgetId {
        self.widget
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WidgetEvent> {
        self.event_tx.subscribe()
    }

    /// `true` once the widget run loop has stopped.
    pub fn is_closed(&self) -> bool {
        self.cmd_tx.is_closed()
    }

    async fn send(&self, cmd: WidgetCommand) -> Result<(), ConsentError> {
        self.cmd_tx
            .send(cmd)
            .await
            .map_err(|_| ConsentError::WidgetClosed)
    }

    pub async fn dispatch(&self, action: UserAction) -> Result<(), ConsentError> {
        self.send(WidgetCommand::Dispatch(action)).await
    }

    /// Activates the element with the given id or trigger marker.
    pub async fn activate(&self, element: impl Into<String>) -> Result<(), ConsentError> {
        self.send(WidgetCommand::Activate(element.into())).await
    }

    pub async fn present_after_delay(&self, delay: Duration) -> Result<(), ConsentError> {
        self.send(WidgetCommand::PresentAfterDelay(delay)).await
    }

    pub async fn snapshot(&self) -> Result<WidgetSnapshot, ConsentError> {
        let (tx, rx) = oneshot::channel();
        self.send(WidgetCommand::Snapshot { reply: tx }).await?;
        rx.await.map_err(|_| ConsentError::WidgetClosed)
    }

    /// Tears the widget down and waits until it is detached.
    pub async fn teardown(&self) -> Result<(), ConsentError> {
        let (tx, rx) = oneshot::channel();
        self.send(WidgetCommand::Teardown { reply: tx }).await?;
        rx.await.map_err(|_| ConsentError::WidgetClosed)
    }
}
