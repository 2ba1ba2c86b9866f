use futures_util::StreamExt;
use thiserror::Error;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{self, Message};
use url::Url;

use crate::domain::models::ConnectionState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushEvent {
    State(ConnectionState),
    Message(String),
}

#[derive(Debug, Error)]
pub enum PushChannelError {
    #[error("failed to connect push channel: {0}")]
    Connect(#[source] tungstenite::Error),
    #[error("push channel read failed: {0}")]
    Read(#[source] tungstenite::Error),
}

/// Maps the API base address onto its WebSocket endpoint (`/ws`, with
/// `http` becoming `ws` and `https` becoming `wss`).
pub fn derive_push_url(api_base: &Url) -> Result<Url, String> {
    let scheme = match api_base.scheme() {
        "http" => "ws",
        "https" => "wss",
        other => return Err(format!("unsupported API scheme `{other}`")),
    };

    let mut url = api_base.clone();
    url.set_scheme(scheme)
        .map_err(|_| format!("cannot map `{api_base}` to a push address"))?;
    url.set_path("/ws");
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// Selects ring as the process-wide rustls provider for `wss://` channels.
/// Later calls are no-ops.
pub fn install_tls_provider() {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        tracing::debug!("rustls crypto provider already installed");
    }
}

/// Listens on the push channel until the server closes it or it fails.
/// A failure reports `Error` followed by `Disconnected`, so the final state
/// after any outcome is `Disconnected`. There is no reconnection: once this
/// returns, the channel stays down.
pub async fn listen<F>(url: &Url, mut on_event: F) -> Result<(), PushChannelError>
where
    F: FnMut(PushEvent),
{
    let (mut stream, _) = match connect_async(url.as_str()).await {
        Ok(connection) => connection,
        Err(error) => {
            on_event(PushEvent::State(ConnectionState::Error));
            on_event(PushEvent::State(ConnectionState::Disconnected));
            return Err(PushChannelError::Connect(error));
        }
    };

    tracing::info!(url = %url, "push channel connected");
    on_event(PushEvent::State(ConnectionState::Connected));

    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => on_event(PushEvent::Message(text)),
            Ok(Message::Binary(bytes)) => {
                on_event(PushEvent::Message(String::from_utf8_lossy(&bytes).into_owned()))
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(error) => {
                on_event(PushEvent::State(ConnectionState::Error));
                on_event(PushEvent::State(ConnectionState::Disconnected));
                return Err(PushChannelError::Read(error));
            }
        }
    }

    tracing::info!(url = %url, "push channel closed");
    on_event(PushEvent::State(ConnectionState::Disconnected));
    Ok(())
}
