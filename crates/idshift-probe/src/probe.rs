use crate::config::ProbeConfig;
use anyhow::{Context, bail};
use futures::{SinkExt, StreamExt};
use tokio_tungstenite::{Connector, connect_async_tls_with_config, tungstenite::Message};

/// The data frame the server sent back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Binary(usize),
}

/// Connects, sends the configured payload, waits for one frame and closes.
pub async fn probe(config: &ProbeConfig) -> anyhow::Result<Reply> {
    let tls = native_tls::TlsConnector::builder()
        .danger_accept_invalid_certs(!config.verify_certs)
        .danger_accept_invalid_hostnames(!config.verify_certs)
        .build()
        .context("failed to build TLS connector")?;

    let (mut socket, response) = connect_async_tls_with_config(
        config.url.clone(),
        None,
        false,
        Some(Connector::NativeTls(tls)),
    )
    .await
    .with_context(|| format!("failed to connect to {}", config.url))?;

    tracing::info!(url = %config.url, status = %response.status(), "connected");

    socket
        .send(Message::text(config.message.clone()))
        .await
        .context("failed to send payload")?;
    tracing::info!(bytes = config.message.len(), "sent");

    // Control frames are not a reply; a close before any data is a failure.
    let reply = loop {
        let frame = socket
            .next()
            .await
            .context("connection closed before a reply arrived")?
            .context("failed to read reply")?;
        match frame {
            Message::Text(text) => break Reply::Text(text.as_str().to_owned()),
            Message::Binary(bytes) => break Reply::Binary(bytes.len()),
            Message::Close(frame) => {
                bail!("server closed the connection without replying ({frame:?})")
            }
            Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {
                tracing::debug!("skipping control frame");
            }
        }
    };
    tracing::info!(?reply, "received");

    // The peer may already be gone once it has answered.
    if let Err(err) = socket.close(None).await {
        tracing::debug!("close handshake failed: {err}");
    }

    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[derive(Clone, Copy)]
    enum Server {
        Echo,
        PingThenEcho,
        CloseImmediately,
        HangUp,
    }

    /// Accepts one client, reads its payload and answers as `behaviour`
    /// dictates.
    async fn serve_once(behaviour: Server) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
            let Some(Ok(msg)) = ws.next().await else {
                return;
            };
            match behaviour {
                Server::Echo => ws.send(msg).await.unwrap(),
                Server::PingThenEcho => {
                    ws.send(Message::Ping(Default::default())).await.unwrap();
                    ws.send(msg).await.unwrap();
                }
                Server::CloseImmediately => {
                    let _ = ws.close(None).await;
                }
                Server::HangUp => return,
            }
            // Drain until the client goes away.
            while let Some(Ok(_)) = ws.next().await {}
        });
        format!("ws://{addr}")
    }

    fn config(url: &str, message: &str) -> ProbeConfig {
        ProbeConfig {
            url: url.parse().unwrap(),
            message: message.to_string(),
            verify_certs: false,
        }
    }

    #[tokio::test]
    async fn receives_exactly_one_reply() {
        let url = serve_once(Server::Echo).await;

        let reply = probe(&config(&url, "Hello world!")).await.unwrap();

        assert_eq!(reply, Reply::Text("Hello world!".to_string()));
    }

    #[tokio::test]
    async fn ping_before_reply_is_skipped() {
        let url = serve_once(Server::PingThenEcho).await;

        let reply = probe(&config(&url, "Hello world!")).await.unwrap();

        assert_eq!(reply, Reply::Text("Hello world!".to_string()));
    }

    #[tokio::test]
    async fn close_without_reply_fails() {
        let url = serve_once(Server::CloseImmediately).await;

        let err = probe(&config(&url, "hi")).await.unwrap_err();

        assert!(err.to_string().contains("without replying"), "{err:#}");
    }

    #[tokio::test]
    async fn dropped_connection_fails() {
        let url = serve_once(Server::HangUp).await;

        assert!(probe(&config(&url, "hi")).await.is_err());
    }

    #[tokio::test]
    async fn unreachable_endpoint_fails() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = probe(&config(&format!("ws://{addr}"), "hi"))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("failed to connect"));
    }
}
