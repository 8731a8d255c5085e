//! Shared accept/read loop for the inbound feed servers.

use std::sync::Arc;

use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use kosh_core::KoshError;

use crate::codec::drain_frames;

/// Bind a feed port and serve newline-framed records to `handler` until the
/// process exits. Each accepted connection gets its own read task; records
/// within one connection are handled in arrival order, and the whole
/// downstream chain for a record runs before the next is framed.
pub(crate) async fn serve_records<H>(
    name: &'static str,
    port: u16,
    delimiter: u8,
    handler: Arc<H>,
) -> anyhow::Result<()>
where
    H: Fn(&str) -> Result<(), KoshError> + Send + Sync + 'static,
{
    let listener = TcpListener::bind(("127.0.0.1", port)).await?;
    info!(feed = name, port, "feed server listening");

    loop {
        let (mut socket, peer) = listener.accept().await?;
        let handler = handler.clone();
        tokio::spawn(async move {
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                match socket.read(&mut chunk).await {
                    Ok(0) => break,
                    Ok(n) => {
                        buf.extend_from_slice(&chunk[..n]);
                        for record in drain_frames(&mut buf, delimiter) {
                            // parse failures drop the record, the socket stays open
                            if let Err(err) = handler(&record) {
                                warn!(feed = name, %err, record, "dropping record");
                            }
                        }
                    }
                    Err(err) => {
                        error!(feed = name, %err, "read failed, closing connection");
                        break;
                    }
                }
            }
            debug!(feed = name, %peer, "feed connection closed");
        });
    }
}
