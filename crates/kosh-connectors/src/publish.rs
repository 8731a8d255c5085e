//! # Outbound Publishers
//!
//! The streaming and execution services publish their records over
//! localhost sockets (3004 and 3005), framed by `\r`. Each publisher is a
//! pair: a `Connector` front that formats the entity and hands it to an
//! unbounded channel (so a publish never blocks the listener chain), and a
//! writer task that owns the client socket. The receiving half is an
//! in-process printer server that accepts the loopback connection and
//! prints each framed record to stdout.

use std::fmt::Display;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use kosh_core::Connector;

use crate::codec::drain_frames;

const CONNECT_ATTEMPTS: u32 = 25;
const CONNECT_BACKOFF: Duration = Duration::from_millis(200);

/// Publisher front half: formats and enqueues. Dropping the writer task
/// turns later publishes into logged drops, never errors up the chain.
pub struct SocketPublisher<V> {
    name: &'static str,
    tx: mpsc::UnboundedSender<String>,
    _entity: PhantomData<fn(&V)>,
}

impl<V: Display + Send + Sync> SocketPublisher<V> {
    /// Create the publisher and spawn its writer task against a port.
    pub fn connect(name: &'static str, port: u16) -> (Arc<Self>, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let writer = tokio::spawn(write_records(name, port, rx));
        (
            Arc::new(Self {
                name,
                tx,
                _entity: PhantomData,
            }),
            writer,
        )
    }
}

impl<V: Display + Send + Sync> Connector<V> for SocketPublisher<V> {
    fn publish(&self, data: &V) {
        if self.tx.send(data.to_string()).is_err() {
            warn!(publisher = self.name, "writer gone, dropping record");
        }
    }
}

/// Writer task: connect with backoff, then drain the channel onto the
/// socket with `\r` framing. A write failure closes the socket and drops
/// the rest of the flow.
async fn write_records(name: &'static str, port: u16, mut rx: mpsc::UnboundedReceiver<String>) {
    let mut stream = match connect_with_backoff(port).await {
        Ok(stream) => stream,
        Err(err) => {
            error!(publisher = name, %err, "could not reach publish port");
            return;
        }
    };
    while let Some(record) = rx.recv().await {
        let mut bytes = record.into_bytes();
        bytes.push(b'\r');
        if let Err(err) = stream.write_all(&bytes).await {
            error!(publisher = name, %err, "publish write failed, closing");
            return;
        }
    }
}

async fn connect_with_backoff(port: u16) -> std::io::Result<TcpStream> {
    let mut attempt = 0;
    loop {
        match TcpStream::connect(("127.0.0.1", port)).await {
            Ok(stream) => return Ok(stream),
            Err(_) if attempt < CONNECT_ATTEMPTS => {
                attempt += 1;
                tokio::time::sleep(CONNECT_BACKOFF).await;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Receiving half of a publish port: accept loopback connections and print
/// each `\r`-framed record to stdout.
pub async fn serve_printer(name: &'static str, port: u16) -> anyhow::Result<()> {
    let listener = TcpListener::bind(("127.0.0.1", port)).await?;
    info!(printer = name, port, "publish port listening");
    loop {
        let (mut socket, _) = listener.accept().await?;
        tokio::spawn(async move {
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                match socket.read(&mut chunk).await {
                    Ok(0) => break,
                    Ok(n) => {
                        buf.extend_from_slice(&chunk[..n]);
                        for record in drain_frames(&mut buf, b'\r') {
                            println!("[{name}] {record}");
                        }
                    }
                    Err(err) => {
                        error!(printer = name, %err, "read failed");
                        break;
                    }
                }
            }
        });
    }
}
