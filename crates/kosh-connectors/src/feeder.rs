//! File feeder: streams a generated feed file into its localhost port,
//! one newline-framed record per line.

use std::path::PathBuf;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::info;

/// Attempts before giving up on a feed server that never binds.
const CONNECT_ATTEMPTS: u32 = 25;
const CONNECT_BACKOFF: Duration = Duration::from_millis(200);

/// Drives one feed file into one socket.
pub struct FileFeeder {
    path: PathBuf,
    port: u16,
}

impl FileFeeder {
    pub fn new(path: PathBuf, port: u16) -> Self {
        Self { path, port }
    }

    /// Connect (with backoff, the server may still be binding) and stream
    /// every line of the file, then close.
    pub async fn run(&self) -> anyhow::Result<()> {
        let mut stream = self.connect().await?;
        let file = tokio::fs::File::open(&self.path).await?;
        let mut lines = BufReader::new(file).lines();

        let mut sent = 0u64;
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            stream.write_all(line.as_bytes()).await?;
            stream.write_all(b"\n").await?;
            sent += 1;
        }
        stream.flush().await?;
        info!(file = %self.path.display(), port = self.port, sent, "feed file streamed");
        Ok(())
    }

    async fn connect(&self) -> anyhow::Result<TcpStream> {
        let mut attempt = 0;
        loop {
            match TcpStream::connect(("127.0.0.1", self.port)).await {
                Ok(stream) => return Ok(stream),
                Err(_) if attempt < CONNECT_ATTEMPTS => {
                    attempt += 1;
                    tokio::time::sleep(CONNECT_BACKOFF).await;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }
}
