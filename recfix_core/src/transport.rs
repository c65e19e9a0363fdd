use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

use crate::api::VideoPlatform;
use crate::ops::{RecFixService, Response};

/// Line-delimited JSON over stdio: one [`crate::ops::Request`] per input
/// line, one [`Response`] per output line, in order.
pub struct StdioTransport<P: VideoPlatform> {
    service: RecFixService<P>,
}

impl<P: VideoPlatform> StdioTransport<P> {
    pub fn new(service: RecFixService<P>) -> Self {
        Self { service }
    }

    /// Serve until stdin reaches EOF.
    pub async fn run(&self) -> io::Result<()> {
        info!("Starting stdio transport");
        self.serve(BufReader::new(io::stdin()), io::stdout()).await
    }

    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => {
                    debug!("EOF reached on input");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    error!("Error reading input: {}", e);
                    return Err(e);
                }
            }

            let response = match std::str::from_utf8(&buf) {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => {
                    // Request lines may carry an access token; never log them.
                    debug!(bytes = line.len(), "Processing request");
                    self.service.handle_json(line.trim_end()).await
                }
                Err(e) => {
                    error!(bytes = buf.len(), "Request is not valid UTF-8: {}", e);
                    Response::Error {
                        code: "parse_error".to_string(),
                        message: format!("Invalid request: {}", e),
                    }
                }
            };
            write_response(&mut writer, &response).await?;
        }
        Ok(())
    }
}

async fn write_response<W: AsyncWrite + Unpin>(writer: &mut W, response: &Response) -> io::Result<()> {
    let encoded = serde_json::to_string(response)?;
    writer.write_all(encoded.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    debug!(bytes = encoded.len(), "Sent response");
    Ok(())
}
