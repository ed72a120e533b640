use crate::domain::model::Frame;
use crate::domain::ports::LandmarkSource;
use crate::utils::error::{PostureError, Result};
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

/// Landmark frames from newline-delimited JSON, one frame per line, as
/// written by an external hand-tracking process.
pub struct JsonLinesSource<B> {
    reader: B,
    line_number: u64,
    follow: bool,
    poll_interval: Duration,
    buffer: Vec<u8>,
}

impl JsonLinesSource<BufReader<File>> {
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref()).await?;
        tracing::info!("📥 Reading landmark frames from {}", path.as_ref().display());
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<B: AsyncBufRead + Unpin + Send> JsonLinesSource<B> {
    pub fn from_reader(reader: B) -> Self {
        Self {
            reader,
            line_number: 0,
            follow: false,
            poll_interval: Duration::from_millis(50),
            buffer: Vec::new(),
        }
    }

    /// Keep polling at end of input instead of finishing, for a file that
    /// is still being written.
    pub fn with_follow(mut self, follow: bool, poll_interval: Duration) -> Self {
        self.follow = follow;
        self.poll_interval = poll_interval;
        self
    }

    pub fn line_number(&self) -> u64 {
        self.line_number
    }

    fn parse_line(&self, bytes: &[u8]) -> Result<Option<Frame>> {
        let line = std::str::from_utf8(bytes).map_err(|e| PostureError::InvalidFrameError {
            line: self.line_number,
            reason: format!("line is not valid UTF-8: {}", e),
        })?;
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        serde_json::from_str(line)
            .map(Some)
            .map_err(|e| PostureError::InvalidFrameError {
                line: self.line_number,
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl<B: AsyncBufRead + Unpin + Send> LandmarkSource for JsonLinesSource<B> {
    async fn next_frame(&mut self) -> Result<Option<Frame>> {
        loop {
            // follow 模式下，未以換行結尾的片段會留在 buffer 等下一次讀取
            let read = self.reader.read_until(b'\n', &mut self.buffer).await?;

            if read == 0 {
                if self.follow {
                    tokio::time::sleep(self.poll_interval).await;
                    continue;
                }
                if self.buffer.is_empty() {
                    return Ok(None);
                }
            } else if self.follow && self.buffer.last() != Some(&b'\n') {
                continue;
            }

            self.line_number += 1;
            let line = std::mem::take(&mut self.buffer);
            if let Some(frame) = self.parse_line(&line)? {
                return Ok(Some(frame));
            }
        }
    }
}
