use anyhow::{Context, Result, bail};
use std::io::{self, Read};

const MAX_INPUT_SIZE: usize = 1024 * 1024; // 1MB

pub struct InputReader;

impl InputReader {
    /// Returns `text` when given, otherwise everything on stdin.
    pub fn read(text: Option<String>) -> Result<String> {
        match text {
            Some(text) => {
                Self::check_size(text.len())?;
                Ok(text)
            }
            None => Self::read_from(io::stdin().lock()),
        }
    }

    pub fn read_from(mut reader: impl Read) -> Result<String> {
        let mut buffer = Vec::new();
        let mut chunk = [0u8; 8192];

        loop {
            let bytes_read = reader
                .read(&mut chunk)
                .context("Failed to read from stdin")?;

            if bytes_read == 0 {
                break;
            }

            buffer.extend_from_slice(&chunk[..bytes_read]);
            Self::check_size(buffer.len())?;
        }

        String::from_utf8(buffer).context("Input is not valid UTF-8")
    }

    fn check_size(size: usize) -> Result<()> {
        if size > MAX_INPUT_SIZE {
            bail!(
                "Error: Input size ({:.1} MB) exceeds maximum allowed size (1 MB).\n\n\
                 Hover text is expected to be short; translate it in smaller parts.",
                size as f64 / 1024.0 / 1024.0
            );
        }
        Ok(())
    }
}
