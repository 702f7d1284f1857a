//! Recognizer backed by the `tesseract` command-line program

use crate::config::OcrConfig;
use crate::images::encode_png;
use crate::ocr::{OcrError, TextRecognizer};
use async_trait::async_trait;
use image::DynamicImage;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Runs `tesseract stdin stdout -l <language>` with the image piped in as PNG
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    command: String,
    language: String,
}

impl TesseractRecognizer {
    pub fn new(command: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            language: language.into(),
        }
    }

    pub fn from_config(config: &OcrConfig) -> Self {
        Self::new(&config.command, &config.language)
    }

    /// Checks that the executable can be started at all
    ///
    /// Used at startup so a missing install is reported once instead of once per image.
    pub async fn is_available(&self) -> bool {
        Command::new(&self.command)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map(|status| status.success())
            .unwrap_or(false)
    }
}

#[async_trait]
impl TextRecognizer for TesseractRecognizer {
    async fn recognize(&self, image: &DynamicImage) -> Result<String, OcrError> {
        let image = image.clone();
        let png = tokio::task::spawn_blocking(move || encode_png(&image))
            .await
            .map_err(|e| OcrError::Task(e.to_string()))??;

        let mut child = Command::new(&self.command)
            .args(["stdin", "stdout", "-l", self.language.as_str()])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(&png).await?;
            // Dropping stdin closes the pipe so tesseract sees EOF
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(OcrError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
