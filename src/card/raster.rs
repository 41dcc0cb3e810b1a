//! SVG rasterization through external tools.

use async_trait::async_trait;
use bytes::Bytes;
use tokio::process::Command;
use tracing::debug;

use crate::error::{ProxyError, Result};

/// Turns an SVG document into encoded image bytes.
#[async_trait]
pub trait Rasterizer: Send + Sync {
    async fn rasterize(&self, svg: &str, width: u32) -> Result<Bytes>;
}

/// Rasterizes with `rsvg-convert` and encodes to WebP with `cwebp`.
#[derive(Debug, Clone)]
pub struct ExternalRasterizer {
    rsvg_convert: String,
    cwebp: String,
    quality: u8,
}

impl Default for ExternalRasterizer {
    fn default() -> Self {
        Self {
            rsvg_convert: "rsvg-convert".to_string(),
            cwebp: "cwebp".to_string(),
            quality: 100,
        }
    }
}

impl ExternalRasterizer {
    /// Uses the given executables instead of the ones on `PATH`.
    pub fn with_programs(rsvg_convert: impl Into<String>, cwebp: impl Into<String>) -> Self {
        Self {
            rsvg_convert: rsvg_convert.into(),
            cwebp: cwebp.into(),
            ..Self::default()
        }
    }
}

async fn run(command: &mut Command, program: &str) -> Result<Vec<u8>> {
    let output = command
        .output()
        .await
        .map_err(|e| ProxyError::RenderFailed(format!("failed to run {}: {}", program, e)))?;

    if !output.status.success() {
        return Err(ProxyError::RenderFailed(format!(
            "{} exited with {}: {}",
            program,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(output.stdout)
}

#[async_trait]
impl Rasterizer for ExternalRasterizer {
    async fn rasterize(&self, svg: &str, width: u32) -> Result<Bytes> {
        let scratch = tempfile::tempdir()
            .map_err(|e| ProxyError::RenderFailed(format!("failed to create temp dir: {}", e)))?;
        let svg_path = scratch.path().join("card.svg");
        let png_path = scratch.path().join("card.png");

        tokio::fs::write(&svg_path, svg)
            .await
            .map_err(|e| ProxyError::RenderFailed(format!("failed to write SVG: {}", e)))?;

        run(
            Command::new(&self.rsvg_convert)
                .arg("-w")
                .arg(width.to_string())
                .arg(&svg_path)
                .arg("-o")
                .arg(&png_path),
            &self.rsvg_convert,
        )
        .await?;

        let webp = run(
            Command::new(&self.cwebp)
                .arg(&png_path)
                .arg("-o")
                .arg("-")
                .arg("-q")
                .arg(self.quality.to_string()),
            &self.cwebp,
        )
        .await?;

        debug!(width, size = webp.len(), "Rasterized card");
        Ok(Bytes::from(webp))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_tool_is_render_failure() {
        let rasterizer = ExternalRasterizer::with_programs(
            "definitely-not-installed-rsvg",
            "definitely-not-installed-cwebp",
        );

        let result = rasterizer.rasterize("<svg/>", 256).await;

        match result {
            Err(ProxyError::RenderFailed(details)) => {
                assert!(details.contains("definitely-not-installed-rsvg"))
            }
            other => panic!("expected render failure, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_tool_reports_exit_status() {
        let rasterizer = ExternalRasterizer::with_programs("false", "false");

        let result = rasterizer.rasterize("<svg/>", 256).await;

        assert!(matches!(result, Err(ProxyError::RenderFailed(d)) if d.contains("exited")));
    }
}
