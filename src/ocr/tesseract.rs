use async_trait::async_trait;
use std::io::Write;
use std::process::Command;
use std::time::Instant;
use tempfile::NamedTempFile;

use super::{OcrBackend, OcrError, OcrResult, Result};

/// Shells out to the `tesseract` binary (and `pdftoppm` for PDF rasterisation),
/// following the teacher's `ocr::tesseract::TesseractBackend`.
#[derive(Debug, Clone, Default)]
pub struct TesseractBackend;

impl TesseractBackend {
    pub fn new() -> Self {
        Self
    }

    fn run_tesseract(&self, image_path: &std::path::Path, language: &str) -> Result<String> {
        let output = Command::new("tesseract")
            .arg(image_path)
            .arg("stdout")
            .arg("-l")
            .arg(language)
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    OcrError::BackendNotAvailable("tesseract binary not found on PATH".into())
                } else {
                    OcrError::Io(e)
                }
            })?;
        if !output.status.success() {
            return Err(OcrError::Failed(String::from_utf8_lossy(&output.stderr).into_owned()));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn pdf_page_to_image(&self, pdf_bytes: &[u8], page: u32) -> Result<std::path::PathBuf> {
        let mut pdf_file = NamedTempFile::new()?;
        pdf_file.write_all(pdf_bytes)?;
        let dir = tempfile::tempdir()?;
        let prefix = dir.path().join("page");

        let status = Command::new("pdftoppm")
            .arg("-png")
            .arg("-r")
            .arg("300")
            .arg("-f")
            .arg(page.to_string())
            .arg("-l")
            .arg(page.to_string())
            .arg(pdf_file.path())
            .arg(&prefix)
            .status()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    OcrError::BackendNotAvailable("pdftoppm binary not found on PATH".into())
                } else {
                    OcrError::Io(e)
                }
            })?;
        if !status.success() {
            return Err(OcrError::Failed("pdftoppm rasterisation failed".into()));
        }
        self.find_page_image(&dir.into_path(), page)
    }

    fn find_page_image(&self, dir: &std::path::Path, page: u32) -> Result<std::path::PathBuf> {
        for width in [2, 3, 4] {
            let candidate = dir.join(format!("page-{:0width$}.png", page, width = width));
            if candidate.exists() {
                return Ok(candidate);
            }
        }
        Err(OcrError::Failed(format!("no rasterised image found for page {page}")))
    }
}

#[async_trait]
impl OcrBackend for TesseractBackend {
    fn backend_type(&self) -> &'static str {
        "tesseract"
    }

    async fn is_available(&self) -> bool {
        tokio::task::spawn_blocking(|| {
            Command::new("tesseract")
                .arg("--version")
                .output()
                .map(|o| o.status.success())
                .unwrap_or(false)
        })
        .await
        .unwrap_or(false)
    }

    fn availability_hint(&self) -> String {
        "install the `tesseract-ocr` package and the relevant language data files".into()
    }

    async fn ocr_image(&self, image_bytes: &[u8], language: &str) -> Result<OcrResult> {
        let language = language.to_string();
        let image_bytes = image_bytes.to_vec();
        let started = Instant::now();
        tokio::task::spawn_blocking(move || {
            let mut file = NamedTempFile::new()?;
            file.write_all(&image_bytes)?;
            let this = TesseractBackend;
            let text = this.run_tesseract(file.path(), &language)?;
            Ok(OcrResult {
                text,
                confidence: None,
                backend: "tesseract",
                processing_time_ms: started.elapsed().as_millis() as u64,
            })
        })
        .await
        .map_err(|e| OcrError::Failed(e.to_string()))?
    }

    async fn ocr_pdf_page(&self, pdf_bytes: &[u8], page: u32, language: &str) -> Result<OcrResult> {
        let language = language.to_string();
        let pdf_bytes = pdf_bytes.to_vec();
        let started = Instant::now();
        tokio::task::spawn_blocking(move || {
            let this = TesseractBackend;
            let image_path = this.pdf_page_to_image(&pdf_bytes, page)?;
            let text = this.run_tesseract(&image_path, &language)?;
            Ok(OcrResult {
                text,
                confidence: None,
                backend: "tesseract",
                processing_time_ms: started.elapsed().as_millis() as u64,
            })
        })
        .await
        .map_err(|e| OcrError::Failed(e.to_string()))?
    }
}
