use std::fs;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat};
use pdfium_render::prelude::*;

use crate::constants::*;
use crate::error::{Result, SlideshowError};

#[derive(Debug, Clone)]
pub struct RasterConfig {
    pub output_dir: PathBuf,
    pub scale: f32,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(OUTPUT_FOLDER),
            scale: RENDER_SCALE,
        }
    }
}

/// Anything that can hand out rendered pages in document order.
pub trait PageSource {
    fn page_count(&self) -> usize;
    fn render_each(&self, sink: &mut dyn FnMut(usize, DynamicImage) -> Result<()>) -> Result<()>;
}

/// A loaded PDF together with the scale it is rendered at.
struct PdfPages<'a> {
    document: PdfDocument<'a>,
    scale: f32,
}

impl PageSource for PdfPages<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn render_each(&self, sink: &mut dyn FnMut(usize, DynamicImage) -> Result<()>) -> Result<()> {
        for (index, page) in self.document.pages().iter().enumerate() {
            let width = (page.width().value * self.scale).round().max(1.0) as i32;
            let height = (page.height().value * self.scale).round().max(1.0) as i32;
            log::debug!("page {}: {}x{} px", index + 1, width, height);

            let render_config = PdfRenderConfig::new()
                .set_target_width(width)
                .set_target_height(height);

            let bitmap = page
                .render_with_config(&render_config)
                .map_err(|e| SlideshowError::Render { page: index + 1, reason: e.to_string() })?;

            sink(index, bitmap.as_image())?;
        }
        Ok(())
    }
}

/// Renders every page of a PDF to a PNG file.
pub struct PageRasterizer {
    config: RasterConfig,
}

impl PageRasterizer {
    pub fn new(config: RasterConfig) -> Self {
        Self { config }
    }

    /// Returns absolute image paths, page 1 first.
    pub fn rasterize(&self, pdf_path: &Path) -> Result<Vec<PathBuf>> {
        if !pdf_path.is_file() {
            return Err(SlideshowError::DocumentOpen {
                path: pdf_path.to_path_buf(),
                reason: "file not found".to_string(),
            });
        }

        let pdfium = bind_pdfium()?;
        let document = pdfium
            .load_pdf_from_file(pdf_path, None)
            .map_err(|e| SlideshowError::DocumentOpen {
                path: pdf_path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let pages = PdfPages { document, scale: self.config.scale };
        log::info!("Rendering {} pages from {}", pages.page_count(), pdf_path.display());
        write_pages(&pages, &self.config.output_dir)
    }
}

/// Writes each page of `source` into `output_dir`, creating it if needed.
pub fn write_pages(source: &dyn PageSource, output_dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)?;
    let output_dir = fs::canonicalize(output_dir)?;

    let mut written = Vec::with_capacity(source.page_count());
    source.render_each(&mut |index, image| {
        let path = output_dir.join(page_file_name(index + 1));
        image
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|e| SlideshowError::Render { page: index + 1, reason: e.to_string() })?;
        written.push(path);
        Ok(())
    })?;

    Ok(written)
}

/// `page_<n>.png` for the 1-based page number `n`.
pub fn page_file_name(page_number: usize) -> String {
    format!("{PAGE_FILE_PREFIX}{page_number}.{PAGE_FILE_EXTENSION}")
}

fn pdfium_search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Some(exe_dir) = std::env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf)) {
        paths.push(exe_dir.join("libs"));
        paths.push(exe_dir.clone());

        #[cfg(target_os = "macos")]
        if let Some(contents_dir) = exe_dir.parent() {
            paths.push(contents_dir.join("Resources"));
        }
    }

    paths.push(PathBuf::from("libs"));
    paths.push(PathBuf::from("./"));
    paths
}

fn bind_pdfium() -> Result<Pdfium> {
    for path in pdfium_search_paths() {
        let lib_path = Pdfium::pdfium_platform_library_name_at_path(&path);
        if let Ok(bindings) = Pdfium::bind_to_library(&lib_path) {
            log::debug!("Bound PDFium from {:?}", lib_path);
            return Ok(Pdfium::new(bindings));
        }
    }

    Pdfium::bind_to_system_library()
        .map(Pdfium::new)
        .map_err(|e| SlideshowError::Pdfium(e.to_string()))
}
