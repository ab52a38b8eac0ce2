//! Rasterize an extracted icon tree to PNG
//!
//! Layout on disk: `<dir>/<family>/<Name>.svg` in, `<out>/<family>/<Name>.png`
//! out. Every image is a `size` x `size` square with the icon scaled to fit
//! and centered.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use miette::{Context, IntoDiagnostic, miette};
use rayon::prelude::*;

pub const DEFAULT_SIZE: u32 = 1024;

#[derive(Debug, Clone)]
pub struct PngConfig {
    pub dir: Utf8PathBuf,
    pub out: Utf8PathBuf,
    /// Width and height of every image, in pixels
    pub size: u32,
}

/// One file that did not convert
#[derive(Debug)]
pub struct PngFailure {
    pub svg: Utf8PathBuf,
    pub error: miette::Report,
}

#[derive(Debug, Default)]
pub struct PngSummary {
    /// Output paths, sorted
    pub written: Vec<Utf8PathBuf>,
    pub failures: Vec<PngFailure>,
}

/// Every `.svg` under `dir`, at any depth, sorted
pub fn find_svgs(dir: &Utf8Path) -> miette::Result<Vec<Utf8PathBuf>> {
    let mut found = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        for entry in current
            .read_dir_utf8()
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to read {current}"))?
        {
            let entry = entry.into_diagnostic()?;
            let path = entry.path();
            if entry.file_type().into_diagnostic()?.is_dir() {
                pending.push(path.to_path_buf());
            } else if path.extension() == Some("svg") {
                found.push(path.to_path_buf());
            }
        }
    }
    found.sort();
    Ok(found)
}

/// Where the PNG for `svg` goes: same relative path under `out`
pub fn target_path(dir: &Utf8Path, out: &Utf8Path, svg: &Utf8Path) -> Utf8PathBuf {
    let relative = svg.strip_prefix(dir).unwrap_or(svg);
    out.join(relative).with_extension("png")
}

/// Render one SVG document into a square pixmap
pub fn rasterize(svg: &[u8], size: u32) -> miette::Result<tiny_skia::Pixmap> {
    let tree = usvg::Tree::from_data(svg, &usvg::Options::default()).into_diagnostic()?;
    let mut pixmap =
        tiny_skia::Pixmap::new(size, size).ok_or_else(|| miette!("invalid image size {size}"))?;

    let natural = tree.size();
    let side = size as f32;
    let scale = (side / natural.width()).min(side / natural.height());
    let transform = tiny_skia::Transform::from_scale(scale, scale).post_translate(
        (side - natural.width() * scale) / 2.0,
        (side - natural.height() * scale) / 2.0,
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());
    Ok(pixmap)
}

fn convert_file(config: &PngConfig, svg: &Utf8Path) -> miette::Result<Utf8PathBuf> {
    let data = fs::read(svg)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read {svg}"))?;
    let pixmap = rasterize(&data, config.size).wrap_err_with(|| format!("failed to render {svg}"))?;

    let target = target_path(&config.dir, &config.out, svg);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to create {parent}"))?;
    }
    pixmap
        .save_png(&target)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to write {target}"))?;
    Ok(target)
}

/// Convert every SVG under `config.dir` in parallel. A file that fails is
/// counted and the rest carry on.
pub fn run(config: &PngConfig) -> miette::Result<PngSummary> {
    let svgs = find_svgs(&config.dir)?;
    tracing::info!(count = svgs.len(), size = config.size, "found SVG files");

    fs::create_dir_all(&config.out)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to create {}", config.out))?;

    let results: Vec<_> = svgs
        .par_iter()
        .map(|svg| (svg, convert_file(config, svg)))
        .collect();

    let mut summary = PngSummary::default();
    for (svg, result) in results {
        match result {
            Ok(target) => {
                tracing::debug!(%svg, %target, "converted");
                summary.written.push(target);
            }
            Err(error) => {
                tracing::warn!(%svg, "conversion failed");
                summary.failures.push(PngFailure {
                    svg: svg.clone(),
                    error,
                });
            }
        }
    }
    Ok(summary)
}
