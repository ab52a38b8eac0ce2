//! Walk a react-icons style package and write one SVG per icon
//!
//! Layout on disk: `<source>/<group>/<bundle>` in, `<out>/<group>/<Name>.svg` out.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use icon_extract::{ExtractOptions, IconFailure, SvgOptions, convert_group};
use miette::{Context, IntoDiagnostic};
use rayon::prelude::*;

/// Directory in the package that holds shared runtime code, not icons
const LIB_DIR: &str = "lib";

#[derive(Debug, Clone)]
pub struct ExtractConfig {
    pub source: Utf8PathBuf,
    pub out: Utf8PathBuf,
    /// File name of the bundle inside each group directory
    pub bundle: String,
    /// Only these groups, when non-empty
    pub groups: Vec<String>,
    pub extract: ExtractOptions,
    pub svg: SvgOptions,
}

/// What happened to one group
#[derive(Debug)]
pub struct GroupSummary {
    pub group: String,
    pub written: usize,
    pub failures: Vec<IconFailure>,
}

/// Group directories under `source` that contain `bundle`, sorted by name
pub fn discover_groups(
    source: &Utf8Path,
    bundle: &str,
    only: &[String],
) -> miette::Result<Vec<String>> {
    let entries = source
        .read_dir_utf8()
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read icon package at {source}"))?;

    let mut groups = Vec::new();
    for entry in entries {
        let entry = entry.into_diagnostic()?;
        if !entry.file_type().into_diagnostic()?.is_dir() {
            continue;
        }
        let name = entry.file_name();
        if name == LIB_DIR || (!only.is_empty() && !only.iter().any(|g| g == name)) {
            continue;
        }
        if !entry.path().join(bundle).is_file() {
            tracing::info!(group = name, "skipping, no {bundle}");
            continue;
        }
        groups.push(name.to_string());
    }
    groups.sort();
    Ok(groups)
}

/// Convert one group and write its icons
pub fn run_group(config: &ExtractConfig, group: &str) -> miette::Result<GroupSummary> {
    let bundle_path = config.source.join(group).join(&config.bundle);
    let source = fs::read_to_string(&bundle_path)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read {bundle_path}"))?;

    let report = convert_group(group, &source, &config.extract, &config.svg);
    if tracing::enabled!(tracing::Level::DEBUG) {
        for failure in &report.failures {
            tracing::debug!(group, icon = %failure.name, "{:?}", failure.report(&source));
        }
    }

    let out_dir = config.out.join(group);
    fs::create_dir_all(&out_dir)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to create {out_dir}"))?;
    for (name, svg) in &report.icons {
        let path = out_dir.join(format!("{name}.svg"));
        fs::write(&path, svg)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to write {path}"))?;
    }

    tracing::info!(
        group,
        written = report.success_count(),
        skipped = report.failure_count(),
        "extracted group"
    );
    Ok(GroupSummary {
        group: group.to_string(),
        written: report.success_count(),
        failures: report.failures,
    })
}

/// Convert every group in parallel. A group that fails to read or write does
/// not stop the others.
pub fn run(config: &ExtractConfig) -> miette::Result<Vec<(String, miette::Result<GroupSummary>)>> {
    let groups = discover_groups(&config.source, &config.bundle, &config.groups)?;
    tracing::info!(count = groups.len(), "found icon groups");

    fs::create_dir_all(&config.out)
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to create {}", config.out))?;

    Ok(groups
        .par_iter()
        .map(|group| (group.clone(), run_group(config, group)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ICON: &str = "module.exports.XyOne = function XyOne (props) {\n  return GenIcon({\"tag\":\"svg\",\"attr\":{\"viewBox\":\"0 0 8 8\"},\"child\":[{\"tag\":\"path\",\"attr\":{\"d\":\"M0 0h8\"},\"child\":[]}]})(props);\n};\nmodule.exports.XyTwo = function XyTwo (props) {\n  return GenIcon({\"attr\":{}})(props);\n};\n";

    fn package() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        for group in ["xy", "lib", "empty"] {
            fs::create_dir_all(root.join("pkg").join(group)).unwrap();
        }
        fs::write(root.join("pkg/xy/index.js"), ICON).unwrap();
        fs::write(root.join("pkg/lib/index.js"), "module.exports.GenIcon = GenIcon;").unwrap();
        fs::write(root.join("pkg/README.md"), "not a group").unwrap();
        (dir, root)
    }

    fn config(root: &Utf8Path) -> ExtractConfig {
        ExtractConfig {
            source: root.join("pkg"),
            out: root.join("out"),
            bundle: "index.js".to_string(),
            groups: Vec::new(),
            extract: ExtractOptions::default(),
            svg: SvgOptions::default(),
        }
    }

    #[test]
    fn discovers_groups_with_bundles() {
        let (_dir, root) = package();
        let groups = discover_groups(&root.join("pkg"), "index.js", &[]).unwrap();
        assert_eq!(groups, ["xy"]);

        let groups = discover_groups(&root.join("pkg"), "index.js", &["other".to_string()]).unwrap();
        assert!(groups.is_empty());
    }

    #[test]
    fn writes_one_file_per_icon() {
        let (_dir, root) = package();
        let results = run(&config(&root)).unwrap();
        assert_eq!(results.len(), 1);

        let (group, summary) = &results[0];
        assert_eq!(group, "xy");
        let summary = summary.as_ref().unwrap();
        assert_eq!(summary.written, 1);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].name, "XyTwo");
        assert!(ICON[summary.failures[0].offset..].starts_with(r#"{"attr":{}})(props)"#));

        let svg = fs::read_to_string(root.join("out/xy/XyOne.svg")).unwrap();
        assert!(svg.contains(r#"<path d="M0 0h8"/>"#));
        assert!(!root.join("out/xy/XyTwo.svg").exists());
    }

    #[test]
    fn missing_package_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        assert!(run(&config(&root)).is_err());
    }
}
