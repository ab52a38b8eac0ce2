//! Size statistics over an extracted icon corpus

use std::fmt;

use camino::Utf8Path;
use miette::{Context, IntoDiagnostic};

/// Files under this size are flagged as suspicious
pub const DEFAULT_SMALL_THRESHOLD: u64 = 100;

const RULE_WIDTH: usize = 80;
const SAMPLE_COUNT: usize = 3;
const TOP_COUNT: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct FamilyStats {
    pub family: String,
    pub count: usize,
    /// Total bytes of all icons in the family
    pub size: u64,
    pub samples: Vec<String>,
    pub small_files: usize,
}

impl FamilyStats {
    pub fn avg_size(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.size as f64 / self.count as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CorpusStats {
    /// Sorted by family name
    pub families: Vec<FamilyStats>,
    pub small_threshold: u64,
}

impl CorpusStats {
    pub fn total_icons(&self) -> usize {
        self.families.iter().map(|f| f.count).sum()
    }

    pub fn total_size(&self) -> u64 {
        self.families.iter().map(|f| f.size).sum()
    }

    pub fn overall_avg(&self) -> f64 {
        match self.total_icons() {
            0 => 0.0,
            n => self.total_size() as f64 / n as f64,
        }
    }

    pub fn top_by_count(&self, n: usize) -> Vec<&FamilyStats> {
        let mut families: Vec<_> = self.families.iter().collect();
        families.sort_by(|a, b| b.count.cmp(&a.count));
        families.truncate(n);
        families
    }

    pub fn top_by_size(&self, n: usize) -> Vec<&FamilyStats> {
        let mut families: Vec<_> = self.families.iter().collect();
        families.sort_by(|a, b| b.size.cmp(&a.size));
        families.truncate(n);
        families
    }

    /// Largest and smallest per-family average
    pub fn avg_range(&self) -> Option<(f64, f64)> {
        let avgs = self.families.iter().map(FamilyStats::avg_size);
        let max = avgs.clone().reduce(f64::max)?;
        let min = avgs.reduce(f64::min)?;
        Some((max, min))
    }

    pub fn empty_families(&self) -> Vec<&str> {
        self.families
            .iter()
            .filter(|f| f.count == 0)
            .map(|f| f.family.as_str())
            .collect()
    }

    pub fn small_files(&self) -> usize {
        self.families.iter().map(|f| f.small_files).sum()
    }
}

/// Scan `<dir>/<family>/*.svg`
pub fn collect(dir: &Utf8Path, small_threshold: u64) -> miette::Result<CorpusStats> {
    let mut families = Vec::new();
    for entry in dir
        .read_dir_utf8()
        .into_diagnostic()
        .wrap_err_with(|| format!("failed to read {dir}"))?
    {
        let entry = entry.into_diagnostic()?;
        if entry.file_type().into_diagnostic()?.is_dir() {
            families.push(family_stats(entry.path(), small_threshold)?);
        }
    }
    families.sort_by(|a, b| a.family.cmp(&b.family));
    Ok(CorpusStats {
        families,
        small_threshold,
    })
}

fn family_stats(path: &Utf8Path, small_threshold: u64) -> miette::Result<FamilyStats> {
    let mut icons = Vec::new();
    for entry in path.read_dir_utf8().into_diagnostic()? {
        let entry = entry.into_diagnostic()?;
        if entry.path().extension() != Some("svg") {
            continue;
        }
        let size = entry.metadata().into_diagnostic()?.len();
        icons.push((entry.file_name().to_string(), size));
    }
    icons.sort();

    Ok(FamilyStats {
        family: path.file_name().unwrap_or_default().to_string(),
        count: icons.len(),
        size: icons.iter().map(|(_, size)| size).sum(),
        samples: icons
            .iter()
            .take(SAMPLE_COUNT)
            .map(|(name, _)| name.trim_end_matches(".svg").to_string())
            .collect(),
        small_files: icons.iter().filter(|(_, size)| *size < small_threshold).count(),
    })
}

/// Human-readable size: `0 B`, `512 B`, `1.5 KB`, `2 MB`
pub fn format_bytes(bytes: f64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    if bytes == 0.0 {
        return "0 B".to_string();
    }
    let exp = (bytes.ln() / 1024f64.ln()).floor().clamp(0.0, (UNITS.len() - 1) as f64);
    let value = format!("{:.1}", bytes / 1024f64.powf(exp));
    let value = value.strip_suffix(".0").unwrap_or(&value);
    format!("{value} {}", UNITS[exp as usize])
}

fn ellipsize(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let cut: String = s.chars().take(max - 3).collect();
        format!("{cut}...")
    } else {
        s.to_string()
    }
}

impl fmt::Display for CorpusStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(RULE_WIDTH);
        let banner = "=".repeat(50);

        writeln!(f, "FAMILY STATISTICS")?;
        writeln!(f)?;
        writeln!(f, "{:<8}{:<8}{:<10}{:<12}Sample Icons", "Family", "Count", "Size", "Avg Size")?;
        writeln!(f, "{rule}")?;
        for family in &self.families {
            writeln!(
                f,
                "{:<8}{:<8}{:<10}{:<12}{}",
                family.family,
                family.count,
                format_bytes(family.size as f64),
                format_bytes(family.avg_size()),
                ellipsize(&family.samples.join(", "), 50)
            )?;
        }
        writeln!(f, "{rule}")?;
        writeln!(
            f,
            "{:<8}{:<8}{:<10}{:<12}",
            "TOTAL",
            self.total_icons(),
            format_bytes(self.total_size() as f64),
            format_bytes(self.overall_avg())
        )?;

        writeln!(f)?;
        writeln!(f, "{banner}")?;
        writeln!(f, "SUMMARY")?;
        writeln!(f)?;
        writeln!(f, "Top {TOP_COUNT} families by icon count:")?;
        for (i, family) in self.top_by_count(TOP_COUNT).iter().enumerate() {
            writeln!(f, "{}. {}: {} icons", i + 1, family.family, family.count)?;
        }
        writeln!(f)?;
        writeln!(f, "Top {TOP_COUNT} families by total size:")?;
        for (i, family) in self.top_by_size(TOP_COUNT).iter().enumerate() {
            writeln!(f, "{}. {}: {}", i + 1, family.family, format_bytes(family.size as f64))?;
        }
        if let Some((largest, smallest)) = self.avg_range() {
            writeln!(f)?;
            writeln!(f, "Average icon sizes:")?;
            writeln!(f, "Largest avg: {}", format_bytes(largest))?;
            writeln!(f, "Smallest avg: {}", format_bytes(smallest))?;
            writeln!(f, "Overall avg: {}", format_bytes(self.overall_avg()))?;
        }

        writeln!(f)?;
        writeln!(f, "{banner}")?;
        writeln!(f, "VALIDATION")?;
        writeln!(f)?;
        let empty = self.empty_families();
        if !empty.is_empty() {
            writeln!(f, "Found {} empty families: {}", empty.len(), empty.join(", "))?;
        }
        let small = self.small_files();
        if small > 0 {
            writeln!(
                f,
                "Found {small} potentially corrupted files (< {} bytes)",
                self.small_threshold
            )?;
        }
        if empty.is_empty() && small == 0 {
            writeln!(f, "All validations passed.")?;
        }
        write!(
            f,
            "\nTotal: {} icons, {}",
            self.total_icons(),
            format_bytes(self.total_size() as f64)
        )
    }
}
