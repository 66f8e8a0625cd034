//! Human-readable summary of a decode.

use std::fmt;

#[cfg(feature = "colorized_output")]
use console::style;

use crate::phi::{DecodeDiagnostic, DecodeResult, DecodedRegion, RegionDescriptor};

/// Outcome of one report line
#[derive(Debug, Clone, PartialEq)]
pub enum EntryStatus {
    /// Region decoded
    Ok,
    /// Recoverable problem worth a look
    Warning(String),
    /// Region omitted from the result
    Failed(String),
}

impl EntryStatus {
    fn is_ok(&self) -> bool {
        matches!(self, EntryStatus::Ok)
    }

    fn is_failed(&self) -> bool {
        matches!(self, EntryStatus::Failed(_))
    }

    fn is_warning(&self) -> bool {
        matches!(self, EntryStatus::Warning(_))
    }

    fn symbol(&self) -> &'static str {
        match self {
            EntryStatus::Ok => "✓",
            EntryStatus::Warning(_) => "⚠",
            EntryStatus::Failed(_) => "✗",
        }
    }
}

/// Where a decoded region's samples were found
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Byte offset of the block marker
    pub marker_offset: usize,
    /// Byte offset of the first accepted sample
    pub data_offset: usize,
    /// Mean absolute intensity of the samples
    pub mean_intensity: f64,
}

impl From<&DecodedRegion> for Placement {
    fn from(region: &DecodedRegion) -> Self {
        Self {
            marker_offset: region.marker_offset,
            data_offset: region.data_offset,
            mean_intensity: region.mean_intensity,
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "data at byte {} (+{} from marker), mean {:.1}",
            self.data_offset,
            self.data_offset - self.marker_offset,
            self.mean_intensity
        )
    }
}

/// One line of the report
#[derive(Debug, Clone)]
pub struct ReportEntry {
    /// What the line is about
    pub name: String,
    /// How it went
    pub status: EntryStatus,
    /// Sample location, for decoded regions
    pub placement: Option<Placement>,
}

impl ReportEntry {
    /// Everything after the name: placement and any status message.
    fn detail(&self) -> String {
        let mut parts = Vec::new();
        if let Some(placement) = &self.placement {
            parts.push(placement.to_string());
        }
        match &self.status {
            EntryStatus::Ok => {}
            EntryStatus::Warning(msg) => parts.push(format!("WARNING: {}", msg)),
            EntryStatus::Failed(msg) => parts.push(format!("OMITTED: {}", msg)),
        }
        parts.join(" - ")
    }
}

/// Per-region decode summary for one file
#[derive(Debug)]
pub struct DecodeReport {
    /// Report lines: file-level warnings first, then regions in declaration order
    pub entries: Vec<ReportEntry>,
    /// Path of the decoded file
    pub file_path: String,
}

impl DecodeReport {
    /// Summarize `result` for the file at `file_path`.
    pub fn from_result(result: &DecodeResult, file_path: impl Into<String>) -> Self {
        let mut entries: Vec<ReportEntry> = result
            .diagnostics
            .iter()
            .filter(|d| d.region().is_none())
            .map(|d| ReportEntry {
                name: "Header/markers".to_string(),
                status: EntryStatus::Warning(d.to_string()),
                placement: None,
            })
            .collect();

        for (index, region) in result.regions.iter().enumerate() {
            let decoded = result.decoded_at(index);
            let status = match decoded {
                Some(_) => region_warning(result, &region.name)
                    .map_or(EntryStatus::Ok, EntryStatus::Warning),
                None => EntryStatus::Failed(omission_reason(result, &region.name)),
            };
            entries.push(ReportEntry {
                name: region_label(region),
                status,
                placement: decoded.map(Placement::from),
            });
        }

        Self {
            entries,
            file_path: file_path.into(),
        }
    }

    /// Whether any region was omitted
    pub fn has_failures(&self) -> bool {
        self.entries.iter().any(|e| e.status.is_failed())
    }

    /// Whether any warning was raised
    pub fn has_warnings(&self) -> bool {
        self.entries.iter().any(|e| e.status.is_warning())
    }

    /// Number of decoded regions reported without warnings
    pub fn success_count(&self) -> usize {
        self.entries.iter().filter(|e| e.status.is_ok()).count()
    }

    /// Number of warnings
    pub fn warning_count(&self) -> usize {
        self.entries.iter().filter(|e| e.status.is_warning()).count()
    }

    /// Number of omitted regions
    pub fn failure_count(&self) -> usize {
        self.entries.iter().filter(|e| e.status.is_failed()).count()
    }

    fn summary(&self) -> String {
        format!(
            "{} decoded, {} warnings, {} omitted",
            self.success_count(),
            self.warning_count(),
            self.failure_count()
        )
    }

    /// Format the report with colors (requires console feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            let mut output = format!(
                "{}\n{}: {}\n\n",
                style("PHI Decode Report").bold().cyan(),
                style("File").bold(),
                self.file_path
            );

            for entry in &self.entries {
                let marker = match &entry.status {
                    EntryStatus::Ok => style(entry.status.symbol()).green(),
                    EntryStatus::Warning(_) => style(entry.status.symbol()).yellow(),
                    EntryStatus::Failed(_) => style(entry.status.symbol()).red(),
                };
                output.push_str(&format!("[{}] {}", marker, style(&entry.name).bold()));
                let detail = entry.detail();
                if !detail.is_empty() {
                    output.push_str(&format!(" {}", style(detail).dim()));
                }
                output.push('\n');
            }

            output.push_str(&format!("\n{}: {}\n", style("Summary").bold(), self.summary()));
            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            self.to_string()
        }
    }
}

fn region_label(region: &RegionDescriptor) -> String {
    format!(
        "{} ({} pts, {} -> {} eV)",
        region.name, region.points, region.start_ev, region.end_ev
    )
}

fn region_warning(result: &DecodeResult, name: &str) -> Option<String> {
    let notes: Vec<String> = result
        .diagnostics
        .iter()
        .filter(|d| d.region() == Some(name))
        .filter_map(|d| match d {
            DecodeDiagnostic::DuplicateRegionName { .. } => {
                Some("name declared more than once".to_string())
            }
            DecodeDiagnostic::MarkerInsideData { offsets, .. } => Some(format!(
                "{} marker(s) inside the samples were ignored",
                offsets.len()
            )),
            _ => None,
        })
        .collect();
    (!notes.is_empty()).then(|| notes.join("; "))
}

fn omission_reason(result: &DecodeResult, name: &str) -> String {
    let exhausted = result.diagnostics.iter().find(|d| {
        matches!(d, DecodeDiagnostic::AlignmentExhausted { region, .. } if region == name)
    });
    match exhausted {
        Some(diagnostic) => diagnostic.to_string(),
        None if result.get(name).is_some() => {
            "replaced by a later region with the same name".to_string()
        }
        None => "no block marker paired with this region".to_string(),
    }
}

impl fmt::Display for DecodeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "PHI Decode Report")?;
        writeln!(f, "File: {}", self.file_path)?;
        writeln!(f)?;

        for entry in &self.entries {
            write!(f, "[{}] {}", entry.status.symbol(), entry.name)?;
            let detail = entry.detail();
            if detail.is_empty() {
                writeln!(f)?;
            } else {
                writeln!(f, " {}", detail)?;
            }
        }

        writeln!(f)?;
        writeln!(f, "Summary: {}", self.summary())
    }
}
