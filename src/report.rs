//! Human-readable rendering of analysis results

use std::path::Path;

use crate::analysis::AnalysisRecord;
use crate::naming::NamingStyle;
use crate::organize::planner::MoveOutcome;
use crate::organize::rename::{BatchEntry, BatchStatus, BatchSummary};
use crate::organize::{BatchOptions, OrganizationPlan};

/// Files listed per category before eliding
const FILES_PER_CATEGORY: usize = 5;
/// Moved files listed before eliding
const MOVES_SHOWN: usize = 10;
/// Color families shown in the batch insights
const COLORS_SHOWN: usize = 3;

fn file_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

/// "screenshots" -> "Screenshots", "camera_photos" -> "Camera Photos"
fn title_case(label: &str) -> String {
    label
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Short answer for a single image
pub fn render_suggestion(suggested_name: &str, style: NamingStyle) -> String {
    format!(
        "💡 Suggested name: {}\n🎨 Style: {}\n🔍 Analysis: Advanced heuristics",
        suggested_name, style
    )
}

/// Full breakdown of a single image
pub fn render_detailed(
    path: &Path,
    suggested_name: &str,
    style: NamingStyle,
    record: &AnalysisRecord,
) -> String {
    let hints = if record.filename_hints.is_empty() {
        "none".to_string()
    } else {
        record
            .filename_hints
            .iter()
            .map(|h| h.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut lines = vec![
        "🎯 Enhanced Image Analysis".to_string(),
        format!("📁 File: {}", file_name(path)),
        format!("📍 Path: {}", path.display()),
        format!("📊 Suggested Name: {}", suggested_name),
        format!("🎨 Naming Style: {}", style),
        String::new(),
        "🔍 Technical Details:".to_string(),
        format!(
            "- Dimensions: {}x{} ({} ratio)",
            record.width, record.height, record.aspect_ratio
        ),
        format!("- Size Category: {}", record.size_category),
        format!("- File Size: {}", record.file_size_category),
        format!("- Orientation: {}", record.orientation),
        String::new(),
        "🎨 Visual Analysis:".to_string(),
        format!("- Color Family: {}", record.color_family),
        format!("- Brightness: {:.2}", record.brightness),
        format!("- Grayscale: {}", record.is_grayscale),
        String::new(),
        "📝 Content Insights:".to_string(),
        format!("- Detected Hints: {}", hints),
        format!(
            "- Source Type: {}",
            if record.is_camera() { "camera" } else { "unknown" }
        ),
    ];

    if let Some(kind) = record.kind {
        lines.push(format!("- Image Type: {}", kind.as_str()));
    }

    if !record.dominant_colors.is_empty() {
        let colors = record
            .dominant_colors
            .iter()
            .take(3)
            .map(|c| format!("{} ({:.1}%)", c.hex, c.percentage))
            .collect::<Vec<_>>()
            .join(", ");
        lines.push(format!("- Top Colors: {}", colors));
    }

    lines.join("\n")
}

/// One line per file of a directory run
pub fn render_batch_entry(entry: &BatchEntry, total: usize) -> String {
    let progress = format!("[{}/{}]", entry.index, total);
    let original = entry.original_name();
    let suggested = entry.suggested_name.as_deref().unwrap_or_default();

    match &entry.status {
        BatchStatus::Suggested => format!("{} 💡 {} → {}", progress, original, suggested),
        BatchStatus::Renamed => format!("{} ✅ {} → {}", progress, original, suggested),
        BatchStatus::RenameFailed { error } => {
            format!("{} ❌ Failed to rename {}: {}", progress, original, error)
        }
        BatchStatus::AnalysisFailed { error } => {
            format!("{} ❌ Error processing {}: {}", progress, original, error)
        }
    }
}

/// Summary of a directory run
pub fn render_batch(entries: &[BatchEntry], options: &BatchOptions) -> String {
    let total = entries.len();
    let summary = BatchSummary::from_entries(entries);

    let mut lines = vec![
        "🎯 Enhanced Image Analysis Complete".to_string(),
        format!(
            "📊 Processed {} image files using {} style",
            total, options.style
        ),
        String::new(),
    ];

    if options.rename {
        lines.push(format!("✅ Successfully renamed {} files:", summary.renamed));
    } else {
        lines.push("💡 Suggested names (use --rename to apply):".to_string());
    }
    lines.push(String::new());
    lines.extend(entries.iter().map(|e| render_batch_entry(e, total)));

    if !summary.color_families.is_empty() {
        let colors = summary
            .color_families
            .iter()
            .take(COLORS_SHOWN)
            .map(|(family, count)| format!("{}: {}", family, count))
            .collect::<Vec<_>>()
            .join(", ");
        let orientations = summary
            .orientations
            .iter()
            .map(|(orientation, count)| format!("{}: {}", orientation, count))
            .collect::<Vec<_>>()
            .join(", ");

        lines.push(String::new());
        lines.push("📈 Analysis Insights:".to_string());
        lines.push(format!("🎨 Color distribution: {}", colors));
        lines.push(format!("📐 Orientations: {}", orientations));
    }

    lines.join("\n")
}

/// Category listing and, when executed, the move results
pub fn render_plan(plan: &OrganizationPlan) -> String {
    let mut lines = vec![
        "📁 Image Organization Plan".to_string(),
        format!("📊 Method: {}", plan.method),
        format!(
            "🔍 Found {} images in {} categories",
            plan.total_files(),
            plan.categories.len()
        ),
        String::new(),
    ];

    for group in &plan.categories {
        lines.push(format!(
            "📂 {} ({} files):",
            title_case(&group.name),
            group.files.len()
        ));
        for file in group.files.iter().take(FILES_PER_CATEGORY) {
            lines.push(format!("   • {}", file_name(file)));
        }
        if group.files.len() > FILES_PER_CATEGORY {
            lines.push(format!(
                "   • ... and {} more",
                group.files.len() - FILES_PER_CATEGORY
            ));
        }
        lines.push(String::new());
    }

    let moves = match &plan.moves {
        Some(moves) => moves,
        None => {
            lines.push("💡 Use --create-folders to actually organize the files".to_string());
            return lines.join("\n");
        }
    };

    let mut moved = Vec::new();
    let mut errors = Vec::new();
    for outcome in moves {
        match outcome {
            MoveOutcome::Moved { category, from, to } => moved.push(format!(
                "✅ {} → {}/{}",
                file_name(from),
                category,
                file_name(to)
            )),
            MoveOutcome::Failed { file, error, .. } => {
                errors.push(format!("❌ Failed to move {}: {}", file_name(file), error))
            }
            MoveOutcome::FolderFailed { category, error } => {
                errors.push(format!("❌ Failed to create folder {}: {}", category, error))
            }
        }
    }

    lines.push("🎯 Organization Results:".to_string());
    lines.push(format!("✅ Successfully moved {} files", moved.len()));
    lines.push(format!("❌ Encountered {} errors", errors.len()));
    lines.push(String::new());

    if !moved.is_empty() {
        lines.push("Moved Files:".to_string());
        let extra = moved.len().saturating_sub(MOVES_SHOWN);
        lines.extend(moved.into_iter().take(MOVES_SHOWN));
        if extra > 0 {
            lines.push(format!("... and {} more", extra));
        }
    }
    if !errors.is_empty() {
        lines.push("Errors:".to_string());
        lines.extend(errors);
    }

    lines.join("\n")
}
