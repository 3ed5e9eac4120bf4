//! Terminal presentation of a generation result.

use colored::*;
use neuromesh_core::{CharacterAnalysis, MaterialSpec};
use std::fmt::Write as _;

const RULE_WIDTH: usize = 60;
const PART_COLUMNS: [&str; 5] = ["NAME", "TYPE", "DIMENSIONS", "MATERIAL", "DESCRIPTION"];

fn rule() -> String {
    "─".repeat(RULE_WIDTH)
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{}", title.to_uppercase().bold().cyan());
}

fn swatch(material: &MaterialSpec) -> ColoredString {
    match material.rgb() {
        Some((r, g, b)) => "●".truecolor(r, g, b),
        None => "○".normal(),
    }
}

/// Renders every field of the analysis as a read-only card.
pub fn analysis_card(analysis: &CharacterAnalysis) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", rule().dimmed());
    let _ = writeln!(
        out,
        "{}  {}",
        analysis.character_name.to_uppercase().bold().bright_cyan(),
        format!("REF: {}", analysis.archetype).dimmed()
    );
    let _ = writeln!(out, "{}", rule().dimmed());
    let _ = writeln!(out, "{:<14} {}", "Complexity".magenta(), analysis.complexity.to_string().bold());
    let _ = writeln!(out, "{:<14} {}", "Est. Height".magenta(), analysis.estimated_height.bold());

    heading(&mut out, "Topology Strategy");
    let _ = writeln!(out, "{}", analysis.topology_strategy);

    heading(&mut out, "Rigging Notes");
    let _ = writeln!(out, "{}", analysis.rigging_notes.italic());

    heading(&mut out, "Block-out Parts");
    if analysis.parts.is_empty() {
        let _ = writeln!(out, "{}", "(none)".dimmed());
    } else {
        let [name, kind, dimensions, material, description] = PART_COLUMNS;
        let _ = writeln!(out, "{:<16} {:<10} {:<16} {:<12} {}", name, kind, dimensions, material, description);
        for part in &analysis.parts {
            let material = if analysis.material(&part.material).is_some() {
                part.material.normal()
            } else {
                part.material.yellow()
            };
            let _ = writeln!(
                out,
                "{:<16} {:<10} {:<16} {:<12} {}",
                part.name,
                part.primitive.to_string(),
                part.dimensions,
                material,
                part.description.dimmed()
            );
        }
    }

    heading(&mut out, "Detected Materials");
    if analysis.materials.is_empty() {
        let _ = writeln!(out, "{}", "(none)".dimmed());
    }
    for material in &analysis.materials {
        let _ = writeln!(
            out,
            "{} {:<16} {}  roughness {:.2}  metallic {:.2}",
            swatch(material),
            material.name,
            material.base_color_hex.dimmed(),
            material.roughness,
            material.metallic
        );
    }

    out
}

/// The build script with a line-number gutter.
pub fn script_block(script: &str) -> String {
    let mut out = String::new();
    let lines: Vec<&str> = script.lines().collect();
    let width = lines.len().max(1).to_string().len();

    let _ = writeln!(out, "{}", "GENERATED BLUEPRINT (PYTHON)".bold().blue());
    let _ = writeln!(out, "{}", rule().dimmed());
    for (i, line) in lines.iter().enumerate() {
        let _ = writeln!(out, "{} {}", format!("{:>width$} │", i + 1, width = width).dimmed(), line);
    }
    let _ = writeln!(out, "{}", rule().dimmed());
    out
}

/// How to run the exported script in Blender.
pub fn instructions(script_file: Option<&str>) -> String {
    let script = script_file.unwrap_or("the build script");
    let steps = [
        format!("Open {} in a text editor or keep its path handy.", script),
        format!("Open {} (v3.0+).", "Blender".truecolor(255, 165, 0)),
        "Go to the Scripting tab.".to_string(),
        "Open or paste the script.".to_string(),
        "Press \"Run Script\" to generate the mesh.".to_string(),
        "Export as .FBX via File > Export > FBX.".bold().to_string(),
    ];

    let mut out = String::new();
    heading(&mut out, "Instructions");
    for (i, step) in steps.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, step);
    }
    out
}
