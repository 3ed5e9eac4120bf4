//! The schema contract sent with every request, and the validation pass that
//! enforces it on the reply.

use regex::Regex;
use serde_json::{json, Value};
use std::sync::OnceLock;

use crate::error::SchemaViolation;
use crate::models::{Complexity, GenerationResult, PrimitiveType};

/// MIME type requested for the structured reply.
pub const RESPONSE_MIME_TYPE: &str = "application/json";

/// Builds the `responseSchema` describing a [`GenerationResult`].
///
/// Every object lists all of its fields as required. Enumerations are taken
/// from [`Complexity::ALL`] and [`PrimitiveType::ALL`].
pub fn response_schema() -> Value {
    let complexity: Vec<&str> = Complexity::ALL.iter().map(|c| c.as_str()).collect();
    let primitives: Vec<&str> = PrimitiveType::ALL.iter().map(|p| p.as_str()).collect();

    let part = json!({
        "type": "OBJECT",
        "properties": {
            "name": { "type": "STRING", "description": "Body part name, e.g. Head, Torso, Arm_L" },
            "type": { "type": "STRING", "enum": primitives },
            "dimensions": { "type": "STRING" },
            "material": { "type": "STRING", "description": "Name of one of the materials" },
            "description": { "type": "STRING" }
        },
        "required": ["name", "type", "dimensions", "material", "description"],
        "propertyOrdering": ["name", "type", "dimensions", "material", "description"]
    });

    let material = json!({
        "type": "OBJECT",
        "properties": {
            "name": { "type": "STRING" },
            "roughness": { "type": "NUMBER", "minimum": 0.0, "maximum": 1.0 },
            "metallic": { "type": "NUMBER", "minimum": 0.0, "maximum": 1.0 },
            "baseColorHex": { "type": "STRING", "description": "Hex colour in the form #RRGGBB" }
        },
        "required": ["name", "roughness", "metallic", "baseColorHex"],
        "propertyOrdering": ["name", "roughness", "metallic", "baseColorHex"]
    });

    let analysis_fields = [
        "characterName",
        "archetype",
        "estimatedHeight",
        "complexity",
        "topologyStrategy",
        "riggingNotes",
        "parts",
        "materials",
    ];

    json!({
        "type": "OBJECT",
        "properties": {
            "analysis": {
                "type": "OBJECT",
                "properties": {
                    "characterName": { "type": "STRING" },
                    "archetype": { "type": "STRING" },
                    "estimatedHeight": { "type": "STRING" },
                    "complexity": { "type": "STRING", "enum": complexity },
                    "topologyStrategy": { "type": "STRING" },
                    "riggingNotes": { "type": "STRING" },
                    "parts": { "type": "ARRAY", "items": part },
                    "materials": { "type": "ARRAY", "items": material }
                },
                "required": analysis_fields,
                "propertyOrdering": analysis_fields
            },
            "script": { "type": "STRING", "description": "Valid python code using the bpy module" }
        },
        "required": ["analysis", "script"],
        "propertyOrdering": ["analysis", "script"]
    })
}

/// Parses the service's reply and checks it against the contract.
pub fn parse_result(text: &str) -> Result<GenerationResult, SchemaViolation> {
    let value: Value = serde_json::from_str(text).map_err(SchemaViolation::InvalidJson)?;
    let result: GenerationResult = serde_json::from_value(value).map_err(SchemaViolation::Structure)?;
    validate(&result)?;

    for part in result.analysis.dangling_material_refs() {
        tracing::warn!(part = %part.name, material = %part.material, "part references an undeclared material");
    }

    Ok(result)
}

/// Checks the value constraints serde cannot express.
pub fn validate(result: &GenerationResult) -> Result<(), SchemaViolation> {
    for (i, material) in result.analysis.materials.iter().enumerate() {
        let path = |field: &str| format!("analysis.materials[{}].{}", i, field);

        check_unit_interval(&path("roughness"), material.roughness)?;
        check_unit_interval(&path("metallic"), material.metallic)?;

        if !hex_color().is_match(&material.base_color_hex) {
            return Err(SchemaViolation::Constraint {
                path: path("baseColorHex"),
                reason: format!("'{}' is not a #RRGGBB colour", material.base_color_hex),
            });
        }
    }
    Ok(())
}

fn check_unit_interval(path: &str, value: f64) -> Result<(), SchemaViolation> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SchemaViolation::Constraint {
            path: path.to_string(),
            reason: format!("{} is outside [0, 1]", value),
        })
    }
}

fn hex_color() -> &'static Regex {
    static HEX: OnceLock<Regex> = OnceLock::new();
    HEX.get_or_init(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("hex colour pattern is valid"))
}
