//! The structured analysis returned by the generative service.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Overall modeling effort the service estimates for the character.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Complexity {
    Low,
    Medium,
    High,
}

impl Complexity {
    pub const ALL: [Complexity; 3] = [Complexity::Low, Complexity::Medium, Complexity::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Complexity::Low => "Low",
            Complexity::Medium => "Medium",
            Complexity::High => "High",
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The primitive shapes a block-out may be assembled from.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    Cube,
    Sphere,
    Cylinder,
    Cone,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 4] = [
        PrimitiveType::Cube,
        PrimitiveType::Sphere,
        PrimitiveType::Cylinder,
        PrimitiveType::Cone,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PrimitiveType::Cube => "Cube",
            PrimitiveType::Sphere => "Sphere",
            PrimitiveType::Cylinder => "Cylinder",
            PrimitiveType::Cone => "Cone",
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A PBR-style surface description.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MaterialSpec {
    pub name: String,
    pub roughness: f64,
    pub metallic: f64,
    pub base_color_hex: String,
}

impl MaterialSpec {
    /// Parses `base_color_hex` into an RGB triple, if it is well formed.
    pub fn rgb(&self) -> Option<(u8, u8, u8)> {
        let hex = self.base_color_hex.strip_prefix('#')?;
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some((channel(0)?, channel(2)?, channel(4)?))
    }
}

/// One primitive of the block-out, named by body part.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MeshPart {
    pub name: String,
    #[serde(rename = "type")]
    pub primitive: PrimitiveType,
    pub dimensions: String,
    /// Should name one of the analysis' [`MaterialSpec`]s.
    pub material: String,
    pub description: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CharacterAnalysis {
    pub character_name: String,
    pub archetype: String,
    pub estimated_height: String,
    pub complexity: Complexity,
    pub topology_strategy: String,
    pub rigging_notes: String,
    pub parts: Vec<MeshPart>,
    pub materials: Vec<MaterialSpec>,
}

impl CharacterAnalysis {
    pub fn material(&self, name: &str) -> Option<&MaterialSpec> {
        self.materials.iter().find(|m| m.name == name)
    }

    /// Parts whose `material` does not match any declared material.
    pub fn dangling_material_refs(&self) -> impl Iterator<Item = &MeshPart> {
        self.parts.iter().filter(|p| self.material(&p.material).is_none())
    }
}

/// A complete, validated reply: the analysis plus the generated build script.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GenerationResult {
    pub analysis: CharacterAnalysis,
    #[serde(alias = "blenderScript")]
    pub script: String,
}
