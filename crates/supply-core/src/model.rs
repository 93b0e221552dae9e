//! Domain records shared by the generator, the index pipeline and the tools

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A supplier row from `suppliers.csv`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supplier {
    pub supplier_id: String,
    pub supplier_name: String,
    pub country: String,
    pub city: String,
    pub industry_type: String,
}

/// A material row from `materials.csv`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    pub material_id: String,
    pub material_name: String,
    /// Foreign key into the supplier table. May dangle.
    pub supplied_by_id: String,
    pub criticality_level: Criticality,
}

/// Business criticality of a material, ordered `Low < Medium < High < Critical`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Criticality {
    Low,
    Medium,
    High,
    Critical,
}

impl Criticality {
    /// All levels in ascending order
    pub const ALL: [Criticality; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }
}

impl fmt::Display for Criticality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a criticality label is not one of the four known levels
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown criticality level '{0}'")]
pub struct ParseCriticalityError(pub String);

impl FromStr for Criticality {
    type Err = ParseCriticalityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            _ => Err(ParseCriticalityError(s.to_string())),
        }
    }
}

impl TryFrom<String> for Criticality {
    type Error = ParseCriticalityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Criticality> for String {
    fn from(value: Criticality) -> Self {
        value.as_str().to_string()
    }
}

/// Flat metadata attached to every indexed segment.
///
/// Field names are part of the persisted index format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentMetadata {
    /// `"<materials file name>#<material_id>"`
    pub source: String,
    pub material_id: String,
    pub material_name: String,
    #[serde(default)]
    pub criticality_level: Option<Criticality>,
    #[serde(default)]
    pub supplier_id: String,
    #[serde(default)]
    pub supplier_name: String,
    #[serde(default)]
    pub supplier_resolved: bool,
    #[serde(default)]
    pub chunk_index: usize,
}

impl SegmentMetadata {
    /// Build a source locator for a material row
    pub fn source_locator(source_name: &str, material_id: &str) -> String {
        format!("{source_name}#{material_id}")
    }

    /// Material id recovered from the source locator
    pub fn material_id_from_source(&self) -> Option<&str> {
        self.source
            .rsplit_once('#')
            .map(|(_, id)| id)
            .filter(|id| !id.is_empty())
    }

    /// Criticality label, or `Unknown` when the entry carries none
    pub fn criticality_label(&self) -> &'static str {
        self.criticality_level.map_or("Unknown", Criticality::as_str)
    }
}

/// A rendered material description plus its metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedDocument {
    pub description: String,
    pub metadata: SegmentMetadata,
}

/// A bounded slice of a description carrying a copy of the parent metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSegment {
    pub content: String,
    pub metadata: SegmentMetadata,
}

/// A segment returned by a similarity search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSegment {
    pub segment: TextSegment,
    /// Cosine similarity to the query
    pub score: f32,
}
