//! Feature extraction from raw annotation records
//!
//! Each annotation source has its own rules for turning the attributes
//! column into feature fields. Sources are selected by tag through
//! [`SourceKind`], so adding a source means adding a variant and its
//! extractor rather than another string comparison.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{ChunkError, ChunkResult};
use crate::io::GffRecord;
use crate::types::Feature;

/// Decode a `key=value;key=value` attributes column.
///
/// Tokens are trimmed and split on the first `=`; keys are lower-cased.
/// Blank tokens after the last `;` are dropped. Any other token without `=`,
/// a blank one or an entirely empty column included, is malformed.
pub fn parse_attributes(column: &str) -> ChunkResult<HashMap<String, String>> {
    let mut tokens: Vec<&str> = column.split(';').map(str::trim).collect();
    while tokens.len() > 1 && tokens.last().is_some_and(|t| t.is_empty()) {
        tokens.pop();
    }

    let mut attributes = HashMap::new();
    for token in tokens {
        match token.split_once('=') {
            Some((key, value)) => {
                attributes.insert(key.to_lowercase(), value.to_string());
            }
            None => {
                return Err(ChunkError::MalformedAttribute {
                    token: token.to_string(),
                })
            }
        }
    }

    Ok(attributes)
}

/// The annotation sources understood by the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceKind {
    Annotated,
    Regulatory,
    Motif,
    Mirna,
}

impl SourceKind {
    pub const ALL: [SourceKind; 4] = [
        SourceKind::Annotated,
        SourceKind::Motif,
        SourceKind::Regulatory,
        SourceKind::Mirna,
    ];

    pub fn tag(&self) -> &'static str {
        match self {
            SourceKind::Annotated => "annotated",
            SourceKind::Regulatory => "regulatory",
            SourceKind::Motif => "motif",
            SourceKind::Mirna => "mirna",
        }
    }

    /// Table name used by the staging store.
    pub fn table_name(&self) -> &'static str {
        match self {
            SourceKind::Annotated => "annotated_features",
            SourceKind::Regulatory => "regulatory_features_multicell",
            SourceKind::Motif => "motif_features",
            SourceKind::Mirna => "mirna_uniq",
        }
    }

    /// File name of this source inside a regulatory build directory.
    pub fn default_file_name(&self) -> &'static str {
        match self {
            SourceKind::Annotated => "AnnotatedFeatures.gff.gz",
            SourceKind::Regulatory => "RegulatoryFeatures_MultiCell.gff.gz",
            SourceKind::Motif => "MotifFeatures.gff.gz",
            SourceKind::Mirna => "mirna_uniq.gff.gz",
        }
    }

    /// Build a [`Feature`] from one record using this source's rules.
    pub fn extract(&self, record: &GffRecord) -> ChunkResult<Feature> {
        let attributes = parse_attributes(&record.attributes)?;
        let mut feature = shared_columns(record);

        match self {
            SourceKind::Annotated => {
                feature.name = attributes.get("name").cloned();
                feature.alias = attributes.get("alias").cloned();
                feature.feature_class = attributes.get("class").cloned();
                feature.cell_types.extend(attributes.get("cell_type").cloned());
            }
            SourceKind::Regulatory => {}
            SourceKind::Motif => {
                feature.feature_type = format!("{}_motif", record.feature);
                if let Some(name) = attributes.get("name") {
                    let mut parts = name.split(':');
                    feature.name = parts.next().map(str::to_string);
                    feature.matrix = parts.next().map(str::to_string);
                }
            }
            SourceKind::Mirna => {
                feature.name = attributes.get("name").cloned();
            }
        }

        Ok(feature)
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for SourceKind {
    type Err = ChunkError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag.to_lowercase().as_str() {
            "annotated" | "annotated_features" => Ok(SourceKind::Annotated),
            "regulatory" | "regulatory_features_multicell" => Ok(SourceKind::Regulatory),
            "motif" | "motif_features" => Ok(SourceKind::Motif),
            "mirna" | "mirna_uniq" => Ok(SourceKind::Mirna),
            _ => Err(ChunkError::UnknownSource(tag.to_string())),
        }
    }
}

fn resolve_chromosome(seqname: &str) -> Option<String> {
    let seqname = seqname.trim();
    if seqname.is_empty() || seqname == "." {
        None
    } else {
        Some(seqname.to_string())
    }
}

fn shared_columns(record: &GffRecord) -> Feature {
    Feature {
        chromosome: resolve_chromosome(&record.seqname),
        source: record.source.clone(),
        feature_type: record.feature.clone(),
        start: record.start,
        end: record.end,
        score: record.score.clone(),
        strand: record.strand.clone(),
        frame: record.frame.clone(),
        name: None,
        alias: None,
        feature_class: None,
        matrix: None,
        cell_types: Vec::new(),
    }
}
