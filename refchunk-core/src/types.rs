use serde::{Deserialize, Serialize};

/// 1-based genomic coordinate
pub type GenomicPos = u64;
pub type ChunkId = u64;

/// Strips a leading `chr` so that `chr1` and `1` name the same chromosome.
pub fn normalize_chromosome(label: &str) -> &str {
    label.strip_prefix("chr").unwrap_or(label)
}

/// A bounded slice of one chromosome's sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenomeChunk {
    pub chromosome: String,
    pub chunk_id: ChunkId,
    pub start: GenomicPos,
    pub end: GenomicPos,
    pub sequence: String,
}

/// Canonical annotation feature built from one 9-column record.
///
/// `chromosome` is `None` when the record's seqname could not be resolved
/// (empty or `.`). Score, strand and frame keep their raw column text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    pub chromosome: Option<String>,
    pub source: String,
    pub feature_type: String,
    pub start: GenomicPos,
    pub end: GenomicPos,
    pub score: String,
    pub strand: String,
    pub frame: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(rename = "class", default, skip_serializing_if = "Option::is_none")]
    pub feature_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cell_types: Vec<String>,
}

impl Feature {
    /// Closed-interval overlap with `[start, end]`.
    pub fn overlaps(&self, start: GenomicPos, end: GenomicPos) -> bool {
        self.start <= end && start <= self.end
    }
}

/// All features of one source overlapping a chunk's coordinate range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureChunk {
    pub chromosome: String,
    pub chunk_id: ChunkId,
    #[serde(rename = "start")]
    pub chunk_start: GenomicPos,
    #[serde(rename = "end")]
    pub chunk_end: GenomicPos,
    pub features: Vec<Feature>,
}

impl FeatureChunk {
    pub fn new(
        chromosome: String,
        chunk_id: ChunkId,
        chunk_start: GenomicPos,
        chunk_end: GenomicPos,
    ) -> Self {
        Self {
            chromosome,
            chunk_id,
            chunk_start,
            chunk_end,
            features: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature(start: GenomicPos, end: GenomicPos) -> Feature {
        Feature {
            chromosome: Some("chr7".to_string()),
            source: "Ensembl".to_string(),
            feature_type: "enhancer".to_string(),
            start,
            end,
            score: ".".to_string(),
            strand: "+".to_string(),
            frame: ".".to_string(),
            name: None,
            alias: None,
            feature_class: None,
            matrix: None,
            cell_types: Vec::new(),
        }
    }

    #[test]
    fn test_normalize_chromosome() {
        assert_eq!(normalize_chromosome("chr1"), "1");
        assert_eq!(normalize_chromosome("1"), "1");
        assert_eq!(normalize_chromosome("chrX"), "X");
        // only the prefix is stripped
        assert_eq!(normalize_chromosome("scaffold_chr2"), "scaffold_chr2");
    }

    #[test]
    fn test_feature_overlap_is_closed() {
        let f = feature(100, 200);
        assert!(f.overlaps(200, 300));
        assert!(f.overlaps(1, 100));
        assert!(!f.overlaps(201, 300));
    }

    #[test]
    fn test_feature_json_shape() {
        let mut f = feature(1500, 2500);
        f.feature_class = Some("Promoter".to_string());
        f.cell_types.push("K562".to_string());

        let json = serde_json::to_value(&f).unwrap();
        assert_eq!(json["featureType"], "enhancer");
        assert_eq!(json["class"], "Promoter");
        assert_eq!(json["cellTypes"][0], "K562");
        assert!(json.get("matrix").is_none());
    }

    #[test]
    fn test_feature_chunk_json_shape() {
        let chunk = FeatureChunk::new("1".to_string(), 3, 6000, 7999);
        let json = serde_json::to_value(&chunk).unwrap();
        assert_eq!(json["chunkId"], 3);
        assert_eq!(json["start"], 6000);
        assert_eq!(json["end"], 7999);
        assert!(json["features"].as_array().unwrap().is_empty());
    }
}
