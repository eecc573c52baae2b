use std::io::Write;
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;
use refchunk_core::{
    AnnotationSource, ChunkGrid, ChunkWriter, FeatureChunk, MemorySource, RegulatoryPipeline,
    SourceKind,
};
use tempfile::TempDir;

const ANNOTATED: &str = "\
##gff-version 3
chr1\tEnsembl\tDNase1\t1500\t2500\t.\t.\t.\tName=DNase1;Alias=dnase;Class=Open Chromatin;Cell_type=GM12878
chr1\tEnsembl\tCTCF\t4100\t4200\t12.5\t.\t.\tName=CTCF;Class=Transcription Factor;Cell_type=K562
chrX\tEnsembl\tH3K4me3\t10\t30\t.\t.\t.\tName=H3K4me3;Cell_type=HeLa-S3
";

const MOTIF: &str = "\
1\tJaspar\tCTCF\t1990\t2010\t9.3\t+\t.\tName=CTCF:MA0139.1
2\tJaspar\tMax\t500\t512\t6.0\t-\t.\tName=Max:MA0058.1
";

const REGULATORY: &str = "\
chr1\tRegBuild\tPromoter\t100\t5000\t.\t.\t.\tID=ENSR00000001;bound_start=90
";

const MIRNA: &str = "\
chr2\tmiRBase\tmiRNA\t3999\t4000\t.\t+\t.\tName=hsa-mir-21
";

fn write_gz(path: &Path, text: &str) {
    let file = std::fs::File::create(path).unwrap();
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder.write_all(text.as_bytes()).unwrap();
    encoder.finish().unwrap();
}

fn build_directory() -> TempDir {
    let dir = TempDir::new().unwrap();
    for (kind, text) in [
        (SourceKind::Annotated, ANNOTATED),
        (SourceKind::Motif, MOTIF),
        (SourceKind::Regulatory, REGULATORY),
        (SourceKind::Mirna, MIRNA),
    ] {
        write_gz(&dir.path().join(kind.default_file_name()), text);
    }
    dir
}

fn memory_sources(dir: &Path) -> Vec<Box<dyn AnnotationSource>> {
    SourceKind::ALL
        .iter()
        .map(|kind| {
            let source = MemorySource::load(*kind, dir.join(kind.default_file_name())).unwrap();
            Box::new(source) as Box<dyn AnnotationSource>
        })
        .collect()
}

fn run(sources: &[Box<dyn AnnotationSource>], output: &Path) -> Vec<FeatureChunk> {
    let mut writer = ChunkWriter::create(output).unwrap();
    RegulatoryPipeline::new(ChunkGrid::new(2000))
        .run(sources, &mut writer)
        .unwrap();
    drop(writer);

    std::fs::read_to_string(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

#[test]
fn prefixed_and_bare_chromosomes_coalesce() {
    let dir = build_directory();
    let chunks = run(&memory_sources(dir.path()), &dir.path().join("regulatory.json"));

    let mut chromosomes: Vec<_> = chunks.iter().map(|c| c.chromosome.clone()).collect();
    chromosomes.dedup();
    assert_eq!(chromosomes, vec!["1", "2", "X"]);
}

#[test]
fn chromosome_one_in_source_order() {
    let dir = build_directory();
    let chunks = run(&memory_sources(dir.path()), &dir.path().join("regulatory.json"));

    let chr1: Vec<_> = chunks
        .iter()
        .filter(|c| c.chromosome == "1")
        .map(|c| (c.chunk_id, c.features.len(), c.features[0].source.as_str()))
        .collect();
    assert_eq!(
        chr1,
        vec![
            // annotated: DNase1 spans 0-1, CTCF sits in 2
            (0, 1, "Ensembl"),
            (1, 1, "Ensembl"),
            (2, 1, "Ensembl"),
            // motif straddling the first boundary
            (0, 1, "Jaspar"),
            (1, 1, "Jaspar"),
            // regulatory promoter replicated over three chunks
            (0, 1, "RegBuild"),
            (1, 1, "RegBuild"),
            (2, 1, "RegBuild"),
        ]
    );

    let promoter: Vec<_> = chunks
        .iter()
        .filter(|c| c.chromosome == "1" && c.features[0].source == "RegBuild")
        .map(|c| c.features[0].clone())
        .collect();
    assert!(promoter.windows(2).all(|w| w[0] == w[1]));
    assert_eq!((promoter[0].start, promoter[0].end), (100, 5000));
}

#[test]
fn feature_chunk_bounds_and_fields() {
    let dir = build_directory();
    let chunks = run(&memory_sources(dir.path()), &dir.path().join("regulatory.json"));

    let mirna: Vec<_> = chunks
        .iter()
        .filter(|c| c.features[0].source == "miRBase")
        .collect();
    assert_eq!(mirna.len(), 2);
    assert_eq!((mirna[0].chunk_start, mirna[0].chunk_end), (2000, 3999));
    assert_eq!((mirna[1].chunk_start, mirna[1].chunk_end), (4000, 5999));
    assert_eq!(mirna[0].features[0].name.as_deref(), Some("hsa-mir-21"));

    let motif = chunks
        .iter()
        .find(|c| c.chromosome == "2" && c.features[0].source == "Jaspar")
        .unwrap();
    assert_eq!(motif.features[0].feature_type, "Max_motif");
    assert_eq!(motif.features[0].matrix.as_deref(), Some("MA0058.1"));

    let open_chromatin = &chunks[0].features[0];
    assert_eq!(open_chromatin.feature_class.as_deref(), Some("Open Chromatin"));
    assert_eq!(open_chromatin.cell_types, vec!["GM12878".to_string()]);
}

#[cfg(feature = "sqlite")]
#[test]
fn sqlite_staging_matches_memory_sources() {
    use refchunk_core::SqliteSource;

    let dir = build_directory();
    let staged: Vec<Box<dyn AnnotationSource>> = SourceKind::ALL
        .iter()
        .map(|kind| {
            let input = dir.path().join(kind.default_file_name());
            let db = dir.path().join(format!("{}.db", kind.table_name()));
            let source = SqliteSource::load(*kind, input, db, 2).unwrap();
            Box::new(source) as Box<dyn AnnotationSource>
        })
        .collect();

    let from_store = run(&staged, &dir.path().join("staged.json"));
    let from_memory = run(&memory_sources(dir.path()), &dir.path().join("memory.json"));
    assert_eq!(from_store, from_memory);
}
