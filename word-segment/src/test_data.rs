#![cfg(feature = "__test_data")]

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use super::{FrequencyModel, LengthPenalty, Segmenter, Uniform};

#[test]
fn test_data() {
    crate::test_cases::run(&segmenter(crate_data_dir()));
}

/// Segmenter over the bundled usage counts, with the total taken from the counts
pub fn segmenter(dir: PathBuf) -> Segmenter {
    Segmenter::new(usage(&dir))
}

pub fn usage(dir: &Path) -> FrequencyModel {
    let uni_file = dir.join("zh-unigrams.txt");
    let reader = BufReader::new(File::open(&uni_file).unwrap());
    FrequencyModel::from_reader(reader, ' ', None, LengthPenalty)
        .unwrap_or_else(|e| panic!("error in {:?}: {}", uni_file, e))
}

/// Document-frequency model over the bundled keyword counts
pub fn documents(dir: &Path) -> FrequencyModel<Uniform> {
    let idf_file = dir.join("zh-keyword-idf.txt");
    let reader = BufReader::new(File::open(&idf_file).unwrap());
    FrequencyModel::from_reader(reader, ' ', Some(DOCUMENTS_TOTAL), Uniform)
        .unwrap_or_else(|e| panic!("error in {:?}: {}", idf_file, e))
}

pub fn crate_data_dir() -> PathBuf {
    PathBuf::from(format!("{}/data", env!("CARGO_MANIFEST_DIR")))
}

pub const DOCUMENTS_TOTAL: f64 = 43_772_962_000_000.0;
