use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;
use word_segment::{FrequencyModel, Uniform};

/// Both frequency models, stored in bincode so they load without re-parsing the counts
#[derive(Deserialize, Serialize)]
pub struct Snapshot {
    pub usage: FrequencyModel,
    pub documents: Option<FrequencyModel<Uniform>>,
}

impl Snapshot {
    /// Load a snapshot from the given file name
    pub fn load(path: &Path) -> Result<Self> {
        let f = File::open(path)
            .with_context(|| format!("failed to open snapshot {}", path.display()))?;
        let snapshot = bincode::deserialize_from::<_, Self>(BufReader::with_capacity(
            32 * 1024 * 1024,
            f,
        ))
        .with_context(|| format!("failed to deserialize snapshot {}", path.display()))?;
        info!(path = %path.display(), words = snapshot.usage.len(), "loaded snapshot");
        Ok(snapshot)
    }

    /// Dump the snapshot to the given file name
    pub fn dump(&self, path: &Path) -> Result<()> {
        let f = File::create(path)
            .with_context(|| format!("failed to create snapshot {}", path.display()))?;
        let mut writer = BufWriter::with_capacity(32 * 1024 * 1024, f);
        bincode::serialize_into(&mut writer, self)
            .with_context(|| format!("failed to serialize snapshot {}", path.display()))?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use word_segment::LengthPenalty;

    #[test]
    fn dump_and_load() {
        let counts = vec![("研究", 100), ("生", 50)];
        let usage = FrequencyModel::new(counts, Some(1000.0), LengthPenalty).unwrap();
        let documents = FrequencyModel::new(vec![("研究", 7)], Some(100.0), Uniform).unwrap();
        let snapshot = Snapshot {
            usage,
            documents: Some(documents),
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("models.bin");
        snapshot.dump(&path).unwrap();

        let loaded = Snapshot::load(&path).unwrap();
        assert_eq!(loaded.usage.total(), 1000.0);
        assert_eq!(loaded.usage.count("研究"), Some(100));
        assert_eq!(loaded.usage.probability("研究生"), snapshot.usage.probability("研究生"));
        let documents = loaded.documents.unwrap();
        assert_eq!(documents.probability("研究"), 0.07);
        assert_eq!(documents.probability("生"), 0.01);
    }
}
