//! Gene pools: the classified beat corpus the search draws from.
//!
//! A corpus is a set of SPEAC buckets. Each bucket holds the beats filed
//! under one category; the engine treats bucket names as opaque.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::schema::Beat;

/// Read-only set of eligible beats loaded from one or more buckets.
#[derive(Debug, Clone, Default)]
pub struct GenePool {
    name: String,
    beats: Vec<Beat>,
}

impl GenePool {
    /// Build a pool, dropping beats that are empty, contain rests or have
    /// fewer than two notes.
    pub fn from_beats(name: impl Into<String>, beats: Vec<Beat>) -> Self {
        let name = name.into();
        let total = beats.len();
        let beats: Vec<Beat> = beats.into_iter().filter(Beat::is_eligible).collect();
        if beats.len() < total {
            debug!(
                "Gene pool {}: dropped {} ineligible beats of {}",
                name,
                total - beats.len(),
                total
            );
        }
        Self { name, beats }
    }

    /// Load one bucket from a source.
    pub fn load<S: GenePoolSource + ?Sized>(source: &S, bucket: &str) -> Result<Self, CorpusError> {
        Ok(Self::from_beats(bucket, source.load(bucket)?))
    }

    /// Load every bucket of a source, in bucket order.
    pub fn load_all<S: GenePoolSource + ?Sized>(source: &S) -> Result<Self, CorpusError> {
        let mut beats = Vec::new();
        for bucket in source.buckets()? {
            beats.extend(source.load(&bucket)?);
        }
        Ok(Self::from_beats("*", beats))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn beats(&self) -> &[Beat] {
        &self.beats
    }

    pub fn len(&self) -> usize {
        self.beats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beats.is_empty()
    }
}

/// Anything that can list buckets and yield their beats in stored order.
pub trait GenePoolSource {
    /// Bucket identifiers, sorted.
    fn buckets(&self) -> Result<Vec<String>, CorpusError>;

    /// All beats stored under a bucket, in document order.
    fn load(&self, bucket: &str) -> Result<Vec<Beat>, CorpusError>;
}

/// On-disk bucket document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BeatList {
    /// SPEAC category this list was filed under.
    #[serde(default)]
    pub speac_id: Option<String>,
    #[serde(default)]
    pub beats: Vec<Beat>,
}

/// Directory of `<bucket>.json` files, each holding a [`BeatList`].
#[derive(Debug, Clone)]
pub struct JsonCorpus {
    root: PathBuf,
}

impl JsonCorpus {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn bucket_path(&self, bucket: &str) -> PathBuf {
        self.root.join(format!("{}.json", bucket))
    }

    /// Write a bucket file, replacing any previous contents.
    pub fn save(&self, bucket: &str, beats: &[Beat]) -> Result<PathBuf, CorpusError> {
        let path = self.bucket_path(bucket);
        fs::create_dir_all(&self.root).map_err(|source| CorpusError::Io {
            path: self.root.clone(),
            source,
        })?;
        let list = BeatList {
            speac_id: Some(bucket.to_string()),
            beats: beats.to_vec(),
        };
        let json = serde_json::to_string_pretty(&list).map_err(|source| CorpusError::Json {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, json).map_err(|source| CorpusError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

impl GenePoolSource for JsonCorpus {
    fn buckets(&self) -> Result<Vec<String>, CorpusError> {
        let entries = fs::read_dir(&self.root).map_err(|source| CorpusError::Io {
            path: self.root.clone(),
            source,
        })?;

        let mut buckets = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| CorpusError::Io {
                path: self.root.clone(),
                source,
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|e| e == "json")
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
            {
                buckets.push(stem.to_string());
            }
        }
        buckets.sort();
        Ok(buckets)
    }

    fn load(&self, bucket: &str) -> Result<Vec<Beat>, CorpusError> {
        let path = self.bucket_path(bucket);
        if !path.exists() {
            return Err(CorpusError::UnknownBucket(bucket.to_string()));
        }
        let content = fs::read_to_string(&path).map_err(|source| CorpusError::Io {
            path: path.clone(),
            source,
        })?;
        let list: BeatList =
            serde_json::from_str(&content).map_err(|source| CorpusError::Json {
                path: path.clone(),
                source,
            })?;
        if let Some(id) = &list.speac_id
            && id != bucket
        {
            warn!("Bucket file {} is labelled {}", path.display(), id);
        }
        Ok(list.beats)
    }
}

/// Errors reading or writing a corpus.
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Malformed bucket file {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("No bucket named {0}")]
    UnknownBucket(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Element, Note, Rest, Step};
    use tempfile::tempdir;

    fn beat(step: Step) -> Beat {
        Beat::two_part(
            vec![Note::new(step, 5, 24)],
            48,
            vec![Note::new(step, 3, 48)],
        )
    }

    #[test]
    fn test_from_beats_filters_ineligible() {
        let mut with_rest = beat(Step::C);
        with_rest.elements.push(Element::Rest(Rest {
            duration: Some(12),
            voice: None,
            staff: None,
        }));
        let single = Beat::from_notes(vec![Note::new(Step::D, 4, 48)]);

        let pool = GenePool::from_beats(
            "S1",
            vec![beat(Step::A), with_rest, Beat::default(), single, beat(Step::B)],
        );
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.beats()[0], beat(Step::A));
        assert_eq!(pool.beats()[1], beat(Step::B));
        assert_eq!(pool.name(), "S1");
    }

    #[test]
    fn test_json_corpus_roundtrip() {
        let dir = tempdir().unwrap();
        let corpus = JsonCorpus::new(dir.path());

        corpus.save("P1", &[beat(Step::C), beat(Step::D)]).unwrap();
        corpus.save("A1", &[beat(Step::E)]).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        assert_eq!(corpus.buckets().unwrap(), vec!["A1", "P1"]);

        let pool = GenePool::load(&corpus, "P1").unwrap();
        assert_eq!(pool.beats(), &[beat(Step::C), beat(Step::D)]);

        let all = GenePool::load_all(&corpus).unwrap();
        assert_eq!(all.beats(), &[beat(Step::E), beat(Step::C), beat(Step::D)]);
    }

    #[test]
    fn test_unknown_bucket() {
        let dir = tempdir().unwrap();
        let corpus = JsonCorpus::new(dir.path());
        assert!(matches!(
            corpus.load("E9"),
            Err(CorpusError::UnknownBucket(b)) if b == "E9"
        ));
    }

    #[test]
    fn test_malformed_bucket() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("C1.json"), "{ not json").unwrap();
        let corpus = JsonCorpus::new(dir.path());
        assert!(matches!(corpus.load("C1"), Err(CorpusError::Json { .. })));
    }
}
