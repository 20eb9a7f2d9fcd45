use std::{
    fmt,
    path::{Path, PathBuf},
};

use rand::{SeedableRng, seq::SliceRandom};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::pipeline::Label;

pub const FAKE_FILE: &str = "fake.csv";
pub const REAL_FILE: &str = "true.csv";
pub const TEXT_COLUMN: &str = "text";

/// Sample articles used whenever no external corpus can be read.
const EMBEDDED_FAKE: [&str; 7] = [
    "Aliens have landed on Earth according to secret NASA documents!",
    "You won't believe this one weird trick that doctors hate!",
    "The government is hiding a cure for cancer!",
    "Celebrities are secretly lizard people!",
    "5G towers are spreading the virus!",
    "BREAKING: Shocking revelation will change everything!",
    "This LEAKED document exposes the truth they don't want you to know!",
];

const EMBEDDED_REAL: [&str; 7] = [
    "The government announced a new policy to support farmers.",
    "Scientists published research findings on climate change.",
    "The president met with world leaders to discuss the economy.",
    "Stock markets showed mixed results today.",
    "Congress passed a new infrastructure bill.",
    "Researchers at the university completed a five-year study.",
    "The company reported quarterly earnings that met expectations.",
];

#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("corpus file {} not found", .0.display())]
    Missing(PathBuf),
    #[error("failed to read {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("{} has no `{column}` column", path.display())]
    MissingColumn { path: PathBuf, column: &'static str },
    #[error("{} contains no usable rows", .0.display())]
    Empty(PathBuf),
}

/// Labelled training texts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Corpus {
    pub texts: Vec<String>,
    pub labels: Vec<Label>,
}

impl Corpus {
    pub fn push(&mut self, text: impl Into<String>, label: Label) {
        self.texts.push(text.into());
        self.labels.push(label);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.texts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// Number of examples carrying `label`.
    #[must_use]
    pub fn count(&self, label: Label) -> usize {
        self.labels.iter().filter(|&&l| l == label).count()
    }

    /// The built-in sample set, seven articles per class.
    #[must_use]
    pub fn embedded() -> Self {
        let mut corpus = Self::default();
        for text in EMBEDDED_FAKE {
            corpus.push(text, Label::Fake);
        }
        for text in EMBEDDED_REAL {
            corpus.push(text, Label::Real);
        }
        corpus
    }
}

/// Where training data comes from.
pub trait CorpusSource {
    fn load(&self) -> Result<Corpus, CorpusError>;

    /// Short description for logs and reports.
    fn describe(&self) -> String;
}

/// Which corpus a training run actually used.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CorpusOrigin {
    Source { description: String },
    Fallback { reason: String },
}

impl fmt::Display for CorpusOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source { description } => write!(f, "{description}"),
            Self::Fallback { reason } => write!(f, "embedded sample corpus ({reason})"),
        }
    }
}

/// `fake.csv` and `true.csv` under one directory, each with a `text` column.
#[derive(Clone, Debug)]
pub struct CsvCorpus {
    data_dir: PathBuf,
    sample_per_class: usize,
    seed: u64,
}

impl CsvCorpus {
    pub fn new(data_dir: impl Into<PathBuf>, sample_per_class: usize, seed: u64) -> Self {
        Self {
            data_dir: data_dir.into(),
            sample_per_class,
            seed,
        }
    }

    fn read_texts(path: &Path) -> Result<Vec<String>, CorpusError> {
        if !path.is_file() {
            return Err(CorpusError::Missing(path.to_path_buf()));
        }
        let csv_error = |source: csv::Error| CorpusError::Csv {
            path: path.to_path_buf(),
            source,
        };
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(csv_error)?;
        let column = reader
            .headers()
            .map_err(csv_error)?
            .iter()
            .position(|header| header.trim() == TEXT_COLUMN)
            .ok_or_else(|| CorpusError::MissingColumn {
                path: path.to_path_buf(),
                column: TEXT_COLUMN,
            })?;

        let mut texts = Vec::new();
        for record in reader.records() {
            let record = record.map_err(csv_error)?;
            if let Some(text) = record.get(column).filter(|t| !t.trim().is_empty()) {
                texts.push(text.to_string());
            }
        }
        if texts.is_empty() {
            return Err(CorpusError::Empty(path.to_path_buf()));
        }
        debug!(path = %path.display(), rows = texts.len(), "Read corpus file");
        Ok(texts)
    }

    fn sample(&self, mut texts: Vec<String>, rng: &mut ChaCha8Rng) -> Vec<String> {
        if texts.len() > self.sample_per_class {
            texts.shuffle(rng);
            texts.truncate(self.sample_per_class);
        }
        texts
    }
}

impl CorpusSource for CsvCorpus {
    fn load(&self) -> Result<Corpus, CorpusError> {
        let fake = Self::read_texts(&self.data_dir.join(FAKE_FILE))?;
        let real = Self::read_texts(&self.data_dir.join(REAL_FILE))?;

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let fake = self.sample(fake, &mut rng);
        let real = self.sample(real, &mut rng);
        info!(fake = fake.len(), real = real.len(), "Loaded articles from CSV corpus");

        let mut rows = fake
            .into_iter()
            .map(|text| (text, Label::Fake))
            .chain(real.into_iter().map(|text| (text, Label::Real)))
            .collect::<Vec<_>>();
        rows.shuffle(&mut rng);

        let mut corpus = Corpus::default();
        for (text, label) in rows {
            corpus.push(text, label);
        }
        Ok(corpus)
    }

    fn describe(&self) -> String {
        format!("CSV corpus at {}", self.data_dir.display())
    }
}

/// Always yields the embedded sample set.
#[derive(Clone, Copy, Debug, Default)]
pub struct EmbeddedCorpus;

impl CorpusSource for EmbeddedCorpus {
    fn load(&self) -> Result<Corpus, CorpusError> {
        Ok(Corpus::embedded())
    }

    fn describe(&self) -> String {
        "embedded sample corpus".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn write(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).expect("write corpus file");
    }

    #[test]
    fn test_embedded_corpus_is_balanced() {
        let corpus = Corpus::embedded();
        assert_eq!(corpus.len(), 14);
        assert_eq!(corpus.count(Label::Fake), 7);
        assert_eq!(corpus.count(Label::Real), 7);
    }

    #[test]
    fn test_csv_corpus_reads_text_column() {
        let dir = tempfile::tempdir().expect("temp dir");
        write(
            dir.path(),
            FAKE_FILE,
            "title,text,subject\nA,\"Aliens, again!\",news\nB,Lizard people,news\nC,,news\n",
        );
        write(dir.path(), REAL_FILE, "text\nCongress passed a bill.\n");

        let corpus = CsvCorpus::new(dir.path(), 500, 42).load().expect("readable corpus");
        assert_eq!(corpus.len(), 3);
        assert_eq!(corpus.count(Label::Fake), 2);
        assert_eq!(corpus.count(Label::Real), 1);
        assert!(corpus.texts.contains(&"Aliens, again!".to_string()));
    }

    #[test]
    fn test_csv_corpus_samples_per_class() {
        let dir = tempfile::tempdir().expect("temp dir");
        let rows = (0..20).map(|i| format!("fake article {i}\n")).collect::<String>();
        write(dir.path(), FAKE_FILE, &format!("text\n{rows}"));
        write(dir.path(), REAL_FILE, "text\nreal one\nreal two\n");

        let source = CsvCorpus::new(dir.path(), 5, 42);
        let corpus = source.load().expect("readable corpus");
        assert_eq!(corpus.count(Label::Fake), 5);
        assert_eq!(corpus.count(Label::Real), 2);
        assert_eq!(corpus, source.load().expect("readable corpus"));
    }

    #[test]
    fn test_missing_file_is_reported() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = CsvCorpus::new(dir.path(), 500, 42).load().expect_err("no files");
        assert!(matches!(err, CorpusError::Missing(_)));
    }

    #[test]
    fn test_missing_text_column_is_reported() {
        let dir = tempfile::tempdir().expect("temp dir");
        write(dir.path(), FAKE_FILE, "title\nSomething\n");
        write(dir.path(), REAL_FILE, "text\nreal\n");
        let err = CsvCorpus::new(dir.path(), 500, 42).load().expect_err("bad header");
        assert!(matches!(err, CorpusError::MissingColumn { .. }));
    }
}
