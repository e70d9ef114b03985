//! Document service
//!
//! Loads analysis documents from disk and derives the textual views
//! (outline, report) shown by the command line.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationResult, IoResultExt, JsonResultExt};
use crate::domain::{ConceptArena, ConceptNode, Document, RoadmapStep, Source, TopicStat};
use crate::infrastructure::traits::FileSystem;

/// Size of the concept map inside a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapStats {
    pub nodes: usize,
    pub leaves: usize,
    /// Number of levels; a lone root counts as 1
    pub depth: usize,
}

/// Everything `report` prints, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentReport {
    pub summary: Option<String>,
    /// In the order the analysis listed them
    pub sources: Vec<Source>,
    pub roadmap: Vec<RoadmapStep>,
    pub stats: Vec<TopicStat>,
    pub questions: Vec<String>,
    pub map: MapStats,
}

/// Service for reading documents and summarising them.
pub struct DocumentService {
    fs: Arc<dyn FileSystem>,
}

impl DocumentService {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Read and parse a JSON document from `path`.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<Document> {
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read document", path)?;
        self.parse(&content, path)
    }

    /// Read and parse a JSON document from standard input.
    pub fn load_stdin(&self) -> ApplicationResult<Document> {
        let stdin = Path::new("<stdin>");
        let content = self
            .fs
            .read_stdin()
            .with_path_context("read document", stdin)?;
        self.parse(&content, stdin)
    }

    /// Parse document text; `origin` only labels errors.
    pub fn parse(&self, content: &str, origin: &Path) -> ApplicationResult<Document> {
        let document: Document = serde_json::from_str(content).with_document_context(origin)?;
        debug!(
            "parsed {}: {} concepts, analysis={}",
            origin.display(),
            document.concept_map().count(),
            document.analysis().is_some()
        );
        Ok(document)
    }

    /// Indented outline of the concept hierarchy.
    pub fn outline(&self, tree: &ConceptNode) -> String {
        ConceptArena::from_tree(tree).to_tree_string().to_string()
    }

    /// Collect the report sections of `document`.
    pub fn report(&self, document: &Document) -> DocumentReport {
        let arena = ConceptArena::from_tree(document.concept_map());
        let map = MapStats {
            nodes: arena.len(),
            leaves: arena.leaf_labels().len(),
            depth: arena.depth(),
        };

        match document.analysis() {
            Some(analysis) => DocumentReport {
                summary: Some(analysis.summary.clone()),
                sources: analysis.sources.clone(),
                roadmap: analysis.roadmap.clone(),
                stats: analysis.stats.clone(),
                questions: analysis.suggested_questions.clone(),
                map,
            },
            None => DocumentReport {
                summary: None,
                sources: Vec::new(),
                roadmap: Vec::new(),
                stats: Vec::new(),
                questions: Vec::new(),
                map,
            },
        }
    }

    /// Write `content` to `path`, creating parent directories.
    pub fn write_output(&self, path: &Path, content: &str) -> ApplicationResult<()> {
        self.fs
            .ensure_parent(path)
            .with_path_context("create parent directory", path)?;
        self.fs
            .write(path, content)
            .with_path_context("write output", path)
    }
}
