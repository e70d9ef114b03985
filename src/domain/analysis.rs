//! Domain entities: the concept tree and the analysis record it arrives in

use serde::{Deserialize, Serialize};

/// A labeled node in the hierarchical concept map.
///
/// Trees arrive fully built from the analysis service and are never mutated
/// in place; a new document replaces the whole tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptNode {
    pub label: String,
    /// Ordered children; an absent `children` key deserializes as empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ConceptNode>,
}

impl ConceptNode {
    pub fn leaf(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(label: impl Into<String>, children: Vec<ConceptNode>) -> Self {
        Self {
            label: label.into(),
            children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(ConceptNode::count).sum::<usize>()
    }
}

/// Supporting source identified in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub description: String,
    /// 0-100
    pub relevance: f64,
}

/// One step of the suggested study roadmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapStep {
    pub step: String,
    pub description: String,
    pub estimated_time: String,
}

/// Per-topic statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicStat {
    pub topic: String,
    /// 0-100
    pub complexity: f64,
    /// 0-100
    pub importance: f64,
}

/// Full analysis of one uploaded document as produced by the analysis service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub summary: String,
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(default)]
    pub roadmap: Vec<RoadmapStep>,
    pub memory_map: ConceptNode,
    #[serde(default)]
    pub stats: Vec<TopicStat>,
    #[serde(default)]
    pub suggested_questions: Vec<String>,
}

/// Input document: either a full analysis or just its concept map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Document {
    Analysis(Box<AnalysisResult>),
    Map(ConceptNode),
}

impl Document {
    pub fn concept_map(&self) -> &ConceptNode {
        match self {
            Document::Analysis(analysis) => &analysis.memory_map,
            Document::Map(node) => node,
        }
    }

    pub fn analysis(&self) -> Option<&AnalysisResult> {
        match self {
            Document::Analysis(analysis) => Some(analysis),
            Document::Map(_) => None,
        }
    }
}
