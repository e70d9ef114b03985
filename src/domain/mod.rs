//! Domain layer: concept tree, layout and view model
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod analysis;
pub mod arena;
pub mod error;
pub mod layout;
pub mod scene;
pub mod transform;

pub use analysis::{AnalysisResult, ConceptNode, Document, RoadmapStep, Source, TopicStat};
pub use arena::{ConceptArena, NodeData, TreeNode};
pub use error::DomainError;
pub use layout::{LayoutConfig, LayoutNode, LayoutTree, TidyTreeLayout, Viewport};
pub use scene::{horizontal_link, CubicCurve, LabelAnchor, NodeRole, Point, SceneElement};
pub use transform::{Gesture, PanZoomController, ViewTransform, ZoomConfig};

/// Expand environment variables in a path string.
///
/// Supports:
/// - `$VAR` syntax
/// - `${VAR}` syntax
/// - `~` for home directory
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}
