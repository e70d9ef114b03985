//! Concept map service
//!
//! One-shot rendering and layout of a concept tree for the command line.

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::services::renderer::{ConceptMapRenderer, RenderOutcome};
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::domain::{
    ConceptArena, ConceptNode, Gesture, LayoutTree, TidyTreeLayout, ViewTransform, Viewport,
};
use crate::infrastructure::SvgSurface;

/// SVG output of a render pass.
#[derive(Debug, Clone)]
pub struct RenderedMap {
    pub svg: String,
    pub outcome: RenderOutcome,
    pub transform: ViewTransform,
}

/// One row of a layout listing.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedConcept {
    pub label: String,
    pub depth: usize,
    pub depth_pos: f64,
    pub sibling_pos: f64,
    pub is_leaf: bool,
}

/// Service for laying out and rendering concept maps.
pub struct MapService {
    settings: Arc<Settings>,
}

impl MapService {
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }

    /// Render `tree` into an SVG document of the given width (config
    /// default when `None`), then replay `gestures` on the view.
    #[instrument(level = "debug", skip(self, tree, gestures), fields(gestures = gestures.len()))]
    pub fn render(
        &self,
        tree: Arc<ConceptNode>,
        width: Option<f64>,
        gestures: &[Gesture],
    ) -> ApplicationResult<RenderedMap> {
        let width = width.unwrap_or(self.settings.viewport.width);
        let surface = SvgSurface::new(
            width,
            self.settings.viewport.height,
            self.settings.style.clone(),
        );
        let mut renderer = ConceptMapRenderer::new(surface, &self.settings)?;

        let outcome = renderer.update(Some(tree));
        for gesture in gestures {
            renderer.handle_gesture(*gesture)?;
        }
        let transform = renderer.transform();

        let svg = renderer
            .surface()
            .map(SvgSurface::to_svg)
            .unwrap_or_default();
        renderer.detach();
        debug!("render: outcome={:?}, transform={}", outcome, transform);
        Ok(RenderedMap {
            svg,
            outcome,
            transform,
        })
    }

    /// Lay out `tree` and list every concept in pre-order.
    pub fn layout(
        &self,
        tree: &ConceptNode,
        width: Option<f64>,
    ) -> ApplicationResult<Vec<PlacedConcept>> {
        let viewport = Viewport::new(
            width.unwrap_or(self.settings.viewport.width),
            self.settings.viewport.height,
        );
        let arena = ConceptArena::from_tree(tree);
        let layout = TidyTreeLayout::new(self.settings.layout).compute(&arena, viewport)?;
        Ok(placed_concepts(&arena, &layout))
    }
}

fn placed_concepts(arena: &ConceptArena, layout: &LayoutTree) -> Vec<PlacedConcept> {
    layout
        .nodes()
        .iter()
        .map(|node| PlacedConcept {
            label: arena
                .get_node(node.node)
                .map(|n| n.data.label.clone())
                .unwrap_or_default(),
            depth: node.depth,
            depth_pos: node.depth_pos,
            sibling_pos: node.sibling_pos,
            is_leaf: node.is_leaf(),
        })
        .collect()
}
