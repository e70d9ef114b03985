//! Concept map renderer
//!
//! Composes layout and view transform into drawn elements on an owned
//! [`Surface`]. A new tree (by reference) triggers a full rebuild: clear,
//! lay out, reset the view, draw. Gestures only touch the view transform.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::domain::{
    horizontal_link, ConceptArena, ConceptNode, DomainError, Gesture, LabelAnchor, LayoutTree,
    NodeRole, PanZoomController, SceneElement, TidyTreeLayout, ViewTransform, Viewport,
};
use crate::infrastructure::traits::Surface;

/// Why nothing was drawn.
#[derive(Debug, Clone, PartialEq)]
pub enum BlankReason {
    /// No concept tree supplied
    NoTree,
    /// Surface has no measurable width
    Unmounted { width: f64 },
    /// Layout rejected the viewport
    Layout(DomainError),
    /// Renderer was torn down
    Detached,
}

/// Result of an update or refresh.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutcome {
    Drawn { nodes: usize, links: usize },
    /// Same tree reference as before; nothing redrawn
    Unchanged,
    Blank(BlankReason),
}

pub struct ConceptMapRenderer<S: Surface> {
    surface: Option<S>,
    layout_engine: TidyTreeLayout,
    controller: PanZoomController,
    label_offset: f64,
    tree: Option<Arc<ConceptNode>>,
    arena: Option<ConceptArena>,
    layout: Option<LayoutTree>,
}

impl<S: Surface> ConceptMapRenderer<S> {
    /// Take ownership of `surface`. Nothing is drawn until [`Self::update`].
    pub fn new(surface: S, settings: &Settings) -> ApplicationResult<Self> {
        Ok(Self {
            surface: Some(surface),
            layout_engine: TidyTreeLayout::new(settings.layout),
            controller: PanZoomController::new(settings.zoom)?,
            label_offset: settings.style.label_offset,
            tree: None,
            arena: None,
            layout: None,
        })
    }

    /// Change detection: rebuild only when the tree reference differs from
    /// the one last seen.
    pub fn update(&mut self, tree: Option<Arc<ConceptNode>>) -> RenderOutcome {
        let changed = match (&self.tree, &tree) {
            (Some(current), Some(next)) => !Arc::ptr_eq(current, next),
            (None, None) => false,
            _ => true,
        };
        if !changed {
            debug!("update: tree unchanged, skipping rebuild");
            return RenderOutcome::Unchanged;
        }
        self.tree = tree;
        self.rebuild()
    }

    /// Rebuild from the current tree, e.g. after the surface was resized.
    pub fn refresh(&mut self) -> RenderOutcome {
        self.rebuild()
    }

    /// Forward a gesture to the pan/zoom controller and re-apply the
    /// transform. Layout and drawn elements are left as they are.
    ///
    /// Returns `None` once the renderer has been detached.
    pub fn handle_gesture(&mut self, gesture: Gesture) -> ApplicationResult<Option<ViewTransform>> {
        let Some(surface) = self.surface.as_mut() else {
            debug!("handle_gesture: detached, ignoring {:?}", gesture);
            return Ok(None);
        };
        let transform = self.controller.on_gesture(gesture)?;
        surface.set_transform(transform);
        Ok(Some(transform))
    }

    /// Tear down: clear the surface, forget the tree and release the surface.
    /// Later updates and gestures are no-ops.
    pub fn detach(&mut self) -> Option<S> {
        self.tree = None;
        self.arena = None;
        self.layout = None;
        let mut surface = self.surface.take()?;
        surface.clear();
        info!("renderer detached");
        Some(surface)
    }

    pub fn transform(&self) -> ViewTransform {
        self.controller.transform()
    }

    pub fn layout(&self) -> Option<&LayoutTree> {
        self.layout.as_ref()
    }

    pub fn arena(&self) -> Option<&ConceptArena> {
        self.arena.as_ref()
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    #[instrument(level = "debug", skip(self))]
    fn rebuild(&mut self) -> RenderOutcome {
        let Some(surface) = self.surface.as_mut() else {
            return RenderOutcome::Blank(BlankReason::Detached);
        };
        surface.clear();
        self.arena = None;
        self.layout = None;

        let Some(tree) = self.tree.as_ref() else {
            debug!("rebuild: no tree");
            return RenderOutcome::Blank(BlankReason::NoTree);
        };
        let width = surface.measured_width();
        if !(width.is_finite() && width > 0.0) {
            debug!("rebuild: surface not measurable (width={})", width);
            return RenderOutcome::Blank(BlankReason::Unmounted { width });
        }

        let viewport = Viewport::new(width, surface.height());
        let arena = ConceptArena::from_tree(tree);
        let layout = match self.layout_engine.compute(&arena, viewport) {
            Ok(layout) => layout,
            Err(e) => {
                warn!("rebuild: layout rejected: {}", e);
                return RenderOutcome::Blank(BlankReason::Layout(e));
            }
        };

        let transform = self
            .controller
            .initialize(viewport.width, viewport.height, layout.band());
        surface.set_transform(transform);

        // Links first so markers cover the curve ends
        let mut links = 0;
        for (parent, child) in layout.links() {
            surface.draw(SceneElement::Link {
                curve: horizontal_link(parent.point(), child.point()),
            });
            links += 1;
        }

        for node in layout.nodes() {
            surface.draw(SceneElement::Marker {
                center: node.point(),
                role: role_of(node.is_leaf()),
            });
        }

        for node in layout.nodes() {
            let text = arena
                .get_node(node.node)
                .map(|n| n.data.label.clone())
                .unwrap_or_default();
            let anchor = role_of(node.is_leaf()).label_anchor();
            let dx = match anchor {
                LabelAnchor::End => -self.label_offset,
                LabelAnchor::Start => self.label_offset,
            };
            surface.draw(SceneElement::Label {
                at: node.point(),
                text,
                anchor,
                dx,
            });
        }

        let nodes = layout.len();
        info!("rendered concept map: {} nodes, {} links", nodes, links);
        self.arena = Some(arena);
        self.layout = Some(layout);
        RenderOutcome::Drawn { nodes, links }
    }
}

fn role_of(is_leaf: bool) -> NodeRole {
    if is_leaf {
        NodeRole::Leaf
    } else {
        NodeRole::Internal
    }
}
