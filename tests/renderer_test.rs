//! Tests for ConceptMapRenderer

use std::sync::Arc;

use notemap::application::services::{BlankReason, ConceptMapRenderer, RenderOutcome};
use notemap::config::Settings;
use notemap::domain::{
    ConceptNode, Gesture, LabelAnchor, NodeRole, Point, SceneElement, ViewTransform,
};
use notemap::infrastructure::traits::Surface;
use notemap::infrastructure::SvgSurface;
use notemap::util::testing::{init_test_setup, small_tree, wide_tree};

/// Surface that records calls instead of drawing
#[derive(Debug, Default)]
struct RecordingSurface {
    width: f64,
    height: f64,
    elements: Vec<SceneElement>,
    transform: Option<ViewTransform>,
    clears: usize,
}

impl RecordingSurface {
    fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }
}

impl Surface for RecordingSurface {
    fn measured_width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn clear(&mut self) {
        self.elements.clear();
        self.clears += 1;
    }

    fn draw(&mut self, element: SceneElement) {
        self.elements.push(element);
    }

    fn set_transform(&mut self, transform: ViewTransform) {
        self.transform = Some(transform);
    }
}

fn renderer(width: f64) -> ConceptMapRenderer<RecordingSurface> {
    init_test_setup();
    ConceptMapRenderer::new(RecordingSurface::new(width, 500.0), &Settings::default())
        .expect("renderer")
}

fn elements(r: &ConceptMapRenderer<RecordingSurface>) -> &[SceneElement] {
    r.surface().map(|s| s.elements.as_slice()).unwrap_or(&[])
}

#[test]
fn given_tree_when_updating_then_draws_links_markers_and_labels() {
    // Arrange
    let mut r = renderer(800.0);

    // Act
    let outcome = r.update(Some(Arc::new(small_tree())));

    // Assert
    assert_eq!(outcome, RenderOutcome::Drawn { nodes: 4, links: 3 });
    let drawn = elements(&r);
    assert_eq!(drawn.len(), 11);
    assert!(drawn[..3].iter().all(SceneElement::is_link));
    assert!(drawn[3..7].iter().all(SceneElement::is_marker));
    assert!(drawn[7..].iter().all(SceneElement::is_label));
}

#[test]
fn given_tree_when_updating_then_labels_sit_beside_markers_by_role() {
    let mut r = renderer(800.0);

    r.update(Some(Arc::new(small_tree())));

    let labels: Vec<_> = elements(&r)
        .iter()
        .filter_map(|e| match e {
            SceneElement::Label {
                text, anchor, dx, ..
            } => Some((text.as_str(), *anchor, *dx)),
            _ => None,
        })
        .collect();
    assert_eq!(
        labels,
        vec![
            ("Doc", LabelAnchor::End, -10.0),
            ("A", LabelAnchor::Start, 10.0),
            ("B", LabelAnchor::End, -10.0),
            ("B1", LabelAnchor::Start, 10.0),
        ]
    );

    let roles: Vec<_> = elements(&r)
        .iter()
        .filter_map(|e| match e {
            SceneElement::Marker { role, .. } => Some(*role),
            _ => None,
        })
        .collect();
    assert_eq!(
        roles,
        vec![NodeRole::Internal, NodeRole::Leaf, NodeRole::Internal, NodeRole::Leaf]
    );
}

#[test]
fn given_tree_when_updating_then_links_run_from_parent_to_child() {
    let mut r = renderer(800.0);

    r.update(Some(Arc::new(small_tree())));

    let SceneElement::Link { curve } = &elements(&r)[0] else {
        panic!("first element is not a link");
    };
    // Doc (depth 0, sibling 375) to A (depth 320, sibling 187.5)
    assert_eq!(curve.start, Point::new(0.0, 375.0));
    assert_eq!(curve.end, Point::new(320.0, 187.5));
    assert_eq!(curve.control1.x, 160.0);
    assert_eq!(curve.control2.x, 160.0);
}

#[test]
fn given_tree_when_updating_then_sets_initial_transform() {
    let mut r = renderer(800.0);

    r.update(Some(Arc::new(small_tree())));

    let expected = ViewTransform {
        tx: 80.0,
        ty: -75.0,
        scale: 0.8,
    };
    assert_eq!(r.transform(), expected);
    assert_eq!(r.surface().and_then(|s| s.transform), Some(expected));
}

#[test]
fn given_same_tree_reference_when_updating_again_then_skips_rebuild() {
    let mut r = renderer(800.0);
    let tree = Arc::new(small_tree());
    r.update(Some(Arc::clone(&tree)));
    r.handle_gesture(Gesture::Drag { dx: 5.0, dy: 5.0 })
        .expect("drag");
    let panned = r.transform();

    let outcome = r.update(Some(tree));

    assert_eq!(outcome, RenderOutcome::Unchanged);
    assert_eq!(r.surface().map(|s| s.clears), Some(1));
    // View survives
    assert_eq!(r.transform(), panned);
}

#[test]
fn given_new_tree_when_updating_then_replaces_elements_and_resets_view() {
    let mut r = renderer(800.0);
    r.update(Some(Arc::new(small_tree())));
    r.handle_gesture(Gesture::Zoom {
        factor: 2.0,
        at: Point::new(10.0, 10.0),
    })
    .expect("zoom");

    let outcome = r.update(Some(Arc::new(wide_tree())));

    assert_eq!(outcome, RenderOutcome::Drawn { nodes: 11, links: 10 });
    assert_eq!(elements(&r).len(), 10 + 11 + 11);
    assert_eq!(r.transform().scale, 0.8);
    assert_eq!(r.transform().tx, 80.0);
}

#[test]
fn given_equal_tree_in_new_allocation_when_updating_then_rebuilds() {
    let mut r = renderer(800.0);
    r.update(Some(Arc::new(small_tree())));

    let outcome = r.update(Some(Arc::new(small_tree())));

    assert!(matches!(outcome, RenderOutcome::Drawn { .. }));
    assert_eq!(r.surface().map(|s| s.clears), Some(2));
}

#[test]
fn given_no_tree_when_updating_then_clears_and_draws_nothing() {
    let mut r = renderer(800.0);
    r.update(Some(Arc::new(small_tree())));

    let outcome = r.update(None);

    assert_eq!(outcome, RenderOutcome::Blank(BlankReason::NoTree));
    assert!(elements(&r).is_empty());
    assert!(r.layout().is_none());
}

#[test]
fn given_unmeasured_surface_when_updating_then_draws_nothing() {
    let mut r = renderer(0.0);

    let outcome = r.update(Some(Arc::new(small_tree())));

    assert_eq!(
        outcome,
        RenderOutcome::Blank(BlankReason::Unmounted { width: 0.0 })
    );
    assert!(elements(&r).is_empty());
}

#[test]
fn given_resized_surface_when_refreshing_then_lays_out_for_new_width() {
    let mut r = renderer(0.0);
    r.update(Some(Arc::new(small_tree())));

    if let Some(surface) = r.surface_mut() {
        surface.width = 400.0;
    }
    let outcome = r.refresh();

    assert_eq!(outcome, RenderOutcome::Drawn { nodes: 4, links: 3 });
    let layout = r.layout().expect("layout");
    assert_eq!(layout.depth_extent(), 320.0);
}

#[test]
fn given_resized_svg_surface_when_refreshing_then_redraws_for_new_width() {
    // Arrange
    init_test_setup();
    let surface = SvgSurface::new(0.0, 500.0, Settings::default().style);
    let mut r = ConceptMapRenderer::new(surface, &Settings::default()).expect("renderer");
    let first = r.update(Some(Arc::new(small_tree())));

    // Act
    if let Some(surface) = r.surface_mut() {
        surface.resize(400.0);
    }
    let outcome = r.refresh();

    // Assert
    assert_eq!(first, RenderOutcome::Blank(BlankReason::Unmounted { width: 0.0 }));
    assert_eq!(outcome, RenderOutcome::Drawn { nodes: 4, links: 3 });
    let svg = r.surface().map(SvgSurface::to_svg).unwrap_or_default();
    assert!(svg.contains(r#"width="400""#));
    // Deepest level at 0.8 * 400
    assert!(svg.contains(r#"cx="320""#), "{}", svg);
}

#[test]
fn given_gesture_when_handling_then_updates_surface_transform_only() {
    let mut r = renderer(800.0);
    r.update(Some(Arc::new(small_tree())));
    let before = elements(&r).to_vec();

    let t = r
        .handle_gesture(Gesture::Drag { dx: 20.0, dy: 0.0 })
        .expect("drag")
        .expect("attached");

    assert_eq!(t.tx, 100.0);
    assert_eq!(r.surface().and_then(|s| s.transform), Some(t));
    assert_eq!(elements(&r), before.as_slice());
}

#[test]
fn given_detached_renderer_when_updating_then_is_inert() {
    let mut r = renderer(800.0);
    r.update(Some(Arc::new(small_tree())));

    let surface = r.detach().expect("surface");

    assert!(surface.elements.is_empty());
    assert!(r.surface().is_none());
    assert_eq!(
        r.update(Some(Arc::new(small_tree()))),
        RenderOutcome::Blank(BlankReason::Detached)
    );
    assert_eq!(
        r.handle_gesture(Gesture::Drag { dx: 1.0, dy: 1.0 })
            .expect("ignored"),
        None
    );
    assert!(r.detach().is_none());
}

#[test]
fn given_svg_surface_when_rendering_then_document_contains_every_concept() {
    init_test_setup();
    let surface = SvgSurface::new(800.0, 500.0, Settings::default().style);
    let mut r = ConceptMapRenderer::new(surface, &Settings::default()).expect("renderer");

    r.update(Some(Arc::new(ConceptNode::with_children(
        "Root",
        vec![ConceptNode::leaf("Left"), ConceptNode::leaf("Right")],
    ))));
    let svg = r.surface().map(SvgSurface::to_svg).unwrap_or_default();

    assert!(svg.starts_with("<svg"));
    assert_eq!(svg.matches("<path").count(), 2);
    assert_eq!(svg.matches("<circle").count(), 3);
    assert!(svg.contains(">Root</text>"));
    assert!(svg.contains(r#"transform="translate(80,-75) scale(0.8)""#));
}
