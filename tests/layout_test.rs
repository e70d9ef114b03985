//! Tests for TidyTreeLayout

use rstest::rstest;

use notemap::domain::{
    ConceptArena, ConceptNode, DomainError, LayoutConfig, LayoutTree, TidyTreeLayout, Viewport,
};
use notemap::util::testing::{init_test_setup, small_tree, wide_tree};

const EPS: f64 = 1e-9;

fn layout(tree: &ConceptNode, width: f64, height: f64) -> (ConceptArena, LayoutTree) {
    init_test_setup();
    let arena = ConceptArena::from_tree(tree);
    let layout = TidyTreeLayout::new(LayoutConfig::default())
        .compute(&arena, Viewport::new(width, height))
        .expect("layout");
    (arena, layout)
}

fn position_of(arena: &ConceptArena, layout: &LayoutTree, label: &str) -> (f64, f64) {
    let node = layout
        .nodes()
        .iter()
        .find(|n| arena.get_node(n.node).map(|t| t.data.label.as_str()) == Some(label))
        .unwrap_or_else(|| panic!("no node {label}"));
    (node.sibling_pos, node.depth_pos)
}

#[test]
fn given_small_tree_when_laying_out_800x500_then_matches_reference_positions() {
    // Arrange
    let tree = small_tree();

    // Act
    let (arena, layout) = layout(&tree, 800.0, 500.0);

    // Assert: band = 1.5 * 500, deepest level at 0.8 * 800
    assert_eq!(layout.band(), 750.0);
    assert_eq!(layout.depth_extent(), 640.0);
    assert_eq!(position_of(&arena, &layout, "Doc"), (375.0, 0.0));
    assert_eq!(position_of(&arena, &layout, "A"), (187.5, 320.0));
    assert_eq!(position_of(&arena, &layout, "B"), (562.5, 320.0));
    assert_eq!(position_of(&arena, &layout, "B1"), (562.5, 640.0));
}

#[test]
fn given_single_node_when_laying_out_then_centers_root_in_band() {
    let (_, layout) = layout(&ConceptNode::leaf("Alone"), 800.0, 500.0);

    assert_eq!(layout.len(), 1);
    let root = layout.root().expect("root");
    assert_eq!(root.sibling_pos, 375.0);
    assert_eq!(root.depth_pos, 0.0);
    assert!(root.is_leaf());
    assert_eq!(layout.links().count(), 0);
}

#[test]
fn given_same_tree_when_laying_out_twice_then_positions_are_identical() {
    let tree = wide_tree();

    let (_, first) = layout(&tree, 1024.0, 600.0);
    let (_, second) = layout(&tree, 1024.0, 600.0);

    let a: Vec<_> = first.nodes().iter().map(|n| (n.sibling_pos, n.depth_pos)).collect();
    let b: Vec<_> = second.nodes().iter().map(|n| (n.sibling_pos, n.depth_pos)).collect();
    assert_eq!(a, b);
}

#[test]
fn given_tree_when_laying_out_then_preserves_shape_and_order() {
    let tree = wide_tree();

    let (arena, layout) = layout(&tree, 960.0, 500.0);

    // One layout node per concept, one link per non-root concept
    assert_eq!(layout.len(), tree.count());
    assert_eq!(layout.links().count(), tree.count() - 1);

    // Children keep input order and spread in increasing sibling position
    for node in layout.nodes() {
        let labels: Vec<_> = node
            .children
            .iter()
            .filter_map(|&slot| layout.get(slot))
            .filter_map(|c| arena.get_node(c.node))
            .map(|c| c.data.label.clone())
            .collect();
        let expected: Vec<_> = arena
            .get_node(node.node)
            .map(|n| {
                n.children
                    .iter()
                    .filter_map(|&c| arena.get_node(c))
                    .map(|c| c.data.label.clone())
                    .collect()
            })
            .unwrap_or_default();
        assert_eq!(labels, expected);

        let positions: Vec<f64> = node
            .children
            .iter()
            .filter_map(|&slot| layout.get(slot))
            .map(|c| c.sibling_pos)
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{:?}", positions);
    }
}

#[test]
fn given_tree_when_laying_out_then_parents_sit_midway_between_outer_children() {
    let (_, layout) = layout(&wide_tree(), 960.0, 500.0);

    for node in layout.nodes().iter().filter(|n| !n.is_leaf()) {
        let first = layout.get(node.children[0]).expect("first child");
        let last = layout
            .get(*node.children.last().expect("children"))
            .expect("last child");
        let mid = (first.sibling_pos + last.sibling_pos) / 2.0;
        assert!((node.sibling_pos - mid).abs() < EPS);
    }
}

#[test]
fn given_tree_when_laying_out_then_nodes_on_same_level_do_not_overlap() {
    let (_, layout) = layout(&wide_tree(), 960.0, 500.0);
    let max_depth = layout.nodes().iter().map(|n| n.depth).max().unwrap_or(0);

    for depth in 0..=max_depth {
        // Pre-order visits each level left to right
        let level: Vec<f64> = layout
            .nodes()
            .iter()
            .filter(|n| n.depth == depth)
            .map(|n| n.sibling_pos)
            .collect();
        assert!(
            level.windows(2).all(|w| w[1] - w[0] > EPS),
            "depth {}: {:?}",
            depth,
            level
        );
    }
}

#[test]
fn given_tree_when_laying_out_then_depth_axis_grows_with_depth_and_fits_band() {
    let (_, layout) = layout(&wide_tree(), 960.0, 500.0);
    let max_depth = layout.nodes().iter().map(|n| n.depth).max().unwrap_or(0);
    let step = layout.depth_extent() / max_depth as f64;

    for node in layout.nodes() {
        assert!((node.depth_pos - node.depth as f64 * step).abs() < EPS);
        assert!(node.sibling_pos > 0.0 && node.sibling_pos < layout.band());
        if let Some(parent) = node.parent.and_then(|p| layout.get(p)) {
            assert!(node.depth_pos > parent.depth_pos);
        }
    }
}

fn chain(levels: usize) -> ConceptNode {
    (1..levels).rev().fold(ConceptNode::leaf(format!("L{levels}")), |child, i| {
        ConceptNode::with_children(format!("L{i}"), vec![child])
    })
}

/// Three children per level; only the first (or last) one branches further
fn skewed(levels: usize, heavy_first: bool) -> ConceptNode {
    fn build(prefix: String, levels: usize, heavy_first: bool) -> ConceptNode {
        if levels == 0 {
            return ConceptNode::leaf(prefix);
        }
        let heavy = build(format!("{prefix}.h"), levels - 1, heavy_first);
        let light = (0..2).map(|i| ConceptNode::leaf(format!("{prefix}.{i}")));
        let children = if heavy_first {
            std::iter::once(heavy).chain(light).collect()
        } else {
            light.chain(std::iter::once(heavy)).collect()
        };
        ConceptNode::with_children(prefix, children)
    }
    build("R".to_string(), levels, heavy_first)
}

fn fan(leaves: usize) -> ConceptNode {
    ConceptNode::with_children(
        "Hub",
        (0..leaves).map(|i| ConceptNode::leaf(format!("Leaf{i}"))).collect(),
    )
}

#[rstest]
#[case::deep_chain(chain(12))]
#[case::left_heavy(skewed(6, true))]
#[case::right_heavy(skewed(6, false))]
#[case::wide_fan(fan(50))]
fn given_tree_shape_when_laying_out_then_keeps_order_levels_and_bounds(
    #[case] tree: ConceptNode,
) {
    // Act
    let (arena, layout) = layout(&tree, 1024.0, 600.0);

    // Assert: shape
    assert_eq!(layout.len(), tree.count());
    assert_eq!(layout.links().count(), tree.count() - 1);

    // Assert: children in input order, spread along the sibling axis
    for node in layout.nodes() {
        let labels: Vec<_> = node
            .children
            .iter()
            .filter_map(|&slot| layout.get(slot))
            .filter_map(|c| arena.get_node(c.node))
            .map(|c| c.data.label.clone())
            .collect();
        let expected: Vec<_> = arena
            .get_node(node.node)
            .map(|n| {
                n.children
                    .iter()
                    .filter_map(|&c| arena.get_node(c))
                    .map(|c| c.data.label.clone())
                    .collect()
            })
            .unwrap_or_default();
        assert_eq!(labels, expected);

        let positions: Vec<f64> = node
            .children
            .iter()
            .filter_map(|&slot| layout.get(slot))
            .map(|c| c.sibling_pos)
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{:?}", positions);
    }

    // Assert: per-level separation
    let max_depth = layout.nodes().iter().map(|n| n.depth).max().unwrap_or(0);
    for depth in 0..=max_depth {
        let level: Vec<f64> = layout
            .nodes()
            .iter()
            .filter(|n| n.depth == depth)
            .map(|n| n.sibling_pos)
            .collect();
        assert!(
            level.windows(2).all(|w| w[1] - w[0] > EPS),
            "depth {}: {:?}",
            depth,
            level
        );
    }

    // Assert: finite and inside the band
    let step = layout.depth_extent() / max_depth as f64;
    for node in layout.nodes() {
        assert!(node.sibling_pos.is_finite() && node.depth_pos.is_finite());
        assert!(node.sibling_pos > 0.0 && node.sibling_pos < layout.band());
        assert!((node.depth_pos - node.depth as f64 * step).abs() < EPS);
    }
}

#[test]
fn given_non_positive_viewport_when_laying_out_then_rejects() {
    let arena = ConceptArena::from_tree(&small_tree());
    let engine = TidyTreeLayout::default();

    let err = engine
        .compute(&arena, Viewport::new(0.0, 500.0))
        .unwrap_err();

    assert!(matches!(err, DomainError::InvalidViewport { .. }));
}

#[test]
fn given_empty_arena_when_laying_out_then_reports_empty_tree() {
    let arena = ConceptArena::new();

    let err = TidyTreeLayout::default()
        .compute(&arena, Viewport::new(800.0, 500.0))
        .unwrap_err();

    assert_eq!(err, DomainError::EmptyTree);
}
