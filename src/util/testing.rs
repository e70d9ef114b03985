//! Shared test helpers: one-time logging setup and sample concept trees.

use std::env;
use std::sync::Once;

use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::domain::ConceptNode;

static TEST_SETUP: Once = Once::new();

/// Install the test subscriber once per process. `RUST_LOG` wins when set.
pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("notemap=debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    // Another harness may already own the global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else if let Err(e) = subscriber.try_init() {
        eprintln!("Error: Failed to set up logging: {}", e);
    }
    debug!("RUST_LOG={:?}", env::var("RUST_LOG").ok());
}

/// `Doc(A, B(B1))`: the smallest tree with a leaf and an internal child.
pub fn small_tree() -> ConceptNode {
    ConceptNode::with_children(
        "Doc",
        vec![
            ConceptNode::leaf("A"),
            ConceptNode::with_children("B", vec![ConceptNode::leaf("B1")]),
        ],
    )
}

/// Unbalanced three-level tree with uneven fan-out.
pub fn wide_tree() -> ConceptNode {
    ConceptNode::with_children(
        "Rust",
        vec![
            ConceptNode::with_children(
                "Ownership",
                vec![
                    ConceptNode::leaf("Move"),
                    ConceptNode::leaf("Borrow"),
                    ConceptNode::with_children(
                        "Lifetimes",
                        vec![ConceptNode::leaf("Elision"), ConceptNode::leaf("'static")],
                    ),
                ],
            ),
            ConceptNode::leaf("Cargo"),
            ConceptNode::with_children(
                "Traits",
                vec![ConceptNode::leaf("Generics"), ConceptNode::leaf("dyn")],
            ),
        ],
    )
}
