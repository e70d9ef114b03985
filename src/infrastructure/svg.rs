//! Retained SVG drawing surface.

use quick_xml::escape::escape;
use tracing::trace;

use crate::config::StyleConfig;
use crate::domain::scene::fmt_num;
use crate::domain::{NodeRole, SceneElement, ViewTransform};
use crate::infrastructure::traits::Surface;

/// Collects scene elements and serialises them as a standalone SVG document.
#[derive(Debug, Clone)]
pub struct SvgSurface {
    width: f64,
    height: f64,
    style: StyleConfig,
    elements: Vec<SceneElement>,
    transform: ViewTransform,
}

impl SvgSurface {
    pub fn new(width: f64, height: f64, style: StyleConfig) -> Self {
        Self {
            width,
            height,
            style,
            elements: Vec::new(),
            transform: ViewTransform::identity(),
        }
    }

    pub fn elements(&self) -> &[SceneElement] {
        &self.elements
    }

    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    /// Change the measured width (e.g. after a window resize).
    pub fn resize(&mut self, width: f64) {
        self.width = width;
    }

    pub fn to_svg(&self) -> String {
        let style = &self.style;
        let (w, h) = (fmt_num(self.width.max(0.0)), fmt_num(self.height.max(0.0)));
        let mut out = String::with_capacity(256 + self.elements.len() * 160);

        out.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
        ));
        out.push('\n');
        out.push_str(&format!(
            r#"<rect width="100%" height="100%" fill="{}"/>"#,
            escape(style.background.as_str())
        ));
        out.push('\n');
        out.push_str(&format!(r#"<g transform="{}">"#, self.transform));
        out.push('\n');

        for element in &self.elements {
            match element {
                SceneElement::Link { curve } => out.push_str(&format!(
                    r#"<path class="link" fill="none" stroke="{}" stroke-width="{}" d="{}"/>"#,
                    escape(style.link_color.as_str()),
                    fmt_num(style.link_width),
                    curve.to_path_data()
                )),
                SceneElement::Marker { center, role } => {
                    let (class, fill) = match role {
                        NodeRole::Internal => ("node--internal", &style.node_color),
                        NodeRole::Leaf => ("node--leaf", &style.leaf_fill),
                    };
                    out.push_str(&format!(
                        r#"<circle class="node {}" cx="{}" cy="{}" r="{}" fill="{}" stroke="{}" stroke-width="{}"/>"#,
                        class,
                        fmt_num(center.x),
                        fmt_num(center.y),
                        fmt_num(style.node_radius),
                        escape(fill.as_str()),
                        escape(style.node_color.as_str()),
                        fmt_num(style.node_stroke_width)
                    ));
                }
                SceneElement::Label {
                    at,
                    text,
                    anchor,
                    dx,
                } => out.push_str(&format!(
                    r#"<text class="label" x="{}" y="{}" dy="0.32em" text-anchor="{}" font-family="{}" font-size="{}" font-weight="{}" fill="{}">{}</text>"#,
                    fmt_num(at.x + dx),
                    fmt_num(at.y),
                    anchor.as_str(),
                    escape(style.font_family.as_str()),
                    fmt_num(style.font_size),
                    style.font_weight,
                    escape(style.label_color.as_str()),
                    escape(text.as_str())
                )),
            }
            out.push('\n');
        }

        out.push_str("</g>\n</svg>\n");
        out
    }
}

impl Surface for SvgSurface {
    fn measured_width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn clear(&mut self) {
        trace!("svg: clearing {} elements", self.elements.len());
        self.elements.clear();
    }

    fn draw(&mut self, element: SceneElement) {
        self.elements.push(element);
    }

    fn set_transform(&mut self, transform: ViewTransform) {
        self.transform = transform;
    }
}
