//! Pan/zoom view state.
//!
//! The view is a uniform-scale affine map `screen = content * scale + (tx, ty)`.
//! It is owned by [`PanZoomController`] and changes only in response to
//! gestures; layout positions are never touched.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::error::DomainError;
use crate::domain::scene::{fmt_num, Point};

/// Zoom limits and the initial framing of a freshly loaded map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    pub min_scale: f64,
    pub max_scale: f64,
    /// Zoom-out applied when a map is loaded
    pub initial_scale: f64,
    /// Left padding of the content, in screen pixels
    pub margin_left: f64,
    /// Downward nudge applied after vertically centering the content
    pub margin_top: f64,
    /// Wheel delta to log2(scale factor) ratio
    pub wheel_sensitivity: f64,
    /// Scale factor of a double click
    pub double_click_factor: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.1,
            max_scale: 3.0,
            initial_scale: 0.8,
            margin_left: 80.0,
            margin_top: 50.0,
            wheel_sensitivity: 0.002,
            double_click_factor: 2.0,
        }
    }
}

impl ZoomConfig {
    /// `0 < min_scale <= max_scale`, all finite.
    pub fn validate(&self) -> Result<(), DomainError> {
        let (min, max) = (self.min_scale, self.max_scale);
        if !(min.is_finite() && max.is_finite() && min > 0.0 && min <= max) {
            return Err(DomainError::InvalidScaleExtent { min, max });
        }
        Ok(())
    }
}

/// Translation plus uniform scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub tx: f64,
    pub ty: f64,
    pub scale: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl ViewTransform {
    pub fn identity() -> Self {
        Self {
            tx: 0.0,
            ty: 0.0,
            scale: 1.0,
        }
    }

    /// Content point to screen point.
    pub fn apply(&self, p: Point) -> Point {
        Point::new(p.x * self.scale + self.tx, p.y * self.scale + self.ty)
    }

    /// Screen point to content point.
    pub fn invert(&self, p: Point) -> Point {
        Point::new((p.x - self.tx) / self.scale, (p.y - self.ty) / self.scale)
    }

    pub fn is_valid(&self) -> bool {
        self.tx.is_finite() && self.ty.is_finite() && self.scale.is_finite() && self.scale > 0.0
    }
}

/// SVG `transform` attribute value.
impl fmt::Display for ViewTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "translate({},{}) scale({})",
            fmt_num(self.tx),
            fmt_num(self.ty),
            fmt_num(self.scale)
        )
    }
}

/// Pointer or programmatic input driving the view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// Pointer drag by a screen-space delta
    Drag { dx: f64, dy: f64 },
    /// Pinch or programmatic zoom by a multiplicative factor, anchored at `at`
    Zoom { factor: f64, at: Point },
    /// Mouse wheel; negative `delta_y` zooms in
    Wheel { delta_y: f64, at: Point },
    /// Double click zooms in (or out) by a fixed factor
    DoubleClick { at: Point, zoom_out: bool },
}

impl Gesture {
    fn validate(&self) -> Result<(), DomainError> {
        let finite = |v: f64| v.is_finite();
        let ok = match *self {
            Gesture::Drag { dx, dy } => finite(dx) && finite(dy),
            Gesture::Zoom { factor, at } => finite(factor) && factor > 0.0 && at.is_finite(),
            Gesture::Wheel { delta_y, at } => finite(delta_y) && at.is_finite(),
            Gesture::DoubleClick { at, .. } => at.is_finite(),
        };
        if ok {
            Ok(())
        } else {
            Err(DomainError::InvalidGesture(format!("{:?}", self)))
        }
    }
}

/// Parses `drag:DX,DY`, `zoom:FACTOR@X,Y`, `wheel:DELTA@X,Y`,
/// `dblclick@X,Y` and `dblclick-out@X,Y`.
impl FromStr for Gesture {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::InvalidGesture(s.to_string());
        let number = |v: &str| v.trim().parse::<f64>().map_err(|_| invalid());
        let pair = |v: &str| -> Result<Point, DomainError> {
            let (x, y) = v.split_once(',').ok_or_else(invalid)?;
            Ok(Point::new(number(x)?, number(y)?))
        };

        let (head, at) = match s.split_once('@') {
            Some((head, at)) => (head.trim(), Some(pair(at)?)),
            None => (s.trim(), None),
        };
        let (kind, args) = head.split_once(':').unwrap_or((head, ""));

        let gesture = match (kind, at) {
            ("drag", None) => {
                let delta = pair(args)?;
                Gesture::Drag {
                    dx: delta.x,
                    dy: delta.y,
                }
            }
            ("zoom", Some(at)) => Gesture::Zoom {
                factor: number(args)?,
                at,
            },
            ("wheel", Some(at)) => Gesture::Wheel {
                delta_y: number(args)?,
                at,
            },
            ("dblclick", Some(at)) if args.is_empty() => Gesture::DoubleClick {
                at,
                zoom_out: false,
            },
            ("dblclick-out", Some(at)) if args.is_empty() => Gesture::DoubleClick {
                at,
                zoom_out: true,
            },
            _ => return Err(invalid()),
        };
        gesture.validate()?;
        Ok(gesture)
    }
}

/// Owns the current [`ViewTransform`] and updates it from gestures.
#[derive(Debug, Clone)]
pub struct PanZoomController {
    config: ZoomConfig,
    transform: ViewTransform,
}

impl PanZoomController {
    pub fn new(config: ZoomConfig) -> Result<Self, DomainError> {
        config.validate()?;
        Ok(Self {
            config,
            transform: ViewTransform::identity(),
        })
    }

    pub fn transform(&self) -> ViewTransform {
        self.transform
    }

    pub fn scale_extent(&self) -> (f64, f64) {
        (self.config.min_scale, self.config.max_scale)
    }

    /// Starting view for a freshly loaded map: content padded from the left
    /// edge, vertically centered (then nudged down by `margin_top`), and
    /// zoomed out to `initial_scale`.
    pub fn initialize(
        &mut self,
        viewport_width: f64,
        viewport_height: f64,
        content_height: f64,
    ) -> ViewTransform {
        let transform = ViewTransform {
            tx: self.config.margin_left,
            ty: viewport_height / 2.0 - content_height / 2.0 + self.config.margin_top,
            scale: self.clamp(self.config.initial_scale),
        };
        self.transform = if transform.is_valid() {
            transform
        } else {
            warn!("initialize: degenerate view, falling back to identity");
            ViewTransform::identity()
        };
        debug!(
            "initialize: viewport={}x{}, content_height={}, transform={}",
            viewport_width, viewport_height, content_height, self.transform
        );
        self.transform
    }

    /// Apply one gesture. Invalid input leaves the transform unchanged.
    pub fn on_gesture(&mut self, gesture: Gesture) -> Result<ViewTransform, DomainError> {
        gesture.validate()?;
        match gesture {
            Gesture::Drag { dx, dy } => {
                let next = ViewTransform {
                    tx: self.transform.tx + dx,
                    ty: self.transform.ty + dy,
                    ..self.transform
                };
                if !next.is_valid() {
                    warn!("on_gesture: drag leaves finite range {:?}", next);
                    return Err(DomainError::InvalidGesture(format!("{:?}", gesture)));
                }
                self.transform = next;
            }
            Gesture::Zoom { factor, at } => self.zoom_at(factor, at),
            Gesture::Wheel { delta_y, at } => {
                let factor = (-delta_y * self.config.wheel_sensitivity).exp2();
                self.zoom_at(factor, at);
            }
            Gesture::DoubleClick { at, zoom_out } => {
                let factor = if zoom_out {
                    1.0 / self.config.double_click_factor
                } else {
                    self.config.double_click_factor
                };
                self.zoom_at(factor, at);
            }
        }
        debug!("on_gesture: {:?} -> {}", gesture, self.transform);
        Ok(self.transform)
    }

    /// Rescale keeping the content point under `at` fixed on screen.
    fn zoom_at(&mut self, factor: f64, at: Point) {
        let scale = self.clamp(self.transform.scale * factor);
        let anchor = self.transform.invert(at);
        let next = ViewTransform {
            tx: at.x - anchor.x * scale,
            ty: at.y - anchor.y * scale,
            scale,
        };
        if next.is_valid() {
            self.transform = next;
        } else {
            warn!("zoom_at: rejected non-finite transform {:?}", next);
        }
    }

    fn clamp(&self, scale: f64) -> f64 {
        if scale.is_nan() {
            return self.config.min_scale;
        }
        scale.clamp(self.config.min_scale, self.config.max_scale)
    }
}
