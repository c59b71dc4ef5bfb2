//! Visibility-triggered lazy loading.
//!
//! [`VisibilityTrigger`] is a two-state machine fed with the visible fraction
//! of an observed region:
//!
//! ```text
//!                 fraction >= threshold
//!     ┌─────────┐ ───────────────────────► ┌────────┐
//!     │ Outside │                          │ Inside │
//!     └─────────┘ ◄─────────────────────── └────────┘
//!                 fraction < threshold
//!                 (suppressed when trigger_once)
//! ```
//!
//! With `trigger_once` the first entry latches: observation is torn down and
//! the state stays `Inside`.

use crate::error::ConfigError;

/// Visible fraction that counts as "entered" when none is configured.
pub const DEFAULT_VISIBILITY_THRESHOLD: f64 = 0.1;

/// Viewport expansion applied before intersecting, in CSS pixels.
pub const DEFAULT_LAZY_LOAD_MARGIN_PX: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VisibilityState {
    #[default]
    Outside,
    Inside,
}

/// Axis-aligned rectangle in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    fn right(&self) -> f64 {
        self.x + self.width.max(0.0)
    }

    #[inline]
    fn bottom(&self) -> f64 {
        self.y + self.height.max(0.0)
    }

    #[inline]
    fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Grows the rectangle by `margin` on every side.
    pub fn expand(&self, margin: f64) -> Rect {
        Rect {
            x: self.x - margin,
            y: self.y - margin,
            width: (self.width + 2.0 * margin).max(0.0),
            height: (self.height + 2.0 * margin).max(0.0),
        }
    }
}

/// Fraction of `region` inside `viewport` after growing the viewport by
/// `root_margin_px`, or `None` when the two do not intersect.
///
/// Edge contact counts as intersecting. A zero-area region that intersects
/// reports `1.0`.
///
/// ```
/// use perfkit::visibility::{intersection_ratio, Rect};
///
/// let viewport = Rect::new(0.0, 0.0, 800.0, 600.0);
///
/// assert_eq!(intersection_ratio(&Rect::new(0.0, 600.0, 10.0, 10.0), &viewport, 0.0), Some(0.0));
/// assert_eq!(intersection_ratio(&Rect::new(0.0, 601.0, 10.0, 10.0), &viewport, 0.0), None);
/// ```
pub fn intersection_ratio(region: &Rect, viewport: &Rect, root_margin_px: f64) -> Option<f64> {
    let root = viewport.expand(root_margin_px);

    let left = region.x.max(root.x);
    let top = region.y.max(root.y);
    let right = region.right().min(root.right());
    let bottom = region.bottom().min(root.bottom());

    if left > right || top > bottom {
        return None;
    }

    let area = region.area();
    if area <= 0.0 {
        return Some(1.0);
    }
    let overlap = (right - left) * (bottom - top);
    Some((overlap / area).clamp(0.0, 1.0))
}

/// Like [`intersection_ratio`], with no intersection reported as `0.0`.
///
/// ```
/// use perfkit::visibility::{visible_fraction, Rect};
///
/// let viewport = Rect::new(0.0, 0.0, 800.0, 600.0);
/// let card = Rect::new(0.0, 550.0, 200.0, 100.0);
///
/// assert_eq!(visible_fraction(&card, &viewport, 0.0), 0.5);
/// assert_eq!(visible_fraction(&card, &viewport, 50.0), 1.0);
/// ```
pub fn visible_fraction(region: &Rect, viewport: &Rect, root_margin_px: f64) -> f64 {
    intersection_ratio(region, viewport, root_margin_px).unwrap_or(0.0)
}

/// Enter/leave detector for one observed region.
///
/// # Example
///
/// ```
/// use perfkit::visibility::{VisibilityState, VisibilityTrigger};
///
/// let mut trigger = VisibilityTrigger::try_new(0.1, true).unwrap();
/// assert_eq!(trigger.observe(0.05), VisibilityState::Outside);
/// assert_eq!(trigger.observe(0.4), VisibilityState::Inside);
///
/// // Latched: scrolling away does not unload
/// assert_eq!(trigger.observe(0.0), VisibilityState::Inside);
/// assert!(!trigger.is_observing());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityTrigger {
    threshold: f64,
    trigger_once: bool,
    root_margin_px: f64,
    state: VisibilityState,
    observing: bool,
}

impl VisibilityTrigger {
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `threshold` is outside `[0, 1]`.
    pub fn try_new(threshold: f64, trigger_once: bool) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::new(format!(
                "visibility threshold must be within [0, 1] (got {threshold})"
            )));
        }
        Ok(Self::from_validated(
            threshold,
            trigger_once,
            DEFAULT_LAZY_LOAD_MARGIN_PX,
        ))
    }

    /// Callers guarantee a threshold in `[0, 1]` and a finite, non-negative
    /// margin.
    pub(crate) fn from_validated(threshold: f64, trigger_once: bool, root_margin_px: f64) -> Self {
        Self {
            threshold,
            trigger_once,
            root_margin_px,
            state: VisibilityState::Outside,
            observing: true,
        }
    }

    /// Sets the viewport expansion used by [`observe_rects`](Self::observe_rects).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the margin is negative or not finite.
    pub fn with_root_margin(mut self, root_margin_px: f64) -> Result<Self, ConfigError> {
        if !root_margin_px.is_finite() || root_margin_px < 0.0 {
            return Err(ConfigError::new(format!(
                "root margin must be a finite, non-negative pixel value (got {root_margin_px})"
            )));
        }
        self.root_margin_px = root_margin_px;
        Ok(self)
    }

    #[inline]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    #[inline]
    pub fn root_margin_px(&self) -> f64 {
        self.root_margin_px
    }

    #[inline]
    pub fn state(&self) -> VisibilityState {
        self.state
    }

    #[inline]
    pub fn is_inside(&self) -> bool {
        self.state == VisibilityState::Inside
    }

    /// `false` once latched or disconnected.
    #[inline]
    pub fn is_observing(&self) -> bool {
        self.observing
    }

    /// Feeds one visibility observation and returns the resulting state.
    ///
    /// A bare fraction carries no geometry, so only a positive fraction
    /// counts as intersecting. Ignored once observation has stopped.
    pub fn observe(&mut self, visible_fraction: f64) -> VisibilityState {
        let ratio = (visible_fraction > 0.0).then_some(visible_fraction);
        self.observe_intersection(ratio)
    }

    /// Feeds an intersection ratio, `None` meaning no intersection.
    ///
    /// The region is inside only when it intersects and the ratio reaches
    /// the threshold, so a zero threshold still needs an intersection.
    pub fn observe_intersection(&mut self, ratio: Option<f64>) -> VisibilityState {
        if !self.observing {
            return self.state;
        }
        let entered = ratio.is_some_and(|r| !r.is_nan() && r >= self.threshold);

        self.state = if entered {
            VisibilityState::Inside
        } else {
            VisibilityState::Outside
        };

        if self.trigger_once && self.state == VisibilityState::Inside {
            self.observing = false;
        }
        self.state
    }

    /// Intersects `region` with `viewport` (expanded by the root margin) and
    /// feeds the result to [`observe_intersection`](Self::observe_intersection).
    pub fn observe_rects(&mut self, region: &Rect, viewport: &Rect) -> VisibilityState {
        let ratio = intersection_ratio(region, viewport, self.root_margin_px);
        self.observe_intersection(ratio)
    }

    /// Stops observing. The current state is kept.
    pub fn disconnect(&mut self) {
        self.observing = false;
    }
}

impl Default for VisibilityTrigger {
    fn default() -> Self {
        Self::from_validated(
            DEFAULT_VISIBILITY_THRESHOLD,
            false,
            DEFAULT_LAZY_LOAD_MARGIN_PX,
        )
    }
}
