//! Per-child layout configuration attached by the loader.

use crate::{Gravity, LayoutDirection, Orientation, RuleSet};

/// Desired size along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dimension {
    /// An exact size in pixels.
    Fixed(i32),
    /// As big as the parent minus padding and margins.
    MatchParent,
    /// Just big enough for the content.
    #[default]
    WrapContent,
}

impl Dimension {
    #[inline]
    pub fn is_match_parent(self) -> bool {
        matches!(self, Dimension::MatchParent)
    }

    #[inline]
    pub fn fixed(self) -> Option<i32> {
        match self {
            Dimension::Fixed(size) => Some(size),
            _ => None,
        }
    }
}

/// Outer spacing around a child.
///
/// `start`/`end`, when present, take precedence over `left`/`right` once
/// resolved against a reading direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Margins {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub start: Option<i32>,
    pub end: Option<i32>,
}

impl Margins {
    pub const ZERO: Margins = Margins {
        left: 0,
        top: 0,
        right: 0,
        bottom: 0,
        start: None,
        end: None,
    };

    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
            start: None,
            end: None,
        }
    }

    pub const fn uniform(all: i32) -> Self {
        Self::new(all, all, all, all)
    }

    pub fn with_start(mut self, start: i32) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_end(mut self, end: i32) -> Self {
        self.end = Some(end);
        self
    }

    pub fn is_direction_relative(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    /// Folds start/end into left/right for `direction`.
    pub fn resolve(&self, direction: LayoutDirection) -> ResolvedMargins {
        let (mut left, mut right) = (self.left, self.right);
        let (start_side, end_side) = if direction.is_rtl() {
            (&mut right, &mut left)
        } else {
            (&mut left, &mut right)
        };
        if let Some(start) = self.start {
            *start_side = start;
        }
        if let Some(end) = self.end {
            *end_side = end;
        }
        ResolvedMargins {
            left,
            top: self.top,
            right,
            bottom: self.bottom,
        }
    }
}

/// Margins with every edge expressed in absolute terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ResolvedMargins {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl ResolvedMargins {
    pub const ZERO: ResolvedMargins = ResolvedMargins {
        left: 0,
        top: 0,
        right: 0,
        bottom: 0,
    };

    #[inline]
    pub fn horizontal(&self) -> i32 {
        self.left + self.right
    }

    #[inline]
    pub fn vertical(&self) -> i32 {
        self.top + self.bottom
    }

    /// Sum of both margins on `axis`.
    #[inline]
    pub fn along(&self, axis: Orientation) -> i32 {
        axis.pick(self.horizontal(), self.vertical())
    }

    /// Leading margin on `axis` (left or top).
    #[inline]
    pub fn leading(&self, axis: Orientation) -> i32 {
        axis.pick(self.left, self.top)
    }

    /// Trailing margin on `axis` (right or bottom).
    #[inline]
    pub fn trailing(&self, axis: Orientation) -> i32 {
        axis.pick(self.right, self.bottom)
    }
}

/// Width and height only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SizeIntent {
    pub width: Dimension,
    pub height: Dimension,
}

impl SizeIntent {
    pub const fn new(width: Dimension, height: Dimension) -> Self {
        Self { width, height }
    }
}

/// Width, height and margins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MarginIntent {
    pub width: Dimension,
    pub height: Dimension,
    pub margins: Margins,
}

impl MarginIntent {
    pub const fn new(width: Dimension, height: Dimension) -> Self {
        Self {
            width,
            height,
            margins: Margins::ZERO,
        }
    }

    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }
}

/// Child configuration for a weighted linear stack.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LinearIntent {
    pub base: MarginIntent,
    /// Share of leftover stacking-axis space. Zero means no stretching.
    pub weight: f32,
    /// Cross-axis override of the group's gravity.
    pub gravity: Option<Gravity>,
}

impl LinearIntent {
    pub const fn new(width: Dimension, height: Dimension) -> Self {
        Self {
            base: MarginIntent::new(width, height),
            weight: 0.0,
            gravity: None,
        }
    }

    /// Negative or non-finite weights are treated as zero.
    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = if weight.is_finite() { weight.max(0.0) } else { 0.0 };
        self
    }

    pub fn with_gravity(mut self, gravity: Gravity) -> Self {
        self.gravity = Some(gravity);
        self
    }

    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.base.margins = margins;
        self
    }
}

/// Child configuration for the relative resolver.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RelativeIntent {
    pub base: MarginIntent,
    pub rules: RuleSet,
    /// Use the parent's edge when an anchor cannot be found or is gone.
    pub align_with_parent_if_missing: bool,
}

impl RelativeIntent {
    pub fn new(width: Dimension, height: Dimension) -> Self {
        Self {
            base: MarginIntent::new(width, height),
            rules: RuleSet::new(),
            align_with_parent_if_missing: false,
        }
    }

    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.base.margins = margins;
        self
    }

    pub fn align_with_parent_if_missing(mut self, enabled: bool) -> Self {
        self.align_with_parent_if_missing = enabled;
        self
    }
}

/// Child configuration for an overlay frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FrameIntent {
    pub base: MarginIntent,
    pub gravity: Option<Gravity>,
}

impl FrameIntent {
    pub const fn new(width: Dimension, height: Dimension) -> Self {
        Self {
            base: MarginIntent::new(width, height),
            gravity: None,
        }
    }

    pub fn with_gravity(mut self, gravity: Gravity) -> Self {
        self.gravity = Some(gravity);
        self
    }

    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.base.margins = margins;
        self
    }
}

/// Discriminant of a [`LayoutIntent`], used by strategies to declare what they accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntentKind {
    Basic,
    Margin,
    Linear,
    Relative,
    Frame,
}

/// Configuration a parent uses to size and place one child.
///
/// Intents are replaced wholesale; the engine never edits one in place.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutIntent {
    Basic(SizeIntent),
    Margin(MarginIntent),
    Linear(LinearIntent),
    Relative(RelativeIntent),
    Frame(FrameIntent),
}

impl Default for LayoutIntent {
    fn default() -> Self {
        LayoutIntent::wrap_content()
    }
}

impl LayoutIntent {
    pub const fn new(width: Dimension, height: Dimension) -> Self {
        LayoutIntent::Basic(SizeIntent::new(width, height))
    }

    pub const fn wrap_content() -> Self {
        Self::new(Dimension::WrapContent, Dimension::WrapContent)
    }

    pub const fn match_parent() -> Self {
        Self::new(Dimension::MatchParent, Dimension::MatchParent)
    }

    pub const fn fixed(width: i32, height: i32) -> Self {
        Self::new(Dimension::Fixed(width), Dimension::Fixed(height))
    }

    pub fn kind(&self) -> IntentKind {
        match self {
            LayoutIntent::Basic(_) => IntentKind::Basic,
            LayoutIntent::Margin(_) => IntentKind::Margin,
            LayoutIntent::Linear(_) => IntentKind::Linear,
            LayoutIntent::Relative(_) => IntentKind::Relative,
            LayoutIntent::Frame(_) => IntentKind::Frame,
        }
    }

    fn margin_base(&self) -> Option<&MarginIntent> {
        match self {
            LayoutIntent::Basic(_) => None,
            LayoutIntent::Margin(base) => Some(base),
            LayoutIntent::Linear(intent) => Some(&intent.base),
            LayoutIntent::Relative(intent) => Some(&intent.base),
            LayoutIntent::Frame(intent) => Some(&intent.base),
        }
    }

    pub fn width(&self) -> Dimension {
        match self {
            LayoutIntent::Basic(size) => size.width,
            _ => self.margin_base().map_or(Dimension::WrapContent, |base| base.width),
        }
    }

    pub fn height(&self) -> Dimension {
        match self {
            LayoutIntent::Basic(size) => size.height,
            _ => self.margin_base().map_or(Dimension::WrapContent, |base| base.height),
        }
    }

    /// Dimension along `axis`.
    pub fn dimension(&self, axis: Orientation) -> Dimension {
        axis.pick(self.width(), self.height())
    }

    /// Raw margins, or `None` for intents that carry none.
    pub fn margins(&self) -> Option<&Margins> {
        self.margin_base().map(|base| &base.margins)
    }

    /// Margins resolved for `direction`; zero when the intent carries none.
    pub fn resolved_margins(&self, direction: LayoutDirection) -> ResolvedMargins {
        self.margins()
            .map_or(ResolvedMargins::ZERO, |margins| margins.resolve(direction))
    }

    pub fn as_linear(&self) -> Option<&LinearIntent> {
        match self {
            LayoutIntent::Linear(intent) => Some(intent),
            _ => None,
        }
    }

    pub fn as_relative(&self) -> Option<&RelativeIntent> {
        match self {
            LayoutIntent::Relative(intent) => Some(intent),
            _ => None,
        }
    }

    pub fn as_frame(&self) -> Option<&FrameIntent> {
        match self {
            LayoutIntent::Frame(intent) => Some(intent),
            _ => None,
        }
    }

    /// Copy with `width`/`height` replaced, keeping the variant.
    pub fn with_size(&self, width: Dimension, height: Dimension) -> LayoutIntent {
        let mut intent = self.clone();
        match &mut intent {
            LayoutIntent::Basic(size) => {
                size.width = width;
                size.height = height;
            }
            LayoutIntent::Margin(base)
            | LayoutIntent::Linear(LinearIntent { base, .. })
            | LayoutIntent::Relative(RelativeIntent { base, .. })
            | LayoutIntent::Frame(FrameIntent { base, .. }) => {
                base.width = width;
                base.height = height;
            }
        }
        intent
    }
}

impl From<SizeIntent> for LayoutIntent {
    fn from(intent: SizeIntent) -> Self {
        LayoutIntent::Basic(intent)
    }
}

impl From<MarginIntent> for LayoutIntent {
    fn from(intent: MarginIntent) -> Self {
        LayoutIntent::Margin(intent)
    }
}

impl From<LinearIntent> for LayoutIntent {
    fn from(intent: LinearIntent) -> Self {
        LayoutIntent::Linear(intent)
    }
}

impl From<RelativeIntent> for LayoutIntent {
    fn from(intent: RelativeIntent) -> Self {
        LayoutIntent::Relative(intent)
    }
}

impl From<FrameIntent> for LayoutIntent {
    fn from(intent: FrameIntent) -> Self {
        LayoutIntent::Frame(intent)
    }
}

#[cfg(test)]
#[path = "tests/intent_tests.rs"]
mod tests;
