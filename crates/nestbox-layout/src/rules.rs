//! Anchor rules for relative positioning.

use crate::LayoutDirection;
use std::fmt;
use std::rc::Rc;

/// Identity of a child that other children may anchor to.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnchorId(Rc<str>);

impl AnchorId {
    pub fn new(name: &str) -> Self {
        Self(Rc::from(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AnchorId {
    fn from(name: &str) -> Self {
        AnchorId::new(name)
    }
}

impl fmt::Debug for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Rule kinds understood by the relative resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum RelativeVerb {
    /// Right edge sits left of the anchor.
    LeftOf = 0,
    /// Left edge sits right of the anchor.
    RightOf,
    /// Bottom edge sits above the anchor.
    Above,
    /// Top edge sits below the anchor.
    Below,
    /// Baseline matches the anchor's baseline.
    AlignBaseline,
    AlignLeft,
    AlignTop,
    AlignRight,
    AlignBottom,
    AlignParentLeft,
    AlignParentTop,
    AlignParentRight,
    AlignParentBottom,
    CenterInParent,
    CenterHorizontal,
    CenterVertical,
    StartOf,
    EndOf,
    AlignStart,
    AlignEnd,
    AlignParentStart,
    AlignParentEnd,
}

pub const VERB_COUNT: usize = 22;

impl RelativeVerb {
    pub const ALL: [RelativeVerb; VERB_COUNT] = [
        RelativeVerb::LeftOf,
        RelativeVerb::RightOf,
        RelativeVerb::Above,
        RelativeVerb::Below,
        RelativeVerb::AlignBaseline,
        RelativeVerb::AlignLeft,
        RelativeVerb::AlignTop,
        RelativeVerb::AlignRight,
        RelativeVerb::AlignBottom,
        RelativeVerb::AlignParentLeft,
        RelativeVerb::AlignParentTop,
        RelativeVerb::AlignParentRight,
        RelativeVerb::AlignParentBottom,
        RelativeVerb::CenterInParent,
        RelativeVerb::CenterHorizontal,
        RelativeVerb::CenterVertical,
        RelativeVerb::StartOf,
        RelativeVerb::EndOf,
        RelativeVerb::AlignStart,
        RelativeVerb::AlignEnd,
        RelativeVerb::AlignParentStart,
        RelativeVerb::AlignParentEnd,
    ];

    /// Verbs that order children along the vertical axis.
    pub const VERTICAL: [RelativeVerb; 5] = [
        RelativeVerb::Above,
        RelativeVerb::Below,
        RelativeVerb::AlignBaseline,
        RelativeVerb::AlignTop,
        RelativeVerb::AlignBottom,
    ];

    /// Verbs that order children along the horizontal axis.
    pub const HORIZONTAL: [RelativeVerb; 8] = [
        RelativeVerb::LeftOf,
        RelativeVerb::RightOf,
        RelativeVerb::AlignLeft,
        RelativeVerb::AlignRight,
        RelativeVerb::StartOf,
        RelativeVerb::EndOf,
        RelativeVerb::AlignStart,
        RelativeVerb::AlignEnd,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// True for verbs whose meaning depends on the reading direction.
    pub fn is_direction_relative(self) -> bool {
        matches!(
            self,
            RelativeVerb::StartOf
                | RelativeVerb::EndOf
                | RelativeVerb::AlignStart
                | RelativeVerb::AlignEnd
                | RelativeVerb::AlignParentStart
                | RelativeVerb::AlignParentEnd
        )
    }
}

/// Target of a rule: a sibling by identity, or the parent itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Anchor {
    Parent,
    Sibling(AnchorId),
}

impl Anchor {
    pub fn sibling(name: &str) -> Self {
        Anchor::Sibling(AnchorId::new(name))
    }

    pub fn as_sibling(&self) -> Option<&AnchorId> {
        match self {
            Anchor::Sibling(id) => Some(id),
            Anchor::Parent => None,
        }
    }
}

/// One slot per [`RelativeVerb`].
#[derive(Clone, PartialEq, Eq)]
pub struct RuleSet {
    slots: [Option<Anchor>; VERB_COUNT],
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl RuleSet {
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
        }
    }

    /// Builder form of [`RuleSet::set`].
    pub fn with(mut self, verb: RelativeVerb, anchor: Anchor) -> Self {
        self.set(verb, anchor);
        self
    }

    /// Builder shortcut for a sibling rule.
    pub fn sibling(self, verb: RelativeVerb, name: &str) -> Self {
        self.with(verb, Anchor::sibling(name))
    }

    /// Builder shortcut for a boolean parent rule.
    pub fn parent(self, verb: RelativeVerb) -> Self {
        self.with(verb, Anchor::Parent)
    }

    pub fn set(&mut self, verb: RelativeVerb, anchor: Anchor) -> &mut Self {
        self.slots[verb.index()] = Some(anchor);
        self
    }

    pub fn remove(&mut self, verb: RelativeVerb) -> Option<Anchor> {
        self.slots[verb.index()].take()
    }

    #[inline]
    pub fn get(&self, verb: RelativeVerb) -> Option<&Anchor> {
        self.slots[verb.index()].as_ref()
    }

    #[inline]
    pub fn is_set(&self, verb: RelativeVerb) -> bool {
        self.slots[verb.index()].is_some()
    }

    /// Sibling referenced by `verb`, if any.
    #[inline]
    pub fn sibling_of(&self, verb: RelativeVerb) -> Option<&AnchorId> {
        self.get(verb).and_then(Anchor::as_sibling)
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    pub fn iter(&self) -> impl Iterator<Item = (RelativeVerb, &Anchor)> + '_ {
        RelativeVerb::ALL
            .iter()
            .filter_map(move |verb| self.get(*verb).map(|anchor| (*verb, anchor)))
    }

    pub fn has_direction_relative_rules(&self) -> bool {
        RelativeVerb::ALL
            .iter()
            .any(|verb| verb.is_direction_relative() && self.is_set(*verb))
    }

    /// Rewrites start/end rules as left/right rules for `direction`.
    ///
    /// A start/end rule wins over a left/right rule on the same edge pair.
    /// The returned set contains no direction-relative verbs.
    pub fn resolve(&self, direction: LayoutDirection) -> RuleSet {
        let mut resolved = self.clone();
        if !self.has_direction_relative_rules() {
            return resolved;
        }
        let rtl = direction.is_rtl();
        resolved.fold_relative_pair(
            (RelativeVerb::AlignStart, RelativeVerb::AlignEnd),
            (RelativeVerb::AlignLeft, RelativeVerb::AlignRight),
            rtl,
        );
        resolved.fold_relative_pair(
            (RelativeVerb::StartOf, RelativeVerb::EndOf),
            (RelativeVerb::LeftOf, RelativeVerb::RightOf),
            rtl,
        );
        resolved.fold_relative_pair(
            (RelativeVerb::AlignParentStart, RelativeVerb::AlignParentEnd),
            (RelativeVerb::AlignParentLeft, RelativeVerb::AlignParentRight),
            rtl,
        );
        resolved
    }

    fn fold_relative_pair(
        &mut self,
        (start, end): (RelativeVerb, RelativeVerb),
        (left, right): (RelativeVerb, RelativeVerb),
        rtl: bool,
    ) {
        if !self.is_set(start) && !self.is_set(end) {
            return;
        }
        self.remove(left);
        self.remove(right);
        if let Some(anchor) = self.remove(start) {
            self.set(if rtl { right } else { left }, anchor);
        }
        if let Some(anchor) = self.remove(end) {
            self.set(if rtl { left } else { right }, anchor);
        }
    }
}

#[cfg(test)]
#[path = "tests/rules_tests.rs"]
mod tests;
