/// Reading direction supplied by the root driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LayoutDirection {
    #[default]
    Ltr,
    Rtl,
}

impl LayoutDirection {
    #[inline]
    pub fn is_rtl(self) -> bool {
        matches!(self, LayoutDirection::Rtl)
    }
}
