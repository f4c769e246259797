/// Generator of stepped series of field values.
use crate::pattern::PatternValueType;

/// Generator (iterator) state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct SeriesWithStep {
    next: Option<PatternValueType>,
    end: PatternValueType,
    step: PatternValueType,
}

impl SeriesWithStep {
    /// Returns `None` if `end` is less than `start` or `step` is zero.
    #[inline]
    pub(crate) fn new(start: PatternValueType, end: PatternValueType, step: PatternValueType) -> Option<Self> {
        (start <= end && step > 0).then_some(Self {
            next: Some(start),
            end,
            step,
        })
    }
}

impl Iterator for SeriesWithStep {
    type Item = PatternValueType;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.filter(|v| *v <= self.end)?;
        self.next = current.checked_add(self.step);
        Some(current)
    }
}
