//! 基于 FM 索引的反向搜索：精确匹配、有限错配的近似匹配，以及多模式并行调度。

pub mod approx;
pub mod dispatch;
pub mod exact;

pub use dispatch::QueryDispatcher;

use std::ops::RangeInclusive;

/// BWT 行区间 `[top, bottom]`（闭区间），`top > bottom` 表示空区间。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchRange {
    pub top: usize,
    pub bottom: usize,
}

impl MatchRange {
    pub fn new(top: usize, bottom: usize) -> Self {
        Self { top, bottom }
    }

    /// 由半开区间 [l, r) 转换而来
    pub fn from_half_open(l: usize, r: usize) -> Self {
        if l >= r { Self::empty() } else { Self { top: l, bottom: r - 1 } }
    }

    pub fn empty() -> Self {
        Self { top: 1, bottom: 0 }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.top > self.bottom
    }

    #[inline]
    pub fn len(&self) -> usize {
        if self.is_empty() { 0 } else { self.bottom - self.top + 1 }
    }

    pub fn rows(&self) -> RangeInclusive<usize> {
        self.top..=self.bottom
    }
}
