pub mod bwt;
pub mod fm;
pub mod psa;
pub mod sa;

use serde::{Deserialize, Serialize};

use crate::error::{IndexError, Result};
use crate::util::alphabet::DEFAULT_SENTINEL;

/// 索引构建参数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Occ checkpoint 间隔 C：越大越省内存，rank 扫描越长
    pub checkpoint_interval: usize,
    /// SA 采样间隔 K：越大越省内存，定位时 LF 步数越多
    pub sample_interval: usize,
    /// 文本结尾哨兵（仅 `FmIndex::build` 推导字母表时使用）
    pub sentinel: u8,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self { checkpoint_interval: 128, sample_interval: 32, sentinel: DEFAULT_SENTINEL }
    }
}

impl IndexConfig {
    pub fn new(checkpoint_interval: usize, sample_interval: usize) -> Self {
        Self { checkpoint_interval, sample_interval, ..Self::default() }
    }

    pub fn with_sentinel(mut self, sentinel: u8) -> Self {
        self.sentinel = sentinel;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.checkpoint_interval == 0 {
            return Err(IndexError::InvalidInterval { name: "checkpoint" });
        }
        if self.sample_interval == 0 {
            return Err(IndexError::InvalidInterval { name: "sampling" });
        }
        Ok(())
    }
}
