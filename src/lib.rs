//! # fm-search
//!
//! 基于 Burrows–Wheeler 变换的紧凑全文索引与多模式搜索。
//!
//! 本 crate 提供：
//!
//! - **后缀数组**：倍增法构建
//! - **BWT**：正向变换与仅凭 BWT 的逆变换
//! - **FM 索引**：C 表、按间隔 C 采样的 Occ checkpoint、按间隔 K 采样的部分后缀数组
//! - **反向搜索**：精确计数 / 定位，以及最多 d 个错配的近似定位
//! - **多模式调度**：rayon 线程池并行执行互不相关的查询
//!
//! ## 快速示例
//!
//! ```rust
//! use fm_search::index::{fm::FmIndex, IndexConfig};
//! use fm_search::search::QueryDispatcher;
//!
//! let fm = FmIndex::build(b"AATCGGGTTCAATCGGGGT$", &IndexConfig::new(5, 5))?;
//! assert_eq!(fm.count(b"ATCG")?, 2);
//!
//! let qd = QueryDispatcher::new(&fm, 2)?;
//! assert_eq!(qd.find_all(&["ATCG", "GGGT"])?, vec![1, 4, 11, 15]);
//! assert_eq!(fm.find_approx(b"ATCC", 1)?, vec![1, 11]);
//! # Ok::<(), fm_search::error::IndexError>(())
//! ```
//!
//! ## 模块说明
//!
//! - [`index`] — 索引构建（后缀数组、BWT、部分后缀数组、FM 索引）
//! - [`search`] — 反向搜索与多模式调度
//! - [`util`] — 字母表编码、日志初始化
//! - [`io`] — 文本数据集解析
//! - [`error`] — 错误类型

pub mod error;
pub mod index;
pub mod io;
pub mod search;
pub mod util;
