//! 索引构建与查询阶段的错误类型。
//!
//! 只有结构性错误（哨兵数量不对、模式含非法字母等）会以 [`IndexError`] 返回；
//! 无匹配、分支被剪枝都属于正常控制流，不会走到这里。

use thiserror::Error;

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, IndexError>;

#[derive(Debug, Error)]
pub enum IndexError {
    /// 文本为空（连哨兵都没有）
    #[error("text is empty")]
    EmptyText,

    /// 文本中哨兵出现次数不是 1
    #[error("text must contain exactly one sentinel '{sentinel}', found {found}")]
    SentinelCount { sentinel: char, found: usize },

    /// 哨兵没有出现在文本末尾
    #[error("sentinel '{sentinel}' must terminate the text, found at offset {offset} of {len}")]
    SentinelNotTerminal { sentinel: char, offset: usize, len: usize },

    /// 文本含有声明字母表之外的符号
    #[error("symbol '{symbol}' at offset {offset} is not part of the alphabet")]
    InvalidSymbol { symbol: char, offset: usize },

    #[error("text of {len} symbols exceeds the 32-bit suffix array limit")]
    TextTooLong { len: usize },

    /// 采样 / checkpoint 间隔必须为正
    #[error("{name} interval must be a positive integer")]
    InvalidInterval { name: &'static str },

    #[error("pattern is empty")]
    EmptyPattern,

    /// 模式含有字母表之外的符号（包括哨兵本身）
    #[error("pattern {pattern:?} contains symbol '{symbol}' outside the alphabet")]
    InvalidPatternSymbol { pattern: String, symbol: char },

    #[error("mismatch bound {max_mismatches} exceeds pattern length {pattern_len}")]
    MismatchBound { max_mismatches: usize, pattern_len: usize },

    /// 逆变换输入中哨兵数量不为 1
    #[error("malformed BWT string: expected exactly one sentinel, found {found}")]
    MalformedTransform { found: usize },

    /// LF 循环在输出全部符号之前回到了哨兵：输入不是任何文本的 BWT
    #[error("malformed BWT string: LF cycle closed after {steps} of {len} symbols")]
    BrokenCycle { steps: usize, len: usize },

    /// 由现成部件组装索引时 BWT 与 SA 长度不一致
    #[error("BWT has {bwt} rows but suffix array has {sa}")]
    PartsLength { bwt: usize, sa: usize },

    /// BWT 中出现了字母表编码范围之外的值
    #[error("BWT code {code} at row {row} is outside an alphabet of {sigma} symbols")]
    CodeOutOfRange { code: u8, row: usize, sigma: usize },

    #[error("cannot start query worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
