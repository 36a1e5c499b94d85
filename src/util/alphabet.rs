use crate::error::{IndexError, Result};

/// 默认哨兵符号
pub const DEFAULT_SENTINEL: u8 = b'$';

/// 哨兵固定编码为 0，保证它在字典序上先于所有字母
pub const SENTINEL_CODE: u8 = 0;

/// 有限字母表到稠密编码的映射：
/// - 哨兵 → 0，其余符号按字节升序编码为 1..sigma；
/// - 哨兵无论字节值多大都排在最前面；
/// - 编码后的文本可以直接用作 C 表 / Occ 表的下标。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    sentinel: u8,
    /// code -> byte，symbols[0] 即哨兵
    symbols: Vec<u8>,
    /// byte -> code
    codes: [Option<u8>; 256],
}

impl Alphabet {
    /// 显式声明字母表。`symbols` 中重复的符号与哨兵本身会被忽略。
    pub fn new(symbols: &[u8], sentinel: u8) -> Self {
        let mut present = [false; 256];
        for &b in symbols {
            present[b as usize] = true;
        }
        present[sentinel as usize] = false;

        let mut table = Vec::with_capacity(256);
        table.push(sentinel);
        table.extend((0..=255u8).filter(|&b| present[b as usize]));

        let mut codes = [None; 256];
        for (code, &b) in table.iter().enumerate() {
            codes[b as usize] = Some(code as u8);
        }
        Self { sentinel, symbols: table, codes }
    }

    /// 由文本中实际出现的符号推导字母表（同时校验哨兵）。
    pub fn from_text(text: &[u8], sentinel: u8) -> Result<Self> {
        check_sentinel(text, sentinel)?;
        Ok(Self::new(text, sentinel))
    }

    /// 字母表大小（含哨兵）
    #[inline]
    pub fn sigma(&self) -> usize {
        self.symbols.len()
    }

    #[inline]
    pub fn sentinel(&self) -> u8 {
        self.sentinel
    }

    /// 不含哨兵的符号，按编码顺序
    pub fn symbols(&self) -> &[u8] {
        &self.symbols[1..]
    }

    #[inline]
    pub fn code_of(&self, b: u8) -> Option<u8> {
        self.codes[b as usize]
    }

    #[inline]
    pub fn symbol_of(&self, code: u8) -> u8 {
        self.symbols[code as usize]
    }

    /// 编码一条以哨兵结尾的文本；哨兵数量、位置以及符号合法性都会被校验。
    pub fn encode_text(&self, text: &[u8]) -> Result<Vec<u8>> {
        check_sentinel(text, self.sentinel)?;
        text.iter()
            .enumerate()
            .map(|(offset, &b)| {
                self.code_of(b).ok_or_else(|| IndexError::InvalidSymbol { symbol: b as char, offset })
            })
            .collect()
    }

    /// 编码查询模式。模式不能为空，也不能含有哨兵或字母表外的符号。
    pub fn encode_pattern(&self, pattern: &[u8]) -> Result<Vec<u8>> {
        if pattern.is_empty() {
            return Err(IndexError::EmptyPattern);
        }
        pattern
            .iter()
            .map(|&b| match self.code_of(b) {
                Some(code) if code != SENTINEL_CODE => Ok(code),
                _ => Err(IndexError::InvalidPatternSymbol {
                    pattern: String::from_utf8_lossy(pattern).into_owned(),
                    symbol: b as char,
                }),
            })
            .collect()
    }

    pub fn decode(&self, codes: &[u8]) -> Vec<u8> {
        codes.iter().map(|&c| self.symbol_of(c)).collect()
    }
}

/// 文本必须非空、恰好含一个哨兵，且哨兵位于末尾。
pub fn check_sentinel(text: &[u8], sentinel: u8) -> Result<()> {
    if text.is_empty() {
        return Err(IndexError::EmptyText);
    }
    let found = text.iter().filter(|&&b| b == sentinel).count();
    if found != 1 {
        return Err(IndexError::SentinelCount { sentinel: sentinel as char, found });
    }
    let len = text.len();
    match text.iter().position(|&b| b == sentinel) {
        Some(offset) if offset + 1 != len => Err(IndexError::SentinelNotTerminal {
            sentinel: sentinel as char,
            offset,
            len,
        }),
        _ => Ok(()),
    }
}
