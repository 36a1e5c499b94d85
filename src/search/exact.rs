use super::MatchRange;
use crate::error::Result;
use crate::index::fm::FmIndex;

impl FmIndex {
    /// 反向搜索精确匹配，返回匹配行区间；区间为空表示无匹配（不是错误）。
    ///
    /// 模式为原始字节，先按字母表编码；空模式或含非法符号的模式直接报错。
    pub fn backward_search(&self, pattern: &[u8]) -> Result<MatchRange> {
        let pat = self.alphabet().encode_pattern(pattern)?;
        Ok(self.backward_search_codes(&pat))
    }

    /// 编码后模式的反向搜索（不再校验字母表）
    pub fn backward_search_codes(&self, pat: &[u8]) -> MatchRange {
        let mut l = 0usize;
        let mut r = self.len();
        for &a in pat.iter().rev() {
            let (nl, nr) = self.rank_range(a, l, r);
            if nl >= nr {
                return MatchRange::empty();
            }
            l = nl;
            r = nr;
        }
        MatchRange::from_half_open(l, r)
    }

    /// 模式出现次数
    pub fn count(&self, pattern: &[u8]) -> Result<usize> {
        Ok(self.backward_search(pattern)?.len())
    }

    /// 模式所有出现位置（升序）
    pub fn find(&self, pattern: &[u8]) -> Result<Vec<usize>> {
        let range = self.backward_search(pattern)?;
        Ok(self.locate_rows(range.rows()))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use crate::error::IndexError;
    use crate::index::fm::FmIndex;
    use crate::index::IndexConfig;

    pub(crate) fn naive_find(text: &[u8], pattern: &[u8]) -> Vec<usize> {
        if pattern.len() > text.len() {
            return Vec::new();
        }
        (0..=text.len() - pattern.len()).filter(|&i| &text[i..i + pattern.len()] == pattern).collect()
    }

    /// 伪随机 ACGT 文本（不含哨兵）
    pub(crate) fn make_dna(len: usize, seed: u32) -> Vec<u8> {
        let bases = [b'A', b'C', b'G', b'T'];
        let mut x = seed;
        (0..len)
            .map(|_| {
                x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                bases[(x >> 16) as usize % 4]
            })
            .collect()
    }

    #[test]
    fn textbook_exact_positions() {
        let fm = FmIndex::build(b"AATCGGGTTCAATCGGGGT$", &IndexConfig::new(5, 5)).unwrap();
        assert_eq!(fm.find(b"ATCG").unwrap(), vec![1, 11]);
        assert_eq!(fm.find(b"GGGT").unwrap(), vec![4, 15]);
    }

    #[test]
    fn textbook_counts() {
        let fm = FmIndex::build(b"panamabananas$", &IndexConfig::new(3, 2)).unwrap();
        assert_eq!(fm.count(b"ana").unwrap(), 3);
        assert_eq!(fm.count(b"nam").unwrap(), 1);
        assert_eq!(fm.count(b"ba").unwrap(), 1);
        assert_eq!(fm.count(b"mb").unwrap(), 0);
        assert_eq!(fm.find(b"ana").unwrap(), vec![1, 7, 9]);
    }

    #[test]
    fn empty_range_is_not_an_error() {
        let fm = FmIndex::build(b"AAAA$", &IndexConfig::default()).unwrap();
        let range = fm.backward_search(b"AAAAA").unwrap();
        assert!(range.is_empty());
        assert!(fm.find(b"AAAAA").unwrap().is_empty());
    }

    #[test]
    fn malformed_patterns_fail_before_search() {
        let fm = FmIndex::build(b"ACGTACGT$", &IndexConfig::default()).unwrap();
        assert!(matches!(fm.count(b"ACN"), Err(IndexError::InvalidPatternSymbol { symbol: 'N', .. })));
        assert!(matches!(fm.find(b""), Err(IndexError::EmptyPattern)));
        assert!(matches!(fm.count(b"T$"), Err(IndexError::InvalidPatternSymbol { symbol: '$', .. })));
    }

    #[test]
    fn counts_match_naive_scan() {
        let mut text = make_dna(400, 2024);
        text.push(b'$');
        let body = &text[..text.len() - 1];
        for cfg in [IndexConfig::new(1, 1), IndexConfig::new(7, 3), IndexConfig::new(100, 5)] {
            let fm = FmIndex::build(&text, &cfg).unwrap();
            for start in (0..380).step_by(13) {
                for len in [1usize, 2, 3, 5, 8, 20] {
                    let pat = &body[start..start + len];
                    let expect = naive_find(body, pat);
                    assert_eq!(fm.count(pat).unwrap(), expect.len());
                    assert_eq!(fm.find(pat).unwrap(), expect);
                }
            }
            // 文本中不存在的模式
            assert_eq!(fm.count(&[b'A'; 64]).unwrap(), naive_find(body, &[b'A'; 64]).len());
        }
    }
}
