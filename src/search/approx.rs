use log::debug;

use crate::error::{IndexError, Result};
use crate::index::fm::FmIndex;
use crate::util::alphabet::SENTINEL_CODE;

/// 近似搜索中的一个候选：当前行号与已累积的错配数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Candidate {
    row: usize,
    mismatches: usize,
}

/// 候选消费一个模式字符后的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Advance(Candidate),
    /// BWT 符号为哨兵：文本在此之前已无字符，窗口会越过哨兵
    HitSentinel,
    /// 错配数超过上限
    OverBudget,
}

/// 候选前沿：两个缓冲区逐步交换，避免每一步重新分配
struct Frontier {
    live: Vec<Candidate>,
    next: Vec<Candidate>,
    hit_sentinel: usize,
    over_budget: usize,
}

impl Frontier {
    /// 初始时每一行都是 0 错配的候选
    fn new(rows: usize) -> Self {
        Self {
            live: (0..rows).map(|row| Candidate { row, mismatches: 0 }).collect(),
            next: Vec::with_capacity(rows),
            hit_sentinel: 0,
            over_budget: 0,
        }
    }

    fn advance<F>(&mut self, mut step: F)
    where
        F: FnMut(Candidate) -> Step,
    {
        self.next.clear();
        for &cand in &self.live {
            match step(cand) {
                Step::Advance(next) => self.next.push(next),
                Step::HitSentinel => self.hit_sentinel += 1,
                Step::OverBudget => self.over_budget += 1,
            }
        }
        std::mem::swap(&mut self.live, &mut self.next);
    }

    fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

impl FmIndex {
    /// 近似匹配：返回与模式 Hamming 距离不超过 `max_mismatches` 的所有起始位置（升序）。
    ///
    /// 只考虑替换，不考虑插入/删除。`max_mismatches == 0` 时退化为精确搜索；
    /// 大于模式长度视为非法输入。
    pub fn find_approx(&self, pattern: &[u8], max_mismatches: usize) -> Result<Vec<usize>> {
        let pat = self.alphabet().encode_pattern(pattern)?;
        if max_mismatches > pat.len() {
            return Err(IndexError::MismatchBound { max_mismatches, pattern_len: pat.len() });
        }
        if max_mismatches == 0 {
            return Ok(self.locate_rows(self.backward_search_codes(&pat).rows()));
        }
        Ok(self.locate_rows(self.approx_rows(&pat, max_mismatches)))
    }

    /// 逐行跟踪的反向搜索。每个候选只与自身行上真实的前驱符号比较，
    /// 因此不需要在每个位置枚举整个字母表。
    pub(crate) fn approx_rows(&self, pat: &[u8], max_mismatches: usize) -> Vec<usize> {
        let mut frontier = Frontier::new(self.len());
        for &a in pat.iter().rev() {
            frontier.advance(|cand| self.extend_candidate(cand, a, max_mismatches));
            if frontier.is_empty() {
                break;
            }
        }
        debug!(
            "approximate search (len={}, d={}): {} survivors, {} hit sentinel, {} over budget",
            pat.len(),
            max_mismatches,
            frontier.live.len(),
            frontier.hit_sentinel,
            frontier.over_budget
        );
        frontier.live.into_iter().map(|cand| cand.row).collect()
    }

    #[inline]
    fn extend_candidate(&self, cand: Candidate, a: u8, max_mismatches: usize) -> Step {
        let c = self.symbol_at(cand.row);
        // 这里与预算无关：哨兵前面没有任何文本，这一行不可能再延伸
        if c == SENTINEL_CODE {
            return Step::HitSentinel;
        }
        let mismatches = cand.mismatches + usize::from(c != a);
        if mismatches > max_mismatches {
            return Step::OverBudget;
        }
        Step::Advance(Candidate { row: self.lf_with(c, cand.row), mismatches })
    }
}

#[cfg(test)]
mod tests {
    use crate::error::IndexError;
    use crate::index::fm::FmIndex;
    use crate::index::IndexConfig;
    use crate::search::exact::tests::make_dna;

    fn naive_approx(text: &[u8], pattern: &[u8], d: usize) -> Vec<usize> {
        if pattern.len() > text.len() {
            return Vec::new();
        }
        (0..=text.len() - pattern.len())
            .filter(|&i| {
                text[i..i + pattern.len()].iter().zip(pattern).filter(|(a, b)| a != b).count() <= d
            })
            .collect()
    }

    #[test]
    fn textbook_approximate_positions() {
        let fm = FmIndex::build(b"ACATGCTACTTT$", &IndexConfig::new(3, 2)).unwrap();
        assert_eq!(fm.find_approx(b"ATT", 1).unwrap(), vec![2, 7, 8, 9]);
        assert_eq!(fm.find_approx(b"GCC", 1).unwrap(), vec![4]);
        assert_eq!(fm.find_approx(b"GCTA", 1).unwrap(), vec![4]);
        assert_eq!(fm.find_approx(b"TATT", 1).unwrap(), vec![6]);
    }

    #[test]
    fn zero_budget_equals_exact_search() {
        let mut text = make_dna(300, 11);
        text.push(b'$');
        let fm = FmIndex::build(&text, &IndexConfig::new(16, 4)).unwrap();
        for start in (0..280).step_by(17) {
            let pat = &text[start..start + 6];
            let exact = fm.find(pat).unwrap();
            assert_eq!(fm.find_approx(pat, 0).unwrap(), exact);
            // 逐行前沿在 d = 0 时也必须给出同样的结果
            let codes = fm.alphabet().encode_pattern(pat).unwrap();
            assert_eq!(fm.locate_rows(fm.approx_rows(&codes, 0)), exact);
        }
    }

    #[test]
    fn matches_brute_force_hamming_scan() {
        let mut text = make_dna(250, 4242);
        text.push(b'$');
        let body = &text[..text.len() - 1];
        let patterns: [&[u8]; 5] = [b"ACGT", b"TTTAG", b"GATTACA", b"CC", b"AGCTAGCTAG"];
        for cfg in [IndexConfig::new(1, 1), IndexConfig::new(32, 7)] {
            let fm = FmIndex::build(&text, &cfg).unwrap();
            for pat in patterns {
                for d in 0..=3usize.min(pat.len()) {
                    assert_eq!(
                        fm.find_approx(pat, d).unwrap(),
                        naive_approx(body, pat, d),
                        "pattern={} d={d}",
                        String::from_utf8_lossy(pat)
                    );
                }
            }
        }
    }

    #[test]
    fn windows_never_run_into_the_sentinel() {
        // 末尾 "AC" 与模式 "ACT" 只差一个字符，但窗口会越过文本末尾
        let fm = FmIndex::build(b"TTTTAC$", &IndexConfig::new(2, 2)).unwrap();
        assert_eq!(fm.find_approx(b"ACT", 1).unwrap(), Vec::<usize>::new());
        // 全部容错时，每个完整窗口都算匹配
        assert_eq!(fm.find_approx(b"CCC", 3).unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn mismatch_bound_is_validated() {
        let fm = FmIndex::build(b"ACGT$", &IndexConfig::default()).unwrap();
        assert!(matches!(
            fm.find_approx(b"AC", 3),
            Err(IndexError::MismatchBound { max_mismatches: 3, pattern_len: 2 })
        ));
        assert!(matches!(fm.find_approx(b"AX", 1), Err(IndexError::InvalidPatternSymbol { .. })));
    }
}
