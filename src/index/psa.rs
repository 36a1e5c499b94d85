/// 稀疏采样的后缀数组：只保留 `sa[row] % interval == 0` 的行。
///
/// 行是否被采样用位图记录，每个 64 位字附带一个累计 popcount，
/// 因此 `get` 为 O(1)，而位置本身只按采样行数存储。
#[derive(Debug, Clone)]
pub struct PartialSuffixArray {
    interval: usize,
    marks: Vec<u64>,
    /// word_ranks[w] = marks[0..w) 中置位的总数
    word_ranks: Vec<u32>,
    /// 按行号升序排列的采样位置
    positions: Vec<u32>,
}

impl PartialSuffixArray {
    pub fn build(sa: &[u32], interval: usize) -> Self {
        // 取模在 usize 上进行，K 超过 u32 范围时只剩位置 0 被采样
        let k = interval.max(1);
        let n_words = sa.len().div_ceil(64);
        let mut marks = vec![0u64; n_words];
        let mut positions = Vec::with_capacity(sa.len() / k + 1);
        for (row, &p) in sa.iter().enumerate() {
            if p as usize % k == 0 {
                marks[row / 64] |= 1u64 << (row % 64);
                positions.push(p);
            }
        }

        let mut word_ranks = Vec::with_capacity(n_words);
        let mut acc = 0u32;
        for &w in &marks {
            word_ranks.push(acc);
            acc += w.count_ones();
        }

        Self { interval: k, marks, word_ranks, positions }
    }

    #[inline]
    pub fn get(&self, row: usize) -> Option<usize> {
        let word = *self.marks.get(row / 64)?;
        let bit = row % 64;
        if (word >> bit) & 1 == 0 {
            return None;
        }
        let below = (word & ((1u64 << bit) - 1)).count_ones();
        let idx = (self.word_ranks[row / 64] + below) as usize;
        Some(self.positions[idx] as usize)
    }

    pub fn interval(&self) -> usize {
        self.interval
    }

    /// 采样行数
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// 按行号升序给出 (row, position)
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let rows = self.marks.iter().enumerate().flat_map(|(w, &word)| {
            (0..64usize).filter(move |&b| (word >> b) & 1 == 1).map(move |b| w * 64 + b)
        });
        rows.zip(self.positions.iter().map(|&p| p as usize))
    }

    pub fn heap_bytes(&self) -> usize {
        self.marks.len() * 8 + self.word_ranks.len() * 4 + self.positions.len() * 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::sa::build_sa;
    use crate::index::sa::tests::make_text;

    #[test]
    fn textbook_partial_suffix_array() {
        // panamabananas$, K = 5
        let sa = vec![13u32, 5, 3, 1, 7, 9, 11, 6, 4, 2, 8, 10, 0, 12];
        let psa = PartialSuffixArray::build(&sa, 5);
        let pairs: Vec<(usize, usize)> = psa.iter().collect();
        assert_eq!(pairs, vec![(1, 5), (11, 10), (12, 0)]);
        assert_eq!(psa.get(11), Some(10));
        assert_eq!(psa.get(2), None);
        assert_eq!(psa.get(100), None);
    }

    #[test]
    fn lookup_agrees_with_full_sa_across_word_boundaries() {
        let text = make_text(300, 4, 17);
        let sa = build_sa(&text);
        for k in [1usize, 3, 7, 64] {
            let psa = PartialSuffixArray::build(&sa, k);
            for (row, &p) in sa.iter().enumerate() {
                let expect = (p as usize % k == 0).then_some(p as usize);
                assert_eq!(psa.get(row), expect, "k={k} row={row}");
            }
            assert_eq!(psa.len(), sa.iter().filter(|&&p| p as usize % k == 0).count());
        }
    }

    #[test]
    fn interval_beyond_u32_keeps_only_position_zero() {
        let sa = vec![4u32, 0, 1, 2, 3];
        let psa = PartialSuffixArray::build(&sa, u32::MAX as usize + 1);
        assert_eq!(psa.interval(), u32::MAX as usize + 1);
        assert_eq!(psa.iter().collect::<Vec<_>>(), vec![(1, 0)]);
    }

    #[test]
    fn interval_one_keeps_everything() {
        let sa = vec![4u32, 0, 1, 2, 3];
        let psa = PartialSuffixArray::build(&sa, 1);
        assert_eq!(psa.len(), 5);
        assert_eq!(psa.iter().map(|(_, p)| p).collect::<Vec<_>>(), vec![4, 0, 1, 2, 3]);
    }
}
