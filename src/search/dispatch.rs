use log::debug;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::Result;
use crate::index::fm::FmIndex;

/// 多模式查询调度：在固定大小的 rayon 线程池中对每个模式独立执行反向搜索。
///
/// 索引只读共享，不加锁；每个任务返回私有结果，全部完成后再合并。
/// 任一模式非法时整体返回该错误，不给出部分结果。
pub struct QueryDispatcher<'a> {
    index: &'a FmIndex,
    pool: ThreadPool,
}

impl<'a> QueryDispatcher<'a> {
    /// `threads == 0` 时线程数由 rayon 决定（通常为 CPU 核数）
    pub fn new(index: &'a FmIndex, threads: usize) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("fm-query-{i}"))
            .build()?;
        debug!("query pool started with {} threads", pool.current_num_threads());
        Ok(Self { index, pool })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    pub fn index(&self) -> &FmIndex {
        self.index
    }

    /// 每个模式一个计数，顺序与输入一致
    pub fn count_all<P>(&self, patterns: &[P]) -> Result<Vec<usize>>
    where
        P: AsRef<[u8]> + Sync,
    {
        debug!("counting {} patterns", patterns.len());
        self.pool.install(|| patterns.par_iter().map(|p| self.index.count(p.as_ref())).collect())
    }

    /// 每个模式各自的精确匹配位置（升序）
    pub fn find_each<P>(&self, patterns: &[P]) -> Result<Vec<Vec<usize>>>
    where
        P: AsRef<[u8]> + Sync,
    {
        debug!("locating {} patterns", patterns.len());
        self.pool.install(|| patterns.par_iter().map(|p| self.index.find(p.as_ref())).collect())
    }

    /// 所有模式精确匹配位置合并后的升序列表（不跨模式去重）
    pub fn find_all<P>(&self, patterns: &[P]) -> Result<Vec<usize>>
    where
        P: AsRef<[u8]> + Sync,
    {
        Ok(merge_sorted(self.find_each(patterns)?))
    }

    pub fn find_each_approx<P>(&self, patterns: &[P], max_mismatches: usize) -> Result<Vec<Vec<usize>>>
    where
        P: AsRef<[u8]> + Sync,
    {
        debug!("approximate search for {} patterns, d={}", patterns.len(), max_mismatches);
        self.pool.install(|| {
            patterns
                .par_iter()
                .map(|p| self.index.find_approx(p.as_ref(), max_mismatches))
                .collect()
        })
    }

    pub fn find_all_approx<P>(&self, patterns: &[P], max_mismatches: usize) -> Result<Vec<usize>>
    where
        P: AsRef<[u8]> + Sync,
    {
        Ok(merge_sorted(self.find_each_approx(patterns, max_mismatches)?))
    }
}

fn merge_sorted(per_pattern: Vec<Vec<usize>>) -> Vec<usize> {
    let mut all: Vec<usize> = per_pattern.into_iter().flatten().collect();
    all.sort_unstable();
    all
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IndexError;
    use crate::index::IndexConfig;
    use crate::search::exact::tests::make_dna;

    #[test]
    fn textbook_multiple_pattern_matching() {
        let fm = FmIndex::build(b"AATCGGGTTCAATCGGGGT$", &IndexConfig::new(5, 5)).unwrap();
        let qd = QueryDispatcher::new(&fm, 2).unwrap();
        assert_eq!(qd.find_all(&["ATCG", "GGGT"]).unwrap(), vec![1, 4, 11, 15]);
        assert_eq!(qd.count_all(&["ATCG", "GGGT", "TTT"]).unwrap(), vec![2, 2, 0]);
    }

    #[test]
    fn textbook_multiple_approximate_matching() {
        let fm = FmIndex::build(b"ACATGCTACTTT$", &IndexConfig::new(5, 5)).unwrap();
        let qd = QueryDispatcher::new(&fm, 3).unwrap();
        let patterns = ["ATT", "GCC", "GCTA", "TATT"];
        assert_eq!(qd.find_all_approx(&patterns, 1).unwrap(), vec![2, 4, 4, 6, 7, 8, 9]);
        assert_eq!(
            qd.find_each_approx(&patterns, 1).unwrap(),
            vec![vec![2, 7, 8, 9], vec![4], vec![4], vec![6]]
        );
    }

    #[test]
    fn results_do_not_depend_on_pool_size() {
        let mut text = make_dna(2_000, 99);
        text.push(b'$');
        let fm = FmIndex::build(&text, &IndexConfig::default()).unwrap();
        let patterns: Vec<Vec<u8>> = (0..64).map(|i| text[i * 25..i * 25 + 9].to_vec()).collect();

        let single = QueryDispatcher::new(&fm, 1).unwrap();
        let many = QueryDispatcher::new(&fm, 4).unwrap();
        assert_eq!(single.threads(), 1);
        assert_eq!(single.find_all(&patterns).unwrap(), many.find_all(&patterns).unwrap());
        assert_eq!(
            single.find_all_approx(&patterns, 2).unwrap(),
            many.find_all_approx(&patterns, 2).unwrap()
        );
        let expect: Vec<usize> = patterns.iter().map(|p| fm.count(p).unwrap()).collect();
        assert_eq!(many.count_all(&patterns).unwrap(), expect);
    }

    #[test]
    fn malformed_pattern_fails_the_batch() {
        let fm = FmIndex::build(b"ACGTACGT$", &IndexConfig::default()).unwrap();
        let qd = QueryDispatcher::new(&fm, 2).unwrap();
        assert!(matches!(qd.find_all(&["ACG", "AXG"]), Err(IndexError::InvalidPatternSymbol { .. })));
        assert!(matches!(qd.count_all(&["ACG", ""]), Err(IndexError::EmptyPattern)));
    }
}
