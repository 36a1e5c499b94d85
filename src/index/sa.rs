use crate::error::{IndexError, Result};

/// 构建后缀数组（倍增法，O(n log² n)）。
///
/// 输入为编码后的文本（0 为哨兵），返回按字典序排列的后缀起点。
/// 本层不检查哨兵唯一性：多个 0 也能得到正确的排序，唯一性由字母表层保证。
pub fn build_sa(text: &[u8]) -> Vec<u32> {
    let n = text.len();
    if n == 0 {
        return Vec::new();
    }
    let mut sa: Vec<usize> = (0..n).collect();
    let mut rank: Vec<i64> = text.iter().map(|&b| i64::from(b)).collect();
    let mut next_rank: Vec<i64> = vec![0; n];

    let mut k = 1usize;
    loop {
        // 以 (rank[i], rank[i + k]) 为键；越过文本末尾的后半段记为 -1
        let key = |i: usize, rank: &[i64]| (rank[i], if i + k < n { rank[i + k] } else { -1 });
        sa.sort_unstable_by_key(|&i| key(i, &rank[..]));

        next_rank[sa[0]] = 0;
        for w in 1..n {
            let (a, b) = (sa[w - 1], sa[w]);
            let bump = i64::from(key(a, &rank[..]) != key(b, &rank[..]));
            next_rank[b] = next_rank[a] + bump;
        }
        std::mem::swap(&mut rank, &mut next_rank);

        // 所有 rank 互不相同时排序完成
        if rank[sa[n - 1]] as usize == n - 1 || k >= n {
            break;
        }
        k <<= 1;
    }

    sa.into_iter().map(|x| x as u32).collect()
}

/// 后缀数组以 u32 存储，超长文本在构建前拒绝。
pub fn check_len(len: usize) -> Result<()> {
    if len > u32::MAX as usize {
        return Err(IndexError::TextTooLong { len });
    }
    Ok(())
}
