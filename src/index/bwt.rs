use crate::error::{IndexError, Result};
use crate::util::alphabet::SENTINEL_CODE;

/// 根据后缀数组构建 BWT。
/// text 为编码后的文本（0 为哨兵），sa 为后缀数组位置。
pub fn build_bwt(text: &[u8], sa: &[u32]) -> Vec<u8> {
    let n = text.len();
    if n == 0 {
        return Vec::new();
    }
    sa.iter()
        .map(|&p| {
            let i = p as usize;
            if i == 0 { text[n - 1] } else { text[i - 1] }
        })
        .collect()
}

/// 一次线性扫描构建完整的 LF 映射：`lf[i]` 为 BWT 第 i 行字符在首列中的行号。
///
/// 第 k 次出现的符号 c（在 BWT 中）对应首列中第 k 个 c，
/// 因此 `lf[i] = first[c] + (bwt[0..i) 中 c 的个数)`。
pub fn lf_table(bwt: &[u8]) -> Vec<u32> {
    let mut counts = [0u32; 256];
    // 每个位置在同符号中的序号，与 counts 同时产生
    let ranks: Vec<u32> = bwt
        .iter()
        .map(|&c| {
            let r = counts[c as usize];
            counts[c as usize] += 1;
            r
        })
        .collect();

    let mut first = [0u32; 256];
    let mut acc = 0u32;
    for (slot, &cnt) in first.iter_mut().zip(counts.iter()) {
        *slot = acc;
        acc += cnt;
    }

    bwt.iter().zip(ranks).map(|(&c, r)| first[c as usize] + r).collect()
}

/// 逆 BWT：只依赖 BWT 本身（编码后的字母表，0 为哨兵）重建原文本。
///
/// 从第 0 行（以哨兵开头的后缀）出发沿 LF 走 n-1 步，
/// 依次得到 text[n-2], text[n-3], ..., text[0]，反转后补上哨兵。
pub fn inverse_bwt(bwt: &[u8]) -> Result<Vec<u8>> {
    let found = bwt.iter().filter(|&&c| c == SENTINEL_CODE).count();
    if found != 1 {
        return Err(IndexError::MalformedTransform { found });
    }
    let n = bwt.len();
    let lf = lf_table(bwt);

    let mut out = Vec::with_capacity(n);
    let mut row = 0usize;
    for steps in 0..n - 1 {
        let c = bwt[row];
        if c == SENTINEL_CODE {
            // 哨兵提前出现：LF 置换不是单个环
            return Err(IndexError::BrokenCycle { steps, len: n });
        }
        out.push(c);
        row = lf[row] as usize;
    }
    // 走完 n-1 步后应恰好停在 BWT 为哨兵的那一行（即 text[0..] 所在行）
    if bwt[row] != SENTINEL_CODE {
        return Err(IndexError::BrokenCycle { steps: n - 1, len: n });
    }
    out.reverse();
    out.push(SENTINEL_CODE);
    Ok(out)
}

/// 原始字节版本的逆 BWT：哨兵 `sentinel` 无论字节值如何都视为最小符号。
pub fn inverse_transform(bwt: &[u8], sentinel: u8) -> Result<Vec<u8>> {
    // 排序键：哨兵为 0，其余字节整体 +1
    let keys: Vec<u16> = bwt
        .iter()
        .map(|&b| if b == sentinel { 0 } else { u16::from(b) + 1 })
        .collect();
    let found = keys.iter().filter(|&&k| k == 0).count();
    if found != 1 {
        return Err(IndexError::MalformedTransform { found });
    }

    let mut counts = vec![0u32; 257];
    for &k in &keys {
        counts[k as usize] += 1;
    }
    let mut seen = vec![0u32; 257];
    let mut first = vec![0u32; 257];
    let mut acc = 0u32;
    for (slot, &cnt) in first.iter_mut().zip(counts.iter()) {
        *slot = acc;
        acc += cnt;
    }
    let lf: Vec<u32> = keys
        .iter()
        .map(|&k| {
            let r = seen[k as usize];
            seen[k as usize] += 1;
            first[k as usize] + r
        })
        .collect();

    let n = bwt.len();
    let mut out = Vec::with_capacity(n);
    let mut row = 0usize;
    for steps in 0..n - 1 {
        if keys[row] == 0 {
            return Err(IndexError::BrokenCycle { steps, len: n });
        }
        out.push(bwt[row]);
        row = lf[row] as usize;
    }
    if keys[row] != 0 {
        return Err(IndexError::BrokenCycle { steps: n - 1, len: n });
    }
    out.reverse();
    out.push(sentinel);
    Ok(out)
}
