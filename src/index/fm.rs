use log::{debug, info};
use serde::Serialize;

use super::bwt::{build_bwt, inverse_bwt};
use super::psa::PartialSuffixArray;
use super::sa::{build_sa, check_len};
use super::IndexConfig;
use crate::error::{IndexError, Result};
use crate::util::alphabet::{Alphabet, SENTINEL_CODE};

/// FM 索引：
/// - 字母以 [0..sigma) 编码（0 为哨兵 $），C 表与 Occ 表都是按编码下标的稠密数组；
/// - Occ 按定长分块采样（块内顺扫补偿），间隔即 `checkpoint_interval`；
/// - SA 只保留 `sa[row] % sample_interval == 0` 的行，其余位置通过 LF 回溯得到。
///
/// 构建完成后只读，可在多个线程间共享。
#[derive(Debug, Clone)]
pub struct FmIndex {
    alphabet: Alphabet,
    config: IndexConfig,
    /// C[c] = 文本中编码 < c 的符号数量
    pub(crate) c: Vec<u32>,
    /// BWT 序列（编码后）
    pub(crate) bwt: Vec<u8>,
    /// Occ 采样（按块存储，行优先展平）：occ_samples[block_id * sigma + c]
    pub(crate) occ_samples: Vec<u32>,
    pub(crate) psa: PartialSuffixArray,
}

/// 索引规模摘要
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub text_len: usize,
    pub sigma: usize,
    pub checkpoint_interval: usize,
    pub checkpoints: usize,
    pub sample_interval: usize,
    pub sampled_rows: usize,
    pub heap_bytes: usize,
}

impl FmIndex {
    /// 从以哨兵结尾的原始文本构建索引，字母表由文本推导。
    pub fn build(text: &[u8], config: &IndexConfig) -> Result<Self> {
        let alphabet = Alphabet::from_text(text, config.sentinel)?;
        Self::build_with_alphabet(text, alphabet, config)
    }

    /// 使用显式声明的字母表构建索引；文本中出现字母表外的符号即失败。
    pub fn build_with_alphabet(text: &[u8], alphabet: Alphabet, config: &IndexConfig) -> Result<Self> {
        config.validate()?;
        check_len(text.len())?;
        let codes = alphabet.encode_text(text)?;
        debug!("encoded text: {} symbols, sigma={}", codes.len(), alphabet.sigma());

        // SA -> BWT -> FM
        let sa = build_sa(&codes);
        debug!("suffix array built ({} rows)", sa.len());
        let bwt = build_bwt(&codes, &sa);
        drop(codes);
        Self::from_parts(alphabet, bwt, sa, config)
    }

    /// 由现成的 BWT 与 SA 生成辅助表。SA 在采样后即被丢弃。
    ///
    /// 两者长度必须一致，BWT 编码必须落在字母表内且恰好含一个哨兵。
    pub fn from_parts(alphabet: Alphabet, bwt: Vec<u8>, sa: Vec<u32>, config: &IndexConfig) -> Result<Self> {
        config.validate()?;
        check_parts(&alphabet, &bwt, &sa)?;
        let n = bwt.len();
        let sigma = alphabet.sigma();
        let block = config.checkpoint_interval;

        // 计算 C 表
        let mut freq = vec![0u32; sigma];
        for &ch in &bwt {
            freq[ch as usize] += 1;
        }
        let mut c = vec![0u32; sigma];
        let mut acc = 0u32;
        for (slot, &f) in c.iter_mut().zip(&freq) {
            *slot = acc;
            acc += f;
        }

        // 采样 Occ：记录每个块起始位置之前的累计计数
        let num_blocks = n.div_ceil(block);
        let mut occ_samples = vec![0u32; num_blocks * sigma];
        let mut running = vec![0u32; sigma];
        for (bi, chunk) in bwt.chunks(block).enumerate() {
            occ_samples[bi * sigma..(bi + 1) * sigma].copy_from_slice(&running);
            for &ch in chunk {
                running[ch as usize] += 1;
            }
        }

        let psa = PartialSuffixArray::build(&sa, config.sample_interval);
        drop(sa);

        let fm = Self { alphabet, config: *config, c, bwt, occ_samples, psa };
        let stats = fm.stats();
        info!(
            "FM index ready: n={} sigma={} checkpoints={} (C={}) sampled_rows={} (K={}) ~{} bytes",
            stats.text_len,
            stats.sigma,
            stats.checkpoints,
            stats.checkpoint_interval,
            stats.sampled_rows,
            stats.sample_interval,
            stats.heap_bytes
        );
        Ok(fm)
    }

    /// 文本长度（含哨兵），亦即 BWT 行数
    #[inline]
    pub fn len(&self) -> usize {
        self.bwt.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bwt.is_empty()
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// 编码后的 BWT
    pub fn bwt(&self) -> &[u8] {
        &self.bwt
    }

    /// 还原为原始字节的 BWT 串
    pub fn bwt_string(&self) -> Vec<u8> {
        self.alphabet.decode(&self.bwt)
    }

    pub fn partial_suffix_array(&self) -> &PartialSuffixArray {
        &self.psa
    }

    /// 首列中符号 `code` 第一次出现的行号
    #[inline]
    pub fn first_occurrence(&self, code: u8) -> usize {
        self.c[code as usize] as usize
    }

    #[inline]
    pub fn symbol_at(&self, row: usize) -> u8 {
        self.bwt[row]
    }

    /// 返回 BWT[0..pos) 中 c 的出现次数
    #[inline]
    pub fn occ(&self, c: u8, pos: usize) -> usize {
        if pos == 0 {
            return 0;
        }
        let sigma = self.alphabet.sigma();
        let block = self.config.checkpoint_interval;
        let bi = (pos - 1) / block; // 所在块编号
        let base = self.occ_samples[bi * sigma + c as usize] as usize;
        let add = self.bwt[bi * block..pos].iter().filter(|&&ch| ch == c).count();
        base + add
    }

    /// 在半开区间 [l, r) 上向左扩展字符 c 后的新区间
    #[inline]
    pub fn rank_range(&self, c: u8, l: usize, r: usize) -> (usize, usize) {
        let c0 = self.first_occurrence(c);
        (c0 + self.occ(c, l), c0 + self.occ(c, r))
    }

    /// 已知 BWT[row] == c 时的 LF 映射
    #[inline]
    pub fn lf_with(&self, c: u8, row: usize) -> usize {
        self.first_occurrence(c) + self.occ(c, row)
    }

    /// LF 映射：行 row 对应后缀的前一个文本位置所在的行
    #[inline]
    pub fn lf(&self, row: usize) -> usize {
        self.lf_with(self.bwt[row], row)
    }

    /// 行号 -> 文本位置：沿 LF 回溯直到命中采样行，结果为采样值加步数。
    /// 位置 0 一定被采样，因此最多 K-1 步即可终止。
    pub fn locate(&self, row: usize) -> usize {
        let mut row = row;
        let mut steps = 0usize;
        loop {
            if let Some(pos) = self.psa.get(row) {
                return pos + steps;
            }
            row = self.lf(row);
            steps += 1;
        }
    }

    /// 批量定位并升序排序
    pub fn locate_rows<I>(&self, rows: I) -> Vec<usize>
    where
        I: IntoIterator<Item = usize>,
    {
        let mut positions: Vec<usize> = rows.into_iter().map(|row| self.locate(row)).collect();
        positions.sort_unstable();
        positions
    }

    /// 仅凭 BWT 通过逆变换重建原文本
    pub fn reconstruct_text(&self) -> Result<Vec<u8>> {
        let codes = inverse_bwt(&self.bwt)?;
        Ok(self.alphabet.decode(&codes))
    }

    pub fn stats(&self) -> IndexStats {
        let sigma = self.alphabet.sigma();
        IndexStats {
            text_len: self.len(),
            sigma,
            checkpoint_interval: self.config.checkpoint_interval,
            checkpoints: self.occ_samples.len() / sigma.max(1),
            sample_interval: self.config.sample_interval,
            sampled_rows: self.psa.len(),
            heap_bytes: self.bwt.len() + self.c.len() * 4 + self.occ_samples.len() * 4 + self.psa.heap_bytes(),
        }
    }
}

fn check_parts(alphabet: &Alphabet, bwt: &[u8], sa: &[u32]) -> Result<()> {
    if bwt.len() != sa.len() {
        return Err(IndexError::PartsLength { bwt: bwt.len(), sa: sa.len() });
    }
    check_len(bwt.len())?;
    let sigma = alphabet.sigma();
    if let Some((row, &code)) = bwt.iter().enumerate().find(|&(_, &c)| c as usize >= sigma) {
        return Err(IndexError::CodeOutOfRange { code, row, sigma });
    }
    let found = bwt.iter().filter(|&&c| c == SENTINEL_CODE).count();
    if found != 1 {
        return Err(IndexError::MalformedTransform { found });
    }
    Ok(())
}
