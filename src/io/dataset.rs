use anyhow::{anyhow, Result};
use std::io::BufRead;

/// 文本数据集：
/// - 第一行非空行为文本（或 BWT 串）；
/// - 之后每行若干个以空白分隔的模式；
/// - 启用 [`DatasetReader::with_mismatch_bound`] 时，若最后一行全是数字则作为错配上限 d；
///   否则它和其他行一样是模式（数字字母表的文本因此不会丢失模式）。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    pub text: Vec<u8>,
    pub patterns: Vec<Vec<u8>>,
    pub mismatches: Option<usize>,
}

impl Dataset {
    /// 文本末尾缺少哨兵时补上
    pub fn terminated_text(&self, sentinel: u8) -> Vec<u8> {
        let mut text = self.text.clone();
        if text.last() != Some(&sentinel) {
            text.push(sentinel);
        }
        text
    }
}

pub struct DatasetReader<R: BufRead> {
    reader: R,
    buf: String,
    trailing_bound: bool,
}

impl<R: BufRead> DatasetReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, buf: String::new(), trailing_bound: false }
    }

    /// 把全数字的末行解析为错配上限（仅近似搜索需要）
    pub fn with_mismatch_bound(mut self) -> Self {
        self.trailing_bound = true;
        self
    }

    fn next_line(&mut self) -> Result<Option<String>> {
        loop {
            self.buf.clear();
            let n = self.reader.read_line(&mut self.buf)?;
            if n == 0 {
                return Ok(None);
            }
            let line = self.buf.trim();
            if !line.is_empty() {
                return Ok(Some(line.to_string()));
            }
        }
    }

    pub fn read(mut self) -> Result<Dataset> {
        let text = self.next_line()?.ok_or_else(|| anyhow!("dataset is empty"))?;

        let mut lines = Vec::new();
        while let Some(line) = self.next_line()? {
            lines.push(line);
        }
        let mut mismatches = None;
        if let Some(last) = lines.last().filter(|_| self.trailing_bound) {
            if last.bytes().all(|b| b.is_ascii_digit()) {
                mismatches = Some(last.parse::<usize>().map_err(|e| anyhow!("invalid mismatch bound '{}': {}", last, e))?);
                lines.pop();
            }
        }

        let patterns = lines
            .iter()
            .flat_map(|line| line.split_whitespace())
            .map(|p| p.as_bytes().to_vec())
            .collect();

        Ok(Dataset { text: text.into_bytes(), patterns, mismatches })
    }
}

/// 从文件读取数据集；`mismatch_bound` 决定是否解析末尾的错配上限行
pub fn read_dataset(path: &str, mismatch_bound: bool) -> Result<Dataset> {
    let fh = std::fs::File::open(path).map_err(|e| anyhow!("cannot open dataset '{}': {}", path, e))?;
    let mut reader = DatasetReader::new(std::io::BufReader::new(fh));
    if mismatch_bound {
        reader = reader.with_mismatch_bound();
    }
    reader.read()
}
