use regex::Regex;

/// 把提取的全文切分为带重叠的定长字符窗口。
///
/// 先把3个及以上连续换行压成两个，再以 `size` 个字符为窗口滑动；
/// 每个窗口结束位置回退 `overlap` 个字符作为下一窗口起点，
/// 窗口触及文末即停止。空文本返回空序列。
pub fn chunk_text(text: &str, size: usize, overlap: usize) -> Vec<String> {
    // 窗口至少1个字符，且 overlap 必须小于 size，否则窗口无法前进
    let size = size.max(1);
    let overlap = overlap.min(size - 1);

    let blank_lines = Regex::new(r"\n{3,}").expect("内置正则");
    let normalized = blank_lines.replace_all(text, "\n\n");

    let chars: Vec<char> = normalized.chars().collect();
    let n = chars.len();
    let mut chunks = Vec::new();
    let mut start = 0usize;

    while start < n {
        let end = (start + size).min(n);
        chunks.push(chars[start..end].iter().collect());
        if end == n {
            break;
        }
        start = end.saturating_sub(overlap);
    }

    chunks
}
