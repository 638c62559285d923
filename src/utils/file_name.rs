use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

/// 原文件名部分的最大字节数（整体需低于文件系统 255 字节上限）
const MAX_ORIGINAL_NAME_BYTES: usize = 100;
/// 截断时保留的扩展名最大字节数
const MAX_EXTENSION_BYTES: usize = 16;

/// 生成落盘文件名：`<毫秒时间戳>-<uuid>-<原文件名>`
///
/// 原文件名去掉路径部分，空白替换为 `_`，路径分隔符与控制字符同样替换。
pub fn stored_file_name(original: &str) -> String {
    let base = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    let base = WHITESPACE_RE.replace_all(base, "_");
    let mut safe: String = base
        .chars()
        .map(|c| if c.is_control() || c == ':' { '_' } else { c })
        .collect();
    if safe.is_empty() || safe == "." || safe == ".." {
        safe = "report.pdf".to_string();
    }

    format!(
        "{}-{}-{}",
        chrono::Utc::now().timestamp_millis(),
        uuid::Uuid::new_v4().simple(),
        truncate_name(&safe)
    )
}

/// 超长文件名在字符边界处截断，保留扩展名
fn truncate_name(name: &str) -> String {
    if name.len() <= MAX_ORIGINAL_NAME_BYTES {
        return name.to_string();
    }

    let (stem, ext) = match name.rfind('.') {
        Some(i) if i > 0 && name.len() - i <= MAX_EXTENSION_BYTES => name.split_at(i),
        _ => (name, ""),
    };
    let mut end = (MAX_ORIGINAL_NAME_BYTES - ext.len()).min(stem.len());
    while !stem.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}{}", &stem[..end], ext)
}

/// 上传目录内的文件名是否安全（无路径穿越）
pub fn is_safe_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
        && !name.starts_with('.')
}
