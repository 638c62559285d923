/// PDF 文件头
pub const PDF_MAGIC: &[u8] = b"%PDF";

/// 判断内容开头是否为 PDF 魔术字节
pub fn is_pdf(data: &[u8]) -> bool {
    data.starts_with(PDF_MAGIC)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_magic() {
        assert!(is_pdf(b"%PDF-1.4\n%..."));
        assert!(is_pdf(b"%PDF"));
    }

    #[test]
    fn test_not_pdf() {
        let png_header = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        assert!(!is_pdf(&png_header));
        assert!(!is_pdf(b"%PD"));
        assert!(!is_pdf(b"Hello, World!"));
    }

    #[test]
    fn test_empty_data() {
        assert!(!is_pdf(&[]));
    }
}
