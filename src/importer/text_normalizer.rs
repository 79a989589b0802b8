// ==========================================
// 葡萄酒贸易数据分析 - 列名规范化
// ==========================================
// 职责: 生成仅用于匹配的列名键（去重音 / 去首尾空白 / 小写）
// 红线: 规范化结果不用于展示，不写入输出
// ==========================================

use unicode_normalization::char::canonical_combining_class;
use unicode_normalization::UnicodeNormalization;

/// 规范化列名: NFKD 分解 → 丢弃组合标记 → trim → 小写
///
/// NFKD 同时折叠兼容字符（如不换行空格），因此 "\u{a0}País " 也能匹配 "pais"。
pub fn normalize(raw: &str) -> String {
    let stripped: String = raw
        .nfkd()
        .filter(|c| canonical_combining_class(*c) == 0)
        .collect();
    stripped.trim().to_lowercase()
}

/// 可选列名的规范化；None 得到空串
pub fn normalize_opt(raw: Option<&str>) -> String {
    raw.map(normalize).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accent_and_case_fold_to_same_key() {
        assert_eq!(normalize("País"), "pais");
        assert_eq!(normalize("pais"), "pais");
        assert_eq!(normalize("PAIS"), "pais");
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(normalize("  Country\t"), "country");
        assert_eq!(normalize("\u{a0}País "), "pais");
    }

    #[test]
    fn test_strips_portuguese_diacritics() {
        assert_eq!(normalize("Comercialização"), "comercializacao");
        assert_eq!(normalize("Exportação Ã"), "exportacao a");
    }

    #[test]
    fn test_none_and_empty_yield_empty() {
        assert_eq!(normalize_opt(None), "");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize_opt(Some("Id")), "id");
    }
}
