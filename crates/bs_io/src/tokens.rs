// crates/bs_io/src/tokens.rs

//! 单元引用记号
//!
//! 边界格式中单元链接序列的文本形式：`Class#Id` 记号以 `;` 连接，
//! 例如 `"SU#3;RE#1"`。空字符串表示空序列。

use bs_core::UnitRef;
use bs_foundation::BsResult;

/// 解析记号串为单元引用序列
///
/// # 错误
///
/// 未知单元类或无效标识返回 [`bs_foundation::BsError::InvalidInput`]。
pub fn parse_unit_refs(text: &str) -> BsResult<Vec<UnitRef>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    trimmed
        .split(';')
        .map(|token| token.trim().parse())
        .collect()
}

/// 序列化单元引用序列为记号串
#[must_use]
pub fn format_unit_refs(refs: &[UnitRef]) -> String {
    refs.iter()
        .map(UnitRef::to_string)
        .collect::<Vec<_>>()
        .join(";")
}

#[cfg(test)]
mod tests {
    use super::*;
    use bs_core::UnitClass;

    #[test]
    fn test_empty_string_is_empty_list() {
        assert!(parse_unit_refs("").unwrap().is_empty());
        assert!(parse_unit_refs("  ").unwrap().is_empty());
    }

    #[test]
    fn test_split_one_two_three() {
        assert_eq!(parse_unit_refs("RS#99").unwrap().len(), 1);
        assert_eq!(parse_unit_refs("RS#99;SU#101").unwrap().len(), 2);
        assert_eq!(parse_unit_refs("RS#99;SU#101;RE#13").unwrap().len(), 3);
    }

    #[test]
    fn test_parse_values() {
        let refs = parse_unit_refs("GU#1;RS#5").unwrap();
        assert_eq!(refs[0], UnitRef::new(UnitClass::Gu, 1));
        assert_eq!(refs[1], UnitRef::new(UnitClass::Rs, 5));
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        assert!(parse_unit_refs("TU#99").is_err());
        assert!(parse_unit_refs("RS99").is_err());
        assert!(parse_unit_refs("RS#x").is_err());
    }

    #[test]
    fn test_format_roundtrip() {
        let refs = vec![
            UnitRef::new(UnitClass::Su, 3),
            UnitRef::new(UnitClass::Re, 1),
        ];
        let text = format_unit_refs(&refs);
        assert_eq!(text, "SU#3;RE#1");
        assert_eq!(parse_unit_refs(&text).unwrap(), refs);
        assert_eq!(format_unit_refs(&[]), "");
    }
}
