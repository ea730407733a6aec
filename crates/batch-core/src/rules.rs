//! 通用字段校验规则

use common::utils::non_blank;

use crate::ValidationError;

/// 使用标志（`use_yn`）默认值
pub const DEFAULT_USE_YN: i16 = 1;

/// 必填文本：去除首尾空白，空串视为缺失
pub fn required_text(value: Option<String>, field: &str) -> Result<String, ValidationError> {
    optional_text(value).ok_or_else(|| ValidationError::missing(field))
}

/// 可选文本：去除首尾空白，空串视为未填写
pub fn optional_text(value: Option<String>) -> Option<String> {
    non_blank(value.as_deref()).map(str::to_string)
}

/// 必填值
pub fn required<T>(value: Option<T>, field: &str) -> Result<T, ValidationError> {
    value.ok_or_else(|| ValidationError::missing(field))
}

/// 文本长度上限（按字符计）
pub fn max_chars(value: &str, max: usize, field: &str) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::invalid_value(field));
    }
    Ok(())
}

/// 使用标志只允许 0 或 1
pub fn use_yn(value: Option<i16>) -> Result<Option<i16>, ValidationError> {
    match value {
        None | Some(0) | Some(1) => Ok(value),
        Some(_) => Err(ValidationError::invalid_value("use_yn")),
    }
}

/// 仅当值不同时覆盖，返回是否发生变化
pub fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
