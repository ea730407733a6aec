//! 通用工具函数

/// 去除首尾空白，空串视为缺失
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
