// ==========================================
// 葡萄酒贸易数据分析 - 数值转换
// ==========================================
// 约定: 千分位为 '.'，小数点为 ','（巴西葡萄牙语格式）
// 红线: 单元格转换失败只产生缺失值，不中断批处理
// ==========================================

/// 将本地化数字文本转换为 f64
///
/// 去除所有 '.'，把 ',' 换成 '.'，再按浮点数解析。
/// 无法解析或结果非有限值时返回 None，由调用方决定缺失值策略。
pub fn to_number(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().replace('.', "").replace(',', ".");
    if cleaned.is_empty() {
        return None;
    }

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// 缺失值按 0 处理（聚合口径）
pub fn to_number_or_zero(raw: &str) -> f64 {
    to_number(raw).unwrap_or(0.0)
}
