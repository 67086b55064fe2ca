//! 成就条件比较变体定义
//!
//! 操作符建模为封闭的带标签变体，每个构造器携带类型正确的操作数。
//! 未知操作符和类型不符的操作数在反序列化阶段即被拒绝，
//! 而不是在评估阶段被静默跳过。

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// 条件比较
///
/// 数值比较（gt/gte/lt/lte）的目标值必须是数值；
/// between 携带 [min, max] 闭区间；in 携带候选列表；
/// eq/ne 可比较任意字面量。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operator", content = "value", rename_all = "snake_case")]
pub enum Comparison {
    Eq(Value),
    Ne(Value),
    Gt(f64),
    Gte(f64),
    Lt(f64),
    Lte(f64),
    In(Vec<Value>),
    Between([f64; 2]),
}

impl Comparison {
    /// 操作符名称（用于日志和错误信息）
    pub fn operator_name(&self) -> &'static str {
        match self {
            Self::Eq(_) => "eq",
            Self::Ne(_) => "ne",
            Self::Gt(_) => "gt",
            Self::Gte(_) => "gte",
            Self::Lt(_) => "lt",
            Self::Lte(_) => "lte",
            Self::In(_) => "in",
            Self::Between(_) => "between",
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.operator_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_comparison_deserialization() {
        let gte: Comparison = serde_json::from_value(json!({
            "operator": "gte",
            "value": 10
        }))
        .unwrap();
        assert_eq!(gte, Comparison::Gte(10.0));

        let between: Comparison = serde_json::from_value(json!({
            "operator": "between",
            "value": [1, 5]
        }))
        .unwrap();
        assert_eq!(between, Comparison::Between([1.0, 5.0]));

        let in_list: Comparison = serde_json::from_value(json!({
            "operator": "in",
            "value": ["math", "science"]
        }))
        .unwrap();
        assert_eq!(in_list, Comparison::In(vec![json!("math"), json!("science")]));
    }

    #[test]
    fn test_unknown_operator_rejected() {
        let result: std::result::Result<Comparison, _> = serde_json::from_value(json!({
            "operator": "regex",
            "value": ".*"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_mistyped_operand_rejected() {
        // gt 要求数值目标，字符串应在加载期报错
        let result: std::result::Result<Comparison, _> = serde_json::from_value(json!({
            "operator": "gt",
            "value": "ten"
        }));
        assert!(result.is_err());

        // between 要求恰好两个端点
        let result: std::result::Result<Comparison, _> = serde_json::from_value(json!({
            "operator": "between",
            "value": [1, 2, 3]
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_operator_name_display() {
        assert_eq!(Comparison::Gte(1.0).to_string(), "gte");
        assert_eq!(Comparison::Between([0.0, 1.0]).to_string(), "between");
        assert_eq!(Comparison::Eq(json!(1)).to_string(), "eq");
    }

    #[test]
    fn test_comparison_serialization_roundtrip() {
        let original = Comparison::Between([3.0, 7.0]);
        let json = serde_json::to_value(&original).unwrap();
        assert_eq!(json["operator"], "between");

        let parsed: Comparison = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, original);
    }
}
