//! 货币值对象

use serde::{Deserialize, Serialize};

/// 货币代码
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Currency(pub String);

impl Currency {
    pub fn new(code: &str) -> Self {
        Self(code.to_uppercase())
    }

    pub fn krw() -> Self {
        Self("KRW".to_string())
    }
}

impl Default for Currency {
    fn default() -> Self {
        Self::krw()
    }
}

/// 金额值对象
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// 金额（以最小单位存储，KRW 即为元）
    pub amount: i64,
    /// 货币代码
    #[serde(default)]
    pub currency: Currency,
}

impl Money {
    pub fn new(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    pub fn krw(amount: i64) -> Self {
        Self::new(amount, Currency::krw())
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    pub fn is_positive(&self) -> bool {
        self.amount > 0
    }

    pub fn is_negative(&self) -> bool {
        self.amount < 0
    }
}
