//! 租金估算
//!
//! `estimatedPrice = pricePerDay × 含首尾的租期天数`

use crate::date::{RentalDate, inclusive_days};
use crate::{Car, ValidationError};

/// 按日租金和租期估算总价
pub fn estimate_price(
    price_per_day: i64,
    start: RentalDate,
    end: RentalDate,
) -> Result<i64, ValidationError> {
    let days = inclusive_days(start, end).ok_or(ValidationError::InvalidDateRange)?;
    price_per_day
        .checked_mul(days)
        .ok_or(ValidationError::InvalidNumber {
            field: "estimatedPrice",
        })
}

/// 对指定车辆估算租金
pub fn estimate_for_car(car: &Car, start: RentalDate, end: RentalDate) -> Result<i64, ValidationError> {
    estimate_price(car.price_per_day, start, end)
}

/// 以越南习惯格式化金额（千位用 `.` 分隔），如 `1.500.000`
pub fn format_vnd(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if amount < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}
