use crate::error::AppError;

pub fn final_price(total_amount: f64, discount_percent: f64) -> f64 {
    total_amount - (total_amount * discount_percent) / 100.0
}

/// Discounts are checked once, when the booking is written. A missing value means no discount.
pub fn validate_discount(discount_percent: Option<f64>) -> Result<f64, AppError> {
    let discount = discount_percent.unwrap_or(0.0);
    if !discount.is_finite() || !(0.0..=100.0).contains(&discount) {
        return Err(AppError::Validation("discountPercent must be between 0 and 100".into()));
    }
    Ok(discount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_final_price() {
        assert_eq!(final_price(200.0, 25.0), 150.0);
        assert_eq!(final_price(100.0, 0.0), 100.0);
        assert_eq!(final_price(80.0, 100.0), 0.0);
    }

    #[test]
    fn test_validate_discount() {
        assert_eq!(validate_discount(None).unwrap(), 0.0);
        assert_eq!(validate_discount(Some(12.5)).unwrap(), 12.5);
        assert_eq!(validate_discount(Some(100.0)).unwrap(), 100.0);
        assert!(validate_discount(Some(-0.1)).is_err());
        assert!(validate_discount(Some(100.5)).is_err());
        assert!(validate_discount(Some(f64::INFINITY)).is_err());
    }
}
