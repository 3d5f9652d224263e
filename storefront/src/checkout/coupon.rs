//! Coupon validation

use shared::models::Coupon;
use sqlx::PgConnection;

use super::CheckoutError;
use crate::db::coupons;

/// Trim and upper-case a raw code. Blank or absent codes mean "no coupon".
pub fn normalize_code(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|code| !code.is_empty())
        .map(str::to_uppercase)
}

/// Resolve a normalized code to a coupon the user has not redeemed yet.
///
/// The usage check here only fails fast; the `(user_id, coupon_id)` unique
/// constraint hit by the later insert is what actually enforces single use.
pub async fn validate(
    conn: &mut PgConnection,
    user_id: i64,
    code: &str,
) -> Result<Coupon, CheckoutError> {
    let coupon = coupons::find_by_code(&mut *conn, code)
        .await?
        .ok_or_else(|| CheckoutError::InvalidCoupon {
            code: code.to_string(),
        })?;

    if coupons::has_usage(&mut *conn, user_id, coupon.id).await? {
        return Err(CheckoutError::CouponAlreadyUsed {
            code: coupon.code,
        });
    }

    Ok(coupon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_code() {
        assert_eq!(normalize_code(Some("  save10 ")), Some("SAVE10".to_string()));
        assert_eq!(normalize_code(Some("Save10")), Some("SAVE10".to_string()));
        assert_eq!(normalize_code(Some("   ")), None);
        assert_eq!(normalize_code(Some("")), None);
        assert_eq!(normalize_code(None), None);
    }
}
