//! Cart snapshot: the locked cart plus the games selected for purchase

use shared::models::Cart;
use sqlx::PgConnection;

use super::CheckoutError;
use crate::db::carts;

/// Locked cart and the app ids being purchased
#[derive(Debug, Clone)]
pub struct CartSnapshot {
    pub cart: Cart,
    /// Selected games, de-duplicated, in request (or cart) order
    pub app_ids: Vec<i64>,
}

/// Decide which cart games a checkout purchases.
///
/// - `None`: the whole cart, which must not be empty.
/// - `Some(ids)`: exactly those games. An empty list is rejected, and every
///   id must be in the cart; partial matches are rejected rather than
///   silently dropped.
pub fn resolve_selection(
    cart_app_ids: &[i64],
    selection: Option<&[i64]>,
) -> Result<Vec<i64>, CheckoutError> {
    let Some(selection) = selection else {
        if cart_app_ids.is_empty() {
            return Err(CheckoutError::CartEmpty);
        }
        return Ok(cart_app_ids.to_vec());
    };

    if selection.is_empty() {
        return Err(CheckoutError::SelectionEmpty);
    }

    let mut selected: Vec<i64> = Vec::with_capacity(selection.len());
    for id in selection {
        if !selected.contains(id) {
            selected.push(*id);
        }
    }

    let missing: Vec<i64> = selected
        .iter()
        .copied()
        .filter(|id| !cart_app_ids.contains(id))
        .collect();
    if !missing.is_empty() {
        return Err(CheckoutError::SelectionInvalid { missing });
    }

    Ok(selected)
}

/// Lock the user's cart and resolve the selection against its items.
///
/// Must run inside the checkout transaction; the row lock serializes
/// concurrent checkouts and cart mutations of the same user.
pub async fn load(
    conn: &mut PgConnection,
    user_id: i64,
    selection: Option<&[i64]>,
) -> Result<CartSnapshot, CheckoutError> {
    let cart = carts::lock_by_user(&mut *conn, user_id)
        .await?
        .ok_or(CheckoutError::CartNotFound)?;

    let cart_app_ids = carts::list_app_ids(&mut *conn, cart.id).await?;
    let app_ids = resolve_selection(&cart_app_ids, selection)?;

    Ok(CartSnapshot { cart, app_ids })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_cart() {
        assert_eq!(resolve_selection(&[1, 2], None).unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_whole_cart_empty() {
        assert!(matches!(
            resolve_selection(&[], None),
            Err(CheckoutError::CartEmpty)
        ));
    }

    #[test]
    fn test_subset_selection() {
        assert_eq!(resolve_selection(&[1, 2, 3], Some(&[3, 1][..])).unwrap(), vec![3, 1]);
    }

    #[test]
    fn test_duplicate_ids_collapsed() {
        assert_eq!(resolve_selection(&[1, 2], Some(&[2, 2, 1][..])).unwrap(), vec![2, 1]);
    }

    #[test]
    fn test_explicit_empty_selection() {
        assert!(matches!(
            resolve_selection(&[1, 2], Some(&[][..])),
            Err(CheckoutError::SelectionEmpty)
        ));
    }

    #[test]
    fn test_selection_not_in_cart() {
        match resolve_selection(&[1, 2], Some(&[99][..])) {
            Err(CheckoutError::SelectionInvalid { missing }) => assert_eq!(missing, vec![99]),
            other => panic!("expected SelectionInvalid, got {other:?}"),
        }
    }

    #[test]
    fn test_partial_match_rejected() {
        match resolve_selection(&[1, 2], Some(&[1, 99, 100][..])) {
            Err(CheckoutError::SelectionInvalid { missing }) => assert_eq!(missing, vec![99, 100]),
            other => panic!("expected SelectionInvalid, got {other:?}"),
        }
    }

    #[test]
    fn test_selection_against_empty_cart() {
        assert!(matches!(
            resolve_selection(&[], Some(&[1][..])),
            Err(CheckoutError::SelectionInvalid { .. })
        ));
    }
}
