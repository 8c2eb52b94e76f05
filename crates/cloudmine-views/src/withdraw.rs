use chrono::Utc;
use cloudmine_core::error::CloudmineError;
use cloudmine_core::types::{Amount, WithdrawalId};
use cloudmine_core::withdrawal::Withdrawal;
use cloudmine_state::AppContext;
use tracing::debug;

/// Check a payout request, in order: address present, amount numeric,
/// amount ≥ `min`, amount ≤ `balance`. Returns the parsed amount.
pub fn validate(
    address: &str,
    amount_text: &str,
    min: Amount,
    balance: Amount,
) -> Result<Amount, CloudmineError> {
    if address.trim().is_empty() {
        return Err(CloudmineError::MissingAddress);
    }
    let amount: Amount = amount_text
        .parse()
        .map_err(|_| CloudmineError::InvalidAmount)?;
    if amount < min {
        return Err(CloudmineError::BelowMinimum { min });
    }
    if amount > balance {
        return Err(CloudmineError::InsufficientBalance {
            requested: amount,
            available: balance,
        });
    }
    Ok(amount)
}

/// The withdrawal screen: a form plus the request history.
pub struct WithdrawForm {
    ctx: AppContext,
}

impl WithdrawForm {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    /// Validate against the live minimum and balance, then append a pending
    /// request. Nothing guards against resubmitting the same form.
    pub async fn submit(
        &self,
        address: &str,
        amount_text: &str,
    ) -> Result<WithdrawalId, CloudmineError> {
        let mut store = self.ctx.store().await;
        let min = store.config().min_withdrawal;
        let amount = match validate(address, amount_text, min, store.balance()) {
            Ok(amount) => amount,
            Err(e) => {
                debug!(error = %e, "withdrawal rejected");
                return Err(e);
            }
        };
        Ok(store.create_withdrawal(address.to_string(), amount, Utc::now()))
    }

    /// Requests made by the current user, oldest first.
    pub async fn history(&self) -> Vec<Withdrawal> {
        let store = self.ctx.store().await;
        let me = &store.current_user().id;
        store
            .withdrawals()
            .iter()
            .filter(|w| &w.user_id == me)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudmine_core::types::UserId;
    use cloudmine_core::withdrawal::WithdrawalStatus;
    use cloudmine_state::{SlotDb, Store};

    const MIN: Amount = Amount::from_units(10_000);

    async fn funded(units: u128) -> (AppContext, WithdrawForm) {
        let ctx = AppContext::new(Store::default(), SlotDb::temporary().unwrap());
        ctx.store()
            .await
            .add_user_balance(&UserId::new("1"), Amount::from_units(units));
        let form = WithdrawForm::new(ctx.clone());
        (ctx, form)
    }

    #[test]
    fn validation_order() {
        let bal = Amount::from_units(50_000);
        assert!(matches!(validate("  ", "abc", MIN, bal), Err(CloudmineError::MissingAddress)));
        assert!(matches!(validate("a", "abc", MIN, bal), Err(CloudmineError::InvalidAmount)));
        assert!(matches!(validate("a", "", MIN, bal), Err(CloudmineError::InvalidAmount)));
        assert!(matches!(
            validate("a", "0.00009999", MIN, bal),
            Err(CloudmineError::BelowMinimum { min }) if min == MIN
        ));
        assert!(matches!(
            validate("a", "0.0006", MIN, bal),
            Err(CloudmineError::InsufficientBalance { .. })
        ));
        assert_eq!(validate("a", "0.0005", MIN, bal).unwrap(), bal);
    }

    #[test]
    fn minimum_message_names_the_minimum() {
        let err = validate("a", "0.00000001", MIN, Amount::ZERO).unwrap_err();
        assert_eq!(err.to_string(), "minimum withdrawal is 0.00010000");
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn exact_minimum_succeeds() {
        let (ctx, form) = funded(10_000).await;
        let id = form.submit("bc1qaddress", "0.0001").await.unwrap();

        let history = form.history().await;
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].id, id);
        assert_eq!(history[0].status, WithdrawalStatus::Pending);
        assert_eq!(history[0].amount, MIN);
        // Requests do not debit the balance.
        assert_eq!(ctx.store().await.balance(), MIN);
    }

    #[tokio::test]
    async fn one_unit_below_minimum_fails() {
        let (_ctx, form) = funded(10_000).await;
        let err = form.submit("bc1qaddress", "0.00009999").await.unwrap_err();
        assert!(matches!(err, CloudmineError::BelowMinimum { .. }));
        assert!(form.history().await.is_empty());
    }

    #[tokio::test]
    async fn above_balance_fails() {
        let (_ctx, form) = funded(10_000).await;
        let err = form.submit("bc1qaddress", "0.00010001").await.unwrap_err();
        assert!(matches!(err, CloudmineError::InsufficientBalance { .. }));
    }

    #[tokio::test]
    async fn resubmission_duplicates_the_record() {
        let (_ctx, form) = funded(10_000).await;
        form.submit("addr", "0.0001").await.unwrap();
        form.submit("addr", "0.0001").await.unwrap();
        assert_eq!(form.history().await.len(), 2);
    }
}
