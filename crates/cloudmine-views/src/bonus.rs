use chrono::{DateTime, Local, NaiveDate, Utc};
use cloudmine_core::error::CloudmineError;
use cloudmine_core::types::Amount;
use cloudmine_state::{AppContext, BonusRecord};
use tracing::{debug, warn};

/// Today's date on the local calendar, as the bonus gate compares it.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Once-per-calendar-day bonus button.
///
/// The persisted day is read once, at mount; afterwards the view trusts its
/// own copy, which `claim` keeps current.
pub struct DailyBonus {
    ctx: AppContext,
    last: Option<BonusRecord>,
}

impl DailyBonus {
    /// An undecodable slot value counts as no claim; only storage faults
    /// fail the mount.
    pub fn mount(ctx: AppContext) -> Result<Self, CloudmineError> {
        let last = match ctx.slot().get_bonus_record() {
            Ok(last) => last,
            Err(CloudmineError::Serialization(e)) => {
                warn!(error = %e, "unreadable bonus slot ignored");
                None
            }
            Err(e) => return Err(e),
        };
        debug!(last_day = last.as_ref().map(|r| r.day.as_str()), "bonus slot read");
        Ok(Self { ctx, last })
    }

    pub fn is_available(&self, today: NaiveDate) -> bool {
        !self.last.as_ref().is_some_and(|r| r.is_for(today))
    }

    pub fn last_claimed_day(&self) -> Option<&str> {
        self.last.as_ref().map(|r| r.day.as_str())
    }

    /// The amount a claim would credit right now.
    pub fn amount(&self) -> Amount {
        self.ctx.config().daily_bonus
    }

    /// Credit the configured bonus if it has not been claimed on `today`.
    ///
    /// Returns `Ok(None)` for a repeated claim on the same day. The slot is
    /// written before the balance is credited, so a failed write credits
    /// nothing. Flushing to disk is left to shutdown and sled's own
    /// background flusher.
    pub async fn claim(
        &mut self,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Option<Amount>, CloudmineError> {
        if !self.is_available(today) {
            debug!(%today, "daily bonus already claimed");
            return Ok(None);
        }

        let record = BonusRecord::new(today, now.timestamp());
        self.ctx.slot().put_bonus_record(&record)?;
        self.last = Some(record);

        let amount = self.amount();
        self.ctx.store().await.credit_daily_bonus(amount);
        Ok(Some(amount))
    }
}
