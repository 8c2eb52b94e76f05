use std::time::Duration;

use cloudmine_core::config::AppConfig;
use cloudmine_core::constants::MINING_TICK_MILLIS;
use cloudmine_core::types::Amount;
use cloudmine_state::AppContext;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info};

/// The mining screen. While mounted, exactly one driver task credits the
/// configured rate once per second.
pub struct MiningView {
    ctx: AppContext,
    driver: Option<JoinHandle<()>>,
}

impl MiningView {
    /// Must be called from within a tokio runtime.
    pub fn mount(ctx: AppContext) -> Self {
        let driver = tokio::spawn(drive(ctx.clone(), ctx.subscribe_config()));
        info!(rate = %ctx.config().mining_amount, "mining started");
        Self {
            ctx,
            driver: Some(driver),
        }
    }

    pub async fn balance(&self) -> Amount {
        self.ctx.store().await.balance()
    }

    pub fn rate(&self) -> Amount {
        self.ctx.config().mining_amount
    }

    pub fn is_running(&self) -> bool {
        self.driver.as_ref().is_some_and(|d| !d.is_finished())
    }

    /// Tear down the timer. Dropping the view does the same.
    pub fn unmount(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        if let Some(driver) = self.driver.take() {
            driver.abort();
            info!("mining stopped");
        }
    }
}

impl Drop for MiningView {
    fn drop(&mut self) {
        self.stop();
    }
}

/// First firing one full period after creation.
fn tick_interval() -> Interval {
    let period = Duration::from_millis(MINING_TICK_MILLIS);
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

async fn drive(ctx: AppContext, mut config_rx: watch::Receiver<AppConfig>) {
    let mut rate = config_rx.borrow_and_update().mining_amount;
    let mut ticker = tick_interval();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let balance = ctx.store().await.accrue_mining(rate);
                debug!(%balance, "mining tick");
            }
            changed = config_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let new_rate = config_rx.borrow_and_update().mining_amount;
                // Other config fields do not disturb the timer.
                if new_rate != rate {
                    info!(old = %rate, new = %new_rate, "mining rate changed, timer replaced");
                    rate = new_rate;
                    ticker = tick_interval();
                }
            }
        }
    }
}
