use cloudmine_core::constants::{
    FALLBACK_BOT_NAME, REFERRAL_SHARE_TEXT, TELEGRAM_BASE_URL, TELEGRAM_SHARE_URL,
};
use cloudmine_core::types::{Amount, UserId};
use cloudmine_core::user::User;
use cloudmine_state::AppContext;

/// `https://t.me/<bot>?start=<user>`. The bot handle loses a leading `@`;
/// an empty handle falls back to a placeholder.
pub fn referral_link(bot_id: &str, user: &UserId) -> String {
    let bot = bot_id.trim().trim_start_matches('@');
    let bot = if bot.is_empty() { FALLBACK_BOT_NAME } else { bot };
    format!("{TELEGRAM_BASE_URL}/{bot}?start={user}")
}

/// Telegram share-sheet URL carrying `link`.
pub fn share_url(link: &str) -> String {
    format!(
        "{TELEGRAM_SHARE_URL}?url={}&text={}",
        encode_component(link),
        encode_component(REFERRAL_SHARE_TEXT)
    )
}

/// Percent-encode everything outside the URI-component unreserved set.
fn encode_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len() * 3);
    for b in s.bytes() {
        match b {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'.'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(b as char),
            _ => out.push_str(&format!("%{b:02X}")),
        }
    }
    out
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferralRow {
    pub user_id: UserId,
    pub mining_rate: Amount,
    pub earnings: Amount,
}

/// Display figures, recomputed from the current referral balances and the
/// current percentage on every call. May differ from the user's accumulated
/// `referral_earnings`, which was fixed at the moment each referral joined.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferralSummary {
    pub count: usize,
    pub profit_percent: u16,
    pub total_earnings: Amount,
    pub rows: Vec<ReferralRow>,
}

impl ReferralSummary {
    pub fn compute(referrals: &[User], profit_percent: u16) -> Self {
        let rows: Vec<ReferralRow> = referrals
            .iter()
            .map(|r| ReferralRow {
                user_id: r.id.clone(),
                mining_rate: r.mining_rate,
                earnings: r.balance.percent(profit_percent),
            })
            .collect();
        Self {
            count: rows.len(),
            profit_percent,
            total_earnings: rows.iter().map(|r| r.earnings).sum(),
            rows,
        }
    }
}

pub struct ReferralView {
    ctx: AppContext,
}

impl ReferralView {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    pub async fn link(&self) -> String {
        let store = self.ctx.store().await;
        referral_link(&store.config().telegram_bot_id, &store.current_user().id)
    }

    pub async fn share_url(&self) -> String {
        share_url(&self.link().await)
    }

    pub async fn summary(&self) -> ReferralSummary {
        let store = self.ctx.store().await;
        ReferralSummary::compute(store.referrals(), store.config().referral_profit)
    }

    /// Register a referred user; returns the amount credited now.
    pub async fn refer(&self, referred: User) -> Amount {
        self.ctx.store().await.add_referral(referred)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudmine_core::config::ConfigPatch;
    use cloudmine_state::{SlotDb, Store};

    fn ctx() -> AppContext {
        AppContext::new(Store::default(), SlotDb::temporary().unwrap())
    }

    fn friend(id: &str, balance: &str) -> User {
        let mut u = User::new(UserId::new(id));
        u.balance = balance.parse().unwrap();
        u
    }

    #[test]
    fn link_embeds_user_id() {
        let me = UserId::new("42");
        assert_eq!(referral_link("", &me), "https://t.me/YourBotName?start=42");
        assert_eq!(referral_link("@MinerBot", &me), "https://t.me/MinerBot?start=42");
    }

    #[test]
    fn share_url_is_percent_encoded() {
        let url = share_url("https://t.me/Bot?start=1");
        assert_eq!(
            url,
            "https://t.me/share/url?url=https%3A%2F%2Ft.me%2FBot%3Fstart%3D1\
             &text=Join%20me%20in%20Cloud%20Mining!"
        );
    }

    #[tokio::test]
    async fn summary_recomputes_from_current_percentage() {
        let ctx = ctx();
        let view = ReferralView::new(ctx.clone());
        view.refer(friend("2", "1")).await;
        view.refer(friend("3", "2")).await;

        let summary = view.summary().await;
        assert_eq!(summary.count, 2);
        assert_eq!(summary.total_earnings, "0.3".parse::<Amount>().unwrap());

        ctx.update_config(&ConfigPatch {
            referral_profit: Some(50),
            ..Default::default()
        })
        .await;
        let summary = view.summary().await;
        assert_eq!(summary.total_earnings, "1.5".parse::<Amount>().unwrap());

        // The accumulated counter keeps what was credited at join time.
        let me = ctx.store().await.current_user().clone();
        assert_eq!(me.referral_earnings, "0.3".parse::<Amount>().unwrap());
        assert_eq!(me.referral_count, 2);
    }

    #[tokio::test]
    async fn link_follows_configured_bot() {
        let ctx = ctx();
        let view = ReferralView::new(ctx.clone());
        ctx.update_config(&ConfigPatch {
            telegram_bot_id: Some("@CloudMineBot".into()),
            ..Default::default()
        })
        .await;
        assert_eq!(view.link().await, "https://t.me/CloudMineBot?start=1");
    }
}
