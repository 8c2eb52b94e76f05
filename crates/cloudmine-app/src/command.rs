use std::str::FromStr;

use cloudmine_core::config::ConfigPatch;
use cloudmine_core::task::{TaskKind, TaskPatch};
use cloudmine_core::types::{Amount, TaskId, UserId, WithdrawalId};
use cloudmine_core::withdrawal::WithdrawalStatus;
use cloudmine_views::{AdminTab, NewTask};

/// One line of user input.
#[derive(Debug, Clone)]
pub enum Command {
    Help,
    /// Mining screen: balance, rate, bonus state.
    Balance,
    Bonus,
    Tasks,
    Open(TaskId),
    Complete(TaskId),
    Referrals,
    Refer { user: UserId, balance: Amount },
    /// The raw amount text is kept so the form reports non-numeric input.
    Withdraw { address: String, amount: String },
    History,
    /// A click with no other effect.
    Tap,
    Admin(AdminCommand),
    Quit,
}

#[derive(Debug, Clone)]
pub enum AdminCommand {
    Show(Option<AdminTab>),
    Set(ConfigPatch),
    AddTask(NewTask),
    EditTask(TaskId, TaskPatch),
    RemoveTask(TaskId),
    Status(WithdrawalId, WithdrawalStatus),
    SetBalance(UserId, Amount),
    Credit(UserId, Amount),
    Reset(UserId),
    ToggleBlock(UserId),
    Close,
}

pub const HELP: &str = "\
commands:
  balance                        mining screen
  bonus                          claim the daily bonus
  tasks                          list tasks
  open <task>                    show the task's link
  complete <task>                claim a task reward
  referrals                      referral link and earnings
  refer <user> <balance>         register a referred user
  withdraw <address> <amount>    request a payout
  history                        your withdrawal requests
  tap                            just a tap
  quit";

pub const ADMIN_HELP: &str = "\
admin commands:
  admin [finance|tasks|withdrawals|users]
  admin set <setting> <value>
  admin add-task <kind> <reward> <title> | <description> [| <url-or-@channel>]
  admin edit-task <task> <title|description|kind|reward|url|channel> <value>
  admin remove-task <task>
  admin status <withdrawal> <pending|reviewing|paid>
  admin balance <user> <amount>
  admin credit <user> <amount>
  admin reset <user>
  admin block <user>
  admin close";

fn arg<'a>(parts: &[&'a str], i: usize, what: &str) -> Result<&'a str, String> {
    parts.get(i).copied().ok_or_else(|| format!("missing {what}"))
}

fn amount(s: &str) -> Result<Amount, String> {
    s.parse().map_err(|e| format!("{s}: {e}"))
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some((&head, _)) = parts.split_first() else {
            return Ok(Command::Tap);
        };
        let cmd = match head {
            "help" | "?" => Command::Help,
            "balance" | "mine" => Command::Balance,
            "bonus" => Command::Bonus,
            "tasks" => Command::Tasks,
            "open" => Command::Open(TaskId::new(arg(&parts, 1, "task id")?)),
            "complete" => Command::Complete(TaskId::new(arg(&parts, 1, "task id")?)),
            "referrals" | "link" => Command::Referrals,
            "refer" => Command::Refer {
                user: UserId::new(arg(&parts, 1, "user id")?),
                balance: amount(arg(&parts, 2, "balance")?)?,
            },
            "withdraw" => Command::Withdraw {
                address: parts.get(1).copied().unwrap_or_default().to_string(),
                amount: parts.get(2).copied().unwrap_or_default().to_string(),
            },
            "history" => Command::History,
            "tap" => Command::Tap,
            "admin" => Command::Admin(parse_admin(line, &parts[1..])?),
            "quit" | "exit" => Command::Quit,
            other => return Err(format!("unknown command: {other} (try `help`)")),
        };
        Ok(cmd)
    }
}

fn parse_admin(line: &str, parts: &[&str]) -> Result<AdminCommand, String> {
    let Some((&sub, rest)) = parts.split_first() else {
        return Ok(AdminCommand::Show(None));
    };
    let cmd = match sub {
        "finance" | "tasks" | "withdrawals" | "users" => AdminCommand::Show(Some(sub.parse()?)),
        "set" => {
            let key = arg(rest, 0, "setting")?;
            // Free-text settings keep their inner spaces.
            let value = rest.get(1..).map(|v| v.join(" ")).unwrap_or_default();
            AdminCommand::Set(ConfigPatch::from_field(key, &value).map_err(|e| e.to_string())?)
        }
        "add-task" => AdminCommand::AddTask(parse_new_task(line, rest)?),
        "edit-task" => {
            let id = TaskId::new(arg(rest, 0, "task id")?);
            let field = arg(rest, 1, "task field")?;
            let value = rest.get(2..).map(|v| v.join(" ")).unwrap_or_default();
            AdminCommand::EditTask(id, task_patch(field, &value)?)
        }
        "remove-task" => AdminCommand::RemoveTask(TaskId::new(arg(rest, 0, "task id")?)),
        "status" => AdminCommand::Status(
            arg(rest, 0, "withdrawal id")?
                .parse()
                .map_err(|e| format!("withdrawal id: {e}"))?,
            arg(rest, 1, "status")?.parse()?,
        ),
        "balance" => AdminCommand::SetBalance(
            UserId::new(arg(rest, 0, "user id")?),
            amount(arg(rest, 1, "amount")?)?,
        ),
        "credit" => AdminCommand::Credit(
            UserId::new(arg(rest, 0, "user id")?),
            amount(arg(rest, 1, "amount")?)?,
        ),
        "reset" => AdminCommand::Reset(UserId::new(arg(rest, 0, "user id")?)),
        "block" => AdminCommand::ToggleBlock(UserId::new(arg(rest, 0, "user id")?)),
        "close" => AdminCommand::Close,
        other => return Err(format!("unknown admin command: {other}")),
    };
    Ok(cmd)
}

/// Single-field task edit. Text fields keep their inner spaces.
fn task_patch(field: &str, value: &str) -> Result<TaskPatch, String> {
    if value.is_empty() {
        return Err(format!("missing value for {field}"));
    }
    let mut patch = TaskPatch::default();
    match field {
        "title" => patch.title = Some(value.to_string()),
        "description" => patch.description = Some(value.to_string()),
        "kind" => patch.kind = Some(value.parse()?),
        "reward" => patch.reward = Some(amount(value)?),
        "url" => patch.url = Some(value.to_string()),
        "channel" => patch.channel_id = Some(value.to_string()),
        other => return Err(format!("unknown task field: {other}")),
    }
    Ok(patch)
}

/// `add-task <kind> <reward> <title> | <description> [| <target>]`, where a
/// target starting with `@` is a channel and anything else a URL.
fn parse_new_task(line: &str, rest: &[&str]) -> Result<NewTask, String> {
    let kind: TaskKind = arg(rest, 0, "task kind")?.parse()?;
    let reward_text = arg(rest, 1, "reward")?;
    let reward = amount(reward_text)?;

    let tail = line
        .split_once(reward_text)
        .map(|(_, t)| t)
        .unwrap_or_default();
    let mut fields = tail.split('|').map(str::trim);
    let title = fields.next().unwrap_or_default().to_string();
    let description = fields.next().unwrap_or_default().to_string();
    let (url, channel_id) = match fields.next().filter(|t| !t.is_empty()) {
        Some(t) if t.starts_with('@') => (None, Some(t.to_string())),
        Some(t) => (Some(t.to_string()), None),
        None => (None, None),
    };
    Ok(NewTask {
        title,
        description,
        kind,
        reward,
        url,
        channel_id,
    })
}
