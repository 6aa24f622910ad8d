use crate::watchlist::{IconState, Notice};
use owo_colors::OwoColorize;

/// コマンド結果の1行サマリー
pub struct CommandSummary {
    pub prefix: String,
    pub message: String,
}

impl CommandSummary {
    /// アイコン状態の遷移結果を整形
    pub fn transition(title: &str, before: IconState, after: IconState) -> Self {
        let arrow = format!("{} -> {}", before, after);
        if after == IconState::Error {
            Self {
                prefix: "✗".red().to_string(),
                message: format!("{}: {}", title, arrow.red()),
            }
        } else {
            Self {
                prefix: "✓".green().to_string(),
                message: format!("{}: {}", title, arrow.green()),
            }
        }
    }

    /// 空の一覧
    pub fn empty() -> Self {
        Self {
            prefix: "•".yellow().to_string(),
            message: "No movies in catalog".to_string(),
        }
    }

    pub fn line(&self) -> String {
        format!("{} {}", self.prefix, self.message)
    }
}

/// 通知メッセージを整形
pub fn notice_line(notice: &Notice) -> String {
    match notice {
        Notice::Added { .. } => format!("{} {}", "»".cyan(), notice.message()),
        Notice::Failed => format!("{} {}", "!".red(), notice.message().red()),
    }
}

/// 状態ラベル（一覧表示用の色付き）
pub fn icon_label(state: IconState) -> String {
    match state {
        IconState::Addable => "+ add".to_string(),
        IconState::Added => "✓ added".green().to_string(),
        IconState::Error => "! retry".red().to_string(),
    }
}
