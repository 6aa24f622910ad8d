/// 設定ファイルのパスを上書きする環境変数
pub const CONFIG_PATH_VAR: &str = "MLV_CONFIG";

/// ログフィルタを指定する環境変数
pub const LOG_FILTER_VAR: &str = "MLV_LOG";

/// 環境変数ユーティリティ
pub struct EnvVar;

impl EnvVar {
    /// 環境変数を取得（空文字列はNoneとして扱う）
    pub fn get(key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|s| !s.is_empty())
    }
}
