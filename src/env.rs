/// 環境変数ユーティリティ
pub struct EnvVar;

impl EnvVar {
    /// 環境変数を取得（空文字列はNoneとして扱う）
    pub fn get(key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|s| !s.is_empty())
    }

    /// 真偽値として取得
    ///
    /// `true`/`1`/`yes` と `false`/`0`/`no`（大文字小文字を区別しない）のみ受け付ける。
    /// それ以外の値は `Err` に元の文字列を入れて返す。
    pub fn get_bool(key: &str) -> Option<Result<bool, String>> {
        Self::get(key).map(|raw| parse_bool(&raw).ok_or(raw))
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
