//! ログ初期化
//!
//! `CTXLOAD_LOG`（`EnvFilter` 構文）が優先。未設定時は `warn`、`--verbose` 時は `debug`。
//! 出力は stderr（stdout は一覧・JSON 出力用）。

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// フィルタ指定用の環境変数
pub const ENV_LOG: &str = "CTXLOAD_LOG";

/// 環境変数がないときのフィルタ
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "ctxload=debug"
    } else {
        "warn"
    }
}

/// 環境変数とフラグからフィルタを作成
pub fn filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_env(ENV_LOG).unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// グローバルサブスクライバを登録（2 回目以降は何もしない）
pub fn init(verbose: bool) {
    let _ = tracing_subscriber::registry()
        .with(filter(verbose))
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose)
                .compact(),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn default_directive_depends_on_verbosity() {
        assert_eq!(default_directive(false), "warn");
        assert_eq!(default_directive(true), "ctxload=debug");
    }

    #[test]
    #[serial]
    fn env_filter_overrides_default() {
        std::env::set_var(ENV_LOG, "ctxload=trace");
        let filter = filter(false);
        std::env::remove_var(ENV_LOG);

        assert_eq!(filter.to_string(), "ctxload=trace");
    }

    #[test]
    fn init_twice_is_harmless() {
        init(false);
        init(true);
    }
}
