use anyhow::{Context, Result};
use chrono::Local;
use fern::colors::{Color, ColoredLevelConfig};
use log::LevelFilter;

/// ロガーを初期化する。
///
/// このクレートのログは`debug`が真の場合はDebug以上、そうでなければInfo以上を出力する。
/// 他のクレートのログはWarn以上のみ出力する。
/// 標準出力はレポートに使うため、ログは標準エラー出力に出す。
pub fn init(debug: bool) -> Result<()> {
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::BrightBlack);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{} {}] {}",
                Local::now().format("%H:%M:%S"),
                colors.color(record.level()),
                message
            ))
        })
        .level(LevelFilter::Warn)
        .level_for(env!("CARGO_CRATE_NAME"), level_filter(debug))
        .chain(std::io::stderr())
        .apply()
        .context("Failed to initialize logger")?;

    Ok(())
}

/// このクレートのログレベルを返す。
fn level_filter(debug: bool) -> LevelFilter {
    if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

#[cfg(test)]
mod tests {
    use log::LevelFilter;
    use rstest::rstest;

    use super::level_filter;

    #[rstest]
    #[case::debug(true, LevelFilter::Debug)]
    #[case::default(false, LevelFilter::Info)]
    fn test_level_filter(#[case] debug: bool, #[case] expected: LevelFilter) {
        assert_eq!(level_filter(debug), expected);
    }
}
