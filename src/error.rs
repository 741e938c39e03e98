use thiserror::Error;

/// 集計処理で発生するエラー。
#[derive(Debug, Error)]
pub enum ReportError {
    /// `start`/`end`がタイムゾーン付きの日時として解釈できない。
    #[error("Malformed instant in `{field}`: {value:?}")]
    MalformedInstant {
        field: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}
