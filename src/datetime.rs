use chrono::{DateTime, Local, NaiveDate, Utc};

#[cfg(not(test))]
/// 現在のUTC時間を取得する。
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Localタイムゾーンでの今日の日付を取得する。
///
/// レポート期間の日付が指定されなかった場合の既定値に使う。
pub fn today() -> NaiveDate {
    now().with_timezone(&Local).date_naive()
}


#[cfg(test)]
pub use mock_datetime::now;
