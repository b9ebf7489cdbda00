use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::PriceRecord;
use crate::store::{MinutePriceSession, MinutePriceSource};

const QUERY_DATE_FORMAT: &str = "%Y%m%d";

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("종목코드가 비어 있습니다.")]
    EmptyStockCode,
    #[error("조회일자 형식이 올바르지 않습니다 (YYYYMMDD): {0}")]
    InvalidQueryDate(String),
    #[error("종목 데이터가 없습니다.")]
    NoData,
    #[error(transparent)]
    Store(#[from] sqlx::Error),
}

// 빈 문자열은 생략된 것으로 본다
pub fn parse_query_date(raw: Option<&str>) -> Result<Option<NaiveDate>, ResolveError> {
    let raw = match raw.map(str::trim) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return Ok(None),
    };

    // chrono는 자릿수가 모자라도 받아들이므로 길이를 먼저 확인
    if raw.len() != 8 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ResolveError::InvalidQueryDate(raw.to_string()));
    }

    NaiveDate::parse_from_str(raw, QUERY_DATE_FORMAT)
        .map(Some)
        .map_err(|_| ResolveError::InvalidQueryDate(raw.to_string()))
}

// 조회일자가 없으면 가장 최근 거래일로 조회한다. 연결은 모든 경로에서 닫는다
#[tracing::instrument(level = "debug", skip(source))]
pub async fn resolve(
    source: &dyn MinutePriceSource,
    stock_code: &str,
    query_date: Option<&str>,
) -> Result<Vec<PriceRecord>, ResolveError> {
    debug!(stock_code, ?query_date, "resolving minute prices");
    let stock_code = stock_code.trim();
    if stock_code.is_empty() {
        return Err(ResolveError::EmptyStockCode);
    }
    let query_date = parse_query_date(query_date)?;

    let mut session = source.open().await.map_err(|error| {
        warn!(%error, "failed to open store connection");
        error
    })?;

    let result = fetch(session.as_mut(), stock_code, query_date).await;

    if let Err(error) = session.close().await {
        warn!(%error, "failed to close store connection");
    }

    if let Err(ResolveError::Store(error)) = &result {
        warn!(%error, stock_code, "minute price query failed");
    }

    result
}

async fn fetch(
    session: &mut dyn MinutePriceSession,
    stock_code: &str,
    query_date: Option<NaiveDate>,
) -> Result<Vec<PriceRecord>, ResolveError> {
    let date = match query_date {
        Some(date) => date,
        None => session
            .latest_trade_date(stock_code)
            .await?
            .ok_or(ResolveError::NoData)?,
    };
    debug!(%date, "resolved query date");

    let records = session.minute_prices(stock_code, date).await?;
    debug!(count = records.len(), "fetched minute prices");

    Ok(records)
}
