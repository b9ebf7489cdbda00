use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize, Serializer};

use crate::resolver::ResolveError;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// 직렬화 시 minute_stock_price 컬럼명을 그대로 쓴다
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceRecord {
    pub stock_code: String,
    #[serde(rename = "trans_dtm", serialize_with = "serialize_timestamp")]
    pub timestamp: NaiveDateTime,
    #[serde(rename = "trans_price")]
    pub price: Decimal,
    #[serde(rename = "minute_volume")]
    pub volume: i64,
}

fn serialize_timestamp<S>(timestamp: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(&timestamp.format(TIMESTAMP_FORMAT))
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct MinutePriceRequest {
    #[schemars(description = "종목코드 (예: '005930' 삼성전자)")]
    pub stock_code: String,
    #[schemars(
        description = "조회일자 (YYYYMMDD 형식). 생략하면 해당 종목의 가장 최근 거래일로 조회합니다."
    )]
    #[serde(default)]
    pub query_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResult {
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MinutePriceResponse {
    Records(Vec<PriceRecord>),
    Error([ErrorResult; 1]),
}

impl MinutePriceResponse {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error([ErrorResult {
            error: message.into(),
        }])
    }
}

impl From<Result<Vec<PriceRecord>, ResolveError>> for MinutePriceResponse {
    fn from(result: Result<Vec<PriceRecord>, ResolveError>) -> Self {
        match result {
            Ok(records) => Self::Records(records),
            Err(error) => Self::error(error.to_string()),
        }
    }
}
