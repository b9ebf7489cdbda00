use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::{Connection, Row};

use crate::config::DatabaseConfig;
use crate::model::PriceRecord;

#[async_trait]
pub trait MinutePriceSource: Send + Sync {
    async fn open(&self) -> Result<Box<dyn MinutePriceSession>, sqlx::Error>;
}

// 연 쪽에서 반드시 close 한다
#[async_trait]
pub trait MinutePriceSession: Send {
    async fn latest_trade_date(&mut self, stock_code: &str)
        -> Result<Option<NaiveDate>, sqlx::Error>;

    async fn minute_prices(
        &mut self,
        stock_code: &str,
        date: NaiveDate,
    ) -> Result<Vec<PriceRecord>, sqlx::Error>;

    async fn close(self: Box<Self>) -> Result<(), sqlx::Error>;
}

const LATEST_DATE_SQL: &str = r#"
    SELECT DATE(MAX(trans_dtm)) AS last_date
    FROM minute_stock_price
    WHERE stock_code = ?
"#;

// 체결가는 소수 넷째 자리로 반올림된다 (원화 체결가는 정수라 손실 없음)
const MINUTE_PRICES_SQL: &str = r#"
    SELECT stock_code,
           trans_dtm,
           CAST(trans_price AS DECIMAL(20, 4)) AS trans_price,
           CAST(minute_volume AS SIGNED) AS minute_volume
    FROM minute_stock_price
    WHERE stock_code = ? AND DATE(trans_dtm) = ?
    ORDER BY trans_dtm
"#;

// open 할 때마다 새 연결을 맺는다
#[derive(Debug, Clone)]
pub struct MySqlSource {
    options: MySqlConnectOptions,
}

impl MySqlSource {
    pub fn new(config: &DatabaseConfig) -> Self {
        Self {
            options: config.connect_options(),
        }
    }
}

#[async_trait]
impl MinutePriceSource for MySqlSource {
    async fn open(&self) -> Result<Box<dyn MinutePriceSession>, sqlx::Error> {
        let connection = MySqlConnection::connect_with(&self.options).await?;
        Ok(Box::new(MySqlSession { connection }))
    }
}

struct MySqlSession {
    connection: MySqlConnection,
}

#[async_trait]
impl MinutePriceSession for MySqlSession {
    async fn latest_trade_date(
        &mut self,
        stock_code: &str,
    ) -> Result<Option<NaiveDate>, sqlx::Error> {
        let row = sqlx::query(LATEST_DATE_SQL)
            .bind(stock_code)
            .fetch_optional(&mut self.connection)
            .await?;

        match row {
            Some(row) => row.try_get("last_date"),
            None => Ok(None),
        }
    }

    async fn minute_prices(
        &mut self,
        stock_code: &str,
        date: NaiveDate,
    ) -> Result<Vec<PriceRecord>, sqlx::Error> {
        let rows = sqlx::query(MINUTE_PRICES_SQL)
            .bind(stock_code)
            .bind(date)
            .fetch_all(&mut self.connection)
            .await?;

        rows.iter().map(row_to_record).collect()
    }

    async fn close(self: Box<Self>) -> Result<(), sqlx::Error> {
        self.connection.close().await
    }
}

fn row_to_record(row: &MySqlRow) -> Result<PriceRecord, sqlx::Error> {
    Ok(PriceRecord {
        stock_code: row.try_get("stock_code")?,
        timestamp: row.try_get::<NaiveDateTime, _>("trans_dtm")?,
        price: row.try_get::<Decimal, _>("trans_price")?,
        volume: row.try_get("minute_volume")?,
    })
}
