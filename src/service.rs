use std::sync::Arc;

use rmcp::{
    model::{Implementation, InitializeResult, ProtocolVersion, ServerCapabilities},
    tool, ServerHandler,
};
use serde_json::json;

use crate::model::{MinutePriceRequest, MinutePriceResponse};
use crate::resolver::resolve;
use crate::store::MinutePriceSource;

#[derive(Clone)]
pub struct StockMinutePriceService {
    source: Arc<dyn MinutePriceSource>,
}

impl StockMinutePriceService {
    pub fn new(source: impl MinutePriceSource + 'static) -> Self {
        Self {
            source: Arc::new(source),
        }
    }
}

#[tool(tool_box)]
impl StockMinutePriceService {
    #[tool(
        description = "종목코드와 조회일자를 받아 해당 종목의 시분별 데이터(체결시각, 체결가, 분당 거래량)를 반환합니다. 조회일자가 없으면 가장 최근 거래일로 조회합니다. 오류가 나면 [{\"error\": \"...\"}] 형태로 반환합니다."
    )]
    pub async fn get_stock_minute_price(
        &self,
        #[tool(aggr)] request: MinutePriceRequest,
    ) -> String {
        let result = resolve(
            self.source.as_ref(),
            &request.stock_code,
            request.query_date.as_deref(),
        )
        .await;

        let response = MinutePriceResponse::from(result);
        serde_json::to_string(&response)
            .unwrap_or_else(|error| json!([{ "error": error.to_string() }]).to_string())
    }
}

#[tool(tool_box)]
impl ServerHandler for StockMinutePriceService {
    fn get_info(&self) -> InitializeResult {
        InitializeResult {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "Stock Minute Price Server".into(),
                version: env!("CARGO_PKG_VERSION").into(),
            },
            instructions: Some("네이버 주식 시분별 데이터를 제공하는 서버".into()),
        }
    }
}
