use rmcp::{
    model::{Implementation, InitializeResult, ProtocolVersion, ServerCapabilities},
    tool, ServerHandler,
};
use schemars::JsonSchema;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArithmeticError {
    #[error("Cannot divide by zero")]
    DivisionByZero,
    #[error("Integer overflow")]
    Overflow,
}

pub fn add(a: i64, b: i64) -> Result<i64, ArithmeticError> {
    a.checked_add(b).ok_or(ArithmeticError::Overflow)
}

pub fn multiply(a: i64, b: i64) -> Result<i64, ArithmeticError> {
    a.checked_mul(b).ok_or(ArithmeticError::Overflow)
}

pub fn divide(a: i64, b: i64) -> Result<f64, ArithmeticError> {
    if b == 0 {
        return Err(ArithmeticError::DivisionByZero);
    }
    Ok(a as f64 / b as f64)
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct OperandsRequest {
    #[schemars(description = "the left hand side number")]
    pub a: i64,
    #[schemars(description = "the right hand side number")]
    pub b: i64,
}

#[derive(Debug, Clone)]
pub struct CalculatorService;

#[tool(tool_box)]
impl CalculatorService {
    #[tool(description = "Add two numbers")]
    pub fn add(&self, #[tool(aggr)] request: OperandsRequest) -> Result<String, String> {
        render(add(request.a, request.b))
    }

    #[tool(description = "Multiply two numbers")]
    pub fn multiply(&self, #[tool(aggr)] request: OperandsRequest) -> Result<String, String> {
        render(multiply(request.a, request.b))
    }

    #[tool(description = "Divide two numbers")]
    pub fn divide(&self, #[tool(aggr)] request: OperandsRequest) -> Result<String, String> {
        render(divide(request.a, request.b))
    }
}

fn render<T: ToString>(result: Result<T, ArithmeticError>) -> Result<String, String> {
    result.map(|value| value.to_string()).map_err(|error| {
        tracing::debug!(%error, "arithmetic tool failed");
        error.to_string()
    })
}

#[tool(tool_box)]
impl ServerHandler for CalculatorService {
    fn get_info(&self) -> InitializeResult {
        InitializeResult {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "Calculator Server".into(),
                version: env!("CARGO_PKG_VERSION").into(),
            },
            instructions: Some("A server providing calculator functions".into()),
        }
    }
}
