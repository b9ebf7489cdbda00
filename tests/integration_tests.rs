use anyhow::Result;
use serde_json::{json, Value};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::time::{timeout, Duration};

const CALCULATOR: &str = env!("CARGO_BIN_EXE_calculator-mcp");
const STOCK_SERVER: &str = env!("CARGO_BIN_EXE_stock-minute-mcp");

struct Server {
    child: Child,
    writer: ChildStdin,
    reader: BufReader<ChildStdout>,
}

impl Server {
    fn spawn(command: &mut Command) -> Result<Self> {
        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        let writer = child.stdin.take().unwrap();
        let reader = BufReader::new(child.stdout.take().unwrap());
        Ok(Self {
            child,
            writer,
            reader,
        })
    }

    fn calculator() -> Result<Self> {
        Self::spawn(&mut Command::new(CALCULATOR))
    }

    // 아무도 듣지 않는 포트로 접속시킨다
    fn stock() -> Result<Self> {
        Self::spawn(
            Command::new(STOCK_SERVER)
                .env("MARIA115_HOST", "127.0.0.1")
                .env("MARIA115_PORT", "1")
                .env("MARIA115_USER", "reader")
                .env("MARIA115_PASSWORD", "secret")
                .env("MARIA115_DB", "stock"),
        )
    }

    async fn send(&mut self, message: Value) -> Result<()> {
        self.writer
            .write_all(format!("{}\n", message).as_bytes())
            .await?;
        self.writer.flush().await?;
        Ok(())
    }

    async fn receive(&mut self) -> Result<Value> {
        let mut line = String::new();
        match timeout(Duration::from_secs(10), self.reader.read_line(&mut line)).await {
            Ok(read) => {
                read?;
                Ok(serde_json::from_str(&line)?)
            }
            Err(_) => panic!("timed out waiting for a server response"),
        }
    }

    async fn initialize(&mut self) -> Result<Value> {
        self.send(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": {
                "protocolVersion": "2024-11-05",
                "capabilities": {"tools": {}},
                "clientInfo": {"name": "test-client", "version": "1.0.0"}
            }
        }))
        .await?;
        let response = self.receive().await?;

        self.send(json!({
            "jsonrpc": "2.0",
            "method": "notifications/initialized"
        }))
        .await?;

        Ok(response)
    }

    async fn call_tool(&mut self, id: u64, name: &str, arguments: Value) -> Result<Value> {
        self.send(json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": "tools/call",
            "params": { "name": name, "arguments": arguments }
        }))
        .await?;

        let response = self.receive().await?;
        assert_eq!(response["jsonrpc"], "2.0");
        assert_eq!(response["id"], id);
        Ok(response["result"].clone())
    }

    async fn shutdown(mut self) -> Result<()> {
        self.child.kill().await?;
        Ok(())
    }
}

fn text(result: &Value) -> &str {
    result["content"][0]["text"].as_str().unwrap()
}

#[tokio::test]
async fn test_calculator_initialization() -> Result<()> {
    let mut server = Server::calculator()?;

    let response = server.initialize().await?;

    assert_eq!(response["jsonrpc"], "2.0");
    assert_eq!(response["id"], 1);
    let result = &response["result"];
    assert_eq!(result["protocolVersion"], "2024-11-05");
    assert_eq!(result["serverInfo"]["name"], "Calculator Server");
    assert_eq!(result["serverInfo"]["version"], env!("CARGO_PKG_VERSION"));

    server.shutdown().await
}

#[tokio::test]
async fn test_calculator_tools_list() -> Result<()> {
    let mut server = Server::calculator()?;
    server.initialize().await?;

    server
        .send(json!({ "jsonrpc": "2.0", "id": 2, "method": "tools/list" }))
        .await?;
    let response = server.receive().await?;

    let mut names: Vec<_> = response["result"]["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|tool| tool["name"].as_str().unwrap().to_string())
        .collect();
    names.sort();
    assert_eq!(names, ["add", "divide", "multiply"]);

    server.shutdown().await
}

#[tokio::test]
async fn test_calculator_tools_call() -> Result<()> {
    let mut server = Server::calculator()?;
    server.initialize().await?;

    let result = server.call_tool(3, "add", json!({ "a": 2, "b": 40 })).await?;
    assert_eq!(text(&result), "42");

    let result = server
        .call_tool(4, "multiply", json!({ "a": -3, "b": 7 }))
        .await?;
    assert_eq!(text(&result), "-21");

    let result = server.call_tool(5, "divide", json!({ "a": 7, "b": 2 })).await?;
    assert_eq!(text(&result), "3.5");

    let result = server.call_tool(6, "divide", json!({ "a": 1, "b": 0 })).await?;
    assert_eq!(result["isError"], true);
    assert_eq!(text(&result), "Cannot divide by zero");

    server.shutdown().await
}

#[tokio::test]
async fn test_stock_server_tools_list() -> Result<()> {
    let mut server = Server::stock()?;

    let response = server.initialize().await?;
    assert_eq!(
        response["result"]["serverInfo"]["name"],
        "Stock Minute Price Server"
    );

    server
        .send(json!({ "jsonrpc": "2.0", "id": 2, "method": "tools/list" }))
        .await?;
    let response = server.receive().await?;

    let tools = response["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0]["name"], "get_stock_minute_price");
    let properties = &tools[0]["inputSchema"]["properties"];
    assert!(properties["stock_code"].is_object());
    assert!(properties["query_date"].is_object());

    server.shutdown().await
}

#[tokio::test]
async fn test_stock_server_reports_store_fault_in_band() -> Result<()> {
    let mut server = Server::stock()?;
    server.initialize().await?;

    let result = server
        .call_tool(
            3,
            "get_stock_minute_price",
            json!({ "stock_code": "005930", "query_date": "20250401" }),
        )
        .await?;

    let payload: Value = serde_json::from_str(text(&result))?;
    let entries = payload.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert!(entries[0]["error"].is_string());

    server.shutdown().await
}

#[tokio::test]
async fn test_stock_server_rejects_malformed_date() -> Result<()> {
    let mut server = Server::stock()?;
    server.initialize().await?;

    let result = server
        .call_tool(
            3,
            "get_stock_minute_price",
            json!({ "stock_code": "005930", "query_date": "2025-04-01" }),
        )
        .await?;

    let payload: Value = serde_json::from_str(text(&result))?;
    assert!(payload[0]["error"].as_str().unwrap().contains("YYYYMMDD"));

    server.shutdown().await
}

#[tokio::test]
async fn test_stock_server_requires_configuration() -> Result<()> {
    let output = Command::new(STOCK_SERVER)
        .env_remove("MARIA115_HOST")
        .env("MARIA115_USER", "reader")
        .env("MARIA115_DB", "stock")
        .stdin(Stdio::null())
        .output()
        .await?;

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("MARIA115_HOST"));
    Ok(())
}
