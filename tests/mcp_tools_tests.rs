use axum::{Json, Router, http::StatusCode, routing::post};
use forms_abilities::bridge::Bridge;
use forms_abilities::config::BridgeConfig;
use forms_abilities::mcp::{McpServer, SERVER_NAME};
use rmcp::{
    ServiceExt,
    model::{CallToolRequestParam, ErrorCode},
    service::{RoleClient, RunningService, ServiceError},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

const PRIMARY: &str = "/wp-json/wp-abilities/v1/abilities/{*rest}";

/// Upstream whose capability endpoint always answers `status` with `body`.
async fn upstream(status: StatusCode, body: Value) -> String {
    let app = Router::new().route(
        PRIMARY,
        post(move || {
            let body = body.clone();
            async move { (status, Json(body)) }
        }),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind loopback");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock server");
    });
    format!("http://{addr}")
}

/// MCP client connected to a bridge server over an in-process pipe.
async fn connect(base_url: String) -> RunningService<RoleClient, ()> {
    let (server_io, client_io) = tokio::io::duplex(64 * 1024);
    let server = McpServer::new(Bridge::new(&BridgeConfig::new(base_url)).expect("bridge"));
    tokio::spawn(async move {
        if let Ok(running) = server.serve(server_io).await {
            let _ = running.waiting().await;
        }
    });
    ().serve(client_io).await.expect("client handshake")
}

fn call(name: &str, arguments: Option<Value>) -> CallToolRequestParam {
    CallToolRequestParam {
        name: name.to_string().into(),
        arguments: arguments.and_then(|v| v.as_object().cloned()),
    }
}

#[tokio::test]
async fn handshake_reports_server_and_tools() {
    let client = connect("http://127.0.0.1:9".to_string()).await;

    let info = client.peer_info().expect("server info after initialize");
    assert_eq!(info.server_info.name, SERVER_NAME);
    assert!(info.capabilities.tools.is_some());

    let tools = client.list_all_tools().await.unwrap();
    let names: Vec<&str> = tools.iter().map(|t| t.name.as_ref()).collect();
    assert_eq!(
        names,
        [
            "wcnpl_submit_form",
            "wcnpl_get_submission",
            "wcnpl_count_forms",
            "wcnpl_count_submissions"
        ]
    );
    assert_eq!(
        tools[0].input_schema.get("additionalProperties"),
        Some(&json!(false))
    );
    assert!(
        tools[0]
            .description
            .as_deref()
            .unwrap_or_default()
            .starts_with("Run ability wcnpl-abilities-demo/submit-form (public)")
    );

    client.cancel().await.ok();
}

#[tokio::test]
async fn successful_call_returns_pretty_json_as_single_text_item() {
    let base = upstream(StatusCode::OK, json!({"count": 3, "form_id": 1})).await;
    let client = connect(base).await;

    let result = client
        .call_tool(call("wcnpl_count_submissions", Some(json!({"form_id": 1}))))
        .await
        .unwrap();

    let expected = serde_json::to_string_pretty(&json!({"count": 3, "form_id": 1})).unwrap();
    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["content"], json!([{"type": "text", "text": expected}]));
    assert_ne!(result.is_error, Some(true));

    client.cancel().await.ok();
}

#[tokio::test]
async fn failures_come_back_as_protocol_errors() {
    let base = upstream(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"code": "boom", "message": "Database is on fire"}),
    )
    .await;
    let client = connect(base).await;

    match client.call_tool(call("wcnpl_count_forms", None)).await {
        Err(ServiceError::McpError(e)) => {
            assert_eq!(e.code, ErrorCode::INTERNAL_ERROR);
            assert_eq!(
                e.message,
                "Ability run failed: wcnpl-abilities-demo/count-forms: Database is on fire"
            );
        }
        other => panic!("expected internal error, got {other:?}"),
    }

    match client.call_tool(call("wcnpl_drop_tables", None)).await {
        Err(ServiceError::McpError(e)) => {
            assert_eq!(e.code, ErrorCode::INVALID_PARAMS);
            assert_eq!(e.message, "Unknown tool: wcnpl_drop_tables");
        }
        other => panic!("expected invalid params, got {other:?}"),
    }

    client.cancel().await.ok();
}
