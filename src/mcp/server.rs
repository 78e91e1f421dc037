/// MCP server implementation that handles JSON-RPC communication
///
/// This module implements the stdio MCP server that:
/// 1. Reads JSON-RPC requests line by line
/// 2. Dispatches tool calls to the nutrition operations
/// 3. Writes JSON-RPC responses back, one per line

use schemars::schema_for;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

use crate::analytics::nutrient_label;
use crate::mcp::protocol::*;
use crate::tools::{self, AnalyticsParams, CreateProfileParams, DailyTotalsParams, LogMealParams, ToolError};
use crate::{NutritionTrackerServer, ServerError};

/// MCP server exposing the tracker as tools
pub struct McpServer {
    tracker: NutritionTrackerServer,
    initialized: bool,
}

impl McpServer {
    pub fn new(tracker: NutritionTrackerServer) -> Self {
        Self {
            tracker,
            initialized: false,
        }
    }

    /// Serve over stdin/stdout until stdin closes
    pub async fn run(&mut self) -> Result<(), ServerError> {
        info!("Starting MCP server, waiting for JSON-RPC requests...");
        let reader = BufReader::new(tokio::io::stdin());
        self.serve(reader, tokio::io::stdout()).await
    }

    /// Serve requests from any line-oriented reader/writer pair
    pub async fn serve<R, W>(&mut self, mut reader: R, mut writer: W) -> Result<(), ServerError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut line = String::new();

        loop {
            line.clear();

            match reader.read_line(&mut line).await {
                Ok(0) => {
                    info!("MCP server shutting down (input closed)");
                    break;
                }
                Ok(_) => {
                    if let Some(response) = self.process_line(&line) {
                        let response_str = serde_json::to_string(&response)?;

                        writer.write_all(response_str.as_bytes()).await?;
                        writer.write_all(b"\n").await?;
                        writer.flush().await?;

                        debug!("Sent response: {}", response_str);
                    }
                }
                Err(e) => {
                    error!("Failed to read request: {}", e);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Process a single line of JSON-RPC input
    fn process_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {}", e),
                    None,
                ));
            }
        };

        if request.is_notification() {
            if request.method == "notifications/initialized" {
                self.initialized = true;
            }
            return None;
        }

        Some(self.handle_request(request))
    }

    fn handle_request(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request),
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => self.handle_tools_list(request),
            "tools/call" => self.handle_tools_call(request),
            _ => JsonRpcResponse::error(
                request.id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method '{}' not found", request.method),
                None,
            ),
        }
    }

    fn handle_initialize(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        info!("MCP client connected");

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
            },
            server_info: ServerInfo {
                name: "Nutrition Tracker MCP".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        serialized_response(request.id, &result)
    }

    fn handle_tools_list(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        let tools = vec![
            ToolDefinition {
                name: "nutrition_analytics".to_string(),
                description: "Nutrient trend for a user: daily series, average vs stage target, streak, week-over-week change and insights".to_string(),
                input_schema: input_schema::<AnalyticsParams>(),
            },
            ToolDefinition {
                name: "meal_log".to_string(),
                description: "Log a meal with its nutrient amounts for today".to_string(),
                input_schema: input_schema::<LogMealParams>(),
            },
            ToolDefinition {
                name: "daily_totals".to_string(),
                description: "Nutrient totals and meals for one day".to_string(),
                input_schema: input_schema::<DailyTotalsParams>(),
            },
            ToolDefinition {
                name: "profile_create".to_string(),
                description: "Create a user profile with name and pregnancy/postpartum stage".to_string(),
                input_schema: input_schema::<CreateProfileParams>(),
            },
        ];

        JsonRpcResponse::success(request.id, json!({ "tools": tools }))
    }

    fn handle_tools_call(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        let tool_params: ToolCallParams = match request.params {
            Some(params) => match serde_json::from_value(params) {
                Ok(p) => p,
                Err(e) => {
                    return JsonRpcResponse::error(
                        request.id,
                        error_codes::INVALID_PARAMS,
                        format!("Invalid parameters: {}", e),
                        None,
                    );
                }
            },
            None => {
                return JsonRpcResponse::error(
                    request.id,
                    error_codes::INVALID_PARAMS,
                    "Missing parameters".to_string(),
                    None,
                );
            }
        };

        let result = match tool_params.name.as_str() {
            "nutrition_analytics" => self.call_nutrition_analytics(tool_params.arguments),
            "meal_log" => self.call_meal_log(tool_params.arguments),
            "daily_totals" => self.call_daily_totals(tool_params.arguments),
            "profile_create" => self.call_profile_create(tool_params.arguments),
            _ => ToolCallResult::error(format!("Unknown tool: {}", tool_params.name)),
        };

        serialized_response(request.id, &result)
    }

    fn call_nutrition_analytics(&self, args: Map<String, Value>) -> ToolCallResult {
        let params: AnalyticsParams = match parse_arguments(args) {
            Ok(p) => p,
            Err(result) => return result,
        };

        match tools::get_nutrition_analytics(self.tracker.storage(), self.tracker.analytics(), params) {
            Ok(result) => {
                let summary = format!(
                    "{} ({}): averaging {} of {} target ({}%), {}-day streak, {:+}% vs previous week",
                    nutrient_label(&result.nutrient),
                    result.period.as_str(),
                    result.average,
                    result.target,
                    result.target_percentage,
                    result.streak,
                    result.change
                );
                json_result(summary, &result)
            }
            Err(e) => tool_error(e),
        }
    }

    fn call_meal_log(&self, args: Map<String, Value>) -> ToolCallResult {
        let params: LogMealParams = match parse_arguments(args) {
            Ok(p) => p,
            Err(result) => return result,
        };

        match tools::log_meal(self.tracker.storage(), params) {
            Ok(response) => {
                let summary = format!(
                    "Logged {} for {}",
                    response.meal.meal_type.as_str(),
                    response.daily.date
                );
                json_result(summary, &response)
            }
            Err(e) => tool_error(e),
        }
    }

    fn call_daily_totals(&self, args: Map<String, Value>) -> ToolCallResult {
        let params: DailyTotalsParams = match parse_arguments(args) {
            Ok(p) => p,
            Err(result) => return result,
        };

        match tools::get_daily_totals(self.tracker.storage(), params) {
            Ok(response) => {
                let summary = format!(
                    "{} meal(s) logged on {}",
                    response.meals.len(),
                    response.record.date
                );
                json_result(summary, &response)
            }
            Err(e) => tool_error(e),
        }
    }

    fn call_profile_create(&self, args: Map<String, Value>) -> ToolCallResult {
        let params: CreateProfileParams = match parse_arguments(args) {
            Ok(p) => p,
            Err(result) => return result,
        };

        match tools::create_profile(self.tracker.storage(), params) {
            Ok(profile) => {
                let summary = format!("Created profile for {}\nUser ID: {}", profile.name, profile.id);
                json_result(summary, &profile)
            }
            Err(e) => tool_error(e),
        }
    }
}

fn input_schema<T: schemars::JsonSchema>() -> Value {
    serde_json::to_value(schema_for!(T)).unwrap_or_else(|_| json!({ "type": "object" }))
}

fn parse_arguments<T: serde::de::DeserializeOwned>(args: Map<String, Value>) -> Result<T, ToolCallResult> {
    serde_json::from_value(Value::Object(args))
        .map_err(|e| ToolCallResult::error(format!("Invalid arguments: {}", e)))
}

fn json_result<T: Serialize>(summary: String, payload: &T) -> ToolCallResult {
    match serde_json::to_string_pretty(payload) {
        Ok(body) => ToolCallResult::success(format!("{}\n\n{}", summary, body)),
        Err(e) => {
            error!("Failed to serialize tool result: {}", e);
            ToolCallResult::error("Internal error".to_string())
        }
    }
}

fn tool_error(err: ToolError) -> ToolCallResult {
    match err {
        ToolError::Internal(detail) => {
            error!("Tool call failed: {}", detail);
            ToolCallResult::error("Internal error".to_string())
        }
        other => ToolCallResult::error(other.to_string()),
    }
}

fn serialized_response<T: Serialize>(id: Value, payload: &T) -> JsonRpcResponse {
    match serde_json::to_value(payload) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(
            id,
            error_codes::INTERNAL_ERROR,
            format!("Failed to serialize result: {}", e),
            None,
        ),
    }
}
