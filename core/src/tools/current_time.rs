use crate::traits::{Tool, ToolResult};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::json;

const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Zero-argument tool returning the current UTC instant, e.g.
/// `{"utc": "2025-05-21T06:42:00Z"}`.
pub struct CurrentTimeTool;

#[async_trait]
impl Tool for CurrentTimeTool {
    fn name(&self) -> &str {
        "get_current_time"
    }

    fn description(&self) -> &str {
        "Return the current UTC time in ISO-8601 format. Use this whenever the user asks for the current time or date."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn execute(&self, _args: serde_json::Value) -> anyhow::Result<ToolResult> {
        let now = Utc::now().format(DATETIME_FORMAT).to_string();
        Ok(ToolResult::success(json!({"utc": now}).to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    #[tokio::test]
    async fn returns_single_utc_key() {
        let result = CurrentTimeTool
            .execute(serde_json::json!({}))
            .await
            .unwrap();
        assert!(result.success);

        let value: serde_json::Value = serde_json::from_str(&result.output).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert!(object.contains_key("utc"));
    }

    #[tokio::test]
    async fn timestamp_matches_format() {
        let result = CurrentTimeTool
            .execute(serde_json::json!({}))
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&result.output).unwrap();
        let stamp = value["utc"].as_str().unwrap();

        assert!(NaiveDateTime::parse_from_str(stamp, DATETIME_FORMAT).is_ok());
    }
}
