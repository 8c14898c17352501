//! Local tool registry for the agent.
//!
//! The remote run invokes tools by name with a JSON argument payload.
//! Parsing maps that loosely-typed payload onto a typed [`ToolCall`];
//! malformed arguments are rejected at this boundary and reported back to
//! the run as a tool failure instead of crashing the process.

pub mod pizza;

pub use pizza::{calculate_pizza_needed, PizzaRecommendation};

use crate::error::{PizzaioloError, Result};
use crate::remote::{FunctionSpec, ToolDefinition};
use serde::{Deserialize, Serialize};

/// Name the calculator is registered under.
pub const CALCULATE_PIZZA_TOOL: &str = "calculate_pizza_needed";

/// Available local tools for the agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum ToolCall {
    /// Recommend how many large pizzas a party needs.
    CalculatePizzaNeeded { num_people: i64 },
}

/// Execution context for local tools.
///
/// The calculator is pure, so the context carries no state today; it exists
/// so tool execution keeps a single seam as tools grow.
#[derive(Debug, Default)]
pub struct ToolContext;

impl ToolContext {
    pub fn new() -> Self {
        Self
    }

    /// Execute a tool call and return the result as a JSON string.
    pub fn execute(&self, tool: &ToolCall) -> Result<String> {
        match tool {
            ToolCall::CalculatePizzaNeeded { num_people } => {
                let recommendation = calculate_pizza_needed(*num_people);
                Ok(serde_json::to_string(&recommendation)?)
            }
        }
    }
}

/// Parse a tool call from the remote run's name and argument payload.
pub fn parse_tool_call(name: &str, arguments: &str) -> Result<ToolCall> {
    let args: serde_json::Value = serde_json::from_str(arguments)
        .map_err(|e| PizzaioloError::InvalidToolArgs(format!("Invalid arguments JSON: {}", e)))?;

    match name {
        CALCULATE_PIZZA_TOOL => {
            let num_people = args["num_people"].as_i64().ok_or_else(|| {
                PizzaioloError::InvalidToolArgs(
                    "Missing or non-integer 'num_people' argument".to_string(),
                )
            })?;
            if num_people < 1 {
                return Err(PizzaioloError::InvalidToolArgs(format!(
                    "'num_people' must be a positive integer, got {}",
                    num_people
                )));
            }
            Ok(ToolCall::CalculatePizzaNeeded { num_people })
        }
        _ => Err(PizzaioloError::InvalidToolArgs(format!(
            "Unknown tool: {}",
            name
        ))),
    }
}

/// Tool definitions declared on the agent: the local pizza calculator plus
/// the hosted file-search capability.
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::Function {
            function: FunctionSpec {
                name: CALCULATE_PIZZA_TOOL.to_string(),
                description: "Calculate the number and size of pizzas needed for a given \
                    number of people. A large pizza is suitable for 2 adults and 2 children."
                    .to_string(),
                parameters: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "num_people": {
                            "type": "integer",
                            "description": "The number of people to order pizza for"
                        }
                    },
                    "required": ["num_people"]
                }),
            },
        },
        ToolDefinition::FileSearch,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_calculate_pizza() {
        let tool = parse_tool_call("calculate_pizza_needed", r#"{"num_people": 9}"#).unwrap();
        match tool {
            ToolCall::CalculatePizzaNeeded { num_people } => assert_eq!(num_people, 9),
        }
    }

    #[test]
    fn test_parse_missing_argument() {
        let err = parse_tool_call("calculate_pizza_needed", r#"{}"#).unwrap_err();
        assert!(matches!(err, PizzaioloError::InvalidToolArgs(_)));
    }

    #[test]
    fn test_parse_non_integer_argument() {
        let err =
            parse_tool_call("calculate_pizza_needed", r#"{"num_people": "nine"}"#).unwrap_err();
        assert!(matches!(err, PizzaioloError::InvalidToolArgs(_)));
    }

    #[test]
    fn test_parse_rejects_zero_and_negative() {
        for args in [r#"{"num_people": 0}"#, r#"{"num_people": -4}"#] {
            let err = parse_tool_call("calculate_pizza_needed", args).unwrap_err();
            assert!(matches!(err, PizzaioloError::InvalidToolArgs(_)));
        }
    }

    #[test]
    fn test_parse_unknown_tool() {
        let err = parse_tool_call("order_sushi", r#"{}"#).unwrap_err();
        assert!(matches!(err, PizzaioloError::InvalidToolArgs(_)));
    }

    #[test]
    fn test_parse_malformed_json() {
        let err = parse_tool_call("calculate_pizza_needed", "not json").unwrap_err();
        assert!(matches!(err, PizzaioloError::InvalidToolArgs(_)));
    }

    #[test]
    fn test_execute_returns_recommendation_json() {
        let context = ToolContext::new();
        let output = context
            .execute(&ToolCall::CalculatePizzaNeeded { num_people: 5 })
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["pizzas_needed"], 2);
        assert_eq!(value["pizza_size"], "large");
        assert_eq!(
            value["recommendation"],
            "We recommend 2 large pizza(s) for 5 people."
        );
    }

    #[test]
    fn test_definitions_declare_calculator_and_file_search() {
        let definitions = tool_definitions();
        assert_eq!(definitions.len(), 2);
        match &definitions[0] {
            ToolDefinition::Function { function } => {
                assert_eq!(function.name, CALCULATE_PIZZA_TOOL);
                assert_eq!(function.parameters["required"][0], "num_people");
            }
            other => panic!("Expected function tool, got {:?}", other),
        }
        assert!(matches!(definitions[1], ToolDefinition::FileSearch));
    }
}
