use offerly_core::parser;

use super::CommandResult;

pub fn run(query: &str) -> CommandResult {
    let criteria = parser::parse_query(query);
    match serde_json::to_string_pretty(&criteria) {
        Ok(output) => CommandResult { exit_code: 0, output },
        Err(error) => CommandResult::failure("parse", "serialization", error.to_string(), 1),
    }
}
