//! Validator checking logging discipline in Python scripts.
//!
//! Flags `print` usage, module-level `logging.*` calls without a named
//! logger, f-strings inside log calls and missing formatter configuration.
//! Findings carry a suggested fixed version of the flagged range.

use serde::Deserialize;

use hexaudit_core::text::{add_line_numbers, extract_json_block};
use hexaudit_core::{AdvisorRef, Finding, FindingKind, Layer, Validator, ValidatorError};

/// Validator name for logging-quality.
pub const NAME: &str = "logging-quality";

const LOGGING_PROMPT: &str = r#"## System
You are an assistant assessing `.py` scripts for logging quality with the
standard `logging` library.

## Your task
You receive the text of a Python program named SCRIPT. Find every place in
this script that violates the logging rules. Find all of them!

## Requirements
- `print` is forbidden.
- Global logging configuration is forbidden; a logger object must be
  created first. Correct:
```python
logger = logging.getLogger(__name__)
logger.info('This is an info log message', extra={'key': 'value'})
```
Incorrect:
```python
logging.info('This is an info log message', extra={'key': 'value'})
```
- f-strings in log calls are forbidden. Incorrect:
```python
id_ = 1
self.logger.info(f'Transport with id [{id_}] was deleted')
```
Correct:
```python
id_ = 1
self.logger.info('Transport with id [%s] was deleted', id_)
```
- The logging config must set the formats
  fmt = '%(asctime)s.%(msecs)03d [%(levelname)s]|[%(name)s]: %(message)s'
  and datefmt = '%Y-%m-%d %H:%M:%S'.

## Checking procedure
1. Go through every line of SCRIPT.
2. Check the line against the requirements above.
3. If the line is fine, continue; otherwise record the line range of the
   problem, the problem itself and how to fix it.
4. If one line has several problems, list them all and suggest a fixed
   version as in step 3.
5. Repeat until SCRIPT has no lines left.

## Output format
If you found violations, answer with JSON of the following structure:
```json
{"errors": [{"start_line_number": 1, "end_line_number": 2, "comment": "...", "suggestion": "```python\n<fixed code>\n```"}]}
```

DUPLICATES ARE FORBIDDEN. If the code has several errors you must list
each of them once in the required format.

## Let's begin
SCRIPT:
{script}
Your answer:
"#;

#[derive(Debug, Deserialize)]
struct LoggingReply {
    errors: Vec<LoggingError>,
}

#[derive(Debug, Deserialize)]
struct LoggingError {
    start_line_number: i64,
    end_line_number: i64,
    comment: String,
    #[serde(default)]
    suggestion: Option<String>,
}

/// Checks logging discipline through the advisor. Ignores the layer and
/// path arguments: the rules apply everywhere.
pub struct LoggingValidator {
    advisor: AdvisorRef,
}

impl LoggingValidator {
    /// Creates the validator on top of an advisor.
    #[must_use]
    pub fn new(advisor: AdvisorRef) -> Self {
        Self { advisor }
    }
}

impl Validator for LoggingValidator {
    fn name(&self) -> &'static str {
        NAME
    }

    fn invoke(
        &self,
        content: &str,
        _layer: Layer,
        _relative_path: &str,
    ) -> Result<Vec<Finding>, ValidatorError> {
        let prompt = LOGGING_PROMPT.replace("{script}", &add_line_numbers(content));

        let reply = self.advisor.infer(&prompt)?;
        let block = extract_json_block(&reply)
            .ok_or_else(|| ValidatorError::Parse("no JSON block in reply".to_string()))?;
        let parsed: LoggingReply =
            serde_json::from_str(block).map_err(|e| ValidatorError::Parse(e.to_string()))?;

        Ok(parsed
            .errors
            .into_iter()
            .map(|e| {
                let finding = Finding::code(
                    FindingKind::Logging,
                    e.start_line_number,
                    e.end_line_number,
                    e.comment,
                );
                match e.suggestion.filter(|s| !s.trim().is_empty()) {
                    Some(suggestion) => finding.with_suggestion(suggestion),
                    None => finding,
                }
            })
            .collect())
    }
}
