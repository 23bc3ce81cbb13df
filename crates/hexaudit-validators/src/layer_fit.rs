//! Validator checking that a file's code belongs to its assigned layer.
//!
//! One advisor call per file. The prompt embeds the hexagonal layer
//! descriptions, the file's assigned layer and its line-numbered content,
//! and asks for a JSON list of comments typed `architecture`, `auth` or
//! `data`. Positive comments are forbidden by the prompt; a clean file
//! yields zero findings.

use serde::Deserialize;

use hexaudit_core::text::{add_line_numbers, extract_json_block};
use hexaudit_core::{AdvisorRef, Finding, FindingKind, Layer, Validator, ValidatorError};

/// Validator name for layer-fit.
pub const NAME: &str = "layer-fit";

const LAYER_FIT_PROMPT: &str = r#"You are a helpful AI code reviewer.

## Your task
You receive the content of a file named FILE from a Python project. Check
the code in this file for errors of the types below.

## Error types
### First error type: **architecture**
Architecture errors. The project follows the hexagonal architecture, whose
goal is to separate the application's core business logic from the services
it uses. It has three application layers: core, adapters, composite.
#### Layer descriptions
1. **core**
- Holds domain entities, business rules, DTOs, errors and services.
- Does not depend on external integrations or infrastructure.
- Talks to adapters only through interfaces (repositories, gateways, API
  clients).
- Entities describe behavior and invariants, not just data.
- Data crosses layer boundaries as DTOs, not primitive structures.
2. **adapters**
- The integration layer with the whole outside world.
- Implements the interfaces declared in core.
- Holds database code, external API clients, queue consumers and
  producers, web controllers, CLI entry points.
- No business logic, only infrastructure concerns.
3. **composite**
- Assembles, configures and starts the application.
- Performs dependency injection for all layers.
- Initializes settings and infrastructure components and hands them to
  the adapters.

The file FILE belongs to the layer {layer}. Check whether its code fits
this layer; if some parts do not, say where they should be moved.

### Second error type: **auth**
Errors in authentication and authorization: correctness of JWT token
handling and resource access protection. The frontend obtains a JWT token
and passes it as a bearer token in the standard Authorization header
(example: Authorization: Bearer ...).

### Third error type: **data**
Errors from dialect-dependent constructs. Several DBMSes are in use
(mostly MSSQL and Postgres), so dialect-dependent constructs must be
minimized, and where unavoidable marked `# TODO: dialect dependent`. Code
performance on large data volumes also belongs to this category.

## Input
Path of FILE: {path}

FILE belongs to the layer {layer}

### Content of FILE
```python
{content}
```

## Result
Do not write positive comments about the code!
You MUST answer with JSON of the following structure:
```json
{"comments": [{"type": "architecture|auth|data", "start_line_number": 1, "end_line_number": 2, "comment": "..."}]}
```
"#;

#[derive(Debug, Deserialize)]
struct LayerFitReply {
    comments: Vec<LayerFitComment>,
}

#[derive(Debug, Deserialize)]
struct LayerFitComment {
    #[serde(rename = "type")]
    kind: String,
    start_line_number: i64,
    end_line_number: i64,
    comment: String,
}

/// Checks each file against its assigned architectural layer, plus the
/// auth and data-handling policies, through the advisor.
pub struct LayerFitValidator {
    advisor: AdvisorRef,
}

impl LayerFitValidator {
    /// Creates the validator on top of an advisor.
    #[must_use]
    pub fn new(advisor: AdvisorRef) -> Self {
        Self { advisor }
    }
}

impl Validator for LayerFitValidator {
    fn name(&self) -> &'static str {
        NAME
    }

    fn invoke(
        &self,
        content: &str,
        layer: Layer,
        relative_path: &str,
    ) -> Result<Vec<Finding>, ValidatorError> {
        let prompt = LAYER_FIT_PROMPT
            .replace("{layer}", layer.as_str())
            .replace("{path}", relative_path)
            .replace("{content}", &add_line_numbers(content));

        let reply = self.advisor.infer(&prompt)?;
        let block = extract_json_block(&reply)
            .ok_or_else(|| ValidatorError::Parse("no JSON block in reply".to_string()))?;
        let parsed: LayerFitReply =
            serde_json::from_str(block).map_err(|e| ValidatorError::Parse(e.to_string()))?;

        Ok(parsed
            .comments
            .into_iter()
            .map(|c| {
                Finding::code(
                    comment_kind(&c.kind),
                    c.start_line_number,
                    c.end_line_number,
                    c.comment,
                )
            })
            .collect())
    }
}

fn comment_kind(raw: &str) -> FindingKind {
    match raw {
        "architecture" => FindingKind::Architecture,
        "auth" => FindingKind::Auth,
        "data" => FindingKind::Data,
        other => FindingKind::Other(other.to_string()),
    }
}
