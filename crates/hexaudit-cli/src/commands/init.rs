//! Init command: writes a starter configuration file.

use anyhow::{bail, Result};
use std::path::Path;

/// File written by `hexaudit init`.
const CONFIG_FILE: &str = "hexaudit.toml";

const CONFIG_TEMPLATE: &str = r#"# hexaudit configuration

# Which files are reviewed.
extension = ".py"

# Glob patterns excluded from discovery.
exclude = ["**/.git/**", "**/__pycache__/**", "**/.venv/**"]

# Bound on concurrent analysis tasks (and outstanding advisor calls).
concurrency = 5

# Context lines shown around each finding.
context_pad = 5

# Advisor endpoint. The API key comes from --api-key or HEXAUDIT_API_KEY.
# base_url = "https://api.deepinfra.com/v1/openai"
# model = "Qwen/Qwen2.5-Coder-32B-Instruct"

# Dependency allow-list for the audit pass. Uncomment to replace the
# built-in backend standard list.
# [[allowed_deps]]
# name = "requests"
# version = "~=2.27.0"
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new(CONFIG_FILE), force)
}

fn write_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists; use --force to overwrite",
            path.display()
        );
    }
    std::fs::write(path, CONFIG_TEMPLATE)?;
    println!("Wrote {}", path.display());
    Ok(())
}
