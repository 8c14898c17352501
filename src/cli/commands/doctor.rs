//! Doctor command - verify environment and configuration.

use crate::cli::Output;
use crate::config::{Settings, API_KEY_ENV, ENDPOINT_ENV, MCP_SERVER_ENV};
use console::style;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Pizzaiolo Doctor");
    println!();
    println!("Checking environment and configuration...\n");

    let mut checks = Vec::new();

    println!("{}", style("Agent Service").bold());
    let service_checks = vec![check_endpoint(settings), check_api_key(), check_mcp_url()];
    for check in &service_checks {
        check.print();
    }
    checks.extend(service_checks);

    println!();

    println!("{}", style("Reference Documents").bold());
    let docs_check = check_docs_dir(settings);
    docs_check.print();
    checks.push(docs_check);

    println!();

    println!("{}", style("Configuration").bold());
    let config_check = check_config_file();
    config_check.print();
    checks.push(config_check);

    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Pizzaiolo.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Pizzaiolo is ready to use.");
    }

    Ok(())
}

/// Check the agent service endpoint.
fn check_endpoint(settings: &Settings) -> CheckResult {
    match settings.endpoint() {
        Ok(endpoint) => match url::Url::parse(&endpoint) {
            Ok(_) => CheckResult::ok(ENDPOINT_ENV, &endpoint),
            Err(e) => CheckResult::error(
                ENDPOINT_ENV,
                &format!("'{}' is not a valid URL: {}", endpoint, e),
                "Set a full project endpoint URL, e.g. https://<resource>.services.ai.azure.com/api/projects/<project>",
            ),
        },
        Err(_) => CheckResult::error(
            ENDPOINT_ENV,
            "not set",
            &format!("Set with: export {}='https://...'", ENDPOINT_ENV),
        ),
    }
}

/// Check the agent service API key.
fn check_api_key() -> CheckResult {
    match std::env::var(API_KEY_ENV) {
        Ok(key) if !key.is_empty() => {
            CheckResult::ok(API_KEY_ENV, &format!("configured ({})", mask_key(&key)))
        }
        _ => CheckResult::error(
            API_KEY_ENV,
            "not set",
            &format!("Set with: export {}='...'", API_KEY_ENV),
        ),
    }
}

/// Mask a key for display, keeping the first and last four characters.
/// Operates on characters, not bytes, so multi-byte keys cannot panic.
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    } else {
        "****".to_string()
    }
}

/// Check the optional secondary MCP server URL.
fn check_mcp_url() -> CheckResult {
    match std::env::var(MCP_SERVER_ENV) {
        Ok(url) if !url.is_empty() => CheckResult::ok(MCP_SERVER_ENV, &url),
        _ => CheckResult::warning(
            MCP_SERVER_ENV,
            "not set (optional)",
            "Only needed when a secondary MCP tool server is used",
        ),
    }
}

/// Check the reference documents directory.
fn check_docs_dir(settings: &Settings) -> CheckResult {
    let dir = settings.docs_dir();
    if !dir.is_dir() {
        return CheckResult::error(
            "Documents directory",
            &format!("{} not found", dir.display()),
            "Create it and add the store reference documents to upload",
        );
    }

    let count = std::fs::read_dir(&dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .filter(|e| e.path().is_file())
                .count()
        })
        .unwrap_or(0);

    if count == 0 {
        CheckResult::warning(
            "Documents directory",
            &format!("{} is empty", dir.display()),
            "Provisioning requires at least one reference document",
        )
    } else {
        CheckResult::ok(
            "Documents directory",
            &format!("{} ({} file(s))", dir.display(), count),
        )
    }
}

/// Check if config file exists.
fn check_config_file() -> CheckResult {
    let config_path = Settings::default_config_path();
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            &format!("Create one at {}", config_path.display()),
        )
    }
}
