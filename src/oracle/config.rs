//! Configuration for the script oracle.

/// Default toolchain binary, used both to switch builds and to run the script.
pub const DEFAULT_TOOL: &str = "deno";

/// Exit code a test script uses to say "this candidate cannot be tested".
///
/// Matches `git bisect run`'s skip code.
pub const DEFAULT_SKIP_EXIT_CODE: i32 = 125;

/// Configuration for [`ScriptOracle`](super::ScriptOracle).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OracleConfig {
    /// Toolchain binary invoked as `<tool> upgrade --canary --version <sha>`
    /// and `<tool> run -A --no-lock <script>`.
    pub tool: String,

    /// Script exit code that maps to `Outcome::Unknown`.
    pub skip_exit_code: i32,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl OracleConfig {
    /// Creates an `OracleConfig` with default values.
    pub fn new() -> Self {
        OracleConfig {
            tool: DEFAULT_TOOL.to_string(),
            skip_exit_code: DEFAULT_SKIP_EXIT_CODE,
        }
    }

    /// Creates an `OracleConfig` from environment variables.
    ///
    /// Reads `CANARY_BISECT_TOOL` and `CANARY_BISECT_SKIP_EXIT_CODE`.
    /// Unset or unparsable values use defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env), reading values through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let tool = lookup("CANARY_BISECT_TOOL")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TOOL.to_string());
        let skip_exit_code = lookup("CANARY_BISECT_SKIP_EXIT_CODE")
            .and_then(|s| s.trim().parse::<i32>().ok())
            .unwrap_or(DEFAULT_SKIP_EXIT_CODE);

        OracleConfig {
            tool,
            skip_exit_code,
        }
    }
}
