//! Centralized constants for the kaze provider catalog.
//!
//! All magic numbers, default strings, and configuration constants live here
//! so they can be changed in one place.

/// Application name used in CLI output and directory paths.
pub const APP_NAME: &str = "kaze";

/// Configuration filename.
pub const CONFIG_FILENAME: &str = "config.toml";

// --- Catalog service ---

/// Default URL of the remote provider catalog.
pub const DEFAULT_CATALOG_URL: &str = "https://catwalk.charm.sh";

/// Environment variable overriding the catalog URL.
pub const CATALOG_URL_ENV: &str = "KAZE_CATALOG_URL";

/// Default timeout for a live catalog fetch, in seconds.
pub const CATALOG_FETCH_TIMEOUT_SECS: u64 = 30;

// --- Provider cache ---

/// Provider cache filename inside the data directory.
pub const PROVIDER_CACHE_FILENAME: &str = "providers.json";

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "KAZE_DATA_DIR";

/// Age after which the provider cache is considered stale (24 hours).
pub const CACHE_STALE_AFTER_HOURS: u64 = 24;

// --- Local Ollama server ---

/// Default base URL for local Ollama server.
pub const OLLAMA_DEFAULT_BASE_URL: &str = "http://localhost:11434";

/// Path of Ollama's tag listing endpoint.
pub const OLLAMA_TAGS_PATH: &str = "/api/tags";

/// Timeout for probing the local Ollama server, in seconds.
pub const OLLAMA_PROBE_TIMEOUT_SECS: u64 = 5;

/// Reserved provider ID for the locally probed Ollama provider.
pub const LOCAL_PROVIDER_ID: &str = "ollama";

/// Display name for the locally probed Ollama provider.
pub const LOCAL_PROVIDER_NAME: &str = "Ollama (Local)";

// --- Local model heuristics ---

/// Context window assumed for local models with no recognized family.
pub const LOCAL_DEFAULT_CONTEXT_WINDOW: u64 = 4_096;

/// Context window for llama and mistral family models.
pub const LOCAL_LLAMA_CONTEXT_WINDOW: u64 = 8_192;

/// Context window for codellama models.
pub const LOCAL_CODELLAMA_CONTEXT_WINDOW: u64 = 16_384;

// --- Logging ---

/// Environment variable holding the tracing filter directive.
pub const LOG_ENV: &str = "KAZE_LOG";
