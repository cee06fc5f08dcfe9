use std::path::PathBuf;

/// Process configuration, read once at startup. Provider tokens and the
/// webhook secret are optional; routes that need a missing one fail with a
/// 500 naming the variable.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub data_dir: PathBuf,
    pub port: u16,
    /// Port the dashboard dev server runs on, for the CORS allowlist.
    pub web_origin_port: u16,
    pub vercel_token: Option<String>,
    pub github_token: Option<String>,
    /// Shared secret for inbound GitHub webhooks. Defaults to empty, which
    /// rejects every signed delivery rather than failing at startup.
    pub webhook_secret: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let data_dir = std::env::var("OPSDECK_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::data_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join("opsdeck")
            });

        Self {
            data_dir,
            port: env_port("PORT", 8080),
            web_origin_port: env_port("OPSDECK_WEB_ORIGIN_PORT", 3000),
            vercel_token: non_empty_var("VERCEL_TOKEN"),
            github_token: non_empty_var("GITHUB_TOKEN"),
            webhook_secret: std::env::var("GITHUB_WEBHOOK_SECRET").unwrap_or_default(),
        }
    }
}

fn env_port(name: &str, default: u16) -> u16 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
