mod app;
mod client;
mod config;
mod crop;
mod menu;
mod ops;
mod screen;
mod session;
mod workflow;

use app::KreateApp;
use config::AppConfig;

const DEFAULT_BACKEND: &str = "http://127.0.0.1:5000";
const BACKEND_ENV: &str = "KREATE_BACKEND";

/// Backend base URL: environment variable wins, then the config file, then
/// the bundled default. Trailing slashes are dropped so endpoint paths can be
/// appended directly.
fn resolve_backend_url(env_value: Option<String>, config: &AppConfig) -> String {
    let raw = env_value
        .filter(|v| !v.trim().is_empty())
        .or_else(|| config.backend_url.clone())
        .unwrap_or_else(|| DEFAULT_BACKEND.to_owned());
    raw.trim().trim_end_matches('/').to_owned()
}

fn main() -> eframe::Result {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = AppConfig::load();
    let backend_url = resolve_backend_url(std::env::var(BACKEND_ENV).ok(), &config);
    tracing::info!(%backend_url, "starting kreate");

    let width = config.window_width.unwrap_or(900.0);
    let height = config.window_height.unwrap_or(760.0);

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Kreate")
            .with_app_id("kreate")
            .with_inner_size([width, height]),
        ..Default::default()
    };

    eframe::run_native(
        "kreate",
        native_options,
        Box::new(|_cc| Ok(Box::new(KreateApp::new(config, backend_url)))),
    )
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_BACKEND, resolve_backend_url};
    use crate::config::AppConfig;

    #[test]
    fn env_variable_takes_priority() {
        let config = AppConfig {
            backend_url: Some("http://configured:9000".into()),
            ..Default::default()
        };
        assert_eq!(
            resolve_backend_url(Some("http://from-env:8000".into()), &config),
            "http://from-env:8000"
        );
    }

    #[test]
    fn config_is_used_when_env_is_absent_or_blank() {
        let config = AppConfig {
            backend_url: Some("http://configured:9000/".into()),
            ..Default::default()
        };
        assert_eq!(
            resolve_backend_url(None, &config),
            "http://configured:9000"
        );
        assert_eq!(
            resolve_backend_url(Some("  ".into()), &config),
            "http://configured:9000"
        );
    }

    #[test]
    fn falls_back_to_the_bundled_default() {
        assert_eq!(
            resolve_backend_url(None, &AppConfig::default()),
            DEFAULT_BACKEND
        );
    }
}
