use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use adw::Application;
use directories::BaseDirs;
use serde::{Deserialize, Serialize};

use crate::api::client::ApiClient;
use crate::api::models::Session;

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:3000";
/// Default viewport: Lahore.
pub const DEFAULT_CENTER: (f64, f64) = (31.4880, 74.3430);
pub const DEFAULT_ZOOM: f64 = 13.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub center_lat: f64,
    pub center_lng: f64,
    pub zoom: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            center_lat: DEFAULT_CENTER.0,
            center_lng: DEFAULT_CENTER.1,
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl Config {
    fn toml_path() -> Option<PathBuf> {
        let base = BaseDirs::new()?;
        Some(base.config_dir().join("servicepro.toml"))
    }

    pub fn load() -> Self {
        if let Some(path) = Self::toml_path() {
            if let Ok(bytes) = fs::read(&path) {
                if let Ok(text) = String::from_utf8(bytes) {
                    if let Ok(config) = toml::from_str::<Config>(&text) {
                        return config;
                    }
                }
            }
        }
        Self::default()
    }

    // Write the defaults out on first run so the file exists for editing.
    pub fn load_or_init() -> Self {
        let config = Self::load();
        if let Some(path) = Self::toml_path() {
            if !path.exists() {
                if let Err(err) = config.save() {
                    log::warn!("could not write initial config: {err}");
                }
            }
        }
        config
    }

    pub fn save(&self) -> std::io::Result<()> {
        if let Some(path) = Self::toml_path() {
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let toml = toml::to_string_pretty(self)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
            fs::write(path, toml)
        } else {
            Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "No config dir",
            ))
        }
    }
}

/// Explicit application state handed to every handler. The session cell is
/// only ever touched from the GTK main loop.
pub struct App {
    pub config: Config,
    pub client: ApiClient,
    session: RefCell<Option<Session>>,
}

pub type AppHandle = Rc<App>;

impl App {
    pub fn initialize() -> AppHandle {
        let config = Config::load_or_init();
        let base = crate::utils::normalize_base_url(&config.api_base_url);
        let client = match ApiClient::new(&base) {
            Ok(client) => client,
            Err(err) => {
                log::error!("configured base URL {base:?} is unusable: {err}");
                ApiClient::new(DEFAULT_API_BASE_URL).expect("default base URL is valid")
            }
        };
        let session = crate::session::restore();
        Rc::new(Self {
            config,
            client,
            session: RefCell::new(session),
        })
    }

    pub fn session(&self) -> Option<Session> {
        self.session.borrow().clone()
    }

    pub fn set_session(&self, session: Session) {
        if let Err(err) = crate::session::save(&session) {
            log::warn!("could not persist session: {err}");
        }
        *self.session.borrow_mut() = Some(session);
    }

    pub fn clear_session(&self) {
        if let Err(err) = crate::session::clear() {
            log::warn!("could not clear persisted session: {err}");
        }
        *self.session.borrow_mut() = None;
    }
}

pub fn build_ui(app: &Application) {
    let handle = App::initialize();
    crate::ui::main_window::show_main_window(app, handle);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_point_at_lahore() {
        let config = Config::default();
        assert_eq!(config.center_lat, 31.4880);
        assert_eq!(config.center_lng, 74.3430);
        assert_eq!(config.zoom, 13.0);
    }

    #[test]
    fn config_round_trips_through_toml() {
        let config = Config {
            api_base_url: "https://servicepro.example".into(),
            ..Config::default()
        };
        let text = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.api_base_url, "https://servicepro.example");
        assert_eq!(back.zoom, config.zoom);
    }

    #[test]
    fn partial_config_fills_in_defaults() {
        let back: Config = toml::from_str("api_base_url = \"http://10.0.0.2:3000\"").unwrap();
        assert_eq!(back.api_base_url, "http://10.0.0.2:3000");
        assert_eq!(back.center_lat, DEFAULT_CENTER.0);
    }
}
