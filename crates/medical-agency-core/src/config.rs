//! Application-level configuration.

/// Application-level constants
pub const APP_NAME: &str = "Medical Agency";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Store key holding the serialized patient collection.
pub const PATIENTS_KEY: &str = "medical_agency_patients";

/// Store key holding the serialized reservation collection.
pub const RESERVATIONS_KEY: &str = "medical_agency_reservations";

/// Number of upcoming appointments shown on the dashboard.
pub const DEFAULT_UPCOMING_LIMIT: usize = 5;

/// Environment variable overriding [`PATIENTS_KEY`].
pub const PATIENTS_KEY_ENV: &str = "MEDICAL_AGENCY_PATIENTS_KEY";

/// Environment variable overriding [`RESERVATIONS_KEY`].
pub const RESERVATIONS_KEY_ENV: &str = "MEDICAL_AGENCY_RESERVATIONS_KEY";

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "medical_agency_core=info"
}

/// Runtime configuration for the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// Store key for patients
    pub patients_key: String,
    /// Store key for reservations
    pub reservations_key: String,
    /// Dashboard upcoming list length
    pub upcoming_limit: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            patients_key: PATIENTS_KEY.to_string(),
            reservations_key: RESERVATIONS_KEY.to_string(),
            upcoming_limit: DEFAULT_UPCOMING_LIMIT,
        }
    }
}

impl CoreConfig {
    /// Defaults with storage keys overridden from the environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(key) = lookup(PATIENTS_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            config.patients_key = key;
        }
        if let Some(key) = lookup(RESERVATIONS_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            config.reservations_key = key;
        }
        config
    }
}

/// Install a `tracing` subscriber.
///
/// Uses `filter` if given, then `RUST_LOG`, then [`default_log_filter`].
/// Returns `false` if a global subscriber was already installed.
pub fn init_logging(filter: Option<&str>) -> bool {
    use tracing_subscriber::EnvFilter;

    let env_filter = match filter {
        Some(f) => EnvFilter::new(f),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_log_filter())),
    };

    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("{} core starting v{}", APP_NAME, APP_VERSION);
    }
    installed
}
