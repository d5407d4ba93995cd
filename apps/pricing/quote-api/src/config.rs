use core_config::{app_info, server::ServerConfig, AppInfo, FromEnv};
use domain_pricing::CalculatorOptions;

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Application configuration, composed from the shared config pieces
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub server: ServerConfig,
    pub environment: Environment,
    pub calculator: CalculatorOptions,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?; // HOST=0.0.0.0, PORT=8080 unless set
        let calculator = CalculatorOptions::from_env()?;

        Ok(Self {
            app: app_info!(),
            server,
            environment,
            calculator,
        })
    }
}
