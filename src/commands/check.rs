//! Check command - Connects every configured backend and pings it.

use std::collections::BTreeMap;

use crate::api::AppState;
use crate::config::Config;
use crate::errors::{AppError, AppResult};

/// Execute the check command
pub async fn execute(config: Config) -> AppResult<()> {
    let state = AppState::from_config(config)?;

    let result = run(&state).await;
    state.shutdown().await;
    result
}

async fn run(state: &AppState) -> AppResult<()> {
    state.connect().await?;

    #[cfg(feature = "database")]
    let databases = state.databases.ping_all().await;
    #[cfg(not(feature = "database"))]
    let databases = BTreeMap::<String, bool>::new();
    let caches = state.caches.ping_all().await;

    if databases.is_empty() && caches.is_empty() {
        tracing::warn!("No backends configured; set DATABASE_URL, REDIS_URL or MEMCACHE_URL");
        return Ok(());
    }

    report("database", &databases);
    report("cache", &caches);

    let failed: Vec<&String> = databases
        .iter()
        .chain(caches.iter())
        .filter(|(_, ok)| !**ok)
        .map(|(name, _)| name)
        .collect();

    if failed.is_empty() {
        tracing::info!("All backends healthy");
        Ok(())
    } else {
        Err(AppError::ServiceUnavailable(format!("{:?}", failed)))
    }
}

fn report(kind: &str, status: &BTreeMap<String, bool>) {
    for (name, healthy) in status {
        if *healthy {
            tracing::info!(kind = %kind, name = %name, "Backend healthy");
        } else {
            tracing::error!(kind = %kind, name = %name, "Backend unreachable");
        }
    }
}
