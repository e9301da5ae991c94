use crate::config::types::{Config, CrawlerConfig, FetcherConfig, KeywordsConfig, RenderConfig};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_render_config(&config.render)?;
    validate_keywords_config(&config.keywords)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_fetches_per_target < 1 || config.max_fetches_per_target > 500 {
        return Err(ConfigError::Validation(format!(
            "max_fetches_per_target must be between 1 and 500, got {}",
            config.max_fetches_per_target
        )));
    }

    if config.batch_size < 1 {
        return Err(ConfigError::Validation(format!(
            "batch_size must be >= 1, got {}",
            config.batch_size
        )));
    }

    if config.workers_cap < 1 || config.workers_cap > 100 {
        return Err(ConfigError::Validation(format!(
            "workers_cap must be between 1 and 100, got {}",
            config.workers_cap
        )));
    }

    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    Ok(())
}

/// Validates render fallback configuration
fn validate_render_config(config: &RenderConfig) -> Result<(), ConfigError> {
    #[cfg(not(feature = "headless"))]
    {
        if config.engine == crate::config::types::RenderEngine::Headless {
            return Err(ConfigError::Validation(
                "render engine 'headless' requires a build with the headless feature".to_string(),
            ));
        }
    }

    if config.pool_size < 1 || config.pool_size > 20 {
        return Err(ConfigError::Validation(format!(
            "pool_size must be between 1 and 20, got {}",
            config.pool_size
        )));
    }

    if config.max_subpages > 10 {
        return Err(ConfigError::Validation(format!(
            "max_subpages must be <= 10, got {}",
            config.max_subpages
        )));
    }

    if config.pause_min_ms > config.pause_max_ms {
        return Err(ConfigError::Validation(format!(
            "pause_min_ms ({}) cannot exceed pause_max_ms ({})",
            config.pause_min_ms, config.pause_max_ms
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "render timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    Ok(())
}

/// Validates keyword override lists
fn validate_keywords_config(config: &KeywordsConfig) -> Result<(), ConfigError> {
    let tables = [
        ("english", &config.english),
        ("german", &config.german),
        ("french", &config.french),
        ("spanish", &config.spanish),
    ];

    for (name, table) in tables {
        if let Some(keywords) = table {
            if keywords.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "keyword override for '{}' cannot be an empty list",
                    name
                )));
            }

            if keywords.iter().any(|k| k.trim().is_empty()) {
                return Err(ConfigError::Validation(format!(
                    "keyword override for '{}' contains a blank entry",
                    name
                )));
            }
        }
    }

    Ok(())
}
