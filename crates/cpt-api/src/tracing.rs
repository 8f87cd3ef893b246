//! Log output setup.
//!
//! Development gets pretty, source-annotated logs at `debug`; production gets
//! flattened JSON events at `info`. `RUST_LOG` overrides either default, e.g.
//! `RUST_LOG=cpt_core=trace,tower_http=debug`.

use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Environment;

/// Filter used when `RUST_LOG` is unset.
pub const fn default_filter(env: Environment) -> &'static str {
    match env {
        Environment::Development => "debug,tower_http=debug,sqlx=warn",
        Environment::Production => "info,tower_http=info,sqlx=warn",
    }
}

pub fn init_tracing(env: Environment) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter(env)));

    let registry = tracing_subscriber::registry();

    if env.is_development() {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_file(true)
                    .pretty()
                    .with_filter(env_filter),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .flatten_event(true)
                    .with_target(true)
                    .with_filter(env_filter),
            )
            .init();
    }

    tracing::info!(environment = ?env, "tracing initialized");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filters_parse() {
        for env in [Environment::Development, Environment::Production] {
            assert!(EnvFilter::try_new(default_filter(env)).is_ok());
        }
        assert!(default_filter(Environment::Production).starts_with("info"));
    }
}
