use std::sync::Once;

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "GRAPHQL_PATHS_LOG";

static INIT: Once = Once::new();

/// Install the stderr subscriber. `GRAPHQL_PATHS_LOG` wins over `verbosity`
/// (the `-v` count). Safe to call more than once.
pub fn init_tracing(verbosity: u8) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
    });
}

fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "graphql_paths=warn",
        1 => "graphql_paths=info",
        2 => "graphql_paths=debug",
        _ => "graphql_paths=trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_levels() {
        assert_eq!(default_directive(0), "graphql_paths=warn");
        assert_eq!(default_directive(2), "graphql_paths=debug");
        assert_eq!(default_directive(9), "graphql_paths=trace");
    }
}
