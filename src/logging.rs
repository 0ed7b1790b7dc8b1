//! Tracing subscriber setup for the command line tool.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter directive for the given verbosity (`-v` count).
pub fn default_directive(verbosity: u8) -> &'static str {
  match verbosity {
    0 => "warn",
    1 => "info",
    2 => "debug",
    _ => "trace",
  }
}

/// Install a stderr subscriber. `RUST_LOG` takes precedence over `verbosity`.
pub fn init_logging(verbosity: u8) {
  let env_filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

  let _ = tracing_subscriber::registry()
    .with(env_filter)
    .with(
      tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true),
    )
    .try_init();
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn verbosity_raises_level() {
    assert_eq!(default_directive(0), "warn");
    assert_eq!(default_directive(2), "debug");
    assert_eq!(default_directive(9), "trace");
  }
}
