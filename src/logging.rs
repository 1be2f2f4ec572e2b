use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install a stderr subscriber.
///
/// `RUST_LOG` wins when set; otherwise `debug` in verbose mode and `info`
/// otherwise. Stdout is left free for results.
pub fn setup_logging(verbose: bool) -> Result<(), tracing_subscriber::util::TryInitError> {
    let default_level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init()?;

    tracing::debug!("Logging initialized: verbose={}", verbose);
    Ok(())
}
