use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "notitron=info,notitron_core=info";
const VERBOSE_FILTER: &str = "notitron=debug,notitron_core=debug";

/// `RUST_LOG` wins; otherwise info, or debug with `--verbose`.
pub fn init(verbose: bool) {
    let fallback = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
