// Entrypoint for the CLI application.
// - Keeps `main` small: set up logging, create an API client and hand it
//   to the UI loop.
// - Returns `anyhow::Result` so startup errors print with context.

use labtree_cli::{api::ApiClient, ui::main_menu};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // LABTREE_DEBUG=1 turns on request tracing; an explicit RUST_LOG
    // still takes precedence.
    let default_filter = if std::env::var_os("LABTREE_DEBUG").is_some() {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Credentials come from `GITLAB_TOKEN` / `GITLAB_URL` or the token
    // file in the home directory. See `api::ApiClient::from_env`.
    let api = ApiClient::from_env()?;

    // Start the interactive menu. This call blocks until the user exits.
    main_menu(api)?;
    Ok(())
}
