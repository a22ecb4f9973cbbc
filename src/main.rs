//! Binary entry point: resolve where data lives, start logging, make sure the
//! schema exists, then hand control to the Ratatui event loop until the user
//! exits.
use hospital_front_desk::{logging, run_app, App, AppConfig, RecordStore};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let config = AppConfig::resolve()?;
    config.ensure_data_dir()?;
    logging::init(&config)?;
    info!(db = %config.db_path.display(), "starting hospital front desk");

    let store = RecordStore::new(&config.db_path);
    store.initialize()?;

    let mut app = App::new(store);
    run_app(&mut app)
}
