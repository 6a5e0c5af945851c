use std::path::PathBuf;

use crate::db::open_db;
use crate::error::Result;
use crate::settings::{expand_home, load_settings, save_settings};

pub fn run(data_dir: Option<String>, db_override: Option<&str>) -> Result<()> {
    let mut settings = load_settings();

    if let Some(dir) = data_dir {
        settings.data_dir = expand_home(&dir);
        save_settings(&settings)?;
    } else if db_override.is_none() {
        save_settings(&settings)?;
    }

    let db_path = match db_override {
        Some(path) => PathBuf::from(expand_home(path)),
        None => settings.db_path(),
    };
    open_db(&db_path)?;

    println!("Initialized gofinances at {}", db_path.display());
    Ok(())
}
