//! The `hafalan master` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use hafalan_core::model::{ItemKind, ItemRef, Mastery};
use hafalan_core::practice::Practice;

use super::open_store;

pub async fn execute(
    config_path: Option<PathBuf>,
    kind: ItemKind,
    id: i64,
    unset: bool,
) -> Result<()> {
    let (config, store) = open_store(config_path.as_deref())?;
    let practice = Practice::new(store.as_ref(), store.as_ref(), config.owner_id);

    let item = ItemRef::new(kind, id);
    let state = Mastery::from(!unset);
    practice
        .set_mastery(item, state)
        .await
        .with_context(|| format!("failed to mark {item} as {state}"))?;

    println!("{item} is now {state}.");
    Ok(())
}
