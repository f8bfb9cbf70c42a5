use clap::Parser;
use log::{debug, info, warn};
use media_picker::{
    FsMediaLibrary, FsPermission, MediaItem, Navigator, PickerConfig, ViewCoordinator,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc;
use std::time::Duration;

/// Mounts the media picker on a directory and prints the picked item ids.
#[derive(Parser)]
#[command(name = "media-picker")]
struct Args {
    /// Library root; every media file below it is listed under Recents.
    root: PathBuf,

    /// Maximum number of items that can be selected.
    #[arg(long = "max", default_value_t = 10)]
    max_selection: usize,

    /// Id of an item selected in a previous session. Repeatable.
    #[arg(long = "select")]
    selected: Vec<String>,

    /// Select the first N items of the current album before exiting.
    #[arg(long, default_value_t = 0)]
    pick: usize,

    /// Stay mounted for this many seconds to observe library changes.
    #[arg(long, value_name = "SECS")]
    watch: Option<u64>,
}

/// Logs the return instead of popping a real navigation stack.
struct LogNavigator;

impl Navigator for LogNavigator {
    fn pop(&self) {
        info!("Returning from picker");
    }
}

fn log_albums(picker: &ViewCoordinator) {
    let view = picker.view();
    info!(
        "Permission {:?}, loading {:?}, {} albums",
        view.permission,
        view.loading,
        view.albums.len()
    );
    for album in &view.albums {
        let marker = if album.is_selected { "*" } else { " " };
        info!("{} {} ({} items)", marker, album.name, album.asset_count);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(debug_assertions)]
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Debug)
        .init();
    #[cfg(not(debug_assertions))]
    env_logger::init();

    let Args {
        root,
        max_selection,
        selected,
        pick,
        watch,
    } = Args::parse();
    let config = PickerConfig::new(max_selection)?.with_selected_asset_ids(selected);

    let (tx, rx) = mpsc::channel::<Vec<MediaItem>>();
    let picker = ViewCoordinator::new(
        config,
        Arc::new(FsMediaLibrary::new(root.clone())),
        Arc::new(FsPermission::new(root.clone())),
        Arc::new(LogNavigator),
        Some(Box::new(move |items: Vec<MediaItem>| {
            let _ = tx.send(items);
        })),
    );
    picker.subscribe(|event| debug!("Picker event: {:?}", event));

    async_std::task::block_on(async {
        picker.mount().await;
        picker.finish_transitions();
        log_albums(&picker);

        if !picker.has_access() {
            warn!("No access to {}", root.display());
            return;
        }

        if pick > 0 {
            picker.activate_multi_select();
            picker.finish_transitions();
            let assets = picker
                .selected_album()
                .map(|album| album.assets)
                .unwrap_or_default();
            for item in assets.into_iter().take(pick) {
                if !picker.toggle(item) {
                    warn!("Selection is full");
                    break;
                }
            }
        }

        if let Some(duration) = watch.map(Duration::from_secs) {
            info!("Watching {} for {:?}", root.display(), duration);
            async_std::task::sleep(duration).await;
            log_albums(&picker);
        }
    });

    picker.exit();
    for item in rx.try_iter().flatten() {
        println!("{}", item.id);
    }

    Ok(())
}
