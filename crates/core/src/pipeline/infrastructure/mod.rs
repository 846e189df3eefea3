pub mod quit_listener;
pub mod snapshot_preview;
