pub mod file_watcher;
pub mod preview;
pub mod renderer;

pub use file_watcher::{FileChangeEvent, FileWatcher};
pub use preview::{PreviewOutcome, PreviewService, PreviewWriter};
pub use renderer::{render_blocking, RenderOutput, RenderService};
