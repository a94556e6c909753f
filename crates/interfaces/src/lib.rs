pub mod export;
pub mod panel;
pub mod terminal;
pub mod traits;
pub mod view;

pub use export::{MarkdownExporter, TextExporter};
pub use panel::TaskPanel;
pub use terminal::{TerminalInterface, TerminalRenderer};
pub use traits::{Artifact, Exporter, Interface, Renderer};
pub use view::{ScrollState, ViewState};
