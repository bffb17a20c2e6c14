pub mod console;
pub mod recording;
pub mod traits;

pub use console::{ConsoleInput, ConsoleSurface};
pub use recording::{RecordingInput, RecordingSurface, SurfaceLog};
pub use traits::{
    FocusEvent, InputSurface, ListProperty, ListRow, ListSurface, ListWindow, RowImage, SurfaceId,
};
