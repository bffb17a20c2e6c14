pub mod item;
pub mod memory;
pub mod mock;
pub mod traits;

pub use item::{CatalogItem, CoverArt, MusicAction, SourceInfo};
pub use memory::MemoryCatalog;
pub use mock::{Deferred, MockCatalog, MockResponse};
pub use traits::{CatalogFuture, CatalogSource};
