mod persistence;
pub mod schema;
pub mod share;
mod store;

pub use persistence::{MANUAL_MENUS_KEY, MENU_SOURCE_KEY, MenuSource, Persistence, STATE_KEY};
pub use schema::Restored;
pub use share::{SHARE_PREFIX, export_portable, import_portable, share_url};
pub use store::{FileStore, KeyValueStore, MemoryStore};
