//! Storefront: the client side of the menu.
//!
//! # Parts
//!
//! - **storage**: persisted client state (cart, admin flag, settings)
//! - **remote**: catalog endpoint and image upload clients
//! - **menu_store**, **cart**, **session**: the stores the shell owns
//! - **i18n**: UI strings
//! - **view**: HTML rendering
//! - **shell**: [`App`], which ties the above together
//!
//! # Usage
//!
//! ```ignore
//! let storage = Arc::new(FileStorage::open(&path)?);
//! let remote = MenuClient::new("https://menu.example");
//! let mut app = App::start(storage, Some(&remote)).await;
//! app.add_to_cart("p7");
//! let html = app.render();
//! ```

pub mod cart;
pub mod i18n;
pub mod menu_store;
pub mod remote;
pub mod session;
pub mod shell;
pub mod storage;
pub mod view;

pub use cart::{CartItem, CartStore};
pub use menu_store::{MenuStore, SaveOutcome, SaveStatus};
pub use remote::{ApiError, CatalogRemote, ImageUploader, MenuClient, UploadClient};
pub use session::{AdminSession, SettingsError};
pub use shell::App;
pub use storage::{FileStorage, LocalStorage, MemoryStorage, StorageError};
pub use view::ShopInfo;
