pub mod blob;
pub mod identity;
pub mod memory;
pub mod mongo;
pub mod notifier;
pub mod records;
pub mod scope;
pub mod store;
pub mod view;

pub use blob::{BlobStore, LocalBlobStore};
pub use identity::{resolve_caller, CallerIdentity, Session};
pub use memory::InMemoryStore;
pub use mongo::MongoStore;
pub use notifier::{ChangeEvent, ChangeKind, ChangeNotifier, Subscription};
pub use records::RecordsService;
pub use scope::{normalize_patient_key, resolve_on_behalf, resolve_scope, AccessScope};
pub use store::{DocumentRecord, DocumentStore, ProfileStore, RoleStore};
pub use view::{build_views, merge_record, order_views, DocumentView, ViewOrder};
