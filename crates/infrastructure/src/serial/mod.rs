mod discovery;
mod tokio_link;

pub use discovery::{DEFAULT_KEYWORDS, SystemPortDiscovery};
pub use tokio_link::{TokioSerialLink, TokioSerialOpener};
