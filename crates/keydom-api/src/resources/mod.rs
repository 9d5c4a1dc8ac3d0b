// Resource clients
//
// One client per server-side entity type. Each holds a clone of the
// session handle and issues exactly one request per operation through the
// session's dispatch helpers. Payload structs document the shapes the
// server expects; any `Serialize` body is forwarded unchanged.

pub mod access_medias;
pub mod profiles;
pub mod visitors;
pub mod visits;

pub use access_medias::{AccessMediaClient, AccessMediaInsert, AccessMediaUpdate};
pub use profiles::ProfileClient;
pub use visitors::{VisitorClient, VisitorInsert, VisitorUpdate};
pub use visits::{VisitClient, VisitInsert};

/// Query key under which record ids are sent.
pub(crate) const ID_PARAM: &str = "uuid";
