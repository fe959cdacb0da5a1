// Model types for requests to and responses from the cluster surfaces

pub mod overlay;
pub mod request;
pub mod response;

pub use overlay::OverlayEntry;
pub use request::{
    BootstrapRequest, ConsistencyModel, ManagementAction, MemberAction, Modification,
    QueryRequest, WorkerId,
};
pub use response::{MemberEnvelope, error_message, is_truthy};
