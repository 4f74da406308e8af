pub mod dispatch;
pub mod error;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use dispatch::{DispatchCall, DispatchOutcome, Dispatcher};
pub use error::{CoreError, CoreResult};
pub use types::{
    BodyType, CascadeSummary, Collection, Entity, HttpMethod, NewParam, NewRequest, NewResponse,
    Param, ParamUpdate, RequestRecord, ResponseRecord, ResponseUpdate,
};
pub use validation::ValidationError;
