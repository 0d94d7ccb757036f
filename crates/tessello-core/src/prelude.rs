pub use crate::app::App;
pub use tessello_types::error::{Error, TsResult};
pub use tessello_types::types::{MemberId, OrgId, Patch, TeamId, Timestamp, UserId};

pub use tracing::{debug, debug_span, error, error_span, info, info_span, warn, warn_span};

// vim: ts=4
