//! Size-bounded splitting of flow batches into IPFIX data messages.
//!
//! A [`FlowFile`] groups already-captured records by template. The
//! [`Fragmenter`] packs each group into as few messages as the configured
//! message length allows and stamps every message with the running record
//! count as its sequence number.

pub mod error;
pub mod flow_file;
pub mod fragmenter;

pub use error::FragmentationError;
pub use flow_file::{FlowFile, FlowGroup};
pub use fragmenter::{FragmentBatch, Fragmenter, records_per_message};
