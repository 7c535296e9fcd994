//! Command encoders and response decoders for every Si4735 command used by the driver
//!
//! Commands are built as fixed-size byte arrays (`xxx_cmd`/`xxx_req`) and responses are
//! thin wrappers over fixed-size buffers with typed accessors. Property values are
//! packed by the `xxx_value` helpers and sent with [`set_property_cmd`](cmd_system::set_property_cmd).

pub mod cmd_system;
pub mod cmd_tune;
pub mod cmd_rds;
pub mod cmd_ssb;

pub use cmd_tune::{Sideband, TuneCmd};
