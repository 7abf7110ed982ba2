//! WebSocket transport and wire codec.
//!
//! - [`codec`] — decodes raw text frames into [`codec::InboundEvent`] and
//!   encodes outbound commands.
//! - [`stream`] — [`stream::StreamClient`], the generic full-duplex
//!   connection wrapper shared by the public and private streams.

pub mod codec;
pub mod stream;
