//! AMQP 1.0 type system codec.
//!
//! Decoding runs over a [`ChunkedCursor`](amqp_buffers::ChunkedCursor) fed
//! with socket chunks. [`ValueHandler::decode`] returns `Ok(None)` while the
//! buffered bytes are an incomplete prefix of a value and the stream is not
//! finished, and [`DecodeError`] once the bytes cannot be a valid encoding.
//! [`StreamingDecoder`] wraps both for a stream of consecutive values.
//!
//! Encoding picks the smallest wire form that decodes back to the same
//! [`AmqpValue`].

mod compound;
mod config;
mod constants;
mod described;
mod encoder;
mod error;
mod handler;
mod primitive;
mod registry;
mod streaming;
mod types;
mod value;

pub use config::DecoderConfig;
pub use constants::TypeCode;
pub use encoder::{encode, encode_into, encoded_size, AmqpEncoder};
pub use error::{DecodeError, EncodeError};
pub use handler::ValueHandler;
pub use registry::{Constructor, TypeRegistry, Width};
pub use streaming::StreamingDecoder;
pub use types::AmqpType;
pub use value::{AmqpArray, AmqpValue, Described, Symbol};
