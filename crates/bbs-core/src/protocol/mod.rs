//! Protocol module containing the request model and the wire codec.

pub mod codec;
pub mod request;

pub use codec::{decode_text, encode_request, encode_username, CodecError};
pub use request::{Request, DEFAULT_GROUP};
