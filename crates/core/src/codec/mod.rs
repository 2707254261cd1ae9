// Codec Layer - Wire decoding of the jabber:iq:time query
//
// Encoding lives on the payload itself (`TimePayload::to_xml`); decoding
// drives the payload setters element by element.

pub mod decoder;
pub mod error;

pub use decoder::decode;
pub use error::CodecError;
