pub mod rle;

pub use rle::{decode_rle, encode_rle, RleDecodeError};
