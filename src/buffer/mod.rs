pub mod reader;
pub mod writer;

pub use reader::ByteReader;
pub use writer::ByteWriter;
