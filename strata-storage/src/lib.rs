pub mod utf8;
pub mod compression;
pub mod columnar_format;
pub mod block;
pub mod writer;
pub mod reader;

pub use compression::{BlockCodec, Compressor, Decompressor, create_compressor, create_decompressor};
pub use block::{Block, BlockMetadata};
pub use writer::{FileWriter, WriterOptions, FileFooter};
pub use reader::{FileReader, ReaderOptions};
