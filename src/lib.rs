//! # Chunkflate Library
//!
//! Compress or expand byte streams with a DEFLATE-like block format
//! * `lzss` factors a chunk into literals and back-references over a sliding window
//! * `huffman` builds the per-chunk prefix codes and the inline codebook serialization
//! * `tables` maps lengths and distances to base codes with extra bits
//! * `chunk` assembles the compressed payload for one chunk
//! * `block` frames each chunk as a stored or compressed block, whichever is smaller
//!
//! No state is carried between chunks, so every block in the output stream is
//! independently decodable.  The stored block writes 16 bits per input byte;
//! this matches the wire format this crate is compatible with, see `block`.
//!
//! ## Buffer Example
//!
//! ```rs
//! use chunkflate::*;
//! let test_data = "I am Sam. Sam I am. I do not like this Sam I am.".as_bytes();
//! let compressed = block::compress(test_data,&STD_OPTIONS).expect("compression failed");
//! let expanded = block::expand(&compressed,&STD_OPTIONS).expect("expansion failed");
//! assert_eq!(test_data.to_vec(),expanded);
//! ```

mod tools;
pub mod tables;
pub mod huffman;
pub mod lzss;
pub mod chunk;
pub mod block;

/// Codec Errors
#[derive(thiserror::Error,Debug,PartialEq,Eq)]
pub enum Error {
    #[error("invalid compression options")]
    InvalidOptions,
    #[error("chunk too large to frame")]
    ChunkTooLarge,
    #[error("unexpected end of bitstream")]
    UnexpectedEof,
    #[error("unrecognized block type")]
    UnknownBlockType,
    #[error("malformed codebook")]
    BadCodebook,
    #[error("symbol not in codec")]
    UnknownSymbol,
    #[error("length out of range")]
    BadLength,
    #[error("distance out of range")]
    BadDistance,
    #[error("malformed stored block")]
    BadStoredBlock,
    #[error("trailing bits in stream")]
    TrailingBits,
    #[error("empty token list")]
    EmptyTokenList
}

/// Options controlling compression
#[derive(Clone)]
pub struct Options {
    /// size of the sliding window, i.e., farthest distance a back-reference can travel
    pub window_size: usize,
    /// minimum length of match that will be tokenized
    pub min_match: usize,
    /// maximum length of match that will be tokenized
    pub max_match: usize,
    /// how many input bytes go into one block
    pub chunk_size: usize
}

pub const STD_OPTIONS: Options = Options {
    window_size: 32768,
    min_match: tables::MIN_MATCH,
    max_match: tables::MAX_MATCH,
    chunk_size: 1024
};

/// Largest chunk whose stored form still fits the 16-bit length header
/// (each stored byte takes 16 bits on the wire).
pub const MAX_CHUNK_SIZE: usize = 0xffff / 16;

impl Options {
    /// Check the options against the wire format.  The length code table
    /// starts at 3, so smaller `min_match` values cannot be encoded.
    pub fn verify(&self) -> Result<(),Error> {
        if self.window_size < 1 || self.chunk_size < 1 {
            return Err(Error::InvalidOptions);
        }
        if self.chunk_size > MAX_CHUNK_SIZE {
            return Err(Error::InvalidOptions);
        }
        if self.min_match < tables::MIN_MATCH || self.max_match > tables::MAX_MATCH {
            return Err(Error::InvalidOptions);
        }
        if self.max_match <= self.min_match {
            return Err(Error::InvalidOptions);
        }
        Ok(())
    }
}

#[test]
fn options_are_checked() {
    assert!(STD_OPTIONS.verify().is_ok());
    let mut opt = STD_OPTIONS.clone();
    opt.window_size = 0;
    assert_eq!(opt.verify(),Err(Error::InvalidOptions));
    opt = STD_OPTIONS.clone();
    opt.min_match = 2;
    assert_eq!(opt.verify(),Err(Error::InvalidOptions));
    opt = STD_OPTIONS.clone();
    opt.max_match = opt.min_match;
    assert_eq!(opt.verify(),Err(Error::InvalidOptions));
    opt = STD_OPTIONS.clone();
    opt.chunk_size = MAX_CHUNK_SIZE + 1;
    assert_eq!(opt.verify(),Err(Error::InvalidOptions));
}
