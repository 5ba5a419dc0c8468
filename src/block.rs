//! Block framing and the chunked container.
//!
//! Every chunk becomes one block: a 2-bit type marker, a 16-bit big-endian
//! payload bit count, and the payload.  The compressed form carries the
//! `chunk` payload; the stored form carries each input byte widened to 16
//! bits, a quirk of the wire format this crate stays compatible with, which
//! doubles the stored size but leaves the framing self-describing.  The
//! shorter candidate wins and a tie goes to the compressed form.
//!
//! `compress` and `expand` handle whole buffers by splitting into
//! `chunk_size` chunks, concatenating the blocks, and padding the result to
//! whole bytes.  Blocks carry no shared state, so a stream may also be
//! assembled from chunks encoded elsewhere.

use bit_vec::BitVec;
use log::debug;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use crate::tools::bits::{BitReader,put_uint,put_bits};
use crate::chunk;
use crate::{Error,Options};

/// marker + payload bit count, the framing every block starts with
const BLOCK_HEADER_BITS: usize = 18;

/// 2-bit block type markers
#[derive(FromPrimitive,Clone,Copy,PartialEq,Debug)]
enum BlockType {
    Stored = 0b00,
    Huffman = 0b10
}

/// Frame one chunk as a single block, choosing the smaller of the
/// compressed and stored candidates.  A candidate whose bit count does not
/// fit the 16-bit header is ineligible; chunks from `compress` always leave
/// the stored form eligible, so this only fails on oversized ad-hoc chunks.
pub fn encode_chunk(data: &[u8],opts: &Options) -> Result<BitVec,Error> {
    opts.verify()?;
    let payload = chunk::encode_payload(data,opts)?;
    let stored_bits = data.len() * 16;
    let huffman_fits = payload.len() <= 0xffff;
    let stored_fits = stored_bits <= 0xffff;
    if !huffman_fits && !stored_fits {
        return Err(Error::ChunkTooLarge);
    }
    let choose_huffman = huffman_fits && (!stored_fits || payload.len() <= stored_bits);
    debug!("chunk of {} bytes: huffman {} bits, stored {} bits, keeping {}",
        data.len(),payload.len(),stored_bits,match choose_huffman {
            true => "huffman",
            false => "stored"
        });
    let mut ans = BitVec::new();
    if choose_huffman {
        put_uint(&mut ans,BlockType::Huffman as u64,2);
        put_uint(&mut ans,payload.len() as u64,16);
        put_bits(&mut ans,&payload);
    } else {
        put_uint(&mut ans,BlockType::Stored as u64,2);
        put_uint(&mut ans,stored_bits as u64,16);
        for byte in data {
            put_uint(&mut ans,*byte as u64,16);
        }
    }
    Ok(ans)
}

/// read one block off the stream and return the chunk it framed
fn decode_block(rd: &mut BitReader,opts: &Options) -> Result<Vec<u8>,Error> {
    let marker = rd.get_uint(2)?;
    match BlockType::from_u64(marker) {
        Some(BlockType::Huffman) => {
            let payload_bits = rd.get_uint(16)? as usize;
            let payload = rd.take(payload_bits)?;
            chunk::decode_payload(&payload,opts)
        },
        Some(BlockType::Stored) => {
            let payload_bits = rd.get_uint(16)? as usize;
            if payload_bits % 16 != 0 {
                return Err(Error::BadStoredBlock);
            }
            let mut ans: Vec<u8> = Vec::with_capacity(payload_bits/16);
            for _i in 0..payload_bits/16 {
                let word = rd.get_uint(16)?;
                if word > 0xff {
                    return Err(Error::BadStoredBlock);
                }
                ans.push(word as u8);
            }
            Ok(ans)
        },
        None => Err(Error::UnknownBlockType)
    }
}

/// Inverse of `encode_chunk` for a single block.  Up to 7 trailing pad bits
/// are tolerated so a block that went through bytes can come back.
pub fn decode_chunk(bits: &BitVec,opts: &Options) -> Result<Vec<u8>,Error> {
    opts.verify()?;
    let mut rd = BitReader::new(bits);
    let ans = decode_block(&mut rd,opts)?;
    if rd.remaining() >= 8 {
        return Err(Error::TrailingBits);
    }
    Ok(ans)
}

/// Compress a whole buffer: split into `chunk_size` chunks, frame each,
/// concatenate, pad to whole bytes.
pub fn compress(src: &[u8],opts: &Options) -> Result<Vec<u8>,Error> {
    opts.verify()?;
    let mut bits = BitVec::new();
    let mut chunks = 0;
    for data in src.chunks(opts.chunk_size) {
        let block = encode_chunk(data,opts)?;
        put_bits(&mut bits,&block);
        chunks += 1;
    }
    debug!("compressed {} chunks into {} bits",chunks,bits.len());
    Ok(bits.to_bytes())
}

/// Expand a buffer produced by `compress`.  Blocks are read while at least
/// one block header remains; anything shorter is byte padding, and more
/// than 7 leftover bits means the stream is damaged.
pub fn expand(src: &[u8],opts: &Options) -> Result<Vec<u8>,Error> {
    opts.verify()?;
    let bits = BitVec::from_bytes(src);
    let mut rd = BitReader::new(&bits);
    let mut ans = Vec::new();
    while rd.remaining() >= BLOCK_HEADER_BITS {
        ans.append(&mut decode_block(&mut rd,opts)?);
    }
    if rd.remaining() >= 8 {
        return Err(Error::TrailingBits);
    }
    Ok(ans)
}

#[cfg(test)]
use crate::STD_OPTIONS;

#[cfg(test)]
fn test_options(window_size: usize) -> Options {
    Options {
        window_size,
        ..STD_OPTIONS
    }
}

#[cfg(test)]
fn pseudo_random(count: usize) -> Vec<u8> {
    let mut state: u32 = 0x2545f491;
    (0..count).map(|_i| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        (state >> 24) as u8
    }).collect()
}

#[test]
fn stored_block_known_answer() {
    // three literals cannot pay for two embedded codebooks, so the framer
    // stores them: marker 00, 48-bit count, then 16 bits per byte
    let compressed = compress(b"ABC",&STD_OPTIONS).expect("compression failed");
    assert_eq!(compressed,hex::decode("000c001040108010c0").unwrap());
    let expanded = expand(&compressed,&STD_OPTIONS).expect("expansion failed");
    assert_eq!(expanded,b"ABC".to_vec());
}

#[test]
fn incompressible_chunk_is_stored() {
    let data: Vec<u8> = (0..=255).collect();
    let block = encode_chunk(&data,&STD_OPTIONS).expect("encoding failed");
    assert_eq!(block.get(0),Some(false));
    assert_eq!(block.get(1),Some(false));
    assert_eq!(block.len(),BLOCK_HEADER_BITS + 16 * data.len());
    assert_eq!(decode_chunk(&block,&STD_OPTIONS),Ok(data));
}

#[test]
fn repetitive_chunk_is_compressed() {
    let data: Vec<u8> = b"Ban".iter().cycle().take(1200).copied().collect();
    let block = encode_chunk(&data,&STD_OPTIONS).expect("encoding failed");
    assert_eq!(block.get(0),Some(true));
    assert_eq!(block.get(1),Some(false));
    assert!(block.len() < BLOCK_HEADER_BITS + 16 * data.len());
    assert_eq!(decode_chunk(&block,&STD_OPTIONS),Ok(data));
}

#[test]
fn empty_chunk_round_trip() {
    let block = encode_chunk(b"",&STD_OPTIONS).expect("encoding failed");
    assert_eq!(block.len(),BLOCK_HEADER_BITS);
    assert_eq!(decode_chunk(&block,&STD_OPTIONS),Ok(Vec::new()));
    assert_eq!(compress(b"",&STD_OPTIONS),Ok(Vec::new()));
    assert_eq!(expand(b"",&STD_OPTIONS),Ok(Vec::new()));
}

#[test]
fn single_byte_round_trip() {
    let opts = test_options(6);
    let block = encode_chunk(b"A",&opts).expect("encoding failed");
    assert_eq!(decode_chunk(&block,&opts),Ok(b"A".to_vec()));
}

#[test]
fn mixed_text_round_trip_is_deterministic() {
    let data = b"BanBanananananananananananananananvdsvsDvsFVzx";
    let opts = test_options(6);
    let first = compress(data,&opts).expect("compression failed");
    let second = compress(data,&opts).expect("compression failed");
    assert_eq!(first,second);
    assert_eq!(expand(&first,&opts),Ok(data.to_vec()));
}

#[test]
fn chunked_stream_round_trip() {
    // small chunks force several blocks into one stream
    let mut opts = test_options(8);
    opts.chunk_size = 7;
    let data = b"the cat sat on the mat, the cat sat on the mat";
    let compressed = compress(data,&opts).expect("compression failed");
    assert_eq!(expand(&compressed,&opts),Ok(data.to_vec()));
}

#[test]
fn pseudo_random_round_trip() {
    let data = pseudo_random(1024);
    let compressed = compress(&data,&STD_OPTIONS).expect("compression failed");
    assert_eq!(expand(&compressed,&STD_OPTIONS),Ok(data));
}

#[test]
fn window_sweep_round_trip() {
    let data = b"she sells sea shells by the sea shore";
    for window_size in [1,2,3,6,16,4096] {
        let opts = test_options(window_size);
        let compressed = compress(data,&opts).expect("compression failed");
        assert_eq!(expand(&compressed,&opts),Ok(data.to_vec()),"window {}",window_size);
    }
}

#[test]
fn unknown_block_type_rejected() {
    let mut bits = BitVec::new();
    put_uint(&mut bits,0b01,2);
    put_uint(&mut bits,16,16);
    put_uint(&mut bits,0,16);
    assert_eq!(decode_chunk(&bits,&STD_OPTIONS),Err(Error::UnknownBlockType));
}

#[test]
fn damaged_stored_block_rejected() {
    // bit count not a multiple of 16
    let mut bits = BitVec::new();
    put_uint(&mut bits,BlockType::Stored as u64,2);
    put_uint(&mut bits,10,16);
    put_uint(&mut bits,0,10);
    assert_eq!(decode_chunk(&bits,&STD_OPTIONS),Err(Error::BadStoredBlock));
    // stored word does not fit a byte
    let mut bits = BitVec::new();
    put_uint(&mut bits,BlockType::Stored as u64,2);
    put_uint(&mut bits,16,16);
    put_uint(&mut bits,0x100,16);
    assert_eq!(decode_chunk(&bits,&STD_OPTIONS),Err(Error::BadStoredBlock));
}

#[test]
fn truncated_block_rejected() {
    let mut bits = BitVec::new();
    put_uint(&mut bits,BlockType::Huffman as u64,2);
    put_uint(&mut bits,100,16);
    put_uint(&mut bits,0,20);
    assert_eq!(decode_chunk(&bits,&STD_OPTIONS),Err(Error::UnexpectedEof));
}

#[test]
fn trailing_bits_rejected() {
    let mut block = encode_chunk(b"ABC",&STD_OPTIONS).expect("encoding failed");
    for _i in 0..9 {
        block.push(false);
    }
    assert_eq!(decode_chunk(&block,&STD_OPTIONS),Err(Error::TrailingBits));
}

#[test]
fn oversized_ad_hoc_chunk_rejected() {
    // far past both 16-bit length fields with nothing compressible
    let data = pseudo_random(8192);
    assert_eq!(encode_chunk(&data,&STD_OPTIONS),Err(Error::ChunkTooLarge));
}
