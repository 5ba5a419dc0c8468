//! Per-chunk payload coding: LZSS tokens under two static Huffman codes.
//!
//! The payload starts with the two codebooks, each preceded by a 16-bit
//! big-endian bit count, then the token stream.  Each token leads with a
//! tag bit, `0` for a literal and `1` for a match; the literal byte and the
//! length base code share one codec, distances use the other.  Every
//! literal/length symbol in 0..=287 and every defined distance base code is
//! forced into its frequency table, so the embedded codebooks always cover
//! the full alphabet and any symbol the decoder meets is decodable.
//!
//! The end-of-block symbol 256 and the reserved symbols 286 and 287 are
//! carried in the alphabet but never emitted; the token stream simply ends
//! when the payload does.

use bit_vec::BitVec;
use std::collections::HashMap;
use crate::tools::bits::{BitReader,put_uint,put_bits};
use crate::huffman::Codec;
use crate::lzss::{self,Token};
use crate::tables::{self,DistanceTable};
use crate::{Error,Options};

/// literal/length alphabet enumeration for codebook deserialization
fn litlen_alphabet() -> Vec<u16> {
    (0..tables::LITLEN_SYMBOLS).collect()
}

fn litlen_frequencies(tokens: &[Token]) -> HashMap<u16,u64> {
    let mut freq: HashMap<u16,u64> = HashMap::new();
    for token in tokens {
        match token {
            Token::Literal(byte) => *freq.entry(*byte as u16).or_insert(0) += 1,
            Token::Match { length, .. } => {
                if let Some(code) = tables::length_code(*length) {
                    *freq.entry(code).or_insert(0) += 1;
                }
            }
        }
    }
    for symbol in [tables::END_OF_BLOCK,286,287] {
        *freq.entry(symbol).or_insert(0) += 1;
    }
    for symbol in 0..tables::LITLEN_SYMBOLS {
        freq.entry(symbol).or_insert(1);
    }
    freq
}

fn distance_frequencies(tokens: &[Token],table: &DistanceTable) -> HashMap<u16,u64> {
    let mut freq: HashMap<u16,u64> = HashMap::new();
    for token in tokens {
        if let Token::Match { distance, .. } = token {
            if let Some(code) = table.code(*distance) {
                *freq.entry(code).or_insert(0) += 1;
            }
        }
    }
    for symbol in table.alphabet() {
        freq.entry(symbol).or_insert(1);
    }
    freq
}

/// Encode one chunk into the compressed payload, exclusive of block framing.
/// Any byte input is encodable; the empty chunk yields codebooks and an
/// empty token stream.
pub fn encode_payload(data: &[u8],opts: &Options) -> Result<BitVec,Error> {
    opts.verify()?;
    let tokens = lzss::factorize(data,opts);
    let dist_table = DistanceTable::new(opts.window_size);
    let litlen_codec = Codec::from_frequencies(&litlen_frequencies(&tokens));
    let dist_codec = Codec::from_frequencies(&distance_frequencies(&tokens,&dist_table));
    let mut ans = BitVec::new();
    let litlen_book = litlen_codec.bitwise();
    put_uint(&mut ans,litlen_book.len() as u64,16);
    put_bits(&mut ans,&litlen_book);
    let dist_book = dist_codec.bitwise();
    put_uint(&mut ans,dist_book.len() as u64,16);
    put_bits(&mut ans,&dist_book);
    for token in &tokens {
        match token {
            Token::Literal(byte) => {
                ans.push(false);
                litlen_codec.encode(*byte as u16,&mut ans)?;
            },
            Token::Match { length, distance } => {
                ans.push(true);
                let code = tables::length_code(*length).ok_or(Error::BadLength)?;
                let (lo,_hi) = tables::length_range(code).ok_or(Error::BadLength)?;
                litlen_codec.encode(code,&mut ans)?;
                put_uint(&mut ans,(*length - lo) as u64,tables::length_extra_bits(code));
                let code = dist_table.code(*distance).ok_or(Error::BadDistance)?;
                let (lo,_hi) = dist_table.range(code).ok_or(Error::BadDistance)?;
                dist_codec.encode(code,&mut ans)?;
                put_uint(&mut ans,(*distance - lo) as u64,DistanceTable::extra_bits(code));
            }
        }
    }
    Ok(ans)
}

/// read one token off the stream, `None` when the payload is exhausted
fn decode_token(rd: &mut BitReader,litlen_codec: &Codec,dist_codec: &Codec,
        dist_table: &DistanceTable,opts: &Options) -> Result<Option<Token>,Error> {
    if rd.remaining() == 0 {
        return Ok(None);
    }
    if !rd.get_bit()? {
        let symbol = litlen_codec.decode_next(rd)?;
        if symbol > 255 {
            return Err(Error::UnknownSymbol);
        }
        return Ok(Some(Token::Literal(symbol as u8)));
    }
    let code = litlen_codec.decode_next(rd)?;
    let (lo,hi) = tables::length_range(code).ok_or(Error::BadLength)?;
    let length = lo + rd.get_uint(tables::length_extra_bits(code))? as usize;
    if length > hi || length < opts.min_match || length > opts.max_match {
        return Err(Error::BadLength);
    }
    let code = dist_codec.decode_next(rd)?;
    let (lo,hi) = dist_table.range(code).ok_or(Error::BadDistance)?;
    let distance = lo + rd.get_uint(DistanceTable::extra_bits(code))? as usize;
    if distance > hi || distance > opts.window_size {
        return Err(Error::BadDistance);
    }
    Ok(Some(Token::Match { length, distance }))
}

/// Decode a payload produced by `encode_payload`.  The payload must span
/// `bits` exactly; the caller strips the block framing first.
pub fn decode_payload(bits: &BitVec,opts: &Options) -> Result<Vec<u8>,Error> {
    opts.verify()?;
    let mut rd = BitReader::new(bits);
    let dist_table = DistanceTable::new(opts.window_size);
    let book_bits = rd.get_uint(16)? as usize;
    let litlen_codec = Codec::from_bitwise(&rd.take(book_bits)?,&litlen_alphabet())?;
    let book_bits = rd.get_uint(16)? as usize;
    let dist_codec = Codec::from_bitwise(&rd.take(book_bits)?,&dist_table.alphabet())?;
    let mut tokens = Vec::new();
    while let Some(token) = decode_token(&mut rd,&litlen_codec,&dist_codec,&dist_table,opts)? {
        tokens.push(token);
    }
    if tokens.is_empty() {
        return Ok(Vec::new());
    }
    lzss::reconstruct(&tokens)
}

#[cfg(test)]
fn test_options(window_size: usize) -> Options {
    Options {
        window_size,
        ..crate::STD_OPTIONS
    }
}

#[test]
fn payload_round_trip() {
    let opts = test_options(6);
    for data in [&b"BanBanBan"[..],b"A",b"the cat sat on the mat on the cat"] {
        let payload = encode_payload(data,&opts).expect("encoding failed");
        assert_eq!(decode_payload(&payload,&opts),Ok(data.to_vec()));
    }
}

#[test]
fn empty_chunk_round_trip() {
    let opts = test_options(6);
    let payload = encode_payload(b"",&opts).expect("encoding failed");
    assert_eq!(decode_payload(&payload,&opts),Ok(Vec::new()));
}

#[test]
fn codebooks_cover_the_alphabets() {
    let opts = test_options(6);
    let tokens = lzss::factorize(b"BanBanBan",&opts);
    let litlen_codec = Codec::from_frequencies(&litlen_frequencies(&tokens));
    assert_eq!(litlen_codec.symbol_count(),288);
    let dist_table = DistanceTable::new(6);
    let dist_codec = Codec::from_frequencies(&distance_frequencies(&tokens,&dist_table));
    assert_eq!(dist_codec.symbol_count(),5);
}

#[test]
fn frequent_symbols_get_short_codes() {
    let data = b"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaab";
    let opts = test_options(2); // keep everything literal
    let tokens = lzss::factorize(data,&opts);
    let codec = Codec::from_frequencies(&litlen_frequencies(&tokens));
    assert!(codec.code_length(b'a' as u16) < codec.code_length(b'b' as u16));
}

#[test]
fn truncated_payload_rejected() {
    let opts = test_options(6);
    let payload = encode_payload(b"BanBanBan",&opts).expect("encoding failed");
    let mut clipped = BitVec::new();
    for (i,b) in payload.iter().enumerate() {
        if i + 3 < payload.len() {
            clipped.push(b);
        }
    }
    assert!(decode_payload(&clipped,&opts).is_err());
}

#[test]
fn oversized_book_length_rejected() {
    let mut bits = BitVec::new();
    put_uint(&mut bits,0xffff,16);
    assert_eq!(decode_payload(&bits,&test_options(6)),Err(Error::UnexpectedEof));
}
