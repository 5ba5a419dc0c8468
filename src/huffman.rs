//! Static Huffman coding with an inline codebook serialization.
//!
//! Codes are derived per chunk from symbol frequencies and shipped inside the
//! block, so the decoder needs nothing but the alphabet enumeration.  The
//! construction is the classical min-heap merge; clusters order by
//! `(weight, sorted symbols)` so equal weights break ties on symbol content
//! and identical frequency tables always yield identical codebooks.

use bit_vec::BitVec;
use std::collections::HashMap;
use std::collections::BinaryHeap;
use std::cmp::Reverse;
use crate::tools::bits::{BitReader,put_uint,put_bits};
use crate::Error;

/// heap element: a set of symbols sharing a subtree, ordering is
/// derived on (weight, symbols) with the symbol vector kept sorted
#[derive(PartialEq,Eq,PartialOrd,Ord)]
struct Cluster {
    weight: u64,
    symbols: Vec<u16>
}

/// Bidirectional symbol-to-codeword map forming a prefix code
pub struct Codec {
    codes: HashMap<u16,BitVec>,
    symbols: HashMap<BitVec,u16>,
    max_len: usize
}

impl Codec {
    fn empty() -> Self {
        Self {
            codes: HashMap::new(),
            symbols: HashMap::new(),
            max_len: 0
        }
    }
    /// record a codeword in both directions, rejecting duplicates and
    /// zero-length codewords, which cannot occur in a prefix code
    fn insert(&mut self,symbol: u16,code: BitVec) -> Result<(),Error> {
        if code.is_empty() {
            return Err(Error::BadCodebook);
        }
        if self.max_len < code.len() {
            self.max_len = code.len();
        }
        if self.symbols.insert(code.clone(),symbol).is_some() {
            return Err(Error::BadCodebook);
        }
        if self.codes.insert(symbol,code).is_some() {
            return Err(Error::BadCodebook);
        }
        Ok(())
    }
    /// Build the codec from a frequency table.  Symbols with zero frequency
    /// should not appear in the table; a lone symbol gets the codeword `0`.
    pub fn from_frequencies(freq: &HashMap<u16,u64>) -> Self {
        let mut ans = Self::empty();
        if freq.len() == 1 {
            for symbol in freq.keys() {
                let mut code = BitVec::new();
                code.push(false);
                // fresh codec, insert cannot collide
                let _ = ans.insert(*symbol,code);
            }
            return ans;
        }
        let mut scratch: HashMap<u16,Vec<bool>> = freq.keys().map(|s| (*s,Vec::new())).collect();
        let mut heap: BinaryHeap<Reverse<Cluster>> = freq.iter()
            .map(|(s,w)| Reverse(Cluster { weight: *w, symbols: vec![*s] }))
            .collect();
        while heap.len() > 1 {
            if let (Some(Reverse(first)),Some(Reverse(second))) = (heap.pop(),heap.pop()) {
                for s in &first.symbols {
                    if let Some(code) = scratch.get_mut(s) {
                        code.insert(0,false);
                    }
                }
                for s in &second.symbols {
                    if let Some(code) = scratch.get_mut(s) {
                        code.insert(0,true);
                    }
                }
                let mut merged = [first.symbols,second.symbols].concat();
                merged.sort_unstable();
                heap.push(Reverse(Cluster { weight: first.weight + second.weight, symbols: merged }));
            }
        }
        for (symbol,code) in scratch {
            let _ = ans.insert(symbol,code.into_iter().collect());
        }
        ans
    }
    /// append the codeword for `symbol` to `out`
    pub fn encode(&self,symbol: u16,out: &mut BitVec) -> Result<(),Error> {
        match self.codes.get(&symbol) {
            Some(code) => {
                put_bits(out,code);
                Ok(())
            },
            None => Err(Error::UnknownSymbol)
        }
    }
    /// consume bits from the reader until a codeword matches
    pub fn decode_next(&self,rd: &mut BitReader) -> Result<u16,Error> {
        let mut probe = BitVec::new();
        loop {
            probe.push(rd.get_bit()?);
            if probe.len() > self.max_len {
                return Err(Error::BadCodebook);
            }
            if let Some(symbol) = self.symbols.get(&probe) {
                return Ok(*symbol);
            }
        }
    }
    /// decode a whole bit string, failing on a dangling partial codeword
    pub fn decode(&self,bits: &BitVec) -> Result<Vec<u16>,Error> {
        let mut rd = BitReader::new(bits);
        let mut ans = Vec::new();
        while rd.remaining() > 0 {
            ans.push(self.decode_next(&mut rd)?);
        }
        Ok(ans)
    }
    /// Serialize the codebook: for each symbol in ascending order, an 8-bit
    /// big-endian codeword length followed by the codeword itself.  The
    /// alphabet enumeration is implicit and supplied again on deserialization.
    pub fn bitwise(&self) -> BitVec {
        let mut symbols: Vec<u16> = self.codes.keys().copied().collect();
        symbols.sort_unstable();
        let mut ans = BitVec::new();
        for symbol in symbols {
            if let Some(code) = self.codes.get(&symbol) {
                put_uint(&mut ans,code.len() as u64,8);
                put_bits(&mut ans,code);
            }
        }
        ans
    }
    /// Inverse of `bitwise`.  The section must contain exactly one entry per
    /// alphabet symbol and nothing else.
    pub fn from_bitwise(bits: &BitVec,alphabet: &[u16]) -> Result<Self,Error> {
        let mut ans = Self::empty();
        let mut rd = BitReader::new(bits);
        for symbol in alphabet {
            let code_length = rd.get_uint(8)? as usize;
            let code = rd.take(code_length)?;
            ans.insert(*symbol,code)?;
        }
        if rd.remaining() > 0 {
            return Err(Error::BadCodebook);
        }
        Ok(ans)
    }
    /// count of symbols covered by this codec
    pub fn symbol_count(&self) -> usize {
        self.codes.len()
    }
    /// codeword length for a symbol, for inspection and tests
    pub fn code_length(&self,symbol: u16) -> Option<usize> {
        self.codes.get(&symbol).map(|code| code.len())
    }
}

#[cfg(test)]
fn codec_from(pairs: &[(u16,u64)]) -> Codec {
    let freq: HashMap<u16,u64> = pairs.iter().copied().collect();
    Codec::from_frequencies(&freq)
}

#[cfg(test)]
fn code_string(codec: &Codec,symbol: u16) -> String {
    codec.codes.get(&symbol).map(|code| {
        code.iter().map(|b| if b { '1' } else { '0' }).collect()
    }).unwrap_or_default()
}

#[test]
fn deterministic_codes() {
    // hand-run of the merge: 2 and 3 pair first, then 1 joins them,
    // leaving the heavy 0 as a one-bit code
    let codec = codec_from(&[(0,5),(1,2),(2,1),(3,1)]);
    assert_eq!(code_string(&codec,0),"1");
    assert_eq!(code_string(&codec,1),"00");
    assert_eq!(code_string(&codec,2),"010");
    assert_eq!(code_string(&codec,3),"011");
}

#[test]
fn single_symbol_gets_zero() {
    let codec = codec_from(&[(42,7)]);
    assert_eq!(code_string(&codec,42),"0");
    assert_eq!(codec.symbol_count(),1);
}

#[test]
fn prefix_property() {
    let codec = codec_from(&[(0,9),(1,7),(2,5),(3,3),(4,3),(5,1),(6,1),(7,1)]);
    let codes: Vec<BitVec> = codec.codes.values().cloned().collect();
    for a in &codes {
        for b in &codes {
            if a != b {
                let head: BitVec = b.iter().take(a.len()).collect();
                assert_ne!(*a,head);
            }
        }
    }
}

#[test]
fn optimality() {
    let codec = codec_from(&[(10,100),(11,20),(12,20),(13,5),(14,1)]);
    let pairs = [(10u16,100u64),(11,20),(12,20),(13,5),(14,1)];
    for (a,fa) in pairs {
        for (b,fb) in pairs {
            if fa > fb {
                assert!(codec.code_length(a) <= codec.code_length(b));
            }
        }
    }
}

#[test]
fn encode_decode_round_trip() {
    let codec = codec_from(&[(0,4),(1,3),(2,2),(3,1)]);
    let message = [0u16,1,2,3,3,2,1,0,0,1];
    let mut bits = BitVec::new();
    for s in message {
        codec.encode(s,&mut bits).expect("encode failed");
    }
    assert_eq!(codec.decode(&bits),Ok(message.to_vec()));
}

#[test]
fn dangling_bits_rejected() {
    let codec = codec_from(&[(0,4),(1,3),(2,2),(3,1)]);
    let mut bits = BitVec::new();
    codec.encode(3,&mut bits).expect("encode failed");
    bits.pop();
    assert!(codec.decode(&bits).is_err());
}

#[test]
fn bitwise_round_trip() {
    let alphabet = [5u16,6,7,8];
    let codec = codec_from(&[(5,4),(6,3),(7,2),(8,1)]);
    let serialized = codec.bitwise();
    let restored = Codec::from_bitwise(&serialized,&alphabet).expect("deserialize failed");
    for s in alphabet {
        assert_eq!(code_string(&codec,s),code_string(&restored,s));
    }
    // a truncated section is rejected
    let mut short = serialized.clone();
    short.pop();
    assert_eq!(Codec::from_bitwise(&short,&alphabet).err(),Some(Error::UnexpectedEof));
    // a section with leftover bits is rejected
    let mut long = serialized.clone();
    long.push(false);
    assert_eq!(Codec::from_bitwise(&long,&alphabet).err(),Some(Error::BadCodebook));
}

#[test]
fn build_is_reproducible() {
    let pairs: Vec<(u16,u64)> = (0..64).map(|s| (s as u16,(s % 7 + 1) as u64)).collect();
    let first = codec_from(&pairs);
    let second = codec_from(&pairs);
    assert_eq!(first.bitwise(),second.bitwise());
}
