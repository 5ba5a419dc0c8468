//! Bit-level reading and writing on top of `bit_vec`.
//!
//! All fixed-width fields in the wire format are big-endian, most significant
//! bit first.  The reader keeps a cursor into a borrowed `BitVec` and fails
//! with `UnexpectedEof` rather than padding when the stream runs out.

use bit_vec::BitVec;
use crate::Error;

/// append the low `width` bits of `value`, most significant bit first
pub fn put_uint(bits: &mut BitVec,value: u64,width: usize) {
    for i in (0..width).rev() {
        bits.push(value >> i & 1 == 1);
    }
}

/// append a copy of `src` to `dst`
pub fn put_bits(dst: &mut BitVec,src: &BitVec) {
    for b in src.iter() {
        dst.push(b);
    }
}

/// Cursor over a borrowed bit vector
pub struct BitReader<'a> {
    bits: &'a BitVec,
    ptr: usize
}

impl <'a> BitReader<'a> {
    pub fn new(bits: &'a BitVec) -> Self {
        Self {
            bits,
            ptr: 0
        }
    }
    pub fn remaining(&self) -> usize {
        self.bits.len() - self.ptr
    }
    pub fn get_bit(&mut self) -> Result<bool,Error> {
        match self.bits.get(self.ptr) {
            Some(bit) => {
                self.ptr += 1;
                Ok(bit)
            },
            None => Err(Error::UnexpectedEof)
        }
    }
    /// read `width` bits as a big-endian unsigned integer
    pub fn get_uint(&mut self,width: usize) -> Result<u64,Error> {
        let mut ans: u64 = 0;
        for _i in 0..width {
            ans <<= 1;
            ans |= self.get_bit()? as u64;
        }
        Ok(ans)
    }
    /// read the next `count` bits into an owned vector
    pub fn take(&mut self,count: usize) -> Result<BitVec,Error> {
        if count > self.remaining() {
            return Err(Error::UnexpectedEof);
        }
        let mut ans = BitVec::new();
        for _i in 0..count {
            ans.push(self.get_bit()?);
        }
        Ok(ans)
    }
}

#[test]
fn uint_round_trip() {
    let mut bits = BitVec::new();
    put_uint(&mut bits,0xbeef,16);
    put_uint(&mut bits,5,3);
    put_uint(&mut bits,0,0);
    put_uint(&mut bits,1,1);
    let mut rd = BitReader::new(&bits);
    assert_eq!(rd.get_uint(16),Ok(0xbeef));
    assert_eq!(rd.get_uint(3),Ok(5));
    assert_eq!(rd.get_uint(0),Ok(0));
    assert_eq!(rd.get_uint(1),Ok(1));
    assert_eq!(rd.remaining(),0);
}

#[test]
fn big_endian_order() {
    let mut bits = BitVec::new();
    put_uint(&mut bits,0b100,3);
    let read: Vec<bool> = bits.iter().collect();
    assert_eq!(read,vec![true,false,false]);
}

#[test]
fn eof_is_an_error() {
    let mut bits = BitVec::new();
    put_uint(&mut bits,3,2);
    let mut rd = BitReader::new(&bits);
    assert_eq!(rd.get_uint(3),Err(crate::Error::UnexpectedEof));
    let mut rd = BitReader::new(&bits);
    assert_eq!(rd.take(5),Err(crate::Error::UnexpectedEof));
}
