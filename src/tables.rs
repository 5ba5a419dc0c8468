//! Base-code tables for match lengths and distances.
//!
//! A match length or distance is sent as a Huffman-coded *base code* followed
//! by a fixed number of raw extra bits selecting the exact value inside the
//! code's range.  The length table is a constant of the wire format; the
//! distance table depends on the window size and is built per configuration,
//! with the last code's range clipped at the window size.

/// minimum match length encodable by the length code table
pub const MIN_MATCH: usize = 3;
/// maximum match length encodable by the length code table
pub const MAX_MATCH: usize = 258;
/// end-of-block marker, reserved in the literal/length alphabet
pub const END_OF_BLOCK: u16 = 256;
/// the literal/length alphabet is 0..=255 literals, 256 end-of-block,
/// 257..=285 length codes, 286 and 287 reserved
pub const LITLEN_SYMBOLS: u16 = 288;

/// (base code, lowest length, highest length), extra bits are implied
const LENGTH_RANGES: [(u16,usize,usize);29] = [
    (257,3,3),
    (258,4,4),
    (259,5,5),
    (260,6,6),
    (261,7,7),
    (262,8,8),
    (263,9,9),
    (264,10,10),
    (265,11,12),
    (266,13,14),
    (267,15,16),
    (268,17,18),
    (269,19,22),
    (270,23,26),
    (271,27,30),
    (272,31,34),
    (273,35,42),
    (274,43,50),
    (275,51,58),
    (276,59,66),
    (277,67,82),
    (278,83,98),
    (279,99,114),
    (280,115,130),
    (281,131,162),
    (282,163,194),
    (283,195,226),
    (284,227,257),
    (285,258,258)
];

/// base code for a raw match length, None if outside 3..=258
pub fn length_code(length: usize) -> Option<u16> {
    for (code,lo,hi) in LENGTH_RANGES {
        if length >= lo && length <= hi {
            return Some(code);
        }
    }
    None
}

/// (lowest, highest) length covered by a base code
pub fn length_range(code: u16) -> Option<(usize,usize)> {
    for (c,lo,hi) in LENGTH_RANGES {
        if c == code {
            return Some((lo,hi));
        }
    }
    None
}

/// count of raw bits following a length base code
pub fn length_extra_bits(code: u16) -> usize {
    if (257..=264).contains(&code) || code == 285 {
        return 0;
    }
    (code as usize - 265) / 4 + 1
}

/// Distance base codes for a given window size.  Codes 0..=3 cover
/// distances 1..=4 outright; from code 4 on, codes come in pairs sharing
/// an extra-bit count that grows by one at every even code.
pub struct DistanceTable {
    ranges: Vec<(usize,usize)>
}

impl DistanceTable {
    /// `window_size` must be positive
    pub fn new(window_size: usize) -> Self {
        let mut ranges = vec![(1,1),(2,2),(3,3),(4,4)];
        let mut lo: usize = 5;
        let mut code: usize = 4;
        let mut extra: usize = 0;
        while lo <= window_size {
            if code % 2 == 0 {
                extra += 1;
            }
            let hi = std::cmp::min(lo + (1 << extra) - 1,window_size);
            ranges.push((lo,hi));
            lo = hi + 1;
            code += 1;
        }
        Self {
            ranges
        }
    }
    /// base code for a raw distance, None if no code covers it
    pub fn code(&self,distance: usize) -> Option<u16> {
        for (code,(lo,hi)) in self.ranges.iter().enumerate() {
            if distance >= *lo && distance <= *hi {
                return Some(code as u16);
            }
        }
        None
    }
    /// (lowest, highest) distance covered by a base code
    pub fn range(&self,code: u16) -> Option<(usize,usize)> {
        self.ranges.get(code as usize).copied()
    }
    /// count of raw bits following a distance base code
    pub fn extra_bits(code: u16) -> usize {
        if code <= 3 {
            return 0;
        }
        (code as usize - 4) / 2 + 1
    }
    /// highest base code defined for this window
    pub fn max_code(&self) -> u16 {
        self.ranges.len() as u16 - 1
    }
    /// every defined base code in ascending order
    pub fn alphabet(&self) -> Vec<u16> {
        (0..self.ranges.len() as u16).collect()
    }
}

#[test]
fn length_codes() {
    assert_eq!(length_code(3),Some(257));
    assert_eq!(length_code(10),Some(264));
    assert_eq!(length_code(11),Some(265));
    assert_eq!(length_code(19),Some(269));
    assert_eq!(length_code(22),Some(269));
    assert_eq!(length_code(257),Some(284));
    assert_eq!(length_code(258),Some(285));
    assert_eq!(length_code(2),None);
    assert_eq!(length_code(259),None);
}

#[test]
fn length_extras_match_ranges() {
    assert_eq!(length_extra_bits(257),0);
    assert_eq!(length_extra_bits(265),1);
    assert_eq!(length_extra_bits(269),2);
    assert_eq!(length_extra_bits(273),3);
    assert_eq!(length_extra_bits(281),5);
    assert_eq!(length_extra_bits(285),0);
    // every range except the clipped 284 spans exactly 2^extra lengths
    for (code,lo,hi) in LENGTH_RANGES {
        if code != 284 {
            assert_eq!(hi - lo + 1,1 << length_extra_bits(code),"code {}",code);
        }
    }
}

#[test]
fn distance_codes_small_window() {
    let table = DistanceTable::new(6);
    assert_eq!(table.max_code(),4);
    assert_eq!(table.range(3),Some((4,4)));
    assert_eq!(table.range(4),Some((5,6)));
    assert_eq!(table.code(1),Some(0));
    assert_eq!(table.code(6),Some(4));
    assert_eq!(table.code(7),None);
    assert_eq!(table.alphabet(),vec![0,1,2,3,4]);
}

#[test]
fn distance_codes_sparse_last_range() {
    // window of 5 clips code 4 to a single distance
    let table = DistanceTable::new(5);
    assert_eq!(table.max_code(),4);
    assert_eq!(table.range(4),Some((5,5)));
    assert_eq!(table.code(5),Some(4));
    assert_eq!(table.code(6),None);
    // a tiny window still defines codes 0..=3
    let table = DistanceTable::new(1);
    assert_eq!(table.max_code(),3);
    assert_eq!(table.code(4),Some(3));
}

#[test]
fn distance_codes_std_window() {
    let table = DistanceTable::new(32768);
    assert_eq!(table.max_code(),29);
    assert_eq!(table.range(4),Some((5,6)));
    assert_eq!(table.range(5),Some((7,8)));
    assert_eq!(table.range(6),Some((9,12)));
    assert_eq!(table.range(29),Some((16385,32768)));
    assert_eq!(DistanceTable::extra_bits(29),13);
    assert_eq!(table.code(32768),Some(29));
}
