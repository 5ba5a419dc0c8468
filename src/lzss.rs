//! LZSS factoring of a chunk into literals and back-references.
//!
//! The factorizer is greedy with no lookahead deferral: at each position it
//! grows a candidate prefix one byte at a time and keeps the leftmost window
//! occurrence of the longest prefix found.  Leftmost matches carry the
//! largest distance at a given length, which concentrates the distance
//! histogram and helps the Huffman stage downstream.

use crate::tools::ring_buffer::RingBuffer;
use crate::{Error,Options};

/// One factoring step: either a single uninterpreted byte, or a
/// back-reference of `length` bytes starting `distance` bytes behind
/// the position after the last emitted byte.
#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub enum Token {
    Literal(u8),
    Match {
        length: usize,
        distance: usize
    }
}

/// longest window match for the run starting at `position`, as
/// (length, leftmost window index); (0,0) when nothing matches
fn longest_match(window: &RingBuffer<u8>,data: &[u8],position: usize,opts: &Options) -> (usize,usize) {
    let mut length: usize = 0;
    let mut index: usize = 0;
    loop {
        if position + length >= data.len() || length >= opts.max_match {
            break;
        }
        match window.find(&data[position..position+length+1]) {
            Some(at) => {
                length += 1;
                index = at;
            },
            None => break
        }
    }
    (length,index)
}

/// Factor `data` into a token list covering it exactly.  Cannot fail; the
/// empty input yields an empty list.  The first token of a non-empty input
/// is always a literal because the window starts out empty.
pub fn factorize(data: &[u8],opts: &Options) -> Vec<Token> {
    let mut window: RingBuffer<u8> = RingBuffer::create(opts.window_size);
    let mut tokens = Vec::new();
    let mut position: usize = 0;
    while position < data.len() {
        let (length,index) = longest_match(&window,data,position,opts);
        if length < opts.min_match {
            tokens.push(Token::Literal(data[position]));
            window.push(data[position]);
            position += 1;
        } else {
            tokens.push(Token::Match { length, distance: window.len() - index });
            for i in 0..length {
                window.push(data[position+i]);
            }
            position += length;
        }
    }
    tokens
}

/// Replay a token list into the bytes it was factored from.  A match may
/// reach back into bytes it is itself emitting (`distance < length`), which
/// reproduces a run.  An empty list is rejected rather than treated as an
/// empty chunk; a match reaching behind the start of output is rejected.
pub fn reconstruct(tokens: &[Token]) -> Result<Vec<u8>,Error> {
    if tokens.is_empty() {
        return Err(Error::EmptyTokenList);
    }
    let mut ans: Vec<u8> = Vec::new();
    for token in tokens {
        match token {
            Token::Literal(byte) => ans.push(*byte),
            Token::Match { length, distance } => {
                if *distance == 0 || *distance > ans.len() {
                    return Err(Error::BadDistance);
                }
                for _i in 0..*length {
                    ans.push(ans[ans.len()-*distance]);
                }
            }
        }
    }
    Ok(ans)
}

#[cfg(test)]
fn test_options(window_size: usize) -> Options {
    Options {
        window_size,
        ..crate::STD_OPTIONS
    }
}

#[test]
fn literal_only_input() {
    let tokens = factorize(b"abc",&test_options(6));
    assert_eq!(tokens,vec![Token::Literal(b'a'),Token::Literal(b'b'),Token::Literal(b'c')]);
    assert_eq!(reconstruct(&tokens),Ok(b"abc".to_vec()));
}

#[test]
fn repeated_trigram() {
    let tokens = factorize(b"BanBanBan",&test_options(6));
    assert_eq!(tokens,vec![
        Token::Literal(b'B'),
        Token::Literal(b'a'),
        Token::Literal(b'n'),
        Token::Match { length: 3, distance: 3 },
        Token::Match { length: 3, distance: 6 }
    ]);
    assert_eq!(reconstruct(&tokens),Ok(b"BanBanBan".to_vec()));
}

#[test]
fn window_too_small_for_matches() {
    // a 2-byte window can never hold a minimum length match
    let tokens = factorize(b"BanBanBan",&test_options(2));
    assert_eq!(tokens.len(),9);
    assert!(tokens.iter().all(|t| matches!(t,Token::Literal(_))));
}

#[test]
fn first_token_is_literal() {
    for data in [&b"x"[..],b"xyxyxy",b"aaaaaaaa"] {
        match factorize(data,&test_options(8))[0] {
            Token::Literal(byte) => assert_eq!(byte,data[0]),
            _ => panic!("first token was a match")
        }
    }
}

#[test]
fn run_coverage() {
    let data = vec![b'A';300];
    let tokens = factorize(&data,&test_options(6));
    let mut total = 0;
    for token in &tokens {
        match token {
            Token::Literal(_) => total += 1,
            Token::Match { length, distance } => {
                assert!(*distance <= 6);
                total += length;
            }
        }
    }
    assert_eq!(total,300);
    assert_eq!(reconstruct(&tokens),Ok(data));
}

#[test]
fn match_length_is_clamped() {
    // match growth doubles with the window fill, so the cap is first hit
    // once more than 258 bytes of run are behind the position
    let data = vec![b'A';1000];
    let tokens = factorize(&data,&test_options(32768));
    assert!(tokens.iter().any(|t| matches!(t,Token::Match { length: 258, .. })));
    assert!(tokens.iter().all(|t| match t {
        Token::Match { length, .. } => *length <= 258,
        Token::Literal(_) => true
    }));
    assert_eq!(reconstruct(&tokens),Ok(data));
}

#[test]
fn empty_input_and_empty_tokens() {
    assert!(factorize(b"",&test_options(4)).is_empty());
    assert_eq!(reconstruct(&[]),Err(Error::EmptyTokenList));
}

#[test]
fn overlapping_match_replays_as_run() {
    let tokens = [
        Token::Literal(b'A'),
        Token::Literal(b'B'),
        Token::Match { length: 4, distance: 2 }
    ];
    assert_eq!(reconstruct(&tokens),Ok(b"ABABAB".to_vec()));
}

#[test]
fn bad_distance_rejected() {
    let tokens = [
        Token::Literal(b'A'),
        Token::Match { length: 3, distance: 2 }
    ];
    assert_eq!(reconstruct(&tokens),Err(Error::BadDistance));
}
