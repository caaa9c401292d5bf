//! End-to-end encode/decode scenarios exercised through the public API,
//! as opposed to the coder/model unit tests that live alongside their
//! implementations.

use compress::{decode, encode};
use rand::Rng;
use std::io::Cursor;

fn round_trip(input: &[u8]) -> Vec<u8> {
    let mut encoded = Vec::new();
    encode(&mut Cursor::new(input), &mut encoded).unwrap();
    let mut decoded = Vec::new();
    decode(&mut Cursor::new(encoded), &mut decoded).unwrap();
    decoded
}

#[test]
fn empty_stream_round_trips() {
    assert_eq!(round_trip(b""), Vec::<u8>::new());
}

#[test]
fn single_byte_round_trips() {
    assert_eq!(round_trip(b"A"), b"A".to_vec());
}

#[test]
fn short_repeating_pattern_round_trips() {
    assert_eq!(round_trip(b"AAB"), b"AAB".to_vec());
}

#[test]
fn all_256_byte_values_present_once_round_trips() {
    let input: Vec<u8> = (0u16..=255).map(|v| v as u8).collect();
    assert_eq!(round_trip(&input), input);
}

#[test]
fn one_mebibyte_of_a_single_repeated_byte_round_trips() {
    let input = vec![0u8; 1 << 20];
    assert_eq!(round_trip(&input), input);
}

#[test]
fn one_mebibyte_of_pseudo_random_bytes_round_trips() {
    let mut rng = rand::thread_rng();
    let input: Vec<u8> = (0..(1 << 20)).map(|_| rng.gen()).collect();
    assert_eq!(round_trip(&input), input);
}

#[test]
fn heavily_skewed_distribution_round_trips() {
    let mut input = vec![b'x'; 1 << 14];
    input.extend(std::iter::repeat(b'y').take(3));
    input.push(b'z');
    assert_eq!(round_trip(&input), input);
}

#[test]
fn compressed_output_is_smaller_for_skewed_input() {
    let mut input = vec![b'x'; 1 << 16];
    input.extend_from_slice(b"yz");
    let mut encoded = Vec::new();
    encode(&mut Cursor::new(&input), &mut encoded).unwrap();
    assert!(encoded.len() < input.len());
}

#[test]
fn truncated_codestream_payload_does_not_panic() {
    let input = vec![b'a'; 4096];
    let mut encoded = Vec::new();
    encode(&mut Cursor::new(&input), &mut encoded).unwrap();
    encoded.truncate(encoded.len() / 2);
    let mut decoded = Vec::new();
    // A truncated payload is padded with zero bits per the decoder's EOF
    // policy, so this either produces wrong bytes or a `Corrupt`/`Truncated`
    // error; it must never panic.
    let _ = decode(&mut Cursor::new(encoded), &mut decoded);
}
