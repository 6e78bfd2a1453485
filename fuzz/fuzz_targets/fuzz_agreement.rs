#![no_main]

use arbitrary::Arbitrary;
use fxs::matcher::{verify_agreement, Algorithm};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    text: &'a [u8],
    pattern: &'a [u8],
}

fuzz_target!(|input: Input| {
    // All scanners must agree, and every reported position must be a real match
    let positions = verify_agreement(input.text, input.pattern).expect("scanners disagree");
    for &p in &positions {
        assert_eq!(&input.text[p..p + input.pattern.len()], input.pattern);
    }

    // Same for the char-based path
    if let (Ok(text), Ok(pattern)) = (std::str::from_utf8(input.text), std::str::from_utf8(input.pattern)) {
        let text: Vec<char> = text.chars().collect();
        let pattern: Vec<char> = pattern.chars().collect();
        let expected = Algorithm::Kmp.search(&text, &pattern);
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.search(&text, &pattern), expected);
        }
    }
});
