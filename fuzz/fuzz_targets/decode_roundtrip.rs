#![no_main]
use huffpack::{decode_stream, encode_stream, Tokenizer};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (Vec<u8>, Vec<Vec<u8>>)| {
    let (input, keywords) = data;
    if input.is_empty() {
        return;
    }

    let tokenizer = Tokenizer::with_keywords(keywords.iter().map(|k| k.as_slice()));
    let mut archive = Vec::new();
    encode_stream(&input, "bin", &tokenizer, &mut archive).unwrap();

    let mut restored = Vec::new();
    let extension = decode_stream(archive.as_slice(), &mut restored).unwrap();
    assert_eq!(extension, "bin");
    assert_eq!(input, restored);
});
