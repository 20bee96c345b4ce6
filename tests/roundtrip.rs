use huffpack::{
    decode_file, decode_stream, encode_file, encode_stream, Error, FrequencyTable, HuffmanTree,
    Tokenizer,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn roundtrip_arbitrary_bytes(input in prop::collection::vec(any::<u8>(), 1..2000)) {
        let tokenizer = Tokenizer::new();
        let mut archive = Vec::new();
        encode_stream(&input, "bin", &tokenizer, &mut archive).unwrap();

        let mut restored = Vec::new();
        let extension = decode_stream(archive.as_slice(), &mut restored).unwrap();
        prop_assert_eq!(extension, "bin");
        prop_assert_eq!(restored, input);
    }

    #[test]
    fn roundtrip_arbitrary_dictionary(
        input in prop::collection::vec(any::<u8>(), 1..1000),
        keywords in prop::collection::vec(prop::collection::vec(any::<u8>(), 1..8), 0..8),
    ) {
        let tokenizer = Tokenizer::with_keywords(keywords.iter().map(|k| k.as_slice()));
        let mut archive = Vec::new();
        encode_stream(&input, "bin", &tokenizer, &mut archive).unwrap();

        let mut restored = Vec::new();
        decode_stream(archive.as_slice(), &mut restored).unwrap();
        prop_assert_eq!(restored, input);
    }

    #[test]
    fn frequency_totals_match_token_count(
        input in prop::collection::vec(any::<u8>(), 0..1000),
        keywords in prop::collection::vec(prop::collection::vec(any::<u8>(), 1..6), 0..6),
    ) {
        let tokenizer = Tokenizer::with_keywords(keywords.iter().map(|k| k.as_slice()));
        let symbols = tokenizer.tokenize(&input);
        let table = FrequencyTable::from_symbols(&symbols);
        prop_assert_eq!(table.total_symbols(), symbols.len() as u64);
    }

    #[test]
    fn codes_are_prefix_free(input in prop::collection::vec(any::<u8>(), 2..500)) {
        let symbols = Tokenizer::new().tokenize(&input);
        let table = FrequencyTable::from_symbols(&symbols);
        let codes: Vec<_> = HuffmanTree::build(&table)
            .unwrap()
            .code_table()
            .into_values()
            .collect();
        for (i, a) in codes.iter().enumerate() {
            for (j, b) in codes.iter().enumerate() {
                if i != j {
                    prop_assert!(!b.starts_with(a));
                }
            }
        }
    }
}

#[test]
fn file_roundtrip_restores_extension() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("notes.txt");
    std::fs::write(&input_path, b"to be or not to be, that is the question").unwrap();

    let archive = encode_file(&input_path, &Tokenizer::new()).unwrap();
    assert_eq!(archive, dir.path().join("notes.huff"));

    std::fs::remove_file(&input_path).unwrap();
    let restored = decode_file(&archive).unwrap();
    assert_eq!(restored, input_path);
    assert_eq!(
        std::fs::read(&restored).unwrap(),
        b"to be or not to be, that is the question"
    );
}

#[test]
fn file_roundtrip_without_extension() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("README");
    std::fs::write(&input_path, b"plain file, no extension").unwrap();

    let archive = encode_file(&input_path, &Tokenizer::new()).unwrap();
    std::fs::remove_file(&input_path).unwrap();

    let restored = decode_file(&archive).unwrap();
    assert_eq!(restored, input_path);
    assert_eq!(std::fs::read(&restored).unwrap(), b"plain file, no extension");
}

#[test]
fn decode_rejects_wrong_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, b"not an archive").unwrap();
    assert!(matches!(decode_file(&path), Err(Error::Format(_))));
}

#[test]
fn decode_of_truncated_archive_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("data.txt");
    std::fs::write(&input_path, b"some content worth compressing").unwrap();

    let archive = encode_file(&input_path, &Tokenizer::new()).unwrap();
    std::fs::remove_file(&input_path).unwrap();

    // Cut the archive off right after the fixed header, mid-tree
    let bytes = std::fs::read(&archive).unwrap();
    std::fs::write(&archive, &bytes[..12]).unwrap();

    assert!(matches!(decode_file(&archive), Err(Error::CorruptTree(_))));
    assert!(!input_path.exists());
}

#[test]
fn missing_input_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.txt");
    assert!(matches!(
        encode_file(&path, &Tokenizer::new()),
        Err(Error::Io(_))
    ));
}
