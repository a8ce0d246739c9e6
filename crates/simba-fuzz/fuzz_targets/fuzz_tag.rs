#![no_main]
use libfuzzer_sys::fuzz_target;
use simba_core::tag::{MAX_TAG_LEN, validate_tag, validate_tag_inner};

fn reference(tag: &[u8]) -> bool {
    let body = |b: u8| b.is_ascii_lowercase() || b.is_ascii_digit() || b":./_-".contains(&b);
    match tag {
        [] => false,
        _ if tag.len() > MAX_TAG_LEN => false,
        [first, rest @ ..] => {
            (first.is_ascii_lowercase() || *first == b':')
                && rest.iter().all(|&b| body(b))
                && rest.last() != Some(&b'_')
                && !tag.windows(2).any(|w| w == b"__")
        }
    }
}

fuzz_target!(|data: &[u8]| {
    assert_eq!(validate_tag(data), reference(data));
    let inner_expected = data
        .iter()
        .all(|&b| b.is_ascii_lowercase() || b.is_ascii_digit() || b":./_-".contains(&b))
        && !data.windows(2).any(|w| w == b"__");
    assert_eq!(validate_tag_inner(data), inner_expected);
});
