#![no_main]
use libfuzzer_sys::fuzz_target;
use simba_core::dispatch::{KernelSet, Level};
use simba_core::lut::table_from_fn;
use simba_core::simd::MASK_BLOCK;

// First byte picks the table; the rest is the buffer. Every supported level
// must match scalar.
fuzz_target!(|data: &[u8]| {
    let Some((&salt, buf)) = data.split_first() else {
        return;
    };
    let table = table_from_fn(|b| b.wrapping_mul(salt | 1) & (salt >> 1 | 0x0F));
    let scalar = KernelSet::scalar();

    for set in Level::supported().filter_map(KernelSet::for_level) {
        assert_eq!(set.sum_u8(buf), scalar.sum_u8(buf));
        assert_eq!(set.is_ascii(buf), scalar.is_ascii(buf));
        assert_eq!(
            set.validate_u8_lut(buf, &table),
            scalar.validate_u8_lut(buf, &table)
        );
        assert_eq!(set.crc32c_raw(!0, buf), scalar.crc32c_raw(!0, buf));

        let mut want = vec![0u8; buf.len()];
        let mut got = vec![0u8; buf.len()];
        scalar.map(buf, &mut want, &table);
        set.map(buf, &mut got, &table);
        assert_eq!(want, got);

        let mut in_place = buf.to_vec();
        set.map_in_place(&mut in_place, &table);
        assert_eq!(in_place, want);

        for block in buf.chunks_exact(MASK_BLOCK) {
            if let Some(block) = block.first_chunk::<MASK_BLOCK>() {
                assert_eq!(set.eq_mask64(block, salt), scalar.eq_mask64(block, salt));
            }
        }
    }
});
