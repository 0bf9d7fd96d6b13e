/// Inclusive Unicode ranges treated as emoji / decorative symbols.
///
/// This covers the common emoji blocks (emoticons, pictographs, transport,
/// flags, supplemental symbols), dingbats, combining enclosing marks, the
/// variation selector VS16, and a few stray game-tile code points. Some
/// entries overlap; the table is a plain membership check, so that is
/// harmless.
const EMOJI_RANGES: &[(u32, u32)] = &[
    (0x1F600, 0x1F64F), // emoticons
    (0x1F300, 0x1F5FF), // misc symbols and pictographs
    (0x1F680, 0x1F6FF), // transport and map
    (0x1F1E0, 0x1F1FF), // regional indicators (flags)
    (0x2600, 0x26FF),   // misc symbols
    (0x2700, 0x27BF),   // dingbats
    (0x1F900, 0x1F9FF), // supplemental symbols and pictographs
    (0x1F018, 0x1F270), // various asian characters
    (0x238C, 0x2454),   // misc technical / OCR
    (0x20D0, 0x20FF),   // combining diacritical marks for symbols
    (0xFE0F, 0xFE0F),   // variation selector 16
    (0x1F004, 0x1F004), // mahjong red dragon
    (0x1F0CF, 0x1F0CF), // playing card joker
    (0x1F170, 0x1F251), // enclosed alphanumeric supplement
];

fn is_emoji(c: char) -> bool {
    let cp = c as u32;
    EMOJI_RANGES.iter().any(|&(lo, hi)| cp >= lo && cp <= hi)
}

/// Remove every emoji code point from `text`, preserving the order of the
/// remaining characters.
///
/// This pass is context-free: it runs identically over code, strings and
/// comments, and must run *before* comment classification so that emoji
/// embedded next to comment markers cannot shift span boundaries.
pub fn strip_emoji(text: &str) -> String {
    if text.chars().any(is_emoji) {
        text.chars().filter(|c| !is_emoji(*c)).collect()
    } else {
        text.to_string()
    }
}
