use once_cell::sync::Lazy;
use regex::Regex;

static CJK_GAP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([\u4e00-\u9fff])\s+([\u4e00-\u9fff])").expect("cjk gap regex"));
static WS_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("ws regex"));

// Full-width punctuation to ASCII. Saves bytes and often merges better
// during tokenization.
const FULLWIDTH_PUNCT: &[(char, char)] = &[
    ('，', ','),
    ('。', '.'),
    ('：', ':'),
    ('；', ';'),
    ('？', '?'),
    ('！', '!'),
    ('（', '('),
    ('）', ')'),
    ('“', '"'),
    ('”', '"'),
];

/// Compacts CJK text: drops whitespace between adjacent ideographs (CJK text
/// carries no word-separating spaces), collapses remaining whitespace runs,
/// and maps full-width punctuation to ASCII. Idempotent on already-compacted
/// text.
pub fn compact(text: &str) -> String {
    // A gap match consumes its right-hand ideograph, so "你 好 吗" still has
    // a gap left after one pass; iterate to a fixpoint.
    let mut out = text.to_string();
    loop {
        let next = CJK_GAP_RE.replace_all(&out, "$1$2").into_owned();
        if next == out {
            break;
        }
        out = next;
    }
    let out = WS_RUN_RE.replace_all(&out, " ");
    out.chars()
        .map(|c| {
            FULLWIDTH_PUNCT
                .iter()
                .find(|(full, _)| *full == c)
                .map_or(c, |(_, ascii)| *ascii)
        })
        .collect()
}
