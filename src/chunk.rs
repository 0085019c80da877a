use once_cell::sync::Lazy;
use regex::Regex;

// A sentence run: text up to and including its delimiters, plus at most one
// trailing whitespace character.
static SENTENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^.!?\n]+[.!?\n]+(?:\s|$)?").expect("sentence regex"));

/// Splits text into sentence-bounded segments. Text the sentence pattern
/// cannot claim (leading delimiters, an undelimited tail) is kept as its own
/// segment, so concatenating the segments in order reconstructs the input
/// exactly.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut segments: Vec<&str> = Vec::new();
    let mut pos = 0usize;
    for m in SENTENCE_RE.find_iter(text) {
        if m.start() > pos {
            segments.push(&text[pos..m.start()]);
        }
        segments.push(m.as_str());
        pos = m.end();
    }
    if pos < text.len() {
        segments.push(&text[pos..]);
    }
    segments
}

/// Greedily packs consecutive segments into chunks of at most `max_chars`
/// characters. A single segment longer than the limit becomes a chunk of its
/// own; the remote call has to take it whole.
pub fn pack_chunks(segments: &[&str], max_chars: usize) -> Vec<String> {
    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;
    for seg in segments {
        let seg_len = seg.chars().count();
        if current_len > 0 && current_len + seg_len > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        current.push_str(seg);
        current_len += seg_len;
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

pub fn split_and_pack(text: &str, max_chars: usize) -> Vec<String> {
    pack_chunks(&split_sentences(text), max_chars)
}

#[cfg(test)]
mod tests {
    use super::{pack_chunks, split_and_pack, split_sentences};

    fn assert_lossless(text: &str) {
        let joined: String = split_sentences(text).concat();
        assert_eq!(joined, text, "splitting lost content for {text:?}");
    }

    #[test]
    fn splitting_is_lossless() {
        assert_lossless("One. Two! Three? Four\nFive");
        assert_lossless("no delimiters at all");
        assert_lossless("...leading dots. then text");
        assert_lossless("double  spaces.  after. sentences.");
        assert_lossless("trailing. ");
        assert_lossless("\n\n");
        assert_lossless("");
        assert_lossless("你好。再见！还在吗？结束");
    }

    #[test]
    fn packing_is_lossless_modulo_boundaries() {
        let text = "One. Two! Three? Four\nFive. Six.";
        let chunks = split_and_pack(text, 10);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn splits_on_sentence_delimiters() {
        let segs = split_sentences("Hello there. How are you? Fine");
        assert_eq!(segs, vec!["Hello there. ", "How are you? ", "Fine"]);
    }

    #[test]
    fn packs_up_to_the_limit() {
        let segs = ["aaaa. ", "bbbb. ", "cccc. "];
        // each segment is 6 chars; two fit into 12, the third starts a new chunk
        let chunks = pack_chunks(&segs, 12);
        assert_eq!(chunks, vec!["aaaa. bbbb. ".to_string(), "cccc. ".to_string()]);
    }

    #[test]
    fn oversized_segment_gets_own_chunk() {
        let long = "x".repeat(500);
        let segs = ["short. ", long.as_str()];
        let chunks = pack_chunks(&segs, 450);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1], long);
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(split_and_pack("", 450).is_empty());
    }

    #[test]
    fn chunk_limit_counts_chars_not_bytes() {
        let text = "你好吗. ".repeat(40);
        for chunk in split_and_pack(&text, 11) {
            assert!(chunk.chars().count() <= 11);
        }
    }
}
