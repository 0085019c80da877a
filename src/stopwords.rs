use once_cell::sync::Lazy;
use regex::Regex;

// Filler removals applied in order. Every replacement is empty-string, so a
// later rule only ever sees text the earlier rules have already shrunk and
// re-running the whole list is a no-op. Word-boundary anchors keep rules from
// eating into unrelated words. The bare English "I" stays case-sensitive so
// it cannot collide with a lowercase "i" used as a list marker or variable.
const STOPWORD_PATTERNS: &[&str] = &[
    // Polite and conversational padding
    r"(?i)\bplease\b",
    r"(?i)\bcould\s+you\b",
    r"(?i)\bkindly\b",
    r"(?i)\bI\s+would\s+like\s+to\b",
    r"(?i)\bpor\s+favor\b",
    r"(?i)\bpodrías\b",
    r"(?i)\bme\s+gustaría\b",
    r"(?i)\bquisiera\b",
    r"(?i)\bs'il\s+vous\s+plait\b",
    r"(?i)\bsvp\b",
    // Articles
    r"(?i)\bthe\b",
    r"(?i)\ba\b",
    r"(?i)\ban\b",
    r"(?i)\bel\b",
    r"(?i)\bla\b",
    r"(?i)\blos\b",
    r"(?i)\blas\b",
    r"(?i)\bun\b",
    r"(?i)\buna\b",
    r"(?i)\bunos\b",
    r"(?i)\bunas\b",
    // Prepositions and connectors (risky but high yield)
    r"(?i)\bde\b",
    r"(?i)\bdel\b",
    r"(?i)\bof\b",
    r"(?i)\bthat\b",
    r"(?i)\bque\b",
    r"(?i)\bwhich\b",
    r"(?i)\bcuyos\b",
    r"(?i)\bwith\b",
    r"(?i)\bcon\b",
    r"(?i)\bin\b",
    r"(?i)\ben\b",
    r"(?i)\bfor\b",
    r"(?i)\bpara\b",
    r"(?i)\bpor\b",
    r"(?i)\band\b",
    r"(?i)\by\b",
    r"(?i)\be\b",
    // Copulas (context usually implies them)
    r"(?i)\bis\b",
    r"(?i)\bare\b",
    r"(?i)\bam\b",
    r"(?i)\bwas\b",
    r"(?i)\bwere\b",
    r"(?i)\bes\b",
    r"(?i)\bson\b",
    r"(?i)\bestá\b",
    r"(?i)\bestán\b",
    r"(?i)\bfue\b",
    r"(?i)\beran\b",
    // Pronouns (verbs or context imply the subject)
    r"\bI\b",
    r"(?i)\bwe\b",
    r"(?i)\byou\b",
    r"(?i)\byo\b",
    r"(?i)\bnosotros\b",
    r"(?i)\bellos\b",
];

static STOPWORD_RULES: Lazy<Vec<Regex>> = Lazy::new(|| {
    STOPWORD_PATTERNS
        .iter()
        .map(|p| Regex::new(p).expect("stopword regex"))
        .collect()
});

static WS_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("ws regex"));

/// Removes filler words, then collapses whitespace runs and trims.
/// The output is never longer than the input.
pub fn strip(text: &str) -> String {
    // Removing one rule's word can forge a match for an earlier rule
    // ("me quisiera gustaría" leaves "me gustaría" behind), so the whole
    // list runs to a fixpoint, like the CJK gap removal in compact. Every
    // changing pass strictly shrinks the text, so this terminates.
    let mut out = text.to_string();
    loop {
        let mut next = out.clone();
        for rule in STOPWORD_RULES.iter() {
            next = rule.replace_all(&next, "").into_owned();
        }
        if next == out {
            break;
        }
        out = next;
    }
    WS_RUN_RE.replace_all(out.trim(), " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::strip;

    #[test]
    fn removes_polite_fillers() {
        assert_eq!(
            strip("Could you please translate the document for me"),
            "translate document me"
        );
    }

    #[test]
    fn is_idempotent() {
        let samples = [
            "Could you please translate the document for me",
            "el perro y la casa de mis padres",
            "  spaced    out\ttext \n here  ",
            "could  you   please do it",
            "me quisiera gustaría",
            "",
            "你好，世界",
        ];
        for s in samples {
            let once = strip(s);
            assert_eq!(strip(&once), once, "strip not idempotent for {s:?}");
        }
    }

    #[test]
    fn never_grows_text() {
        let samples = ["please do the thing", "ya tú sabes", "nothing to remove?"];
        for s in samples {
            assert!(strip(s).len() <= s.len());
        }
    }

    #[test]
    fn respects_word_boundaries() {
        // "the" inside "them"/"theme" must survive
        assert_eq!(strip("give them theme ideas"), "give them theme ideas");
        // "es" inside "estimates" must survive
        assert_eq!(strip("estimates"), "estimates");
    }

    #[test]
    fn pronoun_i_is_case_sensitive() {
        assert_eq!(strip("I want item i"), "want item i");
    }

    #[test]
    fn interacting_rules_reach_a_fixpoint() {
        // dropping "quisiera" exposes "me gustaría" to an earlier rule;
        // a single pass would leave it behind
        assert_eq!(strip("me quisiera gustaría"), "");
        assert_eq!(strip("dime me quisiera gustaría verlo"), "dime verlo");
    }

    #[test]
    fn collapses_whitespace_left_by_removals() {
        assert_eq!(strip("the   quick  the   fox"), "quick fox");
    }
}
