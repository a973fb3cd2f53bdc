use icu_normalizer::ComposingNormalizerBorrowed;

/// Outcome of comparing a submission with the target spelling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Nothing but whitespace was submitted.
    Empty,
    Correct,
    Incorrect,
}

/// Trim, compose to NFC and lowercase.
pub fn normalize_answer(text: &str) -> String {
    let nfc = ComposingNormalizerBorrowed::new_nfc();
    nfc.normalize(text.trim()).to_lowercase()
}

pub fn judge(submitted: &str, target: &str) -> Verdict {
    let submitted = normalize_answer(submitted);
    if submitted.is_empty() {
        return Verdict::Empty;
    }
    if submitted == normalize_answer(target) {
        Verdict::Correct
    } else {
        Verdict::Incorrect
    }
}
