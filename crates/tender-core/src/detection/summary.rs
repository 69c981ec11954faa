/// A place where the summary may end: after a word, at byte `end` of the
/// normalized text, `chars` characters in.
#[derive(Debug, Clone, Copy)]
struct Boundary {
    end: usize,
    chars: usize,
    sentence: bool,
}

/// Build a short summary from the start of `text`.
///
/// Whitespace is collapsed first. The first `max_sentences` sentences are
/// used when they fit in `budget` characters; otherwise the cut falls on the
/// last sentence end, or failing that the last word end, within the budget.
///
/// Returns `None` for blank text. It also returns `None` for text that is not
/// blank but whose first word is longer than `budget` (say 1000 characters
/// with no whitespace): the summary is never cut inside a word, so nothing
/// fits.
pub fn summarize(text: &str, budget: usize, max_sentences: usize) -> Option<String> {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        return None;
    }

    let boundaries = word_boundaries(&normalized);
    let total = boundaries.last()?.chars;

    let leading_sentences = if max_sentences == 0 {
        None
    } else {
        boundaries
            .iter()
            .filter(|b| b.sentence)
            .nth(max_sentences - 1)
            .filter(|b| b.chars <= budget)
    };

    let cut = if let Some(b) = leading_sentences {
        Some(*b)
    } else if total <= budget {
        boundaries.last().copied()
    } else {
        let fitting = boundaries.iter().take_while(|b| b.chars <= budget);
        fitting
            .clone()
            .filter(|b| b.sentence)
            .last()
            .or_else(|| fitting.last())
            .copied()
    }?;

    Some(normalized[..cut.end].to_string())
}

fn word_boundaries(normalized: &str) -> Vec<Boundary> {
    let mut out = Vec::new();
    let mut chars = 0;
    let mut prev = None;
    for (i, c) in normalized.char_indices() {
        if c == ' ' {
            out.push(Boundary {
                end: i,
                chars,
                sentence: ends_sentence(prev),
            });
        }
        chars += 1;
        prev = Some(c);
    }
    out.push(Boundary {
        end: normalized.len(),
        chars,
        sentence: ends_sentence(prev),
    });
    out
}

fn ends_sentence(c: Option<char>) -> bool {
    matches!(c, Some('.' | '!' | '?'))
}
