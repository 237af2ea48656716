/// Turns the backend's plain-text transcript into what the user reads.
///
/// Kept narrow so the heuristic below can be swapped for a real sentence
/// segmenter without touching the orchestrator.
pub trait TranscriptFormatter: Send + Sync {
    fn format(&self, raw: &str) -> String;
}

/// Best-effort paragraph reflow: every sentence-ending `.`, `?` or `!` gets a
/// blank line after it.
///
/// This is plain text surgery, not sentence detection. Abbreviations
/// ("Dr. Smith"), decimals written with a trailing space and punctuation
/// inside quotes are split like any other sentence end.
#[derive(Debug, Default, Clone, Copy)]
pub struct SentenceReflow;

impl TranscriptFormatter for SentenceReflow {
    fn format(&self, raw: &str) -> String {
        reflow(raw)
    }
}

fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '?' | '!')
}

/// After terminal punctuation, a following space becomes `\n\n` and a lone
/// `\n` is doubled. Terminal punctuation already followed by `\n\n` is left
/// alone, so reflowing reflowed text changes nothing.
pub fn reflow(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + raw.len() / 8);
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        out.push(c);
        if !is_terminal(c) {
            continue;
        }
        match chars.peek() {
            Some(' ') => {
                chars.next();
                out.push_str("\n\n");
            }
            Some('\n') => {
                chars.next();
                out.push_str("\n\n");
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            _ => {}
        }
    }

    out.trim().to_string()
}
