//! Human-readable verdict lines.

use partcheck_core::reconcile::{OverallVerdict, PartVerdict};

fn mark(matched: bool) -> &'static str {
    if matched {
        "✓"
    } else {
        "✗"
    }
}

/// `Part 3 [✓]: <expected>`, plus the computed digest when they differ.
pub fn part_line(v: &PartVerdict) -> String {
    let mut line = format!("Part {} [{}]: {}", v.index, mark(v.matched), v.expected);
    if !v.matched {
        line.push_str(&format!("\n    local: {}", v.computed));
    }
    line
}

/// `All [✓]: <expected>`, plus the computed digest when they differ.
pub fn overall_line(v: &OverallVerdict) -> String {
    let mut line = format!("All [{}]: {}", mark(v.matched), v.expected);
    if !v.matched {
        line.push_str(&format!("\n    local: {}-{}", v.computed, v.part_count));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use partcheck_core::digest::{Digest, ExpectedDigest};

    #[test]
    fn matched_part_shows_expected_only() {
        let d = Digest::of(b"part");
        let v = PartVerdict {
            index: 2,
            len: 4,
            computed: d,
            expected: ExpectedDigest::from_digest(d),
            matched: true,
        };
        assert_eq!(part_line(&v), format!("Part 2 [✓]: {d}"));
    }

    #[test]
    fn mismatched_part_shows_both() {
        let v = PartVerdict {
            index: 1,
            len: 4,
            computed: Digest::of(b"local"),
            expected: ExpectedDigest::parse(None),
            matched: false,
        };
        let line = part_line(&v);
        assert!(line.starts_with("Part 1 [✗]: <missing>"));
        assert!(line.contains(&Digest::of(b"local").to_base64()));
    }

    #[test]
    fn overall_mismatch_shows_composite_notation() {
        let v = OverallVerdict {
            part_count: 3,
            computed: Digest::of(b"c"),
            expected: ExpectedDigest::from_digest(Digest::of(b"other")),
            matched: false,
        };
        let line = overall_line(&v);
        assert!(line.starts_with("All [✗]: "));
        assert!(line.ends_with(&format!("{}-3", Digest::of(b"c"))));
    }
}
