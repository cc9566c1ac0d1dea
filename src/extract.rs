//! Recovering an executable script from raw model output.
//!
//! Models wrap code in markdown fences, preface it with prose, or append
//! commentary after the final print. Extraction is a pure, deterministic
//! text transform: strategies run in a fixed order and the first match
//! wins, with the trimmed raw text as the final fallback.

/// Fence tags accepted as "this block is Python".
const FENCE_TAGS: &[&str] = &["python", "py"];

type Strategy = fn(&str) -> Option<String>;

/// Ordered fallback chain. New heuristics slot in here without touching
/// the control flow below.
const STRATEGIES: &[Strategy] = &[fenced_block, import_to_print_span];

pub fn extract_script(raw: &str) -> String {
    for strategy in STRATEGIES {
        if let Some(script) = strategy(raw) {
            return script;
        }
    }
    raw.trim().to_string()
}

/// The interior of the first Python-tagged fenced block. Later blocks are
/// ignored. A missing closing fence (truncated completion) takes the rest
/// of the text.
fn fenced_block(raw: &str) -> Option<String> {
    let lines: Vec<&str> = raw.lines().collect();
    let open = lines.iter().position(|line| {
        line.trim()
            .strip_prefix("```")
            .map(|tag| {
                let tag = tag.trim().to_ascii_lowercase();
                FENCE_TAGS.contains(&tag.as_str())
            })
            .unwrap_or(false)
    })?;
    let body: Vec<&str> = lines[open + 1..]
        .iter()
        .take_while(|line| line.trim() != "```")
        .copied()
        .collect();
    Some(body.join("\n").trim().to_string())
}

/// The span from the first line beginning an import statement through the
/// last line beginning the mandated final print-JSON call, inclusive.
/// Both markers must be present.
fn import_to_print_span(raw: &str) -> Option<String> {
    let lines: Vec<&str> = raw.lines().collect();
    let start = lines.iter().position(|line| {
        let t = line.trim_start();
        t.starts_with("import ") || t.starts_with("from ")
    })?;
    let end = lines
        .iter()
        .rposition(|line| line.trim_start().starts_with("print(json.dumps"))?;
    if end < start {
        return None;
    }
    Some(lines[start..=end].join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fenced_block_in_prose() {
        let raw = "Here is the script you asked for:\n```python\nprint(1)\n```\nLet me know!";
        assert_eq!(extract_script(raw), "print(1)");
    }

    #[test]
    fn only_first_fenced_block_is_used() {
        let raw = "```python\nprint(1)\n```\nand also\n```python\nprint(2)\n```";
        assert_eq!(extract_script(raw), "print(1)");
    }

    #[test]
    fn short_fence_tag() {
        let raw = "```py\nimport json\nprint(json.dumps([]))\n```";
        assert_eq!(extract_script(raw), "import json\nprint(json.dumps([]))");
    }

    #[test]
    fn untagged_fence_falls_through_to_heuristic() {
        let raw = "```\nimport json\nprint(json.dumps({}))\n```";
        assert_eq!(
            extract_script(raw),
            "import json\nprint(json.dumps({}))"
        );
    }

    #[test]
    fn unclosed_fence_takes_rest_of_text() {
        let raw = "```python\nimport json\nprint(json.dumps({}))";
        assert_eq!(extract_script(raw), "import json\nprint(json.dumps({}))");
    }

    #[test]
    fn import_to_print_span_drops_trailing_commentary() {
        let raw = "import json\nx=1\nprint(json.dumps({'a':1}))\nTrailing commentary";
        assert_eq!(
            extract_script(raw),
            "import json\nx=1\nprint(json.dumps({'a':1}))"
        );
    }

    #[test]
    fn import_to_print_span_drops_leading_prose() {
        let raw = "Sure, here you go.\nfrom io import BytesIO\nimport json\nprint(json.dumps(1))\nHope this helps.";
        assert_eq!(
            extract_script(raw),
            "from io import BytesIO\nimport json\nprint(json.dumps(1))"
        );
    }

    #[test]
    fn no_markers_returns_trimmed_verbatim() {
        let raw = "  x = 1\nprint(x)  \n";
        assert_eq!(extract_script(raw), "x = 1\nprint(x)");
    }

    #[test]
    fn idempotent_on_its_own_output() {
        let raw = "prose\n```python\nimport json\nprint(json.dumps({'a': 1}))\n```\nmore prose";
        let first = extract_script(raw);
        let rewrapped = format!("```python\n{first}\n```");
        assert_eq!(extract_script(&rewrapped), first);
    }
}
