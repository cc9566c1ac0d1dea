//! Post-generation corrections for recurring model mistakes.
//!
//! Each rule is a literal find/replace with a note recording the failure
//! it papers over. Rules apply in order, unconditionally, to every
//! occurrence in the script. The table is data; extending it must not
//! require touching any control flow.

use tracing::debug;

pub struct PatchRule {
    pub find: &'static str,
    pub replace: &'static str,
    /// Why the rule exists. Kept next to the rule so the table stays
    /// readable as it grows.
    pub note: &'static str,
}

pub const PATCH_RULES: &[PatchRule] = &[
    PatchRule {
        find: "edges.txt",
        replace: "edges.csv",
        note: "models keep inventing a .txt extension for the edge-list upload",
    },
    PatchRule {
        find: "'worldwide_gross'",
        replace: "'Worldwide gross'",
        note: "the scraped film-table header is title-case with a space",
    },
    PatchRule {
        find: "format='jpg'",
        replace: "format='jpeg'",
        note: "Pillow rejects 'jpg' as a format name",
    },
    PatchRule {
        find: "plt.show()",
        replace: "plt.close()",
        note: "show() blocks forever on a headless host",
    },
];

/// Apply the rule table in order. Pure: same input, same output.
pub fn apply_patches(script: &str) -> String {
    PATCH_RULES
        .iter()
        .fold(script.to_string(), |acc, rule| {
            let patched = acc.replace(rule.find, rule.replace);
            if patched != acc {
                debug!("patched generated script: {}", rule.note);
            }
            patched
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules_are_applied_in_order_to_every_occurrence() {
        let script = "df = pd.read_csv('edges.txt')\nplt.show()\nplt.show()";
        let patched = apply_patches(script);
        assert_eq!(
            patched,
            "df = pd.read_csv('edges.csv')\nplt.close()\nplt.close()"
        );
    }

    #[test]
    fn untouched_scripts_pass_through() {
        let script = "import json\nprint(json.dumps({}))";
        assert_eq!(apply_patches(script), script);
    }

    #[test]
    fn applying_twice_changes_nothing() {
        let script: String = PATCH_RULES
            .iter()
            .map(|rule| format!("x = {}\n", rule.find))
            .collect();
        let once = apply_patches(&script);
        assert_eq!(apply_patches(&once), once);
    }

    /// No rule's replacement may reintroduce any rule's needle, or a later
    /// rule could undo an earlier one and a second pass would diverge.
    #[test]
    fn no_rule_reintroduces_a_needle() {
        for rule in PATCH_RULES {
            for other in PATCH_RULES {
                assert!(
                    !rule.replace.contains(other.find),
                    "replacement {:?} reintroduces needle {:?}",
                    rule.replace,
                    other.find
                );
            }
        }
    }

    #[test]
    fn every_rule_has_provenance() {
        for rule in PATCH_RULES {
            assert!(!rule.note.is_empty(), "rule {:?} has no note", rule.find);
        }
    }
}
