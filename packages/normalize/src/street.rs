//! The street name normalizer.
//!
//! Turns a raw street fragment into its canonical form. The pipeline is a
//! fixed sequence of text rewrites; later steps assume the earlier ones
//! have already run (directional expansion, for example, must not see
//! unexpanded "st" tokens or it would match inside them).
//!
//! The pipeline is deterministic and idempotent: re-normalizing a canonical
//! name yields the same name. Malformed input never fails, it just passes
//! through lightly transformed.

use regex::Regex;
use std::sync::LazyLock;

use crate::tables::{ABBREVIATIONS, SPECIAL_CASES, SPELLED_ORDINALS};

/// Compiled abbreviation rewrites: for each table entry, one end-anchored
/// regex and one embedded-token regex, applied in that order.
static ABBREVIATION_RULES: LazyLock<Vec<AbbreviationRule>> = LazyLock::new(|| {
    ABBREVIATIONS
        .iter()
        .map(|(abbr, full)| AbbreviationRule {
            trailing: Regex::new(&format!(r" {abbr}\.?$")).expect("valid regex"),
            embedded: Regex::new(&format!(r" {abbr}\.? ")).expect("valid regex"),
            trailing_replacement: format!(" {full}"),
            embedded_replacement: format!(" {full} "),
        })
        .collect()
});

struct AbbreviationRule {
    trailing: Regex,
    embedded: Regex,
    trailing_replacement: String,
    embedded_replacement: String,
}

/// Directional prefix rewrites: a lone `e`/`w`/`n`/`s` token (optionally
/// dotted) at string start, or the same letter immediately before a digit.
static DIRECTIONAL_RULES: LazyLock<Vec<DirectionalRule>> = LazyLock::new(|| {
    [
        ("e", "east"),
        ("w", "west"),
        ("n", "north"),
        ("s", "south"),
    ]
    .iter()
    .map(|(letter, full)| DirectionalRule {
        leading: Regex::new(&format!(r"^{letter}\.? ")).expect("valid regex"),
        before_digit: Regex::new(&format!(r"{letter}\.?([0-9])")).expect("valid regex"),
        leading_replacement: format!("{full} "),
        before_digit_replacement: format!("{full} $1"),
    })
    .collect()
});

struct DirectionalRule {
    leading: Regex,
    before_digit: Regex,
    leading_replacement: String,
    before_digit_replacement: String,
}

/// First run of digits terminated by whitespace; the captured run is the
/// one that receives an ordinal suffix.
static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+)\s").expect("valid regex"));

static LEADING_B: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^b ").expect("valid regex"));
static LEADING_ST_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^st ").expect("valid regex"));
static LEADING_ST_DOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^st\.").expect("valid regex"));
static LEADING_MT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^mt\.?").expect("valid regex"));
static LEADING_FT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^ft\.?").expect("valid regex"));

/// Normalizes a raw street fragment into its canonical name.
///
/// The steps, in order:
/// 1. lower-case;
/// 2. suffix abbreviation expansion plus the leading rewrites
///    (`b `→`beach `, `st`→`saint`, `mt`→`mount`, `ft`→`fort`) and
///    apostrophe stripping;
/// 3. spelled-out ordinals (`first`…`twelfth`) to digit form;
/// 4. directional prefix expansion (`w`→`west` etc.);
/// 5. ordinal suffix spliced onto the first whitespace-terminated digit run;
/// 6. whole-string special-case override.
#[must_use]
pub fn normalize(raw: &str) -> String {
    let mut name = raw.to_lowercase();
    name = expand_abbreviations(&name);
    name = expand_spelled_ordinals(&name);
    name = expand_directionals(&name);
    name = ordinalize_digits(&name);
    apply_special_cases(name)
}

/// Expands suffix abbreviations and the leading-token rewrites.
fn expand_abbreviations(name: &str) -> String {
    let mut name = name.to_string();
    for rule in ABBREVIATION_RULES.iter() {
        name = rule
            .trailing
            .replace(&name, rule.trailing_replacement.as_str())
            .into_owned();
        name = rule
            .embedded
            .replace_all(&name, rule.embedded_replacement.as_str())
            .into_owned();
    }
    name = name.replace('\'', "");
    name = LEADING_B.replace(&name, "beach ").into_owned();
    name = LEADING_ST_WORD.replace(&name, "saint ").into_owned();
    name = LEADING_ST_DOT.replace(&name, "saint").into_owned();
    name = LEADING_MT.replace(&name, "mount").into_owned();
    LEADING_FT.replace(&name, "fort").into_owned()
}

/// Rewrites spelled-out ordinal words to digit form.
fn expand_spelled_ordinals(name: &str) -> String {
    let mut name = name.to_string();
    for (word, digit) in SPELLED_ORDINALS {
        if name.contains(word) {
            name = name.replace(word, digit);
        }
    }
    name
}

/// Expands single-letter directional prefixes.
fn expand_directionals(name: &str) -> String {
    let mut name = name.to_string();
    for rule in DIRECTIONAL_RULES.iter() {
        name = rule
            .leading
            .replace(&name, rule.leading_replacement.as_str())
            .into_owned();
        name = rule
            .before_digit
            .replace(&name, rule.before_digit_replacement.as_str())
            .into_owned();
    }
    name
}

/// Splices the English ordinal suffix onto the first digit run that is
/// terminated by whitespace. Digit runs already carrying a suffix are not
/// whitespace-terminated, which is what makes this step idempotent.
fn ordinalize_digits(name: &str) -> String {
    let Some(digits) = DIGIT_RUN.captures(name).and_then(|caps| caps.get(1)) else {
        return name.to_string();
    };

    let suffix = ordinal_suffix(digits.as_str());

    let mut result = String::with_capacity(name.len() + suffix.len());
    result.push_str(&name[..digits.end()]);
    result.push_str(suffix);
    result.push_str(&name[digits.end()..]);
    result
}

/// The standard English ordinal suffix rule: teens (11-13) always take
/// "th", otherwise the last digit decides.
fn ordinal_suffix(digits: &str) -> &'static str {
    let bytes = digits.as_bytes();
    let last = bytes[bytes.len() - 1];
    let second_last = if bytes.len() > 1 {
        bytes[bytes.len() - 2]
    } else {
        b'0'
    };

    if second_last == b'1' {
        return "th";
    }
    match last {
        b'1' => "st",
        b'2' => "nd",
        b'3' => "rd",
        _ => "th",
    }
}

/// Replaces the fully-processed name wholesale if it matches a known
/// real-world alias.
fn apply_special_cases(name: String) -> String {
    SPECIAL_CASES
        .get(name.as_str())
        .map_or(name, |canonical| (*canonical).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_suffix_abbreviations() {
        assert_eq!(normalize("flatbush ave"), "flatbush avenue");
        assert_eq!(normalize("kings hwy ave."), "kings hwy avenue");
        assert_eq!(normalize("ocean pkwy"), "ocean parkway");
        assert_eq!(normalize("union sq"), "union square");
        assert_eq!(normalize("grand blvd"), "grand boulevard");
    }

    #[test]
    fn expands_embedded_abbreviations() {
        assert_eq!(normalize("bedford ave north"), "bedford avenue north");
        assert_eq!(normalize("kent st loop"), "kent street loop");
    }

    #[test]
    fn leading_st_means_saint() {
        assert_eq!(normalize("st marks place"), "saint marks place");
        assert_eq!(normalize("st. nicholas avenue"), "saint nicholas avenue");
        // A trailing "st" is still a street.
        assert_eq!(normalize("main st"), "main street");
    }

    #[test]
    fn leading_token_rewrites() {
        assert_eq!(normalize("b 94 street"), "beach 94th street");
        assert_eq!(normalize("mt eden avenue"), "mount eden avenue");
        assert_eq!(normalize("ft hamilton parkway"), "fort hamilton parkway");
    }

    #[test]
    fn strips_apostrophes() {
        assert_eq!(normalize("o'brien avenue"), "obrien avenue");
    }

    #[test]
    fn spelled_ordinals_become_digits() {
        assert_eq!(normalize("first avenue"), "1st avenue");
        assert_eq!(normalize("seventh avenue"), "7th avenue");
        assert_eq!(normalize("twelfth street"), "12th street");
    }

    #[test]
    fn expands_directional_prefixes() {
        assert_eq!(normalize("w 42 street"), "west 42nd street");
        assert_eq!(normalize("e 5 street"), "east 5th street");
        assert_eq!(normalize("n 7 street"), "north 7th street");
        assert_eq!(normalize("s 4 street"), "south 4th street");
        assert_eq!(normalize("w. 42 street"), "west 42nd street");
    }

    #[test]
    fn expands_directional_glued_to_digits() {
        assert_eq!(normalize("w42 street"), "west 42nd street");
        assert_eq!(normalize("e14 street"), "east 14th street");
    }

    #[test]
    fn ordinal_digit_rule() {
        assert_eq!(normalize("west 1 street"), "west 1st street");
        assert_eq!(normalize("2 avenue"), "2nd avenue");
        assert_eq!(normalize("23 street"), "23rd street");
        assert_eq!(normalize("11 avenue"), "11th avenue");
        assert_eq!(normalize("12 street"), "12th street");
        assert_eq!(normalize("13 avenue"), "13th avenue");
        assert_eq!(normalize("111 street"), "111th street");
        assert_eq!(normalize("101 street"), "101st street");
    }

    #[test]
    fn abbreviation_and_ordinal_compose() {
        assert_eq!(normalize("5 ave"), "5th avenue");
        assert_eq!(normalize("W 48 St"), "west 48th street");
    }

    #[test]
    fn special_cases_applied_last() {
        assert_eq!(normalize("avenue of the americas"), "6th avenue");
        assert_eq!(normalize("Avenue Of The Americas"), "6th avenue");
        assert_eq!(normalize("laguardia place"), "la guardia place");
        assert_eq!(
            normalize("adam clayton powell boulevard"),
            "adam clayton powell jr. boulevard"
        );
        assert_eq!(
            normalize("avenue of the americas"),
            normalize("6th avenue")
        );
    }

    #[test]
    fn digit_runs_with_suffix_untouched() {
        assert_eq!(normalize("west 42nd street"), "west 42nd street");
        assert_eq!(normalize("6th avenue"), "6th avenue");
    }

    #[test]
    fn idempotent_over_representative_inputs() {
        let inputs = [
            "W 48 St",
            "5 ave",
            "st marks pl",
            "b 94 st",
            "avenue of the americas",
            "first avenue",
            "w42 street",
            "mt eden ave",
            "o'brien ave",
            "dead end",
            "",
            "broadway",
            "west 106 st",
        ];
        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn malformed_input_passes_through() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "   ");
        assert_eq!(normalize("123"), "123");
    }
}
