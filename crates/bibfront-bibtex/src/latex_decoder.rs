//! LaTeX character decoding
//!
//! Decodes LaTeX accents, special characters and common commands to Unicode.
//! Accents are expanded to a base letter plus combining mark and then
//! NFC-composed, so any accent/letter pair that has a precomposed form comes
//! out as a single character.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use unicode_normalization::UnicodeNormalization;

/// Decode LaTeX markup in `input` to plain Unicode text.
pub fn decode_latex(input: &str) -> String {
    let mut result = decode_accents(input);

    // `~` is a tie; do this before symbol replacement so `\textasciitilde`
    // survives as a literal tilde
    result = result.replace('~', " ");

    for (pattern, replacement) in SYMBOLS.iter() {
        if result.contains(pattern) {
            result = result.replace(pattern, replacement);
        }
    }

    result = remove_tex_commands(&result);
    clean_braces(&result)
}

// ===== Accents =====

lazy_static! {
    /// Symbol accents: \'e, \'{e}, \'{\i}
    static ref SYMBOL_ACCENT: Regex =
        Regex::new(r#"\\([`'^"~=.])\s*(?:\{\s*(\\[ij]|[A-Za-z])\s*\}|(\\[ij]|[A-Za-z]))"#)
            .unwrap();

    /// Letter accents need a brace or whitespace after the command letter:
    /// \c{c}, \c c, \v{s}
    static ref LETTER_ACCENT: Regex =
        Regex::new(r"\\([cvukrHd])(?:\{\s*(\\[ij]|[A-Za-z])\s*\}|\s+(\\[ij]|[A-Za-z]))").unwrap();
}

fn combining_mark(accent: &str) -> Option<char> {
    Some(match accent {
        "`" => '\u{0300}',
        "'" => '\u{0301}',
        "^" => '\u{0302}',
        "~" => '\u{0303}',
        "=" => '\u{0304}',
        "u" => '\u{0306}',
        "." => '\u{0307}',
        "\"" => '\u{0308}',
        "r" => '\u{030A}',
        "H" => '\u{030B}',
        "v" => '\u{030C}',
        "d" => '\u{0323}',
        "c" => '\u{0327}',
        "k" => '\u{0328}',
        _ => return None,
    })
}

fn decode_accents(input: &str) -> String {
    let expand = |caps: &Captures| -> String {
        let base = caps
            .get(2)
            .or_else(|| caps.get(3))
            .map(|m| m.as_str())
            .unwrap_or_default();
        // dotless i/j take the accent in place of the dot
        let base = match base {
            r"\i" => "i",
            r"\j" => "j",
            other => other,
        };
        match combining_mark(&caps[1]) {
            Some(mark) => format!("{base}{mark}"),
            None => caps[0].to_string(),
        }
    };

    let result = SYMBOL_ACCENT.replace_all(input, expand);
    LETTER_ACCENT.replace_all(&result, expand).nfc().collect()
}

// ===== Symbols =====

lazy_static! {
    /// Literal replacements, longest pattern first so `\leq` wins over `\l`
    /// and `{\ss}` over `\ss`.
    static ref SYMBOLS: Vec<(&'static str, &'static str)> = {
        let mut table: Vec<(&str, &str)> = vec![
            // Ligatures and special letters
            (r"{\ae}", "æ"), (r"{\AE}", "Æ"), (r"\ae", "æ"), (r"\AE", "Æ"),
            (r"{\oe}", "œ"), (r"{\OE}", "Œ"), (r"\oe", "œ"), (r"\OE", "Œ"),
            (r"{\ss}", "ß"), (r"\ss", "ß"),
            (r"{\aa}", "å"), (r"{\AA}", "Å"), (r"\aa", "å"), (r"\AA", "Å"),
            (r"{\o}", "ø"), (r"{\O}", "Ø"), (r"\o", "ø"), (r"\O", "Ø"),
            (r"{\l}", "ł"), (r"{\L}", "Ł"), (r"\l", "ł"), (r"\L", "Ł"),
            (r"{\i}", "ı"), (r"\i", "ı"),

            // Punctuation
            ("---", "—"),
            ("--", "–"),
            ("``", "\u{201C}"),
            ("''", "\u{201D}"),

            // Escaped specials and text symbols
            (r"\&", "&"), (r"\%", "%"), (r"\$", "$"), (r"\#", "#"), (r"\_", "_"),
            (r"\{", "{"), (r"\}", "}"),
            (r"\textasciitilde", "~"),
            (r"\textbackslash", "\\"),
            (r"\copyright", "©"),
            (r"\texttrademark", "™"),
            (r"\textregistered", "®"),
            (r"\pounds", "£"),
            (r"\euro", "€"),
            (r"\S", "§"),
            (r"\P", "¶"),
            (r"\dag", "†"),
            (r"\ddag", "‡"),
            (r"\textbullet", "•"),
            (r"\ldots", "…"), (r"\dots", "…"), (r"\textellipsis", "…"),

            // Greek
            (r"\alpha", "α"), (r"\beta", "β"), (r"\gamma", "γ"), (r"\delta", "δ"),
            (r"\epsilon", "ε"), (r"\varepsilon", "ε"), (r"\zeta", "ζ"), (r"\eta", "η"),
            (r"\theta", "θ"), (r"\iota", "ι"), (r"\kappa", "κ"), (r"\lambda", "λ"),
            (r"\mu", "μ"), (r"\nu", "ν"), (r"\xi", "ξ"), (r"\pi", "π"),
            (r"\rho", "ρ"), (r"\sigma", "σ"), (r"\tau", "τ"), (r"\upsilon", "υ"),
            (r"\phi", "φ"), (r"\varphi", "φ"), (r"\chi", "χ"), (r"\psi", "ψ"),
            (r"\omega", "ω"),
            (r"\Gamma", "Γ"), (r"\Delta", "Δ"), (r"\Theta", "Θ"), (r"\Lambda", "Λ"),
            (r"\Xi", "Ξ"), (r"\Pi", "Π"), (r"\Sigma", "Σ"), (r"\Upsilon", "Υ"),
            (r"\Phi", "Φ"), (r"\Psi", "Ψ"), (r"\Omega", "Ω"),

            // Math
            (r"\times", "×"), (r"\pm", "±"), (r"\mp", "∓"), (r"\cdot", "·"),
            (r"\leq", "≤"), (r"\geq", "≥"), (r"\neq", "≠"), (r"\approx", "≈"),
            (r"\sim", "∼"), (r"\propto", "∝"), (r"\ll", "≪"), (r"\gg", "≫"),
            (r"\rightarrow", "→"), (r"\to", "→"), (r"\leftarrow", "←"),
            (r"\infty", "∞"), (r"\partial", "∂"), (r"\nabla", "∇"),
        ];
        table.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        table
    };
}

// ===== TeX Command Removal =====

lazy_static! {
    /// Any remaining `\command{content}` keeps its content
    static ref COMMAND_WITH_ARG: Regex = Regex::new(r"\\[a-zA-Z]+\{([^{}]*)\}").unwrap();

    static ref EMPTY_BRACES: Regex = Regex::new(r"\{\}").unwrap();
    static ref SINGLE_CHAR_BRACES: Regex = Regex::new(r"\{([^{}])\}").unwrap();
}

fn remove_tex_commands(input: &str) -> String {
    COMMAND_WITH_ARG.replace_all(input, "$1").into_owned()
}

/// Drop `{}` and unwrap `{a}`; multi-letter groups such as `{DNA}` are
/// case protection and stay.
fn clean_braces(input: &str) -> String {
    let result = EMPTY_BRACES.replace_all(input, "");
    SINGLE_CHAR_BRACES.replace_all(&result, "$1").into_owned()
}
