//! Unicode glyph tables shared by the scanner and the notation expander

/// Greek letters that may start an identifier (`π`, `ε` and `ξ` are constants)
pub const GREEK_IDENTIFIER_LETTERS: &str = "αβγΔδζηθιλμρσϕφχψτωΩ";

/// Special constants that are single glyphs
pub const CONSTANT_GLYPHS: &str = "πεξ∞∅";

/// Look-alikes that are all read as the magnitude bar `‖`
pub const DOUBLE_BAR_GLYPHS: &str = "‖∥𝄁║Ⅱǁ";

const SUPERSCRIPTS: &[(char, &str)] = &[
    ('⁺', "+"),
    ('⁻', "-"),
    ('⁰', "0"),
    ('¹', "1"),
    ('²', "2"),
    ('³', "3"),
    ('⁴', "4"),
    ('⁵', "5"),
    ('⁶', "6"),
    ('⁷', "7"),
    ('⁸', "8"),
    ('⁹', "9"),
    ('ᵃ', " a "),
    ('ᵝ', " β "),
    ('ⁱ', " i "),
    ('ʲ', " j "),
    ('ˣ', " x "),
    ('ᵏ', " k "),
    ('ᵘ', " u "),
    ('ⁿ', " n "),
    ('⁽', "("),
    ('⁾', ")"),
];

const SUBSCRIPTS: &[(char, &str)] = &[
    ('₊', "+"),
    ('₋', "-"),
    ('₀', "0"),
    ('₁', "1"),
    ('₂', "2"),
    ('₃', "3"),
    ('₄', "4"),
    ('₅', "5"),
    ('₆', "6"),
    ('₇', "7"),
    ('₈', "8"),
    ('₉', "9"),
    ('ₐ', " a "),
    ('ᵦ', " β "),
    ('ᵢ', " i "),
    ('ⱼ', " j "),
    ('ₓ', " x "),
    ('ₖ', " k "),
    ('ᵤ', " u "),
    ('ₙ', " n "),
    ('₍', "("),
    ('₎', ")"),
];

const FRACTIONS: &[(char, u32, u32)] = &[
    ('½', 1, 2),
    ('⅓', 1, 3),
    ('⅔', 2, 3),
    ('¼', 1, 4),
    ('¾', 3, 4),
    ('⅕', 1, 5),
    ('⅖', 2, 5),
    ('⅗', 3, 5),
    ('⅘', 4, 5),
    ('⅙', 1, 6),
    ('⅐', 1, 7),
    ('⅛', 1, 8),
    ('⅑', 1, 9),
    ('⅒', 1, 10),
];

/// Plain-text reading of a superscript glyph
pub fn superscript_to_normal(c: char) -> Option<&'static str> {
    SUPERSCRIPTS.iter().find(|(g, _)| *g == c).map(|(_, s)| *s)
}

/// Plain-text reading of a subscript glyph
pub fn subscript_to_normal(c: char) -> Option<&'static str> {
    SUBSCRIPTS.iter().find(|(g, _)| *g == c).map(|(_, s)| *s)
}

/// Numerator and denominator of a vulgar fraction glyph
pub fn fraction_parts(c: char) -> Option<(u32, u32)> {
    FRACTIONS
        .iter()
        .find(|(g, _, _)| *g == c)
        .map(|(_, n, d)| (*n, *d))
}

pub fn is_greek_identifier_letter(c: char) -> bool {
    GREEK_IDENTIFIER_LETTERS.contains(c)
}

pub fn is_constant_glyph(c: char) -> bool {
    CONSTANT_GLYPHS.contains(c)
}

pub fn is_double_bar(c: char) -> bool {
    DOUBLE_BAR_GLYPHS.contains(c)
}
