use unicode_bidi::{BidiInfo, Level};

/// Shape a label for display. Labels containing Arabic/Persian script get
/// contextual letter joining plus a right-to-left visual reorder; anything
/// else passes through untouched. Shaped output carries presentation-form
/// codepoints (U+FB50.. / U+FE70..), which sit outside the gate below, so
/// feeding an already-shaped label back in is a no-op.
pub fn shape_text(text: &str) -> String {
    if !contains_arabic(text) {
        return text.to_string();
    }
    let joined = join_letters(text);
    reorder_rtl(&joined)
}

pub fn contains_arabic(text: &str) -> bool {
    text.chars().any(|ch| ('\u{0600}'..='\u{06FF}').contains(&ch))
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Joining {
    /// Connects to both neighbours (beh, seen, lam, ...).
    Dual,
    /// Connects to the preceding letter only (alef, dal, reh, waw, ...).
    Right,
    /// Never connects (hamza, punctuation, non-Arabic).
    None,
    /// Zero-width marks that do not interrupt joining (harakat).
    Transparent,
}

/// Presentation forms, indexed isolated / final / initial / medial.
/// Right-joining letters repeat isolated/final in the initial/medial slots.
type Forms = [char; 4];

const ISOLATED: usize = 0;
const FINAL: usize = 1;
const INITIAL: usize = 2;
const MEDIAL: usize = 3;

fn joining_class(ch: char) -> Joining {
    if letter_forms(ch).is_some() {
        match ch {
            '\u{0621}' => Joining::None,
            '\u{0622}' | '\u{0623}' | '\u{0624}' | '\u{0625}' | '\u{0627}' | '\u{0629}'
            | '\u{062F}' | '\u{0630}' | '\u{0631}' | '\u{0632}' | '\u{0648}' | '\u{0649}'
            | '\u{0698}' => Joining::Right,
            _ => Joining::Dual,
        }
    } else if is_transparent(ch) {
        Joining::Transparent
    } else {
        Joining::None
    }
}

fn is_transparent(ch: char) -> bool {
    matches!(ch,
        '\u{0610}'..='\u{061A}'
        | '\u{064B}'..='\u{065F}'
        | '\u{0670}'
        | '\u{06D6}'..='\u{06DC}'
        | '\u{06DF}'..='\u{06E4}'
        | '\u{06E7}'
        | '\u{06E8}'
        | '\u{06EA}'..='\u{06ED}')
}

fn letter_forms(ch: char) -> Option<Forms> {
    let forms = match ch {
        '\u{0621}' => ['\u{FE80}', '\u{FE80}', '\u{FE80}', '\u{FE80}'],
        '\u{0622}' => ['\u{FE81}', '\u{FE82}', '\u{FE81}', '\u{FE82}'],
        '\u{0623}' => ['\u{FE83}', '\u{FE84}', '\u{FE83}', '\u{FE84}'],
        '\u{0624}' => ['\u{FE85}', '\u{FE86}', '\u{FE85}', '\u{FE86}'],
        '\u{0625}' => ['\u{FE87}', '\u{FE88}', '\u{FE87}', '\u{FE88}'],
        '\u{0626}' => ['\u{FE89}', '\u{FE8A}', '\u{FE8B}', '\u{FE8C}'],
        '\u{0627}' => ['\u{FE8D}', '\u{FE8E}', '\u{FE8D}', '\u{FE8E}'],
        '\u{0628}' => ['\u{FE8F}', '\u{FE90}', '\u{FE91}', '\u{FE92}'],
        '\u{0629}' => ['\u{FE93}', '\u{FE94}', '\u{FE93}', '\u{FE94}'],
        '\u{062A}' => ['\u{FE95}', '\u{FE96}', '\u{FE97}', '\u{FE98}'],
        '\u{062B}' => ['\u{FE99}', '\u{FE9A}', '\u{FE9B}', '\u{FE9C}'],
        '\u{062C}' => ['\u{FE9D}', '\u{FE9E}', '\u{FE9F}', '\u{FEA0}'],
        '\u{062D}' => ['\u{FEA1}', '\u{FEA2}', '\u{FEA3}', '\u{FEA4}'],
        '\u{062E}' => ['\u{FEA5}', '\u{FEA6}', '\u{FEA7}', '\u{FEA8}'],
        '\u{062F}' => ['\u{FEA9}', '\u{FEAA}', '\u{FEA9}', '\u{FEAA}'],
        '\u{0630}' => ['\u{FEAB}', '\u{FEAC}', '\u{FEAB}', '\u{FEAC}'],
        '\u{0631}' => ['\u{FEAD}', '\u{FEAE}', '\u{FEAD}', '\u{FEAE}'],
        '\u{0632}' => ['\u{FEAF}', '\u{FEB0}', '\u{FEAF}', '\u{FEB0}'],
        '\u{0633}' => ['\u{FEB1}', '\u{FEB2}', '\u{FEB3}', '\u{FEB4}'],
        '\u{0634}' => ['\u{FEB5}', '\u{FEB6}', '\u{FEB7}', '\u{FEB8}'],
        '\u{0635}' => ['\u{FEB9}', '\u{FEBA}', '\u{FEBB}', '\u{FEBC}'],
        '\u{0636}' => ['\u{FEBD}', '\u{FEBE}', '\u{FEBF}', '\u{FEC0}'],
        '\u{0637}' => ['\u{FEC1}', '\u{FEC2}', '\u{FEC3}', '\u{FEC4}'],
        '\u{0638}' => ['\u{FEC5}', '\u{FEC6}', '\u{FEC7}', '\u{FEC8}'],
        '\u{0639}' => ['\u{FEC9}', '\u{FECA}', '\u{FECB}', '\u{FECC}'],
        '\u{063A}' => ['\u{FECD}', '\u{FECE}', '\u{FECF}', '\u{FED0}'],
        '\u{0640}' => ['\u{0640}', '\u{0640}', '\u{0640}', '\u{0640}'],
        '\u{0641}' => ['\u{FED1}', '\u{FED2}', '\u{FED3}', '\u{FED4}'],
        '\u{0642}' => ['\u{FED5}', '\u{FED6}', '\u{FED7}', '\u{FED8}'],
        '\u{0643}' => ['\u{FED9}', '\u{FEDA}', '\u{FEDB}', '\u{FEDC}'],
        '\u{0644}' => ['\u{FEDD}', '\u{FEDE}', '\u{FEDF}', '\u{FEE0}'],
        '\u{0645}' => ['\u{FEE1}', '\u{FEE2}', '\u{FEE3}', '\u{FEE4}'],
        '\u{0646}' => ['\u{FEE5}', '\u{FEE6}', '\u{FEE7}', '\u{FEE8}'],
        '\u{0647}' => ['\u{FEE9}', '\u{FEEA}', '\u{FEEB}', '\u{FEEC}'],
        '\u{0648}' => ['\u{FEED}', '\u{FEEE}', '\u{FEED}', '\u{FEEE}'],
        '\u{0649}' => ['\u{FEEF}', '\u{FEF0}', '\u{FEEF}', '\u{FEF0}'],
        '\u{064A}' => ['\u{FEF1}', '\u{FEF2}', '\u{FEF3}', '\u{FEF4}'],
        // Persian additions.
        '\u{067E}' => ['\u{FB56}', '\u{FB57}', '\u{FB58}', '\u{FB59}'],
        '\u{0686}' => ['\u{FB7A}', '\u{FB7B}', '\u{FB7C}', '\u{FB7D}'],
        '\u{0698}' => ['\u{FB8A}', '\u{FB8B}', '\u{FB8A}', '\u{FB8B}'],
        '\u{06A9}' => ['\u{FB8E}', '\u{FB8F}', '\u{FB90}', '\u{FB91}'],
        '\u{06AF}' => ['\u{FB92}', '\u{FB93}', '\u{FB94}', '\u{FB95}'],
        '\u{06CC}' => ['\u{FBFC}', '\u{FBFD}', '\u{FBFE}', '\u{FBFF}'],
        _ => return None,
    };
    Some(forms)
}

/// Lam-alef pairs collapse into a single ligature glyph, isolated or final
/// depending on whether the preceding letter connects.
fn lam_alef_ligature(alef: char) -> Option<[char; 2]> {
    let pair = match alef {
        '\u{0622}' => ['\u{FEF5}', '\u{FEF6}'],
        '\u{0623}' => ['\u{FEF7}', '\u{FEF8}'],
        '\u{0625}' => ['\u{FEF9}', '\u{FEFA}'],
        '\u{0627}' => ['\u{FEFB}', '\u{FEFC}'],
        _ => return None,
    };
    Some(pair)
}

/// Contextual joining pass: logical order in, logical order out, letters
/// replaced by their positional presentation forms.
fn join_letters(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());

    // Whether the previously emitted base letter connects to the next one.
    let mut prev_connects = false;
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        let class = joining_class(ch);

        if class == Joining::Transparent {
            out.push(ch);
            i += 1;
            continue;
        }

        let Some(forms) = letter_forms(ch) else {
            out.push(ch);
            prev_connects = false;
            i += 1;
            continue;
        };

        // Lam followed directly by an alef variant becomes one ligature.
        if ch == '\u{0644}'
            && let Some(&next) = chars.get(i + 1)
            && let Some(ligature) = lam_alef_ligature(next)
        {
            out.push(if prev_connects { ligature[1] } else { ligature[0] });
            // The ligature ends in alef, which never connects forward.
            prev_connects = false;
            i += 2;
            continue;
        }

        let next_class = chars[i + 1..]
            .iter()
            .map(|&c| joining_class(c))
            .find(|&c| c != Joining::Transparent);
        let next_connects = class == Joining::Dual
            && matches!(next_class, Some(Joining::Dual) | Some(Joining::Right));

        let slot = match (prev_connects, next_connects) {
            (true, true) => MEDIAL,
            (true, false) => FINAL,
            (false, true) => INITIAL,
            (false, false) => ISOLATED,
        };
        out.push(forms[slot]);
        prev_connects = class == Joining::Dual;
        i += 1;
    }

    out
}

/// Reorder a joined string into right-to-left visual order. The paragraph
/// level is forced RTL so that a label holding digits or Latin fragments
/// still reads as an RTL line overall.
fn reorder_rtl(text: &str) -> String {
    let info = BidiInfo::new(text, Some(Level::rtl()));
    let mut out = String::with_capacity(text.len());
    for para in &info.paragraphs {
        out.push_str(&info.reorder_line(para, para.range.clone()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin_passes_through() {
        assert_eq!(shape_text("Products"), "Products");
        assert_eq!(shape_text(""), "");
        assert_eq!(shape_text("a & b"), "a & b");
    }

    #[test]
    fn salam_joins_and_reverses() {
        // seen + lam-alef ligature + meem, in visual (left-to-right) order.
        let shaped = shape_text("\u{0633}\u{0644}\u{0627}\u{0645}");
        let expected: String = ['\u{FEE1}', '\u{FEFC}', '\u{FEB3}'].iter().collect();
        assert_eq!(shaped, expected);
    }

    #[test]
    fn shaping_is_stable_on_shaped_input() {
        let once = shape_text("\u{0633}\u{0644}\u{0627}\u{0645}");
        let twice = shape_text(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn isolated_letter_keeps_isolated_form() {
        // A lone dal has no neighbours to join with.
        assert_eq!(shape_text("\u{062F}"), "\u{FEA9}");
    }

    #[test]
    fn right_joiner_breaks_the_chain() {
        // beh + alef + beh: alef takes final form but never connects
        // forward, so the trailing beh is isolated.
        let shaped = shape_text("\u{0628}\u{0627}\u{0628}");
        let expected: String = ['\u{FE8F}', '\u{FE8E}', '\u{FE91}'].iter().collect();
        assert_eq!(shaped, expected);
    }

    #[test]
    fn harakat_do_not_interrupt_joining() {
        // beh + fatha + beh still joins initial/final around the mark.
        let shaped = join_letters("\u{0628}\u{064E}\u{0628}");
        let chars: Vec<char> = shaped.chars().collect();
        assert_eq!(chars[0], '\u{FE91}');
        assert_eq!(chars[1], '\u{064E}');
        assert_eq!(chars[2], '\u{FE90}');
    }

    #[test]
    fn mixed_digits_stay_readable() {
        let shaped = shape_text("\u{0633}\u{0644}\u{0627}\u{0645} 42");
        assert!(shaped.contains("42"));
    }
}
