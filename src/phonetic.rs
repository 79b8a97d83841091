//! Spelling codes out loud.
//!
//! Letters use the NATO alphabet, digits and the separator are spelled as
//! English words. Every word comes out title-cased and space separated.

const LETTERS: [&str; 26] = [
    "Alpha", "Bravo", "Charlie", "Delta", "Echo", "Foxtrot", "Golf", "Hotel", "India", "Juliet",
    "Kilo", "Lima", "Mike", "November", "Oscar", "Papa", "Quebec", "Romeo", "Sierra", "Tango",
    "Uniform", "Victor", "Whiskey", "Xray", "Yankee", "Zulu",
];

const DIGITS: [&str; 10] = [
    "Zero", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine",
];

fn word(c: char) -> Option<&'static str> {
    match c {
        'a'..='z' | 'A'..='Z' => Some(LETTERS[(c.to_ascii_uppercase() as u8 - b'A') as usize]),
        '0'..='9' => Some(DIGITS[(c as u8 - b'0') as usize]),
        '+' => Some("Plus"),
        _ => None,
    }
}

fn title_case(w: &str) -> String {
    let mut chars = w.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Spells a code phonetically.
///
/// Characters without a spoken form are kept as their own word.
///
/// ```
/// assert_eq!(
///     plusplace::phonetic::to_phonetic("G8+7GV"),
///     "Golf Eight Plus Seven Golf Victor"
/// );
/// ```
pub fn to_phonetic(code: &str) -> String {
    code.trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match word(c) {
            Some(w) => w.to_string(),
            None => title_case(&c.to_string()),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Phonetic rendering of an anchored short code.
///
/// The place name and country are kept verbatim.
pub fn anchored(short_code: &str, name: &str, country: &str) -> String {
    format!("{}, {}, {}", to_phonetic(short_code), name, country)
}
