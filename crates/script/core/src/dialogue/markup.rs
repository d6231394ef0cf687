//! Client dialogue markup.
//!
//! Dialogue strings embed `#`-prefixed tokens the client interprets: colours
//! (`#b`, `#d`, `#g`, `#k`, `#r`), weight (`#e`, `#n`) and menu links
//! (`#L<n>#label#l`). Scripts treat these as opaque text. Hosts without the
//! game client use [`plain`] to render, and the runtime uses [`menu_options`]
//! to validate menu selections.

const STYLE_CODES: &[u8] = b"bdegknr";

/// One `#L<n>#label#l` entry of a menu prompt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuOption {
    pub index: u32,
    pub label: String,
}

/// Strips all markup tokens, keeping the visible text.
pub fn plain(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'#'
            && let Some(len) = token_len(&bytes[i..])
        {
            out.push_str(&text[copied..i]);
            i += len;
            copied = i;
            continue;
        }
        i += 1;
    }

    out.push_str(&text[copied..]);
    out
}

/// Extracts the numbered options of a menu prompt in declaration order.
pub fn menu_options(text: &str) -> Vec<MenuOption> {
    let mut options = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find("#L") {
        let after = &rest[start + 2..];
        let digits = after.bytes().take_while(|b| b.is_ascii_digit()).count();
        let index = match after.as_bytes().get(digits) {
            Some(b'#') if digits > 0 => after[..digits].parse::<u32>().ok(),
            _ => None,
        };
        let Some(index) = index else {
            rest = after;
            continue;
        };

        let body = &after[digits + 1..];
        let (label, next) = match body.find("#l") {
            Some(end) => (&body[..end], &body[end + 2..]),
            None => (body, ""),
        };
        options.push(MenuOption {
            index,
            label: plain(label).trim().to_owned(),
        });
        rest = next;
    }

    options
}

/// Length of the markup token at the start of `bytes` (which begins with `#`).
fn token_len(bytes: &[u8]) -> Option<usize> {
    let code = *bytes.get(1)?;
    if code == b'L' {
        let digits = bytes[2..].iter().take_while(|b| b.is_ascii_digit()).count();
        return (digits > 0 && bytes.get(2 + digits) == Some(&b'#')).then_some(digits + 3);
    }
    (code == b'l' || STYLE_CODES.contains(&code)).then_some(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_strips_style_and_links() {
        assert_eq!(
            plain("This is the #rPrimrose Hill#k. Go!"),
            "This is the Primrose Hill. Go!"
        );
        assert_eq!(
            plain("#e#b#rPrimrose Hill#k is not yet ready. Sorry!#n#k"),
            "Primrose Hill is not yet ready. Sorry!"
        );
        assert_eq!(plain("#L0#Yes, I will go.#l"), "Yes, I will go.");
    }

    #[test]
    fn plain_keeps_unknown_hashes() {
        assert_eq!(plain("rank #1 #z"), "rank #1 #z");
        assert_eq!(plain("#L#oops"), "#L#oops");
        assert_eq!(plain("trailing #"), "trailing #");
    }

    #[test]
    fn menu_options_in_order() {
        let text = "Would you like to go help Growlie?\r\n#b#L0#Yes, I will go.#l\r\n#L1##rNo#k#l";
        assert_eq!(
            menu_options(text),
            vec![
                MenuOption {
                    index: 0,
                    label: "Yes, I will go.".into()
                },
                MenuOption {
                    index: 1,
                    label: "No".into()
                },
            ]
        );
    }

    #[test]
    fn menu_without_links_has_no_options() {
        assert!(menu_options("Just text").is_empty());
        assert!(menu_options("#Lx#bad#l").is_empty());
    }
}
