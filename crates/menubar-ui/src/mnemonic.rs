use menubar_core::{AttrMask, Cell, Style};

/// A label with its access key extracted.
///
/// `&` before a character marks it as the access key; `&&` is a literal
/// ampersand. Only the first marker counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mnemonic {
    /// Label text with the markers removed.
    pub text: String,
    /// Lowercased access key.
    pub key: Option<char>,
    /// Char index of the access key within `text`.
    pub index: Option<usize>,
}

impl Mnemonic {
    pub fn parse(label: &str) -> Self {
        let mut text = String::with_capacity(label.len());
        let mut key = None;
        let mut index = None;
        let mut len = 0;
        let mut chars = label.chars().peekable();

        while let Some(ch) = chars.next() {
            if ch == '&' {
                match chars.next() {
                    Some('&') => {}
                    Some(next) => {
                        if key.is_none() {
                            key = next.to_lowercase().next();
                            index = Some(len);
                        }
                        text.push(next);
                        len += 1;
                        continue;
                    }
                    None => break,
                }
            }
            text.push(ch);
            len += 1;
        }

        Self { text, key, index }
    }

    /// Number of columns the display text occupies.
    #[inline]
    pub fn width(&self) -> i32 {
        self.text.chars().count() as i32
    }

    /// Cells for the display text in `style`, the access key underlined when
    /// `show_key` is set.
    pub fn cells(&self, style: Style, show_key: bool) -> impl Iterator<Item = Cell> + '_ {
        self.text.chars().enumerate().map(move |(i, ch)| {
            let style = if show_key && self.index == Some(i) {
                style.add_attrs(AttrMask::UNDERLINE)
            } else {
                style
            };
            Cell::new(ch, style)
        })
    }
}
