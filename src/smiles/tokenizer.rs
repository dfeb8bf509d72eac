use crate::element::Element;
use crate::smiles::error::SmilesError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Atom(AtomToken),
    Bond(BondToken),
    RingClosure { digit: u16, pos: usize },
    OpenParen(usize),
    CloseParen(usize),
    Dot(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomToken {
    pub element: Element,
    pub is_aromatic: bool,
    pub isotope: u16,
    /// `Some` for bracket atoms (explicit count, possibly zero), `None` for
    /// organic-subset atoms whose count the builder derives from valence.
    pub hcount: Option<u8>,
    pub charge: i8,
    pub is_bracket: bool,
    pub pos: usize,
}

/// Bond as written. Directional bonds (`/`, `\`) are stereo markers for
/// double-bond geometry; HOSE codes are constitution-only, so they collapse
/// to single bonds here. Ring-closure digits carry no bond of their own:
/// the builder applies whatever bond token precedes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BondToken {
    Single,
    Double,
    Triple,
    Aromatic,
}

// Atoms writable in lowercase (aromatic); two-letter symbols first so `se`
// and `te` win over `s`. Only the single-letter ones are legal bare.
const AROMATIC_SYMBOLS: [(&str, Element); 8] = [
    ("se", Element::Se),
    ("te", Element::Te),
    ("b", Element::B),
    ("c", Element::C),
    ("n", Element::N),
    ("o", Element::O),
    ("p", Element::P),
    ("s", Element::S),
];

// Organic-subset atoms writable without brackets; two-letter symbols first
// so `Cl`/`Br` win over `C`/`B`.
const ORGANIC_SYMBOLS: [(&str, Element); 10] = [
    ("Cl", Element::Cl),
    ("Br", Element::Br),
    ("B", Element::B),
    ("C", Element::C),
    ("N", Element::N),
    ("O", Element::O),
    ("P", Element::P),
    ("S", Element::S),
    ("F", Element::F),
    ("I", Element::I),
];

pub fn tokenize(input: &str) -> Result<Vec<Token>, SmilesError> {
    let mut sc = Scanner::new(input);
    let mut tokens = Vec::new();
    // Tracks whether a bond symbol may appear here; only `-` is policed,
    // since it doubles as the charge sign inside brackets and a stray one is
    // almost always a malformed charge.
    let mut bond_legal = true;

    while let Some(b) = sc.peek() {
        let pos = sc.pos;
        match b {
            b' ' | b'\t' | b'\r' | b'\n' => {
                sc.pos += 1;
            }
            b'[' => {
                let atom = sc.bracket_atom()?;
                tokens.push(Token::Atom(atom));
                bond_legal = true;
            }
            b'=' => {
                sc.pos += 1;
                tokens.push(Token::Bond(BondToken::Double));
                bond_legal = false;
            }
            b'#' => {
                sc.pos += 1;
                tokens.push(Token::Bond(BondToken::Triple));
                bond_legal = false;
            }
            b':' => {
                sc.pos += 1;
                tokens.push(Token::Bond(BondToken::Aromatic));
                bond_legal = false;
            }
            b'/' | b'\\' => {
                sc.pos += 1;
                tokens.push(Token::Bond(BondToken::Single));
                bond_legal = false;
            }
            b'-' => {
                if !bond_legal {
                    return Err(SmilesError::UnexpectedChar { pos, ch: '-' });
                }
                sc.pos += 1;
                tokens.push(Token::Bond(BondToken::Single));
                bond_legal = false;
            }
            b'(' => {
                sc.pos += 1;
                tokens.push(Token::OpenParen(pos));
                bond_legal = false;
            }
            b')' => {
                sc.pos += 1;
                tokens.push(Token::CloseParen(pos));
                bond_legal = true;
            }
            b'.' => {
                sc.pos += 1;
                tokens.push(Token::Dot(pos));
                bond_legal = false;
            }
            b'%' => {
                sc.pos += 1;
                let digit = match (sc.take_digit(), sc.take_digit()) {
                    (Some(tens), Some(ones)) => tens as u16 * 10 + ones as u16,
                    _ => return Err(SmilesError::UnexpectedChar { pos, ch: '%' }),
                };
                tokens.push(Token::RingClosure { digit, pos });
                bond_legal = true;
            }
            b'0'..=b'9' => {
                sc.pos += 1;
                tokens.push(Token::RingClosure {
                    digit: (b - b'0') as u16,
                    pos,
                });
                bond_legal = true;
            }
            _ => {
                let atom = sc.organic_atom(pos)?;
                tokens.push(Token::Atom(atom));
                bond_legal = true;
            }
        }
    }

    Ok(tokens)
}

/// Byte cursor over the SMILES text. SMILES is ASCII; any non-ASCII byte
/// falls out of every table and surfaces as an unexpected character.
struct Scanner<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn eat(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn starts_with(&self, pat: &str) -> bool {
        self.src[self.pos..].starts_with(pat)
    }

    fn current_char(&self) -> char {
        self.src[self.pos..].chars().next().unwrap_or('\0')
    }

    fn take_digit(&mut self) -> Option<u8> {
        match self.peek() {
            Some(b @ b'0'..=b'9') => {
                self.pos += 1;
                Some(b - b'0')
            }
            _ => None,
        }
    }

    // A run of digits, capped at u16; `None` if there is no digit at all.
    fn take_number(&mut self) -> Option<u16> {
        let mut val: u32 = 0;
        let mut found = false;
        while let Some(b @ b'0'..=b'9') = self.peek() {
            found = true;
            val = (val * 10 + (b - b'0') as u32).min(u16::MAX as u32);
            self.pos += 1;
        }
        if found {
            Some(val as u16)
        } else {
            None
        }
    }

    // An organic-subset or bare-aromatic atom outside brackets.
    fn organic_atom(&mut self, pos: usize) -> Result<AtomToken, SmilesError> {
        for &(sym, element) in &ORGANIC_SYMBOLS {
            if self.starts_with(sym) {
                self.pos += sym.len();
                return Ok(bare_atom(element, false, pos));
            }
        }
        for &(sym, element) in &AROMATIC_SYMBOLS {
            if sym.len() == 1 && self.starts_with(sym) {
                self.pos += 1;
                return Ok(bare_atom(element, true, pos));
            }
        }
        Err(SmilesError::UnexpectedChar {
            pos,
            ch: self.current_char(),
        })
    }

    // `[isotope? element chirality? hcount? charge? class?]`. Chirality tags
    // and atom-class annotations are accepted and discarded.
    fn bracket_atom(&mut self) -> Result<AtomToken, SmilesError> {
        let start = self.pos;
        self.pos += 1; // '['

        let isotope = self.take_number().unwrap_or(0);
        let (element, is_aromatic) = self.bracket_element(start)?;

        while self.eat(b'@') {}

        let hcount = if self.eat(b'H') {
            self.take_digit().unwrap_or(1)
        } else {
            0
        };

        let charge = self.charge(start)?;

        if self.eat(b':') {
            let _ = self.take_number();
        }

        if !self.eat(b']') {
            return Err(SmilesError::UnclosedBracket { pos: start });
        }

        Ok(AtomToken {
            element,
            is_aromatic,
            isotope,
            hcount: Some(hcount),
            charge,
            is_bracket: true,
            pos: start,
        })
    }

    fn bracket_element(&mut self, bracket_start: usize) -> Result<(Element, bool), SmilesError> {
        if self.peek().is_none() {
            return Err(SmilesError::UnclosedBracket { pos: bracket_start });
        }

        for &(sym, element) in &AROMATIC_SYMBOLS {
            if self.starts_with(sym) {
                // A one-letter match must not swallow the head of a longer
                // lowercase name.
                let after = self.bytes.get(self.pos + sym.len());
                if sym.len() == 2 || !after.is_some_and(|b| b.is_ascii_lowercase()) {
                    self.pos += sym.len();
                    return Ok((element, true));
                }
            }
        }

        if let Some(element) = self.take_element(2) {
            return Ok((element, false));
        }
        if let Some(element) = self.take_element(1) {
            return Ok((element, false));
        }

        Err(SmilesError::InvalidElement {
            pos: self.pos,
            text: self.current_char().to_string(),
        })
    }

    // An uppercase symbol of exactly `len` letters, consumed only on match.
    fn take_element(&mut self, len: usize) -> Option<Element> {
        let end = self.pos + len;
        if end > self.bytes.len() {
            return None;
        }
        let sym = self.src.get(self.pos..end)?;
        let mut chars = sym.chars();
        let head_upper = chars.next().is_some_and(|c| c.is_ascii_uppercase());
        let tail_lower = chars.all(|c| c.is_ascii_lowercase());
        if !head_upper || !tail_lower {
            return None;
        }
        let element = Element::from_symbol(sym)?;
        self.pos = end;
        Some(element)
    }

    // `+`, `-`, repeated signs (`++`), or a signed magnitude (`+2`).
    fn charge(&mut self, bracket_start: usize) -> Result<i8, SmilesError> {
        let sign_byte = match self.peek() {
            Some(b @ (b'+' | b'-')) => b,
            _ => return Ok(0),
        };
        self.pos += 1;

        let mut magnitude: u16 = 1;
        if self.peek() == Some(sign_byte) {
            while self.eat(sign_byte) {
                magnitude = magnitude.saturating_add(1);
            }
        } else if let Some(n) = self.take_number() {
            magnitude = n;
        }

        let signed = if sign_byte == b'+' {
            magnitude as i32
        } else {
            -(magnitude as i32)
        };
        i8::try_from(signed).map_err(|_| SmilesError::InvalidCharge { pos: bracket_start })
    }
}

fn bare_atom(element: Element, aromatic: bool, pos: usize) -> AtomToken {
    AtomToken {
        element,
        is_aromatic: aromatic,
        isotope: 0,
        hcount: None,
        charge: 0,
        is_bracket: false,
        pos,
    }
}
