//! Entry disciplines: which characters a field accepts, how it folds case,
//! and whether it masks what it shows.
use std::str::FromStr;

use super::error::{Error, Result};

/// The display discipline of an editable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DisplayType {
    /// Alphabetic characters.
    Char,
    /// Alphabetic characters, masked.
    HChar,
    /// Digits.
    Int,
    /// Digits, masked.
    HInt,
    /// Any printable character.
    #[default]
    Mixed,
    /// Any printable character, masked.
    HMixed,
    /// Alphabetic characters folded to upper case.
    UChar,
    /// Alphabetic characters folded to lower case.
    LChar,
    /// Alphabetic characters folded to upper case, masked.
    UHChar,
    /// Alphabetic characters folded to lower case, masked.
    LHChar,
    /// Any printable character, letters folded to upper case.
    UMixed,
    /// Any printable character, letters folded to lower case.
    LMixed,
    /// Any printable character, letters folded to upper case, masked.
    UHMixed,
    /// Any printable character, letters folded to lower case, masked.
    LHMixed,
    /// Not editable.
    ViewOnly,
}

impl FromStr for DisplayType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match s {
            "CHAR" => Self::Char,
            "HCHAR" => Self::HChar,
            "INT" => Self::Int,
            "HINT" => Self::HInt,
            "MIXED" => Self::Mixed,
            "HMIXED" => Self::HMixed,
            "UCHAR" => Self::UChar,
            "LCHAR" => Self::LChar,
            "UHCHAR" => Self::UHChar,
            "LHCHAR" => Self::LHChar,
            "UMIXED" => Self::UMixed,
            "LMIXED" => Self::LMixed,
            "UHMIXED" => Self::UHMixed,
            "LHMIXED" => Self::LHMixed,
            "VIEWONLY" => Self::ViewOnly,
            _ => return Err(Error::Invalid(format!("unknown display type: {s}"))),
        })
    }
}

/// Which characters a filter accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharClass {
    /// Anything that is not a digit.
    Alphabetic,
    /// Digits only.
    Numeric,
    /// Any printable character.
    Mixed,
    /// Nothing; the field is read-only.
    ViewOnly,
}

/// Case folding applied to accepted characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaseFold {
    /// Leave case alone.
    Keep,
    /// Fold to upper case.
    Upper,
    /// Fold to lower case.
    Lower,
}

/// A resolved character filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CharacterFilter {
    /// Accepted characters.
    pub class: CharClass,
    /// Case folding.
    pub case: CaseFold,
    /// Accepted characters are displayed masked.
    pub masked: bool,
}

impl From<DisplayType> for CharacterFilter {
    fn from(d: DisplayType) -> Self {
        use CaseFold::*;
        use CharClass::*;
        use DisplayType as D;
        let (class, case, masked) = match d {
            D::Char => (Alphabetic, Keep, false),
            D::HChar => (Alphabetic, Keep, true),
            D::UChar => (Alphabetic, Upper, false),
            D::LChar => (Alphabetic, Lower, false),
            D::UHChar => (Alphabetic, Upper, true),
            D::LHChar => (Alphabetic, Lower, true),
            D::Int => (Numeric, Keep, false),
            D::HInt => (Numeric, Keep, true),
            D::Mixed => (Mixed, Keep, false),
            D::HMixed => (Mixed, Keep, true),
            D::UMixed => (Mixed, Upper, false),
            D::LMixed => (Mixed, Lower, false),
            D::UHMixed => (Mixed, Upper, true),
            D::LHMixed => (Mixed, Lower, true),
            D::ViewOnly => (ViewOnly, Keep, false),
        };
        Self {
            class,
            case,
            masked,
        }
    }
}

impl CharacterFilter {
    /// Filter one typed character. Returns the character to store, or `None`
    /// if the field rejects it.
    pub fn filter(&self, ch: char) -> Option<char> {
        if ch.is_control() {
            return None;
        }
        let accepted = match self.class {
            CharClass::Alphabetic => !ch.is_ascii_digit(),
            CharClass::Numeric => ch.is_ascii_digit(),
            CharClass::Mixed => true,
            CharClass::ViewOnly => false,
        };
        if !accepted {
            return None;
        }
        Some(match self.case {
            CaseFold::Keep => ch,
            CaseFold::Upper => ch.to_ascii_uppercase(),
            CaseFold::Lower => ch.to_ascii_lowercase(),
        })
    }

    /// Are accepted characters displayed masked?
    pub fn is_masked(&self) -> bool {
        self.masked
    }

    /// Is the field read-only?
    pub fn is_view_only(&self) -> bool {
        self.class == CharClass::ViewOnly
    }
}
