//! The `Options` configuration value (spec §3) and the serialised `Flags`
//! word it maps to at the host/GPU boundary (spec §6).

use bitflags::bitflags;
use bon::bon;

use crate::MAX_FIELD_SEP_LEN;

bitflags! {
    /// The flags word used both as the serialised form of [`Options`] (for
    /// upload to a GPU kernel) and as the host-side GPU dispatch config.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Flags: u32 {
        const CASE_INSENSITIVE   = 1 << 0;
        const PRINT_LINE_NUMBER  = 1 << 1;
        const FIELD_EXTRACTION   = 1 << 2;
        const SUBSTITUTION_MODE  = 1 << 3;
        const GLOBAL_SUBSTITUTION = 1 << 4;
        const INVERT_MATCH       = 1 << 5;
        /// Reserved; not implemented in this scope (spec §6, bit 6).
        const REGEX_FIELD_SEPARATOR = 1 << 6;
    }
}

/// The field separator mode (spec §4.E).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldSeparator {
    /// The AWK default: runs of space/tab collapse, leading/trailing
    /// whitespace produce no empty fields.
    Whitespace,
    /// A single separator byte; consecutive occurrences produce empty
    /// fields.
    Byte(u8),
    /// A multi-byte separator string, matched exactly; at most
    /// [`MAX_FIELD_SEP_LEN`] bytes.
    Bytes(Box<[u8]>),
}

impl FieldSeparator {
    pub fn bytes(sep: impl Into<Box<[u8]>>) -> Self {
        let sep = sep.into();
        debug_assert!(
            sep.len() <= MAX_FIELD_SEP_LEN,
            "field separator exceeds MAX_FIELD_SEP_LEN"
        );
        match sep.len() {
            1 => Self::Byte(sep[0]),
            _ => Self::Bytes(sep),
        }
    }
}

impl Default for FieldSeparator {
    fn default() -> Self {
        Self::Whitespace
    }
}

/// Configuration recognised by the matching/field-extraction core (spec
/// §3). Every field here is optional at the call site via the [`bon`]
/// builder; defaults match AWK's own defaults (whitespace splitting, no
/// inversion, no case folding).
#[derive(Clone, Debug)]
pub struct Options {
    pub case_insensitive: bool,
    pub invert_match: bool,
    pub field_separator: FieldSeparator,
    pub output_field_separator: Box<[u8]>,
    /// Purely informational for the core: it always computes every field,
    /// the collaborator decides which to print.
    pub requested_fields: Vec<u32>,
    pub global_substitution: bool,
}

#[bon]
impl Options {
    #[builder]
    pub fn new(
        #[builder(default = false)] case_insensitive: bool,
        #[builder(default = false)] invert_match: bool,
        #[builder(default)] field_separator: FieldSeparator,
        #[builder(default = Box::from(b" ".as_slice()))] output_field_separator: Box<[u8]>,
        #[builder(default)] requested_fields: Vec<u32>,
        #[builder(default = false)] global_substitution: bool,
    ) -> Self {
        Self {
            case_insensitive,
            invert_match,
            field_separator,
            output_field_separator,
            requested_fields,
            global_substitution,
        }
    }

    /// Serialise to the flags word used at the GPU/host boundary. Field
    /// extraction is reported enabled whenever a caller asked for it by
    /// requesting a field-bearing entry point; callers that only test lines
    /// should use [`Flags::to_options`]'s inverse manually if they need a
    /// pure match-only flag word.
    pub fn to_flags(&self, field_extraction: bool, substitution_mode: bool) -> Flags {
        let mut flags = Flags::empty();
        flags.set(Flags::CASE_INSENSITIVE, self.case_insensitive);
        flags.set(Flags::INVERT_MATCH, self.invert_match);
        flags.set(Flags::FIELD_EXTRACTION, field_extraction);
        flags.set(Flags::SUBSTITUTION_MODE, substitution_mode);
        flags.set(Flags::GLOBAL_SUBSTITUTION, self.global_substitution);
        flags
    }
}
