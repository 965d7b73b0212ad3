use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

///
/// Normalizer
///
/// Accent normalization applied to literals for the `*_UNACCENT` operations.
/// Always called with an already lower-cased string. The storage layer is
/// expected to apply an equivalent function to the stored side.
///

pub trait Normalizer: Send + Sync {
    fn unaccent(&self, lowered: &str) -> String;
}

///
/// StripDiacritics
///
/// Canonical decomposition with combining marks removed.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct StripDiacritics;

impl Normalizer for StripDiacritics {
    fn unaccent(&self, lowered: &str) -> String {
        lowered
            .nfd()
            .filter(|c| !is_combining_mark(*c))
            .nfc()
            .collect()
    }
}
