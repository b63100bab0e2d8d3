//! Measurement unit inference from retailer size strings.
//!
//! Retailers describe quantities in free text (`"600mL"`, `"$1.55 / 1L"`,
//! `"Each"`). These helpers reduce that text to one of a small set of unit
//! labels by substring matching, checking heavier or more specific tokens
//! first so `kg` wins over `g` and `ml` is never reported as `L`.

/// Kilograms.
pub const KG: &str = "kg";
/// Grams.
pub const G: &str = "g";
/// Litres.
pub const L: &str = "L";
/// Millilitres.
pub const ML: &str = "ml";
/// Single items.
pub const EACH: &str = "each";
/// Multipacks.
pub const PACK: &str = "pack";

/// Maps a size string to a unit label.
///
/// With `accept_ea`, the abbreviation `ea` also counts as [`EACH`]; this is
/// only safe for short per-unit strings such as cup prices, where `ea` cannot
/// appear inside a longer word.
///
/// # Examples
///
/// ```
/// use supermarket_mcp_bridge::retailer::unit::unit_from_text;
///
/// assert_eq!(unit_from_text("1.5kg", false), Some("kg"));
/// assert_eq!(unit_from_text("600mL", false), Some("ml"));
/// assert_eq!(unit_from_text("2L", false), Some("L"));
/// assert_eq!(unit_from_text("1ea", true), Some("each"));
/// assert_eq!(unit_from_text("1ea", false), None);
/// ```
#[must_use]
pub fn unit_from_text(text: &str, accept_ea: bool) -> Option<&'static str> {
    let text = text.to_lowercase();
    if text.contains("kg") {
        Some(KG)
    } else if text.contains('g') {
        Some(G)
    } else if text.contains('l') && !text.contains("ml") {
        Some(L)
    } else if text.contains("ml") {
        Some(ML)
    } else if text.contains("each") || (accept_ea && text.contains("ea")) {
        Some(EACH)
    } else if text.contains("pack") || text.contains("pk") {
        Some(PACK)
    } else {
        None
    }
}

/// Size fields carried by a Woolworths product.
#[derive(Debug, Clone, Copy, Default)]
pub struct SizeHints<'a> {
    /// `PackageSize`, e.g. `"600mL"`.
    pub package_size: Option<&'a str>,
    /// `CupString`, e.g. `"$2.50 / 1L"`.
    pub cup_string: Option<&'a str>,
    /// `CupMeasure`, e.g. `"1L"`.
    pub cup_measure: Option<&'a str>,
    /// `Unit`, usually `"Each"`.
    pub unit: Option<&'a str>,
}

impl SizeHints<'_> {
    /// Infers a unit, trying package size, then the per-unit part of the cup
    /// price, then the cup measure, then an exact `each` unit field.
    #[must_use]
    pub fn infer(&self) -> Option<&'static str> {
        non_empty(self.package_size)
            .and_then(|size| unit_from_text(size, false))
            .or_else(|| non_empty(self.cup_string).and_then(cup_unit))
            .or_else(|| non_empty(self.cup_measure).and_then(|m| unit_from_text(m, false)))
            .or_else(|| {
                non_empty(self.unit).filter(|u| u.eq_ignore_ascii_case(EACH)).map(|_| EACH)
            })
    }
}

/// Unit of a cup price string: the text after the last `/`, if any.
fn cup_unit(cup_string: &str) -> Option<&'static str> {
    let target = match cup_string.rsplit_once('/') {
        Some((_, per)) => per.trim(),
        None => cup_string,
    };
    unit_from_text(target, true)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
