//! Parameter categorization by name
//!
//! Flight-test parameter names follow loose conventions (`PRESSUREALTITUDE_FT`,
//! `CAS_KT`, `TAT_C`, ...). Each name is matched case-insensitively against a
//! keyword list per category, in priority order, and the first hit wins.

use crate::types::Category;

/// Keywords per category, checked top to bottom
pub const CATEGORY_KEYWORDS: [(Category, &[&str]); 4] = [
    (Category::Altitude, &["ALT"]),
    (Category::Speed, &["SPEED", "CAS", "TAS", "MACH"]),
    (Category::Temperature, &["TEMP", "TAT"]),
    (Category::Rate, &["RATE"]),
];

/// Assign a parameter name to exactly one category
///
/// # Examples
/// ```
/// use flight_analyzer::{categorize, Category};
///
/// assert_eq!(categorize("PRESSUREALTITUDE_FT"), Category::Altitude);
/// assert_eq!(categorize("ELECTRONICSTEMP_C"), Category::Temperature);
/// assert_eq!(categorize("RANDOMSENSOR"), Category::Other);
/// ```
pub fn categorize(name: &str) -> Category {
    let upper = name.to_uppercase();
    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| upper.contains(kw)))
        .map(|(category, _)| *category)
        .unwrap_or(Category::Other)
}

/// True if the name contains the rate keyword, regardless of its category
pub fn is_rate_parameter(name: &str) -> bool {
    name.to_uppercase().contains("RATE")
}

/// Group names by category, preserving source order within each group
///
/// Every category is present in the result, in priority order, even when empty.
pub fn group_by_category<'a, I>(names: I) -> Vec<(Category, Vec<String>)>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut groups: Vec<(Category, Vec<String>)> =
        Category::ALL.iter().map(|c| (*c, Vec::new())).collect();
    for name in names {
        let category = categorize(name);
        if let Some((_, members)) = groups.iter_mut().find(|(c, _)| *c == category) {
            members.push(name.to_string());
        }
    }
    groups
}
