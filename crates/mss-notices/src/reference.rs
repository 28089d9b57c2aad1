use std::sync::LazyLock;

use regex::Regex;

use crate::types::ItemReference;

/// Matches the listing's inline view handler anywhere in an `onclick` value.
///
/// ```text
/// invocation := "doBbsFView" "(" arg "," arg ( "," arg )* "," arg ")"
/// arg        := "'" DIGIT+ "'"
/// ```
///
/// At least three arguments. Group 1 is the second argument (board index),
/// group 2 the last one (parent sequence); the ones in between are row
/// indexes and flags and are skipped.
static RE_VIEW_HANDLER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"doBbsFView\('\d+','(\d+)'(?:,'\d+')*,'(\d+)'\)")
        .expect("invalid regex: view handler")
});

/// Recovers the detail-page identifiers from an `onclick` handler string.
///
/// Returns `None` when the handler does not follow the grammar above.
pub fn extract_reference(onclick: &str) -> Option<ItemReference> {
    let caps = RE_VIEW_HANDLER.captures(onclick)?;
    Some(ItemReference::new(&caps[1], &caps[2]))
}
