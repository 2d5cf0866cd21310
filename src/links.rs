use crate::{LOCALE_MARKER, SOURCE_EXT};

use regex::{Captures, Regex};
use std::sync::LazyLock;

static MD_LINK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\[.*?\])\((.*?\.md)\)").expect("valid regex"));

/// Points every Markdown link whose target ends in `.md` at the translated file,
/// e.g. `[Setup](setup.md)` becomes `[Setup](setup_DE.md)`.
///
/// Works on text only: targets are not checked for existence, and a target that
/// already carries the marker gets a second one (`doc_DE.md` -> `doc_DE_DE.md`).
pub fn rewrite_links(text: &str) -> String {
    MD_LINK_REGEX
        .replace_all(text, |caps: &Captures| {
            let label = &caps[1];
            let target = &caps[2];
            let base = target.strip_suffix(SOURCE_EXT).unwrap_or(target);
            format!("{label}({base}{LOCALE_MARKER}{SOURCE_EXT})")
        })
        .into_owned()
}
