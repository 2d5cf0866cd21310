use std::borrow::Cow;
use unicode_segmentation::UnicodeSegmentation;

/// First line of `text`, cut to at most `max_graphemes` graphemes, for log messages.
pub fn preview(text: &str, max_graphemes: usize) -> Cow<'_, str> {
    let line = text.lines().next().unwrap_or_default();
    if line.graphemes(true).nth(max_graphemes).is_some() {
        let cut = line.graphemes(true).take(max_graphemes).collect::<String>();
        Cow::Owned(cut + "...")
    } else {
        Cow::Borrowed(line)
    }
}
