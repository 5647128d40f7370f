//! Pure extraction of item tuples from collection page HTML.
//!
//! Steam renders collection members as `collectionItem` divs whose element id
//! carries the workshop item id (`id="sharedfile_<digits>"`), with the item
//! title in a `workshopItemTitle` div inside each entry. The page's app is
//! taken from the first `/app/<digits>` link. Extraction is regex-based and
//! deliberately tolerant: anything that does not look like an item is noise.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static DIV_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<div\b[^>]*>").expect("div tag pattern is valid"));

static SHAREDFILE_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"id="sharedfile_(\d+)""#).expect("id pattern is valid"));

static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<div class="workshopItemTitle">([^<]*)</div>"#).expect("title pattern is valid")
});

static APP_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"href=[^>]*?/app/(\d+)").expect("app link pattern is valid"));

/// Extract `(item_id, title)` pairs in page order.
///
/// Titles are paired by document position (each collection entry renders
/// exactly one title div); an entry whose title is missing or blank yields
/// `None`. Item ids key all run state downstream, so the first occurrence
/// wins if a page ever repeats one.
pub(crate) fn extract_items(html: &str) -> Vec<(String, Option<String>)> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut ids: Vec<String> = Vec::new();

    for tag in DIV_TAG_RE.find_iter(html) {
        let tag = tag.as_str();
        if !tag.contains("collectionItem") {
            continue;
        }
        if let Some(caps) = SHAREDFILE_ID_RE.captures(tag) {
            let id = caps[1].to_string();
            if seen.insert(id.clone()) {
                ids.push(id);
            }
        }
    }

    let mut titles = TITLE_RE
        .captures_iter(html)
        .map(|caps| decode_entities(caps[1].trim()));

    ids.into_iter()
        .map(|id| {
            let title = titles.next().filter(|t| !t.is_empty());
            (id, title)
        })
        .collect()
}

/// Extract the app id from the first `/app/<digits>` link, if any.
pub(crate) fn extract_app_id(html: &str) -> Option<String> {
    APP_LINK_RE
        .captures(html)
        .map(|caps| caps[1].to_string())
}

/// Decode the handful of HTML entities Steam actually emits in titles.
fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}
