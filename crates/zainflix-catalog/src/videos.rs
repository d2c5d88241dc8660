use zainflix_models::Video;

/// Fixed type priority; anything not listed ranks below everything listed.
const TYPE_PRIORITY: [&str; 4] = ["Trailer", "Teaser", "Clip", "Featurette"];

/// Fixed host priority, the tie-break within one type.
const SITE_PRIORITY: [&str; 2] = ["YouTube", "Vimeo"];

fn rank_in(list: &[&str], value: Option<&str>) -> usize {
    value
        .and_then(|v| list.iter().position(|candidate| *candidate == v))
        .unwrap_or(usize::MAX)
}

/// Picks the single video to play from a set of candidates: keep those with
/// both a playable key and a known host, rank by type then host, take the
/// highest. The ordering is total, so the same inputs always yield the same
/// choice; None when no candidate qualifies.
pub fn select_best_video(videos: &[Video]) -> Option<&Video> {
    videos
        .iter()
        .filter(|v| {
            v.key.as_deref().is_some_and(|k| !k.is_empty())
                && v.site.as_deref().is_some_and(|s| !s.is_empty())
        })
        .min_by_key(|v| {
            (
                rank_in(&TYPE_PRIORITY, v.kind.as_deref()),
                rank_in(&SITE_PRIORITY, v.site.as_deref()),
            )
        })
}
