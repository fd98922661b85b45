//! Allow-lists accepted by the NewsData API for enumerated filters.

/// Article categories.
pub const CATEGORIES: &[&str] = &[
    "business",
    "crime",
    "domestic",
    "education",
    "entertainment",
    "environment",
    "food",
    "health",
    "lifestyle",
    "other",
    "politics",
    "science",
    "sports",
    "technology",
    "top",
    "tourism",
    "world",
];

/// ISO 3166 country codes (plus the API's own `wo` for "world").
pub const COUNTRIES: &[&str] = &[
    "af", "al", "dz", "ad", "ao", "ar", "am", "au", "at", "az", "bs", "bh", "bd", "bb", "by", "be",
    "bz", "bj", "bm", "bt", "bo", "ba", "bw", "br", "bn", "bg", "bf", "bi", "kh", "cm", "ca", "cv",
    "ky", "cf", "td", "cl", "cn", "co", "km", "cg", "ck", "cr", "hr", "cu", "cw", "cy", "cz", "dk",
    "dj", "dm", "do", "cd", "ec", "eg", "sv", "gq", "er", "ee", "sz", "et", "fj", "fi", "fr", "pf",
    "ga", "gm", "ge", "de", "gh", "gi", "gr", "gd", "gt", "gn", "gy", "ht", "hn", "hk", "hu", "is",
    "in", "id", "ir", "iq", "ie", "il", "it", "ci", "jm", "jp", "je", "jo", "kz", "ke", "ki", "xk",
    "kw", "kg", "la", "lv", "lb", "ls", "lr", "ly", "li", "lt", "lu", "mo", "mk", "mg", "mw", "my",
    "mv", "ml", "mt", "mh", "mr", "mu", "mx", "fm", "md", "mc", "mn", "me", "ma", "mz", "mm", "na",
    "nr", "np", "nl", "nc", "nz", "ni", "ne", "ng", "kp", "no", "om", "pk", "pw", "ps", "pa", "pg",
    "py", "pe", "ph", "pl", "pt", "pr", "qa", "ro", "ru", "rw", "lc", "sx", "ws", "sm", "st", "sa",
    "sn", "rs", "sc", "sl", "sg", "sk", "si", "sb", "so", "za", "kr", "es", "lk", "sd", "sr", "se",
    "ch", "sy", "tw", "tj", "tz", "th", "tl", "tg", "to", "tt", "tn", "tr", "tm", "tv", "ug", "ua",
    "ae", "gb", "us", "uy", "uz", "vu", "va", "ve", "vi", "vg", "wo", "ye", "zm", "zw",
];

/// Language codes. Several are API-specific (`jp`, `kz`, `kh`, `pi`, `zht`).
pub const LANGUAGES: &[&str] = &[
    "af", "sq", "am", "ar", "hy", "as", "az", "bm", "eu", "be", "bn", "bs", "bg", "my", "ca", "ckb",
    "zh", "hr", "cs", "da", "nl", "en", "et", "pi", "fi", "fr", "gl", "ka", "de", "el", "gu", "ha",
    "he", "hi", "hu", "is", "id", "it", "jp", "kn", "kz", "kh", "rw", "ko", "ku", "lv", "lt", "lb",
    "mk", "ms", "ml", "mt", "mi", "mr", "mn", "ne", "no", "or", "ps", "fa", "pl", "pt", "pa", "ro",
    "ru", "sm", "sr", "sn", "sd", "si", "sk", "sl", "so", "es", "sw", "sv", "tg", "ta", "te", "th",
    "zht", "tr", "tk", "uk", "ur", "uz", "vi", "cy", "zu",
];

/// Priority-domain tiers.
pub const PRIORITY_DOMAINS: &[&str] = &["top", "medium", "low"];

/// Sentiment labels.
pub const SENTIMENTS: &[&str] = &["positive", "negative", "neutral"];

/// AI tags accepted by the `tag` filter.
pub const TAGS: &[&str] = &[
    "adoption",
    "blockchain",
    "coin_fundamental",
    "competition",
    "developers_community",
    "economy",
    "education",
    "exchange",
    "founders_investors",
    "general",
    "geopolitics",
    "global_markets",
    "government",
    "liquidity",
    "mining",
    "scam",
    "security_privacy",
    "sentiments",
    "supply",
    "technical_analysis",
    "technology",
];

/// Article wire fields that may be named in `excludefield`.
pub const ARTICLE_FIELDS: &[&str] = &[
    "article_id",
    "title",
    "link",
    "keywords",
    "creator",
    "video_url",
    "description",
    "content",
    "pubDate",
    "pubDateTZ",
    "image_url",
    "source_id",
    "source_priority",
    "source_name",
    "source_url",
    "source_icon",
    "language",
    "country",
    "category",
    "ai_tag",
    "sentiment",
    "sentiment_stats",
    "ai_region",
    "ai_org",
    "coin",
    "duplicate",
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_lists_have_no_duplicates() {
        for list in [CATEGORIES, COUNTRIES, LANGUAGES, TAGS, ARTICLE_FIELDS] {
            let unique: HashSet<_> = list.iter().collect();
            assert_eq!(unique.len(), list.len());
        }
    }

    #[test]
    fn test_common_values_present() {
        assert!(CATEGORIES.contains(&"technology"));
        assert!(COUNTRIES.contains(&"us"));
        assert!(LANGUAGES.contains(&"en"));
        assert!(TAGS.contains(&"blockchain"));
    }
}
