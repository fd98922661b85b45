//! Query parameter sets for each endpoint.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::api::Endpoint;
use crate::utils::{
    allowed, encode_fields, validate_fields, Field, FieldTable, FieldValue, QueryMap, Rule,
    ValidationError, MAX_LIST_ITEMS, MAX_QUERY_LEN,
};

/// Maximum page size accepted by the API.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Relative time window for the latest-news endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    /// Whole hours, 0 to 48. Encoded as `"6"`.
    Hours(u32),
    /// Minutes, 0 to 2880. Encoded as `"90m"`.
    Minutes(u32),
}

impl Timeframe {
    pub const MAX_HOURS: u32 = 48;
    pub const MAX_MINUTES: u32 = Self::MAX_HOURS * 60;

    /// Whether the window is inside the bounds the API accepts
    pub fn is_valid(&self) -> bool {
        match *self {
            Timeframe::Hours(h) => h <= Self::MAX_HOURS,
            Timeframe::Minutes(m) => m <= Self::MAX_MINUTES,
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timeframe::Hours(h) => write!(f, "{}", h),
            Timeframe::Minutes(m) => write!(f, "{}m", m),
        }
    }
}

impl FromStr for Timeframe {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parsed = match s.strip_suffix('m') {
            Some(minutes) => minutes.parse().map(Timeframe::Minutes),
            None => s.parse().map(Timeframe::Hours),
        };
        parsed.map_err(|_| ValidationError::InvalidTimeframe(s.to_string()))
    }
}

/// Encoding and pre-flight validation of a parameter set.
pub trait QueryParams {
    /// Flatten into the wire parameter map. Unset fields are omitted.
    fn encode(&self) -> QueryMap;

    /// Check every rule, returning the first violation.
    fn validate(&self) -> Result<(), ValidationError>;
}

/// A paginated article query bound to one endpoint.
///
/// The continuation token lives in [`BaseFilters::page`] and is the only
/// field the retrieval engine changes between pages. The provided builder
/// methods set the shared filters on any concrete query type.
pub trait NewsQuery: QueryParams + Clone + Send + Sync + fmt::Debug + 'static {
    /// Endpoint this query is sent to
    const ENDPOINT: Endpoint;

    fn base(&self) -> &BaseFilters;

    fn base_mut(&mut self) -> &mut BaseFilters;

    /// Current continuation token, if any
    fn page_token(&self) -> Option<&str> {
        self.base().page.as_deref()
    }

    /// Replace the continuation token
    fn set_page_token(&mut self, token: impl Into<String>) {
        self.base_mut().page = Some(token.into());
    }

    /// Restrict to specific article IDs
    fn ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.base_mut().ids = collect(ids);
        self
    }

    /// Search in article titles only
    fn query_in_title(mut self, query: impl Into<String>) -> Self {
        self.base_mut().query_in_title = query.into();
        self
    }

    /// Search in titles, URLs, meta keywords and meta descriptions
    fn query_in_metadata(mut self, query: impl Into<String>) -> Self {
        self.base_mut().query_in_metadata = query.into();
        self
    }

    fn categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.base_mut().categories = collect(categories);
        self
    }

    fn exclude_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.base_mut().exclude_categories = collect(categories);
        self
    }

    fn countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.base_mut().countries = collect(countries);
        self
    }

    fn languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.base_mut().languages = collect(languages);
        self
    }

    fn domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.base_mut().domains = collect(domains);
        self
    }

    fn domain_urls<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.base_mut().domain_urls = collect(urls);
        self
    }

    fn exclude_domains<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.base_mut().exclude_domains = collect(domains);
        self
    }

    /// Omit these article fields from responses (wire names, e.g. `"content"`)
    fn exclude_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.base_mut().exclude_fields = collect(fields);
        self
    }

    /// Only articles from `top`, `medium` or `low` tier domains
    fn priority_domain(mut self, tier: impl Into<String>) -> Self {
        self.base_mut().priority_domain = tier.into();
        self
    }

    fn timezone(mut self, timezone: impl Into<String>) -> Self {
        self.base_mut().timezone = timezone.into();
        self
    }

    /// Only articles with (`true`) or without (`false`) full content
    fn full_content(mut self, present: bool) -> Self {
        self.base_mut().full_content = Some(present);
        self
    }

    fn image(mut self, present: bool) -> Self {
        self.base_mut().image = Some(present);
        self
    }

    fn video(mut self, present: bool) -> Self {
        self.base_mut().video = Some(present);
        self
    }

    /// Results per page (1 to 50)
    fn size(mut self, size: u32) -> Self {
        self.base_mut().size = Some(size);
        self
    }

    /// Start from a continuation token returned by an earlier retrieval
    fn page(mut self, token: impl Into<String>) -> Self {
        self.set_page_token(token);
        self
    }
}

fn collect<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values.into_iter().map(Into::into).collect()
}

/// Filters shared by every article endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaseFilters {
    pub ids: Vec<String>,
    /// General search term
    pub query: String,
    pub query_in_title: String,
    pub query_in_metadata: String,
    pub categories: Vec<String>,
    pub exclude_categories: Vec<String>,
    pub countries: Vec<String>,
    pub languages: Vec<String>,
    pub domains: Vec<String>,
    pub domain_urls: Vec<String>,
    pub exclude_domains: Vec<String>,
    pub exclude_fields: Vec<String>,
    pub priority_domain: String,
    pub timezone: String,
    pub full_content: Option<bool>,
    pub image: Option<bool>,
    pub video: Option<bool>,
    pub size: Option<u32>,
    /// Continuation token; `None` on the first request
    pub page: Option<String>,
}

impl FieldTable for BaseFilters {
    const FIELDS: &'static [Field<Self>] = &[
        Field {
            key: "id",
            get: |b| FieldValue::List(&b.ids),
            rules: &[],
        },
        Field {
            key: "q",
            get: |b| FieldValue::Text(&b.query),
            rules: &[
                Rule::MaxLen(MAX_QUERY_LEN),
                Rule::ExclusiveWith(&["qInTitle", "qInMeta"]),
            ],
        },
        Field {
            key: "qInTitle",
            get: |b| FieldValue::Text(&b.query_in_title),
            rules: &[
                Rule::MaxLen(MAX_QUERY_LEN),
                Rule::ExclusiveWith(&["q", "qInMeta"]),
            ],
        },
        Field {
            key: "qInMeta",
            get: |b| FieldValue::Text(&b.query_in_metadata),
            rules: &[
                Rule::MaxLen(MAX_QUERY_LEN),
                Rule::ExclusiveWith(&["q", "qInTitle"]),
            ],
        },
        Field {
            key: "category",
            get: |b| FieldValue::List(&b.categories),
            rules: &[
                Rule::MaxItems(MAX_LIST_ITEMS),
                Rule::OneOf(allowed::CATEGORIES),
                Rule::ExclusiveWith(&["excludecategory"]),
            ],
        },
        Field {
            key: "excludecategory",
            get: |b| FieldValue::List(&b.exclude_categories),
            rules: &[
                Rule::MaxItems(MAX_LIST_ITEMS),
                Rule::OneOf(allowed::CATEGORIES),
                Rule::ExclusiveWith(&["category"]),
            ],
        },
        Field {
            key: "country",
            get: |b| FieldValue::List(&b.countries),
            rules: &[Rule::MaxItems(MAX_LIST_ITEMS), Rule::OneOf(allowed::COUNTRIES)],
        },
        Field {
            key: "language",
            get: |b| FieldValue::List(&b.languages),
            rules: &[Rule::MaxItems(MAX_LIST_ITEMS), Rule::OneOf(allowed::LANGUAGES)],
        },
        Field {
            key: "domain",
            get: |b| FieldValue::List(&b.domains),
            rules: &[Rule::MaxItems(MAX_LIST_ITEMS)],
        },
        Field {
            key: "domainurl",
            get: |b| FieldValue::List(&b.domain_urls),
            rules: &[Rule::MaxItems(MAX_LIST_ITEMS)],
        },
        Field {
            key: "excludedomain",
            get: |b| FieldValue::List(&b.exclude_domains),
            rules: &[Rule::MaxItems(MAX_LIST_ITEMS)],
        },
        Field {
            key: "excludefield",
            get: |b| FieldValue::List(&b.exclude_fields),
            rules: &[Rule::OneOf(allowed::ARTICLE_FIELDS)],
        },
        Field {
            key: "prioritydomain",
            get: |b| FieldValue::Text(&b.priority_domain),
            rules: &[Rule::OneOf(allowed::PRIORITY_DOMAINS)],
        },
        Field {
            key: "timezone",
            get: |b| FieldValue::Text(&b.timezone),
            rules: &[],
        },
        Field {
            key: "full_content",
            get: |b| FieldValue::Flag(b.full_content),
            rules: &[],
        },
        Field {
            key: "image",
            get: |b| FieldValue::Flag(b.image),
            rules: &[],
        },
        Field {
            key: "video",
            get: |b| FieldValue::Flag(b.video),
            rules: &[],
        },
        Field {
            key: "size",
            get: |b| FieldValue::Number(b.size),
            rules: &[Rule::Range(1, MAX_PAGE_SIZE)],
        },
        Field {
            key: "page",
            get: |b| FieldValue::Text(b.page.as_deref().unwrap_or_default()),
            rules: &[],
        },
    ];
}

impl BaseFilters {
    fn with_query(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }
}

/// Encode the shared filters, then the endpoint's own fields on top.
fn encode_with_base<T: FieldTable>(base: &BaseFilters, own: &T) -> QueryMap {
    let mut out = QueryMap::new();
    encode_fields(base, &mut out);
    encode_fields(own, &mut out);
    out
}

/// Query for the `latest` endpoint (news from the past 48 hours).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatestNewsQuery {
    pub base: BaseFilters,
    pub timeframe: Option<Timeframe>,
    /// AI tags
    pub tags: Vec<String>,
    pub sentiment: String,
    pub regions: Vec<String>,
    pub remove_duplicates: Option<bool>,
}

impl LatestNewsQuery {
    /// Create a new query with a general search term (may be empty)
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            base: BaseFilters::with_query(query),
            ..Default::default()
        }
    }

    pub fn timeframe(mut self, timeframe: Timeframe) -> Self {
        self.timeframe = Some(timeframe);
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = collect(tags);
        self
    }

    pub fn sentiment(mut self, sentiment: impl Into<String>) -> Self {
        self.sentiment = sentiment.into();
        self
    }

    pub fn regions<I, S>(mut self, regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.regions = collect(regions);
        self
    }

    pub fn remove_duplicates(mut self) -> Self {
        self.remove_duplicates = Some(true);
        self
    }
}

impl FieldTable for LatestNewsQuery {
    const FIELDS: &'static [Field<Self>] = &[
        Field {
            key: "timeframe",
            get: |q| FieldValue::Timeframe(q.timeframe),
            rules: &[Rule::ValidTimeframe],
        },
        Field {
            key: "tag",
            get: |q| FieldValue::List(&q.tags),
            rules: &[Rule::MaxItems(MAX_LIST_ITEMS), Rule::OneOf(allowed::TAGS)],
        },
        Field {
            key: "sentiment",
            get: |q| FieldValue::Text(&q.sentiment),
            rules: &[Rule::OneOf(allowed::SENTIMENTS)],
        },
        Field {
            key: "region",
            get: |q| FieldValue::List(&q.regions),
            rules: &[Rule::MaxItems(MAX_LIST_ITEMS)],
        },
        Field {
            key: "removeduplicate",
            get: |q| FieldValue::Flag(q.remove_duplicates),
            rules: &[],
        },
    ];
}

impl QueryParams for LatestNewsQuery {
    fn encode(&self) -> QueryMap {
        encode_with_base(&self.base, self)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.base)?;
        validate_fields(self)
    }
}

impl NewsQuery for LatestNewsQuery {
    const ENDPOINT: Endpoint = Endpoint::Latest;

    fn base(&self) -> &BaseFilters {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseFilters {
        &mut self.base
    }
}

/// Query for the `archive` endpoint (historical news).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveNewsQuery {
    pub base: BaseFilters,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

impl ArchiveNewsQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            base: BaseFilters::with_query(query),
            ..Default::default()
        }
    }

    pub fn from_date(mut self, date: NaiveDate) -> Self {
        self.from_date = Some(date);
        self
    }

    pub fn to_date(mut self, date: NaiveDate) -> Self {
        self.to_date = Some(date);
        self
    }
}

impl FieldTable for ArchiveNewsQuery {
    const FIELDS: &'static [Field<Self>] = &[
        Field {
            key: "from_date",
            get: |q| FieldValue::Date(q.from_date),
            rules: &[Rule::NotFuture],
        },
        Field {
            key: "to_date",
            get: |q| FieldValue::Date(q.to_date),
            rules: &[Rule::NotFuture],
        },
    ];
}

impl QueryParams for ArchiveNewsQuery {
    fn encode(&self) -> QueryMap {
        encode_with_base(&self.base, self)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.base)?;
        validate_fields(self)
    }
}

impl NewsQuery for ArchiveNewsQuery {
    const ENDPOINT: Endpoint = Endpoint::Archive;

    fn base(&self) -> &BaseFilters {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseFilters {
        &mut self.base
    }
}

/// Query for the `crypto` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CryptoNewsQuery {
    pub base: BaseFilters,
    /// Coin symbols, e.g. `btc`, `eth`
    pub coins: Vec<String>,
    pub tags: Vec<String>,
    pub sentiment: String,
    pub remove_duplicates: Option<bool>,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

impl CryptoNewsQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            base: BaseFilters::with_query(query),
            ..Default::default()
        }
    }

    pub fn coins<I, S>(mut self, coins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.coins = collect(coins);
        self
    }

    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = collect(tags);
        self
    }

    pub fn sentiment(mut self, sentiment: impl Into<String>) -> Self {
        self.sentiment = sentiment.into();
        self
    }

    pub fn remove_duplicates(mut self) -> Self {
        self.remove_duplicates = Some(true);
        self
    }

    pub fn from_date(mut self, date: NaiveDate) -> Self {
        self.from_date = Some(date);
        self
    }

    pub fn to_date(mut self, date: NaiveDate) -> Self {
        self.to_date = Some(date);
        self
    }
}

impl FieldTable for CryptoNewsQuery {
    const FIELDS: &'static [Field<Self>] = &[
        Field {
            key: "coin",
            get: |q| FieldValue::List(&q.coins),
            rules: &[Rule::MaxItems(MAX_LIST_ITEMS)],
        },
        Field {
            key: "tag",
            get: |q| FieldValue::List(&q.tags),
            rules: &[Rule::MaxItems(MAX_LIST_ITEMS), Rule::OneOf(allowed::TAGS)],
        },
        Field {
            key: "sentiment",
            get: |q| FieldValue::Text(&q.sentiment),
            rules: &[Rule::OneOf(allowed::SENTIMENTS)],
        },
        Field {
            key: "removeduplicate",
            get: |q| FieldValue::Flag(q.remove_duplicates),
            rules: &[],
        },
        Field {
            key: "from_date",
            get: |q| FieldValue::Date(q.from_date),
            rules: &[Rule::NotFuture],
        },
        Field {
            key: "to_date",
            get: |q| FieldValue::Date(q.to_date),
            rules: &[Rule::NotFuture],
        },
    ];
}

impl QueryParams for CryptoNewsQuery {
    fn encode(&self) -> QueryMap {
        encode_with_base(&self.base, self)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.base)?;
        validate_fields(self)
    }
}

impl NewsQuery for CryptoNewsQuery {
    const ENDPOINT: Endpoint = Endpoint::Crypto;

    fn base(&self) -> &BaseFilters {
        &self.base
    }

    fn base_mut(&mut self) -> &mut BaseFilters {
        &mut self.base
    }
}

/// Query for the `sources` endpoint. Each filter takes a single value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesQuery {
    pub country: String,
    pub language: String,
    pub category: String,
    pub priority_domain: String,
    pub domain_url: String,
}

impl SourcesQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn priority_domain(mut self, tier: impl Into<String>) -> Self {
        self.priority_domain = tier.into();
        self
    }

    pub fn domain_url(mut self, url: impl Into<String>) -> Self {
        self.domain_url = url.into();
        self
    }
}

impl FieldTable for SourcesQuery {
    const FIELDS: &'static [Field<Self>] = &[
        Field {
            key: "country",
            get: |q| FieldValue::Text(&q.country),
            rules: &[Rule::OneOf(allowed::COUNTRIES)],
        },
        Field {
            key: "language",
            get: |q| FieldValue::Text(&q.language),
            rules: &[Rule::OneOf(allowed::LANGUAGES)],
        },
        Field {
            key: "category",
            get: |q| FieldValue::Text(&q.category),
            rules: &[Rule::OneOf(allowed::CATEGORIES)],
        },
        Field {
            key: "prioritydomain",
            get: |q| FieldValue::Text(&q.priority_domain),
            rules: &[Rule::OneOf(allowed::PRIORITY_DOMAINS)],
        },
        Field {
            key: "domainurl",
            get: |q| FieldValue::Text(&q.domain_url),
            rules: &[],
        },
    ];
}

impl QueryParams for SourcesQuery {
    fn encode(&self) -> QueryMap {
        let mut out = QueryMap::new();
        encode_fields(self, &mut out);
        out
    }

    fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_encode_omits_unset_fields() {
        let query = LatestNewsQuery::new("artificial intelligence")
            .languages(["en"])
            .categories(["technology", "science"])
            .remove_duplicates();
        let params = query.encode();

        assert_eq!(params.get("q").map(String::as_str), Some("artificial intelligence"));
        assert_eq!(params.get("language").map(String::as_str), Some("en"));
        assert_eq!(params.get("category").map(String::as_str), Some("technology,science"));
        assert_eq!(params.get("removeduplicate").map(String::as_str), Some("1"));
        assert!(!params.contains_key("page"));
        assert!(!params.contains_key("size"));
        assert!(!params.contains_key("qInTitle"));
        assert_eq!(params.len(), 4);
    }

    #[test]
    fn test_page_token_round_trip() {
        let mut query = LatestNewsQuery::new("");
        assert_eq!(query.page_token(), None);
        query.set_page_token("abc123");
        assert_eq!(query.page_token(), Some("abc123"));
        assert_eq!(query.encode().get("page").map(String::as_str), Some("abc123"));
    }

    #[test]
    fn test_search_modes_are_exclusive() {
        let query = LatestNewsQuery::new("bitcoin").query_in_title("bitcoin");
        assert_eq!(
            query.validate(),
            Err(ValidationError::MutuallyExclusive {
                field: "q",
                other: "qInTitle"
            })
        );

        let query = LatestNewsQuery::new("")
            .query_in_title("a")
            .query_in_metadata("b");
        assert!(matches!(
            query.validate(),
            Err(ValidationError::MutuallyExclusive { .. })
        ));

        assert!(LatestNewsQuery::new("").query_in_metadata("b").validate().is_ok());
    }

    #[test]
    fn test_category_and_exclusion_conflict() {
        let query = ArchiveNewsQuery::new("x")
            .categories(["sports"])
            .exclude_categories(["crime"]);
        assert!(matches!(
            query.validate(),
            Err(ValidationError::MutuallyExclusive { field: "category", .. })
        ));
    }

    #[test]
    fn test_unknown_values_rejected() {
        let query = LatestNewsQuery::new("").countries(["us", "atlantis"]);
        assert_eq!(
            query.validate(),
            Err(ValidationError::NotAllowed {
                field: "country",
                value: "atlantis".to_string()
            })
        );

        let query = CryptoNewsQuery::new("").sentiment("ecstatic");
        assert!(query.validate().is_err());

        let query = LatestNewsQuery::new("").exclude_fields(["content", "nonsense"]);
        assert!(query.validate().is_err());
    }

    #[test]
    fn test_size_bounds() {
        assert!(LatestNewsQuery::new("").size(50).validate().is_ok());
        assert!(matches!(
            LatestNewsQuery::new("").size(0).validate(),
            Err(ValidationError::OutOfRange { field: "size", .. })
        ));
        assert!(LatestNewsQuery::new("").size(51).validate().is_err());
    }

    #[test]
    fn test_archive_dates() {
        let from = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2023, 1, 31).unwrap();
        let query = ArchiveNewsQuery::new("election").from_date(from).to_date(to);
        assert!(query.validate().is_ok());

        let params = query.encode();
        assert_eq!(params.get("from_date").map(String::as_str), Some("2023-01-01"));
        assert_eq!(params.get("to_date").map(String::as_str), Some("2023-01-31"));

        let future = chrono::Utc::now().date_naive() + chrono::Duration::days(30);
        assert!(ArchiveNewsQuery::new("").to_date(future).validate().is_err());
    }

    #[test]
    fn test_crypto_fields() {
        let query = CryptoNewsQuery::new("")
            .coins(["btc", "eth"])
            .tags(["blockchain"])
            .sentiment("positive");
        assert!(query.validate().is_ok());

        let params = query.encode();
        assert_eq!(params.get("coin").map(String::as_str), Some("btc,eth"));
        assert_eq!(params.get("tag").map(String::as_str), Some("blockchain"));
        assert_eq!(params.get("sentiment").map(String::as_str), Some("positive"));
    }

    #[test]
    fn test_timeframe_parse_and_encode() {
        assert_eq!("6".parse::<Timeframe>(), Ok(Timeframe::Hours(6)));
        assert_eq!("90m".parse::<Timeframe>(), Ok(Timeframe::Minutes(90)));
        assert!("soon".parse::<Timeframe>().is_err());

        let query = LatestNewsQuery::new("").timeframe(Timeframe::Minutes(90));
        assert_eq!(query.encode().get("timeframe").map(String::as_str), Some("90m"));
        assert!(LatestNewsQuery::new("")
            .timeframe(Timeframe::Minutes(3000))
            .validate()
            .is_err());
    }

    #[test]
    fn test_timeframe_range_inclusive() {
        assert!(Timeframe::Hours(0).is_valid());
        assert!(Timeframe::Hours(48).is_valid());
        assert!(!Timeframe::Hours(49).is_valid());
        assert!(Timeframe::Minutes(0).is_valid());
        assert!(Timeframe::Minutes(2880).is_valid());
        assert!(!Timeframe::Minutes(2881).is_valid());
    }

    #[test]
    fn test_sources_query() {
        let query = SourcesQuery::new().country("us").category("technology");
        assert!(query.validate().is_ok());

        let params = query.encode();
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("country").map(String::as_str), Some("us"));

        assert!(SourcesQuery::new().language("xx").validate().is_err());
    }

    #[test]
    fn test_endpoints() {
        assert_eq!(LatestNewsQuery::ENDPOINT, Endpoint::Latest);
        assert_eq!(ArchiveNewsQuery::ENDPOINT, Endpoint::Archive);
        assert_eq!(CryptoNewsQuery::ENDPOINT, Endpoint::Crypto);
    }
}
