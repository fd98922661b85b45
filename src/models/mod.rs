//! Typed records and query parameter sets.

mod article;
mod news_source;
mod query;
mod response;

pub use article::{Article, Sentiment, SentimentStats};
pub use news_source::NewsSource;
pub use query::{
    ArchiveNewsQuery, BaseFilters, CryptoNewsQuery, LatestNewsQuery, NewsQuery, QueryParams,
    SourcesQuery, Timeframe, MAX_PAGE_SIZE,
};
pub use response::{
    decode_news_page, decode_sources, ErrorBody, ErrorDetail, NewsPage, SourcesPage,
    STATUS_SUCCESS,
};
