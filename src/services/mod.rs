pub mod keywords;
pub mod language;
pub mod profile;
pub mod scoring;
pub mod text;
pub mod tfidf;
