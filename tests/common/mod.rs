//! Common test utilities for go-wordcloud.

pub mod image_utils;
pub mod test_data;
