use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use super::{wire, Keyed};

// ---------------------------------------------------------------------------
// Sentiment: Service-assigned tone of a review
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Negative, Sentiment::Neutral];
}

/// Unlabelled or unrecognized sentiment reads as neutral.
impl<'de> Deserialize<'de> for Sentiment {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(d)?;
        Ok(match raw.as_deref().map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("positive") => Sentiment::Positive,
            Some(s) if s.eq_ignore_ascii_case("negative") => Sentiment::Negative,
            _ => Sentiment::Neutral,
        })
    }
}

// ---------------------------------------------------------------------------
// Review: A customer review of one product
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: u64,
    #[serde(deserialize_with = "wire::review_score")]
    pub rating: u8,
    #[serde(default, deserialize_with = "wire::text")]
    pub text: String,
    #[serde(default, deserialize_with = "wire::text")]
    pub author: String,
    #[serde(deserialize_with = "wire::date")]
    pub date: NaiveDate,
    #[serde(default)]
    pub sentiment: Sentiment,
}

impl Keyed for Review {
    fn key(&self) -> u64 {
        self.id
    }
}
