use serde::{Deserialize, Deserializer, Serialize};

/// One page of a curated list (`/v2/movie/in_theaters`, `/v2/movie/top250`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectList {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub start: u32,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subjects: Vec<Subject>,
}

/// Movie subject.
///
/// List endpoints return the short form; `summary` and `countries` are only
/// populated by `/v2/movie/subject/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subject {
    #[serde(deserialize_with = "id_from_string")]
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default, deserialize_with = "year_from_string")]
    pub year: Option<i32>,
    #[serde(default)]
    pub rating: Rating,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub images: Option<SubjectImages>,
    /// Douban web page of the subject
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub countries: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Rating {
    #[serde(default)]
    pub average: f64,
    #[serde(default)]
    pub max: i32,
    #[serde(default)]
    pub min: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectImages {
    pub small: Option<String>,
    pub medium: Option<String>,
    pub large: Option<String>,
}

impl Subject {
    /// Largest available poster
    pub fn poster_url(&self) -> Option<&str> {
        let images = self.images.as_ref()?;
        images
            .large
            .as_deref()
            .or(images.medium.as_deref())
            .or(images.small.as_deref())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    String(String),
    Number(i64),
}

// Douban encodes ids as strings ("1292052")
fn id_from_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::String(s) => s.trim().parse().map_err(serde::de::Error::custom),
        StringOrNumber::Number(n) => Ok(n),
    }
}

// Year is a string and is sometimes empty
fn year_from_string<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        match Option::<StringOrNumber>::deserialize(deserializer)? {
            Some(StringOrNumber::String(s)) => s.trim().parse().ok(),
            Some(StringOrNumber::Number(n)) => i32::try_from(n).ok(),
            None => None,
        },
    )
}
